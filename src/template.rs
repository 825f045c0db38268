//! Placeholder token substitution for auxiliary files.
//!
//! Auxiliary file contents and the static table's path templates both carry
//! `${...}` placeholders. Substitution is a single left-to-right pass over
//! a fixed token table: defined tokens are replaced (with the empty string
//! when the record holds no value), undefined tokens are left as literal
//! text, and a substituted value is never re-scanned, so no token can
//! introduce a new match.

use crate::project::Project;
use camino::Utf8Path;

/// Runtime identification strings substituted for the `${java.version}`
/// and `${java.vendor}` tokens.
///
/// The token names are fixed by the existing template files in published
/// projects; the values are whatever the embedding application reports
/// about its runtime. Both default to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeInfo {
    /// Runtime version string.
    pub version: String,
    /// Runtime vendor string.
    pub vendor: String,
}

/// A fixed table of `${token}` names and their resolved values.
#[derive(Debug, Clone)]
pub struct TokenTable {
    entries: Vec<(String, String)>,
}

impl TokenTable {
    /// Build the content-filtering table for a project record.
    ///
    /// Covers the runtime strings, the project coordinates, the
    /// organisation name, and the indexed license fields in record order.
    #[must_use]
    pub fn for_content(project: &Project, runtime: &RuntimeInfo) -> Self {
        let mut entries = vec![
            ("java.version".to_owned(), runtime.version.clone()),
            ("java.vendor".to_owned(), runtime.vendor.clone()),
            ("project.name".to_owned(), project.name.clone()),
            ("project.version".to_owned(), project.version.clone()),
            ("project.groupId".to_owned(), project.group_id.clone()),
            (
                "project.organization.name".to_owned(),
                project.organization.clone(),
            ),
        ];
        for (i, license) in project.licenses.iter().enumerate() {
            entries.push((format!("project.licenses[{i}].name"), license.name.clone()));
            entries.push((
                format!("project.licenses[{i}].comments"),
                license.comments.clone(),
            ));
            entries.push((
                format!("project.licenses[{i}].distribution"),
                license.distribution.clone(),
            ));
            entries.push((format!("project.licenses[{i}].url"), license.url.clone()));
        }
        Self { entries }
    }

    /// Build the path-template table resolving `${basedir}`, `${groupId}`,
    /// and `${artifactId}` in the auxiliary-file configuration.
    #[must_use]
    pub fn for_paths(project_dir: &Utf8Path, project: &Project) -> Self {
        Self {
            entries: vec![
                ("basedir".to_owned(), project_dir.to_string()),
                ("groupId".to_owned(), project.group_id.clone()),
                ("artifactId".to_owned(), project.artifact_id.clone()),
            ],
        }
    }

    fn lookup(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// Substitute every defined `${token}` in `input` in one pass.
    #[must_use]
    pub fn apply(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        let mut rest = input;
        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let after = &rest[start..];
            let Some(end) = after.find('}') else {
                // Unterminated placeholder: keep the tail verbatim.
                out.push_str(after);
                return out;
            };
            let key = &after[2..end];
            match self.lookup(key) {
                Some(value) => out.push_str(value),
                None => out.push_str(&after[..=end]),
            }
            rest = &after[end + 1..];
        }
        out.push_str(rest);
        out
    }
}
