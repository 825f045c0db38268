//! Immutable project coordinate record.
//!
//! The record identifies one publishable unit: group/artifact/version
//! coordinates plus the display name, owning organisation, and license
//! entries that feed template substitution. The GUI or CLI collaborator
//! snapshots all values into this type before the pipeline runs, so the
//! core never observes mutable external state.

use serde::Deserialize;
use thiserror::Error;

/// A license entry attached to the published artefact.
///
/// All fields are free text; absent values stay empty and substitute the
/// empty string during template filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct License {
    /// Human-readable license name, e.g. "Apache-2.0".
    #[serde(default)]
    pub name: String,
    /// URL of the license text.
    #[serde(default)]
    pub url: String,
    /// Free-form comments.
    #[serde(default)]
    pub comments: String,
    /// Distribution channel, conventionally "repo" or "manual".
    #[serde(default)]
    pub distribution: String,
}

/// The coordinate record for one publish run.
///
/// Group, artifact, and version must be non-empty before the pipeline
/// runs; [`Project::validate`] enforces this at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Project {
    /// Repository group identifier, dotted form (e.g. "org.example.data").
    pub group_id: String,
    /// Artifact identifier within the group.
    pub artifact_id: String,
    /// Version string, used verbatim in file names and URLs.
    pub version: String,
    /// Display name, used in archive and descriptor file names.
    pub name: String,
    /// Owning organisation name, may be empty.
    #[serde(default)]
    pub organization: String,
    /// License entries in declaration order.
    #[serde(default)]
    pub licenses: Vec<License>,
}

/// Errors raised when a coordinate record fails boundary validation.
#[derive(Debug, Error)]
pub enum ProjectError {
    /// A required coordinate field is empty.
    #[error("project {field} must not be empty")]
    EmptyField {
        /// Name of the offending field.
        field: &'static str,
    },
}

impl Project {
    /// Check that the coordinates required by file naming and URL
    /// construction are populated.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::EmptyField`] naming the first empty field.
    pub fn validate(&self) -> Result<(), ProjectError> {
        for (field, value) in [
            ("group_id", &self.group_id),
            ("artifact_id", &self.artifact_id),
            ("version", &self.version),
            ("name", &self.name),
        ] {
            if value.trim().is_empty() {
                return Err(ProjectError::EmptyField { field });
            }
        }
        Ok(())
    }
}
