//! TOML publish descriptor loading.
//!
//! The CLI collaborator collects everything the pipeline needs from a
//! `publish.toml` file in the project directory: the coordinate record,
//! the data-file list, the repository location, and optional credentials.
//! Credentials may also be supplied per invocation, which takes
//! precedence over the file.

use crate::project::{Project, ProjectError};
use crate::publish::PublishRequest;
use crate::template::RuntimeInfo;
use crate::upload::RepositoryTarget;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::fs;
use thiserror::Error;

/// Errors raised while loading a publish descriptor.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The descriptor file could not be read.
    #[error("cannot read publish descriptor {path}: {source}")]
    Read {
        /// The descriptor path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The descriptor is not valid TOML or misses required keys.
    #[error("invalid publish descriptor {path}: {source}")]
    Parse {
        /// The descriptor path.
        path: Utf8PathBuf,
        /// The TOML parse error.
        source: toml::de::Error,
    },

    /// The coordinate record failed validation.
    #[error(transparent)]
    Project(#[from] ProjectError),

    /// The descriptor lists no data files.
    #[error("publish descriptor lists no data files")]
    NoFiles,
}

/// Repository location and credentials section.
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryConfig {
    /// Base repository URL.
    pub url: String,
    /// Username; empty means anonymous.
    #[serde(default)]
    pub username: String,
    /// Password; empty means anonymous.
    #[serde(default)]
    pub password: String,
}

/// Optional runtime identification strings for template filtering.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuntimeConfig {
    /// Value substituted for the runtime-version token.
    #[serde(default)]
    pub version: String,
    /// Value substituted for the runtime-vendor token.
    #[serde(default)]
    pub vendor: String,
}

/// A parsed `publish.toml` descriptor.
#[derive(Debug, Clone, Deserialize)]
pub struct PublishConfig {
    /// The coordinate record.
    pub project: Project,
    /// Variant classifier; empty means none.
    #[serde(default)]
    pub classifier: String,
    /// Data-type tag for archive naming.
    pub data_type: String,
    /// Data files and directories, relative to the project directory
    /// unless absolute.
    #[serde(default)]
    pub files: Vec<String>,
    /// Repository location and credentials.
    pub repository: RepositoryConfig,
    /// Runtime strings, defaulting to empty.
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

impl PublishConfig {
    /// Load and validate a descriptor from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] or [`ConfigError::Parse`] on I/O or
    /// syntax problems, [`ConfigError::Project`] when a coordinate is
    /// empty, and [`ConfigError::NoFiles`] when no data files are listed.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        let config: Self = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })?;
        config.project.validate()?;
        if config.files.is_empty() {
            return Err(ConfigError::NoFiles);
        }
        Ok(config)
    }

    /// Resolve the descriptor into a pipeline request and repository
    /// target for `project_dir`.
    #[must_use]
    pub fn into_parts(self, project_dir: &Utf8Path) -> (PublishRequest, RepositoryTarget) {
        let data_items = self
            .files
            .iter()
            .map(|file| {
                let path = Utf8Path::new(file);
                if path.is_absolute() {
                    path.to_owned()
                } else {
                    project_dir.join(path)
                }
            })
            .collect();
        let target = RepositoryTarget {
            base_url: self.repository.url,
            group_id: self.project.group_id.clone(),
            artifact_id: self.project.artifact_id.clone(),
            version: self.project.version.clone(),
            username: self.repository.username,
            password: self.repository.password,
        };
        let request = PublishRequest {
            project: self.project,
            classifier: self.classifier,
            data_type: self.data_type,
            project_dir: project_dir.to_owned(),
            data_items,
            runtime: RuntimeInfo {
                version: self.runtime.version,
                vendor: self.runtime.vendor,
            },
        };
        (request, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_DESCRIPTOR: &str = r#"
        data_type = "zip"
        classifier = "RF2"
        files = ["data/a.txt", "/abs/b.txt"]

        [project]
        group_id = "org.example"
        artifact_id = "demo"
        version = "1.0"
        name = "demo"
        organization = "Example Org"

        [[project.licenses]]
        name = "Apache-2.0"
        url = "https://www.apache.org/licenses/LICENSE-2.0"

        [repository]
        url = "https://repo.example.test/content"
        username = "admin"
        password = "secret"
    "#;

    fn write_descriptor(contents: &str) -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = Utf8PathBuf::from_path_buf(dir.path().join("publish.toml")).expect("utf8");
        fs::write(&path, contents).expect("write descriptor");
        (dir, path)
    }

    #[test]
    fn full_descriptor_parses() {
        let (_guard, path) = write_descriptor(FULL_DESCRIPTOR);
        let config = PublishConfig::load(&path).expect("load");
        assert_eq!(config.project.artifact_id, "demo");
        assert_eq!(config.classifier, "RF2");
        assert_eq!(config.project.licenses.len(), 1);
        assert_eq!(config.repository.username, "admin");
    }

    #[test]
    fn relative_files_resolve_against_project_dir() {
        let (_guard, path) = write_descriptor(FULL_DESCRIPTOR);
        let config = PublishConfig::load(&path).expect("load");
        let (request, target) = config.into_parts(Utf8Path::new("/work/project"));
        assert_eq!(
            request.data_items,
            vec![
                Utf8PathBuf::from("/work/project/data/a.txt"),
                Utf8PathBuf::from("/abs/b.txt"),
            ]
        );
        assert_eq!(target.group_id, "org.example");
    }

    #[test]
    fn empty_file_list_is_rejected() {
        let descriptor = FULL_DESCRIPTOR.replace("files = [\"data/a.txt\", \"/abs/b.txt\"]", "");
        let (_guard, path) = write_descriptor(&descriptor);
        let err = PublishConfig::load(&path).expect_err("must reject");
        assert!(matches!(err, ConfigError::NoFiles));
    }

    #[test]
    fn empty_version_is_rejected() {
        let descriptor = FULL_DESCRIPTOR.replace("version = \"1.0\"", "version = \"\"");
        let (_guard, path) = write_descriptor(&descriptor);
        let err = PublishConfig::load(&path).expect_err("must reject");
        assert!(matches!(err, ConfigError::Project(_)));
    }

    #[test]
    fn syntax_error_names_the_descriptor() {
        let (_guard, path) = write_descriptor("not toml ==");
        let err = PublishConfig::load(&path).expect_err("must reject");
        assert!(err.to_string().contains("publish.toml"));
    }
}
