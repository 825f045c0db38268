//! Authenticated HTTP PUT uploads to the artifact repository.
//!
//! Provides a trait-based abstraction over the upload transport so the
//! pipeline can be exercised without network access, plus the `ureq`
//! implementation used in production. The repository convention is
//! unusual: the response body is inspected after every request, and any
//! non-empty body is a server-reported failure even when the status line
//! says success, because some repository servers report errors with 200.

use base64::Engine as _;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;

/// Connect timeout for repository requests.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Response and body read timeout; generous to tolerate slow links on
/// large artefacts.
const READ_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// Errors arising from artefact upload operations.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The HTTP request failed (connect, DNS, timeout, or an error status
    /// with an empty body).
    #[error("upload failed for {url}: {reason}")]
    Http {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The server reported an error in the response body.
    #[error("the server reported an error during the publish operation: {message}")]
    RemoteRejected {
        /// The server's literal (trimmed) response body.
        message: String,
    },

    /// The local file could not be read.
    #[error("cannot read {path} for upload: {source}")]
    Read {
        /// Path of the unreadable file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The local path has no final file-name component.
    #[error("upload source has no file name: {path}")]
    NoFileName {
        /// The offending path.
        path: Utf8PathBuf,
    },
}

/// Remote repository coordinates plus credentials for one publish run.
#[derive(Debug, Clone)]
pub struct RepositoryTarget {
    /// Base repository URL, with or without a trailing slash.
    pub base_url: String,
    /// Group identifier, dotted form.
    pub group_id: String,
    /// Artifact identifier.
    pub artifact_id: String,
    /// Version string.
    pub version: String,
    /// Username; empty means anonymous unless a password is set.
    pub username: String,
    /// Password; empty means anonymous unless a username is set.
    pub password: String,
}

impl RepositoryTarget {
    /// Compute the remote URL for `file_name`: base URL joined with
    /// exactly one separator, the group identifier with dots replaced by
    /// slashes, the artifact identifier, the version, and the file name.
    #[must_use]
    pub fn url_for(&self, file_name: &str) -> String {
        let separator = if self.base_url.ends_with('/') { "" } else { "/" };
        format!(
            "{}{}{}/{}/{}/{}",
            self.base_url,
            separator,
            self.group_id.replace('.', "/"),
            self.artifact_id,
            self.version,
            file_name,
        )
    }

    /// Build the basic-auth header value when either credential is
    /// non-empty.
    #[must_use]
    pub fn basic_auth_header(&self) -> Option<String> {
        if self.username.is_empty() && self.password.is_empty() {
            return None;
        }
        let credentials = format!("{}:{}", self.username, self.password);
        let encoded = base64::engine::general_purpose::STANDARD.encode(credentials);
        Some(format!("Basic {encoded}"))
    }
}

/// Trait for uploading one local file to the repository.
///
/// The abstraction lets pipeline tests verify ordering and rename
/// behaviour without network access.
#[cfg_attr(test, mockall::automock)]
pub trait ArtefactUploader {
    /// Upload `file`, naming it `remote_name` on the repository when
    /// given, otherwise the local file name.
    ///
    /// Exactly one remote object is created or overwritten per call; at
    /// most one attempt is made.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError`] on transport failure or a server-reported
    /// error body.
    fn upload<'a>(&self, file: &Utf8Path, remote_name: Option<&'a str>) -> Result<(), UploadError>;
}

/// HTTP PUT uploader using `ureq`.
#[derive(Debug, Clone)]
pub struct HttpUploader {
    target: RepositoryTarget,
}

impl HttpUploader {
    /// Create an uploader for the given repository target.
    #[must_use]
    pub const fn new(target: RepositoryTarget) -> Self {
        Self { target }
    }
}

impl ArtefactUploader for HttpUploader {
    fn upload(&self, file: &Utf8Path, remote_name: Option<&str>) -> Result<(), UploadError> {
        let local_name = file.file_name().ok_or_else(|| UploadError::NoFileName {
            path: file.to_owned(),
        })?;
        let url = self.target.url_for(remote_name.unwrap_or(local_name));
        log::info!("Uploading {file} to {url}");

        let mut request = http_agent().put(&url);
        if let Some(header) = self.target.basic_auth_header() {
            request = request.header("Authorization", header.as_str());
        }

        let mut reader = fs::File::open(file).map_err(|source| UploadError::Read {
            path: file.to_owned(),
            source,
        })?;
        let response = request
            .send(ureq::SendBody::from_reader(&mut reader))
            .map_err(|e| UploadError::Http {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        let body = response
            .into_body()
            .read_to_string()
            .map_err(|e| UploadError::Http {
                url: url.clone(),
                reason: e.to_string(),
            })?;
        if !body.trim().is_empty() {
            return Err(UploadError::RemoteRejected {
                message: body.trim().to_owned(),
            });
        }
        if status.is_client_error() || status.is_server_error() {
            return Err(UploadError::Http {
                url,
                reason: format!("server returned status {status}"),
            });
        }
        log::info!("Upload successful");
        Ok(())
    }
}

/// Shared `ureq` agent with publish timeout configuration. Status codes
/// are not mapped to errors so the response body can be inspected
/// uniformly.
fn http_agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        let config = ureq::Agent::config_builder()
            .timeout_connect(Some(CONNECT_TIMEOUT))
            .timeout_recv_response(Some(READ_TIMEOUT))
            .timeout_recv_body(Some(READ_TIMEOUT))
            .http_status_as_error(false)
            .build();
        ureq::Agent::new_with_config(config)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn target(base_url: &str) -> RepositoryTarget {
        RepositoryTarget {
            base_url: base_url.to_owned(),
            group_id: "org.example.data".to_owned(),
            artifact_id: "demo".to_owned(),
            version: "1.0".to_owned(),
            username: String::new(),
            password: String::new(),
        }
    }

    #[rstest]
    #[case::no_trailing_slash("https://repo.example.test/content")]
    #[case::trailing_slash("https://repo.example.test/content/")]
    fn url_joins_with_exactly_one_separator(#[case] base: &str) {
        let url = target(base).url_for("demo-1.0.zip");
        assert_eq!(
            url,
            "https://repo.example.test/content/org/example/data/demo/1.0/demo-1.0.zip"
        );
    }

    #[test]
    fn group_dots_become_path_segments() {
        let url = target("http://host/repo").url_for("f");
        assert!(url.contains("/org/example/data/"));
        assert!(!url.contains("org.example.data"));
    }

    #[test]
    fn anonymous_target_sends_no_auth_header() {
        assert_eq!(target("http://host/repo").basic_auth_header(), None);
    }

    #[rstest]
    #[case::both("admin", "secret", "YWRtaW46c2VjcmV0")]
    #[case::username_only("admin", "", "YWRtaW46")]
    #[case::password_only("", "secret", "OnNlY3JldA==")]
    fn credentials_produce_basic_auth_header(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: &str,
    ) {
        let mut t = target("http://host/repo");
        t.username = username.to_owned();
        t.password = password.to_owned();
        assert_eq!(t.basic_auth_header(), Some(format!("Basic {expected}")));
    }
}
