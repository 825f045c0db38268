//! Repository metadata document generation.
//!
//! Maven-layout repositories index artefact versions through a small
//! `maven-metadata.xml` document alongside the uploaded files. The
//! document is plain UTF-8 XML with a `metadata` root and the three
//! coordinate leaves; no schema validation is performed on write.

use crate::checksum::{self, Algorithm, ChecksumError};
use crate::project::Project;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use thiserror::Error;

/// File name of the repository metadata document.
pub const METADATA_FILE_NAME: &str = "maven-metadata.xml";

/// Errors arising from metadata generation.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// The metadata document could not be written.
    #[error("cannot write {path}: {source}")]
    Write {
        /// Path of the document that failed to write.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A checksum sidecar for the document could not be produced.
    #[error(transparent)]
    Checksum(#[from] ChecksumError),
}

/// Render the metadata document for a project record.
#[must_use]
pub fn render(project: &Project) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\n\
         <metadata>\n\
         \x20   <groupId>{}</groupId>\n\
         \x20   <artifactId>{}</artifactId>\n\
         \x20   <version>{}</version>\n\
         </metadata>\n",
        escape_xml(&project.group_id),
        escape_xml(&project.artifact_id),
        escape_xml(&project.version),
    )
}

/// Write `maven-metadata.xml` into `dir` and checksum it with both
/// algorithms.
///
/// # Errors
///
/// Returns [`MetadataError::Write`] if the document cannot be written and
/// [`MetadataError::Checksum`] if either sidecar fails.
pub fn write_metadata(project: &Project, dir: &Utf8Path) -> Result<Utf8PathBuf, MetadataError> {
    let path = dir.join(METADATA_FILE_NAME);
    fs::write(&path, render(project)).map_err(|source| MetadataError::Write {
        path: path.clone(),
        source,
    })?;
    checksum::write_sidecar(&path, Algorithm::Md5, dir, None)?;
    checksum::write_sidecar(&path, Algorithm::Sha1, dir, None)?;
    Ok(path)
}

/// Escape the XML-reserved characters in element text.
fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
