//! Top-level error type for the publish pipeline.
//!
//! Each pipeline component defines its own error enum; this module
//! aggregates them so the orchestrator and the CLI surface a single
//! caller-visible failure type. Every component propagates failures to
//! its caller; nothing in the core swallows an error or retries.

use crate::archive::ArchiveError;
use crate::checksum::ChecksumError;
use crate::config::ConfigError;
use crate::metadata::MetadataError;
use crate::project::ProjectError;
use crate::upload::UploadError;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur during a publish run.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The coordinate record failed boundary validation.
    #[error(transparent)]
    Project(#[from] ProjectError),

    /// The publish descriptor could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The project directory does not exist.
    #[error("project directory not found: {path}")]
    ProjectDirNotFound {
        /// The missing directory.
        path: Utf8PathBuf,
    },

    /// No data items were selected for publishing.
    #[error("no data files selected for publishing")]
    NoDataItems,

    /// A selected data item does not exist.
    #[error("data item not found: {path}")]
    DataItemNotFound {
        /// The missing path.
        path: Utf8PathBuf,
    },

    /// The per-run working directory could not be created.
    #[error("cannot create working directory: {source}")]
    Workdir {
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The project descriptor could not be staged into the working
    /// directory.
    #[error("cannot stage descriptor {path}: {source}")]
    DescriptorStage {
        /// The descriptor path that failed to stage.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Archive construction failed.
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// Digest computation or sidecar writing failed.
    #[error(transparent)]
    Checksum(#[from] ChecksumError),

    /// Repository metadata generation failed.
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    /// An upload failed.
    #[error(transparent)]
    Upload(#[from] UploadError),

    /// Deleting the working directory failed after the pipeline
    /// completed.
    #[error("cleanup of working directory failed: {source}")]
    Cleanup {
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The dedicated publish worker panicked.
    #[error("publish worker panicked")]
    WorkerPanicked,
}

/// Result type alias using [`PublishError`].
pub type Result<T> = std::result::Result<T, PublishError>;
