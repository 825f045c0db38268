//! The ordered publish pipeline.
//!
//! Sequences archive construction, checksum generation, metadata
//! generation, and the uploads into one strictly sequential run with an
//! append-only status log and guaranteed cleanup of the per-run working
//! directory. The upload order is a repository compatibility requirement:
//! consumers expect the primary artefact and its checksums before the
//! descriptor, and the metadata document last.

use crate::archive::{self, ArchiveSpec};
use crate::checksum::{self, Algorithm};
use crate::error::{PublishError, Result};
use crate::metadata;
use crate::project::Project;
use crate::template::RuntimeInfo;
use crate::upload::ArtefactUploader;
use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

/// The phases of one publish run, in execution order.
///
/// `Failed` is terminal and reachable from any non-terminal phase;
/// cleanup still runs before it is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Request accepted, nothing started.
    Created,
    /// Building the archive.
    Archiving,
    /// Checksumming the archive and the descriptor.
    ChecksummingPrimary,
    /// Writing and checksumming the repository metadata.
    GeneratingMetadata,
    /// Uploading the nine artefacts in order.
    Uploading,
    /// Deleting the working directory.
    CleaningUp,
    /// Everything uploaded and cleaned up.
    Completed,
    /// The run failed; the outcome carries the cause.
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Created => "created",
            Self::Archiving => "archiving",
            Self::ChecksummingPrimary => "checksumming",
            Self::GeneratingMetadata => "generating metadata",
            Self::Uploading => "uploading",
            Self::CleaningUp => "cleaning up",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Append-only status log shared between the pipeline and its observer.
///
/// Lines are only ever appended, never truncated mid-run; a snapshot can
/// be taken at any time from another thread.
#[derive(Debug, Clone, Default)]
pub struct StatusLog {
    lines: Arc<Mutex<Vec<String>>>,
}

impl StatusLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one status line.
    pub fn push(&self, line: impl Into<String>) {
        let line = line.into();
        log::info!("{line}");
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line);
    }

    /// Return the accumulated log as one newline-separated string.
    #[must_use]
    pub fn snapshot(&self) -> String {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .join("\n")
    }
}

/// Immutable snapshot of everything one publish run needs.
///
/// The GUI or CLI collaborator populates this before the core runs; the
/// pipeline never reaches back into mutable application state.
#[derive(Debug, Clone)]
pub struct PublishRequest {
    /// The project coordinate record.
    pub project: Project,
    /// Variant classifier; empty means none.
    pub classifier: String,
    /// Data-type tag for archive naming.
    pub data_type: String,
    /// Project root directory holding `pom.xml` and `src/assembly/`.
    pub project_dir: Utf8PathBuf,
    /// Ordered, non-empty list of files and directories to archive.
    pub data_items: Vec<Utf8PathBuf>,
    /// Runtime strings for template filtering.
    pub runtime: RuntimeInfo,
}

/// The caller-visible result of a publish run.
#[derive(Debug)]
pub struct PublishOutcome {
    /// The full status log accumulated up to completion or failure.
    pub status_log: String,
    /// The terminal phase: [`Phase::Completed`] or [`Phase::Failed`].
    pub final_phase: Phase,
    /// Success, or the triggering error.
    pub result: Result<()>,
}

/// Handle to a publish run on its dedicated worker thread.
///
/// There is no cancellation; a caller observes progress through
/// [`PublishHandle::status`] and the final outcome through
/// [`PublishHandle::join`].
pub struct PublishHandle {
    worker: JoinHandle<PublishOutcome>,
    log: StatusLog,
}

impl PublishHandle {
    /// Snapshot the status log accumulated so far.
    #[must_use]
    pub fn status(&self) -> String {
        self.log.snapshot()
    }

    /// Wait for the run to finish and return its outcome.
    #[must_use]
    pub fn join(self) -> PublishOutcome {
        self.worker.join().unwrap_or_else(|_| PublishOutcome {
            status_log: self.log.snapshot(),
            final_phase: Phase::Failed,
            result: Err(PublishError::WorkerPanicked),
        })
    }
}

/// Run the pipeline on a dedicated worker thread.
///
/// The caller's thread stays free; observe progress via the returned
/// handle.
#[must_use]
pub fn spawn(
    request: PublishRequest,
    uploader: impl ArtefactUploader + Send + 'static,
) -> PublishHandle {
    let log = StatusLog::new();
    let worker_log = log.clone();
    let worker = thread::spawn(move || run(&request, &uploader, &worker_log));
    PublishHandle { worker, log }
}

/// Run the whole publish pipeline synchronously on the current thread.
///
/// Input validation happens before any temporary state is created. The
/// working directory is always cleaned up, whether the steps succeed or
/// fail; a cleanup failure after success becomes the run's error, while a
/// cleanup failure after an earlier error is recorded in the status log
/// as a secondary concern without overturning the primary outcome.
pub fn run(
    request: &PublishRequest,
    uploader: &dyn ArtefactUploader,
    log: &StatusLog,
) -> PublishOutcome {
    if let Err(error) = validate_inputs(request) {
        return PublishOutcome {
            status_log: log.snapshot(),
            final_phase: Phase::Failed,
            result: Err(error),
        };
    }

    let workdir = match tempfile::Builder::new()
        .prefix("ka-publish-")
        .tempdir()
        .map_err(|source| PublishError::Workdir { source })
    {
        Ok(dir) => dir,
        Err(error) => {
            return PublishOutcome {
                status_log: log.snapshot(),
                final_phase: Phase::Failed,
                result: Err(error),
            };
        }
    };
    let work_path = match Utf8PathBuf::from_path_buf(workdir.path().to_owned()) {
        Ok(path) => path,
        Err(path) => {
            return PublishOutcome {
                status_log: log.snapshot(),
                final_phase: Phase::Failed,
                result: Err(PublishError::Workdir {
                    source: std::io::Error::other(format!(
                        "working directory path is not UTF-8: {}",
                        path.display()
                    )),
                }),
            };
        }
    };

    let mut result = execute_steps(request, uploader, &work_path, log);

    log::debug!("entering phase: {}", Phase::CleaningUp);
    log::debug!("Cleaning up temp files");
    if let Err(source) = workdir.close() {
        if result.is_ok() {
            result = Err(PublishError::Cleanup { source });
        } else {
            log.push(format!("Cleanup of working directory failed: {source}"));
        }
    }

    let final_phase = if result.is_ok() {
        Phase::Completed
    } else {
        Phase::Failed
    };
    PublishOutcome {
        status_log: log.snapshot(),
        final_phase,
        result,
    }
}

/// Fail-fast input checks, before any temporary state exists.
fn validate_inputs(request: &PublishRequest) -> Result<()> {
    request.project.validate()?;
    if !request.project_dir.is_dir() {
        return Err(PublishError::ProjectDirNotFound {
            path: request.project_dir.clone(),
        });
    }
    if request.data_items.is_empty() {
        return Err(PublishError::NoDataItems);
    }
    for item in &request.data_items {
        if !item.exists() {
            return Err(PublishError::DataItemNotFound { path: item.clone() });
        }
    }
    Ok(())
}

/// The sequential pipeline steps, stopping at the first failure.
fn execute_steps(
    request: &PublishRequest,
    uploader: &dyn ArtefactUploader,
    work_dir: &Utf8Path,
    log: &StatusLog,
) -> Result<()> {
    let project = &request.project;
    let descriptor_remote = format!("{}-{}.pom", project.name, project.version);

    log::debug!("entering phase: {}", Phase::Archiving);
    log.push("Creating Archive File");
    let spec = ArchiveSpec {
        project,
        classifier: &request.classifier,
        data_type: &request.data_type,
        project_dir: &request.project_dir,
        data_items: &request.data_items,
        runtime: &request.runtime,
    };
    let archive_path = archive::build(&spec, work_dir)?;
    log::info!("Wrote {archive_path}");

    log::debug!("entering phase: {}", Phase::ChecksummingPrimary);
    log.push("Creating Checksum Files");
    // Stage the descriptor next to the other artefacts so every produced
    // file lives in the one working directory that cleanup removes.
    let descriptor_source = request.project_dir.join("pom.xml");
    let descriptor = work_dir.join("pom.xml");
    std::fs::copy(&descriptor_source, &descriptor).map_err(|source| {
        PublishError::DescriptorStage {
            path: descriptor_source.clone(),
            source,
        }
    })?;
    for algorithm in [Algorithm::Md5, Algorithm::Sha1] {
        let display = format!("{descriptor_remote}.{}", algorithm.extension());
        checksum::write_sidecar(&descriptor, algorithm, work_dir, Some(&display))?;
    }
    checksum::write_sidecar(&archive_path, Algorithm::Md5, work_dir, None)?;
    checksum::write_sidecar(&archive_path, Algorithm::Sha1, work_dir, None)?;

    log::debug!("entering phase: {}", Phase::GeneratingMetadata);
    log.push("Creating Metadata File");
    let metadata_path = metadata::write_metadata(project, work_dir)?;

    log::debug!("entering phase: {}", Phase::Uploading);
    log.push("Uploading data files");
    uploader.upload(&archive_path, None)?;
    uploader.upload(&sidecar_of(&archive_path, Algorithm::Md5), None)?;
    uploader.upload(&sidecar_of(&archive_path, Algorithm::Sha1), None)?;

    log.push("Uploading pom files");
    uploader.upload(&descriptor, Some(&descriptor_remote))?;
    for algorithm in [Algorithm::Md5, Algorithm::Sha1] {
        let local = work_dir.join(format!("pom.xml.{}", algorithm.extension()));
        let remote = format!("{descriptor_remote}.{}", algorithm.extension());
        uploader.upload(&local, Some(&remote))?;
    }

    log.push("Uploading metadata files");
    uploader.upload(&metadata_path, None)?;
    uploader.upload(&sidecar_of(&metadata_path, Algorithm::Md5), None)?;
    uploader.upload(&sidecar_of(&metadata_path, Algorithm::Sha1), None)?;

    Ok(())
}

/// Path of the checksum sidecar next to `file`.
fn sidecar_of(file: &Utf8Path, algorithm: Algorithm) -> Utf8PathBuf {
    let name = file.file_name().unwrap_or_default();
    file.with_file_name(format!("{name}.{}", algorithm.extension()))
}
