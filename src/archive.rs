//! Deterministic zip archive construction.
//!
//! Builds exactly one compressed archive per publish run: the selected
//! data items under a single versioned root folder, plus the auxiliary
//! files from the static table at their `META-INF` locations. Entry order
//! is fixed (data items in input order, directory walks sorted by file
//! name) and entry timestamps are pinned to the zip epoch, so two runs
//! over identical inputs produce byte-for-byte identical archives.

use crate::auxiliary::AUXILIARY_FILES;
use crate::project::Project;
use crate::template::{RuntimeInfo, TokenTable};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Errors arising from archive construction.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// A selected data item does not exist.
    #[error("data item not found: {path}")]
    MissingDataItem {
        /// The missing path.
        path: Utf8PathBuf,
    },

    /// An auxiliary file from the static table is missing.
    #[error("required file not found: {path}")]
    MissingAuxiliary {
        /// The missing path.
        path: Utf8PathBuf,
    },

    /// A source file could not be read.
    #[error("cannot read {path}: {source}")]
    Read {
        /// Path of the unreadable file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The archive or a staging file could not be written.
    #[error("cannot write {path}: {source}")]
    Write {
        /// Path that failed to write.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A directory walk failed below a data item.
    #[error("cannot walk {path}: {source}")]
    Walk {
        /// The data item whose walk failed.
        path: Utf8PathBuf,
        /// The underlying walk error.
        source: walkdir::Error,
    },

    /// A path below a data item is not valid UTF-8.
    #[error("non-UTF-8 path under data item: {path}")]
    NonUtf8Path {
        /// The offending path.
        path: PathBuf,
    },

    /// The zip writer reported a structural failure.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Inputs for one archive build.
///
/// Groups the project record with the run-specific naming inputs so the
/// build function keeps a small signature.
#[derive(Debug)]
pub struct ArchiveSpec<'a> {
    /// The project coordinate record.
    pub project: &'a Project,
    /// Variant classifier; an empty or blank string means no classifier.
    pub classifier: &'a str,
    /// Data-type tag used as both file-name suffix and category label.
    pub data_type: &'a str,
    /// Base directory resolving `${basedir}` in the auxiliary table.
    pub project_dir: &'a Utf8Path,
    /// Ordered data items; files archived individually, directories
    /// recursively.
    pub data_items: &'a [Utf8PathBuf],
    /// Runtime strings for content filtering.
    pub runtime: &'a RuntimeInfo,
}

impl ArchiveSpec<'_> {
    /// Name of the single root folder inside the archive:
    /// `<name>-<version>[-<classifier>].<data_type>`.
    #[must_use]
    pub fn root_folder_name(&self) -> String {
        let classifier = self.classifier.trim();
        if classifier.is_empty() {
            format!(
                "{}-{}.{}",
                self.project.name, self.project.version, self.data_type
            )
        } else {
            format!(
                "{}-{}-{}.{}",
                self.project.name, self.project.version, classifier, self.data_type
            )
        }
    }

    /// File name of the produced archive (root folder name plus `.zip`).
    #[must_use]
    pub fn archive_file_name(&self) -> String {
        format!("{}.zip", self.root_folder_name())
    }
}

/// Build the archive described by `spec` inside `work_dir`.
///
/// Returns the path of the produced zip. Filtered auxiliary contents are
/// rendered in memory and streamed straight into their entries, so
/// `work_dir` only ever holds the produced artefacts.
///
/// # Errors
///
/// Any unreadable source or write failure aborts the whole build and
/// propagates the cause; no partial archive is reported as output.
pub fn build(spec: &ArchiveSpec<'_>, work_dir: &Utf8Path) -> Result<Utf8PathBuf, ArchiveError> {
    let root = spec.root_folder_name();
    let archive_path = work_dir.join(spec.archive_file_name());
    let file = fs::File::create(&archive_path).map_err(|source| ArchiveError::Write {
        path: archive_path.clone(),
        source,
    })?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(9))
        // Data items can exceed the 4 GiB zip32 entry limit.
        .large_file(true)
        // Pinned timestamp keeps repeated builds byte-identical.
        .last_modified_time(zip::DateTime::default());

    writer.add_directory(format!("{root}/"), options)?;
    for item in spec.data_items {
        append_data_item(&mut writer, &root, item, options)?;
    }
    append_auxiliary_files(&mut writer, spec, &root, options)?;

    writer.finish()?;
    Ok(archive_path)
}

/// Append one data item: a file directly under the root, or a directory
/// tree under `<root>/<dir-name>/`.
fn append_data_item(
    writer: &mut ZipWriter<fs::File>,
    root: &str,
    item: &Utf8Path,
    options: SimpleFileOptions,
) -> Result<(), ArchiveError> {
    if item.is_file() {
        let name = item.file_name().ok_or_else(|| ArchiveError::MissingDataItem {
            path: item.to_owned(),
        })?;
        return append_file(writer, item, &format!("{root}/{name}"), options);
    }
    if !item.is_dir() {
        return Err(ArchiveError::MissingDataItem {
            path: item.to_owned(),
        });
    }

    let parent = item.parent().unwrap_or(Utf8Path::new(""));
    let walk = walkdir::WalkDir::new(item).sort_by_file_name();
    for entry in walk {
        let entry = entry.map_err(|source| ArchiveError::Walk {
            path: item.to_owned(),
            source,
        })?;
        let entry_path = Utf8Path::from_path(entry.path()).ok_or_else(|| {
            ArchiveError::NonUtf8Path {
                path: entry.path().to_owned(),
            }
        })?;
        let relative = entry_path.strip_prefix(parent).unwrap_or(entry_path);
        let entry_name = format!("{root}/{relative}");
        if entry.file_type().is_dir() {
            writer.add_directory(format!("{entry_name}/"), options)?;
        } else {
            append_file(writer, entry_path, &entry_name, options)?;
        }
    }
    Ok(())
}

/// Append the static auxiliary files, resolving path templates and
/// filtering contents where configured.
fn append_auxiliary_files(
    writer: &mut ZipWriter<fs::File>,
    spec: &ArchiveSpec<'_>,
    root: &str,
    options: SimpleFileOptions,
) -> Result<(), ArchiveError> {
    let path_tokens = TokenTable::for_paths(spec.project_dir, spec.project);
    let content_tokens = TokenTable::for_content(spec.project, spec.runtime);

    for aux in &AUXILIARY_FILES {
        let source = Utf8PathBuf::from(path_tokens.apply(aux.source));
        if !source.is_file() {
            return Err(ArchiveError::MissingAuxiliary { path: source });
        }
        let file_name = source.file_name().unwrap_or_default().to_owned();
        let destination = path_tokens.apply(aux.destination);
        let entry_name = format!("{root}/{destination}{file_name}");

        if aux.filter {
            let raw = fs::read_to_string(&source).map_err(|source_err| ArchiveError::Read {
                path: source.clone(),
                source: source_err,
            })?;
            let filtered = content_tokens.apply(&raw);
            log::info!("Adding {source} (filtered)");
            writer.start_file(entry_name, options)?;
            writer
                .write_all(filtered.as_bytes())
                .map_err(|source_err| ArchiveError::Write {
                    path: source.clone(),
                    source: source_err,
                })?;
        } else {
            append_file(writer, &source, &entry_name, options)?;
        }
    }
    Ok(())
}

/// Stream one file into the archive under `entry_name`.
fn append_file(
    writer: &mut ZipWriter<fs::File>,
    source: &Utf8Path,
    entry_name: &str,
    options: SimpleFileOptions,
) -> Result<(), ArchiveError> {
    log::info!("Adding {source}");
    writer.start_file(entry_name, options)?;
    let mut file = fs::File::open(source).map_err(|source_err| ArchiveError::Read {
        path: source.to_owned(),
        source: source_err,
    })?;
    // A copy failure here is a writer limitation or disk problem, not a
    // source read problem.
    std::io::copy(&mut file, writer).map_err(|source_err| ArchiveError::Write {
        path: source.to_owned(),
        source: source_err,
    })?;
    Ok(())
}
