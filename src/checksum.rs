//! Content digests and checksum sidecar files.
//!
//! Maven-layout repositories index every uploaded file by an MD5 and a
//! SHA-1 sidecar whose extension names the algorithm. Digests stream the
//! file in fixed-size chunks and are rendered as full-width lowercase hex,
//! so leading zero bytes never shorten the digest.

use camino::{Utf8Path, Utf8PathBuf};
use md5::Md5;
use sha1::{Digest, Sha1};
use std::fmt::{self, Write as _};
use std::fs;
use std::io::Read;
use thiserror::Error;

/// Read buffer size for digest streaming.
const CHUNK_SIZE: usize = 8192;

/// A digest algorithm supported by the repository sidecar convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// The fast legacy digest, sidecar extension `.md5`.
    Md5,
    /// The stronger digest, sidecar extension `.sha1`.
    Sha1,
}

impl Algorithm {
    /// Return the sidecar file extension for this algorithm.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Errors arising from digest computation or sidecar writing.
#[derive(Debug, Error)]
pub enum ChecksumError {
    /// The source file could not be read.
    #[error("cannot read {path} for checksumming: {source}")]
    Read {
        /// Path of the unreadable file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The sidecar file could not be written.
    #[error("cannot write checksum sidecar {path}: {source}")]
    Write {
        /// Path of the sidecar that failed to write.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The source path has no final file-name component.
    #[error("checksum source has no file name: {path}")]
    NoFileName {
        /// The offending path.
        path: Utf8PathBuf,
    },
}

/// Compute the lowercase hex digest of `path` with `algorithm`.
///
/// The file is streamed once in [`CHUNK_SIZE`] chunks.
///
/// # Errors
///
/// Returns [`ChecksumError::Read`] if the file cannot be opened or read.
pub fn hex_digest(path: &Utf8Path, algorithm: Algorithm) -> Result<String, ChecksumError> {
    match algorithm {
        Algorithm::Md5 => digest_file::<Md5>(path),
        Algorithm::Sha1 => digest_file::<Sha1>(path),
    }
}

/// Write the checksum sidecar for `file` into `dir`.
///
/// The sidecar is named `<file-name>.<algorithm>` and holds a single line
/// `<hex digest><two spaces><display name>`. The display name defaults to
/// the source file's name; `display_name` overrides it when the file will
/// be uploaded under a different remote name.
///
/// # Errors
///
/// Returns [`ChecksumError::Read`] if the source cannot be digested,
/// [`ChecksumError::NoFileName`] if `file` has no final component, or
/// [`ChecksumError::Write`] if the sidecar cannot be written.
pub fn write_sidecar(
    file: &Utf8Path,
    algorithm: Algorithm,
    dir: &Utf8Path,
    display_name: Option<&str>,
) -> Result<Utf8PathBuf, ChecksumError> {
    let digest = hex_digest(file, algorithm)?;
    let file_name = file.file_name().ok_or_else(|| ChecksumError::NoFileName {
        path: file.to_owned(),
    })?;
    let display = display_name.unwrap_or(file_name);
    let sidecar = dir.join(format!("{file_name}.{}", algorithm.extension()));
    fs::write(&sidecar, format!("{digest}  {display}")).map_err(|source| ChecksumError::Write {
        path: sidecar.clone(),
        source,
    })?;
    Ok(sidecar)
}

/// Stream `path` through digest `D` and render the result as hex.
fn digest_file<D: Digest>(path: &Utf8Path) -> Result<String, ChecksumError> {
    let read_err = |source| ChecksumError::Read {
        path: path.to_owned(),
        source,
    };
    let mut file = fs::File::open(path).map_err(read_err)?;
    let mut hasher = D::new();
    let mut buffer = [0u8; CHUNK_SIZE];
    loop {
        let bytes_read = file.read(&mut buffer).map_err(read_err)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }
    let mut hex = String::new();
    for byte in hasher.finalize() {
        // Writing to a String cannot fail.
        let _ = write!(hex, "{byte:02x}");
    }
    Ok(hex)
}
