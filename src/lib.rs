//! Knowledge artefact publisher library.
//!
//! This crate packages a set of user-selected data files plus generated
//! build metadata into a single versioned zip archive and publishes the
//! archive, its checksums, the project descriptor, and repository metadata
//! to a Maven-layout artifact repository over authenticated HTTP PUT. It is
//! used by the `ka-publisher` CLI binary and can be consumed
//! programmatically by applications that collect the project record
//! themselves.
//!
//! # Modules
//!
//! - [`archive`] - Deterministic zip archive construction
//! - [`artefact_type`] - Catalogue of known artefact data-type tags
//! - [`auxiliary`] - Static table of files always embedded in the archive
//! - [`checksum`] - MD5/SHA-1 digests and checksum sidecar files
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - TOML publish descriptor loading
//! - [`error`] - Top-level error type aggregating per-module failures
//! - [`metadata`] - Repository `maven-metadata.xml` generation
//! - [`project`] - Immutable project coordinate record
//! - [`publish`] - The ordered publish pipeline with status reporting
//! - [`template`] - Placeholder token substitution
//! - [`upload`] - Authenticated HTTP PUT uploads

pub mod archive;
pub mod artefact_type;
pub mod auxiliary;
pub mod checksum;
pub mod cli;
pub mod config;
pub mod error;
pub mod metadata;
pub mod project;
pub mod publish;
pub mod template;
pub mod upload;
