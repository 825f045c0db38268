//! CLI argument definitions for the publisher.
//!
//! Separated from the binary entrypoint so `main.rs` stays focused on
//! orchestration.

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// Publish a knowledge artefact archive to a Maven-layout repository.
#[derive(Parser, Debug)]
#[command(name = "ka-publisher")]
#[command(version, about)]
#[command(long_about = concat!(
    "Publish a knowledge artefact archive to a Maven-layout repository.\n\n",
    "The project directory must contain a publish.toml descriptor (project ",
    "coordinates, data files, repository location), a pom.xml descriptor, and ",
    "the src/assembly templates embedded in every archive. The publisher ",
    "builds one versioned zip from the listed data files, generates MD5/SHA-1 ",
    "checksums and repository metadata, and uploads the nine resulting ",
    "artefacts over authenticated HTTP PUT.",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Publish arguments (used when no subcommand is given).
    #[command(flatten)]
    pub publish: PublishArgs,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Publish an artefact (default when no subcommand given).
    Publish(PublishArgs),

    /// List the known artefact data types.
    Types,
}

/// Arguments for the publish operation.
#[derive(Args, Debug, Clone)]
pub struct PublishArgs {
    /// Project directory containing publish.toml, pom.xml, and
    /// src/assembly/.
    #[arg(default_value = ".")]
    pub project_dir: Utf8PathBuf,

    /// Path to the publish descriptor [default: <project-dir>/publish.toml].
    #[arg(long)]
    pub config: Option<Utf8PathBuf>,

    /// Repository username, overriding the descriptor.
    #[arg(long)]
    pub username: Option<String>,

    /// Repository password, overriding the descriptor.
    #[arg(long)]
    pub password: Option<String>,

    /// Show what would be uploaded without contacting the repository.
    #[arg(long)]
    pub dry_run: bool,

    /// Suppress status output.
    #[arg(short, long)]
    pub quiet: bool,
}
