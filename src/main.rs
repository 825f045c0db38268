//! Publisher CLI entrypoint.
//!
//! Loads the publish descriptor, applies credential overrides, and runs
//! the publish pipeline on its dedicated worker, echoing the status log
//! when it finishes.

use clap::Parser;
use ka_publisher::archive::ArchiveSpec;
use ka_publisher::artefact_type::{ALL_TYPES, ArtefactType};
use ka_publisher::checksum::Algorithm;
use ka_publisher::cli::{Cli, Command, PublishArgs};
use ka_publisher::config::PublishConfig;
use ka_publisher::error::Result;
use ka_publisher::metadata::METADATA_FILE_NAME;
use ka_publisher::publish::{self, PublishRequest};
use ka_publisher::upload::{HttpUploader, RepositoryTarget};
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    let mut stderr = std::io::stderr();
    if let Err(error) = run(&cli, &mut stderr) {
        let _ = writeln!(stderr, "error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli, stderr: &mut dyn Write) -> Result<()> {
    match &cli.command {
        Some(Command::Types) => {
            list_types(stderr);
            Ok(())
        }
        Some(Command::Publish(args)) => run_publish(args, stderr),
        None => run_publish(&cli.publish, stderr),
    }
}

/// Print the artefact type catalogue.
fn list_types(out: &mut dyn Write) {
    for artefact_type in ALL_TYPES {
        let _ = writeln!(out, "{artefact_type}");
    }
}

/// Load the descriptor and run (or preview) the publish pipeline.
fn run_publish(args: &PublishArgs, stderr: &mut dyn Write) -> Result<()> {
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| args.project_dir.join("publish.toml"));
    let mut config = PublishConfig::load(&config_path)?;
    if let Some(username) = &args.username {
        config.repository.username = username.clone();
    }
    if let Some(password) = &args.password {
        config.repository.password = password.clone();
    }
    // Free-form tags are accepted, but a tag outside the catalogue is
    // usually a typo.
    if ArtefactType::parse(&config.data_type).is_none() {
        log::warn!("unknown data type tag: {}", config.data_type);
        let _ = writeln!(
            stderr,
            "warning: {:?} is not a known data type tag; see `ka-publisher types`",
            config.data_type
        );
    }
    let (request, target) = config.into_parts(&args.project_dir);

    if args.dry_run {
        preview(&request, &target, stderr);
        return Ok(());
    }

    let handle = publish::spawn(request, HttpUploader::new(target));
    let outcome = handle.join();
    if !args.quiet {
        for line in outcome.status_log.lines() {
            let _ = writeln!(stderr, "{line}");
        }
    }
    outcome.result
}

/// Print the planned uploads without contacting the repository.
fn preview(request: &PublishRequest, target: &RepositoryTarget, out: &mut dyn Write) {
    let spec = ArchiveSpec {
        project: &request.project,
        classifier: &request.classifier,
        data_type: &request.data_type,
        project_dir: &request.project_dir,
        data_items: &request.data_items,
        runtime: &request.runtime,
    };
    let archive = spec.archive_file_name();
    let descriptor = format!(
        "{}-{}.pom",
        request.project.name, request.project.version
    );
    let mut remote_names = Vec::new();
    for base in [archive, descriptor, METADATA_FILE_NAME.to_owned()] {
        remote_names.push(base.clone());
        for algorithm in [Algorithm::Md5, Algorithm::Sha1] {
            remote_names.push(format!("{base}.{}", algorithm.extension()));
        }
    }
    let _ = writeln!(out, "Would upload to {}:", target.base_url);
    for name in remote_names {
        let _ = writeln!(out, "  {}", target.url_for(&name));
    }
}
