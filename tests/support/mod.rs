//! Shared fixtures for publisher behavioural tests.

use camino::{Utf8Path, Utf8PathBuf};
use ka_publisher::project::Project;
use ka_publisher::publish::PublishRequest;
use ka_publisher::template::RuntimeInfo;
use ka_publisher::upload::{ArtefactUploader, UploadError};
use std::fs;
use std::sync::Mutex;

/// The coordinate record used across the behavioural scenarios.
pub fn sample_project() -> Project {
    Project {
        group_id: "org.example".to_owned(),
        artifact_id: "demo".to_owned(),
        version: "1.0".to_owned(),
        name: "demo".to_owned(),
        organization: "Example Org".to_owned(),
        licenses: Vec::new(),
    }
}

/// Lay out a minimal project directory: descriptor, assembly templates,
/// and a ten-byte data file.
pub fn scaffold_project(dir: &Utf8Path) -> Utf8PathBuf {
    fs::write(dir.join("pom.xml"), "<project/>").expect("pom.xml");
    let assembly = dir.join("src/assembly");
    fs::create_dir_all(&assembly).expect("assembly dir");
    fs::write(assembly.join("assembly.xml"), "<assembly/>").expect("assembly.xml");
    fs::write(
        assembly.join("LICENSE.txt"),
        "Licensed to ${project.organization.name}",
    )
    .expect("LICENSE.txt");
    fs::write(assembly.join("MANIFEST.MF"), "Name: ${project.name}\n").expect("MANIFEST.MF");
    let data = dir.join("a.txt");
    fs::write(&data, "0123456789").expect("a.txt");
    data
}

/// Build the standard publish request for a scaffolded project directory.
pub fn sample_request(project_dir: &Utf8Path, data_item: Utf8PathBuf) -> PublishRequest {
    PublishRequest {
        project: sample_project(),
        classifier: String::new(),
        data_type: "zip".to_owned(),
        project_dir: project_dir.to_owned(),
        data_items: vec![data_item],
        runtime: RuntimeInfo::default(),
    }
}

/// One observed upload: resolved remote name, local parent directory,
/// number of files in the working directory at upload time, and the
/// uploaded bytes.
#[derive(Debug, Clone)]
pub struct ObservedUpload {
    pub remote_name: String,
    pub local_dir: Utf8PathBuf,
    pub workdir_file_count: usize,
    pub contents: Vec<u8>,
}

/// An [`ArtefactUploader`] that records every call instead of touching
/// the network, optionally failing at a configured call index.
#[derive(Debug, Default)]
pub struct RecordingUploader {
    observed: Mutex<Vec<ObservedUpload>>,
    fail_at: Option<usize>,
}

impl RecordingUploader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the upload with the given zero-based call index.
    pub fn failing_at(index: usize) -> Self {
        Self {
            observed: Mutex::new(Vec::new()),
            fail_at: Some(index),
        }
    }

    /// Return the uploads observed so far.
    pub fn observed(&self) -> Vec<ObservedUpload> {
        self.observed.lock().expect("uploader lock").clone()
    }
}

impl ArtefactUploader for RecordingUploader {
    fn upload(&self, file: &Utf8Path, remote_name: Option<&str>) -> Result<(), UploadError> {
        let local_name = file.file_name().unwrap_or_default();
        let local_dir = file.parent().unwrap_or(Utf8Path::new("")).to_owned();
        let workdir_file_count = fs::read_dir(&local_dir)
            .map(Iterator::count)
            .unwrap_or_default();
        let contents = fs::read(file).map_err(|source| UploadError::Read {
            path: file.to_owned(),
            source,
        })?;
        let mut observed = self.observed.lock().expect("uploader lock");
        let index = observed.len();
        observed.push(ObservedUpload {
            remote_name: remote_name.unwrap_or(local_name).to_owned(),
            local_dir,
            workdir_file_count,
            contents,
        });
        if self.fail_at == Some(index) {
            return Err(UploadError::Http {
                url: format!("http://repo.test/{local_name}"),
                reason: "connection refused".to_owned(),
            });
        }
        Ok(())
    }
}
