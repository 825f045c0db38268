//! Behavioural tests for the HTTP PUT uploader against a local fixture
//! server.
//!
//! The repository convention under test: the response body decides the
//! outcome, not the status line. A minimal single-connection HTTP server
//! on a loopback listener captures the request head and body and replies
//! with a configured status and body.

use camino::Utf8PathBuf;
use ka_publisher::upload::{ArtefactUploader, HttpUploader, RepositoryTarget, UploadError};
use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::JoinHandle;

/// What the fixture server saw of the one request it served.
struct CapturedRequest {
    head: String,
    body: Vec<u8>,
}

/// Serve exactly one HTTP request on a loopback listener, replying with
/// `status_line` and `response_body`, and hand back what was received.
fn one_shot_server(
    status_line: &'static str,
    response_body: &'static str,
) -> (String, JoinHandle<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let address = listener.local_addr().expect("local addr");
    let handle = std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let mut received = Vec::new();
        let mut buffer = [0u8; 4096];
        // Read until the chunked terminator (uploads stream with unknown
        // length) or until the headers end for bodiless requests.
        loop {
            let n = stream.read(&mut buffer).expect("read request");
            if n == 0 {
                break;
            }
            received.extend_from_slice(&buffer[..n]);
            // Only look for the chunked terminator after the header
            // block: a header value may itself end in "0" (e.g. the
            // base64 of "admin:secret"), which would otherwise make the
            // bare headers look like a finished request.
            if let Some(header_end) = received.windows(4).position(|w| w == b"\r\n\r\n")
                && received[header_end + 4..].ends_with(b"0\r\n\r\n")
            {
                break;
            }
        }
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{response_body}",
            response_body.len(),
        );
        stream.write_all(response.as_bytes()).expect("write response");
        stream.flush().expect("flush response");

        let header_end = received
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .expect("header terminator");
        let head = String::from_utf8_lossy(&received[..header_end]).into_owned();
        let body = decode_chunked(&received[header_end + 4..]);
        CapturedRequest { head, body }
    });
    (format!("http://{address}/repo"), handle)
}

/// Decode a chunked transfer encoding body.
fn decode_chunked(mut raw: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    loop {
        let Some(line_end) = raw.windows(2).position(|w| w == b"\r\n") else {
            return body;
        };
        let size_line = String::from_utf8_lossy(&raw[..line_end]);
        let Ok(size) = usize::from_str_radix(size_line.trim(), 16) else {
            return body;
        };
        if size == 0 {
            return body;
        }
        let start = line_end + 2;
        body.extend_from_slice(&raw[start..start + size]);
        raw = &raw[start + size + 2..];
    }
}

fn target_for(base_url: String, username: &str, password: &str) -> RepositoryTarget {
    RepositoryTarget {
        base_url,
        group_id: "org.example".to_owned(),
        artifact_id: "demo".to_owned(),
        version: "1.0".to_owned(),
        username: username.to_owned(),
        password: password.to_owned(),
    }
}

fn write_payload(dir: &tempfile::TempDir, name: &str, contents: &[u8]) -> Utf8PathBuf {
    let path = Utf8PathBuf::from_path_buf(dir.path().join(name)).expect("utf8");
    std::fs::write(&path, contents).expect("write payload");
    path
}

#[test]
fn empty_body_response_is_success() {
    let (base_url, server) = one_shot_server("200 OK", "");
    let dir = tempfile::tempdir().expect("temp dir");
    let file = write_payload(&dir, "demo-1.0.zip", b"payload-bytes");

    let uploader = HttpUploader::new(target_for(base_url, "", ""));
    uploader.upload(&file, None).expect("upload succeeds");

    let captured = server.join().expect("server thread");
    assert!(
        captured
            .head
            .starts_with("PUT /repo/org/example/demo/1.0/demo-1.0.zip HTTP/1.1")
    );
    assert_eq!(captured.body, b"payload-bytes");
    assert!(!captured.head.contains("Authorization"));
}

#[test]
fn non_empty_body_is_a_failure_even_with_status_200() {
    let (base_url, server) = one_shot_server("200 OK", "error: disk full");
    let dir = tempfile::tempdir().expect("temp dir");
    let file = write_payload(&dir, "demo-1.0.zip", b"payload");

    let uploader = HttpUploader::new(target_for(base_url, "", ""));
    let err = uploader.upload(&file, None).expect_err("must fail");

    assert!(matches!(err, UploadError::RemoteRejected { .. }));
    assert!(err.to_string().contains("disk full"));
    drop(server.join());
}

#[test]
fn error_status_with_empty_body_is_an_http_failure() {
    let (base_url, server) = one_shot_server("500 Internal Server Error", "");
    let dir = tempfile::tempdir().expect("temp dir");
    let file = write_payload(&dir, "demo-1.0.zip", b"payload");

    let uploader = HttpUploader::new(target_for(base_url, "", ""));
    let err = uploader.upload(&file, None).expect_err("must fail");

    assert!(matches!(err, UploadError::Http { .. }));
    drop(server.join());
}

#[test]
fn credentials_produce_a_basic_auth_header() {
    let (base_url, server) = one_shot_server("200 OK", "");
    let dir = tempfile::tempdir().expect("temp dir");
    let file = write_payload(&dir, "demo-1.0.zip", b"x");

    let uploader = HttpUploader::new(target_for(base_url, "admin", "secret"));
    uploader.upload(&file, None).expect("upload succeeds");

    let captured = server.join().expect("server thread");
    assert!(
        captured
            .head
            .to_ascii_lowercase()
            .contains("authorization: basic ywrtaw46c2vjcmv0")
    );
}

#[test]
fn remote_name_override_changes_the_request_path() {
    let (base_url, server) = one_shot_server("200 OK", "");
    let dir = tempfile::tempdir().expect("temp dir");
    let file = write_payload(&dir, "pom.xml", b"<project/>");

    let uploader = HttpUploader::new(target_for(base_url, "", ""));
    uploader
        .upload(&file, Some("demo-1.0.pom"))
        .expect("upload succeeds");

    let captured = server.join().expect("server thread");
    assert!(
        captured
            .head
            .starts_with("PUT /repo/org/example/demo/1.0/demo-1.0.pom HTTP/1.1")
    );
}
