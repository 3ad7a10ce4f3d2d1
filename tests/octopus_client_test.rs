use push_build_info::payload::{BuildInformationRecord, CommitEntry, PackageIdentity};
use push_build_info::publish::{BuildInformationClient, OctopusClient, OverwriteMode};
use push_build_info::BuildInfoError;
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use std::time::Duration;

const API_KEY: &str = "API-TEST123";
const SPACES_JSON: &str = r#"{"Items":[{"Id":"Spaces-7","Name":"Default"}]}"#;

#[derive(Debug)]
struct CapturedRequest {
    request_line: String,
    headers: HashMap<String, String>,
    body: String,
}

/// Serve one canned response per connection, in order, and hand back what was received.
fn serve(responses: Vec<(&'static str, &'static str)>) -> (String, JoinHandle<Vec<CapturedRequest>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let mut captured = Vec::new();
        for (status, body) in responses {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();

            let mut headers = HashMap::new();
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                let line = line.trim_end();
                if line.is_empty() {
                    break;
                }
                if let Some((name, value)) = line.split_once(':') {
                    headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
                }
            }

            let length = headers
                .get("content-length")
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(0);
            let mut request_body = vec![0; length];
            reader.read_exact(&mut request_body).unwrap();

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();

            captured.push(CapturedRequest {
                request_line: request_line.trim_end().to_string(),
                headers,
                body: String::from_utf8(request_body).unwrap(),
            });
        }
        captured
    });

    (base_url, handle)
}

fn client(base_url: &str) -> OctopusClient {
    let http_client = reqwest::blocking::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap();
    OctopusClient::with_http_client(http_client, &format!("{}/", base_url), API_KEY)
}

fn record() -> BuildInformationRecord {
    BuildInformationRecord {
        space: "Default".to_string(),
        environment: "GitHub Actions".to_string(),
        build_number: "42".to_string(),
        build_url: "https://github.com/acme/widgets/actions/runs/987654".to_string(),
        branch: "main".to_string(),
        vcs_type: "Git".to_string(),
        vcs_root: "https://github.com/acme/widgets".to_string(),
        vcs_commit: "0123abcd".to_string(),
        commits: vec![CommitEntry {
            id: "abc123".to_string(),
            comment: r#"fix: "quoted" {braces}"#.to_string(),
        }],
        packages: vec![PackageIdentity {
            id: "Widgets.Api".to_string(),
            version: "1.5.0".to_string(),
        }],
    }
}

#[test]
fn test_push_looks_up_space_then_posts_record() {
    let (base_url, server) = serve(vec![("200 OK", SPACES_JSON), ("201 Created", "{}")]);

    client(&base_url)
        .push(&record(), OverwriteMode::OverwriteExisting)
        .unwrap();

    let requests = server.join().unwrap();
    assert_eq!(requests.len(), 2);

    let lookup = &requests[0];
    assert!(lookup.request_line.starts_with("GET /api/spaces?"), "{}", lookup.request_line);
    assert!(lookup.request_line.contains("partialName=Default"));
    assert_eq!(lookup.headers.get("x-octopus-apikey").map(String::as_str), Some(API_KEY));

    let submit = &requests[1];
    assert_eq!(
        submit.request_line,
        "POST /api/Spaces-7/build-information?overwriteMode=OverwriteExisting HTTP/1.1"
    );
    assert_eq!(submit.headers.get("x-octopus-apikey").map(String::as_str), Some(API_KEY));
    assert!(submit
        .headers
        .get("content-type")
        .is_some_and(|v| v.starts_with("application/json")));

    let body: serde_json::Value = serde_json::from_str(&submit.body).unwrap();
    assert_eq!(body["spaceName"], "Default");
    assert_eq!(body["BuildEnvironment"], "GitHub Actions");
    assert_eq!(body["BuildNumber"], "42");
    assert_eq!(body["BuildUrl"], "https://github.com/acme/widgets/actions/runs/987654");
    assert_eq!(body["Branch"], "main");
    assert_eq!(body["VcsType"], "Git");
    assert_eq!(body["VcsRoot"], "https://github.com/acme/widgets");
    assert_eq!(body["VcsCommitNumber"], "0123abcd");
    assert_eq!(body["Commits"][0]["Id"], "abc123");
    assert_eq!(body["Commits"][0]["Comment"], r#"fix: "quoted" {braces}"#);
    assert_eq!(body["Packages"][0]["Id"], "Widgets.Api");
    assert_eq!(body["Packages"][0]["Version"], "1.5.0");
}

#[test]
fn test_default_overwrite_mode_on_the_wire() {
    let (base_url, server) = serve(vec![("200 OK", SPACES_JSON), ("200 OK", "{}")]);

    client(&base_url)
        .push(&record(), OverwriteMode::default())
        .unwrap();

    let requests = server.join().unwrap();
    assert!(requests[1]
        .request_line
        .contains("overwriteMode=FailIfExists"));
}

#[test]
fn test_conflict_status_is_remote_submission_error() {
    let conflict = r#"{"ErrorMessage":"Build information already exists"}"#;
    let (base_url, server) = serve(vec![("200 OK", SPACES_JSON), ("409 Conflict", conflict)]);

    let result = client(&base_url).push(&record(), OverwriteMode::FailIfExists);
    server.join().unwrap();

    match result {
        Err(BuildInfoError::RemoteSubmission(message)) => {
            assert!(message.contains("409"), "{}", message);
            assert!(message.contains("Build information already exists"), "{}", message);
        }
        other => panic!("expected RemoteSubmission, got {:?}", other),
    }
}

#[test]
fn test_unknown_space_is_not_posted() {
    let (base_url, server) = serve(vec![("200 OK", r#"{"Items":[]}"#)]);

    let result = client(&base_url).push(&record(), OverwriteMode::FailIfExists);
    let requests = server.join().unwrap();

    assert_eq!(requests.len(), 1);
    assert!(matches!(
        result,
        Err(BuildInfoError::RemoteSubmission(message)) if message.contains("Space 'Default' not found")
    ));
}

#[test]
fn test_resolve_space_id_rejects_unauthorized() {
    let (base_url, server) = serve(vec![("401 Unauthorized", r#"{"ErrorMessage":"Invalid API key"}"#)]);

    let result = client(&base_url).resolve_space_id("Default");
    server.join().unwrap();

    let err = result.unwrap_err();
    assert!(matches!(err, BuildInfoError::RemoteSubmission(_)));
    assert!(err.to_string().contains("401"));
}
