//! Uploader against a wiremock staging endpoint.

use std::fs;
use std::path::PathBuf;

use stagepub_core::config::{Credentials, HttpConfig, DEFAULT_USER_AGENT};
use stagepub_maven::download::build_client;
use stagepub_maven::pending::PendingSet;
use stagepub_maven::publish::Uploader;
use stagepub_maven::repository::MavenRepository;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn uploader(server: &MockServer) -> Uploader {
    let client = build_client(&HttpConfig::default()).unwrap();
    let repo = MavenRepository::new("staging", &format!("{}/deploy", server.uri()));
    let creds = Credentials {
        username: "user".to_string(),
        password: "pass".to_string(),
    };
    Uploader::new(client, repo, &creds).unwrap()
}

/// Stage `names` under `<root>/net/mamoe/core/1.0/` and return (root, pending set).
fn staged(names: &[&str]) -> (TempDir, PathBuf, PendingSet) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();
    let dir = root.join("net/mamoe/core/1.0");
    fs::create_dir_all(&dir).unwrap();
    let mut pending = PendingSet::new();
    for name in names {
        let file = dir.join(name);
        fs::write(&file, format!("content of {name}")).unwrap();
        pending.push(file);
    }
    (tmp, root, pending)
}

async fn received_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| r.url.path().to_string())
        .collect()
}

#[tokio::test]
async fn test_upload_sends_auth_user_agent_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/deploy/net/mamoe/core/1.0/core-1.0.jar"))
        .and(header("authorization", "Basic dXNlcjpwYXNz"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let (_tmp, root, pending) = staged(&["core-1.0.jar"]);
    let report = uploader(&server).publish(&root, pending).await;

    assert!(report.is_empty(), "{}", report.render());
    assert_eq!(report.attempted(), 1);

    let requests = server.received_requests().await.unwrap();
    let req = &requests[0];
    assert_eq!(req.body, b"content of core-1.0.jar");
    assert_eq!(
        req.headers.get("user-agent").unwrap().to_str().unwrap(),
        DEFAULT_USER_AGENT
    );
}

#[tokio::test]
async fn test_failures_are_collected_without_stopping() {
    let server = MockServer::start().await;
    for failing in ["b.jar", "d.jar"] {
        Mock::given(method("PUT"))
            .and(path(format!("/deploy/net/mamoe/core/1.0/{failing}")))
            .respond_with(ResponseTemplate::new(500).set_body_string("staging exploded"))
            .with_priority(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("PUT"))
        .and(path_regex("^/deploy/.*"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    let (_tmp, root, pending) = staged(&["a.jar", "b.jar", "c.jar", "d.jar", "e.jar"]);
    let report = uploader(&server).publish(&root, pending).await;

    assert_eq!(report.attempted(), 5);
    assert_eq!(received_paths(&server).await.len(), 5);
    assert_eq!(report.failures().len(), 2);
    assert_eq!(report.failures()[0].status, Some(500));
    assert!(report.failures()[0].file.ends_with("b.jar"));
    assert!(report.failures()[1].file.ends_with("d.jar"));

    let err = report.into_result().unwrap_err().to_string();
    assert!(err.starts_with("2 upload(s) failed:"), "got: {err}");
    assert_eq!(err.matches("HTTP 500").count(), 2);
    assert!(err.contains("b.jar") && err.contains("d.jar"));
    assert!(err.contains("staging exploded"));
    assert!(err.contains("\n\n"));
}

#[tokio::test]
async fn test_uploads_follow_sorted_order_every_run() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let names = ["z.pom", "a.jar.sha1", "m.jar", "a.jar", "maven-metadata.xml"];
    let expected: Vec<String> = {
        let mut sorted: Vec<&str> = names.to_vec();
        sorted.sort();
        sorted
            .iter()
            .map(|n| format!("/deploy/net/mamoe/core/1.0/{n}"))
            .collect()
    };

    let up = uploader(&server);
    for _ in 0..2 {
        let (_tmp, root, pending) = staged(&names);
        let report = up.publish(&root, pending).await;
        assert!(report.is_empty());
    }

    let seen = received_paths(&server).await;
    assert_eq!(seen[..5], expected[..]);
    assert_eq!(seen[5..], expected[..]);
}

#[tokio::test]
async fn test_unreachable_endpoint_is_recorded_per_file() {
    let client = build_client(&HttpConfig::default()).unwrap();
    // Port 9 (discard) on localhost is closed in test environments.
    let repo = MavenRepository::new("staging", "http://127.0.0.1:9/deploy");
    let creds = Credentials {
        username: "u".to_string(),
        password: "p".to_string(),
    };
    let up = Uploader::new(client, repo, &creds).unwrap();

    let (_tmp, root, pending) = staged(&["a.jar", "b.jar"]);
    let report = up.publish(&root, pending).await;

    assert_eq!(report.attempted(), 2);
    assert_eq!(report.failures().len(), 2);
    assert!(report.failures().iter().all(|f| f.status.is_none()));
}

#[test]
fn test_target_uri_is_relative_to_root() {
    let client = build_client(&HttpConfig::default()).unwrap();
    let repo = MavenRepository::new("staging", "https://stage.example/deploy/");
    let creds = Credentials {
        username: "u".to_string(),
        password: "p".to_string(),
    };
    let up = Uploader::new(client, repo, &creds).unwrap();
    let root = PathBuf::from("/stage");
    assert_eq!(
        up.target_uri(&root, &root.join("net/mamoe/core/1.0/core-1.0.jar"))
            .as_deref(),
        Some("https://stage.example/deploy/net/mamoe/core/1.0/core-1.0.jar")
    );
    assert!(up.target_uri(&root, &PathBuf::from("/elsewhere/x.jar")).is_none());
}

#[tokio::test]
async fn test_large_file_is_streamed_with_content_length() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(header("content-length", "1048576"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();
    let dir = root.join("net/mamoe/core/1.0");
    fs::create_dir_all(&dir).unwrap();
    let content: Vec<u8> = (0..1024 * 1024).map(|i| (i % 251) as u8).collect();
    let file = dir.join("core-1.0-all.jar");
    fs::write(&file, &content).unwrap();

    let mut pending = PendingSet::new();
    pending.push(file);
    let report = uploader(&server).publish(&root, pending).await;

    assert!(report.is_empty(), "{}", report.render());
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].body, content);
}
