use std::fs;
use std::path::{Path, PathBuf};

use stagepub_core::config::{FileConfig, ReleaseConfig, ReleaseInputs};
use stagepub_ops::ops_publish::publish;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(work: &Path, staging_url: &str, with_credentials: bool) -> ReleaseConfig {
    let file = FileConfig::parse(&format!(
        "[repositories]\nstaging = \"{staging_url}\"\n[signing]\nworkspace = \"no-such-signing-dir\""
    ))
    .unwrap();
    let inputs = ReleaseInputs {
        version: Some("2.0.0".to_string()),
        artifacts: vec!["core".to_string()],
        stage_repo: Some(work.join("stage").to_string_lossy().into_owned()),
        group: Some("net.mamoe".to_string()),
        username: with_credentials.then(|| "user".to_string()),
        password: with_credentials.then(|| "pass".to_string()),
    };
    ReleaseConfig::resolve(inputs, file, work).unwrap()
}

fn stage(work: &Path) -> PathBuf {
    let group = work.join("stage/net/mamoe");
    let version_dir = group.join("core/2.0.0");
    fs::create_dir_all(&version_dir).unwrap();
    fs::write(version_dir.join("core-2.0.0.jar"), "jar").unwrap();
    fs::write(version_dir.join("core-2.0.0.pom"), "pom").unwrap();
    fs::write(group.join("core/maven-metadata.xml"), "<metadata/>").unwrap();
    fs::create_dir_all(group.join("unreleased")).unwrap();
    group
}

#[tokio::test]
async fn test_publish_without_signing_uploads_everything() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let group = stage(tmp.path());
    let config = config(tmp.path(), &format!("{}/deploy", server.uri()), true);

    let summary = publish(&config).await.unwrap();

    assert_eq!(summary.generation.discovered, 3);
    assert_eq!(summary.generation.signed, 0);
    assert_eq!(summary.uploaded, 3 + 2 * 3);
    assert!(!group.join("unreleased").exists());

    let paths: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| r.url.path().to_string())
        .collect();
    assert!(paths.iter().all(|p| !p.ends_with(".asc")));
    assert_eq!(paths[0], "/deploy/net/mamoe/core/2.0.0/core-2.0.0.jar");
    assert!(paths.contains(&"/deploy/net/mamoe/core/maven-metadata.xml.sha1".to_string()));
    let mut sorted = paths.clone();
    sorted.sort();
    assert_eq!(paths, sorted);
}

#[tokio::test]
async fn test_publish_reports_all_failures_at_the_end() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/deploy/net/mamoe/core/2.0.0/core-2.0.0.pom"))
        .respond_with(ResponseTemplate::new(400).set_body_string("invalid pom"))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    stage(tmp.path());
    let config = config(tmp.path(), &format!("{}/deploy", server.uri()), true);

    let err = publish(&config).await.unwrap_err().to_string();

    assert!(err.starts_with("1 upload(s) failed:"), "got: {err}");
    assert!(err.contains("HTTP 400: invalid pom"), "got: {err}");
    assert_eq!(server.received_requests().await.unwrap().len(), 9);
}

#[tokio::test]
async fn test_publish_requires_credentials_before_touching_files() {
    let tmp = TempDir::new().unwrap();
    let group = stage(tmp.path());
    let config = config(tmp.path(), "http://127.0.0.1:9/deploy", false);

    let err = publish(&config).await.unwrap_err().to_string();

    assert!(err.contains("CERT_USERNAME"), "got: {err}");
    assert!(group.join("unreleased").exists());
    assert!(!group.join("core/2.0.0/core-2.0.0.jar.sha1").exists());
}
