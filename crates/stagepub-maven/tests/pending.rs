use std::fs;
use std::path::{Path, PathBuf};

use stagepub_maven::pending::{discover, prune_unversioned};
use tempfile::TempDir;

fn touch(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, path.file_name().unwrap().to_string_lossy().as_bytes()).unwrap();
}

#[test]
fn test_prune_removes_artifacts_without_version_dir() {
    let tmp = TempDir::new().unwrap();
    let group = tmp.path();
    touch(&group.join("core/2.0.0/core-2.0.0.jar"));
    touch(&group.join("absent/maven-metadata.xml"));
    fs::create_dir_all(group.join("empty/2.0.0")).unwrap();
    touch(&group.join("empty/maven-metadata.xml"));
    touch(&group.join("other-version/1.0.0/x.jar"));

    let removed = prune_unversioned(group, "2.0.0").unwrap();

    assert_eq!(removed.len(), 3);
    assert!(group.join("core").is_dir());
    assert!(!group.join("absent").exists());
    assert!(!group.join("empty").exists());
    assert!(!group.join("other-version").exists());
}

#[test]
fn test_prune_leaves_plain_files_alone() {
    let tmp = TempDir::new().unwrap();
    touch(&tmp.path().join("README"));
    let removed = prune_unversioned(tmp.path(), "1.0").unwrap();
    assert!(removed.is_empty());
    assert!(tmp.path().join("README").is_file());
}

#[test]
fn test_discover_excludes_generated_files() {
    let tmp = TempDir::new().unwrap();
    let group = tmp.path();
    let version_dir = group.join("core/2.0.0");
    touch(&version_dir.join("core-2.0.0.jar"));
    touch(&version_dir.join("core-2.0.0.pom"));
    touch(&version_dir.join("core-2.0.0.jar.asc"));
    touch(&version_dir.join("core-2.0.0.jar.sha1"));
    touch(&version_dir.join("core-2.0.0.jar.md5"));
    touch(&group.join("core/maven-metadata.xml"));

    let pending = discover(group, "2.0.0").unwrap();
    let mut found: Vec<PathBuf> = pending.iter().map(Path::to_path_buf).collect();
    found.sort();

    assert_eq!(
        found,
        vec![
            version_dir.join("core-2.0.0.jar"),
            version_dir.join("core-2.0.0.pom"),
            group.join("core/maven-metadata.xml"),
        ]
    );
}

#[test]
fn test_discover_prunes_before_walking() {
    let tmp = TempDir::new().unwrap();
    let group = tmp.path();
    touch(&group.join("core/2.0.0/core-2.0.0.jar"));
    touch(&group.join("stale/maven-metadata.xml"));

    let pending = discover(group, "2.0.0").unwrap();

    assert_eq!(pending.len(), 1);
    assert!(!group.join("stale").exists());
}

#[test]
fn test_discover_missing_group_dir_fails() {
    let tmp = TempDir::new().unwrap();
    let err = discover(&tmp.path().join("net/mamoe"), "1.0").unwrap_err();
    assert!(err.to_string().contains("does not exist"), "got: {err}");
}
