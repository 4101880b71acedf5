use stagepub_util::errors::StagepubError;

#[test]
fn test_io_error_display() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
    let err = StagepubError::from(io_err);
    assert!(err.to_string().contains("I/O error"), "got: {err}");
}

#[test]
fn test_config_error_display() {
    let err = StagepubError::Config {
        message: "PROJ_VERSION is not set".to_string(),
    };
    assert_eq!(err.to_string(), "Configuration error: PROJ_VERSION is not set");
}

#[test]
fn test_network_error_display() {
    let err = StagepubError::Network {
        message: "timeout".to_string(),
    };
    assert_eq!(err.to_string(), "Network error: timeout");
}

#[test]
fn test_signing_error_display() {
    let err = StagepubError::Signing {
        message: "exit code 2".to_string(),
    };
    assert_eq!(err.to_string(), "Signing failed: exit code 2");
}

#[test]
fn test_upload_error_lists_report() {
    let err = StagepubError::Upload {
        count: 2,
        report: "PUT a -> HTTP 500\n\nPUT b -> HTTP 500".to_string(),
    };
    let text = err.to_string();
    assert!(text.starts_with("2 upload(s) failed:"), "got: {text}");
    assert!(text.contains("PUT a -> HTTP 500"));
    assert!(text.contains("PUT b -> HTTP 500"));
}

#[test]
fn test_generic_error_display() {
    let err = StagepubError::Generic {
        message: "something broke".to_string(),
    };
    assert_eq!(err.to_string(), "something broke");
}

#[test]
fn test_io_error_from_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let err: StagepubError = io_err.into();
    assert!(matches!(err, StagepubError::Io(_)));
}
