//! 配置单元测试

use std::io::Write;
use std::path::Path;

use crate::runtime::capture::CaptureLimit;
use crate::util::config::{
    load_config, resolve, ConfigError, DemoConfig, OutputFormat, Overrides, PhaseSelection,
};

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_defaults_match_plain_demo() {
    let config = DemoConfig::default();
    assert_eq!(config.settle().as_secs(), 3);
    assert_eq!(config.capture_limit(), CaptureLimit::Bytes(102_400));
    assert_eq!(config.phases, PhaseSelection::Both);
    assert_eq!(config.samples, 1);
    assert_eq!(config.format, OutputFormat::Text);
    assert!(!config.exit_after_capture);
    assert!(config.validate().is_ok());
}

#[test]
fn test_phase_selection() {
    assert!(PhaseSelection::Both.runs_blocking());
    assert!(PhaseSelection::Both.runs_spinning());
    assert!(!PhaseSelection::Blocking.runs_spinning());
    assert!(!PhaseSelection::Spinning.runs_blocking());
}

#[test]
fn test_load_partial_file_keeps_defaults() {
    let file = write_config("(settle_ms: 250, phases: blocking, exit_after_capture: true)");
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.settle_ms, 250);
    assert_eq!(config.phases, PhaseSelection::Blocking);
    assert!(config.exit_after_capture);
    assert_eq!(config.capture_bytes, 102_400);
    assert_eq!(config.samples, 1);
}

#[test]
fn test_load_rejects_bad_syntax() {
    let file = write_config("(settle_ms: \"soon\")");
    assert!(matches!(
        load_config(file.path()),
        Err(ConfigError::Parse { .. })
    ));
}

#[test]
fn test_load_rejects_zero_samples() {
    let file = write_config("(samples: 0)");
    assert!(matches!(
        load_config(file.path()),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
fn test_missing_file_is_io_error() {
    let err = load_config(Path::new("/nonexistent/taskdump.ron")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("/nonexistent/taskdump.ron"));
}

#[test]
fn test_cli_overrides_win_over_file() {
    let file = write_config("(settle_ms: 250, samples: 3, format: json)");
    let overrides = Overrides {
        settle_ms: Some(10),
        capture_bytes: Some(0),
        exit_after_capture: true,
        ..Overrides::default()
    };
    let config = resolve(Some(file.path()), &overrides).unwrap();

    assert_eq!(config.settle_ms, 10);
    assert_eq!(config.samples, 3);
    assert_eq!(config.format, OutputFormat::Json);
    assert_eq!(config.capture_limit(), CaptureLimit::Unbounded);
    assert!(config.exit_after_capture);
}

#[test]
fn test_resolve_without_file_validates_overrides() {
    let overrides = Overrides {
        samples: Some(0),
        ..Overrides::default()
    };
    assert!(resolve(None, &overrides).is_err());
}
