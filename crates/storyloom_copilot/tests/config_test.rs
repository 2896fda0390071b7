//! Tests for configuration loading and validation.

use std::io::Write;
use std::time::Duration;
use storyloom_copilot::{AssetQueue, StoryloomConfig};
use storyloom_error::{ConfigErrorKind, StoryloomErrorKind};

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write temp config");
    file
}

fn config_kind(err: &storyloom_error::StoryloomError) -> Option<&ConfigErrorKind> {
    match err.kind() {
        StoryloomErrorKind::Config(config) => Some(&config.kind),
        _ => None,
    }
}

#[test]
fn test_defaults() {
    let config = StoryloomConfig::default();
    assert_eq!(config.copilot().timeout(), Duration::from_secs(60));
    assert_eq!(*config.copilot().asset_queue(), AssetQueue::Discovered);
    assert!(!config.analysis().enabled());
    assert_eq!(config.analysis().quiet_period(), Duration::from_millis(2_000));
    assert!(config.validate().is_ok());
}

#[test]
fn test_bundled_defaults_load() -> anyhow::Result<()> {
    let config = StoryloomConfig::load()?;
    assert!(*config.copilot().timeout_secs() > 0);
    Ok(())
}

#[test]
fn test_from_file_reads_both_tables() -> anyhow::Result<()> {
    let file = write_config(
        r#"
[copilot]
model = "gemini-2.5-pro"
temperature = 0.3
timeout_secs = 15
asset_queue = "unresolved"
welcome_message = "Hello"

[analysis]
enabled = true
quiet_period_ms = 750
"#,
    );

    let config = StoryloomConfig::from_file(file.path())?;

    assert_eq!(config.copilot().model().as_deref(), Some("gemini-2.5-pro"));
    assert_eq!(*config.copilot().temperature(), Some(0.3));
    assert_eq!(config.copilot().timeout(), Duration::from_secs(15));
    assert_eq!(*config.copilot().asset_queue(), AssetQueue::Unresolved);
    assert_eq!(config.copilot().welcome_message().as_deref(), Some("Hello"));
    assert!(*config.analysis().enabled());
    assert_eq!(config.analysis().quiet_period(), Duration::from_millis(750));
    Ok(())
}

#[test]
fn test_partial_file_keeps_defaults() -> anyhow::Result<()> {
    let file = write_config("[analysis]\nenabled = true\n");
    let config = StoryloomConfig::from_file(file.path())?;
    assert_eq!(*config.copilot().timeout_secs(), 60);
    assert_eq!(*config.analysis().quiet_period_ms(), 2_000);
    Ok(())
}

#[test]
fn test_zero_timeout_rejected() {
    let file = write_config("[copilot]\ntimeout_secs = 0\n");
    let err = StoryloomConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(
        config_kind(&err),
        Some(ConfigErrorKind::InvalidValue { field, .. }) if field == "copilot.timeout_secs"
    ));
}

#[test]
fn test_out_of_range_temperature_rejected() {
    let file = write_config("[copilot]\ntemperature = 3.5\n");
    let err = StoryloomConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(
        config_kind(&err),
        Some(ConfigErrorKind::InvalidValue { field, .. }) if field == "copilot.temperature"
    ));
}

#[test]
fn test_unknown_asset_queue_is_parse_error() {
    let file = write_config("[copilot]\nasset_queue = \"elsewhere\"\n");
    let err = StoryloomConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(config_kind(&err), Some(ConfigErrorKind::Parse(_))));
}

#[test]
fn test_missing_file_is_load_error() {
    let err = StoryloomConfig::from_file("/nonexistent/storyloom.toml").unwrap_err();
    assert!(matches!(config_kind(&err), Some(ConfigErrorKind::Load(_))));
}
