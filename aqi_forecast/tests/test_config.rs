use aqi_forecast::config::{MonitorConfig, Provider, DEFAULT_CONFIG};
use aqi_forecast::AdvisorError;
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_default_file_matches_built_in_defaults() {
    let parsed = MonitorConfig::from_toml(DEFAULT_CONFIG).unwrap();
    assert_eq!(parsed, MonitorConfig::default());
    assert_eq!(parsed.forecast.horizon, 3);
    assert_eq!(parsed.forecast.dated_horizon, 14);
    assert_eq!(parsed.advisory.provider, Provider::Gemini);
}

#[test]
fn test_partial_document_keeps_defaults() {
    let config = MonitorConfig::from_toml(
        r#"
        [advisory]
        provider = "ollama"
        endpoint = "http://localhost:11434"
        model = "llama3.2:3b"
        "#,
    )
    .unwrap();

    assert_eq!(config.advisory.provider, Provider::Ollama);
    assert_eq!(config.advisory.model, "llama3.2:3b");
    assert_eq!(config.advisory.timeout_secs, 30);
    assert_eq!(config.forecast, MonitorConfig::default().forecast);
}

#[test]
fn test_invalid_values_rejected() {
    for doc in [
        "[forecast]\nconfidence_level = 1.0",
        "[forecast]\nhorizon = 0",
        "[advisory]\ntimeout_secs = 0",
        "[advisory]\nendpoint = \"  \"",
        "[advisory]\nprovider = \"openai\"",
        "not toml at all = = =",
    ] {
        assert!(
            matches!(MonitorConfig::from_toml(doc), Err(AdvisorError::Config(_))),
            "expected a configuration error for {:?}",
            doc
        );
    }

    // Empty endpoint is fine while advisories are off
    assert!(MonitorConfig::from_toml("[advisory]\nenabled = false\nendpoint = \"\"").is_ok());
}

#[test]
fn test_api_key_override() {
    let config = MonitorConfig::default().with_api_key_override(Some(" secret ".to_string()));
    assert_eq!(config.advisory.api_key.as_deref(), Some("secret"));

    let kept = config
        .clone()
        .with_api_key_override(Some("   ".to_string()))
        .with_api_key_override(None);
    assert_eq!(kept.advisory.api_key.as_deref(), Some("secret"));
}

#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[forecast]").unwrap();
    writeln!(file, "dated_horizon = 7").unwrap();
    writeln!(file, "[advisory]").unwrap();
    writeln!(file, "enabled = false").unwrap();

    let config = MonitorConfig::load(Some(file.path())).unwrap();
    assert_eq!(config.forecast.dated_horizon, 7);
    assert_eq!(config.forecast.horizon, 3);
    assert!(!config.advisory.enabled);

    assert!(matches!(
        MonitorConfig::load(Some(std::path::Path::new("missing/monitor.toml"))),
        Err(AdvisorError::Io(_))
    ));
}
