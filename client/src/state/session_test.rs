use super::*;
use std::time::Duration;

#[test]
fn config_from_empty_lookup_uses_defaults() {
    let config = config_from(|_| None);
    assert_eq!(config, SessionConfig::default());
}

#[test]
fn config_from_reads_overrides() {
    let config = config_from(|key| match key {
        ENV_API_BASE_URL => Some("https://api.storaige.test/".to_owned()),
        ENV_REQUEST_TIMEOUT_SECS => Some("5".to_owned()),
        _ => None,
    });
    assert_eq!(config.base_url, "https://api.storaige.test");
    assert_eq!(config.request_timeout, Duration::from_secs(5));
}

#[test]
fn config_from_invalid_values_falls_back_to_defaults() {
    let config = config_from(|key| (key == ENV_API_BASE_URL).then(|| "not a url".to_owned()));
    assert_eq!(config, SessionConfig::default());
}
