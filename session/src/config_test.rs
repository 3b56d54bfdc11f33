use super::*;
use std::collections::HashMap;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |key| map.get(key).cloned()
}

// =============================================================================
// from_lookup
// =============================================================================

#[test]
fn from_lookup_uses_defaults_when_unset() {
    let cfg = SessionConfig::from_lookup(|_| None).unwrap();
    assert_eq!(cfg, SessionConfig::default());
    assert_eq!(cfg.base_url, DEFAULT_API_BASE_URL);
    assert_eq!(cfg.request_timeout, Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS));
    assert_eq!(cfg.revalidate_interval, Duration::from_secs(3600));
}

#[test]
fn from_lookup_parses_overrides() {
    let cfg = SessionConfig::from_lookup(lookup_from(&[
        (ENV_API_BASE_URL, "https://files.example.test/"),
        (ENV_REQUEST_TIMEOUT_SECS, "7"),
        (ENV_REVALIDATE_INTERVAL_SECS, " 120 "),
    ]))
    .unwrap();
    assert_eq!(cfg.base_url, "https://files.example.test");
    assert_eq!(cfg.request_timeout, Duration::from_secs(7));
    assert_eq!(cfg.revalidate_interval, Duration::from_secs(120));
}

#[test]
fn from_lookup_invalid_number_falls_back_to_default() {
    let cfg = SessionConfig::from_lookup(lookup_from(&[(ENV_REQUEST_TIMEOUT_SECS, "soon")])).unwrap();
    assert_eq!(cfg.request_timeout, Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS));
}

#[test]
fn from_lookup_rejects_zero_timeout() {
    let err = SessionConfig::from_lookup(lookup_from(&[(ENV_REQUEST_TIMEOUT_SECS, "0")])).unwrap_err();
    assert_eq!(err, ConfigError::ZeroDuration("request timeout"));
}

#[test]
fn from_lookup_rejects_zero_interval() {
    let err = SessionConfig::from_lookup(lookup_from(&[(ENV_REVALIDATE_INTERVAL_SECS, "0")])).unwrap_err();
    assert_eq!(err, ConfigError::ZeroDuration("revalidate interval"));
}

#[test]
fn from_lookup_rejects_non_http_base_url() {
    let err = SessionConfig::from_lookup(lookup_from(&[(ENV_API_BASE_URL, "ftp://files")])).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidBaseUrl(url) if url == "ftp://files"));
}

// =============================================================================
// base URL normalization
// =============================================================================

#[test]
fn normalize_base_url_trims_trailing_slashes_and_whitespace() {
    assert_eq!(normalize_base_url("  http://localhost:8080//  ").unwrap(), "http://localhost:8080");
}

#[test]
fn normalize_base_url_requires_host() {
    assert!(normalize_base_url("http://").is_err());
    assert!(normalize_base_url("").is_err());
}

#[test]
fn endpoint_url_joins_path() {
    let cfg = SessionConfig::default();
    assert_eq!(cfg.endpoint_url("/api/auth/login"), "http://localhost:8080/api/auth/login");
}

#[test]
fn parse_secs_trims_and_defaults() {
    assert_eq!(parse_secs(Some(" 42 "), 1), 42);
    assert_eq!(parse_secs(Some("-1"), 1), 1);
    assert_eq!(parse_secs(None, 9), 9);
}
