use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_known_values() {
    assert_eq!(parse_environment("development"), Environment::Development);
    assert_eq!(parse_environment("test"), Environment::Test);
    assert_eq!(parse_environment("production"), Environment::Production);
}

#[test]
fn parse_environment_unknown_defaults_to_development() {
    assert_eq!(parse_environment("staging"), Environment::Development);
}

#[test]
fn build_app_config_uses_defaults_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.light_timeout_secs, 15);
    assert_eq!(cfg.heavy_timeout_secs, 45);
    assert_eq!(cfg.settle_delay_ms, 3000);
    assert_eq!(cfg.max_product_links, 10);
    assert_eq!(cfg.collector_timeout_secs, 90);
    assert_eq!(cfg.collector_nav_timeout_secs, 15);
    assert!(cfg.chromium_path.is_none());
    assert!(cfg.headless);
    assert_eq!(cfg.user_agent, DEFAULT_USER_AGENT);
}

#[test]
fn build_app_config_matches_with_defaults_constructor() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let defaults = AppConfig::with_defaults();
    assert_eq!(cfg.light_timeout_secs, defaults.light_timeout_secs);
    assert_eq!(cfg.targets_path, defaults.targets_path);
    assert_eq!(cfg.max_product_links, defaults.max_product_links);
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = HashMap::new();
    map.insert("STORELENS_ENV", "production");
    map.insert("STORELENS_LIGHT_TIMEOUT_SECS", "20");
    map.insert("STORELENS_MAX_PRODUCT_LINKS", "4");
    map.insert("STORELENS_CHROMIUM_PATH", "/usr/bin/chromium");
    map.insert("STORELENS_HEADLESS", "false");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.light_timeout_secs, 20);
    assert_eq!(cfg.max_product_links, 4);
    assert_eq!(
        cfg.chromium_path.as_deref(),
        Some(std::path::Path::new("/usr/bin/chromium"))
    );
    assert!(!cfg.headless);
}

#[test]
fn blank_chromium_path_is_treated_as_unset() {
    let mut map = HashMap::new();
    map.insert("STORELENS_CHROMIUM_PATH", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.chromium_path.is_none());
}

#[test]
fn invalid_number_is_rejected_with_var_name() {
    let mut map = HashMap::new();
    map.insert("STORELENS_HEAVY_TIMEOUT_SECS", "forty-five");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "STORELENS_HEAVY_TIMEOUT_SECS"),
        "expected InvalidEnvVar(STORELENS_HEAVY_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn invalid_bool_is_rejected() {
    let mut map = HashMap::new();
    map.insert("STORELENS_HEADLESS", "maybe");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "STORELENS_HEADLESS"),
        "expected InvalidEnvVar(STORELENS_HEADLESS), got: {result:?}"
    );
}

#[test]
fn zero_light_timeout_is_rejected() {
    let mut map = HashMap::new();
    map.insert("STORELENS_LIGHT_TIMEOUT_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(result, Err(ConfigError::InvalidEnvVar { .. })));
}
