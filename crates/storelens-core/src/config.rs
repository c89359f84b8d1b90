use std::path::PathBuf;

use crate::app_config::{AppConfig, Environment, DEFAULT_USER_AGENT};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable holds a value that does not parse.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable holds a value that does not parse.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build configuration using the provided env-var lookup function, so the
/// parsing rules can be exercised with a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected a boolean, got \"{other}\""),
            }),
        }
    };

    let env = parse_environment(&or_default("STORELENS_ENV", "development"));
    let log_level = or_default("STORELENS_LOG_LEVEL", "info");
    let targets_path = PathBuf::from(or_default(
        "STORELENS_TARGETS_PATH",
        "./config/targets.yaml",
    ));
    let user_agent = or_default("STORELENS_USER_AGENT", DEFAULT_USER_AGENT);

    let light_timeout_secs = parse_u64("STORELENS_LIGHT_TIMEOUT_SECS", "15")?;
    let heavy_timeout_secs = parse_u64("STORELENS_HEAVY_TIMEOUT_SECS", "45")?;
    let settle_delay_ms = parse_u64("STORELENS_SETTLE_DELAY_MS", "3000")?;
    let max_product_links = parse_usize("STORELENS_MAX_PRODUCT_LINKS", "10")?;
    let collector_timeout_secs = parse_u64("STORELENS_COLLECTOR_TIMEOUT_SECS", "90")?;
    let collector_nav_timeout_secs = parse_u64("STORELENS_COLLECTOR_NAV_TIMEOUT_SECS", "15")?;
    let chromium_path = lookup("STORELENS_CHROMIUM_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);
    let headless = parse_bool("STORELENS_HEADLESS", "true")?;

    if light_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "STORELENS_LIGHT_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    Ok(AppConfig {
        env,
        log_level,
        targets_path,
        user_agent,
        light_timeout_secs,
        heavy_timeout_secs,
        settle_delay_ms,
        max_product_links,
        collector_timeout_secs,
        collector_nav_timeout_secs,
        chromium_path,
        headless,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
