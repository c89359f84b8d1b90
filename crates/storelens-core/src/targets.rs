use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::urls::{parse_site_url, site_host};
use crate::ConfigError;

/// A business queued for investigation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub name: String,
    pub url: String,
    /// City or region used to narrow the map search.
    pub location: Option<String>,
    pub notes: Option<String>,
}

impl Target {
    /// Host part of the URL without a leading `www.`, lowercased. Empty
    /// when the URL does not parse.
    #[must_use]
    pub fn host_key(&self) -> String {
        site_host(&self.url).unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
pub struct TargetsFile {
    pub targets: Vec<Target>,
}

/// Load and validate the investigation targets from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_targets(path: &Path) -> Result<TargetsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::TargetsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_targets(&content)
}

fn parse_targets(content: &str) -> Result<TargetsFile, ConfigError> {
    let targets_file: TargetsFile = serde_yaml::from_str(content)?;
    validate_targets(&targets_file)?;
    Ok(targets_file)
}

fn validate_targets(targets_file: &TargetsFile) -> Result<(), ConfigError> {
    let mut seen_hosts = HashSet::new();

    for target in &targets_file.targets {
        if target.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "target name must be non-empty".to_string(),
            ));
        }

        if let Err(e) = parse_site_url(&target.url) {
            return Err(ConfigError::Validation(format!(
                "target '{}' has {e}",
                target.name
            )));
        }

        let host = target.host_key();
        if !seen_hosts.insert(host.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate target host: '{}' (from target '{}')",
                host, target.name
            )));
        }
    }

    Ok(())
}
