//! Passive extraction configuration: read-only after initialization.

use std::path::Path;

use serde::Deserialize;

use crate::ConfigError;

/// Tunables shared by the parsers and the domain validator.
///
/// `source_host_keywords` and `source_path_marker` identify self-links to
/// the map service a listing was scraped from: a business whose "website"
/// points back at the map service has no external website.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Version string stamped into every record's metadata bag.
    pub scraper_version: String,
    /// Host substrings of the source map service (e.g. `yandex`).
    pub source_host_keywords: Vec<String>,
    /// Path marker that, together with a host keyword, flags a self-link.
    pub source_path_marker: String,
    /// Lower bound of the plausible-price window.
    pub price_min: f64,
    /// Upper bound of the plausible-price window.
    pub price_max: f64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            scraper_version: env!("CARGO_PKG_VERSION").to_owned(),
            source_host_keywords: vec!["yandex".to_owned()],
            source_path_marker: "maps".to_owned(),
            price_min: 50.0,
            price_max: 500_000.0,
        }
    }
}

impl ExtractorConfig {
    /// True when `url` resolves back to the source map service itself.
    #[must_use]
    pub fn is_source_self_link(&self, url: &str) -> bool {
        let lower = url.to_lowercase();
        let host = host_of(&lower);

        self.source_host_keywords
            .iter()
            .any(|keyword| host.contains(keyword.as_str()))
            && lower.contains(&self.source_path_marker)
    }
}

/// Returns the host portion of a URL without parsing the full grammar.
fn host_of(url: &str) -> &str {
    let without_scheme = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or(without_scheme)
}

/// Load configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading
/// env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a present env var holds an invalid value.
pub fn load_config() -> Result<ExtractorConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_config_from_env()
}

/// Load configuration from environment variables already in the process.
///
/// Unlike [`load_config`], this does NOT load `.env` files — useful for
/// testing or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a present env var holds an invalid value.
pub fn load_config_from_env() -> Result<ExtractorConfig, ConfigError> {
    build_config(|key| std::env::var(key))
}

/// Build configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup.
fn build_config<F>(lookup: F) -> Result<ExtractorConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let defaults = ExtractorConfig::default();

    let or_default =
        |var: &str, default: String| -> String { lookup(var).unwrap_or(default) };

    let parse_f64 = |var: &str, default: f64| -> Result<f64, ConfigError> {
        match lookup(var) {
            Err(_) => Ok(default),
            Ok(raw) => raw.parse::<f64>().map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_owned(),
                reason: e.to_string(),
            }),
        }
    };

    let scraper_version = or_default("MAPCARD_SCRAPER_VERSION", defaults.scraper_version);
    let source_path_marker = or_default("MAPCARD_SOURCE_PATH_MARKER", defaults.source_path_marker);

    let source_host_keywords = match lookup("MAPCARD_SOURCE_HOSTS") {
        Err(_) => defaults.source_host_keywords,
        Ok(raw) => {
            let keywords: Vec<String> = raw
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect();
            if keywords.is_empty() {
                return Err(ConfigError::InvalidEnvVar {
                    var: "MAPCARD_SOURCE_HOSTS".to_owned(),
                    reason: "no host keywords after splitting on commas".to_owned(),
                });
            }
            keywords
        }
    };

    let price_min = parse_f64("MAPCARD_PRICE_MIN", defaults.price_min)?;
    let price_max = parse_f64("MAPCARD_PRICE_MAX", defaults.price_max)?;

    let config = ExtractorConfig {
        scraper_version,
        source_host_keywords,
        source_path_marker,
        price_min,
        price_max,
    };

    validate_config(&config)?;

    Ok(config)
}

/// On-disk YAML shape for [`load_config_file`].
#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    scraper_version: Option<String>,
    source_hosts: Vec<String>,
    #[serde(default)]
    source_path_marker: Option<String>,
    #[serde(default)]
    price_min: Option<f64>,
    #[serde(default)]
    price_max: Option<f64>,
}

/// Load and validate configuration from a YAML file.
///
/// Absent optional keys fall back to the built-in defaults.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails
/// validation.
pub fn load_config_file(path: &Path) -> Result<ExtractorConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: ConfigFile = serde_yaml::from_str(&content)?;
    let defaults = ExtractorConfig::default();

    let config = ExtractorConfig {
        scraper_version: file.scraper_version.unwrap_or(defaults.scraper_version),
        source_host_keywords: file
            .source_hosts
            .into_iter()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect(),
        source_path_marker: file.source_path_marker.unwrap_or(defaults.source_path_marker),
        price_min: file.price_min.unwrap_or(defaults.price_min),
        price_max: file.price_max.unwrap_or(defaults.price_max),
    };

    validate_config(&config)?;

    Ok(config)
}

fn validate_config(config: &ExtractorConfig) -> Result<(), ConfigError> {
    if config.source_host_keywords.is_empty() {
        return Err(ConfigError::Validation(
            "source host keyword list must be non-empty".to_owned(),
        ));
    }

    if config.price_min >= config.price_max {
        return Err(ConfigError::Validation(format!(
            "price_min {} must be below price_max {}",
            config.price_min, config.price_max
        )));
    }

    if config.price_min < 0.0 {
        return Err(ConfigError::Validation(format!(
            "price_min {} must be non-negative",
            config.price_min
        )));
    }

    Ok(())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
