//! Site configuration.
//!
//! Root configuration struct and nested sections with full defaults,
//! validation, TOML file loading, and environment variable overrides. The
//! defaults reproduce the published site exactly; a config file only needs
//! the keys it changes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "programme-site.toml";

/// Environment variable overriding `data.path`.
pub const ENV_DATA_PATH: &str = "PROGRAMME_DATA";

/// Environment variable overriding `logging.level`.
pub const ENV_LOG_LEVEL: &str = "PROGRAMME_LOG_LEVEL";

/// Root configuration for the programme site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub data: DataConfig,
    pub timing: TimingConfig,
    pub search: SearchConfig,
    pub share: ShareConfig,
    pub logging: LoggingConfig,
}

/// Location of the programme document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataConfig {
    pub path: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: "programme.json".into(),
        }
    }
}

/// Transition and timer durations, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingConfig {
    pub nav_fade_out_ms: u64,
    pub fade_in_ms: u64,
    pub auto_open_delay_ms: u64,
    pub highlight_ms: u64,
    pub search_debounce_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            nav_fade_out_ms: 200,
            fade_in_ms: 320,
            auto_open_delay_ms: 360,
            highlight_ms: 2200,
            search_debounce_ms: 160,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Shorter (trimmed) queries hide the dropdown instead of searching.
    pub min_query_chars: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { min_query_chars: 2 }
    }
}

/// Share block shown on the home view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShareConfig {
    pub site_url: String,
    pub qr_service: String,
    pub qr_size: u32,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            site_url: "http://wasquehal-vivante.fr/".into(),
            qr_service: "https://api.qrserver.com/v1/create-qr-code/".into(),
            qr_size: 150,
        }
    }
}

impl ShareConfig {
    /// Image URL of the QR code pointing at `site_url`.
    #[must_use]
    pub fn qr_image_url(&self) -> String {
        format!(
            "{}?size={size}x{size}&data={}",
            self.qr_service,
            self.site_url,
            size = self.qr_size
        )
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "console".into(),
        }
    }
}

impl SiteConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Load `path`, or defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Apply `PROGRAMME_*` overrides through `lookup` (usually `std::env::var`).
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup(ENV_DATA_PATH).filter(|v| !v.trim().is_empty()) {
            self.data.path = path.trim().to_owned();
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL).filter(|v| !v.trim().is_empty()) {
            self.logging.level = level.trim().to_lowercase();
        }
    }

    /// Validates the entire configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data.path.trim().is_empty() {
            return Err(ConfigError::Invalid("data.path is required".into()));
        }
        if self.search.min_query_chars == 0 {
            return Err(ConfigError::Invalid(
                "search.min_query_chars must be at least 1".into(),
            ));
        }
        if self.share.site_url.trim().is_empty() {
            return Err(ConfigError::Invalid("share.site_url is required".into()));
        }
        if self.share.qr_service.trim().is_empty() {
            return Err(ConfigError::Invalid("share.qr_service is required".into()));
        }
        if self.share.qr_size == 0 {
            return Err(ConfigError::Invalid(
                "share.qr_size must be greater than 0".into(),
            ));
        }
        match self.logging.level.to_lowercase().trim() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::Invalid(
                    "logging.level must be one of trace, debug, info, warn, error".into(),
                ))
            }
        }
        match self.logging.format.to_lowercase().trim() {
            "console" | "json" => {}
            _ => {
                return Err(ConfigError::Invalid(
                    "logging.format must be one of console, json".into(),
                ))
            }
        }
        Ok(())
    }
}

/// `dir/programme-site.toml` if it exists.
#[must_use]
pub fn find_config_file(dir: &Path) -> Option<PathBuf> {
    let candidate = dir.join(DEFAULT_CONFIG_FILE);
    candidate.is_file().then_some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let cfg = SiteConfig::default();
        assert_eq!(cfg.data.path, "programme.json");
        assert_eq!(cfg.timing.nav_fade_out_ms, 200);
        assert_eq!(cfg.timing.fade_in_ms, 320);
        assert_eq!(cfg.timing.auto_open_delay_ms, 360);
        assert_eq!(cfg.timing.highlight_ms, 2200);
        assert_eq!(cfg.timing.search_debounce_ms, 160);
        assert_eq!(cfg.search.min_query_chars, 2);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn config_default_validates() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let cfg = match SiteConfig::from_toml_str(
            "[timing]\nsearch_debounce_ms = 50\n\n[share]\nsite_url = \"https://example.org/\"\n",
        ) {
            Ok(cfg) => cfg,
            Err(err) => panic!("parse: {err}"),
        };
        assert_eq!(cfg.timing.search_debounce_ms, 50);
        assert_eq!(cfg.timing.nav_fade_out_ms, 200);
        assert_eq!(cfg.share.site_url, "https://example.org/");
        assert_eq!(cfg.share.qr_size, 150);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = SiteConfig::from_toml_str("[timing]\nfade_ms = 3\n");
        assert!(matches!(err, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn validate_rejects_bad_log_level() {
        let mut cfg = SiteConfig::default();
        cfg.logging.level = "verbose".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_log_format() {
        let mut cfg = SiteConfig::default();
        cfg.logging.format = "xml".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_data_path_and_zero_sizes() {
        let mut cfg = SiteConfig::default();
        cfg.data.path = "  ".into();
        assert!(cfg.validate().is_err());

        let mut cfg = SiteConfig::default();
        cfg.share.qr_size = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = SiteConfig::default();
        cfg.search.min_query_chars = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn env_overrides_apply() {
        let mut cfg = SiteConfig::default();
        cfg.apply_env_overrides(|key| match key {
            ENV_DATA_PATH => Some(" site/data.json ".to_owned()),
            ENV_LOG_LEVEL => Some("DEBUG".to_owned()),
            _ => None,
        });
        assert_eq!(cfg.data.path, "site/data.json");
        assert_eq!(cfg.logging.level, "debug");
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let mut cfg = SiteConfig::default();
        cfg.apply_env_overrides(|_| Some(String::new()));
        assert_eq!(cfg, SiteConfig::default());
    }

    #[test]
    fn qr_image_url_embeds_size_and_site() {
        let share = ShareConfig::default();
        assert_eq!(
            share.qr_image_url(),
            "https://api.qrserver.com/v1/create-qr-code/?size=150x150&data=http://wasquehal-vivante.fr/"
        );
    }

    #[test]
    fn load_without_path_is_default() {
        match SiteConfig::load(None) {
            Ok(cfg) => assert_eq!(cfg, SiteConfig::default()),
            Err(err) => panic!("load: {err}"),
        }
    }
}
