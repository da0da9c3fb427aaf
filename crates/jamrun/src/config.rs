//! Runtime configuration.
//!
//! Everything that the game treats as a constant (tick cadence, score
//! increments, finish line, victory threshold) lives in [`Rules`] so it can be
//! tuned from `jamrun.toml` instead of being baked into the state machine.
//!
//! ```toml
//! player_name = "General Da Jamaican Boy"
//!
//! [rules]
//! tick_interval_ms = 100
//! finish_distance = 200
//! victory_score = 500
//!
//! [backend]
//! base_url = "http://localhost:8001/api"
//! fallback_timeout_ms = 5000
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// Name used for the player when none is configured and for the offline player
pub const DEFAULT_PLAYER_NAME: &str = "General Da Jamaican Boy";

/// Game rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub tick_interval_ms: u64,
    pub distance_per_tick: u64,
    pub score_per_tick: u64,
    pub jump_bonus: u64,
    pub jump_duration_ms: u64,
    /// The race ends automatically once distance goes past this value
    pub finish_distance: u64,
    /// Scores strictly above this count as a victory
    pub victory_score: u64,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            tick_interval_ms: 100,
            distance_per_tick: 1,
            score_per_tick: 10,
            jump_bonus: 50,
            jump_duration_ms: 600,
            finish_distance: 200,
            victory_score: 500,
        }
    }
}

impl Rules {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    pub fn jump_duration(&self) -> Duration {
        Duration::from_millis(self.jump_duration_ms)
    }
}

/// Backend connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    /// Upper bound on one collaborator call before falling back to local data
    pub fallback_timeout_ms: u64,
    /// Per-request timeout of the underlying HTTP client
    pub request_timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8001/api".to_string(),
            fallback_timeout_ms: 5000,
            request_timeout_ms: 30_000,
        }
    }
}

impl BackendConfig {
    pub fn fallback_timeout(&self) -> Duration {
        Duration::from_millis(self.fallback_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub player_name: String,
    pub rules: Rules,
    pub backend: BackendConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            player_name: DEFAULT_PLAYER_NAME.to_string(),
            rules: Rules::default(),
            backend: BackendConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config = Self::parse(&content)?;
        debug!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Parse configuration from TOML text; missing keys take their defaults
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// Builder for Config
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    player_name: Option<String>,
    rules: Option<Rules>,
    base_url: Option<String>,
    fallback_timeout: Option<Duration>,
}

impl ConfigBuilder {
    /// Set the name used when registering the player
    pub fn player_name<S: Into<String>>(mut self, name: S) -> Self {
        self.player_name = Some(name.into());
        self
    }

    /// Replace the game rules
    pub fn rules(mut self, rules: Rules) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Set the backend base URL
    pub fn base_url<S: Into<String>>(mut self, url: S) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set how long a collaborator call may take before falling back
    pub fn fallback_timeout(mut self, timeout: Duration) -> Self {
        self.fallback_timeout = Some(timeout);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Config {
        let default = Config::default();
        let mut backend = default.backend;
        if let Some(url) = self.base_url {
            backend.base_url = url;
        }
        if let Some(timeout) = self.fallback_timeout {
            backend.fallback_timeout_ms = timeout.as_millis() as u64;
        }
        Config {
            player_name: self.player_name.unwrap_or(default.player_name),
            rules: self.rules.unwrap_or(default.rules),
            backend,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.player_name, "General Da Jamaican Boy");
        assert_eq!(config.rules.tick_interval(), Duration::from_millis(100));
        assert_eq!(config.rules.jump_duration(), Duration::from_millis(600));
        assert_eq!(config.rules.finish_distance, 200);
        assert_eq!(config.rules.victory_score, 500);
        assert_eq!(config.backend.fallback_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_parse_partial() {
        let config = Config::parse(
            r#"
            player_name = "Usain"

            [rules]
            finish_distance = 50
            "#,
        )
        .unwrap();

        assert_eq!(config.player_name, "Usain");
        assert_eq!(config.rules.finish_distance, 50);
        assert_eq!(config.rules.score_per_tick, 10);
        assert_eq!(config.backend, BackendConfig::default());
    }

    #[test]
    fn test_parse_invalid() {
        let err = Config::parse("[rules]\ntick_interval_ms = \"fast\"").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_zero_tick_interval_is_clamped() {
        let rules = Rules {
            tick_interval_ms: 0,
            ..Rules::default()
        };
        assert_eq!(rules.tick_interval(), Duration::from_millis(1));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[backend]\nbase_url = \"http://example.test/api\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.backend.base_url, "http://example.test/api");
        assert_eq!(config.backend.fallback_timeout_ms, 5000);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(dir.path().join("missing.toml")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_builder() {
        let config = Config::builder()
            .player_name("Shelly")
            .base_url("http://127.0.0.1:9/api")
            .fallback_timeout(Duration::from_millis(250))
            .build();

        assert_eq!(config.player_name, "Shelly");
        assert_eq!(config.backend.base_url, "http://127.0.0.1:9/api");
        assert_eq!(config.backend.fallback_timeout_ms, 250);
        assert_eq!(config.rules, Rules::default());
    }
}
