//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Remote bill service configuration.
    pub remote: RemoteConfig,
    /// Transient feedback configuration.
    #[serde(default)]
    pub feedback: FeedbackConfig,
}

/// Remote bill service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
    /// Base URL of the bill service API.
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

/// Auto-clear intervals for transient success/error feedback.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackConfig {
    /// Seconds a success message stays visible.
    #[serde(default = "default_success_clear_secs")]
    pub success_clear_secs: u64,
    /// Seconds an error message stays visible.
    #[serde(default = "default_error_clear_secs")]
    pub error_clear_secs: u64,
}

fn default_success_clear_secs() -> u64 {
    3
}

fn default_error_clear_secs() -> u64 {
    5
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            success_clear_secs: default_success_clear_secs(),
            error_clear_secs: default_error_clear_secs(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("DARZI").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_defaults() {
        let feedback = FeedbackConfig::default();
        assert_eq!(feedback.success_clear_secs, 3);
        assert_eq!(feedback.error_clear_secs, 5);
    }

    #[test]
    fn test_deserialize_minimal() {
        let config: AppConfig = config::Config::builder()
            .set_override("remote.base_url", "https://api.example.test")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.remote.base_url, "https://api.example.test");
        assert_eq!(config.remote.timeout_secs, 10);
        assert_eq!(config.feedback.success_clear_secs, 3);
    }
}
