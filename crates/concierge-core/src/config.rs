//! Configuration management for the concierge admin console

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable prefix, e.g. `CONCIERGE__API__BASE_URL`
pub const ENV_PREFIX: &str = "CONCIERGE";

/// Default configuration file name (extension resolved by the `config` crate)
pub const DEFAULT_CONFIG_NAME: &str = "concierge-admin";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote admin API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Dashboard presentation configuration
    #[serde(default)]
    pub dashboard: DashboardConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote admin API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every admin path is joined to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer credential attached to every request
    #[serde(default, skip_serializing)]
    pub token: Option<String>,
}

/// Dashboard presentation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// How long a transient notification stays visible, in milliseconds
    #[serde(default = "default_notification_ms")]
    pub notification_ms: u64,

    /// Avatar service used for users without a profile photo
    #[serde(default = "default_avatar_base_url")]
    pub avatar_base_url: String,

    /// Image shown when a record carries no photo
    #[serde(default = "default_placeholder_image")]
    pub placeholder_image: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json or pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

const fn default_notification_ms() -> u64 {
    6000
}

fn default_avatar_base_url() -> String {
    "https://ui-avatars.com/api/".to_string()
}

fn default_placeholder_image() -> String {
    "/placeholder.svg".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            notification_ms: default_notification_ms(),
            avatar_base_url: default_avatar_base_url(),
            placeholder_image: default_placeholder_image(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl DashboardConfig {
    /// Auto-dismiss duration for transient notifications
    #[must_use]
    pub const fn notification_duration(&self) -> Duration {
        Duration::from_millis(self.notification_ms)
    }
}

impl Config {
    /// Load configuration from the default file, an optional explicit file and
    /// `CONCIERGE__*` environment variables, in increasing precedence.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or the merged result does not
    /// deserialize.
    pub fn load(explicit: Option<&Path>) -> crate::Result<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name(DEFAULT_CONFIG_NAME).required(false));

        if let Some(path) = explicit {
            tracing::info!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        let loaded: Self = config.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Replace the log format, as a command line flag does
    ///
    /// # Errors
    ///
    /// Returns a configuration error and keeps the previous format if the
    /// value is neither `json` nor `pretty`.
    pub fn override_log_format(&mut self, format: &str) -> crate::Result<()> {
        let previous = std::mem::replace(&mut self.logging.format, format.to_string());
        if let Err(e) = self.validate() {
            self.logging.format = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Check the values the console cannot run without
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the offending key.
    pub fn validate(&self) -> crate::Result<()> {
        let base_url = self.api.base_url.trim();
        if base_url.is_empty() {
            return Err(crate::Error::configuration("api.base_url must not be empty"));
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(crate::Error::configuration(format!(
                "api.base_url must start with http:// or https://, got {base_url}"
            )));
        }
        if !matches!(self.logging.format.as_str(), "json" | "pretty") {
            return Err(crate::Error::configuration(format!(
                "logging.format must be json or pretty, got {}",
                self.logging.format
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::uninlined_format_args)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.api.base_url, "http://localhost:3000");
        assert!(config.api.token.is_none());

        assert_eq!(config.dashboard.notification_ms, 6000);
        assert_eq!(
            config.dashboard.notification_duration(),
            Duration::from_secs(6)
        );
        assert_eq!(config.dashboard.avatar_base_url, "https://ui-avatars.com/api/");
        assert_eq!(config.dashboard.placeholder_image, "/placeholder.svg");

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_deserialization() {
        let json_str = r#"{
            "api": {"base_url": "https://api.example.com"},
            "dashboard": {}
        }"#;

        let config: Config = serde_json::from_str(json_str).unwrap();

        assert_eq!(config.api.base_url, "https://api.example.com");
        assert_eq!(config.dashboard.notification_ms, 6000); // Uses default
        assert_eq!(config.logging.level, "info"); // Section missing entirely
    }

    #[test]
    fn test_token_is_never_serialized() {
        let mut config = Config::default();
        config.api.token = Some("secret-token".to_string());

        let serialized = serde_json::to_string(&config).unwrap();
        assert!(!serialized.contains("secret-token"));
    }

    #[test]
    fn test_validate_rejects_bad_base_url() {
        let mut config = Config::default();
        config.api.base_url = "   ".to_string();
        assert!(config.validate().is_err());

        config.api.base_url = "ftp://files.example.com".to_string();
        let err = config.validate().unwrap_err();
        assert!(format!("{}", err).contains("api.base_url"));
    }

    #[test]
    fn test_validate_rejects_unknown_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_override_log_format_is_validated() {
        let mut config = Config::default();
        config.override_log_format("json").unwrap();
        assert_eq!(config.logging.format, "json");

        let err = config.override_log_format("yaml").unwrap_err();
        assert!(err.to_string().contains("logging.format"));
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_load_from_explicit_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[api]\nbase_url = \"https://admin.example.com\"\n\n[dashboard]\nnotification_ms = 2500\n"
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();

        assert_eq!(config.api.base_url, "https://admin.example.com");
        assert_eq!(config.dashboard.notification_ms, 2500);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let result = Config::load(Some(Path::new("/definitely/not/here.toml")));
        assert!(result.is_err());
    }
}
