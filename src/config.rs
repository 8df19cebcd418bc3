//! Configuration management for the weather dashboard
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::DashboardError;
use crate::weather::ForecastZone;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Key used when no provider key has been configured. Only good for local development.
pub const DEV_FALLBACK_API_KEY: &str = "development-openweather-key";

/// Root configuration structure for the weather dashboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DashboardConfig {
    /// Weather provider configuration
    #[serde(default)]
    pub weather: WeatherConfig,
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Search history configuration
    #[serde(default)]
    pub history: HistoryConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Weather provider configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Base URL shared by the geocoding and forecast endpoints
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Provider API key
    #[serde(default = "default_weather_api_key")]
    pub api_key: String,
    /// Request timeout in seconds
    #[serde(default = "default_weather_timeout")]
    pub timeout_seconds: u32,
    /// IANA time zone used to bucket samples into days (process local time if unset)
    #[serde(default)]
    pub timezone: Option<String>,
}

/// HTTP server configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to
    #[serde(default = "default_server_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// Directory holding the built client
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

/// Search history configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// JSON file the history is persisted to
    #[serde(default = "default_history_file")]
    pub file_path: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_weather_base_url() -> String {
    "https://api.openweathermap.org".to_string()
}

fn default_weather_api_key() -> String {
    DEV_FALLBACK_API_KEY.to_string()
}

fn default_weather_timeout() -> u32 {
    30
}

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    3001
}

fn default_static_dir() -> String {
    "client/dist".to_string()
}

fn default_history_file() -> String {
    "db/searchHistory.json".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_base_url(),
            api_key: default_weather_api_key(),
            timeout_seconds: default_weather_timeout(),
            timezone: None,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            static_dir: default_static_dir(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            file_path: default_history_file(),
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

impl WeatherConfig {
    /// Whether the development fallback key is still in use
    #[must_use]
    pub fn uses_fallback_key(&self) -> bool {
        self.api_key == DEV_FALLBACK_API_KEY
    }

    /// Time zone used when deriving calendar dates and hours from sample timestamps
    pub fn forecast_zone(&self) -> crate::Result<ForecastZone> {
        match self.timezone.as_deref() {
            None | Some("") => Ok(ForecastZone::Local),
            Some(name) => name
                .parse::<chrono_tz::Tz>()
                .map(ForecastZone::Named)
                .map_err(|_| DashboardError::config(format!("Unknown time zone '{name}'"))),
        }
    }
}

impl ServerConfig {
    /// Socket address the server binds to
    pub fn socket_addr(&self) -> crate::Result<SocketAddr> {
        let ip: IpAddr = self.host.parse().map_err(|_| {
            DashboardError::config(format!("Invalid server host '{}'", self.host))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl DashboardConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|path| path.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. DASHBOARD_WEATHER__API_KEY
        builder = builder.add_source(
            Environment::with_prefix("DASHBOARD")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // Plain variables used by existing deployments
        builder = builder
            .set_override_option("weather.base_url", std::env::var("API_BASE_URL").ok())
            .with_context(|| "Failed to apply API_BASE_URL")?
            .set_override_option("weather.api_key", std::env::var("API_KEY").ok())
            .with_context(|| "Failed to apply API_KEY")?
            .set_override_option("server.port", std::env::var("PORT").ok())
            .with_context(|| "Failed to apply PORT")?;

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: DashboardConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        // Apply defaults for missing values
        config.apply_defaults();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("weather-dashboard").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.api_key.is_empty() {
            self.weather.api_key = default_weather_api_key();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_weather_timeout();
        }
        if self.server.host.is_empty() {
            self.server.host = default_server_host();
        }
        if self.server.static_dir.is_empty() {
            self.server.static_dir = default_static_dir();
        }
        if self.history.file_path.is_empty() {
            self.history.file_path = default_history_file();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_key()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate the provider API key
    pub fn validate_api_key(&self) -> Result<()> {
        let api_key = &self.weather.api_key;

        if api_key.trim().is_empty() {
            return Err(DashboardError::config("Weather API key cannot be empty").into());
        }

        if api_key.len() < 8 {
            return Err(DashboardError::config(
                "Weather API key appears to be invalid (too short). Please check your API key.",
            )
            .into());
        }

        if api_key.len() > 100 {
            return Err(DashboardError::config(
                "Weather API key appears to be invalid (too long). Please check your API key.",
            )
            .into());
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.weather.timeout_seconds > 300 {
            return Err(
                DashboardError::config("Weather API timeout cannot exceed 300 seconds").into(),
            );
        }

        if self.server.port == 0 {
            return Err(DashboardError::config("Server port cannot be 0").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(DashboardError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(DashboardError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.weather.base_url.starts_with("http://")
            && !self.weather.base_url.starts_with("https://")
        {
            return Err(DashboardError::config(
                "Weather API base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        self.weather.forecast_zone()?;
        self.server.socket_addr()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = DashboardConfig::default();
        assert_eq!(config.weather.base_url, "https://api.openweathermap.org");
        assert_eq!(config.weather.timeout_seconds, 30);
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.history.file_path, "db/searchHistory.json");
        assert_eq!(config.logging.level, "info");
        assert!(config.weather.uses_fallback_key());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_short_api_key() {
        let mut config = DashboardConfig::default();
        config.weather.api_key = "abc".to_string();
        let result = config.validate_api_key();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("too short"));
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = DashboardConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = DashboardConfig::default();
        config.weather.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));
    }

    #[test]
    fn test_config_validation_base_url_scheme() {
        let mut config = DashboardConfig::default();
        config.weather.base_url = "api.openweathermap.org".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_forecast_zone_parsing() {
        let mut weather = WeatherConfig::default();
        assert!(matches!(weather.forecast_zone(), Ok(ForecastZone::Local)));

        weather.timezone = Some("America/Chicago".to_string());
        assert!(matches!(
            weather.forecast_zone(),
            Ok(ForecastZone::Named(chrono_tz::America::Chicago))
        ));

        weather.timezone = Some("Mars/Olympus_Mons".to_string());
        assert!(matches!(
            weather.forecast_zone(),
            Err(DashboardError::Config { .. })
        ));
    }

    #[test]
    fn test_apply_defaults_refills_empty_values() {
        let mut config = DashboardConfig::default();
        config.weather.base_url.clear();
        config.history.file_path.clear();
        config.logging.format.clear();
        config.apply_defaults();
        assert_eq!(config.weather.base_url, "https://api.openweathermap.org");
        assert_eq!(config.history.file_path, "db/searchHistory.json");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[weather]\nbase_url = \"http://localhost:9999\"\ntimezone = \"UTC\"\n\n[server]\nstatic_dir = \"public\""
        )
        .unwrap();

        let config = DashboardConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        // API_BASE_URL in the environment would override the file
        if std::env::var("API_BASE_URL").is_err() {
            assert_eq!(config.weather.base_url, "http://localhost:9999");
        }
        assert_eq!(config.weather.timezone.as_deref(), Some("UTC"));
        assert_eq!(config.server.static_dir, "public");
        assert_eq!(config.history.file_path, "db/searchHistory.json");
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = DashboardConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("weather-dashboard"));
            assert!(path.to_string_lossy().ends_with("config.toml"));
        }
    }
}
