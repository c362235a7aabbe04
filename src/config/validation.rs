//! Configuration validation logic
//!
//! This module provides validation methods for all configuration structures
//! to ensure configuration values are within acceptable ranges and formats.

use crate::config::error::ConfigError;
use crate::config::settings::{
    ApplicationConfig, FileSettings, LinksConfig, LoggerSettings, PagingConfig, ServerConfig,
    Settings,
};

/// Valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

/// Schemes a link base URL may use
const VALID_LINK_SCHEMES: &[&str] = &["http://", "https://"];

impl ApplicationConfig {
    /// Validate application configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::validation(
                "application.name",
                "Application name cannot be empty.",
            ));
        }
        Ok(())
    }
}

impl ServerConfig {
    /// Validate server configuration
    ///
    /// # Validation Rules
    /// - Host must not be empty
    /// - Port must be between 1 and 65535
    /// - Request timeout must be greater than 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::validation(
                "server.host",
                "Host is required. Please specify an address to bind to.",
            ));
        }

        if self.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "Port must be between 1 and 65535. Please specify a valid port number.",
            ));
        }

        if self.request_timeout == 0 {
            return Err(ConfigError::validation(
                "server.request_timeout",
                "Request timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl FileSettings {
    /// Validate file settings
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::validation(
                "logger.file.format",
                format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            ));
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// Validate logger settings
    ///
    /// # Validation Rules
    /// - Log level must be one of: trace, debug, info, warn, error
    /// - If file logging is enabled, path must not be empty
    /// - Log format must be one of: full, compact, json
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::validation(
                "logger.level",
                format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            ));
        }

        self.file.validate()?;

        Ok(())
    }
}

impl PagingConfig {
    /// Validate paging configuration
    ///
    /// # Validation Rules
    /// - Max page size must be at least 1
    /// - Default page size must be between 1 and the max page size
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_page_size == 0 {
            return Err(ConfigError::validation(
                "paging.max_page_size",
                "Max page size must be at least 1.",
            ));
        }

        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            return Err(ConfigError::validation(
                "paging.default_page_size",
                format!(
                    "Default page size ({}) must be between 1 and max page size ({}).",
                    self.default_page_size, self.max_page_size
                ),
            ));
        }

        Ok(())
    }
}

impl LinksConfig {
    /// Validate link configuration
    ///
    /// The base URL must be absolute over http or https.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let lowered = self.base_url.trim().to_lowercase();
        let has_host = VALID_LINK_SCHEMES
            .iter()
            .find_map(|scheme| lowered.strip_prefix(scheme))
            .is_some_and(|rest| !rest.trim_matches('/').is_empty());

        if !has_host {
            return Err(ConfigError::validation(
                "links.base_url",
                format!(
                    "Invalid base URL '{}'. Expected http://host[:port] or https://host[:port]",
                    self.base_url
                ),
            ));
        }

        Ok(())
    }
}

impl Settings {
    /// Validate all configuration settings
    ///
    /// This method validates all sub-configurations and returns the first
    /// validation error encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.application.validate()?;
        self.server.validate()?;
        self.logger.validate()?;
        self.paging.validate()?;
        self.links.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_field(result: Result<(), ConfigError>, expected: &str) {
        let err = result.unwrap_err();
        assert!(
            matches!(&err, ConfigError::ValidationError { field, .. } if field == expected),
            "expected {} to fail, got {:?}",
            expected,
            err
        );
    }

    // ========================================================================
    // ServerConfig validation tests
    // ========================================================================

    #[test]
    fn test_server_config_valid() {
        assert!(ServerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_server_config_invalid_port_zero() {
        let config = ServerConfig {
            port: 0,
            ..Default::default()
        };
        assert_field(config.validate(), "server.port");
    }

    #[test]
    fn test_server_config_valid_port_boundaries() {
        for port in [1, 65535] {
            let config = ServerConfig {
                port,
                ..Default::default()
            };
            assert!(config.validate().is_ok());
        }
    }

    #[test]
    fn test_server_config_blank_host() {
        let config = ServerConfig {
            host: "  ".to_string(),
            ..Default::default()
        };
        assert_field(config.validate(), "server.host");
    }

    #[test]
    fn test_server_config_invalid_request_timeout() {
        let config = ServerConfig {
            request_timeout: 0,
            ..Default::default()
        };
        assert_field(config.validate(), "server.request_timeout");
    }

    // ========================================================================
    // LoggerSettings validation tests
    // ========================================================================

    #[test]
    fn test_logger_settings_valid_levels() {
        for level in ["trace", "debug", "INFO", "warn", "Error"] {
            let settings = LoggerSettings {
                level: level.to_string(),
                ..Default::default()
            };
            assert!(settings.validate().is_ok(), "level should be valid: {}", level);
        }
    }

    #[test]
    fn test_logger_settings_invalid_level() {
        let settings = LoggerSettings {
            level: "verbose".to_string(),
            ..Default::default()
        };
        assert_field(settings.validate(), "logger.level");
    }

    #[test]
    fn test_logger_settings_file_enabled_without_path() {
        let settings = LoggerSettings {
            file: FileSettings {
                enabled: true,
                path: String::new(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_field(settings.validate(), "logger.file.path");
    }

    #[test]
    fn test_logger_settings_disabled_file_may_have_empty_path() {
        let settings = LoggerSettings {
            file: FileSettings {
                enabled: false,
                path: String::new(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_logger_settings_invalid_format() {
        let settings = LoggerSettings {
            file: FileSettings {
                format: "yaml".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_field(settings.validate(), "logger.file.format");
    }

    // ========================================================================
    // PagingConfig validation tests
    // ========================================================================

    #[test]
    fn test_paging_config_valid() {
        assert!(PagingConfig::default().validate().is_ok());
        let equal = PagingConfig {
            default_page_size: 20,
            max_page_size: 20,
        };
        assert!(equal.validate().is_ok());
    }

    #[test]
    fn test_paging_config_zero_max() {
        let config = PagingConfig {
            default_page_size: 0,
            max_page_size: 0,
        };
        assert_field(config.validate(), "paging.max_page_size");
    }

    #[test]
    fn test_paging_config_default_out_of_range() {
        for default_page_size in [0, 21] {
            let config = PagingConfig {
                default_page_size,
                max_page_size: 20,
            };
            assert_field(config.validate(), "paging.default_page_size");
        }
    }

    // ========================================================================
    // LinksConfig validation tests
    // ========================================================================

    #[test]
    fn test_links_config_valid_schemes() {
        for base_url in [
            "http://localhost:3000",
            "https://books.example.com/",
            "HTTP://127.0.0.1",
        ] {
            let config = LinksConfig {
                base_url: base_url.to_string(),
            };
            assert!(config.validate().is_ok(), "should be valid: {}", base_url);
        }
    }

    #[test]
    fn test_links_config_invalid() {
        for base_url in ["", "localhost:3000", "ftp://books", "http://", "https:///"] {
            let config = LinksConfig {
                base_url: base_url.to_string(),
            };
            assert_field(config.validate(), "links.base_url");
        }
    }

    // ========================================================================
    // Settings validation tests
    // ========================================================================

    #[test]
    fn test_settings_default_is_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_settings_reports_first_failure() {
        let settings = Settings {
            server: ServerConfig {
                port: 0,
                ..Default::default()
            },
            paging: PagingConfig {
                default_page_size: 0,
                max_page_size: 20,
            },
            ..Default::default()
        };
        assert_field(settings.validate(), "server.port");
    }

    #[test]
    fn test_settings_blank_application_name() {
        let settings = Settings {
            application: ApplicationConfig {
                name: String::new(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_field(settings.validate(), "application.name");
    }
}
