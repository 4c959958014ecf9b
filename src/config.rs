use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::PortalError;

const DEFAULT_DATABASE_URL: &str = "sqlite://portal.db";
const DEFAULT_SITE_URL: &str = "http://localhost:3000";
const MAX_SESSION_TTL_HOURS: i64 = 24 * 366;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub jwt_secret: String,
    pub session_ttl_hours: i64,
    pub site_url: String,
    pub stripe_secret_key: String,
    pub stripe_api_base: String,
    pub storage_root: String,
    pub storage_public_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            server_host: "0.0.0.0".to_string(),
            server_port: 3000,
            jwt_secret: String::new(),
            session_ttl_hours: 12,
            site_url: DEFAULT_SITE_URL.to_string(),
            stripe_secret_key: String::new(),
            stripe_api_base: "https://api.stripe.com".to_string(),
            storage_root: "./storage".to_string(),
            storage_public_url: format!("{}/storage", DEFAULT_SITE_URL),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, an optional TOML file, then `PORTAL_*`
    /// environment variables (highest precedence).
    pub fn load(config_path: Option<&Path>) -> Result<Self, PortalError> {
        let defaults = AppConfig::default();
        let file = config_path
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_else(|| "portal.toml".to_string());

        let settings = config::Config::builder()
            .set_default("database_url", defaults.database_url)
            .and_then(|b| b.set_default("server_host", defaults.server_host))
            .and_then(|b| b.set_default("server_port", defaults.server_port as i64))
            .and_then(|b| b.set_default("jwt_secret", defaults.jwt_secret))
            .and_then(|b| b.set_default("session_ttl_hours", defaults.session_ttl_hours))
            .and_then(|b| b.set_default("site_url", defaults.site_url))
            .and_then(|b| b.set_default("stripe_secret_key", defaults.stripe_secret_key))
            .and_then(|b| b.set_default("stripe_api_base", defaults.stripe_api_base))
            .and_then(|b| b.set_default("storage_root", defaults.storage_root))
            .and_then(|b| b.set_default("storage_public_url", defaults.storage_public_url))
            .map_err(config_error)?
            .add_source(config::File::with_name(&file).required(false))
            .add_source(config::Environment::with_prefix("PORTAL").try_parsing(true))
            .build()
            .map_err(config_error)?;

        let config: AppConfig = settings.try_deserialize().map_err(config_error)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PortalError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(PortalError::ConfigError(
                "jwt_secret must be set (PORTAL_JWT_SECRET)".to_string(),
            ));
        }

        if self.session_ttl_hours <= 0 || self.session_ttl_hours > MAX_SESSION_TTL_HOURS {
            return Err(PortalError::ConfigError(format!(
                "session_ttl_hours ({}) must be between 1 and {}",
                self.session_ttl_hours, MAX_SESSION_TTL_HOURS
            )));
        }

        if !(self.site_url.starts_with("http://") || self.site_url.starts_with("https://")) {
            return Err(PortalError::ConfigError(format!(
                "site_url must be an http(s) URL, got {}",
                self.site_url
            )));
        }

        if self.stripe_secret_key.is_empty() {
            tracing::warn!("stripe_secret_key is empty; donations will fail at checkout");
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn config_error(err: config::ConfigError) -> PortalError {
    PortalError::ConfigError(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> AppConfig {
        AppConfig {
            jwt_secret: "secret".to_string(),
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_missing_jwt_secret_rejected() {
        let config = AppConfig::default();
        assert!(matches!(config.validate(), Err(PortalError::ConfigError(_))));
    }

    #[test]
    fn test_zero_session_ttl_rejected() {
        let config = AppConfig {
            session_ttl_hours: 0,
            ..valid()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_oversized_session_ttl_rejected() {
        for hours in [MAX_SESSION_TTL_HOURS + 1, 2_000_000_000_000, i64::MAX] {
            let config = AppConfig {
                session_ttl_hours: hours,
                ..valid()
            };
            assert!(matches!(config.validate(), Err(PortalError::ConfigError(_))), "{}", hours);
        }

        let one_year = AppConfig {
            session_ttl_hours: MAX_SESSION_TTL_HOURS,
            ..valid()
        };
        assert!(one_year.validate().is_ok());
    }

    #[test]
    fn test_non_http_site_url_rejected() {
        let config = AppConfig {
            site_url: "ftp://example.org".to_string(),
            ..valid()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bind_address() {
        assert_eq!(valid().bind_address(), "0.0.0.0:3000");
    }
}
