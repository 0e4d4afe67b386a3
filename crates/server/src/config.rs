//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `MAPBOX_ACCESS_TOKEN` - Access credential for the Mapbox Directions API
//!
//! ## Optional
//! - `GEOMINT_HOST` - Bind address (default: 127.0.0.1)
//! - `GEOMINT_PORT` - Listen port (default: 3000)
//! - `MAPBOX_API_BASE` - Directions API base URL (default: <https://api.mapbox.com>)
//! - `GEOMINT_FALLBACK_LAT` / `GEOMINT_FALLBACK_LNG` - Coordinate used when
//!   location tracking fails (default: central Delhi)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, SocketAddr};

use geomint_core::Coordinate;
use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct GeomintConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Mapbox Directions API configuration
    pub mapbox: MapboxConfig,
    /// Coordinate published when location tracking fails
    pub fallback_location: Coordinate,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag (e.g., production, staging)
    pub sentry_environment: Option<String>,
}

/// Mapbox Directions API configuration.
///
/// Implements `Debug` manually to redact the access credential.
#[derive(Clone)]
pub struct MapboxConfig {
    /// Base URL of the API (overridable for tests)
    pub api_base: String,
    /// Access token (never logged)
    pub access_token: SecretString,
}

impl std::fmt::Debug for MapboxConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapboxConfig")
            .field("api_base", &self.api_base)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

/// Default fallback coordinate: central Delhi.
const DEFAULT_FALLBACK_LAT: &str = "28.4996139";
const DEFAULT_FALLBACK_LNG: &str = "77.2457196";

impl GeomintConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env_or_default::<IpAddr>("GEOMINT_HOST", "127.0.0.1")?;
        let port = parse_env_or_default::<u16>("GEOMINT_PORT", "3000")?;

        let mapbox = MapboxConfig::from_env()?;

        let fallback_location = Coordinate::new(
            parse_env_or_default::<f64>("GEOMINT_FALLBACK_LAT", DEFAULT_FALLBACK_LAT)?,
            parse_env_or_default::<f64>("GEOMINT_FALLBACK_LNG", DEFAULT_FALLBACK_LNG)?,
        );

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            host,
            port,
            mapbox,
            fallback_location,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl MapboxConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let api_base = get_env_or_default("MAPBOX_API_BASE", "https://api.mapbox.com");

        // Reject malformed base URLs up front; the directions client builds
        // request URLs from this value without revalidating it.
        url::Url::parse(&api_base).map_err(|e| {
            ConfigError::InvalidEnvVar("MAPBOX_API_BASE".to_string(), e.to_string())
        })?;

        let token = get_required_env("MAPBOX_ACCESS_TOKEN")?;
        if token.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "MAPBOX_ACCESS_TOKEN".to_string(),
                "must not be empty".to_string(),
            ));
        }

        Ok(Self {
            api_base,
            access_token: SecretString::from(token),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get an environment variable parsed into `T`, falling back to a default.
fn parse_env_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> GeomintConfig {
        GeomintConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            mapbox: MapboxConfig {
                api_base: "https://api.mapbox.com".to_string(),
                access_token: SecretString::from("pk.test-token-value"),
            },
            fallback_location: Coordinate::new(28.4996139, 77.2457196),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    #[test]
    fn test_socket_addr() {
        let config = test_config();
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_mapbox_config_debug_redacts_token() {
        let config = test_config();
        let debug_output = format!("{:?}", config.mapbox);

        assert!(debug_output.contains("api.mapbox.com"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("pk.test-token-value"));
    }

    #[test]
    fn test_fallback_defaults_parse() {
        let lat: f64 = DEFAULT_FALLBACK_LAT.parse().unwrap();
        let lng: f64 = DEFAULT_FALLBACK_LNG.parse().unwrap();
        assert!((lat - 28.4996139).abs() < f64::EPSILON);
        assert!((lng - 77.2457196).abs() < f64::EPSILON);
    }
}
