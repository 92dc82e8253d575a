//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `PLATA_CHECKOUT_URL` - Messaging endpoint checkout links point at
//!   (e.g., `https://wa.me/56912345678`)
//!
//! ## Optional
//! - `PLATA_CHECKOUT_GREETING` - Opening line of the checkout message
//! - `PLATA_CATALOG_FILE` - JSON product catalog (default: no products)
//! - `STOREFRONT_DATABASE_URL` - `SQLite` database for sessions
//!   (default: `sqlite://plata.db`)
//! - `STOREFRONT_DATABASE_MAX_CONNECTIONS` - Pool size (default: 5)
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront (default: <http://localhost:3000>)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use plata_core::{CheckoutLinkBuilder, DEFAULT_GREETING};
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// `SQLite` connection string for the session database
    pub database_url: String,
    /// Maximum pooled database connections
    pub database_max_connections: u32,
    /// Product catalog file, if any
    pub catalog_path: Option<PathBuf>,
    /// Checkout link builder for the configured endpoint and greeting
    pub checkout: CheckoutLinkBuilder,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name (e.g., production, staging)
    pub sentry_environment: Option<String>,
}

impl StorefrontConfig {
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

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let base_url = get_env_or_default("STOREFRONT_BASE_URL", "http://localhost:3000");

        let database_url = get_env_or_default("STOREFRONT_DATABASE_URL", "sqlite://plata.db");
        let database_max_connections = get_env_or_default("STOREFRONT_DATABASE_MAX_CONNECTIONS", "5")
            .parse::<u32>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar(
                    "STOREFRONT_DATABASE_MAX_CONNECTIONS".to_string(),
                    e.to_string(),
                )
            })?;
        let catalog_path = get_optional_env("PLATA_CATALOG_FILE").map(PathBuf::from);

        let checkout = parse_checkout(
            &get_required_env("PLATA_CHECKOUT_URL")?,
            get_env_or_default("PLATA_CHECKOUT_GREETING", DEFAULT_GREETING),
        )?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            host,
            port,
            base_url,
            database_url,
            database_max_connections,
            catalog_path,
            checkout,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the storefront is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
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

/// Build the checkout link builder from the endpoint and greeting.
fn parse_checkout(endpoint: &str, greeting: String) -> Result<CheckoutLinkBuilder, ConfigError> {
    CheckoutLinkBuilder::parse(endpoint)
        .map(|builder| builder.with_greeting(greeting))
        .map_err(|e| ConfigError::InvalidEnvVar("PLATA_CHECKOUT_URL".to_string(), e.to_string()))
}
