use std::path::PathBuf;

use crate::auth::JwtConfig;

/// Server configuration
///
/// Every value can be overridden through environment variables:
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | DATA_DIR | ./data | Database directory |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | NOTIFY_WEBHOOK_URL | (unset) | Low-stock alert webhook; log-only when unset |
/// | LOW_STOCK_RECIPIENT | inventory@breezebuy.local | Alert recipient address |
/// | JWT_SECRET | (generated) | Token signing secret, 32+ chars |
/// | JWT_EXPIRATION_MINUTES | 1440 | Token lifetime |
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the embedded database
    pub data_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// JWT configuration
    pub jwt: JwtConfig,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Webhook for low-stock alerts; alerts are logged when unset
    pub notify_webhook_url: Option<String>,
    /// Recipient address carried in low-stock alerts
    pub low_stock_recipient: String,
}

impl Config {
    /// Load configuration from environment variables, with defaults
    pub fn from_env() -> Self {
        Self {
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            notify_webhook_url: std::env::var("NOTIFY_WEBHOOK_URL").ok(),
            low_stock_recipient: std::env::var("LOW_STOCK_RECIPIENT")
                .unwrap_or_else(|_| "inventory@breezebuy.local".into()),
        }
    }

    /// Override the mutable parts, mostly for tests
    pub fn with_overrides(data_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.data_dir = data_dir.into();
        config.http_port = http_port;
        config
    }

    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("breezebuy.db")
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
