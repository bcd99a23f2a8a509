//! Configuration loading and validation for the storefront service.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any required variable is missing or invalid.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Minimum accepted length of `TOKEN_SECRET`, in bytes.
pub const MIN_TOKEN_SECRET_LEN: usize = 32;

/// Validated service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Port the HTTP server listens on.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// HMAC key used to sign bearer tokens. **Required.**
    pub token_secret: String,

    /// Lifetime of issued bearer tokens, in seconds.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,

    /// Page size used when a list request does not specify one.
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    /// Upper bound applied to any requested page size.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,

    /// Image name assigned to newly created products.
    #[serde(default = "default_product_image")]
    pub default_product_image: String,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// OTLP/gRPC collector endpoint. Span export is disabled when unset.
    #[serde(default)]
    pub otel_exporter_otlp_endpoint: Option<String>,

    /// Username of an admin account created at startup if it does not exist.
    #[serde(default)]
    pub bootstrap_admin_username: Option<String>,

    #[serde(default)]
    pub bootstrap_admin_email: Option<String>,

    #[serde(default)]
    pub bootstrap_admin_password: Option<String>,
}

fn default_listen_port() -> u16 {
    8080
}
fn default_token_ttl() -> u64 {
    172_800
}
fn default_page_size() -> u32 {
    50
}
fn default_max_page_size() -> u32 {
    200
}
fn default_product_image() -> String {
    "default.png".into()
}
fn default_log_level() -> String {
    "info".into()
}

/// Credentials for the startup admin account.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// The bootstrap admin, if all three of its variables are set.
    pub fn bootstrap_admin(&self) -> Option<BootstrapAdmin> {
        match (
            &self.bootstrap_admin_username,
            &self.bootstrap_admin_email,
            &self.bootstrap_admin_password,
        ) {
            (Some(username), Some(email), Some(password)) => Some(BootstrapAdmin {
                username: username.clone(),
                email: email.clone(),
                password: password.clone(),
            }),
            _ => None,
        }
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        ensure_non_empty(&self.token_secret, "TOKEN_SECRET")?;
        if self.token_secret.len() < MIN_TOKEN_SECRET_LEN {
            anyhow::bail!("TOKEN_SECRET must be at least {MIN_TOKEN_SECRET_LEN} bytes");
        }
        if self.token_ttl_secs == 0 {
            anyhow::bail!("TOKEN_TTL_SECS must be > 0");
        }
        if self.default_page_size == 0 {
            anyhow::bail!("DEFAULT_PAGE_SIZE must be > 0");
        }
        if self.max_page_size < self.default_page_size {
            anyhow::bail!("MAX_PAGE_SIZE must be >= DEFAULT_PAGE_SIZE");
        }
        ensure_non_empty(&self.default_product_image, "DEFAULT_PRODUCT_IMAGE")?;
        if let Some(endpoint) = &self.otel_exporter_otlp_endpoint {
            ensure_non_empty(endpoint, "OTEL_EXPORTER_OTLP_ENDPOINT")?;
        }

        let admin_vars = [
            self.bootstrap_admin_username.is_some(),
            self.bootstrap_admin_email.is_some(),
            self.bootstrap_admin_password.is_some(),
        ];
        if admin_vars.iter().any(|set| *set) && !admin_vars.iter().all(|set| *set) {
            anyhow::bail!(
                "BOOTSTRAP_ADMIN_USERNAME, BOOTSTRAP_ADMIN_EMAIL and BOOTSTRAP_ADMIN_PASSWORD must be set together"
            );
        }
        Ok(())
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} is required and must not be empty");
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        listen_port: default_listen_port(),
        token_secret: "test-secret-that-is-long-enough-for-hmac".into(),
        token_ttl_secs: default_token_ttl(),
        default_page_size: default_page_size(),
        max_page_size: default_max_page_size(),
        default_product_image: default_product_image(),
        log_level: default_log_level(),
        otel_exporter_otlp_endpoint: None,
        bootstrap_admin_username: None,
        bootstrap_admin_email: None,
        bootstrap_admin_password: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        assert_eq!(default_listen_port(), 8080);
        assert_eq!(default_token_ttl(), 172_800);
        assert_eq!(default_page_size(), 50);
        assert_eq!(default_max_page_size(), 200);
        assert_eq!(default_product_image(), "default.png");
        assert_eq!(default_log_level(), "info");
    }

    #[test]
    fn validate_accepts_test_config() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn validate_rejects_short_secret() {
        let cfg = Config {
            token_secret: "short".into(),
            ..test_config()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_page_size() {
        let cfg = Config {
            default_page_size: 0,
            ..test_config()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_partial_bootstrap_admin() {
        let cfg = Config {
            bootstrap_admin_username: Some("admin".into()),
            ..test_config()
        };
        assert!(cfg.validate().is_err());
        assert!(cfg.bootstrap_admin().is_none());
    }

    #[test]
    fn bootstrap_admin_when_complete() {
        let cfg = Config {
            bootstrap_admin_username: Some("admin".into()),
            bootstrap_admin_email: Some("admin@shop.example".into()),
            bootstrap_admin_password: Some("adminPass".into()),
            ..test_config()
        };
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.bootstrap_admin().unwrap().username, "admin");
    }
}
