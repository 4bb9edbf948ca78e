//! Runtime configuration.
//!
//! Values come from command-line flags with environment fallbacks; binaries
//! call `dotenvy::dotenv()` first so a local `.env` file is honoured.
//!
//! - `DATABASE_URL`: sqlx connection string (default: sqlite://clauson.db?mode=rwc)
//! - `CLAUSON_BIND_ADDR`: listen address (default: 0.0.0.0:8787)
//! - `CLAUSON_ADMIN_SECRET`: shared secret for admin endpoints (no default)
//! - `CLAUSON_MAX_CONNECTIONS`: pool size (default: 5)
//! - `CLAUSON_DEFAULT_LIMIT`: search page size when `limit` is omitted (default: 20)
//! - `CLAUSON_MAX_LIMIT`: upper bound for `limit` (default: 200)

use std::net::SocketAddr;

use clap::Args;

use crate::error::{DictionaryError, Result};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://clauson.db?mode=rwc";

/// Database connection settings shared by the server and the import CLI.
#[derive(Debug, Clone, Args)]
pub struct DatabaseConfig {
    /// sqlx connection string
    #[arg(long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    pub database_url: String,

    /// Maximum pooled connections
    #[arg(long, env = "CLAUSON_MAX_CONNECTIONS", default_value_t = 5)]
    pub max_connections: u32,
}

/// HTTP server settings.
#[derive(Debug, Clone, Args)]
pub struct ServerConfig {
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Address to listen on
    #[arg(long, env = "CLAUSON_BIND_ADDR", default_value = "0.0.0.0:8787")]
    pub bind_addr: SocketAddr,

    /// Shared secret expected in the X-Admin-Secret header
    #[arg(long, env = "CLAUSON_ADMIN_SECRET", hide_env_values = true)]
    pub admin_secret: Option<String>,

    #[command(flatten)]
    pub limits: SearchLimits,
}

impl ServerConfig {
    /// The admin secret, treating an empty value as unset.
    pub fn admin_secret(&self) -> Option<&str> {
        self.admin_secret
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Page-size bounds for list endpoints.
#[derive(Debug, Clone, Copy, Args)]
pub struct SearchLimits {
    /// Page size when `limit` is omitted
    #[arg(long, env = "CLAUSON_DEFAULT_LIMIT", default_value_t = 20)]
    pub default_limit: i64,

    /// Largest accepted `limit`
    #[arg(long, env = "CLAUSON_MAX_LIMIT", default_value_t = 200)]
    pub max_limit: i64,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            default_limit: 20,
            max_limit: 200,
        }
    }
}

impl SearchLimits {
    pub fn validate(&self) -> Result<()> {
        if self.max_limit < 1 || self.default_limit < 1 || self.default_limit > self.max_limit {
            return Err(DictionaryError::Config(format!(
                "invalid limits: default_limit={} max_limit={}",
                self.default_limit, self.max_limit
            )));
        }
        Ok(())
    }

    /// Resolve a requested page size, clamped to `[1, max_limit]`.
    pub fn resolve(&self, requested: Option<i64>) -> i64 {
        requested
            .unwrap_or(self.default_limit)
            .clamp(1, self.max_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        server: ServerConfig,
    }

    #[test]
    fn limits_are_clamped() {
        let limits = SearchLimits::default();
        assert_eq!(limits.resolve(None), 20);
        assert_eq!(limits.resolve(Some(0)), 1);
        assert_eq!(limits.resolve(Some(-5)), 1);
        assert_eq!(limits.resolve(Some(10_000)), 200);
    }

    #[test]
    fn inconsistent_limits_are_rejected() {
        let limits = SearchLimits {
            default_limit: 500,
            max_limit: 200,
        };
        assert!(limits.validate().is_err());
        assert!(SearchLimits::default().validate().is_ok());
    }

    #[test]
    fn blank_admin_secret_counts_as_unset() {
        let cli = TestCli::parse_from(["test", "--admin-secret", "  "]);
        assert_eq!(cli.server.admin_secret(), None);

        let cli = TestCli::parse_from(["test", "--admin-secret", "s3cret"]);
        assert_eq!(cli.server.admin_secret(), Some("s3cret"));
    }
}
