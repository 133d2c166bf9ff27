//! Server configuration.

use std::env;

/// `DATABASE_URL` value that selects the in-memory store.
pub const MEMORY_DATABASE_URL: &str = "memory";

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Database URL, or `memory` for the in-memory store.
    pub database_url: String,
    /// Log level.
    pub log_level: String,
    /// Minimum accepted password length.
    pub password_min_length: usize,
    /// Superuser created at startup if no account has this email.
    pub superuser_email: Option<String>,
    /// Password for `superuser_email`.
    pub superuser_password: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            database_url: "sqlite:recipes.db?mode=rwc".to_string(),
            log_level: "info".to_string(),
            password_min_length: auth::DEFAULT_PASSWORD_MIN_LENGTH,
            superuser_email: None,
            superuser_password: None,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let port = match env::var("RECIPE_SERVER_PORT") {
            Ok(value) => value
                .parse()
                .map_err(|_| anyhow::anyhow!("RECIPE_SERVER_PORT is not a valid port: {value}"))?,
            Err(_) => defaults.port,
        };

        let password_min_length = match env::var("RECIPE_PASSWORD_MIN_LENGTH") {
            Ok(value) => value.parse().map_err(|_| {
                anyhow::anyhow!("RECIPE_PASSWORD_MIN_LENGTH is not a number: {value}")
            })?,
            Err(_) => defaults.password_min_length,
        };

        Ok(Self {
            host: env::var("RECIPE_SERVER_HOST").unwrap_or(defaults.host),
            port,
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            log_level: env::var("RECIPE_LOG_LEVEL").unwrap_or(defaults.log_level),
            password_min_length,
            superuser_email: env::var("RECIPE_SUPERUSER_EMAIL").ok(),
            superuser_password: env::var("RECIPE_SUPERUSER_PASSWORD").ok(),
        })
    }

    /// Returns the server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the superuser credentials when both are configured.
    pub fn superuser_credentials(&self) -> Option<(&str, &str)> {
        match (&self.superuser_email, &self.superuser_password) {
            (Some(email), Some(password)) => Some((email.as_str(), password.as_str())),
            _ => None,
        }
    }

    /// Returns true if the in-memory store was requested.
    pub fn use_memory_store(&self) -> bool {
        self.database_url == MEMORY_DATABASE_URL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        // SAFETY: no other test in this crate touches these variables
        unsafe {
            env::remove_var("RECIPE_SERVER_PORT");
            env::remove_var("RECIPE_PASSWORD_MIN_LENGTH");
        }

        let config = Config::from_env().unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.password_min_length, 5);
    }

    #[test]
    fn test_memory_store_selection() {
        let config = Config {
            database_url: MEMORY_DATABASE_URL.to_string(),
            ..Config::default()
        };
        assert!(config.use_memory_store());
        assert!(!Config::default().use_memory_store());
        assert_eq!(Config::default().server_addr(), "0.0.0.0:8000");
    }
}
