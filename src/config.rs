use std::env;
use std::fmt;

/// Raised when an environment variable is missing or cannot be parsed.
#[derive(Debug)]
pub struct ConfigError(pub String);

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Configuration error: {}", self.0)
    }
}

impl std::error::Error for ConfigError {}

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub server_host: String,
    pub server_port: u16,
    /// Signing secret. Absence is only reported when a token is first issued or verified.
    pub jwt_secret: Option<String>,
    /// Token lifetime, e.g. `3600`, `1h` or `7d`.
    pub jwt_expires_in: Option<String>,
    pub cors_origin: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| ConfigError("DATABASE_URL must be set".into()))?;

        Ok(Self {
            database_url,
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", 25)?,
            db_min_connections: parse_var("DB_MIN_CONNECTIONS", 7)?,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: parse_var("PORT", 3500)?,
            jwt_secret: non_empty_var("JWT_SECRET"),
            jwt_expires_in: non_empty_var("JWT_EXPIRES_IN"),
            cors_origin: env::var("CORS_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_var<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError(format!("{} must be a number, got {:?}", key, raw))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test so the process-wide environment is not mutated concurrently.
    #[test]
    fn test_config_from_env() {
        env::set_var("DATABASE_URL", "postgres://test");
        env::remove_var("PORT");
        env::remove_var("SERVER_HOST");
        env::remove_var("DB_MAX_CONNECTIONS");
        env::remove_var("DB_MIN_CONNECTIONS");
        env::set_var("JWT_SECRET", "");

        let config = Config::from_env().unwrap();

        assert_eq!(config.database_url, "postgres://test");
        assert_eq!(config.server_port, 3500);
        assert_eq!(config.server_host, "127.0.0.1");
        assert_eq!(config.db_max_connections, 25);
        assert_eq!(config.db_min_connections, 7);
        assert!(config.jwt_secret.is_none());
        assert_eq!(config.server_url(), "http://127.0.0.1:3500");

        env::set_var("PORT", "4000");
        env::set_var("SERVER_HOST", "0.0.0.0");
        env::set_var("JWT_SECRET", "s3cret");

        let config = Config::from_env().unwrap();

        assert_eq!(config.server_port, 4000);
        assert_eq!(config.server_host, "0.0.0.0");
        assert_eq!(config.jwt_secret.as_deref(), Some("s3cret"));

        env::set_var("PORT", "not-a-port");
        assert!(Config::from_env().is_err());

        env::remove_var("PORT");
        env::remove_var("SERVER_HOST");
        env::remove_var("JWT_SECRET");
    }
}
