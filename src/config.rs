use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub admin_token_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub db_busy_timeout: Duration,
    pub request_timeout: Duration,
    /// Allowed CORS origins. `None` allows any origin.
    pub cors_allowed_origins: Option<Vec<String>>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "data/app.db".into())
                .into(),
            admin_token_path: env::var("ADMIN_TOKEN_PATH")
                .unwrap_or_else(|_| "data/admin.token".into())
                .into(),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: parsed("PORT", "8080")?,
            db_max_connections: parsed("DB_MAX_CONNECTIONS", "5")?,
            db_busy_timeout: Duration::from_millis(parsed("DB_BUSY_TIMEOUT_MS", "5000")?),
            request_timeout: Duration::from_secs(parsed("REQUEST_TIMEOUT_SECS", "15")?),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .map(|v| split_origins(&v))
                .filter(|origins| !origins.is_empty()),
        })
    }

    /// Default settings with the given file paths.
    #[cfg(test)]
    pub fn with_paths(database_path: impl Into<PathBuf>, admin_token_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            admin_token_path: admin_token_path.into(),
            host: "127.0.0.1".into(),
            port: 8080,
            db_max_connections: 5,
            db_busy_timeout: Duration::from_millis(5000),
            request_timeout: Duration::from_secs(15),
            cors_allowed_origins: None,
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parsed<T>(key: &str, default: &str) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = env::var(key).unwrap_or_else(|_| default.into());
    raw.parse()
        .map_err(|e| anyhow::anyhow!("Invalid value for env var {}: {:?} ({})", key, raw, e))
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
