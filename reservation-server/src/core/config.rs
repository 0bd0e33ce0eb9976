use super::error::ServerError;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | DATABASE_PATH | reservations.db | SQLite database file |
/// | HTTP_PORT | 3000 | HTTP listen port |
/// | ENVIRONMENT | development | development / staging / production |
/// | LOG_LEVEL | info | tracing max level |
/// | LOG_DIR | (unset) | directory for daily rolling log files |
/// | MAX_UPLOAD_BYTES | 5242880 | request body limit for CSV uploads |
/// | SHUTDOWN_TIMEOUT_MS | 10000 | grace period after Ctrl-C |
///
/// # Example
///
/// ```ignore
/// DATABASE_PATH=/data/reservations.db HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database file
    pub database_path: String,
    /// HTTP API port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// Max tracing level
    pub log_level: String,
    /// Rolling log file directory; stdout only when unset
    pub log_dir: Option<String>,
    /// Request body limit for multipart uploads
    pub max_upload_bytes: usize,
    /// Graceful shutdown timeout (ms)
    pub shutdown_timeout_ms: u64,
}

/// Default request body limit (5MB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

impl Config {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "reservations.db".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
            max_upload_bytes: std::env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            shutdown_timeout_ms: std::env::var("SHUTDOWN_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10000),
        }
    }

    /// Override the database file and port
    ///
    /// Used by tests
    pub fn with_overrides(database_path: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.database_path = database_path.into();
        config.http_port = http_port;
        config
    }

    /// Reject settings the server cannot start with
    pub fn validate(&self) -> Result<(), ServerError> {
        if !matches!(
            self.environment.as_str(),
            "development" | "staging" | "production"
        ) {
            return Err(ServerError::Config(format!(
                "ENVIRONMENT must be development, staging or production, got '{}'",
                self.environment
            )));
        }
        if self.max_upload_bytes == 0 {
            return Err(ServerError::Config(
                "MAX_UPLOAD_BYTES must be greater than 0".into(),
            ));
        }
        if self.database_path.trim().is_empty() {
            return Err(ServerError::Config("DATABASE_PATH must not be empty".into()));
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
