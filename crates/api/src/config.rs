/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Directory the static frontend is served from.
    pub static_dir: String,
    /// External estimator invocation settings.
    pub estimator: EstimatorConfig,
}

/// Configuration for launching the external estimator script.
#[derive(Debug, Clone)]
pub struct EstimatorConfig {
    /// Program to execute (default: `python3`).
    pub command: String,
    /// Script path passed as the first argument (`None` to run the
    /// command bare, as hermetic tests do).
    pub script: Option<String>,
    /// Working directory for the estimator process.
    pub working_dir: Option<String>,
    /// Wall-clock timeout before the process is killed (default: `600`).
    pub timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                 |
    /// |--------------------------|-------------------------|
    /// | `HOST`                   | `0.0.0.0`               |
    /// | `PORT`                   | `3000`                  |
    /// | `CORS_ORIGINS`           | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                    |
    /// | `STATIC_DIR`             | `crates/api/static`     |
    /// | `ESTIMATOR_COMMAND`      | `python3`               |
    /// | `ESTIMATOR_SCRIPT`       | `scripts/estimate.py`   |
    /// | `ESTIMATOR_WORKING_DIR`  | (unset)                 |
    /// | `ESTIMATOR_TIMEOUT_SECS` | `600`                   |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let static_dir =
            std::env::var("STATIC_DIR").unwrap_or_else(|_| "crates/api/static".into());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            static_dir,
            estimator: EstimatorConfig::from_env(),
        }
    }
}

impl EstimatorConfig {
    fn from_env() -> Self {
        let command = std::env::var("ESTIMATOR_COMMAND").unwrap_or_else(|_| "python3".into());

        let script = Some(
            std::env::var("ESTIMATOR_SCRIPT").unwrap_or_else(|_| "scripts/estimate.py".into()),
        );

        let working_dir = std::env::var("ESTIMATOR_WORKING_DIR").ok();

        let timeout_secs: u64 = std::env::var("ESTIMATOR_TIMEOUT_SECS")
            .unwrap_or_else(|_| "600".into())
            .parse()
            .expect("ESTIMATOR_TIMEOUT_SECS must be a valid u64");

        Self {
            command,
            script,
            working_dir,
            timeout_secs,
        }
    }
}
