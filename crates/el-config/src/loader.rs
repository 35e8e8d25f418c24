//! Configuration loader with file and environment variable support

use crate::{AppConfig, ConfigError};
use std::env;
use std::path::PathBuf;
use tracing::info;

/// Standard config file search paths
const CONFIG_PATHS: &[&str] = &[
    "config.toml",
    "application.toml",
    "entrelaunch.toml",
    "./config/config.toml",
    "./config/application.toml",
    "/etc/entrelaunch/config.toml",
];

/// Configuration loader
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Create a loader with a specific config file path
    pub fn with_path<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            config_path: Some(path.into()),
        }
    }

    /// Load configuration from file (if found) with environment variable
    /// overrides, then validate mandatory sections.
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        // Start with defaults
        let mut config = AppConfig::default();

        // Try to load from file
        if let Some(path) = self.find_config_file() {
            info!(?path, "Loading configuration from file");
            config = AppConfig::from_file(&path)?;
        }

        // Apply environment variable overrides
        self.apply_env_overrides(&mut config);

        config.validate()?;

        Ok(config)
    }

    /// Find the configuration file to use
    fn find_config_file(&self) -> Option<PathBuf> {
        // Check explicit path first
        if let Some(path) = &self.config_path {
            if path.exists() {
                return Some(path.clone());
            }
        }

        // Check EL_CONFIG env var
        if let Ok(path) = env::var("EL_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        // Search standard paths
        for path in CONFIG_PATHS {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        None
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&self, config: &mut AppConfig) {
        // HTTP
        if let Ok(val) = env::var("EL_HTTP_PORT") {
            if let Ok(port) = val.parse() {
                config.http.port = port;
            }
        }
        if let Ok(val) = env::var("EL_HTTP_HOST") {
            config.http.host = val;
        }
        if let Ok(val) = env::var("EL_CORS_ORIGINS") {
            config.http.cors_origins = val.split(',').map(|s| s.trim().to_string()).collect();
        }

        // Postgres
        if let Ok(val) = env::var("EL_POSTGRES_URL") {
            config.postgres.url = val;
        }
        if let Ok(val) = env::var("EL_POSTGRES_MAX_CONNECTIONS") {
            if let Ok(n) = val.parse() {
                config.postgres.max_connections = n;
            }
        }

        // Auth
        if let Ok(val) = env::var("EL_JWT_SECRET") {
            config.auth.jwt_secret = val;
        }
        if let Ok(val) = env::var("EL_JWT_ISSUER") {
            config.auth.issuer = val;
        }

        // Tasks
        if let Ok(val) = env::var("EL_TASK_POLL_INTERVAL_SECS") {
            if let Ok(secs) = val.parse() {
                config.tasks.poll_interval_secs = secs;
            }
        }
        if let Ok(val) = env::var("EL_TASK_LOCK_KEY") {
            config.tasks.lock_key = val;
        }
        if let Ok(val) = env::var("EL_RETENTION_DAYS") {
            if let Ok(days) = val.parse() {
                config.tasks.retention_days = days;
            }
        }

        // Gateway
        if let Ok(val) = env::var("EL_GATEWAY_SERVER_KEY") {
            config.gateway.server_key = val;
        }
        if let Ok(val) = env::var("EL_GATEWAY_PROFILE_ID") {
            if let Ok(id) = val.parse() {
                config.gateway.profile_id = id;
            }
        }

        if let Ok(val) = env::var("EL_DEV_MODE") {
            config.dev_mode = val == "true" || val == "1";
        }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[postgres]
url = "postgres://localhost:5432/el_test"

[tasks.enabled]
token_cleanup = true
"#
        )
        .unwrap();

        let loader = ConfigLoader::with_path(file.path());
        let config = loader.load().unwrap();
        assert_eq!(config.postgres.url, "postgres://localhost:5432/el_test");
        assert!(config.tasks.is_enabled("token_cleanup"));
        assert!(!config.tasks.is_enabled("subscription_cleanup"));
        // Unspecified sections keep their defaults
        assert_eq!(config.http.port, 8080);
    }

    #[test]
    fn test_missing_file_without_env_fails_validation() {
        let loader = ConfigLoader::with_path("/nonexistent/entrelaunch.toml");
        // No postgres url from any source
        if env::var("EL_POSTGRES_URL").is_err() {
            assert!(matches!(
                loader.load(),
                Err(ConfigError::MissingSection("postgres"))
            ));
        }
    }
}
