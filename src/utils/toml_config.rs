//! TOML-based configuration for the GPU Portal
//!
//! Infrastructure settings (server, auth, simulated latency, UI assets) live
//! in `gpu-portal.toml`.
//!
//! # Hot Reloading
//!
//! Configuration changes are automatically detected and applied at runtime.
//! Use `PortalConfigManager` for thread-safe access to the current configuration.

use arc_swap::ArcSwap;
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Minimum accepted length of the JWT signing secret.
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Root configuration structure loaded from gpu-portal.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortalConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    /// Simulated latency of the mock backend
    #[serde(default)]
    pub mock: MockConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Allowed CORS origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            cors_origins: Vec::new(),
        }
    }
}

// ============= Authentication Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Environment variable name containing the JWT secret
    #[serde(default = "default_jwt_secret_env")]
    pub jwt_secret_env: String,

    #[serde(default = "default_jwt_access_expiry")]
    pub jwt_access_expiry: i64,
}

fn default_jwt_secret_env() -> String {
    "JWT_SECRET".to_string()
}

fn default_jwt_access_expiry() -> i64 {
    900
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret_env: default_jwt_secret_env(),
            jwt_access_expiry: default_jwt_access_expiry(),
        }
    }
}

// ============= Mock Backend Configuration =============

/// Fixed delays, in milliseconds, standing in for network round trips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockConfig {
    #[serde(default = "default_auth_latency")]
    pub auth: u64,

    #[serde(default = "default_notifications_latency")]
    pub notifications: u64,

    #[serde(default = "default_page_load_latency")]
    pub page_load: u64,

    #[serde(default = "default_request_form_latency")]
    pub request_form: u64,

    #[serde(default = "default_submit_request_latency")]
    pub submit_request: u64,

    #[serde(default = "default_profile_save_latency")]
    pub profile_save: u64,
}

fn default_auth_latency() -> u64 {
    1000
}

fn default_notifications_latency() -> u64 {
    1000
}

fn default_page_load_latency() -> u64 {
    1000
}

fn default_request_form_latency() -> u64 {
    800
}

fn default_submit_request_latency() -> u64 {
    1500
}

fn default_profile_save_latency() -> u64 {
    1000
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            auth: default_auth_latency(),
            notifications: default_notifications_latency(),
            page_load: default_page_load_latency(),
            request_form: default_request_form_latency(),
            submit_request: default_submit_request_latency(),
            profile_save: default_profile_save_latency(),
        }
    }
}

impl MockConfig {
    /// No simulated latency at all (tests, benchmarks).
    pub fn instant() -> Self {
        Self {
            auth: 0,
            notifications: 0,
            page_load: 0,
            request_form: 0,
            submit_request: 0,
            profile_save: 0,
        }
    }
}

// ============= UI Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Built UI assets served from disk when the binary has no embedded UI
    #[serde(default = "default_dist_dir")]
    pub dist_dir: PathBuf,
}

fn default_dist_dir() -> PathBuf {
    PathBuf::from("ui/dist")
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            dist_dir: default_dist_dir(),
        }
    }
}

// ============= Configuration Loading & Validation =============

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),

    #[error("Watch error: {0}")]
    WatchError(#[from] notify::Error),
}

impl PortalConfig {
    /// Load and validate configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::parse_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file without validating it
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Validate against the process environment
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_with(|name| std::env::var(name).ok())
    }

    /// Validate, resolving env var references through `lookup`
    pub fn validate_with<F>(&self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be non-zero".to_string(),
            ));
        }

        if self.auth.jwt_access_expiry <= 0 {
            return Err(ConfigError::ValidationError(
                "auth.jwt_access_expiry must be positive".to_string(),
            ));
        }

        let secret = lookup(&self.auth.jwt_secret_env)
            .ok_or_else(|| ConfigError::MissingEnvVar(self.auth.jwt_secret_env.clone()))?;
        if secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::ValidationError(format!(
                "{} must be at least {} characters",
                self.auth.jwt_secret_env, MIN_JWT_SECRET_LEN
            )));
        }

        Ok(())
    }

    /// Get the JWT secret from the environment
    pub fn jwt_secret(&self) -> Result<String, ConfigError> {
        std::env::var(&self.auth.jwt_secret_env)
            .map_err(|_| ConfigError::MissingEnvVar(self.auth.jwt_secret_env.clone()))
    }

    /// `host:port` the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

// ============= Hot Reloading Configuration Manager =============

/// Thread-safe configuration manager with hot reloading support
pub struct PortalConfigManager {
    config: Arc<ArcSwap<PortalConfig>>,
    config_path: PathBuf,
    watcher: RwLock<Option<RecommendedWatcher>>,
    reload_tx: Option<mpsc::UnboundedSender<()>>,
}

impl PortalConfigManager {
    /// Create a new configuration manager and load the initial config
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        // Absolute path for reliable file watching
        let path = path.as_ref();
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map_err(ConfigError::ReadError)?
                .join(path)
        };

        let config = PortalConfig::load(&path)?;

        Ok(Self {
            config: Arc::new(ArcSwap::from_pointee(config)),
            config_path: path,
            watcher: RwLock::new(None),
            reload_tx: None,
        })
    }

    /// Create a config manager directly from a config, without file watching
    pub fn from_config(config: PortalConfig) -> Self {
        Self {
            config: Arc::new(ArcSwap::from_pointee(config)),
            config_path: PathBuf::from("gpu-portal.toml"),
            watcher: RwLock::new(None),
            reload_tx: None,
        }
    }

    /// Get the current configuration (lockless read)
    pub fn config(&self) -> Arc<PortalConfig> {
        self.config.load_full()
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Manually reload the configuration from disk
    pub fn reload(&self) -> Result<(), ConfigError> {
        info!("Reloading configuration from {:?}", self.config_path);

        let new_config = PortalConfig::load(&self.config_path)?;
        self.config.store(Arc::new(new_config));

        info!("Configuration reloaded successfully");
        Ok(())
    }

    /// Start watching for configuration file changes
    pub fn start_watching(&mut self) -> Result<(), ConfigError> {
        let (tx, mut rx) = mpsc::unbounded_channel::<()>();
        self.reload_tx = Some(tx.clone());

        let config_path = self.config_path.clone();
        let config_arc = Arc::clone(&self.config);

        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        // Debounced in the receiver
                        let _ = tx.send(());
                    }
                }
                Err(e) => {
                    error!("Config watcher error: {:?}", e);
                }
            }
        })?;

        // Editors replace files, so watch the parent directory
        if let Some(parent) = self.config_path.parent() {
            watcher.watch(parent, RecursiveMode::NonRecursive)?;
        }

        *self.watcher.write() = Some(watcher);

        tokio::spawn(async move {
            let mut last_reload: Option<std::time::Instant> = None;
            let debounce_duration = Duration::from_millis(500);

            while rx.recv().await.is_some() {
                if last_reload.is_some_and(|at| at.elapsed() < debounce_duration) {
                    continue;
                }

                // Let the writer finish
                tokio::time::sleep(Duration::from_millis(100)).await;

                match PortalConfig::load(&config_path) {
                    Ok(new_config) => {
                        config_arc.store(Arc::new(new_config));
                        info!("Configuration hot-reloaded successfully");
                        last_reload = Some(std::time::Instant::now());
                    }
                    Err(e) => {
                        warn!(
                            "Failed to hot-reload config: {}. Keeping previous config.",
                            e
                        );
                    }
                }
            }
        });

        info!("Configuration hot-reload watcher started");
        Ok(())
    }

    /// Stop watching for configuration changes
    pub fn stop_watching(&self) {
        *self.watcher.write() = None;
        info!("Configuration hot-reload watcher stopped");
    }
}

impl Clone for PortalConfigManager {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            config_path: self.config_path.clone(),
            watcher: RwLock::new(None), // Watcher is not cloned
            reload_tx: self.reload_tx.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SECRET: &str = "test-secret-key-that-is-at-least-32-chars";

    fn env_with_secret(name: &str) -> Option<String> {
        (name == "TEST_JWT_SECRET").then(|| SECRET.to_string())
    }

    fn create_test_config() -> String {
        r#"
[server]
host = "0.0.0.0"
port = 8080
log_level = "debug"
log_format = "json"
cors_origins = ["http://localhost:8081"]

[auth]
jwt_secret_env = "TEST_JWT_SECRET"
jwt_access_expiry = 600

[mock]
auth = 10
submit_request = 20

[ui]
dist_dir = "web/dist"
"#
        .to_string()
    }

    #[test]
    fn test_parse_config() {
        let config: PortalConfig = toml::from_str(&create_test_config()).unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.log_format, LogFormat::Json);
        assert_eq!(config.server.cors_origins, ["http://localhost:8081"]);
        assert_eq!(config.auth.jwt_access_expiry, 600);
        assert_eq!(config.mock.auth, 10);
        assert_eq!(config.mock.submit_request, 20);
        // Unset latencies keep their defaults
        assert_eq!(config.mock.request_form, 800);
        assert_eq!(config.ui.dist_dir, PathBuf::from("web/dist"));
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_defaults() {
        let config: PortalConfig = toml::from_str("").unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.log_level, "info");
        assert_eq!(config.server.log_format, LogFormat::Pretty);
        assert!(config.server.cors_origins.is_empty());

        assert_eq!(config.auth.jwt_secret_env, "JWT_SECRET");
        assert_eq!(config.auth.jwt_access_expiry, 900);

        assert_eq!(config.mock, MockConfig::default());
        assert_eq!(config.mock.auth, 1000);
        assert_eq!(config.mock.page_load, 1000);
        assert_eq!(config.mock.request_form, 800);
        assert_eq!(config.mock.submit_request, 1500);
        assert_eq!(config.mock.profile_save, 1000);

        assert_eq!(config.ui.dist_dir, PathBuf::from("ui/dist"));
    }

    #[test]
    fn test_unknown_log_format_is_rejected() {
        let result = toml::from_str::<PortalConfig>("[server]\nlog_format = \"xml\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_passes_with_secret() {
        let config: PortalConfig = toml::from_str(&create_test_config()).unwrap();
        assert!(config.validate_with(env_with_secret).is_ok());
    }

    #[test]
    fn test_validation_missing_secret() {
        let config: PortalConfig = toml::from_str(&create_test_config()).unwrap();
        let result = config.validate_with(|_| None);
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(name)) if name == "TEST_JWT_SECRET"));
    }

    #[test]
    fn test_validation_short_secret() {
        let config: PortalConfig = toml::from_str(&create_test_config()).unwrap();
        let result = config.validate_with(|_| Some("too-short".to_string()));
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validation_zero_port() {
        let mut config: PortalConfig = toml::from_str(&create_test_config()).unwrap();
        config.server.port = 0;
        let result = config.validate_with(env_with_secret);
        assert!(matches!(result, Err(ConfigError::ValidationError(msg)) if msg.contains("port")));
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let result = PortalConfig::load(temp_dir.path().join("nope.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("gpu-portal.toml");
        fs::write(&path, "[server\nport = ").expect("Failed to write");

        assert!(matches!(
            PortalConfig::load(&path),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_config_manager_from_config() {
        let config: PortalConfig = toml::from_str(&create_test_config()).unwrap();

        let manager = PortalConfigManager::from_config(config.clone());
        let loaded = manager.config();

        assert_eq!(loaded.server.host, config.server.host);
        assert_eq!(loaded.server.port, config.server.port);

        let cloned = manager.clone();
        assert_eq!(cloned.config().mock, config.mock);
    }

    #[test]
    fn test_instant_mock_has_no_delay() {
        let mock = MockConfig::instant();
        assert_eq!(
            [
                mock.auth,
                mock.notifications,
                mock.page_load,
                mock.request_form,
                mock.submit_request,
                mock.profile_save
            ],
            [0; 6]
        );
    }
}
