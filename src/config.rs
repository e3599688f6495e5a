//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub market: MarketConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory served as static assets (page markup, scripts)
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_static_dir() -> String {
    "static".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

/// Upstream market data configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MarketConfig {
    /// Fiat used by the FX conversion endpoint when `to` is omitted
    #[serde(default = "default_base_fiat")]
    pub base_fiat: String,

    /// Reference currency used when a request omits `vs`
    #[serde(default = "default_vs")]
    pub default_vs: String,

    /// Coins quoted when a request omits `ids`
    #[serde(default = "default_coins")]
    pub default_coins: Vec<String>,

    #[serde(default = "default_coingecko_url")]
    pub coingecko_url: String,

    #[serde(default = "default_binance_url")]
    pub binance_url: String,

    #[serde(default = "default_frankfurter_url")]
    pub frankfurter_url: String,

    /// Timeout for live price and FX requests
    #[serde(default = "default_price_timeout")]
    pub price_timeout_secs: u64,

    /// Timeout for kline history requests
    #[serde(default = "default_history_timeout")]
    pub history_timeout_secs: u64,
}

fn default_base_fiat() -> String {
    "GBP".to_string()
}

fn default_vs() -> String {
    "gbp".to_string()
}

fn default_coins() -> Vec<String> {
    vec![
        "bitcoin".to_string(),
        "ethereum".to_string(),
        "solana".to_string(),
    ]
}

fn default_coingecko_url() -> String {
    "https://api.coingecko.com/api/v3".to_string()
}

fn default_binance_url() -> String {
    "https://api.binance.com".to_string()
}

fn default_frankfurter_url() -> String {
    "https://api.frankfurter.dev/v1".to_string()
}

fn default_price_timeout() -> u64 {
    15
}

fn default_history_timeout() -> u64 {
    20
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            base_fiat: default_base_fiat(),
            default_vs: default_vs(),
            default_coins: default_coins(),
            coingecko_url: default_coingecko_url(),
            binance_url: default_binance_url(),
            frankfurter_url: default_frankfurter_url(),
            price_timeout_secs: default_price_timeout(),
            history_timeout_secs: default_history_timeout(),
        }
    }
}

/// Watchlist database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

fn default_db_path() -> String {
    PathBuf::from("db")
        .join("app.db")
        .to_string_lossy()
        .to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

/// Dashboard client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Backend the dashboard talks to
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Initial value of the coin list input
    #[serde(default = "default_dashboard_coins")]
    pub coins: String,

    /// Initial value of the reference currency input
    #[serde(default = "default_vs")]
    pub vs: String,

    /// Where chart files are written
    #[serde(default = "default_chart_dir")]
    pub chart_dir: String,
}

fn default_api_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_dashboard_coins() -> String {
    default_coins().join(",")
}

fn default_chart_dir() -> String {
    dirs::cache_dir()
        .map(|p| p.join("coinboard").join("charts").to_string_lossy().to_string())
        .unwrap_or_else(|| "./charts".to_string())
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            coins: default_dashboard_coins(),
            vs: default_vs(),
            chart_dir: default_chart_dir(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Level for the `coinboard` target; unset keeps the binary's own directives
    #[serde(default)]
    pub level: Option<String>,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: None,
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| match e {
            ConfigError::Parse { error, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                error,
            },
            other => other,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::new(),
            error: e.to_string(),
        })
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Default search path, highest priority first
    pub fn search_paths() -> Vec<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join("coinboard").join("config.toml"))
            .into_iter()
            .chain(std::iter::once(PathBuf::from("./config.toml")))
            .collect()
    }

    /// The file `resolve` would read: the explicit path, else the first
    /// existing entry of the search path
    pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
        match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => first_existing(&Self::search_paths()),
        }
    }

    /// Load from an explicit path if given, otherwise from the search path.
    ///
    /// A located file that fails to read or parse is an error; defaults
    /// plus environment apply only when no file is found.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::resolve_from(path, &Self::search_paths())
    }

    fn resolve_from(explicit: Option<&Path>, candidates: &[PathBuf]) -> Result<Self, ConfigError> {
        let located = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => first_existing(candidates),
        };
        match located {
            Some(path) => Self::load_with_env(&path),
            None => Ok(Self::from_env()),
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup (environment in production)
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server overrides
        if let Some(host) = lookup("COINBOARD_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("COINBOARD_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }
        if let Some(dir) = lookup("COINBOARD_STATIC_DIR") {
            self.server.static_dir = dir;
        }

        // Market overrides
        if let Some(fiat) = lookup("COINBOARD_BASE_FIAT") {
            self.market.base_fiat = fiat.to_uppercase();
        }
        if let Some(vs) = lookup("COINBOARD_DEFAULT_VS") {
            self.market.default_vs = vs.to_lowercase();
        }
        if let Some(coins) = lookup("COINBOARD_DEFAULT_COINS") {
            self.market.default_coins = split_csv(&coins);
        }

        // Store overrides
        if let Some(path) = lookup("COINBOARD_DB_PATH") {
            self.store.db_path = path;
        }

        // Dashboard overrides
        if let Some(url) = lookup("COINBOARD_API_URL") {
            self.dashboard.api_url = url;
        }
        if let Some(dir) = lookup("COINBOARD_CHART_DIR") {
            self.dashboard.chart_dir = dir;
        }

        // Logging overrides
        if let Some(level) = lookup("COINBOARD_LOG_LEVEL") {
            self.logging.level = Some(level);
        }
        if let Some(format) = lookup("COINBOARD_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

fn first_existing(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates.iter().find(|p| p.is_file()).cloned()
}

/// Split a comma-separated list, trimming entries and dropping blanks
pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Coinboard Configuration
#
# Environment variables override these settings:
# - COINBOARD_HOST, COINBOARD_PORT, COINBOARD_STATIC_DIR
# - COINBOARD_BASE_FIAT, COINBOARD_DEFAULT_VS, COINBOARD_DEFAULT_COINS
# - COINBOARD_DB_PATH
# - COINBOARD_API_URL, COINBOARD_CHART_DIR
# - COINBOARD_LOG_LEVEL, COINBOARD_LOG_FORMAT

[server]
# API server host
host = "127.0.0.1"

# API server port
port = 5000

# Static assets served at the root (page markup)
static_dir = "static"

[market]
# Fiat used by /api/fx/convert when `to` is omitted
base_fiat = "GBP"

# Reference currency used when a request omits `vs`
default_vs = "gbp"

# Coins quoted when a request omits `ids`
default_coins = ["bitcoin", "ethereum", "solana"]

# Upstream APIs (no keys required)
coingecko_url = "https://api.coingecko.com/api/v3"
binance_url = "https://api.binance.com"
frankfurter_url = "https://api.frankfurter.dev/v1"

# Upstream timeouts in seconds
price_timeout_secs = 15
history_timeout_secs = 20

[store]
# SQLite database holding the watchlist
db_path = "db/app.db"

[dashboard]
# Backend the dashboard client talks to
api_url = "http://127.0.0.1:5000"

# Initial coin list and reference currency
coins = "bitcoin,ethereum,solana"
vs = "gbp"

# Where chart files are written
# chart_dir = "~/.cache/coinboard/charts"

[logging]
# Log level for coinboard: trace, debug, info, warn, error
# Unset keeps each binary's default (server: info, cli: warn)
# level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.market.base_fiat, "GBP");
        assert_eq!(config.market.default_vs, "gbp");
        assert_eq!(
            config.market.default_coins,
            vec!["bitcoin", "ethereum", "solana"]
        );
        assert!(config.store.db_path.ends_with("app.db"));
    }

    #[test]
    fn test_generated_config_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.market.history_timeout_secs, 20);
        assert_eq!(config.dashboard.coins, "bitcoin,ethereum,solana");
        assert_eq!(config.logging.format, "pretty");
        assert_eq!(config.logging.level, None);
    }

    #[test]
    fn test_explicit_log_level_kept() {
        let config = Config::parse("[logging]\nlevel = \"info\"\n").unwrap();
        assert_eq!(config.logging.level.as_deref(), Some("info"));
    }

    fn write_config(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "config.toml", "[server]\nport = 7000\n");

        let config = Config::load(&path).unwrap();
        assert_eq!(config.server.port, 7000);
        assert_eq!(config.market.base_fiat, "GBP");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        match Config::load(&path) {
            Err(ConfigError::Io { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected io error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "config.toml", "[server\nport = 1\n");

        match Config::load(&path) {
            Err(ConfigError::Parse { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_first_existing_follows_search_order() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let user = write_config(dir.path(), "user.toml", "");
        let local = write_config(dir.path(), "local.toml", "");

        assert_eq!(
            first_existing(&[missing.clone(), user.clone(), local.clone()]),
            Some(user)
        );
        assert_eq!(first_existing(&[missing.clone(), local.clone()]), Some(local));
        assert_eq!(first_existing(&[missing]), None);
        // directories are not config files
        assert_eq!(first_existing(&[dir.path().to_path_buf()]), None);
    }

    #[test]
    fn test_resolve_surfaces_malformed_search_path_file() {
        let dir = tempfile::tempdir().unwrap();
        let bad = write_config(dir.path(), "config.toml", "port = [");
        let good = write_config(dir.path(), "fallback.toml", "[server]\nport = 7001\n");

        let err = Config::resolve_from(None, &[bad.clone(), good]).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { ref path, .. } if *path == bad));
    }

    #[test]
    fn test_resolve_uses_first_found_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let found = write_config(dir.path(), "config.toml", "[server]\nhost = \"0.0.0.0\"\n");

        let config = Config::resolve_from(None, &[missing, found]).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_resolve_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let other = write_config(dir.path(), "other.toml", "[server]\nport = 7002\n");

        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            Config::resolve_from(Some(&missing), &[other.clone()]),
            Err(ConfigError::Io { .. })
        ));

        let explicit = write_config(dir.path(), "explicit.toml", "[server]\nport = 7003\n");
        assert_eq!(Config::locate(Some(&explicit)), Some(explicit.clone()));
        let config = Config::resolve_from(Some(&explicit), &[other]).unwrap();
        assert_eq!(config.server.port, 7003);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::parse("[server]\nport = 8080\n").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.market.default_vs, "gbp");
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            Config::parse("[server]\nport = \"many\"\n"),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("COINBOARD_PORT", "9000"),
            ("COINBOARD_BASE_FIAT", "eur"),
            ("COINBOARD_DEFAULT_VS", "USD"),
            ("COINBOARD_DEFAULT_COINS", " cardano, ,dogecoin "),
            ("COINBOARD_DB_PATH", "/tmp/wl.db"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.market.base_fiat, "EUR");
        assert_eq!(config.market.default_vs, "usd");
        assert_eq!(config.market.default_coins, vec!["cardano", "dogecoin"]);
        assert_eq!(config.store.db_path, "/tmp/wl.db");
        assert_eq!(config.logging.level, None);

        config.apply_overrides(|key| (key == "COINBOARD_LOG_LEVEL").then(|| "info".to_string()));
        assert_eq!(config.logging.level.as_deref(), Some("info"));
    }

    #[test]
    fn test_invalid_port_override_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|key| (key == "COINBOARD_PORT").then(|| "x".to_string()));
        assert_eq!(config.server.port, 5000);
    }
}
