//! Configuration loader
//!
//! Loads bridge configuration from environment variables and files.
//!
//! ## Loading Strategy
//! 1. Probes standard locations for a config file (JSON or TOML)
//! 2. Starts from that file, or from defaults when none exists
//! 3. Applies every environment variable that is set on top
//!
//! OAuth and webhook credentials may be absent; requests that need them fail
//! with a configuration error at that point.
//!
//! ## Environment Variables
//! - `TWITTER_CLIENT_ID`, `TWITTER_CLIENT_SECRET`, `TWITTER_CALLBACK_URL`
//! - `NEYNAR_WEBHOOK_SECRET`: shared secret for webhook signatures
//! - `CASTBRIDGE_DB_PATH`: SQLite database file
//! - `CASTBRIDGE_DB_POOL_SIZE`: connection pool size
//! - `CASTBRIDGE_BIND_ADDR`: HTTP listen address
//! - `CASTBRIDGE_HTTP_TIMEOUT_SECS`: outbound HTTP timeout
//!
//! ## File Locations
//! `castbridge.{json,toml}` or `config.{json,toml}` in the working directory
//! or next to the executable.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use castbridge_domain::{BridgeConfig, BridgeError, Result};

const TWITTER_CLIENT_ID: &str = "TWITTER_CLIENT_ID";
const TWITTER_CLIENT_SECRET: &str = "TWITTER_CLIENT_SECRET";
const TWITTER_CALLBACK_URL: &str = "TWITTER_CALLBACK_URL";
const NEYNAR_WEBHOOK_SECRET: &str = "NEYNAR_WEBHOOK_SECRET";
const DB_PATH: &str = "CASTBRIDGE_DB_PATH";
const DB_POOL_SIZE: &str = "CASTBRIDGE_DB_POOL_SIZE";
const BIND_ADDR: &str = "CASTBRIDGE_BIND_ADDR";
const HTTP_TIMEOUT_SECS: &str = "CASTBRIDGE_HTTP_TIMEOUT_SECS";

/// Load configuration: file (if any) overlaid with environment variables.
///
/// # Errors
/// Returns `BridgeError::Config` if a probed file cannot be parsed or an
/// environment variable has an invalid value.
pub fn load() -> Result<BridgeConfig> {
    let mut config = match probe_config_paths() {
        Some(path) => load_from_file(Some(path))?,
        None => {
            tracing::debug!("No config file found, starting from defaults");
            BridgeConfig::default()
        }
    };

    apply_env(&mut config)?;
    tracing::info!(
        db_path = %config.database.path,
        bind_addr = %config.server.bind_addr,
        oauth_configured = config.oauth.client_credentials().is_ok(),
        webhook_secret_configured = config.webhook.secret.is_some(),
        "Configuration loaded"
    );
    Ok(config)
}

/// Load configuration from environment variables over defaults.
///
/// # Errors
/// Returns `BridgeError::Config` if a numeric variable does not parse.
pub fn load_from_env() -> Result<BridgeConfig> {
    let mut config = BridgeConfig::default();
    apply_env(&mut config)?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations.
///
/// # Errors
/// Returns `BridgeError::Config` if the file is missing, unreadable, or not
/// valid JSON/TOML.
pub fn load_from_file(path: Option<PathBuf>) -> Result<BridgeConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(BridgeError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            BridgeError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| BridgeError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

fn parse_config(contents: &str, path: &Path) -> Result<BridgeConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| BridgeError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| BridgeError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(BridgeError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// First existing config file among the standard locations.
pub fn probe_config_paths() -> Option<PathBuf> {
    const NAMES: [&str; 4] = ["castbridge.toml", "castbridge.json", "config.toml", "config.json"];

    let mut dirs = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    if let Some(exe_dir) =
        std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        dirs.push(exe_dir);
    }

    dirs.iter().flat_map(|dir| NAMES.iter().map(move |name| dir.join(name))).find(|p| p.exists())
}

fn apply_env(config: &mut BridgeConfig) -> Result<()> {
    if let Some(value) = env_string(TWITTER_CLIENT_ID) {
        config.oauth.client_id = Some(value);
    }
    if let Some(value) = env_string(TWITTER_CLIENT_SECRET) {
        config.oauth.client_secret = Some(value);
    }
    if let Some(value) = env_string(TWITTER_CALLBACK_URL) {
        config.oauth.callback_url = Some(value);
    }
    if let Some(value) = env_string(NEYNAR_WEBHOOK_SECRET) {
        config.webhook.secret = Some(value);
    }
    if let Some(value) = env_string(DB_PATH) {
        config.database.path = value;
    }
    if let Some(value) = env_string(BIND_ADDR) {
        config.server.bind_addr = value;
    }
    if let Some(size) = env_parse::<u32>(DB_POOL_SIZE)? {
        if size == 0 {
            return Err(BridgeError::Config(format!("{DB_POOL_SIZE} must be at least 1")));
        }
        config.database.pool_size = size;
    }
    if let Some(secs) = env_parse::<u64>(HTTP_TIMEOUT_SECS)? {
        if secs == 0 {
            return Err(BridgeError::Config(format!("{HTTP_TIMEOUT_SECS} must be at least 1")));
        }
        config.http.timeout_secs = secs;
    }
    Ok(())
}

/// Non-empty environment variable.
fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Parse an optional environment variable.
///
/// # Errors
/// Returns `BridgeError::Config` if the variable is set but does not parse.
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_string(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| BridgeError::Config(format!("Invalid value for {key}: {e}")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::Builder;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const ALL_VARS: [&str; 8] = [
        TWITTER_CLIENT_ID,
        TWITTER_CLIENT_SECRET,
        TWITTER_CALLBACK_URL,
        NEYNAR_WEBHOOK_SECRET,
        DB_PATH,
        DB_POOL_SIZE,
        BIND_ADDR,
        HTTP_TIMEOUT_SECS,
    ];

    fn clear_env() {
        for key in ALL_VARS {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn load_from_env_uses_defaults_when_unset() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let config = load_from_env().unwrap();
        assert_eq!(config, BridgeConfig::default());
    }

    #[test]
    fn load_from_env_reads_all_vars() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(TWITTER_CLIENT_ID, "client");
        std::env::set_var(TWITTER_CLIENT_SECRET, "secret");
        std::env::set_var(TWITTER_CALLBACK_URL, "https://bridge.example.com/api/callback");
        std::env::set_var(NEYNAR_WEBHOOK_SECRET, "hook");
        std::env::set_var(DB_PATH, "/tmp/castbridge-test.db");
        std::env::set_var(DB_POOL_SIZE, "3");
        std::env::set_var(BIND_ADDR, "127.0.0.1:8080");
        std::env::set_var(HTTP_TIMEOUT_SECS, "5");

        let config = load_from_env().unwrap();
        clear_env();

        assert_eq!(config.oauth.client_credentials().unwrap(), ("client", "secret"));
        assert_eq!(
            config.oauth.callback_url().unwrap(),
            "https://bridge.example.com/api/callback"
        );
        assert_eq!(config.webhook.secret.as_deref(), Some("hook"));
        assert_eq!(config.database.path, "/tmp/castbridge-test.db");
        assert_eq!(config.database.pool_size, 3);
        assert_eq!(config.server.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.http.timeout_secs, 5);
    }

    #[test]
    fn blank_vars_are_ignored() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var(TWITTER_CLIENT_ID, "  ");

        let config = load_from_env().unwrap();
        clear_env();

        assert_eq!(config.oauth.client_id, None);
    }

    #[test]
    fn invalid_numbers_are_config_errors() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(DB_POOL_SIZE, "not-a-number");
        assert!(matches!(load_from_env(), Err(BridgeError::Config(_))));

        std::env::set_var(DB_POOL_SIZE, "0");
        assert!(matches!(load_from_env(), Err(BridgeError::Config(_))));
        clear_env();

        std::env::set_var(HTTP_TIMEOUT_SECS, "-1");
        assert!(matches!(load_from_env(), Err(BridgeError::Config(_))));
        clear_env();
    }

    #[test]
    fn load_from_file_toml_with_partial_sections() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[oauth]
client_id = "file-client"

[database]
path = "bridge.db"
"#
        )
        .unwrap();

        let config = load_from_file(Some(file.path().to_path_buf())).unwrap();

        assert_eq!(config.oauth.client_id.as_deref(), Some("file-client"));
        assert_eq!(config.oauth.client_secret, None);
        assert_eq!(config.database.path, "bridge.db");
        assert_eq!(config.database.pool_size, BridgeConfig::default().database.pool_size);
        assert_eq!(config.http, BridgeConfig::default().http);
    }

    #[test]
    fn load_from_file_json() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"webhook": {{"secret": "s"}}, "server": {{"bind_addr": "[::]:80"}}}}"#)
            .unwrap();

        let config = load_from_file(Some(file.path().to_path_buf())).unwrap();

        assert_eq!(config.webhook.secret.as_deref(), Some("s"));
        assert_eq!(config.server.bind_addr, "[::]:80");
    }

    #[test]
    fn load_from_file_errors() {
        let missing = load_from_file(Some(PathBuf::from("/nonexistent/castbridge.toml")));
        assert!(matches!(missing, Err(BridgeError::Config(msg)) if msg.contains("not found")));

        let mut file = Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "oauth: {{}}").unwrap();
        let unsupported = load_from_file(Some(file.path().to_path_buf()));
        assert!(matches!(unsupported, Err(BridgeError::Config(msg)) if msg.contains("Unsupported")));

        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        writeln!(file, "{{not json").unwrap();
        let invalid = load_from_file(Some(file.path().to_path_buf()));
        assert!(matches!(invalid, Err(BridgeError::Config(msg)) if msg.contains("JSON")));
    }
}
