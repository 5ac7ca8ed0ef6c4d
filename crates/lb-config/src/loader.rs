//! Configuration loader with file and environment variable support

use crate::{AppConfig, ConfigError};
use std::env;
use std::path::PathBuf;
use tracing::{info, warn};

/// Standard config file search paths
const CONFIG_PATHS: &[&str] = &[
    "linkbox.toml",
    "config.toml",
    "./config/linkbox.toml",
    "/etc/linkbox/config.toml",
];

/// Separator used by `LINKBOX_ADMIN_TOKENS`
pub const ADMIN_TOKEN_SEPARATOR: &str = ";;";

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

    /// Load configuration from file (if found) with environment variable overrides,
    /// then validate it.
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        let mut config = AppConfig::default();

        if let Some(path) = self.find_config_file() {
            info!(?path, "Loading configuration from file");
            config = AppConfig::from_file(&path)?;
        }

        self.apply_env_overrides(&mut config);
        config.validate()?;

        Ok(config)
    }

    /// Find the configuration file to use
    fn find_config_file(&self) -> Option<PathBuf> {
        if let Some(path) = &self.config_path {
            if path.exists() {
                return Some(path.clone());
            }
            warn!(?path, "Configured config file does not exist");
        }

        if let Ok(path) = env::var("LINKBOX_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

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
        apply_overrides(config, |key| env::var(key).ok());
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a `;;`-separated admin token list, dropping blank entries.
pub fn parse_admin_tokens(raw: &str) -> Vec<String> {
    raw.split(ADMIN_TOKEN_SEPARATOR)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Overlay values from `lookup` onto `config`. Values that fail to parse are
/// ignored and the file/default value stays.
fn apply_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    // Database
    if let Some(val) = lookup("LINKBOX_DATABASE_URL") {
        config.database.url = val;
    }
    if let Some(val) = lookup("LINKBOX_DATABASE_MAX_CONNECTIONS") {
        if let Ok(max) = val.parse() {
            config.database.max_connections = max;
        }
    }

    // API
    if let Some(val) = lookup("LINKBOX_API_ADDRESS") {
        config.api.address = val;
    }
    if let Some(val) = lookup("LINKBOX_API_REQUESTS_PER_MINUTE") {
        if let Ok(rpm) = val.parse() {
            config.api.requests_per_minute = rpm;
        }
    }
    if let Some(val) = lookup("LINKBOX_ADMIN_TOKENS") {
        config.api.admin_tokens = parse_admin_tokens(&val);
    }

    // Gateway
    if let Some(val) = lookup("LINKBOX_GATEWAY_ADDRESS") {
        config.gateway.address = val;
    }
    if let Some(val) = lookup("LINKBOX_GATEWAY_ROOT_REDIRECT") {
        config.gateway.root_redirect = if val.trim().is_empty() { None } else { Some(val) };
    }

    // Invites
    if let Some(val) = lookup("LINKBOX_INVITES") {
        if let Ok(enabled) = val.parse() {
            config.invites.enabled = enabled;
        }
    }

    // General
    if let Some(val) = lookup("LINKBOX_DEV_MODE") {
        if let Ok(dev) = val.parse() {
            config.dev_mode = dev;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn overlay(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let mut config = AppConfig::default();
        apply_overrides(&mut config, |key| vars.get(key).cloned());
        config
    }

    #[test]
    fn test_admin_tokens_split() {
        assert_eq!(
            parse_admin_tokens("first;;second;; ;;third"),
            vec!["first", "second", "third"]
        );
        assert!(parse_admin_tokens("").is_empty());
    }

    #[test]
    fn test_env_overrides() {
        let config = overlay(&[
            ("LINKBOX_DATABASE_URL", "postgres://db/linkbox"),
            ("LINKBOX_DATABASE_MAX_CONNECTIONS", "25"),
            ("LINKBOX_API_ADDRESS", "127.0.0.1:9000"),
            ("LINKBOX_API_REQUESTS_PER_MINUTE", "0"),
            ("LINKBOX_ADMIN_TOKENS", "a;;b"),
            ("LINKBOX_GATEWAY_ADDRESS", "127.0.0.1:9001"),
            ("LINKBOX_GATEWAY_ROOT_REDIRECT", "https://example.com"),
            ("LINKBOX_INVITES", "true"),
            ("LINKBOX_DEV_MODE", "true"),
        ]);

        assert_eq!(config.database.url, "postgres://db/linkbox");
        assert_eq!(config.database.max_connections, 25);
        assert_eq!(config.api.address, "127.0.0.1:9000");
        assert_eq!(config.api.requests_per_minute, 0);
        assert_eq!(config.api.admin_tokens, vec!["a", "b"]);
        assert_eq!(config.gateway.address, "127.0.0.1:9001");
        assert_eq!(
            config.gateway.root_redirect.as_deref(),
            Some("https://example.com")
        );
        assert!(config.invites.enabled);
        assert!(config.dev_mode);
    }

    #[test]
    fn test_unparsable_env_values_are_ignored() {
        let config = overlay(&[
            ("LINKBOX_API_REQUESTS_PER_MINUTE", "lots"),
            ("LINKBOX_INVITES", "yes please"),
            ("LINKBOX_DATABASE_MAX_CONNECTIONS", "-3"),
        ]);

        assert_eq!(config.api.requests_per_minute, 60);
        assert!(!config.invites.enabled);
        assert_eq!(config.database.max_connections, 10);
    }

    #[test]
    fn test_load_with_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[api]
address = "127.0.0.1:7000"
requests_per_minute = 5

[gateway]
root_redirect = "https://linkbox.example"
"#
        )
        .unwrap();

        let mut config = AppConfig::from_file(file.path()).unwrap();
        config.validate().unwrap();
        assert_eq!(config.api_addr().unwrap().port(), 7000);
        assert_eq!(config.api.requests_per_minute, 5);
        assert_eq!(
            config.gateway.root_redirect.as_deref(),
            Some("https://linkbox.example")
        );

        let loader = ConfigLoader::with_path(file.path());
        assert_eq!(loader.find_config_file().as_deref(), Some(file.path()));
    }
}
