// ⚙️ Server configuration from environment variables

use anyhow::{Context, Result};
use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATA_FILE: &str = "data/SWIFT_CODES.csv";
pub const DEFAULT_STATIC_DIR: &str = "public";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Source loaded at startup
    pub data_file: PathBuf,
    /// Directory served for everything outside the API
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }
}

impl ServerConfig {
    /// Read `SWIFT_HOST`, `PORT`, `SWIFT_CODES_FILE` and `SWIFT_STATIC_DIR`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` with an injectable variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ServerConfig::default();

        if let Some(host) = lookup("SWIFT_HOST") {
            config.host = host;
        }

        if let Some(port) = lookup("PORT") {
            config.port = port
                .trim()
                .parse()
                .with_context(|| format!("Invalid PORT value: {}", port))?;
        }

        if let Some(path) = lookup("SWIFT_CODES_FILE") {
            config.data_file = PathBuf::from(path);
        }

        if let Some(dir) = lookup("SWIFT_STATIC_DIR") {
            config.static_dir = PathBuf::from(dir);
        }

        Ok(config)
    }

    /// `host:port`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("SWIFT_HOST", "127.0.0.1"),
            ("PORT", "3000"),
            ("SWIFT_CODES_FILE", "/tmp/codes.csv"),
            ("SWIFT_STATIC_DIR", "web"),
        ]))
        .unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert_eq!(config.data_file, PathBuf::from("/tmp/codes.csv"));
        assert_eq!(config.static_dir, PathBuf::from("web"));
    }

    #[test]
    fn test_invalid_port() {
        let err = ServerConfig::from_lookup(lookup_from(&[("PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("Invalid PORT"));
    }
}
