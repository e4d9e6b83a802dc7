use std::net::SocketAddr;
use std::num::ParseIntError;
use std::path::PathBuf;
use std::sync::Arc;

use tape_ai::{DEFAULT_MODEL, Gateway, GeminiClient};

pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("PORT must be a port number, got '{value}': {source}")]
    InvalidPort {
        value: String,
        #[source]
        source: ParseIntError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub api_key: Option<String>,
    pub model: String,
    pub static_dir: PathBuf,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|source| ConfigError::InvalidPort { value, source })?,
            None => DEFAULT_PORT,
        };
        let api_key = lookup("GEMINI_API_KEY").filter(|key| !key.trim().is_empty());
        let model = lookup("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let static_dir = lookup("TAPE_STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self {
            port,
            api_key,
            model,
            static_dir,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], self.port))
    }

    /// Builds the gateway with a single shared model client. Without an API
    /// key the gateway is left unconfigured.
    pub fn gateway(&self) -> Gateway {
        match &self.api_key {
            Some(key) => {
                let client = GeminiClient::new(key.clone()).with_model(self.model.clone());
                Gateway::new(Arc::new(client))
            }
            None => {
                tracing::warn!("GEMINI_API_KEY not found in environment; generation is disabled");
                Gateway::unconfigured()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    use super::{ConfigError, DEFAULT_PORT, ServerConfig};

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: BTreeMap<String, String> = vars
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_apply_without_environment() {
        let config = ServerConfig::from_lookup(lookup(&[])).expect("defaults should load");
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.api_key, None);
        assert_eq!(config.model, "gemini-1.5-flash");
        assert_eq!(config.static_dir, PathBuf::from("."));
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8000");
        assert!(!config.gateway().is_configured());
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("PORT", "9123"),
            ("GEMINI_API_KEY", "abc"),
            ("GEMINI_MODEL", "gemini-2.0-flash"),
            ("TAPE_STATIC_DIR", "public"),
        ]))
        .expect("config should load");

        assert_eq!(config.port, 9123);
        assert_eq!(config.api_key.as_deref(), Some("abc"));
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.static_dir, PathBuf::from("public"));
        assert!(config.gateway().is_configured());
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let config = ServerConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "  ")]))
            .expect("config should load");
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = ServerConfig::from_lookup(lookup(&[("PORT", "eighty")]))
            .expect_err("non-numeric port should fail");
        assert!(matches!(err, ConfigError::InvalidPort { .. }));
        assert!(err.to_string().contains("eighty"));
    }
}
