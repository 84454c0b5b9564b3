// Connection settings for a voicemail server
use crate::error::ClientError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub server_name: String,
    pub login_name: String,
    pub password: String,
    pub port: u16,
    pub timeout_ms: u64,
    // Appliances ship with self-signed certificates
    pub accept_invalid_certs: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server_name: String::new(),
            login_name: String::new(),
            password: String::new(),
            port: 8443,
            timeout_ms: 15000,
            accept_invalid_certs: false,
        }
    }
}

impl ServerConfig {
    pub fn new(server_name: &str, login_name: &str, password: &str) -> Self {
        Self {
            server_name: server_name.to_string(),
            login_name: login_name.to_string(),
            password: password.to_string(),
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ClientError> {
        let config: ServerConfig =
            serde_json::from_str(json).map_err(|e| ClientError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if self.server_name.trim().is_empty() {
            return Err(ClientError::ConfigError("server_name is empty".to_string()));
        }
        if self.login_name.trim().is_empty() {
            return Err(ClientError::ConfigError("login_name is empty".to_string()));
        }
        if self.port == 0 {
            return Err(ClientError::ConfigError("port must be non-zero".to_string()));
        }
        if self.timeout_ms == 0 {
            return Err(ClientError::ConfigError(
                "timeout_ms must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn base_url(&self) -> String {
        format!("https://{}:{}/vmrest", self.server_name.trim(), self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_defaults_from_partial_json() {
        let config = ServerConfig::from_json_str(
            r#"{"server_name": "cuc1.example.com", "login_name": "admin", "password": "secret"}"#,
        )
        .unwrap();

        assert_eq!(config.port, 8443);
        assert_eq!(config.timeout_ms, 15000);
        assert!(!config.accept_invalid_certs);
        assert_eq!(config.base_url(), "https://cuc1.example.com:8443/vmrest");
    }

    #[test]
    fn test_malformed_json() {
        let result = ServerConfig::from_json_str("{ server_name: ");
        assert!(matches!(result, Err(ClientError::ConfigError(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = ServerConfig::from_json_file("does/not/exist.json");
        assert!(matches!(result, Err(ClientError::IoError(_))));
    }

    #[test_case(ServerConfig { server_name: "".to_string(), ..ServerConfig::new("x", "admin", "pw") }; "#1 empty server name")]
    #[test_case(ServerConfig::new("cuc1", " ", "pw"); "#2 empty login")]
    #[test_case(ServerConfig { port: 0, ..ServerConfig::new("cuc1", "admin", "pw") }; "#3 zero port")]
    #[test_case(ServerConfig { timeout_ms: 0, ..ServerConfig::new("cuc1", "admin", "pw") }; "#4 zero timeout")]
    fn test_validate_rejects(config: ServerConfig) {
        assert!(matches!(config.validate(), Err(ClientError::ConfigError(_))));
    }
}
