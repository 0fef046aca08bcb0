use crate::utils::error::{ProxyError, Result};
use crate::utils::validation::{validate_required, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;
const DEFAULT_PLAID_BASE_URL: &str = "https://sandbox.plaid.com";

/// Process-wide configuration, built once in `main` and passed into the
/// clients and orchestrator explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    pub server: ServerConfig,
    pub moov: MoovConfig,
    pub plaid: PlaidConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoovConfig {
    pub base_url: String,
    pub public_key: String,
    pub secret: String,
    /// Facilitator account id, used to template scopes when the caller does
    /// not name an account. May be empty.
    pub account_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaidConfig {
    pub base_url: String,
    pub client_id: String,
    pub api_key: String,
}

impl ProxyConfig {
    pub fn from_env() -> Result<Self> {
        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| ProxyError::InvalidConfigValueError {
                    field: "PORT".to_string(),
                    value: raw.clone(),
                    reason: "Port must be a number between 1 and 65535".to_string(),
                })?,
            Err(_) => DEFAULT_PORT,
        };

        let request_timeout_seconds = match std::env::var("REQUEST_TIMEOUT_SECONDS") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|_| ProxyError::InvalidConfigValueError {
                    field: "REQUEST_TIMEOUT_SECONDS".to_string(),
                    value: raw.clone(),
                    reason: "Timeout must be a positive integer".to_string(),
                })?,
            Err(_) => DEFAULT_REQUEST_TIMEOUT_SECONDS,
        };

        Ok(Self {
            server: ServerConfig {
                port,
                request_timeout_seconds,
            },
            moov: MoovConfig {
                base_url: require_env("MOOV_API_BASE_URL")?,
                public_key: require_env("MOOV_PUBLIC_KEY")?,
                secret: require_env("MOOV_SECRET")?,
                account_id: std::env::var("MOOV_ACCOUNT_ID").unwrap_or_default(),
            },
            plaid: PlaidConfig {
                base_url: std::env::var("PLAID_API_BASE_URL")
                    .unwrap_or_else(|_| DEFAULT_PLAID_BASE_URL.to_string()),
                client_id: require_env("PLAID_CLIENT_ID")?,
                api_key: require_env("PLAID_API_KEY")?,
            },
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_seconds)
    }
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| ProxyError::ConfigError {
        message: format!("Missing required environment variable: {}", name),
    })
}

impl Validate for ProxyConfig {
    fn validate(&self) -> Result<()> {
        validate_url("moov.base_url", &self.moov.base_url)?;
        validate_url("plaid.base_url", &self.plaid.base_url)?;
        validate_required("moov.public_key", &self.moov.public_key)?;
        validate_required("moov.secret", &self.moov.secret)?;
        validate_required("plaid.client_id", &self.plaid.client_id)?;
        validate_required("plaid.api_key", &self.plaid.api_key)?;

        if self.server.request_timeout_seconds == 0 {
            return Err(ProxyError::InvalidConfigValueError {
                field: "server.request_timeout_seconds".to_string(),
                value: "0".to_string(),
                reason: "Outbound calls must carry a bounded timeout".to_string(),
            });
        }

        Ok(())
    }
}
