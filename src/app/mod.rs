pub mod handlers;
pub mod routes;

use crate::adapters::moov::MoovClient;
use crate::adapters::plaid::PlaidClient;
use crate::config::ProxyConfig;
use crate::utils::error::Result;
use std::sync::Arc;

/// Shared per-process state. Clients are cheap to clone (reqwest pools the
/// connections internally); no mutable state crosses requests.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ProxyConfig>,
    pub moov: MoovClient,
    pub plaid: PlaidClient,
}

impl AppState {
    pub fn new(config: ProxyConfig) -> Result<Self> {
        let timeout = config.request_timeout();
        let moov = MoovClient::new(&config.moov, timeout)?;
        let plaid = PlaidClient::new(&config.plaid, timeout)?;

        Ok(Self {
            config: Arc::new(config),
            moov,
            plaid,
        })
    }
}
