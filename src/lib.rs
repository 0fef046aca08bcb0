pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::moov::MoovClient;
pub use adapters::plaid::PlaidClient;
pub use app::AppState;
pub use config::{MoovConfig, PlaidConfig, ProxyConfig};
pub use crate::core::bank_link::BankLinkBridge;
pub use crate::core::onboarding::OnboardingPipeline;
pub use utils::error::{ProxyError, Result};
