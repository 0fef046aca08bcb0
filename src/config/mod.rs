pub mod settings;

use clap::Parser;

pub use settings::{MoovConfig, PlaidConfig, ProxyConfig, ServerConfig};

#[derive(Debug, Clone, Parser)]
#[command(name = "moov-proxy")]
#[command(about = "Backend proxy between a browser client, Moov, and Plaid")]
pub struct ServerArgs {
    /// Overrides the PORT environment variable.
    #[arg(long)]
    pub port: Option<u16>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit JSON-formatted logs")]
    pub json_logs: bool,
}
