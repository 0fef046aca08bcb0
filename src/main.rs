use clap::Parser;
use moov_proxy::app::routes::create_router;
use moov_proxy::config::{ProxyConfig, ServerArgs};
use moov_proxy::utils::{logger, validation::Validate};
use moov_proxy::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = ServerArgs::parse();

    if args.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_server_logger(args.verbose);
    }

    dotenvy::dotenv().ok();

    tracing::info!("Starting moov-proxy");

    let mut config = match ProxyConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Failed to load configuration: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    if let Some(port) = args.port {
        config.server.port = port;
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    if args.verbose {
        tracing::debug!("Moov base URL: {}", config.moov.base_url);
        tracing::debug!("Plaid base URL: {}", config.plaid.base_url);
    }

    let addr = format!("0.0.0.0:{}", config.server.port);
    let state = AppState::new(config)?;
    let app = create_router(state);

    tracing::info!("✅ Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
