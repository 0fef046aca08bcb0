use crate::app::{handlers, AppState};
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Dev origins of the browser client.
const ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:5173", "https://localhost:5173"];

pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = ALLOWED_ORIGINS
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/accessToken", get(handlers::access_token))
        .route("/refreshAccessToken", post(handlers::refresh_access_token))
        .route("/accounts", get(handlers::list_accounts))
        .route(
            "/accounts/:account_id/payment-methods",
            get(handlers::payment_methods),
        )
        .route("/accounts/:account_id/wallet", get(handlers::wallet))
        .route(
            "/accounts/:account_id/add-plaid-link",
            post(handlers::add_plaid_link),
        )
        .route("/create-account", post(handlers::create_accounts))
        .route("/plaid/create-token", post(handlers::create_link_token))
        .route(
            "/plaid/moov-processor-token",
            post(handlers::processor_token),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
