use crate::app::AppState;
use crate::core::bank_link::BankLinkBridge;
use crate::core::onboarding::OnboardingPipeline;
use crate::core::scopes::resolve_scopes;
use crate::domain::model::Operator;
use crate::utils::error::ProxyError;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use serde_json::{json, Value};

type HandlerResult<T> = std::result::Result<T, ProxyError>;

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ProxyError::UpstreamRejected {
                message,
                status,
                body,
                passthrough,
            } => {
                // Banking-platform failures collapse to 400. Aggregator hops
                // echo the provider's status when it is an error code; a
                // rejection hidden inside a 2xx still maps to 400.
                let status = if passthrough {
                    StatusCode::from_u16(status)
                        .ok()
                        .filter(|s| s.is_client_error() || s.is_server_error())
                        .unwrap_or(StatusCode::BAD_REQUEST)
                } else {
                    StatusCode::BAD_REQUEST
                };
                (
                    status,
                    json!({ "status": "failed", "message": message, "error": body }),
                )
            }
            ProxyError::InvalidInputError { message } => (
                StatusCode::BAD_REQUEST,
                json!({ "status": "failed", "message": message }),
            ),
            other => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "status": "failed",
                    "message": "Internal proxy error",
                    "error": other.to_string(),
                }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "message": "Server is running" }))
}

#[derive(Debug, Deserialize)]
pub struct AccessTokenQuery {
    #[serde(rename = "accountID")]
    pub account_id: Option<String>,
}

/// Bootstrap token by default; entity-scoped when the caller names an
/// account. The configured facilitator id templates the profile scope
/// otherwise.
pub async fn access_token(
    State(state): State<AppState>,
    Query(query): Query<AccessTokenQuery>,
) -> HandlerResult<Json<Value>> {
    let full = query.account_id.is_some();
    let account_id = query
        .account_id
        .unwrap_or_else(|| state.config.moov.account_id.clone());

    let reply = state
        .moov
        .request_token(&resolve_scopes(Some(&account_id), full))
        .await?;
    if !reply.is_success() {
        return Err(ProxyError::upstream(
            "Error fetching moov accessToken",
            reply.status.as_u16(),
            reply.body,
        ));
    }

    tracing::debug!("Issued {} token", if full { "entity-scoped" } else { "bootstrap" });
    Ok(Json(reply.body))
}

#[derive(Debug, Deserialize)]
pub struct RefreshTokenRequest {
    #[serde(rename = "refreshToken")]
    pub refresh_token: Option<String>,
    #[serde(rename = "accountID")]
    pub account_id: Option<String>,
}

pub async fn refresh_access_token(
    State(state): State<AppState>,
    Json(request): Json<RefreshTokenRequest>,
) -> HandlerResult<Json<Value>> {
    // The provider has no refresh grant for client credentials; a new
    // entity-scoped token is issued instead and the refresh token is ignored.
    tracing::debug!(
        "Re-issuing token for account {:?} (refresh token supplied: {})",
        request.account_id,
        request.refresh_token.is_some()
    );

    let account_id = request.account_id.unwrap_or_default();
    let reply = state
        .moov
        .request_token(&resolve_scopes(Some(&account_id), true))
        .await?;
    if !reply.is_success() {
        return Err(ProxyError::upstream(
            "Error fetching refreshed accessToken",
            reply.status.as_u16(),
            reply.body,
        ));
    }

    Ok(Json(reply.body))
}

pub async fn list_accounts(State(state): State<AppState>) -> HandlerResult<Json<Value>> {
    let token = state
        .moov
        .request_token(&resolve_scopes(Some(&state.config.moov.account_id), false))
        .await?;
    if !token.is_success() {
        return Err(ProxyError::upstream(
            "Failed to get access token",
            token.status.as_u16(),
            token.body,
        ));
    }

    let accounts = state.moov.list_accounts().await?;
    if !accounts.is_success() {
        return Err(ProxyError::upstream(
            "Failed to fetch Moov accounts",
            accounts.status.as_u16(),
            accounts.body,
        ));
    }

    tracing::info!("Fetched {} accounts from Moov", accounts.array_len());
    Ok(Json(json!({
        "status": "success",
        "count": accounts.array_len(),
        "accounts": accounts.body,
    })))
}

async fn scoped_token(state: &AppState, account_id: &str) -> HandlerResult<String> {
    let reply = state
        .moov
        .request_token(&resolve_scopes(Some(account_id), true))
        .await?;
    if !reply.is_success() {
        return Err(ProxyError::upstream(
            "Failed to get access token",
            reply.status.as_u16(),
            reply.body,
        ));
    }
    Ok(reply.access_token().unwrap_or_default().to_string())
}

pub async fn payment_methods(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> HandlerResult<Json<Value>> {
    let token = scoped_token(&state, &account_id).await?;

    let methods = state.moov.list_bank_accounts(&token, &account_id).await?;
    if !methods.is_success() {
        return Err(ProxyError::upstream(
            "Failed to fetch payment methods",
            methods.status.as_u16(),
            methods.body,
        ));
    }

    Ok(Json(json!({
        "status": "success",
        "accountID": account_id,
        "count": methods.array_len(),
        "paymentMethods": methods.body,
    })))
}

pub async fn wallet(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> HandlerResult<Json<Value>> {
    let token = scoped_token(&state, &account_id).await?;

    let wallets = state.moov.list_wallets(&token, &account_id).await?;
    if !wallets.is_success() {
        return Err(ProxyError::upstream(
            "Failed to fetch wallet",
            wallets.status.as_u16(),
            wallets.body,
        ));
    }

    Ok(Json(json!({
        "status": "success",
        "accountID": account_id,
        "wallet": wallets.body,
    })))
}

#[derive(Debug, Deserialize)]
pub struct AddPlaidLinkRequest {
    pub processor_token: Option<String>,
}

pub async fn add_plaid_link(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
    Json(request): Json<AddPlaidLinkRequest>,
) -> HandlerResult<Json<Value>> {
    let Some(processor_token) = request.processor_token else {
        return Err(ProxyError::invalid_input("processor_token is required"));
    };

    let bridge = BankLinkBridge::new(state.plaid.clone(), state.moov.clone());
    let bank_account = bridge
        .attach_bank_account(&account_id, &processor_token)
        .await?;

    Ok(Json(json!({
        "status": "success",
        "accountID": account_id,
        "bankAccount": bank_account,
    })))
}

#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    #[serde(default)]
    pub operators: Vec<Operator>,
}

pub async fn create_accounts(
    State(state): State<AppState>,
    Json(request): Json<CreateAccountRequest>,
) -> HandlerResult<Response> {
    if request.operators.is_empty() {
        return Err(ProxyError::invalid_input(
            "operators array is required and must not be empty",
        ));
    }

    let total = request.operators.len();
    let pipeline = OnboardingPipeline::new(state.moov.clone());
    let outcome = pipeline.run(request.operators).await?;

    let status = if outcome.succeeded() {
        StatusCode::CREATED
    } else {
        StatusCode::BAD_REQUEST
    };

    let mut body = json!({
        "status": if outcome.succeeded() { "success" } else { "failed" },
        "message": format!(
            "Processed {} operators. Created {} accounts.",
            total,
            outcome.accounts.len()
        ),
        "accounts": outcome.accounts,
    });
    if !outcome.errors.is_empty() {
        body["errors"] = serde_json::to_value(&outcome.errors)?;
    }

    Ok((status, Json(body)).into_response())
}

pub async fn create_link_token(State(state): State<AppState>) -> HandlerResult<Json<Value>> {
    let bridge = BankLinkBridge::new(state.plaid.clone(), state.moov.clone());
    let reply = bridge.create_link_token().await?;

    Ok(Json(json!({ "link_token": reply["link_token"] })))
}

#[derive(Debug, Deserialize)]
pub struct ProcessorTokenRequest {
    pub public_token: Option<String>,
    pub account_id: Option<String>,
}

pub async fn processor_token(
    State(state): State<AppState>,
    Json(request): Json<ProcessorTokenRequest>,
) -> HandlerResult<Json<Value>> {
    let Some(public_token) = request.public_token else {
        return Err(ProxyError::invalid_input("public_token is required"));
    };
    let Some(account_id) = request.account_id else {
        return Err(ProxyError::invalid_input("account_id is required"));
    };

    let bridge = BankLinkBridge::new(state.plaid.clone(), state.moov.clone());
    let token = bridge.processor_token(&public_token, &account_id).await?;

    Ok(Json(json!({ "processor_token": token })))
}
