use crate::adapters::http::Exchange;
use crate::config::settings::PlaidConfig;
use crate::utils::error::Result;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;

const LINK_CLIENT_NAME: &str = "Personal Finance App";
const LINK_USER_ID: &str = "kfajardo";
const LINK_USER_PHONE: &str = "+1 415 555 0123";

#[derive(Debug, Clone)]
pub struct PlaidClient {
    http: Client,
    base_url: String,
    client_id: String,
    secret: String,
}

impl PlaidClient {
    pub fn new(config: &PlaidConfig, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client_id: config.client_id.clone(),
            secret: config.api_key.clone(),
        })
    }

    async fn post(&self, path: &str, body: serde_json::Value) -> Result<Exchange> {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(&body)
            .send()
            .await?;
        Exchange::from_response(response).await
    }

    /// Requests a Link session token for the browser widget.
    pub async fn create_link_token(&self) -> Result<Exchange> {
        self.post(
            "/link/token/create",
            json!({
                "client_id": self.client_id,
                "secret": self.secret,
                "user": {
                    "client_user_id": LINK_USER_ID,
                    "phone_number": LINK_USER_PHONE,
                },
                "client_name": LINK_CLIENT_NAME,
                "products": ["transactions"],
                "transactions": {"days_requested": 730},
                "country_codes": ["US"],
                "language": "en",
                "account_filters": {
                    "depository": {"account_subtypes": ["checking", "savings"]},
                    "credit": {"account_subtypes": ["credit card"]},
                },
            }),
        )
        .await
    }

    /// Trades the public token from Link for a private access token.
    pub async fn exchange_public_token(&self, public_token: &str) -> Result<Exchange> {
        self.post(
            "/item/public_token/exchange",
            json!({
                "client_id": self.client_id,
                "secret": self.secret,
                "public_token": public_token,
            }),
        )
        .await
    }

    /// Issues a Moov processor token for one linked bank account.
    pub async fn create_processor_token(
        &self,
        access_token: &str,
        account_id: &str,
    ) -> Result<Exchange> {
        self.post(
            "/processor/token/create",
            json!({
                "client_id": self.client_id,
                "secret": self.secret,
                "access_token": access_token,
                "account_id": account_id,
                "processor": "moov",
            }),
        )
        .await
    }
}
