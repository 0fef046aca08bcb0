use crate::adapters::http::Exchange;
use crate::config::settings::MoovConfig;
use crate::utils::error::Result;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde_json::json;
use std::time::Duration;

/// Pinned platform API version, sent with every call.
pub const MOOV_API_VERSION: &str = "v2025.07.00";

#[derive(Debug, Clone)]
pub struct MoovClient {
    http: Client,
    base_url: String,
    public_key: String,
    secret: String,
}

impl MoovClient {
    pub fn new(config: &MoovConfig, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            public_key: config.public_key.clone(),
            secret: config.secret.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Exchange> {
        let response = builder
            .header("x-moov-version", MOOV_API_VERSION)
            .send()
            .await?;
        Exchange::from_response(response).await
    }

    /// Client-credentials grant for the given scope string.
    pub async fn request_token(&self, scope: &str) -> Result<Exchange> {
        tracing::debug!("Requesting access token from {}", self.url("/oauth2/token"));
        self.send(self.http.post(self.url("/oauth2/token")).json(&json!({
            "grant_type": "client_credentials",
            "client_id": self.public_key,
            "client_secret": self.secret,
            "scope": scope,
        })))
        .await
    }

    /// Account listing uses HTTP basic credentials rather than a bearer token.
    pub async fn list_accounts(&self) -> Result<Exchange> {
        self.send(
            self.http
                .get(self.url("/accounts"))
                .basic_auth(&self.public_key, Some(&self.secret)),
        )
        .await
    }

    pub async fn create_account<T: Serialize + ?Sized>(
        &self,
        token: &str,
        payload: &T,
    ) -> Result<Exchange> {
        self.send(
            self.http
                .post(self.url("/accounts"))
                .bearer_auth(token)
                .json(payload),
        )
        .await
    }

    /// One-time terms-of-service disclosure token.
    pub async fn tos_token(&self, token: &str) -> Result<Exchange> {
        self.send(self.http.get(self.url("/tos-token")).bearer_auth(token))
            .await
    }

    /// PATCH on the account resource; used for ToS acceptance and for
    /// marking ownership disclosure complete.
    pub async fn patch_account<T: Serialize + ?Sized>(
        &self,
        token: &str,
        account_id: &str,
        payload: &T,
    ) -> Result<Exchange> {
        self.send(
            self.http
                .patch(self.url(&format!("/accounts/{}", account_id)))
                .bearer_auth(token)
                .json(payload),
        )
        .await
    }

    pub async fn add_representative<T: Serialize + ?Sized>(
        &self,
        token: &str,
        account_id: &str,
        payload: &T,
    ) -> Result<Exchange> {
        self.send(
            self.http
                .post(self.url(&format!("/accounts/{}/representatives", account_id)))
                .bearer_auth(token)
                .json(payload),
        )
        .await
    }

    pub async fn update_underwriting<T: Serialize + ?Sized>(
        &self,
        token: &str,
        account_id: &str,
        payload: &T,
    ) -> Result<Exchange> {
        self.send(
            self.http
                .put(self.url(&format!("/accounts/{}/underwriting", account_id)))
                .bearer_auth(token)
                .json(payload),
        )
        .await
    }

    pub async fn add_bank_account<T: Serialize + ?Sized>(
        &self,
        token: &str,
        account_id: &str,
        payload: &T,
    ) -> Result<Exchange> {
        self.send(
            self.http
                .post(self.url(&format!("/accounts/{}/bank-accounts", account_id)))
                .bearer_auth(token)
                .json(payload),
        )
        .await
    }

    pub async fn list_bank_accounts(&self, token: &str, account_id: &str) -> Result<Exchange> {
        self.send(
            self.http
                .get(self.url(&format!("/accounts/{}/bank-accounts", account_id)))
                .bearer_auth(token),
        )
        .await
    }

    pub async fn list_wallets(&self, token: &str, account_id: &str) -> Result<Exchange> {
        self.send(
            self.http
                .get(self.url(&format!("/accounts/{}/wallets", account_id)))
                .bearer_auth(token),
        )
        .await
    }
}
