use crate::adapters::moov::MoovClient;
use crate::adapters::plaid::PlaidClient;
use crate::core::scopes::resolve_scopes;
use crate::utils::error::{ProxyError, Result};
use serde_json::{json, Value};

/// Shuttles linked-bank-account tokens between the aggregator and the
/// banking platform. Every hop short-circuits on failure and surfaces the
/// hop's raw provider payload.
pub struct BankLinkBridge {
    plaid: PlaidClient,
    moov: MoovClient,
}

impl BankLinkBridge {
    pub fn new(plaid: PlaidClient, moov: MoovClient) -> Self {
        Self { plaid, moov }
    }

    pub async fn create_link_token(&self) -> Result<Value> {
        let reply = self.plaid.create_link_token().await?;
        if !reply.is_success() {
            return Err(ProxyError::upstream_passthrough(
                "Error creating PLAID token",
                reply.status.as_u16(),
                reply.body,
            ));
        }
        Ok(reply.body)
    }

    /// public token -> private access token -> Moov processor token.
    pub async fn processor_token(
        &self,
        public_token: &str,
        plaid_account_id: &str,
    ) -> Result<String> {
        let exchanged = self.plaid.exchange_public_token(public_token).await?;
        if !exchanged.is_success() {
            return Err(ProxyError::upstream_passthrough(
                "Error exchanging public token",
                exchanged.status.as_u16(),
                exchanged.body,
            ));
        }

        let Some(access_token) = exchanged.body.get("access_token").and_then(Value::as_str)
        else {
            return Err(ProxyError::upstream_passthrough(
                "Public token exchange reply had no access_token",
                exchanged.status.as_u16(),
                exchanged.body,
            ));
        };

        let processor = self
            .plaid
            .create_processor_token(access_token, plaid_account_id)
            .await?;
        if !processor.is_success() {
            return Err(ProxyError::upstream_passthrough(
                "Error creating processor token",
                processor.status.as_u16(),
                processor.body,
            ));
        }

        match processor.body.get("processor_token").and_then(Value::as_str) {
            Some(token) => {
                tracing::info!("Processor token issued for account {}", plaid_account_id);
                Ok(token.to_string())
            }
            None => Err(ProxyError::upstream_passthrough(
                "Processor token reply had no processor_token",
                processor.status.as_u16(),
                processor.body,
            )),
        }
    }

    /// Attaches a verified external bank account to a Moov entity via its
    /// processor token.
    pub async fn attach_bank_account(
        &self,
        account_id: &str,
        processor_token: &str,
    ) -> Result<Value> {
        let token_reply = self
            .moov
            .request_token(&resolve_scopes(Some(account_id), true))
            .await?;
        if !token_reply.is_success() {
            return Err(ProxyError::upstream(
                "Failed to get access token",
                token_reply.status.as_u16(),
                token_reply.body,
            ));
        }
        let token = token_reply.access_token().unwrap_or_default();

        let attached = self
            .moov
            .add_bank_account(
                token,
                account_id,
                &json!({ "plaid": { "token": processor_token } }),
            )
            .await?;
        if !attached.is_success() {
            return Err(ProxyError::upstream(
                format!("Error attaching bank account to Moov account {}", account_id),
                attached.status.as_u16(),
                attached.body,
            ));
        }

        Ok(attached.body)
    }
}
