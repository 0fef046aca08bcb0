use crate::utils::error::Result;
use reqwest::StatusCode;
use serde_json::Value;

/// Outcome of one outbound HTTP call that reached the provider. Non-2xx
/// replies are data here, not errors; only transport faults become `Err`.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub status: StatusCode,
    pub body: Value,
}

impl Exchange {
    pub async fn from_response(response: reqwest::Response) -> Result<Self> {
        let status = response.status();
        let text = response.text().await?;

        // Providers occasionally reply with an empty or non-JSON body; keep
        // whatever came back instead of failing the exchange.
        let body = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        Ok(Self { status, body })
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.body.get("access_token").and_then(Value::as_str)
    }

    /// Element count for list replies; anything that is not an array counts
    /// as zero rather than erroring.
    pub fn array_len(&self) -> usize {
        self.body.as_array().map(Vec::len).unwrap_or(0)
    }
}
