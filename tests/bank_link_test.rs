use anyhow::Result;
use httpmock::prelude::*;
use moov_proxy::config::{MoovConfig, PlaidConfig};
use moov_proxy::utils::error::ProxyError;
use moov_proxy::{BankLinkBridge, MoovClient, PlaidClient};
use serde_json::json;
use std::time::Duration;

fn bridge(server: &MockServer) -> BankLinkBridge {
    let timeout = Duration::from_secs(5);
    let plaid = PlaidClient::new(
        &PlaidConfig {
            base_url: server.base_url(),
            client_id: "plaid-client".to_string(),
            api_key: "plaid-key".to_string(),
        },
        timeout,
    )
    .unwrap();
    let moov = MoovClient::new(
        &MoovConfig {
            base_url: server.base_url(),
            public_key: "pk_test".to_string(),
            secret: "sk_test".to_string(),
            account_id: "facilitator".to_string(),
        },
        timeout,
    )
    .unwrap();
    BankLinkBridge::new(plaid, moov)
}

#[tokio::test]
async fn test_create_link_token() -> Result<()> {
    let server = MockServer::start();

    let link = server.mock(|when, then| {
        when.method(POST)
            .path("/link/token/create")
            .body_contains(r#""client_id":"plaid-client""#)
            .body_contains(r#""products":["transactions"]"#);
        then.status(200).json_body(json!({
            "link_token": "link-sandbox-abc123",
            "expiration": "2026-08-23T12:00:00Z",
        }));
    });

    let reply = bridge(&server).create_link_token().await?;
    assert_eq!(reply["link_token"], "link-sandbox-abc123");

    link.assert();
    Ok(())
}

#[tokio::test]
async fn test_create_link_token_surfaces_provider_error() -> Result<()> {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(POST).path("/link/token/create");
        then.status(400)
            .json_body(json!({"error_code": "INVALID_API_KEYS"}));
    });

    match bridge(&server).create_link_token().await {
        Err(ProxyError::UpstreamRejected { status, body, .. }) => {
            assert_eq!(status, 400);
            assert_eq!(body["error_code"], "INVALID_API_KEYS");
        }
        other => panic!("expected upstream rejection, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_processor_token_chain() -> Result<()> {
    let server = MockServer::start();

    let exchange = server.mock(|when, then| {
        when.method(POST)
            .path("/item/public_token/exchange")
            .body_contains(r#""public_token":"public-sandbox-42""#);
        then.status(200).json_body(json!({
            "access_token": "access-sandbox-42",
            "item_id": "item-1",
            "request_id": "req-1",
        }));
    });

    let processor = server.mock(|when, then| {
        when.method(POST)
            .path("/processor/token/create")
            .body_contains(r#""access_token":"access-sandbox-42""#)
            .body_contains(r#""account_id":"plaid-acct-7""#)
            .body_contains(r#""processor":"moov""#);
        then.status(200)
            .json_body(json!({"processor_token": "processor-moov-xyz"}));
    });

    let token = bridge(&server)
        .processor_token("public-sandbox-42", "plaid-acct-7")
        .await?;
    assert_eq!(token, "processor-moov-xyz");

    exchange.assert();
    processor.assert();
    Ok(())
}

#[tokio::test]
async fn test_public_token_exchange_failure_short_circuits() -> Result<()> {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(POST).path("/item/public_token/exchange");
        then.status(400)
            .json_body(json!({"error_code": "INVALID_PUBLIC_TOKEN"}));
    });

    let processor = server.mock(|when, then| {
        when.method(POST).path("/processor/token/create");
        then.status(200)
            .json_body(json!({"processor_token": "never-issued"}));
    });

    match bridge(&server)
        .processor_token("public-bad", "plaid-acct-7")
        .await
    {
        Err(ProxyError::UpstreamRejected { body, .. }) => {
            assert_eq!(body["error_code"], "INVALID_PUBLIC_TOKEN");
        }
        other => panic!("expected upstream rejection, got {:?}", other),
    }

    // Second hop never fires once the first one fails.
    assert_eq!(processor.hits(), 0);
    Ok(())
}

#[tokio::test]
async fn test_attach_bank_account() -> Result<()> {
    let server = MockServer::start();

    let token = server.mock(|when, then| {
        when.method(POST)
            .path("/oauth2/token")
            .body_contains("/accounts/acct-1/bank-accounts.write");
        then.status(200).json_body(json!({"access_token": "scoped-token"}));
    });

    let attach = server.mock(|when, then| {
        when.method(POST)
            .path("/accounts/acct-1/bank-accounts")
            .header("authorization", "Bearer scoped-token")
            .body_contains(r#""plaid":{"token":"processor-moov-xyz"}"#);
        then.status(200).json_body(json!({
            "bankAccountID": "ba-9",
            "status": "new",
        }));
    });

    let reply = bridge(&server)
        .attach_bank_account("acct-1", "processor-moov-xyz")
        .await?;
    assert_eq!(reply["bankAccountID"], "ba-9");

    token.assert();
    attach.assert();
    Ok(())
}

#[tokio::test]
async fn test_attach_bank_account_surfaces_moov_rejection() -> Result<()> {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(POST).path("/oauth2/token");
        then.status(200).json_body(json!({"access_token": "scoped-token"}));
    });
    server.mock(|when, then| {
        when.method(POST).path("/accounts/acct-1/bank-accounts");
        then.status(409)
            .json_body(json!({"error": "duplicate bank account"}));
    });

    match bridge(&server)
        .attach_bank_account("acct-1", "processor-moov-xyz")
        .await
    {
        Err(ProxyError::UpstreamRejected { status, body, .. }) => {
            assert_eq!(status, 409);
            assert_eq!(body["error"], "duplicate bank account");
        }
        other => panic!("expected upstream rejection, got {:?}", other),
    }
    Ok(())
}
