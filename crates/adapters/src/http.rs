//! Shared HTTP plumbing for remote provider APIs

use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use bridge_core::{AdapterError, AdapterResult, ProviderConfig};

/// Build a JSON client with the provider's timeout applied
pub fn build_client(config: &ProviderConfig) -> AdapterResult<Client> {
    Client::builder()
        .timeout(config.timeout())
        .user_agent(concat!("bridge-compare/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| AdapterError::Http {
            provider: config.id.clone(),
            message: e.to_string(),
        })
}

/// POST a JSON body and return the decoded JSON answer
///
/// The outer timeout guards against a server that trickles bytes slowly
/// enough to keep the client timeout from firing.
pub async fn post_json(
    client: &Client,
    provider: &str,
    url: &str,
    body: &Value,
    timeout: Duration,
) -> AdapterResult<Value> {
    debug!("{} request to {}: {}", provider, url, body);

    let call = async {
        let response = client
            .post(url)
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| http_error(provider, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AdapterError::Status {
                provider: provider.to_string(),
                status: status.as_u16(),
            });
        }

        response.json::<Value>().await.map_err(|e| AdapterError::InvalidResponse {
            provider: provider.to_string(),
            message: e.to_string(),
        })
    };

    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => Err(AdapterError::Timeout {
            provider: provider.to_string(),
            timeout_ms: timeout.as_millis() as u64,
        }),
    }
}

fn http_error(provider: &str, e: reqwest::Error) -> AdapterError {
    if e.is_timeout() {
        AdapterError::Timeout {
            provider: provider.to_string(),
            timeout_ms: 0,
        }
    } else {
        AdapterError::Http {
            provider: provider.to_string(),
            message: e.to_string(),
        }
    }
}

/// Join a base URL and a path without doubling slashes
pub fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
