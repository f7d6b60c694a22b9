//! Payment verification endpoint client
//!
//! One JSON POST per check: `{payment_id, processor}` in, `{data: {...}}` out.

use async_trait::async_trait;
use revlist_common::config::VerificationConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use super::{PaymentVerifier, VerifiedPayment};

const USER_AGENT: &str = concat!("revlist-web/", env!("CARGO_PKG_VERSION"));

/// Verification call errors
#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("Network error: {0}")]
    Network(String),

    /// Endpoint answered with a non-2xx status (kept for logs, not shown)
    #[error("Payment verification failed")]
    Rejected(u16),

    #[error("Malformed verification response: {0}")]
    Parse(String),

    #[error("HTTP client error: {0}")]
    Client(String),
}

#[derive(Debug, Serialize)]
struct VerifyRequest<'a> {
    payment_id: &'a str,
    processor: &'a str,
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    data: VerifiedPayment,
}

/// HTTP client for the verification endpoint
pub struct VerificationClient {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl VerificationClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, VerificationError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| VerificationError::Client(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: endpoint.into(),
            api_key,
        })
    }

    pub fn from_config(config: &VerificationConfig) -> Result<Self, VerificationError> {
        Self::new(
            config.endpoint.clone(),
            config.api_key.clone(),
            config.timeout(),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl PaymentVerifier for VerificationClient {
    async fn verify(
        &self,
        payment_id: &str,
        processor: &str,
    ) -> Result<VerifiedPayment, VerificationError> {
        debug!(payment_id, processor, "Verifying payment");

        let mut request = self.http_client.post(&self.endpoint).json(&VerifyRequest {
            payment_id,
            processor,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key).header("apikey", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| VerificationError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                payment_id,
                status = status.as_u16(),
                body = %body,
                "Verification endpoint rejected request"
            );
            return Err(VerificationError::Rejected(status.as_u16()));
        }

        let envelope: VerifyResponse = response
            .json()
            .await
            .map_err(|e| VerificationError::Parse(e.to_string()))?;

        Ok(envelope.data)
    }
}
