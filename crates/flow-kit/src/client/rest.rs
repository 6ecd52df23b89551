//! HTTP client for the Flow Access REST API.

use std::time::Duration;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_with::{DisplayFromStr, base64::Base64, serde_as};

use super::AccessApi;
use crate::error::{AccessError, is_retryable_status, parse_invalid_proposal_key};
use crate::types::{
    Account, Address, Block, Identifier, Transaction, TransactionResult, TransactionSignature,
};

/// Default Access API URL (the local emulator's REST port).
pub const DEFAULT_ACCESS_API_URL: &str = "http://127.0.0.1:8888/v1";

/// Retry configuration for Access API calls.
#[derive(Clone, Debug)]
pub struct RetryConfig {
    /// Maximum number of retries.
    pub max_retries: u32,
    /// Initial delay in milliseconds.
    pub initial_delay_ms: u64,
    /// Maximum delay in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 500,
            max_delay_ms: 5000,
        }
    }
}

impl RetryConfig {
    /// Delay before retry number `attempt` (zero-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt);
        Duration::from_millis(
            self.initial_delay_ms
                .saturating_mul(factor)
                .min(self.max_delay_ms),
        )
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[serde_as]
#[derive(Serialize)]
struct TransactionBody {
    #[serde_as(as = "Base64")]
    script: Vec<u8>,
    #[serde_as(as = "Vec<Base64>")]
    arguments: Vec<Vec<u8>>,
    reference_block_id: Identifier,
    #[serde_as(as = "DisplayFromStr")]
    gas_limit: u64,
    payer: Address,
    proposal_key: ProposalKeyBody,
    authorizers: Vec<Address>,
    payload_signatures: Vec<SignatureBody>,
    envelope_signatures: Vec<SignatureBody>,
}

#[serde_as]
#[derive(Serialize)]
struct ProposalKeyBody {
    address: Address,
    #[serde_as(as = "DisplayFromStr")]
    key_index: u32,
    #[serde_as(as = "DisplayFromStr")]
    sequence_number: u64,
}

#[serde_as]
#[derive(Serialize)]
struct SignatureBody {
    address: Address,
    #[serde_as(as = "DisplayFromStr")]
    key_index: u32,
    #[serde_as(as = "Base64")]
    signature: Vec<u8>,
}

impl From<&TransactionSignature> for SignatureBody {
    fn from(sig: &TransactionSignature) -> Self {
        Self {
            address: sig.address,
            key_index: sig.key_index,
            signature: sig.signature.as_bytes().to_vec(),
        }
    }
}

impl From<&Transaction> for TransactionBody {
    fn from(tx: &Transaction) -> Self {
        Self {
            script: tx.script.clone(),
            arguments: tx.arguments.clone(),
            reference_block_id: tx.reference_block_id,
            gas_limit: tx.gas_limit,
            payer: tx.payer,
            proposal_key: ProposalKeyBody {
                address: tx.proposal_key.address,
                key_index: tx.proposal_key.key_index,
                sequence_number: tx.proposal_key.sequence_number,
            },
            authorizers: tx.authorizers.clone(),
            payload_signatures: tx.payload_signatures.iter().map(Into::into).collect(),
            envelope_signatures: tx.envelope_signatures.iter().map(Into::into).collect(),
        }
    }
}

#[derive(Deserialize)]
struct SendTransactionResponse {
    id: Identifier,
}

/// Error body returned by the Access API.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[allow(dead_code)]
    code: u16,
    message: String,
}

// ============================================================================
// Client
// ============================================================================

/// HTTP client for the Flow Access REST API, with retries on transient
/// failures.
#[derive(Clone)]
pub struct RestClient {
    base_url: String,
    client: reqwest::Client,
    retry_config: RetryConfig,
}

impl RestClient {
    /// Create a client for the given base URL (e.g. `http://127.0.0.1:8888/v1`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_retry_config(base_url, RetryConfig::default())
    }

    /// Create a client with custom retry configuration.
    pub fn with_retry_config(base_url: impl Into<String>, retry_config: RetryConfig) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            retry_config,
        }
    }

    /// Get the base URL.
    pub fn url(&self) -> &str {
        &self.base_url
    }

    /// Get the retry configuration.
    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry_config
    }

    async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, AccessError> {
        let url = format!("{}{}", self.base_url, path);
        self.execute(|| self.client.get(&url)).await
    }

    async fn post<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, AccessError> {
        let url = format!("{}{}", self.base_url, path);
        self.execute(|| self.client.post(&url).json(body)).await
    }

    /// Send a request with retries.
    async fn execute<R: DeserializeOwned>(
        &self,
        build: impl Fn() -> reqwest::RequestBuilder,
    ) -> Result<R, AccessError> {
        let total_attempts = self.retry_config.max_retries + 1;

        for attempt in 0..total_attempts {
            match self.try_execute::<R>(build()).await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < total_attempts - 1 => {
                    let delay = self.retry_config.delay(attempt);
                    tracing::debug!(
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Retrying Access API request"
                    );
                    tokio::time::sleep(delay).await;
                    continue;
                }
                Err(e) => return Err(e),
            }
        }

        Err(AccessError::RetriesExhausted(total_attempts))
    }

    /// Single attempt.
    async fn try_execute<R: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<R, AccessError> {
        let response = request.header("Accept", "application/json").send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(error_from_response(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(AccessError::Json)
    }
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url)
            .field("retry_config", &self.retry_config)
            .finish()
    }
}

impl AccessApi for RestClient {
    async fn latest_block(&self, sealed: bool) -> Result<Block, AccessError> {
        let height = if sealed { "sealed" } else { "final" };
        tracing::debug!(height, "Fetching latest block");

        let blocks: Vec<Block> = self.get(&format!("/blocks?height={}", height)).await?;
        blocks
            .into_iter()
            .next()
            .ok_or_else(|| AccessError::InvalidResponse("No block in response".to_string()))
    }

    async fn account_at_latest_block(&self, address: &Address) -> Result<Account, AccessError> {
        tracing::debug!(%address, "Fetching account");

        let path = format!(
            "/accounts/{}?block_height=sealed&expand=keys,contracts",
            address.to_hex()
        );
        match self.get(&path).await {
            Err(AccessError::NotFound(_)) => Err(AccessError::AccountNotFound(*address)),
            other => other,
        }
    }

    async fn send_transaction(&self, tx: &Transaction) -> Result<Identifier, AccessError> {
        let body = TransactionBody::from(tx);
        let response: SendTransactionResponse = self.post("/transactions", &body).await?;

        let local_id = tx.id();
        if response.id != local_id {
            tracing::warn!(
                server_id = %response.id,
                local_id = %local_id,
                "Access API returned a different transaction ID than computed locally"
            );
        }
        Ok(response.id)
    }

    async fn transaction_result(&self, id: &Identifier) -> Result<TransactionResult, AccessError> {
        match self.get(&format!("/transaction_results/{}", id)).await {
            Err(AccessError::NotFound(_)) => Ok(TransactionResult::unknown()),
            other => other,
        }
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Map a non-success HTTP response to an [`AccessError`].
fn error_from_response(status: u16, body: &str) -> AccessError {
    let parsed: Option<ApiErrorBody> = serde_json::from_str(body).ok();
    let message = parsed
        .map(|e| e.message)
        .unwrap_or_else(|| body.to_string());

    if let Some(err) = parse_invalid_proposal_key(&message) {
        return err;
    }

    match status {
        404 => AccessError::NotFound(message),
        s if is_retryable_status(s) => {
            AccessError::network(format!("HTTP {}: {}", s, message), Some(s), true)
        }
        s => AccessError::Api { code: s, message },
    }
}
