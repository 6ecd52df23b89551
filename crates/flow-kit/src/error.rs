//! Error types for flow-kit.
//!
//! # Error Hierarchy
//!
//! - [`Error`](enum@Error) - Main error type, returned by most operations
//!   - [`AccessError`] - Access API errors (transport, HTTP, API responses)
//!   - [`ParseAddressError`] - Invalid account address
//!   - [`ParseIdentifierError`] - Invalid block or transaction ID
//!   - [`ParseKeyError`] - Invalid key material or algorithm name
//!   - [`KeyGenError`] - Key generation failures
//!   - [`SignerError`] - Signing operation failures
//!
//! # Checking Retryable Errors
//!
//! ```rust
//! use flow_kit::AccessError;
//!
//! fn should_retry(err: &AccessError) -> bool {
//!     err.is_retryable()
//! }
//! ```

use std::time::Duration;

use thiserror::Error;

use crate::types::{Address, Identifier};

/// Error parsing an account address.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseAddressError {
    #[error("Address is empty")]
    Empty,

    #[error("Address '{0}' is too long (max 16 hex characters)")]
    TooLong(String),

    #[error("Address '{0}' is not valid hex")]
    InvalidHex(String),
}

/// Error parsing a 32-byte identifier.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseIdentifierError {
    #[error("Invalid hex encoding: {0}")]
    InvalidHex(String),

    #[error("Invalid identifier length: expected 32 bytes, got {0}")]
    InvalidLength(usize),
}

/// Error parsing keys and algorithm names.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseKeyError {
    #[error("Unknown signature algorithm: '{0}'")]
    UnknownSignatureAlgorithm(String),

    #[error("Unknown hash algorithm: '{0}'")]
    UnknownHashAlgorithm(String),

    #[error("Invalid hex encoding: {0}")]
    InvalidHex(String),

    #[error("Invalid key length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Invalid key: bytes do not represent a valid {0} key")]
    InvalidKey(&'static str),
}

/// Error generating a new private key.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KeyGenError {
    #[error("Seed length {actual} is out of range ({min}..={max} bytes)")]
    InvalidSeedLength {
        actual: usize,
        min: usize,
        max: usize,
    },

    #[error("Randomness source failed: {0}")]
    Entropy(String),

    #[error("Key weight {0} is out of range (1..=1000)")]
    InvalidWeight(u32),

    #[error("Key derivation failed: {0}")]
    Derivation(String),
}

/// Error during signing operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignerError {
    #[error("Signing failed: {0}")]
    SigningFailed(String),
}

// ============================================================================
// Access API Errors
// ============================================================================

/// Errors returned by an Access API implementation.
#[derive(Debug, Error)]
pub enum AccessError {
    // ─── Network/Transport ───
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Network error: {message}")]
    Network {
        message: String,
        status_code: Option<u16>,
        retryable: bool,
    },

    #[error("Gave up after {0} attempts")]
    RetriesExhausted(u32),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    // ─── API Errors ───
    #[error("Access API error: {message} (code: {code})")]
    Api { code: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Account not found: {0}")]
    AccountNotFound(Address),

    // ─── Transaction Errors ───
    #[error("Invalid proposal key: expected sequence number {expected}, got {actual}")]
    InvalidProposalKey { expected: u64, actual: u64 },
}

impl AccessError {
    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            AccessError::Http(e) => e.is_timeout() || e.is_connect(),
            AccessError::Network { retryable, .. } => *retryable,
            AccessError::Api { code, .. } => is_retryable_status(*code),
            _ => false,
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>, status_code: Option<u16>, retryable: bool) -> Self {
        AccessError::Network {
            message: message.into(),
            status_code,
            retryable,
        }
    }

    /// Returns true if this error is a stale or otherwise invalid proposal key.
    pub fn is_invalid_proposal_key(&self) -> bool {
        matches!(self, AccessError::InvalidProposalKey { .. })
    }
}

/// Check if an HTTP status code is retryable.
pub(crate) fn is_retryable_status(status: u16) -> bool {
    // 408 Request Timeout, 429 Too Many Requests, 5xx Server Errors
    status == 408 || status == 429 || (500..600).contains(&status)
}

/// Extract the expected/actual sequence numbers from a Flow error message.
///
/// The node reports a stale proposal key as
/// `[Error Code: 1007] invalid proposal key: ... expected 1, got 0`.
pub(crate) fn parse_invalid_proposal_key(message: &str) -> Option<AccessError> {
    if !message.contains("[Error Code: 1007]") {
        return None;
    }

    let expected_at = message.find("expected ")? + "expected ".len();
    let expected: u64 = leading_number(&message[expected_at..])?;

    let got_at = message[expected_at..].find("got ")? + expected_at + "got ".len();
    let actual: u64 = leading_number(&message[got_at..])?;

    Some(AccessError::InvalidProposalKey { expected, actual })
}

fn leading_number(s: &str) -> Option<u64> {
    let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

// ============================================================================
// Main Error Type
// ============================================================================

/// Main error type for flow-kit operations.
#[derive(Debug, Error)]
pub enum Error {
    // ─── Parsing ───
    #[error(transparent)]
    ParseAddress(#[from] ParseAddressError),

    #[error(transparent)]
    ParseIdentifier(#[from] ParseIdentifierError),

    #[error(transparent)]
    ParseKey(#[from] ParseKeyError),

    // ─── Access API ───
    #[error(transparent)]
    Access(#[from] AccessError),

    // ─── Keys ───
    #[error("Key generation failed: {0}")]
    KeyGen(#[from] KeyGenError),

    #[error("Signing failed: {0}")]
    Signing(#[from] SignerError),

    #[error("Account {address} has no usable key at index {key_index}")]
    KeyNotFound { address: Address, key_index: u32 },

    #[error("Generated key is identical to the sponsor key")]
    KeyReuse,

    // ─── Transaction ───
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    #[error("Transaction {0} expired before it was sealed")]
    TransactionExpired(Identifier),

    #[error("Transaction {id} failed: {message}")]
    TransactionFailed { id: Identifier, message: String },

    #[error("Timed out waiting for transaction {id} to be sealed ({attempts} queries in {elapsed:?})")]
    SealTimeout {
        id: Identifier,
        attempts: u32,
        elapsed: Duration,
    },

    #[error("Cancelled while waiting for transaction {0} to be sealed")]
    Cancelled(Identifier),

    // ─── Serialization ───
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Cadence value error: {0}")]
    Cadence(String),
}

impl Error {
    /// Returns true if the error came from waiting on a seal (timeout or cancel).
    pub fn is_seal_wait_interrupted(&self) -> bool {
        matches!(self, Error::SealTimeout { .. } | Error::Cancelled(_))
    }

    /// Returns true if the transaction reached a terminal non-success state.
    pub fn is_transaction_terminal(&self) -> bool {
        matches!(
            self,
            Error::TransactionExpired(_) | Error::TransactionFailed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address_error_display() {
        assert_eq!(ParseAddressError::Empty.to_string(), "Address is empty");
        assert_eq!(
            ParseAddressError::TooLong("0x00112233445566778899".to_string()).to_string(),
            "Address '0x00112233445566778899' is too long (max 16 hex characters)"
        );
    }

    #[test]
    fn test_key_gen_error_display() {
        assert_eq!(
            KeyGenError::InvalidSeedLength {
                actual: 8,
                min: 32,
                max: 256
            }
            .to_string(),
            "Seed length 8 is out of range (32..=256 bytes)"
        );
        assert_eq!(
            KeyGenError::InvalidWeight(1001).to_string(),
            "Key weight 1001 is out of range (1..=1000)"
        );
    }

    #[test]
    fn test_is_retryable_status() {
        assert!(is_retryable_status(408));
        assert!(is_retryable_status(429));
        assert!(is_retryable_status(500));
        assert!(is_retryable_status(503));
        assert!(is_retryable_status(599));

        assert!(!is_retryable_status(200));
        assert!(!is_retryable_status(400));
        assert!(!is_retryable_status(404));
    }

    #[test]
    fn test_access_error_retryable() {
        assert!(AccessError::network("boom", Some(503), true).is_retryable());
        assert!(!AccessError::network("bad", Some(400), false).is_retryable());
        assert!(
            AccessError::Api {
                code: 500,
                message: "internal".to_string()
            }
            .is_retryable()
        );
        assert!(!AccessError::NotFound("tx".to_string()).is_retryable());
        assert!(
            !AccessError::InvalidProposalKey {
                expected: 1,
                actual: 0
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_parse_invalid_proposal_key() {
        let message = "[Error Code: 1007] invalid proposal key: public key 0 on account \
                       f8d6e0586b0a20c7 does not have a valid sequence number, expected 1, got 0";
        match parse_invalid_proposal_key(message) {
            Some(AccessError::InvalidProposalKey { expected, actual }) => {
                assert_eq!(expected, 1);
                assert_eq!(actual, 0);
            }
            other => panic!("Expected InvalidProposalKey, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_invalid_proposal_key_unrelated_message() {
        assert!(parse_invalid_proposal_key("execution reverted").is_none());
        assert!(parse_invalid_proposal_key("[Error Code: 1007] no numbers here").is_none());
        // Other error codes carrying the same wording are not stale keys
        assert!(
            parse_invalid_proposal_key(
                "[Error Code: 1101] cadence runtime error: balance 1007 too low, expected 5, got 4"
            )
            .is_none()
        );
        assert!(
            parse_invalid_proposal_key("invalid proposal key: expected 5, got 4").is_none()
        );
    }

    #[test]
    fn test_error_classification() {
        let id = Identifier::ZERO;
        assert!(
            Error::SealTimeout {
                id,
                attempts: 3,
                elapsed: Duration::from_secs(3)
            }
            .is_seal_wait_interrupted()
        );
        assert!(Error::Cancelled(id).is_seal_wait_interrupted());
        assert!(Error::TransactionExpired(id).is_transaction_terminal());
        assert!(!Error::KeyReuse.is_transaction_terminal());
    }
}
