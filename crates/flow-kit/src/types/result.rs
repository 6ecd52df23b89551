//! Transaction results and events.

use std::fmt::{self, Display};

use serde::Deserialize;
use serde_with::{DisplayFromStr, base64::Base64, serde_as};

use super::event::{ACCOUNT_CREATED_EVENT, AccountCreatedEvent};
use super::identifier::deserialize_optional;
use super::{Address, Identifier};

/// Lifecycle status of a submitted transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub enum TransactionStatus {
    /// The node has no record of the transaction (yet).
    #[default]
    Unknown,
    Pending,
    Finalized,
    Executed,
    Sealed,
    Expired,
}

impl TransactionStatus {
    /// True once the transaction can no longer change state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransactionStatus::Sealed | TransactionStatus::Expired)
    }
}

impl Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransactionStatus::Unknown => "Unknown",
            TransactionStatus::Pending => "Pending",
            TransactionStatus::Finalized => "Finalized",
            TransactionStatus::Executed => "Executed",
            TransactionStatus::Sealed => "Sealed",
            TransactionStatus::Expired => "Expired",
        };
        f.write_str(s)
    }
}

/// An event emitted by a transaction.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Event {
    /// Fully qualified event type, e.g. `flow.AccountCreated`.
    #[serde(rename = "type")]
    pub event_type: String,
    pub transaction_id: Identifier,
    #[serde_as(as = "DisplayFromStr")]
    pub transaction_index: u32,
    #[serde_as(as = "DisplayFromStr")]
    pub event_index: u32,
    /// JSON-Cadence encoded event value.
    #[serde_as(as = "Base64")]
    pub payload: Vec<u8>,
}

/// Result of a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct TransactionResult {
    /// Block containing the transaction, once known.
    #[serde(default, deserialize_with = "deserialize_optional")]
    pub block_id: Option<Identifier>,
    pub status: TransactionStatus,
    #[serde(default)]
    pub status_code: u32,
    /// Non-empty when execution failed.
    #[serde(default)]
    pub error_message: String,
    #[serde(default)]
    pub events: Vec<Event>,
}

impl TransactionResult {
    /// A result for a transaction the node does not know about.
    pub fn unknown() -> Self {
        Self::default()
    }

    /// True when the transaction executed with an error.
    pub fn is_failed(&self) -> bool {
        !self.error_message.is_empty()
    }

    /// Address created by `transaction_id`, taken from the last
    /// `flow.AccountCreated` event it emitted.
    ///
    /// Events from other transactions are ignored. Returns
    /// [`Address::ZERO`] when no such event exists.
    pub fn created_address(&self, transaction_id: &Identifier) -> Address {
        let mut created = Address::ZERO;
        for event in self
            .events
            .iter()
            .filter(|e| e.event_type == ACCOUNT_CREATED_EVENT && e.transaction_id == *transaction_id)
        {
            match AccountCreatedEvent::try_from(event) {
                Ok(decoded) => created = decoded.address,
                Err(e) => {
                    tracing::warn!(
                        transaction_id = %transaction_id,
                        event_index = event.event_index,
                        error = %e,
                        "Skipping undecodable AccountCreated event"
                    );
                }
            }
        }
        created
    }
}
