//! Typed views over well-known events.

use super::cadence::Value;
use super::result::Event;
use super::Address;
use crate::error::Error;

/// Type ID of the event emitted when an account is created.
pub const ACCOUNT_CREATED_EVENT: &str = "flow.AccountCreated";

/// Decoded `flow.AccountCreated` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountCreatedEvent {
    pub address: Address,
}

impl TryFrom<&Event> for AccountCreatedEvent {
    type Error = Error;

    fn try_from(event: &Event) -> Result<Self, Self::Error> {
        if event.event_type != ACCOUNT_CREATED_EVENT {
            return Err(Error::Cadence(format!(
                "expected {} event, got {}",
                ACCOUNT_CREATED_EVENT, event.event_type
            )));
        }

        let value = Value::decode(&event.payload)?;
        let composite = value
            .as_event()
            .ok_or_else(|| Error::Cadence("event payload is not an Event value".into()))?;
        let address = composite
            .field("address")
            .and_then(Value::as_address)
            .ok_or_else(|| Error::Cadence("AccountCreated event has no address field".into()))?;

        Ok(Self { address })
    }
}
