//! Top-level error type and process exit codes.

use flow_kit::{AccessError, Error};
use thiserror::Error;

/// Exit code for success.
pub const EXIT_OK: u8 = 0;
/// Exit code for network and otherwise unclassified failures.
pub const EXIT_FAILURE: u8 = 1;
/// Exit code for invalid configuration.
pub const EXIT_CONFIG: u8 = 2;
/// Exit code when waiting for the seal timed out or was cancelled.
pub const EXIT_INTERRUPTED: u8 = 3;
/// Exit code when the transaction expired or failed on chain.
pub const EXIT_TRANSACTION: u8 = 4;

/// Errors surfaced by the command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Cancelled while {0}")]
    Cancelled(&'static str),

    #[error(transparent)]
    Flow(#[from] Error),

    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Config(_) => EXIT_CONFIG,
            CliError::Cancelled(_) => EXIT_INTERRUPTED,
            CliError::Flow(e) if e.is_seal_wait_interrupted() => EXIT_INTERRUPTED,
            CliError::Flow(e) if e.is_transaction_terminal() => EXIT_TRANSACTION,
            CliError::Flow(
                Error::ParseAddress(_)
                | Error::ParseKey(_)
                | Error::KeyNotFound { .. }
                | Error::Access(AccessError::AccountNotFound(_)),
            ) => EXIT_CONFIG,
            CliError::Flow(_) | CliError::Io(_) => EXIT_FAILURE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use flow_kit::{Address, Identifier};

    #[test]
    fn test_exit_codes() {
        let id = Identifier::hash(b"tx");
        let cases = [
            (CliError::Config("bad".to_string()), EXIT_CONFIG),
            (
                CliError::Flow(Error::KeyNotFound {
                    address: Address::ZERO,
                    key_index: 1,
                }),
                EXIT_CONFIG,
            ),
            (
                CliError::Flow(Error::Access(AccessError::AccountNotFound(Address::ZERO))),
                EXIT_CONFIG,
            ),
            (
                CliError::Flow(Error::SealTimeout {
                    id,
                    attempts: 3,
                    elapsed: Duration::from_secs(3),
                }),
                EXIT_INTERRUPTED,
            ),
            (CliError::Flow(Error::Cancelled(id)), EXIT_INTERRUPTED),
            (CliError::Cancelled("fetching the latest block"), EXIT_INTERRUPTED),
            (CliError::Flow(Error::TransactionExpired(id)), EXIT_TRANSACTION),
            (
                CliError::Flow(Error::TransactionFailed {
                    id,
                    message: "out of gas".to_string(),
                }),
                EXIT_TRANSACTION,
            ),
            (
                CliError::Flow(Error::Access(AccessError::RetriesExhausted(4))),
                EXIT_FAILURE,
            ),
            (
                CliError::Io(std::io::Error::other("broken pipe")),
                EXIT_FAILURE,
            ),
        ];

        for (err, code) in cases {
            assert_eq!(err.exit_code(), code, "{}", err);
        }
    }

    #[test]
    fn test_flow_error_is_transparent() {
        let err = CliError::from(Error::KeyReuse);
        assert_eq!(err.to_string(), Error::KeyReuse.to_string());
    }
}
