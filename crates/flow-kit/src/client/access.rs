//! The Access API seam.
//!
//! Everything that talks to a node goes through [`AccessApi`], so the
//! provisioning, submission and polling code can run against
//! [`RestClient`](super::RestClient) in production and an in-memory double
//! in tests.

use std::future::Future;

use crate::error::AccessError;
use crate::types::{Account, Address, Block, Identifier, Transaction, TransactionResult};

/// The subset of the Flow Access API used to create accounts.
pub trait AccessApi: Send + Sync {
    /// Latest block; sealed when `sealed` is true, otherwise finalized.
    fn latest_block(
        &self,
        sealed: bool,
    ) -> impl Future<Output = Result<Block, AccessError>> + Send;

    /// Account state at the latest sealed block, including keys and
    /// contracts.
    fn account_at_latest_block(
        &self,
        address: &Address,
    ) -> impl Future<Output = Result<Account, AccessError>> + Send;

    /// Submit a signed transaction and return the ID the node assigned.
    fn send_transaction(
        &self,
        tx: &Transaction,
    ) -> impl Future<Output = Result<Identifier, AccessError>> + Send;

    /// Current result of a submitted transaction.
    ///
    /// A transaction the node has not seen yet reports
    /// [`TransactionStatus::Unknown`](crate::types::TransactionStatus::Unknown).
    fn transaction_result(
        &self,
        id: &Identifier,
    ) -> impl Future<Output = Result<TransactionResult, AccessError>> + Send;
}
