//! In-memory Access API for tests.
//!
//! [`StubAccessApi`] serves a fixed block and account set, replays a
//! script of transaction results and enforces proposal key sequence
//! numbers the way a node does. Available to downstream crates with the
//! `testing` feature.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::client::AccessApi;
use crate::error::AccessError;
use crate::types::{
    ACCOUNT_CREATED_EVENT, Account, AccountKey, Address, Block, BlockHeader, Event,
    HashAlgorithm, Identifier, PrivateKey, Transaction, TransactionResult, TransactionStatus,
};

/// A block at `height` with a deterministic ID.
pub fn block(height: u64) -> Block {
    Block {
        header: BlockHeader {
            id: Identifier::hash(&height.to_be_bytes()),
            parent_id: Identifier::hash(&height.saturating_sub(1).to_be_bytes()),
            height,
            timestamp: "2024-01-01T00:00:00Z".to_string(),
        },
    }
}

/// An account with a single full-weight key at index 0.
pub fn account(
    address: Address,
    balance: u64,
    key: &PrivateKey,
    hash_algorithm: HashAlgorithm,
    sequence_number: u64,
) -> Account {
    Account {
        address,
        balance,
        keys: vec![AccountKey {
            index: 0,
            public_key: key.public_key(),
            signature_algorithm: key.algorithm(),
            hash_algorithm,
            weight: 1000,
            sequence_number,
            revoked: false,
        }],
        contracts: Default::default(),
    }
}

/// A `flow.AccountCreated` event for `address`.
///
/// The transaction ID is left zero; [`StubAccessApi`] attributes such
/// events to whichever transaction is queried.
pub fn account_created_event(address: Address) -> Event {
    let payload = serde_json::json!({
        "type": "Event",
        "value": {
            "id": ACCOUNT_CREATED_EVENT,
            "fields": [{
                "name": "address",
                "value": { "type": "Address", "value": format!("0x{}", address.to_hex()) }
            }]
        }
    });
    Event {
        event_type: ACCOUNT_CREATED_EVENT.to_string(),
        transaction_id: Identifier::ZERO,
        transaction_index: 0,
        event_index: 0,
        payload: payload.to_string().into_bytes(),
    }
}

/// A sealed result carrying one `flow.AccountCreated` event.
pub fn sealed_with_account_created(address: Address) -> TransactionResult {
    TransactionResult {
        block_id: Some(Identifier::hash(b"sealed block")),
        status: TransactionStatus::Sealed,
        events: vec![account_created_event(address)],
        ..Default::default()
    }
}

/// Scripted, in-memory [`AccessApi`].
#[derive(Debug)]
pub struct StubAccessApi {
    block: Block,
    accounts: Mutex<HashMap<Address, Account>>,
    results: Mutex<VecDeque<TransactionResult>>,
    sent: Mutex<Vec<Transaction>>,
    result_queries: AtomicU32,
}

impl StubAccessApi {
    /// Create a stub serving `block` with no accounts and no scripted
    /// results.
    pub fn new(block: Block) -> Self {
        Self {
            block,
            accounts: Mutex::new(HashMap::new()),
            results: Mutex::new(VecDeque::new()),
            sent: Mutex::new(Vec::new()),
            result_queries: AtomicU32::new(0),
        }
    }

    /// Add an account.
    pub fn with_account(self, account: Account) -> Self {
        lock(&self.accounts).insert(account.address, account);
        self
    }

    /// Script the results returned by successive `transaction_result`
    /// calls. The last one repeats once the script runs out.
    pub fn with_results(self, results: impl IntoIterator<Item = TransactionResult>) -> Self {
        lock(&self.results).extend(results);
        self
    }

    /// Number of `transaction_result` calls so far.
    pub fn result_queries(&self) -> u32 {
        self.result_queries.load(Ordering::SeqCst)
    }

    /// Transactions accepted so far.
    pub fn sent_transactions(&self) -> Vec<Transaction> {
        lock(&self.sent).clone()
    }

    /// Current state of an account.
    pub fn account(&self, address: &Address) -> Option<Account> {
        lock(&self.accounts).get(address).cloned()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl AccessApi for StubAccessApi {
    async fn latest_block(&self, _sealed: bool) -> Result<Block, AccessError> {
        Ok(self.block.clone())
    }

    async fn account_at_latest_block(&self, address: &Address) -> Result<Account, AccessError> {
        self.account(address)
            .ok_or(AccessError::AccountNotFound(*address))
    }

    async fn send_transaction(&self, tx: &Transaction) -> Result<Identifier, AccessError> {
        let proposal = tx.proposal_key;
        let mut accounts = lock(&self.accounts);

        let key = accounts
            .get_mut(&proposal.address)
            .and_then(|a| a.keys.iter_mut().find(|k| k.index == proposal.key_index))
            .ok_or_else(|| AccessError::Api {
                code: 400,
                message: format!(
                    "proposal key {} not found on account {}",
                    proposal.key_index, proposal.address
                ),
            })?;

        if key.sequence_number != proposal.sequence_number {
            return Err(AccessError::InvalidProposalKey {
                expected: key.sequence_number,
                actual: proposal.sequence_number,
            });
        }
        key.sequence_number += 1;
        drop(accounts);

        lock(&self.sent).push(tx.clone());
        Ok(tx.id())
    }

    async fn transaction_result(&self, id: &Identifier) -> Result<TransactionResult, AccessError> {
        self.result_queries.fetch_add(1, Ordering::SeqCst);

        let mut results = lock(&self.results);
        let mut result = if results.len() > 1 {
            results.pop_front()
        } else {
            results.front().cloned()
        }
        .unwrap_or_default();

        for event in &mut result.events {
            if event.transaction_id.is_zero() {
                event.transaction_id = *id;
            }
        }
        Ok(result)
    }
}
