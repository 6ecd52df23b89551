//! Core types for the Flow Access API.
//!
//! This module provides strongly-typed representations of Flow concepts:
//!
//! - [`Address`] - 8-byte account address
//! - [`Identifier`] - 32-byte block and transaction IDs
//! - [`PrivateKey`], [`PublicKey`], [`Signature`] - ECDSA key material
//! - [`Account`], [`AccountKey`] - on-chain account state
//! - [`Block`] - block header
//! - [`Transaction`] - transaction body, signatures and canonical encoding
//! - [`TransactionResult`], [`Event`] - execution outcome
//! - [`cadence::Value`] - JSON-Cadence arguments and event payloads

mod account;
mod address;
mod block;
pub mod cadence;
mod event;
mod identifier;
mod key;
mod result;
mod transaction;

pub use account::{ACCOUNT_KEY_WEIGHT_THRESHOLD, Account, AccountKey};
pub use address::{ADDRESS_LENGTH, Address};
pub use block::{Block, BlockHeader};
pub use event::{ACCOUNT_CREATED_EVENT, AccountCreatedEvent};
pub use identifier::Identifier;
pub use key::{
    HashAlgorithm, KEY_GEN_SEED_MAX_LEN, KEY_GEN_SEED_MIN_LEN, PRIVATE_KEY_LEN, PUBLIC_KEY_LEN,
    PrivateKey, PublicKey, SIGNATURE_LEN, Signature, SignatureAlgorithm,
};
pub use result::{Event, TransactionResult, TransactionStatus};
pub use transaction::{
    DEFAULT_GAS_LIMIT, ProposalKey, TRANSACTION_DOMAIN_TAG, Transaction, TransactionSignature,
};
