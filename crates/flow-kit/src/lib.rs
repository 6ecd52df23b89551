//! A small, typed Rust client for the Flow Access API.
//!
//! **flow-kit** covers what it takes to create an account on Flow: reading
//! blocks and accounts, generating ECDSA keys, building and signing the
//! account creation transaction, submitting it and waiting for the seal.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use flow_kit::*;
//!
//! # async fn example() -> Result<(), flow_kit::Error> {
//! let api = RestClient::new(DEFAULT_ACCESS_API_URL);
//!
//! let sponsor: Address = "f8d6e0586b0a20c7".parse()?;
//! let account = api.account_at_latest_block(&sponsor).await?;
//! let key = &account.keys[0];
//! let signer = InMemorySigner::from_hex(
//!     sponsor,
//!     key.index,
//!     key.signature_algorithm,
//!     "4d9287571c8bff7482ffc27ef68d5b4990f9bd009a1e9fa812aae08ba167d57f",
//!     key.hash_algorithm,
//! )?;
//!
//! let block = api.latest_block(true).await?;
//! let new_key = generate_account_key(
//!     &mut rand::rngs::OsRng,
//!     SignatureAlgorithm::EcdsaP256,
//!     HashAlgorithm::Sha3_256,
//!     ACCOUNT_KEY_WEIGHT_THRESHOLD,
//! )?;
//!
//! let tx = build_account_creation(&AccountCreationRequest {
//!     sponsor: &account,
//!     sponsor_key_index: key.index,
//!     reference_block: &block,
//!     keys: vec![new_key.account_key],
//!     contracts: Default::default(),
//!     gas_limit: DEFAULT_GAS_LIMIT,
//! })?;
//!
//! let id = sign_and_submit(&api, tx, &signer).await?;
//! let result = SealPoller::new(&api, PollConfig::default())
//!     .wait_for_seal(id)
//!     .await?;
//! println!("created {}", result.created_address(&id));
//! # Ok(())
//! # }
//! ```
//!
//! # Core Types
//!
//! - [`Address`] - 8-byte account address
//! - [`Identifier`] - 32-byte block and transaction ID
//! - [`PrivateKey`], [`PublicKey`] - ECDSA P-256 and secp256k1 keys
//! - [`Transaction`] - transaction with canonical RLP encoding

pub mod client;
pub mod error;
pub mod templates;
pub mod types;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export commonly used types at crate root
pub use error::{
    AccessError, Error, KeyGenError, ParseAddressError, ParseIdentifierError, ParseKeyError,
    SignerError,
};
pub use types::*;

// Re-export client types
pub use client::{
    AccessApi, AccountCreationRequest, DEFAULT_ACCESS_API_URL, InMemorySigner, NewAccountKey,
    PollConfig, PollEvent, RestClient, RetryConfig, SealPoller, Signer, build_account_creation,
    generate_account_key, proposal_key_for, sign_and_submit, sign_envelope,
};
