//! Client module for talking to a Flow Access node.
//!
//! - [`AccessApi`] - The network seam, implemented by [`RestClient`]
//! - [`RestClient`] - HTTP client for the Access REST API with retry logic
//! - [`Signer`], [`InMemorySigner`] - Transaction signing
//! - [`provision`] - Key generation and account creation transactions
//! - [`sign_and_submit`] - Envelope signing and submission
//! - [`SealPoller`] - Waiting for a transaction to be sealed

mod access;
pub mod poller;
pub mod provision;
mod rest;
mod signer;
mod submit;

pub use access::AccessApi;
pub use poller::{PollConfig, PollEvent, SealPoller};
pub use provision::{
    AccountCreationRequest, NewAccountKey, build_account_creation, generate_account_key,
    proposal_key_for,
};
pub use rest::{DEFAULT_ACCESS_API_URL, RestClient, RetryConfig};
pub use signer::{InMemorySigner, Signer};
pub use submit::{sign_and_submit, sign_envelope};
