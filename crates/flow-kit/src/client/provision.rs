//! Key generation and account creation transactions.
//!
//! Nothing here touches the network: the caller fetches the sponsor account
//! and reference block, and gets back an unsigned [`Transaction`].

use std::collections::BTreeMap;

use rand::{CryptoRng, RngCore};

use crate::error::{Error, KeyGenError};
use crate::templates;
use crate::types::{
    Account, AccountKey, Block, HashAlgorithm, PrivateKey, ProposalKey, SignatureAlgorithm,
    Transaction,
};

/// A freshly generated key and the account key describing it.
#[derive(Debug, Clone)]
pub struct NewAccountKey {
    pub private_key: PrivateKey,
    pub account_key: AccountKey,
}

/// Generate a new private key from `rng` and wrap it as an account key.
pub fn generate_account_key<R: RngCore + CryptoRng>(
    rng: &mut R,
    signature_algorithm: SignatureAlgorithm,
    hash_algorithm: HashAlgorithm,
    weight: u32,
) -> Result<NewAccountKey, KeyGenError> {
    let private_key = PrivateKey::random(signature_algorithm, rng)?;
    let account_key = AccountKey::from_private_key(&private_key, hash_algorithm, weight)?;
    Ok(NewAccountKey {
        private_key,
        account_key,
    })
}

/// Proposal key for `account`'s key at `key_index`, using its current
/// sequence number.
pub fn proposal_key_for(account: &Account, key_index: u32) -> Result<ProposalKey, Error> {
    let key = account
        .key(key_index)
        .filter(|k| !k.revoked)
        .ok_or(Error::KeyNotFound {
            address: account.address,
            key_index,
        })?;

    Ok(ProposalKey {
        address: account.address,
        key_index,
        sequence_number: key.sequence_number,
    })
}

/// Everything needed to build an account creation transaction.
#[derive(Debug, Clone)]
pub struct AccountCreationRequest<'a> {
    /// Sponsor account as of the reference block.
    pub sponsor: &'a Account,
    /// Sponsor key that proposes and pays.
    pub sponsor_key_index: u32,
    /// Block the transaction references.
    pub reference_block: &'a Block,
    /// Keys to add to the new account.
    pub keys: Vec<AccountKey>,
    /// Contracts to deploy to the new account.
    pub contracts: BTreeMap<String, Vec<u8>>,
    pub gas_limit: u64,
}

/// Build the unsigned account creation transaction. The sponsor is
/// proposer, payer and sole authorizer.
pub fn build_account_creation(request: &AccountCreationRequest<'_>) -> Result<Transaction, Error> {
    let proposal_key = proposal_key_for(request.sponsor, request.sponsor_key_index)?;

    let mut tx = templates::create_account(&request.keys, &request.contracts, request.sponsor.address)?;
    tx.set_reference_block_id(request.reference_block.id())
        .set_gas_limit(request.gas_limit)
        .set_proposal_key(
            proposal_key.address,
            proposal_key.key_index,
            proposal_key.sequence_number,
        );
    tx.validate()?;

    tracing::debug!(
        sponsor = %request.sponsor.address,
        sequence_number = proposal_key.sequence_number,
        reference_block = %request.reference_block.id(),
        keys = request.keys.len(),
        "Built account creation transaction"
    );
    Ok(tx)
}
