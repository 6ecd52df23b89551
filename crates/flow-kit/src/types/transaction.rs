//! Transaction types and canonical encoding.
//!
//! Flow signs RLP-encoded messages prefixed with a 32-byte domain tag:
//!
//! - payload: `[script, [arguments], reference_block_id, gas_limit,
//!   proposer_address, proposer_key_index, proposer_sequence_number, payer,
//!   [authorizers]]`
//! - envelope: `[payload, [payload_signatures]]`
//!
//! Each signature is encoded as `[signer_index, key_index, signature]`
//! where `signer_index` is the position of the signing account in the
//! deduplicated signer list (proposer, payer, authorizers). Signatures are
//! sorted by `(signer_index, key_index)` before encoding.

use alloy_rlp::{Encodable, Header};

use super::{Address, Identifier, Signature};
use super::cadence::Value;
use crate::error::Error;

/// Domain tag prepended to transaction signing messages, right-padded with
/// zeros to 32 bytes.
pub const TRANSACTION_DOMAIN_TAG: [u8; 32] = domain_tag(b"FLOW-V0.0-transaction");

/// Default computation limit.
pub const DEFAULT_GAS_LIMIT: u64 = 9999;

const fn domain_tag(tag: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    let mut i = 0;
    while i < tag.len() {
        out[i] = tag[i];
        i += 1;
    }
    out
}

/// The account key that proposes a transaction and supplies its sequence
/// number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProposalKey {
    pub address: Address,
    pub key_index: u32,
    pub sequence_number: u64,
}

/// A signature attached to a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionSignature {
    pub address: Address,
    pub key_index: u32,
    pub signature: Signature,
}

/// A Flow transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// Cadence source.
    pub script: Vec<u8>,
    /// JSON-Cadence encoded arguments.
    pub arguments: Vec<Vec<u8>>,
    /// Block the transaction's expiry window is measured from.
    pub reference_block_id: Identifier,
    /// Computation limit.
    pub gas_limit: u64,
    pub proposal_key: ProposalKey,
    pub payer: Address,
    pub authorizers: Vec<Address>,
    pub payload_signatures: Vec<TransactionSignature>,
    pub envelope_signatures: Vec<TransactionSignature>,
}

impl Transaction {
    /// Create an unsigned transaction for `script` with default gas limit.
    pub fn new(script: impl Into<Vec<u8>>) -> Self {
        Self {
            script: script.into(),
            arguments: Vec::new(),
            reference_block_id: Identifier::ZERO,
            gas_limit: DEFAULT_GAS_LIMIT,
            proposal_key: ProposalKey::default(),
            payer: Address::ZERO,
            authorizers: Vec::new(),
            payload_signatures: Vec::new(),
            envelope_signatures: Vec::new(),
        }
    }

    /// Append a JSON-Cadence argument.
    pub fn add_argument(&mut self, value: &Value) -> Result<&mut Self, Error> {
        self.arguments.push(value.encode()?);
        Ok(self)
    }

    pub fn set_reference_block_id(&mut self, id: Identifier) -> &mut Self {
        self.reference_block_id = id;
        self
    }

    pub fn set_gas_limit(&mut self, gas_limit: u64) -> &mut Self {
        self.gas_limit = gas_limit;
        self
    }

    pub fn set_proposal_key(
        &mut self,
        address: Address,
        key_index: u32,
        sequence_number: u64,
    ) -> &mut Self {
        self.proposal_key = ProposalKey {
            address,
            key_index,
            sequence_number,
        };
        self
    }

    pub fn set_payer(&mut self, payer: Address) -> &mut Self {
        self.payer = payer;
        self
    }

    pub fn add_authorizer(&mut self, address: Address) -> &mut Self {
        self.authorizers.push(address);
        self
    }

    /// Accounts that must sign, in order, without duplicates: proposer,
    /// payer, then authorizers.
    pub fn signers(&self) -> Vec<Address> {
        let mut signers = Vec::with_capacity(2 + self.authorizers.len());
        let candidates = [self.proposal_key.address, self.payer]
            .into_iter()
            .chain(self.authorizers.iter().copied());
        for address in candidates {
            if !signers.contains(&address) {
                signers.push(address);
            }
        }
        signers
    }

    fn signer_index(&self, address: &Address) -> Option<usize> {
        self.signers().iter().position(|a| a == address)
    }

    /// Check that the transaction has everything a node requires.
    pub fn validate(&self) -> Result<(), Error> {
        if self.script.is_empty() {
            return Err(Error::InvalidTransaction("script is empty".into()));
        }
        if self.reference_block_id.is_zero() {
            return Err(Error::InvalidTransaction(
                "reference block ID is not set".into(),
            ));
        }
        if self.gas_limit == 0 {
            return Err(Error::InvalidTransaction("gas limit is zero".into()));
        }
        if self.proposal_key.address.is_zero() {
            return Err(Error::InvalidTransaction("proposal key is not set".into()));
        }
        if self.payer.is_zero() {
            return Err(Error::InvalidTransaction("payer is not set".into()));
        }
        Ok(())
    }

    // ─── Signatures ───

    /// Attach a payload signature from one of the transaction's signers.
    pub fn add_payload_signature(
        &mut self,
        address: Address,
        key_index: u32,
        signature: Signature,
    ) -> Result<(), Error> {
        self.check_signer(&address)?;
        self.payload_signatures.push(TransactionSignature {
            address,
            key_index,
            signature,
        });
        Ok(())
    }

    /// Attach an envelope signature from one of the transaction's signers.
    pub fn add_envelope_signature(
        &mut self,
        address: Address,
        key_index: u32,
        signature: Signature,
    ) -> Result<(), Error> {
        self.check_signer(&address)?;
        self.envelope_signatures.push(TransactionSignature {
            address,
            key_index,
            signature,
        });
        Ok(())
    }

    fn check_signer(&self, address: &Address) -> Result<(), Error> {
        if self.signer_index(address).is_none() {
            return Err(Error::InvalidTransaction(format!(
                "{} is not a signer of this transaction",
                address
            )));
        }
        Ok(())
    }

    // ─── Encoding ───

    /// RLP-encoded payload without domain tag.
    pub fn payload_message(&self) -> Vec<u8> {
        let arguments: Vec<Vec<u8>> = self.arguments.iter().map(|a| rlp_bytes(a)).collect();
        let authorizers: Vec<Vec<u8>> = self
            .authorizers
            .iter()
            .map(|a| rlp_bytes(a.as_bytes()))
            .collect();

        rlp_list(&[
            rlp_bytes(&self.script),
            rlp_list(&arguments),
            rlp_bytes(self.reference_block_id.as_bytes()),
            rlp_u64(self.gas_limit),
            rlp_bytes(self.proposal_key.address.as_bytes()),
            rlp_u64(u64::from(self.proposal_key.key_index)),
            rlp_u64(self.proposal_key.sequence_number),
            rlp_bytes(self.payer.as_bytes()),
            rlp_list(&authorizers),
        ])
    }

    /// RLP-encoded envelope without domain tag.
    pub fn envelope_message(&self) -> Vec<u8> {
        rlp_list(&[
            self.payload_message(),
            self.encode_signatures(&self.payload_signatures),
        ])
    }

    /// Bytes a payload signer signs.
    pub fn signable_payload(&self) -> Vec<u8> {
        with_domain_tag(self.payload_message())
    }

    /// Bytes an envelope signer signs.
    pub fn signable_envelope(&self) -> Vec<u8> {
        with_domain_tag(self.envelope_message())
    }

    /// Transaction ID: SHA3-256 of the fully signed canonical form.
    pub fn id(&self) -> Identifier {
        let canonical = rlp_list(&[
            self.payload_message(),
            self.encode_signatures(&self.payload_signatures),
            self.encode_signatures(&self.envelope_signatures),
        ]);
        Identifier::hash(&canonical)
    }

    fn encode_signatures(&self, signatures: &[TransactionSignature]) -> Vec<u8> {
        let signers = self.signers();
        let mut indexed: Vec<(usize, &TransactionSignature)> = signatures
            .iter()
            .filter_map(|sig| {
                signers
                    .iter()
                    .position(|a| *a == sig.address)
                    .map(|index| (index, sig))
            })
            .collect();
        indexed.sort_by_key(|(index, sig)| (*index, sig.key_index));

        let items: Vec<Vec<u8>> = indexed
            .into_iter()
            .map(|(index, sig)| {
                rlp_list(&[
                    rlp_u64(index as u64),
                    rlp_u64(u64::from(sig.key_index)),
                    rlp_bytes(sig.signature.as_bytes()),
                ])
            })
            .collect();
        rlp_list(&items)
    }
}

fn with_domain_tag(message: Vec<u8>) -> Vec<u8> {
    let mut out = Vec::with_capacity(TRANSACTION_DOMAIN_TAG.len() + message.len());
    out.extend_from_slice(&TRANSACTION_DOMAIN_TAG);
    out.extend(message);
    out
}

fn rlp_bytes(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len() + 3);
    bytes.encode(&mut out);
    out
}

fn rlp_u64(value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(9);
    value.encode(&mut out);
    out
}

/// Wrap already-encoded items in a list header.
fn rlp_list(items: &[Vec<u8>]) -> Vec<u8> {
    let payload_length = items.iter().map(Vec::len).sum();
    let mut out = Vec::with_capacity(payload_length + 9);
    Header {
        list: true,
        payload_length,
    }
    .encode(&mut out);
    for item in items {
        out.extend_from_slice(item);
    }
    out
}
