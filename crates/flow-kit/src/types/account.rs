//! Account and account key types.

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};

use super::{Address, HashAlgorithm, PrivateKey, PublicKey, SignatureAlgorithm};
use crate::error::{KeyGenError, ParseKeyError};

/// Total key weight required to authorize a transaction.
pub const ACCOUNT_KEY_WEIGHT_THRESHOLD: u32 = 1000;

/// A key attached to a Flow account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountKey {
    /// Position of the key on the account.
    pub index: u32,
    /// Public key.
    pub public_key: PublicKey,
    /// Signature algorithm of the key.
    pub signature_algorithm: SignatureAlgorithm,
    /// Hash algorithm used when signing with this key.
    pub hash_algorithm: HashAlgorithm,
    /// Key weight (0..=1000).
    pub weight: u32,
    /// Next expected proposal sequence number.
    pub sequence_number: u64,
    /// Revoked keys cannot sign.
    pub revoked: bool,
}

impl AccountKey {
    /// Describe a new key for `private_key`, ready to attach to an account.
    ///
    /// Index and sequence number start at zero; the chain assigns the
    /// real index when the key is added.
    pub fn from_private_key(
        private_key: &PrivateKey,
        hash_algorithm: HashAlgorithm,
        weight: u32,
    ) -> Result<Self, KeyGenError> {
        if weight == 0 || weight > ACCOUNT_KEY_WEIGHT_THRESHOLD {
            return Err(KeyGenError::InvalidWeight(weight));
        }
        Ok(Self {
            index: 0,
            public_key: private_key.public_key(),
            signature_algorithm: private_key.algorithm(),
            hash_algorithm,
            weight,
            sequence_number: 0,
            revoked: false,
        })
    }

    /// Weight as a Cadence `UFix64` literal (`"1000.00000000"`).
    pub fn weight_ufix64(&self) -> String {
        format!("{}.00000000", self.weight)
    }
}

#[serde_as]
#[derive(Deserialize)]
struct AccountKeyView {
    #[serde_as(as = "DisplayFromStr")]
    index: u32,
    public_key: String,
    signing_algorithm: SignatureAlgorithm,
    hashing_algorithm: HashAlgorithm,
    #[serde_as(as = "DisplayFromStr")]
    sequence_number: u64,
    #[serde_as(as = "DisplayFromStr")]
    weight: u32,
    #[serde(default)]
    revoked: bool,
}

impl TryFrom<AccountKeyView> for AccountKey {
    type Error = ParseKeyError;

    fn try_from(view: AccountKeyView) -> Result<Self, Self::Error> {
        Ok(Self {
            index: view.index,
            public_key: PublicKey::from_hex(view.signing_algorithm, &view.public_key)?,
            signature_algorithm: view.signing_algorithm,
            hash_algorithm: view.hashing_algorithm,
            weight: view.weight,
            sequence_number: view.sequence_number,
            revoked: view.revoked,
        })
    }
}

impl<'de> Deserialize<'de> for AccountKey {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let view = AccountKeyView::deserialize(d)?;
        AccountKey::try_from(view).map_err(serde::de::Error::custom)
    }
}

/// A Flow account as returned by the Access API.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Account {
    /// Account address.
    pub address: Address,
    /// Balance in the smallest FLOW unit.
    #[serde_as(as = "DisplayFromStr")]
    pub balance: u64,
    /// Keys attached to the account.
    #[serde(default)]
    pub keys: Vec<AccountKey>,
    /// Deployed contract code by name.
    #[serde(default, deserialize_with = "deserialize_contracts")]
    pub contracts: BTreeMap<String, Vec<u8>>,
}

impl Account {
    /// Find the key at `index`.
    pub fn key(&self, index: u32) -> Option<&AccountKey> {
        self.keys.iter().find(|k| k.index == index)
    }
}

fn deserialize_contracts<'de, D: serde::Deserializer<'de>>(
    d: D,
) -> Result<BTreeMap<String, Vec<u8>>, D::Error> {
    let encoded: Option<BTreeMap<String, String>> = Deserialize::deserialize(d)?;
    encoded
        .unwrap_or_default()
        .into_iter()
        .map(|(name, code)| {
            STANDARD
                .decode(code)
                .map(|bytes| (name, bytes))
                .map_err(serde::de::Error::custom)
        })
        .collect()
}
