//! Signer trait and the in-memory implementation.
//!
//! A `Signer` knows which account key it signs for and produces signatures
//! over raw messages, hashing them with the key's hash algorithm.
//!
//! # Example
//!
//! ```rust
//! use flow_kit::{HashAlgorithm, InMemorySigner, SignatureAlgorithm, Signer};
//!
//! let signer = InMemorySigner::from_hex(
//!     "0xf8d6e0586b0a20c7".parse().unwrap(),
//!     0,
//!     SignatureAlgorithm::EcdsaP256,
//!     "4d9287571c8bff7482ffc27ef68d5b4990f9bd009a1e9fa812aae08ba167d57f",
//!     HashAlgorithm::Sha3_256,
//! )
//! .unwrap();
//!
//! let signature = signer.sign(b"message").unwrap();
//! assert_eq!(signature.as_bytes().len(), 64);
//! ```

use std::sync::Arc;

use crate::error::{ParseKeyError, SignerError};
use crate::types::{Address, HashAlgorithm, PrivateKey, PublicKey, Signature, SignatureAlgorithm};

// ============================================================================
// Signer Trait
// ============================================================================

/// Trait for signing transaction messages.
pub trait Signer: Send + Sync {
    /// The account this signer signs for.
    fn address(&self) -> Address;

    /// Index of the signing key on the account.
    fn key_index(&self) -> u32;

    /// Public half of the signing key.
    fn public_key(&self) -> PublicKey;

    /// Hash and sign `message`.
    fn sign(&self, message: &[u8]) -> Result<Signature, SignerError>;
}

impl Signer for Arc<dyn Signer> {
    fn address(&self) -> Address {
        (**self).address()
    }

    fn key_index(&self) -> u32 {
        (**self).key_index()
    }

    fn public_key(&self) -> PublicKey {
        (**self).public_key()
    }

    fn sign(&self, message: &[u8]) -> Result<Signature, SignerError> {
        (**self).sign(message)
    }
}

// ============================================================================
// InMemorySigner
// ============================================================================

/// A signer holding a single private key in memory.
#[derive(Clone)]
pub struct InMemorySigner {
    address: Address,
    key_index: u32,
    private_key: PrivateKey,
    hash_algorithm: HashAlgorithm,
}

impl InMemorySigner {
    /// Create a signer for `address`'s key at `key_index`.
    pub fn new(
        address: Address,
        key_index: u32,
        private_key: PrivateKey,
        hash_algorithm: HashAlgorithm,
    ) -> Self {
        Self {
            address,
            key_index,
            private_key,
            hash_algorithm,
        }
    }

    /// Create a signer from a hex-encoded private key.
    pub fn from_hex(
        address: Address,
        key_index: u32,
        signature_algorithm: SignatureAlgorithm,
        private_key_hex: &str,
        hash_algorithm: HashAlgorithm,
    ) -> Result<Self, ParseKeyError> {
        let private_key = PrivateKey::from_hex(signature_algorithm, private_key_hex)?;
        Ok(Self::new(address, key_index, private_key, hash_algorithm))
    }

    /// Hash algorithm applied before signing.
    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.hash_algorithm
    }

    /// The private key.
    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }
}

impl std::fmt::Debug for InMemorySigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemorySigner")
            .field("address", &self.address)
            .field("key_index", &self.key_index)
            .field("public_key", &self.private_key.public_key())
            .field("hash_algorithm", &self.hash_algorithm)
            .finish()
    }
}

impl Signer for InMemorySigner {
    fn address(&self) -> Address {
        self.address
    }

    fn key_index(&self) -> u32 {
        self.key_index
    }

    fn public_key(&self) -> PublicKey {
        self.private_key.public_key()
    }

    fn sign(&self, message: &[u8]) -> Result<Signature, SignerError> {
        self.private_key.sign(message, self.hash_algorithm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_HEX: &str = "4d9287571c8bff7482ffc27ef68d5b4990f9bd009a1e9fa812aae08ba167d57f";

    fn signer() -> InMemorySigner {
        InMemorySigner::from_hex(
            "f8d6e0586b0a20c7".parse().unwrap(),
            2,
            SignatureAlgorithm::EcdsaP256,
            KEY_HEX,
            HashAlgorithm::Sha3_256,
        )
        .unwrap()
    }

    #[test]
    fn test_in_memory_signer() {
        let signer = signer();
        assert_eq!(signer.address().to_hex(), "f8d6e0586b0a20c7");
        assert_eq!(signer.key_index(), 2);
        assert_eq!(signer.hash_algorithm(), HashAlgorithm::Sha3_256);

        let sig = signer.sign(b"payload").unwrap();
        assert!(
            signer
                .public_key()
                .verify(b"payload", &sig, HashAlgorithm::Sha3_256)
        );
        assert!(
            !signer
                .public_key()
                .verify(b"payload", &sig, HashAlgorithm::Sha2_256)
        );
    }

    #[test]
    fn test_signer_debug_hides_secret_key() {
        let debug = format!("{:?}", signer());
        assert!(debug.contains("InMemorySigner"));
        assert!(!debug.contains(KEY_HEX));
    }

    #[test]
    fn test_arc_dyn_signer() {
        let signer: Arc<dyn Signer> = Arc::new(signer());
        assert_eq!(signer.key_index(), 2);
        assert!(signer.sign(b"x").is_ok());
    }

    #[test]
    fn test_from_hex_rejects_bad_key() {
        let result = InMemorySigner::from_hex(
            Address::ZERO,
            0,
            SignatureAlgorithm::EcdsaP256,
            "zz",
            HashAlgorithm::Sha3_256,
        );
        assert!(matches!(result, Err(ParseKeyError::InvalidHex(_))));
    }
}
