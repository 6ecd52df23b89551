//! Signature and hash algorithms, and ECDSA key types for Flow.
//!
//! Flow accounts hold ECDSA keys on either the NIST P-256 curve or
//! secp256k1. Public keys are the 64-byte uncompressed point without the
//! SEC1 `0x04` tag; signatures are the 64-byte `r || s` concatenation over
//! a 32-byte message digest.

use std::fmt::{self, Debug, Display};
use std::str::FromStr;

use hkdf::Hkdf;
use num_bigint::BigUint;
use p256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use p256::elliptic_curve::sec1::ToEncodedPoint;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::Sha256;
use sha3::Digest;

use crate::error::{KeyGenError, ParseKeyError, SignerError};

/// Minimum seed length accepted by [`PrivateKey::generate`].
pub const KEY_GEN_SEED_MIN_LEN: usize = 32;

/// Maximum seed length accepted by [`PrivateKey::generate`].
pub const KEY_GEN_SEED_MAX_LEN: usize = 256;

/// Length of a raw private key scalar.
pub const PRIVATE_KEY_LEN: usize = 32;

/// Length of an encoded public key.
pub const PUBLIC_KEY_LEN: usize = 64;

/// Length of an encoded signature.
pub const SIGNATURE_LEN: usize = 64;

// Group orders, big-endian.
const P256_ORDER: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0x00, 0x00, 0x00, 0x00, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xbc, 0xe6, 0xfa, 0xad, 0xa7, 0x17, 0x9e, 0x84, 0xf3, 0xb9, 0xca, 0xc2, 0xfc, 0x63,
    0x25, 0x51,
];
const SECP256K1_ORDER: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xfe, 0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b, 0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36,
    0x41, 0x41,
];

// ============================================================================
// Algorithms
// ============================================================================

/// Signature algorithm of an account key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum SignatureAlgorithm {
    /// ECDSA on the NIST P-256 curve.
    #[default]
    EcdsaP256,
    /// ECDSA on the secp256k1 curve.
    EcdsaSecp256k1,
}

impl SignatureAlgorithm {
    /// Canonical name as reported by the Access API.
    pub fn as_str(&self) -> &'static str {
        match self {
            SignatureAlgorithm::EcdsaP256 => "ECDSA_P256",
            SignatureAlgorithm::EcdsaSecp256k1 => "ECDSA_secp256k1",
        }
    }

    /// Protocol-level numeric code.
    pub fn code(&self) -> u32 {
        match self {
            SignatureAlgorithm::EcdsaP256 => 2,
            SignatureAlgorithm::EcdsaSecp256k1 => 3,
        }
    }

    /// Raw value of the Cadence `SignatureAlgorithm` enum.
    pub fn cadence_raw_value(&self) -> u8 {
        match self {
            SignatureAlgorithm::EcdsaP256 => 1,
            SignatureAlgorithm::EcdsaSecp256k1 => 2,
        }
    }

    fn curve_order(&self) -> &'static [u8; 32] {
        match self {
            SignatureAlgorithm::EcdsaP256 => &P256_ORDER,
            SignatureAlgorithm::EcdsaSecp256k1 => &SECP256K1_ORDER,
        }
    }
}

impl Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignatureAlgorithm {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ECDSA_P256" | "P256" | "P-256" => Ok(SignatureAlgorithm::EcdsaP256),
            "ECDSA_SECP256K1" | "SECP256K1" => Ok(SignatureAlgorithm::EcdsaSecp256k1),
            _ => Err(ParseKeyError::UnknownSignatureAlgorithm(s.to_string())),
        }
    }
}

impl TryFrom<u32> for SignatureAlgorithm {
    type Error = ParseKeyError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            2 => Ok(SignatureAlgorithm::EcdsaP256),
            3 => Ok(SignatureAlgorithm::EcdsaSecp256k1),
            _ => Err(ParseKeyError::UnknownSignatureAlgorithm(code.to_string())),
        }
    }
}

impl Serialize for SignatureAlgorithm {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SignatureAlgorithm {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s: String = Deserialize::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Hash algorithm applied to a message before signing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum HashAlgorithm {
    /// SHA2-256.
    Sha2_256,
    /// SHA3-256.
    #[default]
    Sha3_256,
}

impl HashAlgorithm {
    /// Canonical name as reported by the Access API.
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha2_256 => "SHA2_256",
            HashAlgorithm::Sha3_256 => "SHA3_256",
        }
    }

    /// Protocol-level numeric code.
    pub fn code(&self) -> u32 {
        match self {
            HashAlgorithm::Sha2_256 => 1,
            HashAlgorithm::Sha3_256 => 3,
        }
    }

    /// Raw value of the Cadence `HashAlgorithm` enum.
    pub fn cadence_raw_value(&self) -> u8 {
        match self {
            HashAlgorithm::Sha2_256 => 1,
            HashAlgorithm::Sha3_256 => 3,
        }
    }

    /// Hash a message to a 32-byte digest.
    pub fn digest(&self, message: &[u8]) -> [u8; 32] {
        let mut out = [0u8; 32];
        match self {
            HashAlgorithm::Sha2_256 => out.copy_from_slice(&sha2::Sha256::digest(message)),
            HashAlgorithm::Sha3_256 => out.copy_from_slice(&sha3::Sha3_256::digest(message)),
        }
        out
    }
}

impl Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SHA2_256" | "SHA256" | "SHA2-256" => Ok(HashAlgorithm::Sha2_256),
            "SHA3_256" | "SHA3-256" => Ok(HashAlgorithm::Sha3_256),
            _ => Err(ParseKeyError::UnknownHashAlgorithm(s.to_string())),
        }
    }
}

impl TryFrom<u32> for HashAlgorithm {
    type Error = ParseKeyError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(HashAlgorithm::Sha2_256),
            3 => Ok(HashAlgorithm::Sha3_256),
            _ => Err(ParseKeyError::UnknownHashAlgorithm(code.to_string())),
        }
    }
}

impl Serialize for HashAlgorithm {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for HashAlgorithm {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s: String = Deserialize::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Public Key
// ============================================================================

/// ECDSA public key: 64 bytes, uncompressed point without the SEC1 tag.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PublicKey {
    algorithm: SignatureAlgorithm,
    bytes: [u8; PUBLIC_KEY_LEN],
}

impl PublicKey {
    /// Parse a hex-encoded public key (with or without `0x`) and check that
    /// it is a point on the algorithm's curve.
    pub fn from_hex(algorithm: SignatureAlgorithm, s: &str) -> Result<Self, ParseKeyError> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let data = hex::decode(digits).map_err(|e| ParseKeyError::InvalidHex(e.to_string()))?;
        Self::from_slice(algorithm, &data)
    }

    /// Build from raw 64 bytes, checking the point is on the curve.
    pub fn from_slice(algorithm: SignatureAlgorithm, data: &[u8]) -> Result<Self, ParseKeyError> {
        if data.len() != PUBLIC_KEY_LEN {
            return Err(ParseKeyError::InvalidLength {
                expected: PUBLIC_KEY_LEN,
                actual: data.len(),
            });
        }

        let mut sec1 = Vec::with_capacity(PUBLIC_KEY_LEN + 1);
        sec1.push(0x04);
        sec1.extend_from_slice(data);
        match algorithm {
            SignatureAlgorithm::EcdsaP256 => {
                p256::ecdsa::VerifyingKey::from_sec1_bytes(&sec1)
                    .map_err(|_| ParseKeyError::InvalidKey("ECDSA_P256"))?;
            }
            SignatureAlgorithm::EcdsaSecp256k1 => {
                k256::ecdsa::VerifyingKey::from_sec1_bytes(&sec1)
                    .map_err(|_| ParseKeyError::InvalidKey("ECDSA_secp256k1"))?;
            }
        }

        let mut bytes = [0u8; PUBLIC_KEY_LEN];
        bytes.copy_from_slice(data);
        Ok(Self { algorithm, bytes })
    }

    /// Get the signature algorithm.
    pub fn algorithm(&self) -> SignatureAlgorithm {
        self.algorithm
    }

    /// Get the raw 64 bytes.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.bytes
    }

    /// Lowercase hex without prefix.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Verify a signature over `message` hashed with `hash`.
    pub fn verify(&self, message: &[u8], signature: &Signature, hash: HashAlgorithm) -> bool {
        let digest = hash.digest(message);
        let mut sec1 = Vec::with_capacity(PUBLIC_KEY_LEN + 1);
        sec1.push(0x04);
        sec1.extend_from_slice(&self.bytes);

        match self.algorithm {
            SignatureAlgorithm::EcdsaP256 => {
                let Ok(key) = p256::ecdsa::VerifyingKey::from_sec1_bytes(&sec1) else {
                    return false;
                };
                let Ok(sig) = p256::ecdsa::Signature::from_slice(signature.as_bytes()) else {
                    return false;
                };
                key.verify_prehash(&digest, &sig).is_ok()
            }
            SignatureAlgorithm::EcdsaSecp256k1 => {
                let Ok(key) = k256::ecdsa::VerifyingKey::from_sec1_bytes(&sec1) else {
                    return false;
                };
                let Ok(sig) = k256::ecdsa::Signature::from_slice(signature.as_bytes()) else {
                    return false;
                };
                key.verify_prehash(&digest, &sig).is_ok()
            }
        }
    }
}

impl Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({}, {})", self.algorithm, self)
    }
}

// ============================================================================
// Private Key
// ============================================================================

#[derive(Clone)]
enum SigningKey {
    P256(p256::ecdsa::SigningKey),
    Secp256k1(k256::ecdsa::SigningKey),
}

/// ECDSA private key on one of the supported curves.
///
/// `Debug` never prints the key material; use [`PrivateKey::to_hex`] to
/// export it deliberately.
#[derive(Clone)]
pub struct PrivateKey {
    inner: SigningKey,
}

impl PrivateKey {
    /// Derive a private key deterministically from a seed.
    ///
    /// The seed must be between [`KEY_GEN_SEED_MIN_LEN`] and
    /// [`KEY_GEN_SEED_MAX_LEN`] bytes. It is expanded with HKDF-SHA256 to
    /// 48 bytes and reduced into `[1, n-1]` for the curve order `n`.
    pub fn generate(algorithm: SignatureAlgorithm, seed: &[u8]) -> Result<Self, KeyGenError> {
        if !(KEY_GEN_SEED_MIN_LEN..=KEY_GEN_SEED_MAX_LEN).contains(&seed.len()) {
            return Err(KeyGenError::InvalidSeedLength {
                actual: seed.len(),
                min: KEY_GEN_SEED_MIN_LEN,
                max: KEY_GEN_SEED_MAX_LEN,
            });
        }

        let mut okm = [0u8; PRIVATE_KEY_LEN + 16];
        Hkdf::<Sha256>::new(None, seed)
            .expand(&[], &mut okm)
            .map_err(|e| KeyGenError::Derivation(e.to_string()))?;

        let order = BigUint::from_bytes_be(algorithm.curve_order());
        let scalar = BigUint::from_bytes_be(&okm) % (&order - 1u32) + 1u32;

        let raw = scalar.to_bytes_be();
        let mut bytes = [0u8; PRIVATE_KEY_LEN];
        bytes[PRIVATE_KEY_LEN - raw.len()..].copy_from_slice(&raw);

        Self::from_slice(algorithm, &bytes).map_err(|e| KeyGenError::Derivation(e.to_string()))
    }

    /// Generate a key from fresh randomness.
    pub fn random<R: RngCore + CryptoRng>(
        algorithm: SignatureAlgorithm,
        rng: &mut R,
    ) -> Result<Self, KeyGenError> {
        let mut seed = [0u8; KEY_GEN_SEED_MIN_LEN];
        rng.try_fill_bytes(&mut seed)
            .map_err(|e| KeyGenError::Entropy(e.to_string()))?;
        Self::generate(algorithm, &seed)
    }

    /// Parse a hex-encoded 32-byte scalar (with or without `0x`).
    pub fn from_hex(algorithm: SignatureAlgorithm, s: &str) -> Result<Self, ParseKeyError> {
        let s = s.trim();
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let data = hex::decode(digits).map_err(|e| ParseKeyError::InvalidHex(e.to_string()))?;
        Self::from_slice(algorithm, &data)
    }

    /// Build from a raw 32-byte scalar.
    pub fn from_slice(algorithm: SignatureAlgorithm, data: &[u8]) -> Result<Self, ParseKeyError> {
        if data.len() != PRIVATE_KEY_LEN {
            return Err(ParseKeyError::InvalidLength {
                expected: PRIVATE_KEY_LEN,
                actual: data.len(),
            });
        }

        let inner = match algorithm {
            SignatureAlgorithm::EcdsaP256 => SigningKey::P256(
                p256::ecdsa::SigningKey::from_slice(data)
                    .map_err(|_| ParseKeyError::InvalidKey("ECDSA_P256"))?,
            ),
            SignatureAlgorithm::EcdsaSecp256k1 => SigningKey::Secp256k1(
                k256::ecdsa::SigningKey::from_slice(data)
                    .map_err(|_| ParseKeyError::InvalidKey("ECDSA_secp256k1"))?,
            ),
        };
        Ok(Self { inner })
    }

    /// Get the signature algorithm.
    pub fn algorithm(&self) -> SignatureAlgorithm {
        match self.inner {
            SigningKey::P256(_) => SignatureAlgorithm::EcdsaP256,
            SigningKey::Secp256k1(_) => SignatureAlgorithm::EcdsaSecp256k1,
        }
    }

    /// Derive the public key.
    pub fn public_key(&self) -> PublicKey {
        let point = match &self.inner {
            SigningKey::P256(key) => key.verifying_key().to_encoded_point(false).as_bytes().to_vec(),
            SigningKey::Secp256k1(key) => {
                key.verifying_key().to_encoded_point(false).as_bytes().to_vec()
            }
        };

        // Uncompressed SEC1 is always 0x04 || x || y
        let mut bytes = [0u8; PUBLIC_KEY_LEN];
        bytes.copy_from_slice(&point[1..]);
        PublicKey {
            algorithm: self.algorithm(),
            bytes,
        }
    }

    /// Hash `message` with `hash` and sign the digest.
    pub fn sign(&self, message: &[u8], hash: HashAlgorithm) -> Result<Signature, SignerError> {
        let digest = hash.digest(message);
        let bytes = match &self.inner {
            SigningKey::P256(key) => {
                let sig: p256::ecdsa::Signature = key
                    .sign_prehash(&digest)
                    .map_err(|e| SignerError::SigningFailed(e.to_string()))?;
                sig.to_bytes().to_vec()
            }
            SigningKey::Secp256k1(key) => {
                let sig: k256::ecdsa::Signature = key
                    .sign_prehash(&digest)
                    .map_err(|e| SignerError::SigningFailed(e.to_string()))?;
                sig.to_bytes().to_vec()
            }
        };
        Ok(Signature(bytes))
    }

    /// Raw 32-byte scalar.
    pub fn to_bytes(&self) -> [u8; PRIVATE_KEY_LEN] {
        let mut out = [0u8; PRIVATE_KEY_LEN];
        match &self.inner {
            SigningKey::P256(key) => out.copy_from_slice(&key.to_bytes()),
            SigningKey::Secp256k1(key) => out.copy_from_slice(&key.to_bytes()),
        }
        out
    }

    /// Lowercase hex of the scalar without prefix.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.algorithm() == other.algorithm() && self.to_bytes() == other.to_bytes()
    }
}

impl Eq for PrivateKey {}

impl Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey({}, [redacted])", self.algorithm())
    }
}

// ============================================================================
// Signature
// ============================================================================

/// Raw signature bytes (`r || s`).
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Signature(Vec<u8>);

impl Signature {
    /// Wrap raw signature bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Lowercase hex without prefix.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl From<Vec<u8>> for Signature {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const SEED: [u8; 32] = [7u8; 32];

    #[test]
    fn test_algorithm_names_and_codes() {
        assert_eq!(SignatureAlgorithm::EcdsaP256.as_str(), "ECDSA_P256");
        assert_eq!(SignatureAlgorithm::EcdsaSecp256k1.as_str(), "ECDSA_secp256k1");
        assert_eq!(SignatureAlgorithm::EcdsaP256.code(), 2);
        assert_eq!(SignatureAlgorithm::EcdsaSecp256k1.code(), 3);
        assert_eq!(SignatureAlgorithm::EcdsaP256.cadence_raw_value(), 1);
        assert_eq!(SignatureAlgorithm::EcdsaSecp256k1.cadence_raw_value(), 2);

        assert_eq!(HashAlgorithm::Sha2_256.code(), 1);
        assert_eq!(HashAlgorithm::Sha3_256.code(), 3);
        assert_eq!(HashAlgorithm::Sha3_256.cadence_raw_value(), 3);
    }

    #[test]
    fn test_algorithm_parsing() {
        assert_eq!(
            "ECDSA_P256".parse::<SignatureAlgorithm>().unwrap(),
            SignatureAlgorithm::EcdsaP256
        );
        assert_eq!(
            "ecdsa_secp256k1".parse::<SignatureAlgorithm>().unwrap(),
            SignatureAlgorithm::EcdsaSecp256k1
        );
        assert_eq!(
            "sha2_256".parse::<HashAlgorithm>().unwrap(),
            HashAlgorithm::Sha2_256
        );
        assert!(matches!(
            "BLS".parse::<SignatureAlgorithm>(),
            Err(ParseKeyError::UnknownSignatureAlgorithm(_))
        ));
        assert!(matches!(
            "KECCAK".parse::<HashAlgorithm>(),
            Err(ParseKeyError::UnknownHashAlgorithm(_))
        ));
        assert_eq!(
            SignatureAlgorithm::try_from(3).unwrap(),
            SignatureAlgorithm::EcdsaSecp256k1
        );
        assert!(HashAlgorithm::try_from(2).is_err());
    }

    #[test]
    fn test_digests() {
        assert_eq!(
            hex::encode(HashAlgorithm::Sha2_256.digest(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(
            hex::encode(HashAlgorithm::Sha3_256.digest(b"abc")),
            "3a985da74fe225b2045c172d6bd390bd855f086e3e9d525b46bfe24511431532"
        );
    }

    #[test]
    fn test_generate_is_deterministic() {
        for algorithm in [SignatureAlgorithm::EcdsaP256, SignatureAlgorithm::EcdsaSecp256k1] {
            let a = PrivateKey::generate(algorithm, &SEED).unwrap();
            let b = PrivateKey::generate(algorithm, &SEED).unwrap();
            assert_eq!(a, b);
            assert_eq!(a.public_key(), b.public_key());

            let other = PrivateKey::generate(algorithm, &[8u8; 32]).unwrap();
            assert_ne!(a, other);
        }
    }

    #[test]
    fn test_generate_rejects_bad_seed_length() {
        let short = PrivateKey::generate(SignatureAlgorithm::EcdsaP256, &[0u8; 31]);
        assert!(matches!(
            short,
            Err(KeyGenError::InvalidSeedLength { actual: 31, .. })
        ));

        let long = PrivateKey::generate(SignatureAlgorithm::EcdsaP256, &[0u8; 257]);
        assert!(matches!(
            long,
            Err(KeyGenError::InvalidSeedLength { actual: 257, .. })
        ));

        assert!(PrivateKey::generate(SignatureAlgorithm::EcdsaP256, &[0u8; 256]).is_ok());
    }

    #[test]
    fn test_random_uses_rng() {
        let mut rng = StdRng::seed_from_u64(42);
        let a = PrivateKey::random(SignatureAlgorithm::EcdsaP256, &mut rng).unwrap();
        let b = PrivateKey::random(SignatureAlgorithm::EcdsaP256, &mut rng).unwrap();
        assert_ne!(a, b);

        let mut replay = StdRng::seed_from_u64(42);
        let c = PrivateKey::random(SignatureAlgorithm::EcdsaP256, &mut replay).unwrap();
        assert_eq!(a, c);
    }

    #[test]
    fn test_hex_roundtrip() {
        let key = PrivateKey::generate(SignatureAlgorithm::EcdsaSecp256k1, &SEED).unwrap();
        let hex = key.to_hex();
        assert_eq!(hex.len(), 64);

        let parsed = PrivateKey::from_hex(SignatureAlgorithm::EcdsaSecp256k1, &hex).unwrap();
        assert_eq!(key, parsed);

        let prefixed =
            PrivateKey::from_hex(SignatureAlgorithm::EcdsaSecp256k1, &format!("0x{}", hex))
                .unwrap();
        assert_eq!(key, prefixed);
    }

    #[test]
    fn test_private_key_rejects_bad_input() {
        assert!(matches!(
            PrivateKey::from_hex(SignatureAlgorithm::EcdsaP256, "abcd"),
            Err(ParseKeyError::InvalidLength {
                expected: 32,
                actual: 2
            })
        ));
        assert!(matches!(
            PrivateKey::from_hex(SignatureAlgorithm::EcdsaP256, "not hex"),
            Err(ParseKeyError::InvalidHex(_))
        ));
        // Zero is not a valid scalar
        assert!(matches!(
            PrivateKey::from_slice(SignatureAlgorithm::EcdsaP256, &[0u8; 32]),
            Err(ParseKeyError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_public_key_encoding() {
        let key = PrivateKey::generate(SignatureAlgorithm::EcdsaP256, &SEED).unwrap();
        let public = key.public_key();
        assert_eq!(public.as_bytes().len(), PUBLIC_KEY_LEN);
        assert_eq!(public.to_hex().len(), 128);

        let parsed = PublicKey::from_hex(SignatureAlgorithm::EcdsaP256, &public.to_string()).unwrap();
        assert_eq!(parsed, public);
    }

    #[test]
    fn test_public_key_rejects_off_curve_point() {
        let result = PublicKey::from_slice(SignatureAlgorithm::EcdsaSecp256k1, &[1u8; 64]);
        assert!(matches!(result, Err(ParseKeyError::InvalidKey(_))));
    }

    #[test]
    fn test_sign_and_verify() {
        for algorithm in [SignatureAlgorithm::EcdsaP256, SignatureAlgorithm::EcdsaSecp256k1] {
            for hash in [HashAlgorithm::Sha2_256, HashAlgorithm::Sha3_256] {
                let key = PrivateKey::generate(algorithm, &SEED).unwrap();
                let sig = key.sign(b"hello flow", hash).unwrap();
                assert_eq!(sig.as_bytes().len(), SIGNATURE_LEN);

                let public = key.public_key();
                assert!(public.verify(b"hello flow", &sig, hash));
                assert!(!public.verify(b"tampered", &sig, hash));
            }
        }
    }

    #[test]
    fn test_debug_hides_secret() {
        let key = PrivateKey::generate(SignatureAlgorithm::EcdsaP256, &SEED).unwrap();
        let debug = format!("{:?}", key);
        assert!(!debug.contains(&key.to_hex()));
        assert!(debug.contains("redacted"));
    }
}
