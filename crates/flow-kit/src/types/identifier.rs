//! 32-byte identifiers for blocks and transactions.

use std::fmt::{self, Debug, Display};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Sha3_256};

use crate::error::ParseIdentifierError;

/// A 32-byte SHA3-256 identifier used for block IDs and transaction IDs.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Identifier([u8; 32]);

impl Identifier {
    /// The zero identifier (32 zero bytes).
    pub const ZERO: Self = Self([0; 32]);

    /// Hash the given data with SHA3-256.
    pub fn hash(data: &[u8]) -> Self {
        let result = Sha3_256::digest(data);
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&result);
        Self(bytes)
    }

    /// Create from raw 32 bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw 32 bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Check if this is the zero identifier.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl FromStr for Identifier {
    type Err = ParseIdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes =
            hex::decode(digits).map_err(|e| ParseIdentifierError::InvalidHex(e.to_string()))?;
        Self::try_from(bytes.as_slice())
    }
}

impl TryFrom<&[u8]> for Identifier {
    type Error = ParseIdentifierError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() != 32 {
            return Err(ParseIdentifierError::InvalidLength(bytes.len()));
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(bytes);
        Ok(Self(arr))
    }
}

impl From<[u8; 32]> for Identifier {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Identifier {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identifier({})", self)
    }
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s: String = Deserialize::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Deserialize an identifier that the Access API leaves empty while unknown.
pub(crate) fn deserialize_optional<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<Identifier>, D::Error> {
    let s: Option<String> = Deserialize::deserialize(d)?;
    match s.as_deref() {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_sha3() {
        // SHA3-256("") test vector
        let id = Identifier::hash(b"");
        assert_eq!(
            id.to_string(),
            "a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a"
        );
    }

    #[test]
    fn test_display_parse_roundtrip() {
        let id = Identifier::hash(b"test data");
        let parsed: Identifier = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);

        let prefixed: Identifier = format!("0x{}", id).parse().unwrap();
        assert_eq!(id, prefixed);
    }

    #[test]
    fn test_invalid_length() {
        assert_eq!(
            "abcd".parse::<Identifier>(),
            Err(ParseIdentifierError::InvalidLength(2))
        );
    }

    #[test]
    fn test_zero() {
        assert!(Identifier::ZERO.is_zero());
        assert!(!Identifier::hash(b"x").is_zero());
    }

    #[test]
    fn test_deserialize_optional_empty() {
        #[derive(Deserialize)]
        struct Wrapper {
            #[serde(default, deserialize_with = "deserialize_optional")]
            block_id: Option<Identifier>,
        }

        let w: Wrapper = serde_json::from_str(r#"{"block_id": ""}"#).unwrap();
        assert!(w.block_id.is_none());

        let w: Wrapper = serde_json::from_str(r#"{}"#).unwrap();
        assert!(w.block_id.is_none());

        let id = Identifier::hash(b"block");
        let w: Wrapper = serde_json::from_str(&format!(r#"{{"block_id": "{}"}}"#, id)).unwrap();
        assert_eq!(w.block_id, Some(id));
    }
}
