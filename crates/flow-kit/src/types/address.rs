//! Flow account address.

use std::fmt::{self, Debug, Display};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ParseAddressError;

/// Length of a Flow address in bytes.
pub const ADDRESS_LENGTH: usize = 8;

/// An 8-byte Flow account address.
///
/// Parsing accepts hex with or without a `0x` prefix and pads short input
/// with leading zeros, so `"01"` and `"0x0000000000000001"` are the same
/// address.
///
/// ```
/// use flow_kit::Address;
///
/// let address: Address = "0xABCD".parse().unwrap();
/// assert_eq!(address.to_string(), "0xabcd");
/// assert_eq!(address.to_hex(), "000000000000abcd");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    /// The empty address (8 zero bytes).
    pub const ZERO: Self = Self([0; ADDRESS_LENGTH]);

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    /// Check if this is the empty address.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_LENGTH]
    }

    /// Full 16-character lowercase hex without prefix, as used on the wire.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for Address {
    type Err = ParseAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if digits.is_empty() {
            return Err(ParseAddressError::Empty);
        }
        if digits.len() > ADDRESS_LENGTH * 2 {
            return Err(ParseAddressError::TooLong(s.to_string()));
        }

        let padded = format!("{:0>width$}", digits, width = ADDRESS_LENGTH * 2);
        let mut bytes = [0u8; ADDRESS_LENGTH];
        hex::decode_to_slice(&padded, &mut bytes)
            .map_err(|_| ParseAddressError::InvalidHex(s.to_string()))?;
        Ok(Self(bytes))
    }
}

impl TryFrom<&str> for Address {
    type Error = ParseAddressError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<[u8; ADDRESS_LENGTH]> for Address {
    fn from(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let full = self.to_hex();
        let short = full.trim_start_matches('0');
        if short.is_empty() {
            write!(f, "0x0")
        } else {
            write!(f, "0x{}", short)
        }
    }
}

impl Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address(0x{})", self.to_hex())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s: String = Deserialize::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_and_without_prefix() {
        let a: Address = "f8d6e0586b0a20c7".parse().unwrap();
        let b: Address = "0xf8d6e0586b0a20c7".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_bytes(), &[0xf8, 0xd6, 0xe0, 0x58, 0x6b, 0x0a, 0x20, 0xc7]);
    }

    #[test]
    fn test_short_input_is_left_padded() {
        let a: Address = "01".parse().unwrap();
        assert_eq!(a.to_hex(), "0000000000000001");

        // Odd number of digits
        let b: Address = "0xabc".parse().unwrap();
        assert_eq!(b.to_hex(), "0000000000000abc");
    }

    #[test]
    fn test_display_trims_leading_zeros() {
        let a: Address = "0xABCD".parse().unwrap();
        assert_eq!(a.to_string(), "0xabcd");
        assert_eq!(Address::ZERO.to_string(), "0x0");

        let full: Address = "f8d6e0586b0a20c7".parse().unwrap();
        assert_eq!(full.to_string(), "0xf8d6e0586b0a20c7");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Address>(), Err(ParseAddressError::Empty));
        assert_eq!("0x".parse::<Address>(), Err(ParseAddressError::Empty));
        assert!(matches!(
            "0x00112233445566778899".parse::<Address>(),
            Err(ParseAddressError::TooLong(_))
        ));
        assert!(matches!(
            "0xzz".parse::<Address>(),
            Err(ParseAddressError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_serde_uses_wire_form() {
        let a: Address = "0x01".parse().unwrap();
        let json = serde_json::to_string(&a).unwrap();
        assert_eq!(json, "\"0000000000000001\"");

        let back: Address = serde_json::from_str("\"0x0000000000000001\"").unwrap();
        assert_eq!(back, a);
    }

    #[test]
    fn test_zero() {
        assert!(Address::ZERO.is_zero());
        assert!(Address::default().is_zero());
        assert!(!"01".parse::<Address>().unwrap().is_zero());
    }
}
