//! JSON-Cadence values.
//!
//! Transaction arguments and event payloads travel as JSON-Cadence
//! documents: `{"type": "<Type>", "value": ...}`. Only the value kinds the
//! account creation flow needs are modeled.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use super::Address;
use crate::error::Error;

/// A JSON-Cadence value.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    String(String),
    Bool(bool),
    UInt8(#[serde_as(as = "DisplayFromStr")] u8),
    UInt64(#[serde_as(as = "DisplayFromStr")] u64),
    /// Fixed-point literal with eight decimals, e.g. `"1000.00000000"`.
    UFix64(String),
    Address(AddressValue),
    Optional(Option<Box<Value>>),
    Array(Vec<Value>),
    Dictionary(Vec<KeyValue>),
    Event(Composite),
}

/// Address in JSON-Cadence form (`0x` + 16 hex digits).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressValue(pub Address);

impl Serialize for AddressValue {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format!("0x{}", self.0.to_hex()))
    }
}

impl<'de> Deserialize<'de> for AddressValue {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Address::deserialize(d).map(AddressValue)
    }
}

/// Dictionary entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: Value,
    pub value: Value,
}

/// Event or struct value: a type ID plus named fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Composite {
    pub id: String,
    pub fields: Vec<Field>,
}

/// Named composite field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub value: Value,
}

impl Composite {
    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.value)
    }
}

impl Value {
    /// `[String]` from an iterator of strings.
    pub fn string_array<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Value::Array(items.into_iter().map(|s| Value::String(s.into())).collect())
    }

    /// `{String: String}` from key/value pairs.
    pub fn string_dictionary<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Value::Dictionary(
            entries
                .into_iter()
                .map(|(k, v)| KeyValue {
                    key: Value::String(k.into()),
                    value: Value::String(v.into()),
                })
                .collect(),
        )
    }

    /// Get the address if this is an `Address` value.
    pub fn as_address(&self) -> Option<Address> {
        match self {
            Value::Address(AddressValue(address)) => Some(*address),
            _ => None,
        }
    }

    /// Get the composite if this is an `Event` value.
    pub fn as_event(&self) -> Option<&Composite> {
        match self {
            Value::Event(composite) => Some(composite),
            _ => None,
        }
    }

    /// Encode as a JSON-Cadence document.
    pub fn encode(&self) -> Result<Vec<u8>, Error> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decode a JSON-Cadence document.
    pub fn decode(bytes: &[u8]) -> Result<Self, Error> {
        serde_json::from_slice(bytes).map_err(|e| Error::Cadence(e.to_string()))
    }
}
