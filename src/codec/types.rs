use std::fmt;

use bytes::Bytes;
use num_bigint::{BigInt, BigUint};
use serde_json::{json, Map};

use crate::internal::error::{Error, Result};

/// Length in bytes of an account address.
pub const ADDRESS_LEN: usize = 32;

/// A raw 32-byte account address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address(pub [u8; ADDRESS_LEN]);

impl Address {
    /// Copies a 32-byte address out of `bytes`.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let raw: [u8; ADDRESS_LEN] = bytes.try_into().map_err(|_| {
            Error::InvalidValueError(format!(
                "An address is {} bytes long, got {}",
                ADDRESS_LEN,
                bytes.len()
            ))
        })?;
        Ok(Address(raw))
    }

    /// Raw address bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Converts addresses to and from their human-readable form.
///
/// The codec itself only handles raw bytes; the text form is used when values
/// are rendered for display.
pub trait AddressFormatter {
    fn format(&self, address: &Address) -> String;
    fn parse(&self, text: &str) -> Result<Address>;
}

/// Lowercase hex, no prefix.
#[derive(Debug, Default, Clone, Copy)]
pub struct HexAddressFormatter;

impl AddressFormatter for HexAddressFormatter {
    fn format(&self, address: &Address) -> String {
        hex::encode(address.0)
    }

    fn parse(&self, text: &str) -> Result<Address> {
        let raw = hex::decode(text.trim_start_matches("0x"))?;
        Address::from_slice(&raw)
    }
}

/// A decoded enum value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub name: String,
    pub discriminant: i8,
    /// `None` for fieldless variants.
    pub values: Option<Vec<Value>>,
}

impl EnumValue {
    /// Creates an enum value; `values` is `None` for a fieldless variant.
    pub fn new(name: impl Into<String>, discriminant: i8, values: Option<Vec<Value>>) -> Self {
        Self {
            name: name.into(),
            discriminant,
            values,
        }
    }
}

/// A value exchanged with a contract.
///
/// Decoding always produces the canonical variant for a type (`UInt` for
/// unsigned fixed-width integers, `Int` for signed ones, `Struct` for
/// structs, ...). Encoding is more lenient: any integer variant is accepted
/// for any integer type as long as it fits, and structs and enums accept the
/// alternative input shapes documented on the encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// An absent `Option` or `optional` value.
    Null,
    Bool(bool),
    UInt(u64),
    Int(i64),
    BigUint(BigUint),
    BigInt(BigInt),
    String(String),
    Bytes(Bytes),
    Address(Address),
    List(Vec<Value>),
    /// Struct fields in declaration order.
    Struct(Vec<(String, Value)>),
    Enum(EnumValue),
}

impl Value {
    /// Builds a struct value from `(name, value)` pairs.
    pub fn structure<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        Value::Struct(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Looks up a struct field by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Struct(fields) => fields.iter().find(|(k, _)| k == name).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::UInt(_) => "unsigned integer",
            Value::Int(_) => "signed integer",
            Value::BigUint(_) => "big unsigned integer",
            Value::BigInt(_) => "big signed integer",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Address(_) => "address",
            Value::List(_) => "list",
            Value::Struct(_) => "struct",
            Value::Enum(_) => "enum",
        }
    }

    /// Any integer variant widened to a `BigInt`.
    pub fn as_bigint(&self) -> Option<BigInt> {
        match self {
            Value::UInt(v) => Some(BigInt::from(*v)),
            Value::Int(v) => Some(BigInt::from(*v)),
            Value::BigUint(v) => Some(BigInt::from(v.clone())),
            Value::BigInt(v) => Some(v.clone()),
            _ => None,
        }
    }

    /// Renders the value as JSON. Big integers become decimal strings, bytes
    /// become hex and addresses go through `formatter`.
    pub fn to_json(&self, formatter: &dyn AddressFormatter) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(v) => json!(v),
            Value::UInt(v) => json!(v),
            Value::Int(v) => json!(v),
            Value::BigUint(v) => json!(v.to_string()),
            Value::BigInt(v) => json!(v.to_string()),
            Value::String(v) => json!(v),
            Value::Bytes(v) => json!(hex::encode(v)),
            Value::Address(v) => json!(formatter.format(v)),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(|i| i.to_json(formatter)).collect())
            }
            Value::Struct(fields) => {
                let mut map = Map::new();
                for (name, value) in fields {
                    map.insert(name.clone(), value.to_json(formatter));
                }
                serde_json::Value::Object(map)
            }
            Value::Enum(e) => json!({
                "name": e.name,
                "discriminant": e.discriminant,
                "values": e
                    .values
                    .as_ref()
                    .map(|vs| vs.iter().map(|v| v.to_json(formatter)).collect::<Vec<_>>()),
            }),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::UInt(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<BigUint> for Value {
    fn from(v: BigUint) -> Self {
        Value::BigUint(v)
    }
}

impl From<BigInt> for Value {
    fn from(v: BigInt) -> Self {
        Value::BigInt(v)
    }
}

impl From<Address> for Value {
    fn from(v: Address) -> Self {
        Value::Address(v)
    }
}

impl From<EnumValue> for Value {
    fn from(v: EnumValue) -> Self {
        Value::Enum(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}
