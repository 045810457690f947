// Type-name grammar
//
// ABI type names are strings such as `List<tuple<u8,Option<BigUint>>>`. They are
// parsed once into a `TypeDescriptor` tree which the codec then walks, so no
// string matching happens while bytes are being consumed.

use std::fmt;

use num_bigint::{BigInt, Sign};
use num_traits::ToPrimitive;

use crate::internal::error::{Error, Result};
use crate::schema::{AbiRegistry, CustomKind};

/// Wire representation shared by a family of basic types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasicRepr {
    /// Fixed-width unsigned integer, width in bytes.
    Unsigned(usize),
    /// Fixed-width two's-complement integer, width in bytes.
    Signed(usize),
    Bool,
    BigUnsigned,
    BigSigned,
    Address,
    /// Raw bytes of a fixed length.
    FixedBytes(usize),
    /// Length-prefixed UTF-8 text.
    Text,
    /// Length-prefixed raw bytes.
    Bytes,
}

impl BasicRepr {
    /// Whether `value` is representable. Only integer representations accept
    /// integers.
    pub fn fits_integer(&self, value: &BigInt) -> bool {
        match self {
            BasicRepr::Unsigned(width) => match value.to_i128() {
                Some(v) => v >= 0 && v <= (1i128 << (width * 8)) - 1,
                None => false,
            },
            BasicRepr::Signed(width) => match value.to_i128() {
                Some(v) => {
                    let half = 1i128 << (width * 8 - 1);
                    v >= -half && v < half
                }
                None => false,
            },
            BasicRepr::BigUnsigned => value.sign() != Sign::Minus,
            BasicRepr::BigSigned => true,
            _ => false,
        }
    }
}

/// The closed set of built-in ABI types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasicType {
    U8,
    U16,
    U32,
    U64,
    Usize,
    I8,
    I16,
    I32,
    I64,
    Isize,
    Bool,
    BigUint,
    BigInt,
    Address,
    TokenIdentifier,
    EgldOrEsdtTokenIdentifier,
    Utf8String,
    Bytes,
    H256,
    CodeMetadata,
}

/// Name, type and wire representation of every basic type.
const BASIC_TYPES: &[(&str, BasicType, BasicRepr)] = &[
    ("u8", BasicType::U8, BasicRepr::Unsigned(1)),
    ("u16", BasicType::U16, BasicRepr::Unsigned(2)),
    ("u32", BasicType::U32, BasicRepr::Unsigned(4)),
    ("u64", BasicType::U64, BasicRepr::Unsigned(8)),
    ("usize", BasicType::Usize, BasicRepr::Unsigned(4)),
    ("i8", BasicType::I8, BasicRepr::Signed(1)),
    ("i16", BasicType::I16, BasicRepr::Signed(2)),
    ("i32", BasicType::I32, BasicRepr::Signed(4)),
    ("i64", BasicType::I64, BasicRepr::Signed(8)),
    ("isize", BasicType::Isize, BasicRepr::Signed(4)),
    ("bool", BasicType::Bool, BasicRepr::Bool),
    ("BigUint", BasicType::BigUint, BasicRepr::BigUnsigned),
    ("BigInt", BasicType::BigInt, BasicRepr::BigSigned),
    ("Address", BasicType::Address, BasicRepr::Address),
    ("TokenIdentifier", BasicType::TokenIdentifier, BasicRepr::Text),
    ("EgldOrEsdtTokenIdentifier", BasicType::EgldOrEsdtTokenIdentifier, BasicRepr::Text),
    ("utf-8 string", BasicType::Utf8String, BasicRepr::Text),
    ("bytes", BasicType::Bytes, BasicRepr::Bytes),
    ("H256", BasicType::H256, BasicRepr::FixedBytes(32)),
    ("CodeMetadata", BasicType::CodeMetadata, BasicRepr::FixedBytes(2)),
];

impl BasicType {
    pub fn from_name(name: &str) -> Option<Self> {
        BASIC_TYPES
            .iter()
            .find(|(n, _, _)| *n == name)
            .map(|(_, t, _)| *t)
    }

    fn entry(&self) -> &'static (&'static str, BasicType, BasicRepr) {
        // Table rows follow the variant declaration order.
        &BASIC_TYPES[*self as usize]
    }

    pub fn name(&self) -> &'static str {
        self.entry().0
    }

    pub fn repr(&self) -> BasicRepr {
        self.entry().2
    }
}

impl fmt::Display for BasicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Structured form of an ABI type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDescriptor {
    Basic(BasicType),
    List(Box<TypeDescriptor>),
    Array(usize, Box<TypeDescriptor>),
    Tuple(Vec<TypeDescriptor>),
    Option(Box<TypeDescriptor>),
    /// `optional<T>`: zero or one trailing buffer.
    Optional(Box<TypeDescriptor>),
    /// `multi<T1,..,Tk>`: exactly k buffers.
    Multi(Vec<TypeDescriptor>),
    Variadic(Box<TypeDescriptor>),
    VariadicMulti(Vec<TypeDescriptor>),
    Named { name: String, kind: CustomKind },
}

impl TypeDescriptor {
    /// Parses `type_name`, resolving custom names against `registry`.
    pub fn parse(type_name: &str, registry: &AbiRegistry) -> Result<Self> {
        if let Some(basic) = BasicType::from_name(type_name) {
            return Ok(TypeDescriptor::Basic(basic));
        }
        if let Some(inner) = generic_argument(type_name, "List") {
            return Ok(TypeDescriptor::List(Box::new(Self::parse(inner, registry)?)));
        }
        if let Some((size, inner)) = array_arguments(type_name) {
            return Ok(TypeDescriptor::Array(size, Box::new(Self::parse(inner, registry)?)));
        }
        if let Some(inner) = generic_argument(type_name, "tuple") {
            return Ok(TypeDescriptor::Tuple(Self::parse_all(inner, registry)?));
        }
        if let Some(inner) = generic_argument(type_name, "Option") {
            return Ok(TypeDescriptor::Option(Box::new(Self::parse(inner, registry)?)));
        }
        if let Some(inner) = generic_argument(type_name, "variadic") {
            // variadic<multi<..>> takes precedence over a plain variadic.
            if let Some(multi) = generic_argument(inner, "multi") {
                return Ok(TypeDescriptor::VariadicMulti(Self::parse_all(multi, registry)?));
            }
            return Ok(TypeDescriptor::Variadic(Box::new(Self::parse(inner, registry)?)));
        }
        if let Some(inner) = generic_argument(type_name, "optional") {
            return Ok(TypeDescriptor::Optional(Box::new(Self::parse(inner, registry)?)));
        }
        if let Some(inner) = generic_argument(type_name, "multi") {
            return Ok(TypeDescriptor::Multi(Self::parse_all(inner, registry)?));
        }
        match registry.custom_kind(type_name) {
            Some(kind) => Ok(TypeDescriptor::Named {
                name: type_name.to_string(),
                kind,
            }),
            None => Err(Error::UnknownTypeError(type_name.to_string())),
        }
    }

    fn parse_all(list: &str, registry: &AbiRegistry) -> Result<Vec<Self>> {
        split_top_level(list)
            .into_iter()
            .map(|item| Self::parse(item, registry))
            .collect()
    }

    /// True for the types whose absence is encoded as an empty buffer.
    pub fn is_option(&self) -> bool {
        matches!(self, TypeDescriptor::Option(_))
    }

    /// True for constructs spread over several top-level buffers.
    pub fn is_multi_value(&self) -> bool {
        matches!(
            self,
            TypeDescriptor::Optional(_)
                | TypeDescriptor::Multi(_)
                | TypeDescriptor::Variadic(_)
                | TypeDescriptor::VariadicMulti(_)
        )
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(f: &mut fmt::Formatter<'_>, items: &[TypeDescriptor]) -> fmt::Result {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{}", item)?;
            }
            Ok(())
        }

        match self {
            TypeDescriptor::Basic(basic) => write!(f, "{}", basic),
            TypeDescriptor::List(inner) => write!(f, "List<{}>", inner),
            TypeDescriptor::Array(size, inner) => write!(f, "array{}<{}>", size, inner),
            TypeDescriptor::Tuple(items) => {
                f.write_str("tuple<")?;
                join(f, items)?;
                f.write_str(">")
            }
            TypeDescriptor::Option(inner) => write!(f, "Option<{}>", inner),
            TypeDescriptor::Optional(inner) => write!(f, "optional<{}>", inner),
            TypeDescriptor::Multi(items) => {
                f.write_str("multi<")?;
                join(f, items)?;
                f.write_str(">")
            }
            TypeDescriptor::Variadic(inner) => write!(f, "variadic<{}>", inner),
            TypeDescriptor::VariadicMulti(items) => {
                f.write_str("variadic<multi<")?;
                join(f, items)?;
                f.write_str(">>")
            }
            TypeDescriptor::Named { name, .. } => f.write_str(name),
        }
    }
}

/// Returns `T` when `type_name` is exactly `prefix<T>`.
fn generic_argument<'a>(type_name: &'a str, prefix: &str) -> Option<&'a str> {
    type_name
        .strip_prefix(prefix)?
        .strip_prefix('<')?
        .strip_suffix('>')
}

/// Returns `(N, T)` when `type_name` is exactly `arrayN<T>`.
fn array_arguments(type_name: &str) -> Option<(usize, &str)> {
    let rest = type_name.strip_prefix("array")?;
    let open = rest.find('<')?;
    let digits = &rest[..open];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let size = digits.parse().ok()?;
    let inner = rest[open..].strip_prefix('<')?.strip_suffix('>')?;
    Some((size, inner))
}

/// Splits a comma-separated type list, ignoring commas inside `<...>` and
/// trimming surrounding whitespace from every item.
fn split_top_level(list: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in list.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                items.push(list[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    items.push(list[start..].trim());
    items
}
