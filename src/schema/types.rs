// ABI schema types
//
// Endpoints, structs and enums as declared by a contract ABI. All of them are
// immutable once the registry is built.

use std::fmt;

/// A named, typed member of a struct or an enum variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub type_name: String,
}

impl Field {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// A declared endpoint argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    pub name: String,
    pub type_name: String,
}

/// A declared endpoint result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub type_name: String,
    /// The output consumes every remaining result buffer.
    pub multi_result: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub name: String,
    pub mutability: Option<String>,
    pub docs: Vec<String>,
    pub inputs: Vec<Input>,
    pub outputs: Vec<Output>,
}

/// Constructor of the contract; it takes arguments but returns nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Constructor {
    pub inputs: Vec<Input>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDef {
    pub name: String,
    /// Field order is the encoding order.
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub name: String,
    pub discriminant: i8,
    pub fields: Vec<Field>,
}

impl Variant {
    pub fn is_fieldless(&self) -> bool {
        self.fields.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDef {
    pub name: String,
    pub variants: Vec<Variant>,
}

impl EnumDef {
    /// First declared variant carrying `discriminant`.
    pub fn variant_by_discriminant(&self, discriminant: i8) -> Option<&Variant> {
        self.variants.iter().find(|v| v.discriminant == discriminant)
    }

    /// First declared variant called `name`.
    pub fn variant_by_name(&self, name: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.name == name)
    }
}

/// Kind of a user-declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CustomKind {
    Struct,
    Enum,
}

impl CustomKind {
    pub fn from_name(kind: &str) -> Option<Self> {
        match kind {
            "struct" => Some(CustomKind::Struct),
            "enum" => Some(CustomKind::Enum),
            _ => None,
        }
    }
}

impl fmt::Display for CustomKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomKind::Struct => write!(f, "struct"),
            CustomKind::Enum => write!(f, "enum"),
        }
    }
}
