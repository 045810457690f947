// Codec module for contract ABI values
//
// Values travel in two binary forms: "nested" when they are embedded in a
// larger value, and "top" when they are a whole transmitted buffer. Endpoint
// arguments and results are sequences of top-encoded buffers.

pub mod call_data;
pub mod decode;
pub mod encode;
pub mod endpoint;
pub mod type_name;
pub mod types;

use std::borrow::Cow;
use std::collections::HashMap;

use serde_json::Value as JsonValue;

use crate::internal::error::{Error, Result};
use crate::schema::{AbiRegistry, Field, SchemaParser};
use self::type_name::TypeDescriptor;

/// Codec limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecConfig {
    /// Maximum depth of nested types walked while encoding or decoding one
    /// value. Bounds recursion through self-referencing structs and enums.
    pub max_nesting_depth: usize,
    /// Number of items a decoded list may hold beyond what the remaining
    /// input can back with at least one byte each. Bounds lists of items that
    /// decode from no bytes at all, such as enums read past the end of input.
    pub max_list_len: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_nesting_depth: 32,
            max_list_len: 1 << 16,
        }
    }
}

/// Encodes and decodes values according to a contract ABI.
///
/// The serializer owns an immutable registry and holds no other state, so it
/// can be shared freely between threads.
#[derive(Debug, Clone)]
pub struct AbiSerializer {
    registry: AbiRegistry,
    config: CodecConfig,
    // Struct and variant field types, parsed once when the serializer is built.
    field_types: HashMap<String, TypeDescriptor>,
}

impl AbiSerializer {
    /// Creates a serializer with the default codec limits.
    pub fn new(registry: AbiRegistry) -> Self {
        Self::with_config(registry, CodecConfig::default())
    }

    /// Creates a serializer with explicit codec limits.
    pub fn with_config(registry: AbiRegistry, config: CodecConfig) -> Self {
        let field_types = parse_field_types(&registry);
        Self {
            registry,
            config,
            field_types,
        }
    }

    /// Builds a serializer from ABI JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(Self::new(SchemaParser::new().parse_str(text)?))
    }

    /// Builds a serializer from an already-loaded ABI description.
    pub fn from_json(json: &JsonValue) -> Result<Self> {
        Ok(Self::new(SchemaParser::new().parse(json)?))
    }

    /// The ABI this serializer encodes against.
    pub fn registry(&self) -> &AbiRegistry {
        &self.registry
    }

    /// The limits applied while encoding and decoding.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Parses a type name against this serializer's ABI.
    pub fn parse_type(&self, type_name: &str) -> Result<TypeDescriptor> {
        TypeDescriptor::parse(type_name, &self.registry)
    }

    /// Type of a struct or variant field. Names that failed to parse up
    /// front are parsed again so the caller sees the error.
    fn field_type(&self, field: &Field) -> Result<Cow<'_, TypeDescriptor>> {
        match self.field_types.get(&field.type_name) {
            Some(desc) => Ok(Cow::Borrowed(desc)),
            None => self.parse_type(&field.type_name).map(Cow::Owned),
        }
    }

    fn check_depth(&self, depth: usize) -> Result<()> {
        if depth > self.config.max_nesting_depth {
            return Err(Error::NestingDepthError(self.config.max_nesting_depth));
        }
        Ok(())
    }
}

fn parse_field_types(registry: &AbiRegistry) -> HashMap<String, TypeDescriptor> {
    let struct_fields = registry
        .struct_names()
        .iter()
        .filter_map(|name| registry.struct_def(name))
        .flat_map(|def| def.fields.iter());
    let variant_fields = registry
        .enum_names()
        .iter()
        .filter_map(|name| registry.enum_def(name))
        .flat_map(|def| def.variants.iter())
        .flat_map(|variant| variant.fields.iter());

    let mut types = HashMap::new();
    for field in struct_fields.chain(variant_fields) {
        if types.contains_key(&field.type_name) {
            continue;
        }
        if let Ok(desc) = TypeDescriptor::parse(&field.type_name, registry) {
            types.insert(field.type_name.clone(), desc);
        }
    }
    types
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::AbiSerializer;
    use serde_json::json;

    /// Small ABI shared by the codec unit tests.
    pub(crate) fn serializer() -> AbiSerializer {
        AbiSerializer::from_json(&json!({
            "name": "MyContract",
            "endpoints": [
                { "name": "getSum", "inputs": [], "outputs": [{ "type": "BigUint" }] },
                { "name": "add", "inputs": [{ "name": "value", "type": "BigUint" }], "outputs": [] }
            ],
            "types": {
                "MyAbiStruct": {
                    "type": "struct",
                    "fields": [
                        { "name": "field1", "type": "BigUint" },
                        { "name": "field2", "type": "List<Option<u8>>" },
                        { "name": "field3", "type": "tuple<bool,i32>" }
                    ]
                },
                "MyAbiStruct2": {
                    "type": "struct",
                    "fields": [
                        { "name": "field1", "type": "BigUint" },
                        { "name": "field2", "type": "List<u32>" },
                        { "name": "field3", "type": "tuple<bool,TokenIdentifier>" }
                    ]
                },
                "Holder": {
                    "type": "struct",
                    "fields": [
                        { "name": "id", "type": "u8" },
                        { "name": "status", "type": "MyAbiEnum" }
                    ]
                },
                "MyAbiEnum": {
                    "type": "enum",
                    "variants": [
                        { "name": "Nothing", "discriminant": 0 },
                        { "name": "Something", "discriminant": 1, "fields": [{ "name": "0", "type": "u32" }] },
                        {
                            "name": "SomethingMore",
                            "discriminant": 2,
                            "fields": [
                                { "name": "0", "type": "u8" },
                                { "name": "1", "type": "MyAbiStruct2" }
                            ]
                        }
                    ]
                },
                "Chain": {
                    "type": "enum",
                    "variants": [{ "name": "Link", "discriminant": 0, "fields": [{ "name": "0", "type": "Chain" }] }]
                }
            }
        }))
        .expect("fixture ABI is valid")
    }

    /// Nested encoding of `MyAbiStruct2 { 7845, [1, 2, 3], (true, "TKN-abcdef") }`.
    pub(crate) const STRUCT2_BYTES: &[u8] = b"\x00\x00\x00\x02\x1E\xA5\
        \x00\x00\x00\x03\x00\x00\x00\x01\x00\x00\x00\x02\x00\x00\x00\x03\
        \x01\
        \x00\x00\x00\x0ATKN-abcdef";
}
