// Schema module for contract ABIs
//
// This module provides the ABI model used by the codec:
//
// 1. Endpoint, struct and enum declarations
// 2. The read-only registry the codec resolves names against
// 3. The parser from the ABI JSON shape

pub use self::parser::SchemaParser;
pub use self::registry::AbiRegistry;
pub use self::types::{
    Constructor, CustomKind, Endpoint, EnumDef, Field, Input, Output, StructDef, Variant,
};

pub mod parser;
pub mod registry;
pub mod types;
