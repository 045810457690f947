// Contract ABI codec
//
// Schema-driven encoding and decoding of smart-contract endpoint arguments,
// results and custom types.

pub mod codec;
pub mod internal;
pub mod schema;

pub use codec::call_data::CallData;
pub use codec::type_name::{BasicType, TypeDescriptor};
pub use codec::types::{Address, AddressFormatter, EnumValue, HexAddressFormatter, Value};
pub use codec::{AbiSerializer, CodecConfig};
pub use internal::error::{Error, Result};
pub use schema::{AbiRegistry, SchemaParser};
