use bytes::Bytes;
use num_bigint::{BigInt, BigUint};
use num_traits::ToPrimitive;

use crate::codec::type_name::{BasicRepr, BasicType};
use crate::codec::types::{Address, Value, ADDRESS_LEN};
use crate::internal::error::{Error, Result};
use crate::internal::reader::ByteReader;

/// Decodes a basic value embedded in a larger buffer, consuming only its bytes.
pub fn nested_decode_basic(basic: BasicType, reader: &mut ByteReader<'_>) -> Result<Value> {
    match basic.repr() {
        BasicRepr::Unsigned(width) => Ok(Value::UInt(reader.read_uint(width)?)),
        BasicRepr::Signed(width) => Ok(Value::Int(reader.read_int(width)?)),
        BasicRepr::Bool => match reader.read_u8()? {
            0 => Ok(Value::Bool(false)),
            1 => Ok(Value::Bool(true)),
            other => Err(Error::InvalidValueError(format!(
                "Expected a boolean but found the value {}",
                other
            ))),
        },
        BasicRepr::BigUnsigned => Ok(Value::BigUint(BigUint::from_bytes_be(reader.read_sized()?))),
        BasicRepr::BigSigned => Ok(Value::BigInt(BigInt::from_signed_bytes_be(reader.read_sized()?))),
        BasicRepr::Address => Ok(Value::Address(Address::from_slice(reader.take(ADDRESS_LEN)?)?)),
        BasicRepr::FixedBytes(len) => Ok(Value::Bytes(Bytes::copy_from_slice(reader.take(len)?))),
        BasicRepr::Text => decode_text(reader.read_sized()?),
        BasicRepr::Bytes => Ok(Value::Bytes(Bytes::copy_from_slice(reader.read_sized()?))),
    }
}

/// Decodes a basic value that fills a whole buffer.
pub fn top_decode_basic(basic: BasicType, data: &[u8]) -> Result<Value> {
    match basic.repr() {
        BasicRepr::Unsigned(_) => {
            let magnitude = BigUint::from_bytes_be(data);
            check_fits(basic, &BigInt::from(magnitude.clone()))?;
            magnitude
                .to_u64()
                .map(Value::UInt)
                .ok_or_else(|| out_of_range(basic, &magnitude.to_string()))
        }
        BasicRepr::Signed(_) => {
            let value = BigInt::from_signed_bytes_be(data);
            check_fits(basic, &value)?;
            value
                .to_i64()
                .map(Value::Int)
                .ok_or_else(|| out_of_range(basic, &value.to_string()))
        }
        BasicRepr::Bool => {
            let value = BigUint::from_bytes_be(data);
            match value.to_u8() {
                Some(0) => Ok(Value::Bool(false)),
                Some(1) => Ok(Value::Bool(true)),
                _ => Err(Error::InvalidValueError(format!(
                    "Expected a boolean but found the value {}",
                    value
                ))),
            }
        }
        BasicRepr::BigUnsigned => Ok(Value::BigUint(BigUint::from_bytes_be(data))),
        BasicRepr::BigSigned => Ok(Value::BigInt(BigInt::from_signed_bytes_be(data))),
        BasicRepr::Address | BasicRepr::FixedBytes(_) => {
            let mut reader = ByteReader::new(data);
            let value = nested_decode_basic(basic, &mut reader)?;
            if !reader.is_empty() {
                return Err(Error::TrailingDataError {
                    type_name: basic.name().to_string(),
                    remaining: reader.remaining(),
                });
            }
            Ok(value)
        }
        BasicRepr::Text => decode_text(data),
        BasicRepr::Bytes => Ok(Value::Bytes(Bytes::copy_from_slice(data))),
    }
}

fn decode_text(raw: &[u8]) -> Result<Value> {
    std::str::from_utf8(raw)
        .map(|s| Value::String(s.to_string()))
        .map_err(|e| Error::InvalidValueError(format!("Invalid UTF-8 string: {}", e)))
}

fn check_fits(basic: BasicType, value: &BigInt) -> Result<()> {
    if basic.repr().fits_integer(value) {
        Ok(())
    } else {
        Err(out_of_range(basic, &value.to_string()))
    }
}

fn out_of_range(basic: BasicType, value: &str) -> Error {
    Error::InvalidValueError(format!("Value {} does not fit in {}", value, basic))
}
