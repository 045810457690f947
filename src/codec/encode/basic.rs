use byteorder::{BigEndian, ByteOrder};
use bytes::{BufMut, BytesMut};
use num_bigint::BigInt;
use num_traits::{ToPrimitive, Zero};

use crate::codec::type_name::{BasicRepr, BasicType};
use crate::codec::types::{Value, ADDRESS_LEN};
use crate::internal::error::{Error, Result};

/// Encodes a basic value for embedding inside a larger buffer.
pub fn nested_encode_basic(basic: BasicType, value: &Value, out: &mut BytesMut) -> Result<()> {
    match basic.repr() {
        BasicRepr::Unsigned(width) => {
            let v = integer_value(basic, value)?
                .to_u64()
                .ok_or_else(|| mismatch(basic, value))?;
            let mut buf = [0u8; 8];
            BigEndian::write_uint(&mut buf[..width], v, width);
            out.put_slice(&buf[..width]);
        }
        BasicRepr::Signed(width) => {
            let v = integer_value(basic, value)?
                .to_i64()
                .ok_or_else(|| mismatch(basic, value))?;
            let mut buf = [0u8; 8];
            BigEndian::write_int(&mut buf[..width], v, width);
            out.put_slice(&buf[..width]);
        }
        BasicRepr::Bool => out.put_u8(bool_value(basic, value)? as u8),
        BasicRepr::BigUnsigned | BasicRepr::BigSigned => {
            put_sized(out, &minimal_bytes(basic, &integer_value(basic, value)?));
        }
        BasicRepr::Address => out.put_slice(&fixed_bytes(basic, value, ADDRESS_LEN)?),
        BasicRepr::FixedBytes(len) => out.put_slice(&fixed_bytes(basic, value, len)?),
        BasicRepr::Text | BasicRepr::Bytes => put_sized(out, buffer_value(basic, value)?),
    }
    Ok(())
}

/// Encodes a basic value as a whole buffer.
pub fn top_encode_basic(basic: BasicType, value: &Value, out: &mut BytesMut) -> Result<()> {
    match basic.repr() {
        BasicRepr::Unsigned(_)
        | BasicRepr::Signed(_)
        | BasicRepr::BigUnsigned
        | BasicRepr::BigSigned => {
            out.put_slice(&minimal_bytes(basic, &integer_value(basic, value)?));
        }
        BasicRepr::Bool => {
            if bool_value(basic, value)? {
                out.put_u8(1);
            }
        }
        BasicRepr::Address | BasicRepr::FixedBytes(_) => nested_encode_basic(basic, value, out)?,
        BasicRepr::Text | BasicRepr::Bytes => out.put_slice(buffer_value(basic, value)?),
    }
    Ok(())
}

/// Shortest big-endian form; zero is the empty buffer. Signed representations
/// use two's complement.
fn minimal_bytes(basic: BasicType, value: &BigInt) -> Vec<u8> {
    if value.is_zero() {
        return Vec::new();
    }
    match basic.repr() {
        BasicRepr::Signed(_) | BasicRepr::BigSigned => value.to_signed_bytes_be(),
        _ => value.magnitude().to_bytes_be(),
    }
}

fn put_sized(out: &mut BytesMut, bytes: &[u8]) {
    out.put_u32(bytes.len() as u32);
    out.put_slice(bytes);
}

fn integer_value(basic: BasicType, value: &Value) -> Result<BigInt> {
    let int = value.as_bigint().ok_or_else(|| mismatch(basic, value))?;
    if !basic.repr().fits_integer(&int) {
        return Err(Error::InvalidValueError(format!(
            "Value {} does not fit in {}",
            int, basic
        )));
    }
    Ok(int)
}

fn bool_value(basic: BasicType, value: &Value) -> Result<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        _ => Err(mismatch(basic, value)),
    }
}

fn buffer_value<'a>(basic: BasicType, value: &'a Value) -> Result<&'a [u8]> {
    match value {
        Value::String(s) => Ok(s.as_bytes()),
        Value::Bytes(b) => Ok(&b[..]),
        _ => Err(mismatch(basic, value)),
    }
}

fn fixed_bytes(basic: BasicType, value: &Value, len: usize) -> Result<Vec<u8>> {
    let raw: &[u8] = match value {
        Value::Address(address) => address.as_bytes(),
        Value::Bytes(b) => &b[..],
        _ => return Err(mismatch(basic, value)),
    };
    if raw.len() != len {
        return Err(Error::InvalidValueError(format!(
            "{} expects exactly {} bytes, got {}",
            basic,
            len,
            raw.len()
        )));
    }
    Ok(raw.to_vec())
}

fn mismatch(basic: BasicType, value: &Value) -> Error {
    Error::InvalidValueError(format!("Cannot encode {} value as {}", value.kind(), basic))
}
