use tracing::trace;

use super::basic::top_decode_basic;
use crate::codec::type_name::TypeDescriptor;
use crate::codec::types::Value;
use crate::codec::AbiSerializer;
use crate::internal::error::{Error, Result};
use crate::internal::reader::ByteReader;

impl AbiSerializer {
    /// Decodes a single top-encoded buffer. The whole buffer must be consumed.
    pub fn top_decode(&self, type_name: &str, data: &[u8]) -> Result<Value> {
        let desc = self.parse_type(type_name)?;
        self.decode_top(&desc, data, 0)
    }

    /// Decodes a sequence of top-encoded buffers as one value of `type_name`.
    ///
    /// `variadic`, `optional` and `multi` types spread over several buffers;
    /// every other type takes exactly one, except `Option` which also accepts
    /// an empty sequence.
    pub fn top_decode_buffers<B: AsRef<[u8]>>(&self, type_name: &str, buffers: &[B]) -> Result<Value> {
        let desc = self.parse_type(type_name)?;
        let buffers: Vec<&[u8]> = buffers.iter().map(|b| b.as_ref()).collect();
        self.decode_top_buffers(&desc, &buffers, 0)
    }

    pub(crate) fn decode_top_buffers(
        &self,
        desc: &TypeDescriptor,
        buffers: &[&[u8]],
        depth: usize,
    ) -> Result<Value> {
        self.check_depth(depth)?;
        trace!("Top decode of {} over {} buffers", desc, buffers.len());

        match desc {
            TypeDescriptor::Variadic(inner) => buffers
                .iter()
                .map(|buffer| self.decode_top(inner, buffer, depth + 1))
                .collect::<Result<Vec<_>>>()
                .map(Value::List),
            TypeDescriptor::VariadicMulti(items) => {
                if items.is_empty() || buffers.len() % items.len() != 0 {
                    return Err(Error::ArityError(format!(
                        "{} buffers cannot be split into groups of {} for {}",
                        buffers.len(),
                        items.len(),
                        desc
                    )));
                }
                buffers
                    .chunks(items.len())
                    .map(|group| self.decode_group(items, group, depth))
                    .collect::<Result<Vec<_>>>()
                    .map(Value::List)
            }
            TypeDescriptor::Optional(inner) => match buffers {
                [] => Ok(Value::Null),
                [buffer] => self.decode_top(inner, buffer, depth + 1),
                _ => Err(arity(desc, "at most 1", buffers.len())),
            },
            TypeDescriptor::Multi(items) => {
                if buffers.len() != items.len() {
                    return Err(arity(desc, &items.len().to_string(), buffers.len()));
                }
                self.decode_group(items, buffers, depth)
            }
            _ => match buffers {
                [] if desc.is_option() => Ok(Value::Null),
                [buffer] => self.decode_top(desc, buffer, depth),
                _ => Err(arity(desc, "1", buffers.len())),
            },
        }
    }

    pub(crate) fn decode_top(&self, desc: &TypeDescriptor, data: &[u8], depth: usize) -> Result<Value> {
        self.check_depth(depth)?;

        match desc {
            TypeDescriptor::Option(_) if data.is_empty() => Ok(Value::Null),
            TypeDescriptor::Basic(basic) => top_decode_basic(*basic, data),
            _ if desc.is_multi_value() => self.decode_top_buffers(desc, &[data], depth),
            _ => {
                let mut reader = ByteReader::new(data);
                let value = self.decode_nested(desc, &mut reader, depth)?;
                if !reader.is_empty() {
                    return Err(Error::TrailingDataError {
                        type_name: desc.to_string(),
                        remaining: reader.remaining(),
                    });
                }
                Ok(value)
            }
        }
    }

    /// One buffer per item, decoded positionally into a list.
    fn decode_group(&self, items: &[TypeDescriptor], group: &[&[u8]], depth: usize) -> Result<Value> {
        items
            .iter()
            .zip(group)
            .map(|(item, buffer)| self.decode_top(item, buffer, depth + 1))
            .collect::<Result<Vec<_>>>()
            .map(Value::List)
    }
}

fn arity(desc: &TypeDescriptor, expected: &str, actual: usize) -> Error {
    Error::ArityError(format!(
        "{} expects {} buffers, got {}",
        desc, expected, actual
    ))
}
