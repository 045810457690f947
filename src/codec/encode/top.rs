use bytes::BytesMut;
use tracing::trace;

use super::basic::top_encode_basic;
use super::nested::resolve_variant;
use crate::codec::type_name::TypeDescriptor;
use crate::codec::types::Value;
use crate::codec::AbiSerializer;
use crate::internal::error::{Error, Result};
use crate::schema::CustomKind;

impl AbiSerializer {
    /// Encodes `value` as a single top-level buffer of `type_name`.
    pub fn top_encode(&self, type_name: &str, value: &Value) -> Result<Vec<u8>> {
        let desc = self.parse_type(type_name)?;
        self.encode_top(&desc, value, 0)
    }

    /// Encodes `value` as the sequence of buffers `type_name` occupies.
    ///
    /// `variadic` and `multi` values are lists, `variadic<multi<..>>` values
    /// are lists of lists, and an absent `optional` is `Value::Null`, which
    /// produces no buffer at all.
    pub fn top_encode_buffers(&self, type_name: &str, value: &Value) -> Result<Vec<Vec<u8>>> {
        let desc = self.parse_type(type_name)?;
        self.encode_top_buffers(&desc, value, 0)
    }

    pub(crate) fn encode_top_buffers(
        &self,
        desc: &TypeDescriptor,
        value: &Value,
        depth: usize,
    ) -> Result<Vec<Vec<u8>>> {
        self.check_depth(depth)?;
        trace!("Top encode of {} as {}", value.kind(), desc);

        match desc {
            TypeDescriptor::Variadic(inner) => group_items(desc, value)?
                .iter()
                .map(|item| self.encode_top(inner, item, depth + 1))
                .collect(),
            TypeDescriptor::VariadicMulti(types) => {
                let mut buffers = Vec::new();
                for group in group_items(desc, value)? {
                    buffers.extend(self.encode_group(desc, types, group, depth)?);
                }
                Ok(buffers)
            }
            TypeDescriptor::Optional(inner) => {
                if value.is_null() {
                    Ok(Vec::new())
                } else {
                    Ok(vec![self.encode_top(inner, value, depth + 1)?])
                }
            }
            TypeDescriptor::Multi(types) => self.encode_group(desc, types, value, depth),
            _ => Ok(vec![self.encode_top(desc, value, depth)?]),
        }
    }

    pub(crate) fn encode_top(&self, desc: &TypeDescriptor, value: &Value, depth: usize) -> Result<Vec<u8>> {
        self.check_depth(depth)?;

        let mut out = BytesMut::new();
        match desc {
            TypeDescriptor::Option(_) if value.is_null() => {}
            TypeDescriptor::Basic(basic) => top_encode_basic(*basic, value, &mut out)?,
            TypeDescriptor::Named { name, kind: CustomKind::Enum } => {
                let def = self
                    .registry
                    .enum_def(name)
                    .ok_or_else(|| Error::UnknownTypeError(name.to_string()))?;
                let (variant, _) = resolve_variant(def, value)?;
                // A fieldless variant 0 is the empty buffer.
                if !(variant.is_fieldless() && variant.discriminant == 0) {
                    self.encode_enum(name, value, &mut out, depth)?;
                }
            }
            _ if desc.is_multi_value() => {
                let mut buffers = self.encode_top_buffers(desc, value, depth)?;
                if buffers.len() != 1 {
                    return Err(Error::ArityError(format!(
                        "{} produced {} buffers where one was expected",
                        desc,
                        buffers.len()
                    )));
                }
                return Ok(buffers.remove(0));
            }
            _ => self.encode_nested(desc, value, &mut out, depth)?,
        }
        Ok(out.to_vec())
    }

    /// One buffer per type, from a list holding exactly one value per type.
    fn encode_group(
        &self,
        desc: &TypeDescriptor,
        types: &[TypeDescriptor],
        group: &Value,
        depth: usize,
    ) -> Result<Vec<Vec<u8>>> {
        let items = group_items(desc, group)?;
        if items.len() != types.len() {
            return Err(Error::ArityError(format!(
                "{} expects groups of {} values, got {}",
                desc,
                types.len(),
                items.len()
            )));
        }
        types
            .iter()
            .zip(items)
            .map(|(item_type, item)| self.encode_top(item_type, item, depth + 1))
            .collect()
    }
}

fn group_items<'v>(desc: &TypeDescriptor, value: &'v Value) -> Result<&'v [Value]> {
    match value {
        Value::List(items) => Ok(items.as_slice()),
        other => Err(Error::InvalidValueError(format!(
            "Cannot encode {} value as {}",
            other.kind(),
            desc
        ))),
    }
}
