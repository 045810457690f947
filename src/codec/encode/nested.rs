use bytes::{BufMut, BytesMut};
use num_traits::ToPrimitive;
use tracing::trace;

use super::basic::nested_encode_basic;
use crate::codec::type_name::TypeDescriptor;
use crate::codec::types::Value;
use crate::codec::AbiSerializer;
use crate::internal::error::{Error, Result};
use crate::schema::{CustomKind, EnumDef, Field, Variant};

impl AbiSerializer {
    /// Encodes `value` as a nested value of `type_name`.
    pub fn nested_encode(&self, type_name: &str, value: &Value) -> Result<Vec<u8>> {
        let desc = self.parse_type(type_name)?;
        let mut out = BytesMut::new();
        self.encode_nested(&desc, value, &mut out, 0)?;
        Ok(out.to_vec())
    }

    /// Encodes a declared struct.
    ///
    /// Accepts a `Value::Struct` (fields looked up by name, extra fields
    /// ignored) or a `Value::List` holding the fields in declaration order.
    pub fn encode_custom_struct(&self, name: &str, value: &Value) -> Result<Vec<u8>> {
        let mut out = BytesMut::new();
        self.encode_struct(name, value, &mut out, 0)?;
        Ok(out.to_vec())
    }

    /// Encodes a declared enum.
    ///
    /// The variant is selected from an integer (discriminant), a string
    /// (variant name), a `Value::Enum`, or a `Value::Struct` carrying `name`,
    /// `discriminant` and `values` entries. A name wins over a discriminant.
    pub fn encode_custom_enum(&self, name: &str, value: &Value) -> Result<Vec<u8>> {
        let mut out = BytesMut::new();
        self.encode_enum(name, value, &mut out, 0)?;
        Ok(out.to_vec())
    }

    pub(crate) fn encode_nested(
        &self,
        desc: &TypeDescriptor,
        value: &Value,
        out: &mut BytesMut,
        depth: usize,
    ) -> Result<()> {
        self.check_depth(depth)?;
        trace!("Nested encode of {} as {}", value.kind(), desc);

        match desc {
            TypeDescriptor::Basic(basic) => nested_encode_basic(*basic, value, out),
            TypeDescriptor::List(inner) => {
                let items = list_items(desc, value)?;
                let count = u32::try_from(items.len()).map_err(|_| {
                    Error::InvalidValueError(format!("Too many items for {}: {}", desc, items.len()))
                })?;
                out.put_u32(count);
                for item in items {
                    self.encode_nested(inner, item, out, depth + 1)?;
                }
                Ok(())
            }
            TypeDescriptor::Array(size, inner) => {
                let items = list_items(desc, value)?;
                expect_len(desc, *size, items.len())?;
                for item in items {
                    self.encode_nested(inner, item, out, depth + 1)?;
                }
                Ok(())
            }
            TypeDescriptor::Tuple(types) => {
                let items = list_items(desc, value)?;
                expect_len(desc, types.len(), items.len())?;
                for (item_type, item) in types.iter().zip(items) {
                    self.encode_nested(item_type, item, out, depth + 1)?;
                }
                Ok(())
            }
            TypeDescriptor::Option(inner) => {
                if value.is_null() {
                    out.put_u8(0);
                    Ok(())
                } else {
                    out.put_u8(1);
                    self.encode_nested(inner, value, out, depth + 1)
                }
            }
            TypeDescriptor::Named { name, kind: CustomKind::Struct } => {
                self.encode_struct(name, value, out, depth)
            }
            TypeDescriptor::Named { name, kind: CustomKind::Enum } => {
                self.encode_enum(name, value, out, depth)
            }
            TypeDescriptor::Optional(_)
            | TypeDescriptor::Multi(_)
            | TypeDescriptor::Variadic(_)
            | TypeDescriptor::VariadicMulti(_) => Err(Error::InvalidValueError(format!(
                "{} cannot be nested inside another value",
                desc
            ))),
        }
    }

    fn encode_struct(&self, name: &str, value: &Value, out: &mut BytesMut, depth: usize) -> Result<()> {
        self.check_depth(depth)?;
        let def = self
            .registry
            .struct_def(name)
            .ok_or_else(|| Error::UnknownTypeError(name.to_string()))?;

        match value {
            Value::Struct(_) => {
                for field in &def.fields {
                    let field_value = value.field(&field.name).ok_or_else(|| {
                        Error::InvalidValueError(format!(
                            "Missing field {} for struct {}",
                            field.name, name
                        ))
                    })?;
                    self.encode_field(field, field_value, out, depth)?;
                }
                Ok(())
            }
            Value::List(items) => {
                if items.len() != def.fields.len() {
                    return Err(Error::InvalidValueError(format!(
                        "Struct {} has {} fields, got {} values",
                        name,
                        def.fields.len(),
                        items.len()
                    )));
                }
                for (field, item) in def.fields.iter().zip(items) {
                    self.encode_field(field, item, out, depth)?;
                }
                Ok(())
            }
            other => Err(Error::InvalidValueError(format!(
                "Cannot encode {} value as struct {}",
                other.kind(),
                name
            ))),
        }
    }

    /// Writes the discriminant byte followed by the variant's fields.
    pub(crate) fn encode_enum(
        &self,
        name: &str,
        value: &Value,
        out: &mut BytesMut,
        depth: usize,
    ) -> Result<()> {
        self.check_depth(depth)?;
        let def = self
            .registry
            .enum_def(name)
            .ok_or_else(|| Error::UnknownTypeError(name.to_string()))?;
        let (variant, values) = resolve_variant(def, value)?;

        if values.len() != variant.fields.len() {
            return Err(Error::InvalidValueError(format!(
                "Variant {} of enum {} has {} fields, got {} values",
                variant.name,
                name,
                variant.fields.len(),
                values.len()
            )));
        }
        out.put_i8(variant.discriminant);
        for (field, field_value) in variant.fields.iter().zip(values) {
            self.encode_field(field, field_value, out, depth)?;
        }
        Ok(())
    }

    fn encode_field(&self, field: &Field, value: &Value, out: &mut BytesMut, depth: usize) -> Result<()> {
        let desc = self.field_type(field)?;
        self.encode_nested(&desc, value, out, depth + 1)
    }
}

/// Picks the variant `value` refers to, along with its field values.
pub(crate) fn resolve_variant<'d, 'v>(
    def: &'d EnumDef,
    value: &'v Value,
) -> Result<(&'d Variant, &'v [Value])> {
    let by_name = move |variant: &str| -> Result<&'d Variant> {
        def.variant_by_name(variant)
            .ok_or_else(|| unknown_variant(def, variant.to_string()))
    };
    let by_discriminant = move |discriminant: &Value| -> Result<&'d Variant> {
        let number = discriminant
            .as_bigint()
            .ok_or_else(|| unknown_variant(def, discriminant.kind().to_string()))?;
        number
            .to_i8()
            .and_then(|d| def.variant_by_discriminant(d))
            .ok_or_else(|| unknown_variant(def, number.to_string()))
    };

    match value {
        Value::String(variant) => Ok((by_name(variant.as_str())?, &[][..])),
        Value::UInt(_) | Value::Int(_) | Value::BigUint(_) | Value::BigInt(_) => {
            Ok((by_discriminant(value)?, &[][..]))
        }
        Value::Enum(e) => {
            let variant = if e.name.is_empty() {
                def.variant_by_discriminant(e.discriminant)
                    .ok_or_else(|| unknown_variant(def, e.discriminant.to_string()))?
            } else {
                by_name(e.name.as_str())?
            };
            Ok((variant, e.values.as_deref().unwrap_or(&[])))
        }
        Value::Struct(_) => {
            let variant = match (value.field("name"), value.field("discriminant")) {
                (Some(Value::String(variant)), _) => by_name(variant.as_str())?,
                (_, Some(discriminant)) => by_discriminant(discriminant)?,
                _ => {
                    return Err(Error::InvalidValueError(format!(
                        "Enum {} value needs a name or a discriminant",
                        def.name
                    )))
                }
            };
            let values: &[Value] = match value.field("values") {
                Some(Value::List(items)) => items.as_slice(),
                Some(Value::Null) | None => &[],
                Some(other) => {
                    return Err(Error::InvalidValueError(format!(
                        "Enum {} values must be a list, got {}",
                        def.name,
                        other.kind()
                    )))
                }
            };
            Ok((variant, values))
        }
        other => Err(Error::InvalidValueError(format!(
            "Cannot encode {} value as enum {}",
            other.kind(),
            def.name
        ))),
    }
}

fn unknown_variant(def: &EnumDef, variant: String) -> Error {
    Error::UnknownVariantError {
        enum_name: def.name.clone(),
        variant,
    }
}

fn list_items<'v>(desc: &TypeDescriptor, value: &'v Value) -> Result<&'v [Value]> {
    match value {
        Value::List(items) => Ok(items.as_slice()),
        other => Err(Error::InvalidValueError(format!(
            "Cannot encode {} value as {}",
            other.kind(),
            desc
        ))),
    }
}

fn expect_len(desc: &TypeDescriptor, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(Error::InvalidValueError(format!(
            "{} expects {} items, got {}",
            desc, expected, actual
        )));
    }
    Ok(())
}
