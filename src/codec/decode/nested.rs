use tracing::trace;

use super::basic::nested_decode_basic;
use crate::codec::type_name::TypeDescriptor;
use crate::codec::types::{EnumValue, Value};
use crate::codec::AbiSerializer;
use crate::internal::error::{Error, Result};
use crate::internal::reader::ByteReader;
use crate::schema::{CustomKind, Field};

impl AbiSerializer {
    /// Decodes one nested value of `type_name` from the front of `data`.
    ///
    /// Returns the value and the bytes that follow it.
    pub fn nested_decode<'a>(&self, type_name: &str, data: &'a [u8]) -> Result<(Value, &'a [u8])> {
        let desc = self.parse_type(type_name)?;
        let mut reader = ByteReader::new(data);
        let value = self.decode_nested(&desc, &mut reader, 0)?;
        Ok((value, reader.rest()))
    }

    /// Decodes a declared struct from the front of `data`.
    pub fn decode_custom_struct<'a>(&self, name: &str, data: &'a [u8]) -> Result<(Value, &'a [u8])> {
        let mut reader = ByteReader::new(data);
        let value = self.decode_struct(name, &mut reader, 0)?;
        Ok((value, reader.rest()))
    }

    /// Decodes a declared enum from the front of `data`.
    pub fn decode_custom_enum<'a>(&self, name: &str, data: &'a [u8]) -> Result<(Value, &'a [u8])> {
        let mut reader = ByteReader::new(data);
        let value = self.decode_enum(name, &mut reader, 0)?;
        Ok((value, reader.rest()))
    }

    pub(crate) fn decode_nested(
        &self,
        desc: &TypeDescriptor,
        reader: &mut ByteReader<'_>,
        depth: usize,
    ) -> Result<Value> {
        self.check_depth(depth)?;
        trace!("Nested decode of {} at offset {}", desc, reader.position());

        match desc {
            TypeDescriptor::Basic(basic) => nested_decode_basic(*basic, reader),
            TypeDescriptor::List(inner) => {
                let count = reader.read_uint(4)? as usize;
                // The count comes from untrusted input, so nothing is reserved up front.
                let mut items = Vec::new();
                for index in 0..count {
                    self.check_list_len(desc, count, index, reader)?;
                    items.push(self.decode_nested(inner, reader, depth + 1)?);
                }
                Ok(Value::List(items))
            }
            TypeDescriptor::Array(size, inner) => {
                let mut items = Vec::with_capacity((*size).min(reader.remaining()));
                for _ in 0..*size {
                    items.push(self.decode_nested(inner, reader, depth + 1)?);
                }
                Ok(Value::List(items))
            }
            TypeDescriptor::Tuple(items) => items
                .iter()
                .map(|item| self.decode_nested(item, reader, depth + 1))
                .collect::<Result<Vec<_>>>()
                .map(Value::List),
            TypeDescriptor::Option(inner) => match reader.read_u8()? {
                0 => Ok(Value::Null),
                1 => self.decode_nested(inner, reader, depth + 1),
                other => Err(Error::InvalidValueError(format!(
                    "Invalid Option presence byte {:#04x}",
                    other
                ))),
            },
            TypeDescriptor::Named { name, kind: CustomKind::Struct } => {
                self.decode_struct(name, reader, depth)
            }
            TypeDescriptor::Named { name, kind: CustomKind::Enum } => {
                self.decode_enum(name, reader, depth)
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

    fn decode_struct(&self, name: &str, reader: &mut ByteReader<'_>, depth: usize) -> Result<Value> {
        self.check_depth(depth)?;
        let def = self
            .registry
            .struct_def(name)
            .ok_or_else(|| Error::UnknownTypeError(name.to_string()))?;

        let mut fields = Vec::with_capacity(def.fields.len());
        for field in &def.fields {
            let value = self.decode_field(field, reader, depth)?;
            fields.push((field.name.clone(), value));
        }
        Ok(Value::Struct(fields))
    }

    fn decode_enum(&self, name: &str, reader: &mut ByteReader<'_>, depth: usize) -> Result<Value> {
        self.check_depth(depth)?;
        let def = self
            .registry
            .enum_def(name)
            .ok_or_else(|| Error::UnknownTypeError(name.to_string()))?;

        // An exhausted input stands for the discriminant-0 variant.
        let discriminant = if reader.is_empty() {
            0
        } else {
            reader.read_int(1)? as i8
        };
        let variant = def
            .variant_by_discriminant(discriminant)
            .ok_or_else(|| Error::UnknownVariantError {
                enum_name: name.to_string(),
                variant: discriminant.to_string(),
            })?;

        let values = if variant.is_fieldless() {
            None
        } else {
            let mut values = Vec::with_capacity(variant.fields.len());
            for field in &variant.fields {
                values.push(self.decode_field(field, reader, depth)?);
            }
            Some(values)
        };
        Ok(Value::Enum(EnumValue::new(&variant.name, discriminant, values)))
    }

    /// Past `max_list_len` items, every outstanding item must still have a
    /// byte of input behind it.
    fn check_list_len(
        &self,
        desc: &TypeDescriptor,
        count: usize,
        index: usize,
        reader: &ByteReader<'_>,
    ) -> Result<()> {
        let max = self.config.max_list_len;
        if index >= max && count - index > reader.remaining() {
            return Err(Error::InvalidValueError(format!(
                "{} declares {} items, more than the limit of {} that {} remaining bytes can hold",
                desc,
                count,
                max,
                reader.remaining()
            )));
        }
        Ok(())
    }

    fn decode_field(&self, field: &Field, reader: &mut ByteReader<'_>, depth: usize) -> Result<Value> {
        let desc = self.field_type(field)?;
        self.decode_nested(&desc, reader, depth + 1)
    }
}

#[cfg(test)]
mod tests {
    use crate::codec::fixtures::{serializer, STRUCT2_BYTES};
    use crate::codec::types::{EnumValue, Value};
    use crate::codec::{AbiSerializer, CodecConfig};
    use crate::internal::error::Error;
    use num_bigint::BigUint;

    fn struct2() -> Value {
        Value::structure([
            ("field1", Value::BigUint(BigUint::from(7845u32))),
            (
                "field2",
                Value::List(vec![Value::UInt(1), Value::UInt(2), Value::UInt(3)]),
            ),
            (
                "field3",
                Value::List(vec![Value::Bool(true), Value::from("TKN-abcdef")]),
            ),
        ])
    }

    #[test]
    fn test_nested_decode_list_and_array() {
        let serializer = serializer();
        let (value, rest) = serializer
            .nested_decode("List<u8>", b"\x00\x00\x00\x03\x01\x02\x03\xaa")
            .unwrap();
        assert_eq!(value, Value::List(vec![Value::UInt(1), Value::UInt(2), Value::UInt(3)]));
        assert_eq!(rest, b"\xaa");

        let (value, rest) = serializer
            .nested_decode("array5<u8>", b"\x01\x02\x03\x04\x05\x1E\xA5")
            .unwrap();
        assert_eq!(value, Value::from(vec![1u64, 2, 3, 4, 5]));
        assert_eq!(rest, b"\x1E\xA5");

        assert_eq!(
            serializer.nested_decode("List<u8>", b"\x01\x02\x01\x03").unwrap_err(),
            Error::InsufficientDataError { needed: 1, remaining: 0 }
        );
    }

    #[test]
    fn test_nested_decode_option() {
        let serializer = serializer();
        let (value, rest) = serializer
            .nested_decode("Option<BigUint>", b"\x01\x00\x00\x00\x01\x10")
            .unwrap();
        assert_eq!(value, Value::BigUint(BigUint::from(16u32)));
        assert!(rest.is_empty());

        let (value, rest) = serializer.nested_decode("Option<u32>", b"\x00\x05").unwrap();
        assert_eq!(value, Value::Null);
        assert_eq!(rest, b"\x05");

        assert!(matches!(
            serializer.nested_decode("Option<u8>", b"\x02\x05"),
            Err(Error::InvalidValueError(_))
        ));
    }

    #[test]
    fn test_nested_decode_struct() {
        let serializer = serializer();
        let mut data = STRUCT2_BYTES.to_vec();
        data.push(0xff);
        let (value, rest) = serializer.nested_decode("MyAbiStruct2", &data).unwrap();
        assert_eq!(value, struct2());
        assert_eq!(rest, b"\xff");

        let (value, _) = serializer.decode_custom_struct("MyAbiStruct2", &data).unwrap();
        assert_eq!(value.field("field1"), Some(&Value::BigUint(BigUint::from(7845u32))));
    }

    #[test]
    fn test_nested_decode_enum() {
        let serializer = serializer();
        let (value, rest) = serializer.nested_decode("MyAbiEnum", b"").unwrap();
        assert_eq!(value, Value::Enum(EnumValue::new("Nothing", 0, None)));
        assert!(rest.is_empty());

        let (value, rest) = serializer.nested_decode("MyAbiEnum", b"\x00\x01").unwrap();
        assert_eq!(value, Value::Enum(EnumValue::new("Nothing", 0, None)));
        assert_eq!(rest, b"\x01");

        let (value, _) = serializer
            .decode_custom_enum("MyAbiEnum", b"\x01\x00\x00\x00\x2a")
            .unwrap();
        assert_eq!(
            value,
            Value::Enum(EnumValue::new("Something", 1, Some(vec![Value::UInt(42)])))
        );

        let mut data = b"\x02\x08".to_vec();
        data.extend_from_slice(STRUCT2_BYTES);
        let (value, rest) = serializer.nested_decode("MyAbiEnum", &data).unwrap();
        assert_eq!(
            value,
            Value::Enum(EnumValue::new("SomethingMore", 2, Some(vec![Value::UInt(8), struct2()])))
        );
        assert!(rest.is_empty());

        assert_eq!(
            serializer.nested_decode("MyAbiEnum", b"\x07").unwrap_err(),
            Error::UnknownVariantError {
                enum_name: "MyAbiEnum".to_string(),
                variant: "7".to_string(),
            }
        );
    }

    #[test]
    fn test_enum_shortcut_inside_struct() {
        // The last field sees an exhausted input and decodes as variant 0.
        let (value, rest) = serializer().nested_decode("Holder", b"\x09").unwrap();
        assert_eq!(
            value,
            Value::structure([
                ("id", Value::UInt(9)),
                ("status", Value::Enum(EnumValue::new("Nothing", 0, None))),
            ])
        );
        assert!(rest.is_empty());
    }

    #[test]
    fn test_list_of_empty_items_is_bounded() {
        // Every enum past the end of input decodes from zero bytes.
        assert!(matches!(
            serializer().nested_decode("List<MyAbiEnum>", b"\xff\xff\xff\xff"),
            Err(Error::InvalidValueError(_))
        ));

        let registry = serializer().registry().clone();
        let config = CodecConfig {
            max_list_len: 2,
            ..CodecConfig::default()
        };
        let serializer = AbiSerializer::with_config(registry, config);
        let (value, rest) = serializer
            .nested_decode("List<MyAbiEnum>", b"\x00\x00\x00\x02")
            .unwrap();
        assert_eq!(
            value,
            Value::List(vec![Value::Enum(EnumValue::new("Nothing", 0, None)); 2])
        );
        assert!(rest.is_empty());
        assert!(matches!(
            serializer.nested_decode("List<MyAbiEnum>", b"\x00\x00\x00\x03"),
            Err(Error::InvalidValueError(_))
        ));

        // Items backed by input are not limited.
        let (value, _) = serializer
            .nested_decode("List<u8>", b"\x00\x00\x00\x04\x01\x02\x03\x04")
            .unwrap();
        assert_eq!(value, Value::from(vec![1u64, 2, 3, 4]));
        assert!(matches!(
            serializer.nested_decode("List<array0<u8>>", b"\x00\x00\x00\x05"),
            Err(Error::InvalidValueError(_))
        ));
    }

    #[test]
    fn test_nested_decode_limits() {
        let serializer = serializer();
        assert_eq!(
            serializer.nested_decode("Chain", b"").unwrap_err(),
            Error::NestingDepthError(32)
        );
        assert!(matches!(
            serializer.nested_decode("List<variadic<u8>>", b"\x00\x00\x00\x01\x01"),
            Err(Error::InvalidValueError(_))
        ));
        assert_eq!(
            serializer.nested_decode("Unknown", b"\x00").unwrap_err(),
            Error::UnknownTypeError("Unknown".to_string())
        );
    }
}
