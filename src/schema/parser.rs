// ABI description parser
//
// Turns the JSON shape of a contract ABI into an `AbiRegistry`. Reading the
// description from disk or from the network is left to the caller.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::internal::error::{Error, Result};
use crate::schema::registry::AbiRegistry;
use crate::schema::types::{
    Constructor, CustomKind, Endpoint, EnumDef, Field, Input, Output, StructDef, Variant,
};

#[derive(Debug, Deserialize)]
struct RawAbi {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    constructor: Option<RawConstructor>,
    #[serde(default)]
    endpoints: Vec<RawEndpoint>,
    #[serde(default)]
    types: serde_json::Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RawConstructor {
    #[serde(default)]
    inputs: Vec<RawInput>,
}

#[derive(Debug, Deserialize)]
struct RawEndpoint {
    name: String,
    #[serde(default)]
    mutability: Option<String>,
    #[serde(default)]
    docs: Vec<String>,
    #[serde(default)]
    inputs: Vec<RawInput>,
    #[serde(default)]
    outputs: Vec<RawOutput>,
}

#[derive(Debug, Deserialize)]
struct RawInput {
    name: String,
    #[serde(rename = "type")]
    type_name: String,
}

#[derive(Debug, Deserialize)]
struct RawOutput {
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default)]
    multi_result: bool,
}

#[derive(Debug, Deserialize)]
struct RawField {
    name: String,
    #[serde(rename = "type")]
    type_name: String,
}

#[derive(Debug, Deserialize)]
struct RawStruct {
    #[serde(default)]
    fields: Vec<RawField>,
}

#[derive(Debug, Deserialize)]
struct RawVariant {
    name: String,
    discriminant: i64,
    #[serde(default)]
    fields: Vec<RawField>,
}

#[derive(Debug, Deserialize)]
struct RawEnum {
    #[serde(default)]
    variants: Vec<RawVariant>,
}

impl From<RawInput> for Input {
    fn from(raw: RawInput) -> Self {
        Input {
            name: raw.name,
            type_name: raw.type_name,
        }
    }
}

impl From<RawField> for Field {
    fn from(raw: RawField) -> Self {
        Field::new(raw.name, raw.type_name)
    }
}

/// Parser for contract ABI descriptions.
#[derive(Debug, Default)]
pub struct SchemaParser;

impl SchemaParser {
    pub fn new() -> Self {
        Self
    }

    /// Parses ABI JSON text.
    pub fn parse_str(&self, text: &str) -> Result<AbiRegistry> {
        let json: Value = serde_json::from_str(text)?;
        self.parse(&json)
    }

    /// Parses an already-loaded ABI description.
    pub fn parse(&self, json: &Value) -> Result<AbiRegistry> {
        if !json.is_object() {
            return Err(Error::SchemaError("ABI must be a JSON object".to_string()));
        }
        let raw = RawAbi::deserialize(json)?;

        let endpoints: Vec<Endpoint> = raw
            .endpoints
            .into_iter()
            .map(|e| Endpoint {
                name: e.name,
                mutability: e.mutability,
                docs: e.docs,
                inputs: e.inputs.into_iter().map(Input::from).collect(),
                outputs: e
                    .outputs
                    .into_iter()
                    .map(|o| Output {
                        type_name: o.type_name,
                        multi_result: o.multi_result,
                    })
                    .collect(),
            })
            .collect();

        let constructor = raw.constructor.map(|c| Constructor {
            inputs: c.inputs.into_iter().map(Input::from).collect(),
        });

        let mut structs = Vec::new();
        let mut enums = Vec::new();
        for (type_name, element) in &raw.types {
            match self.custom_kind_of(type_name, element)? {
                CustomKind::Struct => structs.push(self.parse_struct(type_name, element)?),
                CustomKind::Enum => enums.push(self.parse_enum(type_name, element)?),
            }
        }

        debug!(
            endpoints = endpoints.len(),
            structs = structs.len(),
            enums = enums.len(),
            "parsed ABI"
        );
        Ok(AbiRegistry::new(raw.name, constructor, endpoints, structs, enums))
    }

    fn custom_kind_of(&self, type_name: &str, element: &Value) -> Result<CustomKind> {
        let kind = element
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                Error::SchemaError(format!("Custom type {} does not declare its kind", type_name))
            })?;
        CustomKind::from_name(kind).ok_or_else(|| {
            Error::SchemaError(format!("Unknown type {} for custom type {}", kind, type_name))
        })
    }

    fn parse_struct(&self, type_name: &str, element: &Value) -> Result<StructDef> {
        let raw = RawStruct::deserialize(element)?;
        Ok(StructDef {
            name: type_name.to_string(),
            fields: raw.fields.into_iter().map(Field::from).collect(),
        })
    }

    fn parse_enum(&self, type_name: &str, element: &Value) -> Result<EnumDef> {
        let raw = RawEnum::deserialize(element)?;
        let variants = raw
            .variants
            .into_iter()
            .map(|v| {
                let discriminant = i8::try_from(v.discriminant).map_err(|_| {
                    Error::SchemaError(format!(
                        "Discriminant {} of {}::{} does not fit in an i8",
                        v.discriminant, type_name, v.name
                    ))
                })?;
                Ok(Variant {
                    name: v.name,
                    discriminant,
                    fields: v.fields.into_iter().map(Field::from).collect(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(EnumDef {
            name: type_name.to_string(),
            variants,
        })
    }
}
