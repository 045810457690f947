// Read-only registry of everything an ABI declares

use std::collections::HashMap;

use crate::internal::error::{Error, Result};
use crate::schema::types::{Constructor, CustomKind, Endpoint, EnumDef, StructDef};

/// Immutable lookup tables built once from an ABI description.
///
/// Declaration order is kept next to the hash indexes so listings come back in
/// the order the ABI declares them.
#[derive(Debug, Clone, Default)]
pub struct AbiRegistry {
    name: Option<String>,
    constructor: Option<Constructor>,
    endpoints: HashMap<String, Endpoint>,
    structs: HashMap<String, StructDef>,
    enums: HashMap<String, EnumDef>,
    endpoint_order: Vec<String>,
    struct_order: Vec<String>,
    enum_order: Vec<String>,
}

impl AbiRegistry {
    /// Builds the lookup tables, keeping each list in declaration order.
    pub fn new(
        name: Option<String>,
        constructor: Option<Constructor>,
        endpoints: Vec<Endpoint>,
        structs: Vec<StructDef>,
        enums: Vec<EnumDef>,
    ) -> Self {
        let mut registry = Self {
            name,
            constructor,
            ..Self::default()
        };
        for endpoint in endpoints {
            registry.endpoint_order.push(endpoint.name.clone());
            registry.endpoints.insert(endpoint.name.clone(), endpoint);
        }
        for def in structs {
            registry.struct_order.push(def.name.clone());
            registry.structs.insert(def.name.clone(), def);
        }
        for def in enums {
            registry.enum_order.push(def.name.clone());
            registry.enums.insert(def.name.clone(), def);
        }
        registry
    }

    /// Contract name, when the ABI carries one.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The deployment constructor, when declared.
    pub fn constructor(&self) -> Option<&Constructor> {
        self.constructor.as_ref()
    }

    /// Looks up an endpoint by name.
    pub fn endpoint(&self, name: &str) -> Result<&Endpoint> {
        self.endpoints
            .get(name)
            .ok_or_else(|| Error::UnknownEndpointError(name.to_string()))
    }

    /// Looks up a struct definition by name.
    pub fn struct_def(&self, name: &str) -> Option<&StructDef> {
        self.structs.get(name)
    }

    /// Looks up an enum definition by name.
    pub fn enum_def(&self, name: &str) -> Option<&EnumDef> {
        self.enums.get(name)
    }

    /// Resolves a custom type name, structs first.
    pub fn custom_kind(&self, name: &str) -> Option<CustomKind> {
        if self.structs.contains_key(name) {
            Some(CustomKind::Struct)
        } else if self.enums.contains_key(name) {
            Some(CustomKind::Enum)
        } else {
            None
        }
    }

    /// Endpoint names in declaration order.
    pub fn endpoint_names(&self) -> &[String] {
        &self.endpoint_order
    }

    /// Struct names in declaration order.
    pub fn struct_names(&self) -> &[String] {
        &self.struct_order
    }

    /// Enum names in declaration order.
    pub fn enum_names(&self) -> &[String] {
        &self.enum_order
    }
}
