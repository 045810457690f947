// Internal utilities shared by the schema and codec modules

pub mod error;
pub mod reader;
