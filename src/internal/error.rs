use thiserror::Error;

/// Unified error type for the ABI codec.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    /// The ABI description is malformed or declares an unknown custom type kind.
    #[error("Schema Error: {0}")]
    SchemaError(String),

    /// A type name matches neither the grammar nor a declared struct or enum.
    #[error("Unknown type: {0}")]
    UnknownTypeError(String),

    /// The endpoint is not declared by the ABI.
    #[error("Unknown endpoint: {0}")]
    UnknownEndpointError(String),

    /// No variant of the enum matches the given discriminant or name.
    #[error("Unknown variant {variant} for enum {enum_name}")]
    UnknownVariantError { enum_name: String, variant: String },

    /// Fewer bytes remain than a fixed or length-prefixed value requires.
    #[error("Insufficient data: {needed} bytes needed but only {remaining} remaining")]
    InsufficientDataError { needed: usize, remaining: usize },

    /// Bytes were left over after decoding a whole buffer.
    #[error("Trailing data after decoding {type_name}: {remaining} bytes left")]
    TrailingDataError { type_name: String, remaining: usize },

    /// The number of buffers (or values) does not match what the types expect.
    #[error("Arity Error: {0}")]
    ArityError(String),

    /// A value is out of range, malformed, or does not fit the declared type.
    #[error("Invalid value: {0}")]
    InvalidValueError(String),

    /// Recursion went deeper than the configured limit.
    #[error("Maximum nesting depth ({0}) exceeded")]
    NestingDepthError(usize),
}

/// A specialized `Result` type for codec operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SchemaError(format!("Malformed ABI description: {}", err))
    }
}

impl From<hex::FromHexError> for Error {
    fn from(err: hex::FromHexError) -> Self {
        Error::InvalidValueError(format!("Invalid hex argument: {}", err))
    }
}
