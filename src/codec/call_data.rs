use std::fmt;

use tracing::debug;

use crate::codec::types::Value;
use crate::codec::AbiSerializer;
use crate::internal::error::{Error, Result};

/// Text form of an endpoint call: `endpoint@hex@hex...`.
///
/// Empty arguments are rendered as empty segments, so `add@@01` carries two
/// arguments, the first of them empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallData {
    pub endpoint: String,
    pub arguments: Vec<Vec<u8>>,
}

impl CallData {
    /// Creates call data from already-encoded arguments.
    pub fn new(endpoint: impl Into<String>, arguments: Vec<Vec<u8>>) -> Self {
        Self {
            endpoint: endpoint.into(),
            arguments,
        }
    }

    /// Parses `endpoint@hex@hex...` text.
    pub fn parse(text: &str) -> Result<Self> {
        let mut parts = text.split('@');
        let endpoint = parts.next().unwrap_or_default();
        if endpoint.is_empty() {
            return Err(Error::InvalidValueError(format!(
                "Call data has no endpoint name: {:?}",
                text
            )));
        }
        let arguments = parts.map(hex::decode).collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self::new(endpoint, arguments))
    }
}

impl fmt::Display for CallData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.endpoint)?;
        for argument in &self.arguments {
            write!(f, "@{}", hex::encode(argument))?;
        }
        Ok(())
    }
}

impl AbiSerializer {
    /// Encodes a call of `endpoint` with `values` into its text form.
    pub fn encode_call_data(&self, endpoint: &str, values: &[Value]) -> Result<String> {
        let arguments = self.encode_endpoint_inputs(endpoint, values)?;
        Ok(CallData::new(endpoint, arguments).to_string())
    }

    /// Parses call data text and decodes its arguments against the named
    /// endpoint's inputs. Returns the endpoint name and the decoded values.
    pub fn decode_call_data(&self, text: &str) -> Result<(String, Vec<Value>)> {
        let call = CallData::parse(text)?;
        debug!("Decoding call data for endpoint {}", call.endpoint);
        let values = self.decode_endpoint_inputs(&call.endpoint, &call.arguments)?;
        Ok((call.endpoint, values))
    }
}
