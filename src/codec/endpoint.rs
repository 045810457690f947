// Endpoint argument and result handling
//
// An endpoint call carries its arguments, and returns its results, as a flat
// sequence of top-encoded buffers. The declared input and output types decide
// how many buffers each value occupies.

use tracing::debug;

use crate::codec::type_name::TypeDescriptor;
use crate::codec::types::Value;
use crate::codec::AbiSerializer;
use crate::internal::error::{Error, Result};
use crate::schema::Input;

impl AbiSerializer {
    /// Encodes the arguments of `endpoint`, one value per declared input.
    ///
    /// Trailing `optional` and `variadic` inputs may be left out.
    pub fn encode_endpoint_inputs(&self, endpoint: &str, values: &[Value]) -> Result<Vec<Vec<u8>>> {
        let def = self.registry.endpoint(endpoint)?;
        debug!("Encoding {} arguments for endpoint {}", values.len(), endpoint);
        self.encode_inputs(endpoint, &def.inputs, values)
    }

    /// Encodes deployment arguments. A contract without a declared
    /// constructor takes none.
    pub fn encode_constructor_inputs(&self, values: &[Value]) -> Result<Vec<Vec<u8>>> {
        let inputs = self
            .registry
            .constructor()
            .map(|constructor| constructor.inputs.as_slice())
            .unwrap_or_default();
        debug!("Encoding {} constructor arguments", values.len());
        self.encode_inputs("constructor", inputs, values)
    }

    /// Decodes the results returned by `endpoint`.
    ///
    /// A multi-result output takes every remaining buffer and its items are
    /// appended one by one; an absent `optional` result adds nothing. Any
    /// other output takes one buffer, or none when it is an `Option` and the
    /// results have run out.
    pub fn decode_endpoint_outputs<B: AsRef<[u8]>>(&self, endpoint: &str, buffers: &[B]) -> Result<Vec<Value>> {
        let def = self.registry.endpoint(endpoint)?;
        debug!("Decoding {} result buffers for endpoint {}", buffers.len(), endpoint);

        let buffers: Vec<&[u8]> = buffers.iter().map(|b| b.as_ref()).collect();
        let mut offset = 0;
        let mut values = Vec::with_capacity(def.outputs.len());
        for output in &def.outputs {
            let desc = self.parse_type(&output.type_name)?;
            if output.multi_result {
                let value = self.decode_top_buffers(&desc, &buffers[offset..], 0)?;
                offset = buffers.len();
                match (&desc, value) {
                    (
                        TypeDescriptor::Variadic(_)
                        | TypeDescriptor::VariadicMulti(_)
                        | TypeDescriptor::Multi(_),
                        Value::List(items),
                    ) => values.extend(items),
                    (TypeDescriptor::Optional(_), Value::Null) => {}
                    (_, value) => values.push(value),
                }
                continue;
            }
            match buffers.get(offset) {
                Some(buffer) => {
                    values.push(self.decode_top(&desc, buffer, 0)?);
                    offset += 1;
                }
                None if desc.is_option() => values.push(Value::Null),
                None => {
                    return Err(Error::ArityError(format!(
                        "Endpoint {} returned too few results: no buffer left for {}",
                        endpoint, desc
                    )))
                }
            }
        }

        if offset < buffers.len() {
            return Err(Error::ArityError(format!(
                "Endpoint {} declares {} outputs but returned {} buffers",
                endpoint,
                def.outputs.len(),
                buffers.len()
            )));
        }
        Ok(values)
    }

    /// Decodes call arguments of `endpoint`, one value per declared input.
    ///
    /// `variadic` inputs take the remaining buffers, `optional` inputs zero or
    /// one, `multi<..>` inputs one per item and every other input exactly one.
    pub fn decode_endpoint_inputs<B: AsRef<[u8]>>(&self, endpoint: &str, buffers: &[B]) -> Result<Vec<Value>> {
        let def = self.registry.endpoint(endpoint)?;
        debug!("Decoding {} argument buffers for endpoint {}", buffers.len(), endpoint);

        let buffers: Vec<&[u8]> = buffers.iter().map(|b| b.as_ref()).collect();
        let mut rest = buffers.as_slice();
        let mut values = Vec::with_capacity(def.inputs.len());
        for input in &def.inputs {
            let desc = self.parse_type(&input.type_name)?;
            let take = match &desc {
                TypeDescriptor::Variadic(_) | TypeDescriptor::VariadicMulti(_) => rest.len(),
                TypeDescriptor::Optional(_) => rest.len().min(1),
                TypeDescriptor::Multi(items) => items.len().min(rest.len()),
                _ => rest.len().min(1),
            };
            let (current, remaining) = rest.split_at(take);
            values.push(self.decode_top_buffers(&desc, current, 0)?);
            rest = remaining;
        }

        if !rest.is_empty() {
            return Err(Error::ArityError(format!(
                "Endpoint {} takes {} inputs but got {} buffers",
                endpoint,
                def.inputs.len(),
                buffers.len()
            )));
        }
        Ok(values)
    }

    fn encode_inputs(&self, label: &str, inputs: &[Input], values: &[Value]) -> Result<Vec<Vec<u8>>> {
        if values.len() > inputs.len() {
            return Err(Error::ArityError(format!(
                "{} takes {} arguments, got {}",
                label,
                inputs.len(),
                values.len()
            )));
        }

        let mut buffers = Vec::new();
        for (index, input) in inputs.iter().enumerate() {
            let desc = self.parse_type(&input.type_name)?;
            match values.get(index) {
                Some(value) => buffers.extend(self.encode_top_buffers(&desc, value, 0)?),
                None if is_omittable(&desc) => {}
                None => {
                    return Err(Error::ArityError(format!(
                        "{} is missing argument {} of type {}",
                        label, input.name, desc
                    )))
                }
            }
        }
        Ok(buffers)
    }
}

/// Inputs that may be left out at the end of an argument list.
fn is_omittable(desc: &TypeDescriptor) -> bool {
    matches!(
        desc,
        TypeDescriptor::Optional(_) | TypeDescriptor::Variadic(_) | TypeDescriptor::VariadicMulti(_)
    )
}
