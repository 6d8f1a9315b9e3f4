//! JSON argument processing for the document store.

use crate::buffer::Buffer;
use crate::encoding::WIRE_ENCODING;
use crate::error::DriverResult;
use crate::value::Value;

/// Turns structured values into JSON text.
pub trait Serializer {
    /// Serializes a map or list value.
    fn dump(&self, value: &Value) -> DriverResult<String>;
}

impl<F> Serializer for F
where
    F: Fn(&Value) -> DriverResult<String>,
{
    fn dump(&self, value: &Value) -> DriverResult<String> {
        self(value)
    }
}

/// Serializer backed by `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn dump(&self, value: &Value) -> DriverResult<String> {
        Ok(serde_json::to_string(value)?)
    }
}

/// Prepares a JSON argument for the document store.
///
/// Maps and lists are serialized first; text and bytes are taken as
/// already-serialized JSON. The result is always UTF-8, whatever encoding
/// the connection uses.
pub fn normalize_json_arg(value: &Value, serializer: &dyn Serializer) -> DriverResult<Buffer> {
    if value.is_structured() {
        let text = serializer.dump(value)?;
        return Buffer::from_text(&text, WIRE_ENCODING);
    }
    Buffer::from_value(value, WIRE_ENCODING)
}
