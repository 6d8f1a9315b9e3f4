//! Owned byte buffers handed to the client library.

use crate::encoding::Encoding;
use crate::error::{DriverError, DriverResult};
use crate::value::Value;

/// Bytes prepared for a single client library call.
///
/// The buffer owns its memory and releases it when dropped, so every exit
/// path of the function that built it gives the memory back.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Buffer {
    bytes: Vec<u8>,
    encoding: Option<Encoding>,
}

impl Buffer {
    /// Creates an empty buffer.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Encodes text with the named encoding.
    ///
    /// The name is resolved first, so "UTF-16" never produces a BOM.
    pub fn from_text(text: &str, encoding: &str) -> DriverResult<Self> {
        let encoding = Encoding::for_name(encoding)?;
        Ok(Self {
            bytes: encoding.encode(text)?,
            encoding: Some(encoding),
        })
    }

    /// Copies binary data as-is.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
            encoding: None,
        }
    }

    /// Builds a buffer from a text, bytes or null value.
    ///
    /// Null yields an empty buffer. Any other shape is a type mismatch.
    pub fn from_value(value: &Value, encoding: &str) -> DriverResult<Self> {
        match value {
            Value::Text(text) => Self::from_text(text, encoding),
            Value::Bytes(bytes) => Ok(Self::from_bytes(bytes)),
            Value::Null => Ok(Self::empty()),
            other => Err(DriverError::type_mismatch(
                "expected a string or bytes value",
                &other.value_type(),
            )),
        }
    }

    /// The buffer contents.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the buffer holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The encoding used to produce the bytes, `None` for raw binary data.
    pub fn encoding(&self) -> Option<Encoding> {
        self.encoding
    }

    /// Decodes the contents back into text.
    ///
    /// Raw buffers are decoded as UTF-8.
    pub fn decode(&self) -> Option<String> {
        self.encoding
            .unwrap_or(Encoding::Utf8)
            .decode(&self.bytes)
    }

    /// Consumes the buffer, returning its bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_encoded() {
        let buffer = Buffer::from_value(&Value::from("h\u{e9}llo"), "UTF-8").unwrap();
        assert_eq!(buffer.as_bytes(), "h\u{e9}llo".as_bytes());
        assert_eq!(buffer.encoding(), Some(Encoding::Utf8));
        assert_eq!(buffer.decode().as_deref(), Some("h\u{e9}llo"));
    }

    #[test]
    fn bytes_are_copied_raw() {
        let buffer = Buffer::from_value(&Value::Bytes(vec![0xff, 0x00, 0x10]), "UTF-16").unwrap();
        assert_eq!(buffer.as_bytes(), &[0xff, 0x00, 0x10]);
        assert_eq!(buffer.encoding(), None);
    }

    #[test]
    fn null_is_empty() {
        let buffer = Buffer::from_value(&Value::Null, "UTF-8").unwrap();
        assert!(buffer.is_empty());
        assert_eq!(buffer.encoding(), None);
    }

    #[test]
    fn utf16_uses_host_order() {
        let buffer = Buffer::from_text("ab", "UTF-16").unwrap();
        assert_eq!(buffer.len(), 4);
        let expected = if cfg!(target_endian = "little") {
            Encoding::Utf16Le
        } else {
            Encoding::Utf16Be
        };
        assert_eq!(buffer.encoding(), Some(expected));
        assert_eq!(buffer.decode().as_deref(), Some("ab"));
    }

    #[test]
    fn unrepresentable_text_fails() {
        let err = Buffer::from_text("\u{3042}", "ASCII").unwrap_err();
        assert!(matches!(err, DriverError::Encoding { .. }));
    }

    #[test]
    fn unknown_encoding_fails() {
        let err = Buffer::from_text("x", "KOI9").unwrap_err();
        assert!(matches!(err, DriverError::UnknownEncoding { .. }));
    }

    #[test]
    fn other_shapes_are_type_errors() {
        let err = Buffer::from_value(&Value::Integer(42), "UTF-8").unwrap_err();
        assert_eq!(
            err.to_string(),
            "expected a string or bytes value, got drvbridge_core::value.Integer"
        );
    }
}
