//! Text encodings understood by the client library.
//!
//! The client library does not accept a byte order mark and expects UTF-16
//! data in an explicit byte order. Encoding with plain "UTF-16" in most host
//! string layers prepends a BOM, so the ambiguous name is resolved to the
//! host's explicit variant before anything is encoded or sent.

use crate::error::{DriverError, DriverResult};

/// The ambiguous 16-bit encoding name.
pub const UTF16: &str = "UTF-16";

/// Little-endian UTF-16.
pub const UTF16_LE: &str = "UTF-16LE";

/// Big-endian UTF-16.
pub const UTF16_BE: &str = "UTF-16BE";

/// Encoding of all document-store content sent to the client library.
pub const WIRE_ENCODING: &str = "UTF-8";

/// Byte order of multi-byte code units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Least significant byte first.
    Little,
    /// Most significant byte first.
    Big,
}

impl ByteOrder {
    /// Detects the byte order of the running host.
    pub fn host() -> Self {
        if u32::from_ne_bytes([0, 1, 2, 3]) == 0x0302_0100 {
            ByteOrder::Little
        } else {
            ByteOrder::Big
        }
    }
}

/// Returns the encoding to hand to the client library for `encoding`.
///
/// "UTF-16" is replaced by the explicit variant for the host byte order;
/// every other name (and `None`) is returned unchanged.
pub fn resolve_encoding(encoding: Option<&str>) -> Option<&str> {
    resolve_encoding_for(encoding, ByteOrder::host())
}

/// Like [`resolve_encoding`], for an explicit byte order.
pub fn resolve_encoding_for(encoding: Option<&str>, order: ByteOrder) -> Option<&str> {
    match encoding {
        Some(UTF16) => Some(match order {
            ByteOrder::Little => UTF16_LE,
            ByteOrder::Big => UTF16_BE,
        }),
        other => other,
    }
}

/// An encoding the buffer builder can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// UTF-8.
    Utf8,
    /// UTF-16, little-endian, no BOM.
    Utf16Le,
    /// UTF-16, big-endian, no BOM.
    Utf16Be,
    /// 7-bit ASCII.
    Ascii,
    /// ISO-8859-1.
    Latin1,
}

impl Encoding {
    /// Looks up an encoding by name.
    ///
    /// Names are resolved first, so "UTF-16" yields the host variant.
    /// Matching ignores case and the `-`/`_` separators.
    pub fn for_name(name: &str) -> DriverResult<Self> {
        let resolved = resolve_encoding(Some(name)).unwrap_or(name);
        let normalized: String = resolved
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "utf8" => Ok(Encoding::Utf8),
            "utf16" => Ok(match ByteOrder::host() {
                ByteOrder::Little => Encoding::Utf16Le,
                ByteOrder::Big => Encoding::Utf16Be,
            }),
            "utf16le" => Ok(Encoding::Utf16Le),
            "utf16be" => Ok(Encoding::Utf16Be),
            "ascii" | "usascii" => Ok(Encoding::Ascii),
            "latin1" | "iso88591" | "l1" => Ok(Encoding::Latin1),
            _ => Err(DriverError::unknown_encoding(name)),
        }
    }

    /// Returns the canonical name.
    pub fn name(self) -> &'static str {
        match self {
            Encoding::Utf8 => WIRE_ENCODING,
            Encoding::Utf16Le => UTF16_LE,
            Encoding::Utf16Be => UTF16_BE,
            Encoding::Ascii => "ASCII",
            Encoding::Latin1 => "ISO-8859-1",
        }
    }

    /// Encodes text.
    pub fn encode(self, text: &str) -> DriverResult<Vec<u8>> {
        match self {
            Encoding::Utf8 => Ok(text.as_bytes().to_vec()),
            Encoding::Utf16Le => Ok(text.encode_utf16().flat_map(u16::to_le_bytes).collect()),
            Encoding::Utf16Be => Ok(text.encode_utf16().flat_map(u16::to_be_bytes).collect()),
            Encoding::Ascii => self.encode_single_byte(text, 0x7F),
            Encoding::Latin1 => self.encode_single_byte(text, 0xFF),
        }
    }

    fn encode_single_byte(self, text: &str, max: u32) -> DriverResult<Vec<u8>> {
        let mut out = Vec::with_capacity(text.len());
        for (position, character) in text.chars().enumerate() {
            let code = u32::from(character);
            match u8::try_from(code) {
                Ok(byte) if code <= max => out.push(byte),
                _ => {
                    return Err(DriverError::Encoding {
                        encoding: self.name().to_string(),
                        character,
                        position,
                    })
                }
            }
        }
        Ok(out)
    }

    /// Decodes bytes produced by [`Encoding::encode`].
    ///
    /// Returns `None` if the bytes are not valid in this encoding.
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            Encoding::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_string),
            Encoding::Utf16Le | Encoding::Utf16Be => {
                if bytes.len() % 2 != 0 {
                    return None;
                }
                let units = bytes.chunks_exact(2).map(|pair| {
                    let pair = [pair[0], pair[1]];
                    if self == Encoding::Utf16Le {
                        u16::from_le_bytes(pair)
                    } else {
                        u16::from_be_bytes(pair)
                    }
                });
                char::decode_utf16(units).collect::<Result<String, _>>().ok()
            }
            Encoding::Ascii => {
                if bytes.is_ascii() {
                    Some(bytes.iter().map(|b| char::from(*b)).collect())
                } else {
                    None
                }
            }
            Encoding::Latin1 => Some(bytes.iter().map(|b| char::from(*b)).collect()),
        }
    }
}
