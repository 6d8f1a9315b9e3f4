//! Encoding FFI functions.

use crate::buffer::DrvBuffer;
use crate::error::{clear_last_error, report, set_last_error, DrvResult};
use crate::types::opt_str;
use drvbridge_core::{resolve_encoding, Buffer, UTF16_BE, UTF16_LE, WIRE_ENCODING};
use std::ffi::c_char;

/// Returns the encoding name to pass to the client library.
///
/// "UTF-16" yields "UTF-16LE" or "UTF-16BE" for the host byte order (a
/// pointer to static memory). Any other name, and null, is returned as-is.
///
/// # Safety
///
/// `encoding` must be null or a valid null-terminated string.
#[no_mangle]
pub unsafe extern "C" fn drv_resolve_encoding(encoding: *const c_char) -> *const c_char {
    let Ok(Some(name)) = opt_str(encoding) else {
        return encoding;
    };
    match resolve_encoding(Some(name.as_str())) {
        Some(resolved) if resolved != name && resolved == UTF16_LE => c"UTF-16LE".as_ptr(),
        Some(resolved) if resolved != name && resolved == UTF16_BE => c"UTF-16BE".as_ptr(),
        _ => encoding,
    }
}

/// Encodes UTF-8 text into a new buffer.
///
/// # Arguments
///
/// * `text` - UTF-8 bytes (may be null when `len` is 0)
/// * `len` - Length of `text` in bytes
/// * `encoding` - Target encoding name, or null for UTF-8
/// * `out_buffer` - Receives the buffer; release with `drv_free_buffer`
///
/// # Safety
///
/// - `text` must point to `len` readable bytes
/// - `encoding` must be null or a valid null-terminated string
/// - `out_buffer` must be a valid pointer
#[no_mangle]
pub unsafe extern "C" fn drv_buffer_from_text(
    text: *const u8,
    len: usize,
    encoding: *const c_char,
    out_buffer: *mut DrvBuffer,
) -> DrvResult {
    clear_last_error();

    if out_buffer.is_null() || (text.is_null() && len > 0) {
        set_last_error("null pointer argument");
        return DrvResult::NullPointer;
    }

    let bytes = if len == 0 {
        &[][..]
    } else {
        std::slice::from_raw_parts(text, len)
    };
    let Ok(text) = std::str::from_utf8(bytes) else {
        set_last_error("invalid UTF-8 in text");
        return DrvResult::InvalidArgument;
    };
    let encoding = match opt_str(encoding) {
        Ok(name) => name.unwrap_or_else(|| WIRE_ENCODING.to_string()),
        Err(msg) => {
            set_last_error(msg);
            return DrvResult::InvalidArgument;
        }
    };

    match Buffer::from_text(text, &encoding) {
        Ok(buffer) => {
            *out_buffer = DrvBuffer::from_buffer(buffer);
            DrvResult::Ok
        }
        Err(e) => report(&e),
    }
}
