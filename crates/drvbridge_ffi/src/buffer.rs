//! Buffer types for FFI.

use drvbridge_core::{Buffer, Encoding};
use std::ffi::{c_char, CStr};

/// A byte buffer for FFI.
///
/// Memory is owned by Rust. Call `drv_free_buffer` to release.
#[repr(C)]
pub struct DrvBuffer {
    /// Pointer to data.
    pub data: *mut u8,
    /// Length in bytes.
    pub len: usize,
    /// Capacity (for internal use).
    pub capacity: usize,
    /// Null-terminated name of the encoding used, or null for raw bytes.
    /// Points to static memory.
    pub encoding: *const c_char,
}

fn encoding_name(encoding: Encoding) -> &'static CStr {
    match encoding {
        Encoding::Utf8 => c"UTF-8",
        Encoding::Utf16Le => c"UTF-16LE",
        Encoding::Utf16Be => c"UTF-16BE",
        Encoding::Ascii => c"ASCII",
        Encoding::Latin1 => c"ISO-8859-1",
    }
}

impl DrvBuffer {
    /// Creates a new buffer from a Vec.
    pub fn from_vec(vec: Vec<u8>) -> Self {
        let mut vec = vec.into_boxed_slice();
        let data = vec.as_mut_ptr();
        let len = vec.len();
        std::mem::forget(vec);

        Self {
            data,
            len,
            capacity: len,
            encoding: std::ptr::null(),
        }
    }

    /// Moves an owned buffer across the boundary, keeping its encoding tag.
    pub fn from_buffer(buffer: Buffer) -> Self {
        let encoding = buffer
            .encoding()
            .map_or(std::ptr::null(), |e| encoding_name(e).as_ptr());
        Self {
            encoding,
            ..Self::from_vec(buffer.into_vec())
        }
    }

    /// Creates an empty buffer.
    pub fn empty() -> Self {
        Self {
            data: std::ptr::null_mut(),
            len: 0,
            capacity: 0,
            encoding: std::ptr::null(),
        }
    }

    /// Returns true if the buffer is null/empty.
    pub fn is_null(&self) -> bool {
        self.data.is_null()
    }

    /// Returns the encoding name, if the buffer holds encoded text.
    pub fn encoding_name(&self) -> Option<&'static str> {
        if self.encoding.is_null() {
            return None;
        }
        // Safety: only ever set from the static names above
        unsafe { CStr::from_ptr(self.encoding) }.to_str().ok()
    }

    /// Converts back to a Vec, consuming the buffer.
    ///
    /// # Safety
    ///
    /// The buffer must have been created from a Vec.
    pub unsafe fn into_vec(self) -> Vec<u8> {
        if self.data.is_null() {
            return Vec::new();
        }
        Vec::from_raw_parts(self.data, self.len, self.capacity)
    }
}

/// Frees a buffer allocated by drvbridge.
///
/// # Safety
///
/// The buffer must have been allocated by drvbridge FFI functions.
#[no_mangle]
pub unsafe extern "C" fn drv_free_buffer(buffer: DrvBuffer) {
    if !buffer.data.is_null() {
        drop(Vec::from_raw_parts(buffer.data, buffer.len, buffer.capacity));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_from_vec() {
        let data = vec![1u8, 2, 3, 4, 5];
        let buffer = DrvBuffer::from_vec(data.clone());

        assert!(!buffer.is_null());
        assert_eq!(buffer.len, 5);
        assert_eq!(buffer.encoding_name(), None);

        // Safety: we just created it
        let recovered = unsafe { buffer.into_vec() };
        assert_eq!(recovered, data);
    }

    #[test]
    fn buffer_keeps_encoding() {
        let buffer = DrvBuffer::from_buffer(Buffer::from_text("hi", "UTF-16BE").unwrap());
        assert_eq!(buffer.len, 4);
        assert_eq!(buffer.encoding_name(), Some("UTF-16BE"));

        // Safety: we just created it
        let bytes = unsafe { buffer.into_vec() };
        assert_eq!(bytes, vec![0x00, b'h', 0x00, b'i']);
    }

    #[test]
    fn buffer_empty() {
        let buffer = DrvBuffer::empty();
        assert!(buffer.is_null());
        assert_eq!(buffer.len, 0);
        // Safety: freeing a null buffer is a no-op
        unsafe { drv_free_buffer(buffer) };
    }
}
