//! Error codes and result types.

use drvbridge_core::DriverError;
use std::cell::RefCell;
use std::ffi::CString;

/// Result code for FFI functions.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrvResult {
    /// Operation succeeded.
    Ok = 0,
    /// Generic error.
    Error = 1,
    /// Argument has the wrong shape or content.
    InvalidArgument = 2,
    /// Text cannot be represented in the target encoding.
    EncodingError = 3,
    /// Encoding name is not known.
    UnknownEncoding = 4,
    /// Client library was already initialized.
    AlreadyInitialized = 5,
    /// Client library call failed.
    ClientLibrary = 6,
    /// Reference operation on a handle failed.
    ReferenceOperation = 7,
    /// Structured value serialization failed.
    Serialization = 8,
    /// Null pointer.
    NullPointer = 9,
    /// Client library has not been initialized.
    NotInitialized = 10,
}

impl DrvResult {
    /// Returns true if the result indicates success.
    pub fn is_ok(self) -> bool {
        self == DrvResult::Ok
    }

    /// Returns true if the result indicates an error.
    pub fn is_err(self) -> bool {
        self != DrvResult::Ok
    }
}

impl From<&DriverError> for DrvResult {
    fn from(err: &DriverError) -> Self {
        match err {
            DriverError::TypeMismatch { .. } | DriverError::Truthiness { .. } => {
                DrvResult::InvalidArgument
            }
            DriverError::Encoding { .. } => DrvResult::EncodingError,
            DriverError::UnknownEncoding { .. } => DrvResult::UnknownEncoding,
            DriverError::AlreadyInitialized => DrvResult::AlreadyInitialized,
            DriverError::ReentrantInitialization => DrvResult::Error,
            DriverError::ClientLibrary(_) => DrvResult::ClientLibrary,
            DriverError::ReferenceOperation { .. } => DrvResult::ReferenceOperation,
            DriverError::Serialization { .. } => DrvResult::Serialization,
        }
    }
}

/// Error code type for C compatibility.
pub type ErrorCode = i32;

impl From<DrvResult> for ErrorCode {
    fn from(result: DrvResult) -> Self {
        result as ErrorCode
    }
}

impl From<ErrorCode> for DrvResult {
    fn from(code: ErrorCode) -> Self {
        match code {
            0 => DrvResult::Ok,
            2 => DrvResult::InvalidArgument,
            3 => DrvResult::EncodingError,
            4 => DrvResult::UnknownEncoding,
            5 => DrvResult::AlreadyInitialized,
            6 => DrvResult::ClientLibrary,
            7 => DrvResult::ReferenceOperation,
            8 => DrvResult::Serialization,
            9 => DrvResult::NullPointer,
            10 => DrvResult::NotInitialized,
            _ => DrvResult::Error,
        }
    }
}

// Thread-local storage for last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Sets the last error message.
pub fn set_last_error(message: impl Into<String>) {
    let msg = message.into();
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Clears the last error.
pub fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Records `err` as the last error and returns its result code.
pub fn report(err: &DriverError) -> DrvResult {
    set_last_error(err.to_string());
    DrvResult::from(err)
}

/// Gets the last error message as a C string.
///
/// Returns null if no error is set.
///
/// # Safety
///
/// The returned pointer is valid until the next FFI call on this thread.
#[no_mangle]
pub extern "C" fn drv_get_last_error() -> *const std::ffi::c_char {
    LAST_ERROR.with(|e| match e.borrow().as_ref() {
        Some(cstr) => cstr.as_ptr(),
        None => std::ptr::null(),
    })
}

/// Clears the last error message.
#[no_mangle]
pub extern "C" fn drv_clear_error() {
    clear_last_error();
}

#[cfg(test)]
mod tests {
    use super::*;
    use drvbridge_core::ErrorInfo;

    #[test]
    fn result_codes() {
        assert_eq!(DrvResult::Ok as i32, 0);
        assert_eq!(DrvResult::Error as i32, 1);
        assert!(DrvResult::Ok.is_ok());
        assert!(DrvResult::Error.is_err());
    }

    #[test]
    fn error_code_conversion() {
        let code: ErrorCode = DrvResult::AlreadyInitialized.into();
        assert_eq!(code, 5);

        let back: DrvResult = code.into();
        assert_eq!(back, DrvResult::AlreadyInitialized);
        assert_eq!(DrvResult::from(99), DrvResult::Error);
    }

    #[test]
    fn driver_errors_map_to_codes() {
        assert_eq!(
            DrvResult::from(&DriverError::AlreadyInitialized),
            DrvResult::AlreadyInitialized
        );
        assert_eq!(
            DrvResult::from(&DriverError::ClientLibrary(ErrorInfo::new(1, "x"))),
            DrvResult::ClientLibrary
        );
        assert_eq!(
            DrvResult::from(&DriverError::unknown_encoding("KOI9")),
            DrvResult::UnknownEncoding
        );
        assert_eq!(
            DrvResult::from(&DriverError::ReentrantInitialization),
            DrvResult::Error
        );
    }

    #[test]
    fn report_sets_last_error() {
        clear_last_error();
        let code = report(&DriverError::AlreadyInitialized);
        assert_eq!(code, DrvResult::AlreadyInitialized);

        let ptr = drv_get_last_error();
        assert!(!ptr.is_null());
        // Safety: we just set it
        let msg = unsafe { std::ffi::CStr::from_ptr(ptr) };
        assert_eq!(
            msg.to_str().unwrap(),
            "client library has already been initialized"
        );

        drv_clear_error();
        assert!(drv_get_last_error().is_null());
    }
}
