//! Type definitions for FFI.

use drvbridge_core::{ContextParams, ErrorInfo, VersionInfo};
use std::ffi::{c_char, c_int, c_void, CStr};
use std::path::PathBuf;

/// Parameters for creating the client library context.
///
/// Every field is a nullable, null-terminated UTF-8 string.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct DrvContextParams {
    /// Driver name reported to the database.
    pub default_driver_name: *const c_char,
    /// Default text encoding. Always forced to "UTF-8".
    pub default_encoding: *const c_char,
    /// URL shown when the client library cannot be loaded.
    pub load_error_url: *const c_char,
    /// Directory to load the client library from.
    pub lib_dir: *const c_char,
    /// Directory holding client configuration files.
    pub config_dir: *const c_char,
}

impl Default for DrvContextParams {
    fn default() -> Self {
        Self {
            default_driver_name: std::ptr::null(),
            default_encoding: std::ptr::null(),
            load_error_url: std::ptr::null(),
            lib_dir: std::ptr::null(),
            config_dir: std::ptr::null(),
        }
    }
}

/// Reads a nullable C string.
///
/// # Safety
///
/// `ptr` must be null or point to a valid null-terminated string.
pub(crate) unsafe fn opt_str(ptr: *const c_char) -> Result<Option<String>, &'static str> {
    if ptr.is_null() {
        return Ok(None);
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map(|s| Some(s.to_string()))
        .map_err(|_| "invalid UTF-8 in string argument")
}

impl DrvContextParams {
    /// Copies the parameters into owned Rust values.
    ///
    /// # Safety
    ///
    /// Every non-null field must point to a valid null-terminated string.
    pub unsafe fn to_params(&self) -> Result<ContextParams, &'static str> {
        Ok(ContextParams {
            default_driver_name: opt_str(self.default_driver_name)?,
            default_encoding: opt_str(self.default_encoding)?,
            load_error_url: opt_str(self.load_error_url)?,
            lib_dir: opt_str(self.lib_dir)?.map(PathBuf::from),
            config_dir: opt_str(self.config_dir)?.map(PathBuf::from),
        })
    }
}

/// Error reported by a client library callback.
///
/// String fields are owned by the library and only read during the call
/// that produced them.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct DrvErrorInfo {
    /// Library error code.
    pub code: i32,
    /// Parse offset.
    pub offset: u32,
    /// Message (nullable).
    pub message: *const c_char,
    /// Failing function name (nullable).
    pub fn_name: *const c_char,
    /// Action being performed (nullable).
    pub action: *const c_char,
    /// SQL state (nullable).
    pub sql_state: *const c_char,
    /// Whether a retry may succeed.
    pub is_recoverable: bool,
}

impl Default for DrvErrorInfo {
    fn default() -> Self {
        Self {
            code: 0,
            offset: 0,
            message: std::ptr::null(),
            fn_name: std::ptr::null(),
            action: std::ptr::null(),
            sql_state: std::ptr::null(),
            is_recoverable: false,
        }
    }
}

impl DrvErrorInfo {
    /// Copies the error into an owned [`ErrorInfo`].
    ///
    /// # Safety
    ///
    /// Every non-null field must point to a valid null-terminated string.
    pub unsafe fn to_error_info(&self) -> ErrorInfo {
        let text = |ptr: *const c_char| {
            if ptr.is_null() {
                String::new()
            } else {
                CStr::from_ptr(ptr).to_string_lossy().into_owned()
            }
        };
        ErrorInfo {
            code: self.code,
            offset: self.offset,
            message: text(self.message),
            fn_name: text(self.fn_name),
            action: text(self.action),
            sql_state: text(self.sql_state),
            is_recoverable: self.is_recoverable,
        }
    }
}

/// Client library version.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrvVersionInfo {
    /// Major version.
    pub version: u32,
    /// Release number.
    pub release: u32,
    /// Update number.
    pub update: u32,
    /// Port-specific release number.
    pub port_release: u32,
    /// Port-specific update number.
    pub port_update: u32,
    /// All components combined, two decimal digits each.
    pub full_version_num: u64,
}

impl From<VersionInfo> for DrvVersionInfo {
    fn from(v: VersionInfo) -> Self {
        Self {
            version: v.version,
            release: v.release,
            update: v.update,
            port_release: v.port_release,
            port_update: v.port_update,
            full_version_num: v.full_version_num(),
        }
    }
}

impl From<DrvVersionInfo> for VersionInfo {
    fn from(v: DrvVersionInfo) -> Self {
        VersionInfo::new(
            v.version,
            v.release,
            v.update,
            v.port_release,
            v.port_update,
        )
    }
}

/// Creates a client library context. Returns 0 on success, negative on failure.
pub type CreateContextFn = unsafe extern "C" fn(
    user_data: *mut c_void,
    params: *const DrvContextParams,
    out_context: *mut *mut c_void,
    out_error: *mut DrvErrorInfo,
) -> c_int;

/// Gets the client version for a context. Returns 0 on success, negative on failure.
pub type GetClientVersionFn = unsafe extern "C" fn(
    user_data: *mut c_void,
    context: *mut c_void,
    out_version: *mut DrvVersionInfo,
    out_error: *mut DrvErrorInfo,
) -> c_int;

/// Destroys a client library context.
pub type DestroyContextFn = unsafe extern "C" fn(user_data: *mut c_void, context: *mut c_void);

/// Client library entry points supplied by the host.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct DrvClientLibrary {
    /// Opaque pointer passed back to every callback.
    pub user_data: *mut c_void,
    /// Context creation.
    pub create_context: Option<CreateContextFn>,
    /// Version query.
    pub get_client_version: Option<GetClientVersionFn>,
    /// Context destruction.
    pub destroy_context: Option<DestroyContextFn>,
}
