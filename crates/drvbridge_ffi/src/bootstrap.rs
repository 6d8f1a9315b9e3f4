//! Client library bootstrap FFI functions.
//!
//! The process holds a single client context. The host supplies the
//! client library entry points as a [`DrvClientLibrary`] vtable.

use crate::error::{clear_last_error, report, set_last_error, DrvResult};
use crate::types::{DrvClientLibrary, DrvContextParams, DrvErrorInfo, DrvVersionInfo};
use drvbridge_core::{ClientBootstrap, ClientLibrary, ContextParams, ErrorInfo, VersionInfo};
use std::ffi::{c_char, c_void, CString};
use std::path::Path;
use tracing::debug;

/// A context pointer returned by the host's client library.
#[derive(Debug)]
pub struct RawContext(*mut c_void);

// The client library context is usable from any thread.
unsafe impl Send for RawContext {}
unsafe impl Sync for RawContext {}

static CLIENT: ClientBootstrap<RawContext> = ClientBootstrap::new();

fn missing_entry_point(name: &str) -> ErrorInfo {
    ErrorInfo::new(-1, format!("client library entry point '{name}' is not set"))
        .with_fn_name(name)
}

fn c_string(value: Option<&str>) -> Result<Option<CString>, ErrorInfo> {
    value
        .map(|s| {
            CString::new(s).map_err(|_| ErrorInfo::new(-1, "parameter contains a null byte"))
        })
        .transpose()
}

fn path_string(path: Option<&Path>) -> Result<Option<CString>, ErrorInfo> {
    c_string(path.map(|p| p.to_string_lossy()).as_deref())
}

fn as_ptr(value: &Option<CString>) -> *const c_char {
    value.as_ref().map_or(std::ptr::null(), |s| s.as_ptr())
}

/// Adapts the host vtable to the core client library trait.
struct VTableLibrary<'a> {
    vtable: &'a DrvClientLibrary,
}

impl ClientLibrary for VTableLibrary<'_> {
    type Context = RawContext;

    fn create_context(&self, params: &ContextParams) -> Result<RawContext, ErrorInfo> {
        let create = self
            .vtable
            .create_context
            .ok_or_else(|| missing_entry_point("create_context"))?;

        let driver_name = c_string(params.default_driver_name.as_deref())?;
        let encoding = c_string(params.default_encoding.as_deref())?;
        let error_url = c_string(params.load_error_url.as_deref())?;
        let lib_dir = path_string(params.lib_dir.as_deref())?;
        let config_dir = path_string(params.config_dir.as_deref())?;
        let raw_params = DrvContextParams {
            default_driver_name: as_ptr(&driver_name),
            default_encoding: as_ptr(&encoding),
            load_error_url: as_ptr(&error_url),
            lib_dir: as_ptr(&lib_dir),
            config_dir: as_ptr(&config_dir),
        };

        let mut context = std::ptr::null_mut();
        let mut error = DrvErrorInfo::default();
        // Safety: the strings behind raw_params outlive the call
        let status =
            unsafe { create(self.vtable.user_data, &raw_params, &mut context, &mut error) };
        if status < 0 {
            // Safety: the callback filled in error with strings valid until it returns
            return Err(unsafe { error.to_error_info() });
        }
        Ok(RawContext(context))
    }

    fn client_version(&self, context: &RawContext) -> Result<VersionInfo, ErrorInfo> {
        let get_version = self
            .vtable
            .get_client_version
            .ok_or_else(|| missing_entry_point("get_client_version"))?;

        let mut version = DrvVersionInfo::default();
        let mut error = DrvErrorInfo::default();
        // Safety: context was produced by create_context of the same vtable
        let status =
            unsafe { get_version(self.vtable.user_data, context.0, &mut version, &mut error) };
        if status < 0 {
            // Safety: see create_context
            return Err(unsafe { error.to_error_info() });
        }
        Ok(version.into())
    }

    fn destroy_context(&self, context: RawContext) {
        if let Some(destroy) = self.vtable.destroy_context {
            // Safety: context was produced by create_context of the same vtable
            unsafe { destroy(self.vtable.user_data, context.0) };
        }
    }
}

/// Initializes the client library for this process.
///
/// The first successful call creates the client context. Later calls with
/// null `params` do nothing; later calls with parameters fail with
/// `DrvResult::AlreadyInitialized`.
///
/// # Arguments
///
/// * `library` - Client library entry points
/// * `params` - Context parameters, or null for defaults
///
/// # Safety
///
/// - `library` must be a valid pointer whose callbacks honor their contracts
/// - `params` must be null or valid, with every string field null or
///   null-terminated
/// - the callbacks run while the client slot is locked; from the calling
///   thread, `drv_is_initialized` reports false, `drv_client_version`
///   reports `DrvResult::NotInitialized` and a nested `drv_initialize`
///   fails with `DrvResult::Error`. Callbacks must not wait on another
///   thread that calls into the bootstrap API.
#[no_mangle]
pub unsafe extern "C" fn drv_initialize(
    library: *const DrvClientLibrary,
    params: *const DrvContextParams,
) -> DrvResult {
    clear_last_error();

    if library.is_null() {
        set_last_error("null pointer argument");
        return DrvResult::NullPointer;
    }

    let params = if params.is_null() {
        None
    } else {
        match (*params).to_params() {
            Ok(p) => Some(p),
            Err(msg) => {
                set_last_error(msg);
                return DrvResult::InvalidArgument;
            }
        }
    };

    let library = VTableLibrary { vtable: &*library };
    match CLIENT.initialize(&library, params.as_ref()) {
        Ok(()) => {
            debug!("client bootstrap completed");
            DrvResult::Ok
        }
        Err(e) => report(&e),
    }
}

/// Returns true once the client library has been initialized.
#[no_mangle]
pub extern "C" fn drv_is_initialized() -> bool {
    CLIENT.is_initialized()
}

/// Gets the client library version.
///
/// # Safety
///
/// `out_version` must be a valid pointer.
#[no_mangle]
pub unsafe extern "C" fn drv_client_version(out_version: *mut DrvVersionInfo) -> DrvResult {
    clear_last_error();

    if out_version.is_null() {
        set_last_error("null pointer argument");
        return DrvResult::NullPointer;
    }

    match CLIENT.client_version() {
        Some(version) => {
            *out_version = version.into();
            DrvResult::Ok
        }
        None => {
            set_last_error("client library has not been initialized");
            DrvResult::NotInitialized
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::c_int;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct HostState {
        created: AtomicUsize,
        destroyed: AtomicUsize,
        fail_versions: AtomicUsize,
    }

    unsafe extern "C" fn host_create(
        user_data: *mut c_void,
        params: *const DrvContextParams,
        out_context: *mut *mut c_void,
        out_error: *mut DrvErrorInfo,
    ) -> c_int {
        let state = &*(user_data as *const HostState);
        let params = (*params).to_params().unwrap();
        if params.default_encoding.as_deref() != Some("UTF-8") {
            (*out_error).message = c"encoding not forced".as_ptr();
            return -1;
        }
        state.created.fetch_add(1, Ordering::SeqCst);
        *out_context = user_data;
        0
    }

    unsafe extern "C" fn host_version(
        user_data: *mut c_void,
        _context: *mut c_void,
        out_version: *mut DrvVersionInfo,
        out_error: *mut DrvErrorInfo,
    ) -> c_int {
        let state = &*(user_data as *const HostState);
        let pending = state.fail_versions.load(Ordering::SeqCst);
        if pending > 0 {
            state.fail_versions.store(pending - 1, Ordering::SeqCst);
            (*out_error).code = 1010;
            (*out_error).message = c"DPI-1010: not connected".as_ptr();
            return -1;
        }
        *out_version = VersionInfo::new(19, 3, 0, 0, 0).into();
        0
    }

    unsafe extern "C" fn host_destroy(user_data: *mut c_void, _context: *mut c_void) {
        let state = &*(user_data as *const HostState);
        state.destroyed.fetch_add(1, Ordering::SeqCst);
    }

    // The client slot is process-wide, so the whole lifecycle runs in one test.
    #[test]
    fn initialize_lifecycle() {
        let state: &'static HostState = Box::leak(Box::default());
        state.fail_versions.store(1, Ordering::SeqCst);
        let library = DrvClientLibrary {
            user_data: state as *const HostState as *mut c_void,
            create_context: Some(host_create),
            get_client_version: Some(host_version),
            destroy_context: Some(host_destroy),
        };
        let mut version = DrvVersionInfo::default();

        unsafe {
            assert_eq!(drv_client_version(&mut version), DrvResult::NotInitialized);

            // version query fails: context destroyed, slot stays empty
            let result = drv_initialize(&library, std::ptr::null());
            assert_eq!(result, DrvResult::ClientLibrary);
            let msg = std::ffi::CStr::from_ptr(crate::error::drv_get_last_error());
            assert_eq!(msg.to_str().unwrap(), "DPI-1010: not connected");
            assert!(!drv_is_initialized());
            assert_eq!(state.destroyed.load(Ordering::SeqCst), 1);

            // retry succeeds
            let params = DrvContextParams {
                default_driver_name: c"ffi-test".as_ptr(),
                ..DrvContextParams::default()
            };
            assert_eq!(drv_initialize(&library, &params), DrvResult::Ok);
            assert!(drv_is_initialized());
            assert_eq!(state.created.load(Ordering::SeqCst), 2);

            assert_eq!(drv_client_version(&mut version), DrvResult::Ok);
            assert_eq!(version.version, 19);
            assert_eq!(version.full_version_num, 1_903_000_000);

            // implicit initialization is a no-op
            assert_eq!(drv_initialize(&library, std::ptr::null()), DrvResult::Ok);
            assert_eq!(state.created.load(Ordering::SeqCst), 2);

            // changing parameters afterwards is refused
            assert_eq!(
                drv_initialize(&library, &params),
                DrvResult::AlreadyInitialized
            );
            assert_eq!(state.created.load(Ordering::SeqCst), 2);
        }
    }

    #[test]
    fn null_library_is_rejected() {
        // Safety: exercising the null check
        let result = unsafe { drv_initialize(std::ptr::null(), std::ptr::null()) };
        assert_eq!(result, DrvResult::NullPointer);
    }

    #[test]
    fn missing_entry_point_is_reported() {
        let vtable = DrvClientLibrary {
            user_data: std::ptr::null_mut(),
            create_context: None,
            get_client_version: None,
            destroy_context: None,
        };
        let library = VTableLibrary { vtable: &vtable };
        let err = library.create_context(&ContextParams::new()).unwrap_err();
        assert_eq!(err.fn_name, "create_context");
    }
}
