//! # drvbridge FFI
//!
//! Stable C ABI for drvbridge.
//!
//! This crate provides:
//! - C-compatible function exports
//! - Memory ownership conventions
//! - Error code mapping
//! - Buffer management
//! - Client library bootstrap through a caller-supplied vtable

#![warn(missing_docs)]

pub mod bootstrap;
pub mod buffer;
pub mod encoding;
pub mod error;
pub mod types;

pub use bootstrap::{drv_client_version, drv_initialize, drv_is_initialized};
pub use buffer::{drv_free_buffer, DrvBuffer};
pub use encoding::{drv_buffer_from_text, drv_resolve_encoding};
pub use error::{drv_clear_error, drv_get_last_error, DrvResult};
pub use types::{DrvClientLibrary, DrvContextParams, DrvErrorInfo, DrvVersionInfo};
