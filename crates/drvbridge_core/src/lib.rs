//! # drvbridge core
//!
//! Argument shaping and client bootstrap for a database driver's native
//! interop layer.
//!
//! This crate provides:
//! - Encoding resolution (explicit UTF-16 byte order, never a BOM)
//! - Owned byte buffers built from text or binary values
//! - JSON argument processing for the document store
//! - Document argument resolution with checked reference counting
//! - Process-wide, one-time client library initialization
//!
//! ## Usage
//!
//! ```
//! use drvbridge_core::{normalize_json_arg, JsonSerializer, Value};
//!
//! let value = Value::map([("name", Value::from("Alice"))]);
//! let buffer = normalize_json_arg(&value, &JsonSerializer).unwrap();
//! assert_eq!(buffer.as_bytes(), br#"{"name":"Alice"}"#);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod bootstrap;
mod buffer;
mod config;
mod document;
mod encoding;
mod error;
mod json;
mod utils;
mod value;

pub use bootstrap::{ClientBootstrap, ClientLibrary, VersionInfo};
pub use buffer::Buffer;
pub use config::{ContextParams, DEFAULT_DRIVER_NAME, DEFAULT_LOAD_ERROR_URL};
pub use document::{
    resolve_document_arg, DocumentArg, DocumentHandle, SodaDatabase, SodaDocument, SodaFlags,
    DOCUMENT_ARG_EXPECTED,
};
pub use encoding::{
    resolve_encoding, resolve_encoding_for, ByteOrder, Encoding, UTF16, UTF16_BE, UTF16_LE,
    WIRE_ENCODING,
};
pub use error::{DriverError, DriverResult, ErrorInfo};
pub use json::{normalize_json_arg, JsonSerializer, Serializer};
pub use utils::{
    coerce_bool, module_and_name, RustType, StaticType, Truthy, TypeDescriptor, MODULE_ATTR,
    NAME_ATTR,
};
pub use value::Value;
