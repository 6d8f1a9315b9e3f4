//! # drvbridge testkit
//!
//! Test utilities for drvbridge.
//!
//! This crate provides:
//! - An in-memory client library for bootstrap tests
//! - An in-memory document-store database with reference-counted handles
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust
//! use drvbridge_core::ClientBootstrap;
//! use drvbridge_testkit::prelude::*;
//!
//! let library = FakeClientLibrary::new();
//! let bootstrap = ClientBootstrap::new();
//! bootstrap.initialize(&library, None).unwrap();
//! assert_eq!(library.contexts_created(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod generators;
pub mod soda;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::client::*;
    pub use crate::generators::*;
    pub use crate::soda::*;
}

pub use client::*;
pub use generators::*;
pub use soda::*;
