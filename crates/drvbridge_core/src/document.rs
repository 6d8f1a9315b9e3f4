//! Document-store (SODA) document arguments.
//!
//! Document handles belong to the client library and are reference
//! counted by it. Every reference taken here is owned by exactly one
//! [`SodaDocument`], which gives it back when dropped.

use crate::buffer::Buffer;
use crate::encoding::WIRE_ENCODING;
use crate::error::{DriverError, DriverResult, ErrorInfo};
use crate::json::Serializer;
use crate::value::Value;
use tracing::{debug, warn};

/// Message used when a document argument has the wrong shape.
pub const DOCUMENT_ARG_EXPECTED: &str = "value must be a SODA document or a dictionary or list";

/// A reference-counted document handle owned by the client library.
///
/// Both operations cross into the library and may fail.
pub trait DocumentHandle: Clone {
    /// Takes an additional reference on the handle.
    fn add_ref(&self) -> Result<(), ErrorInfo>;

    /// Gives back one reference on the handle.
    fn release(&self) -> Result<(), ErrorInfo>;
}

/// Flags passed to document-store operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SodaFlags(u32);

impl SodaFlags {
    /// No flags.
    pub const DEFAULT: SodaFlags = SodaFlags(0);
    /// Commit the operation immediately.
    pub const ATOMIC_COMMIT: SodaFlags = SodaFlags(0x0001);

    /// Returns the raw flag bits.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns true if all flags in `other` are set.
    pub const fn contains(self, other: SodaFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for SodaFlags {
    type Output = SodaFlags;

    fn bitor(self, rhs: SodaFlags) -> SodaFlags {
        SodaFlags(self.0 | rhs.0)
    }
}

/// A document-store database in the client library.
pub trait SodaDatabase {
    /// Handle type of the documents this database creates.
    type Handle: DocumentHandle;

    /// Creates a new document. The returned handle carries one reference.
    fn create_document(
        &self,
        key: Option<&[u8]>,
        content: &[u8],
        media_type: Option<&str>,
        flags: SodaFlags,
    ) -> Result<Self::Handle, ErrorInfo>;
}

/// A document that owns one reference on its handle.
#[derive(Debug)]
pub struct SodaDocument<H: DocumentHandle> {
    handle: H,
    released: bool,
}

impl<H: DocumentHandle> SodaDocument<H> {
    /// Wraps a handle, taking ownership of one existing reference.
    pub fn from_handle(handle: H) -> Self {
        Self {
            handle,
            released: false,
        }
    }

    /// The underlying handle.
    pub fn handle(&self) -> &H {
        &self.handle
    }

    /// Takes a new reference on the same handle.
    pub fn try_clone(&self) -> DriverResult<Self> {
        self.handle
            .add_ref()
            .map_err(|info| DriverError::reference_operation("add_ref", info))?;
        Ok(Self::from_handle(self.handle.clone()))
    }

    /// Releases the reference, reporting a failure instead of logging it.
    pub fn close(mut self) -> DriverResult<()> {
        self.released = true;
        self.handle
            .release()
            .map_err(|info| DriverError::reference_operation("release", info))
    }
}

impl<H: DocumentHandle> Drop for SodaDocument<H> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(info) = self.handle.release() {
            warn!(error = %info, "failed to release document handle");
        }
    }
}

/// An argument accepted where a document is expected.
#[derive(Debug)]
pub enum DocumentArg<'a, H: DocumentHandle> {
    /// An existing document.
    Document(&'a SodaDocument<H>),
    /// Any other value.
    Value(&'a Value),
}

impl<'a, H: DocumentHandle> From<&'a SodaDocument<H>> for DocumentArg<'a, H> {
    fn from(doc: &'a SodaDocument<H>) -> Self {
        DocumentArg::Document(doc)
    }
}

impl<'a, H: DocumentHandle> From<&'a Value> for DocumentArg<'a, H> {
    fn from(value: &'a Value) -> Self {
        DocumentArg::Value(value)
    }
}

/// Shape of a document argument, decided once up front.
enum DocumentSource<'a, H: DocumentHandle> {
    Existing(&'a SodaDocument<H>),
    Content(&'a Value),
    Invalid(&'a Value),
}

impl<'a, H: DocumentHandle> DocumentSource<'a, H> {
    fn classify(arg: DocumentArg<'a, H>) -> Self {
        match arg {
            DocumentArg::Document(doc) => DocumentSource::Existing(doc),
            DocumentArg::Value(value) if value.is_structured() => DocumentSource::Content(value),
            DocumentArg::Value(value) => DocumentSource::Invalid(value),
        }
    }
}

/// Resolves a document argument into a document owning its own reference.
///
/// An existing document gets a new reference on its handle; the caller's
/// document stays valid. A map or list is serialized and a new document is
/// created from it with no key and no media type.
pub fn resolve_document_arg<'a, D: SodaDatabase>(
    db: &D,
    arg: impl Into<DocumentArg<'a, D::Handle>>,
    serializer: &dyn Serializer,
) -> DriverResult<SodaDocument<D::Handle>>
where
    D::Handle: 'a,
{
    match DocumentSource::classify(arg.into()) {
        DocumentSource::Existing(doc) => doc.try_clone(),
        DocumentSource::Content(value) => {
            let buffer = {
                let text = serializer.dump(value)?;
                Buffer::from_text(&text, WIRE_ENCODING)?
            };
            let handle = db
                .create_document(None, buffer.as_bytes(), None, SodaFlags::DEFAULT)
                .map_err(DriverError::ClientLibrary)?;
            debug!(content_len = buffer.len(), "created document from structured value");
            Ok(SodaDocument::from_handle(handle))
        }
        DocumentSource::Invalid(value) => Err(DriverError::type_mismatch(
            DOCUMENT_ARG_EXPECTED,
            &value.value_type(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_combine() {
        let flags = SodaFlags::DEFAULT | SodaFlags::ATOMIC_COMMIT;
        assert!(flags.contains(SodaFlags::ATOMIC_COMMIT));
        assert!(!SodaFlags::DEFAULT.contains(SodaFlags::ATOMIC_COMMIT));
        assert_eq!(SodaFlags::DEFAULT.bits(), 0);
    }
}
