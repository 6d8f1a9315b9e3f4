//! In-memory document-store database.

use drvbridge_core::{DocumentHandle, ErrorInfo, SodaDatabase, SodaFlags};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug)]
struct HandleState {
    refs: AtomicI64,
    fail_add_ref: AtomicBool,
    fail_release: AtomicBool,
}

/// A document handle with a shared, observable reference count.
///
/// Clones refer to the same document; equality compares document ids.
#[derive(Debug, Clone)]
pub struct FakeDocHandle {
    id: u64,
    state: Arc<HandleState>,
}

impl FakeDocHandle {
    /// Creates a handle carrying one reference.
    pub fn new(id: u64) -> Self {
        Self {
            id,
            state: Arc::new(HandleState {
                refs: AtomicI64::new(1),
                fail_add_ref: AtomicBool::new(false),
                fail_release: AtomicBool::new(false),
            }),
        }
    }

    /// Document id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Current reference count.
    pub fn ref_count(&self) -> i64 {
        self.state.refs.load(Ordering::SeqCst)
    }

    /// Makes every following `add_ref` fail.
    pub fn fail_add_ref(&self, fail: bool) {
        self.state.fail_add_ref.store(fail, Ordering::SeqCst);
    }

    /// Makes every following `release` fail.
    pub fn fail_release(&self, fail: bool) {
        self.state.fail_release.store(fail, Ordering::SeqCst);
    }
}

impl PartialEq for FakeDocHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for FakeDocHandle {}

impl DocumentHandle for FakeDocHandle {
    fn add_ref(&self) -> Result<(), ErrorInfo> {
        if self.state.fail_add_ref.load(Ordering::SeqCst) {
            return Err(ErrorInfo::new(1002, "DPI-1002: invalid dpiSodaDoc handle")
                .with_fn_name("dpiSodaDoc_addRef"));
        }
        self.state.refs.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn release(&self) -> Result<(), ErrorInfo> {
        if self.state.fail_release.load(Ordering::SeqCst) {
            return Err(ErrorInfo::new(1002, "DPI-1002: invalid dpiSodaDoc handle")
                .with_fn_name("dpiSodaDoc_release"));
        }
        self.state.refs.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Arguments of one `create_document` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedDocument {
    /// Document key.
    pub key: Option<Vec<u8>>,
    /// Document content.
    pub content: Vec<u8>,
    /// Media type.
    pub media_type: Option<String>,
    /// Flags.
    pub flags: SodaFlags,
    /// Handle returned to the caller.
    pub handle: FakeDocHandle,
}

/// Document-store database that records every created document.
#[derive(Debug, Default)]
pub struct FakeSodaDatabase {
    next_id: AtomicU64,
    created: Mutex<Vec<CreatedDocument>>,
    create_failure: Mutex<Option<ErrorInfo>>,
}

impl FakeSodaDatabase {
    /// Creates an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next document creation fail with `info`.
    pub fn fail_next_create(&self, info: ErrorInfo) {
        *self.create_failure.lock() = Some(info);
    }

    /// Documents created so far.
    pub fn created(&self) -> Vec<CreatedDocument> {
        self.created.lock().clone()
    }
}

impl SodaDatabase for FakeSodaDatabase {
    type Handle = FakeDocHandle;

    fn create_document(
        &self,
        key: Option<&[u8]>,
        content: &[u8],
        media_type: Option<&str>,
        flags: SodaFlags,
    ) -> Result<FakeDocHandle, ErrorInfo> {
        if let Some(info) = self.create_failure.lock().take() {
            return Err(info);
        }
        let handle = FakeDocHandle::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.created.lock().push(CreatedDocument {
            key: key.map(<[u8]>::to_vec),
            content: content.to_vec(),
            media_type: media_type.map(str::to_string),
            flags,
            handle: handle.clone(),
        });
        Ok(handle)
    }
}
