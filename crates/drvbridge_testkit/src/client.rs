//! In-memory client library.

use drvbridge_core::{ClientLibrary, ContextParams, ErrorInfo, VersionInfo};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

/// Version reported by [`FakeClientLibrary`] unless overridden.
pub const FAKE_CLIENT_VERSION: VersionInfo = VersionInfo::new(23, 4, 0, 24, 5);

/// A context created by [`FakeClientLibrary`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeContext {
    /// Sequence number of the context within its library.
    pub id: u64,
    /// Parameters the context was created with.
    pub params: ContextParams,
}

/// Client library that keeps all state in memory.
///
/// Failures can be scheduled for context creation and for the version
/// query. Every call is counted.
#[derive(Debug, Default)]
pub struct FakeClientLibrary {
    version: Option<VersionInfo>,
    create_delay: Option<Duration>,
    next_id: AtomicU64,
    created: AtomicUsize,
    destroyed: AtomicUsize,
    version_queries: AtomicUsize,
    create_failure: Mutex<Option<ErrorInfo>>,
    version_failures: Mutex<Vec<ErrorInfo>>,
    last_params: Mutex<Option<ContextParams>>,
}

impl FakeClientLibrary {
    /// Creates a library reporting [`FAKE_CLIENT_VERSION`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports `version` from the version query.
    #[must_use]
    pub fn with_version(mut self, version: VersionInfo) -> Self {
        self.version = Some(version);
        self
    }

    /// Sleeps for `delay` inside context creation, widening race windows.
    #[must_use]
    pub fn with_create_delay(mut self, delay: Duration) -> Self {
        self.create_delay = Some(delay);
        self
    }

    /// Makes the next context creation fail with `info`.
    pub fn fail_next_create(&self, info: ErrorInfo) {
        *self.create_failure.lock() = Some(info);
    }

    /// Makes the next version query fail with `info`.
    pub fn fail_next_version_query(&self, info: ErrorInfo) {
        self.version_failures.lock().push(info);
    }

    /// Number of contexts created.
    pub fn contexts_created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    /// Number of contexts destroyed.
    pub fn contexts_destroyed(&self) -> usize {
        self.destroyed.load(Ordering::SeqCst)
    }

    /// Number of version queries made.
    pub fn version_queries(&self) -> usize {
        self.version_queries.load(Ordering::SeqCst)
    }

    /// Parameters passed to the most recent context creation.
    pub fn last_params(&self) -> Option<ContextParams> {
        self.last_params.lock().clone()
    }
}

impl ClientLibrary for FakeClientLibrary {
    type Context = FakeContext;

    fn create_context(&self, params: &ContextParams) -> Result<FakeContext, ErrorInfo> {
        *self.last_params.lock() = Some(params.clone());
        if let Some(info) = self.create_failure.lock().take() {
            return Err(info);
        }
        if let Some(delay) = self.create_delay {
            thread::sleep(delay);
        }
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(FakeContext {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            params: params.clone(),
        })
    }

    fn client_version(&self, _context: &FakeContext) -> Result<VersionInfo, ErrorInfo> {
        self.version_queries.fetch_add(1, Ordering::SeqCst);
        if let Some(info) = self.version_failures.lock().pop() {
            return Err(info);
        }
        Ok(self.version.unwrap_or(FAKE_CLIENT_VERSION))
    }

    fn destroy_context(&self, _context: FakeContext) {
        self.destroyed.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_calls() {
        let library = FakeClientLibrary::new();
        let ctx = library.create_context(&ContextParams::new()).unwrap();
        assert_eq!(library.client_version(&ctx).unwrap(), FAKE_CLIENT_VERSION);
        library.destroy_context(ctx);
        assert_eq!(library.contexts_created(), 1);
        assert_eq!(library.version_queries(), 1);
        assert_eq!(library.contexts_destroyed(), 1);
    }

    #[test]
    fn scheduled_failures_fire_once() {
        let library = FakeClientLibrary::new();
        library.fail_next_create(ErrorInfo::new(1047, "cannot locate library"));
        assert!(library.create_context(&ContextParams::new()).is_err());
        assert!(library.create_context(&ContextParams::new()).is_ok());
        assert_eq!(library.contexts_created(), 1);
    }
}
