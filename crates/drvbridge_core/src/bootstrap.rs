//! One-time initialization of the client library.
//!
//! The client library is initialized lazily, when the first standalone
//! connection or pool is created or the client version is requested,
//! rather than when the driver is loaded. Environment settings that the
//! library reads at startup can therefore still be changed by the
//! application beforehand.

use crate::config::ContextParams;
use crate::error::{DriverError, DriverResult, ErrorInfo};
use parking_lot::{const_mutex, const_rwlock, Mutex, RwLock};
use std::fmt;
use std::thread::{self, ThreadId};
use tracing::{debug, info, warn};

/// Version of the client library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VersionInfo {
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
}

impl VersionInfo {
    /// Creates a version.
    pub const fn new(
        version: u32,
        release: u32,
        update: u32,
        port_release: u32,
        port_update: u32,
    ) -> Self {
        Self {
            version,
            release,
            update,
            port_release,
            port_update,
        }
    }

    /// Combined version number, two decimal digits per component.
    pub fn full_version_num(&self) -> u64 {
        u64::from(self.version) * 100_000_000
            + u64::from(self.release) * 1_000_000
            + u64::from(self.update) * 10_000
            + u64::from(self.port_release) * 100
            + u64::from(self.port_update)
    }
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}.{}",
            self.version, self.release, self.update, self.port_release, self.port_update
        )
    }
}

/// The client library entry points used during bootstrap.
pub trait ClientLibrary {
    /// Library context type.
    type Context;

    /// Creates a library context.
    fn create_context(&self, params: &ContextParams) -> Result<Self::Context, ErrorInfo>;

    /// Reports the client library version for a context.
    fn client_version(&self, context: &Self::Context) -> Result<VersionInfo, ErrorInfo>;

    /// Destroys a context.
    fn destroy_context(&self, context: Self::Context);
}

struct ClientContext<C> {
    context: C,
    version: VersionInfo,
}

/// Slot holding the process-wide client context.
///
/// The context is created at most once. After that, calls without
/// parameters succeed without doing anything and calls with parameters
/// fail with [`DriverError::AlreadyInitialized`].
///
/// Library callbacks run while the slot is locked. A callback that calls
/// back into the same slot sees it as uninitialized, and a nested
/// [`ClientBootstrap::initialize`] fails with
/// [`DriverError::ReentrantInitialization`].
pub struct ClientBootstrap<C> {
    slot: RwLock<Option<ClientContext<C>>>,
    initializer: Mutex<Option<ThreadId>>,
}

/// Clears the initializing thread when initialization ends.
struct InitializerGuard<'a>(&'a Mutex<Option<ThreadId>>);

impl Drop for InitializerGuard<'_> {
    fn drop(&mut self) {
        *self.0.lock() = None;
    }
}

impl<C> ClientBootstrap<C> {
    /// Creates an empty slot.
    pub const fn new() -> Self {
        Self {
            slot: const_rwlock(None),
            initializer: const_mutex(None),
        }
    }

    fn initializing_here(&self) -> bool {
        *self.initializer.lock() == Some(thread::current().id())
    }

    /// Initializes the client library unless that already happened.
    pub fn initialize<L>(&self, library: &L, params: Option<&ContextParams>) -> DriverResult<()>
    where
        L: ClientLibrary<Context = C>,
    {
        if self.initializing_here() {
            return Err(DriverError::ReentrantInitialization);
        }
        let mut slot = self.slot.write();
        if slot.is_some() {
            return match params {
                None => Ok(()),
                Some(_) => Err(DriverError::AlreadyInitialized),
            };
        }
        *self.initializer.lock() = Some(thread::current().id());
        let _initializer = InitializerGuard(&self.initializer);

        let params = ContextParams::effective(params);
        debug!(
            driver_name = ?params.default_driver_name,
            lib_dir = ?params.lib_dir,
            "initializing client library"
        );
        let context = library
            .create_context(&params)
            .map_err(DriverError::ClientLibrary)?;
        let version = match library.client_version(&context) {
            Ok(version) => version,
            Err(info) => {
                warn!(error = %info, "client version query failed, destroying context");
                library.destroy_context(context);
                return Err(DriverError::ClientLibrary(info));
            }
        };

        info!(%version, "client library initialized");
        *slot = Some(ClientContext { context, version });
        Ok(())
    }

    /// Returns true once a context has been created.
    pub fn is_initialized(&self) -> bool {
        !self.initializing_here() && self.slot.read().is_some()
    }

    /// Returns the client library version captured at initialization.
    pub fn client_version(&self) -> Option<VersionInfo> {
        if self.initializing_here() {
            return None;
        }
        self.slot.read().as_ref().map(|ctx| ctx.version)
    }

    /// Runs `f` against the live context, if there is one.
    pub fn with_context<R>(&self, f: impl FnOnce(&C) -> R) -> Option<R> {
        if self.initializing_here() {
            return None;
        }
        self.slot.read().as_ref().map(|ctx| f(&ctx.context))
    }
}

impl<C> Default for ClientBootstrap<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for ClientBootstrap<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBootstrap")
            .field("version", &self.client_version())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_formatting() {
        let version = VersionInfo::new(19, 8, 0, 0, 0);
        assert_eq!(version.to_string(), "19.8.0.0.0");
        assert_eq!(version.full_version_num(), 1_908_000_000);
    }

    #[test]
    fn empty_slot() {
        let bootstrap: ClientBootstrap<()> = ClientBootstrap::new();
        assert!(!bootstrap.is_initialized());
        assert_eq!(bootstrap.client_version(), None);
        assert_eq!(bootstrap.with_context(|_| 1), None);
    }
}
