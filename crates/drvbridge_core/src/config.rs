//! Client library initialization parameters.

use crate::encoding::WIRE_ENCODING;
use std::path::PathBuf;

/// Driver name reported to the database when the caller does not set one.
pub const DEFAULT_DRIVER_NAME: &str = concat!("drvbridge : ", env!("CARGO_PKG_VERSION"));

/// Help URL included in library load errors when the caller does not set one.
pub const DEFAULT_LOAD_ERROR_URL: &str =
    "https://docs.rs/drvbridge_core/latest/drvbridge_core/#installation";

/// Parameters used to create the client library context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextParams {
    /// Driver name reported to the database.
    pub default_driver_name: Option<String>,

    /// Encoding used for text when none is given. Always "UTF-8" once
    /// the parameters are made effective.
    pub default_encoding: Option<String>,

    /// URL shown in the error raised when the library cannot be loaded.
    pub load_error_url: Option<String>,

    /// Directory to load the client library from.
    pub lib_dir: Option<PathBuf>,

    /// Directory holding client configuration files.
    pub config_dir: Option<PathBuf>,
}

impl ContextParams {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the driver name.
    #[must_use]
    pub fn with_driver_name(mut self, name: impl Into<String>) -> Self {
        self.default_driver_name = Some(name.into());
        self
    }

    /// Sets the load error URL.
    #[must_use]
    pub fn with_load_error_url(mut self, url: impl Into<String>) -> Self {
        self.load_error_url = Some(url.into());
        self
    }

    /// Sets the client library directory.
    #[must_use]
    pub fn with_lib_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.lib_dir = Some(dir.into());
        self
    }

    /// Sets the client configuration directory.
    #[must_use]
    pub fn with_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = Some(dir.into());
        self
    }

    /// Returns the parameters actually passed to the client library.
    ///
    /// Starts from `params` (or defaults), forces the encoding to UTF-8 and
    /// fills the driver name and load error URL only when they are unset.
    pub fn effective(params: Option<&ContextParams>) -> ContextParams {
        let mut effective = params.cloned().unwrap_or_default();
        effective.default_encoding = Some(WIRE_ENCODING.to_string());
        effective
            .default_driver_name
            .get_or_insert_with(|| DEFAULT_DRIVER_NAME.to_string());
        effective
            .load_error_url
            .get_or_insert_with(|| DEFAULT_LOAD_ERROR_URL.to_string());
        effective
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_filled() {
        let params = ContextParams::effective(None);
        assert_eq!(params.default_encoding.as_deref(), Some("UTF-8"));
        assert_eq!(params.default_driver_name.as_deref(), Some(DEFAULT_DRIVER_NAME));
        assert_eq!(params.load_error_url.as_deref(), Some(DEFAULT_LOAD_ERROR_URL));
        assert_eq!(params.lib_dir, None);
    }

    #[test]
    fn caller_values_win() {
        let params = ContextParams::new()
            .with_driver_name("myapp")
            .with_load_error_url("https://example.com/help")
            .with_lib_dir("/opt/client")
            .with_config_dir("/etc/client");
        let effective = ContextParams::effective(Some(&params));
        assert_eq!(effective.default_driver_name.as_deref(), Some("myapp"));
        assert_eq!(
            effective.load_error_url.as_deref(),
            Some("https://example.com/help")
        );
        assert_eq!(effective.lib_dir, Some(PathBuf::from("/opt/client")));
        assert_eq!(effective.config_dir, Some(PathBuf::from("/etc/client")));
    }

    #[test]
    fn encoding_is_always_utf8() {
        let params = ContextParams {
            default_encoding: Some("ISO-8859-1".to_string()),
            ..ContextParams::default()
        };
        let effective = ContextParams::effective(Some(&params));
        assert_eq!(effective.default_encoding.as_deref(), Some("UTF-8"));
    }
}
