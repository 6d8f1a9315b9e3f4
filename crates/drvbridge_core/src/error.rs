//! Error types for drvbridge.

use std::fmt;
use thiserror::Error;

/// Result type for bridge operations.
pub type DriverResult<T> = Result<T, DriverError>;

/// Structured error information reported by the client library.
///
/// This is the payload of every failed client library call. It is carried
/// verbatim inside [`DriverError::ClientLibrary`] and
/// [`DriverError::ReferenceOperation`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorInfo {
    /// Library error code (e.g. `1017`).
    pub code: i32,
    /// Parse offset, when the error relates to a statement.
    pub offset: u32,
    /// Human readable message.
    pub message: String,
    /// Name of the library function that failed.
    pub fn_name: String,
    /// Internal action that was being performed.
    pub action: String,
    /// SQL state code.
    pub sql_state: String,
    /// Whether the operation may succeed if retried.
    pub is_recoverable: bool,
}

impl ErrorInfo {
    /// Creates error info with just a code and a message.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            ..Self::default()
        }
    }

    /// Sets the name of the failing library function.
    #[must_use]
    pub fn with_fn_name(mut self, fn_name: impl Into<String>) -> Self {
        self.fn_name = fn_name.into();
        self
    }

    /// Sets the action being performed when the error occurred.
    #[must_use]
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if !self.fn_name.is_empty() {
            write!(f, " (in {}", self.fn_name)?;
            if !self.action.is_empty() {
                write!(f, ": {}", self.action)?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}

/// Errors that can occur while shaping arguments or bootstrapping the client.
#[derive(Debug, Error)]
pub enum DriverError {
    /// The value does not have an accepted shape.
    #[error("{expected}, got {actual}")]
    TypeMismatch {
        /// Description of the accepted shapes.
        expected: String,
        /// Qualified name of the value's actual type.
        actual: String,
    },

    /// Text cannot be represented in the requested encoding.
    #[error("'{encoding}' codec can't encode character {character:?} in position {position}")]
    Encoding {
        /// Name of the target encoding.
        encoding: String,
        /// The character that failed to encode.
        character: char,
        /// Character index of the failure.
        position: usize,
    },

    /// The encoding name is not known.
    #[error("unknown encoding: {name}")]
    UnknownEncoding {
        /// The requested encoding name.
        name: String,
    },

    /// Bootstrap was called with parameters after the client was initialized.
    #[error("client library has already been initialized")]
    AlreadyInitialized,

    /// Bootstrap was called from a client library callback during initialization.
    #[error("client library initialization re-entered from a library callback")]
    ReentrantInitialization,

    /// A client library call failed.
    #[error("{0}")]
    ClientLibrary(ErrorInfo),

    /// A reference or handle operation failed in the client library.
    #[error("{operation} failed: {info}")]
    ReferenceOperation {
        /// The operation that failed (e.g. `add_ref`).
        operation: &'static str,
        /// Error reported by the library.
        info: ErrorInfo,
    },

    /// The structured value serializer failed.
    #[error("serialization failed: {message}")]
    Serialization {
        /// Description of the failure.
        message: String,
    },

    /// Evaluating the truth value of an argument failed.
    #[error("truth value evaluation failed: {message}")]
    Truthiness {
        /// Description of the failure.
        message: String,
    },
}

impl DriverError {
    /// Creates a type mismatch error naming the actual type of the value.
    ///
    /// The actual type is formatted as `module.name`. If the descriptor
    /// cannot report its identity the type is shown as `<unknown>`.
    pub fn type_mismatch(
        expected: impl Into<String>,
        actual: &dyn crate::utils::TypeDescriptor,
    ) -> Self {
        let actual = match crate::utils::module_and_name(actual) {
            Ok((module, name)) => format!("{module}.{name}"),
            Err(_) => "<unknown>".to_string(),
        };
        Self::TypeMismatch {
            expected: expected.into(),
            actual,
        }
    }

    /// Creates an unknown encoding error.
    pub fn unknown_encoding(name: impl Into<String>) -> Self {
        Self::UnknownEncoding { name: name.into() }
    }

    /// Creates a reference operation error.
    pub fn reference_operation(operation: &'static str, info: ErrorInfo) -> Self {
        Self::ReferenceOperation { operation, info }
    }

    /// Creates a serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Creates a truthiness error.
    pub fn truthiness(message: impl Into<String>) -> Self {
        Self::Truthiness {
            message: message.into(),
        }
    }

    /// Returns the client library error info, if this error carries one.
    pub fn error_info(&self) -> Option<&ErrorInfo> {
        match self {
            Self::ClientLibrary(info) | Self::ReferenceOperation { info, .. } => Some(info),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for DriverError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

impl From<ErrorInfo> for DriverError {
    fn from(info: ErrorInfo) -> Self {
        Self::ClientLibrary(info)
    }
}
