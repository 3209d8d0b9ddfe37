//! Error types for loading, validating and writing TOML documents.
//!
//! Every failure in this crate is reported through a single [`Error`] enum.
//! Nothing is caught and suppressed internally: each error reaches the
//! immediate caller of the operation that raised it.
//!
//! ## Error Categories
//!
//! - **Syntax Errors**: malformed TOML text, with line/column information
//! - **Type Errors**: a field or element does not have the declared type
//!   ([`Error::InvalidType`], [`Error::InvalidValueType`])
//! - **Bad Config**: semantic misconfiguration raised by concrete schemas,
//!   optionally pointing at documentation
//! - **Cyclic Structures**: the encoder met a node that contains itself
//! - **I/O Errors**: missing files and other read/write failures
//!
//! ## Examples
//!
//! ```rust
//! use typed_toml::{loads, Error, TomlDecoder};
//!
//! let result = loads("name = ", &TomlDecoder::new());
//! assert!(matches!(result, Err(Error::Syntax { line: 1, .. })));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors raised by this crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The backing file does not exist.
    #[error("No such file or directory: '{path}'")]
    FileNotFound { path: String },

    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Malformed TOML text
    #[error("Syntax error at line {line}, column {col}: {msg}")]
    Syntax { line: usize, col: usize, msg: String },

    /// A value does not have the type a schema declared for it.
    #[error("Invalid type for '{path}': expected {expected}, got {found}")]
    InvalidType {
        path: String,
        expected: String,
        found: String,
    },

    /// A value reached through a table key does not have the declared type.
    #[error("Invalid value type for '{path}': expected {expected}, got {found}")]
    InvalidValueType {
        path: String,
        expected: String,
        found: String,
    },

    /// Semantic misconfiguration, e.g. mutually exclusive keys.
    #[error("{message}")]
    BadConfig {
        message: String,
        documentation: Option<String>,
    },

    /// A table or array contains itself.
    #[error("Circular reference detected at '{path}'")]
    CyclicStructure { path: String },

    /// Array separator that would not produce valid TOML
    #[error("Invalid separator for arrays: {0:?}")]
    InvalidSeparator(String),

    /// Value that cannot be represented in TOML
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// A `None` where TOML needs a value. Table entries holding `None` are skipped instead.
    #[error("Unsupported None value")]
    UnsupportedNone,

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a syntax error with line and column information.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use typed_toml::Error;
    ///
    /// let err = Error::syntax(10, 5, "expected `=`");
    /// assert!(err.to_string().contains("line 10"));
    /// ```
    pub fn syntax(line: usize, col: usize, msg: &str) -> Self {
        Error::Syntax {
            line,
            col,
            msg: msg.to_string(),
        }
    }

    /// Creates a bad-config error without a documentation pointer.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use typed_toml::Error;
    ///
    /// let err = Error::bad_config("'version' and 'dynamic' are mutually exclusive");
    /// assert_eq!(err.documentation(), None);
    /// ```
    pub fn bad_config<T: fmt::Display>(message: T) -> Self {
        Error::BadConfig {
            message: message.to_string(),
            documentation: None,
        }
    }

    /// Creates a bad-config error pointing the user at some documentation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use typed_toml::Error;
    ///
    /// let err = Error::bad_config_with_docs("Hello World", "This is the documentation");
    /// assert_eq!(err.to_string(), "Hello World");
    /// assert_eq!(err.documentation(), Some("This is the documentation"));
    /// ```
    pub fn bad_config_with_docs<T: fmt::Display, D: Into<String>>(
        message: T,
        documentation: D,
    ) -> Self {
        Error::BadConfig {
            message: message.to_string(),
            documentation: Some(documentation.into()),
        }
    }

    /// Creates a cyclic-structure error for the node at `path`.
    pub fn cyclic(path: &str) -> Self {
        Error::CyclicStructure {
            path: path.to_string(),
        }
    }

    /// Creates an unsupported type error for values that cannot be written as TOML.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for file reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// The documentation pointer attached to a [`Error::BadConfig`], if any.
    #[must_use]
    pub fn documentation(&self) -> Option<&str> {
        match self {
            Error::BadConfig { documentation, .. } => documentation.as_deref(),
            _ => None,
        }
    }

    /// Returns `true` for field-level type errors.
    #[must_use]
    pub const fn is_type_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidType { .. } | Error::InvalidValueType { .. }
        )
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
