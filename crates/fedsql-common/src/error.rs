//! Error types for fedsql

use thiserror::Error;

/// The main error type for fedsql operations
#[derive(Error, Debug)]
pub enum Error {
    // Grammar front errors (user input)
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Syntax error at position {position}: {message}")]
    Syntax { position: usize, message: String },

    // Catalog errors
    #[error("Unknown function: {token}")]
    UnknownFunction { token: String },

    #[error("Catalog mismatch for {construct}: {message}")]
    CatalogMismatch { construct: String, message: String },

    // Dispatcher errors
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Expression nesting depth {depth} exceeds the maximum of {max}")]
    NestingTooDeep { depth: usize, max: usize },

    #[error("Type resolution failed: {0}")]
    TypeResolution(String),

    // Projection errors
    #[error("Alias not found: {0}")]
    AliasNotFound(String),

    #[error("Cannot build query expression '{expression}': {message}")]
    QueryBuild { expression: String, message: String },

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    // General errors
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a catalog mismatch error
    pub fn catalog_mismatch(construct: impl Into<String>, message: impl Into<String>) -> Self {
        Error::CatalogMismatch {
            construct: construct.into(),
            message: message.into(),
        }
    }

    /// Create a syntax error
    pub fn syntax(position: usize, message: impl Into<String>) -> Self {
        Error::Syntax {
            position,
            message: message.into(),
        }
    }

    /// Create a fatal query-build error naming the offending expression
    pub fn query_build(expression: impl Into<String>, message: impl Into<String>) -> Self {
        Error::QueryBuild {
            expression: expression.into(),
            message: message.into(),
        }
    }

    /// Whether the caller may recover from this error locally.
    ///
    /// Only a missing alias qualifies; everything else aborts the statement.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::AliasNotFound(_))
    }

    /// Whether the error points at a grammar/catalog version skew rather than bad input
    pub fn is_programming_error(&self) -> bool {
        matches!(
            self,
            Error::UnknownFunction { .. }
                | Error::CatalogMismatch { .. }
                | Error::InvariantViolation(_)
                | Error::Internal(_)
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

/// Result type alias using fedsql's Error
pub type Result<T> = std::result::Result<T, Error>;
