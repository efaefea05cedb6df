use miette::Diagnostic;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = StoreError> = std::result::Result<T, E>;

/// Errors returned by every store operation.
///
/// Each call returns its own error value; nothing is kept on the
/// [`Database`](crate::Database) between calls.
#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    /// The table file (or the data directory) does not exist.
    #[error("not found: {0}")]
    #[diagnostic(code(flatdb::not_found))]
    NotFound(String),

    /// `create` was called for a table that already has a file.
    #[error("table already exists: {0}")]
    #[diagnostic(code(flatdb::already_exists))]
    AlreadyExists(String),

    /// The header is missing or malformed, a row is short, or a value
    /// cannot be stored in the tab-separated format.
    #[error("format error: {0}")]
    #[diagnostic(
        code(flatdb::format),
        help("the first line must be `fields<TAB>name,name,...` followed by tab-separated rows")
    )]
    Format(String),

    /// A selection, condition or update referenced an undeclared field.
    #[error("unknown field: {0}")]
    #[diagnostic(code(flatdb::unknown_field))]
    UnknownField(String),

    /// The number of values does not match the number of target fields.
    #[error("arity mismatch: expected {expected} values, got {actual}")]
    #[diagnostic(code(flatdb::arity))]
    Arity { expected: usize, actual: usize },

    #[error("io error: {0}")]
    #[diagnostic(code(flatdb::io))]
    Io(#[from] std::io::Error),
}
