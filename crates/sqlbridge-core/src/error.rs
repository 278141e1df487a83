use thiserror::Error;

/// Core error type shared across sqlbridge crates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A type descriptor was built with inconsistent parts.
    #[error("invalid descriptor: {0}")]
    InvalidDescriptor(String),
    /// A provider name did not resolve to a supported dialect.
    #[error("unknown dialect: {0}")]
    UnknownDialect(String),
    /// A native or SQL type name could not be parsed.
    #[error("invalid type name: {0}")]
    InvalidTypeName(String),
}

/// Convenience alias for results returned by sqlbridge crates.
pub type Result<T> = std::result::Result<T, Error>;
