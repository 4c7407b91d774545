//! Error types for the kvtrace crate.

use std::fmt;

/// Convenience result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// All failure classes surfaced by this crate.
///
/// Instrumentation failures (counter increments, history appends) are
/// best-effort and never reach callers as errors; they are logged and
/// swallowed at the call site. Everything else propagates through this type.
#[derive(Debug)]
pub enum Error {
    /// The key-value store rejected or failed an operation.
    BackendError(String),
    /// Backend construction or pool configuration failed.
    ConfigError(String),
    /// A stored value could not be coerced to the requested type.
    CoercionError(String),
    /// Serializing a value for the call history failed.
    SerializationError(String),
    /// The external fetch behind the TTL cache failed.
    FetchError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "backend error: {}", msg),
            Error::ConfigError(msg) => write!(f, "config error: {}", msg),
            Error::CoercionError(msg) => write!(f, "coercion error: {}", msg),
            Error::SerializationError(msg) => write!(f, "serialization error: {}", msg),
            Error::FetchError(msg) => write!(f, "fetch error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::SerializationError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_class_and_message() {
        let e = Error::CoercionError("not an integer: \"abc\"".to_string());
        assert_eq!(e.to_string(), "coercion error: not an integer: \"abc\"");
    }

    #[test]
    fn test_from_serde_json() {
        let bad = serde_json::from_str::<u32>("not json").unwrap_err();
        let e: Error = bad.into();
        assert!(matches!(e, Error::SerializationError(_)));
    }
}
