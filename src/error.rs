//! Unified error types for toposcope.
//!
//! Internally errors stay structured and chained for logs; the TUI collapses
//! every scan failure into one user-facing message (see [`crate::scan`]).

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for toposcope operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TopoError {
    /// Errors while fetching or decoding the inventory
    #[error("Scan failed: {context}")]
    Scan {
        context: String,
        #[source]
        source: ScanErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Terminal setup/teardown errors
    #[error("Terminal error: {0}")]
    Terminal(String),
}

/// Specific scan error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ScanErrorKind {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected HTTP status: {0}")]
    Status(u16),

    #[error("Invalid inventory payload: {0}")]
    Decode(String),

    #[error("Scan endpoint timed out after {0}s")]
    Timeout(u64),
}

/// Convenient Result type for toposcope operations
pub type Result<T> = std::result::Result<T, TopoError>;

impl TopoError {
    /// Create a scan error with context
    pub fn scan(context: impl Into<String>, source: ScanErrorKind) -> Self {
        Self::Scan {
            context: context.into(),
            source,
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether this error came from the scan pipeline. Scan failures are the
    /// ones the TUI coalesces instead of surfacing verbatim.
    #[must_use]
    pub const fn is_scan(&self) -> bool {
        matches!(self, Self::Scan { .. })
    }
}

impl From<std::io::Error> for TopoError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for TopoError {
    fn from(err: serde_json::Error) -> Self {
        Self::scan(
            "JSON deserialization",
            ScanErrorKind::Decode(err.to_string()),
        )
    }
}

/// Extension trait for adding context to errors.
///
/// Context strings chain front-to-back, so the outermost caller's context
/// reads first: "loading config: reading file: permission denied".
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure (lazy evaluation).
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<TopoError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

fn add_context_to_error(err: TopoError, new_ctx: &str) -> TopoError {
    match err {
        TopoError::Scan {
            context: existing,
            source,
        } => TopoError::Scan {
            context: chain_context(new_ctx, &existing),
            source,
        },
        TopoError::Io {
            path,
            message,
            source,
        } => TopoError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        TopoError::Config(msg) => TopoError::Config(chain_context(new_ctx, &msg)),
        TopoError::Terminal(msg) => TopoError::Terminal(chain_context(new_ctx, &msg)),
    }
}

fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_includes_context() {
        let err = TopoError::scan(
            "fetching inventory",
            ScanErrorKind::Network("connection refused".to_string()),
        );
        assert!(err.to_string().contains("fetching inventory"));
        assert!(err.is_scan());

        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = TopoError::io("/tmp/inventory.json", io_err);
        assert!(err.to_string().contains("/tmp/inventory.json"));
        assert!(!err.is_scan());
    }

    #[test]
    fn context_chains_front_to_back() {
        fn inner() -> Result<()> {
            Err(TopoError::scan("base", ScanErrorKind::Status(500)))
        }

        fn outer() -> Result<()> {
            inner().context("outer layer")
        }

        match outer() {
            Err(TopoError::Scan { context, .. }) => {
                assert_eq!(context, "outer layer: base");
            }
            _ => panic!("expected scan error"),
        }
    }

    #[test]
    fn with_context_is_lazy() {
        let mut called = false;

        let ok_result: Result<i32> = Ok(42);
        let _ = ok_result.with_context(|| {
            called = true;
            "should not be called"
        });
        assert!(!called);

        let err_result: Result<i32> = Err(TopoError::config("bad endpoint"));
        let _ = err_result.with_context(|| {
            called = true;
            "should be called"
        });
        assert!(called);
    }

    #[test]
    fn json_errors_map_to_decode_kind() {
        let err: TopoError = serde_json::from_str::<Vec<i32>>("not json")
            .map_err(TopoError::from)
            .unwrap_err();
        match err {
            TopoError::Scan {
                source: ScanErrorKind::Decode(_),
                ..
            } => {}
            other => panic!("expected decode kind, got {other:?}"),
        }
    }
}
