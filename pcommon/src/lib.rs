//! Shared aliases and identifier newtypes for the parley workspace crates.
//!
//! ```rust
//! use pcommon::{BoxFuture, TraceId};
//!
//! fn echo<'a>(trace: &'a TraceId) -> BoxFuture<'a, &'a str> {
//!     Box::pin(async move { trace.as_str() })
//! }
//!
//! let trace = TraceId::new("req-1");
//! let _future = echo(&trace);
//! assert_eq!(trace.to_string(), "req-1");
//! ```

pub mod future {
    //! Shared async future aliases.
    //!
    //! ```rust
    //! use pcommon::BoxFuture;
    //!
    //! fn str_len<'a>(value: &'a str) -> BoxFuture<'a, usize> {
    //!     Box::pin(async move { value.len() })
    //! }
    //!
    //! let _future = str_len("hello");
    //! ```

    use std::future::Future;
    use std::pin::Pin;

    pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
}

pub mod context {
    //! Cross-crate identifier newtypes.
    //!
    //! ```rust
    //! use pcommon::TraceId;
    //!
    //! let trace = TraceId::from("trace-42");
    //! assert_eq!(trace.as_str(), "trace-42");
    //! ```

    use std::fmt::{Display, Formatter};

    /// Correlates the log events of one inbound chat request.
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub struct TraceId(String);

    impl TraceId {
        pub fn new(value: impl Into<String>) -> Self {
            Self(value.into())
        }

        pub fn as_str(&self) -> &str {
            self.0.as_str()
        }
    }

    impl Display for TraceId {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.0)
        }
    }

    impl From<String> for TraceId {
        fn from(value: String) -> Self {
            Self(value)
        }
    }

    impl From<&str> for TraceId {
        fn from(value: &str) -> Self {
            Self(value.to_string())
        }
    }
}

pub use context::TraceId;
pub use future::BoxFuture;
