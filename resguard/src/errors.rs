//! Error types for resguard.
//!
//! Every fallible operation in this crate returns an [`ErrorChain`]. An
//! `ErrorChain` carries:
//!
//! - an [`ErrorKind`] so handlers can match on the failure category
//! - a human-readable message
//! - at most one wrapped cause, which can be any error value
//!
//! # Error Categories
//!
//! - **Closed**: an operation was attempted on a released resource
//! - **Faulty**: the resource is permanently broken, even while open
//! - **CloseFailed**: release changed state, but the teardown itself failed
//! - **InvalidArgument**: a precondition unrelated to resource state failed
//! - **Wrapped**: another error re-raised with additional context
//!
//! # Example Usage
//!
//! ```rust
//! use resguard::errors::{ErrorChain, ErrorKind, WrapErr};
//!
//! fn load() -> Result<u32, ErrorChain> {
//!     "forty-two".parse::<u32>().wrap_err("could not load the answer")
//! }
//!
//! let error = load().unwrap_err();
//! assert_eq!(error.kind(), ErrorKind::Wrapped);
//! assert!(error.cause().is_some());
//! ```

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

use crate::types::ResourceName;

/// Any error value that can be stored as the cause of an [`ErrorChain`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Type alias for resource operation results
pub type ResourceResult<T> = Result<T, ErrorChain>;

/// The category of an [`ErrorChain`].
///
/// Handlers match on the kind rather than on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Operation attempted on an already-closed resource.
    Closed,
    /// Operation attempted on a resource whose identity marks it broken.
    Faulty,
    /// Release marked the resource closed but the teardown action failed.
    CloseFailed,
    /// Precondition violation unrelated to resource state.
    InvalidArgument,
    /// Another error re-raised with additional context.
    Wrapped,
}

impl ErrorKind {
    /// Stable `snake_case` label, used as a structured log field.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Faulty => "faulty",
            Self::CloseFailed => "close_failed",
            Self::InvalidArgument => "invalid_argument",
            Self::Wrapped => "wrapped",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error with a kind, a message and an optional wrapped cause.
///
/// Only [`ErrorChain::wrap`] sets a cause. The cause is exposed by
/// reference through [`ErrorChain::cause`] and [`std::error::Error::source`];
/// it is never handed out by value.
///
/// # Example
///
/// ```rust
/// use resguard::errors::{ErrorChain, ErrorKind};
///
/// let original = std::io::Error::other("Original error");
/// let error = ErrorChain::wrap("Wrapper error", original);
///
/// assert_eq!(error.to_string(), "Wrapper error");
/// assert_eq!(error.cause().map(ToString::to_string).as_deref(), Some("Original error"));
/// ```
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ErrorChain {
    kind: ErrorKind,
    message: String,
    #[source]
    cause: Option<BoxError>,
}

impl ErrorChain {
    /// Create an error of the given kind without a cause.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: None,
        }
    }

    /// Wrap `cause` with an additional message.
    ///
    /// The resulting error has kind [`ErrorKind::Wrapped`].
    pub fn wrap<E>(message: impl Into<String>, cause: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self {
            kind: ErrorKind::Wrapped,
            message: message.into(),
            cause: Some(cause.into()),
        }
    }

    /// The resource has already been released.
    pub fn closed(name: &ResourceName) -> Self {
        Self::new(ErrorKind::Closed, format!("Resource {name} is closed"))
    }

    /// The resource is permanently broken.
    pub fn faulty(name: &ResourceName) -> Self {
        Self::new(ErrorKind::Faulty, format!("Resource {name} is faulty"))
    }

    /// Teardown of the resource failed after it was marked closed.
    pub fn close_failed(name: &ResourceName) -> Self {
        Self::new(
            ErrorKind::CloseFailed,
            format!("Failed to close resource {name}"),
        )
    }

    /// An argument failed validation.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    /// The failure category.
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The primary message, without any cause.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The wrapped cause, if this error was created with [`ErrorChain::wrap`].
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Look the cause up as a concrete error type.
    pub fn cause_as<E>(&self) -> Option<&E>
    where
        E: StdError + 'static,
    {
        self.cause()?.downcast_ref::<E>()
    }

    /// Iterate over this error and every nested source, outermost first.
    ///
    /// Only one level is stored here, but a cause that is itself an
    /// `ErrorChain` (or any error with a `source`) is followed as well.
    pub fn chain(&self) -> Chain<'_> {
        Chain { next: Some(self) }
    }

    /// The innermost error of the chain.
    pub fn root_cause(&self) -> &(dyn StdError + 'static) {
        let mut current: &(dyn StdError + 'static) = self;
        while let Some(next) = current.source() {
            current = next;
        }
        current
    }

    /// Render every message of the chain, joined by `": "`.
    pub fn render_chain(&self) -> String {
        self.chain()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(": ")
    }
}

/// Iterator returned by [`ErrorChain::chain`].
#[derive(Debug, Clone)]
pub struct Chain<'a> {
    next: Option<&'a (dyn StdError + 'static)>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a (dyn StdError + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.source();
        Some(current)
    }
}

/// Extension trait adding context to any `Result`.
pub trait WrapErr<T> {
    /// Wrap the error, if any, in an [`ErrorKind::Wrapped`] [`ErrorChain`].
    fn wrap_err(self, message: impl Into<String>) -> ResourceResult<T>;
}

impl<T, E> WrapErr<T> for Result<T, E>
where
    E: Into<BoxError>,
{
    fn wrap_err(self, message: impl Into<String>) -> ResourceResult<T> {
        self.map_err(|error| ErrorChain::wrap(message, error))
    }
}
