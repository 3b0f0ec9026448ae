//! `resguard` - deterministic resource lifecycle management
//!
//! This library models a named resource that is acquired by construction
//! and released exactly once, together with an error type that can carry
//! another error as its cause.
//!
//! - [`ManagedResource`] is the move-only handle. Dropping it releases it;
//!   a release failure at that point is logged and recorded in the
//!   [`LifecycleMonitor`] instead of being propagated.
//! - [`ErrorChain`] is the error type returned by every fallible operation,
//!   classified by [`ErrorKind`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod arith;
pub mod errors;
pub mod fault;
pub mod logging;
pub mod monitor;
pub mod resource;
pub mod types;

pub use arith::divide;
pub use errors::{BoxError, Chain, ErrorChain, ErrorKind, ResourceResult, WrapErr};
pub use fault::{FaultProfile, FAILING_SENTINEL, FAULTY_SENTINEL};
pub use logging::{LogLevel, LoggingConfig};
pub use monitor::{global_monitor, LifecycleMonitor, LifecycleStats, SwallowedFailure};
pub use resource::{ManagedResource, ResourceBuilder};
pub use types::ResourceName;

/// Commonly used items
pub mod prelude {
    pub use crate::errors::{ErrorChain, ErrorKind, ResourceResult, WrapErr};
    pub use crate::resource::ManagedResource;
    pub use crate::divide;
}
