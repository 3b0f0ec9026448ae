//! Managed resources with deterministic release
//!
//! A [`ManagedResource`] is acquired by construction and released exactly
//! once: either explicitly through [`ManagedResource::release`], or
//! automatically when its owner goes out of scope.
//!
//! Release failures behave differently on the two paths:
//!
//! - an explicit `release()` returns the failure to the caller
//! - the automatic release in `Drop` has nobody to return it to, so the
//!   failure is logged at ERROR level and recorded in the
//!   [`LifecycleMonitor`]; it never panics and never propagates
//!
//! # Example
//!
//! ```rust
//! use resguard::{ErrorKind, ManagedResource};
//!
//! let mut resource = ManagedResource::create("r1");
//! resource.perform_operation()?;
//!
//! resource.release()?;
//! assert!(!resource.is_open());
//!
//! let error = resource.perform_operation().unwrap_err();
//! assert_eq!(error.kind(), ErrorKind::Closed);
//! # Ok::<(), resguard::ErrorChain>(())
//! ```

use tracing::{error, info};

use crate::errors::{ErrorChain, ResourceResult};
use crate::fault::FaultProfile;
use crate::monitor::{global_monitor, LifecycleMonitor};
use crate::types::ResourceName;

/// A named handle with an open/closed state.
///
/// The resource is not `Clone`: exactly one owner decides when it is
/// released. Moving it transfers that responsibility; [`ManagedResource::take`]
/// transfers it out of a place that must stay initialized, leaving a closed
/// tombstone behind.
#[derive(Debug)]
pub struct ManagedResource {
    name: ResourceName,
    is_open: bool,
    faults: FaultProfile,
    monitor: &'static LifecycleMonitor,
}

/// Builder for resources that need explicit fault injection or a private
/// monitor.
#[derive(Debug)]
pub struct ResourceBuilder {
    name: ResourceName,
    faults: Option<FaultProfile>,
    monitor: &'static LifecycleMonitor,
}

impl ResourceBuilder {
    /// Use this fault profile instead of deriving one from the name
    pub const fn faults(mut self, faults: FaultProfile) -> Self {
        self.faults = Some(faults);
        self
    }

    /// Report to this monitor instead of the global one
    pub const fn monitor(mut self, monitor: &'static LifecycleMonitor) -> Self {
        self.monitor = monitor;
        self
    }

    /// Acquire the resource. Acquisition cannot fail.
    pub fn open(self) -> ManagedResource {
        let faults = self
            .faults
            .unwrap_or_else(|| FaultProfile::from_name(self.name.as_ref()));

        info!(resource = %self.name, "Resource {} opened", self.name);
        self.monitor.register_acquisition(&self.name);

        ManagedResource {
            name: self.name,
            is_open: true,
            faults,
            monitor: self.monitor,
        }
    }
}

impl ManagedResource {
    /// Acquire a resource, deriving its faults from the sentinel names.
    pub fn create(name: impl Into<String>) -> Self {
        Self::builder(name).open()
    }

    /// Acquire a resource with an explicit fault profile.
    pub fn with_faults(name: impl Into<String>, faults: FaultProfile) -> Self {
        Self::builder(name).faults(faults).open()
    }

    /// Start building a resource.
    pub fn builder(name: impl Into<String>) -> ResourceBuilder {
        ResourceBuilder {
            name: ResourceName::new(name.into()),
            faults: None,
            monitor: global_monitor(),
        }
    }

    /// The resource identity
    pub const fn name(&self) -> &ResourceName {
        &self.name
    }

    /// Whether the resource has not been released yet
    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    /// The fault profile in effect
    pub const fn faults(&self) -> FaultProfile {
        self.faults
    }

    /// Use the resource.
    ///
    /// Fails with `ErrorKind::Closed` after release and with
    /// `ErrorKind::Faulty` for a faulty resource. A failed operation does
    /// not change the state.
    pub fn perform_operation(&self) -> ResourceResult<()> {
        if !self.is_open {
            return Err(ErrorChain::closed(&self.name));
        }
        if self.faults.faulty {
            return Err(ErrorChain::faulty(&self.name));
        }
        info!(resource = %self.name, "Operation performed on resource {}", self.name);
        Ok(())
    }

    /// Release the resource.
    ///
    /// Releasing a closed resource is a successful no-op. Otherwise the
    /// resource is marked closed first; a teardown failure is reported
    /// afterwards and does not reopen it.
    pub fn release(&mut self) -> ResourceResult<()> {
        if !self.is_open {
            return Ok(());
        }

        self.is_open = false;
        self.monitor.register_release(&self.name);
        info!(resource = %self.name, "Resource {} closed", self.name);

        if self.faults.failing_close {
            return Err(ErrorChain::close_failed(&self.name));
        }
        Ok(())
    }

    /// Release the resource and give up ownership.
    pub fn close(mut self) -> ResourceResult<()> {
        self.release()
    }

    /// Move the resource out, leaving a closed tombstone in its place.
    ///
    /// The tombstone rejects operations with `ErrorKind::Closed` and its
    /// drop releases nothing.
    pub fn take(&mut self) -> Self {
        let tombstone = Self {
            name: self.name.clone(),
            is_open: false,
            faults: self.faults,
            monitor: self.monitor,
        };
        std::mem::replace(self, tombstone)
    }
}

impl Drop for ManagedResource {
    fn drop(&mut self) {
        if !self.is_open {
            return;
        }

        if let Err(err) = self.release() {
            error!(
                resource = %self.name,
                error_kind = %err.kind(),
                "Drop caught error: {err}"
            );
            self.monitor.register_swallowed_failure(&self.name, &err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use tracing_test::traced_test;

    fn private_monitor() -> &'static LifecycleMonitor {
        Box::leak(Box::new(LifecycleMonitor::new()))
    }

    #[traced_test]
    #[test]
    fn test_create_opens_resource() {
        let resource = ManagedResource::create("r1");

        assert!(resource.is_open());
        assert_eq!(resource.name().as_ref(), "r1");
        assert!(resource.faults().is_clean());
        assert!(logs_contain("Resource r1 opened"));
    }

    #[traced_test]
    #[test]
    fn test_scoped_release_logs_in_order() {
        let monitor = private_monitor();
        {
            let resource = ManagedResource::builder("r1").monitor(monitor).open();
            resource.perform_operation().unwrap();
            assert_eq!(monitor.open_count("r1"), 1);
        }

        assert_eq!(monitor.open_count("r1"), 0);
        assert!(monitor.swallowed_failures().is_empty());
        assert!(!logs_contain("Drop caught error"));
        logs_assert(|lines: &[&str]| {
            let position = |needle: &str| {
                lines
                    .iter()
                    .position(|line| line.contains(needle))
                    .ok_or_else(|| format!("missing log line: {needle}"))
            };
            let opened = position("Resource r1 opened")?;
            let performed = position("Operation performed on resource r1")?;
            let closed = position("Resource r1 closed")?;
            if opened < performed && performed < closed {
                Ok(())
            } else {
                Err(format!("unexpected order: {lines:?}"))
            }
        });
    }

    #[traced_test]
    #[test]
    fn test_padded_sentinel_name_is_a_different_resource() {
        let monitor = private_monitor();
        let padded = ManagedResource::builder(" faulty ").monitor(monitor).open();

        assert_eq!(padded.name().as_ref(), " faulty ");
        assert!(padded.faults().is_clean());
        padded.perform_operation().unwrap();
        assert!(logs_contain("Resource  faulty  opened"));
        assert!(logs_contain("Operation performed on resource  faulty "));
        assert_eq!(monitor.open_count(" faulty "), 1);
        assert_eq!(monitor.open_count("faulty"), 0);

        drop(padded);
        let failing = ManagedResource::builder("failing\n").monitor(monitor).open();
        drop(failing);
        assert!(monitor.swallowed_failures().is_empty());
    }

    #[test]
    fn test_operation_after_release_fails_with_closed() {
        let mut resource = ManagedResource::create("r1");
        resource.release().unwrap();

        let err = resource.perform_operation().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Closed);
        assert_eq!(err.to_string(), "Resource r1 is closed");
        assert!(err.cause().is_none());
    }

    #[traced_test]
    #[test]
    fn test_release_is_idempotent() {
        let mut resource = ManagedResource::create("twice");

        resource.release().unwrap();
        resource.release().unwrap();
        assert!(!resource.is_open());

        logs_assert(|lines: &[&str]| {
            match lines
                .iter()
                .filter(|line| line.contains("Resource twice closed"))
                .count()
            {
                1 => Ok(()),
                n => Err(format!("expected one close, saw {n}")),
            }
        });
    }

    #[test]
    fn test_faulty_resource_fails_while_open() {
        let mut resource = ManagedResource::create("faulty");

        let err = resource.perform_operation().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Faulty);
        assert_eq!(err.to_string(), "Resource faulty is faulty");
        assert!(resource.is_open());

        resource.release().unwrap();
        assert_eq!(
            resource.perform_operation().unwrap_err().kind(),
            ErrorKind::Closed
        );
    }

    #[traced_test]
    #[test]
    fn test_failing_release_closes_before_reporting() {
        let mut resource = ManagedResource::create("failing");
        resource.perform_operation().unwrap();

        let err = resource.release().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CloseFailed);
        assert_eq!(err.to_string(), "Failed to close resource failing");
        assert!(!resource.is_open());
        assert!(logs_contain("Resource failing closed"));

        resource.release().unwrap();
        assert!(!logs_contain("Drop caught error"));
    }

    #[traced_test]
    #[test]
    fn test_drop_swallows_release_failure() {
        let monitor = private_monitor();
        {
            let _resource = ManagedResource::builder("failing").monitor(monitor).open();
        }

        assert!(logs_contain("Resource failing closed"));
        assert!(logs_contain("Drop caught error: Failed to close resource failing"));
        assert!(logs_contain("close_failed"));
        let swallowed = monitor.swallowed_failures_for("failing");
        assert_eq!(swallowed.len(), 1);
        assert_eq!(swallowed[0].message, "Failed to close resource failing");
    }

    #[traced_test]
    #[test]
    fn test_explicit_close_propagates_failure() {
        let monitor = private_monitor();
        let resource = ManagedResource::builder("failing").monitor(monitor).open();

        let err = resource.close().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CloseFailed);
        assert!(monitor.swallowed_failures().is_empty());
        assert!(!logs_contain("Drop caught error"));
    }

    #[test]
    fn test_injected_faults_override_name() {
        let monitor = private_monitor();
        let resource = ManagedResource::builder("cache")
            .faults(FaultProfile::none().with_failing_close())
            .monitor(monitor)
            .open();
        resource.perform_operation().unwrap();
        drop(resource);
        assert_eq!(monitor.swallowed_failures_for("cache").len(), 1);

        let faulty = ManagedResource::with_faults("socket", FaultProfile::none().with_faulty());
        assert_eq!(
            faulty.perform_operation().unwrap_err().kind(),
            ErrorKind::Faulty
        );

        let tame = ManagedResource::with_faults("faulty", FaultProfile::none());
        tame.perform_operation().unwrap();
    }

    #[test]
    fn test_take_leaves_inert_tombstone() {
        let monitor = private_monitor();
        let mut source = ManagedResource::builder("moved").monitor(monitor).open();

        let target = source.take();
        assert!(target.is_open());
        assert!(!source.is_open());
        assert_eq!(
            source.perform_operation().unwrap_err().kind(),
            ErrorKind::Closed
        );

        drop(source);
        assert_eq!(monitor.open_count("moved"), 1);
        assert_eq!(monitor.stats().released, 0);

        drop(target);
        assert_eq!(monitor.open_count("moved"), 0);
        assert_eq!(monitor.stats().released, 1);
    }

    #[test]
    fn test_tombstone_of_failing_resource_reports_nothing() {
        let monitor = private_monitor();
        let mut source = ManagedResource::builder("failing").monitor(monitor).open();

        let mut target = source.take();
        drop(source);
        assert!(monitor.swallowed_failures().is_empty());

        assert_eq!(target.release().unwrap_err().kind(), ErrorKind::CloseFailed);
        drop(target);
        assert!(monitor.swallowed_failures().is_empty());
    }

    #[test]
    fn test_release_runs_once_on_early_return() {
        fn early_exit(monitor: &'static LifecycleMonitor) -> ResourceResult<()> {
            let first = ManagedResource::builder("first").monitor(monitor).open();
            let faulty = ManagedResource::builder("faulty").monitor(monitor).open();
            first.perform_operation()?;
            faulty.perform_operation()?;
            Ok(())
        }

        let monitor = private_monitor();
        let err = early_exit(monitor).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Faulty);

        let stats = monitor.stats();
        assert_eq!(stats.opened, 2);
        assert_eq!(stats.released, 2);
        assert_eq!(stats.open, 0);
    }

    #[test]
    fn test_moving_transfers_release_responsibility() {
        let monitor = private_monitor();
        let resource = ManagedResource::builder("boxed").monitor(monitor).open();
        let boxed = Box::new(resource);
        boxed.perform_operation().unwrap();
        assert_eq!(monitor.stats().released, 0);

        drop(boxed);
        assert_eq!(monitor.stats().released, 1);
    }
}
