//! Fault injection for managed resources.
//!
//! A [`FaultProfile`] decides which failure paths a resource takes. By
//! default the profile is derived from the resource name: a resource named
//! [`FAULTY_SENTINEL`] refuses every operation and a resource named
//! [`FAILING_SENTINEL`] fails during teardown. Callers that want the same
//! behavior under another name inject a profile explicitly.

/// Resource name that marks a resource as permanently broken.
pub const FAULTY_SENTINEL: &str = "faulty";

/// Resource name that makes teardown fail.
pub const FAILING_SENTINEL: &str = "failing";

/// Which failure paths a resource takes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FaultProfile {
    /// Every operation fails with `ErrorKind::Faulty`, even while open.
    pub faulty: bool,
    /// Release reports `ErrorKind::CloseFailed` after marking the resource closed.
    pub failing_close: bool,
}

impl FaultProfile {
    /// A profile without faults.
    pub const fn none() -> Self {
        Self {
            faulty: false,
            failing_close: false,
        }
    }

    /// Make every operation fail.
    pub const fn with_faulty(mut self) -> Self {
        self.faulty = true;
        self
    }

    /// Make release fail after the state transition.
    pub const fn with_failing_close(mut self) -> Self {
        self.failing_close = true;
        self
    }

    /// Derive the profile from a resource name using the sentinel names.
    pub fn from_name(name: &str) -> Self {
        match name {
            FAULTY_SENTINEL => Self::none().with_faulty(),
            FAILING_SENTINEL => Self::none().with_failing_close(),
            _ => Self::none(),
        }
    }

    /// Whether the profile has no fault enabled.
    pub const fn is_clean(&self) -> bool {
        !self.faulty && !self.failing_close
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_names() {
        assert_eq!(FaultProfile::from_name("faulty"), FaultProfile::none().with_faulty());
        assert_eq!(
            FaultProfile::from_name("failing"),
            FaultProfile::none().with_failing_close()
        );
        assert!(FaultProfile::from_name("r1").is_clean());
        assert!(FaultProfile::from_name("Faulty").is_clean());
    }

    #[test]
    fn test_builder_combines_faults() {
        let profile = FaultProfile::none().with_faulty().with_failing_close();
        assert!(profile.faulty);
        assert!(profile.failing_close);
        assert!(!profile.is_clean());
        assert_eq!(FaultProfile::default(), FaultProfile::none());
    }
}
