//! Core types for resguard.
//!
//! Identifier types are `nutype` newtypes, so an identity cannot be mixed
//! up with an arbitrary string.

use nutype::nutype;

/// The identity of a managed resource.
///
/// Names are kept exactly as given and never change afterwards. Any
/// string is a valid name, so construction cannot fail.
#[nutype(
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        AsRef,
        Deref,
        Display,
        Serialize,
        Deserialize
    )
)]
pub struct ResourceName(String);

impl From<&str> for ResourceName {
    fn from(value: &str) -> Self {
        Self::new(value.to_string())
    }
}

impl From<String> for ResourceName {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
