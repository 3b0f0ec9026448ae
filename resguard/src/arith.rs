//! Checked arithmetic with argument validation.

use num_traits::{CheckedDiv, Zero};

use crate::errors::{ErrorChain, ResourceResult};

/// Divide `dividend` by `divisor`.
///
/// A zero divisor fails with `ErrorKind::InvalidArgument` and no cause, and
/// so does a quotient that does not fit the type (`i32::MIN / -1`).
///
/// ```rust
/// use resguard::{divide, ErrorKind};
///
/// assert_eq!(divide(10, 2).unwrap(), 5);
/// assert_eq!(divide(10, 0).unwrap_err().kind(), ErrorKind::InvalidArgument);
/// ```
pub fn divide<T>(dividend: T, divisor: T) -> ResourceResult<T>
where
    T: CheckedDiv + Zero,
{
    if divisor.is_zero() {
        return Err(ErrorChain::invalid_argument("Division by zero"));
    }
    dividend
        .checked_div(&divisor)
        .ok_or_else(|| ErrorChain::invalid_argument("Division overflow"))
}
