//! Name pricing

use pekked_provider::Wei;

use crate::error::{CoreError, CoreResult, NAME_TOO_SHORT};

/// Shortest name the registry sells.
pub const MIN_NAME_LENGTH: usize = 3;

/// Reject names the registry would refuse to price.
///
/// Length is counted in Unicode scalar values, not bytes.
pub fn validate_name(name: &str) -> CoreResult<usize> {
    let len = name.chars().count();
    if len < MIN_NAME_LENGTH {
        return Err(CoreError::ValidationFailed(NAME_TOO_SHORT.to_string()));
    }
    Ok(len)
}

/// Registration fee for `name`.
///
/// | length | fee        |
/// |--------|------------|
/// | 3      | 0.5 native |
/// | 4      | 0.3 native |
/// | 5+     | 0.1 native |
pub fn price(name: &str) -> CoreResult<Wei> {
    let fee = match validate_name(name)? {
        3 => Wei::from_finney(500),
        4 => Wei::from_finney(300),
        _ => Wei::from_finney(100),
    };
    Ok(fee)
}
