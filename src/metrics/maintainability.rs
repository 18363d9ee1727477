//! Maintainability-index derivation.

use crate::core::errors::{Error, Result};

/// Upper bound of the unscaled maintainability index.
pub const MAX_MAINTAINABILITY: f64 = 171.0;

/// Composite maintainability index from mean Halstead effort, mean
/// cyclomatic complexity and mean logical lines of code.
///
/// A zero mean cyclomatic complexity is impossible when every scope starts
/// at one, so it is reported as an internal invariant failure rather than
/// clamped away. With `newmi` the result is rescaled to 0..100.
pub fn maintainability_index(
    mean_effort: f64,
    mean_cyclomatic: f64,
    mean_loc: f64,
    newmi: bool,
) -> Result<f64> {
    if mean_cyclomatic == 0.0 {
        return Err(Error::ZeroCyclomatic);
    }
    let mut maintainability = MAX_MAINTAINABILITY
        - 3.42 * mean_effort.ln()
        - 0.23 * mean_cyclomatic.ln()
        - 16.2 * mean_loc.ln();
    if maintainability > MAX_MAINTAINABILITY {
        maintainability = MAX_MAINTAINABILITY;
    }
    if newmi {
        maintainability = (maintainability * 100.0 / MAX_MAINTAINABILITY).max(0.0);
    }
    Ok(maintainability)
}
