//! Analysis settings.

use serde::{Deserialize, Serialize};

/// Toggles controlling which syntax forms count toward cyclomatic
/// complexity, plus the maintainability-index variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Count `catch` clauses as decision points.
    #[serde(default)]
    pub trycatch: bool,

    /// Count `for..in` loops as decision points.
    #[serde(default)]
    pub forin: bool,

    /// Count `||` as a decision point. `&&` always counts.
    #[serde(default = "default_true")]
    pub logicalor: bool,

    /// Count each non-default `case` arm as a decision point.
    #[serde(default = "default_true")]
    pub switchcase: bool,

    /// Rescale the maintainability index from its raw 171-capped form to
    /// a 0..100 range.
    #[serde(default)]
    pub newmi: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            trycatch: false,
            forin: false,
            logicalor: true,
            switchcase: true,
            newmi: false,
        }
    }
}
