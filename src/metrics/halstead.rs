//! Halstead complexity metrics.
//!
//! Operators and operands are tallied separately; the derived fields follow
//! from the four counts (total/distinct per bucket) once a scope has been
//! fully walked.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Tally of one symbol bucket (operators or operands).
///
/// The `seen` set backs the distinct count and is working state; only the
/// counts are part of the serialized report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymbolTally {
    pub total: usize,
    pub distinct: usize,
    #[serde(skip)]
    seen: HashSet<String>,
}

impl SymbolTally {
    /// Record one occurrence of an identifier. The first occurrence also
    /// increments the distinct count.
    pub fn record(&mut self, identifier: String) {
        if self.seen.insert(identifier) {
            self.distinct += 1;
        }
        self.total += 1;
    }
}

/// Halstead measures for one scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HalsteadReport {
    pub operators: SymbolTally,
    pub operands: SymbolTally,
    pub length: usize,
    pub vocabulary: usize,
    pub difficulty: f64,
    pub volume: f64,
    pub effort: f64,
    pub bugs: f64,
    pub time: f64,
}

impl HalsteadReport {
    /// Derive the composite fields from the tallies. Every derived field
    /// stays zero when no symbols were recorded.
    pub fn derive(&mut self) {
        self.length = self.operators.total + self.operands.total;
        if self.length == 0 {
            self.vocabulary = 0;
            self.difficulty = 0.0;
            self.volume = 0.0;
            self.effort = 0.0;
            self.bugs = 0.0;
            self.time = 0.0;
            return;
        }
        self.vocabulary = self.operators.distinct + self.operands.distinct;
        let reuse = if self.operands.distinct == 0 {
            1.0
        } else {
            self.operands.total as f64 / self.operands.distinct as f64
        };
        self.difficulty = self.operators.distinct as f64 / 2.0 * reuse;
        self.volume = self.length as f64 * (self.vocabulary as f64).log2();
        self.effort = self.difficulty * self.volume;
        self.bugs = self.volume / 3000.0;
        self.time = self.effort / 18.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_identifiers_stay_distinct_once() {
        let mut tally = SymbolTally::default();
        tally.record("a".to_string());
        tally.record("a".to_string());
        tally.record("b".to_string());
        assert_eq!(tally.total, 3);
        assert_eq!(tally.distinct, 2);
    }

    #[test]
    fn derives_all_zero_for_an_empty_scope() {
        let mut halstead = HalsteadReport::default();
        halstead.derive();
        assert_eq!(halstead.length, 0);
        assert_eq!(halstead.vocabulary, 0);
        assert_eq!(halstead.volume, 0.0);
        assert_eq!(halstead.effort, 0.0);
    }

    #[test]
    fn derives_the_composite_fields() {
        // One operator, three distinct operands.
        let mut halstead = HalsteadReport::default();
        halstead.operators.record("()".to_string());
        for operand in ["parseInt", "\"10\"", "10"] {
            halstead.operands.record(operand.to_string());
        }
        halstead.derive();
        assert_eq!(halstead.length, 4);
        assert_eq!(halstead.vocabulary, 4);
        assert_eq!(halstead.difficulty, 0.5);
        assert_eq!(halstead.volume, 8.0);
        assert_eq!(halstead.effort, 4.0);
        assert!(halstead.bugs > 0.0 && halstead.bugs < 0.01);
        assert!((halstead.time - 4.0 / 18.0).abs() < f64::EPSILON);
    }

    #[test]
    fn difficulty_ignores_operand_reuse_without_operands() {
        let mut halstead = HalsteadReport::default();
        halstead.operators.record("return".to_string());
        halstead.derive();
        assert_eq!(halstead.difficulty, 0.5);
        assert_eq!(halstead.vocabulary, 1);
        assert_eq!(halstead.volume, 0.0);
    }
}
