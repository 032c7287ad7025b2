//! Comparison operators used by enum, integer and version predicates.

use std::fmt;

/// A comparison operator.
///
/// # Example
///
/// ```
/// use prl_core::ComparisonOperator;
///
/// assert!(ComparisonOperator::Le.evaluate(&3, &3));
/// assert!(!ComparisonOperator::Gt.evaluate(&3, &3));
/// assert_eq!(ComparisonOperator::Lt.reverse(), ComparisonOperator::Gt);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ComparisonOperator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl ComparisonOperator {
    /// Evaluates `left <op> right`.
    pub fn evaluate<T: Ord>(self, left: &T, right: &T) -> bool {
        match self {
            ComparisonOperator::Eq => left == right,
            ComparisonOperator::Ne => left != right,
            ComparisonOperator::Lt => left < right,
            ComparisonOperator::Le => left <= right,
            ComparisonOperator::Gt => left > right,
            ComparisonOperator::Ge => left >= right,
        }
    }

    /// Returns the operator for swapped operands (`a < b` iff `b > a`).
    pub fn reverse(self) -> Self {
        match self {
            ComparisonOperator::Eq => ComparisonOperator::Eq,
            ComparisonOperator::Ne => ComparisonOperator::Ne,
            ComparisonOperator::Lt => ComparisonOperator::Gt,
            ComparisonOperator::Le => ComparisonOperator::Ge,
            ComparisonOperator::Gt => ComparisonOperator::Lt,
            ComparisonOperator::Ge => ComparisonOperator::Le,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonOperator::Eq => "=",
            ComparisonOperator::Ne => "!=",
            ComparisonOperator::Lt => "<",
            ComparisonOperator::Le => "<=",
            ComparisonOperator::Gt => ">",
            ComparisonOperator::Ge => ">=",
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
