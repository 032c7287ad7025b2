//! Bounded integer variables and their order encoding.
//!
//! An integer variable `x` over the sorted domain `d0 < d1 < ... < dk` is
//! represented by one boolean variable `@ORD_<x>_<di>` for every value but
//! the largest, meaning `x <= di`. The variable encoding is the chain
//! `x <= di => x <= d(i+1)`. Linear constraints over such variables are
//! encoded in [`linear`].
//!
//! Every domain value costs one variable, so domains wider than
//! [`MAX_DOMAIN_SIZE`] are rejected before any variable is created.

pub mod linear;

#[cfg(test)]
mod tests;

use std::collections::BTreeSet;
use std::fmt;

use prl_core::{IntRange, PropertyRange};

use crate::logic::{EncodedFormula, FormulaFactory, Model};

pub use linear::{encode_comparison, encode_in_range, LinearExpression};

pub const ORDER_PREFIX: &str = "@ORD";

/// Largest domain an integer variable may be encoded over.
pub const MAX_DOMAIN_SIZE: usize = 1 << 16;

/// The finite domain of an integer variable.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IntegerDomain {
    Range { lb: i32, ub: i32 },
    Set(BTreeSet<i32>),
}

impl IntegerDomain {
    pub fn range(lb: i32, ub: i32) -> Self {
        if lb > ub {
            IntegerDomain::Set(BTreeSet::new())
        } else {
            IntegerDomain::Range { lb, ub }
        }
    }

    pub fn set(values: impl IntoIterator<Item = i32>) -> Self {
        IntegerDomain::Set(values.into_iter().collect())
    }

    pub fn from_range(range: &IntRange) -> Self {
        match range {
            PropertyRange::Empty => IntegerDomain::Set(BTreeSet::new()),
            PropertyRange::Interval { start, end } => IntegerDomain::range(*start, *end),
            PropertyRange::List(values) => IntegerDomain::Set(values.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            IntegerDomain::Range { .. } => false,
            IntegerDomain::Set(values) => values.is_empty(),
        }
    }

    pub fn lb(&self) -> Option<i32> {
        match self {
            IntegerDomain::Range { lb, .. } => Some(*lb),
            IntegerDomain::Set(values) => values.first().copied(),
        }
    }

    pub fn ub(&self) -> Option<i32> {
        match self {
            IntegerDomain::Range { ub, .. } => Some(*ub),
            IntegerDomain::Set(values) => values.last().copied(),
        }
    }

    pub fn contains(&self, value: i32) -> bool {
        match self {
            IntegerDomain::Range { lb, ub } => (*lb..=*ub).contains(&value),
            IntegerDomain::Set(values) => values.contains(&value),
        }
    }

    /// All values in ascending order; check [`Self::is_encodable`] first.
    pub fn values(&self) -> Vec<i32> {
        match self {
            IntegerDomain::Range { lb, ub } => (*lb..=*ub).collect(),
            IntegerDomain::Set(values) => values.iter().copied().collect(),
        }
    }

    pub fn size(&self) -> usize {
        match self {
            IntegerDomain::Range { lb, ub } => (i64::from(*ub) - i64::from(*lb) + 1) as usize,
            IntegerDomain::Set(values) => values.len(),
        }
    }

    pub fn is_encodable(&self) -> bool {
        self.size() <= MAX_DOMAIN_SIZE
    }

    /// The largest value not above `value`.
    fn floor(&self, value: i32) -> Option<i32> {
        match self {
            IntegerDomain::Range { lb, ub } => (value >= *lb).then(|| value.min(*ub)),
            IntegerDomain::Set(values) => values.range(..=value).next_back().copied(),
        }
    }
}

impl fmt::Display for IntegerDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegerDomain::Range { lb, ub } => write!(f, "[{} - {}]", lb, ub),
            IntegerDomain::Set(values) => {
                f.write_str("[")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                f.write_str("]")
            }
        }
    }
}

/// An integer variable with its domain.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IntegerVariable {
    pub name: String,
    pub domain: IntegerDomain,
}

impl IntegerVariable {
    pub fn new(name: impl Into<String>, domain: IntegerDomain) -> Self {
        Self {
            name: name.into(),
            domain,
        }
    }

    /// The order variable for `self <= value`; `value` must be a domain value.
    fn order_variable(&self, value: i32) -> String {
        format!("{}_{}_{}", ORDER_PREFIX, self.name, value)
    }

    /// All order variables with the value they bound, in ascending order.
    pub fn order_variables(&self) -> Vec<(i32, String)> {
        let mut values = self.domain.values();
        values.pop();
        values
            .into_iter()
            .map(|v| (v, self.order_variable(v)))
            .collect()
    }

    /// `self <= value`.
    pub fn le(&self, f: &FormulaFactory, value: i32) -> EncodedFormula {
        let (Some(ub), Some(floor)) = (self.domain.ub(), self.domain.floor(value)) else {
            return f.falsum();
        };
        if floor >= ub {
            f.verum()
        } else {
            f.variable(&self.order_variable(floor))
        }
    }

    /// `self >= value`.
    pub fn ge(&self, f: &FormulaFactory, value: i32) -> EncodedFormula {
        match value.checked_sub(1) {
            Some(below) if !self.domain.is_empty() => f.not(self.le(f, below)),
            Some(_) => f.falsum(),
            None => f.constant(!self.domain.is_empty()),
        }
    }

    /// The clauses linking the order variables; false for an empty domain.
    pub fn encode(&self, f: &FormulaFactory) -> EncodedFormula {
        if self.domain.is_empty() {
            return f.falsum();
        }
        let order = self.order_variables();
        let clauses: Vec<EncodedFormula> = order
            .windows(2)
            .map(|w| f.or(&[f.literal(&w[0].1, false), f.variable(&w[1].1)]))
            .collect();
        f.and(&clauses)
    }

    /// The value encoded by a model of the order variables.
    pub fn decode(&self, model: &Model) -> Option<i32> {
        let ub = self.domain.ub()?;
        Some(
            self.order_variables()
                .into_iter()
                .find(|(_, v)| model.contains(v))
                .map_or(ub, |(value, _)| value),
        )
    }
}

impl fmt::Display for IntegerVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.domain)
    }
}
