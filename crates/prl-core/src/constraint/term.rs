//! Integer terms: values, features, weighted features and linear sums.

use std::collections::BTreeSet;
use std::fmt;

use crate::assignment::FeatureAssignment;
use crate::error::{PrlError, Result};
use crate::feature::IntFeature;
use crate::renaming::FeatureRenaming;

/// A feature weighted by an integer coefficient.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntMul {
    pub coefficient: i32,
    pub feature: IntFeature,
}

impl IntMul {
    pub fn new(coefficient: i32, feature: IntFeature) -> Self {
        Self {
            coefficient,
            feature,
        }
    }

    fn value(&self, assignment: &FeatureAssignment) -> Option<i128> {
        assignment
            .int_value(&self.feature)
            .map(|v| i128::from(self.coefficient) * i128::from(v))
    }

    /// `coefficient * value` if it fits into an `i32`.
    fn checked_value(&self, value: i32) -> Option<i32> {
        self.coefficient.checked_mul(value)
    }
}

/// A linear sum `a1*x1 + ... + an*xn + offset`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntSum {
    pub operands: Vec<IntMul>,
    pub offset: i32,
}

/// An integer term.
///
/// Terms built through [`IntTerm::mul`] and [`IntTerm::sum`] are normalized:
/// a coefficient of `1` yields the bare feature, a coefficient of `0` drops
/// the term, nested sums are flattened and constants are folded into the
/// offset.
///
/// # Example
///
/// ```
/// use prl_core::{IntFeature, IntTerm};
///
/// let x = IntFeature::new("x");
/// assert_eq!(IntTerm::mul(1, x.clone()), IntTerm::Feature(x.clone()));
/// assert_eq!(IntTerm::mul(0, x.clone()), IntTerm::Value(0));
///
/// let sum = IntTerm::sum([IntTerm::Value(2), IntTerm::mul(3, x.clone()), IntTerm::Value(4)]).unwrap();
/// assert_eq!(sum.to_string(), "3*x + 6");
/// assert!(IntTerm::sum([IntTerm::Value(i32::MAX), IntTerm::Value(1)]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IntTerm {
    Value(i32),
    Feature(IntFeature),
    Mul(IntMul),
    Sum(IntSum),
}

impl IntTerm {
    /// Builds the normalized term `coefficient * feature`.
    pub fn mul(coefficient: i32, feature: IntFeature) -> IntTerm {
        match coefficient {
            0 => IntTerm::Value(0),
            1 => IntTerm::Feature(feature),
            _ => IntTerm::Mul(IntMul::new(coefficient, feature)),
        }
    }

    /// Builds the normalized sum of the given terms.
    ///
    /// # Errors
    ///
    /// Fails with [`PrlError::IntegerOverflow`] if the folded constants do
    /// not fit into an `i32`.
    pub fn sum(terms: impl IntoIterator<Item = IntTerm>) -> Result<IntTerm> {
        let mut operands = Vec::new();
        let mut offset: i32 = 0;
        for term in terms {
            let constant = match term {
                IntTerm::Value(v) => v,
                IntTerm::Feature(f) => {
                    operands.push(IntMul::new(1, f));
                    continue;
                }
                IntTerm::Mul(m) => {
                    operands.push(m);
                    continue;
                }
                IntTerm::Sum(s) => {
                    operands.extend(s.operands);
                    s.offset
                }
            };
            offset = offset.checked_add(constant).ok_or_else(|| {
                PrlError::IntegerOverflow(format!("{} + {}", offset, constant))
            })?;
        }
        Ok(Self::from_parts(operands, offset))
    }

    fn from_parts(operands: Vec<IntMul>, offset: i32) -> IntTerm {
        let mut operands: Vec<IntMul> = operands
            .into_iter()
            .filter(|m| m.coefficient != 0)
            .collect();
        match operands.len() {
            0 => IntTerm::Value(offset),
            1 if offset == 0 => {
                let m = operands.remove(0);
                IntTerm::mul(m.coefficient, m.feature)
            }
            _ => IntTerm::Sum(IntSum { operands, offset }),
        }
    }

    /// Value under the assignment, `None` if a referenced feature is unassigned.
    ///
    /// Computed in `i128`, which holds any linear term over `i32` operands.
    pub fn value(&self, assignment: &FeatureAssignment) -> Option<i128> {
        match self {
            IntTerm::Value(v) => Some(i128::from(*v)),
            IntTerm::Feature(f) => assignment.int_value(f).map(i128::from),
            IntTerm::Mul(m) => m.value(assignment),
            IntTerm::Sum(s) => s
                .operands
                .iter()
                .try_fold(i128::from(s.offset), |acc, m| {
                    m.value(assignment).map(|v| acc + v)
                }),
        }
    }

    pub fn as_value(&self) -> Option<i32> {
        match self {
            IntTerm::Value(v) => Some(*v),
            _ => None,
        }
    }

    pub fn normalize(&self) -> IntTerm {
        match self {
            IntTerm::Value(_) | IntTerm::Feature(_) => self.clone(),
            IntTerm::Mul(m) => IntTerm::mul(m.coefficient, m.feature.clone()),
            IntTerm::Sum(s) => Self::from_parts(s.operands.clone(), s.offset),
        }
    }

    /// Replaces assigned features by their values.
    ///
    /// A weighted feature whose contribution does not fit into the `i32`
    /// offset stays unassigned in the result.
    pub fn restrict(&self, assignment: &FeatureAssignment) -> IntTerm {
        match self {
            IntTerm::Value(_) => self.clone(),
            IntTerm::Feature(f) => assignment
                .int_value(f)
                .map_or_else(|| self.clone(), IntTerm::Value),
            IntTerm::Mul(m) => match assignment
                .int_value(&m.feature)
                .and_then(|v| m.checked_value(v))
            {
                Some(v) => IntTerm::Value(v),
                None => IntTerm::mul(m.coefficient, m.feature.clone()),
            },
            IntTerm::Sum(s) => {
                let mut offset = s.offset;
                let mut operands = Vec::with_capacity(s.operands.len());
                for m in &s.operands {
                    let folded = assignment
                        .int_value(&m.feature)
                        .and_then(|v| m.checked_value(v))
                        .and_then(|v| offset.checked_add(v));
                    match folded {
                        Some(sum) => offset = sum,
                        None => operands.push(m.clone()),
                    }
                }
                Self::from_parts(operands, offset)
            }
        }
    }

    pub fn rename(&self, renaming: &FeatureRenaming) -> IntTerm {
        let rename_mul =
            |m: &IntMul| IntMul::new(m.coefficient, renaming.rename_int(&m.feature));
        match self {
            IntTerm::Value(_) => self.clone(),
            IntTerm::Feature(f) => IntTerm::Feature(renaming.rename_int(f)),
            IntTerm::Mul(m) => IntTerm::Mul(rename_mul(m)),
            IntTerm::Sum(s) => IntTerm::Sum(IntSum {
                operands: s.operands.iter().map(rename_mul).collect(),
                offset: s.offset,
            }),
        }
    }

    pub fn features(&self) -> BTreeSet<IntFeature> {
        match self {
            IntTerm::Value(_) => BTreeSet::new(),
            IntTerm::Feature(f) => BTreeSet::from([f.clone()]),
            IntTerm::Mul(m) => BTreeSet::from([m.feature.clone()]),
            IntTerm::Sum(s) => s.operands.iter().map(|m| m.feature.clone()).collect(),
        }
    }

    /// Decomposes the term into weighted features and a constant offset.
    pub fn linear(&self) -> (Vec<(i32, &IntFeature)>, i32) {
        match self {
            IntTerm::Value(v) => (Vec::new(), *v),
            IntTerm::Feature(f) => (vec![(1, f)], 0),
            IntTerm::Mul(m) => (vec![(m.coefficient, &m.feature)], 0),
            IntTerm::Sum(s) => (
                s.operands
                    .iter()
                    .map(|m| (m.coefficient, &m.feature))
                    .collect(),
                s.offset,
            ),
        }
    }
}

impl From<IntFeature> for IntTerm {
    fn from(feature: IntFeature) -> Self {
        IntTerm::Feature(feature)
    }
}

impl From<i32> for IntTerm {
    fn from(value: i32) -> Self {
        IntTerm::Value(value)
    }
}

impl fmt::Display for IntMul {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.coefficient {
            1 => write!(f, "{}", self.feature),
            -1 => write!(f, "-{}", self.feature),
            c => write!(f, "{}*{}", c, self.feature),
        }
    }
}

impl fmt::Display for IntTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntTerm::Value(v) => write!(f, "{}", v),
            IntTerm::Feature(feature) => write!(f, "{}", feature),
            IntTerm::Mul(m) => write!(f, "{}", m),
            IntTerm::Sum(s) => {
                for (i, m) in s.operands.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" + ")?;
                    }
                    write!(f, "{}", m)?;
                }
                if s.offset != 0 {
                    if !s.operands.is_empty() {
                        f.write_str(" + ")?;
                    }
                    write!(f, "{}", s.offset)?;
                }
                Ok(())
            }
        }
    }
}
