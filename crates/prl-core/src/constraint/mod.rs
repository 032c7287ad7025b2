//! The constraint algebra.
//!
//! Constraints are immutable expression trees over boolean, versioned
//! boolean, enum and integer features. The constructors on [`Constraint`]
//! apply the unconditional simplifications (double negation, flattening of
//! nested conjunctions and disjunctions, trivial cardinality constraints);
//! [`Constraint::restrict`] and [`Constraint::syntactic_simplify`] fold
//! constants further.

mod display;
mod simplify;
mod term;

#[cfg(test)]
mod tests;

use std::collections::{BTreeMap, BTreeSet};

pub(crate) use simplify::fold_equivalence;
pub use term::{IntMul, IntSum, IntTerm};

use crate::feature::{BooleanFeature, EnumFeature, Feature, IntFeature};
use crate::operator::ComparisonOperator;
use crate::property::IntRange;
use crate::renaming::FeatureRenaming;

/// A constraint over features.
///
/// # Example
///
/// ```
/// use prl_core::{BooleanFeature, Constraint};
///
/// let a = Constraint::from(BooleanFeature::new("a"));
/// let b = Constraint::from(BooleanFeature::new("b"));
///
/// assert_eq!(a.clone().not().not(), a);
/// assert_eq!(Constraint::and([]), Constraint::TRUE);
/// assert_eq!(Constraint::or([]), Constraint::FALSE);
///
/// let c = Constraint::and([a.clone(), Constraint::and([b.clone(), a.clone()])]);
/// assert_eq!(c, Constraint::and([a, b]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Constraint {
    Constant(bool),
    Boolean(BooleanFeature),
    Not(Box<Constraint>),
    Implication(Box<Constraint>, Box<Constraint>),
    Equivalence(Box<Constraint>, Box<Constraint>),
    And(BTreeSet<Constraint>),
    Or(BTreeSet<Constraint>),
    Amo(BTreeSet<BooleanFeature>),
    Exo(BTreeSet<BooleanFeature>),
    EnumComparison {
        feature: EnumFeature,
        value: String,
        op: ComparisonOperator,
    },
    EnumIn {
        feature: EnumFeature,
        values: BTreeSet<String>,
    },
    IntComparison {
        left: IntTerm,
        right: IntTerm,
        op: ComparisonOperator,
    },
    IntIn {
        term: IntTerm,
        range: IntRange,
    },
    Version {
        feature: BooleanFeature,
        op: ComparisonOperator,
        version: i32,
    },
}

impl From<BooleanFeature> for Constraint {
    fn from(feature: BooleanFeature) -> Self {
        Constraint::Boolean(feature)
    }
}

impl Constraint {
    pub const TRUE: Constraint = Constraint::Constant(true);
    pub const FALSE: Constraint = Constraint::Constant(false);

    pub fn constant(value: bool) -> Constraint {
        Constraint::Constant(value)
    }

    pub fn boolean(code: impl Into<String>) -> Constraint {
        Constraint::Boolean(BooleanFeature::new(code))
    }

    /// Negation; folds constants and double negations.
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Constraint {
        match self {
            Constraint::Constant(v) => Constraint::Constant(!v),
            Constraint::Not(operand) => *operand,
            other => Constraint::Not(Box::new(other)),
        }
    }

    pub fn implication(left: Constraint, right: Constraint) -> Constraint {
        Constraint::Implication(Box::new(left), Box::new(right))
    }

    pub fn equivalence(left: Constraint, right: Constraint) -> Constraint {
        Constraint::Equivalence(Box::new(left), Box::new(right))
    }

    /// Conjunction; nested conjunctions are flattened and duplicates dropped.
    pub fn and(operands: impl IntoIterator<Item = Constraint>) -> Constraint {
        let mut ops = BTreeSet::new();
        for operand in operands {
            match operand {
                Constraint::And(inner) => ops.extend(inner),
                other => {
                    ops.insert(other);
                }
            }
        }
        match ops.len() {
            0 => Constraint::TRUE,
            1 => ops.pop_first().unwrap_or(Constraint::TRUE),
            _ => Constraint::And(ops),
        }
    }

    /// Disjunction; nested disjunctions are flattened and duplicates dropped.
    pub fn or(operands: impl IntoIterator<Item = Constraint>) -> Constraint {
        let mut ops = BTreeSet::new();
        for operand in operands {
            match operand {
                Constraint::Or(inner) => ops.extend(inner),
                other => {
                    ops.insert(other);
                }
            }
        }
        match ops.len() {
            0 => Constraint::FALSE,
            1 => ops.pop_first().unwrap_or(Constraint::FALSE),
            _ => Constraint::Or(ops),
        }
    }

    /// At most one of the features is true.
    pub fn amo(features: impl IntoIterator<Item = BooleanFeature>) -> Constraint {
        let features: BTreeSet<BooleanFeature> = features.into_iter().collect();
        if features.len() <= 1 {
            Constraint::TRUE
        } else {
            Constraint::Amo(features)
        }
    }

    /// Exactly one of the features is true.
    pub fn exo(features: impl IntoIterator<Item = BooleanFeature>) -> Constraint {
        let mut features: BTreeSet<BooleanFeature> = features.into_iter().collect();
        match features.len() {
            0 => Constraint::FALSE,
            1 => features
                .pop_first()
                .map_or(Constraint::FALSE, Constraint::Boolean),
            _ => Constraint::Exo(features),
        }
    }

    pub fn enum_eq(feature: EnumFeature, value: impl Into<String>) -> Constraint {
        Self::enum_comparison(feature, value, ComparisonOperator::Eq)
    }

    pub fn enum_ne(feature: EnumFeature, value: impl Into<String>) -> Constraint {
        Self::enum_comparison(feature, value, ComparisonOperator::Ne)
    }

    /// Enum comparison; only `=` and `!=` are meaningful.
    pub fn enum_comparison(
        feature: EnumFeature,
        value: impl Into<String>,
        op: ComparisonOperator,
    ) -> Constraint {
        Constraint::EnumComparison {
            feature,
            value: value.into(),
            op,
        }
    }

    pub fn enum_in<S: Into<String>>(
        feature: EnumFeature,
        values: impl IntoIterator<Item = S>,
    ) -> Constraint {
        Constraint::EnumIn {
            feature,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn int_comparison(
        left: impl Into<IntTerm>,
        right: impl Into<IntTerm>,
        op: ComparisonOperator,
    ) -> Constraint {
        Constraint::IntComparison {
            left: left.into(),
            right: right.into(),
            op,
        }
    }

    pub fn int_in(term: impl Into<IntTerm>, range: IntRange) -> Constraint {
        Constraint::IntIn {
            term: term.into(),
            range,
        }
    }

    pub fn version(feature: BooleanFeature, op: ComparisonOperator, version: i32) -> Constraint {
        Constraint::Version {
            feature,
            op,
            version,
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Constraint::Constant(_))
    }

    pub fn is_true(&self) -> bool {
        matches!(self, Constraint::Constant(true))
    }

    pub fn is_false(&self) -> bool {
        matches!(self, Constraint::Constant(false))
    }

    /// True for constants, boolean atoms and predicates.
    pub fn is_atom(&self) -> bool {
        matches!(
            self,
            Constraint::Constant(_)
                | Constraint::Boolean(_)
                | Constraint::EnumComparison { .. }
                | Constraint::EnumIn { .. }
                | Constraint::IntComparison { .. }
                | Constraint::IntIn { .. }
                | Constraint::Version { .. }
        )
    }

    /// True for enum, integer and version predicates.
    pub fn is_predicate(&self) -> bool {
        matches!(
            self,
            Constraint::EnumComparison { .. }
                | Constraint::EnumIn { .. }
                | Constraint::IntComparison { .. }
                | Constraint::IntIn { .. }
                | Constraint::Version { .. }
        )
    }

    pub fn is_int_predicate(&self) -> bool {
        matches!(
            self,
            Constraint::IntComparison { .. } | Constraint::IntIn { .. }
        )
    }

    /// All predicates of the constraint, in traversal order.
    pub fn predicates(&self) -> Vec<&Constraint> {
        let mut result = Vec::new();
        self.collect_predicates(&mut result);
        result
    }

    fn collect_predicates<'a>(&'a self, result: &mut Vec<&'a Constraint>) {
        match self {
            Constraint::Not(operand) => operand.collect_predicates(result),
            Constraint::Implication(l, r) | Constraint::Equivalence(l, r) => {
                l.collect_predicates(result);
                r.collect_predicates(result);
            }
            Constraint::And(ops) | Constraint::Or(ops) => {
                ops.iter().for_each(|op| op.collect_predicates(result))
            }
            c if c.is_predicate() => result.push(c),
            _ => {}
        }
    }

    /// All features referenced by the constraint.
    pub fn features(&self) -> BTreeSet<Feature> {
        let mut result = BTreeSet::new();
        self.collect_features(&mut result);
        result
    }

    fn collect_features(&self, result: &mut BTreeSet<Feature>) {
        match self {
            Constraint::Constant(_) => {}
            Constraint::Boolean(f) => {
                result.insert(Feature::Boolean(f.clone()));
            }
            Constraint::Not(operand) => operand.collect_features(result),
            Constraint::Implication(l, r) | Constraint::Equivalence(l, r) => {
                l.collect_features(result);
                r.collect_features(result);
            }
            Constraint::And(ops) | Constraint::Or(ops) => {
                ops.iter().for_each(|op| op.collect_features(result))
            }
            Constraint::Amo(fs) | Constraint::Exo(fs) => {
                result.extend(fs.iter().cloned().map(Feature::Boolean))
            }
            Constraint::EnumComparison { feature, .. } | Constraint::EnumIn { feature, .. } => {
                result.insert(Feature::Enum(feature.clone()));
            }
            Constraint::IntComparison { left, right, .. } => {
                result.extend(left.features().into_iter().map(Feature::Int));
                result.extend(right.features().into_iter().map(Feature::Int));
            }
            Constraint::IntIn { term, .. } => {
                result.extend(term.features().into_iter().map(Feature::Int))
            }
            Constraint::Version { feature, .. } => {
                result.insert(Feature::Boolean(feature.clone()));
            }
        }
    }

    /// Boolean features used as atoms or in cardinality constraints.
    ///
    /// Features only referenced in version predicates are not included.
    pub fn boolean_features(&self) -> BTreeSet<BooleanFeature> {
        let mut result = BTreeSet::new();
        self.visit(&mut |c| match c {
            Constraint::Boolean(f) => {
                result.insert(f.clone());
            }
            Constraint::Amo(fs) | Constraint::Exo(fs) => result.extend(fs.iter().cloned()),
            _ => {}
        });
        result
    }

    pub fn enum_features(&self) -> BTreeSet<EnumFeature> {
        self.enum_values().into_keys().collect()
    }

    /// Enum features mapped to the values they are compared with.
    pub fn enum_values(&self) -> BTreeMap<EnumFeature, BTreeSet<String>> {
        let mut result: BTreeMap<EnumFeature, BTreeSet<String>> = BTreeMap::new();
        self.visit(&mut |c| match c {
            Constraint::EnumComparison { feature, value, .. } => {
                result
                    .entry(feature.clone())
                    .or_default()
                    .insert(value.clone());
            }
            Constraint::EnumIn { feature, values } => {
                result
                    .entry(feature.clone())
                    .or_default()
                    .extend(values.iter().cloned());
            }
            _ => {}
        });
        result
    }

    pub fn int_features(&self) -> BTreeSet<IntFeature> {
        let mut result = BTreeSet::new();
        self.visit(&mut |c| match c {
            Constraint::IntComparison { left, right, .. } => {
                result.extend(left.features());
                result.extend(right.features());
            }
            Constraint::IntIn { term, .. } => result.extend(term.features()),
            _ => {}
        });
        result
    }

    /// Whether a versioned feature occurs anywhere in the constraint.
    pub fn contains_versioned(&self) -> bool {
        let mut found = false;
        self.visit(&mut |c| match c {
            Constraint::Boolean(f) => found |= f.versioned,
            Constraint::Amo(fs) | Constraint::Exo(fs) => found |= fs.iter().any(|f| f.versioned),
            Constraint::Version { .. } => found = true,
            _ => {}
        });
        found
    }

    fn visit(&self, f: &mut impl FnMut(&Constraint)) {
        f(self);
        match self {
            Constraint::Not(operand) => operand.visit(f),
            Constraint::Implication(l, r) | Constraint::Equivalence(l, r) => {
                l.visit(f);
                r.visit(f);
            }
            Constraint::And(ops) | Constraint::Or(ops) => ops.iter().for_each(|op| op.visit(f)),
            _ => {}
        }
    }

    /// Applies a feature renaming.
    pub fn rename(&self, renaming: &FeatureRenaming) -> Constraint {
        match self {
            Constraint::Constant(_) => self.clone(),
            Constraint::Boolean(f) => Constraint::Boolean(renaming.rename_boolean(f)),
            Constraint::Not(operand) => operand.rename(renaming).not(),
            Constraint::Implication(l, r) => {
                Constraint::implication(l.rename(renaming), r.rename(renaming))
            }
            Constraint::Equivalence(l, r) => {
                Constraint::equivalence(l.rename(renaming), r.rename(renaming))
            }
            Constraint::And(ops) => Constraint::and(ops.iter().map(|op| op.rename(renaming))),
            Constraint::Or(ops) => Constraint::or(ops.iter().map(|op| op.rename(renaming))),
            Constraint::Amo(fs) => Constraint::amo(fs.iter().map(|f| renaming.rename_boolean(f))),
            Constraint::Exo(fs) => Constraint::exo(fs.iter().map(|f| renaming.rename_boolean(f))),
            Constraint::EnumComparison { feature, value, op } => Constraint::EnumComparison {
                feature: renaming.rename_enum(feature),
                value: renaming.rename_enum_value(feature, value),
                op: *op,
            },
            Constraint::EnumIn { feature, values } => Constraint::EnumIn {
                feature: renaming.rename_enum(feature),
                values: values
                    .iter()
                    .map(|v| renaming.rename_enum_value(feature, v))
                    .collect(),
            },
            Constraint::IntComparison { left, right, op } => Constraint::IntComparison {
                left: left.rename(renaming),
                right: right.rename(renaming),
                op: *op,
            },
            Constraint::IntIn { term, range } => Constraint::IntIn {
                term: term.rename(renaming),
                range: range.clone(),
            },
            Constraint::Version {
                feature,
                op,
                version,
            } => Constraint::Version {
                feature: renaming.rename_boolean(feature),
                op: *op,
                version: *version,
            },
        }
    }
}
