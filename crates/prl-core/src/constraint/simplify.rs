//! Evaluation, restriction and syntactic simplification of constraints.

use std::collections::BTreeSet;

use super::Constraint;
use crate::assignment::FeatureAssignment;
use crate::feature::BooleanFeature;
use crate::operator::ComparisonOperator;

impl Constraint {
    /// Evaluates the constraint.
    ///
    /// Unassigned boolean features are false. An unassigned enum feature
    /// satisfies only `!=` comparisons, and predicates over unassigned
    /// integer or versioned features are false.
    pub fn evaluate(&self, assignment: &FeatureAssignment) -> bool {
        match self {
            Constraint::Constant(v) => *v,
            Constraint::Boolean(f) => assignment.boolean(f).unwrap_or(false),
            Constraint::Not(operand) => !operand.evaluate(assignment),
            Constraint::Implication(l, r) => !l.evaluate(assignment) || r.evaluate(assignment),
            Constraint::Equivalence(l, r) => l.evaluate(assignment) == r.evaluate(assignment),
            Constraint::And(ops) => ops.iter().all(|op| op.evaluate(assignment)),
            Constraint::Or(ops) => ops.iter().any(|op| op.evaluate(assignment)),
            Constraint::Amo(fs) => count_true(fs, assignment) <= 1,
            Constraint::Exo(fs) => count_true(fs, assignment) == 1,
            Constraint::EnumComparison { feature, value, op } => {
                match assignment.enum_value(feature) {
                    Some(assigned) => enum_holds(*op, assigned, value),
                    None => *op == ComparisonOperator::Ne,
                }
            }
            Constraint::EnumIn { feature, values } => assignment
                .enum_value(feature)
                .is_some_and(|v| values.contains(v)),
            Constraint::IntComparison { left, right, op } => {
                match (left.value(assignment), right.value(assignment)) {
                    (Some(l), Some(r)) => op.evaluate(&l, &r),
                    _ => false,
                }
            }
            Constraint::IntIn { term, range } => term
                .value(assignment)
                .and_then(|v| i32::try_from(v).ok())
                .is_some_and(|v| range.contains(&v)),
            Constraint::Version {
                feature,
                op,
                version,
            } => assignment
                .version(feature)
                .is_some_and(|v| version_holds(v, *op, *version)),
        }
    }

    /// Substitutes the assigned features and folds the result.
    ///
    /// For every extension `a'` of `assignment`, the restricted constraint
    /// evaluates under `a'` like the original one.
    pub fn restrict(&self, assignment: &FeatureAssignment) -> Constraint {
        match self {
            Constraint::Constant(_) => self.clone(),
            Constraint::Boolean(f) => match assignment.boolean(f) {
                Some(v) => Constraint::Constant(v),
                None => self.clone(),
            },
            Constraint::Not(operand) => operand.restrict(assignment).not(),
            Constraint::Implication(l, r) => {
                fold_implication(l.restrict(assignment), r.restrict(assignment))
            }
            Constraint::Equivalence(l, r) => {
                fold_equivalence(l.restrict(assignment), r.restrict(assignment))
            }
            Constraint::And(ops) => {
                fold_and(ops.iter().map(|op| op.restrict(assignment).syntactic_simplify()))
            }
            Constraint::Or(ops) => {
                fold_or(ops.iter().map(|op| op.restrict(assignment).syntactic_simplify()))
            }
            Constraint::Amo(fs) => {
                let (num_true, unassigned) = restrict_features(fs, assignment);
                match num_true {
                    0 => Constraint::amo(unassigned),
                    1 => Constraint::and(unassigned.into_iter().map(|f| Constraint::Boolean(f).not())),
                    _ => Constraint::FALSE,
                }
            }
            Constraint::Exo(fs) => {
                let (num_true, unassigned) = restrict_features(fs, assignment);
                match num_true {
                    0 => Constraint::exo(unassigned),
                    1 => Constraint::and(unassigned.into_iter().map(|f| Constraint::Boolean(f).not())),
                    _ => Constraint::FALSE,
                }
            }
            Constraint::EnumComparison { feature, value, op } => {
                match assignment.enum_value(feature) {
                    Some(assigned) => Constraint::Constant(enum_holds(*op, assigned, value)),
                    None => self.clone(),
                }
            }
            Constraint::EnumIn { feature, values } => match assignment.enum_value(feature) {
                Some(assigned) => Constraint::Constant(values.contains(assigned)),
                None => self.clone(),
            },
            Constraint::IntComparison { left, right, op } => {
                fold_int_comparison(left.restrict(assignment), right.restrict(assignment), *op)
            }
            Constraint::IntIn { term, range } => {
                let term = term.restrict(assignment);
                match term.as_value() {
                    Some(v) => Constraint::Constant(range.contains(&v)),
                    None => Constraint::IntIn {
                        term,
                        range: range.clone(),
                    },
                }
            }
            Constraint::Version {
                feature,
                op,
                version,
            } => match assignment.version(feature) {
                Some(v) => Constraint::Constant(version_holds(v, *op, *version)),
                None => self.clone(),
            },
        }
    }

    /// Folds constants and trivial sub-expressions without an assignment.
    ///
    /// The operation is idempotent.
    pub fn syntactic_simplify(&self) -> Constraint {
        match self {
            Constraint::Constant(_)
            | Constraint::Boolean(_)
            | Constraint::EnumComparison { .. } => self.clone(),
            Constraint::Not(operand) => operand.syntactic_simplify().not(),
            Constraint::Implication(l, r) => {
                fold_implication(l.syntactic_simplify(), r.syntactic_simplify())
            }
            Constraint::Equivalence(l, r) => {
                fold_equivalence(l.syntactic_simplify(), r.syntactic_simplify())
            }
            Constraint::And(ops) => fold_and(ops.iter().map(Constraint::syntactic_simplify)),
            Constraint::Or(ops) => fold_or(ops.iter().map(Constraint::syntactic_simplify)),
            Constraint::Amo(fs) => Constraint::amo(fs.iter().cloned()),
            Constraint::Exo(fs) => Constraint::exo(fs.iter().cloned()),
            Constraint::EnumIn { values, .. } if values.is_empty() => Constraint::FALSE,
            Constraint::EnumIn { .. } => self.clone(),
            Constraint::IntComparison { left, right, op } => {
                fold_int_comparison(left.normalize(), right.normalize(), *op)
            }
            Constraint::IntIn { range, .. } if range.is_empty() => Constraint::FALSE,
            Constraint::IntIn { term, range } => {
                let term = term.normalize();
                match term.as_value() {
                    Some(v) => Constraint::Constant(range.contains(&v)),
                    None => Constraint::IntIn {
                        term,
                        range: range.clone(),
                    },
                }
            }
            Constraint::Version { op, version, .. } => match op {
                ComparisonOperator::Lt if *version <= 1 => Constraint::FALSE,
                ComparisonOperator::Le if *version <= 0 => Constraint::FALSE,
                _ => self.clone(),
            },
        }
    }
}

fn enum_holds(op: ComparisonOperator, assigned: &str, value: &str) -> bool {
    match op {
        ComparisonOperator::Eq => assigned == value,
        ComparisonOperator::Ne => assigned != value,
        _ => false,
    }
}

fn version_holds(assigned: i32, op: ComparisonOperator, version: i32) -> bool {
    assigned >= 1 && op.evaluate(&assigned, &version)
}

fn count_true(features: &BTreeSet<BooleanFeature>, assignment: &FeatureAssignment) -> usize {
    features
        .iter()
        .filter(|f| assignment.boolean(f).unwrap_or(false))
        .count()
}

fn restrict_features(
    features: &BTreeSet<BooleanFeature>,
    assignment: &FeatureAssignment,
) -> (usize, Vec<BooleanFeature>) {
    let mut num_true = 0;
    let mut unassigned = Vec::new();
    for feature in features {
        match assignment.boolean(feature) {
            Some(true) => num_true += 1,
            Some(false) => {}
            None => unassigned.push(feature.clone()),
        }
    }
    (num_true, unassigned)
}

pub(crate) fn fold_implication(left: Constraint, right: Constraint) -> Constraint {
    if left.is_false() || right.is_true() || left == right {
        Constraint::TRUE
    } else if left.is_true() {
        right
    } else if right.is_false() {
        left.not()
    } else {
        Constraint::implication(left, right)
    }
}

pub(crate) fn fold_equivalence(left: Constraint, right: Constraint) -> Constraint {
    if left.is_true() {
        right
    } else if right.is_true() {
        left
    } else if left.is_false() {
        right.not()
    } else if right.is_false() {
        left.not()
    } else if left == right {
        Constraint::TRUE
    } else {
        Constraint::equivalence(left, right)
    }
}

fn fold_and(operands: impl Iterator<Item = Constraint>) -> Constraint {
    let mut kept = Vec::new();
    for op in operands {
        if op.is_false() {
            return Constraint::FALSE;
        }
        if !op.is_true() {
            kept.push(op);
        }
    }
    Constraint::and(kept)
}

fn fold_or(operands: impl Iterator<Item = Constraint>) -> Constraint {
    let mut kept = Vec::new();
    for op in operands {
        if op.is_true() {
            return Constraint::TRUE;
        }
        if !op.is_false() {
            kept.push(op);
        }
    }
    Constraint::or(kept)
}

fn fold_int_comparison(
    left: super::IntTerm,
    right: super::IntTerm,
    op: ComparisonOperator,
) -> Constraint {
    match (left.as_value(), right.as_value()) {
        (Some(l), Some(r)) => Constraint::Constant(op.evaluate(&l, &r)),
        _ => Constraint::IntComparison { left, right, op },
    }
}
