//! Versioned boolean features.
//!
//! A versioned feature `f` whose predicates reference versions up to `max`
//! gets one install variable `@VER_i_<f>_<v>` per version `1..=max`, at most
//! one of which is true, and `f` holds iff one of them does. Version ranges
//! are expressed through two chains of helper variables per feature:
//! `@VER_ig_<f>_<v>` (installed with a version `>= v`) and
//! `@VER_il_<f>_<v>` (installed with a version `<= v`).

use std::collections::{BTreeMap, BTreeSet};

use prl_core::{BooleanFeature, ComparisonOperator, Constraint, Rule};

use crate::logic::{self, EncodedFormula, FormulaFactory};
use crate::translation::{PrlProposition, RuleInformation, RuleType};

pub const VERSION_FEATURE_PREFIX: &str = "@VER";
const PREFIX_INSTALL: &str = "@VER_i";
const PREFIX_INSTALL_GE: &str = "@VER_ig";
const PREFIX_INSTALL_LE: &str = "@VER_il";

/// Install variables per versioned feature code and version.
pub type VersionMapping = BTreeMap<String, BTreeMap<i32, String>>;

/// The highest version each versioned feature has to distinguish.
///
/// A predicate `f > v` needs version `v + 1`, `f < v` needs `v - 1`, all
/// other comparisons need `v` itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionStore {
    used_values: BTreeMap<String, i32>,
}

impl VersionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rules<'r>(rules: impl IntoIterator<Item = &'r Rule>) -> Self {
        let mut store = Self::new();
        for rule in rules {
            for constraint in rule.constraints() {
                for predicate in constraint.predicates() {
                    if let Constraint::Version {
                        feature,
                        op,
                        version,
                    } = predicate
                    {
                        store.add_usage(feature, *op, *version);
                    }
                }
            }
        }
        store
    }

    pub fn add_usage(&mut self, feature: &BooleanFeature, op: ComparisonOperator, version: i32) {
        let needed = match op {
            ComparisonOperator::Gt => version.saturating_add(1),
            ComparisonOperator::Lt => version - 1,
            _ => version,
        };
        let max = self.used_values.entry(feature.code.clone()).or_insert(needed);
        *max = (*max).max(needed);
    }

    /// Keeps only the features whose code satisfies `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.used_values.retain(|code, _| keep(code));
    }

    pub fn max_version(&self, code: &str) -> Option<i32> {
        self.used_values.get(code).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.used_values.is_empty()
    }

    /// Features with at least one version to distinguish.
    pub fn features(&self) -> impl Iterator<Item = (&str, i32)> {
        self.used_values
            .iter()
            .filter(|(_, max)| **max >= 1)
            .map(|(code, max)| (code.as_str(), *max))
    }
}

/// Name of the variable for `code` installed in exactly `version`.
pub fn installed(code: &str, version: i32) -> String {
    format!("{}_{}_{}", PREFIX_INSTALL, code, version)
}

fn installed_ge(code: &str, version: i32) -> String {
    format!("{}_{}_{}", PREFIX_INSTALL_GE, code, version)
}

fn installed_le(code: &str, version: i32) -> String {
    format!("{}_{}_{}", PREFIX_INSTALL_LE, code, version)
}

pub fn version_mapping(store: &VersionStore) -> VersionMapping {
    store
        .features()
        .map(|(code, max)| {
            let versions = (1..=max).map(|v| (v, installed(code, v))).collect();
            (code.to_string(), versions)
        })
        .collect()
}

/// The `>=` and `<=` helper variables of all features.
pub fn helper_variables(store: &VersionStore) -> BTreeSet<String> {
    store
        .features()
        .flat_map(|(code, max)| {
            (1..=max).flat_map(move |v| [installed_ge(code, v), installed_le(code, v)])
        })
        .collect()
}

/// Translates `feature op version`.
///
/// `max` is the highest version of the feature in the slice, `None` if the
/// feature is not instantiated there. With `helpers` the range helper
/// variables are used, otherwise ranges become disjunctions of install
/// variables.
///
/// `!=` against a version above `max` translates to the feature variable
/// itself and so admits every installed version; this loose form is kept
/// for compatibility with existing rule files.
pub fn translate_version_comparison(
    f: &FormulaFactory,
    max: Option<i32>,
    helpers: bool,
    feature: &BooleanFeature,
    op: ComparisonOperator,
    version: i32,
) -> EncodedFormula {
    let Some(max) = max else {
        return f.falsum();
    };
    let code = feature.code.as_str();
    let installs = |range: std::ops::RangeInclusive<i32>| {
        let names: Vec<String> = range.map(|w| installed(code, w)).collect();
        logic::any(f, names.iter().map(String::as_str))
    };
    let ge = |v: i32| {
        if v <= 1 {
            f.variable(code)
        } else if v > max {
            f.falsum()
        } else if helpers {
            f.variable(&installed_ge(code, v))
        } else {
            installs(v..=max)
        }
    };
    let le = |v: i32| {
        if v < 1 {
            f.falsum()
        } else if v >= max {
            f.variable(code)
        } else if helpers {
            f.variable(&installed_le(code, v))
        } else {
            installs(1..=v)
        }
    };
    match op {
        ComparisonOperator::Eq if (1..=max).contains(&version) => {
            f.variable(&installed(code, version))
        }
        ComparisonOperator::Eq => f.falsum(),
        ComparisonOperator::Ne => f.or(&[le(version - 1), ge(version.saturating_add(1))]),
        ComparisonOperator::Lt => le(version - 1),
        ComparisonOperator::Le => le(version),
        ComparisonOperator::Gt => ge(version.saturating_add(1)),
        ComparisonOperator::Ge => ge(version),
    }
}

/// Helper definitions, at-most-one constraints and feature equivalences.
pub fn version_propositions(
    f: &FormulaFactory,
    store: &VersionStore,
    slice_set: Option<usize>,
) -> Vec<PrlProposition> {
    let mut propositions = Vec::new();
    for (code, max) in store.features() {
        for v in 1..=max {
            let next_ge = if v < max {
                f.variable(&installed_ge(code, v + 1))
            } else {
                f.falsum()
            };
            let previous_le = if v > 1 {
                f.variable(&installed_le(code, v - 1))
            } else {
                f.falsum()
            };
            let install = f.variable(&installed(code, v));
            let formula = f.and(&[
                f.equivalence(
                    f.variable(&installed_ge(code, v)),
                    f.or(&[install, next_ge]),
                ),
                f.equivalence(
                    f.variable(&installed_le(code, v)),
                    f.or(&[install, previous_le]),
                ),
            ]);
            propositions.push(PrlProposition::new(
                RuleInformation::of_type(RuleType::VersionIntervalVariable, slice_set),
                formula,
            ));
        }
        let installs: Vec<String> = (1..=max).map(|v| installed(code, v)).collect();
        propositions.push(PrlProposition::new(
            RuleInformation::of_type(RuleType::VersionAmoConstraint, slice_set),
            logic::amo(f, installs.iter().map(String::as_str)),
        ));
        propositions.push(PrlProposition::new(
            RuleInformation::of_type(RuleType::VersionEquivalence, slice_set),
            f.equivalence(f.variable(code), logic::any(f, installs.iter().map(String::as_str))),
        ));
    }
    propositions
}
