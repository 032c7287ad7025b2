//! Shared test infrastructure for transpiler tests.
//!
//! Re-exports the rule-file fixtures from prl-test and adds brute-force
//! reasoning over formulas.

use std::collections::{BTreeMap, BTreeSet};

use prl_compiler::syntax::PrlRuleFile;
use prl_config::PrlConfig;
use prl_core::{Feature, FeatureAssignment};

pub use prl_test::rule_file::{and, compare, enum_eq, feature, in_range, int_property, or};
pub use prl_test::{compile, feature_assignments, samples, subsets, RuleFileBuilder};

use crate::logic::{is_falsum, restrict, variable_names, EncodedFormula, FormulaFactory};
use crate::translation::{ModelTranslation, TranslationInfo};
use crate::transpiler::transpile_model;

/// Compiles and transpiles a rule file without slice selection.
pub fn transpile(f: &FormulaFactory, file: &PrlRuleFile) -> ModelTranslation {
    let model = compile(file);
    transpile_model(f, &model, &[], &PrlConfig::default()).expect("model transpiles")
}

fn names(variables: &[&str]) -> Vec<String> {
    variables.iter().map(|v| v.to_string()).collect()
}

/// Calls `found` for every total assignment of `variables` (extending
/// `values`) satisfying `formula`; stops as soon as `found` returns false.
///
/// `formula` must already be restricted to `values`.
fn search(
    f: &FormulaFactory,
    formula: EncodedFormula,
    variables: &[String],
    values: &mut BTreeMap<String, bool>,
    found: &mut dyn FnMut(&BTreeMap<String, bool>) -> bool,
) -> bool {
    if is_falsum(f, formula) {
        return true;
    }
    let Some((variable, rest)) = variables.split_first() else {
        return found(values);
    };
    for value in [false, true] {
        let step = BTreeMap::from([(variable.clone(), value)]);
        values.insert(variable.clone(), value);
        if !search(f, restrict(f, formula, &step), rest, values, found) {
            values.remove(variable);
            return false;
        }
    }
    values.remove(variable);
    true
}

/// The projections of all models of `formula` to `variables`.
///
/// Variables of the formula outside `variables` are existentially
/// quantified.
pub fn enumerate_models(
    f: &FormulaFactory,
    formula: EncodedFormula,
    variables: &[&str],
) -> BTreeSet<BTreeSet<String>> {
    let projected = names(variables);
    let mut order = projected.clone();
    order.extend(
        variable_names(f, formula)
            .into_iter()
            .filter(|v| !projected.contains(v)),
    );
    let mut models = BTreeSet::new();
    search(f, formula, &order, &mut BTreeMap::new(), &mut |values| {
        models.insert(
            projected
                .iter()
                .filter(|v| values.get(*v).copied().unwrap_or(false))
                .cloned()
                .collect(),
        );
        true
    });
    models
}

pub fn is_satisfiable(f: &FormulaFactory, formula: EncodedFormula) -> bool {
    satisfiable_with(f, formula, &BTreeMap::new())
}

pub fn is_tautology(f: &FormulaFactory, formula: EncodedFormula) -> bool {
    !is_satisfiable(f, f.not(formula))
}

/// Whether `formula` has a model extending the `fixed` values.
pub fn satisfiable_with(
    f: &FormulaFactory,
    formula: EncodedFormula,
    fixed: &BTreeMap<String, bool>,
) -> bool {
    let formula = restrict(f, formula, fixed);
    let free: Vec<String> = variable_names(f, formula).into_iter().collect();
    let mut values = fixed.clone();
    let mut satisfiable = false;
    search(f, formula, &free, &mut values, &mut |_| {
        satisfiable = true;
        false
    });
    satisfiable
}

/// The values of all variables a feature assignment fixes in a translation.
///
/// Known variables without a counterpart in the assignment are false.
pub fn encode_assignment(
    info: &TranslationInfo,
    assignment: &FeatureAssignment,
) -> BTreeMap<String, bool> {
    let mut encoded: BTreeMap<String, bool> = info
        .known_variables
        .iter()
        .map(|v| (v.clone(), false))
        .collect();
    for definition in info.instantiation.definitions() {
        match definition.feature() {
            Feature::Boolean(feature) if feature.versioned => {
                let version = assignment.version(&feature).unwrap_or(0);
                encoded.insert(feature.code.clone(), version > 0);
                if let Some(versions) = info.version_mapping.get(&feature.code) {
                    for (v, variable) in versions {
                        encoded.insert(variable.clone(), *v == version);
                    }
                }
            }
            Feature::Boolean(feature) => {
                let value = assignment.boolean(&feature).unwrap_or(false);
                encoded.insert(feature.code.clone(), value);
            }
            Feature::Enum(feature) => {
                if let Some(values) = info.enum_mapping.get(&feature.code) {
                    for (value, variable) in values {
                        let selected = assignment.enum_value(&feature) == Some(value.as_str());
                        encoded.insert(variable.clone(), selected);
                    }
                }
            }
            Feature::Int(feature) => {
                if let (Some(variable), Some(value)) = (
                    info.integer_variables.get(&feature.code),
                    assignment.int_value(&feature),
                ) {
                    for (bound, order) in variable.order_variables() {
                        encoded.insert(order, value <= bound);
                    }
                }
            }
        }
    }
    encoded
}
