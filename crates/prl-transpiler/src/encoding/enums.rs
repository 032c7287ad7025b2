//! Enum features as one boolean variable per value.

use std::collections::{BTreeMap, BTreeSet};

use prl_core::{ComparisonOperator, EnumFeature};

use crate::logic::{self, EncodedFormula, FormulaFactory};

pub const ENUM_FEATURE_PREFIX: &str = "@ENUM";

/// Value variables per enum feature code.
pub type EnumMapping = BTreeMap<String, BTreeMap<String, String>>;

/// Name of the variable for `feature = value`.
pub fn enum_variable(feature: &str, value: &str) -> String {
    format!(
        "{}_{}_{}",
        ENUM_FEATURE_PREFIX,
        feature.replace(' ', "_").replace('.', "#"),
        value.replace(' ', "_")
    )
}

/// Translates `feature op value`.
///
/// A feature without instantiation is false; a value outside the declared
/// values makes `=` false and `!=` true.
pub fn translate_enum_comparison(
    f: &FormulaFactory,
    mapping: &EnumMapping,
    feature: &EnumFeature,
    value: &str,
    op: ComparisonOperator,
) -> EncodedFormula {
    let Some(values) = mapping.get(&feature.code) else {
        return f.falsum();
    };
    match values.get(value) {
        Some(variable) => f.literal(variable, op == ComparisonOperator::Eq),
        None => f.constant(op != ComparisonOperator::Eq),
    }
}

/// Translates `feature in [values]`.
pub fn translate_enum_in(
    f: &FormulaFactory,
    mapping: &EnumMapping,
    feature: &EnumFeature,
    values: &BTreeSet<String>,
) -> EncodedFormula {
    let Some(known) = mapping.get(&feature.code) else {
        return f.falsum();
    };
    logic::any(f, values.iter().filter_map(|v| known.get(v)).map(String::as_str))
}
