//! Transpilation of compiled models into propositional formulas.
//!
//! A model is split into slice sets first; every slice set is then
//! translated on its own. All formulas are built in the caller's
//! [`FormulaFactory`], which the workers share. The integer encodings of all
//! integer feature definitions are computed once per model and shared
//! read-only between the workers.

mod translator;

#[cfg(test)]
mod tests;

use std::sync::Arc;
use std::time::Instant;

use prl_compiler::{PrlModel, SliceSet};
use prl_config::{PrlConfig, TranspilerConfig};
use prl_core::{Constraint, Rule, SliceSelection};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use tracing::{debug, info, warn};

pub(crate) use translator::Translator;

use crate::encoding::{
    collect_int_predicates, encode_int_predicate, enum_variable, helper_variables,
    version_mapping, version_propositions, IntegerEncodingStore, VersionStore,
};
use crate::error::{Result, TranspilerError};
use crate::logic::{self, EncodedFormula, FormulaFactory};
use crate::translation::{
    FeatureInstantiation, ModelTranslation, PrlProposition, RuleInformation, RuleType,
    SliceTranslation, TranslationInfo, TranspilerState,
};

/// Transpiles every slice set of a model.
///
/// # Errors
///
/// Fails if the selectors produce more slices than configured, an integer
/// domain is too large to encode or a rule uses an integer feature that has
/// no definition in its slice set.
///
/// # Example
///
/// ```
/// use prl_compiler::syntax::{PrlConstraint, PrlFeatureDefinition, PrlRule, PrlRuleFile, PrlRuleKind};
/// use prl_compiler::PrlCompiler;
/// use prl_config::PrlConfig;
/// use prl_transpiler::logic::FormulaFactory;
/// use prl_transpiler::transpile_model;
///
/// let mut rule_file = PrlRuleFile::default();
/// rule_file.rule_set.feature_definitions.push(PrlFeatureDefinition::boolean("a"));
/// rule_file.rule_set.rules.push(PrlRule::new(PrlRuleKind::Inclusion {
///     condition: PrlConstraint::feature("a"),
///     then: PrlConstraint::feature("a"),
/// }));
/// let mut compiler = PrlCompiler::new();
/// let model = compiler.compile(&rule_file);
///
/// let f = FormulaFactory::new();
/// let translation = transpile_model(&f, &model, &[], &PrlConfig::default()).unwrap();
/// assert_eq!(translation.len(), 1);
/// assert_eq!(translation.computations[0].info.formula(&f), f.verum());
/// ```
pub fn transpile_model(
    f: &FormulaFactory,
    model: &PrlModel,
    selectors: &[SliceSelection],
    config: &PrlConfig,
) -> Result<ModelTranslation> {
    transpile_model_with_constraints(f, model, selectors, &[], config)
}

/// Transpiles every slice set of a model with additional constraints.
///
/// The additional constraints hold in every slice set; their propositions
/// are tagged [`RuleType::AdditionalRestriction`].
pub fn transpile_model_with_constraints(
    f: &FormulaFactory,
    model: &PrlModel,
    selectors: &[SliceSelection],
    additional_constraints: &[Constraint],
    config: &PrlConfig,
) -> Result<ModelTranslation> {
    let start = Instant::now();
    let slice_sets = model.slice_sets(selectors, config.slicing.max_number_of_slices)?;
    let integer_encodings = Arc::new(IntegerEncodingStore::from_definitions(
        f,
        model.feature_store().all_definitions(),
    )?);
    let additional: Vec<Rule> = additional_constraints
        .iter()
        .map(|c| Rule::constraint(c.clone()).with_description("Additional Constraint"))
        .collect();

    let thread_count = config.transpiler.thread_count.num_threads();
    let transpile = |index: usize, slice_set: &SliceSet<'_>| {
        transpile_slice_set(
            f,
            slice_set,
            index,
            &integer_encodings,
            &additional,
            &config.transpiler,
        )
    };
    let computations = if thread_count == 1 || slice_sets.len() <= 1 {
        slice_sets
            .iter()
            .enumerate()
            .map(|(i, s)| transpile(i, s))
            .collect::<Result<Vec<_>>>()?
    } else {
        let pool = ThreadPoolBuilder::new().num_threads(thread_count).build()?;
        pool.install(|| {
            slice_sets
                .par_iter()
                .enumerate()
                .map(|(i, s)| transpile(i, s))
                .collect::<Result<Vec<_>>>()
        })?
    };

    let elapsed = start.elapsed();
    info!(
        event = "model_transpiled",
        slice_sets = computations.len(),
        integer_variables = integer_encodings.len(),
        duration_ms = elapsed.as_millis() as u64,
    );
    Ok(ModelTranslation::new(computations))
}

/// Transpiles one slice set.
///
/// `integer_encodings` must contain every integer definition of the slice
/// set; `additional` rules are translated after the rules of the slice set.
pub fn transpile_slice_set(
    f: &FormulaFactory,
    slice_set: &SliceSet<'_>,
    index: usize,
    integer_encodings: &Arc<IntegerEncodingStore>,
    additional: &[Rule],
    config: &TranspilerConfig,
) -> Result<SliceTranslation> {
    let start = Instant::now();
    let rules: Vec<&Rule> = slice_set.rules.iter().copied().chain(additional).collect();
    let instantiation = FeatureInstantiation::from_definitions(slice_set.definitions.iter().copied());

    let mut versions = VersionStore::from_rules(rules.iter().copied());
    versions.retain(|code| instantiation.boolean.contains_key(code));

    let mut state = TranspilerState {
        integer_encodings: Arc::clone(integer_encodings),
        ..TranspilerState::default()
    };
    state.unknown_features = rules
        .iter()
        .flat_map(|r| r.features())
        .filter(|feature| !instantiation.contains(feature))
        .collect();
    state.boolean_variables = instantiation.boolean.keys().cloned().collect();
    state.enum_mapping = instantiation
        .enums
        .values()
        .map(|d| {
            let values = d
                .enum_values()
                .into_iter()
                .flatten()
                .map(|v| (v.clone(), enum_variable(&d.code, v)))
                .collect();
            (d.code.clone(), values)
        })
        .collect();
    state.version_mapping = version_mapping(&versions);
    state.local_variables = helper_variables(&versions);
    state.int_predicate_mapping = collect_int_predicates(rules.iter().copied());
    state.integer_variables = instantiation
        .ints
        .values()
        .map(|d| {
            integer_encodings
                .variable(d)
                .map(|v| (d.code.clone(), v.clone()))
                .ok_or_else(|| TranspilerError::UninstantiatedIntFeature(d.code.clone()))
        })
        .collect::<Result<_>>()?;
    state.instantiation = instantiation;

    let mut propositions = Vec::with_capacity(rules.len());
    {
        let translator = Translator::strict(f, &state);
        for rule in &slice_set.rules {
            propositions.push(PrlProposition::new(
                RuleInformation::original(rule, index),
                translator.rule(rule)?,
            ));
        }
        for rule in additional {
            propositions.push(PrlProposition::new(
                RuleInformation::additional(rule),
                translator.rule(rule)?,
            ));
        }
    }
    for values in state.enum_mapping.values() {
        propositions.push(PrlProposition::new(
            RuleInformation::of_type(RuleType::EnumFeatureConstraint, Some(index)),
            logic::exo(f, values.values().map(String::as_str)),
        ));
    }
    for (predicate, indicator) in &state.int_predicate_mapping {
        let encoding =
            encode_int_predicate(f, &state.integer_encodings, &state.instantiation, predicate)?;
        propositions.push(PrlProposition::new(
            RuleInformation::of_type(RuleType::IntegerPredicateDefinition, Some(index)),
            f.equivalence(f.variable(indicator), encoding),
        ));
    }
    for variable in state.integer_variables.values() {
        if let Some(encoding) = state.integer_encodings.encoding(variable) {
            propositions.push(PrlProposition::new(
                RuleInformation::of_type(RuleType::IntegerVariable, None),
                encoding,
            ));
        }
    }
    propositions.extend(version_propositions(f, &versions, Some(index)));

    if config.warn_unknown_features && !state.unknown_features.is_empty() {
        let features: Vec<&str> = state.unknown_features.iter().map(|feature| feature.code()).collect();
        warn!(
            event = "unknown_features",
            slice_set = index,
            features = %features.join(", "),
        );
    }
    let elapsed = start.elapsed();
    debug!(
        event = "slice_set_transpiled",
        slice_set = index,
        slices = slice_set.slices.len(),
        rules = rules.len(),
        propositions = propositions.len(),
        duration_ms = elapsed.as_millis() as u64,
    );

    Ok(SliceTranslation {
        index,
        slices: slice_set.slices.clone(),
        info: state.into_info(propositions),
    })
}

/// Translates a constraint against a finished translation.
pub fn transpile_constraint(
    f: &FormulaFactory,
    constraint: &Constraint,
    info: &TranslationInfo,
) -> Result<EncodedFormula> {
    Translator::adhoc(f, info).constraint(constraint)
}

/// Translates a rule against a finished translation.
pub fn transpile_rule(
    f: &FormulaFactory,
    rule: &Rule,
    info: &TranslationInfo,
) -> Result<EncodedFormula> {
    Translator::adhoc(f, info).rule(rule)
}
