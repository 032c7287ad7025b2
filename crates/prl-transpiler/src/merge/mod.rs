//! Merging of independently transpiled slice sets.
//!
//! Every input translation gets a selector `@SL<n>`. Each variable with a
//! feature meaning in one of the inputs is renamed per input to
//! `@SL<n>_<name>`, and the original variable is tied to the disjunction of
//! its renamed copies. Inputs that do not know a variable force their copy
//! to false. Integer features are linked through a merged variable over the
//! union of all slice domains.


use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Instant;

use prl_core::Slice;
use tracing::{debug, info};

use crate::csp::IntegerVariable;
use crate::encoding::{IntPredicateMapping, IntegerEncodingStore, PREDICATE_PREFIX};
use crate::error::Result;
use crate::logic::{self, EncodedFormula, FormulaFactory, Renaming};
use crate::translation::{
    FeatureInstantiation, PrlProposition, RuleInformation, RuleType, SliceTranslation,
    TranslationInfo, TranspilerState,
};

pub const SLICE_SELECTOR_PREFIX: &str = "@SL";

/// The union of several slice-set translations.
#[derive(Debug, Clone)]
pub struct MergedSliceTranslation<'a> {
    /// The input translation behind each selector.
    pub slice_selectors: BTreeMap<String, &'a SliceTranslation>,
    pub info: TranslationInfo,
}

impl<'a> MergedSliceTranslation<'a> {
    pub fn propositions(&self) -> &[PrlProposition] {
        &self.info.propositions
    }

    /// The selector of the translation containing `slice`.
    pub fn selector_of(&self, slice: &Slice) -> Option<&str> {
        self.slice_selectors
            .iter()
            .find(|(_, t)| t.contains(slice))
            .map(|(selector, _)| selector.as_str())
    }

    /// The copy of `variable` belonging to `selector`.
    pub fn selector_variable(&self, selector: &str, variable: &str) -> String {
        selector_variable(selector, variable)
    }
}

fn selector_variable(selector: &str, variable: &str) -> String {
    format!("{}_{}", selector, variable)
}

/// Hands out indicator variables for integer predicates of several
/// translations; an indicator already bound to a different predicate is
/// replaced by a fresh one.
#[derive(Default)]
struct PredicateUnifier {
    mapping: IntPredicateMapping,
    used: BTreeSet<String>,
    counter: usize,
}

impl PredicateUnifier {
    fn unify(&mut self, slice_mapping: &IntPredicateMapping, renaming: &mut Renaming) {
        let slice_variables: BTreeSet<&String> = slice_mapping.values().collect();
        for (predicate, variable) in slice_mapping {
            let target = match self.mapping.get(predicate) {
                Some(existing) => existing.clone(),
                None if self.used.contains(variable) => loop {
                    let candidate = format!("{}_{}", PREDICATE_PREFIX, self.counter);
                    self.counter += 1;
                    if !self.used.contains(&candidate) && !slice_variables.contains(&candidate) {
                        break candidate;
                    }
                },
                None => variable.clone(),
            };
            if &target != variable {
                renaming.insert(variable.clone(), target.clone());
            }
            self.used.insert(target.clone());
            self.mapping.insert(predicate.clone(), target);
        }
    }
}

/// Merges slice-set translations into one.
///
/// # Errors
///
/// Fails if the union of the integer domains of a feature is too large to
/// encode.
///
/// # Example
///
/// ```
/// use prl_compiler::syntax::{PrlConstraint, PrlFeatureDefinition, PrlRule, PrlRuleFile, PrlRuleKind};
/// use prl_compiler::PrlCompiler;
/// use prl_config::PrlConfig;
/// use prl_transpiler::logic::FormulaFactory;
/// use prl_transpiler::{merge_slices, transpile_model};
///
/// let mut rule_file = PrlRuleFile::default();
/// rule_file.rule_set.feature_definitions.push(PrlFeatureDefinition::boolean("a"));
/// rule_file.rule_set.rules.push(PrlRule::new(PrlRuleKind::Constraint(PrlConstraint::feature("a"))));
/// let model = PrlCompiler::new().compile(&rule_file);
///
/// let f = FormulaFactory::new();
/// let translation = transpile_model(&f, &model, &[], &PrlConfig::default()).unwrap();
/// let merged = merge_slices(&f, &translation).unwrap();
/// assert_eq!(merged.slice_selectors.len(), 1);
/// assert!(merged.info.known_variables.contains("a"));
/// ```
pub fn merge_slices<'a>(
    f: &FormulaFactory,
    translations: impl IntoIterator<Item = &'a SliceTranslation>,
) -> Result<MergedSliceTranslation<'a>> {
    let start = Instant::now();
    let translations: Vec<&'a SliceTranslation> = translations.into_iter().collect();
    let known: BTreeSet<String> = translations
        .iter()
        .flat_map(|t| t.info.known_variables.iter().cloned())
        .collect();

    let selectors: Vec<String> = (0..translations.len())
        .map(|n| format!("{}{}", SLICE_SELECTOR_PREFIX, n))
        .collect();
    let mut propositions = Vec::new();
    let mut local_variables = BTreeSet::new();

    for variable in &known {
        let copies: Vec<String> = selectors
            .iter()
            .map(|selector| selector_variable(selector, variable))
            .collect();
        propositions.push(PrlProposition::new(
            RuleInformation::of_type(RuleType::FeatureEquivalenceOverSlices, None),
            f.equivalence(
                f.variable(variable),
                logic::any(f, copies.iter().map(String::as_str)),
            ),
        ));
        local_variables.extend(copies);
    }

    let instantiation = FeatureInstantiation::merge(translations.iter().map(|t| &t.info.instantiation));
    let mut store = merged_store(f, &translations)?;
    let mut integer_variables = BTreeMap::new();
    for definition in instantiation.ints.values() {
        let variable = store.add_definition(f, definition)?.clone();
        integer_variables.insert(definition.code.clone(), variable);
    }
    for variable in integer_variables.values() {
        if let Some(encoding) = store.encoding(variable) {
            propositions.push(PrlProposition::new(
                RuleInformation::of_type(RuleType::IntegerVariable, None),
                encoding,
            ));
        }
    }

    let mut predicates = PredicateUnifier::default();
    let mut state = TranspilerState {
        unknown_features: translations
            .first()
            .map(|t| t.info.unknown_features.clone())
            .unwrap_or_default(),
        ..TranspilerState::default()
    };

    for (translation, selector) in translations.iter().zip(&selectors) {
        let info = &translation.info;
        let mut renaming = Renaming::new();
        for variable in &known {
            let copy = selector_variable(selector, variable);
            if info.known_variables.contains(variable) {
                renaming.insert(variable.clone(), copy);
            } else {
                propositions.push(PrlProposition::new(
                    RuleInformation::of_type(RuleType::UnknownFeatureInSlice, Some(translation.index)),
                    f.literal(&copy, false),
                ));
            }
        }
        for variable in &info.local_variables {
            let copy = selector_variable(selector, variable);
            renaming.insert(variable.clone(), copy.clone());
            local_variables.insert(copy);
        }
        predicates.unify(&info.int_predicate_mapping, &mut renaming);

        for (code, variable) in &info.integer_variables {
            let Some(merged) = integer_variables.get(code) else {
                debug!(event = "unmerged_int_feature", feature = %code);
                continue;
            };
            if variable != merged {
                propositions.push(PrlProposition::new(
                    RuleInformation::of_type(RuleType::IntegerVariable, Some(translation.index)),
                    int_equivalence(f, variable, merged),
                ));
            }
        }

        state.boolean_variables.extend(info.boolean_variables.iter().cloned());
        for (feature, values) in &info.enum_mapping {
            state
                .enum_mapping
                .entry(feature.clone())
                .or_default()
                .extend(values.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        for (feature, versions) in &info.version_mapping {
            state
                .version_mapping
                .entry(feature.clone())
                .or_default()
                .extend(versions.iter().map(|(k, v)| (*k, v.clone())));
        }
        state
            .unknown_features
            .retain(|feature| info.unknown_features.contains(feature));
        propositions.extend(info.propositions.iter().map(|p| p.rename(f, &renaming)));
    }

    state.int_predicate_mapping = predicates.mapping;
    state.integer_variables = integer_variables;
    state.local_variables = local_variables;
    state.instantiation = instantiation;
    state.integer_encodings = Arc::new(store);

    let slice_selectors = selectors.into_iter().zip(translations.iter().copied()).collect();
    let info = state.into_info(propositions);
    let elapsed = start.elapsed();
    info!(
        event = "slices_merged",
        slice_sets = translations.len(),
        known_variables = info.known_variables.len(),
        propositions = info.propositions.len(),
        duration_ms = elapsed.as_millis() as u64,
    );
    Ok(MergedSliceTranslation {
        slice_selectors,
        info,
    })
}

/// A store holding the integer encodings of all inputs.
fn merged_store(
    f: &FormulaFactory,
    translations: &[&SliceTranslation],
) -> Result<IntegerEncodingStore> {
    let Some(first) = translations.first() else {
        return Ok(IntegerEncodingStore::new());
    };
    let mut store = (*first.info.integer_encodings).clone();
    for translation in &translations[1..] {
        if !Arc::ptr_eq(&first.info.integer_encodings, &translation.info.integer_encodings) {
            for definition in translation.info.instantiation.ints.values() {
                store.add_definition(f, definition)?;
            }
        }
    }
    Ok(store)
}

/// `slice == merged` over the order points of the merged variable.
///
/// The merged domain contains the slice domain, so agreeing on every order
/// point of the merged variable fixes both to the same value. Points below
/// or above the slice domain force the merged order literal.
fn int_equivalence(
    f: &FormulaFactory,
    slice: &IntegerVariable,
    merged: &IntegerVariable,
) -> EncodedFormula {
    let points: Vec<EncodedFormula> = merged
        .order_variables()
        .into_iter()
        .map(|(value, order)| f.equivalence(slice.le(f, value), f.variable(&order)))
        .collect();
    f.and(&points)
}
