//! Integration tests transpiling the sample rule files.
//!
//! Boolean and enum translations introduce no auxiliary variables, so the
//! formula of a slice set can be evaluated directly on the encoding of a
//! feature assignment.

use prl_config::PrlConfig;
use prl_core::{Feature, FeatureAssignment, SliceSelection, SliceType};
use prl_test::{compile, feature_assignments, samples};
use prl_transpiler::logic::{evaluate, FormulaFactory, Model};
use prl_transpiler::{merge_slices, transpile_model, RuleType, TranslationInfo};

fn encode(info: &TranslationInfo, assignment: &FeatureAssignment) -> Model {
    let mut encoded = Model::new();
    for definition in info.instantiation.definitions() {
        match definition.feature() {
            Feature::Boolean(feature) => {
                if assignment.boolean(&feature).unwrap_or(false) {
                    encoded.insert(feature.code.clone());
                }
            }
            Feature::Enum(feature) => {
                for (value, variable) in &info.enum_mapping[&feature.code] {
                    if assignment.enum_value(&feature) == Some(value.as_str()) {
                        encoded.insert(variable.clone());
                    }
                }
            }
            Feature::Int(_) => panic!("integer features need auxiliary variables"),
        }
    }
    encoded
}

fn assert_exact(file: &prl_compiler::syntax::PrlRuleFile) {
    let model = compile(file);
    let f = FormulaFactory::new();
    let translation = transpile_model(&f, &model, &[], &PrlConfig::default()).expect("transpiles");
    let info = &translation.computations[0].info;
    let formula = info.formula(&f);
    for assignment in feature_assignments(info.instantiation.definitions(), 0) {
        let encoded = encode(info, &assignment);
        let satisfied = evaluate(&f, formula, &encoded);
        assert_eq!(satisfied, model.evaluate(&assignment), "{:?}", assignment);
        if satisfied {
            assert_eq!(info.decode(&encoded).expect("decodes"), assignment);
        }
    }
}

#[test]
fn test_boolean_sample() {
    assert_exact(&samples::boolean_rules());
}

#[test]
fn test_enum_sample() {
    assert_exact(&samples::enum_rules());
}

#[test]
fn test_split_selection() {
    let model = compile(&samples::sliced_rules());
    let selection = SliceSelection::new(
        prl_core::Property::new("version", prl_core::IntRange::interval(2, 2)),
        SliceType::Split,
    );
    let f = FormulaFactory::new();
    let translation =
        transpile_model(&f, &model, &[selection], &PrlConfig::default()).expect("transpiles");
    assert_eq!(translation.len(), 1);
    let info = &translation.computations[0].info;
    assert!(info.known_variables.contains("c"));
    assert!(!info.known_variables.contains("b"));
    assert_eq!(info.integer_variables["i"].domain.values(), [2, 3, 4, 5]);
}

#[test]
fn test_merge_of_all_slice_sets() {
    let model = compile(&samples::sliced_rules());
    let f = FormulaFactory::new();
    let translation = transpile_model(&f, &model, &[], &PrlConfig::default()).expect("transpiles");
    let merged = merge_slices(&f, &translation).expect("merges");
    assert_eq!(merged.slice_selectors.len(), translation.len());
    let equivalences = merged
        .propositions()
        .iter()
        .filter(|p| p.info.rule_type == RuleType::FeatureEquivalenceOverSlices)
        .count();
    assert_eq!(equivalences, merged.info.known_variables.len());
    for slice in translation.all_slices() {
        assert!(merged.selector_of(slice).is_some());
    }
}
