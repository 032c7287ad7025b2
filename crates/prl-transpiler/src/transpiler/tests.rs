//! Tests for model transpilation.

use super::*;
use crate::logic::variable_names;
use crate::test_utils::{
    compare, compile, encode_assignment, enumerate_models, feature, feature_assignments,
    is_satisfiable, is_tautology, samples, satisfiable_with, transpile, RuleFileBuilder,
};
use prl_compiler::syntax::{PrlFeatureDefinition, PrlRuleFile};
use prl_config::ThreadCount;
use prl_core::{BooleanFeature, ComparisonOperator, Feature, IntFeature, IntRange, PrlError};
use std::collections::BTreeSet;

/// Checks that the translation of an unsliced rule file accepts exactly the
/// feature assignments satisfying its rules.
fn assert_equisatisfiable(file: &PrlRuleFile, max_version: i32) {
    let model = compile(file);
    let f = FormulaFactory::new();
    let translation = transpile(&f, file);
    assert_eq!(translation.len(), 1);
    let info = &translation.computations[0].info;
    let formula = info.formula(&f);
    let assignments = feature_assignments(info.instantiation.definitions(), max_version);
    assert!(!assignments.is_empty());
    for assignment in assignments {
        let encoded = encode_assignment(info, &assignment);
        assert_eq!(
            satisfiable_with(&f, formula, &encoded),
            model.evaluate(&assignment),
            "assignment {:?}",
            assignment
        );
    }
}

/// Checks that every model of the translation decodes to an assignment
/// satisfying the rules.
fn assert_models_decode(file: &PrlRuleFile) {
    let model = compile(file);
    let f = FormulaFactory::new();
    let translation = transpile(&f, file);
    let info = &translation.computations[0].info;
    let formula = info.formula(&f);
    let names = variable_names(&f, formula);
    let variables: Vec<&str> = names.iter().map(String::as_str).collect();
    let models = enumerate_models(&f, formula, &variables);
    assert!(!models.is_empty());
    for solver_model in models {
        let decoded = info.decode(&solver_model).expect("decodes");
        assert!(model.evaluate(&decoded), "decoded {:?}", decoded);
    }
}

// ============================================================================
// Semantic Tests
// ============================================================================

mod semantic_tests {
    use super::*;

    #[test]
    fn test_boolean_rules() {
        assert_equisatisfiable(&samples::boolean_rules(), 0);
    }

    #[test]
    fn test_versioned_rules() {
        assert_equisatisfiable(&samples::versioned_rules(), 5);
    }

    #[test]
    fn test_enum_rules() {
        assert_equisatisfiable(&samples::enum_rules(), 0);
    }

    #[test]
    fn test_int_rules() {
        assert_equisatisfiable(&samples::int_rules(), 0);
    }

    #[test]
    fn test_self_inclusion_is_tautology() {
        let file = RuleFileBuilder::new()
            .booleans(["a"])
            .inclusion(feature("a"), feature("a"))
            .build();
        let f = FormulaFactory::new();
        let translation = transpile(&f, &file);
        assert!(is_tautology(&f, translation.computations[0].info.formula(&f)));
    }

    #[test]
    fn test_int_greater_than() {
        let file = RuleFileBuilder::new()
            .feature(PrlFeatureDefinition::int("v", IntRange::interval(1, 5)))
            .constraint(compare("v", ComparisonOperator::Gt, 3))
            .build();
        assert_equisatisfiable(&file, 0);

        let model = compile(&file);
        let v = IntFeature::new("v");
        let mut accepted: Vec<i32> = feature_assignments(model.feature_store().all_definitions(), 0)
            .iter()
            .filter(|a| model.evaluate(a))
            .filter_map(|a| a.int_value(&v))
            .collect();
        accepted.sort_unstable();
        assert_eq!(accepted, [4, 5]);
        let f = FormulaFactory::new();
        let translation = transpile(&f, &file);
        assert_eq!(translation.computations[0].info.int_predicate_mapping.len(), 1);
    }

    #[test]
    fn test_models_decode_to_valid_assignments() {
        assert_models_decode(&samples::enum_rules());
        assert_models_decode(&samples::int_rules());
        assert_models_decode(&samples::versioned_rules());
    }
}

// ============================================================================
// Proposition Tests
// ============================================================================

mod proposition_tests {
    use super::*;

    fn count(translation: &SliceTranslation, rule_type: RuleType) -> usize {
        translation
            .propositions()
            .iter()
            .filter(|p| p.info.rule_type == rule_type)
            .count()
    }

    #[test]
    fn test_original_rules_keep_order() {
        let f = FormulaFactory::new();
        let model = compile(&samples::boolean_rules());
        let translation = transpile(&f, &samples::boolean_rules());
        let computation = &translation.computations[0];
        let originals: Vec<&Rule> = computation
            .propositions()
            .iter()
            .filter(|p| p.info.rule_type == RuleType::OriginalRule)
            .filter_map(|p| p.info.rule.as_ref())
            .collect();
        let expected: Vec<&Rule> = model.rules().iter().collect();
        assert_eq!(originals, expected);
        assert!(computation
            .propositions()
            .iter()
            .all(|p| p.info.slice_set == Some(0)));
    }

    #[test]
    fn test_generated_propositions() {
        let f = FormulaFactory::new();
        let translation = transpile(&f, &samples::enum_rules());
        assert_eq!(count(&translation.computations[0], RuleType::EnumFeatureConstraint), 1);

        let translation = transpile(&f, &samples::int_rules());
        let computation = &translation.computations[0];
        assert_eq!(count(computation, RuleType::IntegerPredicateDefinition), 3);
        assert_eq!(count(computation, RuleType::IntegerVariable), 2);
        assert!(computation
            .propositions()
            .iter()
            .filter(|p| p.info.rule_type == RuleType::IntegerVariable)
            .all(|p| p.info.slice_set.is_none()));

        let translation = transpile(&f, &samples::versioned_rules());
        let computation = &translation.computations[0];
        assert_eq!(count(computation, RuleType::VersionIntervalVariable), 5);
        assert_eq!(count(computation, RuleType::VersionAmoConstraint), 1);
        assert_eq!(count(computation, RuleType::VersionEquivalence), 1);
    }

    #[test]
    fn test_unknown_features_translate_to_false() {
        let f = FormulaFactory::new();
        let translation = transpile(&f, &samples::sliced_rules());
        let first = &translation.computations[0].info;
        let c: Feature = BooleanFeature::new("c").into();
        assert!(first.unknown_features.contains(&c));
        assert!(!first.known_variables.contains("c"));
        assert!(!variable_names(&f, first.formula(&f)).contains("c"));

        let second = &translation.computations[1].info;
        let b: Feature = BooleanFeature::new("b").into();
        assert!(second.unknown_features.contains(&b));
        assert!(second.known_variables.contains("c"));
    }

    #[test]
    fn test_additional_constraints() {
        let f = FormulaFactory::new();
        let model = compile(&samples::boolean_rules());
        let additional = [Constraint::boolean("b").not()];
        let translation =
            transpile_model_with_constraints(&f, &model, &[], &additional, &PrlConfig::default())
                .expect("transpiles");
        let computation = &translation.computations[0];
        let last = computation.propositions().last().expect("has propositions");
        assert_eq!(last.info.rule_type, RuleType::AdditionalRestriction);
        assert_eq!(last.info.slice_set, None);
        assert_eq!(count(computation, RuleType::AdditionalRestriction), 1);

        let plain = transpile(&f, &samples::boolean_rules());
        assert!(is_satisfiable(&f, plain.computations[0].info.formula(&f)));
        assert!(!is_satisfiable(&f, computation.info.formula(&f)));
    }
}

// ============================================================================
// Model Transpilation Tests
// ============================================================================

mod model_tests {
    use super::*;

    #[test]
    fn test_parallel_and_sequential_agree() {
        let f = FormulaFactory::new();
        let model = compile(&samples::sliced_rules());
        let sequential = transpile_model(
            &f,
            &model,
            &[],
            &PrlConfig::default().with_thread_count(ThreadCount::None),
        )
        .expect("transpiles");
        let parallel = transpile_model(
            &f,
            &model,
            &[],
            &PrlConfig::default().with_thread_count(ThreadCount::Count(2)),
        )
        .expect("transpiles");
        assert_eq!(sequential.len(), parallel.len());
        for (s, p) in sequential.iter().zip(parallel.iter()) {
            assert_eq!(s.index, p.index);
            assert_eq!(s.slices, p.slices);
            assert_eq!(s.propositions(), p.propositions());
        }
    }

    #[test]
    fn test_slice_limit() {
        let f = FormulaFactory::new();
        let model = compile(&samples::sliced_rules());
        let config = PrlConfig::default().with_max_number_of_slices(1);
        let result = transpile_model(&f, &model, &[], &config);
        assert!(matches!(
            result,
            Err(TranspilerError::Model(PrlError::MaxNumberOfSlicesExceeded { max: 1 }))
        ));
    }

    #[test]
    fn test_wide_int_domain_is_rejected() {
        let f = FormulaFactory::new();
        let file = RuleFileBuilder::new()
            .feature(PrlFeatureDefinition::int("w", IntRange::interval(0, i32::MAX)))
            .constraint(compare("w", ComparisonOperator::Ge, 1))
            .build();
        let result = transpile_model(&f, &compile(&file), &[], &PrlConfig::default());
        assert!(matches!(
            result,
            Err(TranspilerError::DomainTooLarge { feature, max, .. })
                if feature == "w" && max == crate::csp::MAX_DOMAIN_SIZE
        ));
    }

    #[test]
    fn test_int_domain_at_bound_is_encoded() {
        let f = FormulaFactory::new();
        let max = crate::csp::MAX_DOMAIN_SIZE as i32 - 1;
        let file = RuleFileBuilder::new()
            .feature(PrlFeatureDefinition::int("w", IntRange::interval(0, max)))
            .constraint(compare("w", ComparisonOperator::Ge, max))
            .build();
        let translation = transpile(&f, &file);
        let info = &translation.computations[0].info;
        assert_eq!(
            info.integer_variables["w"].domain.size(),
            crate::csp::MAX_DOMAIN_SIZE
        );
    }

    #[test]
    fn test_slice_sets_are_independent() {
        let f = FormulaFactory::new();
        let translation = transpile(&f, &samples::sliced_rules());
        let first = &translation.computations[0].info;
        let second = &translation.computations[1].info;
        assert_eq!(first.integer_variables["i"].domain.values(), [1, 2, 3]);
        assert_eq!(second.integer_variables["i"].domain.values(), [2, 3, 4, 5]);
        assert!(Arc::ptr_eq(&first.integer_encodings, &second.integer_encodings));
        assert!(is_satisfiable(&f, first.formula(&f)));
        assert!(is_satisfiable(&f, second.formula(&f)));
    }
}

// ============================================================================
// Ad-hoc Translation Tests
// ============================================================================

mod adhoc_tests {
    use super::*;

    #[test]
    fn test_transpile_rule() {
        let f = FormulaFactory::new();
        let translation = transpile(&f, &samples::boolean_rules());
        let info = &translation.computations[0].info;
        let rule = Rule::inclusion(Constraint::boolean("c"), Constraint::boolean("x"));
        assert_eq!(
            transpile_rule(&f, &rule, info).expect("translates"),
            f.implication(f.literal("c", true), f.literal("x", true))
        );
    }

    #[test]
    fn test_transpile_constraint_with_unknown_feature() {
        let f = FormulaFactory::new();
        let translation = transpile(&f, &samples::boolean_rules());
        let info = &translation.computations[0].info;
        let constraint = Constraint::boolean("unknown");
        assert_eq!(
            transpile_constraint(&f, &constraint, info).expect("translates"),
            f.falsum()
        );
    }

    #[test]
    fn test_transpile_constraint_on_missing_int_feature() {
        let f = FormulaFactory::new();
        let translation = transpile(&f, &samples::boolean_rules());
        let info = &translation.computations[0].info;
        let constraint = Constraint::int_comparison(
            prl_core::IntFeature::new("i"),
            1,
            prl_core::ComparisonOperator::Eq,
        );
        assert!(matches!(
            transpile_constraint(&f, &constraint, info),
            Err(TranspilerError::UninstantiatedIntFeature(code)) if code == "i"
        ));
    }

    #[test]
    fn test_encoded_assignment_fixes_known_variables() {
        let f = FormulaFactory::new();
        let translation = transpile(&f, &samples::boolean_rules());
        let info = &translation.computations[0].info;
        let assignment = prl_core::FeatureAssignment::new();
        let encoded = encode_assignment(info, &assignment);
        let fixed: BTreeSet<String> = encoded.keys().cloned().collect();
        assert_eq!(fixed, info.known_variables);
        assert!(encoded.values().all(|value| !value));
    }
}
