//! Integration tests for the rule-file pipeline.

use prl::syntax::PrlFeatureDefinition;
use prl::{
    load_config, transpile_rule_file, Constraint, FormulaFactory, PipelineError, PrlConfig,
    RuleType, SliceSelection, SliceType, ThreadCount, TranspilerError,
};
use prl_core::{ComparisonOperator, IntRange, PrlError, Property};
use prl_test::rule_file::{compare, feature};
use prl_test::{samples, RuleFileBuilder};

#[test]
fn test_compile_errors_reject_rule_file() {
    let file = RuleFileBuilder::new()
        .booleans(["a"])
        .inclusion(feature("a"), feature("missing"))
        .build();
    let f = FormulaFactory::new();
    match transpile_rule_file(&f, &file, &[], &[], &PrlConfig::default()) {
        Err(PipelineError::Compile(errors)) => assert!(!errors.is_empty()),
        other => panic!("expected compile errors, got {:?}", other),
    }
}

#[test]
fn test_sliced_rule_file() {
    let f = FormulaFactory::new();
    let result = transpile_rule_file(&f, &samples::sliced_rules(), &[], &[], &PrlConfig::default())
        .expect("transpiles");
    assert_eq!(result.translation.len(), 2);
    assert_eq!(result.model.rules().len(), 4);

    let split = SliceSelection::new(
        Property::new("version", IntRange::interval(2, 2)),
        SliceType::Split,
    );
    let result =
        transpile_rule_file(&f, &samples::sliced_rules(), &[split], &[], &PrlConfig::default())
            .expect("transpiles");
    assert_eq!(result.translation.len(), 1);
}

#[test]
fn test_slice_limit_is_enforced() {
    let f = FormulaFactory::new();
    let config = PrlConfig::default().with_max_number_of_slices(1);
    let err = transpile_rule_file(&f, &samples::sliced_rules(), &[], &[], &config).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Transpile(TranspilerError::Model(PrlError::MaxNumberOfSlicesExceeded {
            max: 1
        }))
    ));
}

#[test]
fn test_wide_int_domain_is_reported() {
    let f = FormulaFactory::new();
    let file = RuleFileBuilder::new()
        .feature(PrlFeatureDefinition::int("w", IntRange::interval(i32::MIN, i32::MAX)))
        .constraint(compare("w", ComparisonOperator::Gt, 0))
        .build();
    let err = transpile_rule_file(&f, &file, &[], &[], &PrlConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Transpile(TranspilerError::DomainTooLarge { ref feature, .. }) if feature == "w"
    ));
}

#[test]
fn test_additional_constraints_are_passed_through() {
    let additional = [Constraint::boolean("b").not()];
    let config = PrlConfig::default().with_thread_count(ThreadCount::None);
    let f = FormulaFactory::new();
    let result = transpile_rule_file(&f, &samples::boolean_rules(), &[], &additional, &config)
        .expect("transpiles");
    let restrictions = result.translation.computations[0]
        .info
        .propositions
        .iter()
        .filter(|p| p.info.rule_type == RuleType::AdditionalRestriction)
        .count();
    assert_eq!(restrictions, 1);
}

#[test]
fn test_missing_config_falls_back_to_default() {
    let config = load_config("does/not/exist.toml");
    assert_eq!(config, PrlConfig::default());
}
