//! Tests for translation results.

use super::*;
use crate::logic::{evaluate, variable_names, FormulaFactory, Model, Renaming};
use crate::test_utils::{samples, transpile};
use crate::transpiler::transpile_model;
use prl_config::PrlConfig;
use prl_core::{
    BooleanFeature, ComparisonOperator, Constraint, EnumFeature, FeatureDefinition, IntFeature,
    IntRange, Property, SliceSelection, SliceType,
};

fn version_slice(version: i32, slice_type: SliceType) -> Slice {
    Slice::of(Property::int("version", version), slice_type)
}

// ============================================================================
// Provenance Tests
// ============================================================================

mod provenance_tests {
    use super::*;

    #[test]
    fn test_rule_type_descriptions() {
        assert_eq!(
            RuleType::OriginalRule.to_string(),
            "Original rule from the rule file"
        );
        assert_eq!(
            RuleType::UnknownFeatureInSlice.description(),
            "Unknown feature in this slice"
        );
        assert_eq!(
            RuleType::EnumFeatureConstraint.to_string(),
            "EXO constraint for enum feature values"
        );
    }

    #[test]
    fn test_rule_information() {
        let rule = Rule::constraint(Constraint::boolean("a")).with_id("r1");
        let original = RuleInformation::original(&rule, 2);
        assert_eq!(original.rule_type, RuleType::OriginalRule);
        assert_eq!(original.slice_set, Some(2));
        assert_eq!(original.rule.as_ref().map(|r| r.id.as_str()), Some("r1"));

        let additional = RuleInformation::additional(&rule);
        assert_eq!(additional.rule_type, RuleType::AdditionalRestriction);
        assert_eq!(additional.slice_set, None);

        let generated = RuleInformation::of_type(RuleType::VersionAmoConstraint, Some(0));
        assert!(generated.rule.is_none());
    }

    #[test]
    fn test_proposition_renaming_keeps_information() {
        let f = FormulaFactory::new();
        let info = RuleInformation::of_type(RuleType::OriginalRule, Some(1));
        let proposition = PrlProposition::new(info.clone(), f.literal("a", false));
        let renaming = Renaming::from([("a".to_string(), "b".to_string())]);
        let renamed = proposition.rename(&f, &renaming);
        assert_eq!(renamed.info, info);
        assert_eq!(renamed.formula, f.literal("b", false));
    }
}

// ============================================================================
// Feature Instantiation Tests
// ============================================================================

mod instantiation_tests {
    use super::*;

    #[test]
    fn test_instantiation_by_theory() {
        let definitions = [
            FeatureDefinition::boolean("a"),
            FeatureDefinition::versioned("v"),
            FeatureDefinition::enumeration("e", ["x"]),
            FeatureDefinition::int("i", IntRange::interval(0, 2)),
        ];
        let instantiation = FeatureInstantiation::from_definitions(&definitions);
        assert_eq!(instantiation.boolean.len(), 2);
        assert_eq!(instantiation.enums.len(), 1);
        assert_eq!(instantiation.ints.len(), 1);
        assert_eq!(instantiation.len(), 4);
        assert!(instantiation.contains(&BooleanFeature::versioned("v").into()));
        assert!(!instantiation.contains(&EnumFeature::new("a").into()));
        assert_eq!(
            instantiation.get(&IntFeature::new("i").into()),
            Some(&definitions[3])
        );
    }

    #[test]
    fn test_merge_unites_domains() {
        let first = FeatureInstantiation::from_definitions(&[
            FeatureDefinition::boolean("a"),
            FeatureDefinition::enumeration("e", ["x"]),
            FeatureDefinition::int("i", IntRange::interval(1, 3)),
        ]);
        let second = FeatureInstantiation::from_definitions(&[
            FeatureDefinition::enumeration("e", ["y"]),
            FeatureDefinition::int("i", IntRange::list([5])),
        ]);
        let merged = FeatureInstantiation::merge([&first, &second]);
        assert_eq!(merged.len(), 3);
        let values: Vec<&String> = merged.enums["e"].enum_values().into_iter().flatten().collect();
        assert_eq!(values, ["x", "y"]);
        let domain = merged.ints["i"].int_domain().map(|d| d.all_values());
        assert_eq!(domain, Some([1, 2, 3, 5].into_iter().collect()));
    }

    #[test]
    fn test_merge_of_nothing_is_empty() {
        assert!(FeatureInstantiation::merge([]).is_empty());
    }
}

// ============================================================================
// Translation Info Tests
// ============================================================================

mod info_tests {
    use super::*;

    #[test]
    fn test_reverse_mappings() {
        let f = FormulaFactory::new();
        let translation = transpile(&f, &samples::enum_rules());
        let info = &translation.computations[0].info;
        assert_eq!(info.feature_and_value("@ENUM_e_y"), Some(("e", "y")));
        assert_eq!(info.feature_and_value("a"), None);
        assert_eq!(info.enum_variables().len(), 3);
        assert_eq!(info.known_variables.len(), 4);

        let translation = transpile(&f, &samples::versioned_rules());
        let info = &translation.computations[0].info;
        assert_eq!(info.feature_and_version("@VER_i_v_4"), Some(("v", 4)));
        assert_eq!(info.version_variables().len(), 5);
        assert!(info.local_variables.iter().all(|v| v.starts_with("@VER_i")));
    }

    #[test]
    fn test_decode_defaults() {
        let f = FormulaFactory::new();
        let translation = transpile(&f, &samples::enum_rules());
        let decoded = translation.computations[0]
            .info
            .decode(&Model::new())
            .expect("decodes");
        assert_eq!(decoded.boolean(&BooleanFeature::new("a")), Some(false));
        assert_eq!(decoded.enum_value(&EnumFeature::new("e")), None);

        let translation = transpile(&f, &samples::versioned_rules());
        let v = BooleanFeature::versioned("v");
        let info = &translation.computations[0].info;
        let decoded = info.decode(&Model::new()).expect("decodes");
        assert_eq!(decoded.version(&v), Some(0));
        let installed: Model = ["v", "@VER_i_v_2"].into_iter().map(String::from).collect();
        assert_eq!(info.decode(&installed).expect("decodes").version(&v), Some(2));
    }

    #[test]
    fn test_decode_ints() {
        let f = FormulaFactory::new();
        let translation = transpile(&f, &samples::int_rules());
        let info = &translation.computations[0].info;
        let i = IntFeature::new("i");
        let j = IntFeature::new("j");
        let decoded = info.decode(&Model::new()).expect("decodes");
        assert_eq!(decoded.int_value(&i), Some(4));
        assert_eq!(decoded.int_value(&j), Some(6));

        let variable = &info.integer_variables["i"];
        let three: Model = variable
            .order_variables()
            .into_iter()
            .filter(|(bound, _)| *bound >= 3)
            .map(|(_, v)| v)
            .collect();
        assert_eq!(info.decode(&three).expect("decodes").int_value(&i), Some(3));
    }

    #[test]
    fn test_translate_constraint_reuses_indicators() {
        let f = FormulaFactory::new();
        let translation = transpile(&f, &samples::int_rules());
        let info = &translation.computations[0].info;
        assert_eq!(info.int_predicate_mapping.len(), 3);
        for (predicate, indicator) in &info.int_predicate_mapping {
            let formula = info.translate_constraint(&f, predicate).expect("translates");
            assert_eq!(formula, f.variable(indicator));
        }
    }

    #[test]
    fn test_translate_constraint_encodes_new_int_predicates() {
        let f = FormulaFactory::new();
        let translation = transpile(&f, &samples::int_rules());
        let info = &translation.computations[0].info;
        let variable = &info.integer_variables["i"];
        let predicate = Constraint::int_comparison(IntFeature::new("i"), 2, ComparisonOperator::Lt);
        let formula = info.translate_constraint(&f, &predicate).expect("translates");
        assert!(!info.int_predicate_mapping.contains_key(&predicate));
        for value in 1..=4 {
            let model: Model = variable
                .order_variables()
                .into_iter()
                .filter(|(bound, _)| value <= *bound)
                .map(|(_, v)| v)
                .collect();
            assert_eq!(evaluate(&f, formula, &model), value < 2, "i = {}", value);
        }
    }

    #[test]
    fn test_translate_constraint_without_version_helpers() {
        let f = FormulaFactory::new();
        let translation = transpile(&f, &samples::versioned_rules());
        let info = &translation.computations[0].info;
        let predicate =
            Constraint::version(BooleanFeature::versioned("v"), ComparisonOperator::Ge, 4);
        let formula = info.translate_constraint(&f, &predicate).expect("translates");
        let names: Vec<String> = variable_names(&f, formula).into_iter().collect();
        assert_eq!(names, ["@VER_i_v_4", "@VER_i_v_5"]);
    }

    #[test]
    fn test_definitions_by_theory() {
        let f = FormulaFactory::new();
        let translation = transpile(&f, &samples::int_rules());
        let info = &translation.computations[0].info;
        assert_eq!(info.definitions(prl_core::Theory::Int).len(), 2);
        assert_eq!(info.definitions(prl_core::Theory::Bool).len(), 1);
        assert!(info.definitions(prl_core::Theory::Enum).is_empty());
    }
}

// ============================================================================
// Model Translation Tests
// ============================================================================

mod model_tests {
    use super::*;

    #[test]
    fn test_slice_map() {
        let f = FormulaFactory::new();
        let translation = transpile(&f, &samples::sliced_rules());
        assert_eq!(translation.len(), 2);
        let map = translation.slice_map();
        assert_eq!(map.len(), 2);
        let first = version_slice(1, SliceType::Any);
        assert_eq!(map[&first].index, 0);
        assert!(translation.computations[0].contains(&first));
        assert_eq!(translation.all_slices().len(), 2);
    }

    #[test]
    fn test_projections_of_any_slices() {
        let f = FormulaFactory::new();
        let translation = transpile(&f, &samples::sliced_rules());
        assert_eq!(translation.all_split_slices(), [Slice::empty()]);
        assert_eq!(
            translation.all_any_slices(),
            [
                version_slice(1, SliceType::Any),
                version_slice(2, SliceType::Any)
            ]
        );
        assert_eq!(translation.all_all_slices(), [Slice::empty()]);
    }

    #[test]
    fn test_projections_of_split_slices() {
        let f = FormulaFactory::new();
        let model = crate::test_utils::compile(&samples::sliced_rules());
        let selection = SliceSelection::new(
            Property::new("version", IntRange::interval(1, 2)),
            SliceType::Split,
        );
        let translation =
            transpile_model(&f, &model, &[selection], &PrlConfig::default()).expect("transpiles");
        assert_eq!(translation.all_split_slices().len(), 2);
        assert_eq!(translation.all_any_slices(), [Slice::empty()]);
        let second = version_slice(2, SliceType::Split);
        assert_eq!(translation.all_any_slices_of(&second), [second.clone()]);
        assert_eq!(translation.all_all_slices_of(&second), [second]);
    }

    #[test]
    fn test_iteration_follows_slice_sets() {
        let f = FormulaFactory::new();
        let translation = transpile(&f, &samples::sliced_rules());
        let indices: Vec<usize> = translation.iter().map(|t| t.index).collect();
        assert_eq!(indices, [0, 1]);
        assert!(translation.get(2).is_none());
        assert_eq!((&translation).into_iter().count(), 2);
    }
}
