//! Tests for the feature and property stores.

use super::*;
use crate::state::CompilerState;
use crate::syntax::{PrlFeatureDefinition, PrlProperty, PrlSlicingPropertyDefinition};
use prl_core::{BooleanRange, IntRange, PropertyType, Theory};

fn store_with_active() -> (PropertyStore, CompilerState) {
    let mut properties = PropertyStore::default();
    let mut state = CompilerState::new();
    let active = PrlSlicingPropertyDefinition::new("active", PropertyType::Bool);
    assert!(properties.add_slicing_property_definition(&active, &mut state));
    (properties, state)
}

fn active(value: bool) -> PrlProperty {
    PrlProperty::new("active", BooleanRange::single(value))
}

// ============================================================================
// Property store
// ============================================================================

mod property_store_tests {
    use super::*;

    #[test]
    fn test_redefinition_with_other_type() {
        let (mut properties, mut state) = store_with_active();
        let same = PrlSlicingPropertyDefinition::new("active", PropertyType::Bool);
        assert!(properties.add_slicing_property_definition(&same, &mut state));
        assert!(!state.has_errors());

        let other = PrlSlicingPropertyDefinition {
            line_number: Some(4),
            ..PrlSlicingPropertyDefinition::new("active", PropertyType::Int)
        };
        assert!(!properties.add_slicing_property_definition(&other, &mut state));
        assert_eq!(
            state.errors(),
            ["[lineNumber=4] Slicing property type does not match the defined property type."]
        );
        assert_eq!(properties.len(), 1);
    }

    #[test]
    fn test_duplicate_property_names() {
        let (mut properties, mut state) = store_with_active();
        properties.add_properties(&[active(true), active(false)], &mut state);
        assert_eq!(state.errors(), ["Properties in feature or rule are not unique"]);
        assert!(properties.definition("active").unwrap().is_unused());
    }

    #[test]
    fn test_type_mismatch() {
        let (mut properties, mut state) = store_with_active();
        let wrong = PrlProperty::new("active", IntRange::single(1));
        properties.add_properties(&[wrong], &mut state);
        assert_eq!(state.errors(), ["Property type does not match slicing property type"]);
    }

    #[test]
    fn test_ranges_are_recorded() {
        let (mut properties, mut state) = store_with_active();
        let other = PrlProperty::new("series", IntRange::single(3));
        properties.add_properties(&[active(true).with_line_number(2), other], &mut state);

        assert!(!state.has_errors());
        let definition = properties.definition("active").unwrap();
        assert!(!definition.is_unused());
        assert_eq!(definition.relevant_properties(None).len(), 2);
        assert!(properties.definition("series").is_err());
    }
}

// ============================================================================
// Feature store
// ============================================================================

mod feature_store_tests {
    use super::*;

    fn add(
        store: &mut FeatureStore,
        definition: PrlFeatureDefinition,
        properties: &PropertyStore,
        state: &mut CompilerState,
    ) -> bool {
        store.add_definition(definition.compile(), properties, false, state)
    }

    #[test]
    fn test_disjoint_slices_are_unique() {
        let (properties, mut state) = store_with_active();
        let mut store = FeatureStore::default();

        assert!(add(
            &mut store,
            PrlFeatureDefinition::boolean("a").with_property(active(true)),
            &properties,
            &mut state
        ));
        assert!(add(
            &mut store,
            PrlFeatureDefinition::boolean("a").with_property(active(false)),
            &properties,
            &mut state
        ));
        assert!(!state.has_errors());
        assert_eq!(store.len(), 2);
        assert_eq!(store.find_matching_definitions("a").len(), 2);
        assert_eq!(store.boolean_features().len(), 1);
    }

    #[test]
    fn test_wildcard_is_duplicate() {
        let (properties, mut state) = store_with_active();
        let mut store = FeatureStore::default();

        add(
            &mut store,
            PrlFeatureDefinition::boolean("a").with_property(active(true)),
            &properties,
            &mut state,
        );
        assert!(!add(
            &mut store,
            PrlFeatureDefinition::int("a", IntRange::interval(1, 3)),
            &properties,
            &mut state
        ));
        assert_eq!(state.errors(), ["Duplicate feature definition"]);
        assert_eq!(store.len(), 1);
        assert!(!store.contains_int_features());
    }

    #[test]
    fn test_non_slicing_property_does_not_separate() {
        let (properties, mut state) = store_with_active();
        let mut store = FeatureStore::default();
        let series = |v| PrlProperty::new("series", IntRange::single(v));

        add(
            &mut store,
            PrlFeatureDefinition::boolean("a").with_property(series(1)),
            &properties,
            &mut state,
        );
        add(
            &mut store,
            PrlFeatureDefinition::boolean("a").with_property(series(2)),
            &properties,
            &mut state,
        );
        assert!(state.has_errors());
    }

    #[test]
    fn test_theory_map() {
        let properties = PropertyStore::default();
        let mut state = CompilerState::new();
        let mut store = FeatureStore::default();
        add(&mut store, PrlFeatureDefinition::versioned("v"), &properties, &mut state);
        add(
            &mut store,
            PrlFeatureDefinition::enumeration("e", ["x", "y"]),
            &properties,
            &mut state,
        );
        store.add_definition(
            PrlFeatureDefinition::boolean("g").compile(),
            &properties,
            true,
            &mut state,
        );

        let map = store.theory_map(["v", "e", "g", "u"], &mut state);
        assert_eq!(map["v"], Theory::VersionedBool);
        assert_eq!(map["e"], Theory::Enum);
        assert_eq!(map["g"], Theory::Bool);
        assert!(!map.contains_key("u"));
        assert_eq!(state.errors(), ["No feature definition found for u"]);

        assert!(store.contains_versioned_features());
        assert_eq!(store.groups().len(), 1);
        assert_eq!(store.enum_definitions().count(), 1);
    }
}
