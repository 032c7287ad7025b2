//! Tests for slices, selections and slice computation.

use super::*;
use crate::property::{AnyRange, BooleanRange, EnumRange, IntRange, PropertyType, SlicingPropertyDefinition};
use crate::PrlError;

fn int_definition(name: &str, values: &[i32]) -> SlicingPropertyDefinition {
    let mut def = SlicingPropertyDefinition::new(name, PropertyType::Int);
    def.add_range(&AnyRange::Int(IntRange::list(values.iter().copied())))
        .unwrap();
    def
}

fn enum_definition(name: &str, values: &[&str]) -> SlicingPropertyDefinition {
    let mut def = SlicingPropertyDefinition::new(name, PropertyType::Enum);
    def.add_range(&AnyRange::Enum(EnumRange::list(
        values.iter().map(|v| v.to_string()),
    )))
    .unwrap();
    def
}

// ============================================================================
// Selection Tests
// ============================================================================

mod selection_tests {
    use super::*;

    #[test]
    fn test_missing_property_matches() {
        let properties = BTreeMap::from([("version".to_string(), Property::int("version", 2))]);
        let selections = [SliceSelection::new(
            Property::bool("active", true),
            SliceType::Any,
        )];
        assert!(evaluate_properties(&properties, &selections));
    }

    #[test]
    fn test_selection_by_range() {
        let properties = BTreeMap::from([(
            "version".to_string(),
            Property::new("version", IntRange::interval(1, 3)),
        )]);
        let hit = SliceSelection::new(Property::int("version", 3), SliceType::Split);
        let miss = SliceSelection::new(Property::int("version", 4), SliceType::Split);
        assert!(evaluate_properties(&properties, &[hit.clone()]));
        assert!(!evaluate_properties(&properties, &[hit, miss]));
    }

    #[test]
    fn test_slice_selectors_and_filter() {
        let slice = Slice::of(Property::bool("active", true), SliceType::Split)
            .with_property(Property::int("version", 1), SliceType::All);
        assert_eq!(slice.selectors().len(), 2);
        let split = slice.filter_properties(&[SliceType::Split]);
        assert_eq!(split.properties().count(), 1);
        assert!(slice.matches(&split));
        assert!(!split.matches(&slice));
        assert_eq!(slice.property("version"), Some(&Property::int("version", 1)));
    }

    #[test]
    fn test_slice_ordering_is_lexicographic() {
        let a = Slice::of(Property::int("v", 1), SliceType::Any);
        let b = Slice::of(Property::int("v", 2), SliceType::Any);
        let ab = a.with_property(Property::int("w", 1), SliceType::Any);
        let mut slices = vec![b.clone(), ab.clone(), a.clone()];
        slices.sort();
        assert_eq!(slices, vec![a, ab, b]);
    }
}

// ============================================================================
// Slice Computation Tests
// ============================================================================

mod computation_tests {
    use super::*;

    #[test]
    fn test_no_definitions_yield_empty_slice() {
        let slices = compute_all_slices(&[], std::iter::empty(), 10).unwrap();
        assert_eq!(slices, vec![Slice::empty()]);
    }

    #[test]
    fn test_product_size() {
        let defs = [
            int_definition("a", &[1, 3]),
            enum_definition("b", &["x", "y", "z"]),
        ];
        // int list {1, 3} yields relevant values 1, 2, 3
        let slices = compute_all_slices(&[], &defs, MAXIMUM_NUMBER_OF_SLICES).unwrap();
        assert_eq!(slices.len(), 9);
        assert!(slices
            .iter()
            .all(|s| s.properties().all(|(_, t)| t == SliceType::Any)));
    }

    #[test]
    fn test_max_number_exceeded() {
        let defs = [
            enum_definition("a", &["1", "2", "3"]),
            enum_definition("b", &["1", "2", "3"]),
            enum_definition("c", &["1", "2", "3"]),
        ];
        let err = compute_all_slices(&[], &defs, 10).unwrap_err();
        assert_eq!(err, PrlError::MaxNumberOfSlicesExceeded { max: 10 });
        assert_eq!(err.to_string(), "Number of slice combinations exceeded 10");
        assert_eq!(compute_all_slices(&[], &defs, 27).unwrap().len(), 27);
    }

    #[test]
    fn test_selectors_filter_and_type() {
        let defs = [
            enum_definition("series", &["S1", "S2", "S3"]),
            int_definition("version", &[1, 2]),
        ];
        let selectors = [SliceSelection::new(
            Property::new("series", EnumRange::list(["S1".to_string(), "S3".to_string()])),
            SliceType::Split,
        )];
        let slices = compute_all_slices(&selectors, &defs, 100).unwrap();
        assert_eq!(slices.len(), 4);
        for slice in &slices {
            let split = slice.filter_properties(&[SliceType::Split]);
            let series = split.property("series").unwrap();
            assert_ne!(series, &Property::enumeration("series", "S2"));
        }
    }

    #[test]
    fn test_unused_definitions_are_skipped() {
        let unused = SlicingPropertyDefinition::new("unused", PropertyType::Bool);
        let mut active = SlicingPropertyDefinition::new("active", PropertyType::Bool);
        active
            .add_range(&AnyRange::Bool(BooleanRange::single(false)))
            .unwrap();
        let slices = compute_all_slices(&[], [&unused, &active], 10).unwrap();
        assert_eq!(slices.len(), 2);
        assert!(slices.iter().all(|s| s.property("unused").is_none()));
    }
}
