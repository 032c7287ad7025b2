//! Brute-force enumerations for semantic checks.

use prl_core::{Feature, FeatureAssignment, FeatureDefinition};

/// All subsets of `items`, the empty subset first.
///
/// # Panics
///
/// Panics for more than 24 items.
pub fn subsets<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    assert!(items.len() <= 24, "too many items to enumerate: {}", items.len());
    (0u32..1 << items.len())
        .map(|mask| {
            items
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, item)| item.clone())
                .collect()
        })
        .collect()
}

/// Every complete assignment of the given definitions.
///
/// Booleans range over both values, versioned features over `0..=max_version`,
/// enums over their values and integers over their domains.
pub fn feature_assignments<'a>(
    definitions: impl IntoIterator<Item = &'a FeatureDefinition>,
    max_version: i32,
) -> Vec<FeatureAssignment> {
    let mut result = vec![FeatureAssignment::new()];
    for definition in definitions {
        let mut next = Vec::new();
        for assignment in &result {
            match definition.feature() {
                Feature::Boolean(feature) if feature.versioned => {
                    for version in 0..=max_version {
                        let mut extended = assignment.clone();
                        extended
                            .assign_version(&feature, version)
                            .expect("version is not negative");
                        next.push(extended);
                    }
                }
                Feature::Boolean(feature) => {
                    for value in [false, true] {
                        let mut extended = assignment.clone();
                        extended
                            .assign(&feature, value)
                            .expect("feature is not versioned");
                        next.push(extended);
                    }
                }
                Feature::Enum(feature) => {
                    for value in definition.enum_values().into_iter().flatten() {
                        next.push(assignment.clone().with_enum(&feature, value.clone()));
                    }
                }
                Feature::Int(feature) => {
                    for value in definition.int_domain().map(|d| d.all_values()).unwrap_or_default() {
                        next.push(assignment.clone().with_int(&feature, value));
                    }
                }
            }
        }
        result = next;
    }
    result
}
