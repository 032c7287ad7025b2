use super::{Slice, SliceSelection, SliceType};
use crate::error::{PrlError, Result};
use crate::property::SlicingPropertyDefinition;

/// Default upper bound for the number of computed slices.
pub const MAXIMUM_NUMBER_OF_SLICES: usize = 10_000;

/// Computes the cartesian product of the relevant values of all slicing
/// properties.
///
/// A selector restricts the values of its property and sets the slice type;
/// properties without a selector are treated as [`SliceType::Any`].
/// Properties that are not used by any feature or rule do not partition the
/// space and are skipped. Without any used property the result is the single
/// empty slice.
///
/// # Errors
///
/// Returns [`PrlError::MaxNumberOfSlicesExceeded`] as soon as the number of
/// combinations exceeds `max_number_of_slices`.
///
/// # Example
///
/// ```
/// use prl_core::{compute_all_slices, AnyRange, BooleanRange, PropertyType, SlicingPropertyDefinition};
///
/// let mut active = SlicingPropertyDefinition::new("active", PropertyType::Bool);
/// active.add_range(&AnyRange::Bool(BooleanRange::single(true))).unwrap();
///
/// let slices = compute_all_slices(&[], [&active], 10).unwrap();
/// assert_eq!(slices.len(), 2);
/// assert!(compute_all_slices(&[], [&active], 1).is_err());
/// ```
pub fn compute_all_slices<'a>(
    selectors: &[SliceSelection],
    definitions: impl IntoIterator<Item = &'a SlicingPropertyDefinition>,
    max_number_of_slices: usize,
) -> Result<Vec<Slice>> {
    let mut slices = vec![Slice::empty()];
    for def in definitions {
        if def.is_unused() {
            continue;
        }
        let selector = selectors.iter().find(|s| s.property.name == def.name);
        let slice_type = selector.map_or(SliceType::Any, |s| s.slice_type);
        let values = def.relevant_properties(selector.map(|s| &s.property.range));
        if slices.len().saturating_mul(values.len()) > max_number_of_slices {
            return Err(PrlError::MaxNumberOfSlicesExceeded {
                max: max_number_of_slices,
            });
        }
        slices = slices
            .iter()
            .flat_map(|slice| {
                values
                    .iter()
                    .map(move |value| slice.with_property(value.clone(), slice_type))
            })
            .collect();
    }
    Ok(slices)
}
