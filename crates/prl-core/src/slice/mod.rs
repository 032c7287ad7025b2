//! Slices of the configuration space.
//!
//! A slice assigns one value to every slicing property that is actually
//! used. Each property of a slice carries a [`SliceType`] telling consumers
//! how results over different values of that property are combined.

mod computation;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;
use std::fmt;

pub use computation::{compute_all_slices, MAXIMUM_NUMBER_OF_SLICES};

use crate::property::Property;

/// How the values of a slicing property are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SliceType {
    /// One computation per value.
    Split,
    /// Any value is representative; results are merged afterwards.
    #[default]
    Any,
    /// The result must hold for all values at once.
    All,
}

impl fmt::Display for SliceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SliceType::Split => "SPLIT",
            SliceType::Any => "ANY",
            SliceType::All => "ALL",
        };
        f.write_str(name)
    }
}

/// A selection of a range of one slicing property.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SliceSelection {
    pub property: Property,
    pub slice_type: SliceType,
}

impl SliceSelection {
    pub fn new(property: Property, slice_type: SliceType) -> Self {
        Self {
            property,
            slice_type,
        }
    }

    /// Whether a property of the same name overlaps the selected range.
    pub fn evaluate(&self, property: &Property) -> bool {
        self.property.intersects(property)
    }
}

/// Whether the given properties match all selections.
///
/// Selections for properties that are not present always match.
pub fn evaluate_properties(
    properties: &BTreeMap<String, Property>,
    selections: &[SliceSelection],
) -> bool {
    selections
        .iter()
        .all(|selection| match properties.get(&selection.property.name) {
            Some(property) => selection.evaluate(property),
            None => true,
        })
}

/// One point of the configuration space.
///
/// Slices order lexicographically by their properties.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Slice {
    properties: BTreeMap<Property, SliceType>,
}

impl Slice {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn of(property: Property, slice_type: SliceType) -> Self {
        Self {
            properties: BTreeMap::from([(property, slice_type)]),
        }
    }

    pub fn from_properties(properties: impl IntoIterator<Item = (Property, SliceType)>) -> Self {
        Self {
            properties: properties.into_iter().collect(),
        }
    }

    /// Copy of this slice with one more property.
    pub fn with_property(&self, property: Property, slice_type: SliceType) -> Self {
        let mut properties = self.properties.clone();
        properties.insert(property, slice_type);
        Self { properties }
    }

    /// The selections that pick exactly this slice.
    pub fn selectors(&self) -> Vec<SliceSelection> {
        self.properties
            .iter()
            .map(|(property, slice_type)| SliceSelection::new(property.clone(), *slice_type))
            .collect()
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.keys().find(|p| p.name == name)
    }

    pub fn properties(&self) -> impl Iterator<Item = (&Property, SliceType)> {
        self.properties.iter().map(|(p, t)| (p, *t))
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// The sub-slice with only the properties of the given types.
    pub fn filter_properties(&self, slice_types: &[SliceType]) -> Slice {
        Self {
            properties: self
                .properties
                .iter()
                .filter(|(_, t)| slice_types.contains(t))
                .map(|(p, t)| (p.clone(), *t))
                .collect(),
        }
    }

    /// Whether this slice contains all properties of `other` with the same type.
    pub fn matches(&self, other: &Slice) -> bool {
        other
            .properties
            .iter()
            .all(|(p, t)| self.properties.get(p) == Some(t))
    }
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Slice(")?;
        for (i, (property, slice_type)) in self.properties.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", property, slice_type)?;
        }
        f.write_str(")")
    }
}
