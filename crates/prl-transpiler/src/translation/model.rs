use std::collections::{BTreeMap, BTreeSet};

use prl_core::{Slice, SliceType};

use super::SliceTranslation;

/// The translations of all slice sets of a model.
///
/// Slice-set translations are kept in slice-set order; a slice is found
/// through the translation that contains it.
#[derive(Debug, Clone, Default)]
pub struct ModelTranslation {
    pub computations: Vec<SliceTranslation>,
}

impl ModelTranslation {
    pub fn new(computations: Vec<SliceTranslation>) -> Self {
        Self { computations }
    }

    /// Number of slice-set translations.
    pub fn len(&self) -> usize {
        self.computations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.computations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SliceTranslation> {
        self.computations.iter()
    }

    pub fn get(&self, index: usize) -> Option<&SliceTranslation> {
        self.computations.get(index)
    }

    /// The translation responsible for each slice.
    pub fn slice_map(&self) -> BTreeMap<&Slice, &SliceTranslation> {
        self.computations
            .iter()
            .flat_map(|t| t.slices.iter().map(move |s| (s, t)))
            .collect()
    }

    /// All slices in order of their translations.
    pub fn all_slices(&self) -> Vec<&Slice> {
        self.computations.iter().flat_map(|t| t.slices.iter()).collect()
    }

    /// The distinct projections of all slices to their split properties.
    pub fn all_split_slices(&self) -> Vec<Slice> {
        self.projections(None, &[SliceType::Split])
    }

    /// The distinct projections of all slices to their any properties.
    pub fn all_any_slices(&self) -> Vec<Slice> {
        self.projections(None, &[SliceType::Any])
    }

    /// The split-and-any projections of the slices matching `slice`.
    pub fn all_any_slices_of(&self, slice: &Slice) -> Vec<Slice> {
        self.projections(Some(slice), &[SliceType::Split, SliceType::Any])
    }

    /// The distinct projections of all slices to their all properties.
    pub fn all_all_slices(&self) -> Vec<Slice> {
        self.projections(None, &[SliceType::All])
    }

    /// The full projections of the slices matching `slice`.
    pub fn all_all_slices_of(&self, slice: &Slice) -> Vec<Slice> {
        self.projections(
            Some(slice),
            &[SliceType::Split, SliceType::Any, SliceType::All],
        )
    }

    fn projections(&self, filter: Option<&Slice>, types: &[SliceType]) -> Vec<Slice> {
        let mut seen = BTreeSet::new();
        self.all_slices()
            .into_iter()
            .filter(|s| filter.map_or(true, |f| s.matches(f)))
            .map(|s| s.filter_properties(types))
            .filter(|s| seen.insert(s.clone()))
            .collect()
    }
}

impl<'a> IntoIterator for &'a ModelTranslation {
    type Item = &'a SliceTranslation;
    type IntoIter = std::slice::Iter<'a, SliceTranslation>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
