//! Grouping of slices by content.

use std::collections::BTreeMap;

use prl_core::{FeatureDefinition, Rule, Slice, Theory};
use tracing::debug;

use super::PrlModel;

/// Slices that see exactly the same feature definitions and rules.
///
/// Definitions and rules are borrowed from the model they were computed
/// from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceSet<'a> {
    pub slices: Vec<Slice>,
    pub definitions: Vec<&'a FeatureDefinition>,
    pub rules: Vec<&'a Rule>,
}

impl<'a> SliceSet<'a> {
    pub fn has_int_features(&self) -> bool {
        self.definitions.iter().any(|d| d.theory() == Theory::Int)
    }

    pub fn has_version_features(&self) -> bool {
        self.definitions
            .iter()
            .any(|d| d.theory() == Theory::VersionedBool)
    }

    pub fn contains(&self, slice: &Slice) -> bool {
        self.slices.contains(slice)
    }

    /// The definition of `code` in this slice set, if any.
    pub fn definition(&self, code: &str) -> Option<&'a FeatureDefinition> {
        self.definitions.iter().copied().find(|d| d.code == code)
    }
}

/// Groups slices into slice sets.
///
/// Two slices end up in the same set exactly if they select equal feature
/// definitions and equal rules. Slice sets are ordered by their first slice,
/// and the slices of a set keep their input order.
pub fn compute_slice_sets<'a>(
    slices: impl IntoIterator<Item = Slice>,
    model: &'a PrlModel,
) -> Vec<SliceSet<'a>> {
    let mut index: BTreeMap<(Vec<&'a FeatureDefinition>, Vec<&'a Rule>), usize> = BTreeMap::new();
    let mut result: Vec<SliceSet<'a>> = Vec::new();
    for slice in slices {
        let definitions = model.feature_definitions_for_slice(&slice);
        let rules = model.rules_for_slice(&slice);
        let key = (definitions, rules);
        match index.get(&key) {
            Some(&i) => result[i].slices.push(slice),
            None => {
                index.insert(key.clone(), result.len());
                let (definitions, rules) = key;
                result.push(SliceSet {
                    slices: vec![slice],
                    definitions,
                    rules,
                });
            }
        }
    }
    debug!(event = "slice_sets_computed", slice_sets = result.len());
    result
}
