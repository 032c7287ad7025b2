//! Registry of feature definitions.

use std::collections::{BTreeMap, BTreeSet};

use prl_core::{
    BooleanFeature, DefinitionKind, EnumFeature, FeatureDefinition, IntFeature, Property, Theory,
};

use super::PropertyStore;
use crate::state::CompilerState;

/// Theories of the features referenced by a rule set, by feature code.
pub type TheoryMap = BTreeMap<String, Theory>;

/// All feature definitions of a model, grouped by theory and code.
///
/// A code may have several definitions as long as each pair of them applies
/// to disjoint slices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureStore {
    boolean: BTreeMap<String, Vec<FeatureDefinition>>,
    enums: BTreeMap<String, Vec<FeatureDefinition>>,
    ints: BTreeMap<String, Vec<FeatureDefinition>>,
    groups: BTreeSet<BooleanFeature>,
}

impl FeatureStore {
    /// Adds a definition unless it clashes with an existing definition of
    /// the same code.
    pub(crate) fn add_definition(
        &mut self,
        definition: FeatureDefinition,
        properties: &PropertyStore,
        is_group: bool,
        state: &mut CompilerState,
    ) -> bool {
        let unique = self
            .find_matching_definitions(&definition.code)
            .iter()
            .all(|existing| {
                unique_slices(&definition.properties, &existing.properties, properties)
            });
        if !unique {
            state.add_error("Duplicate feature definition");
            return false;
        }
        if is_group {
            self.groups.insert(BooleanFeature::new(&definition.code));
        }
        let map = match definition.kind {
            DefinitionKind::Boolean { .. } => &mut self.boolean,
            DefinitionKind::Enum { .. } => &mut self.enums,
            DefinitionKind::Int { .. } => &mut self.ints,
        };
        map.entry(definition.code.clone()).or_default().push(definition);
        true
    }

    /// Resolves the theory of every given feature from its first definition.
    pub(crate) fn theory_map<'a>(
        &self,
        features: impl IntoIterator<Item = &'a str>,
        state: &mut CompilerState,
    ) -> TheoryMap {
        let mut map = TheoryMap::new();
        for code in features {
            match self.find_matching_definitions(code).first() {
                Some(definition) => {
                    map.insert(code.to_string(), definition.theory());
                }
                None => state.add_error(format!("No feature definition found for {}", code)),
            }
        }
        map
    }

    /// Number of definitions over all theories.
    pub fn len(&self) -> usize {
        self.all_definitions().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All definitions of a code: boolean first, then enum, then integer.
    pub fn find_matching_definitions(&self, code: &str) -> Vec<&FeatureDefinition> {
        [&self.boolean, &self.enums, &self.ints]
            .into_iter()
            .filter_map(|map| map.get(code))
            .flatten()
            .collect()
    }

    pub fn all_definitions(&self) -> impl Iterator<Item = &FeatureDefinition> {
        self.boolean
            .values()
            .chain(self.enums.values())
            .chain(self.ints.values())
            .flatten()
    }

    pub fn boolean_features(&self) -> BTreeSet<BooleanFeature> {
        self.boolean
            .values()
            .flatten()
            .map(|d| match d.kind {
                DefinitionKind::Boolean { versioned: true } => BooleanFeature::versioned(&d.code),
                _ => BooleanFeature::new(&d.code),
            })
            .collect()
    }

    pub fn enum_features(&self) -> BTreeSet<EnumFeature> {
        self.enums.keys().map(EnumFeature::new).collect()
    }

    pub fn int_features(&self) -> BTreeSet<IntFeature> {
        self.ints.keys().map(IntFeature::new).collect()
    }

    pub fn enum_definitions(&self) -> impl Iterator<Item = &FeatureDefinition> {
        self.enums.values().flatten()
    }

    /// Pseudo features introduced by group rules.
    pub fn groups(&self) -> &BTreeSet<BooleanFeature> {
        &self.groups
    }

    pub fn contains_boolean_features(&self) -> bool {
        !self.boolean.is_empty()
    }

    pub fn contains_enum_features(&self) -> bool {
        !self.enums.is_empty()
    }

    pub fn contains_int_features(&self) -> bool {
        !self.ints.is_empty()
    }

    pub fn contains_versioned_features(&self) -> bool {
        self.boolean
            .values()
            .flatten()
            .any(|d| d.theory() == Theory::VersionedBool)
    }
}

/// Two property sets select disjoint slices if some slicing property is
/// present in both with disjoint ranges.
fn unique_slices(
    first: &BTreeMap<String, Property>,
    second: &BTreeMap<String, Property>,
    properties: &PropertyStore,
) -> bool {
    first.iter().any(|(name, p1)| {
        properties.is_slicing_property(name) && second.get(name).is_some_and(|p2| p1.disjoint(p2))
    })
}
