//! The compiled model.

mod slice_set;


use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use prl_core::{
    compute_all_slices, evaluate_properties, BooleanFeature, EnumFeature, Feature,
    FeatureAssignment, FeatureDefinition, IntFeature, PrlError, Property, Result, Rule, Slice,
    SliceSelection, SlicingPropertyDefinition,
};

pub use slice_set::{compute_slice_sets, SliceSet};

use crate::store::{FeatureStore, PropertyStore};

/// Language version of a rule file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PrlVersion {
    pub major: u32,
    pub minor: u32,
}

impl PrlVersion {
    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for PrlVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Version and header properties of a compiled model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrlModelHeader {
    pub version: PrlVersion,
    pub properties: BTreeMap<String, Property>,
}

impl PrlModelHeader {
    pub fn strip_properties(&self) -> PrlModelHeader {
        PrlModelHeader {
            version: self.version,
            properties: BTreeMap::new(),
        }
    }
}

/// A compiled rule file.
///
/// The model is immutable: its stores and rules can be read, restricted and
/// filtered, but not changed.
#[derive(Debug, Clone)]
pub struct PrlModel {
    header: PrlModelHeader,
    feature_store: FeatureStore,
    rules: Vec<Rule>,
    property_store: PropertyStore,
    features: BTreeMap<String, Feature>,
}

impl PrlModel {
    pub(crate) fn new(
        header: PrlModelHeader,
        feature_store: FeatureStore,
        rules: Vec<Rule>,
        property_store: PropertyStore,
    ) -> Self {
        let features = feature_store
            .all_definitions()
            .map(|d| (d.code.clone(), d.feature()))
            .collect();
        Self {
            header,
            feature_store,
            rules,
            property_store,
            features,
        }
    }

    pub fn header(&self) -> &PrlModelHeader {
        &self.header
    }

    pub fn feature_store(&self) -> &FeatureStore {
        &self.feature_store
    }

    pub fn property_store(&self) -> &PropertyStore {
        &self.property_store
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// The feature with the given code.
    ///
    /// # Errors
    ///
    /// Returns [`PrlError::UnknownFeature`] if no definition has this code.
    pub fn feature(&self, code: &str) -> Result<&Feature> {
        self.features
            .get(code)
            .ok_or_else(|| PrlError::UnknownFeature(code.to_string()))
    }

    pub fn features(&self) -> BTreeSet<Feature> {
        self.features.values().cloned().collect()
    }

    pub fn boolean_features(&self) -> BTreeSet<BooleanFeature> {
        self.feature_store.boolean_features()
    }

    pub fn enum_features(&self) -> BTreeSet<EnumFeature> {
        self.feature_store.enum_features()
    }

    pub fn int_features(&self) -> BTreeSet<IntFeature> {
        self.feature_store.int_features()
    }

    /// Declared values of every enum feature, united over all its definitions.
    pub fn enum_values(&self) -> BTreeMap<EnumFeature, BTreeSet<String>> {
        let mut result: BTreeMap<EnumFeature, BTreeSet<String>> = BTreeMap::new();
        for definition in self.feature_store.enum_definitions() {
            if let Some(values) = definition.enum_values() {
                result
                    .entry(EnumFeature::new(&definition.code))
                    .or_default()
                    .extend(values.iter().cloned());
            }
        }
        result
    }

    /// Whether every rule holds under the assignment.
    pub fn evaluate(&self, assignment: &FeatureAssignment) -> bool {
        self.rules.iter().all(|r| r.evaluate(assignment))
    }

    pub fn evaluate_each_rule(&self, assignment: &FeatureAssignment) -> Vec<(&Rule, bool)> {
        self.rules
            .iter()
            .map(|r| (r, r.evaluate(assignment)))
            .collect()
    }

    pub fn restrict(&self, assignment: &FeatureAssignment) -> Vec<Rule> {
        self.rules.iter().map(|r| r.restrict(assignment)).collect()
    }

    pub fn syntactic_simplify(&self) -> Vec<Rule> {
        self.rules.iter().map(Rule::syntactic_simplify).collect()
    }

    /// Rules whose properties match all selections.
    pub fn rules_for(&self, selections: &[SliceSelection]) -> Vec<&Rule> {
        self.rules.iter().filter(|r| r.filter(selections)).collect()
    }

    pub fn rules_for_slice(&self, slice: &Slice) -> Vec<&Rule> {
        self.rules_for(&slice.selectors())
    }

    /// Feature definitions whose properties match all selections.
    pub fn feature_definitions_for(&self, selections: &[SliceSelection]) -> Vec<&FeatureDefinition> {
        self.feature_store
            .all_definitions()
            .filter(|d| evaluate_properties(&d.properties, selections))
            .collect()
    }

    pub fn feature_definitions_for_slice(&self, slice: &Slice) -> Vec<&FeatureDefinition> {
        self.feature_definitions_for(&slice.selectors())
    }

    pub fn property_definition(&self, name: &str) -> Result<&SlicingPropertyDefinition> {
        self.property_store.definition(name)
    }

    /// All slices of the model for the given selectors.
    ///
    /// # Errors
    ///
    /// Returns [`PrlError::MaxNumberOfSlicesExceeded`] if there are more
    /// than `max_number_of_slices` slices.
    pub fn compute_slices(
        &self,
        selectors: &[SliceSelection],
        max_number_of_slices: usize,
    ) -> Result<Vec<Slice>> {
        compute_all_slices(
            selectors,
            self.property_store.definitions(),
            max_number_of_slices,
        )
    }

    /// All slices of the model for the given selectors, grouped into slice
    /// sets of identical content.
    pub fn slice_sets(
        &self,
        selectors: &[SliceSelection],
        max_number_of_slices: usize,
    ) -> Result<Vec<SliceSet<'_>>> {
        let slices = self.compute_slices(selectors, max_number_of_slices)?;
        Ok(compute_slice_sets(slices, self))
    }
}
