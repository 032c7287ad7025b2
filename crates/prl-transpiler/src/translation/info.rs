use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use prl_core::{Constraint, Feature, FeatureAssignment, FeatureDefinition, Theory};

use super::{FeatureInstantiation, PrlProposition};
use crate::csp::IntegerVariable;
use crate::encoding::{EnumMapping, IntPredicateMapping, IntegerEncodingStore, VersionMapping};
use crate::error::Result;
use crate::logic::{EncodedFormula, FormulaFactory, Model};
use crate::transpiler::Translator;

/// Everything known about a translated slice set (or a merge of several).
///
/// Besides the propositions, the info keeps the mappings needed to read a
/// solver model back as a feature assignment. Variables are kept by name;
/// the propositions belong to the factory they were transpiled with.
#[derive(Debug, Clone)]
pub struct TranslationInfo {
    pub propositions: Vec<PrlProposition>,
    /// Variables with a meaning in terms of features: booleans, enum values
    /// and version install variables.
    pub known_variables: BTreeSet<String>,
    pub boolean_variables: BTreeSet<String>,
    pub enum_mapping: EnumMapping,
    pub version_mapping: VersionMapping,
    pub int_predicate_mapping: IntPredicateMapping,
    /// Integer variable per integer feature code.
    pub integer_variables: BTreeMap<String, IntegerVariable>,
    /// Auxiliary variables private to this translation.
    pub local_variables: BTreeSet<String>,
    pub instantiation: FeatureInstantiation,
    /// Features used by rules but without definition.
    pub unknown_features: BTreeSet<Feature>,
    pub integer_encodings: Arc<IntegerEncodingStore>,
    var2enum: BTreeMap<String, (String, String)>,
    var2version: BTreeMap<String, (String, i32)>,
}

/// Mutable state of a translation under construction.
#[derive(Debug, Clone, Default)]
pub(crate) struct TranspilerState {
    pub boolean_variables: BTreeSet<String>,
    pub enum_mapping: EnumMapping,
    pub version_mapping: VersionMapping,
    pub int_predicate_mapping: IntPredicateMapping,
    pub integer_variables: BTreeMap<String, IntegerVariable>,
    pub local_variables: BTreeSet<String>,
    pub instantiation: FeatureInstantiation,
    pub unknown_features: BTreeSet<Feature>,
    pub integer_encodings: Arc<IntegerEncodingStore>,
}

impl TranspilerState {
    pub fn known_variables(&self) -> BTreeSet<String> {
        let mut known = self.boolean_variables.clone();
        known.extend(self.enum_mapping.values().flat_map(|m| m.values().cloned()));
        known.extend(self.version_mapping.values().flat_map(|m| m.values().cloned()));
        known
    }

    pub fn into_info(self, propositions: Vec<PrlProposition>) -> TranslationInfo {
        let known_variables = self.known_variables();
        let var2enum = self
            .enum_mapping
            .iter()
            .flat_map(|(feature, values)| {
                values
                    .iter()
                    .map(move |(value, v)| (v.clone(), (feature.clone(), value.clone())))
            })
            .collect();
        let var2version = self
            .version_mapping
            .iter()
            .flat_map(|(feature, versions)| {
                versions
                    .iter()
                    .map(move |(version, v)| (v.clone(), (feature.clone(), *version)))
            })
            .collect();
        TranslationInfo {
            propositions,
            known_variables,
            boolean_variables: self.boolean_variables,
            enum_mapping: self.enum_mapping,
            version_mapping: self.version_mapping,
            int_predicate_mapping: self.int_predicate_mapping,
            integer_variables: self.integer_variables,
            local_variables: self.local_variables,
            instantiation: self.instantiation,
            unknown_features: self.unknown_features,
            integer_encodings: self.integer_encodings,
            var2enum,
            var2version,
        }
    }
}

impl TranslationInfo {
    /// The enum feature and value an enum variable stands for.
    pub fn feature_and_value(&self, variable: &str) -> Option<(&str, &str)> {
        self.var2enum
            .get(variable)
            .map(|(feature, value)| (feature.as_str(), value.as_str()))
    }

    /// The versioned feature and version an install variable stands for.
    pub fn feature_and_version(&self, variable: &str) -> Option<(&str, i32)> {
        self.var2version
            .get(variable)
            .map(|(feature, version)| (feature.as_str(), *version))
    }

    pub fn enum_variables(&self) -> BTreeSet<&str> {
        self.var2enum.keys().map(String::as_str).collect()
    }

    pub fn version_variables(&self) -> BTreeSet<&str> {
        self.var2version.keys().map(String::as_str).collect()
    }

    /// Conjunction of all propositions.
    pub fn formula(&self, f: &FormulaFactory) -> EncodedFormula {
        let formulas: Vec<EncodedFormula> = self.propositions.iter().map(|p| p.formula).collect();
        f.and(&formulas)
    }

    /// Translates a constraint against this translation.
    ///
    /// Integer predicates without an indicator variable are encoded in
    /// place.
    pub fn translate_constraint(
        &self,
        f: &FormulaFactory,
        constraint: &Constraint,
    ) -> Result<EncodedFormula> {
        Translator::adhoc(f, self).constraint(constraint)
    }

    /// Reads a solver model, given as the names of its true variables, as a
    /// feature assignment.
    ///
    /// Every instantiated feature gets a value: booleans their variable,
    /// versioned features the installed version or `0`, enums the first
    /// true value variable and integers the decoded order encoding.
    /// Enum features without a true value variable stay unassigned.
    pub fn decode(&self, model: &Model) -> Result<FeatureAssignment> {
        let mut assignment = FeatureAssignment::new();
        for definition in self.instantiation.boolean.values() {
            if let Feature::Boolean(feature) = definition.feature() {
                if feature.versioned {
                    let version = self
                        .version_mapping
                        .get(&feature.code)
                        .and_then(|versions| {
                            versions.iter().find(|(_, v)| model.contains(*v)).map(|(k, _)| *k)
                        })
                        .unwrap_or(0);
                    assignment.assign_version(&feature, version)?;
                } else {
                    assignment.assign(&feature, model.contains(&feature.code))?;
                }
            }
        }
        for definition in self.instantiation.enums.values() {
            if let Feature::Enum(feature) = definition.feature() {
                let value = self
                    .enum_mapping
                    .get(&feature.code)
                    .and_then(|values| values.iter().find(|(_, v)| model.contains(*v)));
                if let Some((value, _)) = value {
                    assignment.assign_enum(&feature, value.clone());
                }
            }
        }
        for definition in self.instantiation.ints.values() {
            if let (Feature::Int(feature), Some(variable)) = (
                definition.feature(),
                self.integer_variables.get(&definition.code),
            ) {
                if let Some(value) = variable.decode(model) {
                    assignment.assign_int(&feature, value);
                }
            }
        }
        Ok(assignment)
    }

    /// Definitions of the given theory in this translation.
    pub fn definitions(&self, theory: Theory) -> Vec<&FeatureDefinition> {
        self.instantiation
            .definitions()
            .filter(|d| d.theory() == theory)
            .collect()
    }
}
