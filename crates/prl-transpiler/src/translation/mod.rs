//! Results of transpiling slice sets.

mod info;
mod model;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;
use std::fmt;

use prl_core::{Feature, FeatureDefinition, Rule, Slice, Theory};

use crate::logic::{self, EncodedFormula, FormulaFactory, Renaming};

pub use info::TranslationInfo;
pub(crate) use info::TranspilerState;
pub use model::ModelTranslation;

/// Why a proposition is part of a translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RuleType {
    OriginalRule,
    UnknownFeatureInSlice,
    FeatureEquivalenceOverSlices,
    EnumFeatureConstraint,
    IntegerVariable,
    IntegerPredicateDefinition,
    VersionIntervalVariable,
    VersionAmoConstraint,
    VersionEquivalence,
    AdditionalRestriction,
}

impl RuleType {
    pub fn description(self) -> &'static str {
        match self {
            RuleType::OriginalRule => "Original rule from the rule file",
            RuleType::UnknownFeatureInSlice => "Unknown feature in this slice",
            RuleType::FeatureEquivalenceOverSlices => "Feature equivalence for slice",
            RuleType::EnumFeatureConstraint => "EXO constraint for enum feature values",
            RuleType::IntegerVariable => "Definition of an int feature",
            RuleType::IntegerPredicateDefinition => "Definition of predicate auxiliary variable",
            RuleType::VersionIntervalVariable => "Definition of version interval variables",
            RuleType::VersionAmoConstraint => "AMO constraint for versioned feature",
            RuleType::VersionEquivalence => "Equivalence constraint for versioned feature",
            RuleType::AdditionalRestriction => "Additional user-provided restriction",
        }
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Provenance of a proposition.
///
/// `slice_set` is the index of the slice set the proposition was created
/// for; model-wide propositions carry none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleInformation {
    pub rule_type: RuleType,
    pub rule: Option<Rule>,
    pub slice_set: Option<usize>,
}

impl RuleInformation {
    pub fn original(rule: &Rule, slice_set: usize) -> Self {
        Self {
            rule_type: RuleType::OriginalRule,
            rule: Some(rule.clone()),
            slice_set: Some(slice_set),
        }
    }

    pub fn additional(rule: &Rule) -> Self {
        Self {
            rule_type: RuleType::AdditionalRestriction,
            rule: Some(rule.clone()),
            slice_set: None,
        }
    }

    pub fn of_type(rule_type: RuleType, slice_set: Option<usize>) -> Self {
        Self {
            rule_type,
            rule: None,
            slice_set,
        }
    }
}

/// A formula together with its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrlProposition {
    pub info: RuleInformation,
    pub formula: EncodedFormula,
}

impl PrlProposition {
    pub fn new(info: RuleInformation, formula: EncodedFormula) -> Self {
        Self { info, formula }
    }

    /// The proposition with its variables renamed.
    pub fn rename(&self, f: &FormulaFactory, renaming: &Renaming) -> Self {
        Self {
            info: self.info.clone(),
            formula: logic::rename(f, self.formula, renaming),
        }
    }
}

/// The definition each feature code has in a slice set, per theory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureInstantiation {
    pub boolean: BTreeMap<String, FeatureDefinition>,
    pub enums: BTreeMap<String, FeatureDefinition>,
    pub ints: BTreeMap<String, FeatureDefinition>,
}

impl FeatureInstantiation {
    pub fn from_definitions<'a>(
        definitions: impl IntoIterator<Item = &'a FeatureDefinition>,
    ) -> Self {
        let mut result = Self::default();
        for definition in definitions {
            result
                .theory_map_mut(definition.theory())
                .insert(definition.code.clone(), definition.clone());
        }
        result
    }

    /// Merges the instantiations of several slices; definitions of the same
    /// code are merged with [`FeatureDefinition::merge`].
    pub fn merge<'a>(instantiations: impl IntoIterator<Item = &'a FeatureInstantiation>) -> Self {
        let mut grouped: BTreeMap<(Theory, &'a str), Vec<&'a FeatureDefinition>> = BTreeMap::new();
        for instantiation in instantiations {
            for definition in instantiation.definitions() {
                grouped
                    .entry((definition.theory(), definition.code.as_str()))
                    .or_default()
                    .push(definition);
            }
        }
        let mut result = Self::default();
        for ((theory, code), definitions) in grouped {
            if let Some(merged) = FeatureDefinition::merge(definitions) {
                result.theory_map_mut(theory).insert(code.to_string(), merged);
            }
        }
        result
    }

    fn theory_map_mut(&mut self, theory: Theory) -> &mut BTreeMap<String, FeatureDefinition> {
        match theory {
            Theory::Bool | Theory::VersionedBool => &mut self.boolean,
            Theory::Enum => &mut self.enums,
            Theory::Int => &mut self.ints,
        }
    }

    pub fn get(&self, feature: &Feature) -> Option<&FeatureDefinition> {
        match feature {
            Feature::Boolean(f) => self.boolean.get(&f.code),
            Feature::Enum(f) => self.enums.get(&f.code),
            Feature::Int(f) => self.ints.get(&f.code),
        }
    }

    pub fn contains(&self, feature: &Feature) -> bool {
        self.get(feature).is_some()
    }

    pub fn definitions(&self) -> impl Iterator<Item = &FeatureDefinition> {
        self.boolean
            .values()
            .chain(self.enums.values())
            .chain(self.ints.values())
    }

    pub fn len(&self) -> usize {
        self.boolean.len() + self.enums.len() + self.ints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The translation of one slice set.
#[derive(Debug, Clone)]
pub struct SliceTranslation {
    /// Index of the slice set in the model translation.
    pub index: usize,
    pub slices: Vec<Slice>,
    pub info: TranslationInfo,
}

impl SliceTranslation {
    pub fn propositions(&self) -> &[PrlProposition] {
        &self.info.propositions
    }

    pub fn contains(&self, slice: &Slice) -> bool {
        self.slices.contains(slice)
    }
}
