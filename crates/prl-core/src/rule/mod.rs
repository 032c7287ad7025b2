//! The rule model.
//!
//! A [`Rule`] pairs a [`RuleKind`] with the metadata every rule carries:
//! an id, a description, slicing properties and the source line. The
//! metadata is passed through unchanged when a rule is restricted, renamed
//! or simplified, even when the rule collapses into another kind.

mod display;
mod simplify;


use std::collections::{BTreeMap, BTreeSet};

use crate::constraint::Constraint;
use crate::error::{PrlError, Result};
use crate::feature::{BooleanFeature, EnumFeature, Feature, IntFeature};
use crate::operator::ComparisonOperator;
use crate::property::Property;
use crate::renaming::FeatureRenaming;
use crate::slice::{evaluate_properties, SliceSelection};

/// Whether a group must be selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GroupType {
    Optional,
    Mandatory,
}

/// The feature and value a mandatory or forbidden feature rule refers to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FeatureTarget {
    Boolean(BooleanFeature),
    Version(BooleanFeature, i32),
    Enum(EnumFeature, String),
    Int(IntFeature, i32),
}

impl FeatureTarget {
    pub fn feature(&self) -> Feature {
        match self {
            FeatureTarget::Boolean(f) | FeatureTarget::Version(f, _) => Feature::Boolean(f.clone()),
            FeatureTarget::Enum(f, _) => Feature::Enum(f.clone()),
            FeatureTarget::Int(f, _) => Feature::Int(f.clone()),
        }
    }

    fn rename(&self, renaming: &FeatureRenaming) -> FeatureTarget {
        match self {
            FeatureTarget::Boolean(f) => FeatureTarget::Boolean(renaming.rename_boolean(f)),
            FeatureTarget::Version(f, v) => FeatureTarget::Version(renaming.rename_boolean(f), *v),
            FeatureTarget::Enum(f, v) => {
                FeatureTarget::Enum(renaming.rename_enum(f), renaming.rename_enum_value(f, v))
            }
            FeatureTarget::Int(f, v) => FeatureTarget::Int(renaming.rename_int(f), *v),
        }
    }
}

/// A mandatory or forbidden feature assignment.
///
/// The equivalent constraint is computed once at construction.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeatureRule {
    target: FeatureTarget,
    forbidden: bool,
    constraint: Constraint,
}

impl FeatureRule {
    fn new(target: FeatureTarget, forbidden: bool) -> Self {
        let constraint = match &target {
            FeatureTarget::Boolean(f) => {
                let atom = Constraint::Boolean(f.clone());
                if forbidden {
                    atom.not()
                } else {
                    atom
                }
            }
            FeatureTarget::Version(f, v) => {
                Constraint::version(f.clone(), eq_or_ne(forbidden), *v)
            }
            FeatureTarget::Enum(f, v) => {
                Constraint::enum_comparison(f.clone(), v.clone(), eq_or_ne(forbidden))
            }
            FeatureTarget::Int(f, v) => {
                Constraint::int_comparison(f.clone(), *v, eq_or_ne(forbidden))
            }
        };
        Self {
            target,
            forbidden,
            constraint,
        }
    }

    pub fn target(&self) -> &FeatureTarget {
        &self.target
    }

    pub fn is_forbidden(&self) -> bool {
        self.forbidden
    }

    pub fn constraint(&self) -> &Constraint {
        &self.constraint
    }

    fn rename(&self, renaming: &FeatureRenaming) -> FeatureRule {
        FeatureRule::new(self.target.rename(renaming), self.forbidden)
    }
}

fn eq_or_ne(forbidden: bool) -> ComparisonOperator {
    if forbidden {
        ComparisonOperator::Ne
    } else {
        ComparisonOperator::Eq
    }
}

/// The kind-specific content of a rule.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RuleKind {
    Constraint(Constraint),
    Inclusion {
        condition: Constraint,
        then: Constraint,
    },
    Exclusion {
        condition: Constraint,
        then_not: Constraint,
    },
    IfThenElse {
        condition: Constraint,
        then: Constraint,
        otherwise: Constraint,
    },
    /// `feature <=> definition`; the feature is never versioned.
    Definition {
        feature: BooleanFeature,
        definition: Constraint,
    },
    Mandatory(FeatureRule),
    Forbidden(FeatureRule),
    Group {
        group_type: GroupType,
        group: BooleanFeature,
        content: BTreeSet<BooleanFeature>,
    },
}

/// A rule with its metadata.
///
/// # Example
///
/// ```
/// use prl_core::{BooleanFeature, Constraint, FeatureAssignment, Rule, RuleKind};
///
/// let a = BooleanFeature::new("a");
/// let b = BooleanFeature::new("b");
/// let rule = Rule::inclusion(Constraint::from(a.clone()), Constraint::from(b.clone()))
///     .with_id("r1");
///
/// let mut assignment = FeatureAssignment::new();
/// assignment.assign(&a, true).unwrap();
/// let restricted = rule.restrict(&assignment);
/// assert_eq!(restricted.kind, RuleKind::Constraint(Constraint::from(b)));
/// assert_eq!(restricted.id, "r1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rule {
    pub kind: RuleKind,
    pub id: String,
    pub description: String,
    pub properties: BTreeMap<String, Property>,
    pub line_number: Option<u32>,
}

impl From<RuleKind> for Rule {
    fn from(kind: RuleKind) -> Self {
        Self {
            kind,
            id: String::new(),
            description: String::new(),
            properties: BTreeMap::new(),
            line_number: None,
        }
    }
}

impl Rule {
    pub fn constraint(constraint: Constraint) -> Rule {
        RuleKind::Constraint(constraint).into()
    }

    pub fn inclusion(condition: Constraint, then: Constraint) -> Rule {
        RuleKind::Inclusion { condition, then }.into()
    }

    pub fn exclusion(condition: Constraint, then_not: Constraint) -> Rule {
        RuleKind::Exclusion {
            condition,
            then_not,
        }
        .into()
    }

    pub fn if_then_else(condition: Constraint, then: Constraint, otherwise: Constraint) -> Rule {
        RuleKind::IfThenElse {
            condition,
            then,
            otherwise,
        }
        .into()
    }

    /// Defines `feature` as equivalent to `definition`.
    ///
    /// # Errors
    ///
    /// Returns [`PrlError::VersionedDefinition`] for a versioned feature.
    pub fn definition(feature: BooleanFeature, definition: Constraint) -> Result<Rule> {
        if feature.versioned {
            return Err(PrlError::VersionedDefinition(feature.code));
        }
        Ok(RuleKind::Definition {
            feature,
            definition,
        }
        .into())
    }

    pub fn mandatory(target: FeatureTarget) -> Rule {
        RuleKind::Mandatory(FeatureRule::new(target, false)).into()
    }

    pub fn forbidden(target: FeatureTarget) -> Rule {
        RuleKind::Forbidden(FeatureRule::new(target, true)).into()
    }

    pub fn group(
        group_type: GroupType,
        group: BooleanFeature,
        content: impl IntoIterator<Item = BooleanFeature>,
    ) -> Rule {
        RuleKind::Group {
            group_type,
            group,
            content: content.into_iter().collect(),
        }
        .into()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.insert(property.name.clone(), property);
        self
    }

    pub fn with_properties(mut self, properties: BTreeMap<String, Property>) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_line_number(mut self, line_number: Option<u32>) -> Self {
        self.line_number = line_number;
        self
    }

    /// A rule of another kind carrying this rule's metadata.
    pub(crate) fn derive(&self, kind: RuleKind) -> Rule {
        Rule {
            kind,
            id: self.id.clone(),
            description: self.description.clone(),
            properties: self.properties.clone(),
            line_number: self.line_number,
        }
    }

    /// The constraints the rule is built from.
    pub fn constraints(&self) -> Vec<&Constraint> {
        match &self.kind {
            RuleKind::Constraint(c) => vec![c],
            RuleKind::Inclusion { condition, then } => vec![condition, then],
            RuleKind::Exclusion {
                condition,
                then_not,
            } => vec![condition, then_not],
            RuleKind::IfThenElse {
                condition,
                then,
                otherwise,
            } => vec![condition, then, otherwise],
            RuleKind::Definition { definition, .. } => vec![definition],
            RuleKind::Mandatory(rule) | RuleKind::Forbidden(rule) => vec![&rule.constraint],
            RuleKind::Group { .. } => Vec::new(),
        }
    }

    /// Boolean features the rule refers to outside of its constraints.
    fn own_features(&self) -> Vec<&BooleanFeature> {
        match &self.kind {
            RuleKind::Definition { feature, .. } => vec![feature],
            RuleKind::Group { group, content, .. } => {
                std::iter::once(group).chain(content.iter()).collect()
            }
            _ => Vec::new(),
        }
    }

    pub fn features(&self) -> BTreeSet<Feature> {
        let mut result: BTreeSet<Feature> = self
            .constraints()
            .into_iter()
            .flat_map(Constraint::features)
            .collect();
        result.extend(self.own_features().into_iter().cloned().map(Feature::Boolean));
        result
    }

    /// Boolean features used as atoms; see [`Constraint::boolean_features`].
    pub fn boolean_features(&self) -> BTreeSet<BooleanFeature> {
        let mut result: BTreeSet<BooleanFeature> = self
            .constraints()
            .into_iter()
            .flat_map(Constraint::boolean_features)
            .collect();
        result.extend(self.own_features().into_iter().cloned());
        result
    }

    pub fn enum_features(&self) -> BTreeSet<EnumFeature> {
        self.enum_values().into_keys().collect()
    }

    pub fn enum_values(&self) -> BTreeMap<EnumFeature, BTreeSet<String>> {
        let mut result: BTreeMap<EnumFeature, BTreeSet<String>> = BTreeMap::new();
        for constraint in self.constraints() {
            for (feature, values) in constraint.enum_values() {
                result.entry(feature).or_default().extend(values);
            }
        }
        result
    }

    pub fn int_features(&self) -> BTreeSet<IntFeature> {
        self.constraints()
            .into_iter()
            .flat_map(Constraint::int_features)
            .collect()
    }

    /// Whether the rule applies under all the given selections.
    pub fn filter(&self, selections: &[SliceSelection]) -> bool {
        evaluate_properties(&self.properties, selections)
    }

    pub fn rename(&self, renaming: &FeatureRenaming) -> Rule {
        let kind = match &self.kind {
            RuleKind::Constraint(c) => RuleKind::Constraint(c.rename(renaming)),
            RuleKind::Inclusion { condition, then } => RuleKind::Inclusion {
                condition: condition.rename(renaming),
                then: then.rename(renaming),
            },
            RuleKind::Exclusion {
                condition,
                then_not,
            } => RuleKind::Exclusion {
                condition: condition.rename(renaming),
                then_not: then_not.rename(renaming),
            },
            RuleKind::IfThenElse {
                condition,
                then,
                otherwise,
            } => RuleKind::IfThenElse {
                condition: condition.rename(renaming),
                then: then.rename(renaming),
                otherwise: otherwise.rename(renaming),
            },
            RuleKind::Definition {
                feature,
                definition,
            } => RuleKind::Definition {
                feature: renaming.rename_boolean(feature),
                definition: definition.rename(renaming),
            },
            RuleKind::Mandatory(rule) => RuleKind::Mandatory(rule.rename(renaming)),
            RuleKind::Forbidden(rule) => RuleKind::Forbidden(rule.rename(renaming)),
            RuleKind::Group {
                group_type,
                group,
                content,
            } => RuleKind::Group {
                group_type: *group_type,
                group: renaming.rename_boolean(group),
                content: content.iter().map(|f| renaming.rename_boolean(f)).collect(),
            },
        };
        self.derive(kind)
    }

    pub fn strip_properties(&self) -> Rule {
        Rule {
            properties: BTreeMap::new(),
            ..self.clone()
        }
    }

    /// Drops id and description.
    pub fn strip_meta_info(&self) -> Rule {
        Rule {
            id: String::new(),
            description: String::new(),
            ..self.clone()
        }
    }

    pub fn strip_all(&self) -> Rule {
        Rule {
            id: String::new(),
            description: String::new(),
            properties: BTreeMap::new(),
            ..self.clone()
        }
    }
}
