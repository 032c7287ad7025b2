//! Translation of constraints and rules into formulas.

use std::collections::BTreeSet;

use prl_core::{BooleanFeature, Constraint, GroupType, Rule, RuleKind};

use crate::encoding::{
    encode_int_predicate, translate_enum_comparison, translate_enum_in,
    translate_version_comparison, EnumMapping, IntPredicateMapping, IntegerEncodingStore,
    VersionMapping,
};
use crate::error::Result;
use crate::logic::{self, EncodedFormula, FormulaFactory};
use crate::translation::{FeatureInstantiation, TranslationInfo, TranspilerState};

/// Translates constraints against the mappings of one slice set.
///
/// Boolean features without a variable in the slice translate to false.
/// In strict mode every integer predicate must have an indicator variable
/// registered before translation; a missing one is a programming error.
pub(crate) struct Translator<'t> {
    f: &'t FormulaFactory,
    boolean_variables: &'t BTreeSet<String>,
    enum_mapping: &'t EnumMapping,
    version_mapping: &'t VersionMapping,
    int_predicate_mapping: &'t IntPredicateMapping,
    integer_encodings: &'t IntegerEncodingStore,
    instantiation: &'t FeatureInstantiation,
    strict: bool,
}

impl<'t> Translator<'t> {
    pub(crate) fn strict(f: &'t FormulaFactory, state: &'t TranspilerState) -> Self {
        Self {
            f,
            boolean_variables: &state.boolean_variables,
            enum_mapping: &state.enum_mapping,
            version_mapping: &state.version_mapping,
            int_predicate_mapping: &state.int_predicate_mapping,
            integer_encodings: &state.integer_encodings,
            instantiation: &state.instantiation,
            strict: true,
        }
    }

    /// A translator that encodes unregistered integer predicates in place
    /// and does not rely on version helper variables.
    pub(crate) fn adhoc(f: &'t FormulaFactory, info: &'t TranslationInfo) -> Self {
        Self {
            f,
            boolean_variables: &info.boolean_variables,
            enum_mapping: &info.enum_mapping,
            version_mapping: &info.version_mapping,
            int_predicate_mapping: &info.int_predicate_mapping,
            integer_encodings: &info.integer_encodings,
            instantiation: &info.instantiation,
            strict: false,
        }
    }

    fn boolean<'a>(&self, feature: &'a BooleanFeature) -> Option<&'a str> {
        self.boolean_variables
            .contains(&feature.code)
            .then_some(feature.code.as_str())
    }

    /// The feature's variable, or false outside the slice.
    fn boolean_formula(&self, feature: &BooleanFeature) -> EncodedFormula {
        self.boolean(feature)
            .map_or_else(|| self.f.falsum(), |v| self.f.variable(v))
    }

    fn known_booleans<'a>(
        &self,
        features: impl IntoIterator<Item = &'a BooleanFeature>,
    ) -> Vec<&'a str> {
        features.into_iter().filter_map(|b| self.boolean(b)).collect()
    }

    pub(crate) fn constraint(&self, constraint: &Constraint) -> Result<EncodedFormula> {
        let f = self.f;
        Ok(match constraint {
            Constraint::Constant(value) => f.constant(*value),
            Constraint::Boolean(feature) => self.boolean_formula(feature),
            Constraint::Not(operand) => f.not(self.constraint(operand)?),
            Constraint::Implication(left, right) => {
                f.implication(self.constraint(left)?, self.constraint(right)?)
            }
            Constraint::Equivalence(left, right) => {
                f.equivalence(self.constraint(left)?, self.constraint(right)?)
            }
            Constraint::And(operands) => f.and(&self.constraints(operands)?),
            Constraint::Or(operands) => f.or(&self.constraints(operands)?),
            Constraint::Amo(features) => logic::amo(f, self.known_booleans(features)),
            Constraint::Exo(features) => logic::exo(f, self.known_booleans(features)),
            Constraint::EnumComparison { feature, value, op } => {
                translate_enum_comparison(f, self.enum_mapping, feature, value, *op)
            }
            Constraint::EnumIn { feature, values } => {
                translate_enum_in(f, self.enum_mapping, feature, values)
            }
            Constraint::IntComparison { .. } | Constraint::IntIn { .. } => {
                match self.int_predicate_mapping.get(constraint) {
                    Some(indicator) => f.variable(indicator),
                    None if self.strict => panic!(
                        "no indicator variable registered for integer predicate {}",
                        constraint
                    ),
                    None => encode_int_predicate(
                        f,
                        self.integer_encodings,
                        self.instantiation,
                        constraint,
                    )?,
                }
            }
            Constraint::Version {
                feature,
                op,
                version,
            } => {
                let max = self.boolean(feature).map(|_| {
                    self.version_mapping
                        .get(&feature.code)
                        .and_then(|versions| versions.keys().next_back().copied())
                        .unwrap_or(0)
                });
                translate_version_comparison(f, max, self.strict, feature, *op, *version)
            }
        })
    }

    fn constraints(&self, constraints: &BTreeSet<Constraint>) -> Result<Vec<EncodedFormula>> {
        constraints.iter().map(|c| self.constraint(c)).collect()
    }

    pub(crate) fn rule(&self, rule: &Rule) -> Result<EncodedFormula> {
        let f = self.f;
        Ok(match &rule.kind {
            RuleKind::Constraint(constraint) => self.constraint(constraint)?,
            RuleKind::Inclusion { condition, then } => {
                f.implication(self.constraint(condition)?, self.constraint(then)?)
            }
            RuleKind::Exclusion {
                condition,
                then_not,
            } => f.implication(self.constraint(condition)?, f.not(self.constraint(then_not)?)),
            RuleKind::IfThenElse {
                condition,
                then,
                otherwise,
            } => {
                let condition = self.constraint(condition)?;
                f.or(&[
                    f.and(&[condition, self.constraint(then)?]),
                    f.and(&[f.not(condition), self.constraint(otherwise)?]),
                ])
            }
            RuleKind::Definition {
                feature,
                definition,
            } => f.equivalence(self.boolean_formula(feature), self.constraint(definition)?),
            RuleKind::Mandatory(feature_rule) | RuleKind::Forbidden(feature_rule) => {
                self.constraint(feature_rule.constraint())?
            }
            RuleKind::Group {
                group_type,
                group,
                content,
            } => {
                let content = self.known_booleans(content);
                let group = self.boolean_formula(group);
                let cardinality = match group_type {
                    GroupType::Mandatory => logic::exo(f, content.iter().copied()),
                    GroupType::Optional => logic::amo(f, content.iter().copied()),
                };
                f.and(&[
                    cardinality,
                    f.equivalence(group, logic::any(f, content.iter().copied())),
                ])
            }
        })
    }
}
