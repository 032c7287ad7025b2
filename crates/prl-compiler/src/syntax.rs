//! Parsed rule files.
//!
//! These types mirror the output of the rule-file parser. Features are
//! referenced by code only; their theories are unknown until the compiler
//! resolves them against the feature definitions.

use std::collections::{BTreeMap, BTreeSet};

use prl_core::{
    AnyRange, ComparisonOperator, FeatureDefinition, GroupType, IntRange, Property, PropertyType,
};

/// A property attached to a header, feature definition or rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrlProperty {
    pub name: String,
    pub range: AnyRange,
    pub line_number: Option<u32>,
}

impl PrlProperty {
    pub fn new(name: impl Into<String>, range: impl Into<AnyRange>) -> Self {
        Self {
            name: name.into(),
            range: range.into(),
            line_number: None,
        }
    }

    pub fn with_line_number(mut self, line_number: u32) -> Self {
        self.line_number = Some(line_number);
        self
    }

    pub fn compile(&self) -> Property {
        Property::new(self.name.clone(), self.range.clone())
    }
}

/// Compiles parsed properties into a map by name; later duplicates win.
pub fn compile_properties(properties: &[PrlProperty]) -> BTreeMap<String, Property> {
    properties
        .iter()
        .map(|p| (p.name.clone(), p.compile()))
        .collect()
}

/// Language version and free-form properties of a rule file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrlHeader {
    pub major: u32,
    pub minor: u32,
    pub properties: Vec<PrlProperty>,
}

impl Default for PrlHeader {
    fn default() -> Self {
        Self {
            major: 1,
            minor: 0,
            properties: Vec::new(),
        }
    }
}

/// Declaration of a slicing property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrlSlicingPropertyDefinition {
    pub name: String,
    pub property_type: PropertyType,
    pub line_number: Option<u32>,
}

impl PrlSlicingPropertyDefinition {
    pub fn new(name: impl Into<String>, property_type: PropertyType) -> Self {
        Self {
            name: name.into(),
            property_type,
            line_number: None,
        }
    }
}

/// Declared type of a parsed feature definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrlFeatureType {
    Boolean { versioned: bool },
    Enum { values: Vec<String> },
    Int { domain: IntRange },
}

/// A parsed feature definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrlFeatureDefinition {
    pub code: String,
    pub feature_type: PrlFeatureType,
    pub description: String,
    pub properties: Vec<PrlProperty>,
    pub line_number: Option<u32>,
}

impl PrlFeatureDefinition {
    fn with_type(code: impl Into<String>, feature_type: PrlFeatureType) -> Self {
        Self {
            code: code.into(),
            feature_type,
            description: String::new(),
            properties: Vec::new(),
            line_number: None,
        }
    }

    pub fn boolean(code: impl Into<String>) -> Self {
        Self::with_type(code, PrlFeatureType::Boolean { versioned: false })
    }

    pub fn versioned(code: impl Into<String>) -> Self {
        Self::with_type(code, PrlFeatureType::Boolean { versioned: true })
    }

    pub fn enumeration<S: Into<String>>(
        code: impl Into<String>,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        Self::with_type(code, PrlFeatureType::Enum { values })
    }

    pub fn int(code: impl Into<String>, domain: IntRange) -> Self {
        Self::with_type(code, PrlFeatureType::Int { domain })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_property(mut self, property: PrlProperty) -> Self {
        self.properties.push(property);
        self
    }

    pub fn with_line_number(mut self, line_number: u32) -> Self {
        self.line_number = Some(line_number);
        self
    }

    /// The typed definition of this feature.
    pub fn compile(&self) -> FeatureDefinition {
        let definition = match &self.feature_type {
            PrlFeatureType::Boolean { versioned: false } => FeatureDefinition::boolean(&self.code),
            PrlFeatureType::Boolean { versioned: true } => FeatureDefinition::versioned(&self.code),
            PrlFeatureType::Enum { values } => {
                FeatureDefinition::enumeration(&self.code, values.iter().cloned())
            }
            PrlFeatureType::Int { domain } => FeatureDefinition::int(&self.code, domain.clone()),
        };
        definition
            .with_description(self.description.clone())
            .with_properties(compile_properties(&self.properties))
            .with_line_number(self.line_number)
    }
}

/// A parsed term of a comparison or membership predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrlTerm {
    Feature(String),
    IntValue(i32),
    EnumValue(String),
    Mul(Box<PrlTerm>, Box<PrlTerm>),
    Add(Vec<PrlTerm>),
}

impl PrlTerm {
    pub fn feature(code: impl Into<String>) -> Self {
        PrlTerm::Feature(code.into())
    }

    pub fn enum_value(value: impl Into<String>) -> Self {
        PrlTerm::EnumValue(value.into())
    }

    pub fn mul(left: PrlTerm, right: PrlTerm) -> Self {
        PrlTerm::Mul(Box::new(left), Box::new(right))
    }

    /// True for terms that can only be integers.
    pub(crate) fn is_int(&self) -> bool {
        matches!(self, PrlTerm::IntValue(_) | PrlTerm::Mul(..) | PrlTerm::Add(_))
    }

    /// Codes of the features in the term, in order of occurrence.
    pub fn features(&self) -> Vec<&str> {
        let mut result = Vec::new();
        self.collect_features(&mut result);
        result
    }

    fn collect_features<'a>(&'a self, result: &mut Vec<&'a str>) {
        match self {
            PrlTerm::Feature(code) => result.push(code),
            PrlTerm::IntValue(_) | PrlTerm::EnumValue(_) => {}
            PrlTerm::Mul(left, right) => {
                left.collect_features(result);
                right.collect_features(result);
            }
            PrlTerm::Add(operands) => operands.iter().for_each(|t| t.collect_features(result)),
        }
    }
}

impl From<i32> for PrlTerm {
    fn from(value: i32) -> Self {
        PrlTerm::IntValue(value)
    }
}

/// A parsed constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrlConstraint {
    Constant(bool),
    Feature(String),
    Not(Box<PrlConstraint>),
    Implication(Box<PrlConstraint>, Box<PrlConstraint>),
    Equivalence(Box<PrlConstraint>, Box<PrlConstraint>),
    And(Vec<PrlConstraint>),
    Or(Vec<PrlConstraint>),
    Amo(Vec<String>),
    Exo(Vec<String>),
    Comparison {
        left: PrlTerm,
        op: ComparisonOperator,
        right: PrlTerm,
    },
    InIntRange {
        term: PrlTerm,
        range: IntRange,
    },
    InEnums {
        term: PrlTerm,
        values: Vec<String>,
    },
}

impl PrlConstraint {
    pub fn feature(code: impl Into<String>) -> Self {
        PrlConstraint::Feature(code.into())
    }

    pub fn not(self) -> Self {
        PrlConstraint::Not(Box::new(self))
    }

    pub fn implication(left: PrlConstraint, right: PrlConstraint) -> Self {
        PrlConstraint::Implication(Box::new(left), Box::new(right))
    }

    pub fn equivalence(left: PrlConstraint, right: PrlConstraint) -> Self {
        PrlConstraint::Equivalence(Box::new(left), Box::new(right))
    }

    pub fn comparison(left: PrlTerm, op: ComparisonOperator, right: impl Into<PrlTerm>) -> Self {
        PrlConstraint::Comparison {
            left,
            op,
            right: right.into(),
        }
    }

    /// Codes of all features referenced in the constraint, in order of
    /// occurrence.
    pub fn features(&self) -> Vec<&str> {
        let mut result = Vec::new();
        self.collect_features(&mut result);
        result
    }

    fn collect_features<'a>(&'a self, result: &mut Vec<&'a str>) {
        match self {
            PrlConstraint::Constant(_) => {}
            PrlConstraint::Feature(code) => result.push(code),
            PrlConstraint::Not(operand) => operand.collect_features(result),
            PrlConstraint::Implication(left, right) | PrlConstraint::Equivalence(left, right) => {
                left.collect_features(result);
                right.collect_features(result);
            }
            PrlConstraint::And(operands) | PrlConstraint::Or(operands) => {
                operands.iter().for_each(|c| c.collect_features(result))
            }
            PrlConstraint::Amo(features) | PrlConstraint::Exo(features) => {
                result.extend(features.iter().map(String::as_str))
            }
            PrlConstraint::Comparison { left, right, .. } => {
                left.collect_features(result);
                right.collect_features(result);
            }
            PrlConstraint::InIntRange { term, .. } | PrlConstraint::InEnums { term, .. } => {
                term.collect_features(result)
            }
        }
    }
}

/// The feature and optional value of a parsed mandatory or forbidden
/// feature rule.
///
/// `int_value` holds the value of an integer feature or the version of a
/// versioned feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrlFeatureRule {
    pub feature: String,
    pub enum_value: Option<String>,
    pub int_value: Option<i32>,
}

impl PrlFeatureRule {
    pub fn boolean(feature: impl Into<String>) -> Self {
        Self {
            feature: feature.into(),
            enum_value: None,
            int_value: None,
        }
    }

    pub fn enumeration(feature: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            enum_value: Some(value.into()),
            ..Self::boolean(feature)
        }
    }

    pub fn int(feature: impl Into<String>, value: i32) -> Self {
        Self {
            int_value: Some(value),
            ..Self::boolean(feature)
        }
    }
}

/// Kind and body of a parsed rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrlRuleKind {
    Constraint(PrlConstraint),
    Inclusion {
        condition: PrlConstraint,
        then: PrlConstraint,
    },
    Exclusion {
        condition: PrlConstraint,
        then_not: PrlConstraint,
    },
    IfThenElse {
        condition: PrlConstraint,
        then: PrlConstraint,
        otherwise: PrlConstraint,
    },
    Definition {
        feature: String,
        definition: PrlConstraint,
    },
    Group {
        group_type: GroupType,
        group: String,
        content: Vec<String>,
    },
    Mandatory(PrlFeatureRule),
    Forbidden(PrlFeatureRule),
}

/// A parsed rule with its metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrlRule {
    pub kind: PrlRuleKind,
    pub id: String,
    pub description: String,
    pub properties: Vec<PrlProperty>,
    pub line_number: Option<u32>,
}

impl PrlRule {
    pub fn new(kind: PrlRuleKind) -> Self {
        Self {
            kind,
            id: String::new(),
            description: String::new(),
            properties: Vec::new(),
            line_number: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_property(mut self, property: PrlProperty) -> Self {
        self.properties.push(property);
        self
    }

    pub fn with_line_number(mut self, line_number: u32) -> Self {
        self.line_number = Some(line_number);
        self
    }

    /// Codes of all features the rule refers to, including group features.
    pub fn features(&self) -> BTreeSet<&str> {
        let mut result = Vec::new();
        match &self.kind {
            PrlRuleKind::Constraint(c) => c.collect_features(&mut result),
            PrlRuleKind::Inclusion { condition, then } => {
                condition.collect_features(&mut result);
                then.collect_features(&mut result);
            }
            PrlRuleKind::Exclusion {
                condition,
                then_not,
            } => {
                condition.collect_features(&mut result);
                then_not.collect_features(&mut result);
            }
            PrlRuleKind::IfThenElse {
                condition,
                then,
                otherwise,
            } => {
                condition.collect_features(&mut result);
                then.collect_features(&mut result);
                otherwise.collect_features(&mut result);
            }
            PrlRuleKind::Definition {
                feature,
                definition,
            } => {
                result.push(feature);
                definition.collect_features(&mut result);
            }
            PrlRuleKind::Group { group, content, .. } => {
                result.push(group);
                result.extend(content.iter().map(String::as_str));
            }
            PrlRuleKind::Mandatory(rule) | PrlRuleKind::Forbidden(rule) => {
                result.push(&rule.feature)
            }
        }
        result.into_iter().collect()
    }
}

impl From<PrlRuleKind> for PrlRule {
    fn from(kind: PrlRuleKind) -> Self {
        PrlRule::new(kind)
    }
}

/// Feature definitions and rules of a rule file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrlRuleSet {
    pub feature_definitions: Vec<PrlFeatureDefinition>,
    pub rules: Vec<PrlRule>,
    pub line_number: Option<u32>,
}

impl PrlRuleSet {
    /// Codes of all features referenced by any rule.
    pub fn features(&self) -> BTreeSet<&str> {
        self.rules.iter().flat_map(PrlRule::features).collect()
    }
}

/// A complete parsed rule file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrlRuleFile {
    pub header: PrlHeader,
    pub rule_set: PrlRuleSet,
    pub slicing_property_definitions: Vec<PrlSlicingPropertyDefinition>,
    pub file_name: Option<String>,
}
