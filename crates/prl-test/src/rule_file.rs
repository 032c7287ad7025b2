//! Builder for parsed rule files.
//!
//! # Example
//!
//! ```ignore
//! use prl_compiler::syntax::PrlFeatureDefinition;
//! use prl_core::PropertyType;
//! use prl_test::rule_file::{feature, int_property, RuleFileBuilder};
//!
//! let file = RuleFileBuilder::new()
//!     .slicing_property("version", PropertyType::Int)
//!     .booleans(["a"])
//!     .feature(PrlFeatureDefinition::boolean("b").with_property(int_property("version", 1, 1)))
//!     .constraint(feature("a"))
//!     .build();
//! ```

use prl_compiler::syntax::{
    PrlConstraint, PrlFeatureDefinition, PrlProperty, PrlRule, PrlRuleFile, PrlRuleKind,
    PrlSlicingPropertyDefinition, PrlTerm,
};
use prl_compiler::{PrlCompiler, PrlModel};
use prl_core::{ComparisonOperator, IntRange, PropertyType};

/// Compiles a rule file, panicking on compiler errors.
pub fn compile(file: &PrlRuleFile) -> PrlModel {
    let mut compiler = PrlCompiler::new();
    let model = compiler.compile(file);
    assert!(
        !compiler.has_errors(),
        "rule file does not compile: {:?}",
        compiler.errors()
    );
    model
}

/// Incrementally builds a [`PrlRuleFile`].
#[derive(Debug, Clone, Default)]
pub struct RuleFileBuilder {
    file: PrlRuleFile,
}

impl RuleFileBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slicing_property(mut self, name: &str, property_type: PropertyType) -> Self {
        self.file
            .slicing_property_definitions
            .push(PrlSlicingPropertyDefinition::new(name, property_type));
        self
    }

    pub fn feature(mut self, definition: PrlFeatureDefinition) -> Self {
        self.file.rule_set.feature_definitions.push(definition);
        self
    }

    /// Adds plain boolean features without properties.
    pub fn booleans<'a>(self, codes: impl IntoIterator<Item = &'a str>) -> Self {
        codes
            .into_iter()
            .fold(self, |builder, code| builder.feature(PrlFeatureDefinition::boolean(code)))
    }

    pub fn rule(mut self, rule: impl Into<PrlRule>) -> Self {
        self.file.rule_set.rules.push(rule.into());
        self
    }

    pub fn constraint(self, constraint: PrlConstraint) -> Self {
        self.rule(PrlRuleKind::Constraint(constraint))
    }

    pub fn inclusion(self, condition: PrlConstraint, then: PrlConstraint) -> Self {
        self.rule(PrlRuleKind::Inclusion { condition, then })
    }

    pub fn build(self) -> PrlRuleFile {
        self.file
    }

    pub fn compile(self) -> PrlModel {
        compile(&self.file)
    }
}

pub fn feature(code: &str) -> PrlConstraint {
    PrlConstraint::feature(code)
}

pub fn and(operands: impl IntoIterator<Item = PrlConstraint>) -> PrlConstraint {
    PrlConstraint::And(operands.into_iter().collect())
}

pub fn or(operands: impl IntoIterator<Item = PrlConstraint>) -> PrlConstraint {
    PrlConstraint::Or(operands.into_iter().collect())
}

/// `[code op value]` for an integer or versioned feature.
pub fn compare(code: &str, op: ComparisonOperator, value: i32) -> PrlConstraint {
    PrlConstraint::comparison(PrlTerm::feature(code), op, value)
}

/// `[code = "value"]` for an enum feature.
pub fn enum_eq(code: &str, value: &str) -> PrlConstraint {
    PrlConstraint::comparison(
        PrlTerm::feature(code),
        ComparisonOperator::Eq,
        PrlTerm::enum_value(value),
    )
}

/// `[code in [start - end]]` for an integer feature.
pub fn in_range(code: &str, start: i32, end: i32) -> PrlConstraint {
    PrlConstraint::InIntRange {
        term: PrlTerm::feature(code),
        range: IntRange::interval(start, end),
    }
}

pub fn int_property(name: &str, start: i32, end: i32) -> PrlProperty {
    PrlProperty::new(name, IntRange::interval(start, end))
}
