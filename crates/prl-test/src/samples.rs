//! Sample rule files.
//!
//! Every sample compiles without diagnostics. The sliced samples declare an
//! integer slicing property `version` with the relevant values 1 and 2.

use prl_compiler::syntax::{
    PrlConstraint, PrlFeatureDefinition, PrlFeatureRule, PrlRuleFile, PrlRuleKind, PrlTerm,
};
use prl_core::{ComparisonOperator, IntRange, PropertyType};

use crate::rule_file::{and, compare, enum_eq, feature, in_range, int_property, or, RuleFileBuilder};

/// Booleans `a`, `b`, `c`, `x`:
/// `a`, `a => b`, `amo[b, c]`, `x <=> (b & -c)`.
pub fn boolean_rules() -> PrlRuleFile {
    RuleFileBuilder::new()
        .booleans(["a", "b", "c", "x"])
        .constraint(feature("a"))
        .inclusion(feature("a"), feature("b"))
        .constraint(PrlConstraint::Amo(vec!["b".into(), "c".into()]))
        .constraint(PrlConstraint::equivalence(
            feature("x"),
            and([feature("b"), feature("c").not()]),
        ))
        .build()
}

/// Versioned `v` and boolean `a`: `a => [v > 3]`, `[v <= 5]`.
pub fn versioned_rules() -> PrlRuleFile {
    RuleFileBuilder::new()
        .feature(PrlFeatureDefinition::versioned("v"))
        .booleans(["a"])
        .inclusion(feature("a"), compare("v", ComparisonOperator::Gt, 3))
        .constraint(compare("v", ComparisonOperator::Le, 5))
        .build()
}

/// Enum `e` over `x`, `y`, `z` and boolean `a`:
/// `a => [e = "x"]`, `[e = "y"] / a`.
pub fn enum_rules() -> PrlRuleFile {
    RuleFileBuilder::new()
        .feature(PrlFeatureDefinition::enumeration("e", ["x", "y", "z"]))
        .booleans(["a"])
        .inclusion(feature("a"), enum_eq("e", "x"))
        .constraint(or([enum_eq("e", "y"), feature("a")]))
        .build()
}

/// Integers `i` in `[1 - 4]`, `j` in `[2, 4, 6]` and boolean `a`:
/// `a => [i + j > 6]`, `[i in [2 - 3]] / a`, `forbidden feature j = 2`.
pub fn int_rules() -> PrlRuleFile {
    RuleFileBuilder::new()
        .feature(PrlFeatureDefinition::int("i", IntRange::interval(1, 4)))
        .feature(PrlFeatureDefinition::int("j", IntRange::list([2, 4, 6])))
        .booleans(["a"])
        .inclusion(
            feature("a"),
            PrlConstraint::comparison(
                PrlTerm::Add(vec![PrlTerm::feature("i"), PrlTerm::feature("j")]),
                ComparisonOperator::Gt,
                6,
            ),
        )
        .constraint(or([in_range("i", 2, 3), feature("a")]))
        .rule(PrlRuleKind::Forbidden(PrlFeatureRule::int("j", 2)))
        .build()
}

/// `a` everywhere, `b` and `i` in `[1 - 3]` only in version 1, `c` and
/// `i` in `[2 - 5]` only in version 2:
/// `a`, `b => a`, `c => -a / [i > 2]`, `[i != 3]`.
pub fn sliced_rules() -> PrlRuleFile {
    RuleFileBuilder::new()
        .slicing_property("version", PropertyType::Int)
        .booleans(["a"])
        .feature(PrlFeatureDefinition::boolean("b").with_property(int_property("version", 1, 1)))
        .feature(PrlFeatureDefinition::boolean("c").with_property(int_property("version", 2, 2)))
        .feature(
            PrlFeatureDefinition::int("i", IntRange::interval(1, 3))
                .with_property(int_property("version", 1, 1)),
        )
        .feature(
            PrlFeatureDefinition::int("i", IntRange::interval(2, 5))
                .with_property(int_property("version", 2, 2)),
        )
        .constraint(feature("a"))
        .inclusion(feature("b"), feature("a"))
        .inclusion(
            feature("c"),
            or([feature("a").not(), compare("i", ComparisonOperator::Gt, 2)]),
        )
        .constraint(compare("i", ComparisonOperator::Ne, 3))
        .build()
}
