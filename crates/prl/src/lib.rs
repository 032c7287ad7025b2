//! PRL - A product rule compiler and SAT transpiler in Rust
//!
//! Compile a parsed rule file, split it into slice sets and get one
//! propositional formula per slice set.
//!
//! # Example
//!
//! ```rust
//! use prl::prelude::*;
//!
//! let mut rule_file = PrlRuleFile::default();
//! rule_file.rule_set.feature_definitions.push(PrlFeatureDefinition::boolean("a"));
//! rule_file.rule_set.feature_definitions.push(PrlFeatureDefinition::boolean("b"));
//! rule_file.rule_set.rules.push(PrlRule::new(PrlRuleKind::Inclusion {
//!     condition: PrlConstraint::feature("a"),
//!     then: PrlConstraint::feature("b"),
//! }));
//!
//! let f = FormulaFactory::new();
//! let result = prl::transpile_rule_file(&f, &rule_file, &[], &[], &PrlConfig::default()).unwrap();
//! let formula = result.translation.computations[0].info.formula(&f);
//! assert_eq!(formula.to_string(&f), "a => b");
//! ```

pub mod logging;
mod pipeline;

pub use pipeline::{load_config, transpile_rule_file, PipelineError, TranspiledRuleFile};

// Parsed rule-file input
pub use prl_compiler::syntax;

// Configuration
pub use prl_config::{ConfigError, PrlConfig, ThreadCount};

// Model
pub use prl_compiler::{PrlCompiler, PrlModel, SliceSet};
pub use prl_core::{
    Constraint, Feature, FeatureAssignment, FeatureDefinition, PrlError, Rule, Slice,
    SliceSelection, SliceType,
};

// Translation
pub use prl_transpiler::logic::{EncodedFormula, FormulaFactory, Model, Variable};
pub use prl_transpiler::{
    merge_slices, transpile_constraint, transpile_model, transpile_model_with_constraints,
    transpile_rule, MergedSliceTranslation, ModelTranslation, PrlProposition, RuleInformation,
    RuleType, SliceTranslation, TranslationInfo, TranspilerError,
};

pub mod prelude {
    pub use super::{transpile_rule_file, TranspiledRuleFile};
    pub use super::{EncodedFormula, FormulaFactory, Model, Variable};
    pub use super::{ModelTranslation, PrlConfig, PrlModel, TranslationInfo};
    pub use prl_compiler::syntax::{
        PrlConstraint, PrlFeatureDefinition, PrlRule, PrlRuleFile, PrlRuleKind, PrlTerm,
    };
    pub use prl_core::{ComparisonOperator, IntRange, Property, PropertyType};
}
