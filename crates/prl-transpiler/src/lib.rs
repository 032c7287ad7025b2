//! PRL Transpiler - From compiled models to propositional formulas
//!
//! This crate provides:
//! - Formula helpers over the logicng formula factory ([`logic`])
//! - Order-encoded bounded integer variables ([`csp`])
//! - Boolean encodings of enum, integer and versioned features ([`encoding`])
//! - Translation of every slice set of a model, in parallel ([`transpiler`])
//! - Translation results with provenance and model decoding ([`translation`])
//! - Merging of slice-set translations into one formula ([`merge`])

pub mod csp;
pub mod encoding;
pub mod error;
pub mod logic;
pub mod merge;
pub mod translation;
pub mod transpiler;

#[cfg(test)]
mod test_utils;

pub use error::{Result, TranspilerError};
pub use merge::{merge_slices, MergedSliceTranslation};
pub use translation::{
    FeatureInstantiation, ModelTranslation, PrlProposition, RuleInformation, RuleType,
    SliceTranslation, TranslationInfo,
};
pub use transpiler::{
    transpile_constraint, transpile_model, transpile_model_with_constraints, transpile_rule,
    transpile_slice_set,
};
