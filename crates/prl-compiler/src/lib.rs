//! PRL Compiler - From parsed rule files to typed models
//!
//! This crate provides:
//! - The parsed rule-file types a parser produces ([`syntax`])
//! - Feature and slicing-property stores with their consistency checks
//! - The [`PrlCompiler`], which resolves feature theories and compiles rules
//! - The compiled [`PrlModel`] and its grouping of slices into [`SliceSet`]s
//!
//! Problems in the input are reported as diagnostics of the compiler, never
//! as panics.

pub mod compiler;
pub mod error;
pub mod model;
pub mod state;
pub mod store;
pub mod syntax;

pub use compiler::PrlCompiler;
pub use error::CompileError;
pub use model::{compute_slice_sets, PrlModel, PrlModelHeader, PrlVersion, SliceSet};
pub use state::{CompilerContext, CompilerState};
pub use store::{FeatureStore, PropertyStore, TheoryMap};
