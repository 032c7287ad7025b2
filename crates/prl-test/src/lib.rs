//! Shared test fixtures for the PRL crates.
//!
//! This crate provides rule-file builders, sample rule files and brute-force
//! enumerations for semantic checks. It does NOT depend on `prl-transpiler`
//! so the transpiler can use it in its unit tests.
//!
//! - [`rule_file`] - Builder for parsed rule files and constraint shorthands
//! - [`samples`] - Ready-made rule files covering all feature theories
//! - [`assignments`] - Enumeration of feature assignments and variable subsets
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! prl-test = { workspace = true }
//! ```
//!
//! Then build the rule files you need:
//!
//! ```ignore
//! use prl_test::rule_file::{feature, RuleFileBuilder};
//!
//! let model = RuleFileBuilder::new().booleans(["a", "b"]).constraint(feature("a")).compile();
//! ```

pub mod assignments;
pub mod rule_file;
pub mod samples;

pub use assignments::{feature_assignments, subsets};
pub use rule_file::{compile, RuleFileBuilder};
