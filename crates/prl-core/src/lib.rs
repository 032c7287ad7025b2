//! PRL Core - Constraint algebra and rule model of the PRL rule compiler
//!
//! This crate provides the typed model the compiler produces and the
//! transpiler consumes:
//! - Features of four theories and the constraints over them
//! - Rules with their restriction and simplification laws
//! - Property ranges, properties and slicing-property definitions
//! - Feature definitions, slices and slice computation

pub mod assignment;
pub mod constraint;
pub mod definition;
pub mod error;
pub mod feature;
pub mod operator;
pub mod property;
pub mod renaming;
pub mod rule;
pub mod slice;

pub use assignment::FeatureAssignment;
pub use constraint::{Constraint, IntMul, IntSum, IntTerm};
pub use definition::{DefinitionKind, FeatureDefinition};
pub use error::{PrlError, Result};
pub use feature::{BooleanFeature, EnumFeature, Feature, IntFeature, Theory};
pub use operator::ComparisonOperator;
pub use property::{
    AnyRange, BooleanRange, DateRange, EnumRange, IntRange, Property, PropertyRange,
    PropertyType, RangeValue, SlicingPropertyDefinition,
};
pub use renaming::FeatureRenaming;
pub use rule::{FeatureRule, FeatureTarget, GroupType, Rule, RuleKind};
pub use slice::{
    compute_all_slices, evaluate_properties, Slice, SliceSelection, SliceType,
    MAXIMUM_NUMBER_OF_SLICES,
};
