//! Errors raised while compiling a single rule or constraint.

use prl_core::{PrlError, Theory};
use thiserror::Error;

/// A user error in one compiled item.
///
/// The compiler never stops at a `CompileError`; it records the message as
/// an error diagnostic and continues with the next item.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("Unknown feature: '{0}'")]
    UnknownFeature(String),

    #[error("{theory} feature '{feature}' is used as {expected} feature")]
    WrongTheory {
        feature: String,
        theory: Theory,
        expected: Theory,
    },

    #[error("Feature '{0}' is a versioned feature")]
    VersionedFeature(String),

    #[error("Left-hand side of an enum 'in' predicate must be an enum feature")]
    EnumInLeftHandSide,

    #[error("Integer multiplication is only allowed between a fixed coefficient and an integer feature")]
    IntMultiplication,

    #[error("Unknown integer term type: {0}")]
    InvalidIntTerm(String),

    #[error("Enum comparison must compare an enum feature with an enum value")]
    EnumComparison,

    #[error("Only comparisons with = and != are allowed for enums")]
    EnumOperator,

    #[error("Version predicate must compare a versioned boolean feature with a fixed version")]
    VersionPredicate,

    #[error("Versions must be > 0")]
    NonPositiveVersion,

    #[error("Unversioned feature in version predicate: {0}")]
    UnversionedFeature(String),

    #[error("Cannot determine theory of predicate, mixed features of theories {first} and {second}")]
    MixedTheories { first: Theory, second: Theory },

    #[error("Cannot determine theory of predicate")]
    UndeterminedTheory,

    #[error("Cannot assign an unversioned boolean feature to an int or enum value")]
    InvalidBooleanAssignment,

    #[error("Cannot assign a versioned boolean feature to anything else than an int version")]
    InvalidVersionedAssignment,

    #[error("Cannot assign an int feature to anything else than an int value")]
    InvalidIntAssignment,

    #[error("Cannot assign an enum feature to anything else than an enum value")]
    InvalidEnumAssignment,

    #[error(transparent)]
    Model(#[from] PrlError),
}
