//! Error types for the PRL core model

use thiserror::Error;

use crate::property::PropertyType;

/// Invariant violations raised by the core model.
///
/// Compiler diagnostics for user input are not represented here; they are
/// accumulated by the compiler as plain messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrlError {
    /// Slice enumeration produced more combinations than allowed
    #[error("Number of slice combinations exceeded {max}")]
    MaxNumberOfSlicesExceeded { max: usize },

    /// A definition rule was built over a versioned feature
    #[error("Feature '{0}' is a versioned feature")]
    VersionedDefinition(String),

    /// An assignment does not fit the theory of its feature
    #[error("Invalid assignment: {0}")]
    InvalidAssignment(String),

    /// A range of the wrong type was recorded for a slicing property
    #[error("Property '{name}' has type {expected}, got a range of type {actual}")]
    PropertyTypeMismatch {
        name: String,
        expected: PropertyType,
        actual: PropertyType,
    },

    /// A slicing property was requested that was never defined
    #[error("Unknown property '{0}'")]
    UnknownProperty(String),

    /// A feature was requested that has no definition
    #[error("Could not find feature '{0}'")]
    UnknownFeature(String),

    /// Folding integer constants left the 32-bit range
    #[error("Integer term overflows: {0}")]
    IntegerOverflow(String),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, PrlError>;
