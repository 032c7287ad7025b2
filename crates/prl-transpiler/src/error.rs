//! Error types for the transpiler

use prl_core::PrlError;
use thiserror::Error;

/// Invariant violations raised while transpiling a model.
#[derive(Debug, Error)]
pub enum TranspilerError {
    /// Slice computation on the model failed
    #[error(transparent)]
    Model(#[from] PrlError),

    /// An integer term refers to a feature without a definition in the slice
    #[error("Integer feature '{0}' has no definition in this slice")]
    UninstantiatedIntFeature(String),

    /// An integer domain has too many values to be order encoded
    #[error("Domain of integer feature '{feature}' has {size} values, at most {max} can be encoded")]
    DomainTooLarge {
        feature: String,
        size: usize,
        max: usize,
    },

    /// The worker pool could not be created
    #[error("Could not create transpiler thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result type alias for transpiler operations
pub type Result<T> = std::result::Result<T, TranspilerError>;
