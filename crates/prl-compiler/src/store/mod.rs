//! Feature and property stores.
//!
//! Both stores are filled while compiling and handed to the [`PrlModel`]
//! afterwards, which only exposes them read-only.
//!
//! [`PrlModel`]: crate::PrlModel

mod feature;
mod property;

#[cfg(test)]
mod tests;

pub use feature::{FeatureStore, TheoryMap};
pub use property::PropertyStore;
