//! Features and their theories.
//!
//! A feature is identified by its code. The theory of a feature determines
//! which operations are legal on it: plain and versioned boolean features are
//! atoms, enum features are compared with string values, and integer features
//! take part in linear arithmetic.

use std::fmt;

/// The theory of a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Theory {
    /// Plain boolean feature.
    Bool,
    /// Boolean feature with a version dimension.
    VersionedBool,
    /// Feature taking exactly one value of a string domain.
    Enum,
    /// Feature taking exactly one value of an integer domain.
    Int,
}

impl fmt::Display for Theory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Theory::Bool => "BOOL",
            Theory::VersionedBool => "VERSIONED_BOOL",
            Theory::Enum => "ENUM",
            Theory::Int => "INT",
        };
        f.write_str(name)
    }
}

/// A plain or versioned boolean feature.
///
/// # Example
///
/// ```
/// use prl_core::BooleanFeature;
///
/// let a = BooleanFeature::new("a");
/// let v = BooleanFeature::versioned("v");
/// assert!(!a.versioned);
/// assert!(v.versioned);
/// assert!(a < v);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BooleanFeature {
    /// Code of the feature.
    pub code: String,
    /// Whether the feature carries a version.
    pub versioned: bool,
}

impl BooleanFeature {
    /// Creates a plain boolean feature.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            versioned: false,
        }
    }

    /// Creates a versioned boolean feature.
    pub fn versioned(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            versioned: true,
        }
    }

    pub fn theory(&self) -> Theory {
        if self.versioned {
            Theory::VersionedBool
        } else {
            Theory::Bool
        }
    }
}

/// An enum feature.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnumFeature {
    pub code: String,
}

impl EnumFeature {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

/// An integer feature.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntFeature {
    pub code: String,
}

impl IntFeature {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

/// A feature of any theory.
///
/// Features are ordered by their code first, so sets of mixed features
/// iterate in code order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Feature {
    Boolean(BooleanFeature),
    Enum(EnumFeature),
    Int(IntFeature),
}

impl Feature {
    /// Returns the code of the feature.
    pub fn code(&self) -> &str {
        match self {
            Feature::Boolean(f) => &f.code,
            Feature::Enum(f) => &f.code,
            Feature::Int(f) => &f.code,
        }
    }

    /// Returns the theory of the feature.
    pub fn theory(&self) -> Theory {
        match self {
            Feature::Boolean(f) => f.theory(),
            Feature::Enum(_) => Theory::Enum,
            Feature::Int(_) => Theory::Int,
        }
    }
}

impl PartialOrd for Feature {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Feature {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.code()
            .cmp(other.code())
            .then_with(|| self.theory().cmp(&other.theory()))
    }
}

impl From<BooleanFeature> for Feature {
    fn from(feature: BooleanFeature) -> Self {
        Feature::Boolean(feature)
    }
}

impl From<EnumFeature> for Feature {
    fn from(feature: EnumFeature) -> Self {
        Feature::Enum(feature)
    }
}

impl From<IntFeature> for Feature {
    fn from(feature: IntFeature) -> Self {
        Feature::Int(feature)
    }
}

impl fmt::Display for BooleanFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_identifier(f, &self.code)
    }
}

impl fmt::Display for EnumFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_identifier(f, &self.code)
    }
}

impl fmt::Display for IntFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_identifier(f, &self.code)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_identifier(f, self.code())
    }
}

/// Writes a feature code, quoting it with backticks if it is not a plain identifier.
pub(crate) fn write_identifier(f: &mut fmt::Formatter<'_>, code: &str) -> fmt::Result {
    let plain = !code.is_empty()
        && code
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && code.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain {
        f.write_str(code)
    } else {
        write!(f, "`{}`", code)
    }
}
