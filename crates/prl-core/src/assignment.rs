//! Partial assignments of features to values.

use std::collections::HashMap;

use crate::error::{PrlError, Result};
use crate::feature::{BooleanFeature, EnumFeature, IntFeature};

/// A (partial) assignment of values to features.
///
/// Versioned features are assigned a version; version `0` means the feature
/// is not installed. Assigning plain `true` to a versioned feature is
/// rejected because it does not say which version is active.
///
/// # Example
///
/// ```
/// use prl_core::{BooleanFeature, FeatureAssignment};
///
/// let a = BooleanFeature::new("a");
/// let v = BooleanFeature::versioned("v");
///
/// let mut assignment = FeatureAssignment::new();
/// assignment.assign(&a, true).unwrap();
/// assignment.assign_version(&v, 2).unwrap();
///
/// assert_eq!(assignment.boolean(&a), Some(true));
/// assert_eq!(assignment.boolean(&v), Some(true));
/// assert_eq!(assignment.version(&v), Some(2));
/// assert!(assignment.assign(&v, true).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureAssignment {
    booleans: HashMap<String, bool>,
    versions: HashMap<String, i32>,
    enums: HashMap<String, String>,
    ints: HashMap<String, i32>,
}

impl FeatureAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns a boolean value.
    ///
    /// # Errors
    ///
    /// Returns [`PrlError::InvalidAssignment`] when `true` is assigned to a
    /// versioned feature.
    pub fn assign(&mut self, feature: &BooleanFeature, value: bool) -> Result<()> {
        if feature.versioned {
            if value {
                return Err(PrlError::InvalidAssignment(format!(
                    "versioned feature '{}' can only be assigned a version",
                    feature.code
                )));
            }
            self.versions.insert(feature.code.clone(), 0);
        } else {
            self.booleans.insert(feature.code.clone(), value);
        }
        Ok(())
    }

    /// Assigns a version to a versioned feature (`0` = not installed).
    pub fn assign_version(&mut self, feature: &BooleanFeature, version: i32) -> Result<()> {
        if !feature.versioned {
            return Err(PrlError::InvalidAssignment(format!(
                "feature '{}' is not versioned",
                feature.code
            )));
        }
        if version < 0 {
            return Err(PrlError::InvalidAssignment(format!(
                "negative version {} for feature '{}'",
                version, feature.code
            )));
        }
        self.versions.insert(feature.code.clone(), version);
        Ok(())
    }

    pub fn assign_enum(&mut self, feature: &EnumFeature, value: impl Into<String>) {
        self.enums.insert(feature.code.clone(), value.into());
    }

    pub fn assign_int(&mut self, feature: &IntFeature, value: i32) {
        self.ints.insert(feature.code.clone(), value);
    }

    /// Builder variant of [`FeatureAssignment::assign_enum`].
    pub fn with_enum(mut self, feature: &EnumFeature, value: impl Into<String>) -> Self {
        self.assign_enum(feature, value);
        self
    }

    /// Builder variant of [`FeatureAssignment::assign_int`].
    pub fn with_int(mut self, feature: &IntFeature, value: i32) -> Self {
        self.assign_int(feature, value);
        self
    }

    /// Returns the boolean value of a feature; a versioned feature is true
    /// iff some version is installed.
    pub fn boolean(&self, feature: &BooleanFeature) -> Option<bool> {
        if feature.versioned {
            self.versions.get(&feature.code).map(|v| *v >= 1)
        } else {
            self.booleans.get(&feature.code).copied()
        }
    }

    pub fn version(&self, feature: &BooleanFeature) -> Option<i32> {
        self.versions.get(&feature.code).copied()
    }

    pub fn enum_value(&self, feature: &EnumFeature) -> Option<&str> {
        self.enums.get(&feature.code).map(String::as_str)
    }

    pub fn int_value(&self, feature: &IntFeature) -> Option<i32> {
        self.ints.get(&feature.code).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.booleans.is_empty()
            && self.versions.is_empty()
            && self.enums.is_empty()
            && self.ints.is_empty()
    }

    /// Returns the union of both assignments; values of `other` win.
    pub fn extended_by(&self, other: &FeatureAssignment) -> FeatureAssignment {
        let mut result = self.clone();
        result.booleans.extend(other.booleans.clone());
        result.versions.extend(other.versions.clone());
        result.enums.extend(other.enums.clone());
        result.ints.extend(other.ints.clone());
        result
    }
}
