//! Feature renamings.

use std::collections::BTreeMap;

use crate::feature::{BooleanFeature, EnumFeature, Feature, IntFeature};

/// A renaming of feature codes (and enum values) per theory.
///
/// Features without a mapping keep their code.
///
/// # Example
///
/// ```
/// use prl_core::{BooleanFeature, FeatureRenaming};
///
/// let renaming = FeatureRenaming::new().boolean("a", "x");
/// assert_eq!(renaming.rename_boolean(&BooleanFeature::new("a")).code, "x");
/// assert_eq!(renaming.revert().rename_boolean(&BooleanFeature::new("x")).code, "a");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureRenaming {
    booleans: BTreeMap<String, String>,
    versioned: BTreeMap<String, String>,
    enums: BTreeMap<String, String>,
    enum_values: BTreeMap<(String, String), String>,
    ints: BTreeMap<String, String>,
}

impl FeatureRenaming {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a mapping for a plain boolean feature.
    pub fn boolean(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.booleans.insert(from.into(), to.into());
        self
    }

    /// Adds a mapping for a versioned boolean feature.
    pub fn versioned(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.versioned.insert(from.into(), to.into());
        self
    }

    /// Adds a mapping for an enum feature.
    pub fn enumeration(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.enums.insert(from.into(), to.into());
        self
    }

    /// Adds a mapping for a value of an enum feature (keyed by the original feature code).
    pub fn enum_value(
        mut self,
        feature: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        self.enum_values
            .insert((feature.into(), from.into()), to.into());
        self
    }

    /// Adds a mapping for an integer feature.
    pub fn int(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.ints.insert(from.into(), to.into());
        self
    }

    pub fn rename_boolean(&self, feature: &BooleanFeature) -> BooleanFeature {
        let map = if feature.versioned {
            &self.versioned
        } else {
            &self.booleans
        };
        match map.get(&feature.code) {
            Some(code) => BooleanFeature {
                code: code.clone(),
                versioned: feature.versioned,
            },
            None => feature.clone(),
        }
    }

    pub fn rename_enum(&self, feature: &EnumFeature) -> EnumFeature {
        self.enums
            .get(&feature.code)
            .map_or_else(|| feature.clone(), EnumFeature::new)
    }

    /// Renames a value of the given (original) enum feature.
    pub fn rename_enum_value(&self, feature: &EnumFeature, value: &str) -> String {
        self.enum_values
            .get(&(feature.code.clone(), value.to_string()))
            .cloned()
            .unwrap_or_else(|| value.to_string())
    }

    pub fn rename_int(&self, feature: &IntFeature) -> IntFeature {
        self.ints
            .get(&feature.code)
            .map_or_else(|| feature.clone(), IntFeature::new)
    }

    pub fn rename(&self, feature: &Feature) -> Feature {
        match feature {
            Feature::Boolean(f) => Feature::Boolean(self.rename_boolean(f)),
            Feature::Enum(f) => Feature::Enum(self.rename_enum(f)),
            Feature::Int(f) => Feature::Int(self.rename_int(f)),
        }
    }

    /// Returns the inverse renaming.
    ///
    /// Enum value mappings are re-keyed by the renamed feature code so that
    /// reverting works on renamed constraints.
    pub fn revert(&self) -> FeatureRenaming {
        let invert = |map: &BTreeMap<String, String>| {
            map.iter()
                .map(|(k, v)| (v.clone(), k.clone()))
                .collect::<BTreeMap<_, _>>()
        };
        let enum_values = self
            .enum_values
            .iter()
            .map(|((feature, from), to)| {
                let renamed_feature = self.enums.get(feature).unwrap_or(feature).clone();
                ((renamed_feature, to.clone()), from.clone())
            })
            .collect();
        FeatureRenaming {
            booleans: invert(&self.booleans),
            versioned: invert(&self.versioned),
            enums: invert(&self.enums),
            enum_values,
            ints: invert(&self.ints),
        }
    }
}
