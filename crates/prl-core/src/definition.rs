//! Feature definitions.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::feature::{write_identifier, BooleanFeature, EnumFeature, Feature, IntFeature, Theory};
use crate::property::{IntRange, Property};
use crate::renaming::FeatureRenaming;
use crate::slice::{evaluate_properties, SliceSelection};

/// Theory-specific part of a feature definition.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DefinitionKind {
    Boolean { versioned: bool },
    Enum { values: BTreeSet<String> },
    Int { domain: IntRange },
}

/// The definition of a feature, with its metadata and slicing properties.
///
/// # Example
///
/// ```
/// use prl_core::{FeatureDefinition, IntRange, Property, SliceSelection, SliceType, Theory};
///
/// let def = FeatureDefinition::int("size", IntRange::interval(1, 5))
///     .with_property(Property::bool("active", true));
/// assert_eq!(def.theory(), Theory::Int);
///
/// let inactive = SliceSelection::new(Property::bool("active", false), SliceType::Split);
/// assert!(!def.filter(&[inactive]));
/// assert_eq!(def.to_string(), "int feature size [1 - 5] {\n  active true\n}");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeatureDefinition {
    pub code: String,
    pub kind: DefinitionKind,
    pub description: String,
    pub properties: BTreeMap<String, Property>,
    pub line_number: Option<u32>,
}

impl FeatureDefinition {
    fn with_kind(code: impl Into<String>, kind: DefinitionKind) -> Self {
        Self {
            code: code.into(),
            kind,
            description: String::new(),
            properties: BTreeMap::new(),
            line_number: None,
        }
    }

    pub fn boolean(code: impl Into<String>) -> Self {
        Self::with_kind(code, DefinitionKind::Boolean { versioned: false })
    }

    pub fn versioned(code: impl Into<String>) -> Self {
        Self::with_kind(code, DefinitionKind::Boolean { versioned: true })
    }

    pub fn enumeration<S: Into<String>>(
        code: impl Into<String>,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        Self::with_kind(
            code,
            DefinitionKind::Enum {
                values: values.into_iter().map(Into::into).collect(),
            },
        )
    }

    pub fn int(code: impl Into<String>, domain: IntRange) -> Self {
        Self::with_kind(code, DefinitionKind::Int { domain })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.insert(property.name.clone(), property);
        self
    }

    pub fn with_properties(mut self, properties: BTreeMap<String, Property>) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_line_number(mut self, line_number: Option<u32>) -> Self {
        self.line_number = line_number;
        self
    }

    pub fn theory(&self) -> Theory {
        match self.kind {
            DefinitionKind::Boolean { versioned: false } => Theory::Bool,
            DefinitionKind::Boolean { versioned: true } => Theory::VersionedBool,
            DefinitionKind::Enum { .. } => Theory::Enum,
            DefinitionKind::Int { .. } => Theory::Int,
        }
    }

    pub fn feature(&self) -> Feature {
        match &self.kind {
            DefinitionKind::Boolean { versioned } => Feature::Boolean(BooleanFeature {
                code: self.code.clone(),
                versioned: *versioned,
            }),
            DefinitionKind::Enum { .. } => Feature::Enum(EnumFeature::new(self.code.clone())),
            DefinitionKind::Int { .. } => Feature::Int(IntFeature::new(self.code.clone())),
        }
    }

    pub fn enum_values(&self) -> Option<&BTreeSet<String>> {
        match &self.kind {
            DefinitionKind::Enum { values } => Some(values),
            _ => None,
        }
    }

    pub fn int_domain(&self) -> Option<&IntRange> {
        match &self.kind {
            DefinitionKind::Int { domain } => Some(domain),
            _ => None,
        }
    }

    /// Whether the definition applies under all the given selections.
    pub fn filter(&self, selections: &[SliceSelection]) -> bool {
        evaluate_properties(&self.properties, selections)
    }

    pub fn rename(&self, renaming: &FeatureRenaming) -> FeatureDefinition {
        let feature = self.feature();
        let code = renaming.rename(&feature).code().to_string();
        let kind = match (&self.kind, &feature) {
            (DefinitionKind::Enum { values }, Feature::Enum(e)) => DefinitionKind::Enum {
                values: values
                    .iter()
                    .map(|v| renaming.rename_enum_value(e, v))
                    .collect(),
            },
            (kind, _) => kind.clone(),
        };
        FeatureDefinition {
            code,
            kind,
            ..self.clone()
        }
    }

    pub fn strip_properties(&self) -> FeatureDefinition {
        FeatureDefinition {
            properties: BTreeMap::new(),
            ..self.clone()
        }
    }

    pub fn strip_meta_info(&self) -> FeatureDefinition {
        FeatureDefinition {
            description: String::new(),
            ..self.clone()
        }
    }

    pub fn strip_all(&self) -> FeatureDefinition {
        FeatureDefinition {
            description: String::new(),
            properties: BTreeMap::new(),
            ..self.clone()
        }
    }

    /// Merges definitions of the same feature from several slices.
    ///
    /// Enum values and integer domains are united; metadata is dropped.
    /// Returns `None` for an empty input or definitions of different theories.
    pub fn merge<'a>(
        definitions: impl IntoIterator<Item = &'a FeatureDefinition>,
    ) -> Option<FeatureDefinition> {
        let mut definitions = definitions.into_iter();
        let first = definitions.next()?;
        let mut kind = first.kind.clone();
        for def in definitions {
            kind = match (kind, &def.kind) {
                (DefinitionKind::Boolean { versioned }, DefinitionKind::Boolean { .. }) => {
                    DefinitionKind::Boolean { versioned }
                }
                (DefinitionKind::Enum { mut values }, DefinitionKind::Enum { values: other }) => {
                    values.extend(other.iter().cloned());
                    DefinitionKind::Enum { values }
                }
                (DefinitionKind::Int { domain }, DefinitionKind::Int { domain: other }) => {
                    DefinitionKind::Int {
                        domain: union_domain(&domain, other),
                    }
                }
                _ => return None,
            };
        }
        Some(FeatureDefinition::with_kind(first.code.clone(), kind))
    }

    fn header(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DefinitionKind::Boolean { versioned } => {
                if *versioned {
                    f.write_str("versioned ")?;
                }
                f.write_str("feature ")?;
                write_identifier(f, &self.code)
            }
            DefinitionKind::Enum { values } => {
                f.write_str("enum feature ")?;
                write_identifier(f, &self.code)?;
                f.write_str(" [")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "\"{}\"", v)?;
                }
                f.write_str("]")
            }
            DefinitionKind::Int { domain } => {
                f.write_str("int feature ")?;
                write_identifier(f, &self.code)?;
                match domain {
                    IntRange::List(values) if values.len() == 1 => write!(f, " [{}]", domain),
                    _ => write!(f, " {}", domain),
                }
            }
        }
    }
}

/// Union of two integer domains; contiguous value sets become intervals.
fn union_domain(a: &IntRange, b: &IntRange) -> IntRange {
    let mut values = a.all_values();
    values.extend(b.all_values());
    match (values.first(), values.last()) {
        (Some(&first), Some(&last))
            if values.len() > 1 && (last as i64 - first as i64 + 1) == values.len() as i64 =>
        {
            IntRange::interval(first, last)
        }
        _ => IntRange::list(values),
    }
}

impl fmt::Display for FeatureDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.header(f)?;
        if self.description.is_empty() && self.properties.is_empty() {
            return Ok(());
        }
        f.write_str(" {\n")?;
        if !self.description.is_empty() {
            writeln!(f, "  description \"{}\"", self.description)?;
        }
        for property in self.properties.values() {
            writeln!(f, "  {}", property)?;
        }
        f.write_str("}")
    }
}
