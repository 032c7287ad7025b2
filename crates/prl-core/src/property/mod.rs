//! Properties of features and rules, and slicing-property definitions.

mod range;
mod slicing;


use std::fmt;

use chrono::NaiveDate;

pub use range::{BooleanRange, DateRange, EnumRange, IntRange, PropertyRange, RangeValue};
pub use slicing::SlicingPropertyDefinition;

use crate::feature::write_identifier;

/// The value type of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PropertyType {
    Bool,
    Int,
    Date,
    Enum,
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = match self {
            PropertyType::Bool => "bool",
            PropertyType::Int => "int",
            PropertyType::Date => "date",
            PropertyType::Enum => "enum",
        };
        f.write_str(keyword)
    }
}

/// A range of any property type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnyRange {
    Bool(BooleanRange),
    Int(IntRange),
    Date(DateRange),
    Enum(EnumRange),
}

impl AnyRange {
    pub fn property_type(&self) -> PropertyType {
        match self {
            AnyRange::Bool(_) => PropertyType::Bool,
            AnyRange::Int(_) => PropertyType::Int,
            AnyRange::Date(_) => PropertyType::Date,
            AnyRange::Enum(_) => PropertyType::Enum,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            AnyRange::Bool(r) => r.is_empty(),
            AnyRange::Int(r) => r.is_empty(),
            AnyRange::Date(r) => r.is_empty(),
            AnyRange::Enum(r) => r.is_empty(),
        }
    }

    pub fn is_discrete(&self) -> bool {
        match self {
            AnyRange::Bool(r) => r.is_discrete(),
            AnyRange::Int(r) => r.is_discrete(),
            AnyRange::Date(r) => r.is_discrete(),
            AnyRange::Enum(r) => r.is_discrete(),
        }
    }

    /// Whether both ranges share a value; ranges of different types never do.
    pub fn intersects(&self, other: &AnyRange) -> bool {
        match (self, other) {
            (AnyRange::Bool(a), AnyRange::Bool(b)) => a.intersects(b),
            (AnyRange::Int(a), AnyRange::Int(b)) => a.intersects(b),
            (AnyRange::Date(a), AnyRange::Date(b)) => a.intersects(b),
            (AnyRange::Enum(a), AnyRange::Enum(b)) => a.intersects(b),
            _ => false,
        }
    }
}

impl From<BooleanRange> for AnyRange {
    fn from(range: BooleanRange) -> Self {
        AnyRange::Bool(range)
    }
}

impl From<IntRange> for AnyRange {
    fn from(range: IntRange) -> Self {
        AnyRange::Int(range)
    }
}

impl From<DateRange> for AnyRange {
    fn from(range: DateRange) -> Self {
        AnyRange::Date(range)
    }
}

impl From<EnumRange> for AnyRange {
    fn from(range: EnumRange) -> Self {
        AnyRange::Enum(range)
    }
}

impl fmt::Display for AnyRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnyRange::Bool(r) => write!(f, "{}", r),
            AnyRange::Int(r) => write!(f, "{}", r),
            AnyRange::Date(r) => write!(f, "{}", r),
            AnyRange::Enum(r) => write!(f, "{}", r),
        }
    }
}

/// A named property with a typed value range.
///
/// # Example
///
/// ```
/// use prl_core::{IntRange, Property};
///
/// let model_year = Property::new("model_year", IntRange::interval(2020, 2024));
/// assert!(model_year.intersects(&Property::int("model_year", 2022)));
/// assert!(model_year.disjoint(&Property::int("model_year", 2019)));
/// assert!(model_year.disjoint(&Property::int("series", 2022)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Property {
    pub name: String,
    pub range: AnyRange,
}

impl Property {
    pub fn new(name: impl Into<String>, range: impl Into<AnyRange>) -> Self {
        Self {
            name: name.into(),
            range: range.into(),
        }
    }

    pub fn bool(name: impl Into<String>, value: bool) -> Self {
        Self::new(name, BooleanRange::single(value))
    }

    pub fn int(name: impl Into<String>, value: i32) -> Self {
        Self::new(name, IntRange::single(value))
    }

    pub fn date(name: impl Into<String>, value: NaiveDate) -> Self {
        Self::new(name, DateRange::single(value))
    }

    pub fn enumeration(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, EnumRange::single(value.into()))
    }

    pub fn property_type(&self) -> PropertyType {
        self.range.property_type()
    }

    /// Whether both properties have the same name and overlapping ranges.
    pub fn intersects(&self, other: &Property) -> bool {
        self.name == other.name && self.range.intersects(&other.range)
    }

    pub fn disjoint(&self, other: &Property) -> bool {
        !self.intersects(other)
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_identifier(f, &self.name)?;
        write!(f, " {}", self.range)
    }
}
