use std::collections::BTreeSet;
use std::fmt;

use super::{AnyRange, Property, PropertyRange, PropertyType, RangeValue};
use crate::error::{PrlError, Result};
use crate::feature::write_identifier;

/// Start, end and single values of the ranges seen for an ordered property.
#[derive(Debug, Clone, PartialEq, Eq)]
struct UsedRanges<T: RangeValue> {
    starts: BTreeSet<T>,
    ends: BTreeSet<T>,
    singles: BTreeSet<T>,
}

impl<T: RangeValue> Default for UsedRanges<T> {
    fn default() -> Self {
        Self {
            starts: BTreeSet::new(),
            ends: BTreeSet::new(),
            singles: BTreeSet::new(),
        }
    }
}

impl<T: RangeValue> UsedRanges<T> {
    fn add(&mut self, range: &PropertyRange<T>) {
        match range {
            PropertyRange::Empty => {}
            PropertyRange::List(values) => self.singles.extend(values.iter().cloned()),
            PropertyRange::Interval { start, end } => {
                self.starts.insert(start.clone());
                self.ends.insert(end.clone());
            }
        }
    }

    fn max(&self) -> Option<&T> {
        [self.starts.last(), self.ends.last(), self.singles.last()]
            .into_iter()
            .flatten()
            .max()
    }

    /// Values at which the set of matching ranges may change.
    fn relevant_values(&self) -> BTreeSet<T> {
        let Some(max) = self.max() else {
            return BTreeSet::new();
        };
        let below_max = |v: &T| v.successor().filter(|s| s < max);
        let mut values: BTreeSet<T> = self.starts.union(&self.singles).cloned().collect();
        values.extend(self.singles.iter().filter_map(below_max));
        values.extend(self.ends.iter().filter_map(below_max));
        values.insert(max.clone());
        values
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum UsedValues {
    Bool(BTreeSet<bool>),
    Int(UsedRanges<i32>),
    Date(UsedRanges<chrono::NaiveDate>),
    Enum(BTreeSet<String>),
}

/// A declared slicing property.
///
/// The definition accumulates every range used by a feature or rule
/// property of the same name; the relevant values derived from them are the
/// points at which slices have to be cut.
///
/// # Example
///
/// ```
/// use prl_core::{AnyRange, IntRange, PropertyType, SlicingPropertyDefinition};
///
/// let mut def = SlicingPropertyDefinition::new("version", PropertyType::Int);
/// def.add_range(&AnyRange::Int(IntRange::interval(1, 3))).unwrap();
/// def.add_range(&AnyRange::Int(IntRange::single(5))).unwrap();
///
/// let values: Vec<String> = def.relevant_properties(None).iter().map(|p| p.range.to_string()).collect();
/// assert_eq!(values, ["1", "4", "5"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlicingPropertyDefinition {
    pub name: String,
    pub line_number: Option<u32>,
    values: UsedValues,
}

impl SlicingPropertyDefinition {
    pub fn new(name: impl Into<String>, property_type: PropertyType) -> Self {
        let values = match property_type {
            PropertyType::Bool => UsedValues::Bool(BTreeSet::new()),
            PropertyType::Int => UsedValues::Int(UsedRanges::default()),
            PropertyType::Date => UsedValues::Date(UsedRanges::default()),
            PropertyType::Enum => UsedValues::Enum(BTreeSet::new()),
        };
        Self {
            name: name.into(),
            line_number: None,
            values,
        }
    }

    pub fn with_line_number(mut self, line_number: Option<u32>) -> Self {
        self.line_number = line_number;
        self
    }

    pub fn property_type(&self) -> PropertyType {
        match self.values {
            UsedValues::Bool(_) => PropertyType::Bool,
            UsedValues::Int(_) => PropertyType::Int,
            UsedValues::Date(_) => PropertyType::Date,
            UsedValues::Enum(_) => PropertyType::Enum,
        }
    }

    /// Records a range used by some feature or rule.
    ///
    /// # Errors
    ///
    /// Returns [`PrlError::PropertyTypeMismatch`] if the range has another type.
    pub fn add_range(&mut self, range: &AnyRange) -> Result<()> {
        match (&mut self.values, range) {
            (UsedValues::Bool(values), AnyRange::Bool(r)) => values.extend(r.all_values()),
            (UsedValues::Int(used), AnyRange::Int(r)) => used.add(r),
            (UsedValues::Date(used), AnyRange::Date(r)) => used.add(r),
            (UsedValues::Enum(values), AnyRange::Enum(r)) => values.extend(r.all_values()),
            _ => {
                return Err(PrlError::PropertyTypeMismatch {
                    name: self.name.clone(),
                    expected: self.property_type(),
                    actual: range.property_type(),
                })
            }
        }
        Ok(())
    }

    /// Whether no range was recorded for this property.
    pub fn is_unused(&self) -> bool {
        match &self.values {
            UsedValues::Bool(values) => values.is_empty(),
            UsedValues::Int(used) => used.max().is_none(),
            UsedValues::Date(used) => used.max().is_none(),
            UsedValues::Enum(values) => values.is_empty(),
        }
    }

    /// The relevant values as single-valued properties, optionally
    /// restricted to a filter range of the same type.
    ///
    /// A filter of another type selects nothing.
    pub fn relevant_properties(&self, filter: Option<&AnyRange>) -> Vec<Property> {
        match &self.values {
            UsedValues::Bool(values) => {
                let relevant = if values.is_empty() {
                    BTreeSet::new()
                } else {
                    BTreeSet::from([false, true])
                };
                self.to_properties(relevant, filter, |f| match f {
                    AnyRange::Bool(r) => Some(r),
                    _ => None,
                })
            }
            UsedValues::Int(used) => self.to_properties(used.relevant_values(), filter, |f| match f {
                AnyRange::Int(r) => Some(r),
                _ => None,
            }),
            UsedValues::Date(used) => {
                self.to_properties(used.relevant_values(), filter, |f| match f {
                    AnyRange::Date(r) => Some(r),
                    _ => None,
                })
            }
            UsedValues::Enum(values) => self.to_properties(values.clone(), filter, |f| match f {
                AnyRange::Enum(r) => Some(r),
                _ => None,
            }),
        }
    }

    fn to_properties<T>(
        &self,
        relevant: BTreeSet<T>,
        filter: Option<&AnyRange>,
        typed: impl Fn(&AnyRange) -> Option<&PropertyRange<T>>,
    ) -> Vec<Property>
    where
        T: RangeValue,
        AnyRange: From<PropertyRange<T>>,
    {
        let values = match filter {
            None => relevant,
            Some(filter) => match typed(filter) {
                Some(range) => PropertyRange::list(relevant)
                    .intersection(range)
                    .all_values(),
                None => BTreeSet::new(),
            },
        };
        values
            .into_iter()
            .map(|v| Property::new(self.name.clone(), PropertyRange::single(v)))
            .collect()
    }
}

impl fmt::Display for SlicingPropertyDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slicing property ")?;
        write_identifier(f, &self.name)?;
        write!(f, " {}", self.property_type())
    }
}
