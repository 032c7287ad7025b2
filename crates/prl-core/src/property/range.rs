//! Value ranges of properties and integer domains.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::Hash;

use chrono::NaiveDate;

/// A value that can live in a [`PropertyRange`].
pub trait RangeValue: Ord + Clone + Hash + fmt::Debug {
    /// The next larger value, used to enumerate intervals.
    fn successor(&self) -> Option<Self>;

    /// Formats the value in rule-file syntax.
    fn fmt_value(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl RangeValue for bool {
    fn successor(&self) -> Option<Self> {
        if *self {
            None
        } else {
            Some(true)
        }
    }

    fn fmt_value(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl RangeValue for i32 {
    fn successor(&self) -> Option<Self> {
        self.checked_add(1)
    }

    fn fmt_value(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl RangeValue for NaiveDate {
    fn successor(&self) -> Option<Self> {
        self.succ_opt()
    }

    fn fmt_value(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("%Y-%m-%d"))
    }
}

impl RangeValue for String {
    fn successor(&self) -> Option<Self> {
        None
    }

    fn fmt_value(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self)
    }
}

/// A range of values: empty, a closed interval, or an explicit list.
///
/// Intervals are only used for integer and date values; an interval whose
/// end lies before its start is normalized to the empty range.
///
/// # Example
///
/// ```
/// use prl_core::IntRange;
///
/// let interval = IntRange::interval(1, 5);
/// let list = IntRange::list([4, 7]);
///
/// assert!(interval.contains(&3));
/// assert!(interval.intersects(&list));
/// assert_eq!(interval.intersection(&list), IntRange::list([4]));
/// assert!(IntRange::interval(5, 1).is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PropertyRange<T: RangeValue> {
    Empty,
    Interval { start: T, end: T },
    List(BTreeSet<T>),
}

pub type BooleanRange = PropertyRange<bool>;
pub type IntRange = PropertyRange<i32>;
pub type DateRange = PropertyRange<NaiveDate>;
pub type EnumRange = PropertyRange<String>;

impl<T: RangeValue> PropertyRange<T> {
    pub fn empty() -> Self {
        PropertyRange::Empty
    }

    /// Creates a list range; an empty input yields the empty range.
    pub fn list(values: impl IntoIterator<Item = T>) -> Self {
        let values: BTreeSet<T> = values.into_iter().collect();
        if values.is_empty() {
            PropertyRange::Empty
        } else {
            PropertyRange::List(values)
        }
    }

    /// Creates a list range containing a single value.
    pub fn single(value: T) -> Self {
        PropertyRange::List(BTreeSet::from([value]))
    }

    /// Creates the closed interval `[start, end]`.
    pub fn interval(start: T, end: T) -> Self {
        if end < start {
            PropertyRange::Empty
        } else {
            PropertyRange::Interval { start, end }
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            PropertyRange::Empty => true,
            PropertyRange::Interval { start, end } => end < start,
            PropertyRange::List(values) => values.is_empty(),
        }
    }

    pub fn is_discrete(&self) -> bool {
        !matches!(self, PropertyRange::Interval { .. })
    }

    pub fn is_continuous(&self) -> bool {
        !matches!(self, PropertyRange::List(_))
    }

    pub fn contains(&self, value: &T) -> bool {
        match self {
            PropertyRange::Empty => false,
            PropertyRange::Interval { start, end } => start <= value && value <= end,
            PropertyRange::List(values) => values.contains(value),
        }
    }

    /// Smallest value of the range, `None` if empty.
    pub fn first(&self) -> Option<&T> {
        match self {
            PropertyRange::Empty => None,
            PropertyRange::Interval { start, .. } => Some(start),
            PropertyRange::List(values) => values.first(),
        }
    }

    /// Largest value of the range, `None` if empty.
    pub fn last(&self) -> Option<&T> {
        match self {
            PropertyRange::Empty => None,
            PropertyRange::Interval { end, .. } => Some(end),
            PropertyRange::List(values) => values.last(),
        }
    }

    /// All values of the range in ascending order.
    pub fn all_values(&self) -> BTreeSet<T> {
        match self {
            PropertyRange::Empty => BTreeSet::new(),
            PropertyRange::List(values) => values.clone(),
            PropertyRange::Interval { start, end } => {
                let mut values = BTreeSet::new();
                let mut current = Some(start.clone());
                while let Some(value) = current {
                    if &value > end {
                        break;
                    }
                    current = value.successor();
                    values.insert(value);
                }
                values
            }
        }
    }

    pub fn intersection(&self, other: &Self) -> Self {
        match (self, other) {
            (PropertyRange::Empty, _) | (_, PropertyRange::Empty) => PropertyRange::Empty,
            (
                PropertyRange::Interval { start, end },
                PropertyRange::Interval {
                    start: other_start,
                    end: other_end,
                },
            ) => PropertyRange::interval(
                start.max(other_start).clone(),
                end.min(other_end).clone(),
            ),
            (PropertyRange::List(values), other) | (other, PropertyRange::List(values)) => {
                PropertyRange::list(values.iter().filter(|v| other.contains(v)).cloned())
            }
        }
    }

    pub fn intersects(&self, other: &Self) -> bool {
        match (self, other) {
            (PropertyRange::Empty, _) | (_, PropertyRange::Empty) => false,
            (
                PropertyRange::Interval { start, end },
                PropertyRange::Interval {
                    start: other_start,
                    end: other_end,
                },
            ) => start <= other_end && end >= other_start,
            (PropertyRange::List(values), other) | (other, PropertyRange::List(values)) => {
                values.iter().any(|v| other.contains(v))
            }
        }
    }

    pub fn disjoint(&self, other: &Self) -> bool {
        !self.intersects(other)
    }

    fn kind_rank(&self) -> u8 {
        match self {
            PropertyRange::Empty => 0,
            PropertyRange::Interval { .. } => 1,
            PropertyRange::List(_) => 2,
        }
    }
}

impl<T: RangeValue> PartialOrd for PropertyRange<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Empty ranges sort first, then intervals, then lists; ranges of the same
/// kind compare lexicographically.
impl<T: RangeValue> Ord for PropertyRange<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (
                PropertyRange::Interval { start, end },
                PropertyRange::Interval {
                    start: other_start,
                    end: other_end,
                },
            ) => start.cmp(other_start).then_with(|| end.cmp(other_end)),
            (PropertyRange::List(values), PropertyRange::List(other_values)) => {
                values.iter().cmp(other_values.iter())
            }
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }
}

impl<T: RangeValue> fmt::Display for PropertyRange<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyRange::Empty => f.write_str("[]"),
            PropertyRange::Interval { start, end } => {
                f.write_str("[")?;
                start.fmt_value(f)?;
                f.write_str(" - ")?;
                end.fmt_value(f)?;
                f.write_str("]")
            }
            PropertyRange::List(values) if values.len() == 1 => {
                values.iter().try_for_each(|v| v.fmt_value(f))
            }
            PropertyRange::List(values) => {
                f.write_str("[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    value.fmt_value(f)?;
                }
                f.write_str("]")
            }
        }
    }
}
