//! Rule-language syntax for constraints.

use std::fmt;

use super::Constraint;
use crate::property::{IntRange, RangeValue};

fn precedence(constraint: &Constraint) -> u8 {
    match constraint {
        Constraint::Equivalence(..) => 0,
        Constraint::Implication(..) => 1,
        Constraint::Or(_) => 2,
        Constraint::And(_) => 3,
        Constraint::Not(_) => 4,
        Constraint::Amo(_) | Constraint::Exo(_) => 5,
        Constraint::Constant(_) => 7,
        _ => 6,
    }
}

/// Writes `operand`, bracketed unless it binds tighter than `parent`.
fn write_operand(f: &mut fmt::Formatter<'_>, parent: u8, operand: &Constraint) -> fmt::Result {
    if precedence(operand) > parent {
        write!(f, "{}", operand)
    } else {
        write!(f, "({})", operand)
    }
}

fn write_quoted_list<'a>(
    f: &mut fmt::Formatter<'_>,
    values: impl Iterator<Item = &'a String>,
) -> fmt::Result {
    f.write_str("[")?;
    for (i, value) in values.enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "\"{}\"", value)?;
    }
    f.write_str("]")
}

fn write_int_range(f: &mut fmt::Formatter<'_>, range: &IntRange) -> fmt::Result {
    match range {
        IntRange::Empty => f.write_str("[]"),
        IntRange::Interval { start, end } => write!(f, "[{} - {}]", start, end),
        IntRange::List(values) => {
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

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let own = precedence(self);
        match self {
            Constraint::Constant(v) => write!(f, "{}", v),
            Constraint::Boolean(feature) => write!(f, "{}", feature),
            Constraint::Not(operand) => {
                f.write_str("-")?;
                write_operand(f, own, operand)
            }
            Constraint::Implication(l, r) | Constraint::Equivalence(l, r) => {
                let symbol = if matches!(self, Constraint::Implication(..)) {
                    "=>"
                } else {
                    "<=>"
                };
                write_operand(f, own, l)?;
                write!(f, " {} ", symbol)?;
                write_operand(f, own, r)
            }
            Constraint::And(ops) | Constraint::Or(ops) => {
                let symbol = if matches!(self, Constraint::And(_)) {
                    " & "
                } else {
                    " / "
                };
                for (i, op) in ops.iter().enumerate() {
                    if i > 0 {
                        f.write_str(symbol)?;
                    }
                    write_operand(f, own, op)?;
                }
                Ok(())
            }
            Constraint::Amo(fs) | Constraint::Exo(fs) => {
                let keyword = if matches!(self, Constraint::Amo(_)) {
                    "amo"
                } else {
                    "exo"
                };
                write!(f, "{}[", keyword)?;
                for (i, feature) in fs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", feature)?;
                }
                f.write_str("]")
            }
            Constraint::EnumComparison { feature, value, op } => {
                write!(f, "[{} {} \"{}\"]", feature, op, value)
            }
            Constraint::EnumIn { feature, values } => {
                write!(f, "[{} in ", feature)?;
                write_quoted_list(f, values.iter())?;
                f.write_str("]")
            }
            Constraint::IntComparison { left, right, op } => {
                write!(f, "[{} {} {}]", left, op, right)
            }
            Constraint::IntIn { term, range } => {
                write!(f, "[{} in ", term)?;
                write_int_range(f, range)?;
                f.write_str("]")
            }
            Constraint::Version {
                feature,
                op,
                version,
            } => write!(f, "[{} {} {}]", feature, op, version),
        }
    }
}
