//! Rule-language syntax for rules.

use std::fmt;

use super::{FeatureRule, FeatureTarget, GroupType, Rule, RuleKind};

impl fmt::Display for GroupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupType::Optional => f.write_str("optional"),
            GroupType::Mandatory => f.write_str("mandatory"),
        }
    }
}

impl fmt::Display for FeatureRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = if self.forbidden {
            "forbidden"
        } else {
            "mandatory"
        };
        write!(f, "{} feature ", keyword)?;
        match &self.target {
            FeatureTarget::Boolean(feature) => write!(f, "{}", feature),
            FeatureTarget::Version(feature, version) => write!(f, "[{} = {}]", feature, version),
            FeatureTarget::Enum(feature, value) => write!(f, "{} = \"{}\"", feature, value),
            FeatureTarget::Int(feature, value) => write!(f, "{} = {}", feature, value),
        }
    }
}

fn write_header(f: &mut fmt::Formatter<'_>, kind: &RuleKind) -> fmt::Result {
    match kind {
        RuleKind::Constraint(c) => write!(f, "rule {}", c),
        RuleKind::Inclusion { condition, then } => write!(f, "rule if {} then {}", condition, then),
        RuleKind::Exclusion {
            condition,
            then_not,
        } => write!(f, "rule if {} thenNot {}", condition, then_not),
        RuleKind::IfThenElse {
            condition,
            then,
            otherwise,
        } => write!(
            f,
            "rule if {} then {} else {}",
            condition, then, otherwise
        ),
        RuleKind::Definition {
            feature,
            definition,
        } => write!(f, "rule {} is {}", feature, definition),
        RuleKind::Mandatory(rule) | RuleKind::Forbidden(rule) => write!(f, "rule {}", rule),
        RuleKind::Group {
            group_type,
            group,
            content,
        } => {
            write!(f, "{} group {} contains [", group_type, group)?;
            for (i, feature) in content.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", feature)?;
            }
            f.write_str("]")
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_header(f, &self.kind)?;
        if self.id.is_empty() && self.description.is_empty() && self.properties.is_empty() {
            return Ok(());
        }
        f.write_str(" {\n")?;
        if !self.id.is_empty() {
            writeln!(f, "  id \"{}\"", self.id)?;
        }
        if !self.description.is_empty() {
            writeln!(f, "  description \"{}\"", self.description)?;
        }
        for property in self.properties.values() {
            writeln!(f, "  {}", property)?;
        }
        f.write_str("}")
    }
}
