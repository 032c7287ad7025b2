//! Evaluation, restriction and simplification of rules.
//!
//! Restriction and simplification never fail. Whenever possible the result
//! degrades to a simpler rule kind, in the end to a plain constraint rule.

use std::collections::BTreeSet;

use super::{GroupType, Rule, RuleKind};
use crate::assignment::FeatureAssignment;
use crate::constraint::{fold_equivalence, Constraint};
use crate::feature::BooleanFeature;

impl Rule {
    pub fn evaluate(&self, assignment: &FeatureAssignment) -> bool {
        match &self.kind {
            RuleKind::Constraint(c) => c.evaluate(assignment),
            RuleKind::Inclusion { condition, then } => {
                !condition.evaluate(assignment) || then.evaluate(assignment)
            }
            RuleKind::Exclusion {
                condition,
                then_not,
            } => !condition.evaluate(assignment) || !then_not.evaluate(assignment),
            RuleKind::IfThenElse {
                condition,
                then,
                otherwise,
            } => {
                if condition.evaluate(assignment) {
                    then.evaluate(assignment)
                } else {
                    otherwise.evaluate(assignment)
                }
            }
            RuleKind::Definition {
                feature,
                definition,
            } => assignment.boolean(feature).unwrap_or(false) == definition.evaluate(assignment),
            RuleKind::Mandatory(rule) | RuleKind::Forbidden(rule) => {
                rule.constraint.evaluate(assignment)
            }
            RuleKind::Group {
                group_type,
                group,
                content,
            } => {
                let selected = assignment.boolean(group).unwrap_or(false);
                if *group_type == GroupType::Mandatory || selected {
                    selected && exo(content).evaluate(assignment)
                } else {
                    !any(content).evaluate(assignment)
                }
            }
        }
    }

    /// Substitutes the assigned features and collapses the rule.
    ///
    /// The restricted rule evaluates like the original one under every
    /// extension of `assignment`.
    pub fn restrict(&self, assignment: &FeatureAssignment) -> Rule {
        match &self.kind {
            RuleKind::Constraint(c) => self.derive(RuleKind::Constraint(c.restrict(assignment))),
            RuleKind::Inclusion { condition, then } => {
                self.simplified_inclusion(condition.restrict(assignment), then.restrict(assignment))
            }
            RuleKind::Exclusion {
                condition,
                then_not,
            } => self.simplified_exclusion(
                condition.restrict(assignment),
                then_not.restrict(assignment),
            ),
            RuleKind::IfThenElse {
                condition,
                then,
                otherwise,
            } => self.simplified_if_then_else(
                condition.restrict(assignment),
                then.restrict(assignment),
                otherwise.restrict(assignment),
            ),
            RuleKind::Definition {
                feature,
                definition,
            } => {
                let definition = definition.restrict(assignment);
                match assignment.boolean(feature) {
                    Some(true) => self.derive(RuleKind::Constraint(definition)),
                    Some(false) => self.derive(RuleKind::Constraint(definition.not())),
                    None if definition.is_constant() => self.derive(RuleKind::Constraint(
                        fold_equivalence(Constraint::Boolean(feature.clone()), definition),
                    )),
                    None => self.derive(RuleKind::Definition {
                        feature: feature.clone(),
                        definition,
                    }),
                }
            }
            RuleKind::Mandatory(rule) | RuleKind::Forbidden(rule) => {
                let restricted = rule.constraint.restrict(assignment);
                if restricted.is_constant() {
                    self.derive(RuleKind::Constraint(restricted))
                } else {
                    self.clone()
                }
            }
            RuleKind::Group {
                group_type,
                group,
                content,
            } => self.restrict_group(*group_type, group, content, assignment),
        }
    }

    /// Folds constants in the rule's constraints and collapses the rule.
    pub fn syntactic_simplify(&self) -> Rule {
        match &self.kind {
            RuleKind::Constraint(c) => self.derive(RuleKind::Constraint(c.syntactic_simplify())),
            RuleKind::Inclusion { condition, then } => {
                self.simplified_inclusion(condition.syntactic_simplify(), then.syntactic_simplify())
            }
            RuleKind::Exclusion {
                condition,
                then_not,
            } => self.simplified_exclusion(
                condition.syntactic_simplify(),
                then_not.syntactic_simplify(),
            ),
            RuleKind::IfThenElse {
                condition,
                then,
                otherwise,
            } => self.simplified_if_then_else(
                condition.syntactic_simplify(),
                then.syntactic_simplify(),
                otherwise.syntactic_simplify(),
            ),
            RuleKind::Definition {
                feature,
                definition,
            } => {
                let atom = Constraint::Boolean(feature.clone());
                let definition = definition.syntactic_simplify();
                if definition.is_constant() || definition == atom {
                    self.derive(RuleKind::Constraint(fold_equivalence(atom, definition)))
                } else {
                    self.derive(RuleKind::Definition {
                        feature: feature.clone(),
                        definition,
                    })
                }
            }
            RuleKind::Mandatory(_) | RuleKind::Forbidden(_) => self.clone(),
            RuleKind::Group {
                group_type,
                group,
                content,
            } => {
                let group_atom = Constraint::Boolean(group.clone());
                let mut features = content.iter();
                match (features.next(), features.next(), group_type) {
                    (None, _, GroupType::Optional) => {
                        self.derive(RuleKind::Constraint(group_atom.not()))
                    }
                    (None, _, GroupType::Mandatory) => {
                        self.derive(RuleKind::Constraint(Constraint::FALSE))
                    }
                    (Some(single), None, GroupType::Optional) => {
                        self.derive(RuleKind::Constraint(Constraint::equivalence(
                            group_atom,
                            Constraint::Boolean(single.clone()),
                        )))
                    }
                    (Some(single), None, GroupType::Mandatory) => {
                        self.derive(RuleKind::Constraint(Constraint::and([
                            group_atom,
                            Constraint::Boolean(single.clone()),
                        ])))
                    }
                    _ => self.clone(),
                }
            }
        }
    }

    fn simplified_inclusion(&self, condition: Constraint, then: Constraint) -> Rule {
        if condition.is_false() || then.is_true() || condition == then {
            self.derive(RuleKind::Constraint(Constraint::TRUE))
        } else if condition.is_true() {
            self.derive(RuleKind::Constraint(then))
        } else if then.is_false() {
            self.derive(RuleKind::Constraint(condition.not()))
        } else {
            self.derive(RuleKind::Inclusion { condition, then })
        }
    }

    fn simplified_exclusion(&self, condition: Constraint, then_not: Constraint) -> Rule {
        if condition.is_true() {
            self.derive(RuleKind::Constraint(then_not.not()))
        } else if condition.is_false() || then_not.is_false() {
            self.derive(RuleKind::Constraint(Constraint::TRUE))
        } else if then_not.is_true() || condition == then_not {
            self.derive(RuleKind::Constraint(condition.not()))
        } else {
            self.derive(RuleKind::Exclusion {
                condition,
                then_not,
            })
        }
    }

    fn simplified_if_then_else(
        &self,
        condition: Constraint,
        then: Constraint,
        otherwise: Constraint,
    ) -> Rule {
        if condition == then && then == otherwise {
            self.derive(RuleKind::Constraint(condition))
        } else if condition.is_true() {
            self.derive(RuleKind::Constraint(then))
        } else if condition.is_false() {
            self.derive(RuleKind::Constraint(otherwise))
        } else if then.is_true() || condition == then {
            self.derive(RuleKind::Inclusion {
                condition: condition.not(),
                then: otherwise,
            })
        } else if then.is_false() {
            self.derive(RuleKind::Constraint(Constraint::and([
                condition.not(),
                otherwise,
            ])))
        } else if otherwise.is_true() {
            self.derive(RuleKind::Inclusion { condition, then })
        } else if otherwise.is_false() || condition == otherwise {
            self.derive(RuleKind::Constraint(Constraint::and([condition, then])))
        } else {
            self.derive(RuleKind::IfThenElse {
                condition,
                then,
                otherwise,
            })
        }
    }

    fn restrict_group(
        &self,
        group_type: GroupType,
        group: &BooleanFeature,
        content: &BTreeSet<BooleanFeature>,
        assignment: &FeatureAssignment,
    ) -> Rule {
        let exactly_one = exo(content).restrict(assignment);
        match (assignment.boolean(group), group_type) {
            (Some(true), _) => return self.derive(RuleKind::Constraint(exactly_one)),
            (Some(false), GroupType::Mandatory) => {
                return self.derive(RuleKind::Constraint(Constraint::FALSE))
            }
            (Some(false), GroupType::Optional) => {
                let none = any(content).restrict(assignment).not();
                return self.derive(RuleKind::Constraint(none));
            }
            (None, _) => {}
        }

        let group_atom = Constraint::Boolean(group.clone());
        let constraint = match exactly_one {
            Constraint::Exo(remaining) => {
                return self.derive(RuleKind::Group {
                    group_type,
                    group: group.clone(),
                    content: remaining,
                })
            }
            Constraint::Constant(true) => group_atom,
            Constraint::Constant(false) => match group_type {
                GroupType::Optional if any(content).restrict(assignment).is_false() => {
                    group_atom.not()
                }
                _ => Constraint::FALSE,
            },
            atom @ Constraint::Boolean(_) if group_type == GroupType::Optional => {
                Constraint::equivalence(group_atom, atom)
            }
            other => Constraint::and([group_atom, other]).syntactic_simplify(),
        };
        self.derive(RuleKind::Constraint(constraint))
    }
}

fn exo(content: &BTreeSet<BooleanFeature>) -> Constraint {
    Constraint::exo(content.iter().cloned())
}

fn any(content: &BTreeSet<BooleanFeature>) -> Constraint {
    Constraint::or(content.iter().cloned().map(Constraint::Boolean))
}
