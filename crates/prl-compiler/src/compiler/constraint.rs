//! Compilation of parsed constraints against the resolved feature theories.

use prl_core::{
    BooleanFeature, ComparisonOperator, Constraint, EnumFeature, IntFeature, IntTerm, Theory,
};

use crate::error::CompileError;
use crate::store::TheoryMap;
use crate::syntax::{PrlConstraint, PrlTerm};

type Result<T> = std::result::Result<T, CompileError>;

/// Turns parsed constraints into typed constraints.
pub(crate) struct ConstraintCompiler<'a> {
    theories: &'a TheoryMap,
}

impl<'a> ConstraintCompiler<'a> {
    pub(crate) fn new(theories: &'a TheoryMap) -> Self {
        Self { theories }
    }

    pub(crate) fn compile(&self, constraint: &PrlConstraint) -> Result<Constraint> {
        Ok(match constraint {
            PrlConstraint::Constant(value) => Constraint::constant(*value),
            PrlConstraint::Feature(code) => Constraint::Boolean(self.boolean_feature(code)?),
            PrlConstraint::Not(operand) => self.compile(operand)?.not(),
            PrlConstraint::Implication(left, right) => {
                Constraint::implication(self.compile(left)?, self.compile(right)?)
            }
            PrlConstraint::Equivalence(left, right) => {
                Constraint::equivalence(self.compile(left)?, self.compile(right)?)
            }
            PrlConstraint::And(operands) => Constraint::and(self.compile_all(operands)?),
            PrlConstraint::Or(operands) => Constraint::or(self.compile_all(operands)?),
            PrlConstraint::Amo(features) => Constraint::amo(self.boolean_features(features)?),
            PrlConstraint::Exo(features) => Constraint::exo(self.boolean_features(features)?),
            PrlConstraint::Comparison { left, op, right } => self.comparison(left, *op, right)?,
            PrlConstraint::InIntRange { term, range } => {
                Constraint::int_in(self.int_term(term)?, range.clone())
            }
            PrlConstraint::InEnums { term, values } => {
                let PrlTerm::Feature(code) = term else {
                    return Err(CompileError::EnumInLeftHandSide);
                };
                Constraint::enum_in(self.enum_feature(code)?, values.iter().cloned())
            }
        })
    }

    fn compile_all(&self, constraints: &[PrlConstraint]) -> Result<Vec<Constraint>> {
        constraints.iter().map(|c| self.compile(c)).collect()
    }

    fn theory(&self, code: &str) -> Result<Theory> {
        self.theories
            .get(code)
            .copied()
            .ok_or_else(|| CompileError::UnknownFeature(code.to_string()))
    }

    fn wrong_theory(code: &str, theory: Theory, expected: Theory) -> CompileError {
        CompileError::WrongTheory {
            feature: code.to_string(),
            theory,
            expected,
        }
    }

    /// A plain or versioned boolean feature.
    pub(crate) fn boolean_feature(&self, code: &str) -> Result<BooleanFeature> {
        match self.theory(code)? {
            Theory::Bool => Ok(BooleanFeature::new(code)),
            Theory::VersionedBool => Ok(BooleanFeature::versioned(code)),
            theory => Err(Self::wrong_theory(code, theory, Theory::Bool)),
        }
    }

    /// A boolean feature that must not be versioned.
    pub(crate) fn unversioned_boolean_feature(&self, code: &str) -> Result<BooleanFeature> {
        let feature = self.boolean_feature(code)?;
        if feature.versioned {
            return Err(CompileError::VersionedFeature(code.to_string()));
        }
        Ok(feature)
    }

    /// Plain boolean features, as used in cardinality constraints and groups.
    pub(crate) fn boolean_features(&self, codes: &[String]) -> Result<Vec<BooleanFeature>> {
        codes
            .iter()
            .map(|code| match self.theory(code)? {
                Theory::Bool => Ok(BooleanFeature::new(code)),
                theory => Err(Self::wrong_theory(code, theory, Theory::Bool)),
            })
            .collect()
    }

    fn int_feature(&self, code: &str) -> Result<IntFeature> {
        match self.theory(code)? {
            Theory::Int => Ok(IntFeature::new(code)),
            theory => Err(Self::wrong_theory(code, theory, Theory::Int)),
        }
    }

    fn enum_feature(&self, code: &str) -> Result<EnumFeature> {
        match self.theory(code)? {
            Theory::Enum => Ok(EnumFeature::new(code)),
            theory => Err(Self::wrong_theory(code, theory, Theory::Enum)),
        }
    }

    fn int_term(&self, term: &PrlTerm) -> Result<IntTerm> {
        match term {
            PrlTerm::Feature(code) => Ok(IntTerm::Feature(self.int_feature(code)?)),
            PrlTerm::IntValue(value) => Ok(IntTerm::Value(*value)),
            PrlTerm::Mul(left, right) => self.int_mul(left, right),
            PrlTerm::Add(operands) => {
                let terms = operands
                    .iter()
                    .map(|t| self.int_term(t))
                    .collect::<Result<Vec<_>>>()?;
                Ok(IntTerm::sum(terms)?)
            }
            PrlTerm::EnumValue(value) => {
                Err(CompileError::InvalidIntTerm(format!("enum value \"{}\"", value)))
            }
        }
    }

    fn int_mul(&self, left: &PrlTerm, right: &PrlTerm) -> Result<IntTerm> {
        match (left, right) {
            (PrlTerm::IntValue(c), PrlTerm::Feature(code))
            | (PrlTerm::Feature(code), PrlTerm::IntValue(c)) => {
                Ok(IntTerm::mul(*c, self.int_feature(code)?))
            }
            _ => Err(CompileError::IntMultiplication),
        }
    }

    fn comparison(
        &self,
        left: &PrlTerm,
        op: ComparisonOperator,
        right: &PrlTerm,
    ) -> Result<Constraint> {
        match self.predicate_theory(left, right)? {
            Theory::Bool | Theory::VersionedBool => self.version_predicate(left, op, right),
            Theory::Enum => self.enum_comparison(left, op, right),
            Theory::Int => Ok(Constraint::int_comparison(
                self.int_term(left)?,
                self.int_term(right)?,
                op,
            )),
        }
    }

    fn enum_comparison(
        &self,
        left: &PrlTerm,
        op: ComparisonOperator,
        right: &PrlTerm,
    ) -> Result<Constraint> {
        let (code, value) = match (left, right) {
            (PrlTerm::Feature(code), PrlTerm::EnumValue(value))
            | (PrlTerm::EnumValue(value), PrlTerm::Feature(code)) => (code, value),
            _ => return Err(CompileError::EnumComparison),
        };
        if !matches!(op, ComparisonOperator::Eq | ComparisonOperator::Ne) {
            return Err(CompileError::EnumOperator);
        }
        Ok(Constraint::enum_comparison(
            self.enum_feature(code)?,
            value.clone(),
            op,
        ))
    }

    /// A version comparison; a version on the left-hand side flips the
    /// operator so the feature is always compared from the left.
    fn version_predicate(
        &self,
        left: &PrlTerm,
        op: ComparisonOperator,
        right: &PrlTerm,
    ) -> Result<Constraint> {
        let (code, op, version) = match (left, right) {
            (PrlTerm::Feature(code), PrlTerm::IntValue(v)) => (code, op, *v),
            (PrlTerm::IntValue(v), PrlTerm::Feature(code)) => (code, op.reverse(), *v),
            _ => return Err(CompileError::VersionPredicate),
        };
        if version <= 0 {
            return Err(CompileError::NonPositiveVersion);
        }
        let feature = self.boolean_feature(code)?;
        if !feature.versioned {
            return Err(CompileError::UnversionedFeature(feature.code));
        }
        Ok(Constraint::version(feature, op, version))
    }

    /// The common theory of all features in a comparison; without features
    /// the kind of the literals decides.
    fn predicate_theory(&self, left: &PrlTerm, right: &PrlTerm) -> Result<Theory> {
        let mut theory: Option<Theory> = None;
        for code in left.features().into_iter().chain(right.features()) {
            let found = self.theory(code)?;
            match theory {
                None => theory = Some(found),
                Some(first) if first != found => {
                    return Err(CompileError::MixedTheories {
                        first,
                        second: found,
                    })
                }
                Some(_) => {}
            }
        }
        match theory {
            Some(theory) => Ok(theory),
            None if left.is_int() && right.is_int() => Ok(Theory::Int),
            None if matches!(
                (left, right),
                (PrlTerm::EnumValue(_), PrlTerm::EnumValue(_))
            ) =>
            {
                Ok(Theory::Enum)
            }
            None => Err(CompileError::UndeterminedTheory),
        }
    }
}
