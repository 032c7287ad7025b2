//! Integer features and integer predicates.
//!
//! Every integer feature definition of a model gets its own order-encoded
//! variable `@DEF<i>_<code>`; `i` counts the definitions of the same code.
//! Integer predicates are not translated in place: each distinct predicate
//! gets an indicator variable `@PREDICATE_<n>` that is defined once per
//! slice set as equivalent to the encoding of the predicate.
//!
//! Definitions whose domain exceeds [`MAX_DOMAIN_SIZE`] are rejected.

use std::collections::BTreeMap;

use prl_core::{Constraint, FeatureDefinition, IntFeature, IntTerm, Rule, Theory};

use crate::csp::{
    encode_comparison, encode_in_range, IntegerDomain, IntegerVariable, LinearExpression,
    MAX_DOMAIN_SIZE,
};
use crate::error::{Result, TranspilerError};
use crate::logic::{EncodedFormula, FormulaFactory};
use crate::translation::FeatureInstantiation;

pub const PREDICATE_PREFIX: &str = "@PREDICATE";
pub const FEATURE_DEF_PREFIX: &str = "@DEF";

/// Indicator variables per integer predicate.
pub type IntPredicateMapping = BTreeMap<Constraint, String>;

/// One encoded definition of an integer feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegerEncoding {
    pub definition: FeatureDefinition,
    pub variable: IntegerVariable,
    pub encoding: EncodedFormula,
}

/// Integer variables and their encodings for all integer feature
/// definitions, keyed by feature code.
///
/// The store of a model is built once before slice sets are transpiled and
/// is only read afterwards; merging slices works on a copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegerEncodingStore {
    store: BTreeMap<String, Vec<IntegerEncoding>>,
}

impl IntegerEncodingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encodes all integer definitions among `definitions`.
    pub fn from_definitions<'a>(
        f: &FormulaFactory,
        definitions: impl IntoIterator<Item = &'a FeatureDefinition>,
    ) -> Result<Self> {
        let mut store = Self::new();
        for definition in definitions {
            if definition.theory() == Theory::Int {
                store.add_definition(f, definition)?;
            }
        }
        Ok(store)
    }

    /// Registers a definition unless it is already known and returns its
    /// variable.
    ///
    /// # Errors
    ///
    /// Fails with [`TranspilerError::DomainTooLarge`] if the domain of a new
    /// definition has more than [`MAX_DOMAIN_SIZE`] values.
    pub fn add_definition(
        &mut self,
        f: &FormulaFactory,
        definition: &FeatureDefinition,
    ) -> Result<&IntegerVariable> {
        let encodings = self.store.entry(definition.code.clone()).or_default();
        let index = match encodings.iter().position(|e| &e.definition == definition) {
            Some(index) => index,
            None => {
                let domain = definition
                    .int_domain()
                    .map_or_else(|| IntegerDomain::set([]), IntegerDomain::from_range);
                if !domain.is_encodable() {
                    return Err(TranspilerError::DomainTooLarge {
                        feature: definition.code.clone(),
                        size: domain.size(),
                        max: MAX_DOMAIN_SIZE,
                    });
                }
                let name = format!("{}{}_{}", FEATURE_DEF_PREFIX, encodings.len(), definition.code);
                let variable = IntegerVariable::new(name, domain);
                let encoding = variable.encode(f);
                encodings.push(IntegerEncoding {
                    definition: definition.clone(),
                    variable,
                    encoding,
                });
                encodings.len() - 1
            }
        };
        Ok(&encodings[index].variable)
    }

    pub fn variable(&self, definition: &FeatureDefinition) -> Option<&IntegerVariable> {
        self.encodings(&definition.code)
            .iter()
            .find(|e| &e.definition == definition)
            .map(|e| &e.variable)
    }

    /// The clauses of an integer variable of this store.
    pub fn encoding(&self, variable: &IntegerVariable) -> Option<EncodedFormula> {
        self.store
            .values()
            .flatten()
            .find(|e| e.variable == *variable)
            .map(|e| e.encoding)
    }

    pub fn encodings(&self, code: &str) -> &[IntegerEncoding] {
        self.store.get(code).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of encoded variables.
    pub fn len(&self) -> usize {
        self.store.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Assigns an indicator variable to every distinct integer predicate of the
/// rules, numbered in order of first occurrence.
pub fn collect_int_predicates<'r>(rules: impl IntoIterator<Item = &'r Rule>) -> IntPredicateMapping {
    let mut mapping = IntPredicateMapping::new();
    for rule in rules {
        for constraint in rule.constraints() {
            for predicate in constraint.predicates() {
                if predicate.is_int_predicate() && !mapping.contains_key(predicate) {
                    let variable = format!("{}_{}", PREDICATE_PREFIX, mapping.len());
                    mapping.insert(predicate.clone(), variable);
                }
            }
        }
    }
    mapping
}

/// The integer variable of a feature in the given instantiation.
pub fn int_variable<'s>(
    store: &'s IntegerEncodingStore,
    instantiation: &FeatureInstantiation,
    feature: &IntFeature,
) -> Result<&'s IntegerVariable> {
    instantiation
        .ints
        .get(&feature.code)
        .and_then(|definition| store.variable(definition))
        .ok_or_else(|| TranspilerError::UninstantiatedIntFeature(feature.code.clone()))
}

fn linear_expression<'s>(
    store: &'s IntegerEncodingStore,
    instantiation: &FeatureInstantiation,
    term: &IntTerm,
) -> Result<LinearExpression<'s>> {
    let (terms, offset) = term.linear();
    let mut expression = LinearExpression::constant(i64::from(offset));
    for (coefficient, feature) in terms {
        expression.add_term(
            i64::from(coefficient),
            int_variable(store, instantiation, feature)?,
        );
    }
    Ok(expression)
}

/// The order encoding of an integer predicate.
///
/// # Panics
///
/// Panics if `predicate` is not an integer comparison or `in` predicate.
pub fn encode_int_predicate(
    f: &FormulaFactory,
    store: &IntegerEncodingStore,
    instantiation: &FeatureInstantiation,
    predicate: &Constraint,
) -> Result<EncodedFormula> {
    match predicate {
        Constraint::IntComparison { left, right, op } => {
            let left = linear_expression(store, instantiation, left)?;
            let right = linear_expression(store, instantiation, right)?;
            Ok(encode_comparison(f, &left, *op, &right))
        }
        Constraint::IntIn { term, range } => {
            let expression = linear_expression(store, instantiation, term)?;
            Ok(encode_in_range(f, &expression, range))
        }
        other => panic!("not an integer predicate: {}", other),
    }
}
