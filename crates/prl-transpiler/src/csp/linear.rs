//! Order encoding of linear integer constraints.
//!
//! A comparison `l op r` is normalized to `e op 0` with `e = l - r` and then
//! reduced to constraints of the form `sum(ai * xi) <= b`. Such a constraint
//! is expanded term by term: for a positive coefficient `a`,
//! `a*x + rest <= b` holds iff `x >= v => rest <= b - a*v` holds for every
//! value `v` of `x`; for a negative coefficient the premise is `x <= v`.

use prl_core::{ComparisonOperator, IntRange, PropertyRange};
use smallvec::SmallVec;

use super::IntegerVariable;
use crate::logic::{EncodedFormula, FormulaFactory};

/// `a1*x1 + ... + an*xn + constant` over integer variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearExpression<'a> {
    terms: SmallVec<[(i64, &'a IntegerVariable); 4]>,
    constant: i64,
}

impl<'a> LinearExpression<'a> {
    pub fn constant(value: i64) -> Self {
        Self {
            terms: SmallVec::new(),
            constant: value,
        }
    }

    /// Adds `coefficient * variable`, merging terms of the same variable.
    pub fn add_term(&mut self, coefficient: i64, variable: &'a IntegerVariable) {
        if let Some(pos) = self.terms.iter().position(|(_, v)| v.name == variable.name) {
            self.terms[pos].0 += coefficient;
            if self.terms[pos].0 == 0 {
                self.terms.remove(pos);
            }
        } else if coefficient != 0 {
            self.terms.push((coefficient, variable));
        }
    }

    pub fn add_constant(&mut self, value: i64) {
        self.constant += value;
    }

    /// `self - other`.
    pub fn subtract(mut self, other: &LinearExpression<'a>) -> Self {
        for &(a, x) in &other.terms {
            self.add_term(-a, x);
        }
        self.constant -= other.constant;
        self
    }

    fn negated(&self) -> Self {
        Self {
            terms: self.terms.iter().map(|(a, x)| (-a, *x)).collect(),
            constant: -self.constant,
        }
    }

    pub fn is_constant(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> &[(i64, &'a IntegerVariable)] {
        &self.terms
    }

    /// `self <= 0`.
    fn le_zero(&self, f: &FormulaFactory) -> EncodedFormula {
        encode_le(f, &self.terms, -self.constant)
    }
}

/// Encodes `left op right`.
///
/// # Example
///
/// ```
/// use prl_core::ComparisonOperator;
/// use prl_transpiler::csp::{encode_comparison, IntegerDomain, IntegerVariable, LinearExpression};
/// use prl_transpiler::logic::FormulaFactory;
///
/// let f = FormulaFactory::new();
/// let v = IntegerVariable::new("v", IntegerDomain::range(1, 5));
/// let mut left = LinearExpression::constant(0);
/// left.add_term(1, &v);
///
/// let formula = encode_comparison(&f, &left, ComparisonOperator::Gt, &LinearExpression::constant(3));
/// assert_eq!(formula.to_string(&f), "~@ORD_v_3");
/// ```
pub fn encode_comparison<'a>(
    f: &FormulaFactory,
    left: &LinearExpression<'a>,
    op: ComparisonOperator,
    right: &LinearExpression<'a>,
) -> EncodedFormula {
    let e = left.clone().subtract(right);
    let le = |e: &LinearExpression<'_>, offset: i64| {
        let mut shifted = e.clone();
        shifted.add_constant(offset);
        shifted.le_zero(f)
    };
    match op {
        ComparisonOperator::Le => le(&e, 0),
        ComparisonOperator::Lt => le(&e, 1),
        ComparisonOperator::Ge => le(&e.negated(), 0),
        ComparisonOperator::Gt => le(&e.negated(), 1),
        ComparisonOperator::Eq => f.and(&[le(&e, 0), le(&e.negated(), 0)]),
        ComparisonOperator::Ne => f.or(&[le(&e, 1), le(&e.negated(), 1)]),
    }
}

/// Encodes `expression in range`.
pub fn encode_in_range(
    f: &FormulaFactory,
    expression: &LinearExpression<'_>,
    range: &IntRange,
) -> EncodedFormula {
    let compare = |op, value: i32| {
        encode_comparison(f, expression, op, &LinearExpression::constant(i64::from(value)))
    };
    match range {
        PropertyRange::Empty => f.falsum(),
        PropertyRange::Interval { start, end } => f.and(&[
            compare(ComparisonOperator::Ge, *start),
            compare(ComparisonOperator::Le, *end),
        ]),
        PropertyRange::List(values) => {
            let options: Vec<EncodedFormula> = values
                .iter()
                .map(|v| compare(ComparisonOperator::Eq, *v))
                .collect();
            f.or(&options)
        }
    }
}

fn bounds(terms: &[(i64, &IntegerVariable)]) -> Option<(i64, i64)> {
    terms.iter().try_fold((0i64, 0i64), |(min, max), (a, x)| {
        let lb = i64::from(x.domain.lb()?);
        let ub = i64::from(x.domain.ub()?);
        let (lo, hi) = if *a > 0 { (a * lb, a * ub) } else { (a * ub, a * lb) };
        Some((min.saturating_add(lo), max.saturating_add(hi)))
    })
}

/// `sum(terms) <= bound`.
fn encode_le(f: &FormulaFactory, terms: &[(i64, &IntegerVariable)], bound: i64) -> EncodedFormula {
    let Some(((a, x), rest)) = terms.split_first() else {
        return f.constant(bound >= 0);
    };
    let x: &IntegerVariable = x;
    if let Some((min, max)) = bounds(terms) {
        if max <= bound {
            return f.verum();
        }
        if min > bound {
            return f.falsum();
        }
    }
    if rest.is_empty() {
        return if *a > 0 {
            x.le(f, clamp(floor_div(bound, *a)))
        } else {
            x.ge(f, clamp(ceil_div(bound, *a)))
        };
    }
    let clauses: Vec<EncodedFormula> = x
        .domain
        .values()
        .into_iter()
        .map(|v| {
            let remaining = encode_le(f, rest, bound.saturating_sub(a * i64::from(v)));
            let premise_fails = if *a > 0 {
                f.not(x.ge(f, v))
            } else {
                f.not(x.le(f, v))
            };
            f.or(&[premise_fails, remaining])
        })
        .collect();
    f.and(&clauses)
}

fn floor_div(a: i64, b: i64) -> i64 {
    let q = a / b;
    if (a % b != 0) && ((a < 0) != (b < 0)) {
        q - 1
    } else {
        q
    }
}

fn ceil_div(a: i64, b: i64) -> i64 {
    let q = a / b;
    if (a % b != 0) && ((a < 0) == (b < 0)) {
        q + 1
    } else {
        q
    }
}

fn clamp(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
