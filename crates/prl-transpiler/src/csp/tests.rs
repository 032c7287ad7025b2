//! Tests for integer variables and the order encoding.

use super::*;
use crate::logic::evaluate;
use prl_core::ComparisonOperator;

/// The order-variable model representing `values`.
fn model_for(vars: &[&IntegerVariable], values: &[i32]) -> Model {
    vars.iter()
        .zip(values)
        .flat_map(|(x, value)| {
            x.order_variables()
                .into_iter()
                .filter(move |(bound, _)| value <= bound)
                .map(|(_, v)| v)
        })
        .collect()
}

fn expression<'a>(terms: &[(i64, &'a IntegerVariable)], constant: i64) -> LinearExpression<'a> {
    let mut e = LinearExpression::constant(constant);
    for &(a, x) in terms {
        e.add_term(a, x);
    }
    e
}

const OPERATORS: [ComparisonOperator; 6] = [
    ComparisonOperator::Eq,
    ComparisonOperator::Ne,
    ComparisonOperator::Lt,
    ComparisonOperator::Le,
    ComparisonOperator::Gt,
    ComparisonOperator::Ge,
];

fn holds(left: i64, op: ComparisonOperator, right: i64) -> bool {
    match op {
        ComparisonOperator::Eq => left == right,
        ComparisonOperator::Ne => left != right,
        ComparisonOperator::Lt => left < right,
        ComparisonOperator::Le => left <= right,
        ComparisonOperator::Gt => left > right,
        ComparisonOperator::Ge => left >= right,
    }
}

// ============================================================================
// Domain and Variable Tests
// ============================================================================

mod variable_tests {
    use super::*;

    #[test]
    fn test_domain_from_range() {
        assert_eq!(
            IntegerDomain::from_range(&IntRange::interval(1, 3)).values(),
            [1, 2, 3]
        );
        assert_eq!(IntegerDomain::from_range(&IntRange::list([4, 1])).values(), [1, 4]);
        assert!(IntegerDomain::from_range(&IntRange::empty()).is_empty());
        assert!(IntegerDomain::range(3, 1).is_empty());
        assert_eq!(IntegerDomain::range(-2, 2).size(), 5);
        assert_eq!(IntegerDomain::set([1, 4, 9]).to_string(), "[1, 4, 9]");
    }

    #[test]
    fn test_domain_size_bound() {
        let widest = IntegerDomain::range(i32::MIN, i32::MAX);
        assert_eq!(widest.size(), 1 << 32);
        assert!(!widest.is_encodable());
        assert!(!IntegerDomain::range(0, i32::MAX).is_encodable());
        let largest = IntegerDomain::range(1, MAX_DOMAIN_SIZE as i32);
        assert!(largest.is_encodable());
        assert!(!IntegerDomain::range(0, MAX_DOMAIN_SIZE as i32).is_encodable());
        assert_eq!(largest.lb(), Some(1));
        assert!(widest.contains(i32::MAX));
    }

    #[test]
    fn test_order_literals() {
        let f = FormulaFactory::new();
        let x = IntegerVariable::new("x", IntegerDomain::set([1, 4, 9]));
        assert_eq!(x.order_variables().len(), 2);
        assert_eq!(x.le(&f, 0), f.falsum());
        assert_eq!(x.le(&f, 5).to_string(&f), "@ORD_x_4");
        assert_eq!(x.le(&f, 9), f.verum());
        assert_eq!(x.ge(&f, 1), f.verum());
        assert_eq!(x.ge(&f, 2).to_string(&f), "~@ORD_x_1");
        assert_eq!(x.ge(&f, 10), f.falsum());
        assert_eq!(x.ge(&f, i32::MIN), f.verum());
    }

    #[test]
    fn test_variable_encoding() {
        let f = FormulaFactory::new();
        let x = IntegerVariable::new("x", IntegerDomain::range(0, 3));
        assert_eq!(
            x.encode(&f).to_string(&f),
            "(~@ORD_x_0 | @ORD_x_1) & (~@ORD_x_1 | @ORD_x_2)"
        );
        let single = IntegerVariable::new("s", IntegerDomain::set([7]));
        assert_eq!(single.encode(&f), f.verum());
        let empty = IntegerVariable::new("e", IntegerDomain::set([]));
        assert_eq!(empty.encode(&f), f.falsum());
    }

    #[test]
    fn test_decode() {
        let f = FormulaFactory::new();
        let x = IntegerVariable::new("x", IntegerDomain::set([1, 4, 9]));
        for value in [1, 4, 9] {
            let model = model_for(&[&x], &[value]);
            assert!(evaluate(&f, x.encode(&f), &model));
            assert_eq!(x.decode(&model), Some(value));
        }
    }
}

// ============================================================================
// Linear Constraint Tests
// ============================================================================

mod linear_tests {
    use super::*;

    #[test]
    fn test_single_variable_comparisons_match_arithmetic() {
        let f = FormulaFactory::new();
        let x = IntegerVariable::new("x", IntegerDomain::set([-2, 0, 3, 5]));
        for coefficient in [-2, 1, 3] {
            let left = expression(&[(coefficient, &x)], 1);
            for op in OPERATORS {
                for bound in -6..=12 {
                    let formula = encode_comparison(&f, &left, op, &LinearExpression::constant(bound));
                    for value in x.domain.values() {
                        let model = model_for(&[&x], &[value]);
                        assert_eq!(
                            evaluate(&f, formula, &model),
                            holds(coefficient * i64::from(value) + 1, op, bound),
                            "{}*x + 1 {} {} with x = {}",
                            coefficient,
                            op,
                            bound,
                            value
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_sum_comparisons_match_arithmetic() {
        let f = FormulaFactory::new();
        let x = IntegerVariable::new("x", IntegerDomain::range(0, 4));
        let y = IntegerVariable::new("y", IntegerDomain::set([1, 2, 6]));
        let left = expression(&[(2, &x), (-1, &y)], 3);
        let right = expression(&[(1, &x)], 0);
        for op in OPERATORS {
            let formula = encode_comparison(&f, &left, op, &right);
            for vx in x.domain.values() {
                for vy in y.domain.values() {
                    let model = model_for(&[&x, &y], &[vx, vy]);
                    let l = 2 * i64::from(vx) - i64::from(vy) + 3;
                    assert_eq!(
                        evaluate(&f, formula, &model),
                        holds(l, op, i64::from(vx)),
                        "x = {}, y = {}, op {}",
                        vx,
                        vy,
                        op
                    );
                }
            }
        }
    }

    #[test]
    fn test_merged_terms_and_constants() {
        let f = FormulaFactory::new();
        let x = IntegerVariable::new("x", IntegerDomain::range(0, 4));
        let left = expression(&[(1, &x), (2, &x)], 0);
        assert_eq!(left.terms().len(), 1);
        let same = expression(&[(1, &x)], 0);
        let e = same.clone().subtract(&same);
        assert!(e.is_constant());
        assert_eq!(
            encode_comparison(&f, &same, ComparisonOperator::Eq, &same),
            f.verum()
        );
        assert_eq!(
            encode_comparison(&f, &same, ComparisonOperator::Gt, &LinearExpression::constant(4)),
            f.falsum()
        );
    }

    #[test]
    fn test_in_range() {
        let f = FormulaFactory::new();
        let x = IntegerVariable::new("x", IntegerDomain::range(0, 6));
        let e = expression(&[(1, &x)], 0);
        let interval = encode_in_range(&f, &e, &IntRange::interval(2, 4));
        let list = encode_in_range(&f, &e, &IntRange::list([1, 5]));
        assert_eq!(encode_in_range(&f, &e, &IntRange::empty()), f.falsum());
        for value in 0..=6 {
            let model = model_for(&[&x], &[value]);
            assert_eq!(evaluate(&f, interval, &model), (2..=4).contains(&value));
            assert_eq!(evaluate(&f, list, &model), value == 1 || value == 5);
        }
    }
}
