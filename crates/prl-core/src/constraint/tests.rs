//! Tests for the constraint algebra.

use super::*;
use crate::assignment::FeatureAssignment;

fn a() -> BooleanFeature {
    BooleanFeature::new("a")
}

fn b() -> BooleanFeature {
    BooleanFeature::new("b")
}

fn c() -> BooleanFeature {
    BooleanFeature::new("c")
}

fn atom(f: BooleanFeature) -> Constraint {
    Constraint::Boolean(f)
}

/// All assignments of the given boolean features.
fn boolean_assignments(features: &[BooleanFeature]) -> Vec<FeatureAssignment> {
    (0..1u32 << features.len())
        .map(|bits| {
            let mut assignment = FeatureAssignment::new();
            for (i, f) in features.iter().enumerate() {
                assignment.assign(f, bits & (1 << i) != 0).unwrap();
            }
            assignment
        })
        .collect()
}

fn sample_constraints() -> Vec<Constraint> {
    vec![
        Constraint::implication(atom(a()), atom(b())),
        Constraint::equivalence(atom(a()), Constraint::or([atom(b()), atom(c())])),
        Constraint::and([atom(a()), atom(b()).not(), Constraint::TRUE]),
        Constraint::or([atom(a()), Constraint::and([atom(b()), atom(c())])]),
        Constraint::amo([a(), b(), c()]),
        Constraint::exo([a(), b(), c()]),
        Constraint::implication(Constraint::amo([a(), b()]), Constraint::exo([b(), c()])),
        Constraint::equivalence(atom(a()), atom(a())).not(),
    ]
}

// ============================================================================
// Constructor Tests
// ============================================================================

mod constructor_tests {
    use super::*;

    #[test]
    fn test_not_folds() {
        assert_eq!(Constraint::TRUE.not(), Constraint::FALSE);
        assert_eq!(Constraint::FALSE.not(), Constraint::TRUE);
        assert_eq!(atom(a()).not().not(), atom(a()));
    }

    #[test]
    fn test_empty_nary() {
        assert_eq!(Constraint::and([]), Constraint::TRUE);
        assert_eq!(Constraint::or([]), Constraint::FALSE);
        assert_eq!(Constraint::and([atom(a())]), atom(a()));
    }

    #[test]
    fn test_nary_flatten_and_dedupe() {
        let nested = Constraint::or([
            atom(a()),
            Constraint::or([atom(b()), atom(a())]),
            Constraint::and([atom(c()), atom(a())]),
        ]);
        match nested {
            Constraint::Or(ops) => {
                assert_eq!(ops.len(), 3);
                assert!(ops.contains(&Constraint::and([atom(a()), atom(c())])));
            }
            other => panic!("expected disjunction, got {}", other),
        }
    }

    #[test]
    fn test_cardinality_collapse() {
        assert_eq!(Constraint::amo([]), Constraint::TRUE);
        assert_eq!(Constraint::amo([a()]), Constraint::TRUE);
        assert_eq!(Constraint::exo([]), Constraint::FALSE);
        assert_eq!(Constraint::exo([a()]), atom(a()));
        assert_eq!(Constraint::exo([a(), a()]), atom(a()));
    }
}

// ============================================================================
// Evaluation Tests
// ============================================================================

mod evaluate_tests {
    use super::*;

    #[test]
    fn test_cardinality_evaluation() {
        let amo = Constraint::amo([a(), b(), c()]);
        let exo = Constraint::exo([a(), b(), c()]);
        for assignment in boolean_assignments(&[a(), b(), c()]) {
            let count = [a(), b(), c()]
                .iter()
                .filter(|f| assignment.boolean(f) == Some(true))
                .count();
            assert_eq!(amo.evaluate(&assignment), count <= 1);
            assert_eq!(exo.evaluate(&assignment), count == 1);
        }
    }

    #[test]
    fn test_enum_evaluation() {
        let color = EnumFeature::new("color");
        let eq = Constraint::enum_eq(color.clone(), "red");
        let ne = Constraint::enum_ne(color.clone(), "red");
        let within = Constraint::enum_in(color.clone(), ["red", "blue"]);

        let empty = FeatureAssignment::new();
        assert!(!eq.evaluate(&empty));
        assert!(ne.evaluate(&empty));
        assert!(!within.evaluate(&empty));

        let blue = FeatureAssignment::new().with_enum(&color, "blue");
        assert!(!eq.evaluate(&blue));
        assert!(ne.evaluate(&blue));
        assert!(within.evaluate(&blue));
    }

    #[test]
    fn test_int_evaluation() {
        let x = IntFeature::new("x");
        let y = IntFeature::new("y");
        let sum = IntTerm::sum([IntTerm::mul(2, x.clone()), IntTerm::Feature(y.clone())]).unwrap();
        let le = Constraint::int_comparison(sum, 7, ComparisonOperator::Le);

        let assignment = FeatureAssignment::new().with_int(&x, 2).with_int(&y, 3);
        assert!(le.evaluate(&assignment));
        let assignment = FeatureAssignment::new().with_int(&x, 3).with_int(&y, 3);
        assert!(!le.evaluate(&assignment));
        // unassigned y
        assert!(!le.evaluate(&FeatureAssignment::new().with_int(&x, 0)));
    }

    #[test]
    fn test_int_evaluation_beyond_i32() {
        let x = IntFeature::new("x");
        let y = IntFeature::new("y");
        let large = FeatureAssignment::new().with_int(&x, 1 << 30);
        let gt = Constraint::int_comparison(IntTerm::mul(4, x.clone()), 0, ComparisonOperator::Gt);
        assert!(gt.evaluate(&large));

        let extreme = FeatureAssignment::new()
            .with_int(&x, i32::MIN)
            .with_int(&y, i32::MIN);
        let sum = IntTerm::sum([
            IntTerm::mul(i32::MIN, x.clone()),
            IntTerm::mul(i32::MIN, y.clone()),
            IntTerm::Value(i32::MAX),
        ])
        .unwrap();
        assert_eq!(sum.value(&extreme), Some((1i128 << 63) + i128::from(i32::MAX)));
        let ge = Constraint::int_comparison(sum.clone(), i32::MAX, ComparisonOperator::Ge);
        assert!(ge.evaluate(&extreme));

        // values outside the i32 range are never in an int range
        let within = Constraint::int_in(sum, IntRange::interval(i32::MIN, i32::MAX));
        assert!(!within.evaluate(&extreme));
    }

    #[test]
    fn test_version_requires_installed_feature() {
        let v = BooleanFeature::versioned("v");
        let le = Constraint::version(v.clone(), ComparisonOperator::Le, 3);

        let mut assignment = FeatureAssignment::new();
        assert!(!le.evaluate(&assignment));
        assignment.assign_version(&v, 0).unwrap();
        assert!(!le.evaluate(&assignment));
        assignment.assign_version(&v, 2).unwrap();
        assert!(le.evaluate(&assignment));
        assert!(Constraint::Boolean(v).evaluate(&assignment));
    }
}

// ============================================================================
// Restriction Tests
// ============================================================================

mod restrict_tests {
    use super::*;

    #[test]
    fn test_restrict_is_value_preserving() {
        let features = [a(), b(), c()];
        for constraint in sample_constraints() {
            for partial in boolean_assignments(&features[..1]) {
                let restricted = constraint.restrict(&partial);
                for rest in boolean_assignments(&features[1..]) {
                    let full = partial.extended_by(&rest);
                    assert_eq!(
                        restricted.evaluate(&full),
                        constraint.evaluate(&full),
                        "{} restricted to {}",
                        constraint,
                        restricted
                    );
                }
            }
        }
    }

    #[test]
    fn test_restrict_empty_assignment_is_identity_for_folded() {
        let c = Constraint::implication(atom(a()), atom(b()));
        assert_eq!(c.restrict(&FeatureAssignment::new()), c);
    }

    #[test]
    fn test_implication_false_antecedent() {
        let mut assignment = FeatureAssignment::new();
        assignment.assign(&a(), false).unwrap();
        let c = Constraint::implication(atom(a()), atom(b()));
        assert_eq!(c.restrict(&assignment), Constraint::TRUE);
    }

    #[test]
    fn test_equivalence_equal_sides() {
        let mut assignment = FeatureAssignment::new();
        assignment.assign(&c(), true).unwrap();
        let c = Constraint::equivalence(
            Constraint::and([atom(a()), atom(c())]),
            atom(a()),
        );
        assert_eq!(c.restrict(&assignment), Constraint::TRUE);
    }

    #[test]
    fn test_amo_with_one_true() {
        let mut assignment = FeatureAssignment::new();
        assignment.assign(&a(), true).unwrap();
        let restricted = Constraint::amo([a(), b(), c()]).restrict(&assignment);
        assert_eq!(restricted, Constraint::and([atom(b()).not(), atom(c()).not()]));
    }

    #[test]
    fn test_exo_with_single_unassigned() {
        let mut assignment = FeatureAssignment::new();
        assignment.assign(&a(), false).unwrap();
        assignment.assign(&b(), false).unwrap();
        let restricted = Constraint::exo([a(), b(), c()]).restrict(&assignment);
        assert_eq!(restricted, atom(c()));
    }

    #[test]
    fn test_int_restrict_folds() {
        let x = IntFeature::new("x");
        let y = IntFeature::new("y");
        let c = Constraint::int_comparison(
            IntTerm::sum([IntTerm::Feature(x.clone()), IntTerm::Feature(y.clone())]).unwrap(),
            5,
            ComparisonOperator::Eq,
        );
        let partial = FeatureAssignment::new().with_int(&x, 2);
        let expected = Constraint::IntComparison {
            left: IntTerm::Sum(IntSum {
                operands: vec![IntMul::new(1, y.clone())],
                offset: 2,
            }),
            right: IntTerm::Value(5),
            op: ComparisonOperator::Eq,
        };
        assert_eq!(c.restrict(&partial), expected);
        assert_eq!(expected.to_string(), "[y + 2 = 5]");
        let full = partial.with_int(&y, 3);
        assert_eq!(c.restrict(&full), Constraint::TRUE);
    }

    #[test]
    fn test_int_restrict_keeps_overflowing_products() {
        let x = IntFeature::new("x");
        let c = Constraint::int_comparison(IntTerm::mul(4, x.clone()), 0, ComparisonOperator::Gt);
        let full = FeatureAssignment::new().with_int(&x, 1 << 30);
        let restricted = c.restrict(&full);
        assert_eq!(restricted, c);
        assert!(restricted.evaluate(&full));

        let fits = FeatureAssignment::new().with_int(&x, 1 << 28);
        assert_eq!(c.restrict(&fits), Constraint::TRUE);
    }

    #[test]
    fn test_int_restrict_keeps_overflowing_offsets() {
        let x = IntFeature::new("x");
        let y = IntFeature::new("y");
        let sum = IntTerm::sum([
            IntTerm::Feature(x.clone()),
            IntTerm::Feature(y.clone()),
            IntTerm::Value(i32::MAX),
        ])
        .unwrap();
        let c = Constraint::int_comparison(sum, 0, ComparisonOperator::Gt);
        let partial = FeatureAssignment::new().with_int(&x, 1);
        let restricted = c.restrict(&partial);
        assert_eq!(
            restricted.to_string(),
            format!("[x + y + {} > 0]", i32::MAX)
        );
        for value in [i32::MIN, -1, 0, i32::MAX] {
            let full = partial.clone().with_int(&y, value);
            assert_eq!(restricted.evaluate(&full), c.evaluate(&full), "y = {}", value);
        }
    }

    #[test]
    fn test_version_restrict() {
        let v = BooleanFeature::versioned("v");
        let c = Constraint::version(v.clone(), ComparisonOperator::Ge, 2);
        let mut assignment = FeatureAssignment::new();
        assignment.assign_version(&v, 1).unwrap();
        assert_eq!(c.restrict(&assignment), Constraint::FALSE);
        assignment.assign_version(&v, 3).unwrap();
        assert_eq!(c.restrict(&assignment), Constraint::TRUE);
        assert_eq!(c.restrict(&FeatureAssignment::new()), c);
    }
}

// ============================================================================
// Simplification Tests
// ============================================================================

mod simplify_tests {
    use super::*;

    #[test]
    fn test_idempotent() {
        let mut constraints = sample_constraints();
        constraints.push(Constraint::implication(Constraint::TRUE, atom(a())));
        constraints.push(Constraint::equivalence(atom(b()), Constraint::FALSE));
        constraints.push(Constraint::enum_in(EnumFeature::new("e"), Vec::<String>::new()));
        for c in constraints {
            let once = c.syntactic_simplify();
            assert_eq!(once.syntactic_simplify(), once, "{}", c);
        }
    }

    #[test]
    fn test_empty_ranges_are_false() {
        let x = IntFeature::new("x");
        assert_eq!(
            Constraint::int_in(x, IntRange::empty()).syntactic_simplify(),
            Constraint::FALSE
        );
        assert_eq!(
            Constraint::enum_in(EnumFeature::new("e"), Vec::<String>::new()).syntactic_simplify(),
            Constraint::FALSE
        );
    }

    #[test]
    fn test_version_below_one_is_false() {
        let v = BooleanFeature::versioned("v");
        assert_eq!(
            Constraint::version(v.clone(), ComparisonOperator::Lt, 1).syntactic_simplify(),
            Constraint::FALSE
        );
        let ge = Constraint::version(v, ComparisonOperator::Ge, 1);
        assert_eq!(ge.syntactic_simplify(), ge);
    }

    #[test]
    fn test_nested_constants() {
        let c = Constraint::or([
            Constraint::and([atom(a()), Constraint::implication(Constraint::FALSE, atom(b()))]),
            Constraint::TRUE.not(),
        ]);
        assert_eq!(c.syntactic_simplify(), atom(a()));
    }
}

// ============================================================================
// Feature Extraction And Renaming Tests
// ============================================================================

mod feature_tests {
    use super::*;

    #[test]
    fn test_feature_extraction() {
        let color = EnumFeature::new("color");
        let x = IntFeature::new("x");
        let v = BooleanFeature::versioned("v");
        let c = Constraint::and([
            atom(a()),
            Constraint::enum_in(color.clone(), ["red", "blue"]),
            Constraint::enum_eq(color.clone(), "green"),
            Constraint::int_comparison(IntTerm::mul(3, x.clone()), 4, ComparisonOperator::Gt),
            Constraint::version(v.clone(), ComparisonOperator::Eq, 2),
        ]);

        assert_eq!(c.features().len(), 4);
        assert_eq!(c.boolean_features(), BTreeSet::from([a()]));
        assert_eq!(c.enum_features(), BTreeSet::from([color.clone()]));
        assert_eq!(c.int_features(), BTreeSet::from([x]));
        assert_eq!(c.enum_values()[&color].len(), 3);
        assert!(c.contains_versioned());
        assert!(!atom(a()).contains_versioned());
        assert_eq!(c.predicates().len(), 4);
    }

    #[test]
    fn test_rename() {
        let color = EnumFeature::new("color");
        let renaming = FeatureRenaming::new()
            .boolean("a", "x")
            .enumeration("color", "colour")
            .enum_value("color", "red", "rot");
        let c = Constraint::or([atom(a()), Constraint::enum_eq(color, "red")]);
        let renamed = c.rename(&renaming);
        assert_eq!(renamed.to_string(), "x / [colour = \"rot\"]");
        assert_eq!(renamed.rename(&renaming.revert()), c);
    }

    #[test]
    fn test_rename_collapses_amo() {
        let renaming = FeatureRenaming::new().boolean("b", "a");
        assert_eq!(Constraint::amo([a(), b()]).rename(&renaming), Constraint::TRUE);
    }
}

// ============================================================================
// Display Tests
// ============================================================================

mod display_tests {
    use super::*;

    #[test]
    fn test_display_precedence() {
        let c = Constraint::implication(
            Constraint::and([atom(a()), Constraint::or([atom(b()), atom(c())])]),
            atom(a()).not(),
        );
        assert_eq!(c.to_string(), "a & (b / c) => -a");
        let c = Constraint::Not(Box::new(Constraint::and([atom(a()), atom(b())])));
        assert_eq!(c.to_string(), "-(a & b)");
    }

    #[test]
    fn test_display_predicates() {
        let x = IntFeature::new("x");
        assert_eq!(
            Constraint::int_in(x.clone(), IntRange::interval(1, 5)).to_string(),
            "[x in [1 - 5]]"
        );
        assert_eq!(
            Constraint::enum_in(EnumFeature::new("e"), ["b", "a"]).to_string(),
            "[e in [\"a\", \"b\"]]"
        );
        assert_eq!(
            Constraint::version(BooleanFeature::versioned("v"), ComparisonOperator::Ge, 2)
                .to_string(),
            "[v >= 2]"
        );
        assert_eq!(Constraint::exo([a(), b()]).to_string(), "exo[a, b]");
    }
}
