use casec_ir::{Equivalence, Literal, Pattern, StringInterner};
use pretty_assertions::assert_eq;

use super::*;
use crate::testing::{func, interner_with, lit, Node, TreeEmitter};

type Pat = Pattern<Node>;

fn run<'p>(
    interner: &StringInterner,
    patterns: &'p [Pat],
    options: &MatchOptions,
) -> Result<Output<'p, Node>, MatchError<Node>> {
    let names = NameSupply::new(interner);
    let root = names.fresh("val");
    DecisionCompiler::new(&TreeEmitter, &names, options, patterns).run(root)
}

fn compiled<'p>(interner: &StringInterner, patterns: &'p [Pat]) -> Output<'p, Node> {
    match run(interner, patterns, &MatchOptions::default()) {
        Ok(output) => output,
        Err(err) => panic!("unexpected compile error: {err}"),
    }
}

/// Every test in the tree, pre-order.
fn tests<'d, 'p>(decision: &'d Decision<'p, Node>) -> Vec<&'d Test<'p, Node>> {
    let mut out = Vec::new();
    let mut stack = vec![decision];
    while let Some(node) = stack.pop() {
        match node {
            Decision::Test {
                test,
                then,
                otherwise,
            } => {
                out.push(test);
                stack.push(otherwise);
                stack.push(then);
            }
            Decision::Project { body, .. } => stack.push(body),
            Decision::Fail | Decision::Leaf { .. } => {}
        }
    }
    out
}

fn projections(decision: &Decision<'_, Node>) -> usize {
    match decision {
        Decision::Fail | Decision::Leaf { .. } => 0,
        Decision::Test {
            then, otherwise, ..
        } => projections(then) + projections(otherwise),
        Decision::Project { body, .. } => 1 + projections(body),
    }
}

fn sym(interner: &StringInterner, s: &str) -> Pat {
    Pattern::Literal(Literal::Symbol(interner.intern(s)))
}

#[test]
fn test_empty_or_is_rejected_at_dispatch() {
    let interner = StringInterner::new();
    let patterns = vec![Pattern::Or(vec![])];

    let err = match run(&interner, &patterns, &MatchOptions::default()) {
        Ok(_) => panic!("empty disjunction compiled"),
        Err(err) => err,
    };
    assert_eq!(
        err,
        MatchError::MalformedPattern {
            case: 0,
            pattern: Pattern::Or(vec![]),
            reason: EMPTY_OR,
        }
    );
}

#[test]
fn test_check_well_formed_finds_nested_empty_or() {
    let pattern: Pat = Pattern::And(vec![
        Pattern::Wildcard,
        Pattern::not(Pattern::app(func("car"), Pattern::Or(vec![]))),
    ]);
    assert!(matches!(
        check_well_formed(3, &pattern),
        Err(MatchError::MalformedPattern { case: 3, .. })
    ));
    assert_eq!(check_well_formed(0, &lit(1)), Ok(()));
}

#[test]
fn test_wildcard_claims_every_path() {
    let interner = StringInterner::new();
    let patterns = vec![Pattern::Wildcard, lit(5)];
    let output = compiled(&interner, &patterns);

    assert_eq!(
        output.decision,
        Decision::Leaf {
            case: 0,
            use_index: 0
        }
    );
    assert!(output.placeholders.is_reached(0));
    assert!(!output.placeholders.is_reached(1));
}

#[test]
fn test_literal_or_folds_into_one_membership() {
    let interner = StringInterner::new();
    let patterns = vec![Pattern::Or(vec![lit(1), lit(2), lit(3)])];
    let output = compiled(&interner, &patterns);

    let Decision::Test {
        test,
        then,
        otherwise,
    } = &output.decision
    else {
        panic!("expected a test, got {:?}", output.decision);
    };
    let Test::Member { set, eqv, .. } = test else {
        panic!("expected a membership test, got {test:?}");
    };
    assert_eq!(set.len(), 3);
    assert_eq!(*eqv, Equivalence::NumericIdentity);
    assert_eq!(
        **then,
        Decision::Leaf {
            case: 0,
            use_index: 0
        }
    );
    assert_eq!(**otherwise, Decision::Fail);
}

#[test]
fn test_unfolded_or_tests_each_literal() {
    let interner = StringInterner::new();
    let patterns = vec![Pattern::Or(vec![lit(1), lit(2), lit(3)])];
    let options = MatchOptions::default().with_fold_memberships(false);
    let Ok(output) = run(&interner, &patterns, &options) else {
        panic!("compile failed");
    };

    let found = tests(&output.decision);
    assert_eq!(found.len(), 3);
    assert!(found.iter().all(|t| matches!(t, Test::Equal { .. })));
}

#[test]
fn test_only_literal_runs_fold() {
    let interner = StringInterner::new();
    let patterns = vec![Pattern::Or(vec![
        lit(1),
        lit(2),
        Pattern::Guard(func("g")),
        sym(&interner, "a"),
        sym(&interner, "b"),
    ])];
    let output = compiled(&interner, &patterns);

    let members: Vec<(usize, Equivalence)> = tests(&output.decision)
        .into_iter()
        .filter_map(|t| match t {
            Test::Member { set, eqv, .. } => Some((set.len(), *eqv)),
            _ => None,
        })
        .collect();
    assert_eq!(
        members,
        vec![(2, Equivalence::NumericIdentity), (2, Equivalence::Identity)]
    );
}

#[test]
fn test_mixed_kinds_widen_to_structural() {
    let interner = StringInterner::new();
    let patterns = vec![Pattern::Or(vec![
        lit(1),
        Pattern::Literal(Literal::string("one")),
        sym(&interner, "uno"),
    ])];
    let output = compiled(&interner, &patterns);

    assert!(matches!(
        tests(&output.decision).as_slice(),
        [Test::Member {
            eqv: Equivalence::Structural,
            ..
        }]
    ));
}

#[test]
fn test_repeated_variable_becomes_sameness_test() {
    let (interner, names) = interner_with(&["x"]);
    let x = names[0];
    let patterns = vec![Pattern::And(vec![
        Pattern::app(func("car"), Pattern::Bind(x)),
        Pattern::app(func("cdr"), Pattern::Bind(x)),
    ])];
    let output = compiled(&interner, &patterns);

    let found = tests(&output.decision);
    assert_eq!(found.len(), 1);
    assert!(matches!(found[0], Test::SameAs { .. }));
    assert_eq!(projections(&output.decision), 2);
}

#[test]
fn test_rebinding_the_same_subject_is_free() {
    let (interner, names) = interner_with(&["x"]);
    let patterns = vec![Pattern::And(vec![
        Pattern::Bind(names[0]),
        Pattern::Bind(names[0]),
    ])];
    let output = compiled(&interner, &patterns);

    assert!(tests(&output.decision).is_empty());
    assert!(matches!(output.decision, Decision::Leaf { case: 0, .. }));
}

#[test]
fn test_not_swaps_continuations() {
    let (interner, names) = interner_with(&["x"]);
    let patterns = vec![Pattern::And(vec![
        Pattern::Bind(names[0]),
        Pattern::not(lit(0)),
    ])];
    let output = compiled(&interner, &patterns);

    let Decision::Test {
        test: Test::Equal { literal, .. },
        then,
        otherwise,
    } = &output.decision
    else {
        panic!("expected an equality test, got {:?}", output.decision);
    };
    assert_eq!(**literal, Literal::Int(0));
    assert_eq!(**then, Decision::Fail);
    assert!(matches!(**otherwise, Decision::Leaf { case: 0, .. }));
}

#[test]
fn test_splitting_keeps_literal_cases_linear() {
    let interner = StringInterner::new();
    let patterns = vec![
        Pattern::And(vec![lit(1), Pattern::Guard(func("g"))]),
        lit(2),
        lit(1),
    ];

    let split = compiled(&interner, &patterns);
    assert_eq!(split.decision.test_count(), 3);

    let Ok(unsplit) = run(&interner, &patterns, &MatchOptions::unoptimized()) else {
        panic!("compile failed");
    };
    assert_eq!(unsplit.decision.test_count(), 6);
}

#[test]
fn test_identical_pure_predicates_are_tested_once() {
    let interner = StringInterner::new();
    let patterns = vec![
        Pattern::And(vec![Pattern::Predicate(func("consp")), Pattern::Guard(func("g"))]),
        Pattern::And(vec![Pattern::Predicate(func("consp")), Pattern::Guard(func("h"))]),
        Pattern::Wildcard,
    ];
    let output = compiled(&interner, &patterns);

    let predicates = tests(&output.decision)
        .into_iter()
        .filter(|t| matches!(t, Test::Predicate { .. }))
        .count();
    assert_eq!(predicates, 1);
    assert_eq!(output.decision.test_count(), 3);
}

#[test]
fn test_predicates_reading_variables_are_not_shared() {
    let (interner, names) = interner_with(&["x"]);
    let x = names[0];
    let pattern = Pattern::And(vec![
        Pattern::Bind(x),
        Pattern::Predicate(Node::Func("p", vec![x])),
    ]);
    let patterns = vec![pattern.clone(), pattern];
    let output = compiled(&interner, &patterns);

    let predicates: Vec<_> = tests(&output.decision)
        .into_iter()
        .filter_map(|t| match t {
            Test::Predicate { bindings, .. } => Some(bindings.len()),
            _ => None,
        })
        .collect();
    assert_eq!(predicates, vec![1, 1]);
}

#[test]
fn test_projection_is_shared_between_cases() {
    let interner = StringInterner::new();
    let patterns = vec![
        Pattern::app(func("car"), lit(1)),
        Pattern::And(vec![
            Pattern::Guard(func("g")),
            Pattern::app(func("car"), lit(2)),
        ]),
    ];

    let shared = compiled(&interner, &patterns);
    assert_eq!(projections(&shared.decision), 1);
    assert_eq!(shared.projections, 1);

    let Ok(unshared) = run(&interner, &patterns, &MatchOptions::unoptimized()) else {
        panic!("compile failed");
    };
    assert_eq!(projections(&unshared.decision), 2);
}

#[test]
fn test_deep_nesting_terminates() {
    let interner = StringInterner::new();
    let mut pattern = lit(0);
    for depth in 0..50_i64 {
        pattern = match depth % 3 {
            0 => Pattern::And(vec![Pattern::Wildcard, pattern]),
            1 => Pattern::Or(vec![pattern, lit(depth)]),
            _ => Pattern::app(func("identity"), pattern),
        };
    }

    let patterns = vec![pattern, Pattern::Wildcard];
    let output = compiled(&interner, &patterns);
    assert!(output.placeholders.is_reached(0));
    assert!(output.placeholders.is_reached(1));
}

#[test]
fn test_undecided_tests_duplicate_the_remaining_cases() {
    let interner = StringInterner::new();
    let predicate = |n: u32| Pattern::Predicate(Node::Func("eql", vec![Name::from_raw(n)]));
    for n in 1..=6_u32 {
        let patterns: Vec<Pat> = (0..n)
            .map(|i| Pattern::And(vec![predicate(100 + i), predicate(1_000 + i)]))
            .collect();
        let output = compiled(&interner, &patterns);
        assert_eq!(output.decision.test_count(), (1 << (n + 1)) - 2, "{n} cases");
        assert_eq!(output.placeholders.total_uses(), n as usize);
    }
}
