use casec_ir::{Literal, Pattern, StringInterner};
use pretty_assertions::assert_eq;

use super::*;

fn first(
    interner: &StringInterner,
    patterns: &[Pattern<Form>],
    value: &Value,
) -> Option<(usize, Bindings)> {
    let emitter = SexpEmitter::new(interner);
    let evaluator = Evaluator::new(interner);
    match NaiveMatcher::new(&emitter, &evaluator).first_match(patterns, value) {
        Ok(found) => found,
        Err(err) => panic!("matching failed: {err}"),
    }
}

fn func(interner: &StringInterner, name: &str) -> Form {
    Form::Function(interner.intern(name))
}

#[test]
fn test_cases_are_tried_in_order() {
    let interner = StringInterner::new();
    let patterns = vec![
        Pattern::Literal(Literal::Int(1)),
        Pattern::Predicate(func(&interner, "integerp")),
        Pattern::Wildcard,
    ];
    assert_eq!(first(&interner, &patterns, &Value::Int(1)), Some((0, vec![])));
    assert_eq!(first(&interner, &patterns, &Value::Int(2)), Some((1, vec![])));
    assert_eq!(first(&interner, &patterns, &Value::nil()), Some((2, vec![])));
    assert_eq!(first(&interner, &patterns[..2], &Value::nil()), None);
}

#[test]
fn test_repeated_variable_compares() {
    let interner = StringInterner::new();
    let x = interner.intern("x");
    let pattern = Pattern::And(vec![
        Pattern::app(func(&interner, "car"), Pattern::Bind(x)),
        Pattern::app(func(&interner, "cdr"), Pattern::Bind(x)),
    ]);
    let patterns = vec![pattern];

    let same = Value::cons(Value::Int(1), Value::Int(1));
    assert_eq!(
        first(&interner, &patterns, &same),
        Some((0, vec![(x, Value::Int(1))]))
    );
    let different = Value::cons(Value::Int(1), Value::Int(2));
    assert_eq!(first(&interner, &patterns, &different), None);
}

#[test]
fn test_or_backtracks_into_later_alternatives() {
    let interner = StringInterner::new();
    let x = interner.intern("x");
    // (and (or (app car x) (app cdr x)) (guard (integerp x)))
    let pattern = Pattern::And(vec![
        Pattern::Or(vec![
            Pattern::app(func(&interner, "car"), Pattern::Bind(x)),
            Pattern::app(func(&interner, "cdr"), Pattern::Bind(x)),
        ]),
        Pattern::Guard(Form::call(interner.intern("integerp"), vec![Form::Var(x)])),
    ]);
    let value = Value::cons(Value::string("no"), Value::Int(7));
    assert_eq!(
        first(&interner, &[pattern], &value),
        Some((0, vec![(x, Value::Int(7))]))
    );
}

#[test]
fn test_not_discards_bindings() {
    let interner = StringInterner::new();
    let x = interner.intern("x");
    let y = interner.intern("y");
    let pattern = Pattern::And(vec![
        Pattern::Bind(x),
        Pattern::not(Pattern::And(vec![Pattern::Bind(y), Pattern::Literal(Literal::Int(0))])),
    ]);
    let patterns = vec![pattern];
    assert_eq!(first(&interner, &patterns, &Value::Int(0)), None);
    assert_eq!(
        first(&interner, &patterns, &Value::Int(7)),
        Some((0, vec![(x, Value::Int(7))]))
    );
}

#[test]
fn test_errors_propagate() {
    let interner = StringInterner::new();
    let emitter = SexpEmitter::new(&interner);
    let evaluator = Evaluator::new(&interner);
    let patterns = vec![Pattern::app(func(&interner, "car"), Pattern::Wildcard)];
    let result = NaiveMatcher::new(&emitter, &evaluator).first_match(&patterns, &Value::Int(3));
    assert!(matches!(result, Err(EvalError::WrongType { func: "car", .. })));
}
