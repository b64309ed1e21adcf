//! Backtracking matcher used as a reference for compiled match code.
//!
//! Interprets patterns directly against a runtime value: cases in order,
//! conjuncts left to right, alternatives depth first, retrying the next
//! alternative whenever the rest of the case fails. No sharing, no
//! splitting, no folding. Compiled code must agree with it on which case
//! fires and what the case's variables hold.

use casec_ir::{Name, Pattern};

use crate::{EvalError, Evaluator, Form, SexpEmitter, Value};

/// Variables bound by a successful match, in binding order.
pub type Bindings = Vec<(Name, Value)>;

/// Continuation run with the bindings of a successful partial match.
/// Returns whether the rest of the match succeeded.
type Continue<'k> = dyn FnMut(&Bindings) -> Result<bool, EvalError> + 'k;

pub struct NaiveMatcher<'a, 'i> {
    emitter: &'a SexpEmitter,
    evaluator: &'a Evaluator<'i>,
}

impl<'a, 'i> NaiveMatcher<'a, 'i> {
    /// `emitter` decides how functions in patterns are applied, so the
    /// matcher calls them exactly as compiled code does.
    pub fn new(emitter: &'a SexpEmitter, evaluator: &'a Evaluator<'i>) -> Self {
        NaiveMatcher { emitter, evaluator }
    }

    /// The first case whose pattern matches `value`, with its bindings.
    pub fn first_match(
        &self,
        patterns: &[Pattern<Form>],
        value: &Value,
    ) -> Result<Option<(usize, Bindings)>, EvalError> {
        for (case, pattern) in patterns.iter().enumerate() {
            let mut found = None;
            let matched = self.matches(pattern, value, &Bindings::new(), &mut |env| {
                found = Some(env.clone());
                Ok(true)
            })?;
            if matched {
                return Ok(found.map(|env| (case, env)));
            }
        }
        Ok(None)
    }

    fn matches(
        &self,
        pattern: &Pattern<Form>,
        value: &Value,
        env: &Bindings,
        k: &mut Continue<'_>,
    ) -> Result<bool, EvalError> {
        match pattern {
            Pattern::Wildcard => k(env),
            Pattern::Bind(name) => match env.iter().find(|(var, _)| var == name) {
                Some((_, bound)) if bound.is_eql(value) => k(env),
                Some(_) => Ok(false),
                None => {
                    let mut extended = env.clone();
                    extended.push((*name, value.clone()));
                    k(&extended)
                }
            },
            Pattern::Literal(literal) => {
                if value.equiv(&Value::from_literal(literal), literal.equivalence()) {
                    k(env)
                } else {
                    Ok(false)
                }
            }
            Pattern::Predicate(func) => {
                if self.apply(func, value, env)?.is_truthy() {
                    k(env)
                } else {
                    Ok(false)
                }
            }
            Pattern::Guard(expr) => {
                if self.evaluator.eval_with(expr, env)?.is_truthy() {
                    k(env)
                } else {
                    Ok(false)
                }
            }
            Pattern::App(func, inner) => {
                let projected = self.apply(func, value, env)?;
                self.matches(inner, &projected, env, k)
            }
            Pattern::Not(inner) => {
                if self.matches(inner, value, env, &mut |_| Ok(true))? {
                    Ok(false)
                } else {
                    k(env)
                }
            }
            Pattern::And(items) => self.matches_all(items, value, env, k),
            Pattern::Or(alternatives) => {
                for alternative in alternatives {
                    if self.matches(alternative, value, env, k)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }

    fn matches_all(
        &self,
        items: &[Pattern<Form>],
        value: &Value,
        env: &Bindings,
        k: &mut Continue<'_>,
    ) -> Result<bool, EvalError> {
        match items.split_first() {
            None => k(env),
            Some((first, rest)) => self.matches(first, value, env, &mut |env| {
                self.matches_all(rest, value, env, k)
            }),
        }
    }

    fn apply(&self, func: &Form, value: &Value, env: &Bindings) -> Result<Value, EvalError> {
        let call = self
            .emitter
            .application(func, Form::Quote(value.clone()));
        self.evaluator.eval_with(&call, env)
    }
}

#[cfg(test)]
mod tests;
