//! Decision compiler.
//!
//! Reduces a queue of branches to a [`Decision`] tree. A branch is a stack
//! of pending matches plus what to do once they all succeed: select a case,
//! or resume an earlier queue (the continuation of a `Not` probe).
//!
//! Each step pops the head branch's next match and dispatches on it:
//!
//! - structural patterns (`And`, `Or`, `Not`, `App`, `Bind`, `Wildcard`)
//!   rewrite the queue without emitting a test;
//! - `Literal`, `Predicate`, `Guard` and the synthetic membership and
//!   sameness matches emit a test whose `then` side continues the head
//!   branch and whose `otherwise` side falls through to the rest.
//!
//! Termination: every step either removes a match or replaces one with
//! strictly smaller patterns, and tests always drop the head match.

mod split;

use std::collections::VecDeque;

use casec_ir::{Equivalence, Literal, Name, Pattern};
use casec_stack::ensure_sufficient_stack;

use crate::decision::{Decision, Test};
use crate::env::{BindingEnv, Extension};
use crate::names::NameSupply;
use crate::placeholder::PlaceholderTable;
use crate::{Emitter, MatchError, MatchOptions};

/// One pending check on a branch.
#[derive(Clone, Debug)]
pub(crate) enum Match<'p, X> {
    /// Match `pattern` against `subject`.
    Pattern {
        subject: Name,
        pattern: &'p Pattern<X>,
    },
    /// `subject` must be one of `set`; produced by folding an `Or`.
    Member {
        subject: Name,
        set: Vec<&'p Literal>,
        eqv: Equivalence,
    },
    /// `subject` must hold the same value as `other`; produced by a
    /// repeated pattern variable.
    SameAs { subject: Name, other: Name },
}

/// What happens when a branch's pending matches are exhausted.
#[derive(Clone, Debug)]
pub(crate) enum Target<'p, X> {
    /// The case with this index matched.
    Case(usize),
    /// A `Not` probe matched, so the negated branch fails: continue with
    /// the branches that followed it.
    Resume(Queue<'p, X>),
}

#[derive(Clone, Debug)]
pub(crate) struct Branch<'p, X> {
    /// Pending matches; the last element is checked next.
    pending: Vec<Match<'p, X>>,
    env: BindingEnv,
    target: Target<'p, X>,
    /// Case this branch was derived from, for error attribution.
    origin: usize,
}

pub(crate) type Queue<'p, X> = VecDeque<Branch<'p, X>>;

type Step<'p, X> = Result<Decision<'p, X>, MatchError<X>>;

/// Result of compiling a whole case list.
pub(crate) struct Output<'p, X> {
    pub(crate) decision: Decision<'p, X>,
    pub(crate) placeholders: PlaceholderTable,
    pub(crate) projections: usize,
}

pub(crate) struct DecisionCompiler<'a, 'p, E: Emitter> {
    emitter: &'a E,
    names: &'a NameSupply<'a>,
    options: &'a MatchOptions,
    patterns: &'p [Pattern<E::Expr>],
    placeholders: PlaceholderTable,
    projections: usize,
}

impl<'a, 'p, E: Emitter> DecisionCompiler<'a, 'p, E> {
    pub(crate) fn new(
        emitter: &'a E,
        names: &'a NameSupply<'a>,
        options: &'a MatchOptions,
        patterns: &'p [Pattern<E::Expr>],
    ) -> Self {
        DecisionCompiler {
            emitter,
            names,
            options,
            patterns,
            placeholders: PlaceholderTable::new(patterns.len()),
            projections: 0,
        }
    }

    /// Compile every case against the subject held in `root`.
    pub(crate) fn run(mut self, root: Name) -> Result<Output<'p, E::Expr>, MatchError<E::Expr>> {
        let patterns: &'p [Pattern<E::Expr>] = self.patterns;
        let queue = patterns
            .iter()
            .enumerate()
            .map(|(case, pattern)| Branch {
                pending: vec![Match::Pattern {
                    subject: root,
                    pattern,
                }],
                env: BindingEnv::new(),
                target: Target::Case(case),
                origin: case,
            })
            .collect();

        let decision = self.compile_queue(queue)?;
        Ok(Output {
            decision,
            placeholders: self.placeholders,
            projections: self.projections,
        })
    }

    fn compile_queue(&mut self, mut queue: Queue<'p, E::Expr>) -> Step<'p, E::Expr> {
        ensure_sufficient_stack(|| {
            let Some(mut branch) = queue.pop_front() else {
                return Ok(Decision::Fail);
            };
            let Some(next) = branch.pending.pop() else {
                return self.reach(branch);
            };
            match next {
                Match::Pattern { subject, pattern } => {
                    self.dispatch(subject, pattern, branch, queue)
                }
                Match::Member { subject, set, eqv } => {
                    self.emit_test(Test::Member { subject, set, eqv }, branch, queue)
                }
                Match::SameAs { subject, other } => {
                    self.emit_test(Test::SameAs { subject, other }, branch, queue)
                }
            }
        })
    }

    /// The head branch has no pending matches left.
    fn reach(&mut self, branch: Branch<'p, E::Expr>) -> Step<'p, E::Expr> {
        match branch.target {
            Target::Case(case) => {
                let use_index = self.placeholders.reach(case, &branch.env);
                Ok(Decision::Leaf { case, use_index })
            }
            Target::Resume(rest) => self.compile_queue(rest),
        }
    }

    fn dispatch(
        &mut self,
        subject: Name,
        pattern: &'p Pattern<E::Expr>,
        mut branch: Branch<'p, E::Expr>,
        mut queue: Queue<'p, E::Expr>,
    ) -> Step<'p, E::Expr> {
        match pattern {
            Pattern::Wildcard => {
                queue.push_front(branch);
                self.compile_queue(queue)
            }
            Pattern::Bind(name) => {
                match branch.env.extend(*name, subject) {
                    Extension::Fresh(env) => branch.env = env,
                    // Bound to this very subject already: trivially the same value.
                    Extension::Existing(bound) if bound == subject => {}
                    Extension::Existing(bound) => {
                        // The sameness test reads the earlier binding.
                        branch.env = branch.env.mark_used(*name);
                        branch.pending.push(Match::SameAs {
                            subject,
                            other: bound,
                        });
                    }
                }
                queue.push_front(branch);
                self.compile_queue(queue)
            }
            Pattern::Literal(literal) => {
                let test = Test::Equal {
                    subject,
                    literal,
                    eqv: literal.equivalence(),
                };
                self.emit_test(test, branch, queue)
            }
            Pattern::Predicate(func) => {
                let bindings = self.visible(&mut branch.env, func);
                let test = Test::Predicate {
                    subject,
                    func,
                    bindings,
                };
                self.emit_test(test, branch, queue)
            }
            Pattern::Guard(expr) => {
                let bindings = self.visible(&mut branch.env, expr);
                self.emit_test(Test::Guard { expr, bindings }, branch, queue)
            }
            Pattern::App(func, inner) => self.project(subject, func, inner, branch, queue),
            Pattern::Not(inner) => {
                let probe = Branch {
                    pending: vec![Match::Pattern {
                        subject,
                        pattern: inner,
                    }],
                    env: branch.env.clone(),
                    target: Target::Resume(queue.clone()),
                    origin: branch.origin,
                };
                queue.push_front(branch);
                queue.push_front(probe);
                self.compile_queue(queue)
            }
            Pattern::And(items) => {
                for item in items.iter().rev() {
                    branch.pending.push(Match::Pattern {
                        subject,
                        pattern: item,
                    });
                }
                queue.push_front(branch);
                self.compile_queue(queue)
            }
            Pattern::Or(alternatives) => {
                if alternatives.is_empty() {
                    return Err(self.malformed(branch.origin, EMPTY_OR));
                }
                for alternative in self.fold_alternatives(subject, alternatives).into_iter().rev() {
                    let mut fanned = branch.clone();
                    fanned.pending.push(alternative);
                    queue.push_front(fanned);
                }
                self.compile_queue(queue)
            }
        }
    }

    /// Emit `test` for the head branch.
    fn emit_test(
        &mut self,
        test: Test<'p, E::Expr>,
        branch: Branch<'p, E::Expr>,
        queue: Queue<'p, E::Expr>,
    ) -> Step<'p, E::Expr> {
        tracing::trace!(?test, remaining = queue.len(), "emit test");
        let (mut then_queue, else_queue) = if self.options.split_branches {
            (
                split::refine(self.emitter, queue.clone(), &test, true),
                split::refine(self.emitter, queue, &test, false),
            )
        } else {
            (queue.clone(), queue)
        };
        then_queue.push_front(branch);

        let then = self.compile_queue(then_queue)?;
        let otherwise = self.compile_queue(else_queue)?;
        Ok(Decision::Test {
            test,
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        })
    }

    /// Match `inner` against `func` applied to `subject`.
    fn project(
        &mut self,
        subject: Name,
        func: &'p E::Expr,
        inner: &'p Pattern<E::Expr>,
        mut branch: Branch<'p, E::Expr>,
        mut queue: Queue<'p, E::Expr>,
    ) -> Step<'p, E::Expr> {
        let bindings = self.visible(&mut branch.env, func);
        let fresh = self.names.fresh("x");
        self.projections += 1;
        if self.options.split_branches && bindings.is_empty() {
            queue = split::share_projection(self.emitter, queue, subject, func, fresh);
        }

        branch.pending.push(Match::Pattern {
            subject: fresh,
            pattern: inner,
        });
        queue.push_front(branch);
        let body = self.compile_queue(queue)?;
        Ok(Decision::Project {
            fresh,
            func,
            subject,
            bindings,
            body: Box::new(body),
        })
    }

    /// Turn the alternatives of an `Or` into pending matches, folding every
    /// run of two or more plain literals into one membership test.
    fn fold_alternatives(
        &self,
        subject: Name,
        alternatives: &'p [Pattern<E::Expr>],
    ) -> Vec<Match<'p, E::Expr>> {
        if !self.options.fold_memberships {
            return alternatives
                .iter()
                .map(|pattern| Match::Pattern { subject, pattern })
                .collect();
        }

        let mut matches = Vec::with_capacity(alternatives.len());
        let mut index = 0;
        while index < alternatives.len() {
            let run: Vec<&'p Literal> = alternatives[index..]
                .iter()
                .map_while(Pattern::simplify_quoted)
                .collect();
            if run.len() >= 2 {
                index += run.len();
                let eqv = Equivalence::for_literals(run.iter().copied());
                tracing::trace!(literals = run.len(), ?eqv, "folded membership");
                matches.push(Match::Member {
                    subject,
                    set: run,
                    eqv,
                });
            } else {
                matches.push(Match::Pattern {
                    subject,
                    pattern: &alternatives[index],
                });
                index += 1;
            }
        }
        matches
    }

    /// Bindings of `env` that `expr` mentions, as `(variable, subject)`
    /// pairs. Marks them used.
    fn visible(&self, env: &mut BindingEnv, expr: &E::Expr) -> Vec<(Name, Name)> {
        let bindings: Vec<(Name, Name)> = env
            .iter()
            .filter(|b| self.emitter.mentions(expr, b.name))
            .map(|b| (b.name, b.subject))
            .collect();
        for (name, _) in &bindings {
            *env = env.mark_used(*name);
        }
        bindings
    }

    fn malformed(&self, case: usize, reason: &'static str) -> MatchError<E::Expr> {
        MatchError::MalformedPattern {
            case,
            pattern: self.patterns[case].clone(),
            reason,
        }
    }
}

const EMPTY_OR: &str = "disjunction with no alternatives";

/// Reject patterns the compiler cannot handle, whether or not the case is
/// reachable.
pub(crate) fn check_well_formed<X: Clone>(
    case: usize,
    pattern: &Pattern<X>,
) -> Result<(), MatchError<X>> {
    fn find<X>(pattern: &Pattern<X>) -> Option<&'static str> {
        ensure_sufficient_stack(|| match pattern {
            Pattern::Or(alternatives) if alternatives.is_empty() => Some(EMPTY_OR),
            Pattern::Or(items) | Pattern::And(items) => items.iter().find_map(find),
            Pattern::App(_, inner) | Pattern::Not(inner) => find(inner),
            Pattern::Wildcard
            | Pattern::Bind(_)
            | Pattern::Literal(_)
            | Pattern::Predicate(_)
            | Pattern::Guard(_) => None,
        })
    }

    match find(pattern) {
        Some(reason) => Err(MatchError::MalformedPattern {
            case,
            pattern: pattern.clone(),
            reason,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests;
