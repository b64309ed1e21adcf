//! Branch splitting.
//!
//! Once a test has been emitted, its outcome is known on each side of the
//! conditional. The branches carried into either side are simplified with
//! that knowledge: a pending match the outcome decides is dropped when it
//! is known to succeed, and the whole branch is dropped when it is known to
//! fail. This keeps "one literal per case" lists linear instead of
//! re-testing the subject once per remaining case.
//!
//! Literal knowledge follows [`Literal::equiv`]. Predicates are decided only
//! when the same function is applied to the same subject and neither
//! application can see a pattern variable. Guards are never decided.

use casec_ir::{Equivalence, Literal, Name, Pattern};
use casec_stack::ensure_sufficient_stack;

use super::{Branch, Match, Queue};
use crate::decision::Test;
use crate::Emitter;

/// What a test outcome establishes.
enum Fact<'t, 'p, X> {
    /// The subject is (or is not) one of `set` under `eqv`.
    Member {
        subject: Name,
        set: &'t [&'p Literal],
        eqv: Equivalence,
    },
    SameAs {
        subject: Name,
        other: Name,
    },
    Predicate {
        subject: Name,
        func: &'p X,
    },
}

impl<'t, 'p, X> Fact<'t, 'p, X> {
    fn from_test(test: &'t Test<'p, X>) -> Option<Self> {
        match test {
            Test::Equal {
                subject,
                literal,
                eqv,
            } => Some(Fact::Member {
                subject: *subject,
                set: std::slice::from_ref(literal),
                eqv: *eqv,
            }),
            Test::Member { subject, set, eqv } => Some(Fact::Member {
                subject: *subject,
                set,
                eqv: *eqv,
            }),
            Test::SameAs { subject, other } => Some(Fact::SameAs {
                subject: *subject,
                other: *other,
            }),
            Test::Predicate {
                subject,
                func,
                bindings,
            } if bindings.is_empty() => Some(Fact::Predicate {
                subject: *subject,
                func: *func,
            }),
            Test::Predicate { .. } | Test::Guard { .. } => None,
        }
    }

    /// Subject whose patterns the fact can decide.
    fn subject(&self) -> Option<Name> {
        match self {
            Fact::Member { subject, .. } | Fact::Predicate { subject, .. } => Some(*subject),
            Fact::SameAs { .. } => None,
        }
    }
}

/// Simplify `queue` knowing that `test` evaluated to `outcome`.
pub(super) fn refine<'p, E: Emitter>(
    emitter: &E,
    queue: Queue<'p, E::Expr>,
    test: &Test<'p, E::Expr>,
    outcome: bool,
) -> Queue<'p, E::Expr> {
    let Some(fact) = Fact::from_test(test) else {
        return queue;
    };
    let refiner = Refiner {
        emitter,
        fact,
        holds: outcome,
    };

    let before = queue.len();
    let refined: Queue<'p, E::Expr> = queue
        .into_iter()
        .filter_map(|branch| refiner.branch(branch))
        .collect();
    if refined.len() < before {
        tracing::trace!(outcome, dropped = before - refined.len(), "split branches");
    }
    refined
}

struct Refiner<'t, 'p, E: Emitter> {
    emitter: &'t E,
    fact: Fact<'t, 'p, E::Expr>,
    holds: bool,
}

impl<'p, E: Emitter> Refiner<'_, 'p, E> {
    /// `None` if the branch is known to fail.
    fn branch(&self, mut branch: Branch<'p, E::Expr>) -> Option<Branch<'p, E::Expr>> {
        let mut independent = None;
        let mut kept = Vec::with_capacity(branch.pending.len());
        for pending in &branch.pending {
            if !self.refine_into(pending, &branch, &mut independent, &mut kept) {
                return None;
            }
        }
        branch.pending = kept;
        Some(branch)
    }

    /// Push what is left of `pending` onto `out`. Returns `false` if the
    /// match is known to fail.
    fn refine_into(
        &self,
        pending: &Match<'p, E::Expr>,
        branch: &Branch<'p, E::Expr>,
        independent: &mut Option<bool>,
        out: &mut Vec<Match<'p, E::Expr>>,
    ) -> bool {
        if let Some(outcome) = self.decide(pending, branch, independent) {
            return outcome;
        }
        if let Match::Pattern { subject, pattern } = *pending {
            if let Pattern::And(items) = pattern {
                if Some(subject) == self.fact.subject() {
                    // Splice the conjunction so its decided conjuncts can go.
                    return items.iter().rev().all(|item| {
                        let conjunct = Match::Pattern {
                            subject,
                            pattern: item,
                        };
                        self.refine_into(&conjunct, branch, independent, out)
                    });
                }
            }
        }
        out.push(pending.clone());
        true
    }

    fn decide(
        &self,
        pending: &Match<'p, E::Expr>,
        branch: &Branch<'p, E::Expr>,
        independent: &mut Option<bool>,
    ) -> Option<bool> {
        match (pending, &self.fact) {
            (Match::Pattern { subject, pattern }, _) if Some(*subject) == self.fact.subject() => {
                self.decide_pattern(pattern, branch, independent)
            }
            (
                Match::Member { subject, set, eqv },
                Fact::Member {
                    subject: known,
                    set: known_set,
                    eqv: known_eqv,
                },
            ) if subject == known => set_outcome(known_set, *known_eqv, self.holds, set, *eqv),
            (Match::SameAs { subject, other }, Fact::SameAs { subject: a, other: b })
                if (subject == a && other == b) || (subject == b && other == a) =>
            {
                Some(self.holds)
            }
            _ => None,
        }
    }

    fn decide_pattern(
        &self,
        pattern: &Pattern<E::Expr>,
        branch: &Branch<'p, E::Expr>,
        independent: &mut Option<bool>,
    ) -> Option<bool> {
        ensure_sufficient_stack(|| match pattern {
            Pattern::Literal(literal) => match &self.fact {
                Fact::Member { set, eqv, .. } => set_outcome(
                    set,
                    *eqv,
                    self.holds,
                    std::slice::from_ref(&literal),
                    literal.equivalence(),
                ),
                Fact::SameAs { .. } | Fact::Predicate { .. } => None,
            },
            Pattern::Predicate(func) => match &self.fact {
                Fact::Predicate { func: known, .. } if *known == func => {
                    let independent = *independent
                        .get_or_insert_with(|| is_independent(self.emitter, func, branch));
                    independent.then_some(self.holds)
                }
                _ => None,
            },
            // Bindings made under `Not` never escape, so a decided `Not` can go.
            Pattern::Not(inner) => self
                .decide_pattern(inner, branch, independent)
                .map(|matched| !matched),
            Pattern::And(items) => {
                let mut all_hold = true;
                for item in items {
                    match self.decide_pattern(item, branch, independent) {
                        Some(false) => return Some(false),
                        Some(true) => {}
                        None => all_hold = false,
                    }
                }
                all_hold.then_some(true)
            }
            Pattern::Or(alternatives) if !alternatives.is_empty() => alternatives
                .iter()
                .all(|alt| self.decide_pattern(alt, branch, independent) == Some(false))
                .then_some(false),
            Pattern::Or(_)
            | Pattern::Wildcard
            | Pattern::Bind(_)
            | Pattern::Guard(_)
            | Pattern::App(..) => None,
        })
    }
}

/// Decide `v ~asked_eqv t` for some `t` in `asked`, given that
/// `v ~eqv m` for some `m` in `known` does (or, when `!holds`, does not)
/// hold.
fn set_outcome(
    known: &[&Literal],
    eqv: Equivalence,
    holds: bool,
    asked: &[&Literal],
    asked_eqv: Equivalence,
) -> Option<bool> {
    if holds {
        // `v` is structurally equal to some `m`; it cannot equal a `t` no `m` resembles.
        let disjoint = known
            .iter()
            .all(|m| asked.iter().all(|t| !m.equiv(t, Equivalence::Structural)));
        if disjoint {
            return Some(false);
        }
        let covered = eqv.implies(asked_eqv)
            && known
                .iter()
                .all(|m| asked.iter().any(|t| m.equiv(t, asked_eqv)));
        covered.then_some(true)
    } else {
        let excluded = asked_eqv.implies(eqv)
            && asked
                .iter()
                .all(|t| known.iter().any(|m| t.equiv(m, eqv)));
        excluded.then_some(false)
    }
}

/// Whether `func` cannot see any pattern variable of `branch`, bound now or
/// by one of its pending matches.
fn is_independent<E: Emitter>(emitter: &E, func: &E::Expr, branch: &Branch<'_, E::Expr>) -> bool {
    let mut names: Vec<Name> = branch.env.names().collect();
    for pending in &branch.pending {
        if let Match::Pattern { pattern, .. } = pending {
            collect_binders(pattern, &mut names);
        }
    }
    !names.iter().any(|name| emitter.mentions(func, *name))
}

/// Every name `pattern` binds, including bindings local to a `Not`.
fn collect_binders<X>(pattern: &Pattern<X>, out: &mut Vec<Name>) {
    ensure_sufficient_stack(|| match pattern {
        Pattern::Bind(name) => out.push(*name),
        Pattern::App(_, inner) | Pattern::Not(inner) => collect_binders(inner, out),
        Pattern::And(items) | Pattern::Or(items) => {
            for item in items {
                collect_binders(item, out);
            }
        }
        Pattern::Wildcard | Pattern::Literal(_) | Pattern::Predicate(_) | Pattern::Guard(_) => {}
    });
}

/// `fresh` now holds `func` applied to `subject`. Rewrite pending
/// applications of the same function to the same subject to read `fresh`
/// instead of projecting again.
pub(super) fn share_projection<'p, E: Emitter>(
    emitter: &E,
    queue: Queue<'p, E::Expr>,
    subject: Name,
    func: &'p E::Expr,
    fresh: Name,
) -> Queue<'p, E::Expr> {
    let projection = Projection {
        subject,
        func,
        fresh,
    };
    queue
        .into_iter()
        .map(|branch| projection.share(emitter, branch))
        .collect()
}

struct Projection<'p, X> {
    subject: Name,
    func: &'p X,
    fresh: Name,
}

impl<'p, X: Clone + PartialEq> Projection<'p, X> {
    fn share<E: Emitter<Expr = X>>(&self, emitter: &E, mut branch: Branch<'p, X>) -> Branch<'p, X> {
        let candidate = branch.pending.iter().any(|pending| match pending {
            Match::Pattern { subject, pattern } => {
                *subject == self.subject && self.projects(pattern)
            }
            Match::Member { .. } | Match::SameAs { .. } => false,
        });
        if !candidate || !is_independent(emitter, self.func, &branch) {
            return branch;
        }

        let mut pending = Vec::with_capacity(branch.pending.len());
        for m in std::mem::take(&mut branch.pending) {
            self.rewrite(m, &mut pending);
        }
        branch.pending = pending;
        branch
    }

    /// Whether `pattern` applies the function, directly or as a conjunct.
    fn projects(&self, pattern: &Pattern<X>) -> bool {
        ensure_sufficient_stack(|| match pattern {
            Pattern::App(func, _) => func == self.func,
            Pattern::And(items) => items.iter().any(|item| self.projects(item)),
            _ => false,
        })
    }

    fn rewrite(&self, pending: Match<'p, X>, out: &mut Vec<Match<'p, X>>) {
        match pending {
            Match::Pattern { subject, pattern } if subject == self.subject => match pattern {
                Pattern::App(func, inner) if func == self.func => out.push(Match::Pattern {
                    subject: self.fresh,
                    pattern: inner,
                }),
                // Splice the conjunction so its projecting conjuncts can be rewritten.
                Pattern::And(items) if self.projects(pattern) => {
                    for item in items.iter().rev() {
                        self.rewrite(
                            Match::Pattern {
                                subject,
                                pattern: item,
                            },
                            out,
                        );
                    }
                }
                _ => out.push(Match::Pattern { subject, pattern }),
            },
            other => out.push(other),
        }
    }
}
