//! Lowering of a decision tree to emitter code.
//!
//! Runs after every placeholder has been finalized. The tree is walked
//! bottom-up while recording which subjects the emitted code reads, so a
//! projection whose result nothing reads is dropped instead of evaluated.

use casec_ir::{Literal, Name};
use casec_stack::ensure_sufficient_stack;
use rustc_hash::FxHashSet;

use crate::decision::{Decision, Test};
use crate::placeholder::Resolved;
use crate::Emitter;

pub(crate) struct Lowering<'a, E: Emitter> {
    emitter: &'a mut E,
    resolved: &'a Resolved<E::Code>,
    referenced: FxHashSet<Name>,
    dropped_projections: usize,
}

impl<'a, E: Emitter> Lowering<'a, E> {
    pub(crate) fn new(emitter: &'a mut E, resolved: &'a Resolved<E::Code>) -> Self {
        Lowering {
            emitter,
            resolved,
            referenced: FxHashSet::default(),
            dropped_projections: 0,
        }
    }

    /// Number of projections left out because nothing read them.
    pub(crate) fn dropped_projections(&self) -> usize {
        self.dropped_projections
    }

    pub(crate) fn lower(&mut self, decision: &Decision<'_, E::Expr>) -> E::Code {
        ensure_sufficient_stack(|| match decision {
            Decision::Fail => self.emitter.no_match(),
            Decision::Leaf { case, use_index } => {
                let resolved = self.resolved;
                let site = resolved.site(*case, *use_index);
                self.referenced.extend(site.subjects.iter().copied());
                site.code.clone()
            }
            Decision::Test {
                test,
                then,
                otherwise,
            } => {
                let then = self.lower(then);
                let otherwise = self.lower(otherwise);
                let test = self.test(test);
                self.emitter.if_(test, then, otherwise)
            }
            Decision::Project {
                fresh,
                func,
                subject,
                bindings,
                body,
            } => {
                let body = self.lower(body);
                if !self.referenced.contains(fresh) {
                    self.dropped_projections += 1;
                    return body;
                }
                self.referenced.insert(*subject);
                let bindings = self.bindings(bindings);
                let subject = self.emitter.var(*subject);
                let value = self.emitter.apply(func, &subject, &bindings);
                self.emitter.let_(vec![(*fresh, value)], body)
            }
        })
    }

    fn test(&mut self, test: &Test<'_, E::Expr>) -> E::Code {
        self.referenced.extend(test.subjects());
        match test {
            Test::Equal {
                subject,
                literal,
                eqv,
            } => {
                let subject = self.emitter.var(*subject);
                self.emitter.equality_test(&subject, literal, *eqv)
            }
            Test::Member { subject, set, eqv } => {
                let subject = self.emitter.var(*subject);
                let set: Vec<Literal> = set.iter().map(|literal| (*literal).clone()).collect();
                self.emitter.membership_test(&subject, &set, *eqv)
            }
            Test::SameAs { subject, other } => {
                let subject = self.emitter.var(*subject);
                let other = self.emitter.var(*other);
                self.emitter.same_value_test(&subject, &other)
            }
            Test::Predicate {
                subject,
                func,
                bindings,
            } => {
                let bindings = self.bindings(bindings);
                let subject = self.emitter.var(*subject);
                self.emitter.predicate_test(func, &subject, &bindings)
            }
            Test::Guard { expr, bindings } => {
                let bindings = self.bindings(bindings);
                self.emitter.guard_test(expr, &bindings)
            }
        }
    }

    fn bindings(&mut self, bindings: &[(Name, Name)]) -> Vec<(Name, E::Expr)> {
        bindings
            .iter()
            .map(|&(name, subject)| {
                self.referenced.insert(subject);
                (name, self.emitter.var(subject))
            })
            .collect()
    }
}
