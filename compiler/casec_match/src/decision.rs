//! Decision tree produced by the compiler and consumed by lowering.
//!
//! The tree refers to case bodies only through `(case, use)` indices, so it
//! can be built before any code generator has run. Subjects are variable
//! names; every non-root subject is introduced by a [`Decision::Project`]
//! above the nodes that read it.

use casec_ir::{Equivalence, Literal, Name};

/// A single runtime check.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Test<'p, X> {
    /// `subject` equals `literal` under `eqv`.
    Equal {
        subject: Name,
        literal: &'p Literal,
        eqv: Equivalence,
    },
    /// `subject` is one of `set` under `eqv`.
    Member {
        subject: Name,
        set: Vec<&'p Literal>,
        eqv: Equivalence,
    },
    /// Two subjects hold the same value.
    SameAs { subject: Name, other: Name },
    /// `func` applied to `subject` is truthy.
    Predicate {
        subject: Name,
        func: &'p X,
        /// `(variable, subject)` pairs visible to `func`.
        bindings: Vec<(Name, Name)>,
    },
    /// `expr` is truthy.
    Guard {
        expr: &'p X,
        bindings: Vec<(Name, Name)>,
    },
}

impl<X> Test<'_, X> {
    /// Every subject the test reads, bindings included.
    pub(crate) fn subjects(&self) -> Vec<Name> {
        match self {
            Test::Equal { subject, .. } | Test::Member { subject, .. } => vec![*subject],
            Test::SameAs { subject, other } => vec![*subject, *other],
            Test::Predicate {
                subject, bindings, ..
            } => std::iter::once(*subject)
                .chain(bindings.iter().map(|(_, s)| *s))
                .collect(),
            Test::Guard { bindings, .. } => bindings.iter().map(|(_, s)| *s).collect(),
        }
    }
}

/// Compiled decision structure.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Decision<'p, X> {
    /// No case matches on this path.
    Fail,
    /// Case `case` matched; its body is the finalized code for `use_index`.
    Leaf { case: usize, use_index: usize },
    Test {
        test: Test<'p, X>,
        then: Box<Decision<'p, X>>,
        otherwise: Box<Decision<'p, X>>,
    },
    /// Bind `fresh` to `func` applied to `subject` around `body`.
    ///
    /// Lowering drops the binding when nothing in `body` reads `fresh`.
    Project {
        fresh: Name,
        func: &'p X,
        subject: Name,
        bindings: Vec<(Name, Name)>,
        body: Box<Decision<'p, X>>,
    },
}

impl<X> Decision<'_, X> {
    /// Number of `Test` nodes.
    pub(crate) fn test_count(&self) -> usize {
        casec_stack::ensure_sufficient_stack(|| match self {
            Decision::Fail | Decision::Leaf { .. } => 0,
            Decision::Test {
                then, otherwise, ..
            } => 1 + then.test_count() + otherwise.test_count(),
            Decision::Project { body, .. } => body.test_count(),
        })
    }
}
