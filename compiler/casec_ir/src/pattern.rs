//! The pattern tree a front end hands to the match compiler.
//!
//! `Pattern` is a closed set: dispatch in the decision compiler is an
//! exhaustive `match`, so adding a variant is a compile error everywhere a
//! pattern is taken apart.

use crate::{Literal, Name};

/// A pattern over a subject value.
///
/// `X` is the caller's expression handle. The compiler only ever passes it
/// back to the caller's code-generation hooks.
#[derive(Clone, Debug, PartialEq)]
pub enum Pattern<X> {
    /// Matches anything, binds nothing.
    Wildcard,
    /// Matches anything and binds the name to the subject.
    ///
    /// A second occurrence of the same name on one decision path is an
    /// equality test against the first binding.
    Bind(Name),
    /// Matches iff the subject equals the literal under the literal's own
    /// [`Equivalence`](crate::Equivalence).
    Literal(Literal),
    /// Matches iff applying the function to the subject is truthy.
    Predicate(X),
    /// Matches iff the expression, evaluated under the bindings made so far,
    /// is truthy. Does not look at the subject.
    Guard(X),
    /// Applies the function to the subject and matches the result against
    /// the inner pattern.
    App(X, Box<Pattern<X>>),
    /// Matches iff the inner pattern does not. Bindings made inside are
    /// discarded.
    Not(Box<Pattern<X>>),
    /// Matches iff every element matches, left to right.
    And(Vec<Pattern<X>>),
    /// Matches iff some element matches; the first alternative that lets
    /// the rest of the case match wins.
    Or(Vec<Pattern<X>>),
}

impl<X> Pattern<X> {
    /// Build an `App` pattern.
    pub fn app(func: X, inner: Pattern<X>) -> Self {
        Pattern::App(func, Box::new(inner))
    }

    /// Build a `Not` pattern.
    #[allow(clippy::should_implement_trait)] // Constructor, not the `!` operator
    pub fn not(inner: Pattern<X>) -> Self {
        Pattern::Not(Box::new(inner))
    }

    /// The literal this pattern compares against, if it is a plain
    /// comparison usable for membership folding.
    ///
    /// Sees through single-element `And`/`Or` wrappers, which front ends
    /// produce when desugaring. Anything that binds, applies a function or
    /// evaluates a guard is not a plain comparison.
    pub fn simplify_quoted(&self) -> Option<&Literal> {
        match self {
            Pattern::Literal(lit) => Some(lit),
            Pattern::And(items) | Pattern::Or(items) if items.len() == 1 => {
                items[0].simplify_quoted()
            }
            _ => None,
        }
    }
}
