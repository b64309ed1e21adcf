//! Code-generation hooks.
//!
//! The match compiler composes code it never looks inside. A back end
//! implements [`Emitter`] to say what a test, a conditional or a binding
//! form looks like in its target representation.

use std::fmt;

use casec_ir::{Equivalence, Literal, Name};

/// Target-specific code construction used by the match compiler.
///
/// Bindings passed to the hooks are `(pattern variable, value)` pairs for
/// the variables bound on the current path that the hooked expression
/// [`mentions`](Emitter::mentions). A back end typically wraps the
/// generated test in a local binding form so the expression can see them.
pub trait Emitter {
    /// A value-producing expression: the subject, a variable reference, a
    /// projection, or a function/guard supplied in a pattern.
    type Expr: Clone + fmt::Debug + PartialEq;

    /// A code fragment: a test, a conditional, a binding form or a case body.
    type Code: Clone + fmt::Debug;

    /// Reference a variable.
    fn var(&mut self, name: Name) -> Self::Expr;

    /// Test `subject` against a single literal under `eqv`.
    fn equality_test(&mut self, subject: &Self::Expr, literal: &Literal, eqv: Equivalence)
        -> Self::Code;

    /// Test whether `subject` is one of `set` under `eqv`.
    fn membership_test(
        &mut self,
        subject: &Self::Expr,
        set: &[Literal],
        eqv: Equivalence,
    ) -> Self::Code;

    /// Test two subjects for sameness; produced by a repeated pattern
    /// variable.
    fn same_value_test(&mut self, subject: &Self::Expr, other: &Self::Expr) -> Self::Code;

    /// Test whether `func` applied to `subject` is truthy.
    fn predicate_test(
        &mut self,
        func: &Self::Expr,
        subject: &Self::Expr,
        bindings: &[(Name, Self::Expr)],
    ) -> Self::Code;

    /// Test whether `expr` is truthy under `bindings`.
    fn guard_test(&mut self, expr: &Self::Expr, bindings: &[(Name, Self::Expr)]) -> Self::Code;

    /// Apply `func` to `subject`.
    fn apply(
        &mut self,
        func: &Self::Expr,
        subject: &Self::Expr,
        bindings: &[(Name, Self::Expr)],
    ) -> Self::Expr;

    fn if_(&mut self, test: Self::Code, then: Self::Code, otherwise: Self::Code) -> Self::Code;

    /// Bind each name to its value (in parallel) around `body`.
    fn let_(&mut self, bindings: Vec<(Name, Self::Expr)>, body: Self::Code) -> Self::Code;

    /// Code run when no case matches.
    fn no_match(&mut self) -> Self::Code;

    /// Value given to a case variable on paths that do not bind it.
    fn unbound_value(&mut self) -> Self::Expr;

    /// Whether `expr` may refer to the variable `name`.
    ///
    /// Only variables an expression mentions are passed to it as bindings,
    /// and only expressions that mention no path variable are considered
    /// for sharing between branches. The default answers `true`, which is
    /// always correct and disables both refinements.
    fn mentions(&self, expr: &Self::Expr, name: Name) -> bool {
        let _ = (expr, name);
        true
    }
}
