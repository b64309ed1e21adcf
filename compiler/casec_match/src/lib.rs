//! Pattern-match compiler.
//!
//! Turns a subject expression and an ordered list of `(pattern, code
//! generator)` cases into decision code that selects the first case whose
//! pattern matches, with the bindings that pattern captured.
//!
//! # Pipeline
//!
//! 1. **Compile** (`compile`): a queue of branches is reduced to a
//!    [`Decision`](decision) tree. Each branch is a stack of pending
//!    matches; tests emitted for the head branch refine the branches behind
//!    it (branch splitting), disjunctions of literals fold into membership
//!    tests, and repeated variables turn into equality tests.
//! 2. **Finalize** (`placeholder`): every case reached at least once gets
//!    its code generator invoked exactly once, with the union of the
//!    binding contexts that reach it.
//! 3. **Lower** (`lower`): the decision tree is handed to the caller's
//!    [`Emitter`] hooks, dropping projections nothing reads.
//!
//! The compiler never inspects the code it builds. Everything target
//! specific lives behind [`Emitter`].
//!
//! Decision code is a tree, not a graph: code after a test the compiler
//! cannot use to prune later cases is duplicated into both arms. See
//! [`MatchOptions`] for the resulting worst-case size.
//!
//! # Usage
//!
//! ```text
//! let cases = vec![
//!     Case::new(Pattern::Literal(Literal::Int(0)), |e, vars, uses| zero_body(e, vars, uses)),
//!     Case::new(Pattern::Bind(n), |e, vars, uses| other_body(e, vars, uses)),
//! ];
//! let compiled = compile(&mut emitter, &interner, subject, cases, &MatchOptions::default())?;
//! ```

mod compile;
mod decision;
mod driver;
mod emit;
pub mod env;
mod error;
mod lower;
mod names;
mod options;
mod placeholder;

#[cfg(test)]
mod testing;

pub use driver::{compile, compile_clauses, Case, CodeGen, Compiled, MatchStats};
pub use emit::Emitter;
pub use env::{Binding, BindingEnv, Extension};
pub use error::{MatchError, PatternDiagnostic};
pub use options::MatchOptions;
pub use placeholder::VarVal;
