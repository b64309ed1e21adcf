//! Diagnostic system for match compilation.
//!
//! Every diagnostic carries:
//! - An error code for searchability
//! - A clear message (what went wrong)
//! - Notes (why it's wrong, e.g. the offending pattern)
//! - Suggestions (how to fix)
//!
//! Fatal problems are returned as errors by the compiler and converted to a
//! [`Diagnostic`] for reporting; advisory problems (a shadowed case) are
//! collected as warnings next to the compiled code.

mod diagnostic;
mod error_code;

pub use diagnostic::{Diagnostic, Severity};
pub use error_code::ErrorCode;
