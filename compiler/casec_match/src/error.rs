//! Errors and diagnostics produced by match compilation.

use std::fmt;

use casec_diagnostic::{Diagnostic, ErrorCode};
use casec_ir::Pattern;

/// A fatal problem with the case list. Compilation stops at the first one.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum MatchError<X> {
    /// A pattern that cannot be compiled.
    #[error("malformed pattern in case {case}: {reason}")]
    MalformedPattern {
        /// Index of the offending case.
        case: usize,
        /// The whole pattern of that case.
        pattern: Pattern<X>,
        reason: &'static str,
    },

    /// The pattern and code generator lists differ in length.
    #[error("{patterns} patterns but {generators} code generators")]
    ArityMismatch { patterns: usize, generators: usize },
}

impl<X: fmt::Debug> MatchError<X> {
    /// Error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            MatchError::MalformedPattern { .. } => ErrorCode::E3002,
            MatchError::ArityMismatch { .. } => ErrorCode::E3003,
        }
    }

    /// Convert to a diagnostic for reporting.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code()).with_message(self.to_string());
        match self {
            MatchError::MalformedPattern { pattern, .. } => {
                diag.with_note(format!("in pattern {pattern:?}"))
            }
            MatchError::ArityMismatch { .. } => {
                diag.with_suggestion("give every pattern exactly one code generator")
            }
        }
    }
}

/// A non-fatal diagnostic attributed to one case.
#[derive(Clone, Debug, PartialEq)]
pub struct PatternDiagnostic<X> {
    pub diagnostic: Diagnostic,
    /// Index of the case the diagnostic is about.
    pub case_index: usize,
    /// That case's pattern.
    pub pattern: Pattern<X>,
}

impl<X: fmt::Debug> PatternDiagnostic<X> {
    /// Warning for a case no decision path reaches.
    pub(crate) fn shadowed(case_index: usize, pattern: Pattern<X>) -> Self {
        let diagnostic = Diagnostic::warning(ErrorCode::W3001)
            .with_message(format!("case {case_index} is unreachable"))
            .with_note(format!("pattern {pattern:?} only matches values an earlier case already claims"))
            .with_suggestion("remove the case or move it above the cases that shadow it");
        PatternDiagnostic {
            diagnostic,
            case_index,
            pattern,
        }
    }
}
