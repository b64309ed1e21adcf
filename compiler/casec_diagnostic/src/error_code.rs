//! Error codes for match compiler diagnostics.
//!
//! Each code is a unique identifier (e.g. `E3002`). The letter gives the
//! default severity, the first digit the area:
//! - E3xxx / W3xxx: pattern and case-list problems

use std::fmt;

/// Error codes for all match compiler diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    /// Malformed pattern (e.g. an empty disjunction)
    E3002,
    /// Case list arity mismatch (patterns and code generators differ in number)
    E3003,
    /// Case can never be selected (shadowed by earlier cases)
    W3001,
}

impl ErrorCode {
    /// Get the string representation of this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E3002 => "E3002",
            ErrorCode::E3003 => "E3003",
            ErrorCode::W3001 => "W3001",
        }
    }

    /// One-line description used by `--explain`-style lookups.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E3002 => "malformed pattern",
            ErrorCode::E3003 => "case list arity mismatch",
            ErrorCode::W3001 => "unreachable case",
        }
    }

    /// Check if this code is a warning (Wxxxx).
    pub fn is_warning(&self) -> bool {
        matches!(self, ErrorCode::W3001)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
