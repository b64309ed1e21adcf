//! casec IR - pattern model for the match compiler.
//!
//! This crate holds the read-only inputs of a match compilation:
//! - [`Name`] interned identifiers and the [`StringInterner`] that owns them
//! - [`Literal`] constants and the [`Equivalence`] used to compare against them
//! - [`Pattern`], the closed tagged representation a front end produces
//!
//! Nothing here performs compilation. The decision compiler in `casec_match`
//! consumes these types and never mutates them.
//!
//! # Design Philosophy
//!
//! - **Intern names**: variable and symbol names are `Name(u32)`, so equality
//!   checks during compilation are integer compares.
//! - **Generic over host expressions**: patterns carry the caller's own
//!   expression handle (`X`) for predicates, guards and applied functions.
//!   The core composes those handles but never inspects them.
//!
//! Floats are stored as `u64` bits so literals can be `Eq + Hash`.

mod interner;
mod literal;
mod name;
mod pattern;

pub use interner::{StringInterner, StringLookup};
pub use literal::{Equivalence, Literal, LiteralKind};
pub use name::Name;
pub use pattern::Pattern;
