//! Generated variable names for one compilation.
//!
//! Each compilation numbers its subject variables from a base index:
//! `#:val0`, `#:x1`, and so on. The same input therefore compiles to the
//! same code every time, and the interner only ever holds as many
//! generated names as the largest compilation needed.
//!
//! A case body may itself contain a match compiled while the enclosing one
//! is still being finalized. Its variables must not shadow the enclosing
//! match's, so the first free index is tracked per thread while a
//! compilation is running and handed back when it ends.

use std::cell::Cell;

use casec_ir::{Name, StringInterner};

thread_local! {
    /// First index not used by a compilation running on this thread.
    static NEXT_FREE: Cell<u32> = const { Cell::new(0) };
}

/// Hands out fresh generated names. Dropping the supply releases its
/// indices for the next compilation.
pub(crate) struct NameSupply<'i> {
    interner: &'i StringInterner,
    base: u32,
    next: Cell<u32>,
}

impl<'i> NameSupply<'i> {
    pub(crate) fn new(interner: &'i StringInterner) -> Self {
        let base = NEXT_FREE.with(Cell::get);
        NameSupply {
            interner,
            base,
            next: Cell::new(base),
        }
    }

    /// A name no other live supply on this thread has handed out.
    pub(crate) fn fresh(&self, prefix: &str) -> Name {
        let index = self.next.get();
        let next = index + 1;
        self.next.set(next);
        NEXT_FREE.with(|free| free.set(next));
        self.interner.generated(prefix, index)
    }
}

impl Drop for NameSupply<'_> {
    fn drop(&mut self) {
        NEXT_FREE.with(|free| free.set(self.base));
    }
}
