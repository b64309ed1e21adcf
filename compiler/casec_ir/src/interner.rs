//! String interner for identifier storage.
//!
//! Provides O(1) interning and lookup behind a single `RwLock`. Interned
//! strings are leaked, so lookups hand out `&'static str` without holding
//! the lock.

use super::Name;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// Strings pre-interned at fixed indices (see the `Name` constants).
const RESERVED: &[&str] = &["", "nil", "t"];

/// Prefix that marks a generated name. No reader produces it, so a
/// generated name can never collide with a user-written identifier.
/// Front ends must not intern strings starting with it.
const GENSYM_MARKER: &str = "#:";

/// Table storage behind the lock.
struct InternTable {
    /// Map from string content to index.
    map: FxHashMap<&'static str, u32>,
    /// Storage for string contents, indexed by `Name`.
    strings: Vec<&'static str>,
}

impl InternTable {
    fn with_reserved() -> Self {
        let mut table = InternTable {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(64),
        };
        for s in RESERVED {
            table.insert(s);
        }
        table
    }

    fn insert(&mut self, s: &'static str) -> Name {
        let index = u32::try_from(self.strings.len())
            .unwrap_or_else(|_| panic!("string interner exceeded {} entries", u32::MAX));
        self.strings.push(s);
        self.map.insert(s, index);
        Name::from_raw(index)
    }
}

/// String interner shared by a front end, the match compiler and a back end.
///
/// # Thread Safety
/// Interning takes `&self`; the table sits behind a `RwLock` so a single
/// interner can be shared between threads compiling different matches.
pub struct StringInterner {
    table: RwLock<InternTable>,
}

impl StringInterner {
    /// Create a new interner with `""`, `nil` and `t` pre-interned.
    pub fn new() -> Self {
        let interner = StringInterner {
            table: RwLock::new(InternTable::with_reserved()),
        };
        debug_assert_eq!(interner.lookup(Name::NIL), "nil");
        debug_assert_eq!(interner.lookup(Name::T), "t");
        interner
    }

    /// Intern a string, returning its Name.
    ///
    /// # Panics
    /// Panics if more than `u32::MAX` strings are interned.
    pub fn intern(&self, s: &str) -> Name {
        // Fast path: already interned
        if let Some(name) = self.get(s) {
            return name;
        }

        let mut table = self.table.write();

        // Double-check after acquiring write lock
        if let Some(&index) = table.map.get(s) {
            return Name::from_raw(index);
        }

        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        table.insert(leaked)
    }

    /// Return the name for `s` if it has already been interned.
    pub fn get(&self, s: &str) -> Option<Name> {
        self.table.read().map.get(s).copied().map(Name::from_raw)
    }

    /// The generated name `#:<prefix><index>`.
    ///
    /// The same arguments always give the same name, so the table grows
    /// with the largest index ever asked for, not with the number of calls.
    /// Callers own freshness: see `casec_match`'s per-compilation name
    /// supply.
    pub fn generated(&self, prefix: &str, index: u32) -> Name {
        self.intern(&format!("{GENSYM_MARKER}{prefix}{index}"))
    }

    /// Check whether `name` was produced by [`generated`](Self::generated).
    pub fn is_generated(&self, name: Name) -> bool {
        self.lookup(name).starts_with(GENSYM_MARKER)
    }

    /// Look up the string for a Name.
    ///
    /// # Panics
    /// Panics if `name` was not produced by this interner.
    pub fn lookup(&self, name: Name) -> &'static str {
        self.table.read().strings[name.index()]
    }

    /// Get the number of interned strings.
    pub fn len(&self) -> usize {
        self.table.read().strings.len()
    }

    /// Check if the interner holds only the reserved strings.
    pub fn is_empty(&self) -> bool {
        self.len() <= RESERVED.len()
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for looking up interned string names.
///
/// Lets printing code accept any lookup source without depending on
/// `StringInterner` directly.
pub trait StringLookup {
    /// Look up the string for an interned name.
    fn lookup(&self, name: Name) -> &str;
}

impl StringLookup for StringInterner {
    fn lookup(&self, name: Name) -> &str {
        StringInterner::lookup(self, name)
    }
}
