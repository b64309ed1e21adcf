//! Literal constants and the equivalences used to compare against them.
//!
//! A `Literal` pattern compares the subject against a constant. Which
//! comparison is correct depends on the constant's kind: symbols can be
//! compared by identity, numbers need numeric identity, and strings or
//! lists need structural equality. [`Equivalence`] names those three
//! comparators and orders them from strictest to most general.

use crate::Name;

/// A constant a pattern can compare against.
///
/// Floats are stored as their bit pattern so the type can derive `Eq` and
/// `Hash`; numeric identity on floats is bit identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Literal {
    /// An interned symbol. `nil` and `t` are symbols.
    Symbol(Name),
    Int(i64),
    /// IEEE-754 bits of a float.
    Float(u64),
    /// A character. Compares as its code point, so `Char('a')` and
    /// `Int(97)` are numerically identical.
    Char(char),
    Str(String),
    /// A constant list, compared element by element.
    List(Vec<Literal>),
}

/// Coarse classification of a literal, used when two literals are compared
/// under an equivalence stricter than either one needs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    Symbol,
    Number,
    String,
    List,
}

/// The comparator used for an equality or membership test.
///
/// Ordered from strictest to most general. A test that holds under a
/// stricter equivalence also holds under every more general one.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Equivalence {
    /// Same object. Correct for symbols (and small integers).
    Identity,
    /// Same object, or numbers of the same type with the same value.
    NumericIdentity,
    /// Structurally equal contents.
    Structural,
}

impl Equivalence {
    /// The least general equivalence that is correct for both operands.
    #[must_use]
    pub fn join(self, other: Equivalence) -> Equivalence {
        self.max(other)
    }

    /// The join of the per-literal needs of every literal in `literals`.
    ///
    /// An empty set needs nothing beyond identity.
    pub fn for_literals<'a>(literals: impl IntoIterator<Item = &'a Literal>) -> Equivalence {
        literals
            .into_iter()
            .fold(Equivalence::Identity, |eqv, lit| eqv.join(lit.equivalence()))
    }

    /// Returns `true` if a value equal under `self` is necessarily equal
    /// under `other` as well.
    pub fn implies(self, other: Equivalence) -> bool {
        self <= other
    }
}

impl Literal {
    /// The `nil` symbol.
    pub const NIL: Literal = Literal::Symbol(Name::NIL);

    /// The `t` symbol.
    pub const T: Literal = Literal::Symbol(Name::T);

    /// Build a float literal.
    pub fn float(value: f64) -> Self {
        Literal::Float(value.to_bits())
    }

    /// Build a string literal.
    pub fn string(value: impl Into<String>) -> Self {
        Literal::Str(value.into())
    }

    pub fn kind(&self) -> LiteralKind {
        match self {
            Literal::Symbol(_) => LiteralKind::Symbol,
            Literal::Int(_) | Literal::Float(_) | Literal::Char(_) => LiteralKind::Number,
            Literal::Str(_) => LiteralKind::String,
            Literal::List(_) => LiteralKind::List,
        }
    }

    /// The weakest equivalence that decides equality with this literal
    /// correctly.
    pub fn equivalence(&self) -> Equivalence {
        match self.kind() {
            LiteralKind::Symbol => Equivalence::Identity,
            LiteralKind::Number => Equivalence::NumericIdentity,
            LiteralKind::String | LiteralKind::List => Equivalence::Structural,
        }
    }

    /// Whether this literal denotes `nil`: the symbol or the empty list.
    pub fn is_nil(&self) -> bool {
        match self {
            Literal::Symbol(name) => *name == Name::NIL,
            Literal::List(items) => items.is_empty(),
            _ => false,
        }
    }

    /// Integer value of an integer or character literal.
    fn fixnum(&self) -> Option<i64> {
        match self {
            Literal::Int(n) => Some(*n),
            Literal::Char(c) => Some(i64::from(u32::from(*c))),
            _ => None,
        }
    }

    /// Compare two literals under `eqv`.
    ///
    /// This is the model every back end's comparators are expected to agree
    /// with: integers and characters are identical when their values are;
    /// floats only under numeric identity or structural equality; strings
    /// and lists only under structural equality. The empty list is `nil`.
    pub fn equiv(&self, other: &Literal, eqv: Equivalence) -> bool {
        if self.is_nil() || other.is_nil() {
            return self.is_nil() && other.is_nil();
        }
        if let (Some(a), Some(b)) = (self.fixnum(), other.fixnum()) {
            return a == b;
        }
        match (self, other) {
            (Literal::Symbol(a), Literal::Symbol(b)) => a == b,
            (Literal::Float(a), Literal::Float(b)) => eqv != Equivalence::Identity && a == b,
            (Literal::Str(a), Literal::Str(b)) => eqv == Equivalence::Structural && a == b,
            (Literal::List(a), Literal::List(b)) => {
                eqv == Equivalence::Structural
                    && a.len() == b.len()
                    && a.iter().zip(b).all(|(x, y)| x.equiv(y, Equivalence::Structural))
            }
            _ => false,
        }
    }
}
