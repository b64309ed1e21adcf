//! Runtime values of the reference evaluator.
//!
//! A minimal Lisp data model: symbols, fixnums, floats, strings and cons
//! cells. `nil` is the symbol `nil` and doubles as the empty list and as
//! false; every other value is true.

use std::fmt;
use std::rc::Rc;

use casec_ir::{Equivalence, Literal, Name, StringLookup};

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Symbol(Name),
    Int(i64),
    Float(f64),
    /// Strings are heap objects: `eq` compares them by address.
    Str(Rc<str>),
    Cons(Rc<Cons>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Cons {
    pub car: Value,
    pub cdr: Value,
}

impl Value {
    pub fn nil() -> Self {
        Value::Symbol(Name::NIL)
    }

    pub fn t() -> Self {
        Value::Symbol(Name::T)
    }

    pub fn from_bool(b: bool) -> Self {
        if b {
            Value::t()
        } else {
            Value::nil()
        }
    }

    pub fn string(s: &str) -> Self {
        Value::Str(Rc::from(s))
    }

    pub fn cons(car: Value, cdr: Value) -> Self {
        Value::Cons(Rc::new(Cons { car, cdr }))
    }

    /// Build a proper list.
    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        let items: Vec<Value> = items.into_iter().collect();
        items
            .into_iter()
            .rev()
            .fold(Value::nil(), |tail, head| Value::cons(head, tail))
    }

    /// The runtime value a literal pattern compares against.
    ///
    /// Characters are their code point; the empty list is `nil`.
    pub fn from_literal(literal: &Literal) -> Self {
        match literal {
            Literal::Symbol(name) => Value::Symbol(*name),
            Literal::Int(n) => Value::Int(*n),
            Literal::Float(bits) => Value::Float(f64::from_bits(*bits)),
            Literal::Char(c) => Value::Int(i64::from(u32::from(*c))),
            Literal::Str(s) => Value::string(s),
            Literal::List(items) => Value::list(items.iter().map(Value::from_literal)),
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Symbol(name) if *name == Name::NIL)
    }

    pub fn is_truthy(&self) -> bool {
        !self.is_nil()
    }

    pub fn as_cons(&self) -> Option<&Cons> {
        match self {
            Value::Cons(cell) => Some(cell),
            _ => None,
        }
    }

    /// Elements of a proper list, or `None` for an improper one.
    pub fn to_vec(&self) -> Option<Vec<Value>> {
        let mut out = Vec::new();
        let mut cursor = self;
        loop {
            match cursor {
                Value::Cons(cell) => {
                    out.push(cell.car.clone());
                    cursor = &cell.cdr;
                }
                _ if cursor.is_nil() => return Some(out),
                _ => return None,
            }
        }
    }

    /// Object identity. Floats are boxed and never identical.
    pub fn is_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => Rc::ptr_eq(a, b),
            (Value::Cons(a), Value::Cons(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Identity, or numbers of the same type with the same bits.
    pub fn is_eql(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            _ => self.is_eq(other),
        }
    }

    /// Structural equality.
    pub fn is_equal(&self, other: &Value) -> bool {
        let (mut a, mut b) = (self, other);
        loop {
            match (a, b) {
                (Value::Str(x), Value::Str(y)) => return x == y,
                (Value::Cons(x), Value::Cons(y)) => {
                    if !x.car.is_equal(&y.car) {
                        return false;
                    }
                    a = &x.cdr;
                    b = &y.cdr;
                }
                _ => return a.is_eql(b),
            }
        }
    }

    /// Compare under the comparator `eqv` names.
    pub fn equiv(&self, other: &Value, eqv: Equivalence) -> bool {
        match eqv {
            Equivalence::Identity => self.is_eq(other),
            Equivalence::NumericIdentity => self.is_eql(other),
            Equivalence::Structural => self.is_equal(other),
        }
    }

    /// Render with symbol names resolved through `names`.
    pub fn display<'a, L: StringLookup>(&'a self, names: &'a L) -> ValueDisplay<'a, L> {
        ValueDisplay { value: self, names }
    }
}

pub struct ValueDisplay<'a, L> {
    value: &'a Value,
    names: &'a L,
}

impl<L: StringLookup> fmt::Display for ValueDisplay<'_, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, self.value, self.names)
    }
}

fn write_value<L: StringLookup>(f: &mut fmt::Formatter<'_>, value: &Value, names: &L) -> fmt::Result {
    match value {
        Value::Symbol(name) => f.write_str(names.lookup(*name)),
        Value::Int(n) => write!(f, "{n}"),
        Value::Float(x) => write!(f, "{x:?}"),
        Value::Str(s) => write!(f, "{:?}", &**s),
        Value::Cons(cell) => {
            f.write_str("(")?;
            write_value(f, &cell.car, names)?;
            let mut rest = &cell.cdr;
            loop {
                match rest {
                    Value::Cons(next) => {
                        f.write_str(" ")?;
                        write_value(f, &next.car, names)?;
                        rest = &next.cdr;
                    }
                    _ if rest.is_nil() => break,
                    _ => {
                        f.write_str(" . ")?;
                        write_value(f, rest, names)?;
                        break;
                    }
                }
            }
            f.write_str(")")
        }
    }
}
