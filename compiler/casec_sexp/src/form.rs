//! Code tree produced by [`SexpEmitter`](crate::SexpEmitter).
//!
//! `Form` serves as both the expression and the code type of the back end:
//! Lisp makes no distinction between the two.

use std::fmt;

use casec_ir::{Name, StringLookup};

use crate::Value;

#[derive(Clone, Debug, PartialEq)]
pub enum Form {
    Var(Name),
    /// A constant.
    Quote(Value),
    /// A function designator, `#'name`. Evaluates to the symbol.
    Function(Name),
    /// Call a named function.
    Call(Name, Vec<Form>),
    If(Box<Form>, Box<Form>, Box<Form>),
    /// Parallel `let`: every value is evaluated before any name is bound.
    Let(Vec<(Name, Form)>, Box<Form>),
}

impl Form {
    pub fn nil() -> Self {
        Form::Quote(Value::nil())
    }

    pub fn int(n: i64) -> Self {
        Form::Quote(Value::Int(n))
    }

    pub fn symbol(name: Name) -> Self {
        Form::Quote(Value::Symbol(name))
    }

    pub fn call(func: Name, args: Vec<Form>) -> Self {
        Form::Call(func, args)
    }

    pub fn if_(test: Form, then: Form, otherwise: Form) -> Self {
        Form::If(Box::new(test), Box::new(then), Box::new(otherwise))
    }

    /// Wrap `body` in a `let`, or return it unchanged when there is
    /// nothing to bind.
    pub fn let_(bindings: Vec<(Name, Form)>, body: Form) -> Self {
        if bindings.is_empty() {
            body
        } else {
            Form::Let(bindings, Box::new(body))
        }
    }

    /// Whether `name` occurs free in this form.
    pub fn mentions(&self, name: Name) -> bool {
        match self {
            Form::Var(var) => *var == name,
            Form::Quote(_) | Form::Function(_) => false,
            Form::Call(_, args) => args.iter().any(|arg| arg.mentions(name)),
            Form::If(test, then, otherwise) => {
                test.mentions(name) || then.mentions(name) || otherwise.mentions(name)
            }
            Form::Let(bindings, body) => {
                bindings.iter().any(|(_, value)| value.mentions(name))
                    || (bindings.iter().all(|(var, _)| *var != name) && body.mentions(name))
            }
        }
    }

    /// Number of nodes satisfying `pred`.
    pub fn count(&self, pred: &dyn Fn(&Form) -> bool) -> usize {
        let own = usize::from(pred(self));
        own + match self {
            Form::Var(_) | Form::Quote(_) | Form::Function(_) => 0,
            Form::Call(_, args) => args.iter().map(|arg| arg.count(pred)).sum(),
            Form::If(test, then, otherwise) => {
                test.count(pred) + then.count(pred) + otherwise.count(pred)
            }
            Form::Let(bindings, body) => {
                bindings.iter().map(|(_, v)| v.count(pred)).sum::<usize>() + body.count(pred)
            }
        }
    }

    /// Render as Lisp text with names resolved through `names`.
    pub fn display<'a, L: StringLookup>(&'a self, names: &'a L) -> FormDisplay<'a, L> {
        FormDisplay { form: self, names }
    }
}

pub struct FormDisplay<'a, L> {
    form: &'a Form,
    names: &'a L,
}

impl<L: StringLookup> fmt::Display for FormDisplay<'_, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_form(f, self.form, self.names)
    }
}

fn write_form<L: StringLookup>(f: &mut fmt::Formatter<'_>, form: &Form, names: &L) -> fmt::Result {
    match form {
        Form::Var(name) => f.write_str(names.lookup(*name)),
        Form::Quote(value @ (Value::Int(_) | Value::Float(_) | Value::Str(_))) => {
            write!(f, "{}", value.display(names))
        }
        Form::Quote(value) if value.is_nil() || *value == Value::t() => {
            write!(f, "{}", value.display(names))
        }
        Form::Quote(value) => write!(f, "'{}", value.display(names)),
        Form::Function(name) => write!(f, "#'{}", names.lookup(*name)),
        Form::Call(func, args) => {
            write!(f, "({}", names.lookup(*func))?;
            for arg in args {
                f.write_str(" ")?;
                write_form(f, arg, names)?;
            }
            f.write_str(")")
        }
        Form::If(test, then, otherwise) => {
            f.write_str("(if ")?;
            write_form(f, test, names)?;
            f.write_str(" ")?;
            write_form(f, then, names)?;
            f.write_str(" ")?;
            write_form(f, otherwise, names)?;
            f.write_str(")")
        }
        Form::Let(bindings, body) => {
            f.write_str("(let (")?;
            for (i, (name, value)) in bindings.iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "({} ", names.lookup(*name))?;
                write_form(f, value, names)?;
                f.write_str(")")?;
            }
            f.write_str(") ")?;
            write_form(f, body, names)?;
            f.write_str(")")
        }
    }
}
