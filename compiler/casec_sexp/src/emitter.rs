//! [`Emitter`] implementation producing [`Form`]s.

use casec_ir::{Equivalence, Literal, Name, StringInterner};
use casec_match::Emitter;

use crate::{Form, Value};

/// Names of the functions the generated code calls.
#[derive(Copy, Clone, Debug)]
struct Ops {
    eq: Name,
    eql: Name,
    equal: Name,
    memq: Name,
    memql: Name,
    member: Name,
    funcall: Name,
}

impl Ops {
    fn new(interner: &StringInterner) -> Self {
        Ops {
            eq: interner.intern("eq"),
            eql: interner.intern("eql"),
            equal: interner.intern("equal"),
            memq: interner.intern("memq"),
            memql: interner.intern("memql"),
            member: interner.intern("member"),
            funcall: interner.intern("funcall"),
        }
    }

    fn comparator(self, eqv: Equivalence) -> Name {
        match eqv {
            Equivalence::Identity => self.eq,
            Equivalence::NumericIdentity => self.eql,
            Equivalence::Structural => self.equal,
        }
    }

    fn membership(self, eqv: Equivalence) -> Name {
        match eqv {
            Equivalence::Identity => self.memq,
            Equivalence::NumericIdentity => self.memql,
            Equivalence::Structural => self.member,
        }
    }
}

/// Emits Lisp-style code.
///
/// Functions in `Predicate` and `App` patterns are applied with the subject
/// appended as the last argument: `#'f` becomes `(f subject)` and a partial
/// call `(f a)` becomes `(f a subject)`. Any other form is called through
/// `funcall`.
#[derive(Clone, Debug)]
pub struct SexpEmitter {
    ops: Ops,
}

impl SexpEmitter {
    pub fn new(interner: &StringInterner) -> Self {
        SexpEmitter {
            ops: Ops::new(interner),
        }
    }

    /// The call that applies `func` to `subject`.
    pub fn application(&self, func: &Form, subject: Form) -> Form {
        match func {
            Form::Function(name) => Form::Call(*name, vec![subject]),
            Form::Call(name, args) => {
                let mut args = args.clone();
                args.push(subject);
                Form::Call(*name, args)
            }
            _ => Form::Call(self.ops.funcall, vec![func.clone(), subject]),
        }
    }
}

impl Emitter for SexpEmitter {
    type Expr = Form;
    type Code = Form;

    fn var(&mut self, name: Name) -> Form {
        Form::Var(name)
    }

    fn equality_test(&mut self, subject: &Form, literal: &Literal, eqv: Equivalence) -> Form {
        Form::call(
            self.ops.comparator(eqv),
            vec![subject.clone(), Form::Quote(Value::from_literal(literal))],
        )
    }

    fn membership_test(&mut self, subject: &Form, set: &[Literal], eqv: Equivalence) -> Form {
        let set = Value::list(set.iter().map(Value::from_literal));
        Form::call(self.ops.membership(eqv), vec![subject.clone(), Form::Quote(set)])
    }

    fn same_value_test(&mut self, subject: &Form, other: &Form) -> Form {
        Form::call(self.ops.eql, vec![subject.clone(), other.clone()])
    }

    fn predicate_test(&mut self, func: &Form, subject: &Form, bindings: &[(Name, Form)]) -> Form {
        Form::let_(bindings.to_vec(), self.application(func, subject.clone()))
    }

    fn guard_test(&mut self, expr: &Form, bindings: &[(Name, Form)]) -> Form {
        Form::let_(bindings.to_vec(), expr.clone())
    }

    fn apply(&mut self, func: &Form, subject: &Form, bindings: &[(Name, Form)]) -> Form {
        Form::let_(bindings.to_vec(), self.application(func, subject.clone()))
    }

    fn if_(&mut self, test: Form, then: Form, otherwise: Form) -> Form {
        Form::if_(test, then, otherwise)
    }

    fn let_(&mut self, bindings: Vec<(Name, Form)>, body: Form) -> Form {
        Form::let_(bindings, body)
    }

    fn no_match(&mut self) -> Form {
        Form::nil()
    }

    fn unbound_value(&mut self) -> Form {
        Form::nil()
    }

    fn mentions(&self, expr: &Form, name: Name) -> bool {
        expr.mentions(name)
    }
}
