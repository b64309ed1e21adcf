//! Test back end: builds a plain tree so tests can inspect the shape of
//! the generated code.

use std::cell::RefCell;
use std::rc::Rc;

use casec_ir::{Equivalence, Literal, Name, Pattern, StringInterner};

use crate::{Case, Emitter, VarVal};

/// Code and expression tree produced by [`TreeEmitter`].
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Node {
    Var(Name),
    /// A function or guard expression, with the variables it refers to.
    Func(&'static str, Vec<Name>),
    Eq(Box<Node>, Literal, Equivalence),
    Member(Box<Node>, Vec<Literal>, Equivalence),
    Same(Box<Node>, Box<Node>),
    Call(Box<Node>, Box<Node>),
    Guard(Box<Node>),
    If(Box<Node>, Box<Node>, Box<Node>),
    Let(Vec<(Name, Node)>, Box<Node>),
    /// Body of case `.0` with the variables it was given.
    Body(usize, Vec<(Name, bool)>),
    NoMatch,
    Unbound,
}

impl Node {
    pub(crate) fn count(&self, pred: &dyn Fn(&Node) -> bool) -> usize {
        let own = usize::from(pred(self));
        own + match self {
            Node::Eq(a, ..) | Node::Member(a, ..) | Node::Guard(a) => a.count(pred),
            Node::Same(a, b) | Node::Call(a, b) => a.count(pred) + b.count(pred),
            Node::If(a, b, c) => a.count(pred) + b.count(pred) + c.count(pred),
            Node::Let(bindings, body) => {
                bindings.iter().map(|(_, v)| v.count(pred)).sum::<usize>() + body.count(pred)
            }
            Node::Var(_) | Node::Func(..) | Node::Body(..) | Node::NoMatch | Node::Unbound => 0,
        }
    }

    pub(crate) fn ifs(&self) -> usize {
        self.count(&|n| matches!(n, Node::If(..)))
    }

    pub(crate) fn memberships(&self) -> usize {
        self.count(&|n| matches!(n, Node::Member(..)))
    }

    pub(crate) fn calls_of(&self, func: &'static str) -> usize {
        self.count(&|n| matches!(n, Node::Call(f, _) if matches!(f.as_ref(), Node::Func(name, _) if *name == func)))
    }

    pub(crate) fn bodies(&self, case: usize) -> usize {
        self.count(&|n| matches!(n, Node::Body(c, _) if *c == case))
    }
}

pub(crate) struct TreeEmitter;

impl Emitter for TreeEmitter {
    type Expr = Node;
    type Code = Node;

    fn var(&mut self, name: Name) -> Node {
        Node::Var(name)
    }

    fn equality_test(&mut self, subject: &Node, literal: &Literal, eqv: Equivalence) -> Node {
        Node::Eq(Box::new(subject.clone()), literal.clone(), eqv)
    }

    fn membership_test(&mut self, subject: &Node, set: &[Literal], eqv: Equivalence) -> Node {
        Node::Member(Box::new(subject.clone()), set.to_vec(), eqv)
    }

    fn same_value_test(&mut self, subject: &Node, other: &Node) -> Node {
        Node::Same(Box::new(subject.clone()), Box::new(other.clone()))
    }

    fn predicate_test(&mut self, func: &Node, subject: &Node, bindings: &[(Name, Node)]) -> Node {
        let call = Node::Call(Box::new(func.clone()), Box::new(subject.clone()));
        wrap(bindings, call)
    }

    fn guard_test(&mut self, expr: &Node, bindings: &[(Name, Node)]) -> Node {
        wrap(bindings, Node::Guard(Box::new(expr.clone())))
    }

    fn apply(&mut self, func: &Node, subject: &Node, bindings: &[(Name, Node)]) -> Node {
        let call = Node::Call(Box::new(func.clone()), Box::new(subject.clone()));
        wrap(bindings, call)
    }

    fn if_(&mut self, test: Node, then: Node, otherwise: Node) -> Node {
        Node::If(Box::new(test), Box::new(then), Box::new(otherwise))
    }

    fn let_(&mut self, bindings: Vec<(Name, Node)>, body: Node) -> Node {
        Node::Let(bindings, Box::new(body))
    }

    fn no_match(&mut self) -> Node {
        Node::NoMatch
    }

    fn unbound_value(&mut self) -> Node {
        Node::Unbound
    }

    fn mentions(&self, expr: &Node, name: Name) -> bool {
        matches!(expr, Node::Func(_, names) if names.contains(&name))
    }
}

fn wrap(bindings: &[(Name, Node)], code: Node) -> Node {
    if bindings.is_empty() {
        code
    } else {
        Node::Let(bindings.to_vec(), Box::new(code))
    }
}

pub(crate) fn func(name: &'static str) -> Node {
    Node::Func(name, Vec::new())
}

pub(crate) fn lit(n: i64) -> Pattern<Node> {
    Pattern::Literal(Literal::Int(n))
}

/// Log of generator invocations: `(case, vars, uses)`.
pub(crate) type CallLog = Rc<RefCell<Vec<(usize, Vec<VarVal<Node>>, usize)>>>;

/// A case whose body records its invocation in `log`.
pub(crate) fn case(pattern: Pattern<Node>, id: usize, log: &CallLog) -> Case<'static, TreeEmitter> {
    let log = Rc::clone(log);
    Case::new(pattern, move |_: &mut TreeEmitter, vars: &[VarVal<Node>], uses: usize| {
        log.borrow_mut().push((id, vars.to_vec(), uses));
        Node::Body(id, vars.iter().map(|v| (v.name, v.shared)).collect())
    })
}

pub(crate) fn interner_with(names: &[&str]) -> (StringInterner, Vec<Name>) {
    let interner = StringInterner::new();
    let names = names.iter().map(|s| interner.intern(s)).collect();
    (interner, names)
}
