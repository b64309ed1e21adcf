//! Evaluator for generated [`Form`]s.
//!
//! Just enough of a Lisp to run match code: lexical `let`, `if`, and a
//! fixed table of builtins. There are no user-defined functions; a
//! function designator is a symbol naming a builtin.

use casec_ir::{Name, StringInterner};
use casec_stack::ensure_sufficient_stack;
use rustc_hash::FxHashMap;

use crate::{Form, Value};

/// Evaluation failure.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error("unbound variable `{0}`")]
    UnboundVariable(String),
    #[error("undefined function `{0}`")]
    UndefinedFunction(String),
    #[error("`{func}` expects {expected} argument(s), got {got}")]
    WrongArity {
        func: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("`{func}`: wrong type argument {value}")]
    WrongType { func: &'static str, value: String },
    #[error("integer overflow in `{0}`")]
    Overflow(&'static str),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Builtin {
    Car,
    Cdr,
    CarSafe,
    CdrSafe,
    Consp,
    Integerp,
    Symbolp,
    Stringp,
    Numberp,
    Null,
    Eq,
    Eql,
    Equal,
    Memq,
    Memql,
    Member,
    List,
    Cons,
    Add,
    Sub,
    Lt,
    Gt,
    NumEq,
    OnePlus,
    Funcall,
}

const BUILTINS: &[(&str, Builtin)] = &[
    ("car", Builtin::Car),
    ("cdr", Builtin::Cdr),
    ("car-safe", Builtin::CarSafe),
    ("cdr-safe", Builtin::CdrSafe),
    ("consp", Builtin::Consp),
    ("integerp", Builtin::Integerp),
    ("symbolp", Builtin::Symbolp),
    ("stringp", Builtin::Stringp),
    ("numberp", Builtin::Numberp),
    ("null", Builtin::Null),
    ("not", Builtin::Null),
    ("eq", Builtin::Eq),
    ("eql", Builtin::Eql),
    ("equal", Builtin::Equal),
    ("memq", Builtin::Memq),
    ("memql", Builtin::Memql),
    ("member", Builtin::Member),
    ("list", Builtin::List),
    ("cons", Builtin::Cons),
    ("+", Builtin::Add),
    ("-", Builtin::Sub),
    ("<", Builtin::Lt),
    (">", Builtin::Gt),
    ("=", Builtin::NumEq),
    ("1+", Builtin::OnePlus),
    ("funcall", Builtin::Funcall),
];

impl Builtin {
    fn name(self) -> &'static str {
        BUILTINS
            .iter()
            .find(|(_, b)| *b == self)
            .map_or("?", |&(name, _)| name)
    }

    /// Exact argument count, `None` for variadic builtins.
    fn arity(self) -> Option<usize> {
        match self {
            Builtin::List | Builtin::Add | Builtin::Sub | Builtin::Funcall => None,
            Builtin::Car
            | Builtin::Cdr
            | Builtin::CarSafe
            | Builtin::CdrSafe
            | Builtin::Consp
            | Builtin::Integerp
            | Builtin::Symbolp
            | Builtin::Stringp
            | Builtin::Numberp
            | Builtin::Null
            | Builtin::OnePlus => Some(1),
            Builtin::Eq
            | Builtin::Eql
            | Builtin::Equal
            | Builtin::Memq
            | Builtin::Memql
            | Builtin::Member
            | Builtin::Cons
            | Builtin::Lt
            | Builtin::Gt
            | Builtin::NumEq => Some(2),
        }
    }
}

/// Lexical variables, innermost last.
type Scope = Vec<(Name, Value)>;

/// Evaluates [`Form`]s against the builtin table.
pub struct Evaluator<'i> {
    interner: &'i StringInterner,
    builtins: FxHashMap<Name, Builtin>,
}

impl<'i> Evaluator<'i> {
    pub fn new(interner: &'i StringInterner) -> Self {
        let builtins = BUILTINS
            .iter()
            .map(|&(name, builtin)| (interner.intern(name), builtin))
            .collect();
        Evaluator { interner, builtins }
    }

    /// Evaluate a closed form.
    pub fn eval(&self, form: &Form) -> Result<Value, EvalError> {
        self.eval_with(form, &[])
    }

    /// Evaluate `form` with `bindings` in scope.
    pub fn eval_with(&self, form: &Form, bindings: &[(Name, Value)]) -> Result<Value, EvalError> {
        let mut scope: Scope = bindings.to_vec();
        self.eval_in(form, &mut scope)
    }

    fn eval_in(&self, form: &Form, scope: &mut Scope) -> Result<Value, EvalError> {
        ensure_sufficient_stack(|| match form {
            Form::Var(name) => scope
                .iter()
                .rev()
                .find(|(var, _)| var == name)
                .map(|(_, value)| value.clone())
                .ok_or_else(|| EvalError::UnboundVariable(self.interner.lookup(*name).to_owned())),
            Form::Quote(value) => Ok(value.clone()),
            Form::Function(name) => Ok(Value::Symbol(*name)),
            Form::Call(func, args) => {
                let builtin = self.builtin(*func)?;
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.eval_in(arg, scope)?);
                }
                self.call(builtin, values)
            }
            Form::If(test, then, otherwise) => {
                if self.eval_in(test, scope)?.is_truthy() {
                    self.eval_in(then, scope)
                } else {
                    self.eval_in(otherwise, scope)
                }
            }
            Form::Let(bindings, body) => {
                let mut values = Vec::with_capacity(bindings.len());
                for (name, value) in bindings {
                    values.push((*name, self.eval_in(value, scope)?));
                }
                let depth = scope.len();
                scope.extend(values);
                let result = self.eval_in(body, scope);
                scope.truncate(depth);
                result
            }
        })
    }

    fn builtin(&self, name: Name) -> Result<Builtin, EvalError> {
        self.builtins
            .get(&name)
            .copied()
            .ok_or_else(|| EvalError::UndefinedFunction(self.interner.lookup(name).to_owned()))
    }

    fn wrong_type(&self, builtin: Builtin, value: &Value) -> EvalError {
        EvalError::WrongType {
            func: builtin.name(),
            value: value.display(self.interner).to_string(),
        }
    }

    fn int(&self, builtin: Builtin, value: &Value) -> Result<i64, EvalError> {
        match value {
            Value::Int(n) => Ok(*n),
            _ => Err(self.wrong_type(builtin, value)),
        }
    }

    fn call(&self, builtin: Builtin, args: Vec<Value>) -> Result<Value, EvalError> {
        if let Some(expected) = builtin.arity() {
            if args.len() != expected {
                return Err(EvalError::WrongArity {
                    func: builtin.name(),
                    expected,
                    got: args.len(),
                });
            }
        }
        tracing::trace!(func = builtin.name(), args = args.len(), "builtin call");

        let value = match builtin {
            Builtin::Car | Builtin::Cdr => match &args[0] {
                Value::Cons(cell) if builtin == Builtin::Car => cell.car.clone(),
                Value::Cons(cell) => cell.cdr.clone(),
                v if v.is_nil() => Value::nil(),
                v => return Err(self.wrong_type(builtin, v)),
            },
            Builtin::CarSafe => args[0]
                .as_cons()
                .map_or_else(Value::nil, |cell| cell.car.clone()),
            Builtin::CdrSafe => args[0]
                .as_cons()
                .map_or_else(Value::nil, |cell| cell.cdr.clone()),
            Builtin::Consp => Value::from_bool(matches!(args[0], Value::Cons(_))),
            Builtin::Integerp => Value::from_bool(matches!(args[0], Value::Int(_))),
            Builtin::Symbolp => Value::from_bool(matches!(args[0], Value::Symbol(_))),
            Builtin::Stringp => Value::from_bool(matches!(args[0], Value::Str(_))),
            Builtin::Numberp => {
                Value::from_bool(matches!(args[0], Value::Int(_) | Value::Float(_)))
            }
            Builtin::Null => Value::from_bool(args[0].is_nil()),
            Builtin::Eq => Value::from_bool(args[0].is_eq(&args[1])),
            Builtin::Eql => Value::from_bool(args[0].is_eql(&args[1])),
            Builtin::Equal => Value::from_bool(args[0].is_equal(&args[1])),
            Builtin::Memq | Builtin::Memql | Builtin::Member => {
                self.member(builtin, &args[0], &args[1])?
            }
            Builtin::List => Value::list(args),
            Builtin::Cons => {
                let mut args = args.into_iter();
                let car = args.next().unwrap_or_else(Value::nil);
                let cdr = args.next().unwrap_or_else(Value::nil);
                Value::cons(car, cdr)
            }
            Builtin::Add => {
                let mut sum: i64 = 0;
                for arg in &args {
                    sum = sum
                        .checked_add(self.int(builtin, arg)?)
                        .ok_or(EvalError::Overflow("+"))?;
                }
                Value::Int(sum)
            }
            Builtin::Sub => self.subtract(&args)?,
            Builtin::Lt | Builtin::Gt | Builtin::NumEq => {
                let (a, b) = (self.int(builtin, &args[0])?, self.int(builtin, &args[1])?);
                Value::from_bool(match builtin {
                    Builtin::Lt => a < b,
                    Builtin::Gt => a > b,
                    _ => a == b,
                })
            }
            Builtin::OnePlus => Value::Int(
                self.int(builtin, &args[0])?
                    .checked_add(1)
                    .ok_or(EvalError::Overflow("1+"))?,
            ),
            Builtin::Funcall => {
                let mut args = args.into_iter();
                let Some(func) = args.next() else {
                    return Err(EvalError::WrongArity {
                        func: "funcall",
                        expected: 1,
                        got: 0,
                    });
                };
                match func {
                    Value::Symbol(name) => return self.call(self.builtin(name)?, args.collect()),
                    other => return Err(self.wrong_type(builtin, &other)),
                }
            }
        };
        Ok(value)
    }

    /// The tail of `list` starting at the first element equal to `item`.
    fn member(&self, builtin: Builtin, item: &Value, list: &Value) -> Result<Value, EvalError> {
        let mut cursor = list;
        loop {
            match cursor {
                Value::Cons(cell) => {
                    let found = match builtin {
                        Builtin::Memq => item.is_eq(&cell.car),
                        Builtin::Memql => item.is_eql(&cell.car),
                        _ => item.is_equal(&cell.car),
                    };
                    if found {
                        return Ok(cursor.clone());
                    }
                    cursor = &cell.cdr;
                }
                v if v.is_nil() => return Ok(Value::nil()),
                v => return Err(self.wrong_type(builtin, v)),
            }
        }
    }

    fn subtract(&self, args: &[Value]) -> Result<Value, EvalError> {
        let overflow = || EvalError::Overflow("-");
        match args {
            [] => Ok(Value::Int(0)),
            [only] => Ok(Value::Int(
                self.int(Builtin::Sub, only)?.checked_neg().ok_or_else(overflow)?,
            )),
            [first, rest @ ..] => {
                let mut total = self.int(Builtin::Sub, first)?;
                for arg in rest {
                    total = total
                        .checked_sub(self.int(Builtin::Sub, arg)?)
                        .ok_or_else(overflow)?;
                }
                Ok(Value::Int(total))
            }
        }
    }
}
