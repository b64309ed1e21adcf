//! Shared harness: compile cases whose bodies report what they saw, run
//! the result, and run the reference matcher on the same input.

use std::cell::Cell;
use std::rc::Rc;

use casec_ir::{Name, Pattern, StringInterner};
use casec_match::{compile, Case, Compiled, MatchError, MatchOptions, VarVal};
use casec_sexp::{EvalError, Evaluator, Form, NaiveMatcher, SexpEmitter, Value};

/// Which case fired and the non-nil variables it saw, sorted by name.
pub type Outcome = Option<(usize, Vec<(Name, Value)>)>;

pub struct Harness {
    pub interner: StringInterner,
    subject: Name,
    list: Name,
    cons: Name,
}

impl Harness {
    pub fn new() -> Self {
        casec_sexp::init_tracing();
        let interner = StringInterner::new();
        let subject = interner.intern("subject");
        let list = interner.intern("list");
        let cons = interner.intern("cons");
        Harness {
            interner,
            subject,
            list,
            cons,
        }
    }

    pub fn name(&self, s: &str) -> Name {
        self.interner.intern(s)
    }

    pub fn func(&self, s: &str) -> Form {
        Form::Function(self.name(s))
    }

    pub fn call(&self, func: &str, args: Vec<Form>) -> Form {
        Form::call(self.name(func), args)
    }

    /// `(list 'case (cons 'var value) ...)`
    fn body(list: Name, cons: Name, case: usize, vars: &[VarVal<Form>]) -> Form {
        let mut items = vec![Form::int(i64::try_from(case).unwrap_or(i64::MAX))];
        items.extend(
            vars.iter()
                .map(|var| Form::call(cons, vec![Form::symbol(var.name), var.value.clone()])),
        );
        Form::call(list, items)
    }

    /// One case per pattern, each counting its generator calls in `calls`.
    fn counted_cases(
        &self,
        patterns: &[Pattern<Form>],
        calls: &[Rc<Cell<usize>>],
    ) -> Vec<Case<'static, SexpEmitter>> {
        let (list, cons) = (self.list, self.cons);
        patterns
            .iter()
            .zip(calls)
            .enumerate()
            .map(|(case, (pattern, counter))| {
                let counter = Rc::clone(counter);
                Case::new(
                    pattern.clone(),
                    move |_: &mut SexpEmitter, vars: &[VarVal<Form>], _uses: usize| {
                        counter.set(counter.get() + 1);
                        Self::body(list, cons, case, vars)
                    },
                )
            })
            .collect()
    }

    /// Compile `patterns` and report how often each generator ran.
    pub fn try_compile_counted(
        &self,
        patterns: &[Pattern<Form>],
        options: &MatchOptions,
    ) -> Result<(Compiled<SexpEmitter>, Vec<usize>), MatchError<Form>> {
        let calls: Vec<_> = patterns.iter().map(|_| Rc::new(Cell::new(0))).collect();
        let mut emitter = SexpEmitter::new(&self.interner);
        let compiled = compile(
            &mut emitter,
            &self.interner,
            Form::Var(self.subject),
            self.counted_cases(patterns, &calls),
            options,
        )?;
        Ok((compiled, calls.iter().map(|c| c.get()).collect()))
    }

    pub fn try_compile(
        &self,
        patterns: &[Pattern<Form>],
        options: &MatchOptions,
    ) -> Result<Compiled<SexpEmitter>, MatchError<Form>> {
        self.try_compile_counted(patterns, options)
            .map(|(compiled, _)| compiled)
    }

    pub fn compile(&self, patterns: &[Pattern<Form>], options: &MatchOptions) -> Compiled<SexpEmitter> {
        match self.try_compile(patterns, options) {
            Ok(compiled) => compiled,
            Err(err) => panic!("compile failed: {err}"),
        }
    }

    /// Run compiled code with the subject bound to `value`.
    pub fn run(&self, code: &Form, value: &Value) -> Result<Outcome, EvalError> {
        let evaluator = Evaluator::new(&self.interner);
        let result = evaluator.eval_with(code, &[(self.subject, value.clone())])?;
        Ok(self.decode(&result))
    }

    /// What the reference matcher says should happen.
    #[allow(dead_code, reason = "only the property tests compare against the reference")]
    pub fn expected(&self, patterns: &[Pattern<Form>], value: &Value) -> Result<Outcome, EvalError> {
        let emitter = SexpEmitter::new(&self.interner);
        let evaluator = Evaluator::new(&self.interner);
        let found = NaiveMatcher::new(&emitter, &evaluator).first_match(patterns, value)?;
        Ok(found.map(|(case, bindings)| (case, normalize(bindings))))
    }

    fn decode(&self, result: &Value) -> Outcome {
        if result.is_nil() {
            return None;
        }
        let items = result.to_vec()?;
        let (head, vars) = items.split_first()?;
        let Value::Int(case) = head else {
            panic!("case body returned {}", result.display(&self.interner));
        };
        let bindings = vars
            .iter()
            .filter_map(|var| {
                let cell = var.as_cons()?;
                match &cell.car {
                    Value::Symbol(name) => Some((*name, cell.cdr.clone())),
                    _ => None,
                }
            })
            .collect();
        Some((usize::try_from(*case).unwrap_or(usize::MAX), normalize(bindings)))
    }

    pub fn render(&self, form: &Form) -> String {
        form.display(&self.interner).to_string()
    }
}

fn normalize(mut bindings: Vec<(Name, Value)>) -> Vec<(Name, Value)> {
    bindings.retain(|(_, value)| !value.is_nil());
    bindings.sort_by_key(|(name, _)| *name);
    bindings
}
