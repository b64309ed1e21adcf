//! Deferred case bodies.
//!
//! A case can be reached along many decision paths, each with its own
//! binding context. The compiler records every distinct context as a *use*
//! of the case's placeholder; once compilation is done, each placeholder is
//! finalized by invoking the case's code generator exactly once and
//! deriving one site per use from the result.

use casec_ir::Name;
use smallvec::SmallVec;

use crate::driver::CodeGen;
use crate::env::{Binding, BindingEnv};
use crate::Emitter;

/// A variable handed to a case's code generator.
#[derive(Clone, Debug, PartialEq)]
pub struct VarVal<X> {
    pub name: Name,
    /// Expression for the variable's value inside the body.
    ///
    /// For a shared variable this is the subject every path binds it to.
    /// Otherwise it is a reference to `name` itself, which each site binds
    /// before entering the body.
    pub value: X,
    /// Every path reaching the case binds the variable to the same subject.
    pub shared: bool,
    /// A predicate, guard or projection on some path already read it.
    pub used: bool,
}

/// One binding context reaching a case.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Use {
    bindings: SmallVec<[Binding; 4]>,
}

impl Use {
    fn subject_of(&self, name: Name) -> Option<Name> {
        self.bindings
            .iter()
            .find(|b| b.name == name)
            .map(|b| b.subject)
    }

    fn is_used(&self, name: Name) -> bool {
        self.bindings.iter().any(|b| b.name == name && b.used)
    }

    /// Same variables bound to the same subjects, in any order.
    fn same_context(&self, env: &BindingEnv) -> bool {
        self.bindings.len() == env.len()
            && env
                .iter()
                .all(|b| self.subject_of(b.name) == Some(b.subject))
    }
}

/// Uses recorded for every case, indexed by case.
#[derive(Debug, Default)]
pub(crate) struct PlaceholderTable {
    entries: Vec<Vec<Use>>,
}

impl PlaceholderTable {
    pub(crate) fn new(cases: usize) -> Self {
        PlaceholderTable {
            entries: vec![Vec::new(); cases],
        }
    }

    /// Record that `case` is reached under `env` and return the use index.
    ///
    /// Reaching a case again under an equivalent context returns the
    /// existing use.
    pub(crate) fn reach(&mut self, case: usize, env: &BindingEnv) -> usize {
        let uses = &mut self.entries[case];
        if let Some(index) = uses.iter().position(|u| u.same_context(env)) {
            let existing = &mut uses[index];
            for binding in env.iter().filter(|b| b.used) {
                if let Some(b) = existing.bindings.iter_mut().find(|b2| b2.name == binding.name) {
                    b.used = true;
                }
            }
            return index;
        }
        uses.push(Use {
            bindings: env.iter().copied().collect(),
        });
        tracing::trace!(case, uses = uses.len(), "new placeholder use");
        uses.len() - 1
    }

    pub(crate) fn is_reached(&self, case: usize) -> bool {
        !self.entries[case].is_empty()
    }

    /// Number of cases with at least one use.
    pub(crate) fn reached(&self) -> usize {
        self.entries.iter().filter(|uses| !uses.is_empty()).count()
    }

    /// Total number of uses across all cases.
    pub(crate) fn total_uses(&self) -> usize {
        self.entries.iter().map(Vec::len).sum()
    }

    /// Invoke each reached case's generator once and build its sites.
    ///
    /// Generators of unreached cases are dropped without being called.
    pub(crate) fn finalize<'c, E: Emitter>(
        self,
        emitter: &mut E,
        generators: Vec<CodeGen<'c, E>>,
    ) -> Resolved<E::Code> {
        debug_assert_eq!(self.entries.len(), generators.len());
        let sites = self
            .entries
            .into_iter()
            .zip(generators)
            .map(|(uses, codegen)| {
                if uses.is_empty() {
                    Vec::new()
                } else {
                    finalize_case(emitter, &uses, codegen)
                }
            })
            .collect();
        Resolved { sites }
    }
}

/// The code to place at one reach of a case.
#[derive(Clone, Debug)]
pub(crate) struct Site<C> {
    pub(crate) code: C,
    /// Subjects the site reads.
    pub(crate) subjects: SmallVec<[Name; 4]>,
}

/// Finalized sites, indexed by case then use.
#[derive(Debug)]
pub(crate) struct Resolved<C> {
    sites: Vec<Vec<Site<C>>>,
}

impl<C> Resolved<C> {
    pub(crate) fn site(&self, case: usize, use_index: usize) -> &Site<C> {
        &self.sites[case][use_index]
    }
}

fn finalize_case<E: Emitter>(
    emitter: &mut E,
    uses: &[Use],
    codegen: CodeGen<'_, E>,
) -> Vec<Site<E::Code>> {
    let mut names: Vec<Name> = Vec::new();
    for binding in uses.iter().flat_map(|u| u.bindings.iter()) {
        if !names.contains(&binding.name) {
            names.push(binding.name);
        }
    }

    let mut vars = Vec::with_capacity(names.len());
    for name in names {
        let first = uses[0].subject_of(name);
        let shared = uses.iter().all(|u| u.subject_of(name) == first);
        let value = match (shared, first) {
            (true, Some(subject)) => emitter.var(subject),
            _ => emitter.var(name),
        };
        vars.push(VarVal {
            name,
            value,
            shared,
            used: uses.iter().any(|u| u.is_used(name)),
        });
    }

    let code = codegen(emitter, &vars, uses.len());

    let mut sites = Vec::with_capacity(uses.len());
    for use_ in uses {
        let mut lets = Vec::new();
        for var in vars.iter().filter(|v| !v.shared) {
            let value = match use_.subject_of(var.name) {
                Some(subject) => emitter.var(subject),
                None => emitter.unbound_value(),
            };
            lets.push((var.name, value));
        }
        let code = if lets.is_empty() {
            code.clone()
        } else {
            emitter.let_(lets, code.clone())
        };
        sites.push(Site {
            code,
            subjects: use_.bindings.iter().map(|b| b.subject).collect(),
        });
    }
    sites
}
