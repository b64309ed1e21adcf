//! Per-branch binding environment.
//!
//! Maps each pattern variable bound so far on a decision path to the subject
//! variable holding its value. Environments are values: extending or marking
//! one returns a new environment, so a branch can be fanned out into
//! several alternatives without the alternatives seeing each other's
//! bindings.

use casec_ir::Name;
use smallvec::SmallVec;

/// One pattern variable and the subject it is bound to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Binding {
    /// The pattern variable.
    pub name: Name,
    /// The (generated) subject variable holding its value.
    pub subject: Name,
    /// Set once a predicate, guard or projection on this path reads the
    /// variable.
    pub used: bool,
}

/// Result of [`BindingEnv::extend`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Extension {
    /// The name was unbound; here is the extended environment.
    Fresh(BindingEnv),
    /// The name is already bound to this subject. The caller must test the
    /// new subject against it instead of rebinding.
    Existing(Name),
}

/// Ordered bindings of one decision path.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BindingEnv {
    bindings: SmallVec<[Binding; 4]>,
}

impl BindingEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, name: Name) -> Option<&Binding> {
        self.bindings.iter().find(|b| b.name == name)
    }

    /// Bind `name` to `subject`, or report the existing binding.
    ///
    /// A repeated name never produces a second binding: the decision
    /// compiler turns it into an equality test against the subject returned
    /// in [`Extension::Existing`].
    pub fn extend(&self, name: Name, subject: Name) -> Extension {
        if let Some(existing) = self.lookup(name) {
            return Extension::Existing(existing.subject);
        }
        let mut env = self.clone();
        env.push_unchecked(Binding {
            name,
            subject,
            used: false,
        });
        Extension::Fresh(env)
    }

    /// Return a copy of this environment with `name` flagged as used.
    ///
    /// Marking an unbound name is a no-op.
    #[must_use]
    pub fn mark_used(&self, name: Name) -> BindingEnv {
        let mut env = self.clone();
        if let Some(binding) = env.bindings.iter_mut().find(|b| b.name == name) {
            binding.used = true;
        }
        env
    }

    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = Name> + '_ {
        self.bindings.iter().map(|b| b.name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Append a binding for a name that must not be bound yet.
    ///
    /// # Panics
    /// Panics if `binding.name` is already bound. Rebinding a variable on one
    /// path is an internal compiler bug: the only way in is [`extend`],
    /// which converts repeats into equality tests.
    ///
    /// [`extend`]: Self::extend
    fn push_unchecked(&mut self, binding: Binding) {
        assert!(
            self.lookup(binding.name).is_none(),
            "non-linear binding of {:?} reached the environment",
            binding.name
        );
        self.bindings.push(binding);
    }
}
