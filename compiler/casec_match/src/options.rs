//! Compilation options.

/// Knobs for one match compilation.
///
/// The defaults turn every optimization on. Turning one off never changes
/// which case fires, only the shape and size of the generated code.
///
/// # Code size
///
/// After each test the cases behind the head case are compiled again on
/// both sides of the conditional. Branch splitting prunes whatever the test
/// decided, which keeps a list of literal or same-predicate cases linear.
/// Tests it cannot decide (distinct predicates, guards) are not pruned, so
/// in the worst case the number of tests doubles with every such case:
/// `n` cases of two independent predicates each compile to `2^(n+1) - 2`
/// tests. Nothing is shared between the two copies because the emitter
/// hooks have no join point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    /// Fold runs of literal alternatives in an `Or` into one membership test.
    pub fold_memberships: bool,

    /// Simplify later branches with what each emitted test proved, and share
    /// identical projections between branches.
    pub split_branches: bool,

    /// Report cases no decision path reaches.
    pub warn_unreachable: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            fold_memberships: true,
            split_branches: true,
            warn_unreachable: true,
        }
    }
}

impl MatchOptions {
    /// Options with every optimization disabled; the decision code follows
    /// the patterns literally.
    pub fn unoptimized() -> Self {
        Self {
            fold_memberships: false,
            split_branches: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_fold_memberships(self, fold_memberships: bool) -> Self {
        Self {
            fold_memberships,
            ..self
        }
    }

    #[must_use]
    pub fn with_split_branches(self, split_branches: bool) -> Self {
        Self {
            split_branches,
            ..self
        }
    }

    #[must_use]
    pub fn with_warn_unreachable(self, warn_unreachable: bool) -> Self {
        Self {
            warn_unreachable,
            ..self
        }
    }
}
