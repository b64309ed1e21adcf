//! Case driver: the public entry points.
//!
//! Binds the subject once, compiles the case list to a decision tree,
//! finalizes each reached case's body exactly once, reports cases nothing
//! reaches, and lowers the result through the caller's [`Emitter`].

use std::fmt;

use casec_ir::{Pattern, StringInterner};

use crate::compile::{check_well_formed, DecisionCompiler, Output};
use crate::lower::Lowering;
use crate::names::NameSupply;
use crate::placeholder::VarVal;
use crate::{Emitter, MatchError, MatchOptions, PatternDiagnostic};

/// A case body generator.
///
/// Called at most once per compilation with the variables the body can see
/// and the number of distinct binding contexts (uses) that reach it.
pub type CodeGen<'c, E> = Box<
    dyn FnOnce(&mut E, &[VarVal<<E as Emitter>::Expr>], usize) -> <E as Emitter>::Code + 'c,
>;

/// One `(pattern, body)` pair.
pub struct Case<'c, E: Emitter> {
    pub pattern: Pattern<E::Expr>,
    codegen: CodeGen<'c, E>,
    allow_unreachable: bool,
}

impl<'c, E: Emitter> Case<'c, E> {
    pub fn new(
        pattern: Pattern<E::Expr>,
        codegen: impl FnOnce(&mut E, &[VarVal<E::Expr>], usize) -> E::Code + 'c,
    ) -> Self {
        Case {
            pattern,
            codegen: Box::new(codegen),
            allow_unreachable: false,
        }
    }

    /// Build a case from an already boxed generator.
    pub fn from_boxed(pattern: Pattern<E::Expr>, codegen: CodeGen<'c, E>) -> Self {
        Case {
            pattern,
            codegen,
            allow_unreachable: false,
        }
    }

    /// Do not warn if this case turns out to be unreachable.
    ///
    /// Meant for catch-all cases a front end appends itself, such as an
    /// error clause after an exhaustive match.
    #[must_use]
    pub fn allow_unreachable(mut self) -> Self {
        self.allow_unreachable = true;
        self
    }
}

impl<E: Emitter> fmt::Debug for Case<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Case")
            .field("pattern", &self.pattern)
            .field("allow_unreachable", &self.allow_unreachable)
            .finish_non_exhaustive()
    }
}

/// Size counters for one compilation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchStats {
    /// Number of input cases.
    pub cases: usize,
    /// Cases reached by at least one decision path.
    pub reached: usize,
    /// Distinct binding contexts across all reached cases.
    pub uses: usize,
    /// Conditional tests in the decision tree.
    pub tests: usize,
    /// Projections compiled.
    pub projections: usize,
    /// Projections left out of the code because nothing read them.
    pub dropped_projections: usize,
}

/// Result of a successful compilation.
pub struct Compiled<E: Emitter> {
    pub code: E::Code,
    /// Warnings, in case order.
    pub diagnostics: Vec<PatternDiagnostic<E::Expr>>,
    pub stats: MatchStats,
}

impl<E: Emitter> fmt::Debug for Compiled<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compiled")
            .field("code", &self.code)
            .field("diagnostics", &self.diagnostics)
            .field("stats", &self.stats)
            .finish()
    }
}

/// Compile `cases` against `subject`.
///
/// The subject is evaluated exactly once, into a generated variable. Cases
/// are tried in order; the first whose pattern matches runs. Each case's
/// generator is invoked at most once, however many decision paths reach it.
///
/// # Errors
/// Returns [`MatchError::MalformedPattern`] for a pattern that cannot be
/// compiled, whether or not its case is reachable.
#[tracing::instrument(level = "debug", skip_all, fields(cases = cases.len()))]
pub fn compile<'c, E: Emitter>(
    emitter: &mut E,
    interner: &StringInterner,
    subject: E::Expr,
    cases: Vec<Case<'c, E>>,
    options: &MatchOptions,
) -> Result<Compiled<E>, MatchError<E::Expr>> {
    let mut patterns = Vec::with_capacity(cases.len());
    let mut generators = Vec::with_capacity(cases.len());
    let mut exempt = Vec::with_capacity(cases.len());
    for case in cases {
        patterns.push(case.pattern);
        generators.push(case.codegen);
        exempt.push(case.allow_unreachable);
    }
    for (case, pattern) in patterns.iter().enumerate() {
        check_well_formed(case, pattern)?;
    }

    // Lives until the bodies are generated, so matches compiled inside them
    // get their own names.
    let names = NameSupply::new(interner);
    let root = names.fresh("val");
    let Output {
        decision,
        placeholders,
        projections,
    } = DecisionCompiler::new(emitter, &names, options, &patterns).run(root)?;

    let mut diagnostics = Vec::new();
    if options.warn_unreachable {
        for (case, pattern) in patterns.iter().enumerate() {
            if !placeholders.is_reached(case) && !exempt[case] {
                tracing::debug!(case, "unreachable case");
                diagnostics.push(PatternDiagnostic::shadowed(case, pattern.clone()));
            }
        }
    }

    let mut stats = MatchStats {
        cases: patterns.len(),
        reached: placeholders.reached(),
        uses: placeholders.total_uses(),
        tests: decision.test_count(),
        projections,
        dropped_projections: 0,
    };

    let resolved = placeholders.finalize(emitter, generators);
    let mut lowering = Lowering::new(emitter, &resolved);
    let body = lowering.lower(&decision);
    stats.dropped_projections = lowering.dropped_projections();
    let code = emitter.let_(vec![(root, subject)], body);

    tracing::debug!(?stats, warnings = diagnostics.len(), "compiled match");
    Ok(Compiled {
        code,
        diagnostics,
        stats,
    })
}

/// Compile parallel lists of patterns and generators.
///
/// # Errors
/// Returns [`MatchError::ArityMismatch`] if the lists differ in length,
/// before anything is compiled; otherwise as [`compile`].
pub fn compile_clauses<'c, E: Emitter>(
    emitter: &mut E,
    interner: &StringInterner,
    subject: E::Expr,
    patterns: Vec<Pattern<E::Expr>>,
    generators: Vec<CodeGen<'c, E>>,
    options: &MatchOptions,
) -> Result<Compiled<E>, MatchError<E::Expr>> {
    if patterns.len() != generators.len() {
        return Err(MatchError::ArityMismatch {
            patterns: patterns.len(),
            generators: generators.len(),
        });
    }
    let cases = patterns
        .into_iter()
        .zip(generators)
        .map(|(pattern, codegen)| Case::from_boxed(pattern, codegen))
        .collect();
    compile(emitter, interner, subject, cases, options)
}
