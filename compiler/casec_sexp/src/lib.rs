//! S-expression back end for the casec match compiler.
//!
//! - [`SexpEmitter`] implements [`casec_match::Emitter`], producing
//!   Lisp-style [`Form`]s.
//! - [`Evaluator`] runs those forms against a small builtin library.
//! - [`NaiveMatcher`] interprets patterns directly, with backtracking. It is
//!   the reference the compiled code is checked against.
//!
//! # Usage
//!
//! ```text
//! let interner = StringInterner::new();
//! let mut emitter = SexpEmitter::new(&interner);
//! let compiled = casec_match::compile(&mut emitter, &interner, subject, cases, &options)?;
//! let result = Evaluator::new(&interner).eval(&compiled.code)?;
//! ```

mod emitter;
mod eval;
mod form;
mod naive;
mod value;

use std::sync::Once;

pub use emitter::SexpEmitter;
pub use eval::{EvalError, Evaluator};
pub use form::{Form, FormDisplay};
pub use naive::{Bindings, NaiveMatcher};
pub use value::{Cons, Value, ValueDisplay};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing subscriber for debugging.
///
/// Call this at the start of a test or tool to enable tracing output.
/// Controlled by the `RUST_LOG` environment variable:
/// - `RUST_LOG=casec_match=debug` - compilation summaries
/// - `RUST_LOG=casec_match=trace` - emitted tests and branch splits
/// - `RUST_LOG=casec_sexp=trace` - evaluator builtin calls
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true).with_test_writer())
                .with(filter)
                .init();
        }
    });
}
