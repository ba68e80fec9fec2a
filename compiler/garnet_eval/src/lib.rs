#![deny(clippy::arithmetic_side_effects)]
//! Garnet Eval - method dispatch and the runtime session.
//!
//! This crate provides the dynamic half of the object core:
//! - `Runtime`: owns the class table and output sink; entry point for
//!   every method call (`invoke`) and for class/eigenclass definition
//! - `Evaluator`: the callback the runtime uses to run interpreted bodies
//! - `dispatch`: method resolution along eigenclass and superclass chains
//! - Builtin methods of `Kernel` and the core classes
//! - Print handlers for `puts`
//!
//! # Re-exports
//!
//! The object model types from `garnet_object` are re-exported so an
//! evaluator can depend on this crate alone.

mod builtins;
mod call_context;
pub mod dispatch;
mod kernel;
mod print_handler;
mod runtime;

#[cfg(test)]
mod test_helpers;

pub use garnet_object::{
    Arity, BodyId, CallContext, CallSite, ClassKind, ClassRef, ClassTable, Environment,
    EvalError, EvalErrorKind, EvalResult, FunctionValue, Method, TypeTag, Value, Visibility,
};

pub use call_context::Evaluator;
pub use print_handler::{
    buffer_handler, silent_handler, stdout_handler, BufferPrintHandler, PrintHandlerImpl,
    SharedPrintHandler, StdoutPrintHandler,
};
pub use runtime::{Runtime, RuntimeBuilder, DEFAULT_MAX_CALL_DEPTH};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Does nothing unless `RUST_LOG` is set,
/// e.g. `RUST_LOG=garnet_eval=debug` for dispatch and class definition or
/// `RUST_LOG=garnet_eval=trace` for every resolution step.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
