//! Tree-walking evaluator and statement executor for the Rook runtime.
//!
//! This crate is the embedding surface of the runtime:
//!
//! - [`InterpreterBuilder`] configures an interpreter over a compiled
//!   [`rook_ir::Program`] (execution-arena page size, output capture,
//!   host native functions).
//! - [`Interpreter::run`] executes the top-level statement list at
//!   file scope, with the global chain living in the per-run
//!   execution arena.
//! - [`evaluate_binary`] and the environment types are exposed for
//!   hosts that need finer-grained evaluation.
//!
//! Execution is single-threaded, synchronous, and fail-fast: every
//! detected misuse propagates as an [`EvalError`] with the source line
//! attached; there is no recovery inside the runtime.

mod builtins;
mod environment;
pub mod errors;
mod interpreter;
mod operators;
mod print_handler;

pub use builtins::NATIVE_LIB_NAME;
pub use environment::{GlobalScope, LocalEnv};
pub use interpreter::{Interpreter, InterpreterBuilder, NativeFn, RegisterError};
pub use operators::evaluate_binary;
pub use print_handler::PrintHandler;

// Re-export the shared value model for embedders.
pub use rook_value::{EvalError, EvalErrorKind, EvalResult, Flow, NativePointer, StrRef, Value};

#[cfg(test)]
mod tests;
