//! Runtime values, reference-counted strings, and evaluation errors
//! for the Rook runtime.
//!
//! This crate holds everything the evaluator and its host share:
//! the [`Value`] model, the string handle [`StrRef`] with its
//! deterministic retain/release discipline, opaque [`NativePointer`]s,
//! the statement-result signal [`Flow`], and the [`EvalError`]
//! taxonomy with its constructor functions.

pub mod errors;
mod flow;
mod native;
mod strref;
mod value;

pub use errors::{EvalError, EvalErrorKind, EvalResult};
pub use flow::Flow;
pub use native::NativePointer;
pub use strref::StrRef;
pub use value::Value;
