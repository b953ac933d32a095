//! Single import point for evaluation error constructors.
//!
//! The constructors live in `rook_value` next to the error type; this
//! module re-exports them so evaluator code has one place to import
//! from and message wording stays centralized.

pub use rook_value::errors::{
    binary_type_mismatch, condition_not_boolean, division_by_zero, global_outside_function,
    invalid_null_comparison, logical_operand_not_boolean, minus_operand_not_numeric, modulo_by_zero,
    native_error, stray_control_flow, undefined_function, undefined_global, undefined_variable,
    wrong_arg_count,
};
pub use rook_value::{EvalError, EvalErrorKind, EvalResult};
