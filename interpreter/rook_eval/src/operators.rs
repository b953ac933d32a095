//! Binary operator implementations.
//!
//! Direct enum-based dispatch: the type set is fixed, so pattern
//! matching beats trait objects and keeps the promotion rules
//! exhaustively checked. Operands arrive by value — a consumed string
//! operand drops here, which is the release the refcount discipline
//! requires for operator temporaries.
//!
//! Promotion rules: int⊗int stays int (comparisons yield boolean); if
//! either side is double, both are treated as double. Booleans compare
//! with `==`/`!=` only. String `+` concatenates, stringifying the
//! right side. Null supports `==`/`!=` identity checks only.

use rook_ir::BinaryOp;

use crate::errors::{
    binary_type_mismatch, division_by_zero, invalid_null_comparison, modulo_by_zero, EvalResult,
};
use rook_value::{StrRef, Value};

/// Evaluate a binary operation over already-evaluated operands.
///
/// `And`/`Or` never reach this point — the evaluator short-circuits
/// them before the right operand exists.
pub fn evaluate_binary(op: BinaryOp, left: Value, right: Value) -> EvalResult<Value> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => eval_int_binary(op, a, b),
        (Value::Double(a), Value::Double(b)) => eval_double_binary(op, a, b),
        #[expect(clippy::cast_precision_loss, reason = "int operands promote to double")]
        (Value::Int(a), Value::Double(b)) => eval_double_binary(op, a as f64, b),
        #[expect(clippy::cast_precision_loss, reason = "int operands promote to double")]
        (Value::Double(a), Value::Int(b)) => eval_double_binary(op, a, b as f64),
        (Value::Bool(a), Value::Bool(b)) => eval_bool_binary(op, a, b),
        // String + anything stringifies the right side, including null.
        (Value::Str(a), right) if op == BinaryOp::Add => Ok(concat(&a, &right)),
        (Value::Str(a), Value::Str(b)) if op.is_comparison() => eval_string_compare(op, &a, &b),
        (left, right) if (left.is_null() || right.is_null()) && op.is_comparison() => {
            eval_null_compare(op, &left, &right)
        }
        (left, right) => Err(binary_type_mismatch(
            op.as_symbol(),
            left.type_name(),
            right.type_name(),
        )),
    }
}

/// Concatenate a string with the stringified right operand into a
/// newly owned buffer. Both inputs were moved in and drop with this
/// frame — their release.
fn concat(left: &StrRef, right: &Value) -> Value {
    let mut text = String::with_capacity(left.as_str().len());
    text.push_str(left.as_str());
    text.push_str(&right.stringify());
    Value::Str(StrRef::owned(text))
}

/// Binary operations on two ints.
///
/// Arithmetic uses the wrapping host semantics; only division and
/// modulo by zero are fatal (the documented policy for the open
/// question in the language rules).
fn eval_int_binary(op: BinaryOp, a: i64, b: i64) -> EvalResult<Value> {
    let value = match op {
        BinaryOp::Add => Value::Int(a.wrapping_add(b)),
        BinaryOp::Sub => Value::Int(a.wrapping_sub(b)),
        BinaryOp::Mul => Value::Int(a.wrapping_mul(b)),
        BinaryOp::Div => {
            if b == 0 {
                return Err(division_by_zero());
            }
            Value::Int(a.wrapping_div(b))
        }
        BinaryOp::Mod => {
            if b == 0 {
                return Err(modulo_by_zero());
            }
            Value::Int(a.wrapping_rem(b))
        }
        BinaryOp::Eq => Value::Bool(a == b),
        BinaryOp::NotEq => Value::Bool(a != b),
        BinaryOp::Lt => Value::Bool(a < b),
        BinaryOp::LtEq => Value::Bool(a <= b),
        BinaryOp::Gt => Value::Bool(a > b),
        BinaryOp::GtEq => Value::Bool(a >= b),
        BinaryOp::And | BinaryOp::Or => {
            return Err(binary_type_mismatch(op.as_symbol(), "int", "int"));
        }
    };
    Ok(value)
}

/// Binary operations with at least one double operand.
#[expect(clippy::float_cmp, reason = "script `==` is IEEE 754 equality")]
fn eval_double_binary(op: BinaryOp, a: f64, b: f64) -> EvalResult<Value> {
    let value = match op {
        // IEEE 754 semantics throughout: x/0.0 is ±inf, 0.0/0.0 is NaN.
        BinaryOp::Add => Value::Double(a + b),
        BinaryOp::Sub => Value::Double(a - b),
        BinaryOp::Mul => Value::Double(a * b),
        BinaryOp::Div => Value::Double(a / b),
        BinaryOp::Mod => Value::Double(a % b),
        BinaryOp::Eq => Value::Bool(a == b),
        BinaryOp::NotEq => Value::Bool(a != b),
        BinaryOp::Lt => Value::Bool(a < b),
        BinaryOp::LtEq => Value::Bool(a <= b),
        BinaryOp::Gt => Value::Bool(a > b),
        BinaryOp::GtEq => Value::Bool(a >= b),
        BinaryOp::And | BinaryOp::Or => {
            return Err(binary_type_mismatch(op.as_symbol(), "double", "double"));
        }
    };
    Ok(value)
}

/// Booleans support equality and inequality only.
fn eval_bool_binary(op: BinaryOp, a: bool, b: bool) -> EvalResult<Value> {
    match op {
        BinaryOp::Eq => Ok(Value::Bool(a == b)),
        BinaryOp::NotEq => Ok(Value::Bool(a != b)),
        _ => Err(binary_type_mismatch(op.as_symbol(), "boolean", "boolean")),
    }
}

/// Byte-wise string comparison; both operands drop with the caller's
/// frame after the comparison (their release).
fn eval_string_compare(op: BinaryOp, a: &StrRef, b: &StrRef) -> EvalResult<Value> {
    let ord = a.cmp(b);
    let result = match op {
        BinaryOp::Eq => ord.is_eq(),
        BinaryOp::NotEq => !ord.is_eq(),
        BinaryOp::Lt => ord.is_lt(),
        BinaryOp::LtEq => ord.is_le(),
        BinaryOp::Gt => ord.is_gt(),
        BinaryOp::GtEq => ord.is_ge(),
        _ => return Err(binary_type_mismatch(op.as_symbol(), "string", "string")),
    };
    Ok(Value::Bool(result))
}

/// Null compares by is-null identity, and only with `==`/`!=`.
fn eval_null_compare(op: BinaryOp, left: &Value, right: &Value) -> EvalResult<Value> {
    let both_null = left.is_null() && right.is_null();
    match op {
        BinaryOp::Eq => Ok(Value::Bool(both_null)),
        BinaryOp::NotEq => Ok(Value::Bool(!both_null)),
        _ => Err(invalid_null_comparison(op.as_symbol())),
    }
}
