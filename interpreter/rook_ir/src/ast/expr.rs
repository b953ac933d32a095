//! Expression node and variants.

use std::fmt;

use super::BinaryOp;
use crate::{ExprId, ExprRange, Name};

/// Expression node.
///
/// Every node carries the source line it came from; diagnostics quote
/// it, so the builder stamps it at construction time.
#[derive(Copy, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub line: u32,
}

impl Expr {
    pub fn new(kind: ExprKind, line: u32) -> Self {
        Expr { kind, line }
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ line {}", self.kind, self.line)
    }
}

/// Expression variants.
///
/// All children are indices into the AST arena, not boxes. String
/// literals are interned `Name`s: the evaluator wraps the interned
/// buffer without copying it.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum ExprKind {
    /// Integer literal: `42`
    Int(i64),

    /// Floating-point literal: `3.14`
    Double(f64),

    /// String literal (interned buffer): `"text"`
    Str(Name),

    /// Boolean literal: `true`, `false`
    Bool(bool),

    /// Null literal: `null`
    Null,

    /// Variable reference.
    Ident(Name),

    /// Assignment; itself an expression yielding the assigned value.
    Assign { target: Name, operand: ExprId },

    /// Binary operation.
    Binary {
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
    },

    /// Unary minus.
    Minus(ExprId),

    /// Function call with positional arguments.
    Call { callee: Name, args: ExprRange },
}
