//! Statement node and variants.

use std::fmt;

use crate::{ElsifRange, ExprId, NameRange, StmtRange};

/// Statement node.
#[derive(Copy, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub line: u32,
}

impl Stmt {
    pub fn new(kind: StmtKind, line: u32) -> Self {
        Stmt { kind, line }
    }
}

impl fmt::Debug for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ line {}", self.kind, self.line)
    }
}

/// Statement kinds.
///
/// A block is a bare `StmtRange` — statement sequences carry no scope
/// object of their own; scoping is the environment's concern.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum StmtKind {
    /// Expression statement; the value is discarded.
    Expr(ExprId),

    /// `global name1, name2, ...` declaration.
    Global(NameRange),

    /// Conditional with ordered elsif arms and an optional else block.
    If {
        cond: ExprId,
        then_block: StmtRange,
        elsifs: ElsifRange,
        else_block: Option<StmtRange>,
    },

    /// `while (cond) { body }`
    While { cond: ExprId, body: StmtRange },

    /// `for (init; cond; post) { body }`; each clause may be absent.
    For {
        init: Option<ExprId>,
        cond: Option<ExprId>,
        post: Option<ExprId>,
        body: StmtRange,
    },

    /// `return expr;` / bare `return;`
    Return(Option<ExprId>),

    /// `break;`
    Break,

    /// `continue;`
    Continue,
}

/// One elsif arm.
///
/// Arms live in their own pool; an `If` references its arms as a
/// contiguous `ElsifRange`, preserving source order.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Elsif {
    pub cond: ExprId,
    pub block: StmtRange,
}
