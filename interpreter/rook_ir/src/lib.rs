//! AST data model and construction API for the Rook runtime.
//!
//! The parser (an external collaborator) drives [`AstBuilder`] to
//! produce a [`Program`]: a flat, arena-allocated AST addressed by
//! typed `u32` ids, an interner holding every identifier and
//! string-literal buffer, and the program's function definitions.
//! Nothing here is freed individually — the whole program is dropped
//! with its interpreter.

mod arena;
pub mod ast;
mod builder;
mod ids;
mod interner;
mod name;

pub use arena::AstArena;
pub use ast::{BinaryOp, Elsif, Expr, ExprKind, Stmt, StmtKind};
pub use builder::{AstBuilder, BuildError, FunctionDef, Module, Program};
pub use ids::{ElsifRange, ExprId, ExprRange, NameRange, StmtId, StmtRange};
pub use interner::Interner;
pub use name::Name;
