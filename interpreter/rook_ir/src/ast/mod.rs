//! Flat AST node types.
//!
//! - `expr`: expression node and variants
//! - `stmt`: statement node, elsif arms
//! - `operators`: binary operators
//!
//! All children are indices into the AST arena, never boxes; node
//! lists are ranges into flattened side pools. Nodes live for the
//! interpreter lifetime and are never individually freed.

mod expr;
mod operators;
mod stmt;

pub use expr::{Expr, ExprKind};
pub use operators::BinaryOp;
pub use stmt::{Elsif, Stmt, StmtKind};
