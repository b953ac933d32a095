//! Test modules for the evaluator.
//!
//! Programs are built through the AST construction API — the same
//! surface the external parser targets — then executed with captured
//! output.

mod control_tests;
mod interpreter_tests;

use rook_ir::{AstBuilder, ExprId, Program, StmtId, StmtRange};

use crate::{EvalError, Interpreter, InterpreterBuilder};

/// Build a program with the AST construction API.
fn program(build: impl FnOnce(&mut AstBuilder) -> StmtRange) -> Program {
    let mut b = AstBuilder::new();
    let body = build(&mut b);
    b.finish(body)
}

/// Build an interpreter with captured output.
fn interpreter(build: impl FnOnce(&mut AstBuilder) -> StmtRange) -> Interpreter {
    InterpreterBuilder::new(program(build))
        .capture_output()
        .build()
        .unwrap()
}

/// Build, run, and return the interpreter for inspection.
fn run_ok(build: impl FnOnce(&mut AstBuilder) -> StmtRange) -> Interpreter {
    let mut interp = interpreter(build);
    interp.run().unwrap();
    interp
}

/// Build, run, and return the failure.
fn run_err(build: impl FnOnce(&mut AstBuilder) -> StmtRange) -> EvalError {
    let mut interp = interpreter(build);
    interp.run().unwrap_err()
}

/// `name = expr;` as a statement.
fn set_var(b: &mut AstBuilder, name: &str, expr: ExprId) -> StmtId {
    let target = b.intern(name);
    let assign = b.assign(target, expr);
    b.expr_stmt(assign)
}
