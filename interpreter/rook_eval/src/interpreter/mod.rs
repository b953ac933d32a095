//! The interpreter: expression evaluation and the run loop.
//!
//! One `Interpreter` owns a compiled [`Program`] (AST arena, interner,
//! function definitions), the flat function table, and the per-run
//! global scope backed by the execution arena. Execution is
//! single-threaded and synchronous: evaluation is a plain recursive
//! call tree, one host stack frame per script call, at most one
//! execution in flight.
//!
//! Scope context is threaded explicitly as `Option<&mut LocalEnv>`:
//! `None` is file scope (reads and writes hit the global chain
//! directly), `Some` is a call's local environment.

mod builder;
mod exec;

pub use builder::{InterpreterBuilder, RegisterError};

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::trace;

use rook_ir::{BinaryOp, ExprId, ExprKind, ExprRange, Name, Program};
use rook_value::{Flow, StrRef, Value};

use crate::builtins::{stream_value, FileStream};
use crate::environment::{GlobalScope, LocalEnv};
use crate::errors::{
    logical_operand_not_boolean, minus_operand_not_numeric, stray_control_flow, undefined_function,
    undefined_variable, wrong_arg_count, EvalResult,
};
use crate::operators::evaluate_binary;
use crate::print_handler::PrintHandler;

/// A host-supplied native function.
///
/// Receives the interpreter (so natives can reach the print handler or
/// re-enter script code) and the evaluated arguments; returns one
/// value. Indistinguishable from a script function at call sites.
pub type NativeFn = fn(&mut Interpreter, &[Value]) -> EvalResult<Value>;

/// Entry in the flat function table.
#[derive(Copy, Clone)]
pub(crate) enum Function {
    /// Index into the module's function definitions.
    Script(u32),
    /// Built-in or host-registered callback.
    Native(NativeFn),
}

/// Pre-interned names for the built-in stream globals.
#[derive(Copy, Clone)]
pub(crate) struct StreamNames {
    pub(crate) stdin: Name,
    pub(crate) stdout: Name,
    pub(crate) stderr: Name,
}

/// An embeddable script interpreter.
///
/// Build one with [`InterpreterBuilder`]; drive it with
/// [`run`](Interpreter::run); inspect results through
/// [`global`](Interpreter::global) and [`output`](Interpreter::output).
pub struct Interpreter {
    pub(crate) program: Program,
    /// Flat function table: script and native functions side by side.
    pub(crate) functions: FxHashMap<Name, Function>,
    /// Global chain + execution arena; reset at the start of each run.
    pub(crate) globals: GlobalScope,
    pub(crate) print: PrintHandler,
    pub(crate) stream_names: StreamNames,
}

impl std::fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interpreter")
            .field("functions", &self.functions.len())
            .finish_non_exhaustive()
    }
}

impl Interpreter {
    /// Execute the program's top-level statement list.
    ///
    /// Opens (resets) the execution arena, installs the built-in
    /// stream globals, then executes at file scope. Global state stays
    /// readable until the next run resets it.
    pub fn run(&mut self) -> EvalResult<()> {
        self.globals.reset();
        self.install_stream_globals();
        trace!("top-level execution started");
        let body = self.program.module.body;
        match self.exec_block(None, body)? {
            // A top-level `return` just stops execution.
            Flow::Normal | Flow::Return(_) => Ok(()),
            Flow::Break => Err(stray_control_flow("break")),
            Flow::Continue => Err(stray_control_flow("continue")),
        }
    }

    /// Read a global variable after (or during) a run.
    ///
    /// Reading retains: string values come back as an independent
    /// handle.
    pub fn global(&self, name: &str) -> Option<Value> {
        let name = self.program.interner.lookup(name)?;
        let var = self.globals.find(name)?;
        Some(self.globals.value(var).clone())
    }

    /// The configured print handler.
    pub fn print_handler(&self) -> &PrintHandler {
        &self.print
    }

    /// Captured output, when built with a capturing handler.
    pub fn output(&self) -> String {
        self.print.output()
    }

    /// `STDIN`/`STDOUT`/`STDERR` wrap the process streams, tagged with
    /// the file library's name and readable like any other global.
    fn install_stream_globals(&mut self) {
        let StreamNames {
            stdin,
            stdout,
            stderr,
        } = self.stream_names;
        self.globals.define(stdin, stream_value(FileStream::Stdin));
        self.globals.define(stdout, stream_value(FileStream::Stdout));
        self.globals.define(stderr, stream_value(FileStream::Stderr));
    }

    // ===== Expression evaluation =====

    /// Evaluate one expression in the given scope context.
    pub(crate) fn eval_expr(
        &mut self,
        env: Option<&mut LocalEnv>,
        id: ExprId,
    ) -> EvalResult<Value> {
        let expr = *self.program.arena.expr(id);
        self.eval_expr_kind(env, expr.kind)
            .map_err(|e| e.with_line(expr.line))
    }

    fn eval_expr_kind(
        &mut self,
        mut env: Option<&mut LocalEnv>,
        kind: ExprKind,
    ) -> EvalResult<Value> {
        match kind {
            ExprKind::Int(n) => Ok(Value::Int(n)),
            ExprKind::Double(d) => Ok(Value::Double(d)),
            ExprKind::Bool(b) => Ok(Value::Bool(b)),
            ExprKind::Null => Ok(Value::Null),
            // A literal wraps the AST-owned buffer; no bytes are copied.
            ExprKind::Str(name) => Ok(Value::Str(StrRef::literal(
                self.program.interner.buffer(name),
            ))),
            ExprKind::Ident(name) => self.eval_identifier(env.as_deref(), name),
            ExprKind::Assign { target, operand } => self.eval_assign(env, target, operand),
            ExprKind::Binary { op, lhs, rhs } => {
                if matches!(op, BinaryOp::And | BinaryOp::Or) {
                    self.eval_logical(env, op, lhs, rhs)
                } else {
                    let left = self.eval_expr(env.as_deref_mut(), lhs)?;
                    let right = self.eval_expr(env, rhs)?;
                    evaluate_binary(op, left, right)
                }
            }
            ExprKind::Minus(operand) => {
                let value = self.eval_expr(env, operand)?;
                match value {
                    Value::Int(n) => Ok(Value::Int(n.wrapping_neg())),
                    Value::Double(d) => Ok(Value::Double(-d)),
                    other => Err(minus_operand_not_numeric(other.type_name())),
                }
            }
            ExprKind::Call { callee, args } => self.eval_call(env, callee, args),
        }
    }

    /// Identifier lookup: locals, then referenced globals, inside a
    /// call; the global chain directly at file scope. Reading retains —
    /// the caller now holds an independent copy of the value.
    fn eval_identifier(&self, env: Option<&LocalEnv>, name: Name) -> EvalResult<Value> {
        if let Some(env) = env {
            if let Some(slot) = env.find(name) {
                return Ok(env.value(slot).clone());
            }
            if let Some(var) = self.globals.find_ref(env, name) {
                return Ok(self.globals.value(var).clone());
            }
        } else if let Some(var) = self.globals.find(name) {
            return Ok(self.globals.value(var).clone());
        }
        Err(undefined_variable(self.program.interner.resolve(name)))
    }

    /// Assignment: evaluate the right-hand side first, then resolve or
    /// implicitly create the binding. Overwriting drops (releases) the
    /// old value inside the scope; the returned value is the extra
    /// retain backing the assignment expression's own result.
    fn eval_assign(
        &mut self,
        mut env: Option<&mut LocalEnv>,
        target: Name,
        operand: ExprId,
    ) -> EvalResult<Value> {
        let value = self.eval_expr(env.as_deref_mut(), operand)?;
        match env {
            Some(env) => {
                if let Some(slot) = env.find(target) {
                    env.assign(slot, value.clone());
                } else if let Some(var) = self.globals.find_ref(env, target) {
                    self.globals.assign(var, value.clone());
                } else {
                    // Implicit declaration: a new local, shadowing any
                    // same-named global the scope never asked to see.
                    env.define(target, value.clone());
                }
            }
            None => {
                if let Some(var) = self.globals.find(target) {
                    self.globals.assign(var, value.clone());
                } else {
                    self.globals.define(target, value.clone());
                }
            }
        }
        Ok(value)
    }

    /// Short-circuit `&&`/`||`: the right operand only runs when the
    /// left does not already determine the result. Both operands must
    /// be boolean.
    fn eval_logical(
        &mut self,
        mut env: Option<&mut LocalEnv>,
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
    ) -> EvalResult<Value> {
        let left = self.eval_expr(env.as_deref_mut(), lhs)?;
        let Some(left_bool) = left.as_bool() else {
            return Err(logical_operand_not_boolean(op.as_symbol(), left.type_name()));
        };
        match (op, left_bool) {
            (BinaryOp::And, false) => Ok(Value::Bool(false)),
            (BinaryOp::Or, true) => Ok(Value::Bool(true)),
            _ => {
                let right = self.eval_expr(env, rhs)?;
                match right.as_bool() {
                    Some(b) => Ok(Value::Bool(b)),
                    None => Err(logical_operand_not_boolean(
                        op.as_symbol(),
                        right.type_name(),
                    )),
                }
            }
        }
    }

    /// Function call: resolve in the flat table, evaluate arguments in
    /// the caller's scope, then dispatch.
    fn eval_call(
        &mut self,
        mut env: Option<&mut LocalEnv>,
        callee: Name,
        args: ExprRange,
    ) -> EvalResult<Value> {
        let Some(function) = self.functions.get(&callee).copied() else {
            return Err(undefined_function(self.program.interner.resolve(callee)));
        };
        let mut values: SmallVec<[Value; 8]> = SmallVec::with_capacity(args.len());
        for i in 0..args.len() {
            let arg = self.program.arena.expr_list(args)[i];
            values.push(self.eval_expr(env.as_deref_mut(), arg)?);
        }
        trace!(
            function = self.program.interner.resolve(callee),
            argc = values.len(),
            "call",
        );
        match function {
            Function::Script(index) => self.call_script(index, callee, values),
            Function::Native(f) => f(self, &values),
        }
    }

    /// Call a script function: fresh local environment, positional
    /// parameter binding, body execution, then scope disposal.
    fn call_script(
        &mut self,
        index: u32,
        callee: Name,
        args: SmallVec<[Value; 8]>,
    ) -> EvalResult<Value> {
        let def = self.program.module.functions[index as usize];
        if def.params.len() != args.len() {
            return Err(wrong_arg_count(
                self.program.interner.resolve(callee),
                def.params.len(),
                args.len(),
            ));
        }
        // Ownership of each argument temporary transfers to its
        // parameter binding — no extra retain.
        let mut local = LocalEnv::new();
        for (i, value) in args.into_iter().enumerate() {
            let param = self.program.arena.names(def.params)[i];
            local.define(param, value);
        }
        let flow = self.exec_block(Some(&mut local), def.body)?;
        let result = match flow {
            Flow::Return(value) => value,
            // Falling through without a `return` yields null.
            Flow::Normal => Value::Null,
            Flow::Break => return Err(stray_control_flow("break")),
            Flow::Continue => return Err(stray_control_flow("continue")),
        };
        // `local` drops here: scope disposal releases every string
        // still bound in it, and never the referenced globals.
        Ok(result)
    }
}
