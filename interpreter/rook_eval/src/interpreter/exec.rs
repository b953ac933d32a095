//! Statement execution and control-flow propagation.
//!
//! Executing a list runs each statement in order and halts at the
//! first non-[`Flow::Normal`] result, handing it upward unchanged —
//! `return`, `break`, and `continue` unwind nested statement lists
//! this way, with no exception machinery. Loops absorb `Break` and
//! `Continue`; calls absorb `Return`.

use tracing::trace;

use rook_ir::{ElsifRange, ExprId, NameRange, StmtId, StmtKind, StmtRange};
use rook_value::{Flow, Value};

use crate::environment::LocalEnv;
use crate::errors::{condition_not_boolean, global_outside_function, undefined_global, EvalResult};
use crate::interpreter::Interpreter;

impl Interpreter {
    /// Execute a statement list, propagating the first non-normal
    /// result unchanged.
    pub(crate) fn exec_block(
        &mut self,
        mut env: Option<&mut LocalEnv>,
        block: StmtRange,
    ) -> EvalResult<Flow> {
        for i in 0..block.len() {
            let id = self.program.arena.block(block)[i];
            let flow = self.exec_stmt(env.as_deref_mut(), id)?;
            if !flow.is_normal() {
                return Ok(flow);
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_stmt(&mut self, env: Option<&mut LocalEnv>, id: StmtId) -> EvalResult<Flow> {
        let stmt = *self.program.arena.stmt(id);
        trace!(line = stmt.line, "execute statement");
        let result = match stmt.kind {
            StmtKind::Expr(expr) => {
                // Evaluate and discard; a string temporary drops here,
                // which is its release.
                self.eval_expr(env, expr)?;
                Ok(Flow::Normal)
            }
            StmtKind::Global(names) => self.exec_global(env, names),
            StmtKind::If {
                cond,
                then_block,
                elsifs,
                else_block,
            } => self.exec_if(env, cond, then_block, elsifs, else_block),
            StmtKind::While { cond, body } => self.exec_while(env, cond, body),
            StmtKind::For {
                init,
                cond,
                post,
                body,
            } => self.exec_for(env, init, cond, post, body),
            StmtKind::Return(value) => {
                let value = match value {
                    Some(expr) => self.eval_expr(env, expr)?,
                    None => Value::Null,
                };
                Ok(Flow::Return(value))
            }
            StmtKind::Break => Ok(Flow::Break),
            StmtKind::Continue => Ok(Flow::Continue),
        };
        result.map_err(|e| e.with_line(stmt.line))
    }

    /// `global a, b, c;` — install a reference per name not already
    /// referenced in this scope (idempotent). Only valid inside a
    /// call, and only for globals that exist.
    fn exec_global(&mut self, env: Option<&mut LocalEnv>, names: NameRange) -> EvalResult<Flow> {
        let Some(env) = env else {
            return Err(global_outside_function());
        };
        for i in 0..names.len() {
            let name = self.program.arena.names(names)[i];
            if self.globals.find_ref(env, name).is_some() {
                continue;
            }
            let Some(var) = self.globals.find(name) else {
                return Err(undefined_global(self.program.interner.resolve(name)));
            };
            self.globals.add_ref(env, var);
        }
        Ok(Flow::Normal)
    }

    /// Conditions must be boolean; anything else is fatal.
    fn eval_condition(
        &mut self,
        env: Option<&mut LocalEnv>,
        construct: &'static str,
        cond: ExprId,
    ) -> EvalResult<bool> {
        let value = self.eval_expr(env, cond)?;
        value
            .as_bool()
            .ok_or_else(|| condition_not_boolean(construct, value.type_name()))
    }

    /// `if`/`elsif`/`else`. The elsif chain scans in source order; the
    /// first true arm runs and scanning stops there whatever that
    /// arm's result — arms are mutually exclusive, not fall-through.
    fn exec_if(
        &mut self,
        mut env: Option<&mut LocalEnv>,
        cond: ExprId,
        then_block: StmtRange,
        elsifs: ElsifRange,
        else_block: Option<StmtRange>,
    ) -> EvalResult<Flow> {
        if self.eval_condition(env.as_deref_mut(), "if", cond)? {
            return self.exec_block(env, then_block);
        }
        let mut flow = Flow::Normal;
        let mut executed = false;
        for i in 0..elsifs.len() {
            let arm = self.program.arena.elsif_arms(elsifs)[i];
            if self.eval_condition(env.as_deref_mut(), "elsif", arm.cond)? {
                flow = self.exec_block(env.as_deref_mut(), arm.block)?;
                executed = true;
                break;
            }
        }
        if !executed && flow.is_normal() {
            if let Some(block) = else_block {
                flow = self.exec_block(env, block)?;
            }
        }
        Ok(flow)
    }

    /// `while`: `Return` unwinds past the loop, `Break` stops it
    /// yielding `Normal`, `Continue` proceeds to the next condition
    /// check.
    fn exec_while(
        &mut self,
        mut env: Option<&mut LocalEnv>,
        cond: ExprId,
        body: StmtRange,
    ) -> EvalResult<Flow> {
        loop {
            if !self.eval_condition(env.as_deref_mut(), "while", cond)? {
                return Ok(Flow::Normal);
            }
            match self.exec_block(env.as_deref_mut(), body)? {
                flow @ Flow::Return(_) => return Ok(flow),
                Flow::Break => return Ok(Flow::Normal),
                Flow::Continue | Flow::Normal => {}
            }
        }
    }

    /// `for`: `init` once, then condition / body / `post` per
    /// iteration with the same signal handling as `while`. An absent
    /// condition is always true — only `break` or `return` leaves the
    /// loop then.
    fn exec_for(
        &mut self,
        mut env: Option<&mut LocalEnv>,
        init: Option<ExprId>,
        cond: Option<ExprId>,
        post: Option<ExprId>,
        body: StmtRange,
    ) -> EvalResult<Flow> {
        if let Some(init) = init {
            self.eval_expr(env.as_deref_mut(), init)?;
        }
        loop {
            let looping = match cond {
                Some(cond) => self.eval_condition(env.as_deref_mut(), "for", cond)?,
                None => true,
            };
            if !looping {
                return Ok(Flow::Normal);
            }
            match self.exec_block(env.as_deref_mut(), body)? {
                flow @ Flow::Return(_) => return Ok(flow),
                Flow::Break => return Ok(Flow::Normal),
                Flow::Continue | Flow::Normal => {}
            }
            if let Some(post) = post {
                self.eval_expr(env.as_deref_mut(), post)?;
            }
        }
    }
}
