//! AST construction API.
//!
//! The parser drives one `AstBuilder` per program: it stamps every
//! node with the current source line, flattens node lists into the
//! arena pools, and registers function definitions with the
//! program-wide uniqueness invariant. The builder is threaded
//! explicitly through construction — there is no ambient "current
//! interpreter" state — and is consumed by [`AstBuilder::finish`],
//! which yields the immutable [`Program`].

use rustc_hash::FxHashMap;

use crate::ast::{BinaryOp, Elsif, Expr, ExprKind, Stmt, StmtKind};
use crate::{AstArena, ExprId, Interner, Name, NameRange, StmtId, StmtRange};

/// Construction-time fatal errors.
///
/// These abort compilation: the program is malformed and there is no
/// recovery path, only a diagnostic for the author.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// A function name was registered twice.
    #[error("line {line}: function `{name}` is already defined at line {previous_line}")]
    DuplicateFunction {
        name: String,
        line: u32,
        previous_line: u32,
    },
}

/// One script function definition.
#[derive(Copy, Clone, Debug)]
pub struct FunctionDef {
    pub name: Name,
    pub params: NameRange,
    pub body: StmtRange,
    pub line: u32,
}

/// A finished program: top-level statements plus function definitions.
#[derive(Debug, Default)]
pub struct Module {
    pub body: StmtRange,
    pub functions: Vec<FunctionDef>,
}

/// A complete compiled program with its backing storage.
///
/// Owns the AST arena and the interner for the interpreter lifetime.
pub struct Program {
    pub arena: AstArena,
    pub interner: Interner,
    pub module: Module,
}

/// Factory API for building the AST.
pub struct AstBuilder {
    arena: AstArena,
    interner: Interner,
    /// Source line stamped onto nodes allocated next.
    line: u32,
    functions: Vec<FunctionDef>,
    /// Definition line per registered function name, for diagnostics.
    defined: FxHashMap<Name, u32>,
}

impl AstBuilder {
    /// Create a builder positioned at line 1.
    pub fn new() -> Self {
        AstBuilder {
            arena: AstArena::new(),
            interner: Interner::new(),
            line: 1,
            functions: Vec::new(),
            defined: FxHashMap::default(),
        }
    }

    /// Set the source line stamped onto subsequently built nodes.
    #[inline]
    pub fn set_line(&mut self, line: u32) {
        self.line = line;
    }

    /// Intern an identifier or string-literal buffer.
    #[inline]
    pub fn intern(&mut self, text: &str) -> Name {
        self.interner.intern(text)
    }

    // ===== Expressions =====

    /// `42`
    pub fn int_literal(&mut self, value: i64) -> ExprId {
        self.expr(ExprKind::Int(value))
    }

    /// `3.14`
    pub fn double_literal(&mut self, value: f64) -> ExprId {
        self.expr(ExprKind::Double(value))
    }

    /// `"text"` — the buffer is interned into AST storage.
    pub fn string_literal(&mut self, text: &str) -> ExprId {
        let name = self.interner.intern(text);
        self.expr(ExprKind::Str(name))
    }

    /// `true` / `false`
    pub fn bool_literal(&mut self, value: bool) -> ExprId {
        self.expr(ExprKind::Bool(value))
    }

    /// `null`
    pub fn null_literal(&mut self) -> ExprId {
        self.expr(ExprKind::Null)
    }

    /// Variable reference.
    pub fn identifier(&mut self, name: &str) -> ExprId {
        let name = self.interner.intern(name);
        self.expr(ExprKind::Ident(name))
    }

    /// `target = operand`
    pub fn assign(&mut self, target: Name, operand: ExprId) -> ExprId {
        self.expr(ExprKind::Assign { target, operand })
    }

    /// `lhs op rhs`
    pub fn binary(&mut self, op: BinaryOp, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.expr(ExprKind::Binary { op, lhs, rhs })
    }

    /// `-operand`
    pub fn minus(&mut self, operand: ExprId) -> ExprId {
        self.expr(ExprKind::Minus(operand))
    }

    /// `callee(args...)`
    pub fn call(&mut self, callee: Name, args: &[ExprId]) -> ExprId {
        let args = self.arena.alloc_expr_list(args);
        self.expr(ExprKind::Call { callee, args })
    }

    // ===== Statements =====

    /// Expression statement.
    pub fn expr_stmt(&mut self, expr: ExprId) -> StmtId {
        self.stmt(StmtKind::Expr(expr))
    }

    /// `global name1, name2, ...`
    pub fn global_stmt(&mut self, names: &[Name]) -> StmtId {
        let names = self.arena.alloc_names(names);
        self.stmt(StmtKind::Global(names))
    }

    /// `if (cond) {...} elsif ... else {...}`
    pub fn if_stmt(
        &mut self,
        cond: ExprId,
        then_block: StmtRange,
        elsifs: Vec<Elsif>,
        else_block: Option<StmtRange>,
    ) -> StmtId {
        let elsifs = self.arena.alloc_elsifs(elsifs);
        self.stmt(StmtKind::If {
            cond,
            then_block,
            elsifs,
            else_block,
        })
    }

    /// `while (cond) {...}`
    pub fn while_stmt(&mut self, cond: ExprId, body: StmtRange) -> StmtId {
        self.stmt(StmtKind::While { cond, body })
    }

    /// `for (init; cond; post) {...}`; any clause may be absent.
    pub fn for_stmt(
        &mut self,
        init: Option<ExprId>,
        cond: Option<ExprId>,
        post: Option<ExprId>,
        body: StmtRange,
    ) -> StmtId {
        self.stmt(StmtKind::For {
            init,
            cond,
            post,
            body,
        })
    }

    /// `return expr;` / `return;`
    pub fn return_stmt(&mut self, value: Option<ExprId>) -> StmtId {
        self.stmt(StmtKind::Return(value))
    }

    /// `break;`
    pub fn break_stmt(&mut self) -> StmtId {
        self.stmt(StmtKind::Break)
    }

    /// `continue;`
    pub fn continue_stmt(&mut self) -> StmtId {
        self.stmt(StmtKind::Continue)
    }

    /// Seal an ordered statement sequence into a block.
    pub fn block(&mut self, stmts: &[StmtId]) -> StmtRange {
        self.arena.alloc_block(stmts)
    }

    /// One elsif arm; collect arms in source order for [`Self::if_stmt`].
    pub fn elsif(&self, cond: ExprId, block: StmtRange) -> Elsif {
        Elsif { cond, block }
    }

    // ===== Functions =====

    /// Register a script function definition.
    ///
    /// Function names are unique across the whole program; a second
    /// definition is a construction-time fatal error.
    pub fn define_function(
        &mut self,
        name: Name,
        params: &[Name],
        body: StmtRange,
    ) -> Result<(), BuildError> {
        if let Some(&previous_line) = self.defined.get(&name) {
            return Err(BuildError::DuplicateFunction {
                name: self.interner.resolve(name).to_owned(),
                line: self.line,
                previous_line,
            });
        }
        self.defined.insert(name, self.line);
        let params = self.arena.alloc_names(params);
        self.functions.push(FunctionDef {
            name,
            params,
            body,
            line: self.line,
        });
        Ok(())
    }

    /// Consume the builder, sealing the program.
    pub fn finish(self, body: StmtRange) -> Program {
        Program {
            arena: self.arena,
            interner: self.interner,
            module: Module {
                body,
                functions: self.functions,
            },
        }
    }

    fn expr(&mut self, kind: ExprKind) -> ExprId {
        self.arena.alloc_expr(Expr::new(kind, self.line))
    }

    fn stmt(&mut self, kind: StmtKind) -> StmtId {
        self.arena.alloc_stmt(Stmt::new(kind, self.line))
    }
}

impl Default for AstBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn nodes_are_stamped_with_the_current_line() {
        let mut b = AstBuilder::new();
        b.set_line(3);
        let lhs = b.int_literal(1);
        b.set_line(4);
        let rhs = b.int_literal(2);
        let sum = b.binary(BinaryOp::Add, lhs, rhs);

        let program = b.finish(StmtRange::EMPTY);
        assert_eq!(program.arena.expr(lhs).line, 3);
        assert_eq!(program.arena.expr(rhs).line, 4);
        assert_eq!(program.arena.expr(sum).line, 4);
    }

    #[test]
    fn blocks_preserve_statement_order() {
        let mut b = AstBuilder::new();
        let one = b.int_literal(1);
        let two = b.int_literal(2);
        let s1 = b.expr_stmt(one);
        let s2 = b.expr_stmt(two);
        let block = b.block(&[s1, s2]);

        let program = b.finish(block);
        assert_eq!(program.arena.block(block), &[s1, s2]);
    }

    #[test]
    fn duplicate_function_definition_is_fatal() {
        let mut b = AstBuilder::new();
        let name = b.intern("main");
        let body = b.block(&[]);
        b.set_line(1);
        b.define_function(name, &[], body).unwrap();
        b.set_line(9);
        let err = b.define_function(name, &[], body).unwrap_err();
        assert_eq!(
            err,
            BuildError::DuplicateFunction {
                name: "main".to_owned(),
                line: 9,
                previous_line: 1,
            }
        );
        assert_eq!(
            err.to_string(),
            "line 9: function `main` is already defined at line 1"
        );
    }

    #[test]
    fn call_arguments_are_flattened_in_order() {
        let mut b = AstBuilder::new();
        let callee = b.intern("f");
        let a = b.int_literal(1);
        let c = b.int_literal(3);
        let call = b.call(callee, &[a, c]);

        let program = b.finish(StmtRange::EMPTY);
        let ExprKind::Call { args, .. } = program.arena.expr(call).kind else {
            panic!("expected a call node");
        };
        assert_eq!(program.arena.expr_list(args), &[a, c]);
    }
}
