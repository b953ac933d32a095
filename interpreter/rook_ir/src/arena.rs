//! Arena storage for the flat AST.
//!
//! All node pools draw from paged `rook_arena` storage: nodes are
//! allocated while the parser drives the builder and are only
//! reclaimed when the whole arena is dropped with its interpreter.
//! In debug builds every pool is guarded, so misbehaving construction
//! code can be diagnosed with `check_marks`/`dump_live`.

use rook_arena::Arena;

use crate::ast::{Elsif, Expr, Stmt};
use crate::{ElsifRange, ExprId, ExprRange, Name, NameRange, StmtId, StmtRange};

/// Open a node pool, guarded in debug builds.
fn pool<T>() -> Arena<T> {
    if cfg!(debug_assertions) {
        Arena::guarded(rook_arena::DEFAULT_PAGE_CELLS)
    } else {
        Arena::new()
    }
}

/// Storage for all AST nodes of one interpreter.
pub struct AstArena {
    /// All expressions (indexed by `ExprId`).
    exprs: Arena<Expr>,
    /// All statements (indexed by `StmtId`).
    stmts: Arena<Stmt>,
    /// All elsif arms.
    elsifs: Arena<Elsif>,
    /// Flattened expression-id lists (call arguments).
    expr_lists: Arena<ExprId>,
    /// Flattened statement-id lists (blocks).
    stmt_lists: Arena<StmtId>,
    /// Flattened name lists (parameters, `global` declarations).
    name_lists: Arena<Name>,
}

impl AstArena {
    /// Create empty AST storage.
    pub fn new() -> Self {
        AstArena {
            exprs: pool(),
            stmts: pool(),
            elsifs: pool(),
            expr_lists: pool(),
            stmt_lists: pool(),
            name_lists: pool(),
        }
    }

    // ===== Expressions =====

    /// Allocate an expression, returning its ID.
    #[inline]
    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        ExprId::from_cell(self.exprs.alloc(expr))
    }

    /// Get an expression by ID.
    ///
    /// # Panics
    /// Panics if `id` is not from this arena.
    #[inline]
    #[track_caller]
    pub fn expr(&self, id: ExprId) -> &Expr {
        self.exprs.get(id.cell())
    }

    /// Allocate an expression-id list, returning its range.
    pub fn alloc_expr_list(&mut self, ids: &[ExprId]) -> ExprRange {
        ExprRange::from_cells(self.expr_lists.alloc_extend(ids.iter().copied()))
    }

    /// Get an expression-id list by range.
    #[inline]
    pub fn expr_list(&self, range: ExprRange) -> &[ExprId] {
        self.expr_lists.get_slice(range.cells())
    }

    // ===== Statements =====

    /// Allocate a statement, returning its ID.
    #[inline]
    pub fn alloc_stmt(&mut self, stmt: Stmt) -> StmtId {
        StmtId::from_cell(self.stmts.alloc(stmt))
    }

    /// Get a statement by ID.
    ///
    /// # Panics
    /// Panics if `id` is not from this arena.
    #[inline]
    #[track_caller]
    pub fn stmt(&self, id: StmtId) -> &Stmt {
        self.stmts.get(id.cell())
    }

    /// Allocate a statement sequence (a block), returning its range.
    pub fn alloc_block(&mut self, ids: &[StmtId]) -> StmtRange {
        StmtRange::from_cells(self.stmt_lists.alloc_extend(ids.iter().copied()))
    }

    /// Get a block's statement ids by range.
    #[inline]
    pub fn block(&self, range: StmtRange) -> &[StmtId] {
        self.stmt_lists.get_slice(range.cells())
    }

    // ===== Elsif arms =====

    /// Allocate a contiguous run of elsif arms in source order.
    pub fn alloc_elsifs(&mut self, arms: Vec<Elsif>) -> ElsifRange {
        ElsifRange::from_cells(self.elsifs.alloc_extend(arms))
    }

    /// Get elsif arms by range.
    #[inline]
    pub fn elsif_arms(&self, range: ElsifRange) -> &[Elsif] {
        self.elsifs.get_slice(range.cells())
    }

    // ===== Name lists =====

    /// Allocate a name list, returning its range.
    pub fn alloc_names(&mut self, names: &[Name]) -> NameRange {
        NameRange::from_cells(self.name_lists.alloc_extend(names.iter().copied()))
    }

    /// Get a name list by range.
    #[inline]
    pub fn names(&self, range: NameRange) -> &[Name] {
        self.name_lists.get_slice(range.cells())
    }

    /// Number of expressions allocated.
    #[inline]
    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    /// Number of statements allocated.
    #[inline]
    pub fn stmt_count(&self) -> usize {
        self.stmts.len()
    }
}

impl Default for AstArena {
    fn default() -> Self {
        Self::new()
    }
}
