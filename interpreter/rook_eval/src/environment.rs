//! Variable scoping for the evaluator.
//!
//! Two levels only — there is no nested-block scoping:
//!
//! - **Global scope**: one head-inserted chain of `Variable` cells in
//!   the execution arena, owned by the interpreter, alive for the run.
//! - **Local scope**: one [`LocalEnv`] per active call. Local bindings
//!   use head insertion (push + reverse scan), so a new binding wins
//!   without touching anything in the caller. Dropping the environment
//!   releases every string still bound in it.
//!
//! A local scope sees a global only after an explicit `global`
//! declaration installed a [`GlobalRef`] for it. The ref never owns
//! the value — ownership stays with the global chain, so disposing a
//! local scope must not (and cannot) release referenced globals.

use rook_arena::{Arena, CellId};
use rook_ir::Name;
use rook_value::Value;

/// One global variable binding, chained through the execution arena.
pub(crate) struct Variable {
    name: Name,
    value: Value,
    next: Option<CellId>,
}

/// Non-owning alias from a local scope to a global variable.
pub(crate) struct GlobalRef {
    var: CellId,
    next: Option<CellId>,
}

/// Open an execution-arena pool, guarded in debug builds.
fn pool<T>(page_cells: usize) -> Arena<T> {
    if cfg!(debug_assertions) {
        Arena::guarded(page_cells)
    } else {
        Arena::with_page_size(page_cells)
    }
}

/// The global variable chain plus the execution arena backing it.
///
/// Opened when a run starts; `reset` drops every cell at once between
/// runs, releasing any string values still held by globals.
pub struct GlobalScope {
    /// Execution arena for global variable cells.
    vars: Arena<Variable>,
    /// Execution arena for `global`-declaration reference cells.
    refs: Arena<GlobalRef>,
    /// Head of the global chain (most recently defined global).
    head: Option<CellId>,
}

impl GlobalScope {
    /// Open the execution arena with the given page size.
    pub fn new(page_cells: usize) -> Self {
        GlobalScope {
            vars: pool(page_cells),
            refs: pool(page_cells),
            head: None,
        }
    }

    /// Drop all per-run storage at once.
    pub fn reset(&mut self) {
        self.vars.reset();
        self.refs.reset();
        self.head = None;
    }

    /// Define a new global, shadowing nothing (names are unique: the
    /// evaluator only defines after a failed lookup).
    pub fn define(&mut self, name: Name, value: Value) -> CellId {
        let id = self.vars.alloc(Variable {
            name,
            value,
            next: self.head,
        });
        self.head = Some(id);
        id
    }

    /// Find a global by name.
    pub fn find(&self, name: Name) -> Option<CellId> {
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let var = self.vars.get(id);
            if var.name == name {
                return Some(id);
            }
            cursor = var.next;
        }
        None
    }

    /// Read a global's value.
    #[inline]
    pub fn value(&self, id: CellId) -> &Value {
        &self.vars.get(id).value
    }

    /// Overwrite a global's value; the old value drops here, which is
    /// its release.
    #[inline]
    pub fn assign(&mut self, id: CellId, value: Value) {
        self.vars.get_mut(id).value = value;
    }

    /// Name of a global variable cell.
    #[inline]
    pub fn name_of(&self, id: CellId) -> Name {
        self.vars.get(id).name
    }

    /// Install a reference to `var` into `env`'s reference chain.
    ///
    /// Idempotent: a name already referenced is silently skipped.
    pub fn add_ref(&mut self, env: &mut LocalEnv, var: CellId) {
        if self.find_ref(env, self.name_of(var)).is_some() {
            return;
        }
        let id = self.refs.alloc(GlobalRef {
            var,
            next: env.refs_head,
        });
        env.refs_head = Some(id);
    }

    /// Find a referenced global by name in `env`'s reference chain.
    pub fn find_ref(&self, env: &LocalEnv, name: Name) -> Option<CellId> {
        let mut cursor = env.refs_head;
        while let Some(id) = cursor {
            let gref = self.refs.get(id);
            if self.vars.get(gref.var).name == name {
                return Some(gref.var);
            }
            cursor = gref.next;
        }
        None
    }

    /// Number of live global bindings (diagnostics/tests).
    pub fn binding_count(&self) -> usize {
        let mut count = 0;
        let mut cursor = self.head;
        while let Some(id) = cursor {
            count += 1;
            cursor = self.vars.get(id).next;
        }
        count
    }
}

/// Per-call local scope.
///
/// Owns its bindings; dropping it is the scope disposal that releases
/// every still-live string exactly once.
#[derive(Default)]
pub struct LocalEnv {
    /// Local bindings, newest last; scanned from the back so the most
    /// recent binding for a name wins.
    locals: Vec<(Name, Value)>,
    /// Head of this scope's global-reference chain.
    refs_head: Option<CellId>,
}

impl LocalEnv {
    /// Fresh, empty scope (one per call).
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a value; ownership transfers to the binding, no extra
    /// retain.
    #[inline]
    pub fn define(&mut self, name: Name, value: Value) {
        self.locals.push((name, value));
    }

    /// Find the most recent local binding for `name`.
    #[inline]
    pub fn find(&self, name: Name) -> Option<usize> {
        self.locals.iter().rposition(|(n, _)| *n == name)
    }

    /// Read a binding by slot.
    #[inline]
    pub fn value(&self, slot: usize) -> &Value {
        &self.locals[slot].1
    }

    /// Overwrite a binding; the old value drops here (its release).
    #[inline]
    pub fn assign(&mut self, slot: usize, value: Value) {
        self.locals[slot].1 = value;
    }

    /// Number of local bindings (diagnostics/tests).
    pub fn binding_count(&self) -> usize {
        self.locals.len()
    }
}
