//! Interpreter configuration and construction.
//!
//! The builder is the embedding configuration surface: execution-arena
//! page size, output destination, and host native functions. `build`
//! merges script functions, built-ins, and host natives into the one
//! flat function table, enforcing program-wide name uniqueness.

use rustc_hash::FxHashMap;

use rook_arena::DEFAULT_PAGE_CELLS;
use rook_ir::Program;

use crate::builtins;
use crate::environment::GlobalScope;
use crate::interpreter::{Function, Interpreter, NativeFn, StreamNames};
use crate::print_handler::PrintHandler;

/// Errors merging the function table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegisterError {
    /// A native registration collides with a script function, a
    /// built-in, or another native.
    #[error("function `{name}` is already defined")]
    DuplicateFunction { name: String },
}

/// Builder for [`Interpreter`].
pub struct InterpreterBuilder {
    program: Program,
    exec_page_cells: usize,
    print: PrintHandler,
    natives: Vec<(String, NativeFn)>,
}

impl InterpreterBuilder {
    /// Start from a compiled program.
    pub fn new(program: Program) -> Self {
        InterpreterBuilder {
            program,
            exec_page_cells: DEFAULT_PAGE_CELLS,
            print: PrintHandler::Stdout,
            natives: Vec::new(),
        }
    }

    /// Page size (in cells) for the execution arena.
    #[must_use]
    pub fn execution_page_size(mut self, cells: usize) -> Self {
        self.exec_page_cells = cells;
        self
    }

    /// Capture script output in a buffer instead of stdout.
    #[must_use]
    pub fn capture_output(mut self) -> Self {
        self.print = PrintHandler::buffer();
        self
    }

    /// Use a specific print handler.
    #[must_use]
    pub fn print_handler(mut self, handler: PrintHandler) -> Self {
        self.print = handler;
        self
    }

    /// Register a host native function.
    ///
    /// It lands in the same flat table as script functions and is
    /// indistinguishable at call sites.
    #[must_use]
    pub fn register_native(mut self, name: &str, function: NativeFn) -> Self {
        self.natives.push((name.to_owned(), function));
        self
    }

    /// Build the interpreter, merging the function table.
    pub fn build(mut self) -> Result<Interpreter, RegisterError> {
        let mut functions = FxHashMap::default();

        // Script functions first; the AST builder already guarantees
        // they are unique among themselves.
        for (index, def) in self.program.module.functions.iter().enumerate() {
            let index = u32::try_from(index)
                .unwrap_or_else(|_| panic!("function table exhausted: over u32::MAX functions"));
            functions.insert(def.name, Function::Script(index));
        }

        let builtin: [(&str, NativeFn); 5] = [
            ("print", builtins::native_print),
            ("fopen", builtins::native_fopen),
            ("fclose", builtins::native_fclose),
            ("fgets", builtins::native_fgets),
            ("fputs", builtins::native_fputs),
        ];
        for (name, function) in builtin {
            let interned = self.program.interner.intern(name);
            if functions.insert(interned, Function::Native(function)).is_some() {
                return Err(RegisterError::DuplicateFunction {
                    name: name.to_owned(),
                });
            }
        }
        for (name, function) in &self.natives {
            let interned = self.program.interner.intern(name);
            if functions
                .insert(interned, Function::Native(*function))
                .is_some()
            {
                return Err(RegisterError::DuplicateFunction { name: name.clone() });
            }
        }

        let stream_names = StreamNames {
            stdin: self.program.interner.intern("STDIN"),
            stdout: self.program.interner.intern("STDOUT"),
            stderr: self.program.interner.intern("STDERR"),
        };

        Ok(Interpreter {
            program: self.program,
            functions,
            globals: GlobalScope::new(self.exec_page_cells),
            print: self.print,
            stream_names,
        })
    }
}
