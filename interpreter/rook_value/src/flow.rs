//! Control-flow signal threaded out of statement execution.

use crate::Value;

/// Result of executing a statement or statement list.
///
/// A statement list halts at the first non-`Normal` result and hands
/// it upward unchanged — this is how `return`, `break`, and `continue`
/// unwind nested blocks without any exception machinery. Loops absorb
/// `Break` (yielding `Normal`) and `Continue`; function calls absorb
/// `Return` and take its payload.
#[derive(Clone, Debug, PartialEq)]
pub enum Flow {
    /// Fell through; keep executing the list.
    Normal,
    /// `return` with its value (`Null` when none was given).
    Return(Value),
    /// `break` out of the nearest loop.
    Break,
    /// `continue` with the nearest loop's next iteration.
    Continue,
}

impl Flow {
    /// True when execution should continue with the next statement.
    #[inline]
    pub const fn is_normal(&self) -> bool {
        matches!(self, Flow::Normal)
    }

    /// Name of the signal, for diagnostics.
    pub const fn signal_name(&self) -> &'static str {
        match self {
            Flow::Normal => "normal",
            Flow::Return(_) => "return",
            Flow::Break => "break",
            Flow::Continue => "continue",
        }
    }
}
