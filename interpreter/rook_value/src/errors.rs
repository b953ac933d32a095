//! Evaluation errors and their constructor functions.
//!
//! Every detected misuse is a programming error in the script: errors
//! propagate unchanged to the host, which aborts or translates them.
//! There is no recovery inside the runtime. Each error carries the
//! source line and enough context (identifier, operator, type names)
//! to reproduce the diagnostic deterministically.

use std::fmt;

/// Structured error category.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalErrorKind {
    #[error("`{name}` is not defined")]
    UndefinedVariable { name: String },

    #[error("`global` names unknown global variable `{name}`")]
    UndefinedGlobal { name: String },

    #[error("function `{name}` is not defined")]
    UndefinedFunction { name: String },

    #[error("function `{function}` expects {expected} argument(s), got {found}")]
    ArgumentCountMismatch {
        function: String,
        expected: usize,
        found: usize,
    },

    #[error("operator `{op}` cannot be applied to {lhs} and {rhs}")]
    BinaryTypeMismatch {
        op: &'static str,
        lhs: &'static str,
        rhs: &'static str,
    },

    #[error("{construct} condition must be boolean, got {found}")]
    ConditionTypeMismatch {
        construct: &'static str,
        found: &'static str,
    },

    #[error("operand of `{op}` must be boolean, got {found}")]
    LogicalOperandNotBoolean {
        op: &'static str,
        found: &'static str,
    },

    #[error("unary minus requires int or double, got {found}")]
    MinusOperandNotNumeric { found: &'static str },

    #[error("null can only be compared with `==` or `!=`, not `{op}`")]
    InvalidNullComparison { op: &'static str },

    #[error("division by zero")]
    DivisionByZero,

    #[error("modulo by zero")]
    ModuloByZero,

    #[error("`global` declaration outside a function")]
    GlobalOutsideFunction,

    #[error("`{signal}` outside a loop")]
    StrayControlFlow { signal: &'static str },

    #[error("{message}")]
    Native { message: String },
}

/// Evaluation-time fatal error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalError {
    /// Structured error category.
    pub kind: EvalErrorKind,
    /// Source line of the offending node, when known.
    pub line: Option<u32>,
}

impl EvalError {
    /// Wrap a kind with no line attached yet.
    pub fn new(kind: EvalErrorKind) -> Self {
        EvalError { kind, line: None }
    }

    /// Attach the source line; the first attachment wins, so the
    /// innermost node's line survives propagation.
    #[must_use]
    pub fn with_line(mut self, line: u32) -> Self {
        self.line.get_or_insert(line);
        self
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {line}: {}", self.kind),
            None => self.kind.fmt(f),
        }
    }
}

impl std::error::Error for EvalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

/// Result alias used throughout the runtime.
pub type EvalResult<T> = Result<T, EvalError>;

// Error constructors: one small function per condition, so call sites
// stay terse and the message wording lives in exactly one place.

pub fn undefined_variable(name: &str) -> EvalError {
    EvalError::new(EvalErrorKind::UndefinedVariable {
        name: name.to_owned(),
    })
}

pub fn undefined_global(name: &str) -> EvalError {
    EvalError::new(EvalErrorKind::UndefinedGlobal {
        name: name.to_owned(),
    })
}

pub fn undefined_function(name: &str) -> EvalError {
    EvalError::new(EvalErrorKind::UndefinedFunction {
        name: name.to_owned(),
    })
}

pub fn wrong_arg_count(function: &str, expected: usize, found: usize) -> EvalError {
    EvalError::new(EvalErrorKind::ArgumentCountMismatch {
        function: function.to_owned(),
        expected,
        found,
    })
}

pub fn binary_type_mismatch(op: &'static str, lhs: &'static str, rhs: &'static str) -> EvalError {
    EvalError::new(EvalErrorKind::BinaryTypeMismatch { op, lhs, rhs })
}

pub fn condition_not_boolean(construct: &'static str, found: &'static str) -> EvalError {
    EvalError::new(EvalErrorKind::ConditionTypeMismatch { construct, found })
}

pub fn logical_operand_not_boolean(op: &'static str, found: &'static str) -> EvalError {
    EvalError::new(EvalErrorKind::LogicalOperandNotBoolean { op, found })
}

pub fn minus_operand_not_numeric(found: &'static str) -> EvalError {
    EvalError::new(EvalErrorKind::MinusOperandNotNumeric { found })
}

pub fn invalid_null_comparison(op: &'static str) -> EvalError {
    EvalError::new(EvalErrorKind::InvalidNullComparison { op })
}

pub fn division_by_zero() -> EvalError {
    EvalError::new(EvalErrorKind::DivisionByZero)
}

pub fn modulo_by_zero() -> EvalError {
    EvalError::new(EvalErrorKind::ModuloByZero)
}

pub fn global_outside_function() -> EvalError {
    EvalError::new(EvalErrorKind::GlobalOutsideFunction)
}

pub fn stray_control_flow(signal: &'static str) -> EvalError {
    EvalError::new(EvalErrorKind::StrayControlFlow { signal })
}

pub fn native_error(message: impl Into<String>) -> EvalError {
    EvalError::new(EvalErrorKind::Native {
        message: message.into(),
    })
}
