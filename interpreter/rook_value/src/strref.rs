//! Reference-counted string handles.
//!
//! Script strings are shared, not copied: reading a string variable,
//! assigning it, or passing it to a function hands out another handle
//! to the same buffer. The count is deterministic and non-atomic —
//! execution is single-threaded — and the buffer is freed exactly when
//! the last handle drops, never by a collector.
//!
//! Two buffer flavors exist:
//!
//! - **literal** — wraps a buffer interned in AST storage. The AST
//!   keeps its own handle for the interpreter lifetime, so literal
//!   bytes are never freed while the program exists.
//! - **owned** — produced by concatenation and stringification; the
//!   buffer dies with the last handle.

// Rc is the implementation of StrRef: a deterministic, non-atomic
// shared count with drop-as-release.
#![expect(
    clippy::disallowed_types,
    reason = "Rc<str> is the implementation of StrRef"
)]

use std::fmt;
use std::rc::Rc;

/// Shared handle to a script string.
///
/// Cloning **is** the retain operation; dropping is the release. A
/// count of zero frees an owned buffer exactly once and can never be
/// observed negative — both invariants hold by construction.
#[derive(Eq)]
pub struct StrRef {
    buf: Rc<str>,
    literal: bool,
}

impl StrRef {
    /// Wrap an AST-owned literal buffer.
    ///
    /// The pool never frees literal bytes; the interner's own handle
    /// outlives every evaluation-time copy.
    #[inline]
    pub fn literal(buf: Rc<str>) -> Self {
        StrRef { buf, literal: true }
    }

    /// Take ownership of a freshly produced buffer.
    #[inline]
    pub fn owned(text: String) -> Self {
        StrRef {
            buf: Rc::from(text),
            literal: false,
        }
    }

    /// Explicit retain; identical to `clone`, spelled out at the
    /// `Value` copy sites the evaluator audits.
    #[inline]
    #[must_use]
    pub fn retain(&self) -> Self {
        self.clone()
    }

    /// Borrow the text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// True when the buffer is owned by AST storage.
    #[inline]
    pub fn is_literal(&self) -> bool {
        self.literal
    }

    /// Number of live handles to this buffer.
    ///
    /// For a literal this includes the interner's own handle.
    #[inline]
    pub fn ref_count(&self) -> usize {
        Rc::strong_count(&self.buf)
    }

    /// True when both handles share one buffer.
    #[inline]
    pub fn shares_buffer(&self, other: &StrRef) -> bool {
        Rc::ptr_eq(&self.buf, &other.buf)
    }
}

impl Clone for StrRef {
    #[inline]
    fn clone(&self) -> Self {
        StrRef {
            buf: Rc::clone(&self.buf),
            literal: self.literal,
        }
    }
}

/// Content equality; the literal flag is an ownership detail, not part
/// of the value.
impl PartialEq for StrRef {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.buf == other.buf
    }
}

/// Byte-wise ordering, used by the string comparison operators.
impl Ord for StrRef {
    #[inline]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.buf.as_bytes().cmp(other.buf.as_bytes())
    }
}

impl PartialOrd for StrRef {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for StrRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.buf)
    }
}

impl fmt::Debug for StrRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "StrRef({:?}, {}, refs={})",
            &*self.buf,
            if self.literal { "literal" } else { "owned" },
            self.ref_count(),
        )
    }
}
