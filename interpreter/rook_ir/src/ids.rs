//! Node IDs and ranges for the flat AST.
//!
//! Children are referenced by `u32` indices into the AST arena rather
//! than boxes, and node lists are flattened into side pools addressed
//! by `(start, len)` ranges. IDs are typed per pool so an `ExprId`
//! cannot be confused with a `StmtId`.

use std::fmt;

use rook_arena::{CellId, CellRange};

macro_rules! arena_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Invalid ID (sentinel value).
            pub const INVALID: $name = $name(u32::MAX);

            /// Create a new ID.
            #[inline]
            pub const fn new(index: u32) -> Self {
                $name(index)
            }

            /// Raw index into the backing pool.
            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }

            /// Check if this is a valid ID.
            #[inline]
            pub const fn is_valid(self) -> bool {
                self.0 != u32::MAX
            }

            /// Corresponding arena cell.
            #[inline]
            pub(crate) const fn cell(self) -> CellId {
                CellId::new(self.0)
            }

            /// Wrap an arena cell.
            #[inline]
            pub(crate) const fn from_cell(cell: CellId) -> Self {
                $name(cell.index())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, concat!(stringify!($name), "({})"), self.0)
                } else {
                    write!(f, concat!(stringify!($name), "::INVALID"))
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::INVALID
            }
        }
    };
}

macro_rules! arena_range {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
        pub struct $name {
            pub start: u32,
            pub len: u32,
        }

        impl $name {
            /// Empty range.
            pub const EMPTY: $name = $name { start: 0, len: 0 };

            /// Create a new range.
            #[inline]
            pub const fn new(start: u32, len: u32) -> Self {
                $name { start, len }
            }

            /// Check if the range is empty.
            #[inline]
            pub const fn is_empty(self) -> bool {
                self.len == 0
            }

            /// Number of entries.
            #[inline]
            pub const fn len(self) -> usize {
                self.len as usize
            }

            /// Corresponding arena cell range.
            #[inline]
            pub(crate) const fn cells(self) -> CellRange {
                CellRange::new(self.start, self.len)
            }

            /// Wrap an arena cell range.
            #[inline]
            pub(crate) const fn from_cells(cells: CellRange) -> Self {
                $name { start: cells.start, len: cells.len }
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(
                    f,
                    concat!(stringify!($name), "({}..{})"),
                    self.start,
                    self.start + self.len
                )
            }
        }
    };
}

arena_id! {
    /// Index into the expression pool.
    ExprId
}

arena_id! {
    /// Index into the statement pool.
    StmtId
}

arena_range! {
    /// Range in the flattened expression-id list pool (call arguments).
    ExprRange
}

arena_range! {
    /// Range in the flattened statement-id list pool (a block).
    StmtRange
}

arena_range! {
    /// Range in the elsif-arm pool.
    ElsifRange
}

arena_range! {
    /// Range in the flattened name list pool (parameters, `global` names).
    NameRange
}
