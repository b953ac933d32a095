//! String interner for identifiers and string-literal buffers.
//!
//! The interner is part of the AST's interpreter-lifetime storage:
//! identifiers and string-literal buffers are deduplicated here once at
//! construction time and never freed afterwards. Literal string values
//! produced during evaluation share these buffers instead of copying
//! them (see `StrRef::literal` in `rook_value`).
//!
//! Single-threaded by contract — the runtime supports at most one
//! execution in flight per interpreter, so there is no sharding or
//! locking here.

// Rc is the implementation of shared literal buffers: evaluation-time
// string values alias interned bytes without copying them.
#![expect(
    clippy::disallowed_types,
    reason = "Rc<str> is the implementation of shared literal buffers"
)]

use rustc_hash::FxHashMap;
use std::rc::Rc;

use crate::Name;

/// Interner for identifiers and string-literal buffers.
///
/// Provides O(1) interning and lookup. Buffers live as long as the
/// interner, i.e. the AST/interpreter lifetime.
pub struct Interner {
    /// Map from string content to its index in `strings`.
    map: FxHashMap<Rc<str>, Name>,
    /// Storage for interned contents, indexed by `Name::raw`.
    strings: Vec<Rc<str>>,
}

impl Interner {
    /// Create a new interner with the empty string pre-interned.
    pub fn new() -> Self {
        let empty: Rc<str> = Rc::from("");
        let mut map = FxHashMap::default();
        map.insert(Rc::clone(&empty), Name::EMPTY);
        Interner {
            map,
            strings: vec![empty],
        }
    }

    /// Intern a string, returning its `Name`.
    ///
    /// Repeated calls with equal content return the same `Name`.
    pub fn intern(&mut self, s: &str) -> Name {
        if let Some(name) = self.map.get(s) {
            return *name;
        }
        let index = u32::try_from(self.strings.len())
            .unwrap_or_else(|_| panic!("interner exhausted: over u32::MAX strings"));
        let name = Name::from_raw(index);
        let stored: Rc<str> = Rc::from(s);
        self.strings.push(Rc::clone(&stored));
        self.map.insert(stored, name);
        name
    }

    /// Look up an already-interned string without interning it.
    #[inline]
    pub fn lookup(&self, s: &str) -> Option<Name> {
        self.map.get(s).copied()
    }

    /// Resolve a `Name` back to its content.
    ///
    /// # Panics
    /// Panics if `name` was not produced by this interner.
    #[inline]
    pub fn resolve(&self, name: Name) -> &str {
        &self.strings[name.raw() as usize]
    }

    /// Shared handle to an interned buffer.
    ///
    /// Used to build literal string values that alias AST-owned bytes.
    ///
    /// # Panics
    /// Panics if `name` was not produced by this interner.
    #[inline]
    pub fn buffer(&self, name: Name) -> Rc<str> {
        Rc::clone(&self.strings[name.raw() as usize])
    }

    /// Number of interned strings.
    #[inline]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Always false: the empty string is pre-interned.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}
