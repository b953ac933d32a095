//! Opaque native-pointer values.
//!
//! Hosts hand the script references to their own resources (file
//! streams, connections) as `NativePointer` values: a shared opaque
//! payload plus a fixed tag naming the owning library. Scripts can
//! store and pass these around but only native functions can look
//! inside.

// Rc is the implementation of the shared native payload.
#![expect(
    clippy::disallowed_types,
    reason = "Rc<RefCell<dyn Any>> is the implementation of NativePointer"
)]

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Shared opaque host resource.
#[derive(Clone)]
pub struct NativePointer {
    /// Library tag, e.g. `"rook.lang.file"`.
    tag: &'static str,
    data: Rc<RefCell<dyn Any>>,
}

impl NativePointer {
    /// Wrap a host resource under a library tag.
    pub fn new<T: Any>(tag: &'static str, data: T) -> Self {
        NativePointer {
            tag,
            data: Rc::new(RefCell::new(data)),
        }
    }

    /// Library tag this pointer belongs to.
    #[inline]
    pub fn tag(&self) -> &'static str {
        self.tag
    }

    /// Borrow the payload mutably, downcast to `T`.
    ///
    /// Returns `None` when the payload is not a `T` (a script passed
    /// some other library's pointer).
    pub fn with_data<T: Any, R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut data = self.data.borrow_mut();
        data.downcast_mut::<T>().map(f)
    }

    /// Stable address used by stringification.
    #[inline]
    pub fn address(&self) -> usize {
        Rc::as_ptr(&self.data).cast::<u8>() as usize
    }
}

/// Identity equality: two pointers are equal when they share a payload.
impl PartialEq for NativePointer {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }
}

impl fmt::Display for NativePointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}:{:#x})", self.tag, self.address())
    }
}

impl fmt::Debug for NativePointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativePointer({}:{:#x})", self.tag, self.address())
    }
}
