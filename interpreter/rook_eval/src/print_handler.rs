//! Print handler for configurable output.
//!
//! The `print` builtin (and writes to the standard output stream)
//! go through this handler so output can be redirected:
//! - `Stdout`: process stdout (default)
//! - `Buffer`: capture for tests and embedders
//!
//! Enum dispatch, not trait objects — this is a hot path and the
//! destination set is closed.

use std::cell::RefCell;
use std::io::Write;

/// Output destination for script-visible printing.
pub enum PrintHandler {
    /// Write through to process stdout.
    Stdout,
    /// Capture output in a buffer.
    Buffer(RefCell<String>),
}

impl PrintHandler {
    /// Create a capturing handler.
    pub fn buffer() -> Self {
        PrintHandler::Buffer(RefCell::new(String::new()))
    }

    /// Print without a trailing newline.
    pub fn print(&self, msg: &str) {
        match self {
            PrintHandler::Stdout => {
                print!("{msg}");
                let _ = std::io::stdout().flush();
            }
            PrintHandler::Buffer(buf) => buf.borrow_mut().push_str(msg),
        }
    }

    /// Get all captured output.
    ///
    /// Returns an empty string for `Stdout`, which does not capture.
    pub fn output(&self) -> String {
        match self {
            PrintHandler::Stdout => String::new(),
            PrintHandler::Buffer(buf) => buf.borrow().clone(),
        }
    }

    /// Clear captured output; a no-op for `Stdout`.
    pub fn clear(&self) {
        if let PrintHandler::Buffer(buf) = self {
            buf.borrow_mut().clear();
        }
    }
}

impl Default for PrintHandler {
    fn default() -> Self {
        PrintHandler::Stdout
    }
}
