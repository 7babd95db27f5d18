//! subset_cpp_interp
//!
//! Semantic analyzer, class runtime and tree-walking interpreter for a
//! statically typed C++ subset with value-semantic classes, single
//! inheritance, virtual methods and by-reference parameters. Source
//! text is parsed (by `subset_cpp_parser`), semantically checked, and
//! executed directly by walking the typed syntax tree.
//!
//! # Example
//!
//! ```
//! use subset_cpp_interp::ReplSession;
//!
//! let mut session = ReplSession::new();
//! session.eval("int main() { print_int(6); return 0; }");
//! let outcome = session.eval("main();");
//! assert_eq!(outcome.printed(), vec!["6"]);
//! ```

pub mod api;
pub mod builtins;
pub mod error;
pub mod repl;
pub mod runtime;
pub mod sem;

pub use error::InterpreterError;
pub use repl::{ReplOutcome, ReplSession};
pub use runtime::{OutputEvent, Value};

// Re-export the parser crate for consumers.
pub use subset_cpp_parser as parser;

/// Get version information
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
