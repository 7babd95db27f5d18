//! Class runtime, environments and the tree-walking executor

pub mod assign;
pub mod class_runtime;
pub mod env;
pub mod error;
pub mod exec;
pub mod functions;
pub mod lvalue;
pub mod value;

pub use class_runtime::{ClassInfo, ClassRuntime};
pub use env::{Env, FrameId, Slot};
pub use error::RuntimeError;
pub use exec::{Flow, Interp};
pub use functions::FunctionTable;
pub use lvalue::LValue;
pub use value::{Object, ObjectRef, Value};

/// One unit of session-visible output, in emission order
#[derive(Debug, Clone, PartialEq)]
pub enum OutputEvent {
    /// A line printed by a built-in
    Printed(String),
    /// The echoed value of an expression statement
    Value(String),
}
