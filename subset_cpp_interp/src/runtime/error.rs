//! Runtime error types
//!
//! Raised during execution; a runtime error aborts the current
//! submission and unwinds to the top level, leaving the session scope
//! intact. Messages carry no prefix; the top-level wrapper adds
//! `runtime error: `.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("undefined variable: {0}")]
    UndefinedVariable(String),

    #[error("duplicate definition: {0}")]
    DuplicateDefinition(String),

    #[error("unknown class: {0}")]
    UnknownClass(String),

    #[error("unknown field at runtime: {0}")]
    UnknownField(String),

    #[error("unknown function: {0}")]
    UnknownFunction(String),

    #[error("unknown method: {class}.{method}")]
    UnknownMethod { class: String, method: String },

    #[error("duplicate function overload: {0}")]
    DuplicateOverload(String),

    #[error("no matching overload: {0}")]
    NoMatchingOverload(String),

    #[error("ambiguous overload: {0}")]
    AmbiguousOverload(String),

    #[error("no matching constructor: {0}")]
    NoMatchingConstructor(String),

    #[error("ambiguous constructor call: {0}")]
    AmbiguousConstructor(String),

    #[error("missing override body: {class}.{method}")]
    MissingOverrideBody { class: String, method: String },

    #[error("type error: expected {expected} in {context}")]
    TypeError { expected: String, context: String },

    #[error("member access on non-object value")]
    NotAnObject,

    #[error("expected an lvalue")]
    NotAnLValue,

    #[error("cannot convert value to bool")]
    CannotConvertToBool,

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow in division")]
    DivisionOverflow,

    #[error("internal error: {0}")]
    Internal(String),
}

impl RuntimeError {
    pub fn type_error(expected: &str, context: &str) -> Self {
        Self::TypeError {
            expected: expected.to_string(),
            context: context.to_string(),
        }
    }
}
