//! Top-level interpreter error
//!
//! Wraps the three stage errors and renders the user-facing prefixes:
//! `ParseError at L:C: …`, `semantic error: …`, `runtime error: …`.

use thiserror::Error;

use crate::runtime::error::RuntimeError;
use crate::sem::error::SemanticError;
use subset_cpp_parser::ParseError;

/// Any error a submission can produce
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterpreterError {
    /// Malformed input; aborts the submission before analysis
    #[error("ParseError {0}")]
    Parse(#[from] ParseError),

    /// Typing or inheritance violation; aborts before any mutation of
    /// the durable program
    #[error("semantic error: {0}")]
    Semantic(#[from] SemanticError),

    /// Failure during execution; aborts the current statement, leaving
    /// the session scope and already-emitted output intact
    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use subset_cpp_parser::Span;

    #[test]
    fn test_parse_prefix() {
        let err = InterpreterError::Parse(ParseError::unexpected_token(
            ";",
            "an expression",
            Span::new(4, 5, 1, 1, 5, 6),
        ));
        assert_eq!(
            err.to_string(),
            "ParseError at 1:5: expected an expression, found ';'"
        );
    }

    #[test]
    fn test_runtime_prefix() {
        let err = InterpreterError::Runtime(RuntimeError::DivisionByZero);
        assert_eq!(err.to_string(), "runtime error: division by zero");
    }
}
