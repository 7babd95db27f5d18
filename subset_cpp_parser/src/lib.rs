//! subset_cpp_parser
//!
//! Lexer, AST and recursive descent parser for a statically typed C++
//! subset with value-semantic classes, single inheritance, virtual
//! methods and by-reference parameters.
//!
//! # Example
//!
//! ```
//! use subset_cpp_parser::parse_program;
//! use std::collections::HashSet;
//!
//! let program = parse_program("int main() { return 0; }", &HashSet::new()).unwrap();
//! assert_eq!(program.functions[0].name, "main");
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod token;

// Re-exports
pub use ast::{
    BaseType, BinaryOp, ClassDef, ConstructorDef, Expr, FieldDecl, FunctionDef, MethodDef, Param,
    Program, Stmt, Type, UnaryOp,
};
pub use error::{ParseError, ParseResult};
pub use lexer::{tokenize, Lexer, SpannedToken};
pub use parser::{parse_program, parse_statements, Parser};
pub use span::{SourceMap, Span};
pub use token::Token;

/// Get version information
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_parse_empty_program() {
        let program = parse_program("", &HashSet::new()).unwrap();
        assert!(program.classes.is_empty());
        assert!(program.functions.is_empty());
    }

    #[test]
    fn test_tokenize() {
        let tokens = tokenize("1 + 2");
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
