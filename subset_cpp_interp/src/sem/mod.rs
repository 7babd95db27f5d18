//! Semantic analysis: scopes, class table, typing rules

pub mod analyzer;
pub mod class_table;
pub mod error;
pub mod program;
pub mod scope;
pub mod symbols;

pub use analyzer::Analyzer;
pub use class_table::ClassTable;
pub use error::SemanticError;
pub use program::ProgramAnalyzer;
pub use scope::Scope;
pub use symbols::{ClassSymbol, CtorSymbol, FuncSymbol, MethodSymbol};
