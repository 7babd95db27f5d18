//! Rust API for running programs and inspecting the front half of the
//! pipeline.

use std::collections::HashSet;

use subset_cpp_parser::{parse_program, tokenize};

use crate::error::InterpreterError;
use crate::repl::{ReplOutcome, ReplSession};
use crate::runtime::RuntimeError;

/// Run a script in a fresh session (definitions and statements split the
/// way the interactive loop splits them)
pub fn run_script(source: &str) -> ReplOutcome {
    ReplSession::new().eval_script(source)
}

/// Parse a program of definitions and render its AST as pretty JSON
pub fn dump_ast_json(source: &str) -> Result<String, InterpreterError> {
    let program = parse_program(source, &HashSet::new())?;
    serde_json::to_string_pretty(&program)
        .map_err(|e| InterpreterError::Runtime(RuntimeError::Internal(e.to_string())))
}

/// Tokenize source text and render the token stream as pretty JSON
pub fn dump_tokens_json(source: &str) -> Result<String, InterpreterError> {
    let mut rows = Vec::new();
    for result in tokenize(source) {
        let tok = result?;
        rows.push(serde_json::json!({
            "kind": format!("{:?}", tok.token),
            "text": tok.text,
            "line": tok.span.start_line,
            "column": tok.span.start_column,
        }));
    }
    serde_json::to_string_pretty(&rows)
        .map_err(|e| InterpreterError::Runtime(RuntimeError::Internal(e.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_script_prints() {
        let outcome = run_script("int main() { print_int(7); return 0; }\nmain();\n");
        assert!(outcome.success(), "unexpected error: {:?}", outcome.error);
        assert_eq!(outcome.printed(), vec!["7"]);
    }

    #[test]
    fn test_dump_ast_json() {
        let json = dump_ast_json("int main() { return 0; }").unwrap();
        assert!(json.contains("\"main\""));
    }

    #[test]
    fn test_dump_tokens_json() {
        let json = dump_tokens_json("int x;").unwrap();
        assert!(json.contains("KwInt"));
        assert!(json.contains("\"line\": 1"));
    }
}
