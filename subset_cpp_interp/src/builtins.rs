//! Built-in output primitives
//!
//! `print_int`, `print_bool`, `print_char`, `print_string`: each takes
//! one argument of the corresponding primitive type, prints it followed
//! by a newline, and yields integer zero. Their signatures are seeded
//! into the global scope so user definitions collide visibly, and the
//! executor falls back to them when no user overload matches.

use once_cell::sync::Lazy;

use subset_cpp_parser::Type;

use crate::runtime::error::RuntimeError;
use crate::runtime::value::Value;
use crate::runtime::OutputEvent;
use crate::sem::symbols::FuncSymbol;

static SIGNATURES: Lazy<Vec<FuncSymbol>> = Lazy::new(|| {
    let sig = |name: &str, param: Type| FuncSymbol {
        name: name.to_string(),
        return_type: Type::int(),
        param_types: vec![param],
    };
    vec![
        sig("print_int", Type::int()),
        sig("print_bool", Type::bool()),
        sig("print_char", Type::char()),
        sig("print_string", Type::string()),
    ]
});

/// Signatures of all built-in functions
pub fn signatures() -> &'static [FuncSymbol] {
    &SIGNATURES
}

/// Whether `name` names a built-in
pub fn is_builtin(name: &str) -> bool {
    SIGNATURES.iter().any(|sig| sig.name == name)
}

/// Invoke a built-in with already-evaluated arguments
pub fn call(name: &str, args: &[Value], out: &mut Vec<OutputEvent>) -> Result<Value, RuntimeError> {
    let arg = args
        .first()
        .ok_or_else(|| RuntimeError::NoMatchingOverload(name.to_string()))?;

    let line = match (name, arg) {
        ("print_int", Value::Int(i)) => i.to_string(),
        // print_bool emits 1 / 0
        ("print_bool", Value::Bool(b)) => if *b { "1" } else { "0" }.to_string(),
        ("print_char", Value::Char(c)) => c.to_string(),
        ("print_string", Value::Str(s)) => s.clone(),
        ("print_int", _) => return Err(RuntimeError::type_error("int", "print_int")),
        ("print_bool", _) => return Err(RuntimeError::type_error("bool", "print_bool")),
        ("print_char", _) => return Err(RuntimeError::type_error("char", "print_char")),
        ("print_string", _) => return Err(RuntimeError::type_error("string", "print_string")),
        _ => return Err(RuntimeError::UnknownFunction(name.to_string())),
    };

    out.push(OutputEvent::Printed(line));
    Ok(Value::Int(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_table() {
        assert!(is_builtin("print_bool"));
        assert!(!is_builtin("println"));
        assert_eq!(signatures().len(), 4);
        assert!(signatures().iter().all(|s| s.return_type == Type::int()));
    }

    #[test]
    fn test_print_bool_emits_digits() {
        let mut out = Vec::new();
        let result = call("print_bool", &[Value::Bool(true)], &mut out).unwrap();
        assert_eq!(result, Value::Int(0));
        assert_eq!(out, vec![OutputEvent::Printed("1".into())]);
    }

    #[test]
    fn test_argument_type_checked() {
        let mut out = Vec::new();
        let err = call("print_int", &[Value::Bool(true)], &mut out).unwrap_err();
        assert!(matches!(err, RuntimeError::TypeError { .. }));
        assert!(out.is_empty());
    }
}
