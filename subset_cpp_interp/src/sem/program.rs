//! Whole-program semantic analysis
//!
//! Entry points for the two submission kinds: `analyze` checks a full
//! program of definitions (invoked on the candidate durable program
//! before it is committed), `check_statements` checks a statement
//! submission against the durable program plus the live session
//! variables. Both leave no trace on failure.

use subset_cpp_parser::{Program, Stmt, Type};

use crate::builtins;
use crate::sem::analyzer::Analyzer;
use crate::sem::class_table::ClassTable;
use crate::sem::error::SemanticError;
use crate::sem::scope::Scope;
use crate::sem::symbols::FuncSymbol;

/// Program-level analysis driver
#[derive(Debug, Default)]
pub struct ProgramAnalyzer;

impl ProgramAnalyzer {
    /// Build the global scope for a program: class names, built-in
    /// signatures, then user function overloads (so a user function that
    /// collides with a built-in signature is an overload redefinition).
    fn global_scope(program: &Program) -> Result<Scope, SemanticError> {
        let mut scope = Scope::new();
        for class in &program.classes {
            scope.define_class(&class.name);
        }
        for sig in builtins::signatures() {
            scope.define_func(sig.clone())?;
        }
        for f in &program.functions {
            scope.define_func(FuncSymbol::from_def(f))?;
        }
        Ok(scope)
    }

    /// `main` is not special at run time, but when defined its only legal
    /// signatures are `int main()` and `void main()`.
    fn check_main_signature(program: &Program) -> Result<(), SemanticError> {
        for f in program.functions.iter().filter(|f| f.name == "main") {
            let ret_ok = f.return_type == Type::int() || f.return_type == Type::void();
            if !f.params.is_empty() || !ret_ok {
                return Err(SemanticError::InvalidMainSignature);
            }
        }
        Ok(())
    }

    /// Full analysis of a definition program. Returns the class table so
    /// the caller can reuse it for the runtime rebuild.
    pub fn analyze(program: &Program) -> Result<ClassTable, SemanticError> {
        let table = ClassTable::build(program)?;
        let mut scope = Self::global_scope(program)?;
        Self::check_main_signature(program)?;

        let analyzer = Analyzer::new(&table);
        for f in &program.functions {
            analyzer.check_function(&mut scope, f)?;
        }
        for class in &program.classes {
            for ctor in &class.ctors {
                analyzer.check_constructor(&mut scope, &class.name, ctor)?;
            }
            for m in &class.methods {
                analyzer.check_method(&mut scope, &class.name, m)?;
            }
        }
        Ok(table)
    }

    /// Analyze a statement submission before execution. `session_vars`
    /// carries the static types of the variables already live in the
    /// session frame; the statements type-check as an anonymous void body
    /// on top of them.
    pub fn check_statements(
        program: &Program,
        session_vars: &[(String, Type)],
        stmts: &[Stmt],
    ) -> Result<(), SemanticError> {
        let table = ClassTable::build(program)?;
        let mut scope = Self::global_scope(program)?;

        scope.push_frame();
        for (name, ty) in session_vars {
            scope.define_var(name, ty.clone())?;
        }

        let analyzer = Analyzer::new(&table);
        for stmt in stmts {
            analyzer.check_stmt(&mut scope, stmt, &Type::void())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use subset_cpp_parser::parse_program;

    fn analyze(source: &str) -> Result<ClassTable, SemanticError> {
        let program = parse_program(source, &HashSet::new()).expect("parse failed");
        ProgramAnalyzer::analyze(&program)
    }

    #[test]
    fn test_valid_main_signatures() {
        assert!(analyze("int main() { return 0; }").is_ok());
        assert!(analyze("void main() { }").is_ok());
    }

    #[test]
    fn test_invalid_main_signatures() {
        assert_eq!(
            analyze("int main(int argc) { return 0; }").unwrap_err(),
            SemanticError::InvalidMainSignature
        );
        assert_eq!(
            analyze("bool main() { return true; }").unwrap_err(),
            SemanticError::InvalidMainSignature
        );
    }

    #[test]
    fn test_builtins_are_visible() {
        assert!(analyze("int main() { print_int(1); return 0; }").is_ok());
    }

    #[test]
    fn test_builtin_signature_collision() {
        let err = analyze("int print_int(int x) { return x; }").unwrap_err();
        assert_eq!(
            err,
            SemanticError::FunctionOverloadRedefinition("print_int".into())
        );
    }

    #[test]
    fn test_method_bodies_see_inherited_fields() {
        assert!(analyze(
            "class A { int x; }
             class B : public A { int get() { return x; } }"
        )
        .is_ok());
    }

    #[test]
    fn test_parameter_shadowing_field_rejected() {
        let err = analyze(
            "class A { int x; int set(int x) { return x; } }",
        )
        .unwrap_err();
        assert_eq!(err, SemanticError::ParameterShadowsField("x".into()));
    }
}
