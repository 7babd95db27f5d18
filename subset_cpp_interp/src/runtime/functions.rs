//! Free-function overload table
//!
//! Rebuilt from the durable program after every committed definition
//! submission, alongside the class runtime. Definitions are referenced
//! by index into the program, never by pointer into a replaced parse
//! tree.

use std::collections::HashMap;

use subset_cpp_parser::{FunctionDef, Program, Type};

use crate::runtime::class_runtime::ClassRuntime;
use crate::runtime::error::RuntimeError;
use crate::sem::class_table::{pick_overload, Ambiguous};

#[derive(Debug, Default)]
pub struct FunctionTable {
    /// Function name -> indices of its overloads in `program.functions`
    functions: HashMap<String, Vec<usize>>,
    pub class_rt: ClassRuntime,
}

impl FunctionTable {
    /// Build the table and the class runtime from a program
    pub fn build(program: &Program) -> Result<Self, RuntimeError> {
        let mut functions: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, f) in program.functions.iter().enumerate() {
            let overloads = functions.entry(f.name.clone()).or_default();
            for &existing in overloads.iter() {
                if same_signature(&program.functions[existing], f) {
                    return Err(RuntimeError::DuplicateOverload(f.name.clone()));
                }
            }
            overloads.push(idx);
        }

        Ok(Self {
            functions,
            class_rt: ClassRuntime::build(program)?,
        })
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Resolve a call by argument base types and lvalue-ness
    pub fn resolve<'p>(
        &self,
        program: &'p Program,
        name: &str,
        args: &[(Type, bool)],
    ) -> Result<&'p FunctionDef, RuntimeError> {
        let indices = self
            .functions
            .get(name)
            .ok_or_else(|| RuntimeError::UnknownFunction(name.to_string()))?;

        let candidates: Vec<(&FunctionDef, Vec<Type>)> = indices
            .iter()
            .map(|&idx| {
                let def = program
                    .functions
                    .get(idx)
                    .ok_or_else(|| RuntimeError::Internal(format!("stale function index: {name}")))?;
                let types = def.params.iter().map(|p| p.ty.clone()).collect();
                Ok((def, types))
            })
            .collect::<Result<_, RuntimeError>>()?;

        match pick_overload(
            &candidates,
            |(_, types)| types.as_slice(),
            args,
            |d, b| self.class_rt.is_same_or_derived(d, b),
            2,
            1,
        ) {
            Err(Ambiguous) => Err(RuntimeError::AmbiguousOverload(name.to_string())),
            Ok(None) => Err(RuntimeError::NoMatchingOverload(name.to_string())),
            Ok(Some(&(def, _))) => Ok(def),
        }
    }
}

fn same_signature(a: &FunctionDef, b: &FunctionDef) -> bool {
    a.name == b.name
        && a.params.len() == b.params.len()
        && a.params.iter().zip(&b.params).all(|(x, y)| x.ty == y.ty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use subset_cpp_parser::parse_program;

    fn program(source: &str) -> Program {
        parse_program(source, &HashSet::new()).expect("parse failed")
    }

    #[test]
    fn test_reference_overload_preferred_for_lvalues() {
        let p = program(
            "int f(int x) { return 1; }
             int f(int& x) { return 2; }",
        );
        let table = FunctionTable::build(&p).unwrap();

        // lvalue argument: the reference overload scores higher
        let def = table.resolve(&p, "f", &[(Type::int(), true)]).unwrap();
        assert!(def.params[0].ty.is_ref);

        // rvalue argument: only the value overload is viable
        let def = table.resolve(&p, "f", &[(Type::int(), false)]).unwrap();
        assert!(!def.params[0].ty.is_ref);
    }

    #[test]
    fn test_duplicate_overload_rejected() {
        let p = program(
            "int f(int x) { return 1; }
             bool f(int x) { return true; }",
        );
        assert_eq!(
            FunctionTable::build(&p).unwrap_err(),
            RuntimeError::DuplicateOverload("f".into())
        );
    }

    #[test]
    fn test_unknown_and_no_match() {
        let p = program("int f(int x) { return 1; }");
        let table = FunctionTable::build(&p).unwrap();
        assert!(matches!(
            table.resolve(&p, "g", &[]),
            Err(RuntimeError::UnknownFunction(_))
        ));
        assert!(matches!(
            table.resolve(&p, "f", &[(Type::bool(), false)]),
            Err(RuntimeError::NoMatchingOverload(_))
        ));
    }
}
