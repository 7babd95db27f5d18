//! Lexical scope for semantic analysis
//!
//! A stack of variable frames over a flat global layer of function
//! overloads and class names. No name may be redefined within a single
//! frame; lookups walk the frame stack innermost-first.

use std::collections::{HashMap, HashSet};

use subset_cpp_parser::Type;

use crate::sem::error::SemanticError;
use crate::sem::symbols::{same_signature, FuncSymbol};

#[derive(Debug, Default)]
pub struct Scope {
    functions: HashMap<String, Vec<FuncSymbol>>,
    classes: HashSet<String>,
    frames: Vec<HashMap<String, Type>>,
}

impl Scope {
    /// A fresh scope with one (global) variable frame
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
            classes: HashSet::new(),
            frames: vec![HashMap::new()],
        }
    }

    // ==================== Classes ====================

    pub fn define_class(&mut self, name: &str) {
        self.classes.insert(name.to_string());
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.classes.contains(name)
    }

    // ==================== Functions ====================

    /// Define a function overload; identical signatures are an error
    pub fn define_func(&mut self, sym: FuncSymbol) -> Result<(), SemanticError> {
        let overloads = self.functions.entry(sym.name.clone()).or_default();
        if overloads.iter().any(|existing| same_signature(existing, &sym)) {
            return Err(SemanticError::FunctionOverloadRedefinition(sym.name));
        }
        overloads.push(sym);
        Ok(())
    }

    pub fn has_func(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn overloads(&self, name: &str) -> Option<&[FuncSymbol]> {
        self.functions.get(name).map(|v| v.as_slice())
    }

    // ==================== Variables ====================

    pub fn push_frame(&mut self) {
        self.frames.push(HashMap::new());
    }

    pub fn pop_frame(&mut self) {
        // The global frame stays.
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Define a variable in the innermost frame
    pub fn define_var(&mut self, name: &str, ty: Type) -> Result<(), SemanticError> {
        let frame = self.frames.last_mut().ok_or_else(|| {
            SemanticError::UnknownVariable(name.to_string())
        })?;
        if frame.contains_key(name) {
            return Err(SemanticError::VariableRedefinition(name.to_string()));
        }
        frame.insert(name.to_string(), ty);
        Ok(())
    }

    /// Check only the innermost frame
    pub fn has_var_local(&self, name: &str) -> bool {
        self.frames
            .last()
            .map(|f| f.contains_key(name))
            .unwrap_or(false)
    }

    /// Walk the frame stack innermost-first
    pub fn lookup_var(&self, name: &str) -> Option<&Type> {
        self.frames.iter().rev().find_map(|f| f.get(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shadowing_across_frames() {
        let mut scope = Scope::new();
        scope.define_var("x", Type::int()).unwrap();
        scope.push_frame();
        scope.define_var("x", Type::bool()).unwrap();
        assert_eq!(scope.lookup_var("x"), Some(&Type::bool()));
        scope.pop_frame();
        assert_eq!(scope.lookup_var("x"), Some(&Type::int()));
    }

    #[test]
    fn test_no_redefinition_within_frame() {
        let mut scope = Scope::new();
        scope.define_var("x", Type::int()).unwrap();
        assert_eq!(
            scope.define_var("x", Type::int()),
            Err(SemanticError::VariableRedefinition("x".into()))
        );
    }

    #[test]
    fn test_function_overloads() {
        let mut scope = Scope::new();
        let f1 = FuncSymbol {
            name: "f".into(),
            return_type: Type::void(),
            param_types: vec![Type::int()],
        };
        let f2 = FuncSymbol {
            name: "f".into(),
            return_type: Type::void(),
            param_types: vec![Type::int().reference()],
        };
        scope.define_func(f1.clone()).unwrap();
        // int vs int& is a different signature
        scope.define_func(f2).unwrap();
        assert_eq!(scope.overloads("f").unwrap().len(), 2);
        // identical signature is rejected even with another return type
        let f1_again = FuncSymbol {
            return_type: Type::int(),
            ..f1
        };
        assert!(scope.define_func(f1_again).is_err());
    }
}
