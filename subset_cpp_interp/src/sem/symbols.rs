//! Symbol types shared by the scope and the class table

use std::collections::HashMap;

use subset_cpp_parser::{FunctionDef, Type};

/// One concrete overload signature of a free function
#[derive(Debug, Clone, PartialEq)]
pub struct FuncSymbol {
    pub name: String,
    pub return_type: Type,
    pub param_types: Vec<Type>,
}

impl FuncSymbol {
    pub fn from_def(def: &FunctionDef) -> Self {
        Self {
            name: def.name.clone(),
            return_type: def.return_type.clone(),
            param_types: def.params.iter().map(|p| p.ty.clone()).collect(),
        }
    }
}

/// Same signature: same name and parameter types, reference flags
/// included. Return types do not participate.
pub fn same_signature(a: &FuncSymbol, b: &FuncSymbol) -> bool {
    a.name == b.name && a.param_types == b.param_types
}

/// A method signature with its (possibly propagated) virtual flag
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSymbol {
    pub name: String,
    pub return_type: Type,
    pub param_types: Vec<Type>,
    pub is_virtual: bool,
}

/// A constructor signature
#[derive(Debug, Clone, PartialEq)]
pub struct CtorSymbol {
    pub param_types: Vec<Type>,
}

/// Symbol table for one class: own members only, inherited members are
/// found through chain lookups on the class table.
#[derive(Debug, Clone, Default)]
pub struct ClassSymbol {
    pub name: String,
    pub base: Option<String>,
    /// Own fields only
    pub fields: HashMap<String, Type>,
    /// Own constructors; a synthetic parameterless one if none declared
    pub ctors: Vec<CtorSymbol>,
    /// Own methods: name -> overloads
    pub methods: HashMap<String, Vec<MethodSymbol>>,
}
