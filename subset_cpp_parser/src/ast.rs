//! Abstract syntax tree for the C++ subset
//!
//! Declarations, statements and expressions are closed sum types; the
//! semantic analyzer and the executor dispatch over them with exhaustive
//! matches. Types are small values compared structurally — almost every
//! typing rule compares on the base type, with the reference flag
//! stripped (see [`Type::base`]).

use serde::{Deserialize, Serialize};

// ==================== Types ====================

/// Base kind of a type, with the class name inline for class types
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaseType {
    Bool,
    Int,
    Char,
    String,
    Void,
    Class(String),
}

/// A type in the language: base kind plus reference flag (`T` vs `T&`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Type {
    pub base: BaseType,
    pub is_ref: bool,
}

impl Type {
    pub fn new(base: BaseType, is_ref: bool) -> Self {
        Self { base, is_ref }
    }

    pub fn bool() -> Self {
        Self::new(BaseType::Bool, false)
    }

    pub fn int() -> Self {
        Self::new(BaseType::Int, false)
    }

    pub fn char() -> Self {
        Self::new(BaseType::Char, false)
    }

    pub fn string() -> Self {
        Self::new(BaseType::String, false)
    }

    pub fn void() -> Self {
        Self::new(BaseType::Void, false)
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(BaseType::Class(name.into()), false)
    }

    /// The same type with the reference flag set
    pub fn reference(mut self) -> Self {
        self.is_ref = true;
        self
    }

    /// The base type: this type with the reference flag stripped
    pub fn base(&self) -> Self {
        Self::new(self.base.clone(), false)
    }

    /// Base-type equality, ignoring the reference flag on both sides
    pub fn same_base(&self, other: &Type) -> bool {
        self.base == other.base
    }

    pub fn is_class(&self) -> bool {
        matches!(self.base, BaseType::Class(_))
    }

    pub fn is_void(&self) -> bool {
        self.base == BaseType::Void
    }

    /// The class name, when this is a class type
    pub fn class_name(&self) -> Option<&str> {
        match &self.base {
            BaseType::Class(name) => Some(name),
            _ => None,
        }
    }
}

impl std::fmt::Display for Type {
    /// Canonical rendering: `int`, `bool`, `char`, `string`, `void` or the
    /// class name, suffixed with `&` for references. Signature keys in the
    /// dispatch tables are built from this form.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.base {
            BaseType::Bool => f.write_str("bool")?,
            BaseType::Int => f.write_str("int")?,
            BaseType::Char => f.write_str("char")?,
            BaseType::String => f.write_str("string")?,
            BaseType::Void => f.write_str("void")?,
            BaseType::Class(name) => f.write_str(name)?,
        }
        if self.is_ref {
            f.write_str("&")?;
        }
        Ok(())
    }
}

// ==================== Expressions ====================

/// Unary operators. `Plus` is a no-op that still requires `int`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Plus,
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    AndAnd,
    OrOr,
}

/// Expression nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    IntLit(i64),
    BoolLit(bool),
    CharLit(char),
    StringLit(String),
    /// Variable reference: `x`
    Var(String),
    /// Assignment to a variable: `x = value`
    Assign { name: String, value: Box<Expr> },
    /// Assignment to an object field: `obj.field = value`
    FieldAssign {
        object: Box<Expr>,
        field: String,
        value: Box<Expr>,
    },
    Unary { op: UnaryOp, operand: Box<Expr> },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// Free function call: `f(args)`
    Call { callee: String, args: Vec<Expr> },
    /// Object construction: `T(args)` where `T` is a known class name
    Construct { class: String, args: Vec<Expr> },
    /// Field access: `obj.field`
    Member { object: Box<Expr>, field: String },
    /// Method call: `obj.method(args)`
    MethodCall {
        object: Box<Expr>,
        method: String,
        args: Vec<Expr>,
    },
}

impl Expr {
    /// Variables and field accesses can stand on the left of `=` and can
    /// bind to reference parameters.
    pub fn is_lvalue(&self) -> bool {
        matches!(self, Expr::Var(_) | Expr::Member { .. })
    }
}

// ==================== Statements ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    Block(Vec<Stmt>),
    Expr(Expr),
    VarDecl {
        ty: Type,
        name: String,
        init: Option<Expr>,
    },
    If {
        cond: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    While { cond: Expr, body: Box<Stmt> },
    Return(Option<Expr>),
}

// ==================== Definitions ====================

/// A function or method parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub ty: Type,
    pub name: String,
}

/// A free function definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDef {
    pub name: String,
    pub return_type: Type,
    pub params: Vec<Param>,
    pub body: Stmt,
}

/// A field declaration inside a class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub ty: Type,
    pub name: String,
}

/// A method definition inside a class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDef {
    pub is_virtual: bool,
    pub name: String,
    pub return_type: Type,
    pub params: Vec<Param>,
    pub body: Stmt,
}

/// A constructor definition (no return type)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructorDef {
    pub params: Vec<Param>,
    pub body: Stmt,
}

/// A class definition with optional single public base
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDef {
    pub name: String,
    pub base: Option<String>,
    pub fields: Vec<FieldDecl>,
    pub ctors: Vec<ConstructorDef>,
    pub methods: Vec<MethodDef>,
}

/// Root of the AST: all class and free-function definitions
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Program {
    pub classes: Vec<ClassDef>,
    pub functions: Vec<FunctionDef>,
}

impl Program {
    /// Append another program's definitions (REPL accumulation)
    pub fn extend(&mut self, other: Program) {
        self.classes.extend(other.classes);
        self.functions.extend(other.functions);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_display_canonical() {
        assert_eq!(Type::int().to_string(), "int");
        assert_eq!(Type::bool().reference().to_string(), "bool&");
        assert_eq!(Type::class("Point").to_string(), "Point");
        assert_eq!(Type::class("Point").reference().to_string(), "Point&");
        assert_eq!(Type::void().to_string(), "void");
    }

    #[test]
    fn test_base_strips_ref_only() {
        let t = Type::class("A").reference();
        assert_eq!(t.base(), Type::class("A"));
        assert!(t.same_base(&Type::class("A")));
        assert!(!t.same_base(&Type::class("B")));
    }

    #[test]
    fn test_lvalue_expressions() {
        assert!(Expr::Var("x".into()).is_lvalue());
        assert!(Expr::Member {
            object: Box::new(Expr::Var("o".into())),
            field: "f".into()
        }
        .is_lvalue());
        assert!(!Expr::IntLit(3).is_lvalue());
    }
}
