//! Semantic error types
//!
//! One variant per rule violation. Messages carry no prefix; the
//! top-level wrapper adds `semantic error: `.

use thiserror::Error;

/// Violations detected by the analyzer or the class table
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SemanticError {
    // ==================== Classes and inheritance ====================
    #[error("class redefinition: {0}")]
    ClassRedefinition(String),

    #[error("unknown class: {0}")]
    UnknownClass(String),

    #[error("unknown base class of {class}: {base}")]
    UnknownBaseClass { class: String, base: String },

    #[error("inheritance cycle involving: {0}")]
    InheritanceCycle(String),

    #[error("base class has no default constructor: {0}")]
    NoDefaultBaseCtor(String),

    #[error("field redefinition in class {class}: {field}")]
    FieldRedefinition { class: String, field: String },

    #[error("reference-typed field not allowed in class {class}: {field}")]
    ReferenceField { class: String, field: String },

    #[error("field of void type in class {class}: {field}")]
    VoidField { class: String, field: String },

    #[error("constructor overload redefinition in class {0}")]
    CtorOverloadRedefinition(String),

    #[error("method overload redefinition in class {class}: {method}")]
    MethodOverloadRedefinition { class: String, method: String },

    #[error("override return type mismatch in class {class} for method {method}")]
    OverrideReturnMismatch { class: String, method: String },

    #[error("unknown field: {class}.{field}")]
    UnknownField { class: String, field: String },

    // ==================== Names and scopes ====================
    #[error("unknown variable: {0}")]
    UnknownVariable(String),

    #[error("variable redefinition: {0}")]
    VariableRedefinition(String),

    #[error("duplicate parameter name: {0}")]
    DuplicateParameter(String),

    #[error("parameter shadows field: {0}")]
    ParameterShadowsField(String),

    #[error("cannot declare variable of void type: {0}")]
    VoidVariable(String),

    #[error("parameter of void type: {0}")]
    VoidParameter(String),

    // ==================== Functions and overloads ====================
    #[error("unknown function: {0}")]
    UnknownFunction(String),

    #[error("function overload redefinition: {0}")]
    FunctionOverloadRedefinition(String),

    #[error("ambiguous overload for function: {0}")]
    AmbiguousFunction(String),

    #[error("no matching overload for function: {0}")]
    NoMatchingFunction(String),

    #[error("ambiguous overload for constructor: {0}")]
    AmbiguousConstructor(String),

    #[error("no matching overload for constructor: {0}")]
    NoMatchingConstructor(String),

    #[error("ambiguous overload for method: {0}")]
    AmbiguousMethod(String),

    #[error("no matching overload for method: {0}")]
    NoMatchingMethod(String),

    #[error("invalid main signature: main must be 'int main()' or 'void main()'")]
    InvalidMainSignature,

    // ==================== Expression typing ====================
    #[error("'!' expects a bool operand")]
    NotExpectsBool,

    #[error("unary '+'/'-' expects an int operand")]
    UnaryExpectsInt,

    #[error("'&&'/'||' expect bool operands")]
    LogicalExpectsBool,

    #[error("'=='/'!=' expect matching operand types")]
    EqualityMismatch,

    #[error("'=='/'!=' not supported for type: {0}")]
    EqualityUnsupported(String),

    #[error("relational operator expects matching operand types")]
    RelationalMismatch,

    #[error("relational operator not supported for type: {0}")]
    RelationalUnsupported(String),

    #[error("arithmetic expects int operands")]
    ArithmeticExpectsInt,

    #[error("member access on non-class type: {0}")]
    MemberOnNonClass(String),

    #[error("method call on non-class type: {0}")]
    MethodOnNonClass(String),

    #[error("field assignment on non-class type: {0}")]
    FieldAssignOnNonClass(String),

    // ==================== Assignment and binding ====================
    #[error("assignment type mismatch: expected {expected}, got {found}")]
    AssignTypeMismatch { expected: String, found: String },

    #[error("initializer type mismatch for variable {name}: expected {expected}, got {found}")]
    InitTypeMismatch {
        name: String,
        expected: String,
        found: String,
    },

    #[error("reference variable must be initialized: {0}")]
    RefNeedsInit(String),

    #[error("cannot bind reference to this initializer: {0}")]
    RefBindInvalid(String),

    // ==================== Statements ====================
    #[error("{context} condition not convertible to bool: {ty}")]
    ConditionNotBool { context: &'static str, ty: String },

    #[error("return with value in void function")]
    ReturnInVoid,

    #[error("missing return value")]
    MissingReturnValue,

    #[error("return type mismatch: expected {expected}, got {found}")]
    ReturnTypeMismatch { expected: String, found: String },
}
