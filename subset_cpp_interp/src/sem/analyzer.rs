//! Semantic analyzer
//!
//! Type-checks expressions and statements against the scope and the
//! class table: typing rules, reference binding, overload resolution
//! with score-based tie-breaks, and the statement-level checks
//! (declarations, conditions, returns).

use subset_cpp_parser::{BinaryOp, Expr, FunctionDef, Param, Stmt, Type, UnaryOp};

use crate::sem::class_table::{pick_overload, Ambiguous, ClassTable};
use crate::sem::error::SemanticError;
use crate::sem::scope::Scope;
use crate::sem::symbols::FuncSymbol;

/// Overload score weights for free functions and constructors. Methods
/// use 1/0 inside the class table; all that matters is that a bound
/// reference parameter outranks a value parameter and ties fail.
const REF_WEIGHT: i32 = 2;
const VALUE_WEIGHT: i32 = 1;

pub struct Analyzer<'a> {
    table: &'a ClassTable,
}

impl std::fmt::Debug for Analyzer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer").finish()
    }
}

impl<'a> Analyzer<'a> {
    pub fn new(table: &'a ClassTable) -> Self {
        Self { table }
    }

    /// Class types must name a declared class
    fn validate_type(&self, scope: &Scope, ty: &Type) -> Result<(), SemanticError> {
        if let Some(name) = ty.class_name() {
            if !scope.has_class(name) {
                return Err(SemanticError::UnknownClass(name.to_string()));
            }
        }
        Ok(())
    }

    /// Truthiness: conditions accept bool, int, char and string values;
    /// references and class values are rejected.
    fn is_bool_context(&self, ty: &Type) -> bool {
        !ty.is_ref && !ty.is_class() && !ty.is_void()
    }

    /// Base types and lvalue-ness of an argument list, for overload picks
    fn arg_types(&self, scope: &Scope, args: &[Expr]) -> Result<Vec<(Type, bool)>, SemanticError> {
        args.iter()
            .map(|arg| Ok((self.type_of_expr(scope, arg)?.base(), arg.is_lvalue())))
            .collect()
    }

    /// Can `init` bind to a reference of type `dst`? It must be an lvalue
    /// whose static base type equals the reference's base type, or — for
    /// class references — is derived from it.
    pub fn can_bind_ref(
        &self,
        scope: &Scope,
        dst: &Type,
        init: &Expr,
    ) -> Result<bool, SemanticError> {
        if !dst.is_ref {
            return Ok(false);
        }
        if !init.is_lvalue() {
            return Ok(false);
        }
        let src = self.type_of_expr(scope, init)?;
        if src.same_base(dst) {
            return Ok(true);
        }
        Ok(match (dst.class_name(), src.class_name()) {
            (Some(base), Some(derived)) => self.table.is_same_or_derived(derived, base),
            _ => false,
        })
    }

    // ==================== Expressions ====================

    pub fn type_of_expr(&self, scope: &Scope, expr: &Expr) -> Result<Type, SemanticError> {
        match expr {
            Expr::IntLit(_) => Ok(Type::int()),
            Expr::BoolLit(_) => Ok(Type::bool()),
            Expr::CharLit(_) => Ok(Type::char()),
            Expr::StringLit(_) => Ok(Type::string()),

            Expr::Var(name) => scope
                .lookup_var(name)
                .cloned()
                .ok_or_else(|| SemanticError::UnknownVariable(name.clone())),

            Expr::Unary { op, operand } => {
                let ty = self.type_of_expr(scope, operand)?;
                match op {
                    UnaryOp::Not => {
                        if !ty.same_base(&Type::bool()) {
                            return Err(SemanticError::NotExpectsBool);
                        }
                        Ok(Type::bool())
                    }
                    UnaryOp::Plus | UnaryOp::Neg => {
                        if !ty.same_base(&Type::int()) {
                            return Err(SemanticError::UnaryExpectsInt);
                        }
                        Ok(Type::int())
                    }
                }
            }

            Expr::Binary { op, lhs, rhs } => {
                let lt = self.type_of_expr(scope, lhs)?;
                let rt = self.type_of_expr(scope, rhs)?;
                self.type_of_binary(*op, &lt, &rt)
            }

            Expr::Assign { name, value } => {
                let lt = scope
                    .lookup_var(name)
                    .cloned()
                    .ok_or_else(|| SemanticError::UnknownVariable(name.clone()))?;
                let rt = self.type_of_expr(scope, value)?;

                // Writes through a reference target the bound location;
                // base types must still match exactly.
                if lt.is_ref {
                    if !lt.same_base(&rt) {
                        return Err(self.assign_mismatch(&lt, &rt));
                    }
                    return Ok(rt.base());
                }

                if !lt.same_base(&rt) {
                    return self.class_assign_allowance(&lt, &rt);
                }
                Ok(rt.base())
            }

            Expr::FieldAssign {
                object,
                field,
                value,
            } => {
                let objt = self.type_of_expr(scope, object)?;
                let class = objt
                    .class_name()
                    .ok_or_else(|| SemanticError::FieldAssignOnNonClass(objt.to_string()))?
                    .to_string();
                let ft = self.table.field_type_in_chain(&class, field)?;
                let rt = self.type_of_expr(scope, value)?;

                if !ft.same_base(&rt) {
                    return self.class_assign_allowance(&ft, &rt);
                }
                Ok(rt.base())
            }

            Expr::Call { callee, args } => {
                let overloads = scope
                    .overloads(callee)
                    .ok_or_else(|| SemanticError::UnknownFunction(callee.clone()))?;
                let args = self.arg_types(scope, args)?;

                match pick_overload(
                    overloads,
                    |f: &FuncSymbol| f.param_types.as_slice(),
                    &args,
                    |d, b| self.table.is_same_or_derived(d, b),
                    REF_WEIGHT,
                    VALUE_WEIGHT,
                ) {
                    Err(Ambiguous) => Err(SemanticError::AmbiguousFunction(callee.clone())),
                    Ok(None) => Err(SemanticError::NoMatchingFunction(callee.clone())),
                    Ok(Some(best)) => Ok(best.return_type.clone()),
                }
            }

            Expr::Construct { class, args } => {
                let symbol = self.table.get(class)?;
                let args = self.arg_types(scope, args)?;

                match pick_overload(
                    &symbol.ctors,
                    |c| c.param_types.as_slice(),
                    &args,
                    |d, b| self.table.is_same_or_derived(d, b),
                    REF_WEIGHT,
                    VALUE_WEIGHT,
                ) {
                    Err(Ambiguous) => Err(SemanticError::AmbiguousConstructor(class.clone())),
                    Ok(None) => Err(SemanticError::NoMatchingConstructor(class.clone())),
                    Ok(Some(_)) => Ok(Type::class(class.clone())),
                }
            }

            Expr::Member { object, field } => {
                let objt = self.type_of_expr(scope, object)?;
                let class = objt
                    .class_name()
                    .ok_or_else(|| SemanticError::MemberOnNonClass(objt.to_string()))?;
                self.table.field_type_in_chain(class, field)
            }

            Expr::MethodCall {
                object,
                method,
                args,
            } => {
                let objt = self.type_of_expr(scope, object)?;
                let class = objt
                    .class_name()
                    .ok_or_else(|| SemanticError::MethodOnNonClass(objt.to_string()))?
                    .to_string();
                let args = self.arg_types(scope, args)?;
                let picked = self.table.resolve_method_call(&class, method, &args)?;
                Ok(picked.return_type.clone())
            }
        }
    }

    fn type_of_binary(&self, op: BinaryOp, lt: &Type, rt: &Type) -> Result<Type, SemanticError> {
        match op {
            BinaryOp::AndAnd | BinaryOp::OrOr => {
                if !lt.same_base(&Type::bool()) || !rt.same_base(&Type::bool()) {
                    return Err(SemanticError::LogicalExpectsBool);
                }
                Ok(Type::bool())
            }
            BinaryOp::Eq | BinaryOp::Ne => {
                if !lt.same_base(rt) {
                    return Err(SemanticError::EqualityMismatch);
                }
                if lt.is_class() || lt.is_void() {
                    return Err(SemanticError::EqualityUnsupported(lt.base().to_string()));
                }
                Ok(Type::bool())
            }
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
                if !lt.same_base(rt) {
                    return Err(SemanticError::RelationalMismatch);
                }
                if !lt.same_base(&Type::int()) && !lt.same_base(&Type::char()) {
                    return Err(SemanticError::RelationalUnsupported(lt.base().to_string()));
                }
                Ok(Type::bool())
            }
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => {
                if !lt.same_base(&Type::int()) || !rt.same_base(&Type::int()) {
                    return Err(SemanticError::ArithmeticExpectsInt);
                }
                Ok(Type::int())
            }
        }
    }

    fn assign_mismatch(&self, expected: &Type, found: &Type) -> SemanticError {
        SemanticError::AssignTypeMismatch {
            expected: expected.base().to_string(),
            found: found.base().to_string(),
        }
    }

    /// Mismatched bases on assignment are allowed in exactly one case:
    /// class destination with an rhs class equal to or derived from it
    /// (slicing narrows the value at execution time). The mirror case —
    /// assigning a less derived value into a more derived destination —
    /// stays a type error.
    fn class_assign_allowance(&self, lt: &Type, rt: &Type) -> Result<Type, SemanticError> {
        if let (Some(lhs_class), Some(rhs_class)) = (lt.class_name(), rt.class_name()) {
            if self.table.is_same_or_derived(rhs_class, lhs_class) {
                return Ok(lt.base());
            }
        }
        Err(self.assign_mismatch(lt, rt))
    }

    // ==================== Statements ====================

    pub fn check_stmt(
        &self,
        scope: &mut Scope,
        stmt: &Stmt,
        expected_return: &Type,
    ) -> Result<(), SemanticError> {
        match stmt {
            Stmt::Block(stmts) => {
                scope.push_frame();
                let result = stmts
                    .iter()
                    .try_for_each(|s| self.check_stmt(scope, s, expected_return));
                scope.pop_frame();
                result
            }

            Stmt::Expr(expr) => {
                self.type_of_expr(scope, expr)?;
                Ok(())
            }

            Stmt::VarDecl { ty, name, init } => {
                if ty.is_void() {
                    return Err(SemanticError::VoidVariable(name.clone()));
                }
                self.validate_type(scope, ty)?;
                if scope.has_var_local(name) {
                    return Err(SemanticError::VariableRedefinition(name.clone()));
                }

                if ty.is_ref {
                    let init = init
                        .as_ref()
                        .ok_or_else(|| SemanticError::RefNeedsInit(name.clone()))?;
                    if !self.can_bind_ref(scope, ty, init)? {
                        return Err(SemanticError::RefBindInvalid(name.clone()));
                    }
                } else if let Some(init) = init {
                    // Value initialization wants an exact base match; the
                    // derived-into-base allowance exists only on assignment.
                    let it = self.type_of_expr(scope, init)?;
                    if !it.same_base(ty) {
                        return Err(SemanticError::InitTypeMismatch {
                            name: name.clone(),
                            expected: ty.base().to_string(),
                            found: it.base().to_string(),
                        });
                    }
                }

                scope.define_var(name, ty.clone())
            }

            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let ct = self.type_of_expr(scope, cond)?;
                if !self.is_bool_context(&ct) {
                    return Err(SemanticError::ConditionNotBool {
                        context: "if",
                        ty: ct.to_string(),
                    });
                }
                self.check_stmt(scope, then_branch, expected_return)?;
                if let Some(else_branch) = else_branch {
                    self.check_stmt(scope, else_branch, expected_return)?;
                }
                Ok(())
            }

            Stmt::While { cond, body } => {
                let ct = self.type_of_expr(scope, cond)?;
                if !self.is_bool_context(&ct) {
                    return Err(SemanticError::ConditionNotBool {
                        context: "while",
                        ty: ct.to_string(),
                    });
                }
                self.check_stmt(scope, body, expected_return)
            }

            Stmt::Return(value) => {
                if expected_return.is_void() {
                    if value.is_some() {
                        return Err(SemanticError::ReturnInVoid);
                    }
                    return Ok(());
                }
                let value = value.as_ref().ok_or(SemanticError::MissingReturnValue)?;
                let rt = self.type_of_expr(scope, value)?;
                if !rt.same_base(expected_return) {
                    return Err(SemanticError::ReturnTypeMismatch {
                        expected: expected_return.base().to_string(),
                        found: rt.base().to_string(),
                    });
                }
                Ok(())
            }
        }
    }

    /// Define a parameter list in a fresh frame
    fn define_params(
        &self,
        scope: &mut Scope,
        params: &[Param],
        fields_of: Option<&str>,
    ) -> Result<(), SemanticError> {
        for p in params {
            if p.ty.is_void() {
                return Err(SemanticError::VoidParameter(p.name.clone()));
            }
            self.validate_type(scope, &p.ty)?;
            if let Some(class) = fields_of {
                if self.table.has_field_in_chain(class, &p.name) {
                    return Err(SemanticError::ParameterShadowsField(p.name.clone()));
                }
            }
            if scope.has_var_local(&p.name) {
                return Err(SemanticError::DuplicateParameter(p.name.clone()));
            }
            scope.define_var(&p.name, p.ty.clone())?;
        }
        Ok(())
    }

    /// Check a free function: parameters in a fresh frame over the global
    /// scope, body against the declared return type.
    pub fn check_function(&self, scope: &mut Scope, f: &FunctionDef) -> Result<(), SemanticError> {
        self.validate_type(scope, &f.return_type)?;
        scope.push_frame();
        let result = self
            .define_params(scope, &f.params, None)
            .and_then(|_| self.check_stmt(scope, &f.body, &f.return_type));
        scope.pop_frame();
        result
    }

    /// Check a method: the class's merged fields are visible as implicit
    /// variables underneath the parameter frame.
    pub fn check_method(
        &self,
        scope: &mut Scope,
        class: &str,
        m: &subset_cpp_parser::MethodDef,
    ) -> Result<(), SemanticError> {
        self.validate_type(scope, &m.return_type)?;
        self.check_member_body(scope, class, &m.params, &m.body, &m.return_type)
    }

    /// Check a constructor: like a method with a void return
    pub fn check_constructor(
        &self,
        scope: &mut Scope,
        class: &str,
        ctor: &subset_cpp_parser::ConstructorDef,
    ) -> Result<(), SemanticError> {
        self.check_member_body(scope, class, &ctor.params, &ctor.body, &Type::void())
    }

    fn check_member_body(
        &self,
        scope: &mut Scope,
        class: &str,
        params: &[Param],
        body: &Stmt,
        expected_return: &Type,
    ) -> Result<(), SemanticError> {
        // Member frame: every merged field is an implicit variable.
        scope.push_frame();
        let result = (|| {
            for (name, ty) in self.table.merged_fields(class)? {
                scope.define_var(&name, ty)?;
            }
            // Parameter frame on top; parameters may not shadow fields.
            scope.push_frame();
            let inner = self
                .define_params(scope, params, Some(class))
                .and_then(|_| self.check_stmt(scope, body, expected_return));
            scope.pop_frame();
            inner
        })();
        scope.pop_frame();
        result
    }
}
