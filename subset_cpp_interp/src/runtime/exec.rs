//! Tree-walking executor
//!
//! Evaluates expressions and executes statements against the
//! environment and the runtime tables. `return` travels as an ordinary
//! early-exit value ([`Flow::Return`]) up the evaluator's call stack,
//! never as an error. Overload re-resolution at dispatch time uses the
//! *static* types of receivers and arguments (declared slot and field
//! types), so the choices match the analyzer's even when a reference
//! holds a derived object.

use subset_cpp_parser::{
    BaseType, BinaryOp, ConstructorDef, Expr, FunctionDef, MethodDef, Param, Program, Stmt, Type,
    UnaryOp,
};

use crate::builtins;
use crate::runtime::assign::{assign_to_lvalue, materialize};
use crate::runtime::class_runtime::ClassRuntime;
use crate::runtime::env::{Env, FrameId};
use crate::runtime::error::RuntimeError;
use crate::runtime::functions::FunctionTable;
use crate::runtime::lvalue::LValue;
use crate::runtime::value::{new_handle, Object, ObjectRef, Value};
use crate::runtime::OutputEvent;

/// Early-exit control flow carried up the evaluator's call stack
#[derive(Debug)]
pub enum Flow {
    Normal,
    Return(Value),
}

fn expect_int(v: &Value, context: &str) -> Result<i64, RuntimeError> {
    match v {
        Value::Int(i) => Ok(*i),
        _ => Err(RuntimeError::type_error("int", context)),
    }
}

fn expect_bool(v: &Value, context: &str) -> Result<bool, RuntimeError> {
    match v {
        Value::Bool(b) => Ok(*b),
        _ => Err(RuntimeError::type_error("bool", context)),
    }
}

/// Truthiness in condition position: zero, NUL and the empty string are
/// false; objects do not convert.
fn truthy(v: &Value) -> Result<bool, RuntimeError> {
    match v {
        Value::Bool(b) => Ok(*b),
        Value::Int(i) => Ok(*i != 0),
        Value::Char(c) => Ok(*c != '\0'),
        Value::Str(s) => Ok(!s.is_empty()),
        Value::Object(_) => Err(RuntimeError::CannotConvertToBool),
    }
}

fn values_equal(l: &Value, r: &Value) -> Result<bool, RuntimeError> {
    match (l, r) {
        (Value::Bool(a), Value::Bool(b)) => Ok(a == b),
        (Value::Int(a), Value::Int(b)) => Ok(a == b),
        (Value::Char(a), Value::Char(b)) => Ok(a == b),
        (Value::Str(a), Value::Str(b)) => Ok(a == b),
        _ => Err(RuntimeError::type_error(
            "matching primitive operands",
            "'==' / '!='",
        )),
    }
}

fn ordering_of(l: &Value, r: &Value) -> Result<std::cmp::Ordering, RuntimeError> {
    match (l, r) {
        (Value::Int(a), Value::Int(b)) => Ok(a.cmp(b)),
        (Value::Char(a), Value::Char(b)) => Ok(a.cmp(b)),
        _ => Err(RuntimeError::type_error(
            "int or char operands",
            "relational operator",
        )),
    }
}

/// The executor: walks the typed tree against the durable program and
/// its runtime tables, emitting output events as it goes.
pub struct Interp<'a> {
    program: &'a Program,
    table: &'a FunctionTable,
    out: &'a mut Vec<OutputEvent>,
}

impl std::fmt::Debug for Interp<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interp").finish()
    }
}

impl<'a> Interp<'a> {
    pub fn new(
        program: &'a Program,
        table: &'a FunctionTable,
        out: &'a mut Vec<OutputEvent>,
    ) -> Self {
        Self {
            program,
            table,
            out,
        }
    }

    fn rt(&self) -> &'a ClassRuntime {
        let table = self.table;
        &table.class_rt
    }

    /// Emit an expression-statement echo into the output stream
    pub fn emit_value(&mut self, value: &Value) {
        self.out.push(OutputEvent::Value(value.repr()));
    }

    // ==================== Statements ====================

    pub fn exec_stmt(
        &mut self,
        env: &mut Env,
        frame: FrameId,
        stmt: &Stmt,
    ) -> Result<Flow, RuntimeError> {
        match stmt {
            Stmt::Block(stmts) => {
                let inner = env.push_frame(frame);
                let result = self.exec_block(env, inner, stmts);
                env.truncate(inner);
                result
            }

            Stmt::Expr(expr) => {
                self.eval_expr(env, frame, expr)?;
                Ok(Flow::Normal)
            }

            Stmt::VarDecl { ty, name, init } => {
                if ty.is_ref {
                    // Analysis guarantees an lvalue initializer.
                    let init = init.as_ref().ok_or_else(|| {
                        RuntimeError::Internal(format!("reference {name} without initializer"))
                    })?;
                    let target = self.eval_lvalue(env, frame, init)?;
                    env.define_ref(frame, name, target, ty.clone())?;
                } else {
                    let value = match init {
                        Some(expr) => {
                            let v = self.eval_expr(env, frame, expr)?;
                            materialize(self.rt(), ty, &v)?
                        }
                        None => self.default_value(env, frame, ty)?,
                    };
                    env.define_value(frame, name, value, ty.clone())?;
                }
                Ok(Flow::Normal)
            }

            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                if truthy(&self.eval_expr(env, frame, cond)?)? {
                    self.exec_stmt(env, frame, then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.exec_stmt(env, frame, else_branch)
                } else {
                    Ok(Flow::Normal)
                }
            }

            Stmt::While { cond, body } => {
                while truthy(&self.eval_expr(env, frame, cond)?)? {
                    if let Flow::Return(v) = self.exec_stmt(env, frame, body)? {
                        return Ok(Flow::Return(v));
                    }
                }
                Ok(Flow::Normal)
            }

            Stmt::Return(value) => {
                let v = match value {
                    Some(expr) => self.eval_expr(env, frame, expr)?,
                    None => Value::Int(0),
                };
                Ok(Flow::Return(v))
            }
        }
    }

    fn exec_block(
        &mut self,
        env: &mut Env,
        frame: FrameId,
        stmts: &[Stmt],
    ) -> Result<Flow, RuntimeError> {
        for stmt in stmts {
            if let Flow::Return(v) = self.exec_stmt(env, frame, stmt)? {
                return Ok(Flow::Return(v));
            }
        }
        Ok(Flow::Normal)
    }

    // ==================== Defaults and construction ====================

    /// Default value: false, 0, NUL, "", or a default-constructed object
    pub fn default_value(
        &mut self,
        env: &mut Env,
        frame: FrameId,
        ty: &Type,
    ) -> Result<Value, RuntimeError> {
        match &ty.base {
            BaseType::Bool => Ok(Value::Bool(false)),
            BaseType::Int => Ok(Value::Int(0)),
            BaseType::Char => Ok(Value::Char('\0')),
            BaseType::String => Ok(Value::Str(String::new())),
            BaseType::Void => Ok(Value::Int(0)),
            BaseType::Class(name) => {
                let class = name.clone();
                self.construct(env, frame, &class, &[], &[], &[])
            }
        }
    }

    /// Allocate an object with its merged field layout, every field
    /// default-initialized recursively
    fn allocate_object(
        &mut self,
        env: &mut Env,
        frame: FrameId,
        class: &str,
    ) -> Result<ObjectRef, RuntimeError> {
        let merged: Vec<(String, Type)> = self
            .rt()
            .get(class)?
            .merged_fields
            .iter()
            .map(|(name, ty)| (name.clone(), ty.clone()))
            .collect();

        let mut object = Object::new(class);
        for (name, ty) in merged {
            let value = self.default_value(env, frame, &ty)?;
            object.fields.insert(name, value);
        }
        Ok(new_handle(object))
    }

    /// Construct `class`: allocate, run the base chain's default
    /// constructors root-first, then the selected constructor body.
    fn construct(
        &mut self,
        env: &mut Env,
        frame: FrameId,
        class: &str,
        meta: &[(Type, bool)],
        vals: &[Value],
        lvals: &[Option<LValue>],
    ) -> Result<Value, RuntimeError> {
        let object = self.allocate_object(env, frame, class)?;
        let program = self.program;
        let ctor = self.rt().resolve_ctor(program, class, meta)?;

        if let Some(base) = self.rt().get(class)?.base.clone() {
            self.run_default_ctor_chain(env, frame, &object, &base)?;
        }
        if let Some(ctor) = ctor {
            self.run_ctor_body(env, frame, &object, ctor, vals, lvals)?;
        }
        Ok(Value::Object(object))
    }

    /// Default-construct the `class` portion of `object`: base chain
    /// first, then `class`'s own parameterless constructor if declared.
    fn run_default_ctor_chain(
        &mut self,
        env: &mut Env,
        frame: FrameId,
        object: &ObjectRef,
        class: &str,
    ) -> Result<(), RuntimeError> {
        if let Some(base) = self.rt().get(class)?.base.clone() {
            self.run_default_ctor_chain(env, frame, object, &base)?;
        }
        let program = self.program;
        if let Some(ctor) = self.rt().resolve_ctor(program, class, &[])? {
            self.run_ctor_body(env, frame, object, ctor, &[], &[])?;
        }
        Ok(())
    }

    fn run_ctor_body(
        &mut self,
        env: &mut Env,
        caller: FrameId,
        object: &ObjectRef,
        ctor: &ConstructorDef,
        vals: &[Value],
        lvals: &[Option<LValue>],
    ) -> Result<(), RuntimeError> {
        let frame = env.push_frame(caller);
        // A return inside a constructor just ends it early.
        let flow = self.member_frame_exec(env, frame, object, &ctor.params, vals, lvals, &ctor.body);
        env.truncate(frame);
        flow.map(|_| ())
    }

    // ==================== Calls ====================

    /// Bind the receiver's fields into the callee frame as references, so
    /// bare field names in member bodies read and write the receiver.
    /// The *dynamic* class decides the field set.
    fn bind_receiver_fields(
        &mut self,
        env: &mut Env,
        frame: FrameId,
        object: &ObjectRef,
    ) -> Result<(), RuntimeError> {
        let dynamic = object.borrow().dynamic_class.clone();
        let merged: Vec<(String, Type)> = self
            .rt()
            .get(&dynamic)?
            .merged_fields
            .iter()
            .map(|(name, ty)| (name.clone(), ty.clone()))
            .collect();

        for (name, ty) in merged {
            let target = LValue::Field {
                object: object.clone(),
                field: name.clone(),
            };
            env.define_ref(frame, &name, target, ty.reference())?;
        }
        Ok(())
    }

    /// Bind parameters: reference parameters capture the argument's
    /// location, value parameters store a copy under the declared type
    /// (class values slice to the parameter's class when needed).
    fn bind_params(
        &mut self,
        env: &mut Env,
        frame: FrameId,
        params: &[Param],
        vals: &[Value],
        lvals: &[Option<LValue>],
    ) -> Result<(), RuntimeError> {
        for (i, p) in params.iter().enumerate() {
            if p.ty.is_ref {
                let lv = lvals
                    .get(i)
                    .cloned()
                    .flatten()
                    .ok_or(RuntimeError::NotAnLValue)?;
                env.define_ref(frame, &p.name, lv, p.ty.clone())?;
            } else {
                let v = vals
                    .get(i)
                    .ok_or_else(|| RuntimeError::Internal("missing argument value".to_string()))?;
                let v = materialize(self.rt(), &p.ty, v)?;
                env.define_value(frame, &p.name, v, p.ty.clone())?;
            }
        }
        Ok(())
    }

    fn call_function(
        &mut self,
        env: &mut Env,
        caller: FrameId,
        def: &FunctionDef,
        vals: &[Value],
        lvals: &[Option<LValue>],
    ) -> Result<Value, RuntimeError> {
        let frame = env.push_frame(caller);
        let flow = self.function_frame(env, frame, def, vals, lvals);
        env.truncate(frame);
        match flow? {
            Flow::Return(v) => Ok(v),
            // Falling off the end yields integer zero.
            Flow::Normal => Ok(Value::Int(0)),
        }
    }

    fn function_frame(
        &mut self,
        env: &mut Env,
        frame: FrameId,
        def: &FunctionDef,
        vals: &[Value],
        lvals: &[Option<LValue>],
    ) -> Result<Flow, RuntimeError> {
        self.bind_params(env, frame, &def.params, vals, lvals)?;
        self.exec_stmt(env, frame, &def.body)
    }

    fn call_method(
        &mut self,
        env: &mut Env,
        caller: FrameId,
        object: &ObjectRef,
        def: &MethodDef,
        vals: &[Value],
        lvals: &[Option<LValue>],
    ) -> Result<Value, RuntimeError> {
        let frame = env.push_frame(caller);
        let flow = self.member_frame_exec(env, frame, object, &def.params, vals, lvals, &def.body);
        env.truncate(frame);
        match flow? {
            Flow::Return(v) => Ok(v),
            Flow::Normal => Ok(Value::Int(0)),
        }
    }

    fn member_frame_exec(
        &mut self,
        env: &mut Env,
        frame: FrameId,
        object: &ObjectRef,
        params: &[Param],
        vals: &[Value],
        lvals: &[Option<LValue>],
        body: &Stmt,
    ) -> Result<Flow, RuntimeError> {
        self.bind_receiver_fields(env, frame, object)?;
        self.bind_params(env, frame, params, vals, lvals)?;
        self.exec_stmt(env, frame, body)
    }

    // ==================== Expressions ====================

    pub fn eval_expr(
        &mut self,
        env: &mut Env,
        frame: FrameId,
        expr: &Expr,
    ) -> Result<Value, RuntimeError> {
        match expr {
            Expr::IntLit(v) => Ok(Value::Int(*v)),
            Expr::BoolLit(b) => Ok(Value::Bool(*b)),
            Expr::CharLit(c) => Ok(Value::Char(*c)),
            Expr::StringLit(s) => Ok(Value::Str(s.clone())),

            Expr::Var(name) => env.read_value(frame, name),

            Expr::Unary { op, operand } => {
                let v = self.eval_expr(env, frame, operand)?;
                match op {
                    UnaryOp::Not => Ok(Value::Bool(!expect_bool(&v, "'!'")?)),
                    // Unary + is a no-op that still requires int.
                    UnaryOp::Plus => {
                        expect_int(&v, "unary '+'")?;
                        Ok(v)
                    }
                    UnaryOp::Neg => Ok(Value::Int(expect_int(&v, "unary '-'")?.wrapping_neg())),
                }
            }

            Expr::Binary { op, lhs, rhs } => self.eval_binary(env, frame, *op, lhs, rhs),

            Expr::Assign { name, value } => {
                let rhs = self.eval_expr(env, frame, value)?;
                let lv = env.resolve_lvalue(frame, name)?;
                assign_to_lvalue(env, self.rt(), &lv, &rhs)?;
                Ok(rhs)
            }

            Expr::FieldAssign {
                object,
                field,
                value,
            } => {
                let receiver = self.eval_expr(env, frame, object)?;
                let object = receiver
                    .as_object()
                    .cloned()
                    .ok_or(RuntimeError::NotAnObject)?;
                let rhs = self.eval_expr(env, frame, value)?;
                let lv = LValue::Field {
                    object,
                    field: field.clone(),
                };
                assign_to_lvalue(env, self.rt(), &lv, &rhs)?;
                Ok(rhs)
            }

            Expr::Call { callee, args } => {
                let (vals, lvals, meta) = self.eval_args(env, frame, args)?;

                if self.table.has_function(callee) {
                    let program = self.program;
                    match self.table.resolve(program, callee, &meta) {
                        Ok(def) => return self.call_function(env, frame, def, &vals, &lvals),
                        // A user overload set may coexist with a built-in
                        // of the same name; fall through when none match.
                        Err(RuntimeError::NoMatchingOverload(_)) if builtins::is_builtin(callee) => {}
                        Err(e) => return Err(e),
                    }
                }
                if builtins::is_builtin(callee) {
                    return builtins::call(callee, &vals, self.out);
                }
                Err(RuntimeError::UnknownFunction(callee.clone()))
            }

            Expr::Construct { class, args } => {
                let (vals, lvals, meta) = self.eval_args(env, frame, args)?;
                self.construct(env, frame, class, &meta, &vals, &lvals)
            }

            Expr::Member { .. } => {
                let lv = self.eval_lvalue(env, frame, expr)?;
                env.read_lvalue(&lv)
            }

            Expr::MethodCall {
                object,
                method,
                args,
            } => {
                let static_ty = self.static_type_of_expr(env, frame, object)?;
                let receiver = if object.is_lvalue() {
                    let lv = self.eval_lvalue(env, frame, object)?;
                    env.read_lvalue(&lv)?
                } else {
                    self.eval_expr(env, frame, object)?
                };
                let obj = receiver
                    .as_object()
                    .cloned()
                    .ok_or(RuntimeError::NotAnObject)?;

                let dynamic = obj.borrow().dynamic_class.clone();
                let static_class = static_ty
                    .class_name()
                    .map(str::to_string)
                    .unwrap_or_else(|| dynamic.clone());
                let via_ref = static_ty.is_ref;

                let (vals, lvals, meta) = self.eval_args(env, frame, args)?;
                let program = self.program;
                let def = self.rt().resolve_method(
                    program,
                    &static_class,
                    &dynamic,
                    method,
                    &meta,
                    via_ref,
                )?;
                self.call_method(env, frame, &obj, def, &vals, &lvals)
            }
        }
    }

    fn eval_binary(
        &mut self,
        env: &mut Env,
        frame: FrameId,
        op: BinaryOp,
        lhs: &Expr,
        rhs: &Expr,
    ) -> Result<Value, RuntimeError> {
        // Logical operators short-circuit.
        match op {
            BinaryOp::AndAnd => {
                if !expect_bool(&self.eval_expr(env, frame, lhs)?, "'&&'")? {
                    return Ok(Value::Bool(false));
                }
                let r = self.eval_expr(env, frame, rhs)?;
                return Ok(Value::Bool(expect_bool(&r, "'&&'")?));
            }
            BinaryOp::OrOr => {
                if expect_bool(&self.eval_expr(env, frame, lhs)?, "'||'")? {
                    return Ok(Value::Bool(true));
                }
                let r = self.eval_expr(env, frame, rhs)?;
                return Ok(Value::Bool(expect_bool(&r, "'||'")?));
            }
            _ => {}
        }

        let l = self.eval_expr(env, frame, lhs)?;
        let r = self.eval_expr(env, frame, rhs)?;

        match op {
            BinaryOp::Add => Ok(Value::Int(
                expect_int(&l, "'+'")?.wrapping_add(expect_int(&r, "'+'")?),
            )),
            BinaryOp::Sub => Ok(Value::Int(
                expect_int(&l, "'-'")?.wrapping_sub(expect_int(&r, "'-'")?),
            )),
            BinaryOp::Mul => Ok(Value::Int(
                expect_int(&l, "'*'")?.wrapping_mul(expect_int(&r, "'*'")?),
            )),
            BinaryOp::Div => {
                let (a, b) = (expect_int(&l, "'/'")?, expect_int(&r, "'/'")?);
                if b == 0 {
                    return Err(RuntimeError::DivisionByZero);
                }
                a.checked_div(b)
                    .map(Value::Int)
                    .ok_or(RuntimeError::DivisionOverflow)
            }
            BinaryOp::Mod => {
                let (a, b) = (expect_int(&l, "'%'")?, expect_int(&r, "'%'")?);
                if b == 0 {
                    return Err(RuntimeError::DivisionByZero);
                }
                a.checked_rem(b)
                    .map(Value::Int)
                    .ok_or(RuntimeError::DivisionOverflow)
            }
            BinaryOp::Eq => Ok(Value::Bool(values_equal(&l, &r)?)),
            BinaryOp::Ne => Ok(Value::Bool(!values_equal(&l, &r)?)),
            BinaryOp::Lt => Ok(Value::Bool(ordering_of(&l, &r)?.is_lt())),
            BinaryOp::Le => Ok(Value::Bool(ordering_of(&l, &r)?.is_le())),
            BinaryOp::Gt => Ok(Value::Bool(ordering_of(&l, &r)?.is_gt())),
            BinaryOp::Ge => Ok(Value::Bool(ordering_of(&l, &r)?.is_ge())),
            BinaryOp::AndAnd | BinaryOp::OrOr => {
                Err(RuntimeError::Internal("unreachable logical operator".to_string()))
            }
        }
    }

    /// Evaluate an expression as a location
    fn eval_lvalue(
        &mut self,
        env: &mut Env,
        frame: FrameId,
        expr: &Expr,
    ) -> Result<LValue, RuntimeError> {
        match expr {
            Expr::Var(name) => env.resolve_lvalue(frame, name),
            Expr::Member { object, field } => {
                let receiver = self.eval_expr(env, frame, object)?;
                let object = receiver
                    .as_object()
                    .cloned()
                    .ok_or(RuntimeError::NotAnObject)?;
                Ok(LValue::Field {
                    object,
                    field: field.clone(),
                })
            }
            _ => Err(RuntimeError::NotAnLValue),
        }
    }

    /// Evaluate arguments once: values, locations for lvalue arguments,
    /// and (static base type, lvalue-ness) pairs for overload picks.
    fn eval_args(
        &mut self,
        env: &mut Env,
        frame: FrameId,
        args: &[Expr],
    ) -> Result<(Vec<Value>, Vec<Option<LValue>>, Vec<(Type, bool)>), RuntimeError> {
        let mut vals = Vec::with_capacity(args.len());
        let mut lvals = Vec::with_capacity(args.len());
        let mut meta = Vec::with_capacity(args.len());

        for arg in args {
            let static_ty = self.static_type_of_expr(env, frame, arg)?;
            if arg.is_lvalue() {
                let lv = self.eval_lvalue(env, frame, arg)?;
                vals.push(env.read_lvalue(&lv)?);
                lvals.push(Some(lv));
                meta.push((static_ty.base(), true));
            } else {
                vals.push(self.eval_expr(env, frame, arg)?);
                lvals.push(None);
                meta.push((static_ty.base(), false));
            }
        }
        Ok((vals, lvals, meta))
    }

    /// Static type of an expression, derived from declared slot, field
    /// and return types without evaluating anything
    fn static_type_of_expr(
        &self,
        env: &Env,
        frame: FrameId,
        expr: &Expr,
    ) -> Result<Type, RuntimeError> {
        match expr {
            Expr::IntLit(_) => Ok(Type::int()),
            Expr::BoolLit(_) => Ok(Type::bool()),
            Expr::CharLit(_) => Ok(Type::char()),
            Expr::StringLit(_) => Ok(Type::string()),

            Expr::Var(name) => env.static_type_of(frame, name),

            Expr::Member { object, field } => {
                let obj_ty = self.static_type_of_expr(env, frame, object)?;
                let class = obj_ty.class_name().ok_or(RuntimeError::NotAnObject)?;
                self.rt()
                    .get(class)?
                    .merged_fields
                    .get(field)
                    .cloned()
                    .ok_or_else(|| RuntimeError::UnknownField(field.clone()))
            }

            Expr::Construct { class, .. } => Ok(Type::class(class.clone())),

            Expr::Call { callee, args } => {
                let meta = self.static_arg_types(env, frame, args)?;
                if self.table.has_function(callee) {
                    match self.table.resolve(self.program, callee, &meta) {
                        Ok(def) => return Ok(def.return_type.base()),
                        Err(RuntimeError::NoMatchingOverload(_)) if builtins::is_builtin(callee) => {}
                        Err(e) => return Err(e),
                    }
                }
                if builtins::is_builtin(callee) {
                    return Ok(Type::int());
                }
                Err(RuntimeError::UnknownFunction(callee.clone()))
            }

            Expr::MethodCall {
                object,
                method,
                args,
            } => {
                let obj_ty = self.static_type_of_expr(env, frame, object)?;
                let class = obj_ty.class_name().ok_or(RuntimeError::NotAnObject)?;
                let meta = self.static_arg_types(env, frame, args)?;
                let def = self
                    .rt()
                    .pick_method_in_chain(self.program, class, method, &meta)?;
                Ok(def.return_type.base())
            }

            Expr::Assign { value, .. } | Expr::FieldAssign { value, .. } => {
                Ok(self.static_type_of_expr(env, frame, value)?.base())
            }

            Expr::Unary { op: UnaryOp::Not, .. } => Ok(Type::bool()),
            Expr::Unary { .. } => Ok(Type::int()),

            Expr::Binary { op, .. } => match op {
                BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => {
                    Ok(Type::int())
                }
                _ => Ok(Type::bool()),
            },
        }
    }

    fn static_arg_types(
        &self,
        env: &Env,
        frame: FrameId,
        args: &[Expr],
    ) -> Result<Vec<(Type, bool)>, RuntimeError> {
        args.iter()
            .map(|arg| {
                Ok((
                    self.static_type_of_expr(env, frame, arg)?.base(),
                    arg.is_lvalue(),
                ))
            })
            .collect()
    }
}
