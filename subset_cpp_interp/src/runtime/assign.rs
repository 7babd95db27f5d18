//! The value/reference/slicing discipline on assignment
//!
//! Classes have value semantics: writing a class value into a value-kind
//! destination deep-copies the source into the destination's *existing*
//! object handle, so extant references keep observing the same object.
//! When the source's dynamic class is a proper derived of the
//! destination's static class, the copy is then sliced to the static
//! class's merged field layout. Primitives copy by value. Reference
//! destinations were already resolved to their targets before this
//! module is reached.

use subset_cpp_parser::Type;

use crate::runtime::class_runtime::ClassRuntime;
use crate::runtime::env::Env;
use crate::runtime::error::RuntimeError;
use crate::runtime::lvalue::LValue;
use crate::runtime::value::{deep_copy, new_handle, Object, ObjectRef, Value};

/// Static type of a destination location: the slot's declared type for
/// variables, the declared field type (from the dynamic class's merged
/// layout) for fields.
fn destination_type(env: &Env, rt: &ClassRuntime, lv: &LValue) -> Result<Type, RuntimeError> {
    match lv {
        LValue::Var { frame, name } => env.slot_type_at(*frame, name),
        LValue::Field { object, field } => {
            let class = object.borrow().dynamic_class.clone();
            rt.get(&class)?
                .merged_fields
                .get(field)
                .cloned()
                .ok_or_else(|| RuntimeError::UnknownField(field.clone()))
        }
    }
}

/// Replace `dst`'s contents with a deep copy of `src`, slicing to
/// `dst_static_class` when the dynamic classes differ. The handle itself
/// is preserved.
pub fn copy_into_object(
    rt: &ClassRuntime,
    dst: &ObjectRef,
    src: &ObjectRef,
    dst_static_class: &str,
) -> Result<(), RuntimeError> {
    // Copy out first so self-assignment and aliased sources are safe.
    let (src_dynamic, copied_fields) = {
        let src = src.borrow();
        let fields = src
            .fields
            .iter()
            .map(|(name, v)| (name.clone(), deep_copy(v)))
            .collect();
        (src.dynamic_class.clone(), fields)
    };

    let mut dst = dst.borrow_mut();
    dst.fields = copied_fields;
    if src_dynamic == dst_static_class {
        dst.dynamic_class = src_dynamic;
    } else {
        // Proper derived source: keep only the static class's fields.
        let allowed = &rt.get(dst_static_class)?.merged_fields;
        dst.slice_to(allowed);
        dst.dynamic_class = dst_static_class.to_string();
    }
    Ok(())
}

/// Write `rhs` into a resolved destination, applying the discipline
pub fn assign_to_lvalue(
    env: &mut Env,
    rt: &ClassRuntime,
    lv: &LValue,
    rhs: &Value,
) -> Result<(), RuntimeError> {
    let static_ty = destination_type(env, rt, lv)?;

    if static_ty.is_class() && !static_ty.is_ref {
        let Value::Object(src) = rhs else {
            return Err(RuntimeError::type_error("object", "class assignment"));
        };
        let current = env.read_lvalue(lv)?;
        let Value::Object(dst) = current else {
            return Err(RuntimeError::type_error("object", "class assignment target"));
        };
        let class = static_ty
            .class_name()
            .ok_or_else(|| RuntimeError::Internal("class type without a name".to_string()))?;
        return copy_into_object(rt, &dst, src, class);
    }

    env.write_lvalue_raw(lv, rhs.clone())
}

/// Produce the value stored into a *fresh* slot of declared type `ty`
/// (variable initialization, value parameter binding): class values are
/// deep-copied into a new handle and sliced to the declared class when
/// the dynamic class is a proper derived of it.
pub fn materialize(rt: &ClassRuntime, ty: &Type, value: &Value) -> Result<Value, RuntimeError> {
    let (Some(class), Value::Object(src)) = (ty.class_name(), value) else {
        return Ok(value.clone());
    };
    if ty.is_ref {
        return Ok(value.clone());
    }

    let src_b = src.borrow();
    let mut copy = Object::new(src_b.dynamic_class.clone());
    copy.fields = src_b
        .fields
        .iter()
        .map(|(name, v)| (name.clone(), deep_copy(v)))
        .collect();
    if src_b.dynamic_class != class {
        copy.slice_to(&rt.get(class)?.merged_fields);
        copy.dynamic_class = class.to_string();
    }
    Ok(Value::Object(new_handle(copy)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::rc::Rc;
    use subset_cpp_parser::parse_program;

    fn runtime(source: &str) -> ClassRuntime {
        let program = parse_program(source, &HashSet::new()).expect("parse failed");
        ClassRuntime::build(&program).expect("build failed")
    }

    #[test]
    fn test_handle_preserved_across_class_assignment() {
        let rt = runtime("class A { int x; } class B : public A { int y; }");

        let mut env = Env::new();
        let mut a = Object::new("A");
        a.fields.insert("x".into(), Value::Int(1));
        let a_handle = new_handle(a);
        env.define_value(
            Env::GLOBAL,
            "a",
            Value::Object(a_handle.clone()),
            Type::class("A"),
        )
        .unwrap();

        let mut b = Object::new("B");
        b.fields.insert("x".into(), Value::Int(10));
        b.fields.insert("y".into(), Value::Int(20));
        let b_handle = new_handle(b);

        let lv = env.resolve_lvalue(Env::GLOBAL, "a").unwrap();
        assign_to_lvalue(&mut env, &rt, &lv, &Value::Object(b_handle)).unwrap();

        // Same handle, new contents, sliced to A.
        let current = env.read_value(Env::GLOBAL, "a").unwrap();
        let Value::Object(now) = current else { panic!("expected object") };
        assert!(Rc::ptr_eq(&now, &a_handle));
        let obj = now.borrow();
        assert_eq!(obj.dynamic_class, "A");
        assert_eq!(obj.fields["x"], Value::Int(10));
        assert!(!obj.fields.contains_key("y"));
    }

    #[test]
    fn test_materialize_slices_derived_values() {
        let rt = runtime("class A { int x; } class B : public A { int y; }");
        let mut b = Object::new("B");
        b.fields.insert("x".into(), Value::Int(10));
        b.fields.insert("y".into(), Value::Int(20));
        let value = Value::Object(new_handle(b));

        let stored = materialize(&rt, &Type::class("A"), &value).unwrap();
        let Value::Object(obj) = &stored else { panic!("expected object") };
        assert_eq!(obj.borrow().dynamic_class, "A");
        assert!(!obj.borrow().fields.contains_key("y"));
        // Fresh handle, not an alias of the source.
        assert_ne!(stored, value);
    }

    #[test]
    fn test_materialize_copies_primitives_untouched() {
        let rt = runtime("");
        assert_eq!(
            materialize(&rt, &Type::int(), &Value::Int(7)).unwrap(),
            Value::Int(7)
        );
    }

    #[test]
    fn test_self_assignment_is_safe() {
        let rt = runtime("class A { int x; }");
        let mut a = Object::new("A");
        a.fields.insert("x".into(), Value::Int(3));
        let handle = new_handle(a);
        copy_into_object(&rt, &handle, &handle, "A").unwrap();
        assert_eq!(handle.borrow().fields["x"], Value::Int(3));
    }
}
