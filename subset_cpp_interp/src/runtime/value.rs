//! Runtime values and objects
//!
//! Objects are reference-counted, internally mutable records. Sharing a
//! handle is cheap and deliberate (references, receiver field binding);
//! the value-semantic discipline of plain assignment is enforced by the
//! executor (see `assign.rs`), not by the handle type.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use subset_cpp_parser::Type;

/// Shared handle to a heap object
pub type ObjectRef = Rc<RefCell<Object>>;

/// A runtime value
#[derive(Debug, Clone)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Char(char),
    Str(String),
    Object(ObjectRef),
}

impl PartialEq for Value {
    /// Primitives compare by value; object handles compare by identity.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Value {
    /// The static type a bare value denotes (used as a fallback when no
    /// declared type is known for an expression)
    pub fn type_of(&self) -> Type {
        match self {
            Value::Bool(_) => Type::bool(),
            Value::Int(_) => Type::int(),
            Value::Char(_) => Type::char(),
            Value::Str(_) => Type::string(),
            Value::Object(obj) => Type::class(obj.borrow().dynamic_class.clone()),
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// REPL echo form: `true`, `42`, `'c'`, `"text"`, `<obj:Class>`
    pub fn repr(&self) -> String {
        match self {
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Char(c) => format!("'{}'", c),
            Value::Str(s) => format!("{:?}", s),
            Value::Object(obj) => format!("<obj:{}>", obj.borrow().dynamic_class),
        }
    }
}

/// A heap object: its dynamic class plus the field store
#[derive(Debug)]
pub struct Object {
    pub dynamic_class: String,
    pub fields: HashMap<String, Value>,
}

impl Object {
    pub fn new(dynamic_class: impl Into<String>) -> Self {
        Self {
            dynamic_class: dynamic_class.into(),
            fields: HashMap::new(),
        }
    }

    /// Drop every field not present in `allowed` (object slicing)
    pub fn slice_to(&mut self, allowed: &HashMap<String, Type>) {
        self.fields.retain(|name, _| allowed.contains_key(name));
    }
}

/// Wrap an object in a fresh shared handle
pub fn new_handle(object: Object) -> ObjectRef {
    Rc::new(RefCell::new(object))
}

/// Deep copy: primitives copy by value, objects copy structurally into
/// fresh handles all the way down.
pub fn deep_copy(value: &Value) -> Value {
    match value {
        Value::Object(obj) => {
            let src = obj.borrow();
            let mut copy = Object::new(src.dynamic_class.clone());
            copy.fields = src
                .fields
                .iter()
                .map(|(name, v)| (name.clone(), deep_copy(v)))
                .collect();
            Value::Object(new_handle(copy))
        }
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deep_copy_breaks_sharing() {
        let mut obj = Object::new("P");
        obj.fields.insert("x".into(), Value::Int(1));
        let original = Value::Object(new_handle(obj));

        let copy = deep_copy(&original);
        let (Value::Object(a), Value::Object(b)) = (&original, &copy) else {
            panic!("expected objects");
        };
        assert!(!Rc::ptr_eq(a, b));
        b.borrow_mut().fields.insert("x".into(), Value::Int(2));
        assert_eq!(a.borrow().fields["x"], Value::Int(1));
    }

    #[test]
    fn test_repr_forms() {
        assert_eq!(Value::Bool(true).repr(), "true");
        assert_eq!(Value::Int(-3).repr(), "-3");
        assert_eq!(Value::Char('a').repr(), "'a'");
        assert_eq!(Value::Str("hi\n".into()).repr(), "\"hi\\n\"");
        let obj = Value::Object(new_handle(Object::new("P")));
        assert_eq!(obj.repr(), "<obj:P>");
    }

    #[test]
    fn test_object_equality_is_identity() {
        let a = Value::Object(new_handle(Object::new("P")));
        let b = Value::Object(new_handle(Object::new("P")));
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_slice_to() {
        let mut obj = Object::new("B");
        obj.fields.insert("x".into(), Value::Int(10));
        obj.fields.insert("y".into(), Value::Int(20));
        let mut allowed = HashMap::new();
        allowed.insert("x".to_string(), Type::int());
        obj.slice_to(&allowed);
        assert_eq!(obj.fields.len(), 1);
        assert!(obj.fields.contains_key("x"));
    }
}
