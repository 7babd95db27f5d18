//! Runtime environment
//!
//! A frame arena indexed by `FrameId`. Frames form a parent chain for
//! lookup; block and call entry push frames, exit truncates them.
//! Frame 0 (globals) and, in a session, frame 1 (the session frame)
//! persist. A slot holds either a value with its static type, or a
//! reference: a target location fixed at definition time and never
//! rebound.

use std::collections::HashMap;

use subset_cpp_parser::Type;

use crate::runtime::error::RuntimeError;
use crate::runtime::lvalue::LValue;
use crate::runtime::value::Value;

pub type FrameId = usize;

/// A variable slot
#[derive(Debug)]
pub enum Slot {
    Value { value: Value, static_type: Type },
    Reference { target: LValue, static_type: Type },
}

impl Slot {
    pub fn static_type(&self) -> &Type {
        match self {
            Slot::Value { static_type, .. } => static_type,
            Slot::Reference { static_type, .. } => static_type,
        }
    }
}

#[derive(Debug)]
struct Frame {
    parent: Option<FrameId>,
    slots: HashMap<String, Slot>,
}

/// The frame arena
#[derive(Debug)]
pub struct Env {
    frames: Vec<Frame>,
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

impl Env {
    pub const GLOBAL: FrameId = 0;

    /// A fresh environment with the global frame
    pub fn new() -> Self {
        Self {
            frames: vec![Frame {
                parent: None,
                slots: HashMap::new(),
            }],
        }
    }

    /// Push a frame whose lookups continue in `parent`
    pub fn push_frame(&mut self, parent: FrameId) -> FrameId {
        self.frames.push(Frame {
            parent: Some(parent),
            slots: HashMap::new(),
        });
        self.frames.len() - 1
    }

    /// Drop `frame` and everything pushed after it
    pub fn truncate(&mut self, frame: FrameId) {
        // Never drop the persistent frames at the bottom.
        if frame > Env::GLOBAL {
            self.frames.truncate(frame);
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Find the frame that defines `name`, starting at `frame`
    fn defining_frame(&self, frame: FrameId, name: &str) -> Option<FrameId> {
        let mut cur = Some(frame);
        while let Some(id) = cur {
            let f = self.frames.get(id)?;
            if f.slots.contains_key(name) {
                return Some(id);
            }
            cur = f.parent;
        }
        None
    }

    fn slot(&self, frame: FrameId, name: &str) -> Result<&Slot, RuntimeError> {
        let def = self
            .defining_frame(frame, name)
            .ok_or_else(|| RuntimeError::UndefinedVariable(name.to_string()))?;
        self.frames[def]
            .slots
            .get(name)
            .ok_or_else(|| RuntimeError::UndefinedVariable(name.to_string()))
    }

    /// Define a value variable in `frame`
    pub fn define_value(
        &mut self,
        frame: FrameId,
        name: &str,
        value: Value,
        static_type: Type,
    ) -> Result<(), RuntimeError> {
        let f = self
            .frames
            .get_mut(frame)
            .ok_or_else(|| RuntimeError::Internal(format!("no frame {frame}")))?;
        if f.slots.contains_key(name) {
            return Err(RuntimeError::DuplicateDefinition(name.to_string()));
        }
        f.slots
            .insert(name.to_string(), Slot::Value { value, static_type });
        Ok(())
    }

    /// Define a reference variable in `frame`, bound to `target` for the
    /// slot's whole lifetime
    pub fn define_ref(
        &mut self,
        frame: FrameId,
        name: &str,
        target: LValue,
        static_type: Type,
    ) -> Result<(), RuntimeError> {
        let f = self
            .frames
            .get_mut(frame)
            .ok_or_else(|| RuntimeError::Internal(format!("no frame {frame}")))?;
        if f.slots.contains_key(name) {
            return Err(RuntimeError::DuplicateDefinition(name.to_string()));
        }
        f.slots
            .insert(name.to_string(), Slot::Reference { target, static_type });
        Ok(())
    }

    /// Static type of a variable as seen from `frame`
    pub fn static_type_of(&self, frame: FrameId, name: &str) -> Result<Type, RuntimeError> {
        Ok(self.slot(frame, name)?.static_type().clone())
    }

    /// The static type of the slot defined in exactly `frame`
    pub fn slot_type_at(&self, frame: FrameId, name: &str) -> Result<Type, RuntimeError> {
        self.frames
            .get(frame)
            .and_then(|f| f.slots.get(name))
            .map(|s| s.static_type().clone())
            .ok_or_else(|| RuntimeError::UndefinedVariable(name.to_string()))
    }

    /// Turn a variable name into a location. Reference slots yield their
    /// target, so locations always point at value slots or fields.
    pub fn resolve_lvalue(&self, frame: FrameId, name: &str) -> Result<LValue, RuntimeError> {
        let def = self
            .defining_frame(frame, name)
            .ok_or_else(|| RuntimeError::UndefinedVariable(name.to_string()))?;
        match &self.frames[def].slots[name] {
            Slot::Value { .. } => Ok(LValue::Var {
                frame: def,
                name: name.to_string(),
            }),
            Slot::Reference { target, .. } => Ok(target.clone()),
        }
    }

    /// Read a variable, dereferencing through reference slots
    pub fn read_value(&self, frame: FrameId, name: &str) -> Result<Value, RuntimeError> {
        match self.slot(frame, name)? {
            Slot::Value { value, .. } => Ok(value.clone()),
            Slot::Reference { target, .. } => {
                let target = target.clone();
                self.read_lvalue(&target)
            }
        }
    }

    /// Read through a location
    pub fn read_lvalue(&self, lv: &LValue) -> Result<Value, RuntimeError> {
        match lv {
            LValue::Var { frame, name } => {
                match self.frames.get(*frame).and_then(|f| f.slots.get(name)) {
                    Some(Slot::Value { value, .. }) => Ok(value.clone()),
                    Some(Slot::Reference { target, .. }) => {
                        let target = target.clone();
                        self.read_lvalue(&target)
                    }
                    None => Err(RuntimeError::UndefinedVariable(name.clone())),
                }
            }
            LValue::Field { object, field } => object
                .borrow()
                .fields
                .get(field)
                .cloned()
                .ok_or_else(|| RuntimeError::UnknownField(field.clone())),
        }
    }

    /// Write through a location without any copy discipline. The
    /// discipline lives in `assign.rs`; this is the raw slot/field store.
    pub fn write_lvalue_raw(&mut self, lv: &LValue, value: Value) -> Result<(), RuntimeError> {
        match lv {
            LValue::Var { frame, name } => {
                match self.frames.get_mut(*frame).and_then(|f| f.slots.get_mut(name)) {
                    Some(Slot::Value { value: slot, .. }) => {
                        *slot = value;
                        Ok(())
                    }
                    Some(Slot::Reference { .. }) => Err(RuntimeError::Internal(format!(
                        "write to unresolved reference slot: {name}"
                    ))),
                    None => Err(RuntimeError::UndefinedVariable(name.clone())),
                }
            }
            LValue::Field { object, field } => {
                let mut obj = object.borrow_mut();
                match obj.fields.get_mut(field) {
                    Some(slot) => {
                        *slot = value;
                        Ok(())
                    }
                    None => Err(RuntimeError::UnknownField(field.clone())),
                }
            }
        }
    }

    /// Names and static types of the variables defined in `frame`
    /// (used to seed semantic analysis of session submissions)
    pub fn vars_in_frame(&self, frame: FrameId) -> Vec<(String, Type)> {
        self.frames
            .get(frame)
            .map(|f| {
                f.slots
                    .iter()
                    .map(|(name, slot)| (name.clone(), slot.static_type().clone()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::value::{new_handle, Object};

    #[test]
    fn test_lookup_walks_parent_chain() {
        let mut env = Env::new();
        env.define_value(Env::GLOBAL, "x", Value::Int(1), Type::int())
            .unwrap();
        let inner = env.push_frame(Env::GLOBAL);
        assert_eq!(env.read_value(inner, "x").unwrap(), Value::Int(1));
    }

    #[test]
    fn test_duplicate_definition_rejected() {
        let mut env = Env::new();
        env.define_value(Env::GLOBAL, "x", Value::Int(1), Type::int())
            .unwrap();
        let err = env
            .define_value(Env::GLOBAL, "x", Value::Int(2), Type::int())
            .unwrap_err();
        assert_eq!(err, RuntimeError::DuplicateDefinition("x".into()));
    }

    #[test]
    fn test_reference_slot_reads_and_resolves_through_target() {
        let mut env = Env::new();
        env.define_value(Env::GLOBAL, "k", Value::Int(5), Type::int())
            .unwrap();
        let frame = env.push_frame(Env::GLOBAL);
        let target = env.resolve_lvalue(frame, "k").unwrap();
        env.define_ref(frame, "n", target, Type::int().reference())
            .unwrap();

        assert_eq!(env.read_value(frame, "n").unwrap(), Value::Int(5));
        // Resolving the reference yields the underlying slot, not a
        // reference-to-reference.
        let lv = env.resolve_lvalue(frame, "n").unwrap();
        env.write_lvalue_raw(&lv, Value::Int(15)).unwrap();
        assert_eq!(env.read_value(Env::GLOBAL, "k").unwrap(), Value::Int(15));
    }

    #[test]
    fn test_field_lvalue() {
        let env = {
            let mut env = Env::new();
            env.push_frame(Env::GLOBAL);
            env
        };
        let mut obj = Object::new("P");
        obj.fields.insert("x".into(), Value::Int(1));
        let handle = new_handle(obj);
        let lv = LValue::Field {
            object: handle.clone(),
            field: "x".into(),
        };
        assert_eq!(env.read_lvalue(&lv).unwrap(), Value::Int(1));
        let missing = LValue::Field {
            object: handle,
            field: "y".into(),
        };
        assert!(matches!(
            env.read_lvalue(&missing),
            Err(RuntimeError::UnknownField(_))
        ));
    }

    #[test]
    fn test_truncate_keeps_persistent_frames() {
        let mut env = Env::new();
        let session = env.push_frame(Env::GLOBAL);
        let call = env.push_frame(session);
        env.push_frame(call);
        env.truncate(call);
        assert_eq!(env.frame_count(), 2);
    }
}
