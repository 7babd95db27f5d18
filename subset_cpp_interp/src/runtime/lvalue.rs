//! Locations that can be read or written
//!
//! Produced transiently during evaluation and consumed by assignments
//! and reference bindings. A variable location names its defining frame
//! by index (frames are stack-like, so the index stays valid for the
//! location's lifetime); a field location keeps the object alive through
//! its handle.

use crate::runtime::env::FrameId;
use crate::runtime::value::ObjectRef;

#[derive(Debug, Clone)]
pub enum LValue {
    /// A variable slot in a specific frame
    Var { frame: FrameId, name: String },
    /// A field of a live object
    Field { object: ObjectRef, field: String },
}
