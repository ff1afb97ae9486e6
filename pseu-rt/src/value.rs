use fgc::GcRef;
use pseu_sem::{Builtins, TypeId};

use crate::heap::HeapObject;

/// A dynamically tagged value (spec.md §3). `Void` doubles as the
/// uninitialised-local marker and (in parameter position, at the
/// descriptor level rather than here) the "accept any type" marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Void,
    Boolean(bool),
    Integer(i32),
    Real(f32),
    Object(GcRef<HeapObject>),
}

impl Value {
    pub fn is_void(self) -> bool {
        matches!(self, Value::Void)
    }

    pub fn as_boolean(self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(b),
            _ => None,
        }
    }
}

/// Maps a runtime value to the [`TypeId`] the symbol table would assign
/// it, so call/store sites can compare "like for like" against a
/// declared parameter/local/global type (spec.md §4.5).
pub fn type_of(value: Value, builtins: Builtins, heap: &dyn fgc::Collector<HeapObject>) -> TypeId {
    match value {
        Value::Void => builtins.void,
        Value::Boolean(_) => builtins.boolean,
        Value::Integer(_) => builtins.integer,
        Value::Real(_) => builtins.real,
        Value::Object(r) => match heap.get(r) {
            HeapObject::String(_) => builtins.string,
            HeapObject::Array(_) => builtins.array,
            HeapObject::UserObject(_) => {
                unreachable!("no mandatory primitive or grammar production constructs a UserObject")
            }
        },
    }
}
