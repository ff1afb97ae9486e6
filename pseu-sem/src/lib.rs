//! pseu-sem - the symbol table (spec.md §3, §4.3).
//!
//! Three append-only, ordered lists — types, functions, globals — shared
//! read-only once compilation finishes. Ids are the 16-bit indices
//! embedded directly into bytecode operands by `pseu-bc`.

mod functions;
mod globals;
mod table;
mod types;

pub use functions::{FnId, FunctionDescriptor, FunctionKind};
pub use globals::{GlobalDescriptor, GlobalId};
pub use table::SymbolTable;
pub use types::{Builtins, TypeDescriptor, TypeId};
