//! pseu-bc - the bytecode compiler (spec.md §4.4, §4.5).
//!
//! A single post-order walk over `pseu-par`'s AST, emitting into a
//! growable byte buffer per closure. Grounded in
//! `original_source/lib/pseu_compiler.c` for the code-generation shape
//! and in `faxc-sem::scope` for the compiler's local-scope stack.

mod closure;
mod compiler;
mod emitter;
mod opcode;
mod program;
mod scope;

pub use closure::{Closure, ConstValue, LocalSlot};
pub use compiler::compile;
pub use opcode::Op;
pub use program::Program;
