use pseu_util::{Idx, Symbol};

use crate::types::TypeId;

/// Index into the symbol table's function list (spec.md §4.3). Embedded
/// as the `fnId` operand of `CALL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FnId(pub u16);

impl Idx for FnId {
    fn from_usize(idx: usize) -> Self {
        FnId(idx as u16)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A primitive is native-dispatched by `pseu-rt`; a user function carries
/// compiled bytecode attached after `pseu-bc` finishes lowering its body
/// (spec.md §4.4 "attach to the function descriptor", §9 "closures are
/// owned by the function descriptor registered in the symbol table").
/// The closure itself is not stored here to avoid a dependency from
/// `pseu-sem` back onto `pseu-bc`/`pseu-rt`; `pseu-rt::Vm` keeps a
/// parallel table of compiled closures keyed by [`FnId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    Primitive,
    User,
}

#[derive(Debug, Clone)]
pub struct FunctionDescriptor {
    pub name: Symbol,
    pub kind: FunctionKind,
    /// Declared parameter types, in order. `TypeId` of the builtin VOID
    /// type marks a dynamic (untyped) parameter (spec.md §4.5 "if the
    /// declared parameter type is VOID, the check is skipped").
    pub params: Vec<TypeId>,
    /// `None` marks a procedure: it leaves no value on the stack at
    /// `RET` (spec.md glossary, "Procedure vs function").
    pub return_type: Option<TypeId>,
}

impl FunctionDescriptor {
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn is_procedure(&self) -> bool {
        self.return_type.is_none()
    }
}
