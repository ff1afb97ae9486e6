use pseu_util::{Idx, Symbol};

/// Index into the symbol table's type list. Embedded as a `u16` operand
/// wherever bytecode needs to name a type (spec.md §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(pub u16);

impl Idx for TypeId {
    fn from_usize(idx: usize) -> Self {
        TypeId(idx as u16)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TypeDescriptor {
    pub name: Symbol,
}

/// The six primitive type ids (spec.md §6), resolved once after
/// [`crate::SymbolTable::with_builtins`] registers them, so callers
/// never have to re-intern/re-lookup a type name by string.
#[derive(Debug, Clone, Copy)]
pub struct Builtins {
    pub void: TypeId,
    pub boolean: TypeId,
    pub integer: TypeId,
    pub real: TypeId,
    pub string: TypeId,
    pub array: TypeId,
}
