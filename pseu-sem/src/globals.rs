use pseu_util::{Idx, Symbol};

use crate::types::TypeId;

/// Index into the symbol table's global list. Embedded as the operand
/// of `LD_GLOBAL`/`ST_GLOBAL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlobalId(pub u16);

impl Idx for GlobalId {
    fn from_usize(idx: usize) -> Self {
        GlobalId(idx as u16)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GlobalDescriptor {
    pub name: Symbol,
    pub ty: TypeId,
}
