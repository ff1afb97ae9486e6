use std::collections::HashMap;

use pseu_util::{Idx, IndexVec, Symbol};

use crate::closure::LocalSlot;

/// Id of a lexical scope ("rib"), adapted from `faxc-sem::scope`'s
/// `RibId`/`Rib`/`ScopeTree` to the compiler's per-closure local-scope
/// stack (spec.md §4.4 "local table with scope depth").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RibId(u32);

impl Idx for RibId {
    fn from_usize(idx: usize) -> Self {
        RibId(idx as u32)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

struct Rib {
    bindings: HashMap<Symbol, u8>,
    parent: Option<RibId>,
}

/// Index into a closure's flat, append-only local table. Doubles as the
/// `u8` operand of `LD_LOCAL`/`ST_LOCAL`.
pub type LocalIndex = u8;

/// Tracks declared locals for one closure: a single flat, never-shrinking
/// table (so slot indices are stable once assigned) plus a stack of ribs
/// used only for name resolution and shadowing across nested `IF`/
/// `WHILE` bodies.
pub struct ScopeStack {
    locals: Vec<LocalSlot>,
    ribs: IndexVec<RibId, Rib>,
    current: RibId,
}

impl ScopeStack {
    pub fn new() -> Self {
        let mut ribs = IndexVec::new();
        let root = ribs.push(Rib { bindings: HashMap::new(), parent: None });
        Self { locals: Vec::new(), ribs, current: root }
    }

    pub fn enter_scope(&mut self) {
        let rib = self.ribs.push(Rib { bindings: HashMap::new(), parent: Some(self.current) });
        self.current = rib;
    }

    pub fn exit_scope(&mut self) {
        if let Some(parent) = self.ribs[self.current].parent {
            self.current = parent;
        }
    }

    /// Declares a local in the current scope. Returns `None` once the
    /// flat table has reached the 256-slot capacity (spec.md §4.4:
    /// "constant pool ≤256 ... local table ≤256").
    pub fn declare(&mut self, name: Symbol, slot: LocalSlot) -> Option<LocalIndex> {
        if self.locals.len() >= u8::MAX as usize + 1 {
            return None;
        }
        let index = self.locals.len() as LocalIndex;
        self.locals.push(slot);
        self.ribs[self.current].bindings.insert(name, index);
        Some(index)
    }

    /// Whether `name` is already bound in the *current* rib only
    /// (spec.md §7 "duplicate identifier in the same scope").
    pub fn is_declared_in_current_scope(&self, name: Symbol) -> bool {
        self.ribs[self.current].bindings.contains_key(&name)
    }

    /// Resolves `name` to a local slot, innermost scope outward
    /// (spec.md §4.4 "Name resolution: Local search first (innermost
    /// scope outward)").
    pub fn resolve(&self, name: Symbol) -> Option<LocalIndex> {
        let mut rib_id = self.current;
        loop {
            let rib = &self.ribs[rib_id];
            if let Some(&index) = rib.bindings.get(&name) {
                return Some(index);
            }
            rib_id = rib.parent?;
        }
    }

    pub fn into_locals(self) -> Vec<LocalSlot> {
        self.locals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pseu_sem::TypeId;
    use pseu_util::SymbolInterner;

    fn slot(sym: Symbol) -> LocalSlot {
        LocalSlot { name: sym, ty: TypeId(0) }
    }

    #[test]
    fn inner_scope_shadows_outer() {
        let mut interner = SymbolInterner::new();
        let x = interner.intern("X");
        let mut scopes = ScopeStack::new();
        scopes.declare(x, slot(x)).unwrap();
        scopes.enter_scope();
        scopes.declare(x, slot(x)).unwrap();
        assert_eq!(scopes.resolve(x), Some(1));
        scopes.exit_scope();
        assert_eq!(scopes.resolve(x), Some(0));
    }

    #[test]
    fn unresolved_name_is_none() {
        let mut interner = SymbolInterner::new();
        let y = interner.intern("Y");
        let scopes = ScopeStack::new();
        assert_eq!(scopes.resolve(y), None);
    }
}
