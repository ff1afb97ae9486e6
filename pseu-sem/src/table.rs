use pseu_util::{IndexVec, Symbol, SymbolInterner};

use crate::functions::{FnId, FunctionDescriptor, FunctionKind};
use crate::globals::{GlobalDescriptor, GlobalId};
use crate::types::{Builtins, TypeDescriptor, TypeId};

/// The process registry described in spec.md §4.3: three append-only,
/// ordered lists, looked up linearly by name and directly by id. Shared
/// read-only by the interpreter once compilation finishes; see
/// SPEC_FULL.md §8 for why this lives per-`Vm` rather than process-wide.
#[derive(Default)]
pub struct SymbolTable {
    types: IndexVec<TypeId, TypeDescriptor>,
    functions: IndexVec<FnId, FunctionDescriptor>,
    globals: IndexVec<GlobalId, GlobalDescriptor>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `descriptor`, no dedup (spec.md §4.3: "no deduplication
    /// at add-time — caller must have checked").
    pub fn add_type(&mut self, descriptor: TypeDescriptor) -> TypeId {
        self.types.push(descriptor)
    }

    pub fn add_function(&mut self, descriptor: FunctionDescriptor) -> FnId {
        self.functions.push(descriptor)
    }

    pub fn add_global(&mut self, descriptor: GlobalDescriptor) -> GlobalId {
        self.globals.push(descriptor)
    }

    pub fn type_by_id(&self, id: TypeId) -> Option<&TypeDescriptor> {
        self.types.get(id)
    }

    pub fn function_by_id(&self, id: FnId) -> Option<&FunctionDescriptor> {
        self.functions.get(id)
    }

    pub fn global_by_id(&self, id: GlobalId) -> Option<&GlobalDescriptor> {
        self.globals.get(id)
    }

    pub fn lookup_type_by_name(&self, name: Symbol) -> Option<TypeId> {
        self.types.iter_enumerated().find(|(_, t)| t.name == name).map(|(id, _)| id)
    }

    pub fn lookup_function_by_name(&self, name: Symbol) -> Option<FnId> {
        self.functions.iter_enumerated().find(|(_, f)| f.name == name).map(|(id, _)| id)
    }

    pub fn lookup_global_by_name(&self, name: Symbol) -> Option<GlobalId> {
        self.globals.iter_enumerated().find(|(_, g)| g.name == name).map(|(id, _)| id)
    }

    pub fn functions(&self) -> impl Iterator<Item = (FnId, &FunctionDescriptor)> {
        self.functions.iter_enumerated()
    }

    pub fn globals_count(&self) -> usize {
        self.globals.len()
    }

    /// Registers the six primitive types (spec.md §6 "Primitive type
    /// names") and the mandatory primitive function set (§4.6), in the
    /// order the parser's type idents and the compiler's operator
    /// lowering expect to find them. Returns the table alongside the
    /// resolved [`Builtins`] ids, so callers never re-intern/re-lookup a
    /// type name by string.
    pub fn with_builtins(interner: &mut SymbolInterner) -> (Self, Builtins) {
        let mut table = Self::new();

        let void = table.add_type(TypeDescriptor { name: interner.intern("VOID") });
        let boolean = table.add_type(TypeDescriptor { name: interner.intern("BOOLEAN") });
        let integer = table.add_type(TypeDescriptor { name: interner.intern("INTEGER") });
        let real = table.add_type(TypeDescriptor { name: interner.intern("REAL") });
        let string = table.add_type(TypeDescriptor { name: interner.intern("STRING") });
        let array = table.add_type(TypeDescriptor { name: interner.intern("ARRAY") });

        let binary_dynamic = |table: &mut Self, interner: &mut SymbolInterner, name: &str| {
            table.add_function(FunctionDescriptor {
                name: interner.intern(name),
                kind: FunctionKind::Primitive,
                params: vec![void, void],
                return_type: Some(void),
            });
        };
        let unary_dynamic = |table: &mut Self, interner: &mut SymbolInterner, name: &str| {
            table.add_function(FunctionDescriptor {
                name: interner.intern(name),
                kind: FunctionKind::Primitive,
                params: vec![void],
                return_type: Some(void),
            });
        };

        for name in ["@add", "@sub", "@mul", "@div", "@eq", "@ne", "@lt", "@gt", "@le", "@ge"] {
            binary_dynamic(&mut table, interner, name);
        }
        unary_dynamic(&mut table, interner, "@neg");

        table.add_function(FunctionDescriptor {
            name: interner.intern("@and"),
            kind: FunctionKind::Primitive,
            params: vec![boolean, boolean],
            return_type: Some(boolean),
        });
        table.add_function(FunctionDescriptor {
            name: interner.intern("@or"),
            kind: FunctionKind::Primitive,
            params: vec![boolean, boolean],
            return_type: Some(boolean),
        });
        table.add_function(FunctionDescriptor {
            name: interner.intern("@not"),
            kind: FunctionKind::Primitive,
            params: vec![boolean],
            return_type: Some(boolean),
        });
        table.add_function(FunctionDescriptor {
            name: interner.intern("@output"),
            kind: FunctionKind::Primitive,
            params: vec![void],
            return_type: None,
        });

        (table, Builtins { void, boolean, integer, real, string, array })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_register_all_mandatory_primitives() {
        let mut interner = SymbolInterner::new();
        let (table, _builtins) = SymbolTable::with_builtins(&mut interner);
        for name in [
            "@add", "@sub", "@mul", "@div", "@neg", "@eq", "@ne", "@lt", "@gt", "@le", "@ge", "@and",
            "@or", "@not", "@output",
        ] {
            let sym = interner.intern(name);
            assert!(table.lookup_function_by_name(sym).is_some(), "missing {name}");
        }
    }

    #[test]
    fn output_is_a_procedure() {
        let mut interner = SymbolInterner::new();
        let (table, _builtins) = SymbolTable::with_builtins(&mut interner);
        let id = table.lookup_function_by_name(interner.intern("@output")).unwrap();
        assert!(table.function_by_id(id).unwrap().is_procedure());
    }

    #[test]
    fn lookup_by_name_is_none_for_unknown_identifier() {
        let mut interner = SymbolInterner::new();
        let (table, _builtins) = SymbolTable::with_builtins(&mut interner);
        assert!(table.lookup_function_by_name(interner.intern("UNDEFINED")).is_none());
    }

    #[test]
    fn add_returns_sequential_ids() {
        let mut interner = SymbolInterner::new();
        let mut table = SymbolTable::new();
        let a = table.add_global(GlobalDescriptor { name: interner.intern("A"), ty: TypeId(0) });
        let b = table.add_global(GlobalDescriptor { name: interner.intern("B"), ty: TypeId(0) });
        assert_eq!(a, GlobalId(0));
        assert_eq!(b, GlobalId(1));
    }
}
