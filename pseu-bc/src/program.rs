use pseu_sem::FnId;
use pseu_util::IndexVec;

use crate::closure::Closure;

/// The output of compiling one source buffer: the top-level closure plus
/// one compiled closure per user function registered in the symbol
/// table. Indexed in parallel with the symbol table's function list, so
/// `functions[fn_id]` is `None` for primitives and `Some(closure)` for
/// every `FUNCTION` (spec.md §4.4 "attach to the function descriptor").
#[derive(Debug)]
pub struct Program {
    pub root: Closure,
    pub functions: IndexVec<FnId, Option<Closure>>,
}
