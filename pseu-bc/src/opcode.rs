/// Bytecode opcodes (spec.md §4.5). A flat stream of unsigned bytes;
/// multi-byte operands are big-endian. Mirrors `enum OpCode`/`VM_OP` in
/// `original_source/lib/obj.h` and `pseu_opcode.h`, extended with the
/// jump opcodes `original_source` only sketches (`BR`/`BR_FALSE`) since
/// this implementation does not defer `WHILE`/`IF` branching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Op {
    /// Exit the dispatch loop; used only at the outermost closure.
    End = 0,
    /// Return from the current frame.
    Ret = 1,
    /// `u8` pool index; push `closure.consts[op]`.
    LdConst = 2,
    /// `u8` local slot; push `frame.bp[op]`.
    LdLocal = 3,
    /// `u8` local slot; pop and type-checked store.
    StLocal = 4,
    /// `u16` global id; push global value.
    LdGlobal = 5,
    /// `u16` global id; pop and type-checked store.
    StGlobal = 6,
    /// `u16` function id; invoke by symbol-table id.
    Call = 7,
    /// `u16` absolute code offset; unconditional jump.
    Br = 8,
    /// `u16` absolute code offset; pop a boolean, jump if false.
    BrFalse = 9,
}

impl Op {
    pub fn from_u8(byte: u8) -> Option<Op> {
        Some(match byte {
            0 => Op::End,
            1 => Op::Ret,
            2 => Op::LdConst,
            3 => Op::LdLocal,
            4 => Op::StLocal,
            5 => Op::LdGlobal,
            6 => Op::StGlobal,
            7 => Op::Call,
            8 => Op::Br,
            9 => Op::BrFalse,
            _ => return None,
        })
    }
}
