use crate::opcode::Op;

/// A growable byte buffer for one closure's code (spec.md §4.4:
/// "emits into an emitter that grows a byte buffer geometrically").
/// `Vec<u8>`'s own amortized-doubling growth gives us this for free,
/// the same shape as `original_source`'s `emitter_init`/`emit_u8`
/// (`size` doubled on overflow) without hand-rolling the realloc.
#[derive(Default)]
pub struct Emitter {
    code: Vec<u8>,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> usize {
        self.code.len()
    }

    pub fn emit_op(&mut self, op: Op) {
        self.code.push(op as u8);
    }

    pub fn emit_u8(&mut self, value: u8) {
        self.code.push(value);
    }

    pub fn emit_u16(&mut self, value: u16) {
        let [hi, lo] = value.to_be_bytes();
        self.code.push(hi);
        self.code.push(lo);
    }

    /// Reserves a `u16` operand slot, returning its byte offset for a
    /// later [`Emitter::patch_u16`] (used for `BR`/`BR_FALSE` targets,
    /// spec.md §4.4 "backpatch first to here").
    pub fn reserve_u16(&mut self) -> usize {
        let at = self.code.len();
        self.emit_u16(0);
        at
    }

    pub fn patch_u16(&mut self, at: usize, value: u16) {
        let [hi, lo] = value.to_be_bytes();
        self.code[at] = hi;
        self.code[at + 1] = lo;
    }

    pub fn finish(self) -> Vec<u8> {
        self.code
    }
}
