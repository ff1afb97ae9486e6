//! A minimal disassembler backing `--dump-bytecode` (spec.md §1's
//! out-of-scope "dump/pretty-print tooling" collaborator, given just
//! enough of a shape to be useful at the command line).

use std::fmt::Write as _;

use pseu_bc::{Closure, Op, Program};
use pseu_sem::FnId;

pub fn disassemble_program(program: &Program) -> String {
    let mut out = String::new();
    writeln!(out, "root:").unwrap();
    disassemble_closure(&mut out, &program.root);
    for (id, closure) in program.functions.iter_enumerated() {
        if let Some(closure) = closure {
            writeln!(out, "\nfunction {}:", fn_id_label(id)).unwrap();
            disassemble_closure(&mut out, closure);
        }
    }
    out
}

fn fn_id_label(id: FnId) -> u16 {
    id.0
}

fn disassemble_closure(out: &mut String, closure: &Closure) {
    let code = &closure.code;
    let mut ip = 0usize;
    while ip < code.len() {
        let offset = ip;
        let op = Op::from_u8(code[ip]).expect("valid opcode");
        ip += 1;
        let operand = match op {
            Op::End | Op::Ret => String::new(),
            Op::LdConst | Op::LdLocal | Op::StLocal => {
                let v = code[ip];
                ip += 1;
                format!(" {v}")
            }
            Op::LdGlobal | Op::StGlobal | Op::Call | Op::Br | Op::BrFalse => {
                let v = (code[ip] as u16) << 8 | code[ip + 1] as u16;
                ip += 2;
                format!(" {v}")
            }
        };
        writeln!(out, "  {offset:04}  {op:?}{operand}").unwrap();
    }
}
