use fgc::{BumpCollector, Collector};
use pseu_bc::{ConstValue, Op, Program};
use pseu_sem::{Builtins, FnId, FunctionKind, GlobalId, SymbolTable};
use pseu_util::{IndexVec, SymbolInterner};

use crate::config::VmConfig;
use crate::error::{RuntimeError, RuntimeResult};
use crate::frame::{ClosureRef, Frame};
use crate::heap::{HeapObject, RtString};
use crate::interner::StringInterner;
use crate::primitive::{primitive_for_name, Primitive};
use crate::value::{type_of, Value};

const MAX_FRAMES: usize = 1024;
const MAX_STACK_SLOTS: usize = 1 << 16;

/// The stack-based bytecode interpreter (spec.md §4.5). Owns the
/// evaluation stack, the call-frame stack, the heap, and the runtime
/// string table; borrows the [`SymbolTable`] a [`Program`] was compiled
/// against, read-only, for the lifetime of the `Vm` (SPEC_FULL.md §8:
/// per-`Vm` state rather than the teacher's process-global interner).
pub struct Vm<'a> {
    symbols: &'a SymbolTable,
    interner: &'a SymbolInterner,
    builtins: Builtins,
    primitives: IndexVec<FnId, Option<Primitive>>,
    globals: IndexVec<GlobalId, Value>,
    heap: BumpCollector<HeapObject>,
    strings: StringInterner,
    stack: Vec<Value>,
    frames: Vec<Frame>,
    config: VmConfig,
}

impl<'a> Vm<'a> {
    pub fn new(symbols: &'a SymbolTable, interner: &'a SymbolInterner, builtins: Builtins, config: VmConfig) -> Self {
        let mut primitives = IndexVec::new();
        for (_, descriptor) in symbols.functions() {
            let prim = (descriptor.kind == FunctionKind::Primitive)
                .then(|| primitive_for_name(interner.resolve(descriptor.name)))
                .flatten();
            primitives.push(prim);
        }

        let mut globals = IndexVec::new();
        for _ in 0..symbols.globals_count() {
            globals.push(Value::Void);
        }

        Self {
            symbols,
            interner,
            builtins,
            primitives,
            globals,
            heap: BumpCollector::new(),
            strings: StringInterner::new(),
            stack: Vec::new(),
            frames: Vec::new(),
            config,
        }
    }

    /// Compiles and runs one program at the top level (the `vm_eval`
    /// embedding call, spec.md §6). Clears the evaluation/frame stacks
    /// first so no runtime error or partial state survives across calls
    /// (spec.md §7 "No error survives across `vm_eval` calls").
    pub fn eval(&mut self, program: &Program) -> RuntimeResult<()> {
        self.stack.clear();
        self.frames.clear();
        while self.globals.len() < self.symbols.globals_count() {
            self.globals.push(Value::Void);
        }
        self.frames.push(Frame { closure: ClosureRef::Root, ip: 0, bp: 0 });
        self.dispatch(program)
    }

    fn value_type_name(&self, value: Value) -> String {
        let id = type_of(value, self.builtins, &self.heap);
        self.type_name(id)
    }

    fn dispatch(&mut self, program: &Program) -> RuntimeResult<()> {
        loop {
            let frame_idx = self.frames.len() - 1;
            let Frame { closure: closure_ref, ip, bp } = self.frames[frame_idx];
            let closure = closure_of(program, closure_ref);
            let op = Op::from_u8(closure.code[ip as usize]).expect("invalid opcode: compiler bug");
            log::trace!("frame {frame_idx} ip {ip} sp {} {op:?}", self.stack.len());

            let mut next_ip = ip as usize + 1;
            let read_u8 = |next_ip: &mut usize| {
                let v = closure.code[*next_ip];
                *next_ip += 1;
                v
            };
            let read_u16 = |next_ip: &mut usize| {
                let hi = closure.code[*next_ip] as u16;
                let lo = closure.code[*next_ip + 1] as u16;
                *next_ip += 2;
                (hi << 8) | lo
            };

            match op {
                Op::End => {
                    self.frames[frame_idx].ip = next_ip as u16;
                    if self.frames.len() == 1 {
                        return Ok(());
                    }
                    self.stack.truncate(bp);
                    self.frames.pop();
                }

                Op::Ret => {
                    self.frames[frame_idx].ip = next_ip as u16;
                    match closure_ref {
                        ClosureRef::Function(fn_id) => {
                            let descriptor = self.symbols.function_by_id(fn_id).expect("registered fn");
                            let return_value =
                                if descriptor.return_type.is_some() { Some(self.pop()) } else { None };
                            if let (Some(expected), Some(value)) = (descriptor.return_type, return_value) {
                                let actual = type_of(value, self.builtins, &self.heap);
                                if actual != expected {
                                    return Err(RuntimeError::TypeMismatch {
                                        expected: self.type_name(expected),
                                        found: self.value_type_name(value),
                                    });
                                }
                            }
                            self.stack.truncate(bp);
                            if let Some(value) = return_value {
                                self.stack.push(value);
                            }
                        }
                        ClosureRef::Root => {
                            // Not reachable through the grammar (RETURN is only
                            // parsed inside a function body), but the parser
                            // doesn't enforce that distinction; treat it as an
                            // implicit end-of-program rather than panicking.
                            self.pop();
                            self.stack.truncate(bp);
                        }
                    }
                    self.frames.pop();
                    if self.frames.is_empty() {
                        return Ok(());
                    }
                }

                Op::LdConst => {
                    let index = read_u8(&mut next_ip);
                    self.frames[frame_idx].ip = next_ip as u16;
                    let value = self.load_const(&closure.consts[index as usize]);
                    self.push(value);
                }

                Op::LdLocal => {
                    let index = read_u8(&mut next_ip);
                    self.frames[frame_idx].ip = next_ip as u16;
                    let value = self.stack[bp + index as usize];
                    if value.is_void() {
                        let name = closure.locals[index as usize].name;
                        return Err(RuntimeError::UninitialisedVariable {
                            name: self.interner.resolve(name).to_owned(),
                        });
                    }
                    self.push(value);
                }

                Op::StLocal => {
                    let index = read_u8(&mut next_ip);
                    self.frames[frame_idx].ip = next_ip as u16;
                    let value = self.pop();
                    let slot = closure.locals[index as usize];
                    if slot.ty != self.builtins.void {
                        let actual = type_of(value, self.builtins, &self.heap);
                        if actual != slot.ty {
                            return Err(RuntimeError::TypeMismatch {
                                expected: self.type_name(slot.ty),
                                found: self.value_type_name(value),
                            });
                        }
                    }
                    self.stack[bp + index as usize] = value;
                }

                Op::LdGlobal => {
                    let index = read_u16(&mut next_ip);
                    self.frames[frame_idx].ip = next_ip as u16;
                    let id = GlobalId(index);
                    let value = self.globals[id];
                    if value.is_void() {
                        let name = self.symbols.global_by_id(id).expect("registered global").name;
                        return Err(RuntimeError::UninitialisedVariable {
                            name: self.interner.resolve(name).to_owned(),
                        });
                    }
                    self.push(value);
                }

                Op::StGlobal => {
                    let index = read_u16(&mut next_ip);
                    self.frames[frame_idx].ip = next_ip as u16;
                    let id = GlobalId(index);
                    let value = self.pop();
                    let descriptor = self.symbols.global_by_id(id).expect("registered global");
                    if descriptor.ty != self.builtins.void {
                        let actual = type_of(value, self.builtins, &self.heap);
                        if actual != descriptor.ty {
                            return Err(RuntimeError::TypeMismatch {
                                expected: self.type_name(descriptor.ty),
                                found: self.value_type_name(value),
                            });
                        }
                    }
                    self.globals[id] = value;
                }

                Op::Call => {
                    let index = read_u16(&mut next_ip);
                    self.frames[frame_idx].ip = next_ip as u16;
                    self.exec_call(program, FnId(index))?;
                }

                Op::Br => {
                    let target = read_u16(&mut next_ip);
                    self.frames[frame_idx].ip = target;
                }

                Op::BrFalse => {
                    let target = read_u16(&mut next_ip);
                    let value = self.pop();
                    let cond = value.as_boolean().ok_or_else(|| RuntimeError::TypeMismatch {
                        expected: "BOOLEAN".to_owned(),
                        found: self.value_type_name(value),
                    })?;
                    self.frames[frame_idx].ip = if cond { next_ip as u16 } else { target };
                }
            }
        }
    }

    fn exec_call(&mut self, program: &Program, fn_id: FnId) -> RuntimeResult<()> {
        let descriptor = self.symbols.function_by_id(fn_id).expect("CALL operand resolves to a registered function");
        let arity = descriptor.arity();
        let args_start = self.stack.len() - arity;

        for i in 0..arity {
            let param_ty = descriptor.params[i];
            if param_ty == self.builtins.void {
                continue;
            }
            let actual = type_of(self.stack[args_start + i], self.builtins, &self.heap);
            if actual != param_ty {
                return Err(RuntimeError::TypeMismatch {
                    expected: self.type_name(param_ty),
                    found: self.value_type_name(self.stack[args_start + i]),
                });
            }
        }

        match descriptor.kind {
            FunctionKind::Primitive => {
                let prim = self.primitives[fn_id].expect("primitive descriptor has a dispatch entry");
                let returns = descriptor.return_type.is_some();
                let args: Vec<Value> = self.stack[args_start..].to_vec();
                self.stack.truncate(args_start);
                let result = self.eval_primitive(prim, &args)?;
                if returns {
                    self.push(result.expect("function primitive must produce a value"));
                }
            }
            FunctionKind::User => {
                let closure = closure_of(program, ClosureRef::Function(fn_id));
                let locals_count = closure.locals.len();
                let max_stack = closure.max_stack as usize;

                if self.frames.len() >= MAX_FRAMES
                    || self.stack.len() + (locals_count - arity) + max_stack > MAX_STACK_SLOTS
                {
                    return Err(RuntimeError::StackOverflow);
                }

                for _ in arity..locals_count {
                    self.stack.push(Value::Void);
                }
                self.frames.push(Frame { closure: ClosureRef::Function(fn_id), ip: 0, bp: args_start });
            }
        }
        Ok(())
    }

    fn load_const(&mut self, constant: &ConstValue) -> Value {
        match constant {
            ConstValue::Bool(b) => Value::Boolean(*b),
            ConstValue::Int(n) => Value::Integer(*n),
            ConstValue::Real(r) => Value::Real(*r),
            ConstValue::Str(sym) => {
                let text = self.interner.resolve(*sym).to_owned();
                Value::Object(self.strings.intern(&mut self.heap, &text))
            }
        }
    }

    fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    fn pop(&mut self) -> Value {
        self.stack.pop().expect("evaluation stack underflow: compiler bug")
    }

    fn type_name(&self, id: pseu_sem::TypeId) -> String {
        self.interner.resolve(self.symbols.type_by_id(id).expect("registered type").name).to_owned()
    }

    fn stringify(&self, value: Value) -> String {
        match value {
            Value::Void => "VOID".to_owned(),
            Value::Boolean(b) => if b { "TRUE" } else { "FALSE" }.to_owned(),
            Value::Integer(n) => n.to_string(),
            Value::Real(r) => r.to_string(),
            Value::Object(r) => match self.heap.get(r) {
                HeapObject::String(RtString { bytes, .. }) => bytes.clone(),
                HeapObject::Array(_) => "ARRAY".to_owned(),
                HeapObject::UserObject(_) => "OBJECT".to_owned(),
            },
        }
    }

    // -- primitive dispatch (spec.md §4.6) ------------------------------

    fn eval_primitive(&mut self, prim: Primitive, args: &[Value]) -> RuntimeResult<Option<Value>> {
        use Primitive::*;
        let value = match prim {
            Add => Some(self.numeric_binop(args[0], args[1], |a, b| a.wrapping_add(b), |a, b| a + b)?),
            Sub => Some(self.numeric_binop(args[0], args[1], |a, b| a.wrapping_sub(b), |a, b| a - b)?),
            Mul => Some(self.numeric_binop(args[0], args[1], |a, b| a.wrapping_mul(b), |a, b| a * b)?),
            Div => Some(self.division(args[0], args[1])?),
            Neg => Some(self.negate(args[0])?),
            Eq => Some(Value::Boolean(self.values_equal(args[0], args[1])?)),
            Ne => Some(Value::Boolean(!self.values_equal(args[0], args[1])?)),
            Lt => Some(Value::Boolean(self.compare(args[0], args[1], |o| o.is_lt())?)),
            Gt => Some(Value::Boolean(self.compare(args[0], args[1], |o| o.is_gt())?)),
            Le => Some(Value::Boolean(self.compare(args[0], args[1], |o| o.is_le())?)),
            Ge => Some(Value::Boolean(self.compare(args[0], args[1], |o| o.is_ge())?)),
            And => Some(Value::Boolean(self.boolean_binop(args[0], args[1], |a, b| a && b)?)),
            Or => Some(Value::Boolean(self.boolean_binop(args[0], args[1], |a, b| a || b)?)),
            Not => {
                let a = self.expect_boolean(args[0])?;
                Some(Value::Boolean(!a))
            }
            Output => {
                let text = self.stringify(args[0]);
                (self.config.print)(&format!("{text}\n"));
                None
            }
        };
        Ok(value)
    }

    fn expect_boolean(&self, value: Value) -> RuntimeResult<bool> {
        value.as_boolean().ok_or_else(|| RuntimeError::TypeMismatch {
            expected: "BOOLEAN".to_owned(),
            found: self.value_type_name(value),
        })
    }

    fn boolean_binop(&self, a: Value, b: Value, f: impl Fn(bool, bool) -> bool) -> RuntimeResult<bool> {
        Ok(f(self.expect_boolean(a)?, self.expect_boolean(b)?))
    }

    /// integer×integer → integer (wraps, per spec.md §8 invariant 5);
    /// any operand real ⇒ real (the integer side is coerced).
    fn numeric_binop(
        &self,
        a: Value,
        b: Value,
        int_op: impl Fn(i32, i32) -> i32,
        real_op: impl Fn(f32, f32) -> f32,
    ) -> RuntimeResult<Value> {
        match (a, b) {
            (Value::Integer(x), Value::Integer(y)) => Ok(Value::Integer(int_op(x, y))),
            (Value::Integer(x), Value::Real(y)) => Ok(Value::Real(real_op(x as f32, y))),
            (Value::Real(x), Value::Integer(y)) => Ok(Value::Real(real_op(x, y as f32))),
            (Value::Real(x), Value::Real(y)) => Ok(Value::Real(real_op(x, y))),
            _ => Err(RuntimeError::TypeMismatch { expected: "INTEGER or REAL".to_owned(), found: self.value_type_name(a) }),
        }
    }

    fn division(&self, a: Value, b: Value) -> RuntimeResult<Value> {
        match (a, b) {
            (Value::Integer(_), Value::Integer(0)) => Err(RuntimeError::DivisionByZero),
            (Value::Integer(x), Value::Integer(y)) => Ok(Value::Integer(x / y)),
            (Value::Integer(x), Value::Real(y)) => Ok(Value::Real(x as f32 / y)),
            (Value::Real(x), Value::Integer(y)) => Ok(Value::Real(x / y as f32)),
            (Value::Real(x), Value::Real(y)) => Ok(Value::Real(x / y)),
            _ => Err(RuntimeError::TypeMismatch { expected: "INTEGER or REAL".to_owned(), found: self.value_type_name(a) }),
        }
    }

    fn negate(&self, a: Value) -> RuntimeResult<Value> {
        match a {
            Value::Integer(x) => Ok(Value::Integer(x.wrapping_neg())),
            Value::Real(x) => Ok(Value::Real(-x)),
            _ => Err(RuntimeError::TypeMismatch { expected: "INTEGER or REAL".to_owned(), found: self.value_type_name(a) }),
        }
    }

    fn compare(&self, a: Value, b: Value, accept: impl Fn(std::cmp::Ordering) -> bool) -> RuntimeResult<bool> {
        let ordering = match (a, b) {
            (Value::Integer(x), Value::Integer(y)) => x.cmp(&y),
            (Value::Integer(x), Value::Real(y)) => (x as f32).partial_cmp(&y).ok_or(RuntimeError::TypeMismatch {
                expected: "comparable REAL".to_owned(),
                found: "NaN".to_owned(),
            })?,
            (Value::Real(x), Value::Integer(y)) => x.partial_cmp(&(y as f32)).ok_or(RuntimeError::TypeMismatch {
                expected: "comparable REAL".to_owned(),
                found: "NaN".to_owned(),
            })?,
            (Value::Real(x), Value::Real(y)) => x.partial_cmp(&y).ok_or(RuntimeError::TypeMismatch {
                expected: "comparable REAL".to_owned(),
                found: "NaN".to_owned(),
            })?,
            _ => {
                return Err(RuntimeError::TypeMismatch { expected: "INTEGER or REAL".to_owned(), found: self.value_type_name(a) })
            }
        };
        Ok(accept(ordering))
    }

    /// `@eq`/`@ne`: numeric values compare across the int/real promotion
    /// lattice like the arithmetic primitives; everything else (booleans,
    /// heap objects) compares structurally, which for heap objects is
    /// `fgc::GcRef`'s pointer-identity equality (spec.md §4.7).
    fn values_equal(&self, a: Value, b: Value) -> RuntimeResult<bool> {
        match (a, b) {
            (Value::Integer(_) | Value::Real(_), Value::Integer(_) | Value::Real(_)) => {
                self.compare(a, b, |o| o.is_eq())
            }
            _ => Ok(a == b),
        }
    }
}

fn closure_of(program: &Program, r: ClosureRef) -> &pseu_bc::Closure {
    match r {
        ClosureRef::Root => &program.root,
        ClosureRef::Function(id) => {
            program.functions.get(id).and_then(|c| c.as_ref()).expect("function body was compiled")
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use pseu_sem::SymbolTable;
    use pseu_util::{Handler, SymbolInterner};

    use super::*;

    /// Compiles `source` and runs it, returning everything written
    /// through `@output` concatenated, or the runtime error if one was
    /// raised. Panics if lexing/parsing/compiling produced a diagnostic
    /// (none of the scenarios below are meant to fail before runtime).
    fn run(source: &str) -> Result<String, RuntimeError> {
        let mut interner = SymbolInterner::new();
        let (mut symbols, builtins) = SymbolTable::with_builtins(&mut interner);
        let mut handler = Handler::new();

        let ast = pseu_par::parse(source, &mut handler, &mut interner);
        let program = pseu_bc::compile(&ast, &mut symbols, &mut interner, &mut handler, builtins);
        assert!(!handler.has_errors(), "unexpected compile errors: {:?}", handler.diagnostics());

        let output = Rc::new(RefCell::new(String::new()));
        let sink = Rc::clone(&output);
        let config = VmConfig { print: Box::new(move |text| sink.borrow_mut().push_str(text)) };

        let mut vm = Vm::new(&symbols, &interner, builtins, config);
        vm.eval(&program)?;
        Ok(Rc::try_unwrap(output).unwrap().into_inner())
    }

    #[test]
    fn scenario_1_output_literal() {
        assert_eq!(run("OUTPUT 1\n").unwrap(), "1\n");
    }

    #[test]
    fn scenario_2_precedence() {
        assert_eq!(run("OUTPUT 2 + 3 * 4\n").unwrap(), "14\n");
    }

    #[test]
    fn scenario_3_parenthesised() {
        assert_eq!(run("OUTPUT (2 + 3) * 4\n").unwrap(), "20\n");
    }

    #[test]
    fn scenario_4_declare_assign_reassign() {
        let src = "DECLARE X : INTEGER\nX <- 41\nX <- X + 1\nOUTPUT X\n";
        assert_eq!(run(src).unwrap(), "42\n");
    }

    #[test]
    fn scenario_5_store_type_mismatch() {
        let src = "DECLARE X : INTEGER\nX <- TRUE\n";
        assert!(matches!(run(src), Err(RuntimeError::TypeMismatch { .. })));
    }

    #[test]
    fn scenario_6_uninitialised_global_read() {
        let src = "DECLARE X : INTEGER\nOUTPUT X\n";
        match run(src) {
            Err(RuntimeError::UninitialisedVariable { name }) => assert_eq!(name, "X"),
            other => panic!("expected UninitialisedVariable, got {other:?}"),
        }
    }

    #[test]
    fn scenario_7_string_escape_lines() {
        assert_eq!(run("OUTPUT \"a\\nb\"\n").unwrap(), "a\nb\n");
    }

    #[test]
    fn scenario_8_function_call() {
        let src = "FUNCTION F(X: INTEGER): INTEGER\nRETURN X * X\nENDFUNCTION\nOUTPUT F(7)\n";
        assert_eq!(run(src).unwrap(), "49\n");
    }

    #[test]
    fn scenario_9_if_then_else() {
        let src = "IF TRUE THEN\nOUTPUT 1\nELSE\nOUTPUT 2\nENDIF\n";
        assert_eq!(run(src).unwrap(), "1\n");
    }

    #[test]
    fn while_loop_runs_until_condition_false() {
        let src = "DECLARE X : INTEGER\nX <- 0\nWHILE X < 3\nOUTPUT X\nX <- X + 1\nENDWHILE\n";
        assert_eq!(run(src).unwrap(), "0\n1\n2\n");
    }

    #[test]
    fn integer_division_by_zero_is_a_runtime_error() {
        assert!(matches!(run("OUTPUT 1 / 0\n"), Err(RuntimeError::DivisionByZero)));
    }

    #[test]
    fn real_and_integer_operands_promote_to_real() {
        assert_eq!(run("OUTPUT 1 + 2.5\n").unwrap(), "3.5\n");
    }

    #[test]
    fn equal_string_literals_compare_equal() {
        assert_eq!(run("OUTPUT \"hi\" = \"hi\"\n").unwrap(), "TRUE\n");
    }

    #[test]
    fn not_equal_operator() {
        assert_eq!(run("OUTPUT 1 <> 2\n").unwrap(), "TRUE\n");
    }
}
