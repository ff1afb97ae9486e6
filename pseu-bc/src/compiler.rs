//! Single-pass AST-to-bytecode compiler (spec.md §4.4).
//!
//! Grounded in `original_source/lib/pseu_compiler.c`'s `gen_*` visitor
//! callbacks (one function per AST node kind, each emitting directly
//! into the closure-in-progress) and in `faxc-sem::scope` for the
//! local-scope stack. Functions are compiled depth-first after a
//! pre-pass registers every `FUNCTION` header in the symbol table, so
//! forward and mutually recursive calls resolve regardless of the
//! order functions are declared in (`original_source` compiles a
//! single function at a time and has no such pre-pass; this program
//! can have more than one user function, so it needs one).

use std::collections::HashMap;

use pseu_par::ast::{self, Ast, BinaryOp, Block, Expr, Stmt, UnaryOp};
use pseu_sem::{Builtins, FnId, FunctionDescriptor, FunctionKind, SymbolTable, TypeId};
use pseu_util::{diagnostic::*, Handler, Span, Symbol, SymbolInterner};

use crate::closure::{Closure, ConstValue, LocalSlot};
use crate::emitter::Emitter;
use crate::opcode::Op;
use crate::program::Program;
use crate::scope::ScopeStack;

pub fn compile(
    ast: &Ast,
    symbols: &mut SymbolTable,
    interner: &mut SymbolInterner,
    handler: &mut Handler,
    builtins: Builtins,
) -> Program {
    let mut fn_ids: HashMap<Symbol, FnId> = HashMap::new();
    for stmt in &ast.root {
        if let Stmt::Function(decl) = stmt {
            register_function_header(decl, symbols, handler, builtins, &mut fn_ids);
        }
    }

    let mut functions = pseu_util::IndexVec::new();
    for _ in symbols.functions() {
        functions.push(None);
    }

    for stmt in &ast.root {
        if let Stmt::Function(decl) = stmt {
            if let Some(&id) = fn_ids.get(&decl.name) {
                let closure = compile_function_body(decl, symbols, interner, handler, builtins);
                *functions.get_mut(id).unwrap() = Some(closure);
            }
        }
    }

    let mut root = Compiler::new(symbols, interner, handler, builtins, Scope::Root);
    root.compile_block(&ast.root);
    root.emitter.emit_op(Op::End);
    let root_closure = root.finish(0);

    Program { root: root_closure, functions }
}

fn register_function_header(
    decl: &ast::FunctionDecl,
    symbols: &mut SymbolTable,
    handler: &mut Handler,
    builtins: Builtins,
    fn_ids: &mut HashMap<Symbol, FnId>,
) {
    if symbols.lookup_function_by_name(decl.name).is_some() {
        handler.error_coded("duplicate function declaration".to_string(), decl.span, E_PARSE_DUPLICATE_DECL);
        return;
    }
    let params = decl
        .params
        .iter()
        .map(|p| resolve_type(symbols, handler, builtins, p.ty, p.span))
        .collect();
    let return_type = decl.return_type.map(|ty| resolve_type(symbols, handler, builtins, ty, decl.span));
    let id = symbols.add_function(FunctionDescriptor {
        name: decl.name,
        kind: FunctionKind::User,
        params,
        return_type,
    });
    fn_ids.insert(decl.name, id);
}

fn resolve_type(symbols: &SymbolTable, handler: &mut Handler, builtins: Builtins, name: Symbol, span: Span) -> TypeId {
    symbols.lookup_type_by_name(name).unwrap_or_else(|| {
        handler.error_coded("unknown type name".to_string(), span, E_RESOLVE_UNKNOWN_IDENT);
        builtins.void
    })
}

fn compile_function_body(
    decl: &ast::FunctionDecl,
    symbols: &mut SymbolTable,
    interner: &mut SymbolInterner,
    handler: &mut Handler,
    builtins: Builtins,
) -> Closure {
    let mut scopes = ScopeStack::new();
    for param in &decl.params {
        let ty = resolve_type(symbols, handler, builtins, param.ty, param.span);
        scopes.declare(param.name, LocalSlot { name: param.name, ty });
    }
    let mut compiler = Compiler::new(symbols, interner, handler, builtins, Scope::Function(scopes));
    compiler.compile_block(&decl.body);
    compiler.emitter.emit_op(Op::End);
    compiler.finish(decl.params.len() as u8)
}

enum Scope {
    /// Root-level: `DECLARE` registers a global directly in the symbol
    /// table (spec.md §9 "the top-level program is itself a closure" —
    /// but its bindings must be reachable from nested function bodies,
    /// which only a global can be; see SPEC_FULL.md §8).
    Root,
    /// Inside a `FUNCTION` body: `DECLARE` registers a local slot;
    /// unresolved names fall back to the symbol table's globals.
    Function(ScopeStack),
}

struct Compiler<'a> {
    symbols: &'a mut SymbolTable,
    interner: &'a mut SymbolInterner,
    handler: &'a mut Handler,
    builtins: Builtins,
    scope: Scope,
    emitter: Emitter,
    consts: Vec<ConstValue>,
    stack_depth: i32,
    max_stack: u16,
}

impl<'a> Compiler<'a> {
    fn new(
        symbols: &'a mut SymbolTable,
        interner: &'a mut SymbolInterner,
        handler: &'a mut Handler,
        builtins: Builtins,
        scope: Scope,
    ) -> Self {
        Self {
            symbols,
            interner,
            handler,
            builtins,
            scope,
            emitter: Emitter::new(),
            consts: Vec::new(),
            stack_depth: 0,
            max_stack: 0,
        }
    }

    fn finish(mut self, arity: u8) -> Closure {
        if self.emitter.position() > u16::MAX as usize {
            self.handler.error_coded("function body too large".to_string(), Span::DUMMY, E_CAPACITY_CODE_TOO_LARGE);
        }
        let locals = match self.scope {
            Scope::Root => Vec::new(),
            Scope::Function(scopes) => scopes.into_locals(),
        };
        Closure { code: self.emitter.finish(), consts: self.consts, locals, max_stack: self.max_stack, arity }
    }

    // -- stack bookkeeping (spec.md §4.4 "max_stack accounting") -------------

    fn adjust_stack(&mut self, delta: i32) {
        self.stack_depth += delta;
        if self.stack_depth > self.max_stack as i32 {
            self.max_stack = self.stack_depth as u16;
        }
    }

    // -- statements ------------------------------------------------------------

    fn compile_block(&mut self, block: &Block) {
        for stmt in block {
            self.compile_stmt(stmt);
        }
    }

    fn compile_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Function(_) => {} // handled by the pre-pass
            Stmt::Decl { name, ty, span } => self.compile_decl(*name, *ty, *span),
            Stmt::Assign { name, expr, span } => self.compile_assign(*name, expr, *span),
            Stmt::Output { expr, .. } => {
                self.compile_expr(expr);
                self.emit_call_primitive("@output", 1, false);
            }
            Stmt::If { cond, then_block, else_block, .. } => self.compile_if(cond, then_block, else_block.as_ref()),
            Stmt::While { cond, body, .. } => self.compile_while(cond, body),
            Stmt::Return { expr, .. } => {
                self.compile_expr(expr);
                self.emitter.emit_op(Op::Ret);
                self.adjust_stack(-1);
            }
        }
    }

    fn compile_decl(&mut self, name: Symbol, ty: Symbol, span: Span) {
        let type_id = resolve_type(self.symbols, self.handler, self.builtins, ty, span);
        match &mut self.scope {
            Scope::Root => {
                if self.symbols.lookup_global_by_name(name).is_some() {
                    self.handler.error_coded(
                        "duplicate global declaration".to_string(),
                        span,
                        E_RESOLVE_DUPLICATE_IN_SCOPE,
                    );
                    return;
                }
                self.symbols.add_global(pseu_sem::GlobalDescriptor { name, ty: type_id });
            }
            Scope::Function(scopes) => {
                if scopes.is_declared_in_current_scope(name) {
                    self.handler.error_coded(
                        "duplicate local declaration".to_string(),
                        span,
                        E_RESOLVE_DUPLICATE_IN_SCOPE,
                    );
                    return;
                }
                if scopes.declare(name, LocalSlot { name, ty: type_id }).is_none() {
                    self.handler.error_coded(
                        "exceeded maximum number of locals in a closure".to_string(),
                        span,
                        E_CAPACITY_TOO_MANY_LOCALS,
                    );
                }
            }
        }
    }

    fn compile_assign(&mut self, name: Symbol, expr: &Expr, span: Span) {
        self.compile_expr(expr);
        match &self.scope {
            Scope::Root => {
                self.store_global(name, span);
            }
            Scope::Function(scopes) => {
                if let Some(slot) = scopes.resolve(name) {
                    self.emitter.emit_op(Op::StLocal);
                    self.emitter.emit_u8(slot);
                    self.adjust_stack(-1);
                } else {
                    self.store_global(name, span);
                }
            }
        }
    }

    fn store_global(&mut self, name: Symbol, span: Span) {
        if let Some(id) = self.symbols.lookup_global_by_name(name) {
            self.emitter.emit_op(Op::StGlobal);
            self.emitter.emit_u16(id.0);
            self.adjust_stack(-1);
        } else {
            self.handler.error_coded("unknown identifier".to_string(), span, E_RESOLVE_UNKNOWN_IDENT);
        }
    }

    fn compile_if(&mut self, cond: &Expr, then_block: &Block, else_block: Option<&Block>) {
        self.compile_expr(cond);
        self.emitter.emit_op(Op::BrFalse);
        self.adjust_stack(-1);
        let else_patch = self.emitter.reserve_u16();

        self.compile_block(then_block);

        if let Some(else_block) = else_block {
            self.emitter.emit_op(Op::Br);
            let end_patch = self.emitter.reserve_u16();
            let else_target = self.emitter.position();
            self.emitter.patch_u16(else_patch, else_target as u16);
            self.compile_block(else_block);
            let end_target = self.emitter.position();
            self.emitter.patch_u16(end_patch, end_target as u16);
        } else {
            let end_target = self.emitter.position();
            self.emitter.patch_u16(else_patch, end_target as u16);
        }
    }

    fn compile_while(&mut self, cond: &Expr, body: &Block) {
        let loop_top = self.emitter.position();
        self.compile_expr(cond);
        self.emitter.emit_op(Op::BrFalse);
        self.adjust_stack(-1);
        let exit_patch = self.emitter.reserve_u16();

        self.compile_block(body);

        self.emitter.emit_op(Op::Br);
        self.emitter.emit_u16(loop_top as u16);

        let exit_target = self.emitter.position();
        self.emitter.patch_u16(exit_patch, exit_target as u16);
    }

    // -- expressions -------------------------------------------------------

    fn compile_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Bool(b, _) => self.push_const(ConstValue::Bool(*b)),
            Expr::Int(n, _) => self.push_const(ConstValue::Int(*n)),
            Expr::Real(r, _) => self.push_const(ConstValue::Real(*r)),
            Expr::Str(s, _) => self.push_const(ConstValue::Str(*s)),
            Expr::Ident(name, span) => self.compile_ident(*name, *span),
            Expr::Unary(op, operand, span) => self.compile_unary(*op, operand, *span),
            Expr::Binary(op, lhs, rhs, span) => self.compile_binary(*op, lhs, rhs, *span),
            Expr::Call(callee, args, span) => self.compile_call(*callee, args, *span),
        }
    }

    fn push_const(&mut self, value: ConstValue) {
        if self.consts.len() >= u8::MAX as usize + 1 {
            self.handler.error_coded(
                "exceeded maximum number of constants in a closure".to_string(),
                Span::DUMMY,
                E_CAPACITY_TOO_MANY_CONSTS,
            );
            return;
        }
        let index = self.consts.len() as u8;
        self.consts.push(value);
        self.emitter.emit_op(Op::LdConst);
        self.emitter.emit_u8(index);
        self.adjust_stack(1);
    }

    fn compile_ident(&mut self, name: Symbol, span: Span) {
        if let Scope::Function(scopes) = &self.scope {
            if let Some(slot) = scopes.resolve(name) {
                self.emitter.emit_op(Op::LdLocal);
                self.emitter.emit_u8(slot);
                self.adjust_stack(1);
                return;
            }
        }
        if let Some(id) = self.symbols.lookup_global_by_name(name) {
            self.emitter.emit_op(Op::LdGlobal);
            self.emitter.emit_u16(id.0);
            self.adjust_stack(1);
        } else {
            self.handler.error_coded("unknown identifier".to_string(), span, E_RESOLVE_UNKNOWN_IDENT);
        }
    }

    fn compile_unary(&mut self, op: UnaryOp, operand: &Expr, span: Span) {
        self.compile_expr(operand);
        if let Some(primitive) = op.primitive_name() {
            self.emit_call_primitive(primitive, 1, true);
        }
        let _ = span;
    }

    fn compile_binary(&mut self, op: BinaryOp, lhs: &Expr, rhs: &Expr, span: Span) {
        self.compile_expr(lhs);
        self.compile_expr(rhs);
        self.emit_call_primitive(op.primitive_name(), 2, true);
        let _ = span;
    }

    fn compile_call(&mut self, callee: Symbol, args: &[Expr], span: Span) {
        for arg in args {
            self.compile_expr(arg);
        }
        let Some(id) = self.symbols.lookup_function_by_name(callee) else {
            self.handler.error_coded("call to unknown function".to_string(), span, E_RESOLVE_UNKNOWN_IDENT);
            return;
        };
        let descriptor = self.symbols.function_by_id(id).expect("registered id");
        let returns = descriptor.return_type.is_some();
        let arity = descriptor.arity();
        self.emitter.emit_op(Op::Call);
        self.emitter.emit_u16(id.0);
        self.adjust_stack(-(arity as i32) + if returns { 1 } else { 0 });
    }

    /// Emits `CALL <fnId>` for a mandatory primitive looked up by name
    /// (spec.md §4.4 "Primitive operator mapping": binary/unary operators
    /// and `OUTPUT` all lower through the symbol table rather than a
    /// dedicated opcode).
    fn emit_call_primitive(&mut self, name: &str, arity: i32, returns: bool) {
        let sym = self.interner.intern(name);
        let id = self.symbols.lookup_function_by_name(sym).unwrap_or_else(|| {
            panic!("missing mandatory primitive {name}");
        });
        self.emitter.emit_op(Op::Call);
        self.emitter.emit_u16(id.0);
        self.adjust_stack(-arity + if returns { 1 } else { 0 });
    }
}

#[cfg(test)]
mod tests {
    use pseu_sem::SymbolTable;
    use pseu_util::{Handler, SymbolInterner};

    use super::*;

    fn compile_source(src: &str) -> (Program, usize) {
        let mut interner = SymbolInterner::new();
        let (mut symbols, builtins) = SymbolTable::with_builtins(&mut interner);
        let mut handler = Handler::new();
        let ast = pseu_par::parse(src, &mut handler, &mut interner);
        assert_eq!(handler.error_count(), 0, "parse errors: {:?}", handler.diagnostics());
        let program = compile(&ast, &mut symbols, &mut interner, &mut handler, builtins);
        (program, handler.error_count())
    }

    #[test]
    fn precedence_scenario_emits_no_errors_and_ends_with_end() {
        let (program, errs) = compile_source("OUTPUT 2 + 3 * 4\n");
        assert_eq!(errs, 0);
        assert_eq!(*program.root.code.last().unwrap(), Op::End as u8);
    }

    #[test]
    fn declare_assign_output_round_trip_uses_globals() {
        let (program, errs) = compile_source("DECLARE X : INTEGER\nX <- 41\nX <- X + 1\nOUTPUT X\n");
        assert_eq!(errs, 0);
        assert!(program.root.code.contains(&(Op::StGlobal as u8)));
        assert!(program.root.code.contains(&(Op::LdGlobal as u8)));
    }

    #[test]
    fn function_call_compiles_a_separate_closure() {
        let src = "FUNCTION F(X: INTEGER): INTEGER\nRETURN X * X\nENDFUNCTION\nOUTPUT F(7)\n";
        let (program, errs) = compile_source(src);
        assert_eq!(errs, 0);
        let compiled = program.functions.iter().filter_map(|c| c.as_ref()).collect::<Vec<_>>();
        assert_eq!(compiled.len(), 1);
        assert!(compiled[0].code.contains(&(Op::LdLocal as u8)));
        assert!(program.root.code.contains(&(Op::Call as u8)));
    }

    #[test]
    fn undeclared_identifier_is_a_resolve_error() {
        let (_, errs) = compile_source("OUTPUT Y\n");
        assert!(errs > 0);
    }

    #[test]
    fn max_stack_tracks_deepest_point_not_final_depth() {
        let (program, errs) = compile_source("OUTPUT (1 + 2) * 3\n");
        assert_eq!(errs, 0);
        assert!(program.root.max_stack >= 2);
    }
}
