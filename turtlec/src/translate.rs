//! The AST walker: drives the symbol store, environments, and instruction
//! buffer to turn a whole [`Program`] into an instruction stream.

use crate::buffer::InstructionBuffer;
use crate::env::{FunEntry, Scope, VarEntry, FunEnv, VarEnv};
use crate::error::{Diagnostic, SemanticError};
use crate::rewrite;
use crate::symbols::{Symbol, SymbolTable};
use turtle_ast::{ArithOp, Cond, CompareOp, Exp, FunDec, Param, Position, Program, Stmt, VarDec};
use turtlevm::{Instruction, Opcode};

struct PendingReference {
    emit_index: u32,
    function: Symbol,
}

/// Compiles one program. Carries all compile-time state for a single
/// translation; a fresh `Translator` is used for every invocation, so
/// translating several files in one process run is cleanly re-entrant.
pub struct Translator {
    symbols: SymbolTable,
    vars: VarEnv,
    funs: FunEnv,
    buffer: InstructionBuffer,
    pending: Vec<PendingReference>,
    ret_offset: i32,
    strict: bool,
    warnings: Vec<Diagnostic>,
}

/// Translates `program`, returning its instruction stream and any non-fatal
/// shadowing warnings collected along the way. `strict` upgrades shadowing
/// to a fatal error and widens statement-context call cleanup by one slot
/// (see `DESIGN.md`).
pub fn translate_program(
    program: &Program,
    strict: bool,
) -> Result<(Vec<Instruction>, Vec<Diagnostic>), Diagnostic> {
    Translator::new(strict).run(program)
}

impl Translator {
    fn new(strict: bool) -> Translator {
        Translator {
            symbols: SymbolTable::new(),
            vars: VarEnv::new(),
            funs: FunEnv::new(),
            buffer: InstructionBuffer::new(),
            pending: Vec::new(),
            ret_offset: 0,
            strict,
            warnings: Vec::new(),
        }
    }

    fn diag(&self, error: SemanticError, pos: Position) -> Diagnostic {
        Diagnostic::new(error, pos)
    }

    fn emit_zero(&mut self, opcode: Opcode, pos: Position) -> Result<u32, Diagnostic> {
        self.buffer
            .emit_zero(opcode)
            .map_err(|_| self.diag(SemanticError::BufferOverflow, pos))
    }

    fn emit_addressing(&mut self, opcode: Opcode, offset: i32, pos: Position) -> Result<u32, Diagnostic> {
        self.buffer
            .emit_addressing(opcode, offset)
            .map_err(|_| self.diag(SemanticError::BufferOverflow, pos))
    }

    fn emit_inline_word(&mut self, opcode: Opcode, operand: i32, pos: Position) -> Result<u32, Diagnostic> {
        self.buffer
            .emit_inline_word(opcode, operand)
            .map_err(|_| self.diag(SemanticError::BufferOverflow, pos))
    }

    /// (a) globals, (b) `Jump 0` placeholder, (c) function bodies,
    /// (d) forward-reference resolution, (e)/(f) program body, (g) backpatch
    /// the jump-over-functions, (h) `Halt`.
    fn run(mut self, program: &Program) -> Result<(Vec<Instruction>, Vec<Diagnostic>), Diagnostic> {
        self.translate_var_decs(
            &program.globals,
            Scope::Global,
            SemanticError::DuplicateGlobal,
            false,
        )?;

        let driver_pos = Position::default();
        let jump_over_functions = self.emit_inline_word(Opcode::Jump, 0, driver_pos)?;

        self.translate_functions(&program.functions)?;
        self.resolve_pending();

        let body_start = self.buffer.next_index();
        for stmt in &program.body {
            self.translate_stmt(stmt)?;
        }

        self.buffer.backpatch(jump_over_functions, body_start as i32);
        self.emit_zero(Opcode::Halt, driver_pos)?;

        debug_assert!(!self.vars.in_scope());
        debug_assert_eq!(0, self.ret_offset);

        Ok((self.buffer.as_slice().to_vec(), self.warnings))
    }

    fn resolve_pending(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        for reference in pending {
            let entry = self.funs.find(reference.function).unwrap();
            debug_assert_ne!(0, entry.address, "function address unresolved at end of translation");
            self.buffer.backpatch(reference.emit_index, entry.address as i32);
        }
    }

    fn translate_var_decs(
        &mut self,
        decs: &[VarDec],
        scope: Scope,
        duplicate_err: fn(String) -> SemanticError,
        check_shadow: bool,
    ) -> Result<(), Diagnostic> {
        for (i, dec) in decs.iter().enumerate() {
            let index = i as i32 + 1;
            let sym = self.symbols.intern(&dec.name);

            if self.vars.find_in_top_frame(sym).is_some() {
                return Err(self.diag(duplicate_err(dec.name.clone()), dec.pos));
            }

            if check_shadow && self.vars.shadows_global(sym) {
                self.report_shadowing(&dec.name, dec.pos)?;
            }

            self.translate_exp(&dec.init)?;
            self.vars.insert(sym, VarEntry { symbol: sym, scope, index });
        }
        Ok(())
    }

    fn report_shadowing(&mut self, name: &str, pos: Position) -> Result<(), Diagnostic> {
        let diag = self.diag(SemanticError::Shadowing(name.to_owned()), pos);
        if self.strict {
            Err(diag)
        } else {
            self.warnings.push(diag);
            Ok(())
        }
    }

    fn insert_params(&mut self, params: &[Param]) -> Result<(), Diagnostic> {
        let count = params.len() as i32;
        for (i, param) in params.iter().enumerate() {
            let index = -count - 1 + i as i32;
            let sym = self.symbols.intern(&param.name);

            if self.vars.find_in_top_frame(sym).is_some() {
                return Err(self.diag(SemanticError::DuplicateParameter(param.name.clone()), param.pos));
            }
            if self.vars.shadows_global(sym) {
                self.report_shadowing(&param.name, param.pos)?;
            }

            self.vars.insert(
                sym,
                VarEntry {
                    symbol: sym,
                    scope: Scope::Local,
                    index,
                },
            );
        }
        Ok(())
    }

    /// Three passes over the function list: duplicate-name check,
    /// pre-declaration (so forward calls resolve), then body emission.
    fn translate_functions(&mut self, functions: &[FunDec]) -> Result<(), Diagnostic> {
        let mut seen = std::collections::HashSet::new();
        for f in functions {
            let sym = self.symbols.intern(&f.name);
            if !seen.insert(sym) {
                return Err(self.diag(SemanticError::DuplicateFunction(f.name.clone()), f.pos));
            }
        }

        for f in functions {
            let sym = self.symbols.intern(&f.name);
            self.funs.insert(
                sym,
                FunEntry {
                    symbol: sym,
                    param_count: f.params.len() as u16,
                    address: 0,
                },
            );
        }

        for f in functions {
            self.translate_function_body(f)?;
        }

        Ok(())
    }

    fn translate_function_body(&mut self, f: &FunDec) -> Result<(), Diagnostic> {
        let sym = self.symbols.intern(&f.name);
        let addr = self.buffer.next_index();
        self.funs.set_address(sym, addr);

        self.vars.enter_scope();
        self.insert_params(&f.params)?;

        let param_count = f.params.len() as i32;
        self.ret_offset = -param_count - 2;

        self.translate_var_decs(&f.locals, Scope::Local, SemanticError::DuplicateLocal, true)?;

        for stmt in &f.body {
            self.translate_stmt(stmt)?;
        }

        self.emit_zero(Opcode::Rts, f.pos)?;

        self.vars.leave_scope();
        self.ret_offset = 0;

        Ok(())
    }

    fn resolve_var(&mut self, name: &str, pos: Position) -> Result<VarEntry, Diagnostic> {
        let sym = self.symbols.intern(name);
        self.vars
            .find(sym)
            .copied()
            .ok_or_else(|| self.diag(SemanticError::UndefinedVariable(name.to_owned()), pos))
    }

    fn emit_load(&mut self, entry: VarEntry, pos: Position) -> Result<u32, Diagnostic> {
        let opcode = match entry.scope {
            Scope::Global => Opcode::LoadGp,
            Scope::Local => Opcode::LoadFp,
        };
        self.emit_addressing(opcode, entry.index, pos)
    }

    fn emit_store(&mut self, entry: VarEntry, pos: Position) -> Result<u32, Diagnostic> {
        let opcode = match entry.scope {
            Scope::Global => Opcode::StoreGp,
            Scope::Local => Opcode::StoreFp,
        };
        self.emit_addressing(opcode, entry.index, pos)
    }

    fn emit_read(&mut self, entry: VarEntry, pos: Position) -> Result<u32, Diagnostic> {
        let opcode = match entry.scope {
            Scope::Global => Opcode::ReadGp,
            Scope::Local => Opcode::ReadFp,
        };
        self.emit_addressing(opcode, entry.index, pos)
    }

    fn translate_call(
        &mut self,
        name: &str,
        args: &[Exp],
        pos: Position,
        in_expression: bool,
    ) -> Result<(), Diagnostic> {
        let sym = self.symbols.intern(name);
        let entry = *self
            .funs
            .find(sym)
            .ok_or_else(|| self.diag(SemanticError::UndefinedFunction(name.to_owned()), pos))?;

        if entry.param_count as usize != args.len() {
            return Err(self.diag(
                SemanticError::ArityMismatch {
                    name: name.to_owned(),
                    expected: entry.param_count as usize,
                    found: args.len(),
                },
                pos,
            ));
        }

        self.emit_inline_word(Opcode::Loadi, 0, pos)?;
        for arg in args {
            self.translate_exp(arg)?;
        }

        let jsr_index = self.emit_inline_word(Opcode::Jsr, entry.address as i32, pos)?;
        if entry.address == 0 {
            self.pending.push(PendingReference {
                emit_index: jsr_index,
                function: sym,
            });
        }

        let pop_count = if !in_expression && self.strict {
            entry.param_count as i32 + 1
        } else {
            entry.param_count as i32
        };
        self.emit_inline_word(Opcode::Pop, pop_count, pos)?;

        Ok(())
    }

    fn translate_stmt(&mut self, stmt: &Stmt) -> Result<(), Diagnostic> {
        match stmt {
            Stmt::Up(pos) => {
                self.emit_zero(Opcode::Up, *pos)?;
            }
            Stmt::Down(pos) => {
                self.emit_zero(Opcode::Down, *pos)?;
            }
            Stmt::Move(e1, e2, pos) => {
                self.translate_exp(e1)?;
                self.translate_exp(e2)?;
                self.emit_zero(Opcode::Move, *pos)?;
            }
            Stmt::Read(name, pos) => {
                let entry = self.resolve_var(name, *pos)?;
                self.emit_read(entry, *pos)?;
            }
            Stmt::Assign(name, exp, pos) => {
                let entry = self.resolve_var(name, *pos)?;
                self.translate_exp(exp)?;
                self.emit_store(entry, *pos)?;
            }
            Stmt::Call(name, args, pos) => {
                self.translate_call(name, args, *pos, false)?;
            }
            Stmt::Return(exp, pos) => {
                if !self.vars.in_scope() {
                    return Err(self.diag(SemanticError::ReturnOutsideFunction, *pos));
                }
                self.translate_exp(exp)?;
                self.emit_addressing(Opcode::StoreFp, self.ret_offset, *pos)?;
                self.emit_zero(Opcode::Rts, *pos)?;
            }
            Stmt::ExpList(exps, _) => {
                for exp in exps {
                    self.translate_exp(exp)?;
                }
            }
            Stmt::If { .. } | Stmt::IfElse { .. } => {
                self.translate_if(rewrite::rewrite(stmt))?;
            }
            Stmt::While { cond, body, pos } => {
                self.translate_while(cond, body, *pos)?;
            }
        }
        Ok(())
    }

    fn translate_exp(&mut self, exp: &Exp) -> Result<(), Diagnostic> {
        match exp {
            Exp::Var(name, pos) => {
                let entry = self.resolve_var(name, *pos)?;
                self.emit_load(entry, *pos)?;
            }
            Exp::Int(value, pos) => {
                self.emit_inline_word(Opcode::Loadi, *value, *pos)?;
            }
            Exp::Call(name, args, pos) => {
                self.translate_call(name, args, *pos, true)?;
            }
            Exp::Op(op, left, right, pos) => {
                self.translate_exp(left)?;
                self.translate_exp(right)?;
                let opcode = match op {
                    ArithOp::Add => Opcode::Add,
                    ArithOp::Sub => Opcode::Sub,
                    ArithOp::Mul => Opcode::Mul,
                };
                self.emit_zero(opcode, *pos)?;
            }
            Exp::Neg(operand, pos) => {
                self.translate_exp(operand)?;
                self.emit_zero(Opcode::Neg, *pos)?;
            }
        }
        Ok(())
    }

    /// Emits the `Sub; Test; Pop 1` comparison prologue shared by `if` and
    /// `while`, translating `left`/`right` first.
    fn emit_compare(&mut self, left: &Exp, right: &Exp, pos: Position) -> Result<(), Diagnostic> {
        self.translate_exp(left)?;
        self.translate_exp(right)?;
        self.emit_zero(Opcode::Sub, pos)?;
        self.emit_zero(Opcode::Test, pos)?;
        self.emit_inline_word(Opcode::Pop, 1, pos)?;
        Ok(())
    }

    /// `stmt` must already have been passed through [`rewrite::rewrite`], so
    /// its condition is `Eq` or `Lt`.
    fn translate_if(&mut self, stmt: Stmt) -> Result<(), Diagnostic> {
        match stmt {
            Stmt::If { cond, then, pos } => {
                debug_assert!(matches!(cond.op, CompareOp::Eq | CompareOp::Lt));
                self.emit_compare(&cond.left, &cond.right, pos)?;

                let j_then = self.emit_inline_word(jump_opcode(cond.op), 0, pos)?;
                let j_end = self.emit_inline_word(Opcode::Jump, 0, pos)?;

                let l_then = self.buffer.next_index();
                for s in &then {
                    self.translate_stmt(s)?;
                }
                let l_end = self.buffer.next_index();

                self.buffer.backpatch(j_then, l_then as i32);
                self.buffer.backpatch(j_end, l_end as i32);
            }
            Stmt::IfElse {
                cond,
                then,
                else_,
                pos,
            } => {
                debug_assert!(matches!(cond.op, CompareOp::Eq | CompareOp::Lt));
                self.emit_compare(&cond.left, &cond.right, pos)?;

                let j_then = self.emit_inline_word(jump_opcode(cond.op), 0, pos)?;
                let j_else = self.emit_inline_word(Opcode::Jump, 0, pos)?;

                let l_then = self.buffer.next_index();
                for s in &then {
                    self.translate_stmt(s)?;
                }
                let j_end = self.emit_inline_word(Opcode::Jump, 0, pos)?;

                let l_else = self.buffer.next_index();
                for s in &else_ {
                    self.translate_stmt(s)?;
                }
                let l_end = self.buffer.next_index();

                self.buffer.backpatch(j_then, l_then as i32);
                self.buffer.backpatch(j_else, l_else as i32);
                self.buffer.backpatch(j_end, l_end as i32);
            }
            _ => unreachable!("rewrite only ever produces If/IfElse"),
        }
        Ok(())
    }

    /// `while` has no else-branch to duplicate into, so LEQ/GEQ are
    /// normalized here via the logically equivalent invert form
    /// (`a <= b` is `!(b < a)`) rather than `rewrite`'s nested-if
    /// duplication — see `DESIGN.md`.
    fn translate_while(&mut self, cond: &Cond, body: &[Stmt], pos: Position) -> Result<(), Diagnostic> {
        let l_test = self.buffer.next_index();
        let (op, left, right, invert) = normalize_cond(cond);
        self.emit_compare(&left, &right, pos)?;

        let j1 = self.emit_inline_word(jump_opcode(op), 0, pos)?;
        let j2 = self.emit_inline_word(Opcode::Jump, 0, pos)?;

        let l_body = self.buffer.next_index();
        for s in body {
            self.translate_stmt(s)?;
        }
        self.emit_inline_word(Opcode::Jump, l_test as i32, pos)?;
        let l_end = self.buffer.next_index();

        let (true_target, false_target) = if invert { (l_end, l_body) } else { (l_body, l_end) };
        self.buffer.backpatch(j1, true_target as i32);
        self.buffer.backpatch(j2, false_target as i32);

        Ok(())
    }
}

fn jump_opcode(op: CompareOp) -> Opcode {
    match op {
        CompareOp::Eq => Opcode::Jeq,
        CompareOp::Lt => Opcode::Jlt,
        _ => unreachable!("condition must be normalized to Eq/Lt before emission"),
    }
}

/// Reduces any of the six comparisons to (`Eq`|`Lt`, left, right, invert),
/// where `invert` means "branch when the comparison is false, fall through
/// when true" — `a <= b` becomes `!(b < a)`, `a >= b` becomes `!(a < b)`.
fn normalize_cond(cond: &Cond) -> (CompareOp, Exp, Exp, bool) {
    match cond.op {
        CompareOp::Eq => (CompareOp::Eq, cond.left.clone(), cond.right.clone(), false),
        CompareOp::Lt => (CompareOp::Lt, cond.left.clone(), cond.right.clone(), false),
        CompareOp::Neq => (CompareOp::Eq, cond.left.clone(), cond.right.clone(), true),
        CompareOp::Gt => (CompareOp::Lt, cond.right.clone(), cond.left.clone(), false),
        CompareOp::Leq => (CompareOp::Lt, cond.right.clone(), cond.left.clone(), true),
        CompareOp::Geq => (CompareOp::Lt, cond.left.clone(), cond.right.clone(), true),
    }
}
