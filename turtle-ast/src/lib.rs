//! Abstract syntax tree produced by the turtle-graphics front end and
//! consumed by [`turtlec`](../turtlec/index.html)'s translator.
//!
//! The AST is a tree of owned, tagged-variant nodes (`enum Stmt`, `enum
//! Exp`) rather than the `struct + union` pattern of the original
//! implementation this language was distilled from — pattern matching over
//! the tags replaces the parallel function-pointer dispatch tables that a C
//! translator needs.

use util::EnumFromStr;
use util_derive::EnumFromStr;

/// A 1-based source position, used only for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Position {
    pub line: u32,
    pub col: u32,
}

impl Position {
    pub fn new(line: u32, col: u32) -> Position {
        Position { line, col }
    }
}

/// A whole source file: global declarations, function definitions, and the
/// top-level body that runs after every function has been defined.
#[derive(Clone, Debug, PartialEq)]
pub struct Program {
    pub globals: Vec<VarDec>,
    pub functions: Vec<FunDec>,
    pub body: Vec<Stmt>,
}

impl Program {
    pub fn new(globals: Vec<VarDec>, functions: Vec<FunDec>, body: Vec<Stmt>) -> Program {
        Program {
            globals,
            functions,
            body,
        }
    }
}

/// One `var name := init;`-shaped declaration, global or local depending on
/// where the translator encounters it.
#[derive(Clone, Debug, PartialEq)]
pub struct VarDec {
    pub name: String,
    pub init: Exp,
    pub pos: Position,
}

impl VarDec {
    pub fn new(name: impl Into<String>, init: Exp, pos: Position) -> VarDec {
        VarDec {
            name: name.into(),
            init,
            pos,
        }
    }
}

/// A function parameter. Carries no initializer; its storage slot is
/// determined entirely by its position among the parameter list.
#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: String,
    pub pos: Position,
}

impl Param {
    pub fn new(name: impl Into<String>, pos: Position) -> Param {
        Param {
            name: name.into(),
            pos,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunDec {
    pub name: String,
    pub params: Vec<Param>,
    pub locals: Vec<VarDec>,
    pub body: Vec<Stmt>,
    pub pos: Position,
}

impl FunDec {
    pub fn new(
        name: impl Into<String>,
        params: Vec<Param>,
        locals: Vec<VarDec>,
        body: Vec<Stmt>,
        pos: Position,
    ) -> FunDec {
        FunDec {
            name: name.into(),
            params,
            locals,
            body,
            pos,
        }
    }
}

/// The three binary arithmetic operators. Unary negation is its own `Exp`
/// variant (see [`Exp::Neg`]) rather than a fourth `ArithOp`, since it takes
/// a single operand, not two.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
}

/// The six source-level comparison operators. Only `Eq` and `Lt` survive
/// translation; the rest are rewritten away before code generation (see
/// `turtlec::translate::rewrite`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumFromStr)]
pub enum CompareOp {
    Eq,
    Neq,
    Lt,
    Gt,
    Leq,
    Geq,
}

/// A conditional test, the `(a OP b)` part of an `if`/`while`.
#[derive(Clone, Debug, PartialEq)]
pub struct Cond {
    pub op: CompareOp,
    pub left: Exp,
    pub right: Exp,
    pub pos: Position,
}

impl Cond {
    pub fn new(op: CompareOp, left: Exp, right: Exp, pos: Position) -> Cond {
        Cond {
            op,
            left,
            right,
            pos,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Exp {
    Var(String, Position),
    Int(i32, Position),
    Call(String, Vec<Exp>, Position),
    Op(ArithOp, Box<Exp>, Box<Exp>, Position),
    /// Unary negation. Carries exactly one operand; the translator pushes it
    /// once and applies `Neg` in place, unlike the binary `Op` variant which
    /// pushes two operands.
    Neg(Box<Exp>, Position),
}

impl Exp {
    pub fn pos(&self) -> Position {
        match self {
            Exp::Var(_, pos) => *pos,
            Exp::Int(_, pos) => *pos,
            Exp::Call(_, _, pos) => *pos,
            Exp::Op(_, _, _, pos) => *pos,
            Exp::Neg(_, pos) => *pos,
        }
    }

    pub fn new_var(name: impl Into<String>, pos: Position) -> Exp {
        Exp::Var(name.into(), pos)
    }

    pub fn new_int(value: i32, pos: Position) -> Exp {
        Exp::Int(value, pos)
    }

    pub fn new_call(name: impl Into<String>, args: Vec<Exp>, pos: Position) -> Exp {
        Exp::Call(name.into(), args, pos)
    }

    pub fn new_op(op: ArithOp, left: Exp, right: Exp, pos: Position) -> Exp {
        Exp::Op(op, Box::new(left), Box::new(right), pos)
    }

    /// Unary negation. Pushes `operand` exactly once; `Neg` then consumes
    /// that single stack slot.
    pub fn new_neg(operand: Exp, pos: Position) -> Exp {
        Exp::Neg(Box::new(operand), pos)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    Up(Position),
    Down(Position),
    Move(Exp, Exp, Position),
    Read(String, Position),
    Assign(String, Exp, Position),
    If {
        cond: Cond,
        then: Vec<Stmt>,
        pos: Position,
    },
    IfElse {
        cond: Cond,
        then: Vec<Stmt>,
        else_: Vec<Stmt>,
        pos: Position,
    },
    While {
        cond: Cond,
        body: Vec<Stmt>,
        pos: Position,
    },
    Return(Exp, Position),
    Call(String, Vec<Exp>, Position),
    ExpList(Vec<Exp>, Position),
}

impl Stmt {
    pub fn pos(&self) -> Position {
        match self {
            Stmt::Up(pos)
            | Stmt::Down(pos)
            | Stmt::Move(_, _, pos)
            | Stmt::Read(_, pos)
            | Stmt::Assign(_, _, pos)
            | Stmt::If { pos, .. }
            | Stmt::IfElse { pos, .. }
            | Stmt::While { pos, .. }
            | Stmt::Return(_, pos)
            | Stmt::Call(_, _, pos)
            | Stmt::ExpList(_, pos) => *pos,
        }
    }

    pub fn new_if(cond: Cond, then: Vec<Stmt>, pos: Position) -> Stmt {
        Stmt::If { cond, then, pos }
    }

    pub fn new_if_else(cond: Cond, then: Vec<Stmt>, else_: Vec<Stmt>, pos: Position) -> Stmt {
        Stmt::IfElse {
            cond,
            then,
            else_,
            pos,
        }
    }

    pub fn new_while(cond: Cond, body: Vec<Stmt>, pos: Position) -> Stmt {
        Stmt::While { cond, body, pos }
    }
}
