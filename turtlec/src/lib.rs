//! Semantic analysis and code generation for the turtle-graphics language.
//!
//! This crate turns a [`turtle_ast::Program`] (produced by
//! [`turtle_parser`](../turtle_parser/index.html)) into a stream of
//! [`turtlevm::Instruction`]s. The pipeline, leaves first:
//!
//! 1. [`symbols`] interns identifier spellings into [`Symbol`](symbols::Symbol)s.
//! 2. [`env`] holds the two scoped symbol tables the translator resolves
//!    names against: nested variable scopes and a flat function scope.
//! 3. [`buffer`] is the append-only instruction buffer, supporting
//!    backpatching of previously emitted branch/call targets.
//! 4. [`rewrite`] lowers the six source comparison operators down to the two
//!    the target machine can branch on (`Eq`, `Lt`).
//! 5. [`translate`] is the AST walker tying the above together, driving a
//!    whole program from global declarations through to `Halt`.
//!
//! Errors are reported through [`error::Diagnostic`], optionally carrying a
//! file name and source position.

pub mod buffer;
pub mod env;
pub mod error;
pub mod rewrite;
pub mod symbols;
pub mod translate;

pub use error::{Diagnostic, SemanticError};
pub use translate::translate_program;
