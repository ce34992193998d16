//! Lexer and parser for the turtle-graphics source language.
//!
//! The main entry point is [`parse`], which accepts source text and returns
//! the [`turtle_ast::Program`] it describes.
//!
//! Parsing is implemented with [pest], the way the teacher crate this
//! workspace is modeled on parses its own assembly language: the grammar
//! lives in `grammar.pest`, a derived [`Parser`](pest::Parser) produces a
//! parse tree of [`Pair`](pest::iterators::Pair)s, and a recursive-descent
//! builder (`build.rs`) turns that tree into AST nodes.
//!
//! [pest]: https://docs.rs/pest/

mod build;
mod parser;

#[cfg(test)]
mod test;

use parser::{Rule, TurtleParser};
use pest::{Parser, Span};
use turtle_ast::Program;

pub type Error = pest::error::Error<Rule>;
pub type Result<T> = std::result::Result<T, Error>;

fn new_parser_error(span: Span, message: String) -> Error {
    Error::new_from_span(pest::error::ErrorVariant::CustomError { message }, span)
}

/// Parses a whole turtle-graphics source file into its AST.
pub fn parse(input: &str) -> Result<Program> {
    let pair = TurtleParser::parse(Rule::program, input)?.next().unwrap();
    build::build_program(pair)
}
