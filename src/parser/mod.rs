//! Parser
//!
//! Reads parenthesized prefix syntax into programs and expressions.

mod ast;
mod sexpr_parser;

pub use ast::{Expression, Program, Statement};
pub use sexpr_parser::SExprParser;

use crate::error::Result;
use crate::lexer::SExprScanner;

/// Scans and parses `source` as a program
pub fn parse_program(source: &str) -> Result<Program> {
    let tokens = SExprScanner::new(source).scan_tokens()?;
    SExprParser::new(tokens).parse()
}

/// Scans and parses `source` as a single expression
pub fn parse_expression(source: &str) -> Result<Expression> {
    let tokens = SExprScanner::new(source).scan_tokens()?;
    SExprParser::new(tokens).parse_single_expression()
}
