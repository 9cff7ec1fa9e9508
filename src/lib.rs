//! # protolisp - a small prototype-based Lisp
//!
//! A tree-walking interpreter for a dynamically typed expression language
//! with closures, keywords and prototype-based objects. "Classes" are not a
//! language feature: they are primitives that build an object and point its
//! prototype at another freshly built object.
//!
//! ## Quick Start
//!
//! ```rust
//! use protolisp::{Evaluator, Parser, Scanner};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let code = r#"
//!     (define square (lambda (n) (* n n)))
//!     (define point (obj :x 3 :tag :origin))
//!     (print (square (field point :x)))
//!     (print point)
//! "#;
//!
//! // Tokenize (scan)
//! let mut scanner = Scanner::new(code);
//! let tokens = scanner.scan_tokens()?;
//!
//! // Parse into AST
//! let mut parser = Parser::new(tokens);
//! let program = parser.parse()?;
//!
//! // Execute
//! let evaluator = Evaluator::new();
//! let output = evaluator.execute(&program)?;
//!
//! assert_eq!(output, vec!["9", "(obj :tag :origin :x 3 proto:null)"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Language Overview
//!
//! ### Statements
//!
//! - `(define name expr)` - bind a name in the top-level scope (once)
//! - `(print expr)` - append the rendering of a value to the output
//!
//! ### Expressions
//!
//! - Literals: numbers, `true`, `false`, `null`, keywords `:name`
//! - `(lambda (x y) body)` - closure over the current scope
//! - `(if guard then else)` - the guard must be a boolean
//! - `(f arg ...)` - application; the head may be any expression
//!
//! ### Primitives
//!
//! - **Arithmetic**: `+ - * /` on two numbers, `zero?`
//! - **Objects**: `(obj :k v ...)`, `(field o :k)` (walks the prototype chain)
//! - **Classes** (feature `classes`): `(Animal furry)`, `(Dog breed furry)`,
//!   `(Cat fur-color furry)`
//!
//! Applying an object to `:key value` pairs builds a new object:
//! `((obj) :a 1)`.
//!
//! ## Architecture
//!
//! ```text
//! Source Code → Scanner → Tokens → Parser → AST → Evaluator → Output
//! ```
//!
//! - [`Scanner`] - Tokenizes source code
//! - [`Parser`] - Parses tokens into a [`Program`]
//! - [`Evaluator`] - Runs programs against one top-level [`Environment`]
//! - [`Value`] - Runtime value representation
//! - [`PrimitiveRegistry`] - Native functions installed in the root scope
//!
//! ## Error Handling
//!
//! Every error is fatal and carries its context:
//!
//! ```rust
//! use protolisp::{run, Error};
//!
//! let err = run("(define p (obj :x 1)) (print (field p :wings))").unwrap_err();
//! assert!(matches!(err, Error::FieldNotFound { ref key, .. } if key == "wings"));
//! ```

/// Version of the interpreter
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod lexer;
pub mod parser;
pub mod primitives;
pub mod runtime;

// Re-export main types
pub use error::{Error, ErrorCategory, Result};
pub use lexer::{SExprScanner, Token, TokenKind};
pub use parser::{parse_expression, parse_program, Expression, Program, SExprParser, Statement};
pub use primitives::{make_initial_env, Primitive, PrimitiveRegistry};
pub use runtime::{
    evaluate, execute, pretty_value, Closure, Environment, Evaluator, Object, Output, Value,
};

/// Type alias for the S-expression scanner (lexer).
/// Converts raw source text into tokens for the parser.
pub type Scanner = SExprScanner;

/// Type alias for the S-expression parser.
/// Converts tokens into an abstract syntax tree (AST).
pub type Parser = SExprParser;

/// Reads `source` and executes it against a fresh initial environment
pub fn run(source: &str) -> Result<Output> {
    Evaluator::new().run(source)
}
