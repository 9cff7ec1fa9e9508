use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

use crate::runtime::{printer, Value};

/// Complete program: statements executed in order against one environment
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Program {
    /// Top-level statements in the program
    pub statements: Vec<Statement>,
}

impl Program {
    /// Creates a program from its statements
    pub fn new(statements: Vec<Statement>) -> Self {
        Program { statements }
    }
}

/// Statements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    /// Top-level definition: (define id expr)
    Define {
        /// Name being bound
        name: String,
        /// Expression whose value is bound
        value: Expression,
    },

    /// Output statement: (print expr)
    Print(Expression),
}

/// Expressions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// Variable reference expression
    Variable(String),

    // Literals
    /// Number literal expression
    NumberLiteral(f64),
    /// Boolean literal expression
    BoolLiteral(bool),
    /// Null literal expression
    NullLiteral,
    /// Keyword literal expression (:name)
    KeywordLiteral(String),

    /// Lambda expression (lambda (x y) body)
    Lambda {
        /// Parameter names for the lambda
        params: Vec<String>,
        /// Body expression, shared with every closure made from this lambda
        body: Rc<Expression>,
    },

    /// Application (head arg ...)
    Application {
        /// Expression producing the callee
        head: Box<Expression>,
        /// Argument expressions, evaluated left to right
        args: Vec<Expression>,
    },

    /// Conditional expression (if guard then else)
    Conditional {
        /// Guard expression, must evaluate to a boolean
        guard: Box<Expression>,
        /// Expression to evaluate if the guard is true
        then_expr: Box<Expression>,
        /// Expression to evaluate if the guard is false
        else_expr: Box<Expression>,
    },

    /// An already-evaluated value placed back in expression position.
    /// Only ever built at runtime, so it never crosses serde.
    #[serde(skip)]
    Value(Value),
}

impl Expression {
    /// Variable reference
    pub fn var(name: impl Into<String>) -> Self {
        Expression::Variable(name.into())
    }

    /// Number literal
    pub fn number(n: f64) -> Self {
        Expression::NumberLiteral(n)
    }

    /// Keyword literal
    pub fn keyword(name: impl Into<String>) -> Self {
        Expression::KeywordLiteral(name.into())
    }

    /// Lambda with the given parameter names
    pub fn lambda<S: Into<String>>(params: impl IntoIterator<Item = S>, body: Expression) -> Self {
        Expression::Lambda {
            params: params.into_iter().map(Into::into).collect(),
            body: Rc::new(body),
        }
    }

    /// Application of `head` to `args`
    pub fn apply(head: Expression, args: Vec<Expression>) -> Self {
        Expression::Application {
            head: Box::new(head),
            args,
        }
    }

    /// Two-armed conditional
    pub fn conditional(guard: Expression, then_expr: Expression, else_expr: Expression) -> Self {
        Expression::Conditional {
            guard: Box::new(guard),
            then_expr: Box::new(then_expr),
            else_expr: Box::new(else_expr),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&printer::pretty_expression(self))
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Statement::Define { name, value } => write!(f, "(define {} {})", name, value),
            Statement::Print(expr) => write!(f, "(print {})", expr),
        }
    }
}
