//! Error types for the protolisp reader and evaluator

use thiserror::Error;

/// Interpreter errors
///
/// Every failure is fatal: nothing inside the evaluator catches an `Error`,
/// it unwinds to whoever called [`crate::evaluate`] or [`crate::execute`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // Reader errors
    /// Syntax error encountered while scanning or parsing
    ///
    /// **Triggered by:** Unbalanced parentheses, stray characters, malformed forms
    /// **Example:** `(lambda x x)` (parameter list is not parenthesized)
    #[error("Syntax error at line {line}, column {col}: {message}")]
    SyntaxError {
        /// Line number where error occurred
        line: usize,
        /// Column number where error occurred
        col: usize,
        /// Error description
        message: String,
    },

    /// Input ended in the middle of a form
    #[error("Unexpected end of input")]
    UnexpectedEof,

    /// A top-level form that is neither `define` nor `print`
    #[error("Not a statement: {form}")]
    NotAStatement {
        /// Rendering of the offending form
        form: String,
    },

    // Runtime errors
    /// Reference to a name bound nowhere in the environment chain
    ///
    /// **Triggered by:** Using a variable before `define`, or `update` on an unknown name
    /// **Example:** `(print x)` on a fresh environment
    #[error("Unbound variable: {name}")]
    UnboundVariable {
        /// Variable name
        name: String,
    },

    /// Binding a name that the same frame already holds
    ///
    /// **Triggered by:** `(define x 1) (define x 2)`, or `(lambda (x x) x)` when called
    #[error("Redefinition of '{name}' in the same scope")]
    Redefinition {
        /// Variable name
        name: String,
    },

    /// Closure or primitive called with the wrong number of arguments
    #[error("Arity mismatch calling {callee}: expected {expected} arguments, got {got}")]
    ArityMismatch {
        /// Rendering of the callee
        callee: String,
        /// Parameter count
        expected: usize,
        /// Argument count
        got: usize,
    },

    /// A primitive received an argument of the wrong type
    ///
    /// **Example:** `(+ 1 true)` reports position 2, expected `number`, got `true`
    #[error("Type error in {primitive}: expected {expected} at position {position}, got {got}")]
    PrimitiveTypeError {
        /// Primitive name
        primitive: String,
        /// 1-based argument position
        position: usize,
        /// Expected type name
        expected: String,
        /// Rendering of the value found
        got: String,
    },

    /// Conditional guard that is not a boolean
    #[error("Type error: if expects a boolean guard, got {got}")]
    GuardTypeError {
        /// Rendering of the guard value
        got: String,
    },

    /// Application head that is not a closure, primitive or object
    #[error("Value is not callable: expected closure, primitive or object, got {value}")]
    NotCallable {
        /// Rendering of the head value
        value: String,
    },

    /// Left-hand side of an object key/value pair that is not a keyword
    #[error("Type error: object keys must be keywords, got {got}")]
    KeyTypeError {
        /// Rendering of the key value
        got: String,
    },

    /// Object construction with an odd number of arguments
    #[error("Malformed object literal: expected key/value pairs, got {count} arguments")]
    OddObjectArguments {
        /// Argument count
        count: usize,
    },

    /// Object field value whose type is not allowed by `obj`
    #[error("Malformed object literal: value for :{key} must be a number, boolean, primitive, closure or keyword, got {got}")]
    DisallowedFieldValue {
        /// Field name
        key: String,
        /// Rendering of the value
        got: String,
    },

    /// Prototype assignment to something other than an object or null
    #[error("Invalid prototype: expected object or null, got {got}")]
    InvalidPrototype {
        /// Rendering of the value
        got: String,
    },

    /// Field lookup exhausted the prototype chain
    #[error("Field :{key} not found in {object}")]
    FieldNotFound {
        /// Field name
        key: String,
        /// Rendering of the object the lookup started from
        object: String,
    },

    /// Field lookup revisited an object while walking prototypes
    #[error("Prototype chain is cyclic while looking up :{key}")]
    PrototypeCycle {
        /// Field name
        key: String,
    },
}

/// Broad error families, used by callers that only care about the kind of fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Source text could not be read
    Syntax,
    /// Name absent from the environment chain
    Unbound,
    /// Name already bound in the frame
    Redefinition,
    /// Wrong number of arguments
    Arity,
    /// Value of the wrong runtime type
    Type,
    /// Object built from a malformed argument list
    MalformedObject,
    /// Prototype walk found nothing (or went round in circles)
    FieldNotFound,
}

impl Error {
    /// Create a primitive type error
    pub fn primitive_type(
        primitive: &str,
        position: usize,
        expected: &str,
        got: impl Into<String>,
    ) -> Self {
        Error::PrimitiveTypeError {
            primitive: primitive.to_string(),
            position,
            expected: expected.to_string(),
            got: got.into(),
        }
    }

    /// Create an arity error
    pub fn arity(callee: impl Into<String>, expected: usize, got: usize) -> Self {
        Error::ArityMismatch {
            callee: callee.into(),
            expected,
            got,
        }
    }

    /// Classify the error into its family
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::SyntaxError { .. } | Error::UnexpectedEof | Error::NotAStatement { .. } => {
                ErrorCategory::Syntax
            }

            Error::UnboundVariable { .. } => ErrorCategory::Unbound,
            Error::Redefinition { .. } => ErrorCategory::Redefinition,
            Error::ArityMismatch { .. } => ErrorCategory::Arity,

            Error::PrimitiveTypeError { .. }
            | Error::GuardTypeError { .. }
            | Error::NotCallable { .. }
            | Error::KeyTypeError { .. }
            | Error::InvalidPrototype { .. } => ErrorCategory::Type,

            Error::OddObjectArguments { .. } | Error::DisallowedFieldValue { .. } => {
                ErrorCategory::MalformedObject
            }

            Error::FieldNotFound { .. } | Error::PrototypeCycle { .. } => {
                ErrorCategory::FieldNotFound
            }
        }
    }
}

/// Result type for protolisp operations
pub type Result<T> = std::result::Result<T, Error>;
