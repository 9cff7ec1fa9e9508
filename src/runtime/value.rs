use std::fmt;
use std::rc::Rc;

use crate::parser::Expression;
use crate::primitives::Primitive;
use crate::runtime::{printer, Environment, Object};

/// Runtime value representation
#[derive(Clone)]
pub enum Value {
    /// Double-precision number
    Number(f64),
    /// Boolean value
    Bool(bool),
    /// Null value
    Null,
    /// Keyword (:name), the only thing allowed as an object key
    Keyword(String),
    /// Lambda closed over its defining environment
    Closure(Rc<Closure>),
    /// Native function
    Primitive(Rc<dyn Primitive>),
    /// Object with an optional prototype
    Object(Rc<Object>),
}

/// A lambda paired with the frame it was evaluated in
pub struct Closure {
    /// Parameter names, bound positionally on each call
    pub params: Vec<String>,
    /// Body expression
    pub body: Rc<Expression>,
    /// Captured environment (shared, never copied)
    pub env: Environment,
}

impl Value {
    /// Creates a keyword value
    pub fn keyword(name: impl Into<String>) -> Self {
        Value::Keyword(name.into())
    }

    /// Wraps an object
    pub fn object(object: Object) -> Self {
        Value::Object(Rc::new(object))
    }

    /// Wraps a native function
    pub fn primitive<P: Primitive + 'static>(primitive: P) -> Self {
        Value::Primitive(Rc::new(primitive))
    }

    /// Returns the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Bool(_) => "boolean",
            Value::Null => "null",
            Value::Keyword(_) => "keyword",
            Value::Closure(_) => "closure",
            Value::Primitive(_) => "primitive",
            Value::Object(_) => "object",
        }
    }

    /// Returns the keyword name, if this is a keyword
    pub fn as_keyword(&self) -> Option<&str> {
        match self {
            Value::Keyword(name) => Some(name),
            _ => None,
        }
    }

    /// Returns the object, if this is one
    pub fn as_object(&self) -> Option<&Rc<Object>> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Keyword(a), Value::Keyword(b)) => a == b,
            // Closures compare by identity
            (Value::Closure(a), Value::Closure(b)) => Rc::ptr_eq(a, b),
            (Value::Primitive(a), Value::Primitive(b)) => a.name() == b.name(),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b) || **a == **b,
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "Number({})", n),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::Null => write!(f, "Null"),
            Value::Keyword(name) => write!(f, "Keyword({})", name),
            Value::Closure(closure) => f
                .debug_struct("Closure")
                .field("params", &closure.params)
                .field("body", &closure.body.to_string())
                .finish(),
            Value::Primitive(prim) => write!(f, "Primitive({})", prim.name()),
            Value::Object(_) => write!(f, "Object({})", self),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&printer::pretty_value(self))
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Number(1.0).type_name(), "number");
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(Value::keyword("legs").type_name(), "keyword");
        assert_eq!(Value::object(Object::new()).type_name(), "object");
    }

    #[test]
    fn test_scalar_equality() {
        assert_eq!(Value::Number(2.5), Value::Number(2.5));
        assert_ne!(Value::Number(1.0), Value::Bool(true));
        assert_eq!(Value::keyword("a"), Value::keyword("a"));
        assert_ne!(Value::keyword("a"), Value::keyword("b"));
    }

    #[test]
    fn test_closures_compare_by_identity() {
        let env = Environment::new();
        let make = || {
            Value::Closure(Rc::new(Closure {
                params: vec!["x".to_string()],
                body: Rc::new(Expression::var("x")),
                env: env.clone(),
            }))
        };
        let a = make();
        assert_eq!(a, a.clone());
        assert_ne!(a, make());
    }
}
