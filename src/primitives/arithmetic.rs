//! Arithmetic primitives: `+ - * /` and `zero?`

use crate::error::Result;
use crate::primitives::{check_arity, number_arg, Primitive, PrimitiveRegistry};
use crate::runtime::Value;

/// Register arithmetic primitives
pub fn register(registry: &mut PrimitiveRegistry) {
    registry.register(ArithmeticPrimitive::new(ArithmeticOp::Add));
    registry.register(ArithmeticPrimitive::new(ArithmeticOp::Sub));
    registry.register(ArithmeticPrimitive::new(ArithmeticOp::Mul));
    registry.register(ArithmeticPrimitive::new(ArithmeticOp::Div));
    registry.register(ZeroCheckPrimitive);
}

/// Binary operation on two numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    /// Addition (+)
    Add,
    /// Subtraction (-)
    Sub,
    /// Multiplication (*)
    Mul,
    /// Division (/), IEEE semantics
    Div,
}

impl ArithmeticOp {
    fn symbol(self) -> &'static str {
        match self {
            ArithmeticOp::Add => "+",
            ArithmeticOp::Sub => "-",
            ArithmeticOp::Mul => "*",
            ArithmeticOp::Div => "/",
        }
    }

    fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            ArithmeticOp::Add => a + b,
            ArithmeticOp::Sub => a - b,
            ArithmeticOp::Mul => a * b,
            ArithmeticOp::Div => a / b,
        }
    }
}

/// Primitive for one of the four arithmetic operators
pub struct ArithmeticPrimitive {
    op: ArithmeticOp,
}

impl ArithmeticPrimitive {
    /// Creates the primitive for `op`
    pub fn new(op: ArithmeticOp) -> Self {
        ArithmeticPrimitive { op }
    }
}

impl Primitive for ArithmeticPrimitive {
    fn name(&self) -> &str {
        self.op.symbol()
    }

    fn call(&self, args: &[Value]) -> Result<Value> {
        let name = self.name();
        check_arity(self, args)?;
        let a = number_arg(name, args, 0)?;
        let b = number_arg(name, args, 1)?;
        Ok(Value::Number(self.op.apply(a, b)))
    }

    fn arity(&self) -> Option<usize> {
        Some(2)
    }
}

/// Primitive testing a number against zero
pub struct ZeroCheckPrimitive;

impl Primitive for ZeroCheckPrimitive {
    fn name(&self) -> &str {
        "zero?"
    }

    fn call(&self, args: &[Value]) -> Result<Value> {
        check_arity(self, args)?;
        let n = number_arg(self.name(), args, 0)?;
        Ok(Value::Bool(n == 0.0))
    }

    fn arity(&self) -> Option<usize> {
        Some(1)
    }
}
