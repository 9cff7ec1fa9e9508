//! Object construction and field access primitives

use crate::error::Result;
use crate::primitives::{check_arity, keyword_arg, object_arg, Primitive, PrimitiveRegistry};
use crate::runtime::{Object, Value};

/// Register object primitives
pub fn register(registry: &mut PrimitiveRegistry) {
    registry.register(ObjPrimitive);
    registry.register(FieldPrimitive);
}

/// Primitive building an object from alternating keywords and values
pub struct ObjPrimitive;

impl Primitive for ObjPrimitive {
    fn name(&self) -> &str {
        "obj"
    }

    fn call(&self, args: &[Value]) -> Result<Value> {
        Ok(Value::object(Object::from_checked_pairs(args)?))
    }
}

/// Primitive reading a field through the prototype chain
pub struct FieldPrimitive;

impl Primitive for FieldPrimitive {
    fn name(&self) -> &str {
        "field"
    }

    fn call(&self, args: &[Value]) -> Result<Value> {
        check_arity(self, args)?;
        let object = object_arg(self.name(), args, 0)?;
        let key = keyword_arg(self.name(), args, 1)?;
        Object::lookup(object, key)
    }

    fn arity(&self) -> Option<usize> {
        Some(2)
    }
}
