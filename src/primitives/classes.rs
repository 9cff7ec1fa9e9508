//! Class-constructor primitives
//!
//! `Animal`, `Dog` and `Cat` show how a "class" is put together out of plain
//! objects: the subclass constructor builds its own fields and then points
//! the new object's prototype at a freshly built `Animal`.

use crate::error::Result;
use crate::primitives::{bool_arg, check_arity, number_arg, Primitive, PrimitiveRegistry};
use crate::runtime::{Object, Value};

/// Noise every plain animal makes
pub const ANIMAL_NOISE: &str = "grunt";
/// Noise a dog makes
pub const DOG_NOISE: &str = "woof";
/// Noise a cat makes
pub const CAT_NOISE: &str = "meow";

/// Register class-constructor primitives
pub fn register(registry: &mut PrimitiveRegistry) {
    registry.register(AnimalPrimitive);
    registry.register(DogPrimitive);
    registry.register(CatPrimitive);
}

fn make_animal(furry: bool) -> Object {
    let animal = Object::new();
    for (key, value) in [
        ("legs", Value::Number(4.0)),
        ("furry", Value::Bool(furry)),
        ("noise", Value::keyword(ANIMAL_NOISE)),
    ] {
        animal.insert(key, value);
    }
    animal
}

/// Builds `fields` on a new object whose prototype is `Animal(furry)`
fn make_subclass(fields: [(&str, Value); 2], furry: bool) -> Result<Object> {
    let object = Object::new();
    for (key, value) in fields {
        object.insert(key, value);
    }
    object.set_prototype(Value::object(make_animal(furry)))?;
    Ok(object)
}

/// `(Animal furry)`
pub struct AnimalPrimitive;

impl Primitive for AnimalPrimitive {
    fn name(&self) -> &str {
        "Animal"
    }

    fn call(&self, args: &[Value]) -> Result<Value> {
        check_arity(self, args)?;
        let furry = bool_arg(self.name(), args, 0)?;
        Ok(Value::object(make_animal(furry)))
    }

    fn arity(&self) -> Option<usize> {
        Some(1)
    }
}

/// `(Dog breed furry)`
pub struct DogPrimitive;

impl Primitive for DogPrimitive {
    fn name(&self) -> &str {
        "Dog"
    }

    fn call(&self, args: &[Value]) -> Result<Value> {
        check_arity(self, args)?;
        let breed = number_arg(self.name(), args, 0)?;
        let furry = bool_arg(self.name(), args, 1)?;
        Ok(Value::object(make_subclass(
            [
                ("breed", Value::Number(breed)),
                ("noise", Value::keyword(DOG_NOISE)),
            ],
            furry,
        )?))
    }

    fn arity(&self) -> Option<usize> {
        Some(2)
    }
}

/// `(Cat fur-color furry)`
pub struct CatPrimitive;

impl Primitive for CatPrimitive {
    fn name(&self) -> &str {
        "Cat"
    }

    fn call(&self, args: &[Value]) -> Result<Value> {
        check_arity(self, args)?;
        let color = number_arg(self.name(), args, 0)?;
        let furry = bool_arg(self.name(), args, 1)?;
        Ok(Value::object(make_subclass(
            [
                ("fur-color", Value::Number(color)),
                ("noise", Value::keyword(CAT_NOISE)),
            ],
            furry,
        )?))
    }

    fn arity(&self) -> Option<usize> {
        Some(2)
    }
}
