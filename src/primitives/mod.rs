//! Primitive (native) functions
//!
//! Provides the `Primitive` trait, the registry that holds the standard
//! table, and the argument helpers primitives use for their own arity and
//! type checks.

pub mod arithmetic;
#[cfg(feature = "classes")]
pub mod classes;
pub mod objects;

use crate::error::{Error, Result};
use crate::runtime::{Environment, Object, Value};
use std::collections::HashMap;
use std::rc::Rc;

/// Primitive trait - every native function implements this
pub trait Primitive {
    /// Name the primitive is bound to in the initial environment
    fn name(&self) -> &str;

    /// Call the primitive with already-evaluated arguments
    ///
    /// Implementations check their own arity and argument types.
    fn call(&self, args: &[Value]) -> Result<Value>;

    /// Number of arguments the primitive takes
    fn arity(&self) -> Option<usize> {
        None // None means variadic
    }
}

/// Primitive registry
pub struct PrimitiveRegistry {
    primitives: HashMap<String, Rc<dyn Primitive>>,
}

impl PrimitiveRegistry {
    /// Create new registry with the standard primitive table
    pub fn new() -> Self {
        let mut registry = PrimitiveRegistry::empty();

        arithmetic::register(&mut registry);
        objects::register(&mut registry);
        #[cfg(feature = "classes")]
        classes::register(&mut registry);

        registry
    }

    /// Create empty registry (for testing)
    pub fn empty() -> Self {
        PrimitiveRegistry {
            primitives: HashMap::new(),
        }
    }

    /// Register a primitive, replacing any previous one with the same name
    pub fn register<P: Primitive + 'static>(&mut self, primitive: P) {
        let name = primitive.name().to_string();
        self.primitives.insert(name, Rc::new(primitive));
    }

    /// Get primitive by name
    pub fn get(&self, name: &str) -> Option<Rc<dyn Primitive>> {
        self.primitives.get(name).cloned()
    }

    /// Check if primitive exists
    pub fn has(&self, name: &str) -> bool {
        self.primitives.contains_key(name)
    }

    /// List all primitive names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.primitives.keys().cloned().collect();
        names.sort();
        names
    }

    /// Get primitive count
    pub fn count(&self) -> usize {
        self.primitives.len()
    }

    /// Binds every primitive by name in `env`
    ///
    /// Fails with a redefinition error if `env` already binds one of the names.
    pub fn install(&self, env: &Environment) -> Result<()> {
        for name in self.names() {
            if let Some(prim) = self.primitives.get(&name) {
                env.set(name, Value::Primitive(prim.clone()))?;
            }
        }
        tracing::debug!(count = self.count(), "installed primitives");
        Ok(())
    }

    /// Builds a fresh root environment holding every primitive
    pub fn root_environment(&self) -> Environment {
        Environment::from_bindings(
            self.primitives
                .iter()
                .map(|(name, prim)| (name.clone(), Value::Primitive(prim.clone()))),
        )
    }
}

impl Default for PrimitiveRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Root environment pre-populated with the standard primitive table
pub fn make_initial_env() -> Environment {
    PrimitiveRegistry::new().root_environment()
}

// Argument helpers shared by the primitive implementations. Positions in
// error messages are 1-based.

/// Checks `args` against the primitive's declared arity; variadic primitives accept anything
pub(crate) fn check_arity<P: Primitive + ?Sized>(primitive: &P, args: &[Value]) -> Result<()> {
    match primitive.arity() {
        Some(expected) if args.len() != expected => {
            Err(Error::arity(primitive.name(), expected, args.len()))
        }
        _ => Ok(()),
    }
}

pub(crate) fn number_arg(primitive: &str, args: &[Value], index: usize) -> Result<f64> {
    match &args[index] {
        Value::Number(n) => Ok(*n),
        other => Err(Error::primitive_type(
            primitive,
            index + 1,
            "number",
            other.to_string(),
        )),
    }
}

pub(crate) fn bool_arg(primitive: &str, args: &[Value], index: usize) -> Result<bool> {
    match &args[index] {
        Value::Bool(b) => Ok(*b),
        other => Err(Error::primitive_type(
            primitive,
            index + 1,
            "boolean",
            other.to_string(),
        )),
    }
}

pub(crate) fn keyword_arg<'a>(primitive: &str, args: &'a [Value], index: usize) -> Result<&'a str> {
    match &args[index] {
        Value::Keyword(name) => Ok(name),
        other => Err(Error::primitive_type(
            primitive,
            index + 1,
            "keyword",
            other.to_string(),
        )),
    }
}

pub(crate) fn object_arg<'a>(
    primitive: &str,
    args: &'a [Value],
    index: usize,
) -> Result<&'a Rc<Object>> {
    match &args[index] {
        Value::Object(obj) => Ok(obj),
        other => Err(Error::primitive_type(
            primitive,
            index + 1,
            "object",
            other.to_string(),
        )),
    }
}
