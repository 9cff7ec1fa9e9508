//! Prototype-based objects
//!
//! An object owns a keyword-keyed field map and points at zero or one
//! prototype. Field lookup checks the object's own fields first and then
//! walks the prototype chain until a definition is found or the chain ends
//! in `null`.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::runtime::Value;

/// Object with keyword-keyed fields and a single optional prototype
#[derive(Default)]
pub struct Object {
    /// `Value::Null` or `Value::Object`
    prototype: RefCell<Value>,
    /// Own fields, keyed by keyword name
    fields: RefCell<BTreeMap<String, Value>>,
}

impl Object {
    /// Creates an empty object with a null prototype
    pub fn new() -> Self {
        Object::default()
    }

    /// Builds an object from alternating keyword/value arguments
    ///
    /// Later duplicates of a key overwrite earlier ones. Values are not
    /// type-checked here; see [`Object::from_checked_pairs`].
    pub fn from_pairs(args: &[Value]) -> Result<Self> {
        if args.len() % 2 != 0 {
            return Err(Error::OddObjectArguments { count: args.len() });
        }

        let object = Object::new();
        for pair in args.chunks(2) {
            object.set_field(&pair[0], pair[1].clone())?;
        }
        Ok(object)
    }

    /// Like [`Object::from_pairs`], but only numbers, booleans, primitives,
    /// closures and keywords are accepted as field values.
    pub fn from_checked_pairs(args: &[Value]) -> Result<Self> {
        if args.len() % 2 != 0 {
            return Err(Error::OddObjectArguments { count: args.len() });
        }

        for pair in args.chunks(2) {
            let key = pair[0].as_keyword().ok_or_else(|| Error::KeyTypeError {
                got: pair[0].to_string(),
            })?;
            if !Self::is_allowed_field_value(&pair[1]) {
                return Err(Error::DisallowedFieldValue {
                    key: key.to_string(),
                    got: pair[1].to_string(),
                });
            }
        }

        Self::from_pairs(args)
    }

    /// Nested objects and null are not valid `obj` field values
    pub fn is_allowed_field_value(value: &Value) -> bool {
        matches!(
            value,
            Value::Number(_)
                | Value::Bool(_)
                | Value::Primitive(_)
                | Value::Closure(_)
                | Value::Keyword(_)
        )
    }

    /// Returns the prototype (`Value::Null` when there is none)
    pub fn prototype(&self) -> Value {
        self.prototype.borrow().clone()
    }

    /// Replaces the prototype; only objects and null are accepted
    pub fn set_prototype(&self, prototype: Value) -> Result<()> {
        match prototype {
            Value::Null | Value::Object(_) => {
                *self.prototype.borrow_mut() = prototype;
                Ok(())
            }
            other => Err(Error::InvalidPrototype {
                got: other.to_string(),
            }),
        }
    }

    /// Sets an own field; the key must be a keyword
    pub fn set_field(&self, key: &Value, value: Value) -> Result<()> {
        let name = key.as_keyword().ok_or_else(|| Error::KeyTypeError {
            got: key.to_string(),
        })?;
        self.fields.borrow_mut().insert(name.to_string(), value);
        Ok(())
    }

    /// Sets an own field by name
    pub fn insert(&self, name: impl Into<String>, value: Value) {
        self.fields.borrow_mut().insert(name.into(), value);
    }

    /// Returns an own field, ignoring the prototype chain
    pub fn own_field(&self, name: &str) -> Option<Value> {
        self.fields.borrow().get(name).cloned()
    }

    /// Own field names in sorted order
    pub fn field_names(&self) -> Vec<String> {
        self.fields.borrow().keys().cloned().collect()
    }

    /// Own fields as sorted (name, value) pairs
    pub fn fields(&self) -> Vec<(String, Value)> {
        self.fields
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Number of own fields
    pub fn len(&self) -> usize {
        self.fields.borrow().len()
    }

    /// True if the object has no own fields
    pub fn is_empty(&self) -> bool {
        self.fields.borrow().is_empty()
    }

    /// Looks `name` up on `object`, then along its prototype chain
    pub fn lookup(object: &Rc<Object>, name: &str) -> Result<Value> {
        if let Some(val) = object.own_field(name) {
            return Ok(val);
        }

        let mut visited: HashSet<*const Object> = HashSet::new();
        visited.insert(Rc::as_ptr(object));

        let mut cursor = object.prototype();
        let mut depth = 1;
        while let Value::Object(proto) = cursor {
            if !visited.insert(Rc::as_ptr(&proto)) {
                return Err(Error::PrototypeCycle {
                    key: name.to_string(),
                });
            }
            if let Some(val) = proto.own_field(name) {
                tracing::trace!(field = name, depth, "field found on prototype");
                return Ok(val);
            }
            cursor = proto.prototype();
            depth += 1;
        }

        Err(Error::FieldNotFound {
            key: name.to_string(),
            object: Value::Object(object.clone()).to_string(),
        })
    }
}

type ObjectPair = (*const Object, *const Object);

impl Object {
    /// Structural comparison of fields and prototypes
    ///
    /// A pair already under comparison counts as equal, so two cyclic chains
    /// of the same shape compare equal instead of recursing forever.
    fn structurally_equal(a: &Object, b: &Object, seen: &mut HashSet<ObjectPair>) -> bool {
        if std::ptr::eq(a, b) || !seen.insert((a as *const Object, b as *const Object)) {
            return true;
        }

        let equal_fields = {
            let (left, right) = (a.fields.borrow(), b.fields.borrow());
            left.len() == right.len()
                && left.iter().zip(right.iter()).all(|((ka, va), (kb, vb))| {
                    ka == kb && Self::values_equal(va, vb, seen)
                })
        };

        equal_fields && Self::values_equal(&a.prototype(), &b.prototype(), seen)
    }

    fn values_equal(a: &Value, b: &Value, seen: &mut HashSet<ObjectPair>) -> bool {
        match (a, b) {
            (Value::Object(x), Value::Object(y)) => Self::structurally_equal(x, y, seen),
            _ => a == b,
        }
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        Object::structurally_equal(self, other, &mut HashSet::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kw(name: &str) -> Value {
        Value::keyword(name)
    }

    #[test]
    fn test_from_pairs() {
        let obj = Object::from_pairs(&[kw("a"), Value::Number(1.0), kw("b"), Value::Bool(false)])
            .unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(obj.own_field("a"), Some(Value::Number(1.0)));
        assert_eq!(obj.own_field("b"), Some(Value::Bool(false)));
        assert_eq!(obj.prototype(), Value::Null);
    }

    #[test]
    fn test_from_pairs_odd() {
        let err = Object::from_pairs(&[kw("a")]).err().unwrap();
        assert_eq!(err, Error::OddObjectArguments { count: 1 });
    }

    #[test]
    fn test_from_pairs_rejects_non_keyword_key() {
        let err = Object::from_pairs(&[Value::Number(1.0), Value::Number(2.0)])
            .err()
            .unwrap();
        assert!(matches!(err, Error::KeyTypeError { .. }));
    }

    #[test]
    fn test_checked_pairs_rejects_nested_object() {
        let inner = Value::object(Object::new());
        let err = Object::from_checked_pairs(&[kw("inner"), inner])
            .err()
            .unwrap();
        assert!(matches!(err, Error::DisallowedFieldValue { ref key, .. } if key == "inner"));
    }

    #[test]
    fn test_checked_pairs_rejects_null() {
        let err = Object::from_checked_pairs(&[kw("n"), Value::Null])
            .err()
            .unwrap();
        assert!(matches!(err, Error::DisallowedFieldValue { .. }));
    }

    #[test]
    fn test_lookup_walks_chain() {
        let grandparent = Rc::new(Object::from_pairs(&[kw("a"), Value::Number(1.0)]).unwrap());
        let parent = Rc::new(Object::from_pairs(&[kw("b"), Value::Number(2.0)]).unwrap());
        parent
            .set_prototype(Value::Object(grandparent.clone()))
            .unwrap();
        let child = Rc::new(Object::from_pairs(&[kw("a"), Value::Number(3.0)]).unwrap());
        child.set_prototype(Value::Object(parent)).unwrap();

        assert_eq!(Object::lookup(&child, "a").unwrap(), Value::Number(3.0));
        assert_eq!(Object::lookup(&child, "b").unwrap(), Value::Number(2.0));
        assert!(matches!(
            Object::lookup(&child, "c"),
            Err(Error::FieldNotFound { .. })
        ));
    }

    #[test]
    fn test_lookup_detects_cycle() {
        let a = Rc::new(Object::new());
        let b = Rc::new(Object::new());
        a.set_prototype(Value::Object(b.clone())).unwrap();
        b.set_prototype(Value::Object(a.clone())).unwrap();

        assert_eq!(
            Object::lookup(&a, "missing"),
            Err(Error::PrototypeCycle {
                key: "missing".to_string()
            })
        );

        // Break the cycle so the two objects can be freed
        b.set_prototype(Value::Null).unwrap();
    }

    #[test]
    fn test_equality_of_cyclic_chains_terminates() {
        let a = Rc::new(Object::from_pairs(&[kw("n"), Value::Number(1.0)]).unwrap());
        let b = Rc::new(Object::new());
        a.set_prototype(Value::Object(b.clone())).unwrap();
        b.set_prototype(Value::Object(a.clone())).unwrap();

        let c = Rc::new(Object::from_pairs(&[kw("n"), Value::Number(1.0)]).unwrap());
        let d = Rc::new(Object::new());
        c.set_prototype(Value::Object(d.clone())).unwrap();
        d.set_prototype(Value::Object(c.clone())).unwrap();

        assert_eq!(Value::Object(a.clone()), Value::Object(c.clone()));

        d.insert("extra", Value::Bool(true));
        assert_ne!(Value::Object(a.clone()), Value::Object(c.clone()));

        b.set_prototype(Value::Null).unwrap();
        d.set_prototype(Value::Null).unwrap();
    }

    #[test]
    fn test_equality_is_structural() {
        let parent =
            || Value::object(Object::from_pairs(&[kw("legs"), Value::Number(4.0)]).unwrap());
        let child = || {
            let obj = Object::from_pairs(&[kw("breed"), Value::Number(5.0)]).unwrap();
            obj.set_prototype(parent()).unwrap();
            Value::object(obj)
        };
        assert_eq!(child(), child());
        assert_ne!(child(), parent());
    }

    #[test]
    fn test_set_prototype_rejects_scalars() {
        let obj = Object::new();
        assert!(matches!(
            obj.set_prototype(Value::Number(1.0)),
            Err(Error::InvalidPrototype { .. })
        ));
    }
}
