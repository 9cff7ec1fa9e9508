use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::runtime::Value;

/// Handle to one frame of a lexical scope chain
///
/// Cloning the handle shares the frame: closures keep their defining frame
/// alive and see later mutations made through any other handle to it.
#[derive(Clone, Default)]
pub struct Environment {
    frame: Rc<RefCell<Frame>>,
}

/// Single frame in the chain
#[derive(Default)]
struct Frame {
    /// Variables defined in this frame
    bindings: HashMap<String, Value>,
    /// Enclosing frame (None for the root)
    outer: Option<Environment>,
}

impl Environment {
    /// Creates a root frame with no bindings and no parent
    pub fn new() -> Self {
        Environment::default()
    }

    /// Creates a root frame pre-populated with `bindings`
    pub fn from_bindings(bindings: impl IntoIterator<Item = (String, Value)>) -> Self {
        Environment {
            frame: Rc::new(RefCell::new(Frame {
                bindings: bindings.into_iter().collect(),
                outer: None,
            })),
        }
    }

    /// Returns true if `name` is bound here or in any enclosing frame
    pub fn has(&self, name: &str) -> bool {
        self.owner_of(name).is_some()
    }

    /// Gets the value of the nearest binding of `name`
    pub fn get(&self, name: &str) -> Result<Value> {
        let mut current = self.clone();
        loop {
            let next = {
                let frame = current.frame.borrow();
                if let Some(val) = frame.bindings.get(name) {
                    return Ok(val.clone());
                }
                frame.outer.clone()
            };
            match next {
                Some(outer) => current = outer,
                None => {
                    return Err(Error::UnboundVariable {
                        name: name.to_string(),
                    })
                }
            }
        }
    }

    /// Binds `name` in this frame only
    ///
    /// Enclosing frames are not consulted, so shadowing through a child frame
    /// is fine; binding the same name twice in one frame is not.
    pub fn set(&self, name: impl Into<String>, value: Value) -> Result<()> {
        let name = name.into();
        let mut frame = self.frame.borrow_mut();
        if frame.bindings.contains_key(&name) {
            return Err(Error::Redefinition { name });
        }
        frame.bindings.insert(name, value);
        Ok(())
    }

    /// Overwrites the nearest existing binding of `name`
    ///
    /// Only the frame that owns the binding is written to.
    pub fn update(&self, name: &str, value: Value) -> Result<()> {
        let owner = self.owner_of(name).ok_or_else(|| Error::UnboundVariable {
            name: name.to_string(),
        })?;
        owner
            .frame
            .borrow_mut()
            .bindings
            .insert(name.to_string(), value);
        Ok(())
    }

    /// Creates a child frame binding `params` to `values` positionally
    pub fn extend(&self, params: &[String], values: Vec<Value>) -> Result<Environment> {
        if params.len() != values.len() {
            return Err(Error::arity(
                format!("frame ({})", params.join(" ")),
                params.len(),
                values.len(),
            ));
        }

        let child = Environment {
            frame: Rc::new(RefCell::new(Frame {
                bindings: HashMap::with_capacity(params.len()),
                outer: Some(self.clone()),
            })),
        };
        for (param, value) in params.iter().zip(values) {
            child.set(param.clone(), value)?;
        }
        Ok(child)
    }

    /// Number of frames from this one up to the root (1 for a root frame)
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut current = self.frame.borrow().outer.clone();
        while let Some(env) = current {
            depth += 1;
            current = env.frame.borrow().outer.clone();
        }
        depth
    }

    /// Names bound directly in this frame, sorted
    pub fn local_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.frame.borrow().bindings.keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns true if both handles point at the same frame
    pub fn same_frame(&self, other: &Environment) -> bool {
        Rc::ptr_eq(&self.frame, &other.frame)
    }

    /// Walks outward to the frame that binds `name`
    fn owner_of(&self, name: &str) -> Option<Environment> {
        let mut current = self.clone();
        loop {
            let next = {
                let frame = current.frame.borrow();
                if frame.bindings.contains_key(name) {
                    None
                } else {
                    match &frame.outer {
                        Some(outer) => Some(outer.clone()),
                        None => return None,
                    }
                }
            };
            match next {
                Some(outer) => current = outer,
                None => return Some(current),
            }
        }
    }
}

impl fmt::Debug for Environment {
    // Bindings may hold closures that point back at this frame, so only the
    // shape of the chain is printed.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Environment")
            .field("locals", &self.local_names())
            .field("depth", &self.depth())
            .finish()
    }
}
