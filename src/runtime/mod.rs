//! Runtime: values, environments, objects and the evaluator

mod environment;
mod evaluator;
mod object;
pub mod printer;
mod value;

pub use environment::Environment;
pub use evaluator::{apply, evaluate, execute, Evaluator, Output};
pub use object::Object;
pub use printer::pretty_value;
pub use value::{Closure, Value};
