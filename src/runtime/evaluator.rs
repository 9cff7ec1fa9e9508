use std::rc::Rc;

use crate::error::{Error, Result};
use crate::parser::{self, Expression, Program, Statement};
use crate::primitives::{make_initial_env, PrimitiveRegistry};
use crate::runtime::{printer, Closure, Environment, Object, Value};

/// Lines produced by `print` statements, in program order
pub type Output = Vec<String>;

/// Evaluates `expr` in `env`
///
/// Applications evaluate the head first and then each argument left to
/// right before dispatching on what the head turned out to be:
/// - closure: parameters bound in a new frame under the captured environment
/// - primitive: arguments handed over as-is
/// - object: the arguments are read as `:key value` pairs of a new object
pub fn evaluate(env: &Environment, expr: &Expression) -> Result<Value> {
    match expr {
        Expression::Variable(name) => env.get(name),

        Expression::NumberLiteral(n) => Ok(Value::Number(*n)),
        Expression::BoolLiteral(b) => Ok(Value::Bool(*b)),
        Expression::NullLiteral => Ok(Value::Null),
        Expression::KeywordLiteral(name) => Ok(Value::keyword(name.as_str())),
        Expression::Value(value) => Ok(value.clone()),

        Expression::Lambda { params, body } => Ok(Value::Closure(Rc::new(Closure {
            params: params.clone(),
            body: body.clone(),
            env: env.clone(),
        }))),

        Expression::Application { head, args } => {
            let callee = evaluate(env, head)?;
            let args = args
                .iter()
                .map(|arg| evaluate(env, arg))
                .collect::<Result<Vec<_>>>()?;
            apply(callee, args)
        }

        Expression::Conditional {
            guard,
            then_expr,
            else_expr,
        } => match evaluate(env, guard)? {
            Value::Bool(true) => evaluate(env, then_expr),
            Value::Bool(false) => evaluate(env, else_expr),
            other => Err(Error::GuardTypeError {
                got: other.to_string(),
            }),
        },
    }
}

/// Applies an already-evaluated callee to already-evaluated arguments
pub fn apply(callee: Value, args: Vec<Value>) -> Result<Value> {
    match callee {
        Value::Closure(closure) => {
            if closure.params.len() != args.len() {
                return Err(Error::arity(
                    Value::Closure(closure.clone()).to_string(),
                    closure.params.len(),
                    args.len(),
                ));
            }
            tracing::trace!(params = ?closure.params, "calling closure");
            let frame = closure.env.extend(&closure.params, args)?;
            evaluate(&frame, &closure.body)
        }
        Value::Primitive(prim) => {
            tracing::trace!(primitive = prim.name(), argc = args.len(), "calling primitive");
            prim.call(&args)
        }
        Value::Object(_) => Ok(Value::object(Object::from_pairs(&args)?)),
        other => Err(Error::NotCallable {
            value: other.to_string(),
        }),
    }
}

/// Runs `program` statement by statement against `env`
///
/// The first failing statement aborts the rest of the program; its error is
/// returned and any output collected so far is dropped.
pub fn execute(env: &Environment, program: &Program) -> Result<Output> {
    let mut output = Output::new();

    for statement in &program.statements {
        match statement {
            Statement::Define { name, value } => {
                let val = evaluate(env, value)?;
                tracing::debug!(name = name.as_str(), "define");
                env.set(name.as_str(), val)?;
            }
            Statement::Print(expr) => {
                let line = printer::pretty_value(&evaluate(env, expr)?);
                tracing::debug!(line = line.as_str(), "print");
                output.push(line);
            }
        }
    }

    Ok(output)
}

/// Evaluator holding one top-level environment across calls
///
/// Definitions made by one `execute` call stay visible to the next.
pub struct Evaluator {
    env: Environment,
}

impl Evaluator {
    /// Creates an evaluator over the standard primitive table
    pub fn new() -> Self {
        Evaluator {
            env: make_initial_env(),
        }
    }

    /// Creates an evaluator whose root frame holds `registry`'s primitives
    pub fn with_registry(registry: PrimitiveRegistry) -> Self {
        Evaluator {
            env: registry.root_environment(),
        }
    }

    /// Top-level environment
    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Evaluates one expression at top level
    pub fn evaluate(&self, expr: &Expression) -> Result<Value> {
        evaluate(&self.env, expr)
    }

    /// Executes a program at top level
    pub fn execute(&self, program: &Program) -> Result<Output> {
        execute(&self.env, program)
    }

    /// Reads `source` as a program and executes it
    pub fn run(&self, source: &str) -> Result<Output> {
        let program = parser::parse_program(source)?;
        self.execute(&program)
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::arithmetic;

    fn eval_str(source: &str) -> Result<Value> {
        let expr = parser::parse_expression(source)?;
        evaluate(&make_initial_env(), &expr)
    }

    fn run_str(source: &str) -> Result<Output> {
        Evaluator::new().run(source)
    }

    #[test]
    fn test_literals_self_evaluate() {
        assert_eq!(eval_str("42").unwrap(), Value::Number(42.0));
        assert_eq!(eval_str("true").unwrap(), Value::Bool(true));
        assert_eq!(eval_str("null").unwrap(), Value::Null);
        assert_eq!(eval_str(":legs").unwrap(), Value::keyword("legs"));
    }

    #[test]
    fn test_value_wrapper() {
        let env = Environment::new();
        let expr = Expression::Value(Value::keyword("done"));
        assert_eq!(evaluate(&env, &expr).unwrap(), Value::keyword("done"));
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(eval_str("(+ 2 3)").unwrap(), Value::Number(5.0));
        assert_eq!(eval_str("(* (- 10 4) (/ 1 2))").unwrap(), Value::Number(3.0));
    }

    #[test]
    fn test_lambda_application() {
        let result = eval_str("((lambda (x y) (- x y)) 10 4)").unwrap();
        assert_eq!(result, Value::Number(6.0));
    }

    #[test]
    fn test_closure_arity_mismatch() {
        let err = eval_str("((lambda (x y) x) 1)").unwrap_err();
        assert_eq!(err, Error::arity("<closure (x y)>", 2, 1));
    }

    #[test]
    fn test_conditional_evaluates_one_branch() {
        // The untaken branch would fail on an unbound variable
        assert_eq!(
            eval_str("(if (zero? 0) 1 missing)").unwrap(),
            Value::Number(1.0)
        );
        assert_eq!(
            eval_str("(if false missing 2)").unwrap(),
            Value::Number(2.0)
        );
    }

    #[test]
    fn test_guard_must_be_boolean() {
        let err = eval_str("(if 0 1 2)").unwrap_err();
        assert_eq!(
            err,
            Error::GuardTypeError {
                got: "0".to_string()
            }
        );
    }

    #[test]
    fn test_number_is_not_callable() {
        let err = eval_str("(5 1 2)").unwrap_err();
        assert_eq!(
            err,
            Error::NotCallable {
                value: "5".to_string()
            }
        );
    }

    #[test]
    fn test_object_in_head_position_builds_object() {
        let result = eval_str("((obj) :a 1 :b (obj))").unwrap();
        let obj = result.as_object().unwrap();
        assert_eq!(obj.own_field("a"), Some(Value::Number(1.0)));
        // Inline construction does not restrict field values
        assert!(matches!(obj.own_field("b"), Some(Value::Object(_))));
        assert_eq!(obj.prototype(), Value::Null);
    }

    #[test]
    fn test_object_in_head_position_checks_pairs() {
        assert_eq!(
            eval_str("((obj) :a)").unwrap_err(),
            Error::OddObjectArguments { count: 1 }
        );
        assert!(matches!(
            eval_str("((obj) 1 2)").unwrap_err(),
            Error::KeyTypeError { .. }
        ));
    }

    #[test]
    fn test_head_evaluated_before_arguments() {
        let err = eval_str("(nope (undefined-arg))").unwrap_err();
        assert_eq!(
            err,
            Error::UnboundVariable {
                name: "nope".to_string()
            }
        );
    }

    #[test]
    fn test_define_then_print() {
        assert_eq!(run_str("(define x 5) (print x)").unwrap(), vec!["5"]);
        assert_eq!(run_str("(print (+ 2 3))").unwrap(), vec!["5"]);
    }

    #[test]
    fn test_redefinition_aborts_program() {
        let err = run_str("(define x 1) (define x 2) (print x)").unwrap_err();
        assert_eq!(
            err,
            Error::Redefinition {
                name: "x".to_string()
            }
        );
    }

    #[test]
    fn test_parameter_shadows_outer_binding() {
        let output = run_str(
            "(define x 1)
             (define f (lambda (x) (* x 10)))
             (print (f 7))
             (print x)",
        )
        .unwrap();
        assert_eq!(output, vec!["70", "1"]);
    }

    #[test]
    fn test_closure_sees_later_definitions() {
        let output = run_str(
            "(define f (lambda () later))
             (define later :ready)
             (print (f))",
        )
        .unwrap();
        assert_eq!(output, vec![":ready"]);
    }

    #[test]
    fn test_closure_sees_update() {
        let evaluator = Evaluator::new();
        evaluator.run("(define n 1) (define get-n (lambda () n))").unwrap();
        evaluator.env().update("n", Value::Number(9.0)).unwrap();
        assert_eq!(evaluator.run("(print (get-n))").unwrap(), vec!["9"]);
    }

    #[test]
    fn test_recursion_through_top_level_binding() {
        let output = run_str(
            "(define count-down
               (lambda (n) (if (zero? n) :done (count-down (- n 1)))))
             (print (count-down 10))",
        )
        .unwrap();
        assert_eq!(output, vec![":done"]);
    }

    #[test]
    fn test_definitions_persist_across_runs() {
        let evaluator = Evaluator::new();
        assert!(evaluator.run("(define y 3)").unwrap().is_empty());
        assert_eq!(evaluator.run("(print (* y y))").unwrap(), vec!["9"]);
    }

    #[test]
    fn test_custom_registry() {
        let mut registry = PrimitiveRegistry::empty();
        arithmetic::register(&mut registry);
        let evaluator = Evaluator::with_registry(registry);

        assert_eq!(evaluator.run("(print (+ 1 1))").unwrap(), vec!["2"]);
        assert!(matches!(
            evaluator.run("(print (obj))"),
            Err(Error::UnboundVariable { .. })
        ));
    }

    #[test]
    fn test_printing_functions() {
        let output = run_str("(print (lambda (a b) a)) (print +)").unwrap();
        assert_eq!(output, vec!["<closure (a b)>", "<primitive +>"]);
    }
}
