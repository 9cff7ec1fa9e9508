/// End-to-end integration tests
/// Demonstrates: Lexer → Parser → Evaluator working together
use protolisp::lexer::SExprScanner;
use protolisp::parser::SExprParser;
use protolisp::runtime::{Evaluator, Output};
use protolisp::{Error, ErrorCategory};

fn run_source(source: &str) -> protolisp::Result<Output> {
    let mut scanner = SExprScanner::new(source);
    let tokens = scanner.scan_tokens()?;
    let mut parser = SExprParser::new(tokens);
    let program = parser.parse()?;
    let evaluator = Evaluator::new();
    evaluator.execute(&program)
}

#[test]
fn test_e2e_define_and_print() {
    let source = r#"
        (define x 5)
        (print x)
    "#;

    assert_eq!(run_source(source).unwrap(), vec!["5"]);
}

#[test]
fn test_e2e_arithmetic() {
    let output = run_source(
        r#"
        (print (+ 2 3))
        (print (/ 5 2))
        (print (- 0 7))
        (print (/ 1 0))
        "#,
    )
    .unwrap();

    assert_eq!(output, vec!["5", "2.5", "-7", "Infinity"]);
}

#[test]
fn test_e2e_closures_capture_environment() {
    let source = r#"
        (define make-adder (lambda (n) (lambda (x) (+ x n))))
        (define add5 (make-adder 5))
        (define add10 (make-adder 10))
        (print (add5 1))
        (print (add10 1))
    "#;

    assert_eq!(run_source(source).unwrap(), vec!["6", "11"]);
}

#[test]
fn test_e2e_recursive_factorial() {
    let source = r#"
        ; factorial through a top-level binding
        (define fact
          (lambda (n)
            (if (zero? n)
                1
                (* n (fact (- n 1))))))
        (print (fact 10))
    "#;

    assert_eq!(run_source(source).unwrap(), vec!["3628800"]);
}

#[test]
fn test_e2e_german_aliases() {
    let source = r#"
        (definieren x 2)
        (druck (ob (zero? x) :null :nonzero))
    "#;

    assert_eq!(run_source(source).unwrap(), vec![":nonzero"]);
}

#[test]
fn test_e2e_redefinition_is_fatal() {
    let err = run_source("(define x 1) (print x) (define x 2)").unwrap_err();
    assert_eq!(
        err,
        Error::Redefinition {
            name: "x".to_string()
        }
    );
}

#[test]
fn test_e2e_shadowing_leaves_outer_binding() {
    let source = r#"
        (define x :outer)
        (define show (lambda (x) x))
        (print (show :inner))
        (print x)
    "#;

    assert_eq!(run_source(source).unwrap(), vec![":inner", ":outer"]);
}

#[test]
fn test_e2e_closure_arity_mismatch() {
    let err = run_source("(define f (lambda (x y) x)) (print (f 1))").unwrap_err();
    match err {
        Error::ArityMismatch {
            callee,
            expected,
            got,
        } => {
            assert_eq!(callee, "<closure (x y)>");
            assert_eq!(expected, 2);
            assert_eq!(got, 1);
        }
        other => panic!("expected arity mismatch, got {:?}", other),
    }
}

#[test]
fn test_e2e_number_not_callable() {
    let err = run_source("(define n 3) (print (n 1))").unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Type);
    assert!(matches!(err, Error::NotCallable { ref value } if value == "3"));
}

#[test]
fn test_e2e_unbound_variable() {
    let err = run_source("(print y)").unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Unbound);
}

#[test]
fn test_e2e_guard_must_be_boolean() {
    let err = run_source("(print (if null 1 2))").unwrap_err();
    assert_eq!(
        err,
        Error::GuardTypeError {
            got: "null".to_string()
        }
    );
}

#[test]
fn test_e2e_primitive_type_error_names_position() {
    let err = run_source("(print (+ 1 :two))").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Type error in +: expected number at position 2, got :two"
    );
}

#[test]
fn test_e2e_top_level_expression_rejected() {
    let err = run_source("(define x 1) (+ x 1)").unwrap_err();
    assert_eq!(
        err,
        Error::NotAStatement {
            form: "(+ x 1)".to_string()
        }
    );
}

#[test]
fn test_e2e_error_aborts_remaining_statements() {
    let evaluator = Evaluator::new();
    assert!(evaluator.run("(define a 1) (print missing) (define b 2)").is_err());
    assert!(evaluator.env().has("a"));
    assert!(!evaluator.env().has("b"));
}

#[test]
fn test_e2e_run_helper() {
    assert_eq!(protolisp::run("(print (* 6 7))").unwrap(), vec!["42"]);
}

#[test]
fn test_e2e_large_and_small_magnitudes() {
    let output = run_source(
        r#"
        (print (* 1000000000000 1000000000000))
        (print (/ 1 10000000))
        (print (/ 1 1000000))
        "#,
    )
    .unwrap();

    assert_eq!(output, vec!["1e+24", "1e-7", "0.000001"]);
}

#[test]
fn test_e2e_detached_keyword_name_rejected() {
    let err = run_source("(define d (obj : woof 1))").unwrap_err();
    assert!(matches!(err, Error::SyntaxError { line: 1, col: 18, .. }));
}
