//! Canonical rendering of values and expressions
//!
//! `pretty_value` is what `print` statements emit, so its output format is
//! part of the language's observable behavior.

use std::collections::HashSet;
use std::rc::Rc;

use crate::parser::Expression;
use crate::runtime::{Object, Value};

/// Renders a value the way `print` shows it
///
/// Objects render as `(obj :k1 v1 :k2 v2 proto:<prototype>)` with keys in
/// sorted order and `proto:null` at the end of the chain.
pub fn pretty_value(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value, &mut HashSet::new());
    out
}

/// Renders an expression back into surface syntax
pub fn pretty_expression(expr: &Expression) -> String {
    match expr {
        Expression::Variable(name) => name.clone(),
        Expression::NumberLiteral(n) => format_number(*n),
        Expression::BoolLiteral(b) => b.to_string(),
        Expression::NullLiteral => "null".to_string(),
        Expression::KeywordLiteral(name) => format!(":{}", name),
        Expression::Lambda { params, body } => {
            format!("(lambda ({}) {})", params.join(" "), pretty_expression(body))
        }
        Expression::Application { head, args } => {
            let mut parts = vec![pretty_expression(head)];
            parts.extend(args.iter().map(pretty_expression));
            format!("({})", parts.join(" "))
        }
        Expression::Conditional {
            guard,
            then_expr,
            else_expr,
        } => format!(
            "(if {} {} {})",
            pretty_expression(guard),
            pretty_expression(then_expr),
            pretty_expression(else_expr)
        ),
        Expression::Value(value) => pretty_value(value),
    }
}

/// Formats a number the way a JavaScript-style host prints doubles
///
/// Integral values have no fractional part and `-0` prints as `0`. The
/// shortest round-trip digits are written out in positional notation when
/// the decimal exponent lies in `-7 < e < 21`, and as `1.5e+21` / `1e-7`
/// otherwise.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }

    // `{:e}` yields the shortest round-trip digits, e.g. "-1.25e-7"
    let scientific = format!("{:e}", n.abs());
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let exponent: i32 = exponent.parse().unwrap_or(0);

    let sign = if n < 0.0 { "-" } else { "" };
    let count = digits.len() as i32;
    // Position of the decimal point relative to the first digit
    let point = exponent + 1;

    let body = if count <= point && point <= 21 {
        format!("{}{}", digits, "0".repeat((point - count) as usize))
    } else if 0 < point && point <= 21 {
        let (int, frac) = digits.split_at(point as usize);
        format!("{}.{}", int, frac)
    } else if -6 < point && point <= 0 {
        format!("0.{}{}", "0".repeat((-point) as usize), digits)
    } else {
        let exp_sign = if exponent < 0 { '-' } else { '+' };
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{}e{}{}", first, exp_sign, exponent.abs())
        } else {
            format!("{}.{}e{}{}", first, rest, exp_sign, exponent.abs())
        }
    };

    format!("{}{}", sign, body)
}

fn write_value(out: &mut String, value: &Value, seen: &mut HashSet<*const Object>) {
    match value {
        Value::Number(n) => out.push_str(&format_number(*n)),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Null => out.push_str("null"),
        Value::Keyword(name) => {
            out.push(':');
            out.push_str(name);
        }
        Value::Closure(closure) => {
            out.push_str(&format!("<closure ({})>", closure.params.join(" ")));
        }
        Value::Primitive(prim) => {
            out.push_str(&format!("<primitive {}>", prim.name()));
        }
        Value::Object(obj) => write_object(out, obj, seen),
    }
}

fn write_object(out: &mut String, obj: &Rc<Object>, seen: &mut HashSet<*const Object>) {
    let ptr = Rc::as_ptr(obj);
    if !seen.insert(ptr) {
        out.push_str("<cycle>");
        return;
    }

    out.push_str("(obj");
    for (key, val) in obj.fields() {
        out.push_str(" :");
        out.push_str(&key);
        out.push(' ');
        write_value(out, &val, seen);
    }
    out.push_str(" proto:");
    write_value(out, &obj.prototype(), seen);
    out.push(')');

    seen.remove(&ptr);
}
