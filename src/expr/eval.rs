//! Evaluates a parsed WHERE expression against one row at a time.
//!
//! Evaluation is total: there is no error path. Column references that the
//! row does not carry resolve to `Null`, and comparisons involving missing
//! values are simply false (except `= NULL` / `<> NULL` checks). When both
//! sides of an ordering comparison have a numeric reading the comparison is
//! numeric, otherwise it falls back to lexicographic text order.

use std::cmp::Ordering;

use crate::expr::ast::{CmpOp, Expr, Literal};
use crate::types::{Row, Value};

/// Returns true when `row` satisfies `expr`.
pub fn eval(expr: &Expr, row: &Row) -> bool {
    match expr {
        Expr::And(left, right) => eval(left, row) && eval(right, row),
        Expr::Or(left, right) => eval(left, row) || eval(right, row),
        Expr::Compare { left, op, right } => {
            compare(*op, &resolve(left, row), &resolve(right, row))
        }
        other => is_truthy(&resolve(other, row)),
    }
}

/// Resolves an operand to a concrete value for this row.
///
/// A parenthesized sub-expression used as an operand resolves to the
/// boolean it evaluates to.
fn resolve(expr: &Expr, row: &Row) -> Value {
    match expr {
        Expr::Literal(Literal::Number(n)) => Value::Number(*n),
        Expr::Literal(Literal::Text(s)) => Value::Text(s.clone()),
        Expr::Literal(Literal::Null) => Value::Null,
        Expr::Column(name) => row.get(name).cloned().unwrap_or(Value::Null),
        nested => Value::Bool(eval(nested, row)),
    }
}

fn compare(op: CmpOp, left: &Value, right: &Value) -> bool {
    match op {
        CmpOp::Eq => values_equal(left, right),
        CmpOp::Ne => !values_equal(left, right),
        CmpOp::Lt => matches!(ordering(left, right), Some(Ordering::Less)),
        CmpOp::Gt => matches!(ordering(left, right), Some(Ordering::Greater)),
        CmpOp::Le => matches!(
            ordering(left, right),
            Some(Ordering::Less | Ordering::Equal)
        ),
        CmpOp::Ge => matches!(
            ordering(left, right),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        CmpOp::Like => left.text_form().contains(right.text_form().as_ref()),
    }
}

/// Equality with missing-value coalescing: `NULL`, absent columns, and
/// blank text all compare equal to each other and unequal to anything else.
fn values_equal(left: &Value, right: &Value) -> bool {
    if left.is_missing() || right.is_missing() {
        return left.is_missing() && right.is_missing();
    }
    match (left.as_number(), right.as_number()) {
        (Some(a), Some(b)) => a == b,
        _ => left.text_form() == right.text_form(),
    }
}

/// Ordering for `<`/`>`/`<=`/`>=`. Missing values order against nothing.
fn ordering(left: &Value, right: &Value) -> Option<Ordering> {
    if left.is_missing() || right.is_missing() {
        return None;
    }
    match (left.as_number(), right.as_number()) {
        (Some(a), Some(b)) => a.partial_cmp(&b),
        _ => Some(left.text_form().cmp(&right.text_form())),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => *n != 0.0,
        Value::Text(t) => !t.is_empty(),
    }
}
