//! Minimal WHERE expression filter for row selection.
//!
//! The pipeline is lexer -> recursive descent parser -> tree-walking
//! evaluator; the grammar lives at the top of `parser.rs`. Expressions are
//! data all the way down; nothing is ever handed to a host-language
//! evaluator.
//!
//! Filtering is deliberately forgiving: [`Filter::compile`] never fails.
//! An empty expression or one that does not parse produces a pass-all
//! filter (logged at debug level), matching the contract that a bad WHERE
//! clause filters nothing rather than erroring out a whole pipeline.

mod ast;
mod eval;
mod lexer;
mod parser;
mod token;

use crate::types::Row;

use ast::Expr;
use parser::Parser;

/// A compiled row filter.
#[derive(Debug, Clone)]
pub struct Filter {
    expr: Option<Expr>,
}

impl Filter {
    /// Compile `input` into a filter.
    ///
    /// Never fails: blank input and parse errors both yield a filter that
    /// matches every row.
    pub fn compile(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Filter { expr: None };
        }
        match Parser::new(trimmed).parse() {
            Ok(expr) => Filter { expr: Some(expr) },
            Err(err) => {
                log::debug!("WHERE expression {trimmed:?} not usable ({err}); filtering nothing");
                Filter { expr: None }
            }
        }
    }

    /// Returns true when `row` passes the filter.
    pub fn matches(&self, row: &Row) -> bool {
        match &self.expr {
            Some(expr) => eval::eval(expr, row),
            None => true,
        }
    }

    /// Returns true if this filter passes every row (blank or unparseable
    /// source expression).
    pub fn is_pass_all(&self) -> bool {
        self.expr.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Value;

    #[test]
    fn blank_input_compiles_to_pass_all() {
        assert!(Filter::compile("").is_pass_all());
        assert!(Filter::compile("   ").is_pass_all());
    }

    #[test]
    fn parse_failure_falls_back_to_pass_all() {
        let filter = Filter::compile("region = = 'east'");
        assert!(filter.is_pass_all());

        let row = Row::from_iter([("region", Value::Text("west".into()))]);
        assert!(filter.matches(&row));
    }

    #[test]
    fn compiled_filter_selects_rows() {
        let filter = Filter::compile("qty >= 10");
        assert!(!filter.is_pass_all());

        let hit = Row::from_iter([("qty", Value::Number(12.0))]);
        let miss = Row::from_iter([("qty", Value::Number(9.0))]);
        assert!(filter.matches(&hit));
        assert!(!filter.matches(&miss));
    }
}
