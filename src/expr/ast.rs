//! Syntax tree for parsed WHERE expressions.
//!
//! The parser builds this tree from the token stream; the evaluator walks
//! it against one [`Row`](crate::types::Row) at a time.

/// A parsed WHERE expression.
#[derive(Debug, PartialEq, Clone)]
pub enum Expr {
    /// A literal value.
    Literal(Literal),
    /// A column reference, resolved against the row at evaluation time.
    Column(String),
    /// A single comparison: `left op right`.
    Compare {
        left: Box<Expr>,
        op: CmpOp,
        right: Box<Expr>,
    },
    /// Logical conjunction.
    And(Box<Expr>, Box<Expr>),
    /// Logical disjunction.
    Or(Box<Expr>, Box<Expr>),
}

/// Literal values that can appear in WHERE expressions.
#[derive(Debug, PartialEq, Clone)]
pub enum Literal {
    Number(f64),
    Text(String),
    Null,
}

/// Comparison operators.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    /// Case-sensitive substring containment, not SQL wildcard matching.
    Like,
}
