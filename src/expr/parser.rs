//! Recursive descent parser that converts a stream of tokens into an [`Expr`].
//!
//! GRAMMAR:
//!   expression --> or
//!   or         --> and ( OR and )*
//!   and        --> comparison ( AND comparison )*
//!   comparison --> primary ( ("=" | "<>" | "<" | ">" | "<=" | ">=" | LIKE) primary )?
//!   primary    --> NUMBER | STRING | NULL | IDENTIFIER | "(" expression ")"
//!
//! Comparisons deliberately do not chain: `a = b = c` is a parse error, not
//! a comparison of a boolean against `c`.

use crate::expr::ast::{CmpOp, Expr, Literal};
use crate::expr::lexer::Lexer;
use crate::expr::token::Token;

/// Parser errors with descriptive messages.
#[derive(Debug, PartialEq, Clone)]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        ParseError {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "parse error: {}", self.message)
    }
}

impl std::error::Error for ParseError {}

pub type ParseResult<T> = Result<T, ParseError>;

/// Holds the lexer and the current lookahead token.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current_token: Token,
}

impl<'a> Parser<'a> {
    /// Creates a new parser and advances to the first token.
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer::new(input);
        let current_token = lexer.next_token();
        Parser {
            lexer,
            current_token,
        }
    }

    /// Parses the entire input and returns the expression tree.
    pub fn parse(&mut self) -> ParseResult<Expr> {
        if self.current_token == Token::Eof {
            return Err(ParseError::new("empty expression"));
        }

        let expr = self.parse_or()?;

        if self.current_token != Token::Eof {
            return Err(ParseError::new(format!(
                "unexpected {} after expression",
                self.current_token
            )));
        }

        Ok(expr)
    }

    /// Advances to the next token.
    fn advance(&mut self) {
        self.current_token = self.lexer.next_token();
    }

    /// Parses OR chains (lowest precedence).
    fn parse_or(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_and()?;

        while self.current_token == Token::Or {
            self.advance();
            let right = self.parse_and()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }

        Ok(left)
    }

    /// Parses AND chains.
    fn parse_and(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_comparison()?;

        while self.current_token == Token::And {
            self.advance();
            let right = self.parse_comparison()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }

        Ok(left)
    }

    /// Parses at most one comparison operator between two primaries.
    fn parse_comparison(&mut self) -> ParseResult<Expr> {
        let left = self.parse_primary()?;

        let op = match &self.current_token {
            Token::Equals => CmpOp::Eq,
            Token::NotEqual => CmpOp::Ne,
            Token::LessThan => CmpOp::Lt,
            Token::GreaterThan => CmpOp::Gt,
            Token::LessEqual => CmpOp::Le,
            Token::GreaterEqual => CmpOp::Ge,
            Token::Like => CmpOp::Like,
            _ => return Ok(left),
        };

        self.advance();
        let right = self.parse_primary()?;

        Ok(Expr::Compare {
            left: Box::new(left),
            op,
            right: Box::new(right),
        })
    }

    /// Parses literals, column references, and parenthesized expressions.
    fn parse_primary(&mut self) -> ParseResult<Expr> {
        match self.current_token.clone() {
            Token::Number(n) => {
                self.advance();
                Ok(Expr::Literal(Literal::Number(n)))
            }
            Token::Text(s) => {
                self.advance();
                Ok(Expr::Literal(Literal::Text(s)))
            }
            Token::Null => {
                self.advance();
                Ok(Expr::Literal(Literal::Null))
            }
            Token::Identifier(name) => {
                self.advance();
                Ok(Expr::Column(name))
            }
            Token::LParen => {
                self.advance();
                let expr = self.parse_or()?;
                if self.current_token != Token::RParen {
                    return Err(ParseError::new(format!(
                        "expected ), found {}",
                        self.current_token
                    )));
                }
                self.advance();
                Ok(expr)
            }
            other => Err(ParseError::new(format!(
                "expected a value or column, found {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> ParseResult<Expr> {
        Parser::new(input).parse()
    }

    fn column(name: &str) -> Box<Expr> {
        Box::new(Expr::Column(name.into()))
    }

    fn number(n: f64) -> Box<Expr> {
        Box::new(Expr::Literal(Literal::Number(n)))
    }

    #[test]
    fn parses_a_single_comparison() {
        let expr = parse("amount >= 10").unwrap();
        assert_eq!(
            expr,
            Expr::Compare {
                left: column("amount"),
                op: CmpOp::Ge,
                right: number(10.0),
            }
        );
    }

    #[test]
    fn and_binds_tighter_than_or() {
        let expr = parse("a = 1 OR b = 2 AND c = 3").unwrap();
        let a = Expr::Compare {
            left: column("a"),
            op: CmpOp::Eq,
            right: number(1.0),
        };
        let b = Expr::Compare {
            left: column("b"),
            op: CmpOp::Eq,
            right: number(2.0),
        };
        let c = Expr::Compare {
            left: column("c"),
            op: CmpOp::Eq,
            right: number(3.0),
        };
        assert_eq!(
            expr,
            Expr::Or(Box::new(a), Box::new(Expr::And(Box::new(b), Box::new(c))))
        );
    }

    #[test]
    fn parentheses_override_precedence() {
        let expr = parse("(a = 1 OR b = 2) AND c = 3").unwrap();
        match expr {
            Expr::And(left, _) => assert!(matches!(*left, Expr::Or(_, _))),
            other => panic!("expected AND at the root, got {:?}", other),
        }
    }

    #[test]
    fn like_and_null_literals_parse() {
        let expr = parse("name LIKE 'ar' AND note <> NULL").unwrap();
        assert_eq!(
            expr,
            Expr::And(
                Box::new(Expr::Compare {
                    left: column("name"),
                    op: CmpOp::Like,
                    right: Box::new(Expr::Literal(Literal::Text("ar".into()))),
                }),
                Box::new(Expr::Compare {
                    left: column("note"),
                    op: CmpOp::Ne,
                    right: Box::new(Expr::Literal(Literal::Null)),
                }),
            )
        );
    }

    #[test]
    fn rejects_empty_input() {
        assert!(parse("").is_err());
        assert!(parse("   ").is_err());
    }

    #[test]
    fn rejects_chained_comparisons() {
        assert!(parse("a = b = c").is_err());
    }

    #[test]
    fn rejects_trailing_tokens_and_unbalanced_parens() {
        assert!(parse("a = 1 b").is_err());
        assert!(parse("(a = 1").is_err());
        assert!(parse("a = 1 AND").is_err());
    }
}
