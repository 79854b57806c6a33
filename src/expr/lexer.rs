//! Scans a raw WHERE expression and produces a stream of [`Token`]s.
//!
//! Handles whitespace skipping, numeric literals (including a leading `-`),
//! string literals in single or double quotes, and the multi-character
//! operators `<=`, `>=`, and `<>`. Keywords (`AND`, `OR`, `LIKE`, `NULL`)
//! are matched case-insensitively; identifiers keep their original case
//! because column names are case-sensitive. Identifiers may contain
//! letters, digits, `_`, `.`, and `:` so that prefixed join output columns
//! like `orders:total` can be referenced directly.

use std::iter::Peekable;
use std::str::Chars;

use crate::expr::token::Token;

pub struct Lexer<'a> {
    input: Peekable<Chars<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input: input.chars().peekable(),
        }
    }

    /// Advances the lexer and returns the next token.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        match self.input.next() {
            Some('(') => Token::LParen,
            Some(')') => Token::RParen,
            Some('=') => Token::Equals,

            // Handle < and potentially <= or <>
            Some('<') => self.read_less_than_operator(),

            // Handle > and potentially >=
            Some('>') => self.read_greater_than_operator(),

            // Handle both quote styles for string literals
            Some(quote @ ('\'' | '"')) => self.read_string(quote),

            // Numbers start with a digit, a dot, or a minus sign
            Some(ch) if ch.is_ascii_digit() || ch == '.' || ch == '-' => self.read_number(ch),

            // Identifiers and keywords
            Some(ch) if is_ident_start(ch) => self.read_identifier(ch),

            // End of input
            None => Token::Eof,

            // Unknown character
            Some(ch) => Token::Illegal(ch),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(&ch) = self.input.peek() {
            if !ch.is_whitespace() {
                break;
            }
            self.input.next();
        }
    }

    /// Handles operators starting with '<': <, <=, <>
    fn read_less_than_operator(&mut self) -> Token {
        match self.input.peek() {
            Some('=') => {
                self.input.next();
                Token::LessEqual
            }
            Some('>') => {
                self.input.next();
                Token::NotEqual
            }
            _ => Token::LessThan,
        }
    }

    /// Handles operators starting with '>': >, >=
    fn read_greater_than_operator(&mut self) -> Token {
        match self.input.peek() {
            Some('=') => {
                self.input.next();
                Token::GreaterEqual
            }
            _ => Token::GreaterThan,
        }
    }

    fn read_string(&mut self, quote: char) -> Token {
        let mut result = String::new();
        while let Some(&ch) = self.input.peek() {
            if ch == quote {
                self.input.next(); // Consume the closing quote
                return Token::Text(result);
            }
            result.push(ch);
            self.input.next();
        }
        // Unterminated literal: return what we have.
        Token::Text(result)
    }

    fn read_number(&mut self, first_char: char) -> Token {
        let mut number_str = String::from(first_char);
        let mut has_dot = first_char == '.';

        while let Some(&ch) = self.input.peek() {
            if ch.is_ascii_digit() {
                number_str.push(ch);
                self.input.next();
            } else if ch == '.' && !has_dot {
                has_dot = true;
                number_str.push(ch);
                self.input.next();
            } else {
                break;
            }
        }

        if let Ok(n) = number_str.parse::<f64>() {
            Token::Number(n)
        } else {
            // A bare "-" or "." with no digits.
            Token::Illegal(first_char)
        }
    }

    fn read_identifier(&mut self, first_char: char) -> Token {
        let mut ident = String::from(first_char);

        while let Some(&ch) = self.input.peek() {
            if is_ident_start(ch) || ch.is_ascii_digit() || ch == '.' || ch == ':' {
                ident.push(ch);
                self.input.next();
            } else {
                break;
            }
        }

        match ident.to_ascii_uppercase().as_str() {
            "AND" => Token::And,
            "OR" => Token::Or,
            "LIKE" => Token::Like,
            "NULL" => Token::Null,
            _ => Token::Identifier(ident),
        }
    }
}

/// Returns true if `ch` can start an identifier.
fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}
