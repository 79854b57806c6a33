//! Token definitions for the WHERE expression lexer.

/// Tokens recognized by the WHERE expression lexer.
#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    // Literals
    Number(f64),
    /// String literal, quoted with `'` or `"` in the source.
    Text(String),
    /// Column name. Case is preserved; only keywords are case-insensitive.
    Identifier(String),

    // Keywords
    And,
    Or,
    Like,
    Null,

    // Operators
    Equals,
    NotEqual,
    LessThan,
    GreaterThan,
    LessEqual,
    GreaterEqual,

    // Delimiters
    LParen,
    RParen,

    // Special
    Eof,
    Illegal(char),
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::Text(s) => write!(f, "'{}'", s),
            Token::Identifier(s) => write!(f, "{}", s),
            Token::And => write!(f, "AND"),
            Token::Or => write!(f, "OR"),
            Token::Like => write!(f, "LIKE"),
            Token::Null => write!(f, "NULL"),
            Token::Equals => write!(f, "="),
            Token::NotEqual => write!(f, "<>"),
            Token::LessThan => write!(f, "<"),
            Token::GreaterThan => write!(f, ">"),
            Token::LessEqual => write!(f, "<="),
            Token::GreaterEqual => write!(f, ">="),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Eof => write!(f, "end of input"),
            Token::Illegal(c) => write!(f, "illegal character '{}'", c),
        }
    }
}
