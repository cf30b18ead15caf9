use std::fmt;

use crate::ast::BinaryOp;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Identifier(String),
    Number(String),
    Plus,
    Minus,
    Multiply,
    Divide,
    LParen,
    RParen,
    Equals,
    Semi,
    Eof,
    Invalid,
}

impl Token {
    /// Classifies a single-character token. Anything that is not one of
    /// `+ - * / = ( ) ;` comes back as `Invalid`.
    pub fn from_symbol(ch: char) -> Token {
        match ch {
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Multiply,
            '/' => Token::Divide,
            '=' => Token::Equals,
            '(' => Token::LParen,
            ')' => Token::RParen,
            ';' => Token::Semi,
            _ => Token::Invalid,
        }
    }

    /// Binding strength as a binary operator. Zero means the token ends an
    /// expression rather than continuing it.
    pub fn precedence(&self) -> u8 {
        BinaryOp::from_token(self).map_or(0, BinaryOp::precedence)
    }

    pub fn is_terminator(&self) -> bool {
        matches!(self, Token::Semi | Token::Eof)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Identifier(name) => write!(f, "identifier `{}`", name),
            Token::Number(text) => write!(f, "number `{}`", text),
            Token::Plus => write!(f, "'+'"),
            Token::Minus => write!(f, "'-'"),
            Token::Multiply => write!(f, "'*'"),
            Token::Divide => write!(f, "'/'"),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
            Token::Equals => write!(f, "'='"),
            Token::Semi => write!(f, "';'"),
            Token::Eof => write!(f, "end of input"),
            Token::Invalid => write!(f, "invalid token"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_symbol() {
        assert_eq!(Token::from_symbol('+'), Token::Plus);
        assert_eq!(Token::from_symbol(';'), Token::Semi);
        assert_eq!(Token::from_symbol('('), Token::LParen);
        assert_eq!(Token::from_symbol('@'), Token::Invalid);
    }

    #[test]
    fn test_precedence_table() {
        assert_eq!(Token::Multiply.precedence(), 2);
        assert_eq!(Token::Divide.precedence(), 2);
        assert_eq!(Token::Plus.precedence(), 1);
        assert_eq!(Token::Minus.precedence(), 1);
        assert_eq!(Token::Equals.precedence(), 0);
        assert_eq!(Token::Semi.precedence(), 0);
        assert_eq!(Token::Number("1".to_string()).precedence(), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Token::Identifier("x".to_string()).to_string(), "identifier `x`");
        assert_eq!(Token::Eof.to_string(), "end of input");
        assert_eq!(Token::Equals.to_string(), "'='");
    }
}
