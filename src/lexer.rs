use std::io::BufRead;

use tracing::{error, trace};

use crate::error::{Diagnostic, Diagnostics};
use crate::token::Token;

pub struct Lexer<I: Iterator<Item = char>> {
    chars: I,
    current_char: Option<char>,
    peeked: Option<Token>,
}

impl Lexer<std::vec::IntoIter<char>> {
    pub fn new(text: &str) -> Self {
        Lexer::from_chars(text.chars().collect::<Vec<_>>())
    }
}

impl<I: Iterator<Item = char>> Lexer<I> {
    /// Builds a lexer over any character stream. Reading is lazy: the
    /// stream is only pulled when a token is requested.
    pub fn from_chars<S>(source: S) -> Self
    where
        S: IntoIterator<Item = char, IntoIter = I>,
    {
        let mut chars = source.into_iter();
        let current_char = chars.next();
        Lexer {
            chars,
            current_char,
            peeked: None,
        }
    }

    fn advance(&mut self) {
        self.current_char = self.chars.next();
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn number(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char {
            if ch.is_ascii_digit() {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char {
            if ch.is_ascii_alphanumeric() {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn scan(&mut self, diagnostics: &mut Diagnostics) -> Token {
        while let Some(ch) = self.current_char {
            if ch.is_whitespace() {
                self.skip_whitespace();
                continue;
            }

            if ch.is_ascii_alphabetic() {
                return Token::Identifier(self.identifier());
            }

            if ch.is_ascii_digit() {
                return Token::Number(self.number());
            }

            self.advance();
            match Token::from_symbol(ch) {
                Token::Invalid => diagnostics.report(Diagnostic::UnrecognizedCharacter(ch)),
                token => return token,
            }
        }

        Token::Eof
    }

    /// Returns the token the next call to `next_token` will hand out,
    /// without consuming it.
    pub fn peek_token(&mut self, diagnostics: &mut Diagnostics) -> &Token {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.scan(diagnostics),
        };
        self.peeked.insert(token)
    }

    /// Drops the token buffered by `peek_token`.
    pub fn consume(&mut self) {
        if let Some(token) = self.peeked.take() {
            trace!(%token, "token consumed");
        }
    }

    pub fn next_token(&mut self, diagnostics: &mut Diagnostics) -> Token {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.scan(diagnostics),
        };
        trace!(%token, "token consumed");
        token
    }
}

/// Converts the text of a number token. Anything but a run of decimal
/// digits is reported and replaced by -1.
pub fn to_number(text: &str, diagnostics: &mut Diagnostics) -> f64 {
    let plain = !text.is_empty() && text.chars().all(|ch| ch.is_ascii_digit());
    match text.parse::<f64>() {
        Ok(value) if plain => value,
        _ => {
            diagnostics.report(Diagnostic::InvalidNumber(text.to_string()));
            -1.0
        }
    }
}

/// Adapts a blocking reader (stdin, a file) into a character stream, one
/// line at a time. Bytes that are not valid UTF-8 come through as U+FFFD,
/// which the lexer reports like any other stray character. An I/O error
/// ends the stream.
pub struct CharReader<R: BufRead> {
    reader: R,
    line: Vec<char>,
    pos: usize,
}

impl<R: BufRead> CharReader<R> {
    pub fn new(reader: R) -> Self {
        CharReader {
            reader,
            line: Vec::new(),
            pos: 0,
        }
    }
}

impl<R: BufRead> Iterator for CharReader<R> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        while self.pos >= self.line.len() {
            let mut buffer = Vec::new();
            match self.reader.read_until(b'\n', &mut buffer) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line = String::from_utf8_lossy(&buffer).chars().collect();
                    self.pos = 0;
                }
                Err(err) => {
                    error!(error = %err, "failed to read input, treating as end of input");
                    return None;
                }
            }
        }
        let ch = self.line[self.pos];
        self.pos += 1;
        Some(ch)
    }
}
