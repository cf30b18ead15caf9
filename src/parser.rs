use tracing::debug;

use crate::ast::{Assignment, BinaryOp, Expr, UnaryOp};
use crate::error::{Diagnostic, Diagnostics};
use crate::lexer::{Lexer, to_number};
use crate::token::Token;

/// Input ran out where an operand was expected. Unwinds the expression
/// being built; `parse_expression` turns it into the -1 sentinel.
struct EndOfInput;

pub struct Parser<I: Iterator<Item = char>> {
    lexer: Lexer<I>,
    diagnostics: Diagnostics,
}

impl<I: Iterator<Item = char>> Parser<I> {
    pub fn new(lexer: Lexer<I>) -> Self {
        Parser {
            lexer,
            diagnostics: Diagnostics::new(),
        }
    }

    fn peek(&mut self) -> &Token {
        self.lexer.peek_token(&mut self.diagnostics)
    }

    fn advance(&mut self) -> Token {
        self.lexer.next_token(&mut self.diagnostics)
    }

    /// Lexical and syntax diagnostics reported since the last call, in the
    /// order they happened.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.diagnostics.take()
    }

    /// Parses `name = expression ;`. Returns `None` once the input ends
    /// where a statement should start.
    pub fn parse_statement(&mut self) -> Option<Assignment> {
        loop {
            let target = match self.advance() {
                Token::Eof => return None,
                Token::Identifier(name) => name,
                found => {
                    self.expected("identifier", found);
                    continue;
                }
            };

            match self.advance() {
                Token::Equals => {}
                Token::Eof => {
                    self.diagnostics.report(Diagnostic::ExpectedToken {
                        expected: "'='",
                        found: Token::Eof,
                    });
                    return None;
                }
                found => {
                    self.expected("'='", found);
                    continue;
                }
            }

            let value = self.parse_expression();
            if *self.peek() == Token::Semi {
                self.lexer.consume();
            }
            return Some(Assignment { target, value });
        }
    }

    /// Reports a misplaced token and skips the rest of the statement.
    fn expected(&mut self, expected: &'static str, found: Token) {
        let at_boundary = found == Token::Semi;
        self.diagnostics.report(Diagnostic::ExpectedToken { expected, found });
        if at_boundary {
            return;
        }
        while !self.advance().is_terminator() {}
    }

    /// Builds the tree for one expression, stopping in front of `;` or at
    /// end of input. Never fails: problems are reported and replaced.
    pub fn parse_expression(&mut self) -> Expr {
        match self.expression() {
            Ok(expr) => {
                debug!(%expr, "expression parsed");
                expr
            }
            Err(EndOfInput) => {
                self.diagnostics.report(Diagnostic::UnexpectedEndOfInput);
                Expr::Literal(-1.0)
            }
        }
    }

    fn expression(&mut self) -> Result<Expr, EndOfInput> {
        let lhs = self.parse_primary()?;
        if *self.peek() == Token::Semi {
            return Ok(lhs);
        }
        self.parse_rhs(lhs, 0)
    }

    /// Leading `+`/`-` signs are collected in a loop and wrapped around
    /// the operand afterwards, so sign chains of any length are fine.
    fn parse_primary(&mut self) -> Result<Expr, EndOfInput> {
        let mut signs = Vec::new();
        loop {
            match self.peek() {
                Token::Plus => signs.push(UnaryOp::Plus),
                Token::Minus => signs.push(UnaryOp::Minus),
                _ => break,
            }
            self.lexer.consume();
        }

        let mut expr = self.parse_operand()?;
        for op in signs.into_iter().rev() {
            expr = Expr::unary(op, expr);
        }
        Ok(expr)
    }

    fn parse_operand(&mut self) -> Result<Expr, EndOfInput> {
        let token = self.peek().clone();
        match token {
            Token::Number(text) => {
                self.lexer.consume();
                Ok(Expr::Literal(to_number(&text, &mut self.diagnostics)))
            }
            Token::Identifier(name) => {
                self.lexer.consume();
                Ok(Expr::Variable(name))
            }
            Token::Eof => Err(EndOfInput),
            // left in place, it ends the statement
            Token::Semi => {
                self.diagnostics.report(Diagnostic::UnexpectedToken(Token::Semi));
                Ok(Expr::Literal(0.0))
            }
            other => {
                self.lexer.consume();
                self.unexpected(other);
                Ok(Expr::Literal(0.0))
            }
        }
    }

    /// Precedence climbing: folds `op operand` pairs onto `lhs` while the
    /// operator binds at least as tightly as `min_precedence`.
    fn parse_rhs(&mut self, mut lhs: Expr, min_precedence: u8) -> Result<Expr, EndOfInput> {
        loop {
            let token = self.peek().clone();
            if token.is_terminator() {
                return Ok(lhs);
            }

            let Some(op) = BinaryOp::from_token(&token) else {
                if min_precedence > 0 {
                    return Ok(lhs);
                }
                self.lexer.consume();
                self.unexpected(token);
                continue;
            };

            if op.precedence() < min_precedence {
                return Ok(lhs);
            }
            self.lexer.consume();

            let mut rhs = self.parse_primary()?;
            while self.peek().precedence() > op.precedence() {
                rhs = self.parse_rhs(rhs, op.precedence() + 1)?;
            }

            lhs = Expr::binary(lhs, op, rhs);
        }
    }

    fn unexpected(&mut self, token: Token) {
        let diagnostic = match token {
            Token::Equals => Diagnostic::UnexpectedAssignment,
            other => Diagnostic::UnexpectedToken(other),
        };
        self.diagnostics.report(diagnostic);
    }
}
