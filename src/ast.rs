use std::fmt;

use crate::token::Token;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnaryOp {
    Plus,
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOp {
    pub fn from_token(token: &Token) -> Option<BinaryOp> {
        match token {
            Token::Plus => Some(BinaryOp::Add),
            Token::Minus => Some(BinaryOp::Subtract),
            Token::Multiply => Some(BinaryOp::Multiply),
            Token::Divide => Some(BinaryOp::Divide),
            _ => None,
        }
    }

    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Multiply | BinaryOp::Divide => 2,
            BinaryOp::Add | BinaryOp::Subtract => 1,
        }
    }

    pub fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            BinaryOp::Add => left + right,
            BinaryOp::Subtract => left - right,
            BinaryOp::Multiply => left * right,
            BinaryOp::Divide => left / right,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Subtract => '-',
            BinaryOp::Multiply => '*',
            BinaryOp::Divide => '/',
        }
    }
}

/// Unevaluated expression. Variables hold only their name; the value is
/// looked up each time the tree is evaluated.
///
/// Sign chains and operator chains can nest arbitrarily deep, so dropping
/// and printing walk the tree with an explicit stack.
#[derive(Debug, PartialEq)]
pub enum Expr {
    Literal(f64),
    Variable(String),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
}

impl Expr {
    pub fn unary(op: UnaryOp, operand: Expr) -> Expr {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn binary(left: Expr, op: BinaryOp, right: Expr) -> Expr {
        Expr::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// Moves the children out, leaving leaves in their place.
    fn detach_children(&mut self, into: &mut Vec<Box<Expr>>) {
        match self {
            Expr::Literal(_) | Expr::Variable(_) => {}
            Expr::Unary { operand, .. } => {
                into.push(std::mem::replace(operand, Box::new(Expr::Literal(0.0))));
            }
            Expr::Binary { left, right, .. } => {
                into.push(std::mem::replace(left, Box::new(Expr::Literal(0.0))));
                into.push(std::mem::replace(right, Box::new(Expr::Literal(0.0))));
            }
        }
    }
}

impl Drop for Expr {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut node) = pending.pop() {
            node.detach_children(&mut pending);
        }
    }
}

enum Piece<'a> {
    Node(&'a Expr),
    Operator(BinaryOp),
    Close,
}

/// Renders the tree fully parenthesized, so grouping is visible.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut work = vec![Piece::Node(self)];
        while let Some(piece) = work.pop() {
            match piece {
                Piece::Node(Expr::Literal(value)) => write!(f, "{}", value)?,
                Piece::Node(Expr::Variable(name)) => f.write_str(name)?,
                Piece::Node(Expr::Unary { op, operand }) => {
                    f.write_str(if *op == UnaryOp::Plus { "+" } else { "-" })?;
                    work.push(Piece::Node(operand));
                }
                Piece::Node(Expr::Binary { left, op, right }) => {
                    f.write_str("(")?;
                    work.push(Piece::Close);
                    work.push(Piece::Node(right));
                    work.push(Piece::Operator(*op));
                    work.push(Piece::Node(left));
                }
                Piece::Operator(op) => write!(f, " {} ", op.symbol())?,
                Piece::Close => f.write_str(")")?,
            }
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq)]
pub struct Assignment {
    pub target: String,
    pub value: Expr,
}
