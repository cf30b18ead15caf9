mod ast;
mod environment;
mod error;
mod interpreter;
mod lexer;
mod parser;
mod token;

pub use ast::{Assignment, BinaryOp, Expr, UnaryOp};
pub use environment::Environment;
pub use error::{CalcError, Diagnostic, Diagnostics};
pub use interpreter::Interpreter;
pub use lexer::{CharReader, Lexer, to_number};
pub use parser::Parser;
pub use token::Token;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info};

/// Result of one `name = expression ;` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub target: String,
    pub value: f64,
    /// Everything reported while reading and evaluating this statement.
    pub diagnostics: Vec<Diagnostic>,
}

/// Statement driver: parses one assignment at a time, evaluates it and
/// commits the value.
pub struct Session<I: Iterator<Item = char>> {
    parser: Parser<I>,
    interpreter: Interpreter,
}

impl<I: Iterator<Item = char>> Session<I> {
    pub fn new(lexer: Lexer<I>) -> Self {
        Session {
            parser: Parser::new(lexer),
            interpreter: Interpreter::new(),
        }
    }

    /// Runs the next statement. `None` means the input is exhausted.
    pub fn step(&mut self) -> Option<Outcome> {
        let assignment = self.parser.parse_statement()?;
        let mut diagnostics = self.parser.take_diagnostics();

        let mut evaluation = Diagnostics::new();
        let value = self.interpreter.execute(&assignment, &mut evaluation);
        diagnostics.extend(evaluation.take());

        debug!(variable = %assignment.target, value, "statement executed");
        Some(Outcome {
            target: assignment.target,
            value,
            diagnostics,
        })
    }

    /// Steps until the input ends or `running` is cleared, handing every
    /// outcome to `on_outcome`. Returns the number of statements run.
    pub fn run(&mut self, running: &AtomicBool, mut on_outcome: impl FnMut(&Outcome)) -> usize {
        info!("session started");
        let mut count = 0;
        while running.load(Ordering::SeqCst) {
            let Some(outcome) = self.step() else {
                break;
            };
            on_outcome(&outcome);
            count += 1;
        }
        info!(statements = count, "session finished");
        count
    }

    pub fn environment(&self) -> &Environment {
        self.interpreter.environment()
    }

    /// Ends the session, returning the variables and any diagnostics
    /// reported after the last statement.
    pub fn finish(mut self) -> (Environment, Vec<Diagnostic>) {
        let trailing = self.parser.take_diagnostics();
        (self.interpreter.into_environment(), trailing)
    }
}

#[derive(Debug)]
pub struct Report {
    pub outcomes: Vec<Outcome>,
    pub variables: Environment,
    pub trailing: Vec<Diagnostic>,
}

impl Report {
    /// Every diagnostic of the run, in order.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.outcomes
            .iter()
            .flat_map(|outcome| outcome.diagnostics.iter())
            .chain(self.trailing.iter())
    }
}

fn collect<I: Iterator<Item = char>>(lexer: Lexer<I>) -> Report {
    let mut session = Session::new(lexer);
    let mut outcomes = Vec::new();
    session.run(&AtomicBool::new(true), |outcome| outcomes.push(outcome.clone()));
    let (variables, trailing) = session.finish();
    Report {
        outcomes,
        variables,
        trailing,
    }
}

pub fn execute(program: &str) -> Report {
    collect(Lexer::new(program))
}

pub fn execute_file(path: impl AsRef<Path>) -> Result<Report, CalcError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| CalcError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(collect(Lexer::from_chars(CharReader::new(BufReader::new(file)))))
}
