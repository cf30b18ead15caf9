use crate::ast::{Assignment, BinaryOp, Expr, UnaryOp};
use crate::environment::Environment;
use crate::error::{Diagnostic, Diagnostics};

/// Pending work for the evaluation stack.
enum Step<'a> {
    Visit(&'a Expr),
    Negate,
    Apply(BinaryOp),
}

pub struct Interpreter {
    environment: Environment,
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter {
            environment: Environment::new(),
        }
    }

    /// Computes the value of `expr` against the current variables. Unknown
    /// variables are reported and count as 0. Left operands are evaluated
    /// before right ones.
    pub fn evaluate(&self, expr: &Expr, diagnostics: &mut Diagnostics) -> f64 {
        let mut work = vec![Step::Visit(expr)];
        let mut values: Vec<f64> = Vec::new();

        while let Some(step) = work.pop() {
            match step {
                Step::Visit(Expr::Literal(value)) => values.push(*value),
                Step::Visit(Expr::Variable(name)) => {
                    let value = match self.environment.get(name) {
                        Some(value) => value,
                        None => {
                            diagnostics.report(Diagnostic::UndefinedVariable(name.clone()));
                            0.0
                        }
                    };
                    values.push(value);
                }
                Step::Visit(Expr::Unary { op, operand }) => {
                    if *op == UnaryOp::Minus {
                        work.push(Step::Negate);
                    }
                    work.push(Step::Visit(operand));
                }
                Step::Visit(Expr::Binary { left, op, right }) => {
                    work.push(Step::Apply(*op));
                    work.push(Step::Visit(right));
                    work.push(Step::Visit(left));
                }
                Step::Negate => {
                    let value = values.pop().expect("operand evaluated before negation");
                    values.push(-value);
                }
                Step::Apply(op) => {
                    let right_val = values.pop().expect("right operand evaluated");
                    let left_val = values.pop().expect("left operand evaluated");
                    values.push(op.apply(left_val, right_val));
                }
            }
        }

        values.pop().expect("expression produced a value")
    }

    /// Evaluates the right-hand side and stores it under the target name.
    pub fn execute(&mut self, assignment: &Assignment, diagnostics: &mut Diagnostics) -> f64 {
        let value = self.evaluate(&assignment.value, diagnostics);
        self.environment.set(assignment.target.as_str(), value);
        value
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn into_environment(self) -> Environment {
        self.environment
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
