//! Tree-walking evaluator for one line of source at a time.
//!
//! ```
//! use jaba_lang_interpreter::{environment::Environment, evaluate_line};
//!
//! let mut environment = Environment::new();
//! evaluate_line("adder = |a| |b| a + b\n", &mut environment).unwrap();
//! let value = evaluate_line("adder(3)(4)\n", &mut environment).unwrap();
//! assert_eq!(value.to_string(), "7");
//! ```

pub mod environment;
pub mod evaluator;
pub mod object;
pub mod prelude;

use jaba_lang_core::ast::Expression;
use jaba_lang_core::lexer::{self, LexError};
use jaba_lang_core::parser::{self, ParseError};
use thiserror::Error;
use tracing::debug;

use crate::environment::Environment;
use crate::object::{EvaluationError, Object};

#[derive(Debug, PartialEq, Clone, Error)]
pub enum InterpreterError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}

/// Tokenizes and parses one newline-terminated line.
pub fn parse_line(line: &str) -> Result<Expression, InterpreterError> {
    let tokens = lexer::tokenize(line)?;
    Ok(parser::parse(tokens)?)
}

/// Runs one newline-terminated line against `environment`.
///
/// On error the environment keeps only the assignments that completed
/// before the failure.
pub fn evaluate_line(
    line: &str,
    environment: &mut Environment,
) -> Result<Object, InterpreterError> {
    let expression = parse_line(line)?;
    debug!(%expression, "evaluating");
    Ok(evaluator::eval_expression(&expression, environment)?)
}
