//! Definitions every interactive session starts with.

use crate::environment::Environment;
use crate::{evaluate_line, InterpreterError};

/// Linear congruential generator curried as `seed -> x -> next`, and a
/// recursive Fibonacci. The seed only names a generator instance; each step
/// depends on `x` alone.
pub const DEFINITIONS: [&str; 2] = [
    "rand = |seed| |x| (1664525 * x + 1013904223) % 4294967296\n",
    "fibonacci = |n| n - 1 ? n ? fibonacci(n - 1) + fibonacci(n - 2) : 0 : 1\n",
];

pub fn load(environment: &mut Environment) -> Result<(), InterpreterError> {
    for definition in DEFINITIONS {
        evaluate_line(definition, environment)?;
    }
    Ok(())
}
