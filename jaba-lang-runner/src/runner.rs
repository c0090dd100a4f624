use std::path::Path;

use jaba_lang_interpreter::object::Object;
use jaba_lang_interpreter::InterpreterError;
use thiserror::Error;

use crate::repl::evaluator::LineEvaluator;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("could not read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("line {line}: {source}")]
    Line {
        line: usize,
        source: InterpreterError,
    },
}

/// Evaluates a script file one line at a time, printing every result.
pub fn execute(path: &Path, mut evaluator: LineEvaluator) -> Result<(), RunError> {
    let source = std::fs::read_to_string(path).map_err(|source| RunError::Read {
        path: path.display().to_string(),
        source,
    })?;

    run_source(&source, &mut evaluator, |object| println!("{}", object))
}

/// Stops at the first failing line. Blank lines are skipped.
pub fn run_source(
    source: &str,
    evaluator: &mut LineEvaluator,
    mut on_result: impl FnMut(&Object),
) -> Result<(), RunError> {
    for (index, line) in source.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let object = evaluator
            .evaluate(line)
            .map_err(|source| RunError::Line {
                line: index + 1,
                source,
            })?;
        on_result(&object);
    }
    Ok(())
}
