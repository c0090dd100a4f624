mod logging;
mod repl;
mod runner;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use jaba_lang_interpreter::environment::{Environment, MAX_CALL_DEPTH};
use jaba_lang_interpreter::prelude;

use repl::evaluator::LineEvaluator;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Script to evaluate line by line instead of starting the shell
    path: Option<PathBuf>,
    /// Print tokens and the parsed expression of every line
    #[arg(short, long)]
    debug: bool,
    /// Start without the `rand` and `fibonacci` definitions
    #[arg(long)]
    no_prelude: bool,
    /// Maximum number of nested function calls
    #[arg(long, default_value_t = MAX_CALL_DEPTH)]
    max_call_depth: usize,
}

fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();

    let mut environment = Environment::with_max_call_depth(cli.max_call_depth);
    if !cli.no_prelude {
        if let Err(error) = prelude::load(&mut environment) {
            eprintln!("ERROR: {error}");
            return ExitCode::FAILURE;
        }
    }
    let evaluator = LineEvaluator::new(environment, cli.debug);

    let result = match cli.path {
        None => repl::start(evaluator).map_err(|error| error.to_string()),
        Some(path) => runner::execute(&path, evaluator).map_err(|error| error.to_string()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("ERROR: {error}");
            ExitCode::FAILURE
        }
    }
}
