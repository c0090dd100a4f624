use jaba_lang_core::lexer::{self, Token};
use jaba_lang_core::parser;
use jaba_lang_interpreter::environment::Environment;
use jaba_lang_interpreter::evaluator;
use jaba_lang_interpreter::object::Object;
use jaba_lang_interpreter::InterpreterError;

/// Runs the pipeline stage by stage so that debug mode can show what each
/// stage produced.
pub struct LineEvaluator {
    environment: Environment,
    pub debug: bool,
}

impl LineEvaluator {
    pub fn new(environment: Environment, debug: bool) -> Self {
        Self { environment, debug }
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Evaluates one line; the terminating newline is added if missing.
    pub fn evaluate(&mut self, line: &str) -> Result<Object, InterpreterError> {
        let source = format!("{}\n", line.trim_end_matches(['\r', '\n']));

        let tokens = lexer::tokenize(&source)?;
        if self.debug {
            println!("Tokens: {}", render_tokens(&tokens));
        }

        let expression = parser::parse(tokens)?;
        if self.debug {
            println!("Expression: {}", expression);
        }

        Ok(evaluator::eval_expression(&expression, &mut self.environment)?)
    }
}

fn render_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|token| match token.text.as_ref() {
            "" => format!("({})", token.kind),
            text => format!("({} {})", token.kind, text),
        })
        .collect::<Vec<String>>()
        .join(" ")
}
