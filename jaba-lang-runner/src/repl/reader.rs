use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::warn;

const PROMPT: &str = "> ";

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Command {
    Exit,
    Debug,
    Vars,
    Help,
}

impl Command {
    pub fn parse(line: &str) -> Option<Command> {
        match line.trim() {
            "exit" => Some(Command::Exit),
            "debug" => Some(Command::Debug),
            "vars" => Some(Command::Vars),
            "help" => Some(Command::Help),
            _ => None,
        }
    }
}

pub enum ReadOutput {
    Exit,
    Clear,
    Command(Command),
    Line(String),
}

pub struct Reader {
    rl: DefaultEditor,
}

impl Reader {
    pub fn new() -> Result<Self, ReadlineError> {
        Ok(Self {
            rl: DefaultEditor::new()?,
        })
    }

    pub fn read(&mut self) -> ReadOutput {
        let readline = self.rl.readline(PROMPT);

        let line = match readline {
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                return ReadOutput::Clear; // Clear line
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                return ReadOutput::Exit;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                return ReadOutput::Exit;
            }
            Ok(line) => line,
        };

        if line.trim().is_empty() {
            return ReadOutput::Clear;
        }
        if let Err(err) = self.rl.add_history_entry(line.as_str()) {
            warn!(%err, "could not add line to history");
        }

        match Command::parse(&line) {
            Some(command) => ReadOutput::Command(command),
            None => ReadOutput::Line(line),
        }
    }
}
