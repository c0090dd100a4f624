pub mod evaluator;
mod printer;
mod reader;

use std::ops::ControlFlow;

use rustyline::error::ReadlineError;

use evaluator::LineEvaluator;
use printer::Printer;
use reader::{Command, ReadOutput, Reader};

const BANNER: &str = concat!("jaba ", env!("CARGO_PKG_VERSION"), "\nType help for info");

const HELP: &str = "Documentation:
  - Functions:
    - Fn definition: adder = |a b| a + b
    - Fn calling:    adder(1 2)
    - Currying:      add = |a| |b| a + b
                     add(1)(2)
  - Basic arithmetic:
    - 1 + b, 8 % 3, (a + 2) * 3, etc
  - Conditionals:
    - n ? 1 : 2      (any non-zero integer is true)
  - Data types:
    - Integer
    - Function
Commands:
  - exit
  - vars
    - Lists every variable
  - debug
    - Toggles printing tokens and parsed expressions
  - help";

struct Repl {
    reader: Reader,
    evaluator: LineEvaluator,
    printer: Printer,
}

impl Repl {
    fn run(mut self) {
        loop {
            let input = self.reader.read();
            match input {
                ReadOutput::Exit => break,
                ReadOutput::Clear => continue,
                ReadOutput::Command(command) => {
                    if self.run_command(command).is_break() {
                        break;
                    }
                }
                ReadOutput::Line(line) => {
                    let result = self.evaluator.evaluate(&line);
                    self.printer.print(result)
                }
            }
        }
        println!("bye");
    }

    fn run_command(&mut self, command: Command) -> ControlFlow<()> {
        match command {
            Command::Exit => return ControlFlow::Break(()),
            Command::Debug => {
                self.evaluator.debug = !self.evaluator.debug;
                println!("debug {}", if self.evaluator.debug { "on" } else { "off" });
            }
            Command::Vars => self.printer.print_bindings(self.evaluator.environment()),
            Command::Help => println!("{HELP}"),
        }
        ControlFlow::Continue(())
    }
}

pub fn start(evaluator: LineEvaluator) -> Result<(), ReadlineError> {
    let reader = Reader::new()?;
    println!("{BANNER}");

    Repl {
        reader,
        evaluator,
        printer: Printer {},
    }
    .run();
    Ok(())
}
