use jaba_lang_interpreter::environment::Environment;
use jaba_lang_interpreter::object::Object;
use jaba_lang_interpreter::InterpreterError;

pub struct Printer {}

impl Printer {
    pub fn print(&mut self, result: Result<Object, InterpreterError>) {
        match result {
            Ok(object) => println!("{}", object),
            Err(err) => println!("ERROR: {}", err),
        }
    }

    pub fn print_bindings(&mut self, environment: &Environment) {
        for (name, value) in environment.bindings() {
            println!("{}: {}", name, value);
        }
    }
}
