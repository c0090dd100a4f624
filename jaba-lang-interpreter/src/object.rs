use std::collections::HashMap;
use std::fmt::Display;
use std::rc::Rc;

use jaba_lang_core::ast;

use thiserror::Error;

/// A flat name to value mapping; one per session or per active call.
pub type Bindings = HashMap<Rc<str>, Object>;

#[derive(Debug, PartialEq, Clone)]
pub enum Object {
    Integer(i64),
    Function(Rc<ast::FunctionLiteral>),
    Closure(Closure),
}

impl Object {
    #[cfg(test)]
    pub fn is_callable(&self) -> bool {
        matches!(self, Object::Function(_) | Object::Closure(_))
    }
}

impl Display for Object {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Object::Integer(value) => write!(f, "{}", value),
            Object::Function(_) | Object::Closure(_) => write!(f, "[Function]"),
        }
    }
}

/// A function returned from a call, together with a snapshot of the frame
/// it was returned from. The snapshot never changes after creation.
#[derive(Clone)]
pub struct Closure {
    pub function: Rc<ast::FunctionLiteral>,
    pub captured: Rc<Bindings>,
}

impl PartialEq for Closure {
    fn eq(&self, other: &Self) -> bool {
        self.function == other.function && Rc::ptr_eq(&self.captured, &other.captured)
    }
}

impl std::fmt::Debug for Closure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut captured: Vec<&str> = self.captured.keys().map(|name| name.as_ref()).collect();
        captured.sort_unstable();
        f.debug_struct("Closure")
            .field("function", &self.function.to_string())
            .field("captured", &captured)
            .finish()
    }
}

#[derive(Debug, PartialEq, Clone, Error)]
pub enum EvaluationError {
    #[error("variable \"{0}\" not defined")]
    UndefinedVariable(Rc<str>),
    #[error("expression does not evaluate to a function")]
    CallNonFunction,
    #[error("incorrect amount of arguments for \"{function}\", expected {expected} got {actual}")]
    WrongArgumentCount {
        function: String,
        expected: usize,
        actual: usize,
    },
    #[error("{0} cannot be applied to expression")]
    NonIntegerOperand(ast::BinaryOperator),
    #[error("cannot apply - to non integer")]
    NegateNonInteger,
    #[error("cannot evaluate condition on non integer value")]
    NonIntegerCondition,
    #[error("division by zero")]
    DivisionByZero,
    #[error("max stack size {0} exceeded")]
    MaxStackSizeExceeded(usize),
}
