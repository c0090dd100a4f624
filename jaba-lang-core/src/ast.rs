use std::fmt::Display;
use std::rc::Rc;

use crate::stack::ensure_sufficient_stack;

#[derive(Debug, PartialEq, Clone)]
pub enum Expression {
    IntegerLiteral(i64),
    Identifier(Identifier),
    Unary(Sign, Box<Expression>),
    Binary(BinaryOperator, Box<Expression>, Box<Expression>),
    Ternary {
        condition: Box<Expression>,
        consequence: Box<Expression>,
        alternative: Box<Expression>,
    },
    Assignment {
        identifier: Identifier,
        value: Box<Expression>,
    },
    // Shared so that function values can hold the definition without
    // cloning the body.
    FunctionLiteral(Rc<FunctionLiteral>),
    Call {
        function: Box<Expression>,
        arguments: Vec<Expression>,
    },
}

#[derive(Debug, PartialEq, Clone)]
pub struct FunctionLiteral {
    pub parameters: Vec<Identifier>,
    pub body: Expression,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Sign {
    Plus,
    Minus,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BinaryOperator {
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,
}

#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct Identifier {
    pub name: Rc<str>,
}

impl From<&str> for Identifier {
    fn from(name: &str) -> Self {
        Identifier { name: name.into() }
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        ensure_sufficient_stack(|| self.render(f))
    }
}

impl Expression {
    fn render(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Expression::*;
        match self {
            IntegerLiteral(val) => write!(f, "{}", val),
            Identifier(ident) => write!(f, "{}", ident),
            // `-f(1)` parses as a call on `-f`, so a call operand keeps its own
            // parentheses.
            Unary(sign, expr) if matches!(**expr, Call { .. }) => {
                write!(f, "({}({}))", sign.to_str(), expr)
            }
            Unary(sign, expr) => write!(f, "({}{})", sign.to_str(), expr),
            Binary(operator, left, right) => write!(f, "({} {} {})", left, operator, right),
            Ternary {
                condition,
                consequence,
                alternative,
            } => write!(f, "({} ? {} : {})", condition, consequence, alternative),
            Assignment { identifier, value } => write!(f, "({} = {})", identifier, value),
            FunctionLiteral(function) => write!(f, "{}", function),
            Call {
                function,
                arguments,
            } => {
                write!(
                    f,
                    "{}({})",
                    function,
                    arguments
                        .iter()
                        .map(|arg| arg.to_string())
                        .collect::<Vec<String>>()
                        .join(" ")
                )
            }
        }
    }

    fn is_leaf(&self) -> bool {
        matches!(self, Expression::IntegerLiteral(_) | Expression::Identifier(_))
    }

    /// Moves every child subtree into `pending`, leaving leaves behind.
    fn take_children(&mut self, pending: &mut Vec<Expression>) {
        fn take(child: &mut Expression, pending: &mut Vec<Expression>) {
            if !child.is_leaf() {
                pending.push(std::mem::replace(child, Expression::IntegerLiteral(0)));
            }
        }

        use Expression::*;
        match self {
            IntegerLiteral(_) | Identifier(_) => {}
            Unary(_, operand) => take(operand, pending),
            Binary(_, left, right) => {
                take(left, pending);
                take(right, pending);
            }
            Ternary {
                condition,
                consequence,
                alternative,
            } => {
                take(condition, pending);
                take(consequence, pending);
                take(alternative, pending);
            }
            Assignment { value, .. } => take(value, pending),
            FunctionLiteral(function) => {
                // A body still shared with a function value stays where it is.
                if let Some(function) = Rc::get_mut(function) {
                    take(&mut function.body, pending);
                }
            }
            Call {
                function,
                arguments,
            } => {
                take(function, pending);
                for argument in arguments.iter_mut() {
                    take(argument, pending);
                }
            }
        }
    }
}

// Long operator chains nest one box per operand; the default drop would
// recurse once per level.
impl Drop for Expression {
    fn drop(&mut self) {
        if self.is_leaf() {
            return;
        }
        let mut pending = Vec::new();
        self.take_children(&mut pending);
        while let Some(mut expression) = pending.pop() {
            expression.take_children(&mut pending);
        }
    }
}

impl Display for FunctionLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "(|{}| {})",
            self.parameters
                .iter()
                .map(|id| id.name.as_ref())
                .collect::<Box<[&str]>>()
                .join(" "),
            self.body
        )
    }
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl Sign {
    fn to_str(self) -> &'static str {
        match self {
            Sign::Plus => "+",
            Sign::Minus => "-",
        }
    }
}

impl BinaryOperator {
    fn to_str(self) -> &'static str {
        use BinaryOperator::*;
        match self {
            Plus => "+",
            Minus => "-",
            Multiply => "*",
            Divide => "/",
            Modulo => "%",
        }
    }
}
