use std::fmt::Display;

use thiserror::Error;

use crate::token::{Token, TokenKind};

#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum ParseError {
    #[error("unexpected end of line, expected {expected}")]
    PrematureEndOfLine { expected: Expected },
    #[error("expected {expected}, found {got}")]
    UnexpectedToken { expected: Expected, got: Token },
    #[error("invalid integer literal {literal}: {source}")]
    InvalidInteger {
        literal: String,
        source: std::num::ParseIntError,
    },
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Expected {
    Token(TokenKind),
    Identifier,
    Expression,
}

impl Display for Expected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expected::Token(kind) => write!(f, "`{}`", kind),
            Expected::Identifier => write!(f, "identifier"),
            Expected::Expression => write!(f, "expression"),
        }
    }
}

impl ParseError {
    pub fn premature_end_expected_expression() -> Self {
        ParseError::PrematureEndOfLine {
            expected: Expected::Expression,
        }
    }

    pub fn unexpected_token(expected: TokenKind, got: Token) -> ParseError {
        ParseError::UnexpectedToken {
            expected: Expected::Token(expected),
            got,
        }
    }

    pub fn unexpected_other(expected: Expected, got: Token) -> ParseError {
        ParseError::UnexpectedToken { expected, got }
    }
}
