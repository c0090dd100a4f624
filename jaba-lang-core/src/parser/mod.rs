pub mod error;
pub mod expressions;

use std::rc::Rc;

use crate::ast::Expression;
use crate::token::{Token, TokenKind};
pub use error::ParseError;
use expressions::parse_assignment;

/// Parses the tokens of one line into a single expression.
pub fn parse(tokens: Vec<Token>) -> Result<Expression, ParseError> {
    Parser::new(tokens).parse_program()
}

pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        // Running past the end keeps yielding this last token.
        if tokens.last().map(|token| token.kind) != Some(TokenKind::EndOfInput) {
            let end = tokens.last().map(|token| token.end).unwrap_or(0);
            tokens.push(Token {
                kind: TokenKind::EndOfInput,
                text: Rc::from(""),
                start: end,
                end,
            });
        }
        Self {
            tokens,
            position: 0,
        }
    }

    pub(crate) fn peek(&self) -> &Token {
        self.peek_nth(0)
    }

    pub(crate) fn peek_nth(&self, offset: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.position + offset).min(last)]
    }

    pub(crate) fn next(&mut self) -> Token {
        let token = self.peek().clone();
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
        token
    }

    pub(crate) fn next_if(&mut self, kind: TokenKind) -> Option<Token> {
        if self.peek().kind == kind {
            Some(self.next())
        } else {
            None
        }
    }

    pub(crate) fn parse_ident(&mut self) -> Result<Rc<str>, ParseError> {
        let token = self.next();
        match token.kind {
            TokenKind::Identifier => Ok(token.text),
            _ => Err(ParseError::unexpected_other(
                error::Expected::Identifier,
                token,
            )),
        }
    }

    pub(crate) fn expect_token(&mut self, token_kind: TokenKind) -> Result<Token, ParseError> {
        let token = self.next();
        if token.kind == token_kind {
            Ok(token)
        } else {
            Err(ParseError::unexpected_token(token_kind, token))
        }
    }

    /// Fails when the line ends where an operand is still owed, e.g. `1 +`.
    pub(crate) fn expect_expression(&self) -> Result<(), ParseError> {
        if self.peek().kind.ends_line() {
            Err(ParseError::premature_end_expected_expression())
        } else {
            Ok(())
        }
    }

    pub fn parse_program(&mut self) -> Result<Expression, ParseError> {
        let expression = parse_assignment(self)?;
        self.expect_token(TokenKind::NewLine)?;
        self.expect_token(TokenKind::EndOfInput)?;
        Ok(expression)
    }
}
