use std::rc::Rc;

use thiserror::Error;

pub use crate::token::{Token, TokenKind};

#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum LexError {
    #[error("invalid token '{text}' at position {position}")]
    InvalidToken { text: Rc<str>, position: usize },
}

/// Splits a line into tokens. The first unrecognised character aborts with a
/// [`LexError`].
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Tokenizer::new(input)
        .map(|token| match token.kind {
            TokenKind::Invalid => Err(LexError::InvalidToken {
                text: token.text,
                position: token.start,
            }),
            _ => Ok(token),
        })
        .collect()
}

/// Iterator over the tokens of a line. Always finishes with exactly one
/// `EndOfInput` token; unknown characters come out as `Invalid` tokens.
#[derive(Clone)]
pub struct Tokenizer<'a> {
    input: &'a str,
    iter: std::iter::Peekable<std::str::CharIndices<'a>>,
    finished: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        let iter = input.char_indices().peekable();
        Self {
            input,
            iter,
            finished: false,
        }
    }

    fn is_identifier_char(ch: char) -> bool {
        ch.is_alphabetic() || ch.is_ascii_digit() || ch == '_'
    }

    fn is_blank(ch: char) -> bool {
        ch.is_whitespace() && ch != '\n'
    }

    fn read_identifier(&mut self, start: usize) -> Token {
        while self
            .iter
            .next_if(|(_, ch)| Self::is_identifier_char(*ch))
            .is_some()
        {}

        self.make_token(TokenKind::Identifier, start)
    }

    fn read_number(&mut self, start: usize) -> Token {
        while self.iter.next_if(|(_, ch)| ch.is_ascii_digit()).is_some() {}

        self.make_token(TokenKind::Integer, start)
    }

    fn read_new_lines(&mut self, start: usize) -> Token {
        while self.iter.next_if(|(_, ch)| *ch == '\n').is_some() {}

        let end = self.next_idx();
        Token {
            kind: TokenKind::NewLine,
            text: "".into(),
            start,
            end,
        }
    }

    fn make_token(&mut self, kind: TokenKind, start: usize) -> Token {
        let end = self.next_idx();
        Token {
            kind,
            text: self.input[start..end].into(),
            start,
            end,
        }
    }

    fn next_idx(&mut self) -> usize {
        self.iter
            .peek()
            .map(|(idx, _)| *idx)
            .unwrap_or(self.input.len())
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }

        while self.iter.next_if(|(_, ch)| Self::is_blank(*ch)).is_some() {}

        let Some((idx, ch)) = self.iter.next() else {
            self.finished = true;
            let end = self.input.len();
            return Some(Token {
                kind: TokenKind::EndOfInput,
                text: "".into(),
                start: end,
                end,
            });
        };

        let token = match ch {
            '\n' => self.read_new_lines(idx),
            c if c.is_ascii_digit() => self.read_number(idx),
            c if c.is_alphabetic() => self.read_identifier(idx),
            c => match TokenKind::from_symbol(c) {
                Some(kind) => self.make_token(kind, idx),
                None => self.make_token(TokenKind::Invalid, idx),
            },
        };
        Some(token)
    }
}
