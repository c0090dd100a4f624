use std::fmt::Display;
use std::rc::Rc;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TokenKind {
    // Operators
    Plus,
    Minus,
    Mul,
    Div,
    Mod,
    Pipe,
    LParen,
    RParen,
    Assignment,
    TernaryStart,
    TernarySep,

    Integer,
    Identifier,

    NewLine,
    EndOfInput,
    Invalid,
}

impl TokenKind {
    /// Operator or punctuation kind for a single character, if any.
    pub fn from_symbol(ch: char) -> Option<TokenKind> {
        match ch {
            '+' => Some(TokenKind::Plus),
            '-' => Some(TokenKind::Minus),
            '*' => Some(TokenKind::Mul),
            '/' => Some(TokenKind::Div),
            '%' => Some(TokenKind::Mod),
            '|' => Some(TokenKind::Pipe),
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            '=' => Some(TokenKind::Assignment),
            '?' => Some(TokenKind::TernaryStart),
            ':' => Some(TokenKind::TernarySep),
            _ => None,
        }
    }

    /// `NewLine` and `EndOfInput` both close a line.
    pub fn ends_line(&self) -> bool {
        matches!(self, TokenKind::NewLine | TokenKind::EndOfInput)
    }

    fn to_str(self) -> &'static str {
        use TokenKind::*;
        match self {
            Plus => "+",
            Minus => "-",
            Mul => "*",
            Div => "/",
            Mod => "%",
            Pipe => "|",
            LParen => "(",
            RParen => ")",
            Assignment => "=",
            TernaryStart => "?",
            TernarySep => ":",
            Integer => "integer",
            Identifier => "identifier",
            NewLine => "new line",
            EndOfInput => "end of input",
            Invalid => "invalid token",
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

/// A lexeme of one source line. `start` and `end` are byte offsets.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub text: Rc<str>,
    pub start: usize,
    pub end: usize,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::NewLine | TokenKind::EndOfInput => write!(f, "{}", self.kind),
            _ => write!(f, "'{}' at position {}", self.text, self.start),
        }
    }
}
