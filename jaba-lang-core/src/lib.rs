//! Front end of the language: tokens, lexer, expression tree and parser.
//!
//! One call handles one line: [`lexer::tokenize`] followed by
//! [`parser::parse`] turns the text into a single [`ast::Expression`].

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod stack;
pub mod token;
