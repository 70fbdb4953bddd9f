//! GraphQL SDL syntax: lexing, parsing and the syntax tree the schema
//! compiler works on.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod string;
pub mod token;

pub use ast::*;
pub use lexer::Lexer;
pub use parser::{parse, ParseResult, MAX_NESTING_DEPTH};
pub use token::{LexError, Token, TokenKind};
