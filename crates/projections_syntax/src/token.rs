//! Tokens of GraphQL SDL.

use projections_core::Span;
use std::fmt;

/// Why the lexer gave up on a piece of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexError {
    UnterminatedString,
    InvalidNumber,
    UnexpectedCharacter,
}

/// Token kinds.
///
/// SDL keywords are contextual, so `type`, `enum` or `on` lex as [`TokenKind::Name`]
/// and the parser decides from position whether they start a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Name,
    Int,
    Float,
    String,
    BlockString,
    BraceL,
    BraceR,
    ParenL,
    ParenR,
    BracketL,
    BracketR,
    Colon,
    Equals,
    Pipe,
    Amp,
    At,
    Bang,
    Dollar,
    Error(LexError),
    Eof,
}

impl TokenKind {
    /// Maps a punctuator byte to its kind.
    #[must_use]
    pub const fn punctuator(byte: u8) -> Option<Self> {
        Some(match byte {
            b'{' => Self::BraceL,
            b'}' => Self::BraceR,
            b'(' => Self::ParenL,
            b')' => Self::ParenR,
            b'[' => Self::BracketL,
            b']' => Self::BracketR,
            b':' => Self::Colon,
            b'=' => Self::Equals,
            b'|' => Self::Pipe,
            b'&' => Self::Amp,
            b'@' => Self::At,
            b'!' => Self::Bang,
            b'$' => Self::Dollar,
            _ => return None,
        })
    }

    /// How the kind reads in an "expected ..., found ..." message.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Int => "int",
            Self::Float => "float",
            Self::String | Self::BlockString => "string",
            Self::BraceL => "`{`",
            Self::BraceR => "`}`",
            Self::ParenL => "`(`",
            Self::ParenR => "`)`",
            Self::BracketL => "`[`",
            Self::BracketR => "`]`",
            Self::Colon => "`:`",
            Self::Equals => "`=`",
            Self::Pipe => "`|`",
            Self::Amp => "`&`",
            Self::At => "`@`",
            Self::Bang => "`!`",
            Self::Dollar => "`$`",
            Self::Error(_) => "invalid token",
            Self::Eof => "end of input",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}
