//! Lexer for GraphQL SDL.

use crate::token::{LexError, Token, TokenKind};
use projections_core::Span;

/// Splits SDL source into tokens.
///
/// Whitespace, commas, `#` comments and a byte order mark are ignored. After
/// the end of input every call returns [`TokenKind::Eof`].
pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }

    /// Source text covered by a span produced by this lexer.
    #[must_use]
    pub fn text(&self, span: Span) -> &'a str {
        self.source.get(span.range()).unwrap_or_default()
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_ignored();
        let start = self.pos;

        let kind = match self.byte(0) {
            None => TokenKind::Eof,
            Some(b'"') => self.string(),
            Some(b'-' | b'0'..=b'9') => self.number(),
            Some(b) if is_name_start(b) => {
                self.name();
                TokenKind::Name
            }
            Some(b) => {
                if let Some(kind) = TokenKind::punctuator(b) {
                    self.pos += 1;
                    kind
                } else {
                    self.pos += self.source[self.pos..]
                        .chars()
                        .next()
                        .map_or(1, char::len_utf8);
                    TokenKind::Error(LexError::UnexpectedCharacter)
                }
            }
        };

        Token {
            kind,
            span: Span::new(offset(start), offset(self.pos)),
        }
    }

    fn byte(&self, ahead: usize) -> Option<u8> {
        self.source.as_bytes().get(self.pos + ahead).copied()
    }

    fn skip_ignored(&mut self) {
        loop {
            match self.byte(0) {
                Some(b' ' | b'\t' | b'\r' | b'\n' | b',') => self.pos += 1,
                Some(b'#') => {
                    while self.byte(0).is_some_and(|b| b != b'\n') {
                        self.pos += 1;
                    }
                }
                _ if self.source[self.pos..].starts_with('\u{feff}') => {
                    self.pos += '\u{feff}'.len_utf8();
                }
                _ => return,
            }
        }
    }

    fn name(&mut self) {
        while self.byte(0).is_some_and(is_name_continue) {
            self.pos += 1;
        }
    }

    fn digits(&mut self) -> bool {
        let start = self.pos;
        while self.byte(0).is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn number(&mut self) -> TokenKind {
        let mut kind = TokenKind::Int;
        if self.byte(0) == Some(b'-') {
            self.pos += 1;
        }
        let mut valid = self.digits();

        if valid && self.byte(0) == Some(b'.') {
            self.pos += 1;
            kind = TokenKind::Float;
            valid = self.digits();
        }
        if valid && matches!(self.byte(0), Some(b'e' | b'E')) {
            self.pos += 1;
            kind = TokenKind::Float;
            if matches!(self.byte(0), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            valid = self.digits();
        }

        // A number runs straight into a name or another dot in `12ab` or `1.2.3`.
        if self.byte(0).is_some_and(|b| is_name_continue(b) || b == b'.') {
            valid = false;
            while self.byte(0).is_some_and(|b| is_name_continue(b) || b == b'.') {
                self.pos += 1;
            }
        }

        if valid {
            kind
        } else {
            TokenKind::Error(LexError::InvalidNumber)
        }
    }

    fn string(&mut self) -> TokenKind {
        if self.source[self.pos..].starts_with(r#"""""#) {
            return self.block_string();
        }
        self.pos += 1;

        loop {
            match self.byte(0) {
                None | Some(b'\n' | b'\r') => {
                    return TokenKind::Error(LexError::UnterminatedString);
                }
                Some(b'"') => {
                    self.pos += 1;
                    return TokenKind::String;
                }
                Some(b'\\') if !matches!(self.byte(1), None | Some(b'\n' | b'\r')) => {
                    self.pos += 2;
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    fn block_string(&mut self) -> TokenKind {
        self.pos += 3;
        loop {
            let rest = &self.source.as_bytes()[self.pos..];
            if rest.is_empty() {
                return TokenKind::Error(LexError::UnterminatedString);
            }
            if rest.starts_with(br#"\""""#) {
                self.pos += 4;
            } else if rest.starts_with(br#"""""#) {
                self.pos += 3;
                return TokenKind::BlockString;
            } else {
                self.pos += 1;
            }
        }
    }
}

fn is_name_start(b: u8) -> bool {
    b == b'_' || b.is_ascii_alphabetic()
}

fn is_name_continue(b: u8) -> bool {
    b == b'_' || b.is_ascii_alphanumeric()
}

fn offset(pos: usize) -> u32 {
    u32::try_from(pos).unwrap_or(u32::MAX)
}
