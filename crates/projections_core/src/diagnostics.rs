//! Syntax errors found in a schema file.

use crate::span::Span;
use std::fmt;

/// Stable error codes shown next to a syntax error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Code {
    UnexpectedToken,
    UnexpectedEof,
    InvalidSyntax,
    UnterminatedString,
    InvalidToken,
    NestingTooDeep,
}

impl Code {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnexpectedToken => "E0001",
            Self::UnexpectedEof => "E0002",
            Self::InvalidSyntax => "E0003",
            Self::UnterminatedString => "E0004",
            Self::InvalidToken => "E0005",
            Self::NestingTooDeep => "E0006",
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One syntax error, pointing at the offending source range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub code: Code,
    /// Short summary, e.g. "unexpected token".
    pub title: String,
    pub span: Span,
    /// What was expected or found at `span`.
    pub label: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.title, self.label)
    }
}

/// Diagnostics of one parsed file, in the order they were found.
#[derive(Debug, Default, Clone)]
pub struct DiagnosticBag {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticBag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(
        &mut self,
        code: Code,
        title: impl Into<String>,
        span: Span,
        label: impl Into<String>,
    ) {
        self.diagnostics.push(Diagnostic {
            code,
            title: title.into(),
            span,
            label: label.into(),
        });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }
}
