//! Recursive descent parser for GraphQL schema documents.
//!
//! The parser never stops at the first error. Each problem is reported to a
//! [`DiagnosticBag`] and parsing resumes at the next token that can start a
//! definition, so one run reports every broken definition in a file.

use crate::ast::*;
use crate::lexer::Lexer;
use crate::string::{block_string_value, decode_string};
use crate::token::{LexError, Token, TokenKind};
use projections_core::{Code, DiagnosticBag, Interner, Span};

/// How deeply list types and list or object values may nest.
pub const MAX_NESTING_DEPTH: usize = 64;

const DEFINITION_KEYWORDS: &[&str] = &[
    "type",
    "enum",
    "interface",
    "union",
    "input",
    "scalar",
    "schema",
    "directive",
    "extend",
];

const DIRECTIVE_LOCATIONS: &[&str] = &[
    "QUERY",
    "MUTATION",
    "SUBSCRIPTION",
    "FIELD",
    "FRAGMENT_DEFINITION",
    "FRAGMENT_SPREAD",
    "INLINE_FRAGMENT",
    "VARIABLE_DEFINITION",
    "SCHEMA",
    "SCALAR",
    "OBJECT",
    "FIELD_DEFINITION",
    "ARGUMENT_DEFINITION",
    "INTERFACE",
    "UNION",
    "ENUM",
    "ENUM_VALUE",
    "INPUT_OBJECT",
    "INPUT_FIELD_DEFINITION",
];

pub struct ParseResult<'a> {
    pub document: Document<'a>,
    pub diagnostics: DiagnosticBag,
}

impl ParseResult<'_> {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Parses SDL source. Names are interned into `interner`.
pub fn parse<'a>(source: &'a str, interner: &Interner) -> ParseResult<'a> {
    let mut parser = Parser {
        lexer: Lexer::new(source),
        interner,
        token: Token {
            kind: TokenKind::Eof,
            span: Span::default(),
        },
        depth: 0,
        diagnostics: DiagnosticBag::new(),
    };
    parser.bump();
    let document = parser.document();
    ParseResult {
        document,
        diagnostics: parser.diagnostics,
    }
}

struct Parser<'a, 'i> {
    lexer: Lexer<'a>,
    interner: &'i Interner,
    token: Token,
    depth: usize,
    diagnostics: DiagnosticBag,
}

impl<'a> Parser<'a, '_> {
    fn bump(&mut self) {
        loop {
            self.token = self.lexer.next_token();
            let TokenKind::Error(error) = self.token.kind else {
                return;
            };
            let text = self.text();
            let (code, title, label) = match error {
                LexError::UnterminatedString => (
                    Code::UnterminatedString,
                    "unterminated string",
                    "string is missing its closing quote".to_string(),
                ),
                LexError::InvalidNumber => {
                    (Code::InvalidToken, "invalid number", format!("`{text}` is not a number"))
                }
                LexError::UnexpectedCharacter => {
                    (Code::InvalidToken, "invalid token", format!("unexpected `{text}`"))
                }
            };
            self.diagnostics.report(code, title, self.token.span, label);
        }
    }

    fn text(&self) -> &'a str {
        self.lexer.text(self.token.span)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.token.kind == kind
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        self.at(TokenKind::Name) && self.text() == keyword
    }

    fn at_close(&self, close: TokenKind) -> bool {
        self.at(close) || self.at(TokenKind::Eof)
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        let found = self.at(kind);
        if found {
            self.bump();
        }
        found
    }

    fn expect(&mut self, kind: TokenKind) {
        if !self.eat(kind) {
            self.unexpected(kind.describe());
        }
    }

    /// Moves past the current token if a list item failed to consume anything.
    fn ensure_progress(&mut self, start: u32) {
        if self.token.span.start == start && !self.at(TokenKind::Eof) {
            self.bump();
        }
    }

    fn unexpected(&mut self, expected: &str) {
        let (code, title) = if self.at(TokenKind::Eof) {
            (Code::UnexpectedEof, "unexpected end of input")
        } else {
            (Code::UnexpectedToken, "unexpected token")
        };
        let label = format!("expected {expected}, found {}", self.token.kind);
        self.diagnostics.report(code, title, self.token.span, label);
    }

    fn invalid(&mut self, title: &str, label: impl Into<String>) {
        self.diagnostics
            .report(Code::InvalidSyntax, title, self.token.span, label);
    }

    /// Skips to the next definition keyword or description outside braces.
    fn recover(&mut self) {
        self.bump();
        let mut braces = 0usize;
        loop {
            match self.token.kind {
                TokenKind::Eof => return,
                TokenKind::BraceL => braces += 1,
                TokenKind::BraceR => braces = braces.saturating_sub(1),
                TokenKind::String | TokenKind::BlockString if braces == 0 => return,
                TokenKind::Name if braces == 0 && DEFINITION_KEYWORDS.contains(&self.text()) => {
                    return;
                }
                _ => {}
            }
            self.bump();
        }
    }

    /// Enters one level of `[` or `{` nesting. Past the limit the whole group
    /// is reported once and skipped.
    fn enter(&mut self) -> bool {
        if self.depth < MAX_NESTING_DEPTH {
            self.depth += 1;
            return true;
        }
        self.diagnostics.report(
            Code::NestingTooDeep,
            "nesting too deep",
            self.token.span,
            format!("lists and objects nest at most {MAX_NESTING_DEPTH} levels"),
        );
        let mut open = 0usize;
        loop {
            match self.token.kind {
                TokenKind::BracketL | TokenKind::BraceL => open += 1,
                TokenKind::BracketR | TokenKind::BraceR => open = open.saturating_sub(1),
                TokenKind::Eof => return false,
                _ => {}
            }
            self.bump();
            if open == 0 {
                return false;
            }
        }
    }

    fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn document(&mut self) -> Document<'a> {
        let mut definitions = Vec::new();
        while !self.at(TokenKind::Eof) {
            match self.definition() {
                Some(definition) => definitions.push(definition),
                None => self.recover(),
            }
        }
        Document { definitions }
    }

    fn definition(&mut self) -> Option<Definition<'a>> {
        self.description();
        let keyword = if self.at(TokenKind::Name) { self.text() } else { "" };
        let definition = match keyword {
            "type" => Definition::Object(self.object_type()),
            "enum" => Definition::Enum(self.enum_type()),
            "interface" => self.interface(),
            "union" => self.union(),
            "input" => self.input(),
            "scalar" => self.scalar(),
            "schema" => self.schema(),
            "directive" => self.directive_definition(),
            "extend" => {
                self.invalid(
                    "type extensions are not supported",
                    "declare the fields on the type itself",
                );
                return None;
            }
            _ => {
                self.unexpected("a definition");
                return None;
            }
        };
        Some(definition)
    }

    fn description(&mut self) {
        if self.at(TokenKind::String) || self.at(TokenKind::BlockString) {
            self.bump();
        }
    }

    fn name(&mut self) -> Name {
        if !self.at(TokenKind::Name) {
            self.unexpected("name");
            return Name {
                value: self.interner.intern(""),
                span: Span::new(self.token.span.start, self.token.span.start),
            };
        }
        let name = Name {
            value: self.interner.intern(self.text()),
            span: self.token.span,
        };
        self.bump();
        name
    }

    fn object_type(&mut self) -> ObjectType<'a> {
        self.bump();
        let name = self.name();
        self.implements();
        let directives = self.directives();
        let fields = self.fields();
        ObjectType {
            name,
            directives,
            fields,
        }
    }

    fn enum_type(&mut self) -> EnumType {
        self.bump();
        let name = self.name();
        self.directives();
        let mut values = Vec::new();
        if self.eat(TokenKind::BraceL) {
            while !self.at_close(TokenKind::BraceR) {
                let start = self.token.span.start;
                self.description();
                if ["true", "false", "null"].iter().any(|k| self.at_keyword(k)) {
                    self.invalid(
                        "invalid enum value",
                        "`true`, `false` and `null` cannot be enum values",
                    );
                }
                values.push(self.name());
                self.directives();
                self.ensure_progress(start);
            }
            self.expect(TokenKind::BraceR);
        }
        EnumType { name, values }
    }

    fn other(kind: OtherKind, name: Option<Name>) -> Definition<'a> {
        Definition::Other(OtherDefinition { kind, name })
    }

    fn interface(&mut self) -> Definition<'a> {
        self.bump();
        let name = self.name();
        self.implements();
        self.directives();
        self.fields();
        Self::other(OtherKind::Interface, Some(name))
    }

    fn union(&mut self) -> Definition<'a> {
        self.bump();
        let name = self.name();
        self.directives();
        if self.eat(TokenKind::Equals) {
            self.eat(TokenKind::Pipe);
            self.name();
            while self.eat(TokenKind::Pipe) {
                self.name();
            }
        }
        Self::other(OtherKind::Union, Some(name))
    }

    fn input(&mut self) -> Definition<'a> {
        self.bump();
        let name = self.name();
        self.directives();
        if self.eat(TokenKind::BraceL) {
            self.input_values(TokenKind::BraceR);
            self.expect(TokenKind::BraceR);
        }
        Self::other(OtherKind::Input, Some(name))
    }

    fn scalar(&mut self) -> Definition<'a> {
        self.bump();
        let name = self.name();
        self.directives();
        Self::other(OtherKind::Scalar, Some(name))
    }

    fn schema(&mut self) -> Definition<'a> {
        self.bump();
        self.directives();
        self.expect(TokenKind::BraceL);
        while !self.at_close(TokenKind::BraceR) {
            if ["query", "mutation", "subscription"].iter().any(|k| self.at_keyword(k)) {
                self.bump();
            } else {
                self.unexpected("`query`, `mutation` or `subscription`");
                self.bump();
            }
            self.expect(TokenKind::Colon);
            self.name();
        }
        self.expect(TokenKind::BraceR);
        Self::other(OtherKind::Schema, None)
    }

    fn directive_definition(&mut self) -> Definition<'a> {
        self.bump();
        self.expect(TokenKind::At);
        let name = self.name();
        self.arguments_definition();
        if self.at_keyword("repeatable") {
            self.bump();
        }
        if self.at_keyword("on") {
            self.bump();
            self.eat(TokenKind::Pipe);
            loop {
                if self.at(TokenKind::Name) && DIRECTIVE_LOCATIONS.contains(&self.text()) {
                    self.bump();
                } else {
                    self.unexpected("a directive location");
                    break;
                }
                if !self.eat(TokenKind::Pipe) {
                    break;
                }
            }
        } else {
            self.unexpected("`on`");
        }
        Self::other(OtherKind::Directive, Some(name))
    }

    fn implements(&mut self) {
        if self.at_keyword("implements") {
            self.bump();
            self.eat(TokenKind::Amp);
            self.name();
            while self.eat(TokenKind::Amp) {
                self.name();
            }
        }
    }

    fn fields(&mut self) -> Vec<Field<'a>> {
        let mut fields = Vec::new();
        if !self.eat(TokenKind::BraceL) {
            return fields;
        }
        while !self.at_close(TokenKind::BraceR) {
            let start = self.token.span.start;
            self.description();
            let name = self.name();
            self.arguments_definition();
            self.expect(TokenKind::Colon);
            let ty = self.type_ref();
            let directives = self.directives();
            fields.push(Field {
                name,
                ty,
                directives,
            });
            self.ensure_progress(start);
        }
        self.expect(TokenKind::BraceR);
        fields
    }

    fn arguments_definition(&mut self) {
        if self.eat(TokenKind::ParenL) {
            self.input_values(TokenKind::ParenR);
            self.expect(TokenKind::ParenR);
        }
    }

    fn input_values(&mut self, close: TokenKind) {
        while !self.at_close(close) {
            let start = self.token.span.start;
            self.description();
            self.name();
            self.expect(TokenKind::Colon);
            self.type_ref();
            if self.eat(TokenKind::Equals) {
                self.value();
            }
            self.directives();
            self.ensure_progress(start);
        }
    }

    fn type_ref(&mut self) -> TypeRef {
        let ty = if self.at(TokenKind::BracketL) {
            if !self.enter() {
                return TypeRef::Named(Name {
                    value: self.interner.intern(""),
                    span: self.token.span,
                });
            }
            self.bump();
            let item = self.type_ref();
            self.expect(TokenKind::BracketR);
            self.leave();
            TypeRef::List(Box::new(item))
        } else {
            TypeRef::Named(self.name())
        };

        if self.eat(TokenKind::Bang) {
            TypeRef::NonNull(Box::new(ty))
        } else {
            ty
        }
    }

    fn directives(&mut self) -> Vec<Directive<'a>> {
        let mut directives = Vec::new();
        while self.eat(TokenKind::At) {
            let name = self.name();
            let mut arguments = Vec::new();
            if self.eat(TokenKind::ParenL) {
                while !self.at_close(TokenKind::ParenR) {
                    let start = self.token.span.start;
                    let name = self.name();
                    self.expect(TokenKind::Colon);
                    let value = self.value();
                    arguments.push(Argument { name, value });
                    self.ensure_progress(start);
                }
                self.expect(TokenKind::ParenR);
            }
            directives.push(Directive { name, arguments });
        }
        directives
    }

    fn value(&mut self) -> Value<'a> {
        let text = self.text();
        let value = match self.token.kind {
            TokenKind::Dollar => {
                self.bump();
                return Value::Variable(self.name());
            }
            TokenKind::BracketL => return self.list_value(),
            TokenKind::BraceL => return self.object_value(),
            TokenKind::Name if !matches!(text, "true" | "false" | "null") => {
                return Value::Enum(self.name());
            }
            TokenKind::Name => match text {
                "true" => Value::Boolean(true),
                "false" => Value::Boolean(false),
                _ => Value::Null,
            },
            TokenKind::Int => Value::Int(text),
            TokenKind::Float => Value::Float(text),
            TokenKind::String => match decode_string(&text[1..text.len() - 1]) {
                Ok(value) => Value::String(value),
                Err(escape) => {
                    self.invalid("invalid escape sequence", format!("`{escape}` is not a valid escape"));
                    Value::String(String::new())
                }
            },
            TokenKind::BlockString => Value::String(block_string_value(&text[3..text.len() - 3])),
            _ => {
                self.unexpected("a value");
                return Value::Null;
            }
        };
        self.bump();
        value
    }

    fn list_value(&mut self) -> Value<'a> {
        if !self.enter() {
            return Value::Null;
        }
        self.bump();
        let mut items = Vec::new();
        while !self.at_close(TokenKind::BracketR) {
            let start = self.token.span.start;
            items.push(self.value());
            self.ensure_progress(start);
        }
        self.expect(TokenKind::BracketR);
        self.leave();
        Value::List(items)
    }

    fn object_value(&mut self) -> Value<'a> {
        if !self.enter() {
            return Value::Null;
        }
        self.bump();
        let mut fields = Vec::new();
        while !self.at_close(TokenKind::BraceR) {
            let start = self.token.span.start;
            let name = self.name();
            self.expect(TokenKind::Colon);
            fields.push((name, self.value()));
            self.ensure_progress(start);
        }
        self.expect(TokenKind::BraceR);
        self.leave();
        Value::Object(fields)
    }
}
