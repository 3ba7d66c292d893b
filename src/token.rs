//! Lexical tokens.

use std::fmt;

/// Zero-based location in the source text.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// Byte offset into the input.
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

/// Half-open source range `[start, end)`.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Span { start, end }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn join(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}:{}", self.start.line, self.start.column, self.end.line, self.end.column)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Property name, or one of the literals `\T` / `\F`.
    Atom,
    Operator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Option<Span>,
}

impl Token {
    pub fn atom(text: impl Into<String>) -> Self {
        Token {
            kind: TokenKind::Atom,
            text: text.into(),
            span: None,
        }
    }

    pub fn operator(text: impl Into<String>) -> Self {
        Token {
            kind: TokenKind::Operator,
            text: text.into(),
            span: None,
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn is_atom(&self) -> bool {
        self.kind == TokenKind::Atom
    }

    pub fn is_operator(&self) -> bool {
        self.kind == TokenKind::Operator
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}
