use std::fmt;

use super::keyword::Keyword;
use crate::errors::Span;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum LiteralKind {
    /// ex. `1`, `1000`
    Decimal,
    /// ex. `0x1F`
    Hex,
    /// ex. `017`
    Octal,
    /// ex. `1.5`
    Float,
    /// ex. `'Hello world!'`, `"Hello"`
    String,
}

impl LiteralKind {
    /// Decimal, hexadecimal and octal literals are all integers.
    pub const fn is_integer(&self) -> bool {
        matches!(self, Self::Decimal | Self::Hex | Self::Octal)
    }
}

impl fmt::Display for LiteralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decimal => write!(f, "decimal"),
            Self::Hex => write!(f, "hexadecimal"),
            Self::Octal => write!(f, "octal"),
            Self::Float => write!(f, "float"),
            Self::String => write!(f, "string"),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Symbol {
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `:`
    Colon,
    /// `:=`
    Assign,
    /// `.`
    Dot,
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `=`
    Equals,
    /// `<>`
    NotEqual,
    /// `<`
    LessThan,
    /// `<=`
    LessThanEqual,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanEqual,
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comma => write!(f, ","),
            Self::Semicolon => write!(f, ";"),
            Self::Colon => write!(f, ":"),
            Self::Assign => write!(f, ":="),
            Self::Dot => write!(f, "."),
            Self::OpenParen => write!(f, "("),
            Self::CloseParen => write!(f, ")"),
            Self::Plus => write!(f, "+"),
            Self::Minus => write!(f, "-"),
            Self::Star => write!(f, "*"),
            Self::Slash => write!(f, "/"),
            Self::Equals => write!(f, "="),
            Self::NotEqual => write!(f, "<>"),
            Self::LessThan => write!(f, "<"),
            Self::LessThanEqual => write!(f, "<="),
            Self::GreaterThan => write!(f, ">"),
            Self::GreaterThanEqual => write!(f, ">="),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TokenKind {
    /// ex. `begin`, `WHILE`
    Keyword(Keyword),
    /// ex. `counter`
    Ident,
    /// ex. `1`, `'Hello'`, `1.5`
    Literal(LiteralKind),
    /// ex. `+`, `:=`, `<>`
    Symbol(Symbol),
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyword(keyword) => write!(f, "keyword `{}`", keyword.as_str()),
            Self::Ident => write!(f, "identifier"),
            Self::Literal(kind) => write!(f, "{} literal", kind),
            Self::Symbol(symbol) => write!(f, "`{}`", symbol),
        }
    }
}

/// A lexeme. `text` is the token exactly as written,
/// except for string literals, which lose their quotes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub column: usize,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            line: span.line,
            column: span.column,
            span,
        }
    }

    /// Creates a token at the given position
    /// without any source text to point into.
    pub fn at(kind: TokenKind, text: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
            column,
            span: Span::new(0, 0, line, column),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Literal(LiteralKind::String) => write!(f, "'{}'", self.text),
            _ => write!(f, "{}", self.text),
        }
    }
}
