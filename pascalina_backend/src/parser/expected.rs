use std::fmt;

use crate::lexer::{
    keyword::Keyword,
    token::{Symbol, TokenKind},
};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(super) enum ExpectLiteral {
    /// Represents any literal
    Any,
    /// Decimal, hexadecimal or octal
    Integer,
}

impl fmt::Display for ExpectLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpectLiteral::Any => write!(f, "any"),
            ExpectLiteral::Integer => write!(f, "integer"),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(super) enum Expected {
    Keyword(Keyword),
    Ident,
    Literal(ExpectLiteral),
    Symbol(Symbol),
}

impl Expected {
    pub(super) fn matches(&self, token_kind: &TokenKind) -> bool {
        match token_kind {
            TokenKind::Ident => self == &Self::Ident,
            TokenKind::Keyword(keyword) => self == &Self::Keyword(*keyword),
            TokenKind::Symbol(symbol) => self == &Self::Symbol(*symbol),

            TokenKind::Literal(kind) if kind.is_integer() => matches!(
                self,
                Self::Literal(ExpectLiteral::Any | ExpectLiteral::Integer)
            ),

            TokenKind::Literal(_) => self == &Self::Literal(ExpectLiteral::Any),
        }
    }
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Keyword(kw) => write!(f, "`{}`", kw.as_str()),
            Expected::Ident => write!(f, "identifier"),
            Expected::Literal(ExpectLiteral::Any) => write!(f, "literal"),
            Expected::Literal(kind) => write!(f, "{} literal", kind),
            Expected::Symbol(symbol) => write!(f, "`{}`", symbol),
        }
    }
}
