pub mod keyword;
pub mod token;

#[cfg(test)]
mod tests;

use pascalina_log::*;
use std::{fmt, iter::Peekable, str::Chars};
use thiserror::Error;

use self::{
    keyword::Keyword,
    token::{LiteralKind, Symbol, Token, TokenKind},
};
use crate::errors::{DiagnosticsContext, Span};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LexErrorKind {
    UnexpectedChar(char),
    UnterminatedString,
    UnterminatedComment,
    /// `0x` with no digits after it.
    EmptyHexLiteral,
    IntegerTooLarge(String),
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedChar(c) => write!(f, "unexpected character `{}`", c),
            Self::UnterminatedString => write!(f, "unterminated string literal"),
            Self::UnterminatedComment => write!(f, "unterminated comment"),
            Self::EmptyHexLiteral => write!(f, "expected hexadecimal digits after `0x`"),
            Self::IntegerTooLarge(text) => write!(f, "integer literal `{}` is too large", text),
        }
    }
}

/// Signals an error encountered during lexing.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("{kind} at line {line}, column {column}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub line: usize,
    pub column: usize,
    pub span: Span,
}

impl LexError {
    fn new(kind: LexErrorKind, span: Span) -> Self {
        Self {
            kind,
            line: span.line,
            column: span.column,
            span,
        }
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    pub fn report(&self, ctx: &DiagnosticsContext) {
        ctx.build_error_span(self.span, self.message()).emit();
    }
}

/// Keeps the lexer state during lexing.
struct Lexer<'src> {
    chars: Peekable<Chars<'src>>,
    /// Characters consumed so far.
    offset: usize,
    line: usize,
    column: usize,
}

impl<'src> Lexer<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            chars: source.chars().peekable(),
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    /// Looks one character past [`peek`](Lexer::peek).
    fn peek_second(&self) -> Option<char> {
        self.chars.clone().nth(1)
    }

    /// Consumes a character, keeping track of lines and columns.
    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.offset += 1;

        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(c)
    }

    fn bump_while(&mut self, res: &mut String, predicate: impl Fn(char) -> bool) {
        while let Some(c) = self.peek().filter(|&c| predicate(c)) {
            res.push(c);
            self.bump();
        }
    }

    /// A zero-length span at the current position,
    /// to be grown with [`Lexer::finish_span`].
    const fn start_span(&self) -> Span {
        Span::new(self.offset, 0, self.line, self.column)
    }

    fn finish_span(&self, mut span: Span) -> Span {
        span.length = self.offset - span.start;
        span
    }

    fn symbol(&mut self, span: Span, symbol: Symbol) -> Token {
        let span = self.finish_span(span);
        Token::new(TokenKind::Symbol(symbol), symbol.to_string(), span)
    }

    /// Returns `two` and consumes the next character if it is `next_char`.
    /// Otherwise, returns `one`. The current character must be consumed already.
    fn maybe_two_char(&mut self, span: Span, next_char: char, two: Symbol, one: Symbol) -> Token {
        if self.peek() == Some(next_char) {
            self.bump();
            self.symbol(span, two)
        } else {
            self.symbol(span, one)
        }
    }

    /// Try and yield the token that best fits the input.
    /// Returns Ok(Some(...)) if a token was lexed,
    /// Ok(None) if the source stream was exhausted,
    /// or Err(...) if an error occurred.
    fn lex_one_token(&mut self) -> Result<Option<Token>, LexError> {
        self.skip_whitespace_and_comments()?;

        let c = match self.peek() {
            Some(c) => c,
            None => return Ok(None),
        };

        let span = self.start_span();

        if c.is_ascii_alphabetic() || c == '_' {
            return Ok(Some(self.consume_ident_or_keyword(span)));
        }

        if c.is_ascii_digit() {
            return self.consume_number(span).map(Some);
        }

        if c == '\'' || c == '"' {
            return self.consume_string(span).map(Some);
        }

        self.bump();

        let res = match c {
            ',' => self.symbol(span, Symbol::Comma),
            ';' => self.symbol(span, Symbol::Semicolon),
            '.' => self.symbol(span, Symbol::Dot),
            '(' => self.symbol(span, Symbol::OpenParen),
            ')' => self.symbol(span, Symbol::CloseParen),
            '+' => self.symbol(span, Symbol::Plus),
            '-' => self.symbol(span, Symbol::Minus),
            '*' => self.symbol(span, Symbol::Star),
            '/' => self.symbol(span, Symbol::Slash),
            '=' => self.symbol(span, Symbol::Equals),
            ':' => self.maybe_two_char(span, '=', Symbol::Assign, Symbol::Colon),
            '>' => self.maybe_two_char(span, '=', Symbol::GreaterThanEqual, Symbol::GreaterThan),

            '<' => match self.peek() {
                Some('>') => {
                    self.bump();
                    self.symbol(span, Symbol::NotEqual)
                },

                _ => self.maybe_two_char(span, '=', Symbol::LessThanEqual, Symbol::LessThan),
            },

            _ => {
                let span = Span::new(span.start, 1, span.line, span.column);
                return Err(LexError::new(LexErrorKind::UnexpectedChar(c), span));
            },
        };

        Ok(Some(res))
    }

    /// Skips whitespace, `{ ... }` comments and `// ...` comments.
    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                },

                Some('{') => {
                    let span = self.start_span();

                    loop {
                        match self.bump() {
                            Some('}') => break,
                            Some(_) => {},

                            None => {
                                let span = Span::new(span.start, 1, span.line, span.column);
                                return Err(LexError::new(LexErrorKind::UnterminatedComment, span));
                            },
                        }
                    }
                },

                Some('/') if self.peek_second() == Some('/') => {
                    while self.peek().map_or(false, |c| c != '\n') {
                        self.bump();
                    }
                },

                _ => return Ok(()),
            }
        }
    }

    /// Take every character that could be considered part of an identifier
    /// and produce a keyword or identifier token.
    fn consume_ident_or_keyword(&mut self, span: Span) -> Token {
        let mut res = String::new();
        self.bump_while(&mut res, |c| c.is_ascii_alphanumeric() || c == '_');
        let span = self.finish_span(span);

        match Keyword::from_str(&res) {
            Some(keyword) => Token::new(TokenKind::Keyword(keyword), res, span),
            None => Token::new(TokenKind::Ident, res, span),
        }
    }

    /// Take every character that could be considered part of a number
    /// and produce an appropriate literal token.
    fn consume_number(&mut self, span: Span) -> Result<Token, LexError> {
        let mut num_str = String::new();

        if self.peek() == Some('0') && matches!(self.peek_second(), Some('x' | 'X')) {
            num_str.extend(self.bump());
            num_str.extend(self.bump());

            let digits_start = num_str.len();
            self.bump_while(&mut num_str, |c| c.is_ascii_hexdigit());
            let span = self.finish_span(span);
            let digits = &num_str[digits_start..];

            if digits.is_empty() {
                return Err(LexError::new(LexErrorKind::EmptyHexLiteral, span));
            }

            if i64::from_str_radix(digits, 16).is_err() {
                return Err(LexError::new(LexErrorKind::IntegerTooLarge(num_str), span));
            }

            return Ok(Token::new(TokenKind::Literal(LiteralKind::Hex), num_str, span));
        }

        self.bump_while(&mut num_str, |c| c.is_ascii_digit());

        // `1.5` is a float, but `1.` followed by anything else is
        // left for the parser to deal with
        if self.peek() == Some('.') && self.peek_second().map_or(false, |c| c.is_ascii_digit()) {
            num_str.extend(self.bump());
            self.bump_while(&mut num_str, |c| c.is_ascii_digit());
            let span = self.finish_span(span);

            return Ok(Token::new(TokenKind::Literal(LiteralKind::Float), num_str, span));
        }

        let span = self.finish_span(span);

        let (kind, digits, radix) = match num_str.strip_prefix('0') {
            Some(rest) if !rest.is_empty() && rest.chars().all(|c| ('0'..='7').contains(&c)) => {
                (LiteralKind::Octal, rest, 8)
            },

            _ => (LiteralKind::Decimal, num_str.as_str(), 10),
        };

        if i64::from_str_radix(digits, radix).is_err() {
            return Err(LexError::new(LexErrorKind::IntegerTooLarge(num_str), span));
        }

        Ok(Token::new(TokenKind::Literal(kind), num_str, span))
    }

    /// Consumes a string quoted with `'` or `"`. Strings end at the
    /// matching quote and can't span lines.
    fn consume_string(&mut self, span: Span) -> Result<Token, LexError> {
        // Discards the opening quote as a side effect
        let quote = self.bump();
        let mut res = String::new();

        loop {
            match self.peek() {
                Some(c) if Some(c) == quote => {
                    self.bump();
                    break;
                },

                Some('\n') | None => {
                    let span = self.finish_span(span);
                    return Err(LexError::new(LexErrorKind::UnterminatedString, span));
                },

                Some(c) => {
                    res.push(c);
                    self.bump();
                },
            }
        }

        let span = self.finish_span(span);
        Ok(Token::new(TokenKind::Literal(LiteralKind::String), res, span))
    }
}

/// Turn a source stream into a `Vec` of `Token`s.
pub fn lex(source: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer::new(source);
    let mut res = Vec::new();

    while let Some(token) = lexer.lex_one_token()? {
        res.push(token);
    }

    debug!("lexed {} tokens", res.len());
    Ok(res)
}
