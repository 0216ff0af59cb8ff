pub mod ast;
mod expected;


use pascalina_log::*;
use std::{collections::HashSet, fmt, iter::Peekable, vec};
use thiserror::Error;

use self::{
    ast::*,
    expected::{ExpectLiteral, Expected},
};
use crate::{
    errors::{DiagnosticsContext, Span},
    lexer::{
        keyword::Keyword,
        token::{Symbol, Token, TokenKind},
    },
};

/// Tokens that can begin a statement, used to explain
/// what was expected when a statement can't be parsed.
const STATEMENT_START: [Expected; 12] = [
    Expected::Keyword(Keyword::For),
    Expected::Keyword(Keyword::Read),
    Expected::Keyword(Keyword::ReadLn),
    Expected::Keyword(Keyword::Write),
    Expected::Keyword(Keyword::WriteLn),
    Expected::Keyword(Keyword::While),
    Expected::Keyword(Keyword::If),
    Expected::Keyword(Keyword::Break),
    Expected::Keyword(Keyword::Continue),
    Expected::Keyword(Keyword::Begin),
    Expected::Symbol(Symbol::Semicolon),
    Expected::Ident,
];

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SyntaxErrorKind {
    UnexpectedToken { found: String, expected: Vec<String> },
    UnexpectedEof { expected: Vec<String> },
    /// Something follows the final `end.`
    TrailingTokens { found: String },
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedToken { found, expected } => {
                write!(f, "unexpected {}", found)?;
                write_expected(f, expected)
            },

            Self::UnexpectedEof { expected } => {
                write!(f, "unexpected end of input")?;
                write_expected(f, expected)
            },

            Self::TrailingTokens { found } => {
                write!(f, "unexpected token after end of program: {}", found)
            },
        }
    }
}

fn write_expected(f: &mut fmt::Formatter<'_>, expected: &[String]) -> fmt::Result {
    match expected {
        [] => Ok(()),
        [only] => write!(f, ", expected {}", only),
        [rest @ .., last] => write!(f, ", expected one of {} or {}", rest.join(", "), last),
    }
}

/// The first token that didn't fit the grammar.
/// Parsing stops at the first error.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("{kind} at line {line}, column {column}")]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub line: usize,
    pub column: usize,
    pub span: Span,
}

impl SyntaxError {
    fn new(kind: SyntaxErrorKind, span: Span) -> Self {
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
        match &self.kind {
            SyntaxErrorKind::UnexpectedEof { .. } => {
                ctx.build_error(self.message()).with_eof_span().emit()
            },

            SyntaxErrorKind::TrailingTokens { .. } => ctx
                .build_error(self.message())
                .span_label(self.span, "the program already ended")
                .help("remove everything after `end.`")
                .emit(),

            SyntaxErrorKind::UnexpectedToken { .. } => {
                ctx.build_error_span(self.span, self.message()).emit()
            },
        }
    }
}

/// Describes a token for an error message, ex. ``identifier `x` ``.
fn describe(token: &Token) -> String {
    match token.kind {
        TokenKind::Ident => format!("identifier `{}`", token.text),
        TokenKind::Literal(kind) => format!("{} literal `{}`", kind, token),
        kind => kind.to_string(),
    }
}

/// Holds the parser's state.
struct Parser {
    tokens: Peekable<vec::IntoIter<Token>>,
    /// A set of expected tokens for diagnostic purposes.
    /// This allows for errors such as
    /// ``unexpected identifier `x`, expected `:=` ``.
    expected_items: HashSet<Expected>,
    /// Span of the last consumed token.
    /// Errors at the end of input are reported here.
    last_span: Span,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into_iter().peekable(),
            expected_items: HashSet::new(),
            last_span: Span::new(0, 0, 1, 1),
        }
    }

    /// Get the next token.
    /// This exists because it has some other responsibilities,
    /// like clearing `expected_items`.
    fn bump(&mut self) -> Option<Token> {
        self.expected_items.clear();
        let token = self.tokens.next()?;
        self.last_span = token.span;
        Some(token)
    }

    fn peek_kind(&mut self) -> Option<TokenKind> {
        self.tokens.peek().map(|token| token.kind)
    }

    /// Builds an error describing the next token (or the end of input)
    /// along with everything that was expected in its place.
    fn unexpected(&mut self) -> SyntaxError {
        let mut expected = self
            .expected_items
            .drain()
            .map(|x| x.to_string())
            .collect::<Vec<_>>();

        expected.sort();

        match self.tokens.peek() {
            Some(token) => SyntaxError::new(
                SyntaxErrorKind::UnexpectedToken {
                    found: describe(token),
                    expected,
                },
                token.span,
            ),

            None => SyntaxError::new(SyntaxErrorKind::UnexpectedEof { expected }, self.last_span),
        }
    }

    /// Checks if the next token matches this expectation.
    fn check_next(&mut self, expected: Expected) -> bool {
        self.expected_items.insert(expected);

        match self.tokens.peek() {
            Some(Token { kind, .. }) => expected.matches(kind),
            _ => false,
        }
    }

    /// Consumes the next token if it matches `expected`.
    fn eat(&mut self, expected: Expected) -> bool {
        let res = self.check_next(expected);

        if res {
            self.bump();
        }

        res
    }

    /// Consumes and returns the next token if it matches
    /// `expected`. Otherwise, fails with a syntax error.
    fn expect_item(&mut self, expected: Expected) -> Result<Token, SyntaxError> {
        if self.check_next(expected) {
            if let Some(token) = self.bump() {
                return Ok(token);
            }
        }

        Err(self.unexpected())
    }

    fn expect_ident(&mut self) -> Result<Identifier, SyntaxError> {
        let token = self.expect_item(Expected::Ident)?;
        Ok(Identifier::new(token.text, token.span))
    }

    /// The entry point for the parser.
    /// `program name; var ... begin ... end.`
    fn parse_program(&mut self) -> Result<Program, SyntaxError> {
        let mut span = self.expect_item(Expected::Keyword(Keyword::Program))?.span;
        let name = self.expect_ident()?;
        self.expect_item(Expected::Symbol(Symbol::Semicolon))?;

        let declarations = self.parse_declarations()?;

        self.expect_item(Expected::Keyword(Keyword::Begin))?;
        let body = self.parse_statement_list()?;
        self.expect_item(Expected::Keyword(Keyword::End))?;

        let dot_span = self.expect_item(Expected::Symbol(Symbol::Dot))?.span;
        span.grow_to_contain(&dot_span);

        if let Some(token) = self.tokens.peek() {
            return Err(SyntaxError::new(
                SyntaxErrorKind::TrailingTokens {
                    found: describe(token),
                },
                token.span,
            ));
        }

        Ok(Program {
            name,
            declarations,
            body,
            span,
        })
    }

    fn parse_declarations(&mut self) -> Result<Vec<Declaration>, SyntaxError> {
        self.expect_item(Expected::Keyword(Keyword::Var))?;
        let mut res = Vec::new();

        while self.check_next(Expected::Ident) {
            res.push(self.parse_declaration()?);
        }

        Ok(res)
    }

    /// `a, b: integer;`
    fn parse_declaration(&mut self) -> Result<Declaration, SyntaxError> {
        let mut names = vec![self.expect_ident()?];

        while self.eat(Expected::Symbol(Symbol::Comma)) {
            names.push(self.expect_ident()?);
        }

        self.expect_item(Expected::Symbol(Symbol::Colon))?;

        let ty = if self.eat(Expected::Keyword(Keyword::Integer)) {
            DeclaredType::Integer
        } else if self.eat(Expected::Keyword(Keyword::Real)) {
            DeclaredType::Real
        } else if self.eat(Expected::Keyword(Keyword::String)) {
            DeclaredType::String
        } else {
            return Err(self.unexpected());
        };

        let semicolon_span = self.expect_item(Expected::Symbol(Symbol::Semicolon))?.span;
        let mut span = names[0].span;
        span.grow_to_contain(&semicolon_span);

        Ok(Declaration { names, ty, span })
    }

    /// Parses statements until `end`, `else`, `.` or the end of input.
    /// The terminator isn't consumed.
    fn parse_statement_list(&mut self) -> Result<Vec<Statement>, SyntaxError> {
        let mut res = Vec::new();

        loop {
            match self.peek_kind() {
                None
                | Some(TokenKind::Keyword(Keyword::End | Keyword::Else))
                | Some(TokenKind::Symbol(Symbol::Dot)) => break,

                Some(_) => res.push(self.parse_statement()?),
            }
        }

        Ok(res)
    }

    fn parse_statement(&mut self) -> Result<Statement, SyntaxError> {
        match self.peek_kind() {
            Some(TokenKind::Keyword(Keyword::For)) => self.parse_for(),

            Some(TokenKind::Keyword(
                Keyword::Read | Keyword::ReadLn | Keyword::Write | Keyword::WriteLn,
            )) => self.parse_io(),

            Some(TokenKind::Keyword(Keyword::While)) => self.parse_while(),
            Some(TokenKind::Keyword(Keyword::If)) => self.parse_if(),
            Some(TokenKind::Keyword(Keyword::Break)) => {
                self.parse_loop_control(Keyword::Break, StatementKind::Break)
            },
            Some(TokenKind::Keyword(Keyword::Continue)) => {
                self.parse_loop_control(Keyword::Continue, StatementKind::Continue)
            },

            Some(TokenKind::Symbol(Symbol::Semicolon)) => {
                let span = self.expect_item(Expected::Symbol(Symbol::Semicolon))?.span;
                Ok(Statement::new(StatementKind::Empty, span))
            },

            Some(TokenKind::Keyword(Keyword::Begin)) => self.parse_block(),

            Some(TokenKind::Ident) => {
                let assignment = self.parse_assignment()?;
                let mut span = assignment.span;
                let semicolon_span = self.expect_item(Expected::Symbol(Symbol::Semicolon))?.span;
                span.grow_to_contain(&semicolon_span);

                Ok(Statement::new(StatementKind::Assignment(assignment), span))
            },

            _ => {
                self.expected_items.extend(STATEMENT_START.iter().copied());
                Err(self.unexpected())
            },
        }
    }

    /// `break;` or `continue;`
    fn parse_loop_control(
        &mut self,
        keyword: Keyword,
        kind: StatementKind,
    ) -> Result<Statement, SyntaxError> {
        let mut span = self.expect_item(Expected::Keyword(keyword))?.span;
        let semicolon_span = self.expect_item(Expected::Symbol(Symbol::Semicolon))?.span;
        span.grow_to_contain(&semicolon_span);

        Ok(Statement::new(kind, span))
    }

    /// `begin ... end;`
    fn parse_block(&mut self) -> Result<Statement, SyntaxError> {
        let mut span = self.expect_item(Expected::Keyword(Keyword::Begin))?.span;
        let stmts = self.parse_statement_list()?;
        self.expect_item(Expected::Keyword(Keyword::End))?;

        let semicolon_span = self.expect_item(Expected::Symbol(Symbol::Semicolon))?.span;
        span.grow_to_contain(&semicolon_span);

        Ok(Statement::new(StatementKind::Block(stmts), span))
    }

    /// `x := expr`, without the semicolon.
    fn parse_assignment(&mut self) -> Result<Assignment, SyntaxError> {
        let target = self.expect_ident()?;
        self.expect_item(Expected::Symbol(Symbol::Assign))?;
        let value = self.parse_expression()?;

        let mut span = target.span;
        span.grow_to_contain(&value.span);

        Ok(Assignment {
            target,
            value,
            span,
        })
    }

    fn parse_for(&mut self) -> Result<Statement, SyntaxError> {
        let mut span = self.expect_item(Expected::Keyword(Keyword::For))?.span;
        let init = self.parse_assignment()?;

        let direction = if self.eat(Expected::Keyword(Keyword::To)) {
            ForDirection::To
        } else if self.eat(Expected::Keyword(Keyword::DownTo)) {
            ForDirection::DownTo
        } else {
            return Err(self.unexpected());
        };

        // The bound is deliberately restricted to a name or an integer
        let end = if self.check_next(Expected::Ident) {
            let ident = self.expect_ident()?;
            Expression::new(ExpressionKind::Identifier(ident.name), ident.span)
        } else if self.check_next(Expected::Literal(ExpectLiteral::Integer)) {
            self.parse_literal()?
        } else {
            return Err(self.unexpected());
        };

        self.expect_item(Expected::Keyword(Keyword::Do))?;
        let body = self.parse_statement()?;
        span.grow_to_contain(&body.span);

        Ok(Statement::new(
            StatementKind::For {
                init,
                direction,
                end,
                body: Box::new(body),
            },
            span,
        ))
    }

    fn parse_while(&mut self) -> Result<Statement, SyntaxError> {
        let mut span = self.expect_item(Expected::Keyword(Keyword::While))?.span;
        let cond = self.parse_expression()?;
        self.expect_item(Expected::Keyword(Keyword::Do))?;
        let body = self.parse_statement()?;
        span.grow_to_contain(&body.span);

        Ok(Statement::new(
            StatementKind::While {
                cond,
                body: Box::new(body),
            },
            span,
        ))
    }

    fn parse_if(&mut self) -> Result<Statement, SyntaxError> {
        let mut span = self.expect_item(Expected::Keyword(Keyword::If))?.span;
        let cond = self.parse_expression()?;
        self.expect_item(Expected::Keyword(Keyword::Then))?;
        let then = self.parse_statement()?;
        span.grow_to_contain(&then.span);

        let otherwise = if self.eat(Expected::Keyword(Keyword::Else)) {
            let otherwise = self.parse_statement()?;
            span.grow_to_contain(&otherwise.span);
            Some(Box::new(otherwise))
        } else {
            None
        };

        Ok(Statement::new(
            StatementKind::If {
                cond,
                then: Box::new(then),
                otherwise,
            },
            span,
        ))
    }

    /// `read(x);`, `readln(x);`, `write(a, ...);` or `writeln(a, ...);`
    fn parse_io(&mut self) -> Result<Statement, SyntaxError> {
        let (keyword, mut span) = match self.bump() {
            Some(Token {
                kind: TokenKind::Keyword(keyword),
                span,
                ..
            }) => (keyword, span),

            _ => return Err(self.unexpected()),
        };

        self.expect_item(Expected::Symbol(Symbol::OpenParen))?;

        let io = match keyword {
            Keyword::Read | Keyword::ReadLn => IoStatement::Read {
                target: self.expect_ident()?,
                newline: keyword == Keyword::ReadLn,
            },

            _ => {
                let mut args = vec![self.parse_write_arg()?];

                while self.eat(Expected::Symbol(Symbol::Comma)) {
                    args.push(self.parse_write_arg()?);
                }

                IoStatement::Write {
                    args,
                    newline: keyword == Keyword::WriteLn,
                }
            },
        };

        self.expect_item(Expected::Symbol(Symbol::CloseParen))?;
        let semicolon_span = self.expect_item(Expected::Symbol(Symbol::Semicolon))?.span;
        span.grow_to_contain(&semicolon_span);

        Ok(Statement::new(StatementKind::Io(io), span))
    }

    /// Arguments to `write` are single literals or names, not expressions.
    fn parse_write_arg(&mut self) -> Result<Expression, SyntaxError> {
        if self.check_next(Expected::Ident) {
            let ident = self.expect_ident()?;
            Ok(Expression::new(
                ExpressionKind::Identifier(ident.name),
                ident.span,
            ))
        } else if self.check_next(Expected::Literal(ExpectLiteral::Any)) {
            self.parse_literal()
        } else {
            Err(self.unexpected())
        }
    }

    fn parse_literal(&mut self) -> Result<Expression, SyntaxError> {
        let token = self.expect_item(Expected::Literal(ExpectLiteral::Any))?;

        let kind = match token.kind {
            TokenKind::Literal(kind) => kind,
            _ => return Err(self.unexpected()),
        };

        Ok(Expression::new(
            ExpressionKind::Literal(Literal {
                kind,
                text: token.text,
            }),
            token.span,
        ))
    }

    fn parse_expression(&mut self) -> Result<Expression, SyntaxError> {
        self.parse_or()
    }

    /// Builds a left-associative chain of binary operations, where each operand
    /// is parsed by `operand` and `operator` recognizes the next token.
    fn parse_binary_level(
        &mut self,
        operand: fn(&mut Self) -> Result<Expression, SyntaxError>,
        operator: fn(TokenKind) -> Option<BinaryOperator>,
        expected: &[Expected],
    ) -> Result<Expression, SyntaxError> {
        let mut lhs = operand(self)?;

        loop {
            self.expected_items.extend(expected.iter().copied());

            let op = match self.peek_kind().and_then(operator) {
                Some(op) => op,
                None => break,
            };

            let op_span = self.bump().map(|token| token.span).unwrap_or_default();
            let rhs = operand(self)?;
            let mut span = lhs.span;
            span.grow_to_contain(&rhs.span);

            lhs = Expression::new(
                ExpressionKind::Binary {
                    lhs: Box::new(lhs),
                    op,
                    op_span,
                    rhs: Box::new(rhs),
                },
                span,
            );
        }

        Ok(lhs)
    }

    fn parse_or(&mut self) -> Result<Expression, SyntaxError> {
        self.parse_binary_level(
            Self::parse_and,
            |kind| match kind {
                TokenKind::Keyword(Keyword::Or) => Some(BinaryOperator::Or),
                _ => None,
            },
            &[Expected::Keyword(Keyword::Or)],
        )
    }

    fn parse_and(&mut self) -> Result<Expression, SyntaxError> {
        self.parse_binary_level(
            Self::parse_not,
            |kind| match kind {
                TokenKind::Keyword(Keyword::And) => Some(BinaryOperator::And),
                _ => None,
            },
            &[Expected::Keyword(Keyword::And)],
        )
    }

    /// `not` binds looser than the relational operators,
    /// so `not a = b` is `not (a = b)`.
    fn parse_not(&mut self) -> Result<Expression, SyntaxError> {
        if self.check_next(Expected::Keyword(Keyword::Not)) {
            self.parse_prefix(UnaryOperator::Not, Self::parse_not)
        } else {
            self.parse_relational()
        }
    }

    fn parse_relational(&mut self) -> Result<Expression, SyntaxError> {
        self.parse_binary_level(
            Self::parse_additive,
            |kind| match kind {
                TokenKind::Symbol(Symbol::Equals) => Some(BinaryOperator::Equal),
                TokenKind::Symbol(Symbol::NotEqual) => Some(BinaryOperator::NotEqual),
                TokenKind::Symbol(Symbol::LessThan) => Some(BinaryOperator::LessThan),
                TokenKind::Symbol(Symbol::LessThanEqual) => Some(BinaryOperator::LessThanEqual),
                TokenKind::Symbol(Symbol::GreaterThan) => Some(BinaryOperator::GreaterThan),
                TokenKind::Symbol(Symbol::GreaterThanEqual) => {
                    Some(BinaryOperator::GreaterThanEqual)
                },
                _ => None,
            },
            &[
                Expected::Symbol(Symbol::Equals),
                Expected::Symbol(Symbol::NotEqual),
                Expected::Symbol(Symbol::LessThan),
                Expected::Symbol(Symbol::LessThanEqual),
                Expected::Symbol(Symbol::GreaterThan),
                Expected::Symbol(Symbol::GreaterThanEqual),
            ],
        )
    }

    fn parse_additive(&mut self) -> Result<Expression, SyntaxError> {
        self.parse_binary_level(
            Self::parse_multiplicative,
            |kind| match kind {
                TokenKind::Symbol(Symbol::Plus) => Some(BinaryOperator::Add),
                TokenKind::Symbol(Symbol::Minus) => Some(BinaryOperator::Subtract),
                _ => None,
            },
            &[Expected::Symbol(Symbol::Plus), Expected::Symbol(Symbol::Minus)],
        )
    }

    fn parse_multiplicative(&mut self) -> Result<Expression, SyntaxError> {
        self.parse_binary_level(
            Self::parse_unary,
            |kind| match kind {
                TokenKind::Symbol(Symbol::Star) => Some(BinaryOperator::Multiply),
                TokenKind::Symbol(Symbol::Slash) => Some(BinaryOperator::Divide),
                TokenKind::Keyword(Keyword::Div) => Some(BinaryOperator::IntDivide),
                TokenKind::Keyword(Keyword::Mod) => Some(BinaryOperator::Modulo),
                _ => None,
            },
            &[
                Expected::Symbol(Symbol::Star),
                Expected::Symbol(Symbol::Slash),
                Expected::Keyword(Keyword::Div),
                Expected::Keyword(Keyword::Mod),
            ],
        )
    }

    fn parse_unary(&mut self) -> Result<Expression, SyntaxError> {
        if self.check_next(Expected::Symbol(Symbol::Plus)) {
            self.parse_prefix(UnaryOperator::Plus, Self::parse_unary)
        } else if self.check_next(Expected::Symbol(Symbol::Minus)) {
            self.parse_prefix(UnaryOperator::Negative, Self::parse_unary)
        } else {
            self.parse_factor()
        }
    }

    /// Consumes a prefix operator and applies it to whatever `operand` parses.
    fn parse_prefix(
        &mut self,
        op: UnaryOperator,
        operand: fn(&mut Self) -> Result<Expression, SyntaxError>,
    ) -> Result<Expression, SyntaxError> {
        let op_span = self.bump().map(|token| token.span).unwrap_or_default();
        let operand = operand(self)?;
        let mut span = op_span;
        span.grow_to_contain(&operand.span);

        Ok(Expression::new(
            ExpressionKind::Unary {
                op,
                op_span,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    /// A literal, a name, or a parenthesized expression.
    fn parse_factor(&mut self) -> Result<Expression, SyntaxError> {
        if self.check_next(Expected::Literal(ExpectLiteral::Any)) {
            self.parse_literal()
        } else if self.check_next(Expected::Ident) {
            let ident = self.expect_ident()?;
            Ok(Expression::new(
                ExpressionKind::Identifier(ident.name),
                ident.span,
            ))
        } else if self.check_next(Expected::Symbol(Symbol::OpenParen)) {
            let mut span = self.expect_item(Expected::Symbol(Symbol::OpenParen))?.span;
            let mut expr = self.parse_expression()?;
            let close_paren_span = self.expect_item(Expected::Symbol(Symbol::CloseParen))?.span;
            span.grow_to_contain(&close_paren_span);
            expr.span = span;

            Ok(expr)
        } else {
            Err(self.unexpected())
        }
    }
}

/// Parse the given `Vec` of `Token`s into a program.
pub fn parse(tokens: Vec<Token>) -> Result<Program, SyntaxError> {
    let mut parser = Parser::new(tokens);
    let res = parser.parse_program()?;

    debug!(
        "parsed program `{}` with {} statements",
        res.name,
        res.body.len()
    );

    Ok(res)
}
