use std::fmt;

use crate::{errors::Span, lexer::token::LiteralKind};

#[derive(Clone, Debug, PartialEq)]
pub struct Program {
    pub name: Identifier,
    pub declarations: Vec<Declaration>,
    pub body: Vec<Statement>,
    pub span: Span,
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "program {};", self.name)?;
        writeln!(f, "var")?;

        for declaration in &self.declarations {
            writeln!(f, "{}", declaration)?;
        }

        writeln!(f, "begin")?;

        for stmt in &self.body {
            writeln!(f, "{}", stmt)?;
        }

        write!(f, "end.")
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

impl Identifier {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The types a variable can be declared with.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum DeclaredType {
    Integer,
    Real,
    String,
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclaredType::Integer => write!(f, "integer"),
            DeclaredType::Real => write!(f, "real"),
            DeclaredType::String => write!(f, "string"),
        }
    }
}

/// `a, b, c: integer;`
#[derive(Clone, Debug, PartialEq)]
pub struct Declaration {
    pub names: Vec<Identifier>,
    pub ty: DeclaredType,
    pub span: Span,
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self
            .names
            .iter()
            .map(|name| name.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        write!(f, "{}: {};", names, self.ty)
    }
}

/// `target := value`, without the semicolon.
#[derive(Clone, Debug, PartialEq)]
pub struct Assignment {
    pub target: Identifier,
    pub value: Expression,
    pub span: Span,
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} := {}", self.target, self.value)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ForDirection {
    To,
    DownTo,
}

impl fmt::Display for ForDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForDirection::To => write!(f, "to"),
            ForDirection::DownTo => write!(f, "downto"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum IoStatement {
    /// `read(x);` or, if `newline` is set, `readln(x);`
    Read { target: Identifier, newline: bool },
    /// `write(a, b);` or, if `newline` is set, `writeln(a, b);`
    Write { args: Vec<Expression>, newline: bool },
}

impl fmt::Display for IoStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IoStatement::Read { target, newline } => {
                let name = if *newline { "readln" } else { "read" };
                write!(f, "{}({});", name, target)
            },

            IoStatement::Write { args, newline } => {
                let name = if *newline { "writeln" } else { "write" };
                let args = args
                    .iter()
                    .map(|arg| arg.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");

                write!(f, "{}({});", name, args)
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum StatementKind {
    Assignment(Assignment),

    /// `begin ... end;`
    Block(Vec<Statement>),

    /// `for i := 1 to n do ...`.
    /// `end` is always an identifier or an integer literal.
    For {
        init: Assignment,
        direction: ForDirection,
        end: Expression,
        body: Box<Statement>,
    },

    /// `while cond do ...`
    While {
        cond: Expression,
        body: Box<Statement>,
    },

    /// `if cond then ... else ...`.
    If {
        cond: Expression,
        then: Box<Statement>,
        otherwise: Option<Box<Statement>>,
    },

    Io(IoStatement),
    Break,
    Continue,
    /// A lone `;`.
    Empty,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    pub span: Span,
}

impl Statement {
    pub const fn new(kind: StatementKind, span: Span) -> Self {
        Self { kind, span }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            StatementKind::Assignment(assignment) => write!(f, "{};", assignment),

            StatementKind::Block(stmts) => {
                writeln!(f, "begin")?;

                for stmt in stmts {
                    writeln!(f, "{}", stmt)?;
                }

                write!(f, "end;")
            },

            StatementKind::For {
                init,
                direction,
                end,
                body,
            } => write!(f, "for {} {} {} do {}", init, direction, end, body),

            StatementKind::While { cond, body } => write!(f, "while {} do {}", cond, body),

            StatementKind::If {
                cond,
                then,
                otherwise: Some(otherwise),
            } => write!(f, "if {} then {} else {}", cond, then, otherwise),

            StatementKind::If {
                cond,
                then,
                otherwise: None,
            } => write!(f, "if {} then {}", cond, then),

            StatementKind::Io(io) => write!(f, "{}", io),
            StatementKind::Break => write!(f, "break;"),
            StatementKind::Continue => write!(f, "continue;"),
            StatementKind::Empty => write!(f, ";"),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UnaryOperator {
    Plus,
    Negative,
    Not,
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOperator::Plus => write!(f, "+"),
            UnaryOperator::Negative => write!(f, "-"),
            UnaryOperator::Not => write!(f, "not"),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    /// `/`
    Divide,
    /// `div`
    IntDivide,
    /// `mod`
    Modulo,
    Equal,
    NotEqual,
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
    And,
    Or,
}

impl BinaryOperator {
    pub const fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            Self::Add | Self::Subtract | Self::Multiply | Self::Divide | Self::IntDivide | Self::Modulo
        )
    }

    pub const fn is_relational(&self) -> bool {
        matches!(
            self,
            Self::Equal
                | Self::NotEqual
                | Self::LessThan
                | Self::LessThanEqual
                | Self::GreaterThan
                | Self::GreaterThanEqual
        )
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryOperator::Add => write!(f, "+"),
            BinaryOperator::Subtract => write!(f, "-"),
            BinaryOperator::Multiply => write!(f, "*"),
            BinaryOperator::Divide => write!(f, "/"),
            BinaryOperator::IntDivide => write!(f, "div"),
            BinaryOperator::Modulo => write!(f, "mod"),
            BinaryOperator::Equal => write!(f, "="),
            BinaryOperator::NotEqual => write!(f, "<>"),
            BinaryOperator::LessThan => write!(f, "<"),
            BinaryOperator::LessThanEqual => write!(f, "<="),
            BinaryOperator::GreaterThan => write!(f, ">"),
            BinaryOperator::GreaterThanEqual => write!(f, ">="),
            BinaryOperator::And => write!(f, "and"),
            BinaryOperator::Or => write!(f, "or"),
        }
    }
}

/// A literal exactly as written. String literals don't include their quotes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Literal {
    pub kind: LiteralKind,
    pub text: String,
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            LiteralKind::String => write!(f, "'{}'", self.text),
            _ => write!(f, "{}", self.text),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExpressionKind {
    /// A binary operation, ex. `x + y`.
    /// `op_span` points at the operator itself.
    Binary {
        lhs: Box<Expression>,
        op: BinaryOperator,
        op_span: Span,
        rhs: Box<Expression>,
    },

    /// A unary operation, ex. `-x`.
    Unary {
        op: UnaryOperator,
        op_span: Span,
        operand: Box<Expression>,
    },

    /// A literal, such as `4` or `'Hello'`.
    Literal(Literal),

    /// An identifier, ex. `foo`.
    Identifier(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub span: Span,
}

impl Expression {
    pub const fn new(kind: ExpressionKind, span: Span) -> Self {
        Self { kind, span }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExpressionKind::Binary { lhs, op, rhs, .. } => write!(f, "({} {} {})", lhs, op, rhs),
            ExpressionKind::Unary {
                op: UnaryOperator::Not,
                operand,
                ..
            } => write!(f, "not {}", operand),
            ExpressionKind::Unary { op, operand, .. } => write!(f, "{}{}", op, operand),
            ExpressionKind::Literal(literal) => write!(f, "{}", literal),
            ExpressionKind::Identifier(ident) => write!(f, "{}", ident),
        }
    }
}
