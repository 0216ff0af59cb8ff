mod types;

#[cfg(test)]
mod tests;

use pascalina_log::*;
use std::fmt;
use thiserror::Error;

pub use self::types::{SymbolTable, Type};
use crate::{
    errors::{DiagnosticsContext, Span},
    lexer::token::LiteralKind,
    parser::ast::{
        Assignment, BinaryOperator, Expression, ExpressionKind, IoStatement, Literal, Program,
        Statement, StatementKind, UnaryOperator,
    },
};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SemanticErrorKind {
    Redeclared {
        name: String,
        previous: Span,
    },
    Undeclared {
        name: String,
    },
    MismatchedAssignment {
        name: String,
        target: Type,
        found: Type,
        value: Span,
    },
    /// Arithmetic or sign operator applied to a non-number.
    NonNumericOperand {
        operator: String,
        found: Type,
        operand: Span,
    },
    /// `div` or `mod` applied to a real.
    IntegerOperandRequired {
        operator: String,
        found: Type,
        operand: Span,
    },
    Incomparable {
        lhs: Type,
        rhs: Type,
    },
    /// `and`, `or` or `not` applied to a non-boolean.
    NonBooleanOperand {
        operator: String,
        found: Type,
        operand: Span,
    },
    NonBooleanCondition {
        found: Type,
    },
    ForEndMismatch {
        name: String,
        target: Type,
        found: Type,
    },
    LoopControlOutsideLoop {
        keyword: &'static str,
    },
}

impl fmt::Display for SemanticErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Redeclared { name, .. } => {
                write!(f, "variable `{}` is declared more than once", name)
            },
            Self::Undeclared { name } => write!(f, "variable `{}` not declared", name),
            Self::MismatchedAssignment {
                name,
                target,
                found,
                ..
            } => write!(
                f,
                "mismatched types: cannot assign {} to `{}` of type {}",
                found, name, target
            ),
            Self::NonNumericOperand {
                operator, found, ..
            } => write!(
                f,
                "operator `{}` needs numeric operands, found {}",
                operator, found
            ),
            Self::IntegerOperandRequired {
                operator, found, ..
            } => write!(
                f,
                "operator `{}` needs integer operands, found {}",
                operator, found
            ),
            Self::Incomparable { lhs, rhs } => write!(f, "cannot compare {} with {}", lhs, rhs),
            Self::NonBooleanOperand {
                operator, found, ..
            } => write!(
                f,
                "operator `{}` needs boolean operands, found {}",
                operator, found
            ),
            Self::NonBooleanCondition { found } => {
                write!(f, "condition must be boolean, found {}", found)
            },
            Self::ForEndMismatch {
                name,
                target,
                found,
            } => write!(
                f,
                "loop bound of type {} doesn't fit `{}` of type {}",
                found, name, target
            ),
            Self::LoopControlOutsideLoop { keyword } => {
                write!(f, "`{}` outside of a loop", keyword)
            },
        }
    }
}

/// The first rule violation found in a program.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("{kind} at line {line}, column {column}")]
pub struct SemanticError {
    pub kind: SemanticErrorKind,
    pub line: usize,
    pub column: usize,
    pub span: Span,
}

impl SemanticError {
    fn new(kind: SemanticErrorKind, span: Span) -> Self {
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
        let diagnostic = ctx.build_error_span(self.span, self.message());

        let diagnostic = match &self.kind {
            SemanticErrorKind::Redeclared { previous, .. } => {
                diagnostic.note_label(*previous, "first declared here")
            },

            SemanticErrorKind::MismatchedAssignment { found, value, .. } => {
                diagnostic.note_label(*value, format!("this is {}", found))
            },

            SemanticErrorKind::NonNumericOperand { found, operand, .. }
            | SemanticErrorKind::IntegerOperandRequired { found, operand, .. }
            | SemanticErrorKind::NonBooleanOperand { found, operand, .. } => {
                diagnostic.note_label(*operand, format!("this is {}", found))
            },

            SemanticErrorKind::Undeclared { name } => {
                diagnostic.help(format!("add `{}` to the `var` section", name))
            },

            SemanticErrorKind::LoopControlOutsideLoop { .. } => {
                diagnostic.note("only `for` and `while` loops can be exited early")
            },

            _ => diagnostic,
        };

        diagnostic.emit();
    }
}

struct Analyzer {
    symbols: SymbolTable,
    /// How many loops enclose the statement being checked.
    loop_depth: usize,
}

impl Analyzer {
    fn new() -> Self {
        Self {
            symbols: SymbolTable::new(),
            loop_depth: 0,
        }
    }

    fn check_program(&mut self, program: &Program) -> Result<(), SemanticError> {
        for declaration in &program.declarations {
            let ty = Type::from(declaration.ty);

            for ident in &declaration.names {
                if let Err(previous) = self.symbols.declare(&ident.name, ty, ident.span) {
                    return Err(SemanticError::new(
                        SemanticErrorKind::Redeclared {
                            name: ident.name.clone(),
                            previous,
                        },
                        ident.span,
                    ));
                }
            }
        }

        for stmt in &program.body {
            self.check_statement(stmt)?;
        }

        Ok(())
    }

    fn lookup(&self, name: &str, span: Span) -> Result<Type, SemanticError> {
        self.symbols.get(name).ok_or_else(|| {
            SemanticError::new(
                SemanticErrorKind::Undeclared {
                    name: name.to_owned(),
                },
                span,
            )
        })
    }

    fn check_statement(&mut self, stmt: &Statement) -> Result<(), SemanticError> {
        match &stmt.kind {
            StatementKind::Assignment(assignment) => {
                self.check_assignment(assignment)?;
            },

            StatementKind::Block(stmts) => {
                for stmt in stmts {
                    self.check_statement(stmt)?;
                }
            },

            StatementKind::For {
                init, end, body, ..
            } => {
                let target = self.check_assignment(init)?;
                let found = self.check_expression(end)?;

                if !target.accepts(found) {
                    return Err(SemanticError::new(
                        SemanticErrorKind::ForEndMismatch {
                            name: init.target.name.clone(),
                            target,
                            found,
                        },
                        end.span,
                    ));
                }

                self.check_loop_body(body)?;
            },

            StatementKind::While { cond, body } => {
                self.check_condition(cond)?;
                self.check_loop_body(body)?;
            },

            StatementKind::If {
                cond,
                then,
                otherwise,
            } => {
                self.check_condition(cond)?;
                self.check_statement(then)?;

                if let Some(otherwise) = otherwise {
                    self.check_statement(otherwise)?;
                }
            },

            StatementKind::Io(IoStatement::Read { target, .. }) => {
                self.lookup(&target.name, target.span)?;
            },

            StatementKind::Io(IoStatement::Write { args, .. }) => {
                for arg in args {
                    self.check_expression(arg)?;
                }
            },

            StatementKind::Break | StatementKind::Continue if self.loop_depth == 0 => {
                let keyword = match stmt.kind {
                    StatementKind::Break => "break",
                    _ => "continue",
                };

                return Err(SemanticError::new(
                    SemanticErrorKind::LoopControlOutsideLoop { keyword },
                    stmt.span,
                ));
            },

            StatementKind::Break | StatementKind::Continue | StatementKind::Empty => {},
        }

        Ok(())
    }

    fn check_loop_body(&mut self, body: &Statement) -> Result<(), SemanticError> {
        self.loop_depth += 1;
        let res = self.check_statement(body);
        self.loop_depth -= 1;
        res
    }

    /// Returns the type of the assignment's target.
    fn check_assignment(&self, assignment: &Assignment) -> Result<Type, SemanticError> {
        let target = self.lookup(&assignment.target.name, assignment.target.span)?;
        let found = self.check_expression(&assignment.value)?;

        if !target.accepts(found) {
            return Err(SemanticError::new(
                SemanticErrorKind::MismatchedAssignment {
                    name: assignment.target.name.clone(),
                    target,
                    found,
                    value: assignment.value.span,
                },
                assignment.target.span,
            ));
        }

        Ok(target)
    }

    fn check_condition(&self, cond: &Expression) -> Result<(), SemanticError> {
        match self.check_expression(cond)? {
            Type::Boolean => Ok(()),

            found => Err(SemanticError::new(
                SemanticErrorKind::NonBooleanCondition { found },
                cond.span,
            )),
        }
    }

    fn check_expression(&self, expr: &Expression) -> Result<Type, SemanticError> {
        match &expr.kind {
            ExpressionKind::Literal(Literal { kind, .. }) => Ok(match kind {
                LiteralKind::Decimal | LiteralKind::Hex | LiteralKind::Octal => Type::Integer,
                LiteralKind::Float => Type::Real,
                LiteralKind::String => Type::String,
            }),

            ExpressionKind::Identifier(name) => self.lookup(name, expr.span),

            ExpressionKind::Unary {
                op,
                op_span,
                operand,
            } => {
                let found = self.check_expression(operand)?;

                match op {
                    UnaryOperator::Not => {
                        expect_boolean(op.to_string(), found, operand.span, *op_span)?;
                        Ok(Type::Boolean)
                    },

                    UnaryOperator::Plus | UnaryOperator::Negative => {
                        expect_numeric(op.to_string(), found, operand.span, *op_span)?;
                        Ok(found)
                    },
                }
            },

            ExpressionKind::Binary {
                lhs,
                op,
                op_span,
                rhs,
            } => {
                let lhs_ty = self.check_expression(lhs)?;
                let rhs_ty = self.check_expression(rhs)?;
                self.check_binary(*op, *op_span, (lhs_ty, lhs.span), (rhs_ty, rhs.span))
            },
        }
    }

    fn check_binary(
        &self,
        op: BinaryOperator,
        op_span: Span,
        (lhs, lhs_span): (Type, Span),
        (rhs, rhs_span): (Type, Span),
    ) -> Result<Type, SemanticError> {
        match op {
            BinaryOperator::IntDivide | BinaryOperator::Modulo => {
                for (found, span) in [(lhs, lhs_span), (rhs, rhs_span)] {
                    expect_numeric(op.to_string(), found, span, op_span)?;

                    if found != Type::Integer {
                        return Err(SemanticError::new(
                            SemanticErrorKind::IntegerOperandRequired {
                                operator: op.to_string(),
                                found,
                                operand: span,
                            },
                            op_span,
                        ));
                    }
                }

                Ok(Type::Integer)
            },

            _ if op.is_arithmetic() => {
                expect_numeric(op.to_string(), lhs, lhs_span, op_span)?;
                expect_numeric(op.to_string(), rhs, rhs_span, op_span)?;
                Ok(Type::arithmetic_result(lhs, rhs))
            },

            _ if op.is_relational() => {
                if lhs.comparable_with(rhs) {
                    Ok(Type::Boolean)
                } else {
                    Err(SemanticError::new(
                        SemanticErrorKind::Incomparable { lhs, rhs },
                        op_span,
                    ))
                }
            },

            // `and` and `or`
            _ => {
                expect_boolean(op.to_string(), lhs, lhs_span, op_span)?;
                expect_boolean(op.to_string(), rhs, rhs_span, op_span)?;
                Ok(Type::Boolean)
            },
        }
    }
}

fn expect_numeric(
    operator: String,
    found: Type,
    operand: Span,
    op_span: Span,
) -> Result<(), SemanticError> {
    if found.is_numeric() {
        Ok(())
    } else {
        Err(SemanticError::new(
            SemanticErrorKind::NonNumericOperand {
                operator,
                found,
                operand,
            },
            op_span,
        ))
    }
}

fn expect_boolean(
    operator: String,
    found: Type,
    operand: Span,
    op_span: Span,
) -> Result<(), SemanticError> {
    if found == Type::Boolean {
        Ok(())
    } else {
        Err(SemanticError::new(
            SemanticErrorKind::NonBooleanOperand {
                operator,
                found,
                operand,
            },
            op_span,
        ))
    }
}

/// Checks a program and returns the finished symbol table.
pub fn check(program: &Program) -> Result<SymbolTable, SemanticError> {
    let mut analyzer = Analyzer::new();
    analyzer.check_program(program)?;

    debug!(
        "program `{}` passed semantic analysis ({} variables)",
        program.name,
        analyzer.symbols.len()
    );

    Ok(analyzer.symbols)
}

/// Checks a program, stopping at the first violation.
pub fn analyze(program: &Program) -> Result<(), SemanticError> {
    check(program).map(|_| ())
}
