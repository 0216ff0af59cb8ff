//! Lowers a checked [`Program`] into the flat three-address code
//! run by `pascalina_vm`.


use pascalina_log::*;
use pascalina_vm::instructions::{BinaryOp, Instruction, Label, Operand};

use crate::{
    lexer::token::LiteralKind,
    parser::ast::{
        Assignment, BinaryOperator, Expression, ExpressionKind, ForDirection, IoStatement,
        Literal, Program, Statement, StatementKind, UnaryOperator,
    },
};

/// Where `break` and `continue` jump to from inside a loop body.
struct LoopContext {
    start: Label,
    end: Label,
    /// For `for` loops, the counter and how to step it.
    /// `continue` has to step the counter before jumping back.
    step: Option<(String, BinaryOp)>,
}

/// Holds the instructions generated so far and
/// the counters for fresh temporaries and labels.
struct Generator {
    instructions: Vec<Instruction>,
    temp_count: u32,
    label_count: u32,
}

impl Generator {
    fn new() -> Self {
        Self {
            instructions: Vec::new(),
            temp_count: 0,
            label_count: 0,
        }
    }

    /// `$` can't appear in identifiers, so temporaries
    /// never collide with user variables.
    fn new_temp(&mut self) -> String {
        self.temp_count += 1;
        format!("$t{}", self.temp_count)
    }

    fn new_label(&mut self) -> Label {
        self.label_count += 1;
        Label::new(self.label_count)
    }

    fn emit(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    fn emit_binary(&mut self, op: BinaryOp, lhs: Operand, rhs: Operand) -> Operand {
        let dest = self.new_temp();

        self.emit(Instruction::Binary {
            op,
            dest: dest.clone(),
            lhs,
            rhs,
        });

        dest.into()
    }

    /// The entry point for lowering.
    fn lower_program(mut self, program: &Program) -> Vec<Instruction> {
        for stmt in &program.body {
            self.lower_statement(stmt, None);
        }

        self.instructions
    }

    /// `enclosing` is the innermost loop around this statement, if any.
    fn lower_statement(&mut self, stmt: &Statement, enclosing: Option<&LoopContext>) {
        match &stmt.kind {
            StatementKind::Assignment(assignment) => self.lower_assignment(assignment),

            StatementKind::Block(stmts) => {
                for stmt in stmts {
                    self.lower_statement(stmt, enclosing);
                }
            },

            StatementKind::If {
                cond,
                then,
                otherwise,
            } => {
                let cond = self.lower_expression(cond);
                let on_true = self.new_label();
                let on_false = self.new_label();
                let end = self.new_label();

                self.emit(Instruction::If {
                    cond,
                    on_true,
                    on_false,
                });

                self.emit(Instruction::Label(on_true));
                self.lower_statement(then, enclosing);
                self.emit(Instruction::Jump(end));
                self.emit(Instruction::Label(on_false));

                if let Some(otherwise) = otherwise {
                    self.lower_statement(otherwise, enclosing);
                }

                self.emit(Instruction::Label(end));
            },

            StatementKind::While { cond, body } => {
                let start = self.new_label();
                let on_true = self.new_label();
                let end = self.new_label();

                self.emit(Instruction::Label(start));
                let cond = self.lower_expression(cond);

                self.emit(Instruction::If {
                    cond,
                    on_true,
                    on_false: end,
                });

                self.emit(Instruction::Label(on_true));

                let context = LoopContext {
                    start,
                    end,
                    step: None,
                };

                self.lower_statement(body, Some(&context));
                self.emit(Instruction::Jump(start));
                self.emit(Instruction::Label(end));
            },

            StatementKind::For {
                init,
                direction,
                end,
                body,
            } => self.lower_for(init, *direction, end, body),

            StatementKind::Io(IoStatement::Read { target, newline }) => {
                self.emit(Instruction::Read(target.name.clone()));

                if *newline {
                    self.emit(Instruction::Write(Operand::newline()));
                }
            },

            StatementKind::Io(IoStatement::Write { args, newline }) => {
                for arg in args {
                    let operand = self.lower_expression(arg);
                    self.emit(Instruction::Write(operand));
                }

                if *newline {
                    self.emit(Instruction::Write(Operand::newline()));
                }
            },

            StatementKind::Break => match enclosing {
                Some(context) => self.emit(Instruction::Jump(context.end)),
                None => warning!("ignoring `break` outside of a loop"),
            },

            StatementKind::Continue => match enclosing {
                Some(context) => {
                    if let Some((counter, op)) = &context.step {
                        self.lower_step(counter, *op);
                    }

                    self.emit(Instruction::Jump(context.start));
                },

                None => warning!("ignoring `continue` outside of a loop"),
            },

            StatementKind::Empty => {},
        }
    }

    fn lower_assignment(&mut self, assignment: &Assignment) {
        let src = self.lower_expression(&assignment.value);

        self.emit(Instruction::Assign {
            dest: assignment.target.name.clone(),
            src,
        });
    }

    /// ```text
    /// ATT i, start
    /// LABEL head
    /// LTE t, i, end    (GTE for downto)
    /// IF t, body, exit
    /// LABEL body
    /// ...
    /// ADD t2, i, 1     (SUB for downto)
    /// ATT i, t2
    /// JUMP head
    /// LABEL exit
    /// ```
    fn lower_for(
        &mut self,
        init: &Assignment,
        direction: ForDirection,
        end: &Expression,
        body: &Statement,
    ) {
        self.lower_assignment(init);

        let start = self.new_label();
        let body_label = self.new_label();
        let exit = self.new_label();
        let counter = init.target.name.clone();
        let bound = self.lower_expression(end);

        let (test, step) = match direction {
            ForDirection::To => (BinaryOp::Lte, BinaryOp::Add),
            ForDirection::DownTo => (BinaryOp::Gte, BinaryOp::Sub),
        };

        self.emit(Instruction::Label(start));
        let cond = self.emit_binary(test, counter.as_str().into(), bound);

        self.emit(Instruction::If {
            cond,
            on_true: body_label,
            on_false: exit,
        });

        self.emit(Instruction::Label(body_label));

        let context = LoopContext {
            start,
            end: exit,
            step: Some((counter.clone(), step)),
        };

        self.lower_statement(body, Some(&context));
        self.lower_step(&counter, step);
        self.emit(Instruction::Jump(start));
        self.emit(Instruction::Label(exit));
    }

    /// `counter := counter ± 1`
    fn lower_step(&mut self, counter: &str, op: BinaryOp) {
        let next = self.emit_binary(op, counter.into(), "1".into());

        self.emit(Instruction::Assign {
            dest: counter.to_owned(),
            src: next,
        });
    }

    /// Returns the operand holding the expression's value.
    /// Literals and variables are used directly. Everything
    /// else is computed into a fresh temporary.
    fn lower_expression(&mut self, expr: &Expression) -> Operand {
        match &expr.kind {
            ExpressionKind::Literal(literal) => lower_literal(literal),
            ExpressionKind::Identifier(name) => name.as_str().into(),

            ExpressionKind::Unary { op, operand, .. } => {
                let operand = self.lower_expression(operand);

                match op {
                    UnaryOperator::Plus => operand,
                    UnaryOperator::Negative => self.emit_binary(BinaryOp::Sub, "0".into(), operand),

                    UnaryOperator::Not => {
                        let dest = self.new_temp();

                        self.emit(Instruction::Not {
                            dest: dest.clone(),
                            operand,
                        });

                        dest.into()
                    },
                }
            },

            ExpressionKind::Binary { lhs, op, rhs, .. } => {
                let lhs = self.lower_expression(lhs);
                let rhs = self.lower_expression(rhs);

                let op = match op {
                    BinaryOperator::Add => BinaryOp::Add,
                    BinaryOperator::Subtract => BinaryOp::Sub,
                    BinaryOperator::Multiply => BinaryOp::Mul,
                    BinaryOperator::Divide => BinaryOp::Div,
                    BinaryOperator::IntDivide => BinaryOp::IntDiv,
                    BinaryOperator::Modulo => BinaryOp::Mod,
                    BinaryOperator::Equal => BinaryOp::Equals,
                    BinaryOperator::LessThan => BinaryOp::Lt,
                    BinaryOperator::LessThanEqual => BinaryOp::Lte,
                    BinaryOperator::GreaterThan => BinaryOp::Gt,
                    BinaryOperator::GreaterThanEqual => BinaryOp::Gte,
                    BinaryOperator::And => BinaryOp::And,
                    BinaryOperator::Or => BinaryOp::Or,

                    // There's no opcode for `<>`
                    BinaryOperator::NotEqual => {
                        let equal = self.emit_binary(BinaryOp::Equals, lhs, rhs);
                        let dest = self.new_temp();

                        self.emit(Instruction::Not {
                            dest: dest.clone(),
                            operand: equal,
                        });

                        return dest.into();
                    },
                };

                self.emit_binary(op, lhs, rhs)
            },
        }
    }
}

/// Numbers are passed through as written. Strings get their quotes back
/// so they can't be mistaken for variable names.
fn lower_literal(literal: &Literal) -> Operand {
    match literal.kind {
        LiteralKind::String if literal.text.contains('"') => format!("'{}'", literal.text).into(),
        LiteralKind::String => format!("\"{}\"", literal.text).into(),
        LiteralKind::Decimal | LiteralKind::Hex | LiteralKind::Octal | LiteralKind::Float => {
            literal.text.as_str().into()
        },
    }
}

/// Generates intermediate code for a program.
/// The program is expected to have passed [`analyze`](crate::analyze).
pub fn generate(program: &Program) -> Vec<Instruction> {
    let res = Generator::new().lower_program(program);
    debug!("generated {} instructions", res.len());
    res
}
