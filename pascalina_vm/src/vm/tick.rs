//! Implements [`VM::tick`][VM::tick].

use pascalina_log::*;
use std::{
    cmp::Ordering,
    io::{BufRead, Write},
};

use super::{VMError, VMStatus, VM};
use crate::{
    instructions::{BinaryOp, Instruction, Operand},
    value::Value,
};

impl<R: BufRead, W: Write> VM<R, W> {
    /// Executes one instruction.
    pub fn tick(&mut self) -> Result<VMStatus, VMError> {
        let instruction = match self.instructions.get(self.program_counter) {
            Some(res) => res.clone(),
            None => return Ok(VMStatus::Halted),
        };

        if self.trace_execution {
            trace!("{:>4}: {:?}", self.program_counter, instruction);
        }

        match instruction {
            Instruction::Assign { dest, src } => {
                let value = self.resolve(&src);
                self.store(&dest, value)?;
            },

            Instruction::Binary { op, dest, lhs, rhs } => {
                let lhs = self.resolve(&lhs);
                let rhs = self.resolve(&rhs);
                let value = apply_binary(op, lhs, rhs)?;
                self.store(&dest, value)?;
            },

            Instruction::Not { dest, operand } => {
                let value = Value::from_bool(!self.resolve(&operand).is_truthy());
                self.store(&dest, value)?;
            },

            Instruction::If {
                cond,
                on_true,
                on_false,
            } => {
                let target = if self.resolve(&cond).is_truthy() {
                    on_true
                } else {
                    on_false
                };

                self.program_counter = self.label_index(target)?;
                return Ok(VMStatus::Running);
            },

            Instruction::Jump(target) => {
                self.program_counter = self.label_index(target)?;
                return Ok(VMStatus::Running);
            },

            Instruction::Label(_) => {},

            Instruction::Write(operand) => {
                let text = match self.resolve(&operand) {
                    Value::String(s) => s.replace(Operand::NEWLINE, "\n"),
                    value => value.to_string(),
                };

                self.output.write_all(text.as_bytes())?;
                self.output.flush()?;
                self.output_buffer.push_str(&text);
            },

            Instruction::Read(name) => {
                let mut line = String::new();

                if self.input.read_line(&mut line)? == 0 {
                    return Err(VMError::EndOfInput);
                }

                // Surrounding blanks are never part of the value
                self.store(&name, Value::from_input(line.trim()))?;
            },
        }

        self.program_counter += 1;
        Ok(VMStatus::Running)
    }

    /// Turns an operand into a value. Literals win over variables,
    /// and anything unresolvable is taken as a string of its own text.
    fn resolve(&self, operand: &Operand) -> Value {
        let text = operand.as_str();

        Value::resolve_literal(text)
            .or_else(|| self.variables.get(text).map(|var| var.value().clone()))
            .unwrap_or_else(|| Value::String(text.to_owned()))
    }

    fn store(&mut self, name: &str, value: Value) -> Result<(), VMError> {
        self.variables
            .write(name, value)
            .map_err(|source| VMError::IncompatibleWrite {
                name: name.to_owned(),
                source,
            })
    }
}

fn apply_binary(op: BinaryOp, lhs: Value, rhs: Value) -> Result<Value, VMError> {
    let wrong_type = |lhs: &Value, rhs: &Value| VMError::WrongType {
        opcode: op.into(),
        lhs: lhs.kind(),
        rhs: rhs.kind(),
    };

    let res = match op {
        BinaryOp::And => Value::from_bool(lhs.is_truthy() && rhs.is_truthy()),
        BinaryOp::Or => Value::from_bool(lhs.is_truthy() || rhs.is_truthy()),
        BinaryOp::Equals => Value::from_bool(values_equal(&lhs, &rhs)),

        BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Lte | BinaryOp::Gte => {
            let ordering = compare(&lhs, &rhs).ok_or_else(|| wrong_type(&lhs, &rhs))?;

            let res = match (op, ordering) {
                // NaN compares false with everything
                (_, None) => false,
                (BinaryOp::Lt, Some(ordering)) => ordering == Ordering::Less,
                (BinaryOp::Gt, Some(ordering)) => ordering == Ordering::Greater,
                (BinaryOp::Lte, Some(ordering)) => ordering != Ordering::Greater,
                (_, Some(ordering)) => ordering != Ordering::Less,
            };

            Value::from_bool(res)
        },

        BinaryOp::Add => match (&lhs, &rhs) {
            (Value::String(x), Value::String(y)) => Value::String(format!("{}{}", x, y)),

            _ => numeric(
                &lhs,
                &rhs,
                |x, y| Value::Integer(x.wrapping_add(y)),
                |x, y| Value::Real(x + y),
            )
            .ok_or_else(|| wrong_type(&lhs, &rhs))?,
        },

        BinaryOp::Sub => numeric(
            &lhs,
            &rhs,
            |x, y| Value::Integer(x.wrapping_sub(y)),
            |x, y| Value::Real(x - y),
        )
        .ok_or_else(|| wrong_type(&lhs, &rhs))?,

        BinaryOp::Mul => numeric(
            &lhs,
            &rhs,
            |x, y| Value::Integer(x.wrapping_mul(y)),
            |x, y| Value::Real(x * y),
        )
        .ok_or_else(|| wrong_type(&lhs, &rhs))?,

        // Dividing by zero is not an error; each division yields a
        // fixed value instead.
        BinaryOp::Div => numeric(
            &lhs,
            &rhs,
            |x, y| real_div(x as f64, y as f64),
            real_div,
        )
        .ok_or_else(|| wrong_type(&lhs, &rhs))?,

        BinaryOp::IntDiv => numeric(
            &lhs,
            &rhs,
            |x, y| Value::Integer(if y == 0 { 0 } else { floor_div(x, y) }),
            |x, y| {
                if y == 0.0 {
                    Value::Integer(0)
                } else {
                    Value::Real((x / y).floor())
                }
            },
        )
        .ok_or_else(|| wrong_type(&lhs, &rhs))?,

        BinaryOp::Mod => numeric(
            &lhs,
            &rhs,
            |x, y| Value::Integer(if y == 0 { 0 } else { floor_mod(x, y) }),
            |x, y| {
                if y == 0.0 {
                    Value::Integer(0)
                } else {
                    Value::Real(x - y * (x / y).floor())
                }
            },
        )
        .ok_or_else(|| wrong_type(&lhs, &rhs))?,
    };

    Ok(res)
}

/// Applies `int_op` if both values are integers, `real_op` if both are
/// numbers and at least one is real. Returns `None` for strings.
fn numeric(
    lhs: &Value,
    rhs: &Value,
    int_op: impl FnOnce(i64, i64) -> Value,
    real_op: impl FnOnce(f64, f64) -> Value,
) -> Option<Value> {
    match (lhs, rhs) {
        (Value::Integer(x), Value::Integer(y)) => Some(int_op(*x, *y)),
        _ => Some(real_op(lhs.as_f64()?, rhs.as_f64()?)),
    }
}

fn real_div(x: f64, y: f64) -> Value {
    if y == 0.0 {
        Value::Real(0.0)
    } else {
        Value::Real(x / y)
    }
}

/// Division rounding towards negative infinity.
fn floor_div(x: i64, y: i64) -> i64 {
    let quotient = x.wrapping_div(y);

    if x.wrapping_rem(y) != 0 && ((x < 0) != (y < 0)) {
        quotient - 1
    } else {
        quotient
    }
}

/// Remainder with the sign of the divisor.
fn floor_mod(x: i64, y: i64) -> i64 {
    let remainder = x.wrapping_rem(y);

    if remainder != 0 && ((remainder < 0) != (y < 0)) {
        remainder + y
    } else {
        remainder
    }
}

fn values_equal(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Integer(x), Value::Integer(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::String(_), _) | (_, Value::String(_)) => false,
        _ => lhs.as_f64() == rhs.as_f64(),
    }
}

/// Returns `None` if the values can't be ordered at all (a string against a
/// number), `Some(None)` if they are numbers that don't compare (NaN).
fn compare(lhs: &Value, rhs: &Value) -> Option<Option<Ordering>> {
    match (lhs, rhs) {
        (Value::Integer(x), Value::Integer(y)) => Some(Some(x.cmp(y))),
        (Value::String(x), Value::String(y)) => Some(Some(x.cmp(y))),
        (Value::String(_), _) | (_, Value::String(_)) => None,
        _ => Some(lhs.as_f64()?.partial_cmp(&rhs.as_f64()?)),
    }
}
