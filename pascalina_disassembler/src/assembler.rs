use pascalina_vm::instructions::{Instruction, Label, Opcode, Operand};
use thiserror::Error;

use crate::{NONE, READ, WRITE};

#[derive(Debug, Error, PartialEq)]
pub enum AssembleError {
    #[error("line {line}: unknown opcode `{opcode}`")]
    UnknownOpcode { line: usize, opcode: String },
    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: &'static str },
    #[error("line {line}: `{text}` is not a label")]
    BadLabel { line: usize, text: String },
}

/// Reads a listing produced by [`disassemble`](crate::disassemble) back into
/// instructions. Instruction numbers are ignored; blank lines are skipped.
pub fn assemble(listing: &str) -> Result<Vec<Instruction>, AssembleError> {
    listing
        .lines()
        .enumerate()
        .filter(|(_, text)| !text.trim().is_empty())
        .map(|(idx, text)| assemble_line(idx + 1, text.trim()))
        .collect()
}

fn assemble_line(line: usize, text: &str) -> Result<Instruction, AssembleError> {
    let malformed = |reason| AssembleError::Malformed { line, reason };

    let (number, rest) = text
        .split_once(" - ")
        .ok_or_else(|| malformed("expected `<index> - (...)`"))?;

    if number.parse::<usize>().is_err() {
        return Err(malformed("instruction index is not a number"));
    }

    let inner = rest
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| malformed("instruction must be parenthesized"))?;

    let [op, arg1, arg2, result] =
        split_slots(inner).ok_or_else(|| malformed("expected four comma-separated slots"))?;

    let opcode = Opcode::from_str(op).ok_or_else(|| AssembleError::UnknownOpcode {
        line,
        opcode: op.to_owned(),
    })?;

    let label = |text: &str| {
        Label::from_str(text).ok_or_else(|| AssembleError::BadLabel {
            line,
            text: text.to_owned(),
        })
    };

    let expect_none = |slots: &[&str]| {
        if slots.iter().all(|&slot| slot == NONE) {
            Ok(())
        } else {
            Err(malformed("unused slots must be NONE"))
        }
    };

    if let Some(op) = opcode.as_binary_op() {
        return Ok(Instruction::Binary {
            op,
            dest: arg1.to_owned(),
            lhs: Operand::new(arg2),
            rhs: Operand::new(result),
        });
    }

    let res = match opcode {
        Opcode::Att => {
            expect_none(&[result])?;
            Instruction::Assign {
                dest: arg1.to_owned(),
                src: Operand::new(arg2),
            }
        },

        Opcode::Not => {
            expect_none(&[result])?;
            Instruction::Not {
                dest: arg1.to_owned(),
                operand: Operand::new(arg2),
            }
        },

        Opcode::If => Instruction::If {
            cond: Operand::new(arg1),
            on_true: label(arg2)?,
            on_false: label(result)?,
        },

        Opcode::Jump => {
            expect_none(&[arg2, result])?;
            Instruction::Jump(label(arg1)?)
        },

        Opcode::Label => {
            expect_none(&[arg2, result])?;
            Instruction::Label(label(arg1)?)
        },

        Opcode::Call => {
            expect_none(&[result])?;

            match arg1 {
                WRITE => Instruction::Write(Operand::new(arg2)),
                READ => Instruction::Read(arg2.to_owned()),
                _ => return Err(malformed("CALL only supports WRITE and READ")),
            }
        },

        // Binary opcodes were handled above
        _ => return Err(malformed("unexpected binary opcode")),
    };

    Ok(res)
}

/// Splits `a, b, c, d` into its four slots. A slot starting with a quote
/// runs until the matching quote that ends the slot, so quoted strings
/// may contain `, `.
fn split_slots(inner: &str) -> Option<[&str; 4]> {
    let mut slots = [""; 4];
    let mut rest = inner;

    for (idx, slot) in slots.iter_mut().enumerate() {
        let last = idx == 3;
        let end = slot_end(rest, last)?;
        *slot = &rest[..end];
        rest = &rest[end..];

        if !last {
            rest = rest.strip_prefix(", ")?;
        }
    }

    if rest.is_empty() {
        Some(slots)
    } else {
        None
    }
}

fn slot_end(rest: &str, last: bool) -> Option<usize> {
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'');

    match (quote, last) {
        (None, false) => rest.find(", "),
        (None, true) => (!rest.contains(", ")).then(|| rest.len()),

        (Some(quote), _) => {
            // Find a closing quote that is followed by the slot separator
            // (or is the very end, for the last slot)
            rest.char_indices().skip(1).find_map(|(idx, c)| {
                let end = idx + c.len_utf8();
                let terminated = if last {
                    end == rest.len()
                } else {
                    rest[end..].starts_with(", ")
                };

                (c == quote && terminated).then(|| end)
            })
        },
    }
}
