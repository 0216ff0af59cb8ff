//! Text listings of intermediate code, one instruction per line:
//!
//! ```text
//! 1 - (ATT, x, 5, NONE)
//! 2 - (CALL, WRITE, x, NONE)
//! ```

mod assembler;

pub use assembler::{assemble, AssembleError};

use pascalina_vm::instructions::Instruction;
use std::{borrow::Cow, fs, io, path::Path};

/// Written in place of an unused slot.
pub const NONE: &str = "NONE";
pub const WRITE: &str = "WRITE";
pub const READ: &str = "READ";

/// Returns the four slots `(op, arg1, arg2, result)` of an instruction.
pub fn instruction_slots(inst: &Instruction) -> [Cow<'_, str>; 4] {
    let op = Cow::Borrowed(inst.opcode().as_str());
    let none = || Cow::Borrowed(NONE);

    match inst {
        Instruction::Assign { dest, src } => {
            [op, Cow::Borrowed(dest.as_str()), Cow::Borrowed(src.as_str()), none()]
        },

        Instruction::Binary { dest, lhs, rhs, .. } => [
            op,
            Cow::Borrowed(dest.as_str()),
            Cow::Borrowed(lhs.as_str()),
            Cow::Borrowed(rhs.as_str()),
        ],

        Instruction::Not { dest, operand } => [
            op,
            Cow::Borrowed(dest.as_str()),
            Cow::Borrowed(operand.as_str()),
            none(),
        ],

        Instruction::If {
            cond,
            on_true,
            on_false,
        } => [
            op,
            Cow::Borrowed(cond.as_str()),
            Cow::Owned(on_true.to_string()),
            Cow::Owned(on_false.to_string()),
        ],

        Instruction::Jump(label) | Instruction::Label(label) => {
            [op, Cow::Owned(label.to_string()), none(), none()]
        },

        Instruction::Write(operand) => {
            [op, Cow::Borrowed(WRITE), Cow::Borrowed(operand.as_str()), none()]
        },

        Instruction::Read(name) => [op, Cow::Borrowed(READ), Cow::Borrowed(name.as_str()), none()],
    }
}

pub fn disassemble_instruction(inst: &Instruction) -> String {
    let [op, arg1, arg2, result] = instruction_slots(inst);
    format!("({}, {}, {}, {})", op, arg1, arg2, result)
}

/// Produces the full listing, numbering instructions from 1.
pub fn disassemble(instructions: &[Instruction]) -> String {
    // 24 bytes is roughly the length of a short `ATT` line
    let mut res = String::with_capacity(instructions.len() * 24);

    for (idx, inst) in instructions.iter().enumerate() {
        res.push_str(&format!("{} - {}\n", idx + 1, disassemble_instruction(inst)));
    }

    res
}

pub fn write_listing(path: impl AsRef<Path>, instructions: &[Instruction]) -> io::Result<()> {
    fs::write(path, disassemble(instructions))
}
