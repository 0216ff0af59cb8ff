pub mod tick;

#[cfg(test)]
mod tests;

use pascalina_log::*;
use std::{
    collections::HashMap,
    io::{self, BufRead, Write},
};
use thiserror::Error;

use crate::{
    instructions::{Instruction, Label, Opcode},
    store::{Variable, VariableStore},
    value::{CoercionError, ValueKind},
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VMStatus {
    Running,
    Halted,
}

#[derive(Debug, Error)]
pub enum VMError {
    #[error("Jump to label {0}, which is never defined")]
    UnresolvedLabel(Label),
    #[error("Label {label} is defined twice (at instructions {first} and {second})")]
    DuplicateLabel {
        label: Label,
        first: usize,
        second: usize,
    },
    #[error("Can't write to `{name}`: {source}")]
    IncompatibleWrite {
        name: String,
        #[source]
        source: CoercionError,
    },
    #[error("Tried to use {opcode} on operands of type {lhs} and {rhs}")]
    WrongType {
        opcode: Opcode,
        lhs: ValueKind,
        rhs: ValueKind,
    },
    #[error("Tried to read past the end of the input")]
    EndOfInput,
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Interprets a list of [`Instruction`]s.
///
/// Output is written to `output` as soon as it is produced and
/// also collected into a buffer, which [`run`](VM::run) returns.
pub struct VM<R, W> {
    instructions: Vec<Instruction>,
    /// Index of every `LABEL` instruction.
    labels: HashMap<Label, usize>,
    variables: VariableStore,
    program_counter: usize,
    input: R,
    output: W,
    output_buffer: String,
    /// Enables extra output which may be helpful
    /// for debugging programs
    trace_execution: bool,
}

impl<R: BufRead, W: Write> VM<R, W> {
    /// Creates a VM, resolving every label ahead of time.
    pub fn new(instructions: Vec<Instruction>, input: R, output: W) -> Result<Self, VMError> {
        let labels = resolve_labels(&instructions)?;
        debug!(
            "loaded {} instructions ({} labels)",
            instructions.len(),
            labels.len()
        );

        Ok(Self {
            instructions,
            labels,
            variables: VariableStore::new(),
            program_counter: 0,
            input,
            output,
            output_buffer: String::new(),
            trace_execution: false,
        })
    }

    pub fn trace_execution(mut self, trace_execution: bool) -> Self {
        self.trace_execution = trace_execution;
        self
    }

    /// Runs until the program counter walks off the end of the program.
    /// Returns everything the program wrote.
    pub fn run(&mut self) -> Result<String, VMError> {
        while self.tick()? == VMStatus::Running {}
        Ok(self.output_buffer.clone())
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }

    /// Everything written so far.
    pub fn output(&self) -> &str {
        &self.output_buffer
    }

    pub fn into_writer(self) -> W {
        self.output
    }

    fn label_index(&self, label: Label) -> Result<usize, VMError> {
        self.labels
            .get(&label)
            .copied()
            .ok_or(VMError::UnresolvedLabel(label))
    }
}

fn resolve_labels(instructions: &[Instruction]) -> Result<HashMap<Label, usize>, VMError> {
    let mut labels = HashMap::new();

    for (idx, instruction) in instructions.iter().enumerate() {
        if let Instruction::Label(label) = instruction {
            if let Some(first) = labels.insert(*label, idx) {
                return Err(VMError::DuplicateLabel {
                    label: *label,
                    first,
                    second: idx,
                });
            }
        }
    }

    Ok(labels)
}

/// Runs `instructions` against standard input and output.
pub fn run(instructions: Vec<Instruction>) -> Result<String, VMError> {
    let stdin = io::stdin();
    let mut vm = VM::new(instructions, stdin.lock(), io::stdout())?;
    vm.run()
}
