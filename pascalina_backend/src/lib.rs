#![warn(unused_imports)]
#![warn(unused_must_use)]

//! The Pascalina compiler.
//!
//! Source text goes through [`lex`], [`parse`], [`analyze`] and finally
//! [`generate`], which produces the instructions run by `pascalina_vm`.
//! [`compile`] chains all four.

pub mod errors;
pub mod lexer;
pub mod lower;
pub mod parser;
pub mod typecheck;

use anyhow::Context;
use pascalina_vm::instructions::Instruction;
use std::{fs, path::Path};
use thiserror::Error;

pub use self::{
    errors::DiagnosticsContext,
    lexer::{lex, LexError},
    lower::generate,
    parser::{ast::Program, parse, SyntaxError},
    typecheck::{analyze, check, SemanticError},
};

/// Anything that stops a program from compiling.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum CompileError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Semantic(#[from] SemanticError),
}

impl CompileError {
    pub fn message(&self) -> String {
        match self {
            Self::Lex(err) => err.message(),
            Self::Syntax(err) => err.message(),
            Self::Semantic(err) => err.message(),
        }
    }

    pub fn line(&self) -> usize {
        match self {
            Self::Lex(err) => err.line,
            Self::Syntax(err) => err.line,
            Self::Semantic(err) => err.line,
        }
    }

    pub fn column(&self) -> usize {
        match self {
            Self::Lex(err) => err.column,
            Self::Syntax(err) => err.column,
            Self::Semantic(err) => err.column,
        }
    }

    /// Prints the error with a snippet of the offending source.
    pub fn report(&self, ctx: &DiagnosticsContext) {
        match self {
            Self::Lex(err) => err.report(ctx),
            Self::Syntax(err) => err.report(ctx),
            Self::Semantic(err) => err.report(ctx),
        }
    }
}

/// Lexes, parses and checks `source`.
pub fn front_end(source: &str) -> Result<Program, CompileError> {
    let tokens = lex(source)?;
    let program = parse(tokens)?;
    analyze(&program)?;

    Ok(program)
}

/// Compiles `source` into intermediate code.
/// Nothing is generated unless the program passes analysis.
pub fn compile(source: &str) -> Result<Vec<Instruction>, CompileError> {
    let program = front_end(source)?;
    Ok(generate(&program))
}

/// Reads and compiles a file. If compilation fails,
/// the diagnostic is printed to stderr before returning.
pub fn compile_file(path: impl AsRef<Path>) -> anyhow::Result<Vec<Instruction>> {
    let path = path.as_ref();
    let source = fs::read_to_string(path)
        .with_context(|| format!("couldn't read {}", path.display()))?;

    compile(&source).map_err(|err| {
        let ctx = DiagnosticsContext::new(&source, Some(path.display().to_string()));
        err.report(&ctx);

        anyhow::Error::new(err).context(format!("couldn't compile {}", path.display()))
    })
}
