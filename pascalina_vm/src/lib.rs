#![warn(unused_imports)]
#![warn(unused_must_use)]

//! The Pascalina intermediate code interpreter.
//!
//! Programs are flat lists of three-address [`Instruction`]s that jump
//! between symbolic [`Label`]s. Values are dynamically typed: each
//! variable takes its type from the first value written to it, and later
//! writes go through the coercion rules in [`ValueKind::coerce`].
//!
//! [`Instruction`]: instructions::Instruction
//! [`Label`]: instructions::Label
//! [`ValueKind::coerce`]: value::ValueKind::coerce

pub mod instructions;
pub mod store;
pub mod value;
pub mod vm;

pub use vm::run;
