//! CIL instruction representation and opcode classification.
//!
//! This module defines the instruction model the rewrite passes read and
//! write. Unlike a disassembler's view, instructions here carry no byte
//! offsets or sizes — bodies are plain index-addressable sequences, and the
//! external assembly I/O layer is responsible for (re)encoding them.
//!
//! # Key Components
//!
//! - [`OpCode`] - The CIL opcodes the pipeline understands, with mnemonics
//!   and control-flow classification
//! - [`Instruction`] - An opcode paired with its decoded operand
//! - [`Operand`] / [`Immediate`] - Typed operand representation, including
//!   metadata references

mod instruction;
mod opcodes;

pub use instruction::{Immediate, Instruction, Operand};
pub use opcodes::{FlowType, OpCode};
