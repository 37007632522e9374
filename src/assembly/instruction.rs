//! Decoded CIL instructions and their operands.
//!
//! An [`Instruction`] is an [`OpCode`](crate::assembly::OpCode) paired with
//! a typed [`Operand`]. Metadata references appear directly in operands —
//! method references by full name, field references by declaring type and
//! field name, type references as [`TypeRef`] values — so the passes can
//! pattern-match call sites and token loads without a resolution step.

use std::fmt;

use crate::assembly::OpCode;
use crate::metadata::{FieldRef, MethodRef, TypeRef};

/// An immediate value embedded in an instruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Immediate {
    /// Signed 8-bit immediate (`ldc.i4.s`, short branch offsets).
    Int8(i8),
    /// Signed 32-bit immediate (`ldc.i4`).
    Int32(i32),
    /// Signed 64-bit immediate (`ldc.i8`).
    Int64(i64),
    /// 32-bit float immediate (`ldc.r4`).
    Float32(f32),
    /// 64-bit float immediate (`ldc.r8`).
    Float64(f64),
}

/// A decoded instruction operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// No operand.
    None,
    /// Immediate constant.
    Immediate(Immediate),
    /// Inline string (`ldstr`).
    String(String),
    /// Method reference (`call`, `callvirt`, `newobj`, `ldftn`).
    Method(MethodRef),
    /// Type reference (`newarr`, `initobj`, `castclass`, `box`, ...).
    Type(TypeRef),
    /// Field reference (`ldtoken`, `ldfld`, `stsfld`, ...).
    Field(FieldRef),
    /// Local variable index (`ldloc`, `ldloca.s`, `stloc.s`).
    Local(u16),
    /// Argument index (`ldarg.s`).
    Argument(u16),
    /// Branch target, as an instruction index within the body.
    Target(usize),
}

/// A single CIL instruction.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    /// The opcode.
    pub opcode: OpCode,
    /// The operand, [`Operand::None`] for operand-less opcodes.
    pub operand: Operand,
}

impl Instruction {
    /// Creates an instruction with an explicit operand.
    #[must_use]
    pub fn new(opcode: OpCode, operand: Operand) -> Self {
        Self { opcode, operand }
    }

    /// Creates an operand-less instruction.
    #[must_use]
    pub fn simple(opcode: OpCode) -> Self {
        Self {
            opcode,
            operand: Operand::None,
        }
    }

    /// Creates an `ldstr` loading the given string.
    #[must_use]
    pub fn ldstr(value: impl Into<String>) -> Self {
        Self::new(OpCode::Ldstr, Operand::String(value.into()))
    }

    /// Creates a `call` to the referenced method.
    #[must_use]
    pub fn call(target: MethodRef) -> Self {
        Self::new(OpCode::Call, Operand::Method(target))
    }

    /// Returns the method reference operand, if this instruction has one.
    #[must_use]
    pub fn method_operand(&self) -> Option<&MethodRef> {
        match &self.operand {
            Operand::Method(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the field reference operand, if this instruction has one.
    #[must_use]
    pub fn field_operand(&self) -> Option<&FieldRef> {
        match &self.operand {
            Operand::Field(f) => Some(f),
            _ => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.operand {
            Operand::None => write!(f, "{}", self.opcode),
            Operand::Immediate(Immediate::Int8(v)) => write!(f, "{} {v}", self.opcode),
            Operand::Immediate(Immediate::Int32(v)) => write!(f, "{} {v}", self.opcode),
            Operand::Immediate(Immediate::Int64(v)) => write!(f, "{} {v}", self.opcode),
            Operand::Immediate(Immediate::Float32(v)) => write!(f, "{} {v}", self.opcode),
            Operand::Immediate(Immediate::Float64(v)) => write!(f, "{} {v}", self.opcode),
            Operand::String(s) => write!(f, "{} \"{s}\"", self.opcode),
            Operand::Method(m) => write!(f, "{} {}", self.opcode, m.full_name),
            Operand::Type(t) => write!(f, "{} {}", self.opcode, t.full_name()),
            Operand::Field(fr) => {
                write!(f, "{} {}::{}", self.opcode, fr.declaring_type, fr.name)
            }
            Operand::Local(i) => write!(f, "{} V_{i}", self.opcode),
            Operand::Argument(i) => write!(f, "{} A_{i}", self.opcode),
            Operand::Target(t) => write!(f, "{} IL_{t:04}", self.opcode),
        }
    }
}
