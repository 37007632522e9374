//! CIL opcode definitions and classification.
//!
//! The enum below is not the full ECMA-335 instruction set — it is the
//! working set the deobfuscation pipeline reads, rewrites, and emits, plus
//! the surrounding opcodes that commonly appear in the bodies it scans.
//! Classification helpers mirror how the passes interrogate instructions:
//! the string folder asks "is this an `ldc.i4`-family load", the body
//! invalidator asks "does this end the method".

use std::fmt;

/// How an instruction affects control flow.
///
/// Used when validating rewritten bodies (every invalidated body must end
/// with a return-family instruction) and when reasoning about instruction
/// sequences during pattern matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowType {
    /// Normal execution continues to the next instruction.
    Sequential,
    /// Conditional branch to another location.
    ConditionalBranch,
    /// Unconditional jump.
    UnconditionalBranch,
    /// Call to another method.
    Call,
    /// Returns from the current method.
    Return,
    /// Exception throw.
    Throw,
    /// Leaves a protected region.
    Leave,
    /// Ends a finally block.
    EndFinally,
}

/// A CIL opcode.
///
/// Variant names follow the ECMA-335 mnemonics with dots replaced by
/// underscores (`ldc.i4.s` → [`OpCode::LdcI4S`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)] // variant names are the mnemonics; see `mnemonic()`
pub enum OpCode {
    Nop,
    Dup,
    Pop,
    Ret,
    // Argument and local access
    Ldarg0,
    Ldarg1,
    Ldarg2,
    Ldarg3,
    LdargS,
    LdlocS,
    StlocS,
    Ldloc,
    Stloc,
    LdlocaS,
    // Constants
    LdcI4M1,
    LdcI40,
    LdcI41,
    LdcI42,
    LdcI43,
    LdcI44,
    LdcI45,
    LdcI46,
    LdcI47,
    LdcI48,
    LdcI4S,
    LdcI4,
    LdcI8,
    LdcR4,
    LdcR8,
    Ldstr,
    Ldnull,
    // Calls
    Call,
    Callvirt,
    Newobj,
    // Branching
    BrS,
    Br,
    BrtrueS,
    BrfalseS,
    BltS,
    Leave,
    LeaveS,
    Endfinally,
    Switch,
    // Arithmetic and logic
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Neg,
    And,
    Or,
    Xor,
    Not,
    Shl,
    Shr,
    // Conversion
    ConvI4,
    ConvU1,
    ConvI8,
    // Arrays
    Newarr,
    Ldlen,
    LdelemU1,
    StelemI1,
    Ldtoken,
    // Fields
    Ldfld,
    Stfld,
    Ldsfld,
    Stsfld,
    // Object model
    Box,
    UnboxAny,
    Castclass,
    Isinst,
    Initobj,
    Throw,
}

impl OpCode {
    /// Returns the ECMA-335 mnemonic for this opcode.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            OpCode::Nop => "nop",
            OpCode::Dup => "dup",
            OpCode::Pop => "pop",
            OpCode::Ret => "ret",
            OpCode::Ldarg0 => "ldarg.0",
            OpCode::Ldarg1 => "ldarg.1",
            OpCode::Ldarg2 => "ldarg.2",
            OpCode::Ldarg3 => "ldarg.3",
            OpCode::LdargS => "ldarg.s",
            OpCode::LdlocS => "ldloc.s",
            OpCode::StlocS => "stloc.s",
            OpCode::Ldloc => "ldloc",
            OpCode::Stloc => "stloc",
            OpCode::LdlocaS => "ldloca.s",
            OpCode::LdcI4M1 => "ldc.i4.m1",
            OpCode::LdcI40 => "ldc.i4.0",
            OpCode::LdcI41 => "ldc.i4.1",
            OpCode::LdcI42 => "ldc.i4.2",
            OpCode::LdcI43 => "ldc.i4.3",
            OpCode::LdcI44 => "ldc.i4.4",
            OpCode::LdcI45 => "ldc.i4.5",
            OpCode::LdcI46 => "ldc.i4.6",
            OpCode::LdcI47 => "ldc.i4.7",
            OpCode::LdcI48 => "ldc.i4.8",
            OpCode::LdcI4S => "ldc.i4.s",
            OpCode::LdcI4 => "ldc.i4",
            OpCode::LdcI8 => "ldc.i8",
            OpCode::LdcR4 => "ldc.r4",
            OpCode::LdcR8 => "ldc.r8",
            OpCode::Ldstr => "ldstr",
            OpCode::Ldnull => "ldnull",
            OpCode::Call => "call",
            OpCode::Callvirt => "callvirt",
            OpCode::Newobj => "newobj",
            OpCode::BrS => "br.s",
            OpCode::Br => "br",
            OpCode::BrtrueS => "brtrue.s",
            OpCode::BrfalseS => "brfalse.s",
            OpCode::BltS => "blt.s",
            OpCode::Leave => "leave",
            OpCode::LeaveS => "leave.s",
            OpCode::Endfinally => "endfinally",
            OpCode::Switch => "switch",
            OpCode::Add => "add",
            OpCode::Sub => "sub",
            OpCode::Mul => "mul",
            OpCode::Div => "div",
            OpCode::Rem => "rem",
            OpCode::Neg => "neg",
            OpCode::And => "and",
            OpCode::Or => "or",
            OpCode::Xor => "xor",
            OpCode::Not => "not",
            OpCode::Shl => "shl",
            OpCode::Shr => "shr",
            OpCode::ConvI4 => "conv.i4",
            OpCode::ConvU1 => "conv.u1",
            OpCode::ConvI8 => "conv.i8",
            OpCode::Newarr => "newarr",
            OpCode::Ldlen => "ldlen",
            OpCode::LdelemU1 => "ldelem.u1",
            OpCode::StelemI1 => "stelem.i1",
            OpCode::Ldtoken => "ldtoken",
            OpCode::Ldfld => "ldfld",
            OpCode::Stfld => "stfld",
            OpCode::Ldsfld => "ldsfld",
            OpCode::Stsfld => "stsfld",
            OpCode::Box => "box",
            OpCode::UnboxAny => "unbox.any",
            OpCode::Castclass => "castclass",
            OpCode::Isinst => "isinst",
            OpCode::Initobj => "initobj",
            OpCode::Throw => "throw",
        }
    }

    /// Returns true for any `ldc.i4`-family opcode.
    ///
    /// The decryption-setup idiom begins with an int-immediate load for the
    /// array length; any of the short forms, `ldc.i4.s`, or the full
    /// `ldc.i4` qualifies (the mnemonic starts with `ldc.i4`).
    #[must_use]
    pub const fn is_ldc_i4(self) -> bool {
        matches!(
            self,
            OpCode::LdcI4M1
                | OpCode::LdcI40
                | OpCode::LdcI41
                | OpCode::LdcI42
                | OpCode::LdcI43
                | OpCode::LdcI44
                | OpCode::LdcI45
                | OpCode::LdcI46
                | OpCode::LdcI47
                | OpCode::LdcI48
                | OpCode::LdcI4S
                | OpCode::LdcI4
        )
    }

    /// Returns true if this opcode ends the method (return family).
    #[must_use]
    pub const fn is_return(self) -> bool {
        matches!(self, OpCode::Ret)
    }

    /// How this opcode affects control flow.
    #[must_use]
    pub const fn flow_type(self) -> FlowType {
        match self {
            OpCode::Ret => FlowType::Return,
            OpCode::Call | OpCode::Callvirt | OpCode::Newobj => FlowType::Call,
            OpCode::BrS | OpCode::Br => FlowType::UnconditionalBranch,
            OpCode::BrtrueS | OpCode::BrfalseS | OpCode::BltS | OpCode::Switch => {
                FlowType::ConditionalBranch
            }
            OpCode::Leave | OpCode::LeaveS => FlowType::Leave,
            OpCode::Endfinally => FlowType::EndFinally,
            OpCode::Throw => FlowType::Throw,
            _ => FlowType::Sequential,
        }
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
