//! Convenient re-exports of the most commonly used types.
//!
//! ```rust
//! use trimscope::prelude::*;
//! ```

pub use crate::analysis::{identify_live_code, LiveSets};
pub use crate::assembly::{FlowType, Immediate, Instruction, OpCode, Operand};
pub use crate::deobfuscation::{clean, CleanResult, CleanSummary, EventKind, EventLog};
pub use crate::metadata::{
    ElementKind, FieldDef, FieldRef, MethodAttributes, MethodBody, MethodDef, MethodRef, Module,
    Parameter, TypeAttributes, TypeDef, TypeId, TypeRef,
};
pub use crate::trace::load_roots;
pub use crate::{Error, Result};
