//! Method bodies: instruction sequences, locals, and exception regions.

use crate::assembly::{FlowType, Instruction};
use crate::metadata::TypeRef;

/// A local variable slot in a method body.
#[derive(Debug, Clone)]
pub struct LocalVariable {
    /// The variable's type.
    pub var_type: TypeRef,
    /// Whether the variable is pinned.
    pub is_pinned: bool,
}

impl LocalVariable {
    /// Creates an unpinned local of the given type.
    #[must_use]
    pub fn new(var_type: TypeRef) -> Self {
        Self {
            var_type,
            is_pinned: false,
        }
    }
}

/// Kind of a protected-region handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    /// Typed catch handler.
    Catch,
    /// Filter handler.
    Filter,
    /// Finally handler.
    Finally,
    /// Fault handler.
    Fault,
}

/// An exception-handling region over a body's instruction range.
///
/// All offsets are instruction indices (the body is index-addressable; the
/// external I/O layer translates to byte offsets on encode).
#[derive(Debug, Clone)]
pub struct ExceptionHandler {
    /// Handler kind.
    pub kind: HandlerKind,
    /// First instruction of the protected region.
    pub try_start: usize,
    /// Past-the-end instruction index of the protected region.
    pub try_end: usize,
    /// First instruction of the handler.
    pub handler_start: usize,
    /// Past-the-end instruction index of the handler.
    pub handler_end: usize,
    /// The caught exception type, for [`HandlerKind::Catch`].
    pub catch_type: Option<TypeRef>,
}

/// The body of a method that has IL.
#[derive(Debug, Clone, Default)]
pub struct MethodBody {
    /// The instruction stream, index-addressable.
    pub instructions: Vec<Instruction>,
    /// Local variable slots.
    pub locals: Vec<LocalVariable>,
    /// Exception-handling regions.
    pub exception_handlers: Vec<ExceptionHandler>,
    /// Whether locals are zero-initialized on entry. Must be set whenever a
    /// pass synthesizes a new local.
    pub init_locals: bool,
}

impl MethodBody {
    /// Creates an empty body.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a body from an instruction sequence.
    #[must_use]
    pub fn with_instructions(instructions: Vec<Instruction>) -> Self {
        Self {
            instructions,
            ..Self::default()
        }
    }

    /// True if the last instruction is in the return family.
    ///
    /// Invariant after body invalidation: every rewritten body satisfies
    /// this.
    #[must_use]
    pub fn ends_with_return(&self) -> bool {
        self.instructions
            .last()
            .is_some_and(|i| i.opcode.flow_type() == FlowType::Return)
    }
}
