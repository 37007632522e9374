//! Blanking of dead method bodies.
//!
//! A dead method keeps its signature (callers may still reference it in
//! dead code) but its body is replaced by the shortest sequence that loads
//! the return type's default value and returns. The resulting assembly
//! only needs to satisfy a decompiler, not the verifier — but the bodies
//! emitted here happen to verify anyway.

use crate::analysis::LiveSets;
use crate::assembly::{Immediate, Instruction, OpCode, Operand};
use crate::deobfuscation::{EventKind, EventLog};
use crate::metadata::{ElementKind, LocalVariable, MethodDef, Module, TypeId, TypeRef};

/// The IL shape of a return type's default value.
///
/// Computed from the return-type reference, resolving in-module named
/// types to distinguish enums (plain `ldc.i4.0`) from structs (a fresh
/// zero-initialized local).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultValue {
    /// `void` — nothing to load.
    Nothing,
    /// `ldc.i4.0` — bool, char, integers up to 32 bits, and enums.
    Int32Zero,
    /// `ldc.i8 0`.
    Int64Zero,
    /// `ldc.r4 0.0`.
    Float32Zero,
    /// `ldc.r8 0.0`.
    Float64Zero,
    /// `ldnull` — any reference type.
    Null,
    /// `ldloca.s L; initobj T; ldloc L` over a fresh local — any other
    /// value type.
    ValueTypeDefault(TypeRef),
}

impl DefaultValue {
    /// Chooses the default-value shape for a return type.
    #[must_use]
    pub fn for_return_type(return_type: &TypeRef, module: &Module) -> Self {
        match return_type {
            TypeRef::Void => DefaultValue::Nothing,
            TypeRef::Primitive(kind) if kind.is_int32_sized() => DefaultValue::Int32Zero,
            TypeRef::Primitive(ElementKind::I8 | ElementKind::U8) => DefaultValue::Int64Zero,
            TypeRef::Primitive(ElementKind::R4) => DefaultValue::Float32Zero,
            TypeRef::Primitive(ElementKind::R8) => DefaultValue::Float64Zero,
            TypeRef::Primitive(_) => DefaultValue::Int32Zero,
            TypeRef::String | TypeRef::Object | TypeRef::Array(_) | TypeRef::GenericParam(_) => {
                DefaultValue::Null
            }
            TypeRef::Named { .. } | TypeRef::GenericInstance { .. } => {
                // Resolution refines the reference: an in-module definition
                // tells us enum-ness directly, otherwise the signature's
                // value-type bit decides.
                if let Some(id) = return_type.resolve(module) {
                    let def = module.type_def(id);
                    if def.is_enum() {
                        return DefaultValue::Int32Zero;
                    }
                    if def.is_value_type() {
                        return DefaultValue::ValueTypeDefault(return_type.clone());
                    }
                    return DefaultValue::Null;
                }
                if return_type.is_value_type() {
                    DefaultValue::ValueTypeDefault(return_type.clone())
                } else {
                    DefaultValue::Null
                }
            }
        }
    }
}

/// Replaces a method's body with `default(return-type); ret`.
///
/// Returns false when there is nothing to blank — the method is abstract
/// or has no body. Otherwise the instruction list, exception handlers, and
/// locals are cleared; a local is synthesized (and `init_locals` set) only
/// for non-trivial value-type defaults.
pub fn invalidate_method(method: &mut MethodDef, default: &DefaultValue) -> bool {
    if method.is_abstract() {
        return false;
    }
    let Some(body) = method.body.as_mut() else {
        return false;
    };

    body.instructions.clear();
    body.exception_handlers.clear();
    body.locals.clear();
    body.init_locals = false;

    match default {
        DefaultValue::Nothing => {}
        DefaultValue::Int32Zero => {
            body.instructions.push(Instruction::simple(OpCode::LdcI40));
        }
        DefaultValue::Int64Zero => {
            body.instructions.push(Instruction::new(
                OpCode::LdcI8,
                Operand::Immediate(Immediate::Int64(0)),
            ));
        }
        DefaultValue::Float32Zero => {
            body.instructions.push(Instruction::new(
                OpCode::LdcR4,
                Operand::Immediate(Immediate::Float32(0.0)),
            ));
        }
        DefaultValue::Float64Zero => {
            body.instructions.push(Instruction::new(
                OpCode::LdcR8,
                Operand::Immediate(Immediate::Float64(0.0)),
            ));
        }
        DefaultValue::Null => {
            body.instructions.push(Instruction::simple(OpCode::Ldnull));
        }
        DefaultValue::ValueTypeDefault(value_type) => {
            body.locals.push(LocalVariable::new(value_type.clone()));
            body.init_locals = true;
            let slot = u16::try_from(body.locals.len() - 1).unwrap_or(u16::MAX);
            body.instructions
                .push(Instruction::new(OpCode::LdlocaS, Operand::Local(slot)));
            body.instructions.push(Instruction::new(
                OpCode::Initobj,
                Operand::Type(value_type.clone()),
            ));
            body.instructions
                .push(Instruction::new(OpCode::Ldloc, Operand::Local(slot)));
        }
    }
    body.instructions.push(Instruction::simple(OpCode::Ret));
    true
}

/// Blanks the body of every method not in the live set. Returns the number
/// of bodies actually rewritten.
pub fn invalidate_unused(module: &mut Module, live: &LiveSets, events: &mut EventLog) -> usize {
    // Plan with shared access (default-value choice may resolve types),
    // then apply mutably.
    let mut plans: Vec<(TypeId, usize, DefaultValue, String)> = Vec::new();
    for id in module.types() {
        for index in 0..module.type_def(id).methods.len() {
            let full_name = module.method_full_name(id, index);
            if live.method_is_live(&full_name) {
                continue;
            }
            let method = &module.type_def(id).methods[index];
            let default = DefaultValue::for_return_type(&method.return_type, module);
            plans.push((id, index, default, full_name));
        }
    }

    let mut invalidated = 0;
    for (id, index, default, full_name) in plans {
        let method = &mut module.type_def_mut(id).methods[index];
        if invalidate_method(method, &default) {
            events
                .record(EventKind::BodyInvalidated)
                .subject(full_name);
            invalidated += 1;
        }
    }
    invalidated
}
