//! Mutable assembly object model.
//!
//! This module is the binding surface between the deobfuscation core and
//! whatever loads and stores physical assembly files. A [`Module`] owns its
//! type tree exclusively; a [`TypeDef`] owns its methods, fields,
//! properties, events, and attributes; a [`MethodDef`] owns its body.
//! References ([`TypeRef`], [`MethodRef`], [`FieldRef`]) name entities but
//! never own them, and resolution may fail — references into other modules
//! stay unresolved, which every consumer treats as a silent skip.
//!
//! # Identity
//!
//! Definitions are addressed by arena handles ([`TypeId`]) assigned at load
//! time; analyses key on textual full names captured before any rename.
//! Renaming a type or method changes only its short name and is legal only
//! after all analysis has completed — the pipeline enforces this ordering.
//!
//! # Full-name format
//!
//! Types render as `Namespace.Outer/Inner`; methods render as
//! `RetType DeclaringType::Name(ParamType,ParamType)`. The execution-log
//! producer emits exactly this method format, so log lines are usable as
//! lookup keys without further normalization.

mod body;
mod field;
mod method;
mod module;
mod refs;
mod typedef;

pub use body::{ExceptionHandler, HandlerKind, LocalVariable, MethodBody};
pub use field::FieldDef;
pub use method::{MethodAttributes, MethodDef, Parameter};
pub use module::{Module, TypeId, TypeIter};
pub use refs::{ElementKind, FieldRef, MethodRef, TypeRef};
pub use typedef::{EventDef, GenericParam, Property, TypeAttributes, TypeDef};
