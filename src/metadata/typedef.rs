//! Type definitions and attribute flags.

use bitflags::bitflags;

use crate::metadata::{FieldDef, MethodDef, TypeId, TypeRef};

bitflags! {
    /// Type attribute flags, after ECMA-335 `TypeAttributes`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TypeAttributes: u32 {
        /// Visible outside the assembly.
        const PUBLIC = 0x0001;
        /// Fields are laid out at explicit offsets (the obfuscator's blob
        /// carrier structs use this).
        const EXPLICIT_LAYOUT = 0x0010;
        /// Cannot be instantiated directly.
        const ABSTRACT = 0x0080;
        /// Cannot be derived from.
        const SEALED = 0x0100;
        /// The name carries semantic meaning to tools.
        const SPECIAL_NAME = 0x0400;
    }
}

/// A generic parameter with its constraint types.
#[derive(Debug, Clone)]
pub struct GenericParam {
    /// The parameter name (`T`, `TKey`, ...).
    pub name: String,
    /// Constraint type references.
    pub constraints: Vec<TypeRef>,
}

impl GenericParam {
    /// Creates an unconstrained generic parameter.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constraints: Vec::new(),
        }
    }
}

/// A property declaration.
#[derive(Debug, Clone)]
pub struct Property {
    /// The property name.
    pub name: String,
    /// The property type.
    pub property_type: TypeRef,
}

/// An event declaration.
#[derive(Debug, Clone)]
pub struct EventDef {
    /// The event name.
    pub name: String,
    /// The event handler type.
    pub event_type: TypeRef,
}

/// A type definition.
///
/// Owns its members exclusively. The `methods` list is ordered and mutable
/// — the reorder pass rewrites it wholesale. Nesting is represented by
/// [`TypeId`] links maintained by the owning [`Module`](crate::metadata::Module).
#[derive(Debug, Clone)]
pub struct TypeDef {
    /// Namespace, empty for the global namespace and for nested types.
    pub namespace: String,
    /// Short name. Renamed only after analysis has frozen the live sets.
    pub name: String,
    /// Attribute flags.
    pub flags: TypeAttributes,
    /// Base type reference, `None` only for `System.Object` itself and
    /// interfaces.
    pub base: Option<TypeRef>,
    /// Implemented interface references.
    pub interfaces: Vec<TypeRef>,
    /// Ordered fields.
    pub fields: Vec<FieldDef>,
    /// Ordered properties.
    pub properties: Vec<Property>,
    /// Ordered events.
    pub events: Vec<EventDef>,
    /// Custom attribute type references.
    pub custom_attributes: Vec<TypeRef>,
    /// Generic parameters, each possibly constrained.
    pub generic_params: Vec<GenericParam>,
    /// Ordered, mutable method list.
    pub methods: Vec<MethodDef>,
    pub(crate) declaring: Option<TypeId>,
    pub(crate) nested: Vec<TypeId>,
}

impl TypeDef {
    /// Creates a class deriving from `System.Object` with no members.
    #[must_use]
    pub fn new(namespace: impl Into<String>, name: impl Into<String>, flags: TypeAttributes) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            flags,
            base: Some(TypeRef::Object),
            interfaces: Vec::new(),
            fields: Vec::new(),
            properties: Vec::new(),
            events: Vec::new(),
            custom_attributes: Vec::new(),
            generic_params: Vec::new(),
            methods: Vec::new(),
            declaring: None,
            nested: Vec::new(),
        }
    }

    /// Same as [`TypeDef::new`] with an explicit base type.
    #[must_use]
    pub fn with_base(
        namespace: impl Into<String>,
        name: impl Into<String>,
        flags: TypeAttributes,
        base: TypeRef,
    ) -> Self {
        let mut ty = Self::new(namespace, name, flags);
        ty.base = Some(base);
        ty
    }

    /// True if this definition is an enum.
    ///
    /// ECMA-335 has no "enum" flag bit; the test is the one Cecil applies —
    /// the base type is `System.Enum`.
    #[must_use]
    pub fn is_enum(&self) -> bool {
        self.base
            .as_ref()
            .is_some_and(|b| b.full_name() == "System.Enum")
    }

    /// True if this definition is a value type (struct or enum).
    #[must_use]
    pub fn is_value_type(&self) -> bool {
        self.base.as_ref().is_some_and(|b| {
            let base_name = b.full_name();
            base_name == "System.ValueType" || base_name == "System.Enum"
        })
    }

    /// True if the type is public.
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.flags.contains(TypeAttributes::PUBLIC)
    }

    /// Nested type handles, in declaration order.
    #[must_use]
    pub fn nested_types(&self) -> &[TypeId] {
        &self.nested
    }

    /// The enclosing type, if this type is nested.
    #[must_use]
    pub fn declaring_type(&self) -> Option<TypeId> {
        self.declaring
    }
}
