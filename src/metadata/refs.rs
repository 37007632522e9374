//! Type, method, and field references.
//!
//! References are possibly-unresolved names. A [`TypeRef`] categorizes the
//! referent enough for the passes to act without resolution (primitive
//! kinds, array shapes, generic instances), while [`TypeRef::resolve`]
//! attempts the in-module lookup and simply returns `None` for anything
//! defined elsewhere.

use crate::metadata::{FieldDef, Module, TypeId};

/// Primitive element kinds, after ECMA-335 element types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)] // the kinds are the ECMA element-type names
pub enum ElementKind {
    Bool,
    Char,
    I1,
    U1,
    I2,
    U2,
    I4,
    U4,
    I8,
    U8,
    R4,
    R8,
}

impl ElementKind {
    /// The BCL full name of the primitive (`System.Int32`, ...).
    #[must_use]
    pub const fn full_name(self) -> &'static str {
        match self {
            ElementKind::Bool => "System.Boolean",
            ElementKind::Char => "System.Char",
            ElementKind::I1 => "System.SByte",
            ElementKind::U1 => "System.Byte",
            ElementKind::I2 => "System.Int16",
            ElementKind::U2 => "System.UInt16",
            ElementKind::I4 => "System.Int32",
            ElementKind::U4 => "System.UInt32",
            ElementKind::I8 => "System.Int64",
            ElementKind::U8 => "System.UInt64",
            ElementKind::R4 => "System.Single",
            ElementKind::R8 => "System.Double",
        }
    }

    /// True for kinds whose default value is a 32-bit integer zero
    /// (`ldc.i4.0` suffices).
    #[must_use]
    pub const fn is_int32_sized(self) -> bool {
        matches!(
            self,
            ElementKind::Bool
                | ElementKind::Char
                | ElementKind::I1
                | ElementKind::U1
                | ElementKind::I2
                | ElementKind::U2
                | ElementKind::I4
                | ElementKind::U4
        )
    }
}

/// A possibly-unresolved reference to a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// `System.Void`.
    Void,
    /// A primitive value type.
    Primitive(ElementKind),
    /// `System.String`.
    String,
    /// `System.Object`.
    Object,
    /// A single-dimensional array of the element type.
    Array(Box<TypeRef>),
    /// A named class or value type, possibly in another module.
    Named {
        /// Full name of the referent (`Namespace.Outer/Inner`).
        full_name: String,
        /// Whether the referent is a value type, as recorded in the
        /// referencing signature.
        value_type: bool,
    },
    /// A constructed generic type (`Container<Foo, Bar>`).
    GenericInstance {
        /// The open generic element type.
        element: Box<TypeRef>,
        /// The generic arguments, in declaration order.
        args: Vec<TypeRef>,
    },
    /// A generic parameter in scope (`T`). Never resolvable; liveness
    /// marking skips these entirely.
    GenericParam(String),
}

impl TypeRef {
    /// A reference to a named class (reference type).
    #[must_use]
    pub fn named(full_name: impl Into<String>) -> Self {
        TypeRef::Named {
            full_name: full_name.into(),
            value_type: false,
        }
    }

    /// A reference to a named value type (struct or enum).
    #[must_use]
    pub fn named_value_type(full_name: impl Into<String>) -> Self {
        TypeRef::Named {
            full_name: full_name.into(),
            value_type: true,
        }
    }

    /// `System.Byte[]` — the parameter type of every decryption helper.
    #[must_use]
    pub fn byte_array() -> Self {
        TypeRef::Array(Box::new(TypeRef::Primitive(ElementKind::U1)))
    }

    /// Renders the textual full name of the referent.
    ///
    /// Arrays render as `Element[]`, generic instances as
    /// `Element<Arg,Arg>`. These strings are the identity keys used by the
    /// liveness analysis.
    #[must_use]
    pub fn full_name(&self) -> String {
        match self {
            TypeRef::Void => "System.Void".to_string(),
            TypeRef::Primitive(kind) => kind.full_name().to_string(),
            TypeRef::String => "System.String".to_string(),
            TypeRef::Object => "System.Object".to_string(),
            TypeRef::Array(element) => format!("{}[]", element.full_name()),
            TypeRef::Named { full_name, .. } => full_name.clone(),
            TypeRef::GenericInstance { element, args } => {
                let args: Vec<String> = args.iter().map(TypeRef::full_name).collect();
                format!("{}<{}>", element.full_name(), args.join(","))
            }
            TypeRef::GenericParam(name) => name.clone(),
        }
    }

    /// True if this reference is a generic parameter (not an instance).
    #[must_use]
    pub fn is_generic_param(&self) -> bool {
        matches!(self, TypeRef::GenericParam(_))
    }

    /// Whether the referent is a value type, judged from the reference
    /// alone (no resolution).
    #[must_use]
    pub fn is_value_type(&self) -> bool {
        match self {
            TypeRef::Void | TypeRef::Primitive(_) => true,
            TypeRef::String | TypeRef::Object | TypeRef::Array(_) | TypeRef::GenericParam(_) => {
                false
            }
            TypeRef::Named { value_type, .. } => *value_type,
            TypeRef::GenericInstance { element, .. } => element.is_value_type(),
        }
    }

    /// Attempts to resolve this reference to a definition in `module`.
    ///
    /// Returns `None` for primitives, generic parameters, and anything not
    /// defined in the module — external references are expected and never
    /// an error.
    #[must_use]
    pub fn resolve(&self, module: &Module) -> Option<TypeId> {
        match self {
            TypeRef::Named { full_name, .. } => module.find_type(full_name),
            TypeRef::GenericInstance { element, .. } => element.resolve(module),
            _ => None,
        }
    }
}

/// A possibly-unresolved reference to a method.
///
/// Carries both the short name (the `InitializeArray` check needs it) and
/// the full name (the call-graph edge key).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodRef {
    /// The method's short name.
    pub name: String,
    /// The method's full name, including declaring type and signature.
    pub full_name: String,
}

impl MethodRef {
    /// Creates a method reference.
    #[must_use]
    pub fn new(name: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            full_name: full_name.into(),
        }
    }
}

/// A possibly-unresolved reference to a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRef {
    /// The field's short name.
    pub name: String,
    /// Full name of the declaring type.
    pub declaring_type: String,
    /// The field's type, as recorded in the referencing signature.
    pub field_type: TypeRef,
}

impl FieldRef {
    /// Creates a field reference.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        declaring_type: impl Into<String>,
        field_type: TypeRef,
    ) -> Self {
        Self {
            name: name.into(),
            declaring_type: declaring_type.into(),
            field_type,
        }
    }

    /// Resolves this reference to a field definition in `module`.
    ///
    /// Fails (returns `None`) if the declaring type or the field is not
    /// defined in the module.
    #[must_use]
    pub fn resolve<'m>(&self, module: &'m Module) -> Option<&'m FieldDef> {
        let type_id = module.find_type(&self.declaring_type)?;
        module
            .type_def(type_id)
            .fields
            .iter()
            .find(|f| f.name == self.name)
    }
}
