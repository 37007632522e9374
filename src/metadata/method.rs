//! Method definitions and attribute flags.

use bitflags::bitflags;

use crate::metadata::{GenericParam, MethodBody, TypeRef};

bitflags! {
    /// Method attribute flags, after ECMA-335 `MethodAttributes`.
    ///
    /// `PUBLIC` is the three-bit access value `0b110`; the simplified model
    /// only distinguishes public from everything else, so testing for
    /// containment of the full pattern is sufficient.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MethodAttributes: u32 {
        /// Accessible by anyone who can see the declaring type.
        const PUBLIC = 0x0006;
        /// Defined on the type rather than per instance.
        const STATIC = 0x0010;
        /// Cannot be overridden.
        const FINAL = 0x0020;
        /// Virtual dispatch.
        const VIRTUAL = 0x0040;
        /// No implementation provided.
        const ABSTRACT = 0x0400;
        /// The name carries semantic meaning to tools (property accessors,
        /// operators).
        const SPECIAL_NAME = 0x0800;
        /// The runtime itself interprets the name (`.ctor`, `.cctor`).
        const RT_SPECIAL_NAME = 0x1000;
    }
}

/// A method parameter.
#[derive(Debug, Clone)]
pub struct Parameter {
    /// Parameter name; obfuscators routinely null these out.
    pub name: Option<String>,
    /// The parameter's type.
    pub param_type: TypeRef,
}

impl Parameter {
    /// Creates an unnamed parameter of the given type.
    #[must_use]
    pub fn new(param_type: TypeRef) -> Self {
        Self {
            name: None,
            param_type,
        }
    }
}

/// A method definition. Belongs to exactly one type.
#[derive(Debug, Clone)]
pub struct MethodDef {
    /// The method's short name. Renamed only after analysis has frozen the
    /// live sets.
    pub name: String,
    /// Attribute flags.
    pub flags: MethodAttributes,
    /// The return type; [`TypeRef::Void`] for `void`.
    pub return_type: TypeRef,
    /// Ordered parameters.
    pub params: Vec<Parameter>,
    /// Generic parameters, each possibly constrained.
    pub generic_params: Vec<GenericParam>,
    /// The IL body, absent for abstract / runtime-provided methods.
    pub body: Option<MethodBody>,
}

impl MethodDef {
    /// Creates a bodiless method; attach a body via the `body` field.
    #[must_use]
    pub fn new(name: impl Into<String>, flags: MethodAttributes, return_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            flags,
            return_type,
            params: Vec::new(),
            generic_params: Vec::new(),
            body: None,
        }
    }

    /// True for instance and static constructors.
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.name == ".ctor" || self.name == ".cctor"
    }

    /// True if the name is special to tools or the runtime.
    #[must_use]
    pub fn is_special_name(&self) -> bool {
        self.flags
            .intersects(MethodAttributes::SPECIAL_NAME | MethodAttributes::RT_SPECIAL_NAME)
    }

    /// True if the method is static.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.flags.contains(MethodAttributes::STATIC)
    }

    /// True if the method is public.
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.flags.contains(MethodAttributes::PUBLIC)
    }

    /// True if the method is abstract (and therefore has no body to blank).
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.flags.contains(MethodAttributes::ABSTRACT)
    }

    /// Renders the parenthesized parameter-type list used in full names.
    #[must_use]
    pub fn signature(&self) -> String {
        let params: Vec<String> = self
            .params
            .iter()
            .map(|p| p.param_type.full_name())
            .collect();
        format!("({})", params.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructor_and_special_name() {
        let ctor = MethodDef::new(
            ".ctor",
            MethodAttributes::PUBLIC | MethodAttributes::RT_SPECIAL_NAME,
            TypeRef::Void,
        );
        assert!(ctor.is_constructor());
        assert!(ctor.is_special_name());

        let getter = MethodDef::new(
            "get_Health",
            MethodAttributes::PUBLIC | MethodAttributes::SPECIAL_NAME,
            TypeRef::Primitive(crate::metadata::ElementKind::I4),
        );
        assert!(!getter.is_constructor());
        assert!(getter.is_special_name());
    }

    #[test]
    fn signature_rendering() {
        let mut m = MethodDef::new(
            "Decrypt",
            MethodAttributes::PUBLIC | MethodAttributes::STATIC,
            TypeRef::String,
        );
        m.params.push(Parameter::new(TypeRef::byte_array()));
        m.params.push(Parameter::new(TypeRef::byte_array()));
        assert_eq!(m.signature(), "(System.Byte[],System.Byte[])");
    }
}
