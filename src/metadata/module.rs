//! The module root: type arena and traversal.

use crate::metadata::TypeDef;

/// Stable handle to a type definition within its [`Module`].
///
/// Handles are assigned at load time and survive renames; analyses that
/// need textual identity capture full names before any rename occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(u32);

impl TypeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// The root of the assembly object graph.
///
/// Owns every type definition in a flat arena; nesting is expressed by
/// parent/child [`TypeId`] links. One module per assembly for this tool's
/// purposes.
#[derive(Debug, Clone, Default)]
pub struct Module {
    name: String,
    types: Vec<TypeDef>,
    top_level: Vec<TypeId>,
}

impl Module {
    /// Creates an empty module.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: Vec::new(),
            top_level: Vec::new(),
        }
    }

    /// The module name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a top-level type and returns its handle.
    ///
    /// # Panics
    ///
    /// Panics if the arena exceeds `u32::MAX` entries.
    pub fn add_type(&mut self, ty: TypeDef) -> TypeId {
        let id = TypeId(u32::try_from(self.types.len()).expect("type arena overflow"));
        self.types.push(ty);
        self.top_level.push(id);
        id
    }

    /// Adds a type nested inside `parent` and returns its handle.
    ///
    /// # Panics
    ///
    /// Panics if the arena exceeds `u32::MAX` entries.
    pub fn add_nested_type(&mut self, parent: TypeId, mut ty: TypeDef) -> TypeId {
        let id = TypeId(u32::try_from(self.types.len()).expect("type arena overflow"));
        ty.declaring = Some(parent);
        self.types.push(ty);
        self.types[parent.index()].nested.push(id);
        id
    }

    /// Borrows a type definition.
    #[must_use]
    pub fn type_def(&self, id: TypeId) -> &TypeDef {
        &self.types[id.index()]
    }

    /// Mutably borrows a type definition.
    pub fn type_def_mut(&mut self, id: TypeId) -> &mut TypeDef {
        &mut self.types[id.index()]
    }

    /// Handles of the top-level types, in declaration order.
    #[must_use]
    pub fn top_level_types(&self) -> &[TypeId] {
        &self.top_level
    }

    /// Iterates all types — top-level and nested — in depth-first
    /// pre-order of the nesting tree.
    pub fn types(&self) -> TypeIter<'_> {
        let mut stack: Vec<TypeId> = self.top_level.clone();
        stack.reverse();
        TypeIter {
            module: self,
            stack,
        }
    }

    /// Renders a type's full name (`Namespace.Outer/Inner`).
    #[must_use]
    pub fn type_full_name(&self, id: TypeId) -> String {
        let ty = self.type_def(id);
        match ty.declaring {
            Some(parent) => format!("{}/{}", self.type_full_name(parent), ty.name),
            None if ty.namespace.is_empty() => ty.name.clone(),
            None => format!("{}.{}", ty.namespace, ty.name),
        }
    }

    /// Renders a method's full name
    /// (`RetType DeclaringType::Name(ParamType,ParamType)`).
    ///
    /// This is the identity format the execution log carries.
    #[must_use]
    pub fn method_full_name(&self, id: TypeId, method_index: usize) -> String {
        let method = &self.type_def(id).methods[method_index];
        format!(
            "{} {}::{}{}",
            method.return_type.full_name(),
            self.type_full_name(id),
            method.name,
            method.signature()
        )
    }

    /// Finds a type definition by full name. Linear over the type tree;
    /// analyses that look up in bulk build their own tables.
    #[must_use]
    pub fn find_type(&self, full_name: &str) -> Option<TypeId> {
        self.types().find(|&id| self.type_full_name(id) == full_name)
    }
}

/// Depth-first pre-order iterator over a module's types.
pub struct TypeIter<'a> {
    module: &'a Module,
    stack: Vec<TypeId>,
}

impl Iterator for TypeIter<'_> {
    type Item = TypeId;

    fn next(&mut self) -> Option<TypeId> {
        let id = self.stack.pop()?;
        let nested = &self.module.type_def(id).nested;
        for &child in nested.iter().rev() {
            self.stack.push(child);
        }
        Some(id)
    }
}
