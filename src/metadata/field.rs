//! Field definitions.

use crate::metadata::TypeRef;

/// A field belonging to a type definition.
///
/// For static fields of blittable-blob type the obfuscator stores the raw
/// initializer bytes in assembly metadata (FieldRVA); that blob is what the
/// string folder reads back to reconstruct key and data arrays.
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// The field's short name.
    pub name: String,
    /// The field's type.
    pub field_type: TypeRef,
    /// Raw initializer bytes from the metadata, if the field has any.
    pub initial_value: Option<Vec<u8>>,
}

impl FieldDef {
    /// Creates a field with no initializer blob.
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            field_type,
            initial_value: None,
        }
    }

    /// Creates a field carrying an initializer blob.
    #[must_use]
    pub fn with_initial_value(
        name: impl Into<String>,
        field_type: TypeRef,
        blob: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            field_type,
            initial_value: Some(blob),
        }
    }
}
