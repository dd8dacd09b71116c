use std::fmt;
use std::sync::Arc;

use super::{DescriptorError, TypeDesc};

/// One named field of a record shape.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldDesc {
    pub name: String,
    pub ty: TypeDesc,
}

/// Ordered, named record fields.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecordShape {
    fields: Arc<[FieldDesc]>,
}

impl RecordShape {
    /// Build a shape, rejecting empty or case-insensitively duplicate names.
    pub fn new<N, I>(fields: I) -> Result<Self, DescriptorError>
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, TypeDesc)>,
    {
        let mut out: Vec<FieldDesc> = Vec::new();
        for (name, ty) in fields {
            let name = name.into();
            if name.is_empty() {
                return Err(DescriptorError::EmptyName);
            }
            if out.iter().any(|f| f.name.eq_ignore_ascii_case(&name)) {
                return Err(DescriptorError::DuplicateField { name });
            }
            out.push(FieldDesc { name, ty });
        }
        Ok(RecordShape {
            fields: out.into(),
        })
    }

    #[inline]
    pub fn fields(&self) -> &[FieldDesc] {
        &self.fields
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Case-insensitive field lookup, returning the field's position too.
    pub fn field(&self, name: &str) -> Option<(usize, &FieldDesc)> {
        self.fields
            .iter()
            .enumerate()
            .find(|(_, f)| f.name.eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for RecordShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("record{")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", field.name, field.ty)?;
        }
        f.write_str("}")
    }
}
