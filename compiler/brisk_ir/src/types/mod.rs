//! Type descriptors.
//!
//! A [`TypeDesc`] describes the shape of a runtime value. Descriptors are
//! immutable once built and cheap to clone: composite shapes keep their
//! contents behind `Arc`, so cloning a descriptor never copies field lists.
//!
//! Names inside one descriptor (record fields, bit-view fields) are unique
//! under case-insensitive comparison; the constructors enforce this and
//! return [`DescriptorError`] otherwise.

mod bitview;
mod error;
mod record;

use std::fmt;
use std::sync::Arc;

pub use bitview::{BitField, BitViewKind, BitViewType, BitWidth};
pub use error::DescriptorError;
pub use record::{FieldDesc, RecordShape};

/// Primitive value kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScalarKind {
    /// Unsigned 8-bit integer.
    Byte,
    /// Signed 32-bit integer.
    Int,
    /// Signed 64-bit integer.
    Long,
    /// 32-bit float.
    Float,
    /// 64-bit float.
    Double,
    Bool,
    String,
    /// Accepts any value without conversion.
    Any,
}

impl ScalarKind {
    /// Canonical lowercase name, as reported by `typeof`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Byte => "byte",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Bool => "bool",
            Self::String => "string",
            Self::Any => "any",
        }
    }

    /// Parse a scalar kind from a type keyword, ignoring case.
    ///
    /// Accepts the long spellings (`integer`, `boolean`) as well.
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name.to_ascii_lowercase().as_str() {
            "byte" => Self::Byte,
            "int" | "integer" => Self::Int,
            "long" => Self::Long,
            "float" => Self::Float,
            "double" => Self::Double,
            "bool" | "boolean" => Self::Bool,
            "string" | "str" => Self::String,
            "any" => Self::Any,
            _ => return None,
        };
        Some(kind)
    }

    #[inline]
    pub const fn is_integer(self) -> bool {
        matches!(self, Self::Byte | Self::Int | Self::Long)
    }

    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::Float | Self::Double)
    }

    #[inline]
    pub const fn is_numeric(self) -> bool {
        self.is_integer() || self.is_float()
    }

    /// Position on the numeric promotion ladder (`byte < int < long < float < double`).
    ///
    /// Returns `None` for non-numeric kinds.
    pub const fn numeric_rank(self) -> Option<u8> {
        match self {
            Self::Byte => Some(0),
            Self::Int => Some(1),
            Self::Long => Some(2),
            Self::Float => Some(3),
            Self::Double => Some(4),
            Self::Bool | Self::String | Self::Any => None,
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Shape of an array: element descriptor plus optional fixed length.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArrayShape {
    element: Arc<TypeDesc>,
    size: Option<usize>,
}

impl ArrayShape {
    /// A fixed-length array of `size` elements.
    pub fn fixed(element: TypeDesc, size: usize) -> Self {
        ArrayShape {
            element: Arc::new(element),
            size: Some(size),
        }
    }

    /// A growable array.
    pub fn dynamic(element: TypeDesc) -> Self {
        ArrayShape {
            element: Arc::new(element),
            size: None,
        }
    }

    #[inline]
    pub fn element(&self) -> &TypeDesc {
        &self.element
    }

    #[inline]
    pub fn size(&self) -> Option<usize> {
        self.size
    }

    #[inline]
    pub fn is_fixed(&self) -> bool {
        self.size.is_some()
    }
}

/// Descriptor of a runtime value's shape.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeDesc {
    Scalar(ScalarKind),
    Record(RecordShape),
    Array(ArrayShape),
    /// One boolean per bit over a backing integer.
    Bitmap(BitViewType),
    /// Multi-bit integer fields over a backing integer.
    Intmap(BitViewType),
}

impl TypeDesc {
    pub const BYTE: TypeDesc = TypeDesc::Scalar(ScalarKind::Byte);
    pub const INT: TypeDesc = TypeDesc::Scalar(ScalarKind::Int);
    pub const LONG: TypeDesc = TypeDesc::Scalar(ScalarKind::Long);
    pub const FLOAT: TypeDesc = TypeDesc::Scalar(ScalarKind::Float);
    pub const DOUBLE: TypeDesc = TypeDesc::Scalar(ScalarKind::Double);
    pub const BOOL: TypeDesc = TypeDesc::Scalar(ScalarKind::Bool);
    pub const STRING: TypeDesc = TypeDesc::Scalar(ScalarKind::String);
    pub const ANY: TypeDesc = TypeDesc::Scalar(ScalarKind::Any);

    /// Wrap a bit-view type in the variant matching its kind.
    pub fn bit_view(view: BitViewType) -> Self {
        match view.kind() {
            BitViewKind::Bitmap => TypeDesc::Bitmap(view),
            BitViewKind::Intmap => TypeDesc::Intmap(view),
        }
    }

    /// The scalar kind, if this is a scalar descriptor.
    #[inline]
    pub fn as_scalar(&self) -> Option<ScalarKind> {
        match self {
            TypeDesc::Scalar(kind) => Some(*kind),
            _ => None,
        }
    }

    /// The bit-view type, for either bitmap or intmap descriptors.
    pub fn as_bit_view(&self) -> Option<&BitViewType> {
        match self {
            TypeDesc::Bitmap(view) | TypeDesc::Intmap(view) => Some(view),
            _ => None,
        }
    }

    #[inline]
    pub fn is_any(&self) -> bool {
        matches!(self, TypeDesc::Scalar(ScalarKind::Any))
    }
}

impl From<ScalarKind> for TypeDesc {
    fn from(kind: ScalarKind) -> Self {
        TypeDesc::Scalar(kind)
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDesc::Scalar(kind) => write!(f, "{kind}"),
            TypeDesc::Record(shape) => write!(f, "{shape}"),
            TypeDesc::Array(shape) => match shape.size() {
                Some(n) => write!(f, "array.{}[{n}]", shape.element()),
                None => write!(f, "array.{}[*]", shape.element()),
            },
            TypeDesc::Bitmap(view) | TypeDesc::Intmap(view) => write!(f, "{view}"),
        }
    }
}

/// A type as written in source: either an inline descriptor or an alias
/// name to resolve through the alias registry at evaluation time.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeRef {
    Desc(TypeDesc),
    Alias(String),
}

impl TypeRef {
    pub fn alias(name: impl Into<String>) -> Self {
        TypeRef::Alias(name.into())
    }
}

impl From<TypeDesc> for TypeRef {
    fn from(desc: TypeDesc) -> Self {
        TypeRef::Desc(desc)
    }
}

impl From<ScalarKind> for TypeRef {
    fn from(kind: ScalarKind) -> Self {
        TypeRef::Desc(TypeDesc::Scalar(kind))
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Desc(desc) => write!(f, "{desc}"),
            TypeRef::Alias(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests;
