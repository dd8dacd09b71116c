//! Bitmap and intmap view descriptors.
//!
//! A bit view overlays named fields onto the bits of a backing integer.
//! Bitmap fields are single bits read as booleans; intmap fields are
//! multi-bit groups read as unsigned integers. Every field range is
//! validated against the backing width when the descriptor is built.

use std::fmt;
use std::sync::Arc;

use super::DescriptorError;

/// Backing integer width of a bit view.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BitWidth {
    W8,
    W16,
    W32,
    W64,
}

impl BitWidth {
    pub fn from_bits(bits: u32) -> Result<Self, DescriptorError> {
        match bits {
            8 => Ok(Self::W8),
            16 => Ok(Self::W16),
            32 => Ok(Self::W32),
            64 => Ok(Self::W64),
            _ => Err(DescriptorError::UnsupportedWidth { bits }),
        }
    }

    #[inline]
    pub const fn bits(self) -> u32 {
        match self {
            Self::W8 => 8,
            Self::W16 => 16,
            Self::W32 => 32,
            Self::W64 => 64,
        }
    }

    /// Mask covering every bit of the backing integer.
    #[inline]
    pub const fn mask(self) -> u64 {
        low_bits(self.bits())
    }
}

/// Which flavour of view a [`BitViewType`] is.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BitViewKind {
    Bitmap,
    Intmap,
}

/// A named bit range inside the backing integer.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BitField {
    pub name: String,
    pub offset: u32,
    pub width: u32,
}

impl BitField {
    /// Unshifted mask of `width` ones.
    #[inline]
    pub const fn value_mask(&self) -> u64 {
        low_bits(self.width)
    }

    /// Mask of the field's bits in place.
    #[inline]
    pub const fn mask(&self) -> u64 {
        self.value_mask() << self.offset
    }

    /// Largest value the field can hold.
    #[inline]
    pub const fn max_value(&self) -> u64 {
        self.value_mask()
    }

    /// Inclusive index of the field's highest bit.
    #[inline]
    pub const fn last_bit(&self) -> u32 {
        self.offset + self.width - 1
    }

    /// Read the field out of `raw`.
    #[inline]
    pub const fn extract(&self, raw: u64) -> u64 {
        (raw >> self.offset) & self.value_mask()
    }

    /// Write `value` into the field, leaving all other bits of `raw` alone.
    ///
    /// Returns `None` when `value` does not fit in the field.
    pub const fn insert(&self, raw: u64, value: u64) -> Option<u64> {
        if value > self.max_value() {
            return None;
        }
        Some((raw & !self.mask()) | (value << self.offset))
    }
}

#[derive(Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct BitViewInner {
    kind: BitViewKind,
    width: BitWidth,
    fields: Vec<BitField>,
}

/// Validated bitmap or intmap descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BitViewType(Arc<BitViewInner>);

impl BitViewType {
    /// Build a bitmap view: each field is a single bit at the given index.
    pub fn bitmap<N, I>(width: BitWidth, fields: I) -> Result<Self, DescriptorError>
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, u32)>,
    {
        Self::build(
            BitViewKind::Bitmap,
            width,
            fields.into_iter().map(|(name, bit)| (name, bit, 1)),
        )
    }

    /// Build an intmap view from `(name, offset, width)` triples.
    pub fn intmap<N, I>(width: BitWidth, fields: I) -> Result<Self, DescriptorError>
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, u32, u32)>,
    {
        Self::build(BitViewKind::Intmap, width, fields)
    }

    fn build<N, I>(kind: BitViewKind, width: BitWidth, fields: I) -> Result<Self, DescriptorError>
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, u32, u32)>,
    {
        let backing = width.bits();
        let mut out: Vec<BitField> = Vec::new();
        for (name, offset, bits) in fields {
            let name = name.into();
            if name.is_empty() {
                return Err(DescriptorError::EmptyName);
            }
            if bits == 0 {
                return Err(DescriptorError::ZeroWidth { name });
            }
            if u64::from(offset) + u64::from(bits) > u64::from(backing) {
                return Err(DescriptorError::FieldOutOfRange {
                    name,
                    offset,
                    end: offset.saturating_add(bits - 1),
                    backing,
                });
            }
            if out.iter().any(|f| f.name.eq_ignore_ascii_case(&name)) {
                return Err(DescriptorError::DuplicateField { name });
            }
            let field = BitField {
                name,
                offset,
                width: bits,
            };
            if let Some(prev) = out.iter().find(|f| f.mask() & field.mask() != 0) {
                return Err(DescriptorError::OverlappingFields {
                    first: prev.name.clone(),
                    second: field.name,
                });
            }
            out.push(field);
        }
        Ok(BitViewType(Arc::new(BitViewInner {
            kind,
            width,
            fields: out,
        })))
    }

    #[inline]
    pub fn kind(&self) -> BitViewKind {
        self.0.kind
    }

    #[inline]
    pub fn width(&self) -> BitWidth {
        self.0.width
    }

    #[inline]
    pub fn fields(&self) -> &[BitField] {
        &self.0.fields
    }

    /// Case-insensitive field lookup.
    pub fn field(&self, name: &str) -> Option<&BitField> {
        self.0
            .fields
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for BitViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.kind() {
            BitViewKind::Bitmap => "bitmap",
            BitViewKind::Intmap => "intmap",
        };
        write!(f, "{prefix}{}{{", self.width().bits())?;
        for (i, field) in self.fields().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            if field.width == 1 {
                write!(f, "{}:{}", field.name, field.offset)?;
            } else {
                write!(f, "{}:{}-{}", field.name, field.offset, field.last_bit())?;
            }
        }
        f.write_str("}")
    }
}

#[inline]
const fn low_bits(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}
