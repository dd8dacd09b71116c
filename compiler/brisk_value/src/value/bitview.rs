use std::fmt;

use brisk_ir::{BitViewKind, BitViewType, BitWidth};

use super::Value;
use crate::errors::{bit_overflow, field_not_found, type_mismatch, EvalError};
use crate::EvalResult;

/// A bitmap or intmap view over a backing integer.
///
/// The view is a plain value: writing a field produces a new view, and the
/// evaluator stores it back into whatever variable or slot held the old one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitViewValue {
    ty: BitViewType,
    raw: u64,
}

impl BitViewValue {
    /// A view with every bit clear.
    pub fn zero(ty: BitViewType) -> Self {
        BitViewValue { ty, raw: 0 }
    }

    /// Wrap `raw`, failing if it has bits above the backing width.
    pub fn new(ty: BitViewType, raw: u64) -> Result<Self, EvalError> {
        let width = ty.width();
        if raw & !width.mask() != 0 {
            return Err(bit_overflow(&ty.to_string(), raw, width.bits()));
        }
        Ok(BitViewValue { ty, raw })
    }

    #[inline]
    pub fn ty(&self) -> &BitViewType {
        &self.ty
    }

    #[inline]
    pub fn raw(&self) -> u64 {
        self.raw
    }

    /// Read a field: booleans for bitmaps, integers for intmaps.
    pub fn get(&self, name: &str) -> EvalResult {
        let field = self
            .ty
            .field(name)
            .ok_or_else(|| field_not_found(name, &self.ty))?;
        let bits = field.extract(self.raw);
        Ok(match self.ty.kind() {
            BitViewKind::Bitmap => Value::Bool(bits != 0),
            BitViewKind::Intmap if field.width <= 31 => Value::Int(bits as i32),
            BitViewKind::Intmap => Value::Long(bits as i64),
        })
    }

    /// Write a field, preserving every other bit.
    ///
    /// Values that do not fit the field fail; nothing is truncated. Bitmap
    /// flags take a bool or an integer `0`/`1`.
    pub fn with_field(&self, name: &str, value: &Value) -> Result<Self, EvalError> {
        let field = self
            .ty
            .field(name)
            .ok_or_else(|| field_not_found(name, &self.ty))?;
        let bits = match (self.ty.kind(), value) {
            (BitViewKind::Bitmap, Value::Bool(b)) => u64::from(*b),
            (kind, other) => {
                let Some(n) = other.as_i64() else {
                    let expected = match kind {
                        BitViewKind::Bitmap => "bool",
                        BitViewKind::Intmap => "integer",
                    };
                    return Err(type_mismatch(expected, other.type_name()));
                };
                u64::try_from(n)
                    .map_err(|_| bit_overflow(&format!("field `{}`", field.name), n, field.width))?
            }
        };
        let raw = field
            .insert(self.raw, bits)
            .ok_or_else(|| bit_overflow(&format!("field `{}`", field.name), bits, field.width))?;
        Ok(BitViewValue {
            ty: self.ty.clone(),
            raw,
        })
    }

    /// The backing integer as the scalar matching its width.
    pub fn to_integer(&self) -> Value {
        match self.ty.width() {
            BitWidth::W8 => Value::Byte(self.raw as u8),
            BitWidth::W16 => Value::Int(self.raw as i32),
            BitWidth::W32 => Value::Int(self.raw as u32 as i32),
            BitWidth::W64 => Value::Long(self.raw as i64),
        }
    }
}

impl fmt::Display for BitViewValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, field) in self.ty.fields().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            let bits = field.extract(self.raw);
            match self.ty.kind() {
                BitViewKind::Bitmap => write!(f, "{}: {}", field.name, bits != 0)?,
                BitViewKind::Intmap => write!(f, "{}: {bits}", field.name)?,
            }
        }
        f.write_str("}")
    }
}
