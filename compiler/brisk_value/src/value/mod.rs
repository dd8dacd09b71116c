//! Runtime values.
//!
//! [`Value`] is a closed enum: every consumer matches exhaustively, so a
//! new kind of value cannot be silently ignored somewhere.
//!
//! # Factory methods
//!
//! Build values through the factories (`Value::int`, `Value::string`,
//! `Value::array`, ...) rather than the variants directly; containers
//! need wrapping in [`Shared`].

mod array;
mod bitview;
mod record;
mod shared;

use std::fmt;
use std::sync::Arc;

use brisk_ir::{ScalarKind, TypeDesc};

use crate::errors::{cyclic_store, EvalError};

pub use array::{ArrayStorage, ArrayValue};
pub use bitview::BitViewValue;
pub use record::RecordValue;
pub use shared::Shared;

/// A runtime value.
#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Byte(u8),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Str(Arc<str>),
    Array(Shared<ArrayValue>),
    Record(Shared<RecordValue>),
    BitView(BitViewValue),
}

impl Value {
    #[inline]
    pub fn null() -> Self {
        Value::Null
    }

    #[inline]
    pub fn bool(b: bool) -> Self {
        Value::Bool(b)
    }

    #[inline]
    pub fn byte(n: u8) -> Self {
        Value::Byte(n)
    }

    #[inline]
    pub fn int(n: i32) -> Self {
        Value::Int(n)
    }

    #[inline]
    pub fn long(n: i64) -> Self {
        Value::Long(n)
    }

    #[inline]
    pub fn float(n: f32) -> Self {
        Value::Float(n)
    }

    #[inline]
    pub fn double(n: f64) -> Self {
        Value::Double(n)
    }

    #[inline]
    pub fn string(s: impl AsRef<str>) -> Self {
        Value::Str(Arc::from(s.as_ref()))
    }

    #[inline]
    pub fn array(array: ArrayValue) -> Self {
        Value::Array(Shared::new(array))
    }

    #[inline]
    pub fn record(record: RecordValue) -> Self {
        Value::Record(Shared::new(record))
    }

    #[inline]
    pub fn bit_view(view: BitViewValue) -> Self {
        Value::BitView(view)
    }

    /// Dynamic array of strings.
    pub fn string_array<S: AsRef<str>>(items: impl IntoIterator<Item = S>) -> Self {
        Value::array(ArrayValue::from_trusted(
            TypeDesc::STRING,
            items.into_iter().map(Value::string).collect(),
            false,
        ))
    }

    /// The zero value of a descriptor: `0`, `""`, `false`, a default-filled
    /// record or fixed array, an empty dynamic array, or an all-clear view.
    pub fn default_for(ty: &TypeDesc) -> Value {
        match ty {
            TypeDesc::Scalar(kind) => match kind {
                ScalarKind::Byte => Value::Byte(0),
                ScalarKind::Int => Value::Int(0),
                ScalarKind::Long => Value::Long(0),
                ScalarKind::Float => Value::Float(0.0),
                ScalarKind::Double => Value::Double(0.0),
                ScalarKind::Bool => Value::Bool(false),
                ScalarKind::String => Value::string(""),
                ScalarKind::Any => Value::Null,
            },
            TypeDesc::Record(shape) => Value::record(RecordValue::with_shape(shape.clone())),
            TypeDesc::Array(shape) => Value::array(ArrayValue::with_shape(shape)),
            TypeDesc::Bitmap(view) | TypeDesc::Intmap(view) => {
                Value::BitView(BitViewValue::zero(view.clone()))
            }
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Scalar kind of a scalar value; `None` for null and containers.
    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        match self {
            Value::Bool(_) => Some(ScalarKind::Bool),
            Value::Byte(_) => Some(ScalarKind::Byte),
            Value::Int(_) => Some(ScalarKind::Int),
            Value::Long(_) => Some(ScalarKind::Long),
            Value::Float(_) => Some(ScalarKind::Float),
            Value::Double(_) => Some(ScalarKind::Double),
            Value::Str(_) => Some(ScalarKind::String),
            Value::Null | Value::Array(_) | Value::Record(_) | Value::BitView(_) => None,
        }
    }

    /// Short kind name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Array(_) => "array",
            Value::Record(_) => "record",
            Value::BitView(view) => match view.ty().kind() {
                brisk_ir::BitViewKind::Bitmap => "bitmap",
                brisk_ir::BitViewKind::Intmap => "intmap",
            },
            scalar => scalar.scalar_kind().map_or("null", ScalarKind::name),
        }
    }

    /// Full descriptor name, as reported by `typeof`.
    pub fn type_label(&self) -> String {
        match self {
            Value::Array(array) => TypeDesc::Array(array.read().shape()).to_string(),
            Value::Record(record) => match record.read().shape() {
                Some(shape) => shape.to_string(),
                None => "record".to_string(),
            },
            Value::BitView(view) => view.ty().to_string(),
            other => other.type_name().to_string(),
        }
    }

    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Integer payload of any integer kind, widened to `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Byte(n) => Some(i64::from(*n)),
            Value::Int(n) => Some(i64::from(*n)),
            Value::Long(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric payload of any numeric kind, widened to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(f64::from(*n)),
            Value::Double(n) => Some(*n),
            other => other.as_i64().map(|n| n as f64),
        }
    }

    /// A detached copy: containers are copied recursively, scalars cloned.
    pub fn deep_copy(&self) -> Value {
        match self {
            Value::Array(array) => Value::array(array.read().deep_copy()),
            Value::Record(record) => Value::record(record.read().deep_copy()),
            other => other.clone(),
        }
    }

    /// Whether this value is, or holds at any depth, the container at `addr`.
    fn reaches(&self, addr: *const ()) -> bool {
        match self {
            Value::Array(array) => {
                array.addr() == addr || array.read().iter().any(|v| v.reaches(addr))
            }
            Value::Record(record) => {
                record.addr() == addr || record.read().fields().any(|(_, v)| v.reaches(addr))
            }
            _ => false,
        }
    }
}

// Containers never hold themselves: every store into an existing container
// passes one of these checks first. They take read locks on nested
// containers, so they run before the target's write lock is taken.

impl Shared<ArrayValue> {
    /// Fails when `value` is this array or holds it.
    pub fn check_store(&self, value: &Value) -> Result<(), EvalError> {
        if value.reaches(self.addr()) {
            return Err(cyclic_store("array"));
        }
        Ok(())
    }
}

impl Shared<RecordValue> {
    /// Fails when `value` is this record or holds it.
    pub fn check_store(&self, value: &Value) -> Result<(), EvalError> {
        if value.reaches(self.addr()) {
            return Err(cyclic_store("record"));
        }
        Ok(())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a.ptr_eq(b) || *a.read() == *b.read(),
            (Value::Record(a), Value::Record(b)) => a.ptr_eq(b) || *a.read() == *b.read(),
            (Value::BitView(a), Value::BitView(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Byte(n) => write!(f, "{n}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Long(n) => write!(f, "{n}"),
            // Debug keeps the trailing `.0` on integral floats.
            Value::Float(n) => write!(f, "{n:?}"),
            Value::Double(n) => write!(f, "{n:?}"),
            Value::Str(s) => f.write_str(s),
            Value::Array(array) => write!(f, "{}", array.read()),
            Value::Record(record) => write!(f, "{}", record.read()),
            Value::BitView(view) => write!(f, "{view}"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Long(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Double(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Arc::from(s))
    }
}
