//! Conversion between values and type descriptors.
//!
//! # Scalar promotion table
//!
//! | from \ to | integer kinds | float kinds | string | bool |
//! |---|---|---|---|---|
//! | integer | widen exactly / narrow by truncation | widen | decimal text | mismatch |
//! | float | truncate toward zero | widen / narrow | decimal text | mismatch |
//! | string | parse or `MalformedLiteral` | parse or `MalformedLiteral` | identity | `true/Y/false/N` |
//! | bool | mismatch | mismatch | `Y` / `N` | identity |
//! | null | `0` | `0.0` | `""` | `false` |
//! | bit view | backing bits | backing bits | field listing | mismatch |
//!
//! `any` accepts every value unchanged.
//!
//! # Bit views
//!
//! Integers (and strings holding integers) reinterpret as bitmap/intmap
//! views. A value that does not fit the backing width fails; nothing is
//! ever truncated silently.
//!
//! # Structural casts
//!
//! Records need every target field in the source (case-insensitive);
//! arrays cast element-wise and fixed targets require equal length. Both
//! always produce a fresh container.

use brisk_ir::{ArrayShape, BitViewType, RecordShape, ScalarKind, TypeDesc};

use crate::errors::{
    bit_overflow, field_not_found, malformed_literal, type_mismatch, type_mismatch_msg, EvalError,
};
use crate::value::{ArrayValue, BitViewValue, RecordValue, Value};
use crate::EvalResult;

/// Cast `value` to `target`.
pub fn cast(value: &Value, target: &TypeDesc) -> EvalResult {
    match target {
        TypeDesc::Scalar(kind) => cast_scalar(value, *kind),
        TypeDesc::Record(shape) => cast_record(value, shape),
        TypeDesc::Array(shape) => cast_array(value, shape),
        TypeDesc::Bitmap(view) | TypeDesc::Intmap(view) => cast_bit_view(value, view),
    }
}

/// Bind `value` to a declared type.
///
/// Same as [`cast`], except that an array or record already carrying the
/// target shape is passed through by handle instead of copied, so typed
/// variables and parameters keep reference semantics.
pub fn coerce(value: &Value, target: &TypeDesc) -> EvalResult {
    let conforms = match (value, target) {
        (Value::Array(array), TypeDesc::Array(shape)) => array.read().shape() == *shape,
        (Value::Record(record), TypeDesc::Record(shape)) => record.read().shape() == Some(shape),
        _ => false,
    };
    if conforms {
        Ok(value.clone())
    } else {
        cast(value, target)
    }
}

/// Cast `value` to a scalar kind.
pub fn cast_scalar(value: &Value, kind: ScalarKind) -> EvalResult {
    if kind == ScalarKind::Any {
        return Ok(value.clone());
    }
    if let Value::Null = value {
        return Ok(Value::default_for(&TypeDesc::Scalar(kind)));
    }
    if let Value::BitView(view) = value {
        if kind.is_numeric() {
            return cast_scalar(&view.to_integer(), kind);
        }
    }
    match kind {
        ScalarKind::Byte | ScalarKind::Int | ScalarKind::Long => to_integer(value, kind),
        ScalarKind::Float | ScalarKind::Double => to_float(value, kind),
        ScalarKind::String => Ok(match value {
            Value::Bool(b) => Value::string(if *b { "Y" } else { "N" }),
            Value::Str(_) => value.clone(),
            other => Value::string(other.to_string()),
        }),
        ScalarKind::Bool => to_bool(value),
        ScalarKind::Any => Ok(value.clone()),
    }
}

fn to_integer(value: &Value, kind: ScalarKind) -> EvalResult {
    let n: i64 = match value {
        Value::Byte(n) => i64::from(*n),
        Value::Int(n) => i64::from(*n),
        Value::Long(n) => *n,
        Value::Float(f) => return Ok(truncate_float(f64::from(*f), kind)),
        Value::Double(f) => return Ok(truncate_float(*f, kind)),
        Value::Str(s) => return parse_integer(s, kind),
        other => return Err(type_mismatch(kind, other.type_name())),
    };
    Ok(narrow_integer(n, kind))
}

fn narrow_integer(n: i64, kind: ScalarKind) -> Value {
    match kind {
        ScalarKind::Byte => Value::Byte(n as u8),
        ScalarKind::Int => Value::Int(n as i32),
        _ => Value::Long(n),
    }
}

/// Float to integer: truncates toward zero and saturates at the target's
/// range. NaN becomes 0.
fn truncate_float(f: f64, kind: ScalarKind) -> Value {
    match kind {
        ScalarKind::Byte => Value::Byte(f as u8),
        ScalarKind::Int => Value::Int(f as i32),
        _ => Value::Long(f as i64),
    }
}

fn parse_integer(text: &str, kind: ScalarKind) -> EvalResult {
    let trimmed = text.trim();
    let malformed = || malformed_literal(format!("cannot parse \"{text}\" as {kind}"));
    Ok(match kind {
        ScalarKind::Byte => Value::Byte(trimmed.parse::<u8>().map_err(|_| malformed())?),
        ScalarKind::Int => Value::Int(trimmed.parse::<i32>().map_err(|_| malformed())?),
        _ => Value::Long(trimmed.parse::<i64>().map_err(|_| malformed())?),
    })
}

fn to_float(value: &Value, kind: ScalarKind) -> EvalResult {
    let wide = match value {
        Value::Str(s) => {
            let malformed = || malformed_literal(format!("cannot parse \"{s}\" as {kind}"));
            let trimmed = s.trim();
            // `inf` and `nan` parse in Rust but are not script literals.
            if trimmed
                .chars()
                .any(|c| c.is_ascii_alphabetic() && !c.eq_ignore_ascii_case(&'e'))
            {
                return Err(malformed());
            }
            trimmed.parse::<f64>().map_err(|_| malformed())?
        }
        Value::Float(f) if kind == ScalarKind::Float => return Ok(Value::Float(*f)),
        other => other
            .as_f64()
            .ok_or_else(|| type_mismatch(kind, other.type_name()))?,
    };
    Ok(match kind {
        ScalarKind::Float => Value::Float(wide as f32),
        _ => Value::Double(wide),
    })
}

fn to_bool(value: &Value) -> EvalResult {
    match value {
        Value::Bool(_) => Ok(value.clone()),
        Value::Str(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "y" => Ok(Value::Bool(true)),
            "false" | "n" => Ok(Value::Bool(false)),
            _ => Err(malformed_literal(format!("cannot parse \"{s}\" as bool"))),
        },
        other => Err(type_mismatch("bool", other.type_name())),
    }
}

fn cast_bit_view(value: &Value, view: &BitViewType) -> EvalResult {
    let n: i64 = match value {
        Value::Null => 0,
        Value::BitView(src) => {
            return Ok(Value::BitView(BitViewValue::new(view.clone(), src.raw())?));
        }
        Value::Str(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| malformed_literal(format!("cannot parse \"{s}\" as {view}")))?,
        other => other
            .as_i64()
            .ok_or_else(|| type_mismatch(view, other.type_name()))?,
    };
    let width = view.width();
    let bits = width.bits();
    let fits = if bits == 64 {
        true
    } else if n < 0 {
        n >= -(1i64 << (bits - 1))
    } else {
        (n as u64) <= width.mask()
    };
    if !fits {
        return Err(bit_overflow(&view.to_string(), n, bits));
    }
    let raw = (n as u64) & width.mask();
    Ok(Value::BitView(BitViewValue::new(view.clone(), raw)?))
}

fn cast_record(value: &Value, shape: &RecordShape) -> EvalResult {
    let source = match value {
        Value::Null => return Ok(Value::Null),
        Value::Record(record) => record.read(),
        other => return Err(type_mismatch(shape, other.type_name())),
    };
    let mut values = Vec::with_capacity(shape.len());
    for field in shape.fields() {
        let Some(v) = source.field(&field.name) else {
            return Err(field_not_found(&field.name, "source record"));
        };
        values.push(cast(v, &field.ty)?);
    }
    Ok(Value::record(RecordValue::from_trusted(shape.clone(), values)))
}

fn cast_array(value: &Value, shape: &ArrayShape) -> EvalResult {
    let source = match value {
        Value::Null => return Ok(Value::Null),
        Value::Array(array) => array.read(),
        other => return Err(type_mismatch(TypeDesc::Array(shape.clone()), other.type_name())),
    };
    if let Some(size) = shape.size() {
        if size != source.len() {
            return Err(type_mismatch_msg(
                format!("{size} elements"),
                format!("{} elements", source.len()),
                format!(
                    "cannot cast array of length {} to fixed array of length {size}",
                    source.len()
                ),
            ));
        }
    }
    let values = source
        .iter()
        .map(|v| cast(v, shape.element()))
        .collect::<Result<Vec<_>, EvalError>>()?;
    Ok(Value::array(ArrayValue::from_trusted(
        shape.element().clone(),
        values,
        shape.is_fixed(),
    )))
}
