//! Argument validation shared by the builtin namespaces.
//!
//! Positions are 0-based here and reported 1-based. A missing trailing
//! argument reads as null, so optional parameters and explicit nulls take
//! the same path.

use brisk_value::errors::{type_mismatch_msg, wrong_arg_count, wrong_arg_type};
use brisk_value::{ArrayValue, EvalError, Shared, Value};

static NULL: Value = Value::Null;

/// Fail unless `min <= args.len() <= max`.
pub fn check_arity(name: &str, args: &[Value], min: usize, max: usize) -> Result<(), EvalError> {
    let got = args.len();
    if (min..=max).contains(&got) {
        return Ok(());
    }
    if min == max {
        Err(wrong_arg_count(name, min, got))
    } else {
        Err(wrong_arg_count(name, format!("{min} to {max}"), got))
    }
}

/// The argument at `index`, null when absent.
#[inline]
pub fn arg(args: &[Value], index: usize) -> &Value {
    args.get(index).unwrap_or(&NULL)
}

#[cold]
fn null_arg(name: &str, index: usize, expected: &str, what: &str) -> EvalError {
    type_mismatch_msg(expected, "null", format!("{name}: {what} cannot be null (argument {})", index + 1))
}

pub fn opt_str<'a>(name: &str, args: &'a [Value], index: usize) -> Result<Option<&'a str>, EvalError> {
    match arg(args, index) {
        Value::Null => Ok(None),
        Value::Str(s) => Ok(Some(s.as_ref())),
        other => Err(wrong_arg_type(name, index, "string", other.type_name())),
    }
}

pub fn req_str<'a>(name: &str, args: &'a [Value], index: usize, what: &str) -> Result<&'a str, EvalError> {
    opt_str(name, args, index)?.ok_or_else(|| null_arg(name, index, "string", what))
}

/// Any integer kind, widened to `i64`.
pub fn opt_int(name: &str, args: &[Value], index: usize) -> Result<Option<i64>, EvalError> {
    match arg(args, index) {
        Value::Null => Ok(None),
        Value::Byte(n) => Ok(Some(i64::from(*n))),
        Value::Int(n) => Ok(Some(i64::from(*n))),
        Value::Long(n) => Ok(Some(*n)),
        other => Err(wrong_arg_type(name, index, "int", other.type_name())),
    }
}

pub fn req_int(name: &str, args: &[Value], index: usize, what: &str) -> Result<i64, EvalError> {
    opt_int(name, args, index)?.ok_or_else(|| null_arg(name, index, "int", what))
}

pub fn opt_bool(name: &str, args: &[Value], index: usize) -> Result<Option<bool>, EvalError> {
    match arg(args, index) {
        Value::Null => Ok(None),
        Value::Bool(b) => Ok(Some(*b)),
        other => Err(wrong_arg_type(name, index, "bool", other.type_name())),
    }
}

pub fn opt_array<'a>(
    name: &str,
    args: &'a [Value],
    index: usize,
) -> Result<Option<&'a Shared<ArrayValue>>, EvalError> {
    match arg(args, index) {
        Value::Null => Ok(None),
        Value::Array(array) => Ok(Some(array)),
        other => Err(wrong_arg_type(name, index, "array", other.type_name())),
    }
}

pub fn req_array<'a>(
    name: &str,
    args: &'a [Value],
    index: usize,
    what: &str,
) -> Result<&'a Shared<ArrayValue>, EvalError> {
    opt_array(name, args, index)?.ok_or_else(|| null_arg(name, index, "array", what))
}

/// A non-negative count, for lengths and sizes.
pub fn req_len(name: &str, args: &[Value], index: usize, what: &str) -> Result<usize, EvalError> {
    let n = req_int(name, args, index, what)?;
    usize::try_from(n).map_err(|_| {
        type_mismatch_msg(
            "non-negative int",
            n,
            format!("{name}: {what} must not be negative, got {n}"),
        )
    })
}

/// Length as a script `int`.
#[inline]
pub fn len_value(len: usize) -> Value {
    i32::try_from(len).map_or(Value::Long(len as i64), Value::Int)
}
