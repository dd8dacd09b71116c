//! `array.*` builtins. They mutate the array in place; a null array is an
//! error rather than a no-op.

use brisk_value::{cast, ArrayValue, EvalResult, Shared, Value};

use super::args::{arg, check_arity, len_value, opt_bool, opt_int, req_array, req_int, req_len};
use super::{BuiltinContext, Namespace};

pub static NAMESPACE: Namespace = Namespace {
    name: "array",
    prefixes: &["array."],
    functions: &[
        ("array.add", add),
        ("array.insert", insert),
        ("array.remove", remove),
        ("array.expand", expand),
        ("array.fill", fill),
        ("array.sort", sort),
        ("array.contains", contains),
        ("array.indexof", index_of),
        ("array.clear", clear),
        ("array.length", length),
    ],
};

/// Cast `value` to the array's element type before any write lock is taken.
pub(super) fn conform(array: &Shared<ArrayValue>, value: &Value) -> EvalResult {
    let element = array.read().element().clone();
    cast(value, &element)
}

/// [`conform`], then refuse values that would make the array hold itself.
pub(super) fn storable(array: &Shared<ArrayValue>, value: &Value) -> EvalResult {
    let value = conform(array, value)?;
    array.check_store(&value)?;
    Ok(value)
}

/// Position of the first element equal to `value` after conversion to the
/// element type. A value that does not convert is never found.
///
/// Compares against a snapshot: the needle may be the array itself, and
/// equality reads its lock.
pub(super) fn position(array: &Shared<ArrayValue>, value: &Value) -> Option<usize> {
    let needle = conform(array, value).ok()?;
    let items = array.read().values().to_vec();
    items.iter().position(|v| *v == needle)
}

/// `add(array, value, index?)`: append, or insert before `index`.
fn add(_: &BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    const NAME: &str = "array.add";
    check_arity(NAME, args, 2, 3)?;
    let array = req_array(NAME, args, 0, "array")?;
    let value = storable(array, arg(args, 1))?;
    match opt_int(NAME, args, 2)? {
        Some(index) => array.write().insert(index, &value)?,
        None => array.write().push(&value)?,
    }
    Ok(Value::Null)
}

/// `insert(array, index, value)`.
fn insert(_: &BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    const NAME: &str = "array.insert";
    check_arity(NAME, args, 3, 3)?;
    let array = req_array(NAME, args, 0, "array")?;
    let index = req_int(NAME, args, 1, "index")?;
    let value = storable(array, arg(args, 2))?;
    array.write().insert(index, &value)?;
    Ok(Value::Null)
}

/// `remove(array, index)`: returns the removed element.
fn remove(_: &BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    const NAME: &str = "array.remove";
    check_arity(NAME, args, 2, 2)?;
    let array = req_array(NAME, args, 0, "array")?;
    let index = req_int(NAME, args, 1, "index")?;
    let removed = array.write().remove(index)?;
    Ok(removed)
}

fn expand(_: &BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    const NAME: &str = "array.expand";
    check_arity(NAME, args, 2, 2)?;
    let array = req_array(NAME, args, 0, "array")?;
    let len = req_len(NAME, args, 1, "length")?;
    array.write().expand(len)?;
    Ok(Value::Null)
}

/// `fill(array, length, value?)`: grow a dynamic array to `length`, then
/// overwrite every element with `value` (the element default when absent).
/// Container values are copied per slot, so the array may fill from itself.
fn fill(_: &BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    const NAME: &str = "array.fill";
    check_arity(NAME, args, 2, 3)?;
    let array = req_array(NAME, args, 0, "array")?;
    let len = req_len(NAME, args, 1, "length")?;
    let value = match arg(args, 2) {
        Value::Null => Value::default_for(array.read().element()),
        v => conform(array, v)?.deep_copy(),
    };
    let mut guard = array.write();
    if !guard.is_fixed() {
        guard.expand(len)?;
    }
    guard.fill(&value)?;
    Ok(Value::Null)
}

/// `sort(array, ascending?)`, ascending by default.
fn sort(_: &BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    const NAME: &str = "array.sort";
    check_arity(NAME, args, 1, 2)?;
    let array = req_array(NAME, args, 0, "array")?;
    let ascending = opt_bool(NAME, args, 1)?.unwrap_or(true);
    array.write().sort(ascending)?;
    Ok(Value::Null)
}

fn contains(_: &BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    const NAME: &str = "array.contains";
    check_arity(NAME, args, 2, 2)?;
    let array = req_array(NAME, args, 0, "array")?;
    Ok(Value::Bool(position(array, arg(args, 1)).is_some()))
}

fn index_of(_: &BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    const NAME: &str = "array.indexof";
    check_arity(NAME, args, 2, 2)?;
    let array = req_array(NAME, args, 0, "array")?;
    Ok(position(array, arg(args, 1)).map_or(Value::Int(-1), len_value))
}

fn clear(_: &BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    const NAME: &str = "array.clear";
    check_arity(NAME, args, 1, 1)?;
    req_array(NAME, args, 0, "array")?.write().clear()?;
    Ok(Value::Null)
}

fn length(_: &BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    const NAME: &str = "array.length";
    check_arity(NAME, args, 1, 1)?;
    let array = req_array(NAME, args, 0, "array")?;
    let len = array.read().len();
    Ok(len_value(len))
}
