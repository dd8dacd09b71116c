//! `queue.*` builtins: FIFO operations over dynamic arrays.

use brisk_value::{ArrayValue, EvalResult, Value};

use super::args::{arg, check_arity, len_value, req_array};
use super::array::{position, storable};
use super::{BuiltinContext, Namespace};

pub static NAMESPACE: Namespace = Namespace {
    name: "queue",
    prefixes: &["queue."],
    functions: &[
        ("queue.enqueue", enqueue),
        ("queue.dequeue", dequeue),
        ("queue.peek", peek),
        ("queue.isempty", is_empty),
        ("queue.size", size),
        ("queue.clear", clear),
        ("queue.contains", contains),
        ("queue.toarray", to_array),
    ],
};

fn enqueue(_: &BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    const NAME: &str = "queue.enqueue";
    check_arity(NAME, args, 2, 2)?;
    let queue = req_array(NAME, args, 0, "queue")?;
    let value = storable(queue, arg(args, 1))?;
    queue.write().push(&value)?;
    Ok(Value::Null)
}

/// Remove and return the head; null when empty.
fn dequeue(_: &BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    const NAME: &str = "queue.dequeue";
    check_arity(NAME, args, 1, 1)?;
    let queue = req_array(NAME, args, 0, "queue")?;
    let mut guard = queue.write();
    if guard.is_empty() {
        return Ok(Value::Null);
    }
    guard.remove(0)
}

/// The head without removing it; null when empty.
fn peek(_: &BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    const NAME: &str = "queue.peek";
    check_arity(NAME, args, 1, 1)?;
    let queue = req_array(NAME, args, 0, "queue")?;
    let head = queue.read().values().first().cloned();
    Ok(head.unwrap_or_default())
}

fn is_empty(_: &BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    const NAME: &str = "queue.isempty";
    check_arity(NAME, args, 1, 1)?;
    let queue = req_array(NAME, args, 0, "queue")?;
    let empty = queue.read().is_empty();
    Ok(Value::Bool(empty))
}

fn size(_: &BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    const NAME: &str = "queue.size";
    check_arity(NAME, args, 1, 1)?;
    let queue = req_array(NAME, args, 0, "queue")?;
    let len = queue.read().len();
    Ok(len_value(len))
}

fn clear(_: &BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    const NAME: &str = "queue.clear";
    check_arity(NAME, args, 1, 1)?;
    req_array(NAME, args, 0, "queue")?.write().clear()?;
    Ok(Value::Null)
}

fn contains(_: &BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    const NAME: &str = "queue.contains";
    check_arity(NAME, args, 2, 2)?;
    let queue = req_array(NAME, args, 0, "queue")?;
    Ok(Value::Bool(position(queue, arg(args, 1)).is_some()))
}

/// Fixed-size snapshot, head first. Later queue operations do not affect it.
fn to_array(_: &BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    const NAME: &str = "queue.toarray";
    check_arity(NAME, args, 1, 1)?;
    let queue = req_array(NAME, args, 0, "queue")?;
    let guard = queue.read();
    ArrayValue::fixed(guard.element().clone(), guard.values().to_vec()).map(Value::array)
}
