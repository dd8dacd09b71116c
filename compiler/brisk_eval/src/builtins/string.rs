//! `str.*` and `string.*` builtins.
//!
//! Indices and lengths count Unicode scalar values, not bytes. A null
//! subject string yields null, except for the predicates (`false`) and
//! the index searches (`-1`).

use regex::Regex;

use brisk_ir::{ScalarKind, TypeDesc};
use brisk_value::errors::{
    index_out_of_bounds, index_out_of_bounds_msg, malformed_literal, type_mismatch_msg,
};
use brisk_value::{cast_scalar, ArrayValue, EvalError, EvalResult, Value};

use super::args::{arg, check_arity, opt_array, opt_int, opt_str, req_int, req_str};
use super::{BuiltinContext, Namespace};

pub static NAMESPACE: Namespace = Namespace {
    name: "string",
    prefixes: &["str.", "string."],
    functions: &[
        ("str.tostring", to_string),
        ("string.tostring", to_string),
        ("str.toupper", to_upper),
        ("str.tolower", to_lower),
        ("str.trim", trim),
        ("str.replace", replace),
        ("str.split", split),
        ("str.join", join),
        ("str.contains", contains),
        ("str.startswith", starts_with),
        ("str.endswith", ends_with),
        ("str.equalsignorecase", equals_ignore_case),
        ("str.equals", equals),
        ("str.isempty", is_empty),
        ("str.isblank", is_blank),
        ("str.substring", substring),
        ("str.indexof", index_of),
        ("str.lastindexof", last_index_of),
        ("str.charat", char_at),
        ("str.replaceall", replace_all),
        ("str.lpad", lpad),
        ("str.rpad", rpad),
        ("str.chararray", char_array),
        ("str.toint", to_int),
        ("str.todouble", to_double),
    ],
};

/// Byte offset of the `idx`-th char, or the end of `s`.
fn char_to_byte(s: &str, idx: usize) -> usize {
    s.char_indices().nth(idx).map_or(s.len(), |(b, _)| b)
}

fn char_count(s: &str) -> usize {
    s.chars().count()
}

fn compile(name: &str, pattern: &str) -> Result<Regex, EvalError> {
    Regex::new(pattern)
        .map_err(|e| malformed_literal(format!("{name}: invalid regex `{pattern}`: {e}")))
}

fn map_str(name: &str, args: &[Value], f: impl FnOnce(&str) -> String) -> EvalResult {
    check_arity(name, args, 1, 1)?;
    Ok(opt_str(name, args, 0)?.map_or(Value::Null, |s| Value::string(f(s))))
}

/// Two-string predicate; a null on either side is `false`.
fn str_pred(name: &str, args: &[Value], f: fn(&str, &str) -> bool) -> EvalResult {
    check_arity(name, args, 2, 2)?;
    match (opt_str(name, args, 0)?, opt_str(name, args, 1)?) {
        (Some(a), Some(b)) => Ok(Value::Bool(f(a, b))),
        _ => Ok(Value::Bool(false)),
    }
}

/// Same rendering as a cast to `string`, so booleans come out as `Y`/`N`.
fn to_string(_: &BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    check_arity("str.tostring", args, 1, 1)?;
    match arg(args, 0) {
        Value::Null => Ok(Value::Null),
        v => cast_scalar(v, ScalarKind::String),
    }
}

fn to_upper(_: &BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    map_str("str.toupper", args, str::to_uppercase)
}

fn to_lower(_: &BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    map_str("str.tolower", args, str::to_lowercase)
}

fn trim(_: &BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    map_str("str.trim", args, |s| s.trim().to_string())
}

/// Literal replacement. Any null argument returns the subject unchanged.
fn replace(_: &BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    const NAME: &str = "str.replace";
    check_arity(NAME, args, 3, 3)?;
    let s = opt_str(NAME, args, 0)?;
    let target = opt_str(NAME, args, 1)?;
    let replacement = opt_str(NAME, args, 2)?;
    Ok(match (s, target, replacement) {
        (Some(s), Some(t), Some(r)) => Value::string(s.replace(t, r)),
        (s, _, _) => s.map_or(Value::Null, Value::string),
    })
}

/// Regex split into a fixed string array.
///
/// `limit > 0` caps the number of parts, `limit < 0` (the default) keeps
/// every part, `limit == 0` also drops trailing empty parts. A zero-width
/// match at the start never produces a leading empty part.
fn split(_: &BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    const NAME: &str = "str.split";
    check_arity(NAME, args, 2, 3)?;
    let (Some(s), Some(pattern)) = (opt_str(NAME, args, 0)?, opt_str(NAME, args, 1)?) else {
        return Ok(Value::Null);
    };
    let limit = opt_int(NAME, args, 2)?.unwrap_or(-1);
    let re = compile(NAME, pattern)?;

    let first = re.find(s);
    let leading_empty = first.is_some_and(|m| m.start() == 0 && m.is_empty());
    let mut parts: Vec<&str> = match usize::try_from(limit) {
        Ok(n) if n > 0 => re.splitn(s, n + usize::from(leading_empty)).collect(),
        _ => re.split(s).collect(),
    };
    if leading_empty && !parts.is_empty() {
        parts.remove(0);
    }
    if limit == 0 && first.is_some() {
        while parts.last().is_some_and(|p| p.is_empty()) {
            parts.pop();
        }
    }
    let values = parts.into_iter().map(Value::string).collect();
    ArrayValue::fixed(TypeDesc::STRING, values).map(Value::array)
}

/// Join array elements with a delimiter; null elements become "".
fn join(_: &BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    const NAME: &str = "str.join";
    check_arity(NAME, args, 2, 2)?;
    let Some(array) = opt_array(NAME, args, 0)? else {
        return Ok(Value::Null);
    };
    let delimiter = req_str(NAME, args, 1, "delimiter")?;
    let parts: Vec<String> = array
        .read()
        .iter()
        .map(|v| match v {
            Value::Null => String::new(),
            v => v.to_string(),
        })
        .collect();
    Ok(Value::string(parts.join(delimiter)))
}

fn contains(_: &BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    str_pred("str.contains", args, |s, sub| s.contains(sub))
}

fn starts_with(_: &BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    str_pred("str.startswith", args, |s, p| s.starts_with(p))
}

fn ends_with(_: &BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    str_pred("str.endswith", args, |s, p| s.ends_with(p))
}

fn equals_ignore_case(_: &BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    const NAME: &str = "str.equalsignorecase";
    check_arity(NAME, args, 2, 2)?;
    let equal = match (opt_str(NAME, args, 0)?, opt_str(NAME, args, 1)?) {
        (None, None) => true,
        (Some(a), Some(b)) => a.to_lowercase() == b.to_lowercase(),
        _ => false,
    };
    Ok(Value::Bool(equal))
}

fn equals(_: &BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    const NAME: &str = "str.equals";
    check_arity(NAME, args, 2, 2)?;
    Ok(Value::Bool(opt_str(NAME, args, 0)? == opt_str(NAME, args, 1)?))
}

fn is_empty(_: &BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    check_arity("str.isempty", args, 1, 1)?;
    Ok(Value::Bool(opt_str("str.isempty", args, 0)?.is_some_and(str::is_empty)))
}

/// Null, empty and whitespace-only strings are blank.
fn is_blank(_: &BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    check_arity("str.isblank", args, 1, 1)?;
    let blank = match opt_str("str.isblank", args, 0)? {
        Some(s) => s.trim().is_empty(),
        None => true,
    };
    Ok(Value::Bool(blank))
}

/// `substring(s, begin, end?)`: chars `begin..end`, end defaulting to the
/// length. Fails unless `0 <= begin <= end <= len`.
fn substring(_: &BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    const NAME: &str = "str.substring";
    check_arity(NAME, args, 2, 3)?;
    let Some(s) = opt_str(NAME, args, 0)? else {
        return Ok(Value::Null);
    };
    let begin = req_int(NAME, args, 1, "begin index")?;
    let len = char_count(s);
    let end = opt_int(NAME, args, 2)?.unwrap_or(len as i64);

    if begin < 0 || end > len as i64 || begin > end {
        let bad = if begin < 0 || begin > len as i64 { begin } else { end };
        return Err(index_out_of_bounds_msg(
            bad,
            len,
            format!("{NAME}: begin {begin}, end {end}, length {len}"),
        ));
    }
    let (begin, end) = (begin as usize, end as usize);
    Ok(Value::string(
        s.chars().skip(begin).take(end - begin).collect::<String>(),
    ))
}

/// First occurrence at or after `from` (clamped into the string), or -1.
fn index_of(_: &BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    const NAME: &str = "str.indexof";
    check_arity(NAME, args, 2, 3)?;
    let (Some(s), Some(needle)) = (opt_str(NAME, args, 0)?, opt_str(NAME, args, 1)?) else {
        return Ok(Value::Int(-1));
    };
    let from = opt_int(NAME, args, 2)?.unwrap_or(0).max(0);
    let from = usize::try_from(from).unwrap_or(usize::MAX).min(char_count(s));
    let start = char_to_byte(s, from);
    let found = s[start..]
        .find(needle)
        .map(|pos| from + char_count(&s[start..start + pos]));
    Ok(found.map_or(Value::Int(-1), |i| Value::Int(i as i32)))
}

/// Last occurrence starting at or before `from`, or -1.
fn last_index_of(_: &BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    const NAME: &str = "str.lastindexof";
    check_arity(NAME, args, 2, 3)?;
    let (Some(s), Some(needle)) = (opt_str(NAME, args, 0)?, opt_str(NAME, args, 1)?) else {
        return Ok(Value::Int(-1));
    };
    let len = char_count(s);
    let last_start = match opt_int(NAME, args, 2)? {
        None => len,
        Some(from) if from < 0 => return Ok(Value::Int(-1)),
        Some(from) => usize::try_from(from).unwrap_or(usize::MAX).min(len),
    };
    let end = char_to_byte(s, last_start.saturating_add(char_count(needle)));
    let found = s[..end].rfind(needle).map(|pos| char_count(&s[..pos]));
    Ok(found.map_or(Value::Int(-1), |i| Value::Int(i as i32)))
}

fn char_at(_: &BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    const NAME: &str = "str.charat";
    check_arity(NAME, args, 2, 2)?;
    let Some(s) = opt_str(NAME, args, 0)? else {
        return Ok(Value::Null);
    };
    let index = req_int(NAME, args, 1, "index")?;
    usize::try_from(index)
        .ok()
        .and_then(|i| s.chars().nth(i))
        .map(|c| Value::string(c.to_string()))
        .ok_or_else(|| index_out_of_bounds(index, char_count(s)))
}

/// Regex replacement; `$1`/`${name}` in the replacement refer to groups.
fn replace_all(_: &BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    const NAME: &str = "str.replaceall";
    check_arity(NAME, args, 3, 3)?;
    let Some(s) = opt_str(NAME, args, 0)? else {
        return Ok(Value::Null);
    };
    let pattern = req_str(NAME, args, 1, "regex")?;
    let replacement = req_str(NAME, args, 2, "replacement")?;
    let re = compile(NAME, pattern)?;
    Ok(Value::string(re.replace_all(s, replacement)))
}

#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
}

fn pad(name: &str, args: &[Value], side: Side) -> EvalResult {
    check_arity(name, args, 3, 3)?;
    let Some(s) = opt_str(name, args, 0)? else {
        return Ok(Value::Null);
    };
    let width = req_int(name, args, 1, "length")?;
    let pad = opt_str(name, args, 2)?.unwrap_or("");
    let mut chars = pad.chars();
    let (Some(fill), None) = (chars.next(), chars.next()) else {
        return Err(type_mismatch_msg(
            "single character",
            format!("{pad:?}"),
            format!("{name}: pad must be a single character, got {pad:?}"),
        ));
    };

    let current = char_count(s);
    let Some(missing) = usize::try_from(width).ok().and_then(|w| w.checked_sub(current)) else {
        return Ok(Value::string(s));
    };
    let padding = fill.to_string().repeat(missing);
    Ok(Value::string(match side {
        Side::Left => padding + s,
        Side::Right => format!("{s}{padding}"),
    }))
}

fn lpad(_: &BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    pad("str.lpad", args, Side::Left)
}

fn rpad(_: &BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    pad("str.rpad", args, Side::Right)
}

/// Code points as a fixed `int` array.
fn char_array(_: &BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    check_arity("str.chararray", args, 1, 1)?;
    let Some(s) = opt_str("str.chararray", args, 0)? else {
        return Ok(Value::Null);
    };
    let codes = s.chars().map(|c| Value::Int(c as i32)).collect();
    ArrayValue::fixed(TypeDesc::INT, codes).map(Value::array)
}

/// Lenient numeric conversion: an unparseable value is reported as a
/// warning and replaced by the default (second argument, else zero).
fn parse_number(ctx: &BuiltinContext<'_>, name: &str, args: &[Value], kind: ScalarKind) -> EvalResult {
    check_arity(name, args, 1, 2)?;
    let default = match arg(args, 1) {
        Value::Null => Value::default_for(&TypeDesc::Scalar(kind)),
        d => cast_scalar(d, kind)?,
    };
    let value = arg(args, 0);
    if value.is_null() {
        return Ok(default);
    }
    match cast_scalar(value, kind) {
        Ok(n) => Ok(n),
        Err(err) => {
            ctx.warn(&format!("{name}: {}; using {default}", err.message));
            Ok(default)
        }
    }
}

fn to_int(ctx: &BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    parse_number(ctx, "str.toint", args, ScalarKind::Int)
}

fn to_double(ctx: &BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    parse_number(ctx, "str.todouble", args, ScalarKind::Double)
}
