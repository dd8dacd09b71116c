//! Binary operator implementations for the evaluator.
//!
//! Direct enum dispatch: operands are classified once (number, string,
//! other) and each class has its own evaluation function. Numbers are
//! promoted along `byte < int < long < float < double` before the
//! operation; byte arithmetic yields `int`.

use std::borrow::Cow;
use std::cmp::Ordering;

use brisk_ir::BinaryOp;
use brisk_value::errors::{division_by_zero, integer_overflow, invalid_operator};
use brisk_value::{EvalResult, Value};

/// A numeric operand after promotion.
#[derive(Clone, Copy, Debug)]
enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    #[inline]
    fn as_f64(self) -> f64 {
        match self {
            Num::Int(n) => n as f64,
            Num::Float(f) => f,
        }
    }
}

/// Result width of a numeric operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Width {
    Int,
    Long,
    Float,
    Double,
}

fn numeric(value: &Value) -> Option<(Width, Num)> {
    match value {
        Value::Byte(n) => Some((Width::Int, Num::Int(i64::from(*n)))),
        Value::Int(n) => Some((Width::Int, Num::Int(i64::from(*n)))),
        Value::Long(n) => Some((Width::Long, Num::Int(*n))),
        Value::Float(f) => Some((Width::Float, Num::Float(f64::from(*f)))),
        Value::Double(f) => Some((Width::Double, Num::Float(*f))),
        _ => None,
    }
}

/// Bit views take part in arithmetic through their backing integer.
fn operand(value: &Value) -> Cow<'_, Value> {
    match value {
        Value::BitView(view) => Cow::Owned(view.to_integer()),
        other => Cow::Borrowed(other),
    }
}

/// Evaluate a binary operation on two already-evaluated operands.
///
/// `and`/`or` evaluate eagerly here; the interpreter short-circuits before
/// calling in.
pub fn evaluate_binary(op: BinaryOp, left: &Value, right: &Value) -> EvalResult {
    let left = operand(left);
    let right = operand(right);
    let (left, right) = (left.as_ref(), right.as_ref());

    if op.is_logical() {
        return eval_logical(op, left, right);
    }

    if let (Some((lw, a)), Some((rw, b))) = (numeric(left), numeric(right)) {
        return eval_numeric(op, lw.max(rw), a, b);
    }

    match (left, right) {
        (Value::Str(_), _) | (_, Value::Str(_)) if op == BinaryOp::Add => {
            Ok(Value::string(format!("{left}{right}")))
        }
        (Value::Str(a), Value::Str(b)) if op.is_comparison() => {
            Ok(Value::Bool(compare(op, Some(a.as_ref().cmp(b.as_ref())))))
        }
        _ => eval_equality(op, left, right),
    }
}

fn eval_logical(op: BinaryOp, left: &Value, right: &Value) -> EvalResult {
    match (left, right, op) {
        (Value::Bool(a), Value::Bool(b), BinaryOp::And) => Ok(Value::Bool(*a && *b)),
        (Value::Bool(a), Value::Bool(b), BinaryOp::Or) => Ok(Value::Bool(*a || *b)),
        _ => Err(mismatch(op, left, right)),
    }
}

fn eval_numeric(op: BinaryOp, width: Width, a: Num, b: Num) -> EvalResult {
    if op.is_comparison() {
        let ord = match (a, b) {
            (Num::Int(x), Num::Int(y)) => Some(x.cmp(&y)),
            _ => a.as_f64().partial_cmp(&b.as_f64()),
        };
        return Ok(Value::Bool(compare(op, ord)));
    }
    match (a, b) {
        (Num::Int(x), Num::Int(y)) => eval_integer(op, width, x, y),
        _ => eval_float(op, width, a.as_f64(), b.as_f64()),
    }
}

fn eval_integer(op: BinaryOp, width: Width, a: i64, b: i64) -> EvalResult {
    let (result, name) = match op {
        BinaryOp::Add => (a.checked_add(b), "addition"),
        BinaryOp::Sub => (a.checked_sub(b), "subtraction"),
        BinaryOp::Mul => (a.checked_mul(b), "multiplication"),
        BinaryOp::Div | BinaryOp::Mod if b == 0 => return Err(division_by_zero()),
        BinaryOp::Div => (a.checked_div(b), "division"),
        BinaryOp::Mod => (a.checked_rem(b), "remainder"),
        // A negative exponent leaves the integers.
        BinaryOp::Pow if b < 0 => return Ok(Value::Double((a as f64).powf(b as f64))),
        BinaryOp::Pow => (
            u32::try_from(b).ok().and_then(|e| a.checked_pow(e)),
            "exponentiation",
        ),
        _ => return Err(invalid_operator(op.as_symbol(), "number", "number")),
    };
    let n = result.ok_or_else(|| integer_overflow(name))?;
    match width {
        Width::Long => Ok(Value::Long(n)),
        _ => i32::try_from(n)
            .map(Value::Int)
            .map_err(|_| integer_overflow(name)),
    }
}

fn eval_float(op: BinaryOp, width: Width, a: f64, b: f64) -> EvalResult {
    let n = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => a / b,
        BinaryOp::Mod => a % b,
        BinaryOp::Pow => a.powf(b),
        _ => return Err(invalid_operator(op.as_symbol(), "number", "number")),
    };
    if width == Width::Float {
        Ok(Value::Float(n as f32))
    } else {
        Ok(Value::Double(n))
    }
}

/// `==`/`!=` between non-numeric operands. Null compares equal only to
/// null; other operands must share a type.
fn eval_equality(op: BinaryOp, left: &Value, right: &Value) -> EvalResult {
    let comparable =
        left.is_null() || right.is_null() || left.type_name() == right.type_name();
    match op {
        BinaryOp::Eq if comparable => Ok(Value::Bool(left == right)),
        BinaryOp::NotEq if comparable => Ok(Value::Bool(left != right)),
        _ => Err(mismatch(op, left, right)),
    }
}

fn compare(op: BinaryOp, ord: Option<Ordering>) -> bool {
    let Some(ord) = ord else {
        // NaN on either side.
        return op == BinaryOp::NotEq;
    };
    match op {
        BinaryOp::Eq => ord == Ordering::Equal,
        BinaryOp::NotEq => ord != Ordering::Equal,
        BinaryOp::Lt => ord == Ordering::Less,
        BinaryOp::LtEq => ord != Ordering::Greater,
        BinaryOp::Gt => ord == Ordering::Greater,
        BinaryOp::GtEq => ord != Ordering::Less,
        _ => false,
    }
}

#[cold]
fn mismatch(op: BinaryOp, left: &Value, right: &Value) -> brisk_value::EvalError {
    invalid_operator(op.as_symbol(), left.type_name(), right.type_name())
}

#[cfg(test)]
mod tests;
