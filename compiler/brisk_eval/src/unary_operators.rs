//! Unary operator implementations for the evaluator.

use brisk_ir::UnaryOp;
use brisk_value::errors::integer_overflow;
use brisk_value::{EvalError, EvalErrorKind, EvalResult, Value};

/// Evaluate a unary operation on an already-evaluated operand.
pub fn evaluate_unary(op: UnaryOp, value: &Value) -> EvalResult {
    match (op, value) {
        (UnaryOp::Neg, Value::Byte(n)) => Ok(Value::Int(-i32::from(*n))),
        (UnaryOp::Neg, Value::Int(n)) => n
            .checked_neg()
            .map(Value::Int)
            .ok_or_else(|| integer_overflow("negation")),
        (UnaryOp::Neg, Value::Long(n)) => n
            .checked_neg()
            .map(Value::Long)
            .ok_or_else(|| integer_overflow("negation")),
        (UnaryOp::Neg, Value::Float(f)) => Ok(Value::Float(-f)),
        (UnaryOp::Neg, Value::Double(f)) => Ok(Value::Double(-f)),

        (
            UnaryOp::Plus,
            Value::Byte(_) | Value::Int(_) | Value::Long(_) | Value::Float(_) | Value::Double(_),
        ) => Ok(value.clone()),

        (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),

        _ => Err(invalid_unary_op(op, value.type_name())),
    }
}

#[cold]
fn invalid_unary_op(op: UnaryOp, type_name: &str) -> EvalError {
    EvalError::with_message(
        EvalErrorKind::InvalidOperator {
            op: op.as_symbol().to_string(),
            left: type_name.to_string(),
            right: String::new(),
        },
        format!("operator `{}` cannot be applied to {type_name}", op.as_symbol()),
    )
}
