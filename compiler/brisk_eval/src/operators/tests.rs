#![allow(clippy::unwrap_used, reason = "tests unwrap known-good results")]

use super::*;
use brisk_value::EvalErrorKind;
use pretty_assertions::assert_eq;

fn eval(op: BinaryOp, l: Value, r: Value) -> Value {
    evaluate_binary(op, &l, &r).unwrap()
}

fn kind(op: BinaryOp, l: Value, r: Value) -> EvalErrorKind {
    evaluate_binary(op, &l, &r).unwrap_err().kind
}

#[test]
fn integer_arithmetic() {
    assert_eq!(eval(BinaryOp::Add, Value::int(2), Value::int(3)), Value::int(5));
    assert_eq!(eval(BinaryOp::Sub, Value::int(2), Value::int(3)), Value::int(-1));
    assert_eq!(eval(BinaryOp::Div, Value::int(7), Value::int(2)), Value::int(3));
    assert_eq!(eval(BinaryOp::Mod, Value::int(-7), Value::int(2)), Value::int(-1));
    assert_eq!(eval(BinaryOp::Pow, Value::int(2), Value::int(10)), Value::int(1024));
}

#[test]
fn promotion_follows_the_ladder() {
    assert_eq!(eval(BinaryOp::Add, Value::byte(200), Value::byte(100)), Value::int(300));
    assert_eq!(eval(BinaryOp::Mul, Value::int(3), Value::long(4)), Value::long(12));
    assert_eq!(eval(BinaryOp::Add, Value::long(1), Value::float(0.5)), Value::float(1.5));
    assert_eq!(eval(BinaryOp::Div, Value::int(1), Value::double(4.0)), Value::double(0.25));
}

#[test]
fn integer_overflow_is_reported() {
    assert!(matches!(
        kind(BinaryOp::Add, Value::int(i32::MAX), Value::int(1)),
        EvalErrorKind::IntegerOverflow { .. }
    ));
    assert!(matches!(
        kind(BinaryOp::Mul, Value::long(i64::MAX), Value::long(2)),
        EvalErrorKind::IntegerOverflow { .. }
    ));
    assert_eq!(
        eval(BinaryOp::Add, Value::int(i32::MAX), Value::long(1)),
        Value::long(i64::from(i32::MAX) + 1)
    );
}

#[test]
fn integer_division_by_zero_fails() {
    assert_eq!(kind(BinaryOp::Div, Value::int(1), Value::int(0)), EvalErrorKind::DivisionByZero);
    assert_eq!(kind(BinaryOp::Mod, Value::long(1), Value::long(0)), EvalErrorKind::DivisionByZero);
}

#[test]
fn float_division_by_zero_is_infinite() {
    let v = eval(BinaryOp::Div, Value::double(1.0), Value::double(0.0));
    assert_eq!(v.as_f64().map(f64::is_infinite), Some(true));
}

#[test]
fn negative_exponent_yields_double() {
    assert_eq!(eval(BinaryOp::Pow, Value::int(2), Value::int(-1)), Value::double(0.5));
}

#[test]
fn plus_concatenates_with_strings() {
    assert_eq!(
        eval(BinaryOp::Add, Value::string("n="), Value::int(4)),
        Value::string("n=4")
    );
    assert_eq!(
        eval(BinaryOp::Add, Value::double(1.0), Value::string("x")),
        Value::string("1.0x")
    );
    assert_eq!(
        eval(BinaryOp::Add, Value::string("a"), Value::null()),
        Value::string("anull")
    );
}

#[test]
fn comparisons() {
    assert_eq!(eval(BinaryOp::Lt, Value::int(1), Value::double(1.5)), Value::bool(true));
    assert_eq!(eval(BinaryOp::GtEq, Value::long(3), Value::byte(3)), Value::bool(true));
    assert_eq!(eval(BinaryOp::Lt, Value::string("apple"), Value::string("banana")), Value::bool(true));
    assert_eq!(eval(BinaryOp::Eq, Value::bool(true), Value::bool(true)), Value::bool(true));
    assert_eq!(eval(BinaryOp::Eq, Value::null(), Value::int(0)), Value::bool(false));
    assert_eq!(eval(BinaryOp::NotEq, Value::null(), Value::null()), Value::bool(false));
    assert_eq!(
        eval(BinaryOp::NotEq, Value::double(f64::NAN), Value::double(f64::NAN)),
        Value::bool(true)
    );
}

#[test]
fn invalid_combinations_fail() {
    assert!(matches!(
        kind(BinaryOp::Lt, Value::bool(true), Value::bool(false)),
        EvalErrorKind::InvalidOperator { .. }
    ));
    assert!(matches!(
        kind(BinaryOp::Sub, Value::string("a"), Value::int(1)),
        EvalErrorKind::InvalidOperator { .. }
    ));
    assert!(matches!(
        kind(BinaryOp::Eq, Value::bool(true), Value::int(1)),
        EvalErrorKind::InvalidOperator { .. }
    ));
    assert!(matches!(
        kind(BinaryOp::And, Value::bool(true), Value::int(1)),
        EvalErrorKind::InvalidOperator { .. }
    ));
}

#[test]
fn logical_operators_on_bools() {
    assert_eq!(eval(BinaryOp::And, Value::bool(true), Value::bool(false)), Value::bool(false));
    assert_eq!(eval(BinaryOp::Or, Value::bool(false), Value::bool(true)), Value::bool(true));
}
