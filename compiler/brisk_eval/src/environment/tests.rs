#![allow(clippy::unwrap_used, reason = "tests unwrap known-good bindings")]

use super::*;
use brisk_value::EvalErrorKind;
use pretty_assertions::assert_eq;

#[test]
fn lookup_is_case_insensitive() {
    let mut env = Environment::new();
    env.define("Total", Value::int(3), None, Mutability::Mutable)
        .unwrap();
    assert_eq!(env.lookup("total"), Some(Value::int(3)));
    assert_eq!(env.lookup("TOTAL"), Some(Value::int(3)));
}

#[test]
fn inner_scope_shadows_and_pops() {
    let mut env = Environment::new();
    env.define("x", Value::int(1), None, Mutability::Mutable)
        .unwrap();
    env.push_scope();
    env.define("x", Value::int(2), None, Mutability::Mutable)
        .unwrap();
    assert_eq!(env.lookup("x"), Some(Value::int(2)));
    env.pop_scope();
    assert_eq!(env.lookup("x"), Some(Value::int(1)));
}

#[test]
fn duplicate_in_same_scope_fails() {
    let mut env = Environment::new();
    env.define("x", Value::int(1), None, Mutability::Mutable)
        .unwrap();
    let err = env
        .define("X", Value::int(2), None, Mutability::Mutable)
        .unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::DuplicateName { .. }));
}

#[test]
fn assignment_casts_to_declared_type() {
    let mut env = Environment::new();
    env.define("d", Value::int(1), Some(TypeDesc::DOUBLE), Mutability::Mutable)
        .unwrap();
    assert_eq!(env.lookup("d"), Some(Value::double(1.0)));
    env.assign("d", &Value::string("2.5")).unwrap();
    assert_eq!(env.lookup("d"), Some(Value::double(2.5)));
}

#[test]
fn constants_reject_assignment() {
    let mut env = Environment::new();
    env.define("limit", Value::int(10), None, Mutability::Constant)
        .unwrap();
    let err = env.assign("limit", &Value::int(11)).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::ConstantReassignment { .. }));
}

#[test]
fn undefined_assignment_fails() {
    let mut env = Environment::new();
    let err = env.assign("ghost", &Value::int(1)).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::UndefinedVariable { .. }));
}

#[test]
fn frames_see_globals_but_not_caller_locals() {
    let mut env = Environment::new();
    env.define("g", Value::int(1), None, Mutability::Mutable)
        .unwrap();
    env.push_scope();
    env.define("local", Value::int(2), None, Mutability::Mutable)
        .unwrap();

    env.push_frame();
    assert_eq!(env.lookup("g"), Some(Value::int(1)));
    assert_eq!(env.lookup("local"), None);
    env.assign("g", &Value::int(5)).unwrap();
    env.pop_frame();

    assert_eq!(env.lookup("local"), Some(Value::int(2)));
    assert_eq!(env.lookup("g"), Some(Value::int(5)));
}

#[test]
fn top_level_frame_is_never_popped() {
    let mut env = Environment::new();
    env.pop_frame();
    assert_eq!(env.frame_depth(), 1);
}

#[test]
fn typed_binding_keeps_conforming_array_handle() {
    let mut env = Environment::new();
    let list = Value::string_array(["x"]);
    let ty = TypeDesc::Array(brisk_ir::ArrayShape::dynamic(TypeDesc::STRING));
    env.define("items", list.clone(), Some(ty), Mutability::Mutable)
        .unwrap();

    let (Value::Array(original), Some(Value::Array(bound))) = (&list, env.lookup("items")) else {
        panic!("expected arrays");
    };
    assert!(original.ptr_eq(&bound));
}
