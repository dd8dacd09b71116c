//! End-to-end script tests.
//!
//! Programs are assembled with `brisk_ir::ast::build` the way a host front
//! end would hand them over, then run through a full interpreter with a
//! buffered output sink.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use std::sync::Arc;

use brisk_eval::{
    buffer_output, BuiltinContext, BuiltinRegistry, DiagnosticCounters, EvalErrorKind, EvalMode,
    EvalResult, Interpreter, TypeAliasRegistry, Value, VariableStore,
};
use brisk_ir::ast::build::{
    array, assign, binary, block, boolean, call, cast, expr_stmt, function, if_else, int, let_var,
    print, prop, prop_assign, ret, string, typedef, var, while_loop,
};
use brisk_ir::{BinaryOp, BitViewType, BitWidth, Param, ScalarKind, Stmt, TypeDesc, TypeRef};
use pretty_assertions::assert_eq;

fn printed(interp: &Interpreter) -> Vec<String> {
    interp.output().as_buffer().expect("buffered output").lines()
}

fn run(program: &[Stmt]) -> (Interpreter, EvalResult) {
    let mut interp = Interpreter::builder().output(buffer_output()).build();
    let result = interp.execute(program);
    (interp, result)
}

fn flags8() -> TypeDesc {
    TypeDesc::bit_view(
        BitViewType::bitmap(BitWidth::W8, [("enabled", 0), ("locked", 1)]).expect("valid bitmap"),
    )
}

#[test]
fn return_in_nested_blocks_unwinds_to_the_call() {
    let program = [
        function(
            "find",
            vec![],
            Some(ScalarKind::Int.into()),
            vec![
                while_loop(
                    boolean(true),
                    vec![if_else(
                        boolean(true),
                        vec![block(vec![ret(Some(int(42)))])],
                        None,
                    )],
                ),
                print(string("unreachable")),
            ],
        ),
        print(call("find", vec![])),
        print(string("after")),
    ];
    let (interp, result) = run(&program);
    result.unwrap();
    assert_eq!(printed(&interp), vec!["42", "after"]);
}

#[test]
fn flags8_alias_casts_integers() {
    let flags = TypeRef::alias("Flags8");
    let program = [
        typedef("Flags8", flags8()),
        let_var("both", None, Some(cast(flags.clone(), int(0b11)))),
        let_var("none", None, Some(cast(flags.clone(), int(0)))),
        print(prop(var("both"), "enabled")),
        print(prop(var("both"), "LOCKED")),
        print(prop(var("none"), "enabled")),
        expr_stmt(cast(flags, int(256))),
    ];
    let (interp, result) = run(&program);
    let err = result.unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::TypeMismatch { .. }));
    assert_eq!(printed(&interp), vec!["true", "true", "false"]);
}

#[test]
fn bit_view_field_writes_update_the_variable() {
    let program = [
        typedef("Flags8", flags8()),
        let_var("f", Some(TypeRef::alias("flags8")), None),
        prop_assign(var("f"), "locked", boolean(true)),
        print(prop(var("f"), "locked")),
        ret(Some(cast(ScalarKind::Int, var("f")))),
    ];
    let (interp, result) = run(&program);
    assert_eq!(result.unwrap(), Value::int(2));
    assert_eq!(printed(&interp), vec!["true"]);
}

#[test]
fn string_builtins_match_documented_examples() {
    let program = [
        print(call(
            "str.join",
            vec![array(vec![string("a"), string("b"), string("c")]), string("-")],
        )),
        print(call("str.substring", vec![string("hello"), int(1), int(3)])),
        print(call("STR.LPAD", vec![string("7"), int(3), string("0")])),
        expr_stmt(call("str.lpad", vec![string("7"), int(3), string("00")])),
    ];
    let (interp, result) = run(&program);
    assert!(result.is_err());
    assert_eq!(printed(&interp), vec!["a-b-c", "el", "007"]);
}

#[test]
fn attached_store_is_read_and_written_by_namespace() {
    let store = VariableStore::shared();
    store.set("greeting", Value::string("hi"));
    let mut interp = Interpreter::builder()
        .output(buffer_output())
        .attach_store("UI", Arc::clone(&store))
        .build();

    let program = [
        print(prop(var("ui"), "Greeting")),
        prop_assign(var("ui"), "count", int(3)),
        assign("ui.total", binary(BinaryOp::Add, var("ui.count"), int(1))),
    ];
    interp.execute(&program).unwrap();

    assert_eq!(printed(&interp), vec!["hi"]);
    assert_eq!(store.get("COUNT"), Some(Value::int(3)));
    assert_eq!(store.get("total"), Some(Value::int(4)));
}

#[test]
fn test_run_mode_caps_recursion() {
    let mut interp = Interpreter::builder()
        .mode(EvalMode::TestRun)
        .output(buffer_output())
        .build();
    let program = [
        function(
            "down",
            vec![Param::new("n", Some(ScalarKind::Int.into()))],
            None,
            vec![ret(Some(call(
                "down",
                vec![binary(BinaryOp::Add, var("n"), int(1))],
            )))],
        ),
        expr_stmt(call("down", vec![int(0)])),
    ];
    let err = interp.execute(&program).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::RecursionLimit { depth: 256 });
    assert_eq!(err.backtrace.unwrap().len(), 256);
}

#[test]
fn type_aliases_are_shared_between_interpreters() {
    let types = TypeAliasRegistry::shared();
    let mut first = Interpreter::builder()
        .output(buffer_output())
        .type_registry(Arc::clone(&types))
        .build();
    first.execute(&[typedef("Score", ScalarKind::Long)]).unwrap();

    let mut second = Interpreter::builder()
        .output(buffer_output())
        .type_registry(types)
        .build();
    let result = second
        .execute(&[ret(Some(cast(TypeRef::alias("score"), int(5))))])
        .unwrap();
    assert_eq!(result, Value::long(5));
}

#[test]
fn parse_warnings_reach_sink_and_counters() {
    let counters = DiagnosticCounters::shared();
    let mut interp = Interpreter::builder()
        .output(buffer_output())
        .diagnostics(Arc::clone(&counters))
        .build();
    let result = interp
        .execute(&[ret(Some(call("str.toint", vec![string("abc"), int(-1)])))])
        .unwrap();

    assert_eq!(result, Value::int(-1));
    assert_eq!(counters.warnings(), 1);
    assert_eq!(counters.builtin_calls(), 1);
    let warnings = interp.output().as_buffer().unwrap().warnings();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].starts_with("str.toint"));
}

fn twice(_: &BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    let n = args.first().and_then(Value::as_i64).unwrap_or_default();
    Ok(Value::long(n * 2))
}

#[test]
fn host_registered_builtins_are_callable() {
    let mut builtins = BuiltinRegistry::with_defaults();
    builtins.register("host.twice", twice);
    let mut interp = Interpreter::builder()
        .output(buffer_output())
        .builtins(Arc::new(builtins))
        .build();
    let result = interp
        .execute(&[ret(Some(call("Host.Twice", vec![int(21)])))])
        .unwrap();
    assert_eq!(result, Value::long(42));
}
