#![allow(clippy::unwrap_used, reason = "tests unwrap known-good programs")]

use super::*;
use crate::output::buffer_output;
use brisk_ir::ast::build::{
    array, assign, binary, block, boolean, brk, call, call_stmt, cont, const_var, double, expr_stmt,
    for_each, function, handler, if_else, index, index_assign, int, length, let_var, null, print,
    prop, prop_assign, raise, record, ret, string, try_catch, type_of, typedef, var, while_loop,
};
use brisk_ir::{
    ArrayShape, BinaryOp, BitViewType, BitWidth, ErrorCategory, Expr, ExprKind, Line, Param,
    ScalarKind, StmtKind, TypeDesc, TypeRef,
};
use brisk_value::EvalErrorKind;
use pretty_assertions::assert_eq;

fn interp() -> Interpreter {
    Interpreter::builder().output(buffer_output()).build()
}

fn printed(interp: &Interpreter) -> Vec<String> {
    interp.output().as_buffer().unwrap().lines()
}

fn int_ty() -> Option<TypeRef> {
    Some(ScalarKind::Int.into())
}

#[test]
fn arithmetic_respects_tree_shape() {
    let mut interp = interp();
    let program = [ret(Some(binary(
        BinaryOp::Add,
        int(2),
        binary(BinaryOp::Mul, int(3), int(4)),
    )))];
    assert_eq!(interp.execute(&program).unwrap(), Value::int(14));
}

#[test]
fn and_or_short_circuit() {
    let mut interp = interp();
    let program = [
        let_var(
            "a",
            None,
            Some(binary(BinaryOp::And, boolean(false), call("missing", vec![]))),
        ),
        let_var(
            "b",
            None,
            Some(binary(BinaryOp::Or, boolean(true), call("missing", vec![]))),
        ),
        ret(Some(binary(BinaryOp::Or, var("a"), var("b")))),
    ];
    assert_eq!(interp.execute(&program).unwrap(), Value::bool(true));
}

#[test]
fn declaration_without_init_takes_type_default() {
    let mut interp = interp();
    let program = [let_var("n", int_ty(), None), ret(Some(var("N")))];
    assert_eq!(interp.execute(&program).unwrap(), Value::int(0));
}

#[test]
fn constants_reject_assignment_with_line() {
    let mut interp = interp();
    let program = [
        const_var("limit", None, int(3)).at(1),
        assign("limit", int(4)).at(2),
    ];
    let err = interp.execute(&program).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::ConstantReassignment { .. }));
    assert_eq!(err.line, Some(Line(2)));
}

#[test]
fn error_line_comes_from_innermost_node() {
    let mut interp = interp();
    let program = [print(binary(BinaryOp::Div, int(1), int(0).at(7)).at(7)).at(6)];
    let err = interp.execute(&program).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::DivisionByZero);
    assert_eq!(err.line, Some(Line(7)));
}

#[test]
fn conditions_must_be_bool() {
    let mut interp = interp();
    let program = [if_else(int(1), vec![], None)];
    let err = interp.execute(&program).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::TypeMismatch { .. }));
}

#[test]
fn while_loop_honours_break_and_continue() {
    let mut interp = interp();
    let i_plus_1 = binary(BinaryOp::Add, var("i"), int(1));
    let program = [
        let_var("i", int_ty(), Some(int(0))),
        let_var("sum", int_ty(), Some(int(0))),
        while_loop(
            binary(BinaryOp::Lt, var("i"), int(10)),
            vec![
                assign("i", i_plus_1),
                if_else(
                    binary(
                        BinaryOp::Eq,
                        binary(BinaryOp::Mod, var("i"), int(2)),
                        int(0),
                    ),
                    vec![cont()],
                    None,
                ),
                if_else(binary(BinaryOp::Gt, var("i"), int(7)), vec![brk()], None),
                assign("sum", binary(BinaryOp::Add, var("sum"), var("i"))),
            ],
        ),
        ret(Some(var("sum"))),
    ];
    assert_eq!(interp.execute(&program).unwrap(), Value::int(16));
}

#[test]
fn do_while_runs_body_once() {
    let mut interp = interp();
    let program = [Stmt::new(
        StmtKind::DoWhile {
            body: vec![print(string("once"))].into(),
            condition: boolean(false),
        },
        Line::UNKNOWN,
    )];
    interp.execute(&program).unwrap();
    assert_eq!(printed(&interp), vec!["once"]);
}

#[test]
fn for_loop_variable_is_scoped_to_the_loop() {
    let mut interp = interp();
    let for_loop = Stmt::new(
        StmtKind::For {
            init: Some(Box::new(let_var("i", int_ty(), Some(int(0))))),
            condition: Some(binary(BinaryOp::Lt, var("i"), int(3))),
            update: Some(Box::new(assign(
                "i",
                binary(BinaryOp::Add, var("i"), int(1)),
            ))),
            body: vec![print(var("i"))].into(),
        },
        Line::UNKNOWN,
    );
    interp.execute(&[for_loop]).unwrap();
    assert_eq!(printed(&interp), vec!["0", "1", "2"]);

    let err = interp.execute(&[expr_stmt(var("i"))]).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::UndefinedVariable { .. }));
}

#[test]
fn for_each_walks_arrays_and_strings() {
    let mut interp = interp();
    let program = [
        for_each("x", array(vec![int(1), int(2)]), vec![print(var("x"))]),
        for_each("c", string("hé"), vec![print(var("c"))]),
    ];
    interp.execute(&program).unwrap();
    assert_eq!(printed(&interp), vec!["1", "2", "h", "é"]);
}

#[test]
fn break_outside_loop_is_rejected() {
    let mut interp = interp();
    let err = interp.execute(&[brk().at(3)]).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::InvalidControlFlow { .. }));
    assert_eq!(err.line, Some(Line(3)));
}

#[test]
fn break_inside_function_does_not_escape_calling_loop() {
    let mut interp = interp();
    let program = [
        function("leave", vec![], None, vec![brk()]),
        while_loop(boolean(true), vec![call_stmt("leave", vec![])]),
    ];
    let err = interp.execute(&program).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::InvalidControlFlow { .. }));
}

#[test]
fn missing_arguments_use_defaults_or_fail_arity() {
    let mut interp = interp();
    let program = [function(
        "add",
        vec![
            Param::new("a", int_ty()),
            Param::new("b", int_ty()).with_default(int(10)),
        ],
        int_ty(),
        vec![ret(Some(binary(BinaryOp::Add, var("a"), var("b"))))],
    )];
    interp.execute(&program).unwrap();

    assert_eq!(
        interp.call_function("add", vec![Value::int(1)]).unwrap(),
        Value::int(11)
    );
    assert_eq!(
        interp
            .call_function("ADD", vec![Value::int(1), Value::int(2)])
            .unwrap(),
        Value::int(3)
    );

    let err = interp.call_function("add", vec![]).unwrap_err();
    assert_eq!(err.message, "add expects 1 to 2 argument(s), got 0");
    let err = interp
        .call_function("add", vec![Value::int(1), Value::int(2), Value::int(3)])
        .unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::Arity { .. }));
}

#[test]
fn parameters_and_results_are_cast() {
    let mut interp = interp();
    let program = [
        function(
            "half",
            vec![Param::new("x", Some(ScalarKind::Double.into()))],
            None,
            vec![ret(Some(binary(BinaryOp::Div, var("x"), int(2))))],
        ),
        function("zero", vec![], int_ty(), vec![]),
        function("nothing", vec![], None, vec![]),
        function(
            "truncate",
            vec![],
            int_ty(),
            vec![ret(Some(double(2.9)))],
        ),
    ];
    interp.execute(&program).unwrap();

    assert_eq!(
        interp.call_function("half", vec![Value::int(3)]).unwrap(),
        Value::double(1.5)
    );
    assert_eq!(interp.call_function("zero", vec![]).unwrap(), Value::int(0));
    assert_eq!(interp.call_function("nothing", vec![]).unwrap(), Value::Null);
    assert_eq!(interp.call_function("truncate", vec![]).unwrap(), Value::int(2));
}

#[test]
fn call_frames_see_globals_but_not_caller_locals() {
    let mut interp = interp();
    let program = [
        let_var("g", None, Some(int(1))),
        function("peek_global", vec![], None, vec![ret(Some(var("g")))]),
        function("peek_local", vec![], None, vec![ret(Some(var("local")))]),
        block(vec![
            let_var("local", None, Some(int(2))),
            print(call("peek_global", vec![])),
            expr_stmt(call("peek_local", vec![])),
        ]),
    ];
    let err = interp.execute(&program).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::UndefinedVariable { .. }));
    assert_eq!(printed(&interp), vec!["1"]);
}

#[test]
fn arrays_are_shared_with_callees() {
    let int_array = TypeRef::from(TypeDesc::Array(ArrayShape::dynamic(TypeDesc::INT)));
    let typed_literal = Expr::new(
        ExprKind::ArrayLiteral {
            elements: vec![int(1)],
            element_type: int_ty(),
        },
        Line::UNKNOWN,
    );
    let mut interp = interp();
    let program = [
        function(
            "grow",
            vec![Param::new("xs", Some(int_array.clone()))],
            None,
            vec![call_stmt("array.add", vec![var("xs"), int(2)])],
        ),
        let_var("nums", Some(int_array), Some(typed_literal)),
        call_stmt("grow", vec![var("nums")]),
        call_stmt("grow", vec![var("nums")]),
        ret(Some(length(var("nums")))),
    ];
    assert_eq!(interp.execute(&program).unwrap(), Value::int(3));
}

#[test]
fn records_support_field_and_key_assignment() {
    let mut interp = interp();
    let program = [
        let_var(
            "r",
            None,
            Some(record(vec![("name", string("a")), ("n", int(1))])),
        ),
        prop_assign(var("r"), "N", int(5)),
        index_assign(var("r"), string("name"), string("b")),
        print(prop(var("r"), "name")),
        ret(Some(binary(
            BinaryOp::Add,
            prop(var("r"), "n"),
            length(var("r")),
        ))),
    ];
    assert_eq!(interp.execute(&program).unwrap(), Value::int(7));
    assert_eq!(printed(&interp), vec!["b"]);
}

#[test]
fn missing_record_field_is_reported() {
    let mut interp = interp();
    let program = [
        let_var("r", None, Some(record(vec![("a", int(1))]))),
        expr_stmt(prop(var("r"), "b")),
    ];
    let err = interp.execute(&program).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::FieldNotFound { .. }));
}

#[test]
fn bit_view_writes_update_array_slots() {
    let flags =
        BitViewType::bitmap(BitWidth::W8, [("enabled", 0), ("locked", 1)]).unwrap();
    let mut interp = interp();
    let program = [
        typedef("Flags8", TypeDesc::bit_view(flags.clone())),
        let_var(
            "slots",
            None,
            Some(Expr::new(
                ExprKind::ArrayInit(ArrayShape::fixed(TypeDesc::bit_view(flags), 2)),
                Line::UNKNOWN,
            )),
        ),
        prop_assign(index(var("slots"), int(1)), "locked", boolean(true)),
        print(prop(index(var("slots"), int(0)), "locked")),
        print(prop(index(var("slots"), int(1)), "locked")),
    ];
    interp.execute(&program).unwrap();
    assert_eq!(printed(&interp), vec!["false", "true"]);
}

#[test]
fn containers_cannot_be_stored_inside_themselves() {
    let mut interp = interp();
    let program = [
        let_var("xs", None, Some(array(vec![int(1)]))),
        let_var("r", None, Some(record(vec![("n", int(1))]))),
        let_var("outer", None, Some(array(vec![var("xs")]))),
        index_assign(var("xs"), int(0), var("xs")),
    ];
    let err = interp.execute(&program).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::TypeMismatch { .. }));
    assert_eq!(err.message, "cannot store this array inside itself");

    for stmt in [
        index_assign(var("xs"), int(0), var("outer")),
        prop_assign(var("r"), "me", var("r")),
        index_assign(var("r"), string("wrapped"), array(vec![var("r")])),
        call_stmt("array.add", vec![var("xs"), var("outer")]),
    ] {
        let err = interp.execute(&[stmt]).unwrap_err();
        assert!(matches!(err.kind, EvalErrorKind::TypeMismatch { .. }));
    }

    interp
        .execute(&[print(var("outer")), print(var("r"))])
        .unwrap();
    assert_eq!(printed(&interp), vec!["[[1]]", "{n: 1}"]);
}

#[test]
fn index_assignment_is_bounds_checked() {
    let mut interp = interp();
    let program = [
        let_var("xs", None, Some(array(vec![int(1)]))),
        index_assign(var("xs"), int(0), int(9)),
        print(index(var("xs"), int(0))),
        index_assign(var("xs"), int(5), int(1)),
    ];
    let err = interp.execute(&program).unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::IndexOutOfBounds { index: 5, len: 1 }
    );
    assert_eq!(printed(&interp), vec!["9"]);
}

#[test]
fn try_catches_matching_category_and_binds_message() {
    let mut interp = interp();
    let program = [
        try_catch(
            vec![raise(ErrorCategory::Math, Some(string("boom")))],
            vec![
                handler(ErrorCategory::Index, None, vec![print(string("index"))]),
                handler(ErrorCategory::Math, Some("e"), vec![print(var("e"))]),
            ],
        ),
        try_catch(
            vec![expr_stmt(binary(BinaryOp::Div, int(1), int(0)))],
            vec![handler(ErrorCategory::Any, None, vec![print(string("any"))])],
        ),
    ];
    interp.execute(&program).unwrap();
    assert_eq!(printed(&interp), vec!["math_error: boom", "any"]);
}

#[test]
fn unmatched_errors_propagate_out_of_try() {
    let mut interp = interp();
    let program = [try_catch(
        vec![raise(ErrorCategory::Custom, None)],
        vec![handler(ErrorCategory::Type, None, vec![])],
    )];
    let err = interp.execute(&program).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Custom);
}

#[test]
fn typeof_reports_descriptor_names() {
    let mut interp = interp();
    let program = [
        print(type_of(int(1))),
        print(type_of(array(vec![]))),
        print(type_of(null())),
    ];
    interp.execute(&program).unwrap();
    assert_eq!(printed(&interp), vec!["int", "array.any[*]", "null"]);
}

#[test]
fn unknown_calls_are_classified() {
    let mut interp = interp();
    let err = interp
        .execute(&[expr_stmt(call("str.nope", vec![]))])
        .unwrap_err();
    assert_eq!(err.message, "unknown string builtin: str.nope");

    let err = interp
        .execute(&[expr_stmt(call("net.fetch", vec![]))])
        .unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::UnknownBuiltin { .. }));

    let err = interp
        .execute(&[expr_stmt(call("greet", vec![]))])
        .unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::UndefinedFunction { .. }));
}

#[test]
fn redeclaring_a_function_needs_the_same_body() {
    let mut interp = interp();
    let f = function("f", vec![], None, vec![ret(Some(int(1)))]);
    interp.execute(&[f.clone(), f]).unwrap();

    let other = function("F", vec![], None, vec![ret(Some(int(2)))]);
    let err = interp.execute(&[other]).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::DuplicateName { .. }));
}

#[test]
fn call_depth_limit_attaches_backtrace() {
    let mut interp = Interpreter::builder()
        .output(buffer_output())
        .max_call_depth(8)
        .build();
    let program = [
        function("spin", vec![], None, vec![ret(Some(call("spin", vec![]).at(2)))]),
        expr_stmt(call("spin", vec![]).at(4)),
    ];
    let err = interp.execute(&program).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::RecursionLimit { depth: 8 });
    let backtrace = err.backtrace.unwrap();
    assert_eq!(backtrace.len(), 8);
    assert_eq!(backtrace.frames()[0].line, Some(Line(4)));
    assert_eq!(interp.call_depth(), 0);
}

#[test]
fn test_run_mode_counts_calls() {
    let mut interp = Interpreter::builder()
        .mode(EvalMode::TestRun)
        .output(buffer_output())
        .build();
    let program = [
        function("one", vec![], None, vec![ret(Some(int(1)))]),
        expr_stmt(call("one", vec![])),
        expr_stmt(call("one", vec![])),
        expr_stmt(call("str.trim", vec![string(" x ")])),
    ];
    interp.execute(&program).unwrap();
    let counters = interp.counters().unwrap();
    assert_eq!(counters.function_calls, 2);
    assert_eq!(counters.builtin_calls, 1);
    assert_eq!(counters.statements, 6);

    assert!(Interpreter::new().counters().is_none());
}

#[test]
fn execute_source_uses_host_frontend() {
    let frontend = |source: &str| -> Result<Vec<Stmt>, EvalError> {
        Ok(vec![print(string(source.trim()))])
    };
    let mut interp = interp();
    interp.execute_source(&frontend, "  hello ").unwrap();
    assert_eq!(printed(&interp), vec!["hello"]);
}
