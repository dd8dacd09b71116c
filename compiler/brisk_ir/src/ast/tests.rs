use super::build::*;
use super::*;
use crate::{Line, ScalarKind, TypeRef};
use pretty_assertions::assert_eq;

#[test]
fn operator_symbols() {
    assert_eq!(BinaryOp::Pow.as_symbol(), "^");
    assert_eq!(BinaryOp::And.as_symbol(), "and");
    assert_eq!(UnaryOp::Not.as_symbol(), "!");
    assert!(BinaryOp::LtEq.is_comparison());
    assert!(!BinaryOp::Add.is_comparison());
    assert!(BinaryOp::Or.is_logical());
}

#[test]
fn builders_start_at_unknown_line() {
    let e = int(1);
    assert_eq!(e.line, Line::UNKNOWN);
    assert_eq!(e.at(7).line, Line(7));
}

#[test]
fn cast_builder_accepts_scalar_kinds_and_aliases() {
    let c = cast(ScalarKind::Double, int(3));
    match c.kind {
        ExprKind::Cast { target, .. } => {
            assert_eq!(target, TypeRef::from(ScalarKind::Double));
        }
        other => panic!("expected cast, got {other:?}"),
    }

    let c = cast(TypeRef::alias("Flags8"), int(3));
    assert!(matches!(
        c.kind,
        ExprKind::Cast { target: TypeRef::Alias(ref n), .. } if n == "Flags8"
    ));
}

#[test]
fn error_categories_parse_case_insensitively() {
    assert_eq!(ErrorCategory::from_name("TYPE_ERROR"), Some(ErrorCategory::Type));
    assert_eq!(ErrorCategory::from_name("any"), Some(ErrorCategory::Any));
    assert_eq!(ErrorCategory::from_name("io_error"), None);
    assert!(ErrorCategory::Any.catches(ErrorCategory::Math));
    assert!(!ErrorCategory::Index.catches(ErrorCategory::Math));
}

#[test]
fn function_builder_wraps_decl() {
    let f = function(
        "add",
        vec![Param::new("a", Some(ScalarKind::Int.into()))],
        None,
        vec![ret(Some(var("a")))],
    );
    match f.kind {
        StmtKind::Function(decl) => {
            assert_eq!(decl.name, "add");
            assert_eq!(decl.params.len(), 1);
            assert_eq!(decl.body.stmts.len(), 1);
        }
        other => panic!("expected function, got {other:?}"),
    }
}
