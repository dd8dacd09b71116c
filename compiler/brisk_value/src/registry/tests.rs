#![allow(clippy::unwrap_used, reason = "tests unwrap known-good values")]

use std::thread;

use super::*;
use crate::errors::EvalErrorKind;
use brisk_ir::{BitViewType, BitWidth};
use pretty_assertions::assert_eq;

fn flags8() -> TypeDesc {
    TypeDesc::bit_view(BitViewType::bitmap(BitWidth::W8, [("enabled", 0), ("locked", 1)]).unwrap())
}

#[test]
fn lookup_ignores_case() {
    let reg = TypeAliasRegistry::new();
    reg.register_type_alias("Flags8", flags8()).unwrap();
    assert!(reg.has_type_alias("FLAGS8"));
    assert_eq!(reg.get_type_alias("flags8"), Some(flags8()));
}

#[test]
fn identical_reregistration_is_a_no_op() {
    let reg = TypeAliasRegistry::new();
    reg.register_type_alias("Id", TypeDesc::LONG).unwrap();
    reg.register_type_alias("ID", TypeDesc::LONG).unwrap();
    assert_eq!(reg.len(), 1);
}

#[test]
fn conflicting_reregistration_fails() {
    let reg = TypeAliasRegistry::new();
    reg.register_type_alias("Id", TypeDesc::LONG).unwrap();
    let err = reg.register_type_alias("id", TypeDesc::STRING).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::InvalidTypeDefinition { .. }));
    assert_eq!(reg.get_type_alias("id"), Some(TypeDesc::LONG));
}

#[test]
fn scalar_keywords_cannot_be_aliased() {
    let reg = TypeAliasRegistry::new();
    assert!(reg.register_type_alias("Int", TypeDesc::LONG).is_err());
    assert!(reg.register_type_alias("  ", TypeDesc::LONG).is_err());
}

#[test]
fn resolve_falls_back_to_scalar_keywords() {
    let reg = TypeAliasRegistry::new();
    assert_eq!(reg.resolve(&TypeRef::alias("double")).unwrap(), TypeDesc::DOUBLE);
    let err = reg.resolve(&TypeRef::alias("Nope")).unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::UnknownType {
            name: "Nope".to_string()
        }
    );
}

#[test]
fn clear_resets_the_table() {
    let reg = TypeAliasRegistry::new();
    reg.register_type_alias("A", TypeDesc::INT).unwrap();
    reg.clear();
    assert!(reg.is_empty());
    assert!(!reg.has_type_alias("a"));
}

#[test]
fn concurrent_registration_from_many_threads() {
    let reg = TypeAliasRegistry::shared();
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let reg = Arc::clone(&reg);
            thread::spawn(move || {
                for i in 0..50 {
                    reg.register_type_alias(&format!("t{t}_{i}"), TypeDesc::INT)
                        .unwrap();
                    assert!(reg.has_type_alias(&format!("T{t}_{i}")));
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(reg.len(), 400);
}
