#![allow(clippy::unwrap_used, reason = "tests unwrap known-good sets")]

use super::*;
use brisk_value::EvalErrorKind;
use pretty_assertions::assert_eq;

#[test]
fn legacy_codes_normalize() {
    assert!(VarSet::new("a", "Y").unwrap().is_internal());
    assert!(!VarSet::new("b", "N").unwrap().is_internal());
    assert!(VarSet::new("c", "y").unwrap().is_internal());
    assert_eq!(VarSet::new("d", "Visible").unwrap().scope(), VarScope::Visible);
    assert_eq!(VarSet::new("e", " INTERNAL ").unwrap().scope(), VarScope::Internal);
}

#[test]
fn unknown_scope_code_fails() {
    let err = VarSet::new("a", "maybe").unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::MalformedLiteral { .. }));
}

#[test]
fn lookup_ignores_case() {
    let mut set = VarSet::new("person", "N").unwrap();
    set.add_variable(Var::new("Name", TypeDesc::STRING)).unwrap();
    let upper = set.get_variable("Name").unwrap();
    let lower = set.get_variable("name").unwrap();
    assert_eq!(upper, lower);
    assert_eq!(lower.key(), "person.name");
    assert_eq!(lower.set_name(), Some("person"));
}

#[test]
fn duplicate_names_are_rejected() {
    let mut set = VarSet::new("s", "N").unwrap();
    set.add_variable(Var::new("count", TypeDesc::INT)).unwrap();
    let err = set
        .add_variable(Var::new("COUNT", TypeDesc::LONG))
        .unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::DuplicateName { .. }));
    assert_eq!(set.len(), 1);
}

#[test]
fn set_value_casts_and_reset_restores_default() {
    let mut set = VarSet::new("s", "internal").unwrap();
    set.add_variable(Var::with_default("age", TypeDesc::INT, &Value::string("18")).unwrap())
        .unwrap();
    assert_eq!(set.get_value("age"), Some(Value::int(18)));

    set.set_value("AGE", &Value::string("42")).unwrap();
    assert_eq!(set.get_value("age"), Some(Value::int(42)));

    let err = set.set_value("age", &Value::string("old")).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::MalformedLiteral { .. }));

    set.reset();
    assert_eq!(set.get_value("age"), Some(Value::int(18)));
}

#[test]
fn set_value_on_missing_variable_fails() {
    let mut set = VarSet::new("s", "N").unwrap();
    let err = set.set_value("nope", &Value::int(1)).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::UndefinedVariable { .. }));
}

#[test]
fn visible_listing_skips_internal_sets() {
    let mut sets = VarSets::new();
    sets.add(VarSet::new("form", "N").unwrap()).unwrap();
    sets.add(VarSet::new("hidden", "Y").unwrap()).unwrap();
    sets.add(VarSet::new("extra", "visible").unwrap()).unwrap();

    let visible: Vec<_> = sets.visible().map(VarSet::name).collect();
    assert_eq!(visible, vec!["form", "extra"]);
    assert_eq!(sets.all().count(), 3);
    assert!(sets.add(VarSet::new("FORM", "N").unwrap()).is_err());
}

#[test]
fn internal_sets_remain_assignable() {
    let mut sets = VarSets::new();
    let mut hidden = VarSet::new("hidden", "Y").unwrap();
    hidden.add_variable(Var::new("token", TypeDesc::STRING)).unwrap();
    sets.add(hidden).unwrap();

    sets.get_mut("Hidden")
        .unwrap()
        .set_value("token", &Value::string("abc"))
        .unwrap();
    assert_eq!(
        sets.find_variable("hidden.TOKEN").map(Var::value),
        Some(&Value::string("abc"))
    );
}
