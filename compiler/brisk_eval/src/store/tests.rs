use std::thread;

use super::*;
use pretty_assertions::assert_eq;

#[test]
fn keys_are_case_insensitive() {
    let store = VariableStore::new();
    store.set("UserName", Value::string("ada"));
    assert!(store.contains("username"));
    assert_eq!(store.get("USERNAME"), Some(Value::string("ada")));
    assert_eq!(store.remove("userName"), Some(Value::string("ada")));
    assert!(store.is_empty());
}

#[test]
fn set_returns_previous_value() {
    let store = VariableStore::new();
    assert_eq!(store.set("n", Value::int(1)), None);
    assert_eq!(store.set("N", Value::int(2)), Some(Value::int(1)));
    assert_eq!(store.len(), 1);
}

#[test]
fn snapshot_is_sorted() {
    let store = VariableStore::new();
    store.set("b", Value::int(2));
    store.set("A", Value::int(1));
    let names: Vec<_> = store.snapshot().into_iter().map(|(k, _)| k).collect();
    assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn concurrent_writers_do_not_lose_entries() {
    let store = VariableStore::shared();
    let handles: Vec<_> = (0..4)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..100 {
                    store.set(&format!("t{t}_v{i}"), Value::int(i));
                }
            })
        })
        .collect();
    for h in handles {
        assert!(h.join().is_ok());
    }
    assert_eq!(store.len(), 400);
    assert_eq!(store.get("T3_V99"), Some(Value::int(99)));
}
