use super::*;
use crate::test_helpers::{sample_line, sample_point};

#[test]
fn insert_then_lookup() {
    let registry = EntityRegistry::new();
    registry.insert_all([sample_point("a"), sample_line("b")]);

    assert_eq!(registry.len(), 2);
    assert_eq!(registry.lookup("a").map(|e| e.id().to_owned()), Some("a".to_owned()));
    assert!(registry.lookup("missing").is_none());
}

#[test]
fn reinsert_replaces_by_id() {
    let registry = EntityRegistry::new();
    registry.insert_all([sample_point("a")]);
    registry.insert_all([sample_line("a")]);

    assert_eq!(registry.len(), 1);
    assert!(registry.lookup("a").unwrap().as_line().is_some());
}

#[test]
fn remove_all_evicts_given_entities() {
    let registry = EntityRegistry::new();
    let kept = sample_point("keep");
    let dropped = [sample_point("x"), sample_line("y")];
    registry.insert_all([kept]);
    registry.insert_all(dropped.clone());

    registry.remove_all(&dropped);
    assert_eq!(registry.len(), 1);
    assert!(registry.lookup("keep").is_some());
}

#[test]
fn remove_ids_ignores_unknown() {
    let registry = EntityRegistry::new();
    registry.insert_all([sample_point("a")]);
    registry.remove_ids(["nope", "a"]);
    assert!(registry.is_empty());
}

#[test]
fn resolve_splits_found_and_missing() {
    let registry = EntityRegistry::new();
    registry.insert_all([sample_point("a"), sample_point("c")]);

    let (found, missing) = registry.resolve(&["a".into(), "b".into(), "c".into()]);
    let ids: Vec<_> = found.iter().map(|e| e.id()).collect();
    assert_eq!(ids, vec!["a", "c"]);
    assert_eq!(missing, vec!["b".to_owned()]);
}

#[test]
fn clones_share_state() {
    let registry = EntityRegistry::new();
    let other = registry.clone();
    other.insert_all([sample_point("shared")]);
    assert!(registry.lookup("shared").is_some());
}
