use super::*;
use std::collections::HashMap;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
    move |key: &str| vars.get(key).cloned()
}

#[test]
fn empty_environment_yields_defaults() {
    let cfg = BridgeConfig::from_lookup(lookup(&[])).unwrap();
    assert_eq!(cfg, BridgeConfig::default());
    assert_eq!(cfg.root_object, "mapComponent");
    assert_eq!(cfg.layer_manager, "vectorLayerManager");
    assert_eq!(cfg.entity_manager, "entityManager");
    assert_eq!(cfg.reply_timeout, None);
    assert!(!cfg.require_ready);
}

#[test]
fn overrides_are_applied() {
    let cfg = BridgeConfig::from_lookup(lookup(&[
        ("MAP_BRIDGE_ROOT_OBJECT", "map"),
        ("MAP_BRIDGE_LAYER_MANAGER", "layers"),
        ("MAP_BRIDGE_ENTITY_MANAGER", "entities"),
        ("MAP_BRIDGE_REPLY_TIMEOUT_MS", "2500"),
        ("MAP_BRIDGE_REQUIRE_READY", "true"),
    ]))
    .unwrap();

    assert_eq!(cfg.root_object, "map");
    assert_eq!(cfg.layer_manager, "layers");
    assert_eq!(cfg.entity_manager, "entities");
    assert_eq!(cfg.reply_timeout, Some(Duration::from_millis(2500)));
    assert!(cfg.require_ready);
}

#[test]
fn zero_timeout_means_none() {
    let cfg = BridgeConfig::from_lookup(lookup(&[("MAP_BRIDGE_REPLY_TIMEOUT_MS", "0")])).unwrap();
    assert_eq!(cfg.reply_timeout, None);
}

#[test]
fn bad_timeout_errors() {
    let err = BridgeConfig::from_lookup(lookup(&[("MAP_BRIDGE_REPLY_TIMEOUT_MS", "soon")])).unwrap_err();
    assert_eq!(err.error_code(), "E_CONFIG_NUMBER");
    assert!(err.to_string().contains("MAP_BRIDGE_REPLY_TIMEOUT_MS"));
}

#[test]
fn bad_require_ready_errors() {
    let err = BridgeConfig::from_lookup(lookup(&[("MAP_BRIDGE_REQUIRE_READY", "yes")])).unwrap_err();
    assert_eq!(err.error_code(), "E_CONFIG_BOOL");
}

#[test]
fn builders_override_defaults() {
    let cfg = BridgeConfig::default()
        .with_reply_timeout(Duration::from_secs(1))
        .with_require_ready(true);
    assert_eq!(cfg.reply_timeout, Some(Duration::from_secs(1)));
    assert!(cfg.require_ready);
}

#[test]
fn from_env_reads_process_environment() {
    // Only test in the crate that touches these variables.
    unsafe {
        std::env::set_var("MAP_BRIDGE_ROOT_OBJECT", "envMap");
        std::env::remove_var("MAP_BRIDGE_REPLY_TIMEOUT_MS");
        std::env::remove_var("MAP_BRIDGE_REQUIRE_READY");
    }

    let cfg = BridgeConfig::from_env().unwrap();
    assert_eq!(cfg.root_object, "envMap");

    unsafe { std::env::remove_var("MAP_BRIDGE_ROOT_OBJECT") };
}
