//! Integration tests for `cacheable_core::keys`.
//!
//! These suites pin the derived key format and the namespace rules that
//! stores and invalidation code rely on.

use std::collections::BTreeMap;

use cacheable_core::keys::{args_digest, compose_keys, KeyComposer, KeySpec, DIGEST_BYTES};
use serde::Serialize;

#[derive(Serialize)]
struct Query {
    user_id: u64,
    tags: Vec<String>,
}

/// Validates that derived keys are `"<method>@<32 hex chars>"` and stable
/// across calls.
#[test]
fn derived_keys_are_deterministic() {
    let args = (Query { user_id: 7, tags: vec!["a".into()] }, 3_u8);

    let first = compose_keys::<_>(None, None, "Orders.find", &args).unwrap();
    let second = compose_keys::<_>(None, None, "Orders.find", &args).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 1);
    let (method, digest) = first[0].split_once('@').unwrap();
    assert_eq!(method, "Orders.find");
    assert_eq!(digest.len(), DIGEST_BYTES * 2);
}

/// Validates that argument order and values both change the derived key.
#[test]
fn derived_keys_track_argument_order_and_value() {
    let ab = compose_keys::<(u8, u8)>(None, None, "m", &(1, 2)).unwrap();
    let ba = compose_keys::<(u8, u8)>(None, None, "m", &(2, 1)).unwrap();
    let ac = compose_keys::<(u8, u8)>(None, None, "m", &(1, 3)).unwrap();

    assert_ne!(ab, ba);
    assert_ne!(ab, ac);
}

/// Validates that the method identity is part of the derived key.
#[test]
fn derived_keys_differ_per_method() {
    let a = compose_keys::<u8>(None, None, "A.get", &1).unwrap();
    let b = compose_keys::<u8>(None, None, "B.get", &1).unwrap();
    assert_ne!(a, b);
    assert_eq!(a[0], format!("A.get@{}", args_digest(&1_u8).unwrap()));
}

/// Validates that explicit keys are used verbatim and namespaced in order.
#[test]
fn explicit_key_lists_are_namespaced() {
    let composer = KeyComposer::<BTreeMap<String, u64>>::new("Items.list")
        .with_key(KeySpec::generator(|args: &BTreeMap<String, u64>| {
            args.keys().map(|name| format!("item:{name}")).collect::<Vec<_>>()
        }))
        .with_namespace(KeySpec::literal("shop"));

    let mut args = BTreeMap::new();
    args.insert("b".to_string(), 2);
    args.insert("a".to_string(), 1);

    assert_eq!(composer.compose(&args).unwrap(), vec!["shop:item:a", "shop:item:b"]);
    assert_eq!(composer.primary_key(&args).unwrap(), "shop:item:a");
}

/// Validates that a namespace generator sees the call's arguments.
#[test]
fn namespace_generator_uses_arguments() {
    let composer = KeyComposer::<(String, u64)>::new("Users.get")
        .with_namespace(KeySpec::generator(|args: &(String, u64)| args.0.clone()));

    let keys = composer.compose(&("tenant-9".to_string(), 4)).unwrap();
    assert!(keys[0].starts_with("tenant-9:Users.get@"));
}
