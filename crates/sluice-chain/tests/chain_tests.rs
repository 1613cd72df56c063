//! Behavioural tests for filter chains and name resolution.

use serde_json::{json, Value};
use sluice_chain::{parse_config, ChainConfig, FilterChain, Section, DEFAULT_PRIORITY};
use sluice_core::{Callback, FilterError, Options, ResolutionError};
use sluice_filters::default_registry;
use sluice_registry::FilterRegistry;
use std::sync::Arc;

fn append(tag: &'static str) -> Callback {
    Callback::named(tag, move |v: Value| Ok(json!(format!("{}{}", v.as_str().unwrap_or(""), tag))))
}

fn tagged(priority_tags: &[(i32, &'static str)]) -> FilterChain {
    let mut chain = FilterChain::new();
    for &(priority, tag) in priority_tags {
        chain.attach(append(tag), priority);
    }
    chain
}

// ============================================================
// Application order
// ============================================================

#[test]
fn test_empty_chain_is_identity() {
    let chain = FilterChain::new();
    for v in [json!(null), json!(""), json!(42), json!([1, "a"]), json!({"k": {"n": 1.5}})] {
        assert_eq!(chain.filter(v.clone()).unwrap(), v);
    }
}

#[test]
fn test_equal_priority_is_fifo() {
    let chain = tagged(&[(DEFAULT_PRIORITY, "A"), (DEFAULT_PRIORITY, "B")]);
    assert_eq!(chain.filter(json!("")).unwrap(), json!("AB"));
}

#[test]
fn test_higher_priority_runs_first() {
    let chain = tagged(&[(1, "low"), (100, "high")]);
    assert_eq!(chain.filter(json!("")).unwrap(), json!("highlow"));
}

#[test]
fn test_each_output_feeds_next() {
    let mut chain = FilterChain::new();
    chain.attach_by_name("StringTrim", Options::new(), 3).unwrap();
    chain.attach_by_name("CamelCaseToDash", Options::new(), 2).unwrap();
    chain.attach_by_name("StringToLower", Options::new(), 1).unwrap();
    assert_eq!(chain.filter(json!("  FooBarBaz  ")).unwrap(), json!("foo-bar-baz"));
}

// ============================================================
// Merge and clone
// ============================================================

#[test]
fn test_merge_preserves_source_priorities() {
    let mut x = tagged(&[(10, "x10"), (2000, "x2000")]);
    let y = tagged(&[(500, "y500")]);
    x.merge(&y);
    assert_eq!(x.filter(json!("")).unwrap(), json!("x2000y500x10"));
    assert_eq!(y.count(), 1);
}

#[test]
fn test_merge_ties_follow_existing() {
    let mut x = tagged(&[(5, "x1"), (5, "x2")]);
    let y = tagged(&[(5, "y1"), (5, "y2")]);
    x.merge(&y);
    assert_eq!(x.filter(json!("")).unwrap(), json!("x1x2y1y2"));
}

#[test]
fn test_merge_shares_units() {
    let mut x = FilterChain::new();
    let y = tagged(&[(1, "y")]);
    x.merge(&y);
    assert!(x.entries()[0].plugin().ptr_eq(y.entries()[0].plugin()));
}

#[test]
fn test_clone_is_independent() {
    let chain = tagged(&[(1, "a"), (2, "b")]);
    let before = chain.count();
    let mut copy = chain.clone();
    copy.attach(append("extra"), 3);
    assert_eq!(chain.count(), before);
    assert_eq!(copy.count(), before + 1);
    assert_eq!(chain.filter(json!("")).unwrap(), json!("ba"));
    assert_eq!(copy.filter(json!("")).unwrap(), json!("extraba"));
}

#[test]
fn test_clone_shares_units() {
    let chain = tagged(&[(1, "a")]);
    let copy = chain.clone();
    assert!(chain.entries()[0].plugin().ptr_eq(copy.entries()[0].plugin()));
}

#[test]
fn test_clone_per_thread() {
    let mut chain = FilterChain::new();
    chain.attach_by_name("StringToUpper", Options::new(), 1).unwrap();
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let mut local = chain.clone();
            std::thread::spawn(move || {
                local.attach(append("!"), 0);
                local.filter(json!(format!("t{i}"))).unwrap()
            })
        })
        .collect();
    for (i, h) in handles.into_iter().enumerate() {
        assert_eq!(h.join().unwrap(), json!(format!("T{i}!")));
    }
    assert_eq!(chain.count(), 1);
}

// ============================================================
// Persistence
// ============================================================

#[test]
fn test_serialize_roundtrip_same_output() {
    let mut chain = FilterChain::new();
    chain.attach_by_name("StripTags", Options::new(), 30).unwrap();
    chain
        .attach_by_name("StringTrim", json!({"charlist": " ."}).as_object().cloned().unwrap(), 20)
        .unwrap();
    chain.attach_by_name("UnderscoreToCamelCase", Options::new(), 10).unwrap();

    let text = serde_json::to_string(&chain).unwrap();
    let restored: FilterChain = serde_json::from_str(&text).unwrap();

    assert_eq!(restored.count(), 3);
    let input = json!(" <b>hello_big_world</b>. ");
    assert_eq!(restored.filter(input.clone()).unwrap(), chain.filter(input).unwrap());
    assert_eq!(restored.filter(json!("<i>a_b</i>")).unwrap(), json!("AB"));
}

#[test]
fn test_serialized_shape() {
    let mut chain = FilterChain::new();
    chain.attach_by_name("ToInt", Options::new(), 7).unwrap();
    let v = serde_json::to_value(&chain).unwrap();
    assert_eq!(v, json!({"filters": [{"name": "ToInt", "options": {}, "priority": 7}]}));
}

#[test]
fn test_deserialized_registry_is_lazy() {
    let mut restored: FilterChain =
        serde_json::from_value(json!({"filters": [{"name": "Digits", "priority": 1}]})).unwrap();
    assert!(!restored.has_registry());
    restored.attach_by_name("ToInt", Options::new(), 0).unwrap();
    assert!(restored.has_registry());
    assert_eq!(restored.filter(json!("a1b2")).unwrap(), json!(12));
}

// ============================================================
// Registry resolution
// ============================================================

#[test]
fn test_registry_case_insensitive() {
    let registry = default_registry();
    let a = registry.get("StringToUpper", None).unwrap();
    let b = registry.get("stringtoupper", None).unwrap();
    assert!(a.ptr_eq(&b));
    assert_eq!(registry.resolve_name("StringToUpper").unwrap(), registry.resolve_name("stringtoupper").unwrap());
}

#[test]
fn test_registry_rejects_invalid_product() {
    let registry = FilterRegistry::new();
    registry.register_factory("bad", |_| Ok(7i32));
    let err = registry.get("bad", None).unwrap_err();
    assert!(matches!(err, FilterError::Resolution(ResolutionError::InvalidPlugin { .. })));
}

#[test]
fn test_attach_by_name_failure_leaves_chain_unchanged() {
    let mut chain = tagged(&[(1, "a")]);
    let err = chain.attach_by_name("DoesNotExist", Options::new(), 1).unwrap_err();
    assert!(matches!(err, FilterError::Resolution(ResolutionError::NotFound { .. })));
    assert_eq!(chain.count(), 1);
}

#[test]
fn test_attach_by_name_builds_fresh_instances() {
    let mut chain = FilterChain::new();
    chain.attach_by_name("StringToUpper", Options::new(), 1).unwrap();
    chain.attach_by_name("StringToUpper", Options::new(), 1).unwrap();
    let e = chain.entries();
    assert!(!e[0].plugin().ptr_eq(e[1].plugin()));
}

// ============================================================
// Declarative config
// ============================================================

#[test]
fn test_config_skips_entry_without_name() {
    let config = ChainConfig::from_json(&json!({
        "filters": [
            {"name": "StringToUpper", "priority": 10},
            {"options": {"charlist": "x"}, "priority": 5},
        ]
    }))
    .unwrap();
    let parsed = parse_config(&config, Arc::new({
        let r = FilterRegistry::new();
        sluice_filters::register_builtins(&r);
        r
    }))
    .unwrap();
    assert_eq!(parsed.chain.count(), 1);
    assert_eq!(parsed.skipped.len(), 1);
    assert_eq!(parsed.skipped[0].section, Section::Filters);
    assert_eq!(parsed.skipped[0].index, 1);
    assert_eq!(parsed.skipped[0].reason, "missing name");
    assert_eq!(parsed.chain.filter(json!("abc")).unwrap(), json!("ABC"));
}
