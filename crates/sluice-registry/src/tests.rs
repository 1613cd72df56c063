use crate::*;
use serde_json::{json, Value};
use sluice_core::{Callback, Filter, FilterError, Options, Plugin, ResolutionError, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct Upper;

impl Filter for Upper {
    fn filter(&self, value: Value) -> Result<Value> {
        Ok(match value {
            Value::String(s) => Value::String(s.to_uppercase()),
            other => other,
        })
    }
}

struct Suffix(String);

impl Filter for Suffix {
    fn filter(&self, value: Value) -> Result<Value> {
        Ok(json!(format!("{}{}", value.as_str().unwrap_or(""), self.0)))
    }
}

fn suffix_ctor(options: &Options) -> Result<Suffix> {
    let s = options.get("suffix").and_then(Value::as_str).unwrap_or("!");
    Ok(Suffix(s.to_string()))
}

fn registry() -> FilterRegistry {
    let r = FilterRegistry::new();
    r.register_filter("StringToUpper", |_| Ok(Upper));
    r.register_filter("Suffix", suffix_ctor);
    r
}

fn opts(v: Value) -> Options {
    v.as_object().cloned().unwrap()
}

// ========== Names ==========

#[test]
fn test_canonical_name() {
    assert_eq!(canonical_name("StringToUpper"), "stringtoupper");
    assert_eq!(canonical_name("string_to_upper"), "stringtoupper");
    assert_eq!(canonical_name("String-To Upper"), "stringtoupper");
    assert_eq!(canonical_name("Word\\DashToCamelCase"), "worddashtocamelcase");
}

#[test]
fn test_case_insensitive_get() {
    let r = registry();
    let a = r.get("StringToUpper", None).unwrap();
    let b = r.get("stringtoupper", None).unwrap();
    assert!(a.ptr_eq(&b));
    assert_eq!(b.apply(json!("abc")).unwrap(), json!("ABC"));
}

#[test]
fn test_case_insensitive_resolve() {
    let r = registry();
    assert_eq!(r.resolve_name("STRING_TO_UPPER").unwrap(), "stringtoupper");
}

#[test]
fn test_has() {
    let r = registry();
    assert!(r.has("suffix"));
    assert!(!r.has("missing"));
}

#[test]
fn test_names_sorted() {
    let r = registry();
    assert_eq!(r.names(), vec!["StringToUpper".to_string(), "Suffix".to_string()]);
}

// ========== Resolution failures ==========

#[test]
fn test_unknown_name() {
    let r = registry();
    let err = r.get("nope", None).unwrap_err();
    assert!(matches!(err, FilterError::Resolution(ResolutionError::NotFound { ref name }) if name == "nope"));
}

#[test]
fn test_invalid_product_rejected() {
    let r = registry();
    r.register_factory("bad", |_| Ok(42i64));
    let err = r.get("bad", None).unwrap_err();
    match err {
        FilterError::Resolution(ResolutionError::InvalidPlugin { name, type_name }) => {
            assert_eq!(name, "bad");
            assert_eq!(type_name, "i64");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_invalid_product_rejected_on_build() {
    let r = registry();
    r.register_factory("bad", |_| Ok("not a filter".to_string()));
    assert!(r.build("bad", &Options::new()).unwrap_err().is_resolution());
}

#[test]
fn test_factory_error_propagates() {
    let r = registry();
    r.register_factory("broken", |_| -> Result<Plugin> {
        Err(anyhow::anyhow!("factory exploded").into())
    });
    let err = r.get("broken", None).unwrap_err();
    assert!(matches!(err, FilterError::Other(_)));
}

// ========== Aliases ==========

#[test]
fn test_alias_chain() {
    let r = registry();
    r.alias("upper", "StringToUpper").unwrap();
    r.alias("shout", "upper").unwrap();
    assert_eq!(r.resolve_name("Shout").unwrap(), "stringtoupper");
    let p = r.get("shout", None).unwrap();
    assert!(p.ptr_eq(&r.get("StringToUpper", None).unwrap()));
}

#[test]
fn test_alias_cycle() {
    let r = registry();
    r.alias("a", "b").unwrap();
    r.alias("b", "c").unwrap();
    r.alias("c", "a").unwrap();
    let err = r.get("a", None).unwrap_err();
    assert!(matches!(err, FilterError::Resolution(ResolutionError::AliasCycle { .. })));
}

#[test]
fn test_alias_to_self_rejected() {
    let r = registry();
    assert!(matches!(r.alias("Foo", "foo").unwrap_err(), FilterError::InvalidArgument(_)));
}

#[test]
fn test_alias_to_missing() {
    let r = registry();
    r.alias("ghost", "nowhere").unwrap();
    assert!(matches!(
        r.get("ghost", None).unwrap_err(),
        FilterError::Resolution(ResolutionError::NotFound { .. })
    ));
}

#[test]
fn test_factory_overrides_alias() {
    let r = registry();
    r.alias("thing", "StringToUpper").unwrap();
    r.register_filter("thing", suffix_ctor);
    assert_eq!(r.resolve_name("thing").unwrap(), "thing");
}

#[test]
fn test_alias_over_registered_filter_rejected() {
    let r = registry();
    let err = r.alias("suffix", "StringToUpper").unwrap_err();
    assert!(matches!(err, FilterError::InvalidArgument(_)));
    assert!(err.to_string().contains("Suffix"));
    let p = r.get("suffix", None).unwrap();
    assert_eq!(p.apply(json!("a")).unwrap(), json!("a!"));
}

// ========== get / build ==========

#[test]
fn test_build_always_fresh() {
    let r = registry();
    let a = r.build("StringToUpper", &Options::new()).unwrap();
    let b = r.build("StringToUpper", &Options::new()).unwrap();
    assert!(!a.ptr_eq(&b));
}

#[test]
fn test_get_with_options_fresh() {
    let r = registry();
    let shared = r.get("suffix", None).unwrap();
    let custom = r.get("suffix", Some(&opts(json!({"suffix": "?"})))).unwrap();
    assert!(!shared.ptr_eq(&custom));
    assert_eq!(custom.apply(json!("a")).unwrap(), json!("a?"));
    assert_eq!(shared.apply(json!("a")).unwrap(), json!("a!"));
}

#[test]
fn test_sharing_disabled() {
    let r = FilterRegistry::with_config(RegistryConfig { share_by_default: false });
    r.register_filter("upper", |_| Ok(Upper));
    let a = r.get("upper", None).unwrap();
    let b = r.get("upper", None).unwrap();
    assert!(!a.ptr_eq(&b));
}

#[test]
fn test_factory_invoked_once_when_shared() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let r = FilterRegistry::new();
    r.register_filter("counted", move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Upper)
    });
    r.get("counted", None).unwrap();
    r.get("COUNTED", None).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    r.build("counted", &Options::new()).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_reregister_clears_shared() {
    let r = registry();
    let before = r.get("StringToUpper", None).unwrap();
    r.register_filter("StringToUpper", |_| Ok(Upper));
    let after = r.get("StringToUpper", None).unwrap();
    assert!(!before.ptr_eq(&after));
}

#[test]
fn test_register_callback() {
    let r = FilterRegistry::new();
    r.register_callback("exclaim", Callback::named("exclaim", |v| {
        Ok(json!(format!("{}!", v.as_str().unwrap_or(""))))
    }));
    let p = r.build("exclaim", &Options::new()).unwrap();
    assert!(p.is_callback());
    assert_eq!(p.apply(json!("hey")).unwrap(), json!("hey!"));
}

#[test]
fn test_register_instance() {
    let r = FilterRegistry::new();
    let plugin = Plugin::from_filter(Upper);
    r.register_instance("upper", plugin.clone());
    assert!(r.build("upper", &Options::new()).unwrap().ptr_eq(&plugin));
}

#[test]
fn test_shared_across_threads() {
    let r = Arc::new(registry());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let r = Arc::clone(&r);
            std::thread::spawn(move || r.get("stringtoupper", None).unwrap())
        })
        .collect();
    let plugins: Vec<Plugin> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(plugins.windows(2).all(|w| w[0].ptr_eq(&w[1])));
}
