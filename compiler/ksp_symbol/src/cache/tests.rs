use super::*;
use proptest::prelude::*;
use std::cell::Cell;

#[test]
fn test_get_or_put_returns_same_instance() {
    let cache: IdentityCache<u32, String> = IdentityCache::new();
    let a = cache.get_or_put(1, || "one".to_owned());
    let b = cache.get_or_put(1, || "uno".to_owned());
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(&*b, "one");
}

#[test]
fn test_constructor_runs_once_per_key() {
    let cache: IdentityCache<&str, u32> = IdentityCache::new();
    let calls = Cell::new(0);
    for _ in 0..3 {
        cache.get_or_put("k", || {
            calls.set(calls.get() + 1);
            7
        });
    }
    assert_eq!(calls.get(), 1);
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_clear_forgets_instances() {
    let cache: IdentityCache<u32, u32> = IdentityCache::new();
    let before = cache.get_or_put(1, || 1);
    cache.clear();
    assert!(cache.is_empty());
    let after = cache.get_or_put(1, || 1);
    assert!(!Arc::ptr_eq(&before, &after));
}

#[test]
fn test_id_key_distinguishes_equal_values() {
    let a = Arc::new(String::from("List<Int>"));
    let b = Arc::new(String::from("List<Int>"));
    assert_eq!(a, b);
    assert_ne!(IdKey::new(&a), IdKey::new(&b));
    assert_eq!(IdKey::new(&a), IdKey::new(&a));

    let cache: IdentityCache<IdKey<String>, usize> = IdentityCache::new();
    cache.get_or_put(IdKey::new(&a), || 1);
    cache.get_or_put(IdKey::new(&b), || 2);
    assert_eq!(cache.len(), 2);
    assert_eq!(cache.get(&IdKey::new(&a)).map(|v| *v), Some(1));
}

proptest! {
    #[test]
    fn prop_identity_survives_unrelated_lookups(keys in proptest::collection::vec(0u8..16, 1..64)) {
        let cache: IdentityCache<u8, u8> = IdentityCache::new();
        let first = cache.get_or_put(keys[0], || keys[0]);
        for key in &keys {
            cache.get_or_put(*key, || *key);
        }
        let again = cache.get_or_put(keys[0], || 0);
        prop_assert!(Arc::ptr_eq(&first, &again));
        prop_assert_eq!(*again, keys[0]);
    }
}
