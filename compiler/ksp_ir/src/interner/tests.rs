use super::*;

#[test]
fn test_intern_same_string_twice() {
    let interner = StringInterner::new();
    let a = interner.intern("Foo");
    let b = interner.intern("Foo");
    assert_eq!(a, b);
    assert_eq!(&*interner.lookup(a), "Foo");
}

#[test]
fn test_intern_distinct_strings() {
    let interner = StringInterner::new();
    let a = interner.intern("Foo");
    let b = interner.intern("Bar");
    assert_ne!(a, b);
    assert_eq!(interner.len(), 3);
}

#[test]
fn test_empty_is_preinterned() {
    let interner = StringInterner::new();
    assert_eq!(interner.intern(""), Name::EMPTY);
    assert!(interner.is_empty());
    assert!(Name::EMPTY.is_empty());
}

#[test]
fn test_get_does_not_insert() {
    let interner = StringInterner::new();
    assert_eq!(interner.get("missing"), None);
    assert_eq!(interner.len(), 1);
}

#[test]
fn test_lookup_foreign_name_is_empty() {
    let interner = StringInterner::new();
    assert_eq!(&*interner.lookup(Name::from_raw(99)), "");
}

#[test]
fn test_shared_across_threads() {
    let interner = StringInterner::shared();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let interner = Arc::clone(&interner);
            std::thread::spawn(move || interner.intern("shared"))
        })
        .collect();
    let names: Vec<Name> = handles
        .into_iter()
        .map(|h| match h.join() {
            Ok(name) => name,
            Err(_) => panic!("interning thread panicked"),
        })
        .collect();
    assert!(names.windows(2).all(|w| w[0] == w[1]));
}
