use super::*;
use proptest::prelude::*;

#[test]
fn test_qualified_name_parts() {
    let name = SymbolName::new("kotlin.collections.List");
    assert_eq!(name.qualifier(), "kotlin.collections");
    assert_eq!(name.short_name(), "List");
    assert_eq!(name.as_str(), "kotlin.collections.List");
}

#[test]
fn test_simple_name_has_empty_qualifier() {
    let name = SymbolName::new("<init>");
    assert_eq!(name.qualifier(), "");
    assert_eq!(name.short_name(), "<init>");
}

#[test]
fn test_qualified_constructor_drops_empty_qualifier() {
    assert_eq!(SymbolName::qualified("", "Foo"), "Foo");
    assert_eq!(SymbolName::qualified("a.b", "Foo"), "a.b.Foo");
}

proptest! {
    #[test]
    fn prop_qualifier_and_short_name_rebuild_the_name(
        segments in proptest::collection::vec("[a-zA-Z_][a-zA-Z0-9_]{0,6}", 1..5)
    ) {
        let text = segments.join(".");
        let name = SymbolName::new(&text);
        prop_assert_eq!(SymbolName::qualified(name.qualifier(), name.short_name()), name.clone());
        prop_assert_eq!(name.short_name(), segments[segments.len() - 1].as_str());
    }
}
