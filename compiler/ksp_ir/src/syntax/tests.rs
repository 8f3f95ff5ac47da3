use super::*;
use pretty_assertions::assert_eq;

fn class_named(builder: &mut ArenaBuilder, name: &str, declarations: Vec<SyntaxId>) -> SyntaxId {
    let name = builder.name(name);
    builder.push(ClassNode {
        name: Some(name),
        declarations,
        ..ClassNode::default()
    })
}

#[test]
fn test_push_wires_parents() {
    let mut builder = ArenaBuilder::new();
    let inner = class_named(&mut builder, "Inner", Vec::new());
    let outer = class_named(&mut builder, "Outer", vec![inner]);
    let file = builder.add_file("src/a.kt", "a", vec![outer]);
    let arena = builder.finish();

    assert_eq!(arena.parent(inner), Some(outer));
    assert_eq!(arena.parent(outer), Some(file));
    assert_eq!(arena.ancestors(inner).collect::<Vec<_>>(), vec![outer, file]);
}

#[test]
fn test_add_file_stamps_descendants() {
    let mut builder = ArenaBuilder::new();
    let ty = builder.type_ref("kotlin.Int");
    let name = builder.name("x");
    let property = builder.push(PropertyNode {
        name: Some(name),
        type_ref: Some(ty),
        ..PropertyNode::default()
    });
    let file = builder.add_file("src/a.kt", "", vec![property]);
    let arena = builder.finish();

    assert_eq!(arena.file_of(property), Some(file));
    assert_eq!(arena.file_of(ty), Some(file));
    assert_eq!(arena.file_of(file), Some(file));
    assert!(arena.is_live(ty));
}

#[test]
fn test_user_type_builds_qualifier_chain() {
    let mut builder = ArenaBuilder::new();
    let element = builder.user_type("kotlin.collections.List", Vec::new());
    let arena = builder.finish();

    let Some(list) = arena.kind(element).as_user_type() else {
        panic!("expected user type");
    };
    assert_eq!(list.name.map(|n| arena.name_text(n).to_string()), Some("List".into()));
    let Some(qualifier) = list.qualifier else {
        panic!("expected qualifier");
    };
    let Some(collections) = arena.kind(qualifier).as_user_type() else {
        panic!("expected user type qualifier");
    };
    assert_eq!(
        collections.name.map(|n| arena.name_text(n).to_string()),
        Some("collections".into())
    );
    assert_eq!(arena.parent(qualifier), Some(element));
}

#[test]
fn test_next_round_replaces_file() {
    let mut builder = ArenaBuilder::new();
    let a = class_named(&mut builder, "A", Vec::new());
    let first = builder.add_file("src/a.kt", "", vec![a]);
    let round1 = builder.finish();
    assert_eq!(round1.round(), 1);
    assert_eq!(round1.new_files(), &[first]);

    let mut builder = ArenaBuilder::next_round(&round1);
    let a2 = class_named(&mut builder, "A", Vec::new());
    let second = builder.replace_file(first, FileNode {
        path: "src/a.kt".into(),
        package: "".into(),
        annotations: Vec::new(),
        declarations: vec![a2],
        lines: crate::LineIndex::new(""),
    });
    let round2 = builder.finish();

    assert_eq!(round2.round(), 2);
    assert_eq!(round2.files(), &[second]);
    assert_eq!(round2.new_files(), &[second]);
    // Old nodes are still readable but no longer live.
    assert!(round2.kind(a).as_class().is_some());
    assert!(!round2.is_live(a));
    assert!(round2.is_live(a2));
}

#[test]
fn test_node_kind_accessors() {
    let mut builder = ArenaBuilder::new();
    let annotation = builder.annotation("Deprecated", Vec::new());
    let name = builder.name("f");
    let function = builder.push(FunctionNode {
        name: Some(name),
        annotations: vec![annotation],
        modifiers: crate::Modifiers::parse("private suspend"),
        ..FunctionNode::default()
    });
    let arena = builder.finish();

    let kind = arena.kind(function);
    assert_eq!(kind.name(), Some(name));
    assert_eq!(kind.annotations(), &[annotation]);
    assert!(kind.modifiers().contains(crate::Modifiers::SUSPEND));
    assert!(kind.as_class().is_none());
    assert_eq!(arena.parent(annotation), Some(function));
}
