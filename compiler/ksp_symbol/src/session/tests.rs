use super::*;
use crate::testing::fixture::constructor_property;
use crate::testing::{Fixture, Program};
use ksp_ir::syntax::{ClassNode, FunctionNode};
use ksp_ir::Modifiers;
use pretty_assertions::assert_eq;

/// `annotation class Marker`, `@Marker class Target` and `@Marker fun run()`
/// in package `app`.
fn annotated_program() -> Program {
    let mut fixture = Fixture::new();
    let marker = fixture.class(
        "Marker",
        ClassNode {
            modifiers: Modifiers::ANNOTATION,
            ..ClassNode::default()
        },
    );
    let on_class = fixture.builder().annotation("Marker", Vec::new());
    let target = fixture.class(
        "Target",
        ClassNode {
            annotations: vec![on_class],
            ..ClassNode::default()
        },
    );
    let on_function = fixture.builder().annotation("Marker", Vec::new());
    let run = fixture.function(
        "run",
        FunctionNode {
            annotations: vec![on_function],
            ..FunctionNode::default()
        },
    );
    fixture.file("App.kt", "app", vec![marker, target, run]);
    fixture.finish()
}

fn names(session: &Session, nodes: &[Node]) -> Vec<String> {
    nodes
        .iter()
        .map(|node| match node {
            Node::Class(class) => class.simple_name(session).to_string(),
            Node::Function(function) => function.simple_name(session).to_string(),
            other => panic!("unexpected annotated node {other:?}"),
        })
        .collect()
}

#[test]
fn test_symbols_with_annotation_by_short_name() {
    let program = annotated_program();
    let session = &program.session;
    let symbols = session.symbols_with_annotation("Marker");
    assert_eq!(names(session, &symbols), vec!["Target".to_owned(), "run".to_owned()]);
}

#[test]
fn test_symbols_with_annotation_by_qualified_name() {
    let program = annotated_program();
    let session = &program.session;
    assert_eq!(session.symbols_with_annotation("app.Marker").len(), 2);
    assert!(session.symbols_with_annotation("other.Marker").is_empty());
    assert!(session.symbols_with_annotation("Unknown").is_empty());
}

#[test]
fn test_lookups_by_name() {
    let program = annotated_program();
    let session = &program.session;

    let Some(target) = session.class_by_name(&SymbolName::new("app.Target")) else {
        panic!("app.Target is declared");
    };
    assert_eq!(target.package_name(session), "app");
    assert!(session.class_by_name(&SymbolName::new("app.Missing")).is_none());

    let functions = session.function_by_name(&SymbolName::new("app.run"));
    assert_eq!(functions.len(), 1);
    assert_eq!(functions[0].simple_name(session), "run");
    assert!(session.property_by_name(&SymbolName::new("app.run")).is_none());
}

#[test]
fn test_builtin_types() {
    let program = Fixture::new().finish();
    let session = &program.session;
    assert_eq!(session.any_type().render(session), "Any");
    assert_eq!(session.nothing_type().render(session), "Nothing");
    assert_eq!(session.unit_type().render(session), "Unit");
}

#[test]
fn test_declaration_of_node() {
    let program = constructor_property();
    let session = &program.session;
    let foo = program.class("Foo");
    let Some(node) = foo.node() else {
        panic!("Foo comes from source");
    };
    assert_eq!(
        session.declaration_of(node),
        Some(Declaration::Class(Arc::clone(&foo)))
    );
    let file = session.all_files()[0].node();
    assert!(session.declaration_of(file).is_none());
}

#[test]
fn test_new_files_after_next_round() {
    let mut fixture = Fixture::new();
    let first = fixture.class("First", ClassNode::default());
    fixture.file("First.kt", "", vec![first]);
    let mut program = fixture.finish();
    assert_eq!(program.session.round(), 1);
    assert_eq!(program.session.new_files().len(), 1);

    program.next_round(|builder| {
        let name = builder.name("Second");
        let second = builder.push(ClassNode {
            name: Some(name),
            ..ClassNode::default()
        });
        builder.add_file("Second.kt", "", vec![second]);
    });
    let session = &program.session;

    assert_eq!(session.round(), 2);
    assert_eq!(session.all_files().len(), 2);
    let new_files = session.new_files();
    assert_eq!(new_files.len(), 1);
    assert_eq!(new_files[0].file_name(session), "Second.kt");
    assert!(session.class_by_name(&SymbolName::new("Second")).is_some());
}

#[test]
fn test_begin_round_starts_fresh_wrappers() {
    let mut program = constructor_property();
    let before = program.class("Foo");
    assert!(Arc::ptr_eq(&before, &program.class("Foo")));

    program.next_round(|_| {});
    let after = program.class("Foo");
    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(after.simple_name(&program.session), "Foo");
    assert!(Arc::ptr_eq(&after, &program.class("Foo")));
}

#[test]
fn test_clear_caches_within_a_round() {
    let program = constructor_property();
    let before = program.class("Foo");
    program.session.clear_caches();
    let fresh = program.class("Foo");
    assert!(!Arc::ptr_eq(&before, &fresh));
    assert_eq!(fresh.simple_name(&program.session), "Foo");
}
