use super::*;
use crate::kinds::ClassKind;
use crate::testing::{Fixture, Program};
use ksp_ir::syntax::{ArenaBuilder, ClassNode, ParameterBinding, ParameterNode};
use ksp_ir::Modifiers;
use pretty_assertions::assert_eq;

fn parameter_with_default(
    builder: &mut ArenaBuilder,
    name: &str,
    ty: &str,
    value: ConstantValue,
) -> SyntaxId {
    let type_ref = builder.type_ref(ty);
    let default_value = builder.constant(value);
    let name = builder.name(name);
    builder.push(ParameterNode {
        name: Some(name),
        binding: Some(ParameterBinding::Val),
        type_ref: Some(type_ref),
        default_value: Some(default_value),
        ..ParameterNode::default()
    })
}

/// `annotation class Marker(val level: Int = 3, val tag: String = "x")`
/// applied as `@Marker(tag = "y") class Target`.
fn marker_program() -> Program {
    let mut fixture = Fixture::new();
    let level = parameter_with_default(fixture.builder(), "level", "Int", ConstantValue::Int(3));
    let tag = parameter_with_default(
        fixture.builder(),
        "tag",
        "String",
        ConstantValue::string("x"),
    );
    let constructor = fixture.primary_constructor(vec![level, tag]);
    let marker = fixture.class(
        "Marker",
        ClassNode {
            modifiers: Modifiers::ANNOTATION,
            primary_constructor: Some(constructor),
            ..ClassNode::default()
        },
    );
    let value = fixture.builder().constant(ConstantValue::string("y"));
    let argument = fixture.builder().argument(Some("tag"), value);
    let annotation = fixture.builder().annotation("Marker", vec![argument]);
    let target = fixture.class(
        "Target",
        ClassNode {
            annotations: vec![annotation],
            ..ClassNode::default()
        },
    );
    fixture.file("Marker.kt", "", vec![marker, target]);
    fixture.finish()
}

fn target_annotation(program: &Program) -> Arc<Annotation> {
    let annotations = program.class("Target").annotations(&program.session);
    assert_eq!(annotations.len(), 1);
    Arc::clone(&annotations[0])
}

#[test]
fn test_arguments_back_fill_unpassed_defaults() {
    let program = marker_program();
    let session = &program.session;
    let arguments = target_annotation(&program).arguments(session);
    assert_eq!(arguments.len(), 2);

    let tag = &arguments[0];
    assert_eq!(tag.name(session), Some(SymbolName::new("tag")));
    assert_eq!(tag.value(session).as_str(), Some("y"));
    assert!(!tag.is_default());
    assert_eq!(tag.origin(), Origin::Source);

    let level = &arguments[1];
    assert_eq!(level.name(session), Some(SymbolName::new("level")));
    assert_eq!(level.value(session), AnnotationValue::Int(3));
    assert!(level.is_default());
    assert_eq!(level.origin(), Origin::Synthetic);
}

#[test]
fn test_render_lists_passed_then_defaults() {
    let program = marker_program();
    let annotation = target_annotation(&program);
    assert_eq!(
        annotation.render(&program.session),
        "@Marker(tag = \"y\", level = 3)"
    );
}

#[test]
fn test_default_arguments_cover_every_parameter() {
    let program = marker_program();
    let session = &program.session;
    let defaults = target_annotation(&program).default_arguments(session);
    let rendered: Vec<String> = defaults
        .iter()
        .map(|argument| argument.render(session))
        .collect();
    assert_eq!(rendered, vec!["level = 3".to_owned(), "tag = \"x\"".to_owned()]);
    assert!(defaults.iter().all(|argument| argument.is_default()));
}

#[test]
fn test_annotation_type_resolves_to_annotation_class() {
    let program = marker_program();
    let session = &program.session;
    let annotation = target_annotation(&program);

    assert_eq!(annotation.short_name(session), "Marker");
    assert_eq!(annotation.origin(), Origin::Source);
    let ty = annotation.annotation_type(session).resolve(session);
    assert_eq!(ty.render(session), "Marker");
    let Some(class) = ty.declaration(session).as_class().cloned() else {
        panic!("annotation type is a class");
    };
    assert_eq!(class.class_kind(session), ClassKind::AnnotationClass);
    assert!(Arc::ptr_eq(&class, &program.class("Marker")));
}

#[test]
fn test_unresolved_annotation_keeps_written_arguments() {
    let mut fixture = Fixture::new();
    let one = fixture.builder().constant(ConstantValue::Int(1));
    let argument = fixture.builder().argument(None, one);
    let annotation = fixture.builder().annotation("Missing", vec![argument]);
    let target = fixture.class(
        "Target",
        ClassNode {
            annotations: vec![annotation],
            ..ClassNode::default()
        },
    );
    fixture.file("Target.kt", "", vec![target]);
    let program = fixture.finish();
    let session = &program.session;

    let annotation = target_annotation(&program);
    assert!(annotation.annotation_type(session).resolve(session).is_error());
    let arguments = annotation.arguments(session);
    assert_eq!(arguments.len(), 1);
    assert_eq!(arguments[0].name(session), None);
    assert_eq!(arguments[0].value(session), AnnotationValue::Int(1));
    assert!(!arguments[0].is_default());
    assert_eq!(annotation.render(session), "@Missing(1)");
}

#[test]
fn test_annotation_wrapper_is_cached() {
    let program = marker_program();
    let session = &program.session;
    let annotation = target_annotation(&program);
    let Some(entry) = annotation.node() else {
        panic!("source annotation has a node");
    };
    assert!(Arc::ptr_eq(&annotation, &Annotation::from_syntax(session, entry)));
}
