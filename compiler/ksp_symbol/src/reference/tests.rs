use super::*;
use crate::declaration::PropertyDeclaration;
use crate::kinds::Variance;
use crate::name::SymbolName;
use crate::testing::{Fixture, Lookup, Program};
use ksp_ir::syntax::{
    ClassNode, ProjectionKind, PropertyNode, TypeParameterNode, TypeReferenceNode,
    WrapperTypeNode,
};
use ksp_ir::ConstantValue;
use pretty_assertions::assert_eq;

/// `val p: <type_ref>` alongside `declarations`, in `P.kt`.
fn typed_property(
    fixture: &mut Fixture,
    type_ref: Option<SyntaxId>,
    initializer: Option<SyntaxId>,
    mut declarations: Vec<SyntaxId>,
) {
    let property = fixture.property(
        "p",
        PropertyNode {
            type_ref,
            initializer,
            ..PropertyNode::default()
        },
    );
    declarations.push(property);
    fixture.file("P.kt", "", declarations);
}

fn property_p(program: &Program) -> Arc<PropertyDeclaration> {
    match program.session.property_by_name(&SymbolName::new("p")) {
        Some(property) => property,
        None => panic!("p is declared"),
    }
}

#[test]
fn test_qualified_classifier_element() {
    let mut fixture = Fixture::new();
    let int = fixture.builder().type_ref("kotlin.Int");
    typed_property(&mut fixture, Some(int), None, Vec::new());
    let program = fixture.finish();
    let session = &program.session;
    let reference = property_p(&program).type_ref(session);

    assert_eq!(reference.origin(), Origin::Source);
    let Some(ReferenceElement::Classifier(classifier)) = reference.element(session) else {
        panic!("a user type is a classifier reference");
    };
    assert_eq!(classifier.referenced_name(session), "Int");
    let Some(qualifier) = classifier.qualifier(session) else {
        panic!("kotlin.Int is qualified");
    };
    assert_eq!(qualifier.referenced_name(session), "kotlin");
    assert_eq!(reference.render(session), "kotlin.Int");
    assert_eq!(reference.resolve(session).render(session), "Int");
}

#[test]
fn test_nullable_reference_renders_question_mark() {
    let mut fixture = Fixture::new();
    let nullable = fixture.builder().nullable_type_ref("String");
    typed_property(&mut fixture, Some(nullable), None, Vec::new());
    let program = fixture.finish();
    let session = &program.session;
    let reference = property_p(&program).type_ref(session);

    assert_eq!(reference.render(session), "String?");
    let ty = reference.resolve(session);
    assert!(ty.is_marked_nullable());
    assert_eq!(ty.render(session), "String?");
    assert!(matches!(
        reference.element(session),
        Some(ReferenceElement::Classifier(_))
    ));
}

#[test]
fn test_generic_reference_arguments() {
    let mut fixture = Fixture::new();
    let t = fixture.name("T");
    let parameter = fixture.builder().push(TypeParameterNode {
        name: Some(t),
        ..TypeParameterNode::default()
    });
    let boxed = fixture.class(
        "Box",
        ClassNode {
            type_parameters: vec![parameter],
            ..ClassNode::default()
        },
    );
    let string = fixture.builder().type_ref("String");
    let projection = fixture
        .builder()
        .projection(ProjectionKind::Out, Some(string));
    let element = fixture.builder().user_type("Box", vec![projection]);
    let reference = fixture.builder().push(TypeReferenceNode {
        element: Some(element),
        ..TypeReferenceNode::default()
    });
    typed_property(&mut fixture, Some(reference), None, vec![boxed]);
    let program = fixture.finish();
    let session = &program.session;
    let reference = property_p(&program).type_ref(session);

    assert_eq!(reference.render(session), "Box<out String>");
    let Some(ReferenceElement::Classifier(classifier)) = reference.element(session) else {
        panic!("Box<out String> is a classifier reference");
    };
    let arguments = classifier.type_arguments(session);
    assert_eq!(arguments.len(), 1);
    assert_eq!(arguments[0].variance(session), Variance::Covariant);
    let Some(argument) = arguments[0].type_ref(session) else {
        panic!("out projection has a type");
    };
    assert_eq!(argument.render(session), "String");
    assert_eq!(reference.resolve(session).render(session), "Box<out String>");
}

#[test]
fn test_star_projection_renders_star() {
    let mut fixture = Fixture::new();
    let star = fixture.builder().projection(ProjectionKind::Star, None);
    let element = fixture.builder().user_type("Box", vec![star]);
    let reference = fixture.builder().push(TypeReferenceNode {
        element: Some(element),
        ..TypeReferenceNode::default()
    });
    typed_property(&mut fixture, Some(reference), None, Vec::new());
    let program = fixture.finish();
    let session = &program.session;
    let reference = property_p(&program).type_ref(session);

    assert_eq!(reference.render(session), "Box<*>");
    let Some(ReferenceElement::Classifier(classifier)) = reference.element(session) else {
        panic!("Box<*> is a classifier reference");
    };
    let arguments = classifier.type_arguments(session);
    assert_eq!(arguments[0].variance(session), Variance::Star);
    assert!(arguments[0].type_ref(session).is_none());
}

#[test]
fn test_inferred_property_type_is_deferred() {
    let mut fixture = Fixture::new();
    let five = fixture.builder().constant(ConstantValue::Int(5));
    typed_property(&mut fixture, None, Some(five), Vec::new());
    let program = fixture.finish();
    let session = &program.session;
    let property = property_p(&program);
    let reference = property.type_ref(session);

    assert!(reference.is_deferred());
    assert_eq!(reference.origin(), Origin::Synthetic);
    assert_eq!(
        reference.deferred_owner(),
        Some(&Declaration::Property(Arc::clone(&property)))
    );
    assert!(Arc::ptr_eq(&reference, &property.type_ref(session)));

    assert_eq!(reference.render(session), "Int");
    assert!(program
        .tracker
        .lookups()
        .iter()
        .any(|lookup| matches!(lookup, Lookup::Member(_))));
}

#[test]
fn test_resolution_is_memoized() {
    let mut fixture = Fixture::new();
    let missing = fixture.builder().type_ref("Nowhere");
    typed_property(&mut fixture, Some(missing), None, Vec::new());
    let program = fixture.finish();
    let session = &program.session;
    let reference = property_p(&program).type_ref(session);

    let first = reference.resolve(session);
    let second = reference.resolve(session);
    assert!(first.is_error());
    assert_eq!(first, second);
    assert_eq!(reference.render(session), "Nowhere");
}

#[test]
fn test_host_reference_is_cached_per_handle() {
    let program = Fixture::new().finish();
    let session = &program.session;
    let Some(int) = program.resolver.type_named("kotlin.Int") else {
        panic!("Int is a builtin");
    };
    let reference = TypeReference::from_host(session, &int);
    assert!(Arc::ptr_eq(&reference, &TypeReference::from_host(session, &int)));
    assert_eq!(reference.origin(), Origin::Synthetic);
    assert_eq!(reference.location(session), Location::NoLocation);

    let Some(ReferenceElement::Classifier(classifier)) = reference.element(session) else {
        panic!("a class type has a classifier");
    };
    assert_eq!(classifier.referenced_name(session), "Int");
    assert_eq!(classifier.origin(), Origin::Synthetic);
}

#[test]
fn test_synthetic_reference_renders_its_type() {
    let program = Fixture::new().finish();
    let session = &program.session;
    let reference = TypeReference::synthetic(session, session.any_type());
    assert_eq!(reference.render(session), "Any");
    assert!(reference.annotations(session).is_empty());
    assert_eq!(reference.modifiers(session), Modifiers::empty());
}

#[test]
fn test_annotations_and_modifiers_of_nested_wrappers() {
    let mut fixture = Fixture::new();
    let builder = fixture.builder();
    let outer = builder.annotation("Outer", Vec::new());
    let middle = builder.annotation("Middle", Vec::new());
    let inner = builder.annotation("Inner", Vec::new());
    let string = builder.user_type("String", Vec::new());
    let parenthesized = builder.push(NodeKind::ParenthesizedType(WrapperTypeNode {
        modifiers: Modifiers::SUSPEND,
        annotations: vec![inner],
        inner: Some(string),
    }));
    let nullable = builder.push(NodeKind::NullableType(WrapperTypeNode {
        modifiers: Modifiers::empty(),
        annotations: vec![middle],
        inner: Some(parenthesized),
    }));
    let reference = builder.push(TypeReferenceNode {
        modifiers: Modifiers::empty(),
        annotations: vec![outer],
        element: Some(nullable),
    });
    typed_property(&mut fixture, Some(reference), None, Vec::new());
    let program = fixture.finish();
    let session = &program.session;
    let reference = property_p(&program).type_ref(session);

    let names: Vec<String> = reference
        .annotations(session)
        .iter()
        .map(|annotation| annotation.short_name(session))
        .collect();
    assert_eq!(
        names,
        vec!["Outer".to_owned(), "Middle".to_owned(), "Inner".to_owned()]
    );
    assert_eq!(reference.modifiers(session), Modifiers::SUSPEND);
    assert!(reference.resolve(session).is_marked_nullable());
}
