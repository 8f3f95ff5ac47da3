use super::*;
use crate::name::SymbolName;
use crate::reference::TypeReference;
use crate::session::SessionOptions;
use crate::testing::fixture::unresolved_property;
use crate::testing::{Fixture, Lookup, Program};
use ksp_ir::syntax::PropertyNode;
use ksp_ir::{HostClassKind, HostType, ProjectionVariance, TypeProjection};
use pretty_assertions::assert_eq;

fn named(program: &Program, qualified: &str) -> Type {
    let Some(host) = program.resolver.type_named(qualified) else {
        panic!("no type named {qualified}");
    };
    get_ks_type_cached(&program.session, &host)
}

fn property_type(program: &Program, name: &str) -> Type {
    let session = &program.session;
    let Some(property) = session.property_by_name(&SymbolName::new(name)) else {
        panic!("no property named {name}");
    };
    property.type_ref(session).resolve(session)
}

#[test]
fn test_unresolved_property_type_is_error() {
    let program = unresolved_property();
    let session = &program.session;
    let ty = property_type(&program, "y");

    assert!(ty.is_error());
    let Some(error) = ty.as_error() else {
        panic!("expected an error type");
    };
    assert_eq!(error.hint(), Some("NonExistentType"));
    assert_eq!(ty.render(session), "<ERROR TYPE: NonExistentType>");
    assert_eq!(ty.nullability(), Nullability::Nullable);
}

#[test]
fn test_error_type_operations_keep_the_error() {
    let program = unresolved_property();
    let session = &program.session;
    let ty = property_type(&program, "y");

    assert_eq!(ty.make_nullable(session), ty);
    assert_eq!(ty.make_not_nullable(session), ty);
    assert_eq!(ty.star_projection(session), ty);
    assert!(ty.arguments(session).is_empty());

    let Declaration::Class(class) = ty.declaration(session) else {
        panic!("error types are classified by an error class");
    };
    assert!(class.is_error());
}

#[test]
fn test_error_type_is_never_assignable() {
    let program = unresolved_property();
    let session = &program.session;
    let error = property_type(&program, "y");
    let int = named(&program, "kotlin.Int");

    assert!(!int.is_assignable_from(session, &error));
    assert!(!error.is_assignable_from(session, &int));
    assert!(!error.is_assignable_from(session, &error));
    assert!(program.tracker.lookups().is_empty());
}

#[test]
fn test_assignability_follows_subtyping() {
    let program = Fixture::new().finish();
    let session = &program.session;
    let int = named(&program, "kotlin.Int");
    let nullable_int = int.make_nullable(session);

    assert!(int.is_assignable_from(session, &int));
    assert!(int.is_assignable_from(session, &session.nothing_type()));
    assert!(session.any_type().is_assignable_from(session, &int));
    assert!(nullable_int.is_assignable_from(session, &int));
    assert!(!int.is_assignable_from(session, &nullable_int));
    assert!(!int.is_assignable_from(session, &session.any_type()));
}

#[test]
fn test_assignability_records_supertype_lookup() {
    let program = Fixture::new().finish();
    let session = &program.session;
    let int = named(&program, "kotlin.Int");
    let string = named(&program, "kotlin.String");

    assert!(!int.is_assignable_from(session, &string));
    let lookups = program.tracker.lookups();
    assert_eq!(lookups.len(), 1);
    let Lookup::Supertypes(ty) = &lookups[0] else {
        panic!("expected a supertype lookup, got {:?}", lookups[0]);
    };
    assert_eq!(Some(ty), string.host());
}

#[test]
fn test_lookups_are_not_recorded_without_incremental() {
    let program = Fixture::new()
        .with_options(SessionOptions {
            incremental: false,
            ..SessionOptions::default()
        })
        .finish();
    let session = &program.session;
    let int = named(&program, "kotlin.Int");
    assert!(int.is_assignable_from(session, &int));
    assert!(program.tracker.lookups().is_empty());
}

#[test]
fn test_types_are_cached_by_host_handle() {
    let program = Fixture::new().finish();
    let session = &program.session;
    let Some(host) = program.resolver.type_named("kotlin.Int") else {
        panic!("Int is a builtin");
    };
    let first = get_ks_type_cached(session, &host);
    let second = get_ks_type_cached(session, &host);
    let (Some(first), Some(second)) = (first.as_resolved(), second.as_resolved()) else {
        panic!("Int resolves");
    };
    assert!(Arc::ptr_eq(first, second));
}

#[test]
fn test_nullability_round_trip() {
    let program = Fixture::new().finish();
    let session = &program.session;
    let int = named(&program, "kotlin.Int");

    let nullable = int.make_nullable(session);
    assert_eq!(nullable.render(session), "Int?");
    assert!(nullable.is_marked_nullable());
    assert_eq!(nullable.nullability(), Nullability::Nullable);
    assert_eq!(nullable.make_not_nullable(session), int);
    assert_eq!(int.render(session), "Int");
    assert_eq!(int.nullability(), Nullability::NotNull);
}

#[test]
fn test_replace_with_wrong_argument_count_is_error() {
    let program = Fixture::new().finish();
    let session = &program.session;
    let int = named(&program, "kotlin.Int");
    let any = TypeReference::synthetic(session, session.any_type());
    let argument = session.type_argument(&any, Variance::Invariant);

    let replaced = int.replace(session, &[argument]);
    assert!(replaced.is_error());
    assert_eq!(int.replace(session, &[]), int);
}

#[test]
fn test_declaration_of_builtin_type() {
    let program = Fixture::new().finish();
    let session = &program.session;
    let Declaration::Class(class) = session.unit_type().declaration(session) else {
        panic!("Unit is a class");
    };
    assert_eq!(class.qualified_name(session), Some(SymbolName::new("kotlin.Unit")));
}

#[test]
fn test_error_hints_can_be_disabled() {
    let mut fixture = Fixture::new().with_options(SessionOptions {
        error_type_hints: false,
        ..SessionOptions::default()
    });
    let missing = fixture.builder().type_ref("Missing");
    let property = fixture.property(
        "p",
        PropertyNode {
            type_ref: Some(missing),
            ..PropertyNode::default()
        },
    );
    fixture.file("P.kt", "", vec![property]);
    let program = fixture.finish();

    let ty = property_type(&program, "p");
    assert!(ty.is_error());
    assert_eq!(ty.render(&program.session), "<ERROR TYPE>");
}

#[test]
fn test_mutability_flexible_type_is_platform() {
    let program = Fixture::new().finish();
    let session = &program.session;
    let resolver = &program.resolver;
    let mutable = resolver.library_class("kotlin.collections.MutableList", HostClassKind::Interface);
    let read_only = resolver.library_class("kotlin.collections.List", HostClassKind::Interface);
    let host = HostType::flexible(
        resolver.class_type(mutable, false),
        resolver.class_type(read_only, true),
    );
    let ty = get_ks_type_cached(session, &host);

    assert!(!ty.is_error());
    assert_eq!(ty.render(session), "(Mutable)List!");
    assert!(ty.is_mutability_flexible(session));
    assert!(!ty.is_covariance_flexible(session));
    assert_eq!(ty.nullability(), Nullability::Platform);
}

#[test]
fn test_covariance_flexible_array() {
    let program = Fixture::new().finish();
    let session = &program.session;
    let resolver = &program.resolver;
    let array = resolver.library_class("kotlin.Array", HostClassKind::Class);
    let Some(string) = resolver.type_named("kotlin.String") else {
        panic!("String is a builtin");
    };
    let element = |variance| {
        vec![TypeProjection::Type {
            variance,
            ty: string.clone(),
        }]
    };
    let host = HostType::flexible(
        HostType::class(array, element(ProjectionVariance::Invariant), false),
        HostType::class(array, element(ProjectionVariance::Out), true),
    );
    let ty = get_ks_type_cached(session, &host);

    assert_eq!(ty.render(session), "Array<(out) String>!");
    assert!(ty.is_covariance_flexible(session));
    assert!(!ty.is_mutability_flexible(session));
    assert_eq!(ty.nullability(), Nullability::Platform);
}

#[test]
fn test_plain_types_are_not_flexible() {
    let program = Fixture::new().finish();
    let session = &program.session;
    let int = named(&program, "kotlin.Int");
    assert!(!int.is_mutability_flexible(session));
    assert!(!int.is_covariance_flexible(session));

    let error = property_type(&unresolved_property(), "y");
    assert!(!error.is_mutability_flexible(session));
    assert!(!error.is_covariance_flexible(session));
}
