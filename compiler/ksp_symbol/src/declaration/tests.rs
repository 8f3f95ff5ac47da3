use super::*;
use crate::testing::fixture::{
    constructor_property, implicit_constructors, sealed_hierarchy, unresolved_property,
};
use crate::kinds::ClassKind;
use crate::testing::{Fixture, Lookup, Program};
use ksp_ir::syntax::{AccessorNode, ClassNode, FileNode, FunctionNode, PropertyNode};
use ksp_ir::{ConstantValue, LineIndex};
use pretty_assertions::assert_eq;

#[test]
fn test_class_wrapper_is_shared_between_lookups() {
    let program = constructor_property();
    let session = &program.session;
    let foo = program.class("Foo");
    let Some(node) = foo.node() else {
        panic!("source class has no node");
    };
    assert!(Arc::ptr_eq(&foo, &ClassDeclaration::from_syntax(session, node)));

    let files = session.all_files();
    assert_eq!(files.len(), 1);
    assert_eq!(
        files[0].declarations(session),
        vec![Declaration::Class(Arc::clone(&foo))]
    );
}

#[test]
fn test_constructor_property_declarations() {
    let program = constructor_property();
    let session = &program.session;
    let foo = program.class("Foo");

    let declarations = foo.declarations(session);
    let names: Vec<String> = declarations
        .iter()
        .map(|declaration| declaration.simple_name(session).to_string())
        .collect();
    assert_eq!(names, vec!["<init>".to_owned(), "x".to_owned()]);
    let Some(constructor) = declarations[0].as_function() else {
        panic!("expected constructor first, got {:?}", declarations[0]);
    };
    let Some(x) = declarations[1].as_property() else {
        panic!("expected property second, got {:?}", declarations[1]);
    };

    assert_eq!(x.simple_name(session), "x");
    assert!(x.is_parameter_property(session));
    assert!(!x.is_mutable(session));
    assert!(x.getter(session).is_some());
    assert!(x.setter(session).is_none());
    assert!(x.has_backing_field(session));

    assert!(constructor.is_constructor(session));
    assert!(!constructor.is_synthetic_constructor());
    assert_eq!(constructor.simple_name(session), "<init>");
    let parameters = constructor.parameters(session);
    assert_eq!(parameters.len(), 1);
    assert_eq!(parameters[0].type_ref(session).resolve(session).render(session), "Int");

    let Some(primary) = foo.primary_constructor(session) else {
        panic!("Foo has a primary constructor");
    };
    assert!(Arc::ptr_eq(&primary, constructor));
}

#[test]
fn test_parameter_property_type_matches_parameter() {
    let program = constructor_property();
    let session = &program.session;
    let foo = program.class("Foo");
    let properties = foo.declared_properties(session);
    assert_eq!(properties.len(), 1);
    let ty = properties[0].type_ref(session).resolve(session);
    assert!(!ty.is_error());
    assert_eq!(ty.render(session), "Int");
    let Some(class) = properties[0].declaring_class(session) else {
        panic!("constructor property belongs to Foo");
    };
    assert!(Arc::ptr_eq(&class, &foo));
}

#[test]
fn test_class_without_constructor_gets_synthetic_one() {
    let program = implicit_constructors();
    let session = &program.session;
    let square = program.class("geo.Square");

    let Some(constructor) = square.primary_constructor(session) else {
        panic!("Square has an implicit constructor");
    };
    assert!(constructor.is_synthetic_constructor());
    assert_eq!(constructor.origin(), Origin::Synthetic);
    assert!(constructor.parameters(session).is_empty());
    assert_eq!(
        constructor.qualified_name(session),
        Some(SymbolName::new("geo.Square.<init>"))
    );
    assert_eq!(
        constructor.return_type(session).resolve(session).render(session),
        "Square"
    );

    let declarations = square.declarations(session);
    assert_eq!(
        declarations.last(),
        Some(&Declaration::Function(Arc::clone(&constructor)))
    );
}

#[test]
fn test_interface_has_no_constructor() {
    let program = implicit_constructors();
    let session = &program.session;
    let shape = program.class("geo.Shape");
    assert!(shape.primary_constructor(session).is_none());
    assert!(shape.synthetic_constructor(session).is_none());
    assert!(shape.declarations(session).is_empty());
}

#[test]
fn test_super_types_default_to_any() {
    let program = implicit_constructors();
    let session = &program.session;

    let shape = program.class("geo.Shape");
    let supertypes = shape.super_types(session);
    assert_eq!(supertypes.len(), 1);
    assert_eq!(supertypes[0].render(session), "Any");
    assert_eq!(supertypes[0].resolve(session), session.any_type());

    let square = program.class("geo.Square");
    let supertypes = square.super_types(session);
    assert_eq!(supertypes.len(), 1);
    assert_eq!(supertypes[0].resolve(session).render(session), "Shape");

    let any = program.class("kotlin.Any");
    assert!(any.super_types(session).is_empty());
}

fn assert_sealed_subclasses(program: &Program) {
    let session = &program.session;
    let expr = program.class("lib.Expr");
    assert!(expr.modifiers(session).contains(Modifiers::SEALED));

    let first = expr.sealed_subclasses(session);
    let names: Vec<String> = first
        .iter()
        .map(|class| class.simple_name(session).to_string())
        .collect();
    assert_eq!(names, vec!["Const".to_owned()]);

    let second = expr.sealed_subclasses(session);
    assert_eq!(second.len(), 1);
    assert!(Arc::ptr_eq(&first[0], &second[0]));
    assert_eq!(
        program.tracker.sealed_lookups(),
        vec!["lib.Expr".to_owned(), "lib.Expr".to_owned()]
    );
}

#[test]
fn test_sealed_subclasses_from_source() {
    assert_sealed_subclasses(&sealed_hierarchy(true));
}

#[test]
fn test_sealed_subclasses_from_binary() {
    let program = sealed_hierarchy(false);
    assert_eq!(program.class("lib.Expr").origin(), Origin::Binary);
    assert_sealed_subclasses(&program);
}

#[test]
fn test_non_sealed_class_records_nothing() {
    let program = sealed_hierarchy(true);
    let constant = program.class("lib.Const");
    assert!(constant.sealed_subclasses(&program.session).is_empty());
    assert!(program.tracker.sealed_lookups().is_empty());
}

#[test]
fn test_unnamed_function_is_compiler_error() {
    let mut fixture = Fixture::new();
    let function = fixture.builder().push(FunctionNode::default());
    fixture.file("Broken.kt", "", vec![function]);
    let program = fixture.finish();
    let session = &program.session;

    let declaration = FunctionDeclaration::from_syntax(session, function);
    let Err(error) = declaration.try_simple_name(session) else {
        panic!("a named function without a name must fail");
    };
    assert_eq!(&*error.file, "Broken.kt");
    assert!(error.message.contains("has no name"));
    assert!(declaration.qualified_name(session).is_none());
}

#[test]
fn test_override_finds_overridee() {
    let mut fixture = Fixture::new();
    let base_greet = fixture.function(
        "greet",
        FunctionNode {
            modifiers: Modifiers::OPEN,
            ..FunctionNode::default()
        },
    );
    let base = fixture.class(
        "Base",
        ClassNode {
            modifiers: Modifiers::OPEN,
            declarations: vec![base_greet],
            ..ClassNode::default()
        },
    );
    let child_greet = fixture.function(
        "greet",
        FunctionNode {
            modifiers: Modifiers::OVERRIDE,
            ..FunctionNode::default()
        },
    );
    let base_ref = fixture.builder().type_ref("Base");
    let child = fixture.class(
        "Child",
        ClassNode {
            supertypes: vec![base_ref],
            declarations: vec![child_greet],
            ..ClassNode::default()
        },
    );
    fixture.file("Greeter.kt", "", vec![base, child]);
    let program = fixture.finish();
    let session = &program.session;

    let base_greet = FunctionDeclaration::from_syntax(session, base_greet);
    let child_greet = FunctionDeclaration::from_syntax(session, child_greet);
    assert!(base_greet.find_overridee(session).is_none());

    let Some(Declaration::Function(overridee)) = child_greet.find_overridee(session) else {
        panic!("Child.greet overrides Base.greet");
    };
    assert!(Arc::ptr_eq(&overridee, &base_greet));
    assert!(child_greet.overrides(session, &Declaration::Function(Arc::clone(&base_greet))));
    assert!(program
        .tracker
        .lookups()
        .iter()
        .any(|lookup| matches!(lookup, Lookup::Member(_))));
}

#[test]
fn test_inferred_return_type_follows_rebinding() {
    let mut fixture = Fixture::new();
    let one = fixture.builder().constant(ConstantValue::Int(1));
    let old = fixture.function(
        "f",
        FunctionNode {
            body: Some(one),
            ..FunctionNode::default()
        },
    );
    let file = fixture.file("F.kt", "", vec![old]);
    let mut program = fixture.finish();
    let before = FunctionDeclaration::from_syntax(&program.session, old).return_type(&program.session);
    assert!(before.is_deferred());

    let mut new = None;
    program.next_round(|builder| {
        let one = builder.constant(ConstantValue::Int(1));
        let name = builder.name("f");
        let function = builder.push(FunctionNode {
            name: Some(name),
            body: Some(one),
            ..FunctionNode::default()
        });
        new = Some(function);
        builder.replace_file(
            file,
            FileNode {
                path: Arc::from("F.kt"),
                package: Arc::from(""),
                annotations: Vec::new(),
                declarations: vec![function],
                lines: LineIndex::new(""),
            },
        );
    });
    let Some(new) = new else {
        panic!("next round did not run");
    };
    program.resolver.rebind(old, Some(new));
    let session = &program.session;

    let stale = FunctionDeclaration::from_syntax(session, old).return_type(session);
    let fresh = FunctionDeclaration::from_syntax(session, new).return_type(session);
    assert!(Arc::ptr_eq(&stale, &fresh));
    assert!(!Arc::ptr_eq(&before, &fresh));
    assert_eq!(fresh.resolve(session).render(session), "Int");
}

#[test]
fn test_declaration_equality_is_identity() {
    let program = unresolved_property();
    let session = &program.session;
    let Some(y) = session.property_by_name(&SymbolName::new("y")) else {
        panic!("y is declared at top level");
    };
    let Some(node) = y.node() else {
        panic!("y comes from source");
    };
    let Some(declaration) = Declaration::from_syntax(session, node) else {
        panic!("property node wraps as a declaration");
    };
    assert_eq!(declaration, Declaration::Property(Arc::clone(&y)));
    assert_eq!(declaration.simple_name(session), "y");
    assert_eq!(declaration.qualified_name(session), Some(SymbolName::new("y")));
    assert_eq!(declaration.origin(), Origin::Source);
}

/// Finish `fixture` with the resolver's backing field fact for `node`
/// forced to `false`.
fn property_without_host_backing_field(
    fixture: Fixture,
    node: SyntaxId,
) -> (Program, Arc<PropertyDeclaration>) {
    let program = fixture.finish();
    let Some(descriptor) = program.resolver.descriptor_of(node) else {
        panic!("the property has a descriptor");
    };
    program.resolver.update(descriptor.id, |descriptor| {
        if let DescriptorKind::Property(property) = &mut descriptor.kind {
            property.backing_field_required = false;
        }
    });
    let property = PropertyDeclaration::from_syntax(&program.session, node);
    (program, property)
}

#[test]
fn test_initialized_property_has_backing_field() {
    let mut fixture = Fixture::new();
    let int = fixture.builder().type_ref("Int");
    let one = fixture.builder().constant(ConstantValue::Int(1));
    let p = fixture.property(
        "p",
        PropertyNode {
            type_ref: Some(int),
            initializer: Some(one),
            ..PropertyNode::default()
        },
    );
    fixture.file("Props.kt", "", vec![p]);
    let (program, p) = property_without_host_backing_field(fixture, p);
    assert!(p.has_backing_field(&program.session));
}

#[test]
fn test_lateinit_property_has_backing_field() {
    let mut fixture = Fixture::new();
    let string = fixture.builder().type_ref("String");
    let p = fixture.property(
        "p",
        PropertyNode {
            is_var: true,
            modifiers: Modifiers::LATEINIT,
            type_ref: Some(string),
            ..PropertyNode::default()
        },
    );
    fixture.file("Props.kt", "", vec![p]);
    let (program, p) = property_without_host_backing_field(fixture, p);
    assert!(p.has_backing_field(&program.session));
}

#[test]
fn test_getter_only_property_has_no_backing_field() {
    let mut fixture = Fixture::new();
    let int = fixture.builder().type_ref("Int");
    let one = fixture.builder().constant(ConstantValue::Int(1));
    let getter = fixture.builder().push(AccessorNode {
        is_getter: true,
        body: Some(one),
        ..AccessorNode::default()
    });
    let p = fixture.property(
        "p",
        PropertyNode {
            type_ref: Some(int),
            getter: Some(getter),
            ..PropertyNode::default()
        },
    );
    fixture.file("Props.kt", "", vec![p]);
    let program = fixture.finish();
    let p = PropertyDeclaration::from_syntax(&program.session, p);
    assert!(!p.has_backing_field(&program.session));
}

#[test]
fn test_enum_constructor_is_private_final() {
    let mut fixture = Fixture::new();
    let int = fixture.builder().type_ref("Int");
    let x = fixture.builder().parameter("x", Some(int));
    let constructor = fixture.primary_constructor(vec![x]);
    let e = fixture.class(
        "E",
        ClassNode {
            modifiers: Modifiers::ENUM,
            primary_constructor: Some(constructor),
            ..ClassNode::default()
        },
    );
    fixture.file("E.kt", "", vec![e]);
    let program = fixture.finish();
    let session = &program.session;
    let e = program.class("E");

    assert_eq!(e.class_kind(session), ClassKind::EnumClass);
    let Some(constructor) = e.primary_constructor(session) else {
        panic!("E declares a primary constructor");
    };
    assert_eq!(constructor.modifiers(session), Modifiers::FINAL | Modifiers::PRIVATE);
}

#[test]
fn test_sealed_class_without_subclasses_records_every_call() {
    let mut fixture = Fixture::new();
    let expr = fixture.class(
        "Expr",
        ClassNode {
            modifiers: Modifiers::SEALED,
            ..ClassNode::default()
        },
    );
    fixture.file("Expr.kt", "lib", vec![expr]);
    let program = fixture.finish();
    let session = &program.session;
    let expr = program.class("lib.Expr");

    assert!(expr.sealed_subclasses(session).is_empty());
    assert!(expr.sealed_subclasses(session).is_empty());
    assert_eq!(
        program.tracker.sealed_lookups(),
        vec!["lib.Expr".to_owned(), "lib.Expr".to_owned()]
    );
}

#[test]
fn test_sealed_subclass_added_in_later_round() {
    let mut fixture = Fixture::new();
    let expr = fixture.class(
        "Expr",
        ClassNode {
            modifiers: Modifiers::SEALED,
            ..ClassNode::default()
        },
    );
    fixture.file("Expr.kt", "lib", vec![expr]);
    let mut program = fixture.finish();
    assert!(program
        .class("lib.Expr")
        .sealed_subclasses(&program.session)
        .is_empty());

    program.next_round(|builder| {
        let name = builder.name("Const");
        let supertype = builder.type_ref("Expr");
        let constant = builder.push(ClassNode {
            name: Some(name),
            supertypes: vec![supertype],
            ..ClassNode::default()
        });
        builder.add_file("Const.kt", "lib", vec![constant]);
    });
    let session = &program.session;

    let names: Vec<String> = program
        .class("lib.Expr")
        .sealed_subclasses(session)
        .iter()
        .map(|class| class.simple_name(session).to_string())
        .collect();
    assert_eq!(names, vec!["Const".to_owned()]);
}

#[test]
fn test_unresolved_type_resolves_in_later_round() {
    let mut fixture = Fixture::new();
    let generated = fixture.builder().type_ref("Gen");
    let p = fixture.property(
        "p",
        PropertyNode {
            type_ref: Some(generated),
            ..PropertyNode::default()
        },
    );
    fixture.file("P.kt", "", vec![p]);
    let mut program = fixture.finish();
    fn property(program: &Program) -> Arc<PropertyDeclaration> {
        match program.session.property_by_name(&SymbolName::new("p")) {
            Some(property) => property,
            None => panic!("p is declared"),
        }
    }
    let before = property(&program).type_ref(&program.session).resolve(&program.session);
    assert!(before.is_error());

    program.next_round(|builder| {
        let name = builder.name("Gen");
        let class = builder.push(ClassNode {
            name: Some(name),
            ..ClassNode::default()
        });
        builder.add_file("Gen.kt", "", vec![class]);
    });
    let session = &program.session;

    let after = property(&program).type_ref(session).resolve(session);
    assert!(!after.is_error());
    assert_eq!(after.render(session), "Gen");
}
