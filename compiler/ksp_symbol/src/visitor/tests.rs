use super::*;
use crate::testing::fixture::{constructor_property, unresolved_property};
use pretty_assertions::assert_eq;

#[derive(Default)]
struct Counter {
    files: usize,
    classes: usize,
    functions: usize,
    properties: usize,
    parameters: usize,
}

impl VisitorVoid for Counter {
    fn visit_file(&mut self, _session: &Session, _file: &Arc<SourceFile>) {
        self.files += 1;
    }

    fn visit_class_declaration(&mut self, _session: &Session, _class: &Arc<ClassDeclaration>) {
        self.classes += 1;
    }

    fn visit_function_declaration(
        &mut self,
        _session: &Session,
        _function: &Arc<FunctionDeclaration>,
    ) {
        self.functions += 1;
    }

    fn visit_property_declaration(
        &mut self,
        _session: &Session,
        _property: &Arc<PropertyDeclaration>,
    ) {
        self.properties += 1;
    }

    fn visit_value_parameter(&mut self, _session: &Session, _parameter: &Arc<ValueParameter>) {
        self.parameters += 1;
    }
}

/// Names every declaration through the general fallback.
struct DeclarationNames;

impl Visitor<(), Option<String>> for DeclarationNames {
    fn visit_node(&mut self, _session: &Session, _node: &Node, (): ()) -> Option<String> {
        None
    }

    fn visit_declaration(
        &mut self,
        session: &Session,
        declaration: &Declaration,
        (): (),
    ) -> Option<String> {
        Some(declaration.simple_name(session).to_string())
    }
}

fn first_file(session: &Session) -> Node {
    let files = session.all_files();
    let Some(file) = files.first() else {
        panic!("the program has a file");
    };
    Node::File(Arc::clone(file))
}

#[test]
fn test_walk_reaches_every_declaration() {
    let program = constructor_property();
    let session = &program.session;
    let mut counter = Counter::default();
    walk(&mut counter, session, &first_file(session), ());

    assert_eq!(counter.files, 1);
    assert_eq!(counter.classes, 1);
    // the primary constructor
    assert_eq!(counter.functions, 1);
    assert_eq!(counter.properties, 1);
    assert_eq!(counter.parameters, 1);
}

#[test]
fn test_walk_children_skips_the_root() {
    let program = constructor_property();
    let session = &program.session;
    let mut counter = Counter::default();
    walk_children(&mut counter, session, &first_file(session), ());

    assert_eq!(counter.files, 0);
    assert_eq!(counter.classes, 1);
}

#[test]
fn test_specific_methods_fall_back_to_declaration() {
    let program = constructor_property();
    let session = &program.session;
    let foo = Node::Class(program.class("Foo"));

    assert_eq!(foo.accept(&mut DeclarationNames, session, ()), Some("Foo".to_owned()));
    assert_eq!(first_file(session).accept(&mut DeclarationNames, session, ()), None);
}

#[test]
fn test_symbol_children_of_class() {
    let program = constructor_property();
    let session = &program.session;
    let children = Node::Class(program.class("Foo")).symbol_children(session);

    let names: Vec<String> = children
        .iter()
        .filter_map(|child| child.as_declaration())
        .map(|declaration| declaration.simple_name(session).to_string())
        .collect();
    assert_eq!(names, vec!["<init>".to_owned(), "x".to_owned()]);
}

#[test]
fn test_validate_resolved_file() {
    let program = constructor_property();
    let session = &program.session;
    assert!(validate(session, &first_file(session)));
}

#[test]
fn test_validate_reports_unresolved_reference() {
    let program = unresolved_property();
    let session = &program.session;
    assert!(!validate(session, &first_file(session)));
}

#[test]
fn test_validate_with_predicate_skips_references() {
    let program = unresolved_property();
    let session = &program.session;
    let accepted = validate_with(session, &first_file(session), |_, child| {
        !matches!(child, Node::TypeReference(_) | Node::Expression(_))
    });
    assert!(accepted);
}
