use super::*;
use crate::testing::fixture::unresolved_property;
use crate::testing::{Fixture, Program};
use ksp_ir::syntax::{ArenaBuilder, PropertyNode, WhenBranchNode};
use ksp_ir::ConstantValue;
use pretty_assertions::assert_eq;

/// `val v = <expression>` in `V.kt`.
fn initializer(build: impl FnOnce(&mut ArenaBuilder) -> SyntaxId) -> (Program, Arc<Expression>) {
    let mut fixture = Fixture::new();
    let expression = build(fixture.builder());
    let property = fixture.property(
        "v",
        PropertyNode {
            initializer: Some(expression),
            ..PropertyNode::default()
        },
    );
    fixture.file("V.kt", "", vec![property]);
    let program = fixture.finish();
    let expression = Expression::from_syntax(&program.session, expression);
    (program, expression)
}

#[test]
fn test_binary_expression() {
    let (program, expression) = initializer(|builder| {
        let left = builder.constant(ConstantValue::Int(1));
        let right = builder.constant(ConstantValue::Int(2));
        builder.expression(ExpressionNode::Binary {
            op: BinaryOperator::Plus,
            left,
            right,
        })
    });
    let session = &program.session;

    assert_eq!(expression.text(session), "1 + 2");
    let ExpressionKind::Binary { operator, left, .. } = expression.kind(session) else {
        panic!("expected a binary expression");
    };
    assert_eq!(operator, BinaryOperator::Plus);
    let ExpressionKind::Constant(value) = left.kind(session) else {
        panic!("left operand is a constant");
    };
    assert_eq!(value, AnnotationValue::Int(1));
}

#[test]
fn test_call_expression() {
    let program = unresolved_property();
    let session = &program.session;
    let Some(y) = session.property_by_name(&SymbolName::new("y")) else {
        panic!("y is declared");
    };
    let Some(initializer) = y.initializer(session) else {
        panic!("y has an initializer");
    };

    assert_eq!(initializer.text(session), "TODO()");
    let ExpressionKind::Call {
        callee, arguments, ..
    } = initializer.kind(session)
    else {
        panic!("expected a call");
    };
    assert!(arguments.is_empty());
    let ExpressionKind::NameReference(name) = callee.kind(session) else {
        panic!("callee is a name");
    };
    assert_eq!(name, "TODO");

    let Some(Declaration::Property(parent)) = initializer.parent_declaration(session) else {
        panic!("initializer belongs to y");
    };
    assert!(Arc::ptr_eq(&parent, &y));
}

#[test]
fn test_cast_without_expression_is_compiler_error() {
    let (program, expression) = initializer(|builder| {
        let type_ref = builder.type_ref("String");
        builder.expression(ExpressionNode::Cast {
            expression: None,
            op: CastOperator::As,
            type_ref,
        })
    });
    let session = &program.session;

    let Err(error) = expression.try_kind(session) else {
        panic!("a cast needs its left-hand side");
    };
    assert_eq!(error.message, "'as' has no left-hand expression");
    assert_eq!(&*error.file, "V.kt");
    assert_eq!(expression.text(session), "<error>");
}

#[test]
fn test_resolve_uses_host_expression_type() {
    let (program, expression) = initializer(|builder| {
        let callee = builder.name_ref("compute");
        builder.expression(ExpressionNode::Call {
            callee,
            type_arguments: Vec::new(),
            arguments: Vec::new(),
            trailing_lambda: None,
        })
    });
    let session = &program.session;

    let unresolved = expression.resolve(session);
    assert!(unresolved.is_error());
    assert_eq!(unresolved.render(session), "<ERROR TYPE: compute()>");

    let Some(int) = program.resolver.type_named("kotlin.Int") else {
        panic!("Int is a builtin");
    };
    program.resolver.set_expression_type(expression.node(), int);
    assert_eq!(expression.resolve(session).render(session), "Int");
}

#[test]
fn test_constant_resolves_to_its_type() {
    let (program, expression) = initializer(|builder| builder.constant(ConstantValue::string("s")));
    let session = &program.session;
    assert_eq!(expression.text(session), "\"s\"");
    assert_eq!(expression.resolve(session).render(session), "String");
}

#[test]
fn test_conditional_text() {
    let (program, expression) = initializer(|builder| {
        let condition = builder.name_ref("flag");
        let then_branch = builder.constant(ConstantValue::Int(1));
        let else_branch = builder.constant(ConstantValue::Int(2));
        builder.expression(ExpressionNode::If {
            condition,
            then_branch: Some(then_branch),
            else_branch: Some(else_branch),
        })
    });
    assert_eq!(expression.text(&program.session), "if (flag) 1 else 2");
}

#[test]
fn test_when_text() {
    let (program, expression) = initializer(|builder| {
        let subject = builder.name_ref("x");
        let one = builder.constant(ConstantValue::Int(1));
        let first = builder.constant(ConstantValue::string("one"));
        let other = builder.constant(ConstantValue::string("other"));
        builder.expression(ExpressionNode::When {
            subject: Some(subject),
            branches: vec![
                WhenBranchNode {
                    conditions: vec![one],
                    body: Some(first),
                },
                WhenBranchNode {
                    conditions: Vec::new(),
                    body: Some(other),
                },
            ],
        })
    });
    let session = &program.session;
    assert_eq!(
        expression.text(session),
        "when (x) { 1 -> \"one\"; else -> \"other\" }"
    );
    let ExpressionKind::When { branches, .. } = expression.kind(session) else {
        panic!("expected when");
    };
    assert!(!branches[0].is_else());
    assert!(branches[1].is_else());
}

#[test]
fn test_safe_qualified_text() {
    let (program, expression) = initializer(|builder| {
        let receiver = builder.name_ref("a");
        let selector = builder.name_ref("b");
        builder.expression(ExpressionNode::Qualified {
            receiver,
            selector,
            safe: true,
        })
    });
    assert_eq!(expression.text(&program.session), "a?.b");
}

#[test]
fn test_block_separates_declarations() {
    let (program, expression) = initializer(|builder| {
        let name = builder.name("w");
        let local = builder.push(PropertyNode {
            name: Some(name),
            ..PropertyNode::default()
        });
        let usage = builder.name_ref("w");
        builder.expression(ExpressionNode::Block {
            statements: vec![local, usage],
        })
    });
    let session = &program.session;

    let ExpressionKind::Block(statements) = expression.kind(session) else {
        panic!("expected a block");
    };
    assert_eq!(statements.len(), 2);
    assert!(matches!(
        &statements[0],
        Statement::Declaration(Declaration::Property(_))
    ));
    assert!(matches!(&statements[1], Statement::Expression(_)));
    assert_eq!(expression.text(session), "{ w; w }");
}

#[test]
fn test_expression_wrapper_is_cached() {
    let (program, expression) = initializer(|builder| builder.name_ref("z"));
    let session = &program.session;
    assert!(Arc::ptr_eq(
        &expression,
        &Expression::from_syntax(session, expression.node())
    ));
    assert_eq!(expression.origin(), Origin::Source);
}
