//! Typed traversal over the symbol model.
//!
//! # Design
//!
//! [`Node`] is the closed set of model entities a visitor can reach.
//! [`Visitor`] has one method per concrete kind; each default falls back to
//! a more general method, ending at the required [`Visitor::visit_node`]:
//!
//! ```text
//! visit_class_declaration ─┐
//! visit_function_declaration ─┤
//! visit_property_declaration ─┼─> visit_declaration ─┐
//! visit_type_alias ─┤                                 │
//! visit_type_parameter ─┘                             ├─> visit_annotated ─> visit_node
//! visit_file ─> visit_declaration_container ──────────┤
//! visit_property_getter/setter ─> visit_property_accessor ┤
//! visit_value_parameter, visit_type_reference,         │
//! visit_type_argument ────────────────────────────────┘
//! visit_classifier/callable/dynamic_reference ─> visit_reference_element ─> visit_node
//! visit_annotation, visit_value_argument, visit_expression ─> visit_node
//! ```
//!
//! A consumer overriding only `visit_declaration` therefore sees every
//! declaration kind. [`VisitorVoid`] is the variant whose methods all do
//! nothing, for consumers that care about a few kinds only.

mod validate;
mod void;
mod walk;

pub use validate::{validate, validate_with, ValidateVisitor};
pub use void::VisitorVoid;
pub use walk::{walk, walk_children};

use crate::annotation::{Annotation, ValueArgument};
use crate::declaration::{
    ClassDeclaration, Declaration, FunctionDeclaration, PropertyAccessor, PropertyDeclaration,
    SourceFile, TypeAliasDeclaration, TypeParameterDeclaration, ValueParameter,
};
use crate::expression::{Expression, ExpressionKind, Statement};
use crate::location::{Location, Origin};
use crate::reference::{
    CallableReference, ClassifierReference, DynamicReference, ReferenceElement, TypeArgument,
    TypeReference,
};
use crate::session::Session;
use std::sync::Arc;

/// Any entity of the model.
#[derive(Clone, Debug)]
pub enum Node {
    File(Arc<SourceFile>),
    Class(Arc<ClassDeclaration>),
    Function(Arc<FunctionDeclaration>),
    Property(Arc<PropertyDeclaration>),
    PropertyAccessor(Arc<PropertyAccessor>),
    ValueParameter(Arc<ValueParameter>),
    TypeAlias(Arc<TypeAliasDeclaration>),
    TypeParameter(Arc<TypeParameterDeclaration>),
    TypeReference(Arc<TypeReference>),
    TypeArgument(Arc<TypeArgument>),
    ClassifierReference(Arc<ClassifierReference>),
    CallableReference(Arc<CallableReference>),
    DynamicReference(Arc<DynamicReference>),
    Annotation(Arc<Annotation>),
    ValueArgument(Arc<ValueArgument>),
    Expression(Arc<Expression>),
}

macro_rules! node_from {
    ($($variant:ident($ty:ty);)*) => {
        $(
            impl From<Arc<$ty>> for Node {
                fn from(value: Arc<$ty>) -> Self {
                    Node::$variant(value)
                }
            }
        )*
    };
}

node_from! {
    File(SourceFile);
    Class(ClassDeclaration);
    Function(FunctionDeclaration);
    Property(PropertyDeclaration);
    PropertyAccessor(PropertyAccessor);
    ValueParameter(ValueParameter);
    TypeAlias(TypeAliasDeclaration);
    TypeParameter(TypeParameterDeclaration);
    TypeReference(TypeReference);
    TypeArgument(TypeArgument);
    ClassifierReference(ClassifierReference);
    CallableReference(CallableReference);
    DynamicReference(DynamicReference);
    Annotation(Annotation);
    ValueArgument(ValueArgument);
    Expression(Expression);
}

impl From<Declaration> for Node {
    fn from(declaration: Declaration) -> Self {
        match declaration {
            Declaration::Class(class) => Node::Class(class),
            Declaration::Function(function) => Node::Function(function),
            Declaration::Property(property) => Node::Property(property),
            Declaration::TypeAlias(alias) => Node::TypeAlias(alias),
            Declaration::TypeParameter(parameter) => Node::TypeParameter(parameter),
        }
    }
}

impl From<ReferenceElement> for Node {
    fn from(element: ReferenceElement) -> Self {
        match element {
            ReferenceElement::Classifier(classifier) => Node::ClassifierReference(classifier),
            ReferenceElement::Callable(callable) => Node::CallableReference(callable),
            ReferenceElement::Dynamic(dynamic) => Node::DynamicReference(dynamic),
        }
    }
}

impl Node {
    /// The declaration this node is, if it is one.
    pub fn as_declaration(&self) -> Option<Declaration> {
        Some(match self {
            Node::Class(class) => Declaration::Class(Arc::clone(class)),
            Node::Function(function) => Declaration::Function(Arc::clone(function)),
            Node::Property(property) => Declaration::Property(Arc::clone(property)),
            Node::TypeAlias(alias) => Declaration::TypeAlias(Arc::clone(alias)),
            Node::TypeParameter(parameter) => Declaration::TypeParameter(Arc::clone(parameter)),
            _ => return None,
        })
    }

    /// Annotations of annotated nodes; empty for the rest.
    pub fn annotations(&self, session: &Session) -> Vec<Arc<Annotation>> {
        match self {
            Node::File(file) => file.annotations(session),
            Node::PropertyAccessor(accessor) => accessor.annotations(session),
            Node::ValueParameter(parameter) => parameter.annotations(session),
            Node::TypeReference(reference) => reference.annotations(session),
            Node::TypeArgument(argument) => argument.annotations(session),
            _ => self
                .as_declaration()
                .map_or_else(Vec::new, |declaration| declaration.annotations(session)),
        }
    }

    pub fn origin(&self, session: &Session) -> Origin {
        match self {
            Node::File(file) => file.origin(),
            Node::PropertyAccessor(accessor) => accessor.origin(session),
            Node::ValueParameter(parameter) => parameter.origin(),
            Node::TypeReference(reference) => reference.origin(),
            Node::TypeArgument(argument) => argument.origin(),
            Node::ClassifierReference(classifier) => classifier.origin(),
            Node::CallableReference(_) | Node::DynamicReference(_) => Origin::Source,
            Node::Annotation(annotation) => annotation.origin(),
            Node::ValueArgument(argument) => argument.origin(),
            Node::Expression(expression) => expression.origin(),
            _ => self.as_declaration().map_or(Origin::Synthetic, |d| d.origin()),
        }
    }

    pub fn location(&self, session: &Session) -> Location {
        match self {
            Node::File(file) => file.location(session),
            Node::PropertyAccessor(accessor) => accessor.location(session),
            Node::ValueParameter(parameter) => parameter.location(session),
            Node::TypeReference(reference) => reference.location(session),
            Node::TypeArgument(argument) => argument.location(session),
            Node::ClassifierReference(classifier) => classifier.location(session),
            Node::CallableReference(callable) => callable.location(session),
            Node::DynamicReference(dynamic) => dynamic.location(session),
            Node::Annotation(annotation) => annotation.location(session),
            Node::ValueArgument(argument) => argument.location(session),
            Node::Expression(expression) => expression.location(session),
            _ => self
                .as_declaration()
                .map_or(Location::NoLocation, |d| d.location(session)),
        }
    }

    /// Symbols nested in this one that can carry annotations: members,
    /// parameters, accessors and type parameters. Local declarations of
    /// bodies are not included.
    pub fn symbol_children(&self, session: &Session) -> Vec<Node> {
        let type_parameters = |parameters: Vec<Arc<TypeParameterDeclaration>>| {
            parameters.into_iter().map(Node::TypeParameter)
        };
        match self {
            Node::File(file) => file.declarations(session).into_iter().map(Node::from).collect(),
            Node::Class(class) => type_parameters(class.type_parameters(session))
                .chain(class.declarations(session).into_iter().map(Node::from))
                .collect(),
            Node::Function(function) => type_parameters(function.type_parameters(session))
                .chain(function.parameters(session).into_iter().map(Node::ValueParameter))
                .collect(),
            Node::Property(property) => type_parameters(property.type_parameters(session))
                .chain(property.getter(session).map(Node::PropertyAccessor))
                .chain(property.setter(session).map(Node::PropertyAccessor))
                .collect(),
            Node::PropertyAccessor(accessor) => accessor
                .parameter(session)
                .map(Node::ValueParameter)
                .into_iter()
                .collect(),
            Node::TypeAlias(alias) => type_parameters(alias.type_parameters(session)).collect(),
            _ => Vec::new(),
        }
    }

    /// Every child node in source order.
    pub fn children(&self, session: &Session) -> Vec<Node> {
        let mut out: Vec<Node> = self
            .annotations(session)
            .into_iter()
            .map(Node::Annotation)
            .collect();
        match self {
            Node::File(file) => out.extend(file.declarations(session).into_iter().map(Node::from)),
            Node::Class(class) => {
                out.extend(class.type_parameters(session).into_iter().map(Node::TypeParameter));
                out.extend(class.super_types(session).into_iter().map(Node::TypeReference));
                out.extend(class.declarations(session).into_iter().map(Node::from));
            }
            Node::Function(function) => {
                out.extend(function.type_parameters(session).into_iter().map(Node::TypeParameter));
                out.extend(function.extension_receiver(session).map(Node::TypeReference));
                out.extend(function.parameters(session).into_iter().map(Node::ValueParameter));
                out.push(Node::TypeReference(function.return_type(session)));
                out.extend(function.body(session).map(Node::Expression));
            }
            Node::Property(property) => {
                out.extend(property.type_parameters(session).into_iter().map(Node::TypeParameter));
                out.extend(property.extension_receiver(session).map(Node::TypeReference));
                out.push(Node::TypeReference(property.type_ref(session)));
                out.extend(property.initializer(session).map(Node::Expression));
                out.extend(property.delegate(session).map(Node::Expression));
                out.extend(property.getter(session).map(Node::PropertyAccessor));
                out.extend(property.setter(session).map(Node::PropertyAccessor));
            }
            Node::PropertyAccessor(accessor) => {
                out.extend(accessor.parameter(session).map(Node::ValueParameter));
                out.extend(accessor.return_type(session).map(Node::TypeReference));
                out.extend(accessor.body(session).map(Node::Expression));
            }
            Node::ValueParameter(parameter) => {
                out.push(Node::TypeReference(parameter.type_ref(session)));
                out.extend(parameter.default_value(session).map(Node::Expression));
            }
            Node::TypeAlias(alias) => {
                out.extend(alias.type_parameters(session).into_iter().map(Node::TypeParameter));
                out.push(Node::TypeReference(alias.aliased_type(session)));
            }
            Node::TypeParameter(parameter) => {
                out.extend(parameter.bounds(session).into_iter().map(Node::TypeReference));
            }
            Node::TypeReference(reference) => {
                out.extend(reference.element(session).map(Node::from));
            }
            Node::TypeArgument(argument) => {
                out.extend(argument.type_ref(session).map(Node::TypeReference));
            }
            Node::ClassifierReference(classifier) => {
                out.extend(classifier.qualifier(session).map(Node::ClassifierReference));
                out.extend(classifier.type_arguments(session).into_iter().map(Node::TypeArgument));
            }
            Node::CallableReference(callable) => {
                out.extend(callable.receiver_type(session).map(Node::TypeReference));
                out.extend(
                    callable
                        .function_parameters(session)
                        .into_iter()
                        .map(Node::ValueParameter),
                );
                out.push(Node::TypeReference(callable.return_type(session)));
            }
            Node::DynamicReference(_) | Node::ValueArgument(_) => {}
            Node::Annotation(annotation) => {
                out.push(Node::TypeReference(annotation.annotation_type(session)));
                out.extend(annotation.arguments(session).into_iter().map(Node::ValueArgument));
            }
            Node::Expression(expression) => out.extend(expression_children(session, expression)),
        }
        out
    }
}

fn expression_children(session: &Session, expression: &Expression) -> Vec<Node> {
    let Ok(kind) = expression.try_kind(session) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    match kind {
        ExpressionKind::Constant(_) | ExpressionKind::NameReference(_) => {}
        ExpressionKind::Call {
            callee,
            type_arguments,
            arguments,
            trailing_lambda,
        } => {
            push(&mut out, Some(callee));
            for argument in arguments {
                push(&mut out, argument.value);
            }
            push(&mut out, trailing_lambda);
            out.extend(type_arguments.into_iter().map(Node::TypeArgument));
        }
        ExpressionKind::Qualified {
            receiver, selector, ..
        } => {
            push(&mut out, Some(receiver));
            push(&mut out, Some(selector));
        }
        ExpressionKind::If {
            condition,
            then_branch,
            else_branch,
        } => {
            push(&mut out, Some(condition));
            push(&mut out, then_branch);
            push(&mut out, else_branch);
        }
        ExpressionKind::When { subject, branches } => {
            push(&mut out, subject);
            for branch in branches {
                for condition in branch.conditions {
                    push(&mut out, Some(condition));
                }
                push(&mut out, branch.body);
            }
        }
        ExpressionKind::Lambda(function) => out.push(Node::Function(function)),
        ExpressionKind::Unary { operand, .. } => push(&mut out, operand),
        ExpressionKind::Binary { left, right, .. } => {
            push(&mut out, Some(left));
            push(&mut out, Some(right));
        }
        ExpressionKind::Jump { value, .. } => push(&mut out, value),
        ExpressionKind::Cast {
            expression,
            type_ref,
            ..
        } => {
            push(&mut out, Some(expression));
            out.push(Node::TypeReference(type_ref));
        }
        ExpressionKind::Labeled { expression, .. } => push(&mut out, expression),
        ExpressionKind::Block(statements) => {
            for statement in statements {
                match statement {
                    Statement::Expression(expression) => push(&mut out, Some(expression)),
                    Statement::Declaration(declaration) => out.push(Node::from(declaration)),
                }
            }
        }
        ExpressionKind::Declaration(declaration) => out.push(Node::from(declaration)),
    }
    out
}

fn push(out: &mut Vec<Node>, child: Option<Arc<Expression>>) {
    out.extend(child.map(Node::Expression));
}

/// Visitor over [`Node`]s, with data `D` passed down and result `R`.
///
/// Only [`Visitor::visit_node`] is required; see the module docs for the
/// fallback order of the other methods.
pub trait Visitor<D, R> {
    fn visit_node(&mut self, session: &Session, node: &Node, data: D) -> R;

    fn visit_annotated(&mut self, session: &Session, node: &Node, data: D) -> R {
        self.visit_node(session, node, data)
    }

    fn visit_declaration(&mut self, session: &Session, declaration: &Declaration, data: D) -> R {
        self.visit_annotated(session, &Node::from(declaration.clone()), data)
    }

    fn visit_declaration_container(&mut self, session: &Session, node: &Node, data: D) -> R {
        self.visit_annotated(session, node, data)
    }

    fn visit_reference_element(&mut self, session: &Session, node: &Node, data: D) -> R {
        self.visit_node(session, node, data)
    }

    fn visit_file(&mut self, session: &Session, file: &Arc<SourceFile>, data: D) -> R {
        self.visit_declaration_container(session, &Node::File(Arc::clone(file)), data)
    }

    fn visit_class_declaration(
        &mut self,
        session: &Session,
        class: &Arc<ClassDeclaration>,
        data: D,
    ) -> R {
        self.visit_declaration(session, &Declaration::Class(Arc::clone(class)), data)
    }

    fn visit_function_declaration(
        &mut self,
        session: &Session,
        function: &Arc<FunctionDeclaration>,
        data: D,
    ) -> R {
        self.visit_declaration(session, &Declaration::Function(Arc::clone(function)), data)
    }

    fn visit_property_declaration(
        &mut self,
        session: &Session,
        property: &Arc<PropertyDeclaration>,
        data: D,
    ) -> R {
        self.visit_declaration(session, &Declaration::Property(Arc::clone(property)), data)
    }

    fn visit_type_alias(&mut self, session: &Session, alias: &Arc<TypeAliasDeclaration>, data: D) -> R {
        self.visit_declaration(session, &Declaration::TypeAlias(Arc::clone(alias)), data)
    }

    fn visit_type_parameter(
        &mut self,
        session: &Session,
        parameter: &Arc<TypeParameterDeclaration>,
        data: D,
    ) -> R {
        self.visit_declaration(session, &Declaration::TypeParameter(Arc::clone(parameter)), data)
    }

    fn visit_property_accessor(
        &mut self,
        session: &Session,
        accessor: &Arc<PropertyAccessor>,
        data: D,
    ) -> R {
        self.visit_annotated(session, &Node::PropertyAccessor(Arc::clone(accessor)), data)
    }

    fn visit_property_getter(
        &mut self,
        session: &Session,
        getter: &Arc<PropertyAccessor>,
        data: D,
    ) -> R {
        self.visit_property_accessor(session, getter, data)
    }

    fn visit_property_setter(
        &mut self,
        session: &Session,
        setter: &Arc<PropertyAccessor>,
        data: D,
    ) -> R {
        self.visit_property_accessor(session, setter, data)
    }

    fn visit_value_parameter(
        &mut self,
        session: &Session,
        parameter: &Arc<ValueParameter>,
        data: D,
    ) -> R {
        self.visit_annotated(session, &Node::ValueParameter(Arc::clone(parameter)), data)
    }

    fn visit_type_reference(
        &mut self,
        session: &Session,
        reference: &Arc<TypeReference>,
        data: D,
    ) -> R {
        self.visit_annotated(session, &Node::TypeReference(Arc::clone(reference)), data)
    }

    fn visit_type_argument(&mut self, session: &Session, argument: &Arc<TypeArgument>, data: D) -> R {
        self.visit_annotated(session, &Node::TypeArgument(Arc::clone(argument)), data)
    }

    fn visit_classifier_reference(
        &mut self,
        session: &Session,
        reference: &Arc<ClassifierReference>,
        data: D,
    ) -> R {
        self.visit_reference_element(session, &Node::ClassifierReference(Arc::clone(reference)), data)
    }

    fn visit_callable_reference(
        &mut self,
        session: &Session,
        reference: &Arc<CallableReference>,
        data: D,
    ) -> R {
        self.visit_reference_element(session, &Node::CallableReference(Arc::clone(reference)), data)
    }

    fn visit_dynamic_reference(
        &mut self,
        session: &Session,
        reference: &Arc<DynamicReference>,
        data: D,
    ) -> R {
        self.visit_reference_element(session, &Node::DynamicReference(Arc::clone(reference)), data)
    }

    fn visit_annotation(&mut self, session: &Session, annotation: &Arc<Annotation>, data: D) -> R {
        self.visit_node(session, &Node::Annotation(Arc::clone(annotation)), data)
    }

    fn visit_value_argument(
        &mut self,
        session: &Session,
        argument: &Arc<ValueArgument>,
        data: D,
    ) -> R {
        self.visit_node(session, &Node::ValueArgument(Arc::clone(argument)), data)
    }

    fn visit_expression(&mut self, session: &Session, expression: &Arc<Expression>, data: D) -> R {
        self.visit_node(session, &Node::Expression(Arc::clone(expression)), data)
    }
}

/// Double dispatch into the most specific [`Visitor`] method.
pub trait Accept {
    fn accept<V, D, R>(&self, visitor: &mut V, session: &Session, data: D) -> R
    where
        V: Visitor<D, R> + ?Sized;
}

impl Accept for Node {
    fn accept<V, D, R>(&self, visitor: &mut V, session: &Session, data: D) -> R
    where
        V: Visitor<D, R> + ?Sized,
    {
        match self {
            Node::File(file) => visitor.visit_file(session, file, data),
            Node::Class(class) => visitor.visit_class_declaration(session, class, data),
            Node::Function(function) => visitor.visit_function_declaration(session, function, data),
            Node::Property(property) => visitor.visit_property_declaration(session, property, data),
            Node::PropertyAccessor(accessor) => {
                if accessor.is_getter(session) {
                    visitor.visit_property_getter(session, accessor, data)
                } else {
                    visitor.visit_property_setter(session, accessor, data)
                }
            }
            Node::ValueParameter(parameter) => visitor.visit_value_parameter(session, parameter, data),
            Node::TypeAlias(alias) => visitor.visit_type_alias(session, alias, data),
            Node::TypeParameter(parameter) => visitor.visit_type_parameter(session, parameter, data),
            Node::TypeReference(reference) => visitor.visit_type_reference(session, reference, data),
            Node::TypeArgument(argument) => visitor.visit_type_argument(session, argument, data),
            Node::ClassifierReference(reference) => {
                visitor.visit_classifier_reference(session, reference, data)
            }
            Node::CallableReference(reference) => {
                visitor.visit_callable_reference(session, reference, data)
            }
            Node::DynamicReference(reference) => {
                visitor.visit_dynamic_reference(session, reference, data)
            }
            Node::Annotation(annotation) => visitor.visit_annotation(session, annotation, data),
            Node::ValueArgument(argument) => visitor.visit_value_argument(session, argument, data),
            Node::Expression(expression) => visitor.visit_expression(session, expression, data),
        }
    }
}

impl Accept for Declaration {
    fn accept<V, D, R>(&self, visitor: &mut V, session: &Session, data: D) -> R
    where
        V: Visitor<D, R> + ?Sized,
    {
        Node::from(self.clone()).accept(visitor, session, data)
    }
}

macro_rules! accept_via_node {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Accept for Arc<$ty> {
                fn accept<V, D, R>(&self, visitor: &mut V, session: &Session, data: D) -> R
                where
                    V: Visitor<D, R> + ?Sized,
                {
                    Node::from(Arc::clone(self)).accept(visitor, session, data)
                }
            }
        )*
    };
}

accept_via_node!(
    SourceFile,
    ClassDeclaration,
    FunctionDeclaration,
    PropertyDeclaration,
    PropertyAccessor,
    ValueParameter,
    TypeAliasDeclaration,
    TypeParameterDeclaration,
    TypeReference,
    TypeArgument,
    ClassifierReference,
    CallableReference,
    DynamicReference,
    Annotation,
    ValueArgument,
    Expression,
);

#[cfg(test)]
mod tests;
