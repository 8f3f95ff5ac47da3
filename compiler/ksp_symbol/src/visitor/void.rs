//! Visitor without data or result.

use super::{Node, Visitor};
use crate::annotation::{Annotation, ValueArgument};
use crate::declaration::{
    ClassDeclaration, Declaration, FunctionDeclaration, PropertyAccessor, PropertyDeclaration,
    SourceFile, TypeAliasDeclaration, TypeParameterDeclaration, ValueParameter,
};
use crate::expression::Expression;
use crate::reference::{
    CallableReference, ClassifierReference, DynamicReference, TypeArgument, TypeReference,
};
use crate::session::Session;
use std::sync::Arc;

/// A [`Visitor`] whose methods do nothing unless overridden.
///
/// Unlike [`Visitor`], the defaults here do not fall back to the more
/// general methods: overriding `visit_declaration` does not see classes.
/// Every `VisitorVoid` is a `Visitor<(), ()>`.
#[allow(unused_variables, reason = "default no-op methods ignore their arguments")]
pub trait VisitorVoid {
    fn visit_node(&mut self, session: &Session, node: &Node) {}
    fn visit_annotated(&mut self, session: &Session, node: &Node) {}
    fn visit_declaration(&mut self, session: &Session, declaration: &Declaration) {}
    fn visit_declaration_container(&mut self, session: &Session, node: &Node) {}
    fn visit_reference_element(&mut self, session: &Session, node: &Node) {}
    fn visit_file(&mut self, session: &Session, file: &Arc<SourceFile>) {}
    fn visit_class_declaration(&mut self, session: &Session, class: &Arc<ClassDeclaration>) {}
    fn visit_function_declaration(&mut self, session: &Session, function: &Arc<FunctionDeclaration>) {}
    fn visit_property_declaration(&mut self, session: &Session, property: &Arc<PropertyDeclaration>) {}
    fn visit_type_alias(&mut self, session: &Session, alias: &Arc<TypeAliasDeclaration>) {}
    fn visit_type_parameter(&mut self, session: &Session, parameter: &Arc<TypeParameterDeclaration>) {}
    fn visit_property_accessor(&mut self, session: &Session, accessor: &Arc<PropertyAccessor>) {}
    fn visit_property_getter(&mut self, session: &Session, getter: &Arc<PropertyAccessor>) {}
    fn visit_property_setter(&mut self, session: &Session, setter: &Arc<PropertyAccessor>) {}
    fn visit_value_parameter(&mut self, session: &Session, parameter: &Arc<ValueParameter>) {}
    fn visit_type_reference(&mut self, session: &Session, reference: &Arc<TypeReference>) {}
    fn visit_type_argument(&mut self, session: &Session, argument: &Arc<TypeArgument>) {}
    fn visit_classifier_reference(&mut self, session: &Session, reference: &Arc<ClassifierReference>) {}
    fn visit_callable_reference(&mut self, session: &Session, reference: &Arc<CallableReference>) {}
    fn visit_dynamic_reference(&mut self, session: &Session, reference: &Arc<DynamicReference>) {}
    fn visit_annotation(&mut self, session: &Session, annotation: &Arc<Annotation>) {}
    fn visit_value_argument(&mut self, session: &Session, argument: &Arc<ValueArgument>) {}
    fn visit_expression(&mut self, session: &Session, expression: &Arc<Expression>) {}
}

macro_rules! forward_void {
    ($($method:ident($arg:ident: $ty:ty);)*) => {
        $(
            fn $method(&mut self, session: &Session, $arg: $ty, (): ()) {
                VisitorVoid::$method(self, session, $arg);
            }
        )*
    };
}

impl<T: VisitorVoid> Visitor<(), ()> for T {
    forward_void! {
        visit_node(node: &Node);
        visit_annotated(node: &Node);
        visit_declaration(declaration: &Declaration);
        visit_declaration_container(node: &Node);
        visit_reference_element(node: &Node);
        visit_file(file: &Arc<SourceFile>);
        visit_class_declaration(class: &Arc<ClassDeclaration>);
        visit_function_declaration(function: &Arc<FunctionDeclaration>);
        visit_property_declaration(property: &Arc<PropertyDeclaration>);
        visit_type_alias(alias: &Arc<TypeAliasDeclaration>);
        visit_type_parameter(parameter: &Arc<TypeParameterDeclaration>);
        visit_property_accessor(accessor: &Arc<PropertyAccessor>);
        visit_property_getter(getter: &Arc<PropertyAccessor>);
        visit_property_setter(setter: &Arc<PropertyAccessor>);
        visit_value_parameter(parameter: &Arc<ValueParameter>);
        visit_type_reference(reference: &Arc<TypeReference>);
        visit_type_argument(argument: &Arc<TypeArgument>);
        visit_classifier_reference(reference: &Arc<ClassifierReference>);
        visit_callable_reference(reference: &Arc<CallableReference>);
        visit_dynamic_reference(reference: &Arc<DynamicReference>);
        visit_annotation(annotation: &Arc<Annotation>);
        visit_value_argument(argument: &Arc<ValueArgument>);
        visit_expression(expression: &Arc<Expression>);
    }
}
