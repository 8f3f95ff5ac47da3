//! Properties, including `val`/`var` constructor parameters.

use super::base::Repr;
use super::{
    find_overridee, overrides_descriptor, ClassDeclaration, Declaration, DeclarationBase,
    NodeKey, PropertyAccessor, SourceFile, TypeParameterDeclaration,
};
use crate::annotation::Annotation;
use crate::expression::Expression;
use crate::kinds::ClassKind;
use crate::location::{Location, Origin};
use crate::name::SymbolName;
use crate::reference::TypeReference;
use crate::session::Session;
use crate::types::{error_from_resolution, get_ks_type_cached, Type};
use ksp_ir::syntax::{NodeKind, ParameterBinding, ParameterNode, PropertyNode};
use ksp_ir::{Descriptor, Modifiers, SyntaxId};
use std::sync::Arc;

pub struct PropertyDeclaration {
    base: DeclarationBase,
}

/// The syntax a source property comes from.
enum PropertySyntax<'s> {
    Property(&'s PropertyNode),
    Parameter(&'s ParameterNode),
}

impl PropertyDeclaration {
    /// Wrapper for a property node or a `val`/`var` constructor parameter.
    pub fn from_syntax(session: &Session, node: SyntaxId) -> Arc<PropertyDeclaration> {
        session
            .caches()
            .properties
            .get_or_put(NodeKey::Syntax(node), || PropertyDeclaration {
                base: DeclarationBase::new(Repr::Source(node)),
            })
    }

    pub fn from_descriptor(
        session: &Session,
        descriptor: &Arc<Descriptor>,
    ) -> Arc<PropertyDeclaration> {
        if let Some(source) = descriptor.source {
            let is_property = session.syntax().get(source).is_some_and(|node| {
                matches!(node.kind, NodeKind::Property(_) | NodeKind::Parameter(_))
            });
            if is_property {
                return Self::from_syntax(session, source);
            }
        }
        session
            .caches()
            .properties
            .get_or_put(NodeKey::Descriptor(descriptor.id), || PropertyDeclaration {
                base: DeclarationBase::new(Repr::Binary(Arc::clone(descriptor))),
            })
    }

    pub(crate) fn from_node_key(session: &Session, key: NodeKey) -> Option<Arc<Self>> {
        match key {
            NodeKey::Syntax(node) => Some(Self::from_syntax(session, node)),
            NodeKey::Descriptor(id) => {
                let descriptor = session.descriptor(id)?;
                descriptor.as_property()?;
                Some(Self::from_descriptor(session, &descriptor))
            }
        }
    }

    pub(crate) fn base(&self) -> &DeclarationBase {
        &self.base
    }

    pub fn node(&self) -> Option<SyntaxId> {
        self.base.node()
    }

    pub(crate) fn node_key(&self) -> Option<NodeKey> {
        self.base.node_key()
    }

    fn syntax<'s>(&self, session: &'s Session) -> Option<PropertySyntax<'s>> {
        match session.syntax().kind(self.node()?) {
            NodeKind::Property(property) => Some(PropertySyntax::Property(property)),
            NodeKind::Parameter(parameter) => Some(PropertySyntax::Parameter(parameter)),
            _ => None,
        }
    }

    fn property_node<'s>(&self, session: &'s Session) -> Option<&'s PropertyNode> {
        match self.syntax(session)? {
            PropertySyntax::Property(property) => Some(property),
            PropertySyntax::Parameter(_) => None,
        }
    }

    /// Declared as a `val`/`var` constructor parameter.
    pub fn is_parameter_property(&self, session: &Session) -> bool {
        matches!(self.syntax(session), Some(PropertySyntax::Parameter(_)))
    }

    pub fn simple_name(&self, session: &Session) -> SymbolName {
        self.base
            .name_text(session)
            .map_or_else(|| SymbolName::new("<no name provided>"), SymbolName::from)
    }

    pub fn qualified_name(&self, session: &Session) -> Option<SymbolName> {
        let simple = self.simple_name(session);
        self.base.qualified_name(session, simple.as_str())
    }

    pub fn package_name(&self, session: &Session) -> SymbolName {
        self.base.package_name(session)
    }

    pub fn parent_declaration(&self, session: &Session) -> Option<Declaration> {
        self.base.parent_declaration(session)
    }

    pub fn containing_file(&self, session: &Session) -> Option<Arc<SourceFile>> {
        self.base.containing_file(session)
    }

    pub fn type_parameters(&self, session: &Session) -> Vec<Arc<TypeParameterDeclaration>> {
        self.base.type_parameters(session)
    }

    pub fn doc_string(&self, session: &Session) -> Option<String> {
        self.base.doc_string(session)
    }

    /// Written modifiers, plus `JAVA_STATIC` for `@JvmStatic` properties.
    pub fn modifiers(&self, session: &Session) -> Modifiers {
        let declared = self.base.declared_modifiers(session);
        if self.base.has_annotation_named(session, "JvmStatic") {
            declared | Modifiers::JAVA_STATIC
        } else {
            declared
        }
    }

    pub fn annotations(&self, session: &Session) -> Vec<Arc<Annotation>> {
        self.base.annotations(session)
    }

    pub fn origin(&self) -> Origin {
        self.base.origin()
    }

    pub fn location(&self, session: &Session) -> Location {
        self.base.location(session)
    }

    /// `var`
    pub fn is_mutable(&self, session: &Session) -> bool {
        match self.base.repr() {
            Repr::Source(_) => match self.syntax(session) {
                Some(PropertySyntax::Property(property)) => property.is_var,
                Some(PropertySyntax::Parameter(parameter)) => {
                    parameter.binding == Some(ParameterBinding::Var)
                }
                None => false,
            },
            Repr::Binary(descriptor) => descriptor
                .as_property()
                .is_some_and(|property| property.is_var),
            Repr::SyntheticConstructor { .. } | Repr::ErrorClass { .. } => false,
        }
    }

    /// `val x by delegate`
    pub fn is_delegated(&self, session: &Session) -> bool {
        match self.base.repr() {
            Repr::Source(_) => self
                .property_node(session)
                .is_some_and(|property| property.delegate.is_some()),
            Repr::Binary(descriptor) => descriptor
                .as_property()
                .is_some_and(|property| property.is_delegated),
            Repr::SyntheticConstructor { .. } | Repr::ErrorClass { .. } => false,
        }
    }

    pub fn extension_receiver(&self, session: &Session) -> Option<Arc<TypeReference>> {
        match self.base.repr() {
            Repr::Source(_) => {
                let receiver = self.property_node(session)?.receiver?;
                Some(TypeReference::from_syntax(session, receiver))
            }
            Repr::Binary(descriptor) => {
                let receiver = descriptor.as_property()?.receiver.as_ref()?;
                Some(TypeReference::from_host(session, receiver))
            }
            Repr::SyntheticConstructor { .. } | Repr::ErrorClass { .. } => None,
        }
    }

    /// Declared type, or an inferred reference when none is written.
    ///
    /// # Panics
    /// Panics for a constructor property without a written type, which
    /// the host front end never produces.
    pub fn type_ref(self: &Arc<Self>, session: &Session) -> Arc<TypeReference> {
        match self.base.repr() {
            Repr::Source(_) => match self.syntax(session) {
                Some(PropertySyntax::Property(property)) => match property.type_ref {
                    Some(type_ref) => TypeReference::from_syntax(session, type_ref),
                    None => TypeReference::deferred(
                        session,
                        &Declaration::Property(Arc::clone(self)),
                        inferred_property_type,
                    ),
                },
                Some(PropertySyntax::Parameter(parameter)) => match parameter.type_ref {
                    Some(type_ref) => TypeReference::from_syntax(session, type_ref),
                    None => panic!(
                        "constructor property `{}` has no type",
                        self.simple_name(session)
                    ),
                },
                None => TypeReference::error(session, None),
            },
            Repr::Binary(descriptor) => match descriptor.as_property() {
                Some(property) => TypeReference::from_host(session, &property.ty),
                None => TypeReference::error(session, None),
            },
            Repr::SyntheticConstructor { .. } | Repr::ErrorClass { .. } => {
                TypeReference::error(session, None)
            }
        }
    }

    fn is_private(&self, session: &Session) -> bool {
        self.modifiers(session).contains(Modifiers::PRIVATE)
    }

    /// Whether the model adds accessors the source does not write.
    fn synthesizes_accessors(&self, session: &Session, property: &PropertyNode) -> bool {
        if self.is_private(session) {
            return false;
        }
        let in_interface = matches!(
            self.parent_declaration(session),
            Some(Declaration::Class(ref class)) if class.class_kind(session) == ClassKind::Interface
        );
        if in_interface {
            return property.getter.is_some() || property.setter.is_some();
        }
        let is_local = self.qualified_name(session).is_none();
        let is_abstract = self.modifiers(session).contains(Modifiers::ABSTRACT);
        !is_local && !is_abstract
    }

    pub fn getter(&self, session: &Session) -> Option<Arc<PropertyAccessor>> {
        self.accessor(session, true)
    }

    /// Setter of a `var`; `None` for read-only properties.
    pub fn setter(&self, session: &Session) -> Option<Arc<PropertyAccessor>> {
        self.accessor(session, false)
    }

    fn accessor(&self, session: &Session, getter: bool) -> Option<Arc<PropertyAccessor>> {
        let key = self.node_key()?;
        let synthetic = || Some(PropertyAccessor::synthetic(session, key, getter));
        match self.base.repr() {
            Repr::Source(_) => match self.syntax(session)? {
                PropertySyntax::Property(property) => {
                    let written = if getter { property.getter } else { property.setter };
                    if let Some(accessor) = written {
                        return Some(PropertyAccessor::from_syntax(session, accessor));
                    }
                    let wanted = getter || property.is_var;
                    if wanted && self.synthesizes_accessors(session, property) {
                        synthetic()
                    } else {
                        None
                    }
                }
                PropertySyntax::Parameter(parameter) => {
                    let wanted = getter || parameter.binding == Some(ParameterBinding::Var);
                    if wanted && !self.is_private(session) {
                        synthetic()
                    } else {
                        None
                    }
                }
            },
            Repr::Binary(descriptor) => {
                let property = descriptor.as_property()?;
                let present = if getter {
                    property.getter.is_some()
                } else {
                    property.setter.is_some()
                };
                if present {
                    synthetic()
                } else {
                    None
                }
            }
            Repr::SyntheticConstructor { .. } | Repr::ErrorClass { .. } => None,
        }
    }

    /// Whether the property stores its value in a field.
    ///
    /// A source property has one when it has an initializer, is `lateinit`,
    /// or the host says a field is required. Constructor properties always
    /// have one. A binary property has none with an extension receiver and
    /// always has one with a compile-time constant.
    pub fn has_backing_field(&self, session: &Session) -> bool {
        let descriptor = self.base.descriptor(session);
        let host = descriptor.as_deref().and_then(|descriptor| descriptor.as_property());
        match self.syntax(session) {
            Some(PropertySyntax::Parameter(_)) => true,
            Some(PropertySyntax::Property(property)) => {
                property.initializer.is_some()
                    || self.modifiers(session).contains(Modifiers::LATEINIT)
                    || host.is_some_and(|host| host.backing_field_required)
            }
            None => host.is_some_and(|host| {
                host.receiver.is_none()
                    && (host.compile_time_initializer.is_some() || host.backing_field_required)
            }),
        }
    }

    pub fn initializer(&self, session: &Session) -> Option<Arc<Expression>> {
        let initializer = self.property_node(session)?.initializer?;
        Some(Expression::from_syntax(session, initializer))
    }

    pub fn delegate(&self, session: &Session) -> Option<Arc<Expression>> {
        let delegate = self.property_node(session)?.delegate?;
        Some(Expression::from_syntax(session, delegate))
    }

    /// The property this one directly overrides.
    pub fn find_overridee(&self, session: &Session) -> Option<Declaration> {
        let descriptor = self.base.descriptor(session)?;
        find_overridee(session, &descriptor)
    }

    pub fn overrides(&self, session: &Session, other: &Declaration) -> bool {
        let (Some(mine), Some(theirs)) = (self.base.descriptor(session), other.descriptor(session))
        else {
            return false;
        };
        overrides_descriptor(session, &mine, theirs.id)
    }

    /// Class declaring this property, if it is a member.
    pub fn declaring_class(&self, session: &Session) -> Option<Arc<ClassDeclaration>> {
        match self.parent_declaration(session)? {
            Declaration::Class(class) => Some(class),
            _ => None,
        }
    }
}

/// Type of a property without a written one, from its descriptor.
fn inferred_property_type(session: &Session, owner: &Declaration) -> Type {
    let Some(descriptor) = owner.descriptor(session) else {
        let name = owner.simple_name(session);
        return Type::Error(error_from_resolution(session, None, name.as_str()));
    };
    session.record_lookup_for_member(&descriptor);
    match descriptor.as_property() {
        Some(property) => get_ks_type_cached(session, &property.ty),
        None => {
            let name = session.name_text(descriptor.name);
            Type::Error(error_from_resolution(session, None, &name))
        }
    }
}

impl std::fmt::Debug for PropertyDeclaration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PropertyDeclaration({:?})", self.base.repr())
    }
}
