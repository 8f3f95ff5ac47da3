//! Property getters and setters.

use super::modifiers::{modality_modifier, visibility_modifier};
use super::{AccessorKey, Declaration, NodeKey, PropertyDeclaration, ValueParameter};
use crate::annotation::Annotation;
use crate::expression::{local_declarations, Expression};
use crate::kinds::AnnotationUseSiteTarget;
use crate::location::{Location, Origin};
use crate::reference::TypeReference;
use crate::session::Session;
use ksp_ir::syntax::AccessorNode;
use ksp_ir::{AccessorDescriptor, Modifiers, SyntaxId};
use std::sync::Arc;

#[derive(Debug)]
enum AccessorRepr {
    Syntax(SyntaxId),
    /// An accessor the source does not write.
    Synthetic { property: NodeKey, getter: bool },
}

/// A getter or setter, written or implied.
#[derive(Debug)]
pub struct PropertyAccessor {
    repr: AccessorRepr,
}

impl PropertyAccessor {
    pub fn from_syntax(session: &Session, node: SyntaxId) -> Arc<PropertyAccessor> {
        session
            .caches()
            .accessors
            .get_or_put(AccessorKey::Syntax(node), || PropertyAccessor {
                repr: AccessorRepr::Syntax(node),
            })
    }

    pub(crate) fn synthetic(
        session: &Session,
        property: NodeKey,
        getter: bool,
    ) -> Arc<PropertyAccessor> {
        session
            .caches()
            .accessors
            .get_or_put(AccessorKey::Synthetic { property, getter }, || {
                PropertyAccessor {
                    repr: AccessorRepr::Synthetic { property, getter },
                }
            })
    }

    pub fn node(&self) -> Option<SyntaxId> {
        match self.repr {
            AccessorRepr::Syntax(node) => Some(node),
            AccessorRepr::Synthetic { .. } => None,
        }
    }

    fn syntax_node<'s>(&self, session: &'s Session) -> Option<&'s AccessorNode> {
        session.syntax().kind(self.node()?).as_accessor()
    }

    pub fn is_getter(&self, session: &Session) -> bool {
        match self.repr {
            AccessorRepr::Syntax(_) => self
                .syntax_node(session)
                .is_some_and(|accessor| accessor.is_getter),
            AccessorRepr::Synthetic { getter, .. } => getter,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self.repr, AccessorRepr::Synthetic { .. })
    }

    /// The property this accessor belongs to.
    pub fn receiver(&self, session: &Session) -> Option<Arc<PropertyDeclaration>> {
        match self.repr {
            AccessorRepr::Syntax(node) => {
                let property = session.syntax().parent(node)?;
                session.syntax().kind(property).as_property()?;
                Some(PropertyDeclaration::from_syntax(session, property))
            }
            AccessorRepr::Synthetic { property, .. } => {
                PropertyDeclaration::from_node_key(session, property)
            }
        }
    }

    /// The host's view of this accessor, from the property descriptor.
    fn host_accessor(&self, session: &Session) -> Option<AccessorDescriptor> {
        let descriptor = self.receiver(session)?.base().descriptor(session)?;
        let property = descriptor.as_property()?;
        if self.is_getter(session) {
            property.getter.clone()
        } else {
            property.setter.clone()
        }
    }

    pub fn modifiers(&self, session: &Session) -> Modifiers {
        match self.repr {
            AccessorRepr::Syntax(_) => self
                .syntax_node(session)
                .map_or_else(Modifiers::empty, |accessor| accessor.modifiers),
            AccessorRepr::Synthetic { .. } => match self.host_accessor(session) {
                Some(accessor) => {
                    visibility_modifier(accessor.visibility) | modality_modifier(accessor.modality)
                }
                None => self.receiver(session).map_or_else(Modifiers::empty, |property| {
                    property.modifiers(session) & Modifiers::VISIBILITY
                }),
            },
        }
    }

    /// Written annotations. An implied accessor reports the property's
    /// `@get:`/`@set:` annotations.
    pub fn annotations(&self, session: &Session) -> Vec<Arc<Annotation>> {
        match self.repr {
            AccessorRepr::Syntax(node) => session
                .syntax()
                .kind(node)
                .annotations()
                .iter()
                .map(|&entry| Annotation::from_syntax(session, entry))
                .collect(),
            AccessorRepr::Synthetic { getter, .. } => {
                if let Some(accessor) = self.host_accessor(session) {
                    if !accessor.annotations.is_empty() {
                        return accessor
                            .annotations
                            .iter()
                            .map(|annotation| Annotation::from_host(session, annotation))
                            .collect();
                    }
                }
                let target = if getter {
                    AnnotationUseSiteTarget::Get
                } else {
                    AnnotationUseSiteTarget::Set
                };
                self.receiver(session).map_or_else(Vec::new, |property| {
                    property
                        .annotations(session)
                        .into_iter()
                        .filter(|annotation| annotation.use_site_target(session) == Some(target))
                        .collect()
                })
            }
        }
    }

    pub fn origin(&self, session: &Session) -> Origin {
        match self.repr {
            AccessorRepr::Syntax(_) => Origin::Source,
            AccessorRepr::Synthetic { .. } => match self.receiver(session) {
                Some(property) if property.origin() == Origin::Binary => Origin::Binary,
                _ => Origin::Synthetic,
            },
        }
    }

    /// An implied accessor is reported at its property.
    pub fn location(&self, session: &Session) -> Location {
        match self.repr {
            AccessorRepr::Syntax(node) => session.location_of(node),
            AccessorRepr::Synthetic { .. } => self
                .receiver(session)
                .map_or(Location::NoLocation, |property| property.location(session)),
        }
    }

    /// Getter return type: the written one, else the property's type.
    /// `None` for setters.
    pub fn return_type(&self, session: &Session) -> Option<Arc<TypeReference>> {
        if !self.is_getter(session) {
            return None;
        }
        if let Some(return_type) = self.syntax_node(session).and_then(|a| a.return_type) {
            return Some(TypeReference::from_syntax(session, return_type));
        }
        Some(self.receiver(session)?.type_ref(session))
    }

    /// The setter's value parameter; `None` for getters.
    pub fn parameter(&self, session: &Session) -> Option<Arc<ValueParameter>> {
        if self.is_getter(session) {
            return None;
        }
        match self.repr {
            AccessorRepr::Syntax(_) => {
                let parameter = self.syntax_node(session)?.parameter?;
                Some(ValueParameter::from_syntax(session, parameter))
            }
            AccessorRepr::Synthetic { property, .. } => {
                Some(ValueParameter::setter_value(session, property))
            }
        }
    }

    pub fn body(&self, session: &Session) -> Option<Arc<Expression>> {
        let body = self.syntax_node(session)?.body?;
        Some(Expression::from_syntax(session, body))
    }

    /// Local declarations in the body.
    pub fn declarations(&self, session: &Session) -> Vec<Declaration> {
        self.syntax_node(session)
            .and_then(|accessor| accessor.body)
            .map_or_else(Vec::new, |body| local_declarations(session, body))
    }
}
