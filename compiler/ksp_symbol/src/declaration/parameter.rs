//! Value parameters of functions, constructors, setters and function types.

use super::{Declaration, NodeKey, ParameterKey, PropertyDeclaration};
use crate::annotation::Annotation;
use crate::expression::Expression;
use crate::location::{Location, Origin};
use crate::name::SymbolName;
use crate::reference::TypeReference;
use crate::session::Session;
use ksp_ir::syntax::{ParameterBinding, ParameterNode};
use ksp_ir::{Descriptor, Modifiers, ParameterDescriptor, SyntaxId};
use std::sync::Arc;

enum ParameterRepr {
    Syntax(SyntaxId),
    Descriptor {
        function: Arc<Descriptor>,
        index: usize,
    },
    /// `value` of an implied setter.
    SetterValue { property: NodeKey },
}

pub struct ValueParameter {
    repr: ParameterRepr,
}

impl ValueParameter {
    pub fn from_syntax(session: &Session, node: SyntaxId) -> Arc<ValueParameter> {
        session
            .caches()
            .parameters
            .get_or_put(ParameterKey::Syntax(node), || ValueParameter {
                repr: ParameterRepr::Syntax(node),
            })
    }

    /// The `index`th parameter of a binary function.
    pub(crate) fn from_descriptor(
        session: &Session,
        function: &Arc<Descriptor>,
        index: usize,
    ) -> Arc<ValueParameter> {
        let key = ParameterKey::Descriptor {
            function: function.id,
            index,
        };
        session.caches().parameters.get_or_put(key, || ValueParameter {
            repr: ParameterRepr::Descriptor {
                function: Arc::clone(function),
                index,
            },
        })
    }

    pub(crate) fn setter_value(session: &Session, property: NodeKey) -> Arc<ValueParameter> {
        session
            .caches()
            .parameters
            .get_or_put(ParameterKey::SetterValue { property }, || ValueParameter {
                repr: ParameterRepr::SetterValue { property },
            })
    }

    pub fn node(&self) -> Option<SyntaxId> {
        match self.repr {
            ParameterRepr::Syntax(node) => Some(node),
            _ => None,
        }
    }

    fn syntax_node<'s>(&self, session: &'s Session) -> Option<&'s ParameterNode> {
        session.syntax().kind(self.node()?).as_parameter()
    }

    fn host(&self) -> Option<&ParameterDescriptor> {
        match &self.repr {
            ParameterRepr::Descriptor { function, index } => {
                function.as_function()?.value_parameters.get(*index)
            }
            _ => None,
        }
    }

    /// `None` for unnamed function-type parameters.
    pub fn name(&self, session: &Session) -> Option<SymbolName> {
        match &self.repr {
            ParameterRepr::Syntax(_) => self
                .syntax_node(session)?
                .name
                .map(|name| SymbolName::from(session.name_text(name))),
            ParameterRepr::Descriptor { .. } => {
                Some(SymbolName::from(session.name_text(self.host()?.name)))
            }
            ParameterRepr::SetterValue { .. } => Some(SymbolName::new("value")),
        }
    }

    /// Declared type; an error reference when none is written.
    pub fn type_ref(&self, session: &Session) -> Arc<TypeReference> {
        match &self.repr {
            ParameterRepr::Syntax(_) => {
                match self.syntax_node(session).and_then(|parameter| parameter.type_ref) {
                    Some(type_ref) => TypeReference::from_syntax(session, type_ref),
                    None => {
                        let name = self.name(session);
                        TypeReference::error(session, name.as_ref().map(SymbolName::as_str))
                    }
                }
            }
            ParameterRepr::Descriptor { .. } => match self.host() {
                Some(parameter) => TypeReference::from_host(session, &parameter.ty),
                None => TypeReference::error(session, None),
            },
            ParameterRepr::SetterValue { property } => {
                match PropertyDeclaration::from_node_key(session, *property) {
                    Some(property) => property.type_ref(session),
                    None => TypeReference::error(session, Some("value")),
                }
            }
        }
    }

    fn has_modifier(&self, session: &Session, modifier: Modifiers) -> bool {
        self.syntax_node(session)
            .is_some_and(|parameter| parameter.modifiers.contains(modifier))
    }

    pub fn is_vararg(&self, session: &Session) -> bool {
        self.host().map_or_else(
            || self.has_modifier(session, Modifiers::VARARG),
            |parameter| parameter.is_vararg,
        )
    }

    pub fn is_noinline(&self, session: &Session) -> bool {
        self.host().map_or_else(
            || self.has_modifier(session, Modifiers::NOINLINE),
            |parameter| parameter.is_noinline,
        )
    }

    pub fn is_crossinline(&self, session: &Session) -> bool {
        self.host().map_or_else(
            || self.has_modifier(session, Modifiers::CROSSINLINE),
            |parameter| parameter.is_crossinline,
        )
    }

    /// Declared with `val` in a primary constructor.
    pub fn is_val(&self, session: &Session) -> bool {
        self.syntax_node(session)
            .is_some_and(|parameter| parameter.binding == Some(ParameterBinding::Val))
    }

    /// Declared with `var` in a primary constructor.
    pub fn is_var(&self, session: &Session) -> bool {
        self.syntax_node(session)
            .is_some_and(|parameter| parameter.binding == Some(ParameterBinding::Var))
    }

    pub fn has_default(&self, session: &Session) -> bool {
        match self.host() {
            Some(parameter) => parameter.has_default,
            None => self
                .syntax_node(session)
                .is_some_and(|parameter| parameter.default_value.is_some()),
        }
    }

    /// The default value expression as written.
    pub fn default_value(&self, session: &Session) -> Option<Arc<Expression>> {
        let value = self.syntax_node(session)?.default_value?;
        Some(Expression::from_syntax(session, value))
    }

    pub fn annotations(&self, session: &Session) -> Vec<Arc<Annotation>> {
        match &self.repr {
            ParameterRepr::Syntax(node) => session
                .syntax()
                .kind(*node)
                .annotations()
                .iter()
                .map(|&entry| Annotation::from_syntax(session, entry))
                .collect(),
            ParameterRepr::Descriptor { .. } => self.host().map_or_else(Vec::new, |parameter| {
                parameter
                    .annotations
                    .iter()
                    .map(|annotation| Annotation::from_host(session, annotation))
                    .collect()
            }),
            ParameterRepr::SetterValue { .. } => Vec::new(),
        }
    }

    pub fn origin(&self) -> Origin {
        match self.repr {
            ParameterRepr::Syntax(_) => Origin::Source,
            ParameterRepr::Descriptor { .. } => Origin::Binary,
            ParameterRepr::SetterValue { .. } => Origin::Synthetic,
        }
    }

    pub fn location(&self, session: &Session) -> Location {
        match self.repr {
            ParameterRepr::Syntax(node) => session.location_of(node),
            _ => Location::NoLocation,
        }
    }

    /// The function (or, for a setter value, the property) declaring this
    /// parameter.
    pub fn parent_declaration(&self, session: &Session) -> Option<Declaration> {
        match &self.repr {
            ParameterRepr::Syntax(node) => {
                let parent = session.syntax().parent(*node)?;
                Declaration::from_syntax(session, parent)
            }
            ParameterRepr::Descriptor { function, .. } => {
                Declaration::from_descriptor(session, function)
            }
            ParameterRepr::SetterValue { property } => {
                PropertyDeclaration::from_node_key(session, *property).map(Declaration::Property)
            }
        }
    }
}

impl std::fmt::Debug for ValueParameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.repr {
            ParameterRepr::Syntax(node) => write!(f, "ValueParameter::Syntax({node:?})"),
            ParameterRepr::Descriptor { function, index } => {
                write!(f, "ValueParameter::Descriptor(#{}, {index})", function.id.raw())
            }
            ParameterRepr::SetterValue { property } => {
                write!(f, "ValueParameter::SetterValue({property:?})")
            }
        }
    }
}
