//! What a type reference names.

use super::{TypeArgument, TypeReference};
use crate::cache::IdKey;
use crate::declaration::ValueParameter;
use crate::location::{Location, Origin};
use crate::session::Session;
use ksp_ir::{HostType, HostTypeData, SyntaxId, TypeConstructor};
use std::sync::Arc;

/// The element of a type reference.
#[derive(Clone, Debug)]
pub enum ReferenceElement {
    Classifier(Arc<ClassifierReference>),
    Callable(Arc<CallableReference>),
    Dynamic(Arc<DynamicReference>),
}

impl ReferenceElement {
    pub fn render(&self, session: &Session) -> String {
        match self {
            ReferenceElement::Classifier(classifier) => classifier.render(session),
            ReferenceElement::Callable(callable) => callable.render(session),
            ReferenceElement::Dynamic(_) => String::from("dynamic"),
        }
    }

    pub fn origin(&self) -> Origin {
        match self {
            ReferenceElement::Classifier(classifier) => classifier.origin(),
            ReferenceElement::Callable(_) | ReferenceElement::Dynamic(_) => Origin::Source,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
pub(crate) enum ClassifierKey {
    Syntax(SyntaxId),
    Host(IdKey<HostTypeData>),
}

#[derive(Debug)]
enum ClassifierRepr {
    Syntax(SyntaxId),
    Host(HostType),
}

/// `Outer.Inner<Arg>`: a possibly qualified class or type parameter name.
#[derive(Debug)]
pub struct ClassifierReference {
    repr: ClassifierRepr,
}

impl ClassifierReference {
    pub fn from_syntax(session: &Session, node: SyntaxId) -> Arc<ClassifierReference> {
        session
            .caches()
            .classifier_references
            .get_or_put(ClassifierKey::Syntax(node), || ClassifierReference {
                repr: ClassifierRepr::Syntax(node),
            })
    }

    /// Classifier of a host type; `None` for error types.
    pub fn from_host(session: &Session, ty: &HostType) -> Option<Arc<ClassifierReference>> {
        ty.constructor()?;
        Some(
            session
                .caches()
                .classifier_references
                .get_or_put(ClassifierKey::Host(IdKey::new(ty.arc())), || {
                    ClassifierReference {
                        repr: ClassifierRepr::Host(ty.clone()),
                    }
                }),
        )
    }

    /// The name token as written: `Inner` for `Outer.Inner`.
    pub fn referenced_name(&self, session: &Session) -> String {
        match &self.repr {
            ClassifierRepr::Syntax(node) => session
                .syntax()
                .kind(*node)
                .as_user_type()
                .and_then(|user_type| user_type.name)
                .map_or_else(String::new, |name| session.name_text(name).to_string()),
            ClassifierRepr::Host(ty) => match ty.constructor() {
                Some(TypeConstructor::Class(id) | TypeConstructor::TypeParameter(id)) => session
                    .descriptor(*id)
                    .map_or_else(String::new, |d| session.name_text(d.name).to_string()),
                Some(TypeConstructor::NotFound(name)) => name.to_string(),
                None => String::new(),
            },
        }
    }

    /// The enclosing part of a dotted reference, `Outer` for `Outer.Inner`.
    pub fn qualifier(&self, session: &Session) -> Option<Arc<ClassifierReference>> {
        let ClassifierRepr::Syntax(node) = self.repr else {
            return None;
        };
        let qualifier = session.syntax().kind(node).as_user_type()?.qualifier?;
        Some(Self::from_syntax(session, qualifier))
    }

    pub fn type_arguments(&self, session: &Session) -> Vec<Arc<TypeArgument>> {
        match &self.repr {
            ClassifierRepr::Syntax(node) => session
                .syntax()
                .kind(*node)
                .as_user_type()
                .map_or_else(Vec::new, |user_type| {
                    user_type
                        .arguments
                        .iter()
                        .map(|&argument| TypeArgument::from_syntax(session, argument))
                        .collect()
                }),
            ClassifierRepr::Host(ty) => (0..ty.arguments().len())
                .map(|index| TypeArgument::from_host(session, ty, index))
                .collect(),
        }
    }

    pub fn origin(&self) -> Origin {
        match self.repr {
            ClassifierRepr::Syntax(_) => Origin::Source,
            ClassifierRepr::Host(_) => Origin::Synthetic,
        }
    }

    pub fn location(&self, session: &Session) -> Location {
        match self.repr {
            ClassifierRepr::Syntax(node) => session.location_of(node),
            ClassifierRepr::Host(_) => Location::NoLocation,
        }
    }

    /// `Outer.Inner<A, B>`
    pub fn render(&self, session: &Session) -> String {
        let mut text = self
            .qualifier(session)
            .map(|qualifier| format!("{}.", qualifier.render(session)))
            .unwrap_or_default();
        text.push_str(&self.referenced_name(session));
        let arguments = self.type_arguments(session);
        if !arguments.is_empty() {
            let rendered: Vec<String> = arguments
                .iter()
                .map(|argument| argument.render(session))
                .collect();
            text.push('<');
            text.push_str(&rendered.join(", "));
            text.push('>');
        }
        text
    }
}

/// Function type: `Receiver.(Params) -> Return`.
#[derive(Debug)]
pub struct CallableReference {
    node: SyntaxId,
}

impl CallableReference {
    pub fn from_syntax(session: &Session, node: SyntaxId) -> Arc<CallableReference> {
        session
            .caches()
            .callable_references
            .get_or_put(node, || CallableReference { node })
    }

    pub fn node(&self) -> SyntaxId {
        self.node
    }

    pub fn receiver_type(&self, session: &Session) -> Option<Arc<TypeReference>> {
        let receiver = session.syntax().kind(self.node).as_function_type()?.receiver?;
        Some(TypeReference::from_syntax(session, receiver))
    }

    /// Parameters of the function type, each a parameter node with an
    /// optional name.
    pub fn function_parameters(&self, session: &Session) -> Vec<Arc<ValueParameter>> {
        session
            .syntax()
            .kind(self.node)
            .as_function_type()
            .map_or_else(Vec::new, |function_type| {
                function_type
                    .parameters
                    .iter()
                    .map(|&parameter| ValueParameter::from_syntax(session, parameter))
                    .collect()
            })
    }

    /// Return type; an error reference when the host tree has none.
    pub fn return_type(&self, session: &Session) -> Arc<TypeReference> {
        match session
            .syntax()
            .kind(self.node)
            .as_function_type()
            .and_then(|function_type| function_type.return_type)
        {
            Some(return_type) => TypeReference::from_syntax(session, return_type),
            None => TypeReference::error(session, Some("<missing return type>")),
        }
    }

    pub fn location(&self, session: &Session) -> Location {
        session.location_of(self.node)
    }

    /// `R.(A, B) -> C`
    pub fn render(&self, session: &Session) -> String {
        let receiver = self
            .receiver_type(session)
            .map(|receiver| format!("{}.", receiver.render(session)))
            .unwrap_or_default();
        let parameters: Vec<String> = self
            .function_parameters(session)
            .iter()
            .map(|parameter| parameter.type_ref(session).render(session))
            .collect();
        format!(
            "{receiver}({}) -> {}",
            parameters.join(", "),
            self.return_type(session).render(session)
        )
    }
}

/// The `dynamic` type of dynamically typed targets.
#[derive(Debug)]
pub struct DynamicReference {
    node: SyntaxId,
}

impl DynamicReference {
    pub fn from_syntax(session: &Session, node: SyntaxId) -> Arc<DynamicReference> {
        session
            .caches()
            .dynamic_references
            .get_or_put(node, || DynamicReference { node })
    }

    pub fn node(&self) -> SyntaxId {
        self.node
    }

    pub fn location(&self, session: &Session) -> Location {
        session.location_of(self.node)
    }
}
