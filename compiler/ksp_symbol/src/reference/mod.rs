//! Type references: the unresolved, written form of a type.
//!
//! # Design
//!
//! A [`TypeReference`] is one of four shapes:
//!
//! - **syntax**: a type position in source, resolved through the host on
//!   first [`TypeReference::resolve`];
//! - **deferred**: no written type at all, e.g. a function whose return type
//!   is inferred from its body. It carries a resolver closure and is cached
//!   under the owning declaration's *current-round* instance;
//! - **host**: a type that came from a descriptor or a resolved type's
//!   argument list;
//! - **synthetic**: a type the model made up (the `Any` supertype default,
//!   the return type of a synthetic constructor, error placeholders).
//!
//! Every shape memoizes its resolved [`Type`], so repeated `resolve` calls
//! return equal, and for host-backed types identical, results.

mod argument;
mod element;

pub use argument::TypeArgument;
pub(crate) use argument::TypeArgumentKey;
pub use element::{CallableReference, ClassifierReference, DynamicReference, ReferenceElement};
pub(crate) use element::ClassifierKey;

use crate::annotation::Annotation;
use crate::cache::IdKey;
use crate::declaration::Declaration;
use crate::location::{Location, Origin};
use crate::session::Session;
use crate::types::{error_from_resolution, get_ks_type_cached, Type};
use ksp_ir::syntax::NodeKind;
use ksp_ir::{HostType, HostTypeData, Modifiers, SyntaxId};
use std::fmt;
use std::sync::{Arc, OnceLock};

type DeferredResolver = Box<dyn Fn(&Session) -> Type + Send + Sync>;

enum ReferenceRepr {
    Syntax(SyntaxId),
    Deferred {
        owner: Declaration,
        resolve: DeferredResolver,
    },
    Host(HostType),
    Synthetic(Type),
}

#[derive(Clone, PartialEq, Eq, Hash)]
pub(crate) enum TypeReferenceKey {
    Syntax(SyntaxId),
    /// Keyed by the current-round instance of the owning declaration.
    Deferred(Declaration),
    Host(IdKey<HostTypeData>),
    Synthetic(Type),
}

/// A written (or inferred) type position.
pub struct TypeReference {
    repr: ReferenceRepr,
    resolved: OnceLock<Type>,
}

impl TypeReference {
    fn with_repr(repr: ReferenceRepr) -> Self {
        TypeReference {
            repr,
            resolved: OnceLock::new(),
        }
    }

    pub fn from_syntax(session: &Session, node: SyntaxId) -> Arc<TypeReference> {
        session
            .caches()
            .type_references
            .get_or_put(TypeReferenceKey::Syntax(node), || {
                Self::with_repr(ReferenceRepr::Syntax(node))
            })
    }

    /// Reference whose type is computed by `resolve` from the owning
    /// declaration.
    ///
    /// `owner` is first rebound to its current-round instance; the closure
    /// receives that instance, and the reference is cached per instance.
    pub fn deferred(
        session: &Session,
        owner: &Declaration,
        resolve: fn(&Session, &Declaration) -> Type,
    ) -> Arc<TypeReference> {
        let current = session.instance_for_current_round(owner);
        session
            .caches()
            .type_references
            .get_or_put(TypeReferenceKey::Deferred(current.clone()), || {
                let captured = current.clone();
                Self::with_repr(ReferenceRepr::Deferred {
                    owner: current,
                    resolve: Box::new(move |session: &Session| resolve(session, &captured)),
                })
            })
    }

    pub fn from_host(session: &Session, ty: &HostType) -> Arc<TypeReference> {
        session
            .caches()
            .type_references
            .get_or_put(TypeReferenceKey::Host(IdKey::new(ty.arc())), || {
                Self::with_repr(ReferenceRepr::Host(ty.clone()))
            })
    }

    pub fn synthetic(session: &Session, ty: Type) -> Arc<TypeReference> {
        session
            .caches()
            .type_references
            .get_or_put(TypeReferenceKey::Synthetic(ty.clone()), || {
                Self::with_repr(ReferenceRepr::Synthetic(ty))
            })
    }

    /// Synthetic reference to an error type.
    pub fn error(session: &Session, hint: Option<&str>) -> Arc<TypeReference> {
        Self::synthetic(session, Type::Error(session.error_type(hint)))
    }

    pub fn node(&self) -> Option<SyntaxId> {
        match self.repr {
            ReferenceRepr::Syntax(node) => Some(node),
            _ => None,
        }
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self.repr, ReferenceRepr::Deferred { .. })
    }

    /// Declaration whose type this inferred reference stands for.
    pub fn deferred_owner(&self) -> Option<&Declaration> {
        match &self.repr {
            ReferenceRepr::Deferred { owner, .. } => Some(owner),
            _ => None,
        }
    }

    pub fn origin(&self) -> Origin {
        match self.repr {
            ReferenceRepr::Syntax(_) => Origin::Source,
            _ => Origin::Synthetic,
        }
    }

    pub fn location(&self, session: &Session) -> Location {
        match self.repr {
            ReferenceRepr::Syntax(node) => session.location_of(node),
            _ => Location::NoLocation,
        }
    }

    /// The resolved type. Never fails; unresolvable references give an
    /// error type.
    pub fn resolve(&self, session: &Session) -> Type {
        self.resolved
            .get_or_init(|| self.resolve_uncached(session))
            .clone()
    }

    #[tracing::instrument(level = "debug", skip_all, fields(node = ?self.node()))]
    fn resolve_uncached(&self, session: &Session) -> Type {
        match &self.repr {
            ReferenceRepr::Syntax(node) => {
                match session.resolver().resolve_type(session.syntax(), *node) {
                    Some(host) => get_ks_type_cached(session, &host),
                    None => {
                        let text = self.render(session);
                        tracing::warn!(reference = %text, "type reference did not resolve");
                        Type::Error(error_from_resolution(session, None, &text))
                    }
                }
            }
            ReferenceRepr::Deferred { resolve, .. } => resolve(session),
            ReferenceRepr::Host(host) => get_ks_type_cached(session, host),
            ReferenceRepr::Synthetic(ty) => ty.clone(),
        }
    }

    /// What the reference names: a classifier, a function type or `dynamic`.
    pub fn element(&self, session: &Session) -> Option<ReferenceElement> {
        match &self.repr {
            ReferenceRepr::Syntax(node) => {
                let mut current = session.syntax().kind(*node).as_type_reference()?.element?;
                loop {
                    match session.syntax().kind(current) {
                        NodeKind::NullableType(wrapper) | NodeKind::ParenthesizedType(wrapper) => {
                            current = wrapper.inner?;
                        }
                        NodeKind::UserType(_) => {
                            return Some(ReferenceElement::Classifier(
                                ClassifierReference::from_syntax(session, current),
                            ))
                        }
                        NodeKind::FunctionType(_) => {
                            return Some(ReferenceElement::Callable(
                                CallableReference::from_syntax(session, current),
                            ))
                        }
                        NodeKind::DynamicType => {
                            return Some(ReferenceElement::Dynamic(DynamicReference::from_syntax(
                                session, current,
                            )))
                        }
                        _ => return None,
                    }
                }
            }
            ReferenceRepr::Host(host) => ClassifierReference::from_host(session, host)
                .map(ReferenceElement::Classifier),
            ReferenceRepr::Deferred { .. } | ReferenceRepr::Synthetic(_) => {
                let resolved = self.resolve(session);
                ClassifierReference::from_host(session, resolved.host()?)
                    .map(ReferenceElement::Classifier)
            }
        }
    }

    /// Wrapper nodes between the reference and its element, outermost first.
    fn wrappers(&self, session: &Session) -> Vec<SyntaxId> {
        let ReferenceRepr::Syntax(node) = self.repr else {
            return Vec::new();
        };
        let mut out = Vec::new();
        let mut next = session
            .syntax()
            .kind(node)
            .as_type_reference()
            .and_then(|reference| reference.element);
        while let Some(current) = next {
            let Some(wrapper) = session.syntax().kind(current).as_wrapper_type() else {
                break;
            };
            out.push(current);
            next = wrapper.inner;
        }
        out
    }

    /// Annotations on the reference and on every nullable or parenthesized
    /// wrapper inside it.
    pub fn annotations(&self, session: &Session) -> Vec<Arc<Annotation>> {
        match &self.repr {
            ReferenceRepr::Syntax(node) => std::iter::once(*node)
                .chain(self.wrappers(session))
                .flat_map(|id| session.syntax().kind(id).annotations().to_vec())
                .map(|entry| Annotation::from_syntax(session, entry))
                .collect(),
            ReferenceRepr::Host(_) | ReferenceRepr::Synthetic(_) => {
                self.resolve(session).annotations(session)
            }
            ReferenceRepr::Deferred { .. } => Vec::new(),
        }
    }

    /// Modifiers on the reference and on every wrapper inside it.
    pub fn modifiers(&self, session: &Session) -> Modifiers {
        let ReferenceRepr::Syntax(node) = self.repr else {
            return Modifiers::empty();
        };
        std::iter::once(node)
            .chain(self.wrappers(session))
            .fold(Modifiers::empty(), |acc, id| {
                acc | session.syntax().kind(id).modifiers()
            })
    }

    /// Written with `?`.
    fn is_nullable_syntax(&self, session: &Session) -> bool {
        self.wrappers(session)
            .iter()
            .any(|&id| matches!(session.syntax().kind(id), NodeKind::NullableType(_)))
    }

    /// Source-like text of the reference, without resolving syntax.
    pub fn render(&self, session: &Session) -> String {
        match &self.repr {
            ReferenceRepr::Syntax(_) => {
                let mut text = self
                    .element(session)
                    .map_or_else(|| String::from("<unknown>"), |element| element.render(session));
                if self.is_nullable_syntax(session) {
                    text.push('?');
                }
                text
            }
            _ => self.resolve(session).render(session),
        }
    }
}

impl fmt::Debug for TypeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            ReferenceRepr::Syntax(node) => write!(f, "TypeReference::Syntax({node:?})"),
            ReferenceRepr::Deferred { owner, .. } => {
                write!(f, "TypeReference::Deferred({owner:?})")
            }
            ReferenceRepr::Host(host) => write!(f, "TypeReference::Host({host:?})"),
            ReferenceRepr::Synthetic(ty) => write!(f, "TypeReference::Synthetic({ty:?})"),
        }
    }
}

#[cfg(test)]
mod tests;
