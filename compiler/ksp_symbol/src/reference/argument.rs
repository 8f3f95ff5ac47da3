//! Type arguments: `out T`, `*`, `Int`.

use super::TypeReference;
use crate::annotation::Annotation;
use crate::cache::IdKey;
use crate::kinds::Variance;
use crate::location::{Location, Origin};
use crate::session::Session;
use ksp_ir::syntax::ProjectionKind;
use ksp_ir::{HostType, HostTypeData, SyntaxId, TypeProjection};
use std::sync::Arc;

#[derive(Clone, PartialEq, Eq, Hash)]
pub(crate) enum TypeArgumentKey {
    Syntax(SyntaxId),
    Host {
        ty: IdKey<HostTypeData>,
        index: usize,
    },
    Lite {
        reference: IdKey<TypeReference>,
        variance: Variance,
    },
}

#[derive(Debug)]
enum ArgumentRepr {
    Syntax(SyntaxId),
    /// The `index`th argument of a host type.
    Host { ty: HostType, index: usize },
    /// Built by a processor around an existing reference.
    Lite {
        reference: Arc<TypeReference>,
        variance: Variance,
    },
}

/// One type argument with its use-site variance.
#[derive(Debug)]
pub struct TypeArgument {
    repr: ArgumentRepr,
}

impl TypeArgument {
    pub fn from_syntax(session: &Session, node: SyntaxId) -> Arc<TypeArgument> {
        session
            .caches()
            .type_arguments
            .get_or_put(TypeArgumentKey::Syntax(node), || TypeArgument {
                repr: ArgumentRepr::Syntax(node),
            })
    }

    pub(crate) fn from_host(session: &Session, ty: &HostType, index: usize) -> Arc<TypeArgument> {
        let key = TypeArgumentKey::Host {
            ty: IdKey::new(ty.arc()),
            index,
        };
        session.caches().type_arguments.get_or_put(key, || TypeArgument {
            repr: ArgumentRepr::Host {
                ty: ty.clone(),
                index,
            },
        })
    }

    pub(crate) fn lite(
        session: &Session,
        reference: &Arc<TypeReference>,
        variance: Variance,
    ) -> Arc<TypeArgument> {
        let key = TypeArgumentKey::Lite {
            reference: IdKey::new(reference),
            variance,
        };
        session.caches().type_arguments.get_or_put(key, || TypeArgument {
            repr: ArgumentRepr::Lite {
                reference: Arc::clone(reference),
                variance,
            },
        })
    }

    fn host_projection(ty: &HostType, index: usize) -> Option<&TypeProjection> {
        ty.arguments().get(index)
    }

    pub fn variance(&self, session: &Session) -> Variance {
        match &self.repr {
            ArgumentRepr::Syntax(node) => {
                match session.syntax().kind(*node).as_type_projection() {
                    Some(projection) => match projection.kind {
                        ProjectionKind::Invariant => Variance::Invariant,
                        ProjectionKind::In => Variance::Contravariant,
                        ProjectionKind::Out => Variance::Covariant,
                        ProjectionKind::Star => Variance::Star,
                    },
                    None => Variance::Invariant,
                }
            }
            ArgumentRepr::Host { ty, index } => match Self::host_projection(ty, *index) {
                Some(TypeProjection::Type { variance, .. }) => (*variance).into(),
                Some(TypeProjection::Star) | None => Variance::Star,
            },
            ArgumentRepr::Lite { variance, .. } => *variance,
        }
    }

    /// The argument's type; `None` for `*`.
    pub fn type_ref(&self, session: &Session) -> Option<Arc<TypeReference>> {
        match &self.repr {
            ArgumentRepr::Syntax(node) => {
                let projection = session.syntax().kind(*node).as_type_projection()?;
                if projection.kind == ProjectionKind::Star {
                    return None;
                }
                Some(TypeReference::from_syntax(session, projection.type_ref?))
            }
            ArgumentRepr::Host { ty, index } => {
                let argument = Self::host_projection(ty, *index)?.ty()?;
                Some(TypeReference::from_host(session, argument))
            }
            ArgumentRepr::Lite {
                reference,
                variance,
            } => (*variance != Variance::Star).then(|| Arc::clone(reference)),
        }
    }

    pub fn annotations(&self, session: &Session) -> Vec<Arc<Annotation>> {
        match self.repr {
            ArgumentRepr::Syntax(node) => session
                .syntax()
                .kind(node)
                .annotations()
                .iter()
                .map(|&entry| Annotation::from_syntax(session, entry))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn origin(&self) -> Origin {
        match self.repr {
            ArgumentRepr::Syntax(_) => Origin::Source,
            _ => Origin::Synthetic,
        }
    }

    pub fn location(&self, session: &Session) -> Location {
        match self.repr {
            ArgumentRepr::Syntax(node) => session.location_of(node),
            _ => Location::NoLocation,
        }
    }

    /// `*`, `out Int` or `Int`.
    pub fn render(&self, session: &Session) -> String {
        let variance = self.variance(session);
        if variance == Variance::Star {
            return String::from("*");
        }
        let ty = self
            .type_ref(session)
            .map_or_else(|| String::from("<unknown>"), |reference| reference.render(session));
        match variance {
            Variance::Invariant | Variance::Star => ty,
            Variance::Covariant | Variance::Contravariant => format!("{variance} {ty}"),
        }
    }
}
