//! Resolved types.
//!
//! # Design
//!
//! - [`Type`] is either a cached [`ResolvedType`] over a host type or an
//!   [`ErrorType`]. Consumers never get a failure from a type operation;
//!   they get an error type and can test [`Type::is_error`].
//! - [`get_ks_type_cached`] is the only way to wrap a host type. It keys the
//!   cache on the host type's allocation, not its value, so two equal host
//!   types built separately get separate wrappers while repeated questions
//!   about one host answer get the same wrapper.
//! - Equality of [`Type`] is structural on the host type.

mod error;
mod flexible;

pub use error::ErrorType;
pub(crate) use error::{diagnostic_hint, error_from_resolution};

use crate::annotation::Annotation;
use crate::cache::IdKey;
use crate::declaration::{ClassDeclaration, Declaration};
use crate::kinds::{Nullability, Variance};
use crate::reference::TypeArgument;
use crate::session::Session;
use ksp_ir::{HostType, ProjectionVariance, TypeConstructor, TypeProjection};
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

/// Wrap a host type, returning the error type for failed resolutions and
/// for types whose classifier the host could not find.
pub fn get_ks_type_cached(session: &Session, host: &HostType) -> Type {
    if let Some(diagnostic) = host.diagnostic() {
        return Type::Error(session.error_type(Some(&diagnostic_hint(diagnostic))));
    }
    if let Some(name) = not_found_name(session, host) {
        return Type::Error(session.error_type(Some(&name)));
    }
    Type::Resolved(
        session
            .caches()
            .types
            .get_or_put(IdKey::new(host.arc()), || ResolvedType::new(host.clone())),
    )
}

/// Name of the missing classifier, if the host found none.
fn not_found_name(session: &Session, host: &HostType) -> Option<String> {
    match host.constructor()? {
        TypeConstructor::NotFound(name) => Some(name.to_string()),
        TypeConstructor::Class(id) | TypeConstructor::TypeParameter(id) => {
            match session.descriptor(*id) {
                None => Some(format!("<unknown {}>", id.raw())),
                Some(descriptor) if descriptor.is_not_found() => Some(
                    descriptor
                        .qualified_name
                        .as_deref()
                        .map_or_else(|| session.name_text(descriptor.name).to_string(), str::to_owned),
                ),
                Some(_) => None,
            }
        }
    }
}

/// A host type the resolver produced, wrapped once per host allocation.
pub struct ResolvedType {
    host: HostType,
    nullable: OnceLock<HostType>,
    not_nullable: OnceLock<HostType>,
    star_projected: OnceLock<HostType>,
    rendered: OnceLock<String>,
}

impl ResolvedType {
    fn new(host: HostType) -> Self {
        ResolvedType {
            host,
            nullable: OnceLock::new(),
            not_nullable: OnceLock::new(),
            star_projected: OnceLock::new(),
            rendered: OnceLock::new(),
        }
    }

    pub fn host(&self) -> &HostType {
        &self.host
    }

    pub fn render(&self, session: &Session) -> &str {
        self.rendered.get_or_init(|| session.render_host(&self.host))
    }
}

impl std::fmt::Debug for ResolvedType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ResolvedType").field(&self.host).finish()
    }
}

/// A resolved type or the error type.
#[derive(Clone, Debug)]
pub enum Type {
    Resolved(Arc<ResolvedType>),
    Error(ErrorType),
}

impl Type {
    pub fn is_error(&self) -> bool {
        matches!(self, Type::Error(_))
    }

    pub fn as_resolved(&self) -> Option<&Arc<ResolvedType>> {
        match self {
            Type::Resolved(resolved) => Some(resolved),
            Type::Error(_) => None,
        }
    }

    pub fn as_error(&self) -> Option<&ErrorType> {
        match self {
            Type::Error(error) => Some(error),
            Type::Resolved(_) => None,
        }
    }

    pub fn host(&self) -> Option<&HostType> {
        self.as_resolved().map(|resolved| &resolved.host)
    }

    /// Classifier of the type; the error class for error types.
    pub fn declaration(&self, session: &Session) -> Declaration {
        let error_class =
            |hint: Option<Arc<str>>| Declaration::Class(ClassDeclaration::error(session, hint));
        let Type::Resolved(resolved) = self else {
            let hint = self.as_error().and_then(ErrorType::hint_arc);
            return error_class(hint);
        };
        let id = match resolved.host.constructor() {
            Some(TypeConstructor::Class(id) | TypeConstructor::TypeParameter(id)) => *id,
            _ => return error_class(Some(Arc::from(resolved.render(session)))),
        };
        session
            .descriptor(id)
            .and_then(|descriptor| Declaration::from_descriptor(session, &descriptor))
            .unwrap_or_else(|| error_class(Some(Arc::from(resolved.render(session)))))
    }

    pub fn arguments(&self, session: &Session) -> Vec<Arc<TypeArgument>> {
        let Type::Resolved(resolved) = self else {
            return Vec::new();
        };
        (0..resolved.host.arguments().len())
            .map(|index| TypeArgument::from_host(session, &resolved.host, index))
            .collect()
    }

    /// Type annotations carried by the host type.
    pub fn annotations(&self, session: &Session) -> Vec<Arc<Annotation>> {
        self.host().map_or_else(Vec::new, |host| {
            host.annotations()
                .iter()
                .map(|annotation| Annotation::from_host(session, annotation))
                .collect()
        })
    }

    pub fn nullability(&self) -> Nullability {
        match self {
            Type::Resolved(resolved) => resolved.host.nullability().into(),
            Type::Error(_) => Nullability::Nullable,
        }
    }

    /// Written with `?`.
    pub fn is_marked_nullable(&self) -> bool {
        match self {
            Type::Resolved(resolved) => resolved.host.is_marked_nullable(),
            Type::Error(_) => true,
        }
    }

    pub fn is_function_type(&self, session: &Session) -> bool {
        self.class_qualified_name(session).is_some_and(|name| {
            numbered(&name, "kotlin.Function") || numbered(&name, "kotlin.reflect.KFunction")
        })
    }

    pub fn is_suspend_function_type(&self, session: &Session) -> bool {
        self.class_qualified_name(session).is_some_and(|name| {
            numbered(&name, "kotlin.coroutines.SuspendFunction")
                || numbered(&name, "kotlin.reflect.KSuspendFunction")
        })
    }

    fn class_qualified_name(&self, session: &Session) -> Option<Arc<str>> {
        let Some(TypeConstructor::Class(id)) = self.host()?.constructor() else {
            return None;
        };
        session.descriptor(*id)?.qualified_name.clone()
    }

    #[must_use]
    pub fn make_nullable(&self, session: &Session) -> Type {
        match self {
            Type::Resolved(resolved) => {
                let host = resolved
                    .nullable
                    .get_or_init(|| resolved.host.make_nullable());
                get_ks_type_cached(session, host)
            }
            Type::Error(_) => self.clone(),
        }
    }

    #[must_use]
    pub fn make_not_nullable(&self, session: &Session) -> Type {
        match self {
            Type::Resolved(resolved) => {
                let host = resolved
                    .not_nullable
                    .get_or_init(|| resolved.host.make_not_nullable());
                get_ks_type_cached(session, host)
            }
            Type::Error(_) => self.clone(),
        }
    }

    /// Every type argument replaced by `*`.
    #[must_use]
    pub fn star_projection(&self, session: &Session) -> Type {
        match self {
            Type::Resolved(resolved) => {
                let host = resolved
                    .star_projected
                    .get_or_init(|| resolved.host.star_projection());
                get_ks_type_cached(session, host)
            }
            Type::Error(_) => self.clone(),
        }
    }

    /// Substitute the type arguments.
    ///
    /// Returns an error type when an argument does not resolve or the count
    /// does not match the type's parameters.
    #[must_use]
    pub fn replace(&self, session: &Session, arguments: &[Arc<TypeArgument>]) -> Type {
        let Type::Resolved(resolved) = self else {
            return self.clone();
        };
        let mut projections = Vec::with_capacity(arguments.len());
        for argument in arguments {
            let variance = match argument.variance(session) {
                Variance::Star => {
                    projections.push(TypeProjection::Star);
                    continue;
                }
                Variance::Invariant => ProjectionVariance::Invariant,
                Variance::Covariant => ProjectionVariance::Out,
                Variance::Contravariant => ProjectionVariance::In,
            };
            let Some(reference) = argument.type_ref(session) else {
                projections.push(TypeProjection::Star);
                continue;
            };
            match reference.resolve(session) {
                Type::Resolved(ty) => projections.push(TypeProjection::Type {
                    variance,
                    ty: ty.host.clone(),
                }),
                error @ Type::Error(_) => return error,
            }
        }
        match resolved.host.replace_arguments(projections) {
            Some(host) => get_ks_type_cached(session, &host),
            None => {
                tracing::debug!(
                    ty = resolved.render(session),
                    found = arguments.len(),
                    "type argument count mismatch"
                );
                Type::Error(error_from_resolution(session, Some(self), ""))
            }
        }
    }

    /// Whether a value of `that` can be assigned to this type.
    ///
    /// Records a supertype lookup of `that`: a change anywhere in its
    /// supertype hierarchy can change the answer.
    pub fn is_assignable_from(&self, session: &Session, that: &Type) -> bool {
        let (Type::Resolved(this), Type::Resolved(that)) = (self, that) else {
            return false;
        };
        session.record_lookup_with_supertypes(&that.host);
        session.resolver().is_subtype(&that.host, &this.host)
    }

    pub fn is_mutability_flexible(&self, session: &Session) -> bool {
        match self {
            Type::Resolved(resolved) => flexible::is_mutability_flexible(resolved.render(session)),
            Type::Error(_) => false,
        }
    }

    pub fn is_covariance_flexible(&self, session: &Session) -> bool {
        match self {
            Type::Resolved(resolved) => flexible::is_covariance_flexible(resolved.render(session)),
            Type::Error(_) => false,
        }
    }

    pub fn render(&self, session: &Session) -> String {
        match self {
            Type::Resolved(resolved) => resolved.render(session).to_owned(),
            Type::Error(error) => error.to_string(),
        }
    }
}

/// `prefix` followed by one or more digits.
fn numbered(name: &str, prefix: &str) -> bool {
    name.strip_prefix(prefix)
        .is_some_and(|arity| !arity.is_empty() && arity.bytes().all(|b| b.is_ascii_digit()))
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Type::Resolved(a), Type::Resolved(b)) => Arc::ptr_eq(a, b) || a.host == b.host,
            (Type::Error(a), Type::Error(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Type {}

impl Hash for Type {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Type::Resolved(resolved) => {
                0u8.hash(state);
                resolved.host.hash(state);
            }
            Type::Error(error) => {
                1u8.hash(state);
                error.hash(state);
            }
        }
    }
}

#[cfg(test)]
mod tests;
