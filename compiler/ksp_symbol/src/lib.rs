//! Symbol-processing model over a compiler front end.
//!
//! Processors inspect a program through the wrappers in this crate:
//! declarations, unresolved type references, resolved types, annotations
//! and a lightweight expression tree. The wrappers sit on top of the host
//! representation in [`ksp_ir`] and never expose it directly.
//!
//! # Design
//!
//! - Every wrapper is created through an identity cache owned by the
//!   [`Session`], so one host entity maps to exactly one `Arc`. Consumers
//!   may compare wrappers with `Arc::ptr_eq` or `==`.
//! - Derived facts are memoized per wrapper in `OnceLock` fields. Methods
//!   that need the host take the session as an explicit argument.
//! - Wrappers refer to their parents by key, never by owning `Arc`, so the
//!   caches hold no reference cycles.
//! - Unresolvable types become [`Type::Error`] instead of failing. Only
//!   host trees that are impossible to wrap produce a [`CompilerError`].
//! - A new processing round clears every cache. Type references inferred
//!   from a declaration are re-keyed through
//!   [`Session::instance_for_current_round`], so a wrapper kept from an
//!   earlier round still reaches the current round's answer.

mod cache;
mod error;
mod kinds;
mod location;
mod name;

pub mod annotation;
pub mod declaration;
pub mod expression;
pub mod reference;
pub mod session;
pub mod testing;
pub mod types;
pub mod visitor;

pub use annotation::{Annotation, AnnotationValue, ValueArgument};
pub use cache::{CacheRegistry, CacheStats, IdKey, IdentityCache};
pub use declaration::{
    ClassDeclaration, Declaration, FunctionDeclaration, PropertyAccessor, PropertyDeclaration,
    SourceFile, TypeAliasDeclaration, TypeParameterDeclaration, ValueParameter,
};
pub use error::CompilerError;
pub use expression::{Expression, ExpressionKind, Statement, WhenBranch};
pub use kinds::{AnnotationUseSiteTarget, ClassKind, FunctionKind, Nullability, Variance};
pub use ksp_ir::Modifiers;
pub use location::{Location, Origin};
pub use name::SymbolName;
pub use reference::{
    CallableReference, ClassifierReference, DynamicReference, ReferenceElement, TypeArgument,
    TypeReference,
};
pub use session::{Session, SessionOptions};
pub use types::{get_ks_type_cached, ErrorType, ResolvedType, Type};
pub use visitor::{Accept, Node, Visitor, VisitorVoid};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber driven by `RUST_LOG`.
///
/// Safe to call any number of times; only the first call with a valid
/// `RUST_LOG` installs anything. Use `RUST_LOG=ksp_symbol::incremental=debug` to
/// see recorded lookups.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let Ok(filter) = EnvFilter::try_from_default_env() else {
            return;
        };
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(filter)
            .init();
    });
}
