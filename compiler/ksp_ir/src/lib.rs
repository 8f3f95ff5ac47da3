//! Host representation for the symbol-processing model.
//!
//! This crate holds the data the symbol model wraps but never owns:
//!
//! - an append-only [`SyntaxArena`] of already-parsed declarations, type
//!   references and expressions, addressed by [`SyntaxId`]
//! - host [`Descriptor`]s for resolved declarations, including binary ones
//!   that have no syntax at all
//! - [`HostType`], the host's resolved type, and its textual renderer
//! - the upstream capabilities the model calls: [`Resolver`] and
//!   [`LookupTracker`]
//!
//! # Design
//!
//! Everything here is plain data behind `Arc`s or `u32` handles. The arena
//! only ever grows: a new processing round clones the previous arena and
//! appends re-parsed files, so handles from an older round stay readable.

mod constant;
mod descriptor;
mod host_type;
mod interner;
mod modifiers;
mod resolver;
mod span;
pub mod syntax;

pub use constant::ConstantValue;
pub use descriptor::{
    AccessorDescriptor, AnnotationDescriptor, ClassDescriptor, Descriptor, DescriptorFlags,
    DescriptorId, DescriptorKind, DescriptorTable, FunctionDescriptor, HostClassKind, MemberKind,
    Modality, ParameterDescriptor, PropertyDescriptor, TypeAliasDescriptor,
    TypeParameterDescriptor, Visibility,
};
pub use host_type::{
    render_type, HostNullability, HostType, HostTypeData, ProjectionVariance, TypeConstructor,
    TypeDiagnostic, TypeProjection,
};
pub use interner::{InternError, Name, SharedInterner, StringInterner};
pub use modifiers::Modifiers;
pub use resolver::{Builtin, DescriptorSource, LookupTracker, NoopTracker, Resolver};
pub use span::{LineIndex, Span};
pub use syntax::{NodeKind, SyntaxArena, SyntaxId, SyntaxNode};
