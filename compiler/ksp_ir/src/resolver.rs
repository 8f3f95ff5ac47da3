//! Upstream capabilities the symbol model calls into.
//!
//! The model never parses, infers or searches a classpath itself. Every
//! semantic question goes through [`Resolver`], and every dependency the
//! incremental build needs to know about is reported to [`LookupTracker`].
//! Both may answer "not found"; neither is expected to fail.

use crate::{
    AnnotationDescriptor, ConstantValue, Descriptor, DescriptorId, HostType, Name, SyntaxArena,
    SyntaxId,
};
use std::sync::Arc;

/// Read access to descriptors and the names they use.
pub trait DescriptorSource {
    fn descriptor(&self, id: DescriptorId) -> Option<Arc<Descriptor>>;

    /// Text of a name used inside descriptors.
    fn name_text(&self, name: Name) -> Arc<str>;
}

/// Types every program has.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Builtin {
    /// The universal top type.
    Any,
    Nothing,
    Unit,
}

/// The host's resolution capability.
///
/// All methods are synchronous and may be expensive. Implementations should
/// return the same [`HostType`] handle for repeated questions about the same
/// node, since the model keys its type cache on handle identity.
pub trait Resolver: DescriptorSource + Send + Sync {
    /// Descriptor of a declaration node (class, function, property,
    /// constructor parameter, type alias, type parameter).
    fn resolve_declaration(&self, syntax: &SyntaxArena, node: SyntaxId)
        -> Option<Arc<Descriptor>>;

    /// Resolve a type-reference node. `None` means no answer at all; an
    /// answer that failed is an error-flavoured [`HostType`].
    fn resolve_type(&self, syntax: &SyntaxArena, type_ref: SyntaxId) -> Option<HostType>;

    fn resolve_annotation_entry(
        &self,
        syntax: &SyntaxArena,
        entry: SyntaxId,
    ) -> Option<AnnotationDescriptor>;

    /// Evaluate a compile-time constant expression.
    fn resolve_constant(&self, syntax: &SyntaxArena, expression: SyntaxId)
        -> Option<ConstantValue>;

    /// Type of an arbitrary expression, when the host computed one.
    fn resolve_expression_type(
        &self,
        _syntax: &SyntaxArena,
        _expression: SyntaxId,
    ) -> Option<HostType> {
        None
    }

    /// Class or type alias by fully qualified name, from source or classpath.
    fn find_class(&self, syntax: &SyntaxArena, qualified_name: &str) -> Option<Arc<Descriptor>>;

    /// Top-level functions and properties by fully qualified name.
    fn find_callables(&self, _syntax: &SyntaxArena, _qualified_name: &str) -> Vec<Arc<Descriptor>> {
        Vec::new()
    }

    fn is_subtype(&self, sub: &HostType, sup: &HostType) -> bool;

    fn builtin_type(&self, builtin: Builtin) -> HostType;

    /// The node that stands for `node` in the current round. Returns `node`
    /// itself when it is still valid, another node when its file was
    /// re-parsed, `None` when it is gone.
    fn current_round_node(&self, _syntax: &SyntaxArena, node: SyntaxId) -> Option<SyntaxId> {
        Some(node)
    }

    /// `expect` counterparts of an `actual` declaration, or the reverse.
    fn expect_actual_counterparts(&self, _descriptor: &Descriptor) -> Vec<DescriptorId> {
        Vec::new()
    }
}

/// Dependency-recording hooks for the incremental build.
pub trait LookupTracker: Send + Sync {
    /// A subtyping question was asked about `ty`; any change to its
    /// supertypes must invalidate the asker.
    fn record_lookup_with_supertypes(&self, ty: &HostType);

    /// The sealed subclasses of the named class were enumerated.
    fn record_get_sealed_subclasses(&self, class_name: &str);

    /// A member was looked up by resolution (property type, override chain).
    fn record_lookup_for_member(&self, _member: &Descriptor) {}
}

/// Tracker that records nothing, for non-incremental builds.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopTracker;

impl LookupTracker for NoopTracker {
    fn record_lookup_with_supertypes(&self, _ty: &HostType) {}

    fn record_get_sealed_subclasses(&self, _class_name: &str) {}
}
