//! Host descriptors: the resolved form of a declaration.
//!
//! A descriptor exists for every declaration the host has resolved, whether
//! it came from source (then `source` points back at its syntax node) or
//! from a compiled dependency (then there is no syntax at all).
//!
//! # Design
//!
//! - Descriptors are immutable `Arc` data addressed by [`DescriptorId`]
//! - [`DescriptorTable`] indexes them by id, by qualified name and by
//!   source node, the same dual-index shape a type registry uses

use crate::{ConstantValue, HostType, Name, ProjectionVariance, SyntaxId};
use bitflags::bitflags;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Handle of a host descriptor.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[repr(transparent)]
pub struct DescriptorId(u32);

impl DescriptorId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        DescriptorId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Visibility as the host resolved it.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Internal,
    Private,
    Local,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Modality {
    #[default]
    Final,
    Open,
    Abstract,
    Sealed,
}

bitflags! {
    /// Boolean facts about a descriptor that are not visibility or modality.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct DescriptorFlags: u32 {
        const EXPECT = 1 << 0;
        const ACTUAL = 1 << 1;
        const EXTERNAL = 1 << 2;
        const SUSPEND = 1 << 3;
        const INLINE = 1 << 4;
        const OPERATOR = 1 << 5;
        const INFIX = 1 << 6;
        const TAILREC = 1 << 7;
        const LATEINIT = 1 << 8;
        const DATA = 1 << 9;
        const INNER = 1 << 10;
        const VALUE = 1 << 11;
        const FUN = 1 << 12;
        const CONST = 1 << 13;
        const COMPANION = 1 << 14;
        /// Declared in Java rather than Kotlin.
        const FROM_JAVA = 1 << 15;
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum HostClassKind {
    #[default]
    Class,
    Interface,
    Object,
    EnumClass,
    EnumEntry,
    AnnotationClass,
}

/// How a callable member came to exist in its class.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum MemberKind {
    #[default]
    Declaration,
    /// Inherited member materialized in a subclass scope.
    FakeOverride,
    Delegation,
    Synthesized,
}

/// A resolved annotation usage.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AnnotationDescriptor {
    pub annotation_type: HostType,
    /// Explicitly passed arguments, by parameter name.
    pub arguments: Vec<(Name, ConstantValue)>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParameterDescriptor {
    pub name: Name,
    pub ty: HostType,
    pub is_vararg: bool,
    pub is_crossinline: bool,
    pub is_noinline: bool,
    pub has_default: bool,
    /// Evaluated default, when the default is a compile-time constant.
    pub default_value: Option<ConstantValue>,
    pub annotations: Vec<AnnotationDescriptor>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct ClassDescriptor {
    pub kind: HostClassKind,
    pub type_parameters: Vec<DescriptorId>,
    pub supertypes: Vec<HostType>,
    /// Member functions, properties and nested classes, including fake overrides.
    pub members: Vec<DescriptorId>,
    pub constructors: Vec<DescriptorId>,
    pub primary_constructor: Option<DescriptorId>,
    pub sealed_subclasses: Vec<DescriptorId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct FunctionDescriptor {
    pub type_parameters: Vec<DescriptorId>,
    pub value_parameters: Vec<ParameterDescriptor>,
    pub return_type: Option<HostType>,
    pub receiver: Option<HostType>,
    pub has_dispatch_receiver: bool,
    pub is_constructor: bool,
    pub member_kind: MemberKind,
    /// Directly overridden members.
    pub overridden: Vec<DescriptorId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct AccessorDescriptor {
    pub visibility: Visibility,
    pub modality: Modality,
    pub flags: DescriptorFlags,
    pub annotations: Vec<AnnotationDescriptor>,
    /// No body in source; generated by the compiler.
    pub is_default: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PropertyDescriptor {
    pub type_parameters: Vec<DescriptorId>,
    pub ty: HostType,
    pub receiver: Option<HostType>,
    pub has_dispatch_receiver: bool,
    pub is_var: bool,
    pub getter: Option<AccessorDescriptor>,
    pub setter: Option<AccessorDescriptor>,
    /// The host's answer to "does this property need a backing field".
    pub backing_field_required: bool,
    pub compile_time_initializer: Option<ConstantValue>,
    pub is_delegated: bool,
    pub member_kind: MemberKind,
    pub overridden: Vec<DescriptorId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeAliasDescriptor {
    pub type_parameters: Vec<DescriptorId>,
    pub expanded: HostType,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct TypeParameterDescriptor {
    pub variance: ProjectionVariance,
    pub is_reified: bool,
    pub upper_bounds: Vec<HostType>,
    pub index: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DescriptorKind {
    Class(ClassDescriptor),
    Function(FunctionDescriptor),
    Property(PropertyDescriptor),
    TypeAlias(TypeAliasDescriptor),
    TypeParameter(TypeParameterDescriptor),
    /// Placeholder the host produces for a classifier it could not find.
    NotFound,
}

/// A resolved declaration.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Descriptor {
    pub id: DescriptorId,
    pub name: Name,
    pub qualified_name: Option<Arc<str>>,
    pub package: Arc<str>,
    pub container: Option<DescriptorId>,
    pub visibility: Visibility,
    pub modality: Modality,
    pub flags: DescriptorFlags,
    pub annotations: Vec<AnnotationDescriptor>,
    /// Syntax node this descriptor was resolved from, if source-declared.
    pub source: Option<SyntaxId>,
    pub kind: DescriptorKind,
}

impl Descriptor {
    /// Descriptor with default visibility, modality and flags.
    pub fn new(id: DescriptorId, name: Name, kind: DescriptorKind) -> Self {
        Descriptor {
            id,
            name,
            qualified_name: None,
            package: Arc::from(""),
            container: None,
            visibility: Visibility::Public,
            modality: Modality::Final,
            flags: DescriptorFlags::empty(),
            annotations: Vec::new(),
            source: None,
            kind,
        }
    }

    pub fn as_class(&self) -> Option<&ClassDescriptor> {
        match &self.kind {
            DescriptorKind::Class(class) => Some(class),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionDescriptor> {
        match &self.kind {
            DescriptorKind::Function(function) => Some(function),
            _ => None,
        }
    }

    pub fn as_property(&self) -> Option<&PropertyDescriptor> {
        match &self.kind {
            DescriptorKind::Property(property) => Some(property),
            _ => None,
        }
    }

    pub fn as_type_parameter(&self) -> Option<&TypeParameterDescriptor> {
        match &self.kind {
            DescriptorKind::TypeParameter(param) => Some(param),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, DescriptorKind::NotFound)
    }

    /// Member kind of a callable; `Declaration` for everything else.
    pub fn member_kind(&self) -> MemberKind {
        match &self.kind {
            DescriptorKind::Function(function) => function.member_kind,
            DescriptorKind::Property(property) => property.member_kind,
            _ => MemberKind::Declaration,
        }
    }

    /// Directly overridden members of a callable.
    pub fn overridden(&self) -> &[DescriptorId] {
        match &self.kind {
            DescriptorKind::Function(function) => &function.overridden,
            DescriptorKind::Property(property) => &property.overridden,
            _ => &[],
        }
    }
}

/// Registry of host descriptors.
///
/// Lookup by id is O(1); qualified names are kept in a `BTreeMap` so that
/// iteration order is deterministic.
#[derive(Clone, Debug, Default)]
pub struct DescriptorTable {
    descriptors: Vec<Arc<Descriptor>>,
    by_qualified_name: BTreeMap<Arc<str>, DescriptorId>,
    by_source: FxHashMap<SyntaxId, DescriptorId>,
}

impl DescriptorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id the next inserted descriptor will get.
    pub fn next_id(&self) -> DescriptorId {
        DescriptorId(u32::try_from(self.descriptors.len()).unwrap_or(u32::MAX))
    }

    /// Insert a descriptor built for the id it will receive.
    pub fn insert_with(&mut self, build: impl FnOnce(DescriptorId) -> Descriptor) -> DescriptorId {
        let id = self.next_id();
        let mut descriptor = build(id);
        descriptor.id = id;
        self.index(&descriptor);
        self.descriptors.push(Arc::new(descriptor));
        id
    }

    /// Replace the descriptor at `id`, keeping its id.
    ///
    /// Used to fill in members and subclasses after the descriptors they
    /// point at exist.
    pub fn update(&mut self, id: DescriptorId, edit: impl FnOnce(&mut Descriptor)) {
        let Some(slot) = self.descriptors.get_mut(id.index()) else {
            return;
        };
        let mut descriptor = Descriptor::clone(slot);
        edit(&mut descriptor);
        descriptor.id = id;
        *slot = Arc::new(descriptor.clone());
        self.index(&descriptor);
    }

    fn index(&mut self, descriptor: &Descriptor) {
        // Only classifiers are addressable by qualified name.
        if matches!(
            descriptor.kind,
            DescriptorKind::Class(_) | DescriptorKind::TypeAlias(_)
        ) {
            if let Some(name) = &descriptor.qualified_name {
                self.by_qualified_name
                    .entry(Arc::clone(name))
                    .or_insert(descriptor.id);
            }
        }
        if let Some(source) = descriptor.source {
            self.by_source.insert(source, descriptor.id);
        }
    }

    pub fn get(&self, id: DescriptorId) -> Option<Arc<Descriptor>> {
        self.descriptors.get(id.index()).cloned()
    }

    pub fn by_qualified_name(&self, name: &str) -> Option<Arc<Descriptor>> {
        self.by_qualified_name
            .get(name)
            .and_then(|&id| self.get(id))
    }

    pub fn by_source(&self, node: SyntaxId) -> Option<Arc<Descriptor>> {
        self.by_source.get(&node).and_then(|&id| self.get(id))
    }

    /// All descriptors in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Descriptor>> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
mod tests;
