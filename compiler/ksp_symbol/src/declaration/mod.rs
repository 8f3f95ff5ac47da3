//! Declarations: classes, functions, properties, type aliases, type
//! parameters, plus the files, accessors and value parameters around them.
//!
//! # Design
//!
//! - Every declaration wrapper is built on a [`DeclarationBase`] that knows
//!   whether the wrapper stands for a syntax node, a binary descriptor, or
//!   something the model synthesized, and answers the shared questions
//!   (names, parent, file, annotations, modifiers, doc) uniformly.
//! - [`Declaration`] is the closed set of declaration kinds. It compares and
//!   hashes by wrapper identity, which the identity caches make equivalent
//!   to comparing the underlying host entities.
//! - Source declarations that the host also resolved to a descriptor are
//!   always wrapped from their syntax node, so reaching a declaration
//!   through a resolved type gives the same wrapper as reaching it through
//!   its file.

mod accessor;
mod base;
mod class;
mod doc;
mod expect_actual;
mod file;
mod function;
mod modifiers;
mod parameter;
mod property;
mod type_alias;
mod type_parameter;

pub use accessor::PropertyAccessor;
pub(crate) use base::DeclarationBase;
pub use class::ClassDeclaration;
pub use file::SourceFile;
pub use function::FunctionDeclaration;
pub use parameter::ValueParameter;
pub use property::PropertyDeclaration;
pub use type_alias::TypeAliasDeclaration;
pub use type_parameter::TypeParameterDeclaration;

use crate::annotation::Annotation;
use crate::location::{Location, Origin};
use crate::name::SymbolName;
use crate::session::Session;
use ksp_ir::syntax::{FunctionForm, NodeKind};
use ksp_ir::{Descriptor, DescriptorId, DescriptorKind, Modifiers, SyntaxId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A host entity a declaration wrapper stands for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum NodeKey {
    Syntax(SyntaxId),
    Descriptor(DescriptorId),
}

#[derive(Clone, PartialEq, Eq, Hash)]
pub(crate) enum ClassKey {
    Node(NodeKey),
    /// The classifier reported for an error type with this hint.
    ErrorType(Option<Arc<str>>),
}

#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub(crate) enum FunctionKey {
    Node(NodeKey),
    /// No-argument constructor of the class at this key.
    SyntheticConstructor(NodeKey),
}

#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub(crate) enum AccessorKey {
    Syntax(SyntaxId),
    Synthetic { property: NodeKey, getter: bool },
}

#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub(crate) enum ParameterKey {
    Syntax(SyntaxId),
    Descriptor { function: DescriptorId, index: usize },
    /// `value` parameter of a synthetic setter.
    SetterValue { property: NodeKey },
}

/// Any declaration.
#[derive(Clone)]
pub enum Declaration {
    Class(Arc<ClassDeclaration>),
    Function(Arc<FunctionDeclaration>),
    Property(Arc<PropertyDeclaration>),
    TypeAlias(Arc<TypeAliasDeclaration>),
    TypeParameter(Arc<TypeParameterDeclaration>),
}

macro_rules! dispatch {
    ($self:ident, $d:ident => $body:expr) => {
        match $self {
            Declaration::Class($d) => $body,
            Declaration::Function($d) => $body,
            Declaration::Property($d) => $body,
            Declaration::TypeAlias($d) => $body,
            Declaration::TypeParameter($d) => $body,
        }
    };
}

impl Declaration {
    /// Wrapper for a declaration node; `None` for any other node kind.
    ///
    /// A `val`/`var` parameter of a primary constructor is a property.
    pub fn from_syntax(session: &Session, node: SyntaxId) -> Option<Declaration> {
        let syntax = session.syntax();
        Some(match syntax.get(node).map(|n| &n.kind)? {
            NodeKind::Class(_) => Declaration::Class(ClassDeclaration::from_syntax(session, node)),
            NodeKind::Function(_) => {
                Declaration::Function(FunctionDeclaration::from_syntax(session, node))
            }
            NodeKind::Property(_) => {
                Declaration::Property(PropertyDeclaration::from_syntax(session, node))
            }
            NodeKind::Parameter(parameter) if parameter.binding.is_some() => {
                let in_primary_constructor = syntax
                    .parent(node)
                    .and_then(|parent| syntax.kind(parent).as_function())
                    .is_some_and(|function| function.form == FunctionForm::PrimaryConstructor);
                if !in_primary_constructor {
                    return None;
                }
                Declaration::Property(PropertyDeclaration::from_syntax(session, node))
            }
            NodeKind::TypeAlias(_) => {
                Declaration::TypeAlias(TypeAliasDeclaration::from_syntax(session, node))
            }
            NodeKind::TypeParameter(_) => {
                Declaration::TypeParameter(TypeParameterDeclaration::from_syntax(session, node))
            }
            _ => return None,
        })
    }

    /// Wrapper for a descriptor; source-declared descriptors map to their
    /// syntax wrapper. `None` for not-found placeholders.
    pub fn from_descriptor(session: &Session, descriptor: &Arc<Descriptor>) -> Option<Declaration> {
        Some(match descriptor.kind {
            DescriptorKind::Class(_) => {
                Declaration::Class(ClassDeclaration::from_descriptor(session, descriptor))
            }
            DescriptorKind::Function(_) => {
                Declaration::Function(FunctionDeclaration::from_descriptor(session, descriptor))
            }
            DescriptorKind::Property(_) => {
                Declaration::Property(PropertyDeclaration::from_descriptor(session, descriptor))
            }
            DescriptorKind::TypeAlias(_) => {
                Declaration::TypeAlias(TypeAliasDeclaration::from_descriptor(session, descriptor))
            }
            DescriptorKind::TypeParameter(_) => Declaration::TypeParameter(
                TypeParameterDeclaration::from_descriptor(session, descriptor),
            ),
            DescriptorKind::NotFound => return None,
        })
    }

    pub(crate) fn base(&self) -> &DeclarationBase {
        dispatch!(self, d => d.base())
    }

    /// Syntax node of a source declaration.
    pub fn node(&self) -> Option<SyntaxId> {
        self.base().node()
    }

    pub(crate) fn descriptor(&self, session: &Session) -> Option<Arc<Descriptor>> {
        self.base().descriptor(session)
    }

    /// # Panics
    /// Panics if the host tree has a named function without a name.
    pub fn simple_name(&self, session: &Session) -> SymbolName {
        dispatch!(self, d => d.simple_name(session))
    }

    pub fn try_simple_name(&self, session: &Session) -> Result<SymbolName, crate::CompilerError> {
        match self {
            Declaration::Function(function) => function.try_simple_name(session),
            _ => Ok(self.simple_name(session)),
        }
    }

    /// `None` for local declarations and type parameters.
    pub fn qualified_name(&self, session: &Session) -> Option<SymbolName> {
        dispatch!(self, d => d.qualified_name(session))
    }

    pub fn package_name(&self, session: &Session) -> SymbolName {
        dispatch!(self, d => d.package_name(session))
    }

    pub fn parent_declaration(&self, session: &Session) -> Option<Declaration> {
        dispatch!(self, d => d.parent_declaration(session))
    }

    pub fn containing_file(&self, session: &Session) -> Option<Arc<SourceFile>> {
        dispatch!(self, d => d.containing_file(session))
    }

    pub fn type_parameters(&self, session: &Session) -> Vec<Arc<TypeParameterDeclaration>> {
        dispatch!(self, d => d.type_parameters(session))
    }

    pub fn doc_string(&self, session: &Session) -> Option<String> {
        dispatch!(self, d => d.doc_string(session))
    }

    pub fn modifiers(&self, session: &Session) -> Modifiers {
        dispatch!(self, d => d.modifiers(session))
    }

    pub fn annotations(&self, session: &Session) -> Vec<Arc<Annotation>> {
        dispatch!(self, d => d.annotations(session))
    }

    pub fn origin(&self) -> Origin {
        dispatch!(self, d => d.origin())
    }

    pub fn location(&self, session: &Session) -> Location {
        dispatch!(self, d => d.location(session))
    }

    pub fn is_expect(&self, session: &Session) -> bool {
        self.base().expect_actual().is_expect(session)
    }

    pub fn is_actual(&self, session: &Session) -> bool {
        self.base().expect_actual().is_actual(session)
    }

    pub fn find_expects(&self, session: &Session) -> Vec<Declaration> {
        match self {
            Declaration::TypeParameter(_) => Vec::new(),
            _ => self.base().expect_actual().find_expects(session),
        }
    }

    pub fn find_actuals(&self, session: &Session) -> Vec<Declaration> {
        match self {
            Declaration::TypeParameter(_) => Vec::new(),
            _ => self.base().expect_actual().find_actuals(session),
        }
    }

    /// Class of a synthetic constructor.
    pub(crate) fn synthetic_constructor_class(
        &self,
        session: &Session,
    ) -> Option<Arc<ClassDeclaration>> {
        match self {
            Declaration::Function(function) => function.synthetic_constructor_class(session),
            _ => None,
        }
    }

    pub fn as_class(&self) -> Option<&Arc<ClassDeclaration>> {
        match self {
            Declaration::Class(class) => Some(class),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Arc<FunctionDeclaration>> {
        match self {
            Declaration::Function(function) => Some(function),
            _ => None,
        }
    }

    pub fn as_property(&self) -> Option<&Arc<PropertyDeclaration>> {
        match self {
            Declaration::Property(property) => Some(property),
            _ => None,
        }
    }

    fn address(&self) -> *const () {
        dispatch!(self, d => Arc::as_ptr(d).cast::<()>())
    }
}

impl PartialEq for Declaration {
    fn eq(&self, other: &Self) -> bool {
        self.address() == other.address()
    }
}

impl Eq for Declaration {}

impl Hash for Declaration {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address().hash(state);
    }
}

impl fmt::Debug for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Declaration::Class(_) => "Class",
            Declaration::Function(_) => "Function",
            Declaration::Property(_) => "Property",
            Declaration::TypeAlias(_) => "TypeAlias",
            Declaration::TypeParameter(_) => "TypeParameter",
        };
        write!(f, "Declaration::{kind}({:?})", self.base().repr())
    }
}

/// First non-fake member overridden by `descriptor`, searched breadth first.
#[tracing::instrument(level = "debug", skip_all)]
pub(crate) fn find_overridee(session: &Session, descriptor: &Descriptor) -> Option<Declaration> {
    let mut queue: std::collections::VecDeque<DescriptorId> =
        descriptor.overridden().iter().copied().collect();
    while let Some(id) = queue.pop_front() {
        let Some(overridden) = session.descriptor(id) else {
            continue;
        };
        session.record_lookup_for_member(&overridden);
        if overridden.member_kind() == ksp_ir::MemberKind::FakeOverride {
            queue.extend(overridden.overridden().iter().copied());
            continue;
        }
        return Declaration::from_descriptor(session, &overridden);
    }
    None
}

/// Whether `descriptor` overrides `target`, directly or transitively.
pub(crate) fn overrides_descriptor(
    session: &Session,
    descriptor: &Descriptor,
    target: DescriptorId,
) -> bool {
    let mut seen = rustc_hash::FxHashSet::default();
    let mut stack: Vec<DescriptorId> = descriptor.overridden().to_vec();
    while let Some(id) = stack.pop() {
        if id == target {
            return true;
        }
        if !seen.insert(id) {
            continue;
        }
        if let Some(overridden) = session.descriptor(id) {
            stack.extend(overridden.overridden().iter().copied());
        }
    }
    false
}

#[cfg(test)]
mod tests;
