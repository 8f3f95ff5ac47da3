//! State and answers shared by every declaration wrapper.

use super::doc::parse_doc;
use super::expect_actual::ExpectActual;
use super::modifiers::modifiers_of_descriptor;
use super::{Declaration, NodeKey, SourceFile, TypeParameterDeclaration};
use crate::annotation::Annotation;
use crate::location::{Location, Origin};
use crate::name::SymbolName;
use crate::session::Session;
use ksp_ir::syntax::{FunctionForm, NodeKind};
use ksp_ir::{Descriptor, DescriptorId, DescriptorKind, Modifiers, SyntaxId};
use std::fmt;
use std::sync::{Arc, OnceLock};

/// What a declaration wrapper stands for.
pub(crate) enum Repr {
    Source(SyntaxId),
    Binary(Arc<Descriptor>),
    /// No-argument constructor of the class at this key.
    SyntheticConstructor { class: NodeKey },
    /// Classifier of an error type.
    ErrorClass { hint: Option<Arc<str>> },
}

impl fmt::Debug for Repr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Repr::Source(node) => write!(f, "Source({node:?})"),
            Repr::Binary(descriptor) => write!(f, "Binary(#{})", descriptor.id.raw()),
            Repr::SyntheticConstructor { class } => write!(f, "SyntheticConstructor({class:?})"),
            Repr::ErrorClass { hint } => write!(f, "ErrorClass({hint:?})"),
        }
    }
}

pub(crate) struct DeclarationBase {
    repr: Repr,
    descriptor: OnceLock<Option<Arc<Descriptor>>>,
    qualified_name: OnceLock<Option<SymbolName>>,
    annotations: OnceLock<Vec<Arc<Annotation>>>,
    type_parameters: OnceLock<Vec<Arc<TypeParameterDeclaration>>>,
}

impl DeclarationBase {
    pub(crate) fn new(repr: Repr) -> Self {
        DeclarationBase {
            repr,
            descriptor: OnceLock::new(),
            qualified_name: OnceLock::new(),
            annotations: OnceLock::new(),
            type_parameters: OnceLock::new(),
        }
    }

    pub(crate) fn repr(&self) -> &Repr {
        &self.repr
    }

    pub(crate) fn node(&self) -> Option<SyntaxId> {
        match self.repr {
            Repr::Source(node) => Some(node),
            _ => None,
        }
    }

    /// Key of the host entity, for wrappers that stand for one.
    pub(crate) fn node_key(&self) -> Option<NodeKey> {
        match &self.repr {
            Repr::Source(node) => Some(NodeKey::Syntax(*node)),
            Repr::Binary(descriptor) => Some(NodeKey::Descriptor(descriptor.id)),
            Repr::SyntheticConstructor { .. } | Repr::ErrorClass { .. } => None,
        }
    }

    pub(crate) fn origin(&self) -> Origin {
        match self.repr {
            Repr::Source(_) => Origin::Source,
            Repr::Binary(_) => Origin::Binary,
            Repr::SyntheticConstructor { .. } | Repr::ErrorClass { .. } => Origin::Synthetic,
        }
    }

    /// The host descriptor; resolved once for source declarations.
    pub(crate) fn descriptor(&self, session: &Session) -> Option<Arc<Descriptor>> {
        match &self.repr {
            Repr::Source(node) => self
                .descriptor
                .get_or_init(|| session.resolve_declaration(*node))
                .clone(),
            Repr::Binary(descriptor) => Some(Arc::clone(descriptor)),
            Repr::SyntheticConstructor { .. } | Repr::ErrorClass { .. } => None,
        }
    }

    /// Name token text of a source or binary declaration.
    pub(crate) fn name_text(&self, session: &Session) -> Option<Arc<str>> {
        match &self.repr {
            Repr::Source(node) => session
                .syntax()
                .kind(*node)
                .name()
                .map(|name| session.name_text(name)),
            Repr::Binary(descriptor) => Some(session.name_text(descriptor.name)),
            Repr::SyntheticConstructor { .. } | Repr::ErrorClass { .. } => None,
        }
    }

    /// Fully qualified name built from `simple`; `None` for locals.
    pub(crate) fn qualified_name(&self, session: &Session, simple: &str) -> Option<SymbolName> {
        self.qualified_name
            .get_or_init(|| match &self.repr {
                Repr::Source(node) => source_qualified_name(session, *node, simple),
                Repr::Binary(descriptor) => binary_qualified_name(session, descriptor, simple),
                Repr::SyntheticConstructor { .. } | Repr::ErrorClass { .. } => None,
            })
            .clone()
    }

    pub(crate) fn package_name(&self, session: &Session) -> SymbolName {
        match &self.repr {
            Repr::Source(node) => session
                .syntax()
                .file_of(*node)
                .and_then(|file| session.syntax().kind(file).as_file())
                .map_or_else(
                    || SymbolName::new(""),
                    |file| SymbolName::from(Arc::clone(&file.package)),
                ),
            Repr::Binary(descriptor) => SymbolName::from(Arc::clone(&descriptor.package)),
            Repr::SyntheticConstructor { .. } | Repr::ErrorClass { .. } => SymbolName::new(""),
        }
    }

    pub(crate) fn containing_file(&self, session: &Session) -> Option<Arc<SourceFile>> {
        let file = session.syntax().file_of(self.node()?)?;
        Some(SourceFile::from_syntax(session, file))
    }

    /// Nearest enclosing declaration.
    ///
    /// Accessors, expressions and type positions are skipped, so a local
    /// declaration in a getter body has the property as its parent. A
    /// constructor property's parent is its class, not the constructor.
    pub(crate) fn parent_declaration(&self, session: &Session) -> Option<Declaration> {
        match &self.repr {
            Repr::Source(node) => {
                let syntax = session.syntax();
                let mut child = *node;
                for ancestor in syntax.ancestors(*node) {
                    match syntax.kind(ancestor) {
                        NodeKind::File(_) => return None,
                        NodeKind::Function(function)
                            if function.form == FunctionForm::PrimaryConstructor
                                && matches!(syntax.kind(child), NodeKind::Parameter(_)) => {}
                        NodeKind::Class(_)
                        | NodeKind::Function(_)
                        | NodeKind::Property(_)
                        | NodeKind::TypeAlias(_) => {
                            return Declaration::from_syntax(session, ancestor)
                        }
                        _ => {}
                    }
                    child = ancestor;
                }
                None
            }
            Repr::Binary(descriptor) => {
                let container = session.descriptor(descriptor.container?)?;
                Declaration::from_descriptor(session, &container)
            }
            Repr::SyntheticConstructor { .. } | Repr::ErrorClass { .. } => None,
        }
    }

    pub(crate) fn annotations(&self, session: &Session) -> Vec<Arc<Annotation>> {
        self.annotations
            .get_or_init(|| match &self.repr {
                Repr::Source(node) => session
                    .syntax()
                    .kind(*node)
                    .annotations()
                    .iter()
                    .map(|&entry| Annotation::from_syntax(session, entry))
                    .collect(),
                Repr::Binary(descriptor) => descriptor
                    .annotations
                    .iter()
                    .map(|annotation| Annotation::from_host(session, annotation))
                    .collect(),
                Repr::SyntheticConstructor { .. } | Repr::ErrorClass { .. } => Vec::new(),
            })
            .clone()
    }

    pub(crate) fn type_parameters(&self, session: &Session) -> Vec<Arc<TypeParameterDeclaration>> {
        self.type_parameters
            .get_or_init(|| match &self.repr {
                Repr::Source(node) => session
                    .syntax()
                    .kind(*node)
                    .type_parameters()
                    .iter()
                    .map(|&parameter| TypeParameterDeclaration::from_syntax(session, parameter))
                    .collect(),
                Repr::Binary(descriptor) => descriptor_type_parameters(descriptor)
                    .iter()
                    .filter_map(|&id| session.descriptor(id))
                    .map(|parameter| TypeParameterDeclaration::from_descriptor(session, &parameter))
                    .collect(),
                Repr::SyntheticConstructor { .. } | Repr::ErrorClass { .. } => Vec::new(),
            })
            .clone()
    }

    pub(crate) fn doc_string(&self, session: &Session) -> Option<String> {
        let raw = session.syntax().kind(self.node()?).doc()?;
        parse_doc(raw)
    }

    /// Modifiers as written, or as the descriptor implies for binaries.
    pub(crate) fn declared_modifiers(&self, session: &Session) -> Modifiers {
        match &self.repr {
            Repr::Source(node) => session.syntax().kind(*node).modifiers(),
            Repr::Binary(descriptor) => modifiers_of_descriptor(session, descriptor),
            Repr::SyntheticConstructor { .. } | Repr::ErrorClass { .. } => Modifiers::empty(),
        }
    }

    /// Whether an annotation with this short name is written on the node.
    pub(crate) fn has_annotation_named(&self, session: &Session, short_name: &str) -> bool {
        let Some(node) = self.node() else {
            return false;
        };
        let syntax = session.syntax();
        syntax.kind(node).annotations().iter().any(|&entry| {
            syntax
                .kind(entry)
                .as_annotation_entry()
                .is_some_and(|entry| &*session.name_text(entry.short_name) == short_name)
        })
    }

    pub(crate) fn location(&self, session: &Session) -> Location {
        match self.node() {
            Some(node) => session.location_of(node),
            None => Location::NoLocation,
        }
    }

    pub(crate) fn expect_actual(&self) -> ExpectActual<'_> {
        ExpectActual::new(self)
    }
}

/// Type parameter descriptors of a generic descriptor.
fn descriptor_type_parameters(descriptor: &Descriptor) -> &[DescriptorId] {
    match &descriptor.kind {
        DescriptorKind::Class(class) => &class.type_parameters,
        DescriptorKind::Function(function) => &function.type_parameters,
        DescriptorKind::Property(property) => &property.type_parameters,
        DescriptorKind::TypeAlias(alias) => &alias.type_parameters,
        DescriptorKind::TypeParameter(_) | DescriptorKind::NotFound => &[],
    }
}

/// `package.Outer.Inner.name`, or `None` when any enclosing scope is local.
fn source_qualified_name(session: &Session, node: SyntaxId, simple: &str) -> Option<SymbolName> {
    let syntax = session.syntax();
    let mut segments: Vec<Arc<str>> = vec![Arc::from(simple)];
    let mut child = node;
    for ancestor in syntax.ancestors(node) {
        match syntax.kind(ancestor) {
            NodeKind::File(file) => {
                segments.reverse();
                return Some(SymbolName::qualified(&file.package, &segments.join(".")));
            }
            NodeKind::Class(class) => segments.push(session.name_text(class.name?)),
            NodeKind::Function(function)
                if function.form == FunctionForm::PrimaryConstructor
                    && matches!(syntax.kind(child), NodeKind::Parameter(_)) => {}
            _ => return None,
        }
        child = ancestor;
    }
    None
}

fn binary_qualified_name(
    session: &Session,
    descriptor: &Descriptor,
    simple: &str,
) -> Option<SymbolName> {
    if let Some(name) = &descriptor.qualified_name {
        return Some(SymbolName::from(Arc::clone(name)));
    }
    match descriptor.container.and_then(|id| session.descriptor(id)) {
        Some(container) => {
            let parent = container
                .qualified_name
                .as_deref()
                .map(str::to_owned)
                .or_else(|| {
                    binary_qualified_name(session, &container, &session.name_text(container.name))
                        .map(|name| name.as_str().to_owned())
                })?;
            Some(SymbolName::qualified(&parent, simple))
        }
        None => Some(SymbolName::qualified(&descriptor.package, simple)),
    }
}
