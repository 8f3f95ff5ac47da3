//! `typealias Name<T> = Expanded<T>`

use super::base::Repr;
use super::{Declaration, DeclarationBase, NodeKey, SourceFile, TypeParameterDeclaration};
use crate::annotation::Annotation;
use crate::location::{Location, Origin};
use crate::name::SymbolName;
use crate::reference::TypeReference;
use crate::session::Session;
use ksp_ir::syntax::NodeKind;
use ksp_ir::{Descriptor, DescriptorKind, Modifiers, SyntaxId};
use std::sync::Arc;

pub struct TypeAliasDeclaration {
    base: DeclarationBase,
}

impl TypeAliasDeclaration {
    pub fn from_syntax(session: &Session, node: SyntaxId) -> Arc<TypeAliasDeclaration> {
        session
            .caches()
            .type_aliases
            .get_or_put(NodeKey::Syntax(node), || TypeAliasDeclaration {
                base: DeclarationBase::new(Repr::Source(node)),
            })
    }

    pub fn from_descriptor(
        session: &Session,
        descriptor: &Arc<Descriptor>,
    ) -> Arc<TypeAliasDeclaration> {
        if let Some(source) = descriptor.source {
            let is_alias = session
                .syntax()
                .get(source)
                .is_some_and(|node| matches!(node.kind, NodeKind::TypeAlias(_)));
            if is_alias {
                return Self::from_syntax(session, source);
            }
        }
        session
            .caches()
            .type_aliases
            .get_or_put(NodeKey::Descriptor(descriptor.id), || TypeAliasDeclaration {
                base: DeclarationBase::new(Repr::Binary(Arc::clone(descriptor))),
            })
    }

    pub(crate) fn base(&self) -> &DeclarationBase {
        &self.base
    }

    pub fn node(&self) -> Option<SyntaxId> {
        self.base.node()
    }

    pub fn simple_name(&self, session: &Session) -> SymbolName {
        self.base
            .name_text(session)
            .map_or_else(|| SymbolName::new("<no name provided>"), SymbolName::from)
    }

    pub fn qualified_name(&self, session: &Session) -> Option<SymbolName> {
        let simple = self.simple_name(session);
        self.base.qualified_name(session, simple.as_str())
    }

    pub fn package_name(&self, session: &Session) -> SymbolName {
        self.base.package_name(session)
    }

    pub fn parent_declaration(&self, session: &Session) -> Option<Declaration> {
        self.base.parent_declaration(session)
    }

    pub fn containing_file(&self, session: &Session) -> Option<Arc<SourceFile>> {
        self.base.containing_file(session)
    }

    pub fn type_parameters(&self, session: &Session) -> Vec<Arc<TypeParameterDeclaration>> {
        self.base.type_parameters(session)
    }

    pub fn doc_string(&self, session: &Session) -> Option<String> {
        self.base.doc_string(session)
    }

    pub fn modifiers(&self, session: &Session) -> Modifiers {
        self.base.declared_modifiers(session)
    }

    pub fn annotations(&self, session: &Session) -> Vec<Arc<Annotation>> {
        self.base.annotations(session)
    }

    pub fn origin(&self) -> Origin {
        self.base.origin()
    }

    pub fn location(&self, session: &Session) -> Location {
        self.base.location(session)
    }

    /// The right-hand side of the alias.
    pub fn aliased_type(&self, session: &Session) -> Arc<TypeReference> {
        let error = || TypeReference::error(session, Some(self.simple_name(session).as_str()));
        match self.base.repr() {
            Repr::Source(node) => match session
                .syntax()
                .kind(*node)
                .as_type_alias()
                .and_then(|alias| alias.aliased)
            {
                Some(aliased) => TypeReference::from_syntax(session, aliased),
                None => error(),
            },
            Repr::Binary(descriptor) => match &descriptor.kind {
                DescriptorKind::TypeAlias(alias) => TypeReference::from_host(session, &alias.expanded),
                _ => error(),
            },
            Repr::SyntheticConstructor { .. } | Repr::ErrorClass { .. } => error(),
        }
    }
}

impl std::fmt::Debug for TypeAliasDeclaration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TypeAliasDeclaration({:?})", self.base.repr())
    }
}
