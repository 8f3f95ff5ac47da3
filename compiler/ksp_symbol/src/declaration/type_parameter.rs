//! Type parameters of classes, functions, properties and type aliases.

use super::base::Repr;
use super::{Declaration, DeclarationBase, NodeKey, SourceFile};
use crate::annotation::Annotation;
use crate::kinds::Variance;
use crate::location::{Location, Origin};
use crate::name::SymbolName;
use crate::reference::TypeReference;
use crate::session::Session;
use ksp_ir::syntax::NodeKind;
use ksp_ir::{Descriptor, Modifiers, ProjectionVariance, SyntaxId};
use std::sync::Arc;

pub struct TypeParameterDeclaration {
    base: DeclarationBase,
}

impl TypeParameterDeclaration {
    pub fn from_syntax(session: &Session, node: SyntaxId) -> Arc<TypeParameterDeclaration> {
        session
            .caches()
            .type_parameters
            .get_or_put(NodeKey::Syntax(node), || TypeParameterDeclaration {
                base: DeclarationBase::new(Repr::Source(node)),
            })
    }

    pub fn from_descriptor(
        session: &Session,
        descriptor: &Arc<Descriptor>,
    ) -> Arc<TypeParameterDeclaration> {
        if let Some(source) = descriptor.source {
            let is_type_parameter = session
                .syntax()
                .get(source)
                .is_some_and(|node| matches!(node.kind, NodeKind::TypeParameter(_)));
            if is_type_parameter {
                return Self::from_syntax(session, source);
            }
        }
        session
            .caches()
            .type_parameters
            .get_or_put(NodeKey::Descriptor(descriptor.id), || {
                TypeParameterDeclaration {
                    base: DeclarationBase::new(Repr::Binary(Arc::clone(descriptor))),
                }
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

    /// Type parameters have no qualified name.
    pub fn qualified_name(&self, _session: &Session) -> Option<SymbolName> {
        None
    }

    pub fn package_name(&self, session: &Session) -> SymbolName {
        self.base.package_name(session)
    }

    /// The declaration this parameter belongs to.
    pub fn parent_declaration(&self, session: &Session) -> Option<Declaration> {
        self.base.parent_declaration(session)
    }

    pub fn containing_file(&self, session: &Session) -> Option<Arc<SourceFile>> {
        self.base.containing_file(session)
    }

    /// Always empty.
    pub fn type_parameters(&self, _session: &Session) -> Vec<Arc<TypeParameterDeclaration>> {
        Vec::new()
    }

    pub fn doc_string(&self, _session: &Session) -> Option<String> {
        None
    }

    pub fn modifiers(&self, session: &Session) -> Modifiers {
        match self.base.repr() {
            Repr::Binary(descriptor) => {
                let Some(parameter) = descriptor.as_type_parameter() else {
                    return Modifiers::empty();
                };
                let variance = match parameter.variance {
                    ProjectionVariance::Invariant => Modifiers::empty(),
                    ProjectionVariance::In => Modifiers::IN,
                    ProjectionVariance::Out => Modifiers::OUT,
                };
                if parameter.is_reified {
                    variance | Modifiers::REIFIED
                } else {
                    variance
                }
            }
            _ => self.base.declared_modifiers(session),
        }
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

    /// Declaration-site variance: `in`, `out` or invariant.
    pub fn variance(&self, session: &Session) -> Variance {
        let modifiers = self.modifiers(session);
        if modifiers.contains(Modifiers::IN) {
            Variance::Contravariant
        } else if modifiers.contains(Modifiers::OUT) {
            Variance::Covariant
        } else {
            Variance::Invariant
        }
    }

    pub fn is_reified(&self, session: &Session) -> bool {
        self.modifiers(session).contains(Modifiers::REIFIED)
    }

    /// Upper bounds from the parameter itself and from `where` clauses of
    /// its declaration; `Any?` when there are none.
    pub fn bounds(&self, session: &Session) -> Vec<Arc<TypeReference>> {
        let bounds: Vec<Arc<TypeReference>> = match self.base.repr() {
            Repr::Source(node) => {
                let syntax = session.syntax();
                let declared = syntax
                    .kind(*node)
                    .as_type_parameter()
                    .and_then(|parameter| parameter.bound);
                let name = syntax.kind(*node).name();
                let constrained = syntax
                    .parent(*node)
                    .map(|owner| syntax.kind(owner).constraints())
                    .unwrap_or_default()
                    .iter()
                    .filter(|constraint| Some(constraint.subject) == name)
                    .map(|constraint| constraint.bound);
                declared
                    .into_iter()
                    .chain(constrained)
                    .map(|bound| TypeReference::from_syntax(session, bound))
                    .collect()
            }
            Repr::Binary(descriptor) => descriptor
                .as_type_parameter()
                .map(|parameter| parameter.upper_bounds.as_slice())
                .unwrap_or_default()
                .iter()
                .map(|bound| TypeReference::from_host(session, bound))
                .collect(),
            Repr::SyntheticConstructor { .. } | Repr::ErrorClass { .. } => Vec::new(),
        };
        if bounds.is_empty() {
            let nullable_any = session.any_type().make_nullable(session);
            return vec![TypeReference::synthetic(session, nullable_any)];
        }
        bounds
    }
}

impl std::fmt::Debug for TypeParameterDeclaration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TypeParameterDeclaration({:?})", self.base.repr())
    }
}
