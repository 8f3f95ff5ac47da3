//! Dependency recording and current-round rebinding.

use super::Session;
use crate::declaration::{
    ClassDeclaration, Declaration, FunctionDeclaration, PropertyDeclaration,
    TypeAliasDeclaration, TypeParameterDeclaration,
};
use ksp_ir::{Descriptor, HostType};

const TARGET: &str = "ksp_symbol::incremental";

impl Session {
    /// A subtyping question was asked about `ty`.
    pub(crate) fn record_lookup_with_supertypes(&self, ty: &HostType) {
        if self.options.incremental_log {
            tracing::debug!(
                target: TARGET,
                ty = %self.render_host(ty),
                "lookup with supertypes"
            );
        }
        if self.options.incremental {
            self.tracker.record_lookup_with_supertypes(ty);
        }
    }

    /// The sealed subclasses of `class_name` are about to be enumerated.
    pub(crate) fn record_get_sealed_subclasses(&self, class_name: &str) {
        if self.options.incremental_log {
            tracing::debug!(target: TARGET, class = class_name, "get sealed subclasses");
        }
        if self.options.incremental {
            self.tracker.record_get_sealed_subclasses(class_name);
        }
    }

    pub(crate) fn record_lookup_for_member(&self, member: &Descriptor) {
        if self.options.incremental_log {
            tracing::debug!(
                target: TARGET,
                member = %self.name_text(member.name),
                "lookup for member"
            );
        }
        if self.options.incremental {
            self.tracker.record_lookup_for_member(member);
        }
    }

    /// The wrapper that stands for `declaration` in the current round.
    ///
    /// Source declarations are rebound through the resolver's current-round
    /// node; a declaration whose node is gone, a binary declaration and an
    /// error class stand for themselves. A synthetic constructor follows its
    /// class.
    pub fn instance_for_current_round(&self, declaration: &Declaration) -> Declaration {
        if let Some(class) = declaration.synthetic_constructor_class(self) {
            let current = self.instance_for_current_round(&Declaration::Class(class));
            return match current {
                Declaration::Class(class) => class
                    .synthetic_constructor(self)
                    .map_or_else(|| declaration.clone(), Declaration::Function),
                _ => declaration.clone(),
            };
        }

        let Some(node) = declaration.node() else {
            return declaration.clone();
        };
        let Some(current) = self.resolver.current_round_node(&self.syntax, node) else {
            tracing::debug!(?node, "declaration has no current-round node");
            return declaration.clone();
        };
        if current == node {
            return declaration.clone();
        }

        tracing::trace!(?node, ?current, "rebinding declaration to current round");
        match declaration {
            Declaration::Class(_) => Declaration::Class(ClassDeclaration::from_syntax(self, current)),
            Declaration::Function(_) => {
                Declaration::Function(FunctionDeclaration::from_syntax(self, current))
            }
            Declaration::Property(_) => {
                Declaration::Property(PropertyDeclaration::from_syntax(self, current))
            }
            Declaration::TypeAlias(_) => {
                Declaration::TypeAlias(TypeAliasDeclaration::from_syntax(self, current))
            }
            Declaration::TypeParameter(_) => {
                Declaration::TypeParameter(TypeParameterDeclaration::from_syntax(self, current))
            }
        }
    }
}
