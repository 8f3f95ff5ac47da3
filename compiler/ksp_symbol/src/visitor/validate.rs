//! Checks that every type reference under a node resolves.

use super::{Accept, Node, Visitor};
use crate::reference::TypeReference;
use crate::session::Session;
use std::sync::Arc;

/// Visitor that answers `false` as soon as a type reference resolves to an
/// error type.
///
/// The data is the parent of the visited node. Children are only entered
/// when the predicate returns `true`; by default expression bodies are
/// skipped.
pub struct ValidateVisitor<'p> {
    predicate: &'p dyn Fn(Option<&Node>, &Node) -> bool,
}

fn skip_expressions(_parent: Option<&Node>, child: &Node) -> bool {
    !matches!(child, Node::Expression(_))
}

impl<'p> ValidateVisitor<'p> {
    pub fn new(predicate: &'p dyn Fn(Option<&Node>, &Node) -> bool) -> Self {
        ValidateVisitor { predicate }
    }

    fn validate_children(&mut self, session: &Session, node: &Node) -> bool {
        node.children(session).iter().all(|child| {
            !(self.predicate)(Some(node), child)
                || child.accept(self, session, Some(node.clone()))
        })
    }
}

impl Default for ValidateVisitor<'static> {
    fn default() -> Self {
        ValidateVisitor::new(&skip_expressions)
    }
}

impl Visitor<Option<Node>, bool> for ValidateVisitor<'_> {
    fn visit_node(&mut self, session: &Session, node: &Node, _parent: Option<Node>) -> bool {
        self.validate_children(session, node)
    }

    fn visit_type_reference(
        &mut self,
        session: &Session,
        reference: &Arc<TypeReference>,
        _parent: Option<Node>,
    ) -> bool {
        if reference.resolve(session).is_error() {
            tracing::debug!(reference = %reference.render(session), "unresolved type reference");
            return false;
        }
        self.validate_children(session, &Node::TypeReference(Arc::clone(reference)))
    }
}

/// `true` when no type reference under `node` resolves to an error type.
/// Expression bodies are not inspected.
pub fn validate(session: &Session, node: &Node) -> bool {
    node.accept(&mut ValidateVisitor::default(), session, None)
}

/// Like [`validate`], descending only into children accepted by
/// `predicate`.
pub fn validate_with(
    session: &Session,
    node: &Node,
    predicate: impl Fn(Option<&Node>, &Node) -> bool,
) -> bool {
    node.accept(&mut ValidateVisitor::new(&predicate), session, None)
}
