//! Depth-first traversal helpers.

use super::{Accept, Node, Visitor};
use crate::session::Session;

/// Visit `node`, then every descendant, parents before children.
///
/// The visitor receives a clone of `data` at every node; results are
/// discarded.
pub fn walk<V, D>(visitor: &mut V, session: &Session, node: &Node, data: D)
where
    V: Visitor<D, ()> + ?Sized,
    D: Clone,
{
    node.accept(visitor, session, data.clone());
    walk_children(visitor, session, node, data);
}

/// Walk every descendant of `node` without visiting `node` itself.
pub fn walk_children<V, D>(visitor: &mut V, session: &Session, node: &Node, data: D)
where
    V: Visitor<D, ()> + ?Sized,
    D: Clone,
{
    for child in node.children(session) {
        walk(visitor, session, &child, data.clone());
    }
}
