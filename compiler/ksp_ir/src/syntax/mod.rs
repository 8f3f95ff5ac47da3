//! Append-only arena of host syntax nodes.
//!
//! # Design
//!
//! Nodes are addressed by [`SyntaxId`] and never removed. A processing
//! round that re-parses a file appends the new nodes and drops the old file
//! from the live file list, so wrappers created in an earlier round can
//! still read their (now stale) node while lookups by file only see the
//! current tree.

mod builder;
mod nodes;

pub use builder::ArenaBuilder;
pub use nodes::{
    AccessorNode, AnnotationEntryNode, BinaryOperator, CastOperator, ClassKeyword, ClassNode,
    ExpressionNode, FileNode, FunctionForm, FunctionNode, FunctionTypeNode, JumpKind, NodeKind,
    ParameterBinding, ParameterNode, ProjectionKind, PropertyNode, TypeAliasNode,
    TypeConstraint, TypeParameterNode, TypeProjectionNode, TypeReferenceNode, UnaryOperator,
    UseSiteKeyword, UserTypeNode, ValueArgumentNode, WhenBranchNode, WrapperTypeNode,
};

use crate::{Name, SharedInterner, Span};
use std::fmt;
use std::sync::Arc;

/// Handle of a node in a [`SyntaxArena`].
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct SyntaxId(u32);

impl SyntaxId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        SyntaxId(raw)
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

impl fmt::Debug for SyntaxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SyntaxId({})", self.0)
    }
}

/// A node plus its position in the tree.
#[derive(Clone, Debug, PartialEq)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    pub span: Span,
    pub parent: Option<SyntaxId>,
    /// Enclosing file node; `None` for nodes not yet attached to a file and
    /// for file nodes themselves.
    pub file: Option<SyntaxId>,
}

/// All syntax nodes the host has produced so far.
#[derive(Clone)]
pub struct SyntaxArena {
    interner: SharedInterner,
    nodes: Vec<SyntaxNode>,
    files: Vec<SyntaxId>,
    new_files: Vec<SyntaxId>,
    round: u32,
}

impl SyntaxArena {
    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    /// Text of a name token.
    pub fn name_text(&self, name: Name) -> Arc<str> {
        self.interner.lookup(name)
    }

    /// # Panics
    /// Panics if `id` came from another arena.
    pub fn node(&self, id: SyntaxId) -> &SyntaxNode {
        &self.nodes[id.index()]
    }

    pub fn get(&self, id: SyntaxId) -> Option<&SyntaxNode> {
        self.nodes.get(id.index())
    }

    pub fn kind(&self, id: SyntaxId) -> &NodeKind {
        &self.node(id).kind
    }

    pub fn span(&self, id: SyntaxId) -> Span {
        self.node(id).span
    }

    pub fn parent(&self, id: SyntaxId) -> Option<SyntaxId> {
        self.node(id).parent
    }

    /// Parents of `id`, nearest first.
    pub fn ancestors(&self, id: SyntaxId) -> impl Iterator<Item = SyntaxId> + '_ {
        std::iter::successors(self.parent(id), move |&p| self.parent(p))
    }

    /// File node containing `id`; a file node contains itself.
    pub fn file_of(&self, id: SyntaxId) -> Option<SyntaxId> {
        let node = self.node(id);
        match node.kind {
            NodeKind::File(_) => Some(id),
            _ => node.file,
        }
    }

    /// Files of the current round, in the order the host added them.
    pub fn files(&self) -> &[SyntaxId] {
        &self.files
    }

    /// Files added or re-parsed in the current round.
    pub fn new_files(&self) -> &[SyntaxId] {
        &self.new_files
    }

    /// Whether `id` belongs to a file of the current round.
    pub fn is_live(&self, id: SyntaxId) -> bool {
        self.file_of(id).is_some_and(|file| self.files.contains(&file))
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl fmt::Debug for SyntaxArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxArena")
            .field("nodes", &self.nodes.len())
            .field("files", &self.files)
            .field("round", &self.round)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
