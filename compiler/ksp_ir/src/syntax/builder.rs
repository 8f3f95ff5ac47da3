//! Incremental construction of a [`SyntaxArena`].
//!
//! Children are pushed before their parents; pushing a parent wires the
//! children's `parent` links, and adding a file stamps every descendant
//! with its file. A new round starts from [`ArenaBuilder::next_round`].

use super::nodes::{
    AnnotationEntryNode, ExpressionNode, FileNode, NodeKind, ParameterBinding, ParameterNode,
    ProjectionKind, TypeProjectionNode, TypeReferenceNode, UserTypeNode, ValueArgumentNode,
    WrapperTypeNode,
};
use super::{SyntaxArena, SyntaxId, SyntaxNode};
use crate::{ConstantValue, LineIndex, Modifiers, Name, SharedInterner, Span, StringInterner};
use std::sync::Arc;

/// Builder for the first round, or for the next round of an existing arena.
pub struct ArenaBuilder {
    interner: SharedInterner,
    nodes: Vec<SyntaxNode>,
    files: Vec<SyntaxId>,
    new_files: Vec<SyntaxId>,
    round: u32,
}

impl ArenaBuilder {
    pub fn new() -> Self {
        Self::with_interner(StringInterner::shared())
    }

    pub fn with_interner(interner: SharedInterner) -> Self {
        ArenaBuilder {
            interner,
            nodes: Vec::new(),
            files: Vec::new(),
            new_files: Vec::new(),
            round: 1,
        }
    }

    /// Continue from `arena` into the following round.
    pub fn next_round(arena: &SyntaxArena) -> Self {
        ArenaBuilder {
            interner: Arc::clone(&arena.interner),
            nodes: arena.nodes.clone(),
            files: arena.files.clone(),
            new_files: Vec::new(),
            round: arena.round + 1,
        }
    }

    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    pub fn name(&self, text: &str) -> Name {
        self.interner.intern(text)
    }

    pub fn kind(&self, id: SyntaxId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    /// Push a node without a source position.
    pub fn push(&mut self, kind: impl Into<NodeKind>) -> SyntaxId {
        self.push_at(kind, Span::DUMMY)
    }

    pub fn push_at(&mut self, kind: impl Into<NodeKind>, span: Span) -> SyntaxId {
        let kind = kind.into();
        let id = SyntaxId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        for child in kind.children() {
            if let Some(node) = self.nodes.get_mut(child.index()) {
                node.parent = Some(id);
            }
        }
        self.nodes.push(SyntaxNode {
            kind,
            span,
            parent: None,
            file: None,
        });
        id
    }

    pub fn set_span(&mut self, id: SyntaxId, span: Span) {
        if let Some(node) = self.nodes.get_mut(id.index()) {
            node.span = span;
        }
    }

    /// Add a file holding `declarations`, with no text to compute lines from.
    pub fn add_file(&mut self, path: &str, package: &str, declarations: Vec<SyntaxId>) -> SyntaxId {
        self.add_file_node(FileNode {
            path: Arc::from(path),
            package: Arc::from(package),
            annotations: Vec::new(),
            declarations,
            lines: LineIndex::new(""),
        })
    }

    pub fn add_file_node(&mut self, file: FileNode) -> SyntaxId {
        let id = self.push(file);
        self.stamp_file(id);
        self.files.push(id);
        self.new_files.push(id);
        id
    }

    /// Swap a re-parsed file in for `old`, keeping its position in the file list.
    pub fn replace_file(&mut self, old: SyntaxId, file: FileNode) -> SyntaxId {
        let id = self.push(file);
        self.stamp_file(id);
        match self.files.iter().position(|&f| f == old) {
            Some(slot) => self.files[slot] = id,
            None => self.files.push(id),
        }
        self.new_files.push(id);
        id
    }

    pub fn remove_file(&mut self, old: SyntaxId) {
        self.files.retain(|&f| f != old);
    }

    fn stamp_file(&mut self, file: SyntaxId) {
        let mut stack = self.nodes[file.index()].kind.children();
        while let Some(id) = stack.pop() {
            let node = &mut self.nodes[id.index()];
            node.file = Some(file);
            stack.extend(node.kind.children());
        }
    }

    pub fn finish(self) -> SyntaxArena {
        SyntaxArena {
            interner: self.interner,
            nodes: self.nodes,
            files: self.files,
            new_files: self.new_files,
            round: self.round,
        }
    }

    // Type syntax helpers

    /// `a.b.C<args>` as a chain of qualified user types.
    pub fn user_type(&mut self, dotted: &str, arguments: Vec<SyntaxId>) -> SyntaxId {
        let segments: Vec<&str> = dotted.split('.').collect();
        let last = segments.len().saturating_sub(1);
        let mut qualifier = None;
        let mut arguments = Some(arguments);
        for (i, segment) in segments.into_iter().enumerate() {
            let name = self.name(segment);
            let node = UserTypeNode {
                qualifier,
                name: Some(name),
                arguments: if i == last {
                    arguments.take().unwrap_or_default()
                } else {
                    Vec::new()
                },
            };
            qualifier = Some(self.push(node));
        }
        qualifier.unwrap_or_else(|| self.push(UserTypeNode::default()))
    }

    /// Type reference to a non-generic user type.
    pub fn type_ref(&mut self, dotted: &str) -> SyntaxId {
        self.generic_type_ref(dotted, Vec::new())
    }

    /// Type reference with invariant type arguments, each a type reference.
    pub fn generic_type_ref(&mut self, dotted: &str, arguments: Vec<SyntaxId>) -> SyntaxId {
        let projections = arguments
            .into_iter()
            .map(|type_ref| self.projection(ProjectionKind::Invariant, Some(type_ref)))
            .collect();
        let element = self.user_type(dotted, projections);
        self.push(TypeReferenceNode {
            modifiers: Modifiers::empty(),
            annotations: Vec::new(),
            element: Some(element),
        })
    }

    /// `T?`
    pub fn nullable_type_ref(&mut self, dotted: &str) -> SyntaxId {
        let inner = self.user_type(dotted, Vec::new());
        let nullable = self.push(NodeKind::NullableType(WrapperTypeNode {
            modifiers: Modifiers::empty(),
            annotations: Vec::new(),
            inner: Some(inner),
        }));
        self.push(TypeReferenceNode {
            modifiers: Modifiers::empty(),
            annotations: Vec::new(),
            element: Some(nullable),
        })
    }

    pub fn projection(&mut self, kind: ProjectionKind, type_ref: Option<SyntaxId>) -> SyntaxId {
        self.push(TypeProjectionNode {
            kind,
            modifiers: Modifiers::empty(),
            annotations: Vec::new(),
            type_ref,
        })
    }

    // Expression helpers

    pub fn constant(&mut self, value: ConstantValue) -> SyntaxId {
        self.push(ExpressionNode::Constant(value))
    }

    pub fn name_ref(&mut self, text: &str) -> SyntaxId {
        let name = self.name(text);
        self.push(ExpressionNode::NameReference(name))
    }

    pub fn expression(&mut self, expression: ExpressionNode) -> SyntaxId {
        self.push(expression)
    }

    // Declaration helpers

    /// `@Name(arguments)` resolving through a type reference to `Name`.
    pub fn annotation(&mut self, short_name: &str, arguments: Vec<SyntaxId>) -> SyntaxId {
        let type_ref = self.type_ref(short_name);
        let short_name = self.name(short_name);
        self.push(AnnotationEntryNode {
            use_site: None,
            short_name,
            type_ref: Some(type_ref),
            arguments,
        })
    }

    pub fn argument(&mut self, name: Option<&str>, value: SyntaxId) -> SyntaxId {
        let name = name.map(|n| self.name(n));
        self.push(ValueArgumentNode {
            name,
            is_spread: false,
            value: Some(value),
        })
    }

    /// Plain value parameter.
    pub fn parameter(&mut self, name: &str, type_ref: Option<SyntaxId>) -> SyntaxId {
        self.binding_parameter(name, None, type_ref)
    }

    /// Constructor parameter with an optional `val`/`var` binding.
    pub fn binding_parameter(
        &mut self,
        name: &str,
        binding: Option<ParameterBinding>,
        type_ref: Option<SyntaxId>,
    ) -> SyntaxId {
        let name = self.name(name);
        self.push(ParameterNode {
            name: Some(name),
            binding,
            type_ref,
            ..ParameterNode::default()
        })
    }
}

impl Default for ArenaBuilder {
    fn default() -> Self {
        Self::new()
    }
}
