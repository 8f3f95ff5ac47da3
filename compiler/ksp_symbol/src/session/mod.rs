//! The processing session: host handles, options and the cache registry.
//!
//! # Design
//!
//! A [`Session`] is the only owner of model state. Wrappers are plain data
//! plus memo slots; every question that needs the host goes through the
//! session passed to the wrapper's method. Dropping the session drops
//! every cache, so no wrapper outlives the host tree it points into.
//!
//! Rounds: [`Session::begin_round`] swaps in the next round's syntax arena
//! and clears every cache, so facts memoized in one round (a reference that
//! did not resolve, an empty sealed-subclass list) are computed afresh in the
//! next. Wrappers a processor kept from an earlier round still answer their
//! own memoized facts; inferred type references are re-keyed by the
//! current-round declaration (see [`Session::instance_for_current_round`]).

mod incremental;

use crate::cache::CacheRegistry;
use crate::declaration::{
    ClassDeclaration, Declaration, FunctionDeclaration, PropertyDeclaration, SourceFile,
};
use crate::kinds::Variance;
use crate::location::Location;
use crate::name::SymbolName;
use crate::reference::{TypeArgument, TypeReference};
use crate::types::{get_ks_type_cached, ErrorType, Type};
use crate::visitor::Node;
use ksp_ir::{
    render_type, Builtin, Descriptor, DescriptorId, DescriptorKind, HostType, LookupTracker, Name,
    NoopTracker, Resolver, SyntaxArena, SyntaxId,
};
use std::sync::Arc;

/// Behaviour switches for a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionOptions {
    /// Forward dependency recordings to the lookup tracker.
    pub incremental: bool,
    /// Emit every recorded lookup as a debug event.
    pub incremental_log: bool,
    /// Attach a hint to error types.
    pub error_type_hints: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        SessionOptions {
            incremental: true,
            incremental_log: false,
            error_type_hints: true,
        }
    }
}

/// One processing session over a host program.
pub struct Session {
    syntax: Arc<SyntaxArena>,
    resolver: Arc<dyn Resolver>,
    tracker: Arc<dyn LookupTracker>,
    options: SessionOptions,
    caches: CacheRegistry,
}

impl Session {
    /// Session without dependency tracking.
    pub fn new(syntax: Arc<SyntaxArena>, resolver: Arc<dyn Resolver>) -> Self {
        Self::with_options(
            syntax,
            resolver,
            Arc::new(NoopTracker),
            SessionOptions::default(),
        )
    }

    pub fn with_tracker(
        syntax: Arc<SyntaxArena>,
        resolver: Arc<dyn Resolver>,
        tracker: Arc<dyn LookupTracker>,
    ) -> Self {
        Self::with_options(syntax, resolver, tracker, SessionOptions::default())
    }

    pub fn with_options(
        syntax: Arc<SyntaxArena>,
        resolver: Arc<dyn Resolver>,
        tracker: Arc<dyn LookupTracker>,
        options: SessionOptions,
    ) -> Self {
        tracing::debug!(round = syntax.round(), ?options, "session created");
        Session {
            syntax,
            resolver,
            tracker,
            options,
            caches: CacheRegistry::new(),
        }
    }

    pub fn syntax(&self) -> &SyntaxArena {
        &self.syntax
    }

    pub fn resolver(&self) -> &dyn Resolver {
        &*self.resolver
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn caches(&self) -> &CacheRegistry {
        &self.caches
    }

    /// Current round number, starting at 1.
    pub fn round(&self) -> u32 {
        self.syntax.round()
    }

    /// Move to the next round's syntax and forget every wrapper of the
    /// previous round.
    #[tracing::instrument(level = "debug", skip_all, fields(round = syntax.round()))]
    pub fn begin_round(&mut self, syntax: Arc<SyntaxArena>) {
        tracing::debug!(
            previous = self.syntax.round(),
            new_files = syntax.new_files().len(),
            "begin round"
        );
        self.syntax = syntax;
        self.clear_caches();
    }

    /// Forget every wrapper created so far.
    pub fn clear_caches(&self) {
        tracing::debug!(stats = ?self.caches.stats(), "clearing caches");
        self.caches.clear();
    }

    // Entry points

    /// Every file of the current round.
    pub fn all_files(&self) -> Vec<Arc<SourceFile>> {
        self.syntax
            .files()
            .iter()
            .map(|&file| SourceFile::from_syntax(self, file))
            .collect()
    }

    /// Files added or re-parsed in the current round.
    pub fn new_files(&self) -> Vec<Arc<SourceFile>> {
        self.syntax
            .new_files()
            .iter()
            .map(|&file| SourceFile::from_syntax(self, file))
            .collect()
    }

    /// Class by fully qualified name, from source or from a dependency.
    pub fn class_by_name(&self, name: &SymbolName) -> Option<Arc<ClassDeclaration>> {
        let descriptor = self.resolver.find_class(&self.syntax, name.as_str())?;
        match descriptor.kind {
            DescriptorKind::Class(_) => Some(ClassDeclaration::from_descriptor(self, &descriptor)),
            _ => None,
        }
    }

    /// Top-level or member functions with this fully qualified name.
    pub fn function_by_name(&self, name: &SymbolName) -> Vec<Arc<FunctionDeclaration>> {
        self.resolver
            .find_callables(&self.syntax, name.as_str())
            .iter()
            .filter(|descriptor| matches!(descriptor.kind, DescriptorKind::Function(_)))
            .map(|descriptor| FunctionDeclaration::from_descriptor(self, descriptor))
            .collect()
    }

    pub fn property_by_name(&self, name: &SymbolName) -> Option<Arc<PropertyDeclaration>> {
        self.resolver
            .find_callables(&self.syntax, name.as_str())
            .iter()
            .find(|descriptor| matches!(descriptor.kind, DescriptorKind::Property(_)))
            .map(|descriptor| PropertyDeclaration::from_descriptor(self, descriptor))
    }

    /// Every annotated symbol of the current round carrying the annotation.
    ///
    /// `annotation` is a fully qualified name, or a short name when it has
    /// no qualifier. Short names are compared first; qualified names are
    /// only resolved for entries whose short name matches.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn symbols_with_annotation(&self, annotation: &str) -> Vec<Node> {
        let wanted = SymbolName::new(annotation);
        let mut out = Vec::new();
        let mut stack: Vec<Node> = self.all_files().into_iter().map(Node::File).rev().collect();
        while let Some(node) = stack.pop() {
            let matches = node.annotations(self).iter().any(|entry| {
                if entry.short_name(self) != wanted.short_name() {
                    return false;
                }
                wanted.qualifier().is_empty()
                    || entry
                        .annotation_type(self)
                        .resolve(self)
                        .declaration(self)
                        .qualified_name(self)
                        .is_some_and(|name| name == wanted)
            });
            let children = node.symbol_children(self);
            if matches {
                out.push(node);
            }
            stack.extend(children.into_iter().rev());
        }
        out
    }

    pub fn name_from_str(&self, name: &str) -> SymbolName {
        SymbolName::new(name)
    }

    pub fn builtin_type(&self, builtin: Builtin) -> Type {
        get_ks_type_cached(self, &self.resolver.builtin_type(builtin))
    }

    pub fn any_type(&self) -> Type {
        self.builtin_type(Builtin::Any)
    }

    pub fn nothing_type(&self) -> Type {
        self.builtin_type(Builtin::Nothing)
    }

    pub fn unit_type(&self) -> Type {
        self.builtin_type(Builtin::Unit)
    }

    /// Type argument around an existing reference, e.g. to feed
    /// [`Type::replace`].
    pub fn type_argument(
        &self,
        reference: &Arc<TypeReference>,
        variance: Variance,
    ) -> Arc<TypeArgument> {
        TypeArgument::lite(self, reference, variance)
    }

    // Host access for wrappers

    pub(crate) fn name_text(&self, name: Name) -> Arc<str> {
        self.syntax.name_text(name)
    }

    pub(crate) fn descriptor(&self, id: DescriptorId) -> Option<Arc<Descriptor>> {
        self.resolver.descriptor(id)
    }

    pub(crate) fn resolve_declaration(&self, node: SyntaxId) -> Option<Arc<Descriptor>> {
        self.resolver.resolve_declaration(&self.syntax, node)
    }

    pub(crate) fn render_host(&self, ty: &HostType) -> String {
        render_type(ty, &*self.resolver)
    }

    /// Error type honouring [`SessionOptions::error_type_hints`].
    pub(crate) fn error_type(&self, hint: Option<&str>) -> ErrorType {
        if self.options.error_type_hints {
            ErrorType::new(hint)
        } else {
            ErrorType::new(None)
        }
    }

    /// File path and 1-based line of a node.
    pub(crate) fn location_of(&self, node: SyntaxId) -> Location {
        let Some(file) = self.syntax.file_of(node) else {
            return Location::NoLocation;
        };
        let Some(file_node) = self.syntax.kind(file).as_file() else {
            return Location::NoLocation;
        };
        Location::File {
            path: Arc::clone(&file_node.path),
            line: file_node.lines.line_of(self.syntax.span(node).start),
        }
    }

    /// Path of the file holding `node`, for error messages.
    pub(crate) fn file_path_of(&self, node: SyntaxId) -> Arc<str> {
        self.syntax
            .file_of(node)
            .and_then(|file| self.syntax.kind(file).as_file())
            .map_or_else(|| Arc::from("<unknown>"), |file| Arc::clone(&file.path))
    }

    /// Any declaration wrapper for a syntax node, or `None` for non-declarations.
    pub fn declaration_of(&self, node: SyntaxId) -> Option<Declaration> {
        Declaration::from_syntax(self, node)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("round", &self.syntax.round())
            .field("options", &self.options)
            .field("caches", &self.caches.stats())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
