//! Source files.

use super::Declaration;
use crate::annotation::Annotation;
use crate::location::{Location, Origin};
use crate::name::SymbolName;
use crate::session::Session;
use ksp_ir::syntax::FileNode;
use ksp_ir::SyntaxId;
use std::sync::{Arc, OnceLock};

/// One source file of a processing round.
pub struct SourceFile {
    node: SyntaxId,
    declarations: OnceLock<Vec<Declaration>>,
}

impl SourceFile {
    pub fn from_syntax(session: &Session, node: SyntaxId) -> Arc<SourceFile> {
        session.caches().files.get_or_put(node, || SourceFile {
            node,
            declarations: OnceLock::new(),
        })
    }

    pub fn node(&self) -> SyntaxId {
        self.node
    }

    fn file_node<'s>(&self, session: &'s Session) -> Option<&'s FileNode> {
        session.syntax().kind(self.node).as_file()
    }

    pub fn file_path(&self, session: &Session) -> Arc<str> {
        self.file_node(session)
            .map_or_else(|| Arc::from(""), |file| Arc::clone(&file.path))
    }

    /// Last segment of the path.
    pub fn file_name(&self, session: &Session) -> String {
        let path = self.file_path(session);
        path.rsplit(['/', '\\']).next().unwrap_or_default().to_owned()
    }

    pub fn package_name(&self, session: &Session) -> SymbolName {
        self.file_node(session).map_or_else(
            || SymbolName::new(""),
            |file| SymbolName::from(Arc::clone(&file.package)),
        )
    }

    /// Top-level declarations in source order.
    pub fn declarations(&self, session: &Session) -> Vec<Declaration> {
        self.declarations
            .get_or_init(|| {
                self.file_node(session)
                    .map(|file| file.declarations.as_slice())
                    .unwrap_or_default()
                    .iter()
                    .filter_map(|&node| Declaration::from_syntax(session, node))
                    .collect()
            })
            .clone()
    }

    /// `@file:` annotations.
    pub fn annotations(&self, session: &Session) -> Vec<Arc<Annotation>> {
        self.file_node(session)
            .map(|file| file.annotations.as_slice())
            .unwrap_or_default()
            .iter()
            .map(|&entry| Annotation::from_syntax(session, entry))
            .collect()
    }

    pub fn origin(&self) -> Origin {
        Origin::Source
    }

    /// The file itself, at line 1.
    pub fn location(&self, session: &Session) -> Location {
        Location::File {
            path: self.file_path(session),
            line: 1,
        }
    }
}

impl std::fmt::Debug for SourceFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SourceFile({:?})", self.node)
    }
}
