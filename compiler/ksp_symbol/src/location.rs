//! Where a node came from.

use std::fmt;
use std::sync::Arc;

/// Source position of a node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Location {
    /// 1-based line in a source file.
    File { path: Arc<str>, line: u32 },
    /// Binary and synthetic nodes have no position.
    NoLocation,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::File { path, line } => write!(f, "{path}:{line}"),
            Location::NoLocation => f.write_str("<no location>"),
        }
    }
}

/// What a node wraps.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Origin {
    /// A syntax node of a file being processed.
    Source,
    /// A descriptor from a compiled dependency.
    Binary,
    /// Manufactured by the model, with nothing underneath.
    Synthetic,
}
