//! Qualified names.

use std::fmt;
use std::sync::Arc;

/// A possibly qualified name such as `kotlin.collections.List`.
///
/// Qualifier and short name are split at the last `.`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolName(Arc<str>);

impl SymbolName {
    pub fn new(name: &str) -> Self {
        SymbolName(Arc::from(name))
    }

    /// Join a qualifier and a short name; an empty qualifier is dropped.
    pub fn qualified(qualifier: &str, short_name: &str) -> Self {
        if qualifier.is_empty() {
            SymbolName::new(short_name)
        } else {
            SymbolName(Arc::from(format!("{qualifier}.{short_name}")))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Everything before the last `.`, or `""` for a simple name.
    pub fn qualifier(&self) -> &str {
        self.0.rfind('.').map_or("", |dot| &self.0[..dot])
    }

    /// The last segment.
    pub fn short_name(&self) -> &str {
        self.0.rfind('.').map_or(&*self.0, |dot| &self.0[dot + 1..])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SymbolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for SymbolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolName({:?})", &*self.0)
    }
}

impl From<&str> for SymbolName {
    fn from(name: &str) -> Self {
        SymbolName::new(name)
    }
}

impl From<Arc<str>> for SymbolName {
    fn from(name: Arc<str>) -> Self {
        SymbolName(name)
    }
}

impl PartialEq<str> for SymbolName {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for SymbolName {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

#[cfg(test)]
mod tests;
