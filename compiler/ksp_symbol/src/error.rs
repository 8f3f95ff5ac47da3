//! Hard errors for host trees the model cannot wrap.
//!
//! Ordinary resolution failures never surface here; they become error types
//! or `None`. A [`CompilerError`] means the host handed over a shape its own
//! front end should have rejected.

use std::sync::Arc;

/// A host invariant violation, positioned in a source file.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{file}:{offset}: {message}")]
pub struct CompilerError {
    pub file: Arc<str>,
    pub offset: u32,
    pub message: String,
}

impl CompilerError {
    pub fn new(file: Arc<str>, offset: u32, message: impl Into<String>) -> Self {
        CompilerError {
            file,
            offset,
            message: message.into(),
        }
    }
}
