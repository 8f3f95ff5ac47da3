//! The error type and how its hint is chosen.

use super::Type;
use crate::session::Session;
use ksp_ir::TypeDiagnostic;
use std::fmt;
use std::sync::Arc;

/// Stand-in for a type that could not be resolved.
///
/// Reports `NULLABLE`, and every structural operation on it returns the
/// same error type. Two error types are equal when their hints are.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ErrorType {
    hint: Option<Arc<str>>,
}

impl ErrorType {
    pub fn new(hint: Option<&str>) -> Self {
        ErrorType {
            hint: hint.map(Arc::from),
        }
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub(crate) fn hint_arc(&self) -> Option<Arc<str>> {
        self.hint.clone()
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.hint {
            Some(hint) => write!(f, "<ERROR TYPE: {hint}>"),
            None => f.write_str("<ERROR TYPE>"),
        }
    }
}

/// Short hint for a host diagnostic: the name that failed to resolve.
pub(crate) fn diagnostic_hint(diagnostic: &TypeDiagnostic) -> String {
    match diagnostic {
        TypeDiagnostic::UnresolvedClass { name }
        | TypeDiagnostic::UnresolvedDeclaration { name }
        | TypeDiagnostic::UnresolvedTypeAlias { name } => name.to_string(),
        TypeDiagnostic::WrongArgumentCount {
            name,
            expected,
            found,
        } => format!("{name} (expected {expected} type arguments, found {found})"),
        TypeDiagnostic::Other(message) => format!("unresolved type ({message})"),
    }
}

/// Error type for a resolution that did not produce a usable type.
///
/// An error result keeps its own hint, a missing result is described by
/// the reference's text, anything else by the rendering of what resolved.
pub(crate) fn error_from_resolution(
    session: &Session,
    resolved: Option<&Type>,
    reference_text: &str,
) -> ErrorType {
    match resolved {
        Some(Type::Error(error)) => error.clone(),
        Some(resolved) => session.error_type(Some(&resolved.render(session))),
        None => session.error_type(Some(reference_text)),
    }
}
