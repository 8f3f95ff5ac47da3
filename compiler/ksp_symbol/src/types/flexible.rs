//! Shape of flexible types, read off the host rendering.
//!
//! The host gives no structured flag for these shapes; both predicates
//! match the shorthand the host renderer prints for them.

/// `(Mutable)List<T>`: read-only or mutable, unknown which.
pub(crate) fn is_mutability_flexible(rendered: &str) -> bool {
    rendered.starts_with("(Mutable)")
}

/// `Array<(out) T>`: invariant or covariant, unknown which.
pub(crate) fn is_covariance_flexible(rendered: &str) -> bool {
    rendered.starts_with("Array<(out) ")
}
