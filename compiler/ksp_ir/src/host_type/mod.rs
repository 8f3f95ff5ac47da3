//! The host's resolved type representation.
//!
//! # Design
//!
//! [`HostType`] is an `Arc` around immutable [`HostTypeData`]. Two handles
//! compare equal when their data is structurally equal; the symbol model
//! additionally keys its caches on the `Arc` pointer itself, so a host that
//! hands out the same `HostType` for the same resolution gets the same
//! model object back.
//!
//! Flexible types carry a lower and an upper bound and come from code
//! whose nullability or mutability is unknown. They render with the
//! `T!`, `(Mutable)List<T>` and `Array<(out) T>` shorthands.

use crate::{AnnotationDescriptor, DescriptorId, DescriptorKind, DescriptorSource};
use smallvec::SmallVec;
use std::sync::Arc;

/// Variance written at a use site.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum ProjectionVariance {
    #[default]
    Invariant,
    In,
    Out,
}

/// One type argument of a host type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeProjection {
    Star,
    Type {
        variance: ProjectionVariance,
        ty: HostType,
    },
}

impl TypeProjection {
    pub fn invariant(ty: HostType) -> Self {
        TypeProjection::Type {
            variance: ProjectionVariance::Invariant,
            ty,
        }
    }

    pub fn ty(&self) -> Option<&HostType> {
        match self {
            TypeProjection::Star => None,
            TypeProjection::Type { ty, .. } => Some(ty),
        }
    }
}

/// What a simple host type is an instance of.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeConstructor {
    Class(DescriptorId),
    TypeParameter(DescriptorId),
    /// The host found a name but no declaration behind it.
    NotFound(Arc<str>),
}

/// Why the host failed to resolve a type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeDiagnostic {
    UnresolvedClass { name: Arc<str> },
    UnresolvedDeclaration { name: Arc<str> },
    UnresolvedTypeAlias { name: Arc<str> },
    WrongArgumentCount {
        name: Arc<str>,
        expected: usize,
        found: usize,
    },
    /// Anything the host could not classify.
    Other(Arc<str>),
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum HostNullability {
    Nullable,
    NotNull,
    Flexible,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum HostTypeData {
    Simple {
        constructor: TypeConstructor,
        arguments: SmallVec<[TypeProjection; 2]>,
        nullable: bool,
        annotations: Vec<AnnotationDescriptor>,
    },
    Flexible {
        lower: HostType,
        upper: HostType,
    },
    Error(TypeDiagnostic),
}

/// Shared handle to a resolved host type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HostType(Arc<HostTypeData>);

impl HostType {
    pub fn new(data: HostTypeData) -> Self {
        HostType(Arc::new(data))
    }

    pub fn class(id: DescriptorId, arguments: Vec<TypeProjection>, nullable: bool) -> Self {
        HostType::new(HostTypeData::Simple {
            constructor: TypeConstructor::Class(id),
            arguments: arguments.into_iter().collect(),
            nullable,
            annotations: Vec::new(),
        })
    }

    pub fn type_parameter(id: DescriptorId, nullable: bool) -> Self {
        HostType::new(HostTypeData::Simple {
            constructor: TypeConstructor::TypeParameter(id),
            arguments: SmallVec::new(),
            nullable,
            annotations: Vec::new(),
        })
    }

    pub fn not_found(name: &str) -> Self {
        HostType::new(HostTypeData::Simple {
            constructor: TypeConstructor::NotFound(Arc::from(name)),
            arguments: SmallVec::new(),
            nullable: false,
            annotations: Vec::new(),
        })
    }

    pub fn flexible(lower: HostType, upper: HostType) -> Self {
        HostType::new(HostTypeData::Flexible { lower, upper })
    }

    pub fn error(diagnostic: TypeDiagnostic) -> Self {
        HostType::new(HostTypeData::Error(diagnostic))
    }

    /// Same type with annotations attached.
    #[must_use]
    pub fn with_annotations(&self, annotations: Vec<AnnotationDescriptor>) -> Self {
        match self.data() {
            HostTypeData::Simple {
                constructor,
                arguments,
                nullable,
                ..
            } => HostType::new(HostTypeData::Simple {
                constructor: constructor.clone(),
                arguments: arguments.clone(),
                nullable: *nullable,
                annotations,
            }),
            _ => self.clone(),
        }
    }

    pub fn data(&self) -> &HostTypeData {
        &self.0
    }

    /// The shared allocation, for identity-keyed caches.
    pub fn arc(&self) -> &Arc<HostTypeData> {
        &self.0
    }

    pub fn ptr_eq(a: &HostType, b: &HostType) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    pub fn is_error(&self) -> bool {
        matches!(*self.0, HostTypeData::Error(_))
    }

    pub fn diagnostic(&self) -> Option<&TypeDiagnostic> {
        match &*self.0 {
            HostTypeData::Error(diagnostic) => Some(diagnostic),
            _ => None,
        }
    }

    pub fn is_flexible(&self) -> bool {
        matches!(*self.0, HostTypeData::Flexible { .. })
    }

    /// The simple type this one behaves as by default; the lower bound of a
    /// flexible type.
    pub fn lower_bound(&self) -> &HostType {
        match &*self.0 {
            HostTypeData::Flexible { lower, .. } => lower.lower_bound(),
            _ => self,
        }
    }

    pub fn constructor(&self) -> Option<&TypeConstructor> {
        match self.lower_bound().data() {
            HostTypeData::Simple { constructor, .. } => Some(constructor),
            _ => None,
        }
    }

    pub fn arguments(&self) -> &[TypeProjection] {
        match self.lower_bound().data() {
            HostTypeData::Simple { arguments, .. } => arguments,
            _ => &[],
        }
    }

    pub fn annotations(&self) -> &[AnnotationDescriptor] {
        match self.lower_bound().data() {
            HostTypeData::Simple { annotations, .. } => annotations,
            _ => &[],
        }
    }

    pub fn nullability(&self) -> HostNullability {
        match &*self.0 {
            HostTypeData::Simple { nullable: true, .. } | HostTypeData::Error(_) => {
                HostNullability::Nullable
            }
            HostTypeData::Simple { nullable: false, .. } => HostNullability::NotNull,
            HostTypeData::Flexible { .. } => HostNullability::Flexible,
        }
    }

    /// Written with `?` in source.
    pub fn is_marked_nullable(&self) -> bool {
        matches!(*self.0, HostTypeData::Simple { nullable: true, .. })
    }

    #[must_use]
    pub fn make_nullable(&self) -> HostType {
        self.with_nullability(true)
    }

    #[must_use]
    pub fn make_not_nullable(&self) -> HostType {
        self.with_nullability(false)
    }

    fn with_nullability(&self, nullable: bool) -> HostType {
        match &*self.0 {
            HostTypeData::Simple {
                constructor,
                arguments,
                nullable: current,
                annotations,
            } => {
                if *current == nullable {
                    return self.clone();
                }
                HostType::new(HostTypeData::Simple {
                    constructor: constructor.clone(),
                    arguments: arguments.clone(),
                    nullable,
                    annotations: annotations.clone(),
                })
            }
            // Fixing the nullability of a flexible type collapses it.
            HostTypeData::Flexible { lower, upper } => {
                if nullable {
                    upper.with_nullability(true)
                } else {
                    lower.with_nullability(false)
                }
            }
            HostTypeData::Error(_) => self.clone(),
        }
    }

    /// Substitute type arguments. `None` when the arity differs or the type
    /// has no constructor to apply them to.
    pub fn replace_arguments(&self, new_arguments: Vec<TypeProjection>) -> Option<HostType> {
        match &*self.0 {
            HostTypeData::Simple {
                constructor,
                arguments,
                nullable,
                annotations,
            } => {
                if arguments.len() != new_arguments.len() {
                    return None;
                }
                Some(HostType::new(HostTypeData::Simple {
                    constructor: constructor.clone(),
                    arguments: new_arguments.into_iter().collect(),
                    nullable: *nullable,
                    annotations: annotations.clone(),
                }))
            }
            HostTypeData::Flexible { lower, upper } => {
                let lower = lower.replace_arguments(new_arguments.clone())?;
                let upper = upper.replace_arguments(new_arguments)?;
                Some(HostType::flexible(lower, upper))
            }
            HostTypeData::Error(_) => None,
        }
    }

    /// Every argument replaced by `*`.
    #[must_use]
    pub fn star_projection(&self) -> HostType {
        let stars = vec![TypeProjection::Star; self.arguments().len()];
        self.replace_arguments(stars).unwrap_or_else(|| self.clone())
    }
}

/// Render a host type the way the host compiler prints it in diagnostics.
pub fn render_type(ty: &HostType, descriptors: &dyn DescriptorSource) -> String {
    let mut out = String::new();
    render_into(&mut out, ty, descriptors);
    out
}

fn render_into(out: &mut String, ty: &HostType, descriptors: &dyn DescriptorSource) {
    match ty.data() {
        HostTypeData::Simple {
            constructor,
            arguments,
            nullable,
            ..
        } => {
            out.push_str(&constructor_name(constructor, descriptors));
            if !arguments.is_empty() {
                out.push('<');
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    match argument {
                        TypeProjection::Star => out.push('*'),
                        TypeProjection::Type { variance, ty } => {
                            match variance {
                                ProjectionVariance::Invariant => {}
                                ProjectionVariance::In => out.push_str("in "),
                                ProjectionVariance::Out => out.push_str("out "),
                            }
                            render_into(out, ty, descriptors);
                        }
                    }
                }
                out.push('>');
            }
            if *nullable {
                out.push('?');
            }
        }
        HostTypeData::Flexible { lower, upper } => {
            out.push_str(&render_flexible(
                &render_type(lower, descriptors),
                &render_type(upper, descriptors),
            ));
        }
        HostTypeData::Error(diagnostic) => {
            out.push_str("[Error type: ");
            out.push_str(&diagnostic_text(diagnostic));
            out.push(']');
        }
    }
}

fn render_flexible(lower: &str, upper: &str) -> String {
    let upper_core = upper.strip_suffix('?').unwrap_or(upper);
    let lower_core = lower.strip_suffix('?').unwrap_or(lower);
    let mark = match (lower.ends_with('?'), upper.ends_with('?')) {
        (false, true) => "!",
        (true, _) => "?",
        (false, false) => "",
    };

    if lower_core == upper_core {
        return format!("{upper_core}{mark}");
    }
    if let Some(read_only) = lower_core.strip_prefix("Mutable") {
        if read_only == upper_core {
            return format!("(Mutable){upper_core}{mark}");
        }
    }
    if let Some(element) = upper_core.strip_prefix("Array<out ") {
        if lower_core.strip_prefix("Array<") == Some(element) {
            return format!("Array<(out) {element}{mark}");
        }
    }
    format!("({lower}..{upper})")
}

fn constructor_name(constructor: &TypeConstructor, descriptors: &dyn DescriptorSource) -> String {
    match constructor {
        TypeConstructor::Class(id) | TypeConstructor::TypeParameter(id) => {
            descriptors.descriptor(*id).map_or_else(
                || format!("<unknown {}>", id.raw()),
                |d| match d.kind {
                    DescriptorKind::NotFound => d
                        .qualified_name
                        .as_deref()
                        .unwrap_or("<not found>")
                        .to_owned(),
                    _ => descriptors.name_text(d.name).to_string(),
                },
            )
        }
        TypeConstructor::NotFound(name) => name.to_string(),
    }
}

/// Plain-text description of a diagnostic.
pub(crate) fn diagnostic_text(diagnostic: &TypeDiagnostic) -> String {
    match diagnostic {
        TypeDiagnostic::UnresolvedClass { name } => format!("unresolved class {name}"),
        TypeDiagnostic::UnresolvedDeclaration { name } => format!("unresolved declaration {name}"),
        TypeDiagnostic::UnresolvedTypeAlias { name } => format!("unresolved type alias {name}"),
        TypeDiagnostic::WrongArgumentCount {
            name,
            expected,
            found,
        } => format!("{name} expects {expected} type arguments, found {found}"),
        TypeDiagnostic::Other(message) => message.to_string(),
    }
}

#[cfg(test)]
mod tests;
