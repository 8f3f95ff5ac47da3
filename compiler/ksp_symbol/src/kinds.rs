//! Small enums describing declarations and types.

use ksp_ir::syntax::UseSiteKeyword;
use ksp_ir::HostNullability;
use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
    Object,
    EnumClass,
    EnumEntry,
    AnnotationClass,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    TopLevel,
    Member,
    /// Java static member.
    Static,
    Lambda,
    Anonymous,
}

/// Declaration-site or use-site variance.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Variance {
    Star,
    Invariant,
    Covariant,
    Contravariant,
}

impl Variance {
    /// Keyword written in source; empty for invariant.
    pub fn label(self) -> &'static str {
        match self {
            Variance::Star => "*",
            Variance::Invariant => "",
            Variance::Covariant => "out",
            Variance::Contravariant => "in",
        }
    }
}

impl fmt::Display for Variance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<ksp_ir::ProjectionVariance> for Variance {
    fn from(variance: ksp_ir::ProjectionVariance) -> Self {
        match variance {
            ksp_ir::ProjectionVariance::Invariant => Variance::Invariant,
            ksp_ir::ProjectionVariance::In => Variance::Contravariant,
            ksp_ir::ProjectionVariance::Out => Variance::Covariant,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Nullability {
    Nullable,
    NotNull,
    /// Nullability unknown; from code without nullability information.
    Platform,
}

impl From<HostNullability> for Nullability {
    fn from(nullability: HostNullability) -> Self {
        match nullability {
            HostNullability::Nullable => Nullability::Nullable,
            HostNullability::NotNull => Nullability::NotNull,
            HostNullability::Flexible => Nullability::Platform,
        }
    }
}

/// `@target:Annotation`
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AnnotationUseSiteTarget {
    File,
    Property,
    Field,
    Get,
    Set,
    Receiver,
    Param,
    SetParam,
    Delegate,
}

impl From<UseSiteKeyword> for AnnotationUseSiteTarget {
    fn from(keyword: UseSiteKeyword) -> Self {
        match keyword {
            UseSiteKeyword::File => AnnotationUseSiteTarget::File,
            UseSiteKeyword::Property => AnnotationUseSiteTarget::Property,
            UseSiteKeyword::Field => AnnotationUseSiteTarget::Field,
            UseSiteKeyword::Get => AnnotationUseSiteTarget::Get,
            UseSiteKeyword::Set => AnnotationUseSiteTarget::Set,
            UseSiteKeyword::Receiver => AnnotationUseSiteTarget::Receiver,
            UseSiteKeyword::Param => AnnotationUseSiteTarget::Param,
            UseSiteKeyword::SetParam => AnnotationUseSiteTarget::SetParam,
            UseSiteKeyword::Delegate => AnnotationUseSiteTarget::Delegate,
        }
    }
}
