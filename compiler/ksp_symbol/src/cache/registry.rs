//! The set of identity caches one session owns.

use super::{IdKey, IdentityCache};
use crate::annotation::{Annotation, AnnotationKey, ValueArgument, ValueArgumentKey};
use crate::declaration::{
    AccessorKey, ClassDeclaration, ClassKey, FunctionDeclaration, FunctionKey, NodeKey,
    ParameterKey, PropertyAccessor, PropertyDeclaration, SourceFile, TypeAliasDeclaration,
    TypeParameterDeclaration, ValueParameter,
};
use crate::expression::Expression;
use crate::reference::{
    CallableReference, ClassifierKey, ClassifierReference, DynamicReference, TypeArgument,
    TypeArgumentKey, TypeReference, TypeReferenceKey,
};
use crate::types::ResolvedType;
use ksp_ir::{HostTypeData, SyntaxId};

/// One identity cache per wrapper kind.
///
/// Constructed with its session and dropped with it; [`CacheRegistry::clear`]
/// forgets every wrapper at once.
#[derive(Debug, Default)]
pub struct CacheRegistry {
    pub(crate) files: IdentityCache<SyntaxId, SourceFile>,
    pub(crate) classes: IdentityCache<ClassKey, ClassDeclaration>,
    pub(crate) functions: IdentityCache<FunctionKey, FunctionDeclaration>,
    pub(crate) properties: IdentityCache<NodeKey, PropertyDeclaration>,
    pub(crate) accessors: IdentityCache<AccessorKey, PropertyAccessor>,
    pub(crate) parameters: IdentityCache<ParameterKey, ValueParameter>,
    pub(crate) type_aliases: IdentityCache<NodeKey, TypeAliasDeclaration>,
    pub(crate) type_parameters: IdentityCache<NodeKey, TypeParameterDeclaration>,
    pub(crate) type_references: IdentityCache<TypeReferenceKey, TypeReference>,
    pub(crate) classifier_references: IdentityCache<ClassifierKey, ClassifierReference>,
    pub(crate) callable_references: IdentityCache<SyntaxId, CallableReference>,
    pub(crate) dynamic_references: IdentityCache<SyntaxId, DynamicReference>,
    pub(crate) type_arguments: IdentityCache<TypeArgumentKey, TypeArgument>,
    pub(crate) types: IdentityCache<IdKey<HostTypeData>, ResolvedType>,
    pub(crate) annotations: IdentityCache<AnnotationKey, Annotation>,
    pub(crate) value_arguments: IdentityCache<ValueArgumentKey, ValueArgument>,
    pub(crate) expressions: IdentityCache<SyntaxId, Expression>,
}

/// Number of live wrappers per kind.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub files: usize,
    pub declarations: usize,
    pub parameters: usize,
    pub references: usize,
    pub types: usize,
    pub annotations: usize,
    pub expressions: usize,
}

impl CacheStats {
    pub fn total(&self) -> usize {
        self.files
            + self.declarations
            + self.parameters
            + self.references
            + self.types
            + self.annotations
            + self.expressions
    }
}

impl CacheRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every wrapper.
    pub fn clear(&self) {
        self.files.clear();
        self.classes.clear();
        self.functions.clear();
        self.properties.clear();
        self.accessors.clear();
        self.parameters.clear();
        self.type_aliases.clear();
        self.type_parameters.clear();
        self.type_references.clear();
        self.classifier_references.clear();
        self.callable_references.clear();
        self.dynamic_references.clear();
        self.type_arguments.clear();
        self.types.clear();
        self.annotations.clear();
        self.value_arguments.clear();
        self.expressions.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            files: self.files.len(),
            declarations: self.classes.len()
                + self.functions.len()
                + self.properties.len()
                + self.accessors.len()
                + self.type_aliases.len()
                + self.type_parameters.len(),
            parameters: self.parameters.len(),
            references: self.type_references.len()
                + self.classifier_references.len()
                + self.callable_references.len()
                + self.dynamic_references.len()
                + self.type_arguments.len(),
            types: self.types.len(),
            annotations: self.annotations.len() + self.value_arguments.len(),
            expressions: self.expressions.len(),
        }
    }
}
