//! Classes, interfaces, objects, enums and annotation classes.

use super::base::Repr;
use super::{
    ClassKey, Declaration, DeclarationBase, FunctionDeclaration, NodeKey, PropertyDeclaration,
    SourceFile, TypeParameterDeclaration,
};
use crate::annotation::Annotation;
use crate::kinds::ClassKind;
use crate::location::{Location, Origin};
use crate::name::SymbolName;
use crate::reference::{TypeArgument, TypeReference};
use crate::session::Session;
use crate::types::{get_ks_type_cached, Type};
use ksp_ir::syntax::{ClassKeyword, NodeKind};
use ksp_ir::{
    Descriptor, DescriptorFlags, HostClassKind, HostType, MemberKind, Modifiers, SyntaxId,
    TypeProjection,
};
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use std::sync::{Arc, OnceLock};

/// Simple name reported for anonymous objects.
const ANONYMOUS_NAME: &str = "<no name provided>";
/// Simple name of the classifier of an error type.
const ERROR_CLASS_NAME: &str = "<Error>";

pub struct ClassDeclaration {
    base: DeclarationBase,
    declarations: OnceLock<Vec<Declaration>>,
    primary_constructor: OnceLock<Option<Arc<FunctionDeclaration>>>,
    super_types: OnceLock<Vec<Arc<TypeReference>>>,
    sealed_subclasses: OnceLock<Vec<Arc<ClassDeclaration>>>,
    default_type: OnceLock<Option<HostType>>,
}

impl ClassDeclaration {
    fn new(repr: Repr) -> Self {
        ClassDeclaration {
            base: DeclarationBase::new(repr),
            declarations: OnceLock::new(),
            primary_constructor: OnceLock::new(),
            super_types: OnceLock::new(),
            sealed_subclasses: OnceLock::new(),
            default_type: OnceLock::new(),
        }
    }

    pub fn from_syntax(session: &Session, node: SyntaxId) -> Arc<ClassDeclaration> {
        session
            .caches()
            .classes
            .get_or_put(ClassKey::Node(NodeKey::Syntax(node)), || {
                Self::new(Repr::Source(node))
            })
    }

    /// Wrapper for a class descriptor. Source classes map to their syntax
    /// wrapper.
    pub fn from_descriptor(
        session: &Session,
        descriptor: &Arc<Descriptor>,
    ) -> Arc<ClassDeclaration> {
        if let Some(source) = descriptor.source {
            let is_class = session
                .syntax()
                .get(source)
                .is_some_and(|node| matches!(node.kind, NodeKind::Class(_)));
            if is_class {
                return Self::from_syntax(session, source);
            }
        }
        session
            .caches()
            .classes
            .get_or_put(ClassKey::Node(NodeKey::Descriptor(descriptor.id)), || {
                Self::new(Repr::Binary(Arc::clone(descriptor)))
            })
    }

    /// Classifier of an error type; one wrapper per hint.
    pub fn error(session: &Session, hint: Option<Arc<str>>) -> Arc<ClassDeclaration> {
        session
            .caches()
            .classes
            .get_or_put(ClassKey::ErrorType(hint.clone()), || {
                Self::new(Repr::ErrorClass { hint })
            })
    }

    pub(crate) fn from_node_key(session: &Session, key: NodeKey) -> Option<Arc<ClassDeclaration>> {
        match key {
            NodeKey::Syntax(node) => session
                .syntax()
                .kind(node)
                .as_class()
                .map(|_| Self::from_syntax(session, node)),
            NodeKey::Descriptor(id) => {
                let descriptor = session.descriptor(id)?;
                descriptor.as_class()?;
                Some(Self::from_descriptor(session, &descriptor))
            }
        }
    }

    pub(crate) fn base(&self) -> &DeclarationBase {
        &self.base
    }

    pub fn node(&self) -> Option<SyntaxId> {
        self.base.node()
    }

    pub(crate) fn node_key(&self) -> Option<NodeKey> {
        self.base.node_key()
    }

    /// Whether this is the classifier of an error type.
    pub fn is_error(&self) -> bool {
        matches!(self.base.repr(), Repr::ErrorClass { .. })
    }

    pub fn simple_name(&self, session: &Session) -> SymbolName {
        match self.base.repr() {
            Repr::ErrorClass { .. } => SymbolName::new(ERROR_CLASS_NAME),
            _ => self
                .base
                .name_text(session)
                .map_or_else(|| SymbolName::new(ANONYMOUS_NAME), SymbolName::from),
        }
    }

    pub fn qualified_name(&self, session: &Session) -> Option<SymbolName> {
        let simple = self.simple_name(session);
        self.base.qualified_name(session, simple.as_str())
    }

    pub fn package_name(&self, session: &Session) -> SymbolName {
        self.base.package_name(session)
    }

    pub fn parent_declaration(&self, session: &Session) -> Option<Declaration> {
        self.base.parent_declaration(session)
    }

    pub fn containing_file(&self, session: &Session) -> Option<Arc<SourceFile>> {
        self.base.containing_file(session)
    }

    pub fn type_parameters(&self, session: &Session) -> Vec<Arc<TypeParameterDeclaration>> {
        self.base.type_parameters(session)
    }

    pub fn doc_string(&self, session: &Session) -> Option<String> {
        self.base.doc_string(session)
    }

    pub fn modifiers(&self, session: &Session) -> Modifiers {
        self.base.declared_modifiers(session)
    }

    pub fn annotations(&self, session: &Session) -> Vec<Arc<Annotation>> {
        self.base.annotations(session)
    }

    pub fn origin(&self) -> Origin {
        self.base.origin()
    }

    pub fn location(&self, session: &Session) -> Location {
        self.base.location(session)
    }

    pub fn class_kind(&self, session: &Session) -> ClassKind {
        match self.base.repr() {
            Repr::Source(node) => {
                let Some(class) = session.syntax().kind(*node).as_class() else {
                    return ClassKind::Class;
                };
                match class.keyword {
                    ClassKeyword::Interface => ClassKind::Interface,
                    ClassKeyword::Object => ClassKind::Object,
                    ClassKeyword::EnumEntry => ClassKind::EnumEntry,
                    ClassKeyword::Class if class.modifiers.contains(Modifiers::ENUM) => {
                        ClassKind::EnumClass
                    }
                    ClassKeyword::Class if class.modifiers.contains(Modifiers::ANNOTATION) => {
                        ClassKind::AnnotationClass
                    }
                    ClassKeyword::Class => ClassKind::Class,
                }
            }
            Repr::Binary(descriptor) => match descriptor.as_class().map(|class| class.kind) {
                Some(HostClassKind::Interface) => ClassKind::Interface,
                Some(HostClassKind::Object) => ClassKind::Object,
                Some(HostClassKind::EnumClass) => ClassKind::EnumClass,
                Some(HostClassKind::EnumEntry) => ClassKind::EnumEntry,
                Some(HostClassKind::AnnotationClass) => ClassKind::AnnotationClass,
                Some(HostClassKind::Class) | None => ClassKind::Class,
            },
            Repr::SyntheticConstructor { .. } | Repr::ErrorClass { .. } => ClassKind::Class,
        }
    }

    pub fn is_companion_object(&self, session: &Session) -> bool {
        match self.base.repr() {
            Repr::Source(node) => session
                .syntax()
                .kind(*node)
                .as_class()
                .is_some_and(|class| {
                    class.keyword == ClassKeyword::Object
                        && class.modifiers.contains(Modifiers::COMPANION)
                }),
            Repr::Binary(descriptor) => descriptor.flags.contains(DescriptorFlags::COMPANION),
            Repr::SyntheticConstructor { .. } | Repr::ErrorClass { .. } => false,
        }
    }

    /// A primary or secondary constructor exists in source or in the
    /// descriptor.
    fn has_explicit_constructor(&self, session: &Session) -> bool {
        match self.base.repr() {
            Repr::Source(node) => {
                let syntax = session.syntax();
                let Some(class) = syntax.kind(*node).as_class() else {
                    return false;
                };
                class.primary_constructor.is_some()
                    || class.declarations.iter().any(|&member| {
                        syntax
                            .kind(member)
                            .as_function()
                            .is_some_and(|function| function.form.is_constructor())
                    })
            }
            Repr::Binary(descriptor) => descriptor
                .as_class()
                .is_some_and(|class| !class.constructors.is_empty()),
            Repr::SyntheticConstructor { .. } | Repr::ErrorClass { .. } => true,
        }
    }

    /// The no-argument constructor the model adds to a non-interface class
    /// that declares no constructor at all.
    pub fn synthetic_constructor(&self, session: &Session) -> Option<Arc<FunctionDeclaration>> {
        let key = self.node_key()?;
        if self.class_kind(session) == ClassKind::Interface || self.has_explicit_constructor(session)
        {
            return None;
        }
        Some(FunctionDeclaration::synthetic_constructor(session, key))
    }

    /// The primary constructor, then constructor properties, then members in
    /// declaration order, then the synthetic constructor if there is one.
    ///
    /// Fake overrides of binary classes are left out; inherited members are
    /// reachable through [`ClassDeclaration::get_all_functions`].
    pub fn declarations(&self, session: &Session) -> Vec<Declaration> {
        self.declarations
            .get_or_init(|| self.collect_declarations(session))
            .clone()
    }

    fn collect_declarations(&self, session: &Session) -> Vec<Declaration> {
        let mut out = Vec::new();
        match self.base.repr() {
            Repr::Source(node) => {
                let syntax = session.syntax();
                let Some(class) = syntax.kind(*node).as_class() else {
                    return out;
                };
                if let Some(constructor) = class.primary_constructor {
                    out.push(Declaration::Function(FunctionDeclaration::from_syntax(
                        session,
                        constructor,
                    )));
                    let parameters = syntax
                        .kind(constructor)
                        .as_function()
                        .map(|function| function.parameters.as_slice())
                        .unwrap_or_default();
                    out.extend(parameters.iter().filter_map(|&parameter| {
                        let binding = syntax.kind(parameter).as_parameter()?.binding;
                        binding.map(|_| {
                            Declaration::Property(PropertyDeclaration::from_syntax(
                                session, parameter,
                            ))
                        })
                    }));
                }
                out.extend(
                    class
                        .declarations
                        .iter()
                        .filter_map(|&member| Declaration::from_syntax(session, member)),
                );
            }
            Repr::Binary(descriptor) => {
                let Some(class) = descriptor.as_class() else {
                    return out;
                };
                for id in class.members.iter().chain(&class.constructors) {
                    let Some(member) = session.descriptor(*id) else {
                        continue;
                    };
                    if member.member_kind() == MemberKind::FakeOverride {
                        continue;
                    }
                    if let Some(declaration) = Declaration::from_descriptor(session, &member) {
                        out.push(declaration);
                    }
                }
            }
            Repr::SyntheticConstructor { .. } | Repr::ErrorClass { .. } => return out,
        }
        if let Some(constructor) = self.synthetic_constructor(session) {
            out.push(Declaration::Function(constructor));
        }
        out
    }

    /// The primary constructor.
    ///
    /// Classes and enum classes without any constructor report the
    /// synthetic one, which is the same wrapper found in
    /// [`ClassDeclaration::declarations`].
    pub fn primary_constructor(&self, session: &Session) -> Option<Arc<FunctionDeclaration>> {
        self.primary_constructor
            .get_or_init(|| {
                let explicit = match self.base.repr() {
                    Repr::Source(node) => session
                        .syntax()
                        .kind(*node)
                        .as_class()
                        .and_then(|class| class.primary_constructor)
                        .map(|constructor| FunctionDeclaration::from_syntax(session, constructor)),
                    Repr::Binary(descriptor) => descriptor
                        .as_class()
                        .and_then(|class| class.primary_constructor)
                        .and_then(|id| session.descriptor(id))
                        .map(|constructor| {
                            FunctionDeclaration::from_descriptor(session, &constructor)
                        }),
                    Repr::SyntheticConstructor { .. } | Repr::ErrorClass { .. } => return None,
                };
                explicit.or_else(|| {
                    matches!(
                        self.class_kind(session),
                        ClassKind::Class | ClassKind::EnumClass
                    )
                    .then(|| self.synthetic_constructor(session))
                    .flatten()
                })
            })
            .clone()
    }

    /// Declared supertypes; `kotlin.Any` when none are written.
    pub fn super_types(&self, session: &Session) -> Vec<Arc<TypeReference>> {
        self.super_types
            .get_or_init(|| {
                let declared: Vec<Arc<TypeReference>> = match self.base.repr() {
                    Repr::Source(node) => session
                        .syntax()
                        .kind(*node)
                        .as_class()
                        .map(|class| class.supertypes.as_slice())
                        .unwrap_or_default()
                        .iter()
                        .map(|&supertype| TypeReference::from_syntax(session, supertype))
                        .collect(),
                    Repr::Binary(descriptor) => descriptor
                        .as_class()
                        .map(|class| class.supertypes.as_slice())
                        .unwrap_or_default()
                        .iter()
                        .map(|supertype| TypeReference::from_host(session, supertype))
                        .collect(),
                    Repr::SyntheticConstructor { .. } | Repr::ErrorClass { .. } => Vec::new(),
                };
                if !declared.is_empty() || self.is_any(session) {
                    return declared;
                }
                vec![TypeReference::synthetic(session, session.any_type())]
            })
            .clone()
    }

    fn is_any(&self, session: &Session) -> bool {
        self.qualified_name(session)
            .is_some_and(|name| name == "kotlin.Any")
    }

    /// Direct subclasses of a sealed class, in the host's order.
    ///
    /// Every call on a sealed class is recorded with the lookup tracker,
    /// since adding a subclass anywhere changes the answer.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn sealed_subclasses(&self, session: &Session) -> Vec<Arc<ClassDeclaration>> {
        if !self.modifiers(session).contains(Modifiers::SEALED) {
            return Vec::new();
        }
        let name = self
            .qualified_name(session)
            .unwrap_or_else(|| self.simple_name(session));
        session.record_get_sealed_subclasses(name.as_str());
        self.sealed_subclasses
            .get_or_init(|| {
                let Some(descriptor) = self.base.descriptor(session) else {
                    return Vec::new();
                };
                descriptor
                    .as_class()
                    .map(|class| class.sealed_subclasses.as_slice())
                    .unwrap_or_default()
                    .iter()
                    .filter_map(|&id| session.descriptor(id))
                    .filter(|subclass| subclass.as_class().is_some())
                    .map(|subclass| ClassDeclaration::from_descriptor(session, &subclass))
                    .collect()
            })
            .clone()
    }

    /// `C<T1, .., Tn>` over the class's own type parameters.
    fn default_host_type(&self, session: &Session) -> Option<HostType> {
        self.default_type
            .get_or_init(|| {
                let descriptor = self.base.descriptor(session)?;
                let class = descriptor.as_class()?;
                let arguments = class
                    .type_parameters
                    .iter()
                    .map(|&parameter| {
                        TypeProjection::invariant(HostType::type_parameter(parameter, false))
                    })
                    .collect();
                Some(HostType::class(descriptor.id, arguments, false))
            })
            .clone()
    }

    fn error_type(&self, session: &Session) -> Type {
        let hint = match self.base.repr() {
            Repr::ErrorClass { hint } => hint.as_deref().map(str::to_owned),
            _ => Some(self.simple_name(session).to_string()),
        };
        Type::Error(session.error_type(hint.as_deref()))
    }

    /// The class applied to `arguments`; its own type parameters when
    /// `arguments` is empty.
    pub fn as_type(&self, session: &Session, arguments: &[Arc<TypeArgument>]) -> Type {
        let Some(host) = self.default_host_type(session) else {
            return self.error_type(session);
        };
        let ty = get_ks_type_cached(session, &host);
        if arguments.is_empty() {
            ty
        } else {
            ty.replace(session, arguments)
        }
    }

    /// The class with every type argument `*`.
    pub fn as_star_projected_type(&self, session: &Session) -> Type {
        match self.default_host_type(session) {
            Some(host) => get_ks_type_cached(session, &host).star_projection(session),
            None => self.error_type(session),
        }
    }

    /// Functions declared directly in this class, constructors excluded.
    pub fn declared_functions(&self, session: &Session) -> Vec<Arc<FunctionDeclaration>> {
        self.declarations(session)
            .into_iter()
            .filter_map(|declaration| match declaration {
                Declaration::Function(function) if !function.is_constructor(session) => {
                    Some(function)
                }
                _ => None,
            })
            .collect()
    }

    pub fn declared_properties(&self, session: &Session) -> Vec<Arc<PropertyDeclaration>> {
        self.declarations(session)
            .into_iter()
            .filter_map(|declaration| match declaration {
                Declaration::Property(property) => Some(property),
                _ => None,
            })
            .collect()
    }

    /// Declared and inherited functions. A declaration hides inherited
    /// ones with the same name and parameter count.
    pub fn get_all_functions(&self, session: &Session) -> Vec<Arc<FunctionDeclaration>> {
        let mut seen = FxHashSet::default();
        let mut out = Vec::new();
        let inherited = self.superclasses(session);
        let levels = std::iter::once(self.declared_functions(session))
            .chain(inherited.iter().map(|class| class.declared_functions(session)));
        for function in levels.flatten() {
            let Ok(name) = function.try_simple_name(session) else {
                continue;
            };
            if seen.insert((name, function.parameters(session).len())) {
                out.push(function);
            }
        }
        out
    }

    /// Declared and inherited properties, nearest declaration first.
    pub fn get_all_properties(&self, session: &Session) -> Vec<Arc<PropertyDeclaration>> {
        let mut seen = FxHashSet::default();
        let inherited = self.superclasses(session);
        std::iter::once(self.declared_properties(session))
            .chain(inherited.iter().map(|class| class.declared_properties(session)))
            .flatten()
            .filter(|property| seen.insert(property.simple_name(session)))
            .collect()
    }

    /// Transitive superclasses and superinterfaces, breadth first, each once.
    fn superclasses(&self, session: &Session) -> Vec<Arc<ClassDeclaration>> {
        let mut visited: FxHashSet<*const ClassDeclaration> = FxHashSet::default();
        visited.insert(std::ptr::from_ref(self));
        let mut queue: VecDeque<Arc<TypeReference>> = self.super_types(session).into();
        let mut out = Vec::new();
        while let Some(reference) = queue.pop_front() {
            let Declaration::Class(class) = reference.resolve(session).declaration(session) else {
                continue;
            };
            if class.is_error() || !visited.insert(Arc::as_ptr(&class)) {
                continue;
            }
            queue.extend(class.super_types(session));
            out.push(class);
        }
        out
    }
}

impl std::fmt::Debug for ClassDeclaration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ClassDeclaration({:?})", self.base.repr())
    }
}
