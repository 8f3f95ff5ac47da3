//! Functions, constructors and function literals.

use super::base::Repr;
use super::{
    find_overridee, overrides_descriptor, ClassDeclaration, Declaration, DeclarationBase,
    FunctionKey, NodeKey, SourceFile, TypeParameterDeclaration, ValueParameter,
};
use crate::annotation::Annotation;
use crate::error::CompilerError;
use crate::expression::{local_declarations, Expression};
use crate::kinds::{ClassKind, FunctionKind};
use crate::location::{Location, Origin};
use crate::name::SymbolName;
use crate::reference::TypeReference;
use crate::session::Session;
use crate::types::{error_from_resolution, get_ks_type_cached, Type};
use ksp_ir::syntax::{FunctionForm, FunctionNode, NodeKind};
use ksp_ir::{Descriptor, DescriptorFlags, Modality, Modifiers, SyntaxId};
use std::sync::{Arc, OnceLock};

/// Simple name of every constructor.
const CONSTRUCTOR_NAME: &str = "<init>";
const LITERAL_NAME: &str = "<anonymous>";

pub struct FunctionDeclaration {
    base: DeclarationBase,
    parameters: OnceLock<Vec<Arc<ValueParameter>>>,
}

impl FunctionDeclaration {
    fn new(repr: Repr) -> Self {
        FunctionDeclaration {
            base: DeclarationBase::new(repr),
            parameters: OnceLock::new(),
        }
    }

    pub fn from_syntax(session: &Session, node: SyntaxId) -> Arc<FunctionDeclaration> {
        session
            .caches()
            .functions
            .get_or_put(FunctionKey::Node(NodeKey::Syntax(node)), || {
                Self::new(Repr::Source(node))
            })
    }

    /// Wrapper for a function descriptor. Source functions map to their
    /// syntax wrapper.
    pub fn from_descriptor(
        session: &Session,
        descriptor: &Arc<Descriptor>,
    ) -> Arc<FunctionDeclaration> {
        if let Some(source) = descriptor.source {
            let is_function = session
                .syntax()
                .get(source)
                .is_some_and(|node| matches!(node.kind, NodeKind::Function(_)));
            if is_function {
                return Self::from_syntax(session, source);
            }
        }
        session.caches().functions.get_or_put(
            FunctionKey::Node(NodeKey::Descriptor(descriptor.id)),
            || Self::new(Repr::Binary(Arc::clone(descriptor))),
        )
    }

    /// The no-argument constructor of a class that declares none.
    pub(crate) fn synthetic_constructor(
        session: &Session,
        class: NodeKey,
    ) -> Arc<FunctionDeclaration> {
        session
            .caches()
            .functions
            .get_or_put(FunctionKey::SyntheticConstructor(class), || {
                Self::new(Repr::SyntheticConstructor { class })
            })
    }

    pub(crate) fn base(&self) -> &DeclarationBase {
        &self.base
    }

    pub fn node(&self) -> Option<SyntaxId> {
        self.base.node()
    }

    fn syntax_node<'s>(&self, session: &'s Session) -> Option<&'s FunctionNode> {
        session.syntax().kind(self.node()?).as_function()
    }

    /// Class of a synthetic constructor.
    pub(crate) fn synthetic_constructor_class(
        &self,
        session: &Session,
    ) -> Option<Arc<ClassDeclaration>> {
        match self.base.repr() {
            Repr::SyntheticConstructor { class } => ClassDeclaration::from_node_key(session, *class),
            _ => None,
        }
    }

    pub fn is_synthetic_constructor(&self) -> bool {
        matches!(self.base.repr(), Repr::SyntheticConstructor { .. })
    }

    pub fn is_constructor(&self, session: &Session) -> bool {
        match self.base.repr() {
            Repr::Source(_) => self
                .syntax_node(session)
                .is_some_and(|function| function.form.is_constructor()),
            Repr::Binary(descriptor) => descriptor
                .as_function()
                .is_some_and(|function| function.is_constructor),
            Repr::SyntheticConstructor { .. } => true,
            Repr::ErrorClass { .. } => false,
        }
    }

    /// `<init>` for constructors and `<anonymous>` for function literals.
    ///
    /// A named function the host left without a name is a
    /// [`CompilerError`].
    pub fn try_simple_name(&self, session: &Session) -> Result<SymbolName, CompilerError> {
        if self.is_constructor(session) {
            return Ok(SymbolName::new(CONSTRUCTOR_NAME));
        }
        match self.base.repr() {
            Repr::Source(node) => {
                let Some(function) = self.syntax_node(session) else {
                    return Err(self.unnamed_error(session, *node));
                };
                match (function.form, function.name) {
                    (FunctionForm::Literal { .. }, _) => Ok(SymbolName::new(LITERAL_NAME)),
                    (_, Some(name)) => Ok(SymbolName::from(session.name_text(name))),
                    (_, None) => Err(self.unnamed_error(session, *node)),
                }
            }
            _ => Ok(self
                .base
                .name_text(session)
                .map_or_else(|| SymbolName::new(LITERAL_NAME), SymbolName::from)),
        }
    }

    fn unnamed_error(&self, session: &Session, node: SyntaxId) -> CompilerError {
        CompilerError::new(
            session.file_path_of(node),
            session.syntax().span(node).start,
            "function declaration has no name",
        )
    }

    /// # Panics
    /// Panics when [`FunctionDeclaration::try_simple_name`] fails.
    pub fn simple_name(&self, session: &Session) -> SymbolName {
        match self.try_simple_name(session) {
            Ok(name) => name,
            Err(error) => panic!("{error}"),
        }
    }

    pub fn qualified_name(&self, session: &Session) -> Option<SymbolName> {
        if let Repr::SyntheticConstructor { .. } = self.base.repr() {
            let class = self.synthetic_constructor_class(session)?;
            let class_name = class.qualified_name(session)?;
            return Some(SymbolName::qualified(class_name.as_str(), CONSTRUCTOR_NAME));
        }
        let simple = self.try_simple_name(session).ok()?;
        self.base.qualified_name(session, simple.as_str())
    }

    pub fn package_name(&self, session: &Session) -> SymbolName {
        match self.synthetic_constructor_class(session) {
            Some(class) => class.package_name(session),
            None => self.base.package_name(session),
        }
    }

    pub fn parent_declaration(&self, session: &Session) -> Option<Declaration> {
        match self.base.repr() {
            Repr::SyntheticConstructor { .. } => self
                .synthetic_constructor_class(session)
                .map(Declaration::Class),
            _ => self.base.parent_declaration(session),
        }
    }

    pub fn containing_file(&self, session: &Session) -> Option<Arc<SourceFile>> {
        match self.base.repr() {
            Repr::SyntheticConstructor { .. } => {
                self.synthetic_constructor_class(session)?.containing_file(session)
            }
            _ => self.base.containing_file(session),
        }
    }

    pub fn type_parameters(&self, session: &Session) -> Vec<Arc<TypeParameterDeclaration>> {
        self.base.type_parameters(session)
    }

    pub fn doc_string(&self, session: &Session) -> Option<String> {
        self.base.doc_string(session)
    }

    /// Written modifiers, plus `JAVA_STATIC` for `@JvmStatic` members.
    ///
    /// Every constructor of an enum class is `private final`, whatever was
    /// written or compiled.
    pub fn modifiers(&self, session: &Session) -> Modifiers {
        if self.is_enum_constructor(session) {
            return Modifiers::FINAL | Modifiers::PRIVATE;
        }
        match self.base.repr() {
            Repr::SyntheticConstructor { .. } => Modifiers::empty(),
            Repr::Source(_) if self.base.has_annotation_named(session, "JvmStatic") => {
                self.base.declared_modifiers(session) | Modifiers::JAVA_STATIC
            }
            _ => self.base.declared_modifiers(session),
        }
    }

    fn is_enum_constructor(&self, session: &Session) -> bool {
        self.is_constructor(session)
            && matches!(
                self.parent_declaration(session),
                Some(Declaration::Class(class)) if class.class_kind(session) == ClassKind::EnumClass
            )
    }

    pub fn annotations(&self, session: &Session) -> Vec<Arc<Annotation>> {
        self.base.annotations(session)
    }

    pub fn origin(&self) -> Origin {
        self.base.origin()
    }

    /// A synthetic constructor is reported at its class.
    pub fn location(&self, session: &Session) -> Location {
        match self.synthetic_constructor_class(session) {
            Some(class) => class.location(session),
            None => self.base.location(session),
        }
    }

    pub fn function_kind(&self, session: &Session) -> FunctionKind {
        match self.base.repr() {
            Repr::Source(_) => {
                if self.parent_declaration(session).is_none() {
                    return FunctionKind::TopLevel;
                }
                match self.syntax_node(session).map(|function| function.form) {
                    Some(FunctionForm::Literal { fun_keyword: true }) => FunctionKind::Anonymous,
                    Some(FunctionForm::Literal { fun_keyword: false }) => FunctionKind::Lambda,
                    _ => FunctionKind::Member,
                }
            }
            Repr::Binary(descriptor) => {
                let has_dispatch_receiver = descriptor
                    .as_function()
                    .is_some_and(|function| function.has_dispatch_receiver);
                let in_class = descriptor
                    .container
                    .and_then(|id| session.descriptor(id))
                    .is_some_and(|container| container.as_class().is_some());
                if !in_class {
                    FunctionKind::TopLevel
                } else if descriptor.flags.contains(DescriptorFlags::FROM_JAVA)
                    && !has_dispatch_receiver
                {
                    FunctionKind::Static
                } else {
                    FunctionKind::Member
                }
            }
            Repr::SyntheticConstructor { .. } | Repr::ErrorClass { .. } => FunctionKind::Member,
        }
    }

    /// Declared `abstract`, or a body-less member of an interface.
    pub fn is_abstract(&self, session: &Session) -> bool {
        match self.base.repr() {
            Repr::Source(_) => {
                if self.modifiers(session).contains(Modifiers::ABSTRACT) {
                    return true;
                }
                let Some(function) = self.syntax_node(session) else {
                    return false;
                };
                function.body.is_none()
                    && !function.form.is_constructor()
                    && self.parent_declaration(session).is_some_and(|parent| {
                        parent
                            .as_class()
                            .is_some_and(|class| class.class_kind(session) == ClassKind::Interface)
                    })
            }
            Repr::Binary(descriptor) => descriptor.modality == Modality::Abstract,
            Repr::SyntheticConstructor { .. } | Repr::ErrorClass { .. } => false,
        }
    }

    pub fn parameters(&self, session: &Session) -> Vec<Arc<ValueParameter>> {
        self.parameters
            .get_or_init(|| match self.base.repr() {
                Repr::Source(_) => self
                    .syntax_node(session)
                    .map(|function| function.parameters.as_slice())
                    .unwrap_or_default()
                    .iter()
                    .map(|&parameter| ValueParameter::from_syntax(session, parameter))
                    .collect(),
                Repr::Binary(descriptor) => {
                    let count = descriptor
                        .as_function()
                        .map_or(0, |function| function.value_parameters.len());
                    (0..count)
                        .map(|index| ValueParameter::from_descriptor(session, descriptor, index))
                        .collect()
                }
                Repr::SyntheticConstructor { .. } | Repr::ErrorClass { .. } => Vec::new(),
            })
            .clone()
    }

    pub fn extension_receiver(&self, session: &Session) -> Option<Arc<TypeReference>> {
        match self.base.repr() {
            Repr::Source(_) => {
                let receiver = self.syntax_node(session)?.receiver?;
                Some(TypeReference::from_syntax(session, receiver))
            }
            Repr::Binary(descriptor) => {
                let receiver = descriptor.as_function()?.receiver.as_ref()?;
                Some(TypeReference::from_host(session, receiver))
            }
            Repr::SyntheticConstructor { .. } | Repr::ErrorClass { .. } => None,
        }
    }

    /// Declared return type.
    ///
    /// Constructors return their class, star-projected. A function without
    /// a written return type gets an inferred reference that asks the host
    /// on first resolution.
    pub fn return_type(self: &Arc<Self>, session: &Session) -> Arc<TypeReference> {
        if self.is_constructor(session) {
            return self.constructor_return_type(session);
        }
        match self.base.repr() {
            Repr::Source(_) => match self.syntax_node(session).and_then(|f| f.return_type) {
                Some(return_type) => TypeReference::from_syntax(session, return_type),
                None => TypeReference::deferred(
                    session,
                    &Declaration::Function(Arc::clone(self)),
                    inferred_return_type,
                ),
            },
            Repr::Binary(descriptor) => {
                match descriptor
                    .as_function()
                    .and_then(|function| function.return_type.as_ref())
                {
                    Some(return_type) => TypeReference::from_host(session, return_type),
                    None => {
                        TypeReference::error(session, Some(&*session.name_text(descriptor.name)))
                    }
                }
            }
            Repr::SyntheticConstructor { .. } | Repr::ErrorClass { .. } => {
                self.constructor_return_type(session)
            }
        }
    }

    fn constructor_return_type(&self, session: &Session) -> Arc<TypeReference> {
        match self.parent_declaration(session) {
            Some(Declaration::Class(class)) => {
                TypeReference::synthetic(session, class.as_star_projected_type(session))
            }
            _ => TypeReference::error(session, Some(CONSTRUCTOR_NAME)),
        }
    }

    /// The member this function directly overrides, skipping inherited
    /// copies the host materialized in intermediate classes.
    pub fn find_overridee(&self, session: &Session) -> Option<Declaration> {
        let descriptor = self.base.descriptor(session)?;
        find_overridee(session, &descriptor)
    }

    /// Whether this function overrides `other`, directly or transitively.
    pub fn overrides(&self, session: &Session, other: &Declaration) -> bool {
        let (Some(mine), Some(theirs)) = (self.base.descriptor(session), other.descriptor(session))
        else {
            return false;
        };
        overrides_descriptor(session, &mine, theirs.id)
    }

    pub fn body(&self, session: &Session) -> Option<Arc<Expression>> {
        let body = self.syntax_node(session)?.body?;
        Some(Expression::from_syntax(session, body))
    }

    /// Local classes, functions and properties declared in the body.
    pub fn declarations(&self, session: &Session) -> Vec<Declaration> {
        self.syntax_node(session)
            .and_then(|function| function.body)
            .map_or_else(Vec::new, |body| local_declarations(session, body))
    }
}

/// Return type of a function without a written one, from its descriptor.
fn inferred_return_type(session: &Session, owner: &Declaration) -> Type {
    let return_type = owner
        .descriptor(session)
        .and_then(|descriptor| descriptor.as_function()?.return_type.clone());
    match return_type {
        Some(host) => get_ks_type_cached(session, &host),
        None => {
            let name = owner
                .try_simple_name(session)
                .map_or_else(|_| String::new(), |name| name.to_string());
            Type::Error(error_from_resolution(session, None, &name))
        }
    }
}

impl std::fmt::Debug for FunctionDeclaration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FunctionDeclaration({:?})", self.base.repr())
    }
}
