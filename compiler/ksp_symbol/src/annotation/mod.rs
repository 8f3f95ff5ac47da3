//! Annotation usages and their arguments.
//!
//! # Design
//!
//! An [`Annotation`] wraps either an annotation entry written in source or
//! an annotation the host attached to a descriptor. Arguments come from the
//! host's resolved view when there is one: explicitly passed arguments
//! first, then every parameter default of the annotation class that was not
//! passed. Without a resolved view the written arguments are reported as
//! they appear.
//!
//! Resolved arguments are keyed structurally by name, value and origin, so
//! the same default reached through [`Annotation::arguments`] and
//! [`Annotation::default_arguments`] is one wrapper.

mod value;

pub use value::AnnotationValue;

use crate::expression::Expression;
use crate::kinds::AnnotationUseSiteTarget;
use crate::location::{Location, Origin};
use crate::name::SymbolName;
use crate::reference::TypeReference;
use crate::session::Session;
use crate::types::get_ks_type_cached;
use ksp_ir::syntax::{AnnotationEntryNode, ExpressionNode, ValueArgumentNode};
use ksp_ir::{
    AnnotationDescriptor, ConstantValue, Descriptor, Name, ParameterDescriptor, SyntaxId,
    TypeConstructor,
};
use std::sync::{Arc, OnceLock};

#[derive(Clone, PartialEq, Eq, Hash)]
pub(crate) enum AnnotationKey {
    Syntax(SyntaxId),
    Host(AnnotationDescriptor),
}

#[derive(Debug)]
enum AnnotationRepr {
    Syntax(SyntaxId),
    Host(AnnotationDescriptor),
}

/// One annotation usage.
pub struct Annotation {
    repr: AnnotationRepr,
    resolved: OnceLock<Option<AnnotationDescriptor>>,
    arguments: OnceLock<Vec<Arc<ValueArgument>>>,
}

impl Annotation {
    fn with_repr(repr: AnnotationRepr) -> Self {
        Annotation {
            repr,
            resolved: OnceLock::new(),
            arguments: OnceLock::new(),
        }
    }

    pub fn from_syntax(session: &Session, entry: SyntaxId) -> Arc<Annotation> {
        session
            .caches()
            .annotations
            .get_or_put(AnnotationKey::Syntax(entry), || {
                Self::with_repr(AnnotationRepr::Syntax(entry))
            })
    }

    pub fn from_host(session: &Session, annotation: &AnnotationDescriptor) -> Arc<Annotation> {
        session
            .caches()
            .annotations
            .get_or_put(AnnotationKey::Host(annotation.clone()), || {
                Self::with_repr(AnnotationRepr::Host(annotation.clone()))
            })
    }

    pub fn node(&self) -> Option<SyntaxId> {
        match self.repr {
            AnnotationRepr::Syntax(entry) => Some(entry),
            AnnotationRepr::Host(_) => None,
        }
    }

    fn entry<'s>(&self, session: &'s Session) -> Option<&'s AnnotationEntryNode> {
        session.syntax().kind(self.node()?).as_annotation_entry()
    }

    /// The host's resolved view; resolved once for source entries.
    fn descriptor(&self, session: &Session) -> Option<&AnnotationDescriptor> {
        match &self.repr {
            AnnotationRepr::Host(annotation) => Some(annotation),
            AnnotationRepr::Syntax(entry) => self
                .resolved
                .get_or_init(|| {
                    session
                        .resolver()
                        .resolve_annotation_entry(session.syntax(), *entry)
                })
                .as_ref(),
        }
    }

    /// Name as written, without qualifier.
    pub fn short_name(&self, session: &Session) -> String {
        if let Some(entry) = self.entry(session) {
            return session.name_text(entry.short_name).to_string();
        }
        match self.descriptor(session) {
            Some(annotation) => get_ks_type_cached(session, &annotation.annotation_type)
                .declaration(session)
                .simple_name(session)
                .to_string(),
            None => String::new(),
        }
    }

    /// Reference to the annotation class.
    pub fn annotation_type(&self, session: &Session) -> Arc<TypeReference> {
        if let Some(type_ref) = self.entry(session).and_then(|entry| entry.type_ref) {
            return TypeReference::from_syntax(session, type_ref);
        }
        match self.descriptor(session) {
            Some(annotation) => TypeReference::from_host(session, &annotation.annotation_type),
            None => TypeReference::error(session, Some(&self.short_name(session))),
        }
    }

    /// `@get:`, `@field:` and friends; `None` when no target is written.
    pub fn use_site_target(&self, session: &Session) -> Option<AnnotationUseSiteTarget> {
        self.entry(session)?.use_site.map(AnnotationUseSiteTarget::from)
    }

    fn class_descriptor(&self, session: &Session) -> Option<Arc<Descriptor>> {
        let annotation = self.descriptor(session)?;
        match annotation.annotation_type.constructor()? {
            TypeConstructor::Class(id) => session.descriptor(*id),
            _ => None,
        }
    }

    /// Parameters of the annotation class constructor.
    fn class_parameters(&self, session: &Session) -> Vec<ParameterDescriptor> {
        let Some(class) = self.class_descriptor(session) else {
            return Vec::new();
        };
        let Some(class_kind) = class.as_class() else {
            return Vec::new();
        };
        class_kind
            .primary_constructor
            .or_else(|| class_kind.constructors.first().copied())
            .and_then(|id| session.descriptor(id))
            .and_then(|constructor| constructor.as_function().map(|f| f.value_parameters.clone()))
            .unwrap_or_default()
    }

    fn argument_origin(&self) -> Origin {
        match self.repr {
            AnnotationRepr::Syntax(_) => Origin::Source,
            AnnotationRepr::Host(_) => Origin::Binary,
        }
    }

    /// Passed arguments followed by the defaults of parameters that were
    /// not passed.
    pub fn arguments(&self, session: &Session) -> Vec<Arc<ValueArgument>> {
        self.arguments
            .get_or_init(|| {
                let Some(annotation) = self.descriptor(session).cloned() else {
                    return self
                        .entry(session)
                        .map(|entry| entry.arguments.as_slice())
                        .unwrap_or_default()
                        .iter()
                        .map(|&argument| ValueArgument::from_syntax(session, argument))
                        .collect();
                };
                let origin = self.argument_origin();
                let mut arguments: Vec<Arc<ValueArgument>> = annotation
                    .arguments
                    .iter()
                    .map(|(name, value)| ValueArgument::literal(session, *name, value, origin))
                    .collect();
                let passed: Vec<Name> = annotation.arguments.iter().map(|(name, _)| *name).collect();
                arguments.extend(self.class_parameters(session).iter().filter_map(|parameter| {
                    if passed.contains(&parameter.name) {
                        return None;
                    }
                    let value = parameter.default_value.as_ref()?;
                    Some(ValueArgument::literal(
                        session,
                        parameter.name,
                        value,
                        Origin::Synthetic,
                    ))
                }));
                arguments
            })
            .clone()
    }

    /// Every parameter default of the annotation class.
    pub fn default_arguments(&self, session: &Session) -> Vec<Arc<ValueArgument>> {
        self.class_parameters(session)
            .iter()
            .filter_map(|parameter| {
                let value = parameter.default_value.as_ref()?;
                Some(ValueArgument::literal(
                    session,
                    parameter.name,
                    value,
                    Origin::Synthetic,
                ))
            })
            .collect()
    }

    pub fn origin(&self) -> Origin {
        self.argument_origin()
    }

    pub fn location(&self, session: &Session) -> Location {
        match self.repr {
            AnnotationRepr::Syntax(entry) => session.location_of(entry),
            AnnotationRepr::Host(_) => Location::NoLocation,
        }
    }

    /// `@Name(arguments)`
    pub fn render(&self, session: &Session) -> String {
        let arguments: Vec<String> = self
            .arguments(session)
            .iter()
            .map(|argument| argument.render(session))
            .collect();
        if arguments.is_empty() {
            format!("@{}", self.short_name(session))
        } else {
            format!("@{}({})", self.short_name(session), arguments.join(", "))
        }
    }
}

impl std::fmt::Debug for Annotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Annotation({:?})", self.repr)
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
pub(crate) enum ValueArgumentKey {
    Syntax(SyntaxId),
    Literal {
        name: Name,
        value: ConstantValue,
        origin: Origin,
    },
}

#[derive(Debug)]
enum ArgumentRepr {
    Syntax(SyntaxId),
    /// A value the host evaluated.
    Literal {
        name: Name,
        value: ConstantValue,
        origin: Origin,
    },
}

/// One argument of an annotation.
#[derive(Debug)]
pub struct ValueArgument {
    repr: ArgumentRepr,
    value: OnceLock<AnnotationValue>,
}

impl ValueArgument {
    pub fn from_syntax(session: &Session, node: SyntaxId) -> Arc<ValueArgument> {
        session
            .caches()
            .value_arguments
            .get_or_put(ValueArgumentKey::Syntax(node), || ValueArgument {
                repr: ArgumentRepr::Syntax(node),
                value: OnceLock::new(),
            })
    }

    pub(crate) fn literal(
        session: &Session,
        name: Name,
        value: &ConstantValue,
        origin: Origin,
    ) -> Arc<ValueArgument> {
        let key = ValueArgumentKey::Literal {
            name,
            value: value.clone(),
            origin,
        };
        session.caches().value_arguments.get_or_put(key, || ValueArgument {
            repr: ArgumentRepr::Literal {
                name,
                value: value.clone(),
                origin,
            },
            value: OnceLock::new(),
        })
    }

    fn syntax_node<'s>(&self, session: &'s Session) -> Option<&'s ValueArgumentNode> {
        match self.repr {
            ArgumentRepr::Syntax(node) => session.syntax().kind(node).as_value_argument(),
            ArgumentRepr::Literal { .. } => None,
        }
    }

    /// Parameter name; `None` for a positional argument written in source.
    pub fn name(&self, session: &Session) -> Option<SymbolName> {
        match &self.repr {
            ArgumentRepr::Syntax(_) => self
                .syntax_node(session)?
                .name
                .map(|name| SymbolName::from(session.name_text(name))),
            ArgumentRepr::Literal { name, .. } => Some(SymbolName::from(session.name_text(*name))),
        }
    }

    pub fn value(&self, session: &Session) -> AnnotationValue {
        self.value
            .get_or_init(|| match &self.repr {
                ArgumentRepr::Literal { value, .. } => AnnotationValue::from_constant(session, value),
                ArgumentRepr::Syntax(_) => {
                    let Some(expression) = self.syntax_node(session).and_then(|arg| arg.value)
                    else {
                        return AnnotationValue::Unresolved(String::new());
                    };
                    syntax_value(session, expression)
                }
            })
            .clone()
    }

    pub fn is_spread(&self, session: &Session) -> bool {
        self.syntax_node(session).is_some_and(|argument| argument.is_spread)
    }

    /// Filled in from a parameter default rather than passed.
    pub fn is_default(&self) -> bool {
        matches!(
            self.repr,
            ArgumentRepr::Literal {
                origin: Origin::Synthetic,
                ..
            }
        )
    }

    pub fn origin(&self) -> Origin {
        match self.repr {
            ArgumentRepr::Syntax(_) => Origin::Source,
            ArgumentRepr::Literal { origin, .. } => origin,
        }
    }

    pub fn location(&self, session: &Session) -> Location {
        match self.repr {
            ArgumentRepr::Syntax(node) => session.location_of(node),
            ArgumentRepr::Literal { .. } => Location::NoLocation,
        }
    }

    /// `name = value`, or just the value when unnamed.
    pub fn render(&self, session: &Session) -> String {
        let value = self.value(session).render(session);
        match self.name(session) {
            Some(name) => format!("{name} = {value}"),
            None => value,
        }
    }
}

/// Value of a written argument that has no resolved annotation behind it.
fn syntax_value(session: &Session, expression: SyntaxId) -> AnnotationValue {
    if let Some(constant) = session
        .resolver()
        .resolve_constant(session.syntax(), expression)
    {
        return AnnotationValue::from_constant(session, &constant);
    }
    let syntax = session.syntax();
    if let Some(ExpressionNode::Constant(constant)) = syntax.kind(expression).as_expression() {
        return AnnotationValue::from_constant(session, constant);
    }
    if syntax.kind(expression).as_annotation_entry().is_some() {
        return AnnotationValue::Annotation(Annotation::from_syntax(session, expression));
    }
    AnnotationValue::Unresolved(Expression::from_syntax(session, expression).text(session))
}

#[cfg(test)]
mod tests;
