//! Annotation argument values.

use super::Annotation;
use crate::declaration::ClassDeclaration;
use crate::session::Session;
use crate::types::{get_ks_type_cached, Type};
use ksp_ir::ConstantValue;
use std::sync::Arc;

/// Value of an annotation argument.
#[derive(Clone, Debug)]
pub enum AnnotationValue {
    Null,
    Bool(bool),
    Char(char),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(Arc<str>),
    /// `Foo::class`
    Type(Type),
    /// An enum entry, as its entry class.
    EnumEntry(Arc<ClassDeclaration>),
    Annotation(Arc<Annotation>),
    Array(Vec<AnnotationValue>),
    /// Not evaluated by the host; holds the written text.
    Unresolved(String),
}

impl AnnotationValue {
    pub(crate) fn from_constant(session: &Session, constant: &ConstantValue) -> Self {
        match constant {
            ConstantValue::Null => AnnotationValue::Null,
            ConstantValue::Bool(value) => AnnotationValue::Bool(*value),
            ConstantValue::Char(value) => AnnotationValue::Char(*value),
            ConstantValue::Byte(value) => AnnotationValue::Byte(*value),
            ConstantValue::Short(value) => AnnotationValue::Short(*value),
            ConstantValue::Int(value) => AnnotationValue::Int(*value),
            ConstantValue::Long(value) => AnnotationValue::Long(*value),
            ConstantValue::Float(bits) => AnnotationValue::Float(f32::from_bits(*bits)),
            ConstantValue::Double(bits) => AnnotationValue::Double(f64::from_bits(*bits)),
            ConstantValue::String(value) => AnnotationValue::String(Arc::clone(value)),
            ConstantValue::ClassLiteral(ty) => AnnotationValue::Type(get_ks_type_cached(session, ty)),
            ConstantValue::EnumEntry(id) => match session.descriptor(*id) {
                Some(entry) if entry.as_class().is_some() => {
                    AnnotationValue::EnumEntry(ClassDeclaration::from_descriptor(session, &entry))
                }
                _ => AnnotationValue::Unresolved(constant.to_string()),
            },
            ConstantValue::Annotation(annotation) => {
                AnnotationValue::Annotation(Annotation::from_host(session, annotation))
            }
            ConstantValue::Array(values) => AnnotationValue::Array(
                values
                    .iter()
                    .map(|value| AnnotationValue::from_constant(session, value))
                    .collect(),
            ),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AnnotationValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AnnotationValue::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn render(&self, session: &Session) -> String {
        match self {
            AnnotationValue::Null => "null".to_owned(),
            AnnotationValue::Bool(value) => value.to_string(),
            AnnotationValue::Char(value) => format!("'{value}'"),
            AnnotationValue::Byte(value) => value.to_string(),
            AnnotationValue::Short(value) => value.to_string(),
            AnnotationValue::Int(value) => value.to_string(),
            AnnotationValue::Long(value) => format!("{value}L"),
            AnnotationValue::Float(value) => format!("{value}f"),
            AnnotationValue::Double(value) => value.to_string(),
            AnnotationValue::String(value) => format!("{value:?}"),
            AnnotationValue::Type(ty) => format!("{}::class", ty.render(session)),
            AnnotationValue::EnumEntry(entry) => entry
                .qualified_name(session)
                .unwrap_or_else(|| entry.simple_name(session))
                .to_string(),
            AnnotationValue::Annotation(annotation) => annotation.render(session),
            AnnotationValue::Array(values) => {
                let items: Vec<String> = values.iter().map(|value| value.render(session)).collect();
                format!("[{}]", items.join(", "))
            }
            AnnotationValue::Unresolved(text) => text.clone(),
        }
    }
}

impl PartialEq for AnnotationValue {
    fn eq(&self, other: &Self) -> bool {
        use AnnotationValue as V;
        match (self, other) {
            (V::Null, V::Null) => true,
            (V::Bool(a), V::Bool(b)) => a == b,
            (V::Char(a), V::Char(b)) => a == b,
            (V::Byte(a), V::Byte(b)) => a == b,
            (V::Short(a), V::Short(b)) => a == b,
            (V::Int(a), V::Int(b)) => a == b,
            (V::Long(a), V::Long(b)) => a == b,
            (V::Float(a), V::Float(b)) => a.to_bits() == b.to_bits(),
            (V::Double(a), V::Double(b)) => a.to_bits() == b.to_bits(),
            (V::String(a), V::String(b)) => a == b,
            (V::Type(a), V::Type(b)) => a == b,
            (V::EnumEntry(a), V::EnumEntry(b)) => Arc::ptr_eq(a, b),
            (V::Annotation(a), V::Annotation(b)) => Arc::ptr_eq(a, b),
            (V::Array(a), V::Array(b)) => a == b,
            (V::Unresolved(a), V::Unresolved(b)) => a == b,
            _ => false,
        }
    }
}
