//! Compile-time constant values produced by the host.

use crate::{AnnotationDescriptor, DescriptorId, HostType};
use std::fmt;
use std::sync::Arc;

/// A constant the host evaluated, e.g. an annotation argument.
///
/// Floating-point values are stored as bits so the type stays `Eq + Hash`
/// and can key identity caches.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ConstantValue {
    Null,
    Bool(bool),
    Char(char),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(u32),
    Double(u64),
    String(Arc<str>),
    /// `Foo::class`
    ClassLiteral(HostType),
    /// An enum entry, by its class descriptor.
    EnumEntry(DescriptorId),
    Annotation(Box<AnnotationDescriptor>),
    Array(Vec<ConstantValue>),
}

impl ConstantValue {
    pub fn float(value: f32) -> Self {
        ConstantValue::Float(value.to_bits())
    }

    pub fn double(value: f64) -> Self {
        ConstantValue::Double(value.to_bits())
    }

    pub fn string(value: &str) -> Self {
        ConstantValue::String(Arc::from(value))
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            ConstantValue::Float(bits) => Some(f64::from(f32::from_bits(bits))),
            ConstantValue::Double(bits) => Some(f64::from_bits(bits)),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ConstantValue::Null)
    }
}

impl fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstantValue::Null => f.write_str("null"),
            ConstantValue::Bool(v) => write!(f, "{v}"),
            ConstantValue::Char(v) => write!(f, "'{v}'"),
            ConstantValue::Byte(v) => write!(f, "{v}"),
            ConstantValue::Short(v) => write!(f, "{v}"),
            ConstantValue::Int(v) => write!(f, "{v}"),
            ConstantValue::Long(v) => write!(f, "{v}L"),
            ConstantValue::Float(bits) => write!(f, "{}f", f32::from_bits(*bits)),
            ConstantValue::Double(bits) => write!(f, "{}", f64::from_bits(*bits)),
            ConstantValue::String(v) => write!(f, "\"{v}\""),
            ConstantValue::ClassLiteral(_) => f.write_str("<class literal>"),
            ConstantValue::EnumEntry(id) => write!(f, "<enum entry {}>", id.raw()),
            ConstantValue::Annotation(_) => f.write_str("<annotation>"),
            ConstantValue::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}
