//! Modifier sets implied by binary descriptors.

use crate::session::Session;
use ksp_ir::{
    Descriptor, DescriptorFlags, DescriptorKind, HostClassKind, Modality, Modifiers, Visibility,
};

const FLAG_MODIFIERS: [(DescriptorFlags, Modifiers); 14] = [
    (DescriptorFlags::EXPECT, Modifiers::EXPECT),
    (DescriptorFlags::ACTUAL, Modifiers::ACTUAL),
    (DescriptorFlags::EXTERNAL, Modifiers::EXTERNAL),
    (DescriptorFlags::SUSPEND, Modifiers::SUSPEND),
    (DescriptorFlags::INLINE, Modifiers::INLINE),
    (DescriptorFlags::OPERATOR, Modifiers::OPERATOR),
    (DescriptorFlags::INFIX, Modifiers::INFIX),
    (DescriptorFlags::TAILREC, Modifiers::TAILREC),
    (DescriptorFlags::LATEINIT, Modifiers::LATEINIT),
    (DescriptorFlags::DATA, Modifiers::DATA),
    (DescriptorFlags::INNER, Modifiers::INNER),
    (DescriptorFlags::VALUE, Modifiers::VALUE),
    (DescriptorFlags::FUN, Modifiers::FUN),
    (DescriptorFlags::CONST, Modifiers::CONST),
];

pub(crate) fn visibility_modifier(visibility: Visibility) -> Modifiers {
    match visibility {
        Visibility::Public => Modifiers::PUBLIC,
        Visibility::Protected => Modifiers::PROTECTED,
        Visibility::Internal => Modifiers::INTERNAL,
        Visibility::Private => Modifiers::PRIVATE,
        Visibility::Local => Modifiers::empty(),
    }
}

pub(crate) fn modality_modifier(modality: Modality) -> Modifiers {
    match modality {
        Modality::Final => Modifiers::FINAL,
        Modality::Open => Modifiers::OPEN,
        Modality::Abstract => Modifiers::ABSTRACT,
        Modality::Sealed => Modifiers::SEALED,
    }
}

/// Visibility, modality and flag modifiers of a descriptor.
///
/// Java members without a dispatch receiver and Kotlin members annotated
/// `@JvmStatic` also report `JAVA_STATIC`.
pub(crate) fn modifiers_of_descriptor(session: &Session, descriptor: &Descriptor) -> Modifiers {
    let mut modifiers =
        visibility_modifier(descriptor.visibility) | modality_modifier(descriptor.modality);
    for (flag, modifier) in FLAG_MODIFIERS {
        if descriptor.flags.contains(flag) {
            modifiers |= modifier;
        }
    }
    if !descriptor.overridden().is_empty() {
        modifiers |= Modifiers::OVERRIDE;
    }
    let has_dispatch_receiver = match &descriptor.kind {
        DescriptorKind::Class(class) => {
            match class.kind {
                HostClassKind::EnumClass => modifiers |= Modifiers::ENUM,
                HostClassKind::AnnotationClass => modifiers |= Modifiers::ANNOTATION,
                _ => {}
            }
            true
        }
        DescriptorKind::Function(function) => function.has_dispatch_receiver,
        DescriptorKind::Property(property) => property.has_dispatch_receiver,
        _ => true,
    };
    let java_static = descriptor.flags.contains(DescriptorFlags::FROM_JAVA)
        && descriptor.container.is_some()
        && !has_dispatch_receiver;
    if java_static || is_jvm_static(session, descriptor) {
        modifiers |= Modifiers::JAVA_STATIC;
    }
    modifiers
}

fn is_jvm_static(session: &Session, descriptor: &Descriptor) -> bool {
    descriptor.annotations.iter().any(|annotation| {
        let Some(ksp_ir::TypeConstructor::Class(id)) = annotation.annotation_type.constructor()
        else {
            return false;
        };
        session
            .descriptor(*id)
            .and_then(|class| class.qualified_name.clone())
            .is_some_and(|name| &*name == "kotlin.jvm.JvmStatic")
    })
}
