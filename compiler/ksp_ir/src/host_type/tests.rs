use super::*;
use crate::{ClassDescriptor, Descriptor, DescriptorTable, Name, StringInterner};
use pretty_assertions::assert_eq;

struct Table {
    interner: StringInterner,
    table: DescriptorTable,
}

impl DescriptorSource for Table {
    fn descriptor(&self, id: DescriptorId) -> Option<Arc<crate::Descriptor>> {
        self.table.get(id)
    }

    fn name_text(&self, name: Name) -> Arc<str> {
        self.interner.lookup(name)
    }
}

impl Table {
    fn new() -> Self {
        Table {
            interner: StringInterner::new(),
            table: DescriptorTable::new(),
        }
    }

    fn class(&mut self, name: &str) -> DescriptorId {
        let name = self.interner.intern(name);
        self.table.insert_with(|id| {
            Descriptor::new(id, name, DescriptorKind::Class(ClassDescriptor::default()))
        })
    }
}

#[test]
fn test_render_simple_and_nullable() {
    let mut t = Table::new();
    let int = t.class("Int");
    let list = t.class("List");
    let ty = HostType::class(list, vec![TypeProjection::invariant(HostType::class(int, vec![], true))], false);
    assert_eq!(render_type(&ty, &t), "List<Int?>");
}

#[test]
fn test_render_projections() {
    let mut t = Table::new();
    let int = t.class("Int");
    let map = t.class("Map");
    let ty = HostType::class(
        map,
        vec![
            TypeProjection::Star,
            TypeProjection::Type {
                variance: ProjectionVariance::Out,
                ty: HostType::class(int, vec![], false),
            },
        ],
        false,
    );
    assert_eq!(render_type(&ty, &t), "Map<*, out Int>");
}

#[test]
fn test_render_platform_type() {
    let mut t = Table::new();
    let string = t.class("String");
    let ty = HostType::flexible(
        HostType::class(string, vec![], false),
        HostType::class(string, vec![], true),
    );
    assert_eq!(render_type(&ty, &t), "String!");
    assert_eq!(ty.nullability(), HostNullability::Flexible);
}

#[test]
fn test_render_mutability_flexible() {
    let mut t = Table::new();
    let string = t.class("String");
    let list = t.class("List");
    let mutable_list = t.class("MutableList");
    let element = || TypeProjection::invariant(HostType::class(string, vec![], false));
    let ty = HostType::flexible(
        HostType::class(mutable_list, vec![element()], false),
        HostType::class(list, vec![element()], true),
    );
    assert_eq!(render_type(&ty, &t), "(Mutable)List<String>!");
}

#[test]
fn test_render_covariance_flexible() {
    let mut t = Table::new();
    let string = t.class("String");
    let array = t.class("Array");
    let lower = HostType::class(
        array,
        vec![TypeProjection::invariant(HostType::class(string, vec![], false))],
        false,
    );
    let upper = HostType::class(
        array,
        vec![TypeProjection::Type {
            variance: ProjectionVariance::Out,
            ty: HostType::class(string, vec![], false),
        }],
        true,
    );
    let ty = HostType::flexible(lower, upper);
    assert_eq!(render_type(&ty, &t), "Array<(out) String>!");
}

#[test]
fn test_replace_arguments_checks_arity() {
    let mut t = Table::new();
    let int = t.class("Int");
    let list = t.class("List");
    let ty = HostType::class(list, vec![TypeProjection::Star], false);
    let int_ty = HostType::class(int, vec![], false);

    assert!(ty.replace_arguments(vec![]).is_none());
    let Some(replaced) = ty.replace_arguments(vec![TypeProjection::invariant(int_ty)]) else {
        panic!("same arity must succeed");
    };
    assert_eq!(render_type(&replaced, &t), "List<Int>");
}

#[test]
fn test_nullability_changes() {
    let mut t = Table::new();
    let int = t.class("Int");
    let ty = HostType::class(int, vec![], false);
    let nullable = ty.make_nullable();
    assert!(nullable.is_marked_nullable());
    assert_eq!(nullable.make_not_nullable(), ty);
    // No-op keeps the same allocation.
    assert!(HostType::ptr_eq(&ty.make_not_nullable(), &ty));
}

#[test]
fn test_star_projection() {
    let mut t = Table::new();
    let int = t.class("Int");
    let list = t.class("List");
    let ty = HostType::class(list, vec![TypeProjection::invariant(HostType::class(int, vec![], false))], false);
    assert_eq!(render_type(&ty.star_projection(), &t), "List<*>");
}

#[test]
fn test_error_type() {
    let t = Table::new();
    let ty = HostType::error(TypeDiagnostic::UnresolvedClass { name: "Nope".into() });
    assert!(ty.is_error());
    assert_eq!(ty.nullability(), HostNullability::Nullable);
    assert!(ty.replace_arguments(vec![]).is_none());
    assert_eq!(render_type(&ty, &t), "[Error type: unresolved class Nope]");
}

#[test]
fn test_structural_equality_distinct_allocations() {
    let mut t = Table::new();
    let int = t.class("Int");
    let a = HostType::class(int, vec![], false);
    let b = HostType::class(int, vec![], false);
    assert_eq!(a, b);
    assert!(!HostType::ptr_eq(&a, &b));
}
