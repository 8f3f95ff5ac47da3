use super::*;
use crate::StringInterner;

fn class(table: &mut DescriptorTable, interner: &StringInterner, qualified: &str) -> DescriptorId {
    let short = qualified.rsplit('.').next().unwrap_or(qualified);
    let name = interner.intern(short);
    table.insert_with(|id| Descriptor {
        qualified_name: Some(Arc::from(qualified)),
        ..Descriptor::new(id, name, DescriptorKind::Class(ClassDescriptor::default()))
    })
}

#[test]
fn test_insert_assigns_sequential_ids() {
    let interner = StringInterner::new();
    let mut table = DescriptorTable::new();
    let a = class(&mut table, &interner, "a.A");
    let b = class(&mut table, &interner, "a.B");
    assert_eq!(a.raw() + 1, b.raw());
    assert_eq!(table.len(), 2);
}

#[test]
fn test_lookup_by_qualified_name() {
    let interner = StringInterner::new();
    let mut table = DescriptorTable::new();
    let a = class(&mut table, &interner, "a.A");
    assert_eq!(table.by_qualified_name("a.A").map(|d| d.id), Some(a));
    assert!(table.by_qualified_name("a.Missing").is_none());
}

#[test]
fn test_functions_are_not_indexed_by_name() {
    let interner = StringInterner::new();
    let mut table = DescriptorTable::new();
    let name = interner.intern("f");
    table.insert_with(|id| Descriptor {
        qualified_name: Some(Arc::from("a.f")),
        ..Descriptor::new(id, name, DescriptorKind::Function(FunctionDescriptor::default()))
    });
    assert!(table.by_qualified_name("a.f").is_none());
}

#[test]
fn test_update_fills_members() {
    let interner = StringInterner::new();
    let mut table = DescriptorTable::new();
    let sealed = class(&mut table, &interner, "a.Expr");
    let sub = class(&mut table, &interner, "a.Const");
    table.update(sealed, |d| {
        d.modality = Modality::Sealed;
        if let DescriptorKind::Class(class) = &mut d.kind {
            class.sealed_subclasses.push(sub);
        }
    });
    let Some(expr) = table.get(sealed) else {
        panic!("descriptor missing");
    };
    assert_eq!(expr.modality, Modality::Sealed);
    assert_eq!(expr.as_class().map(|c| c.sealed_subclasses.clone()), Some(vec![sub]));
}

#[test]
fn test_by_source() {
    let interner = StringInterner::new();
    let mut table = DescriptorTable::new();
    let node = SyntaxId::from_raw(7);
    let name = interner.intern("A");
    let id = table.insert_with(|id| Descriptor {
        source: Some(node),
        ..Descriptor::new(id, name, DescriptorKind::Class(ClassDescriptor::default()))
    });
    assert_eq!(table.by_source(node).map(|d| d.id), Some(id));
}
