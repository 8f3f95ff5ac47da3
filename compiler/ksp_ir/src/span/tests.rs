use super::*;

#[test]
fn test_span_basic() {
    let span = Span::new(10, 20);
    assert_eq!(span.len(), 10);
    assert!(!span.is_empty());
    assert!(span.contains(15));
    assert!(!span.contains(20));
}

#[test]
fn test_span_merge() {
    let merged = Span::new(10, 20).merge(Span::new(15, 30));
    assert_eq!(merged, Span::new(10, 30));
}

#[test]
fn test_dummy_span_is_empty() {
    assert!(Span::DUMMY.is_empty());
    assert_eq!(Span::DUMMY.len(), 0);
}

#[test]
fn test_line_of_offsets() {
    let index = LineIndex::new("class A\n\nclass B\n");
    assert_eq!(index.line_count(), 4);
    assert_eq!(index.line_of(0), 1);
    assert_eq!(index.line_of(6), 1);
    assert_eq!(index.line_of(8), 2);
    assert_eq!(index.line_of(9), 3);
    assert_eq!(index.line_of(100), 4);
}

#[test]
fn test_from_line_starts_normalizes() {
    let index = LineIndex::from_line_starts(vec![20, 10, 10]);
    assert_eq!(index.line_count(), 3);
    assert_eq!(index.line_of(15), 2);
}
