//! In-place modification through the mutation handles

use crate::common::*;
use fieldtrail::{Error, Origin, Sequence, SequenceMut, ValidationKind, Value};

#[test]
fn bad_element_reported_before_bad_index() {
    let mut c = config1();
    let err = c
        .nested_mut("x")
        .unwrap()
        .set(2, 0, &Origin::here())
        .unwrap_err();
    assert_eq!(err.validation_kind(), Some(ValidationKind::NotIterableElement));

    let err = c
        .nested_mut("x")
        .unwrap()
        .set(2, vec![0], &Origin::here())
        .unwrap_err();
    assert!(matches!(err, Error::IndexOutOfRange { index: 2, len: 2, .. }));
}

#[test]
fn element_item_assignment() {
    let mut c = config1();
    c.nested_mut("x")
        .unwrap()
        .element_mut(0)
        .unwrap()
        .set(0, 10, &Origin::here())
        .unwrap();

    assert_eq!(*c.get("x").unwrap(), vec![vec![10], vec![2, 3]]);
    assert_eq!(*c.get("x").unwrap(), [&[10][..], &[2, 3][..]]);
}

#[test]
fn element_replacement_insert_and_extend() {
    let mut c = config1();
    let origin = Origin::here();
    {
        let mut x = c.nested_mut("x").unwrap();
        x.element_mut(0).unwrap().set(0, 10, &origin).unwrap();

        x.set(1, vec![11, 12, 13], &origin).unwrap();
        assert_eq!(*x.list(), vec![vec![10], vec![11, 12, 13]]);
        assert_eq!(*x.list(), [&[10][..], &[11, 12, 13][..]]);
        assert!(x.equals(&Value::from(vec![vec![10], vec![11, 12, 13]])));
        assert!(!x.equals(&Value::from(vec![vec![10]])));
        assert!(x.contains(&Value::from(vec![10])));

        x.insert(1, vec![20], &origin).unwrap();
        assert_eq!(*x.list(), vec![vec![10], vec![20], vec![11, 12, 13]]);

        x.extend(vec![vec![30], vec![40]], &origin).unwrap();
        assert_eq!(
            *x.list(),
            vec![vec![10], vec![20], vec![11, 12, 13], vec![30], vec![40]]
        );
    }
    c.validate().unwrap();
}

#[test]
fn slice_replacement_changes_length() {
    let mut c = nconfig();
    c.set("polist", vec![7, 8, 9], &Origin::here()).unwrap();
    let mut l = c.list_mut("polist").unwrap();

    l.set_slice(0..2, vec![1], &Origin::here()).unwrap();
    assert_eq!(*l.list(), vec![1, 9]);

    l.set_slice(1..1, vec![2, 3], &Origin::here()).unwrap();
    assert_eq!(*l.list(), vec![1, 2, 3, 9]);

    // bounds clamp like slice assignment
    l.set_slice(3..100, vec![4], &Origin::here()).unwrap();
    assert_eq!(*l.list(), vec![1, 2, 3, 4]);
    l.set_slice(50..60, vec![5], &Origin::here()).unwrap();
    assert_eq!(*l.list(), vec![1, 2, 3, 4, 5]);
}

#[test]
fn slice_failure_is_atomic() {
    let mut c = nconfig();
    c.set("polist", vec![7, 8, 9], &Origin::here()).unwrap();
    let mut l = c.list_mut("polist").unwrap();
    let before = l.history().len();

    let replacement = vec![Value::Int(1), Value::Int(2), Value::from("three")];
    let err = l
        .set_slice(0..3, replacement, &Origin::here())
        .unwrap_err();
    assert_eq!(err.validation_kind(), Some(ValidationKind::ItemTypeMismatch));
    assert_eq!(*l.list(), vec![7, 8, 9]);
    assert_eq!(l.history().len(), before);
}

#[test]
fn extend_failure_is_atomic() {
    let mut c = nconfig();
    c.set("polist", vec![1, 2], &Origin::here()).unwrap();
    {
        let mut l = c.list_mut("polist").unwrap();
        let before = l.history().len();
        let err = l
            .extend(vec![Value::Int(3), Value::from("x")], &Origin::here())
            .unwrap_err();
        assert_eq!(err.validation_kind(), Some(ValidationKind::ItemTypeMismatch));
        assert_eq!(*l.list(), vec![1, 2]);
        assert_eq!(l.history().len(), before);

        l.extend(vec![3, 4], &Origin::here()).unwrap();
        assert_eq!(*l.list(), vec![1, 2, 3, 4]);
        assert_eq!(l.history().len(), before + 2);
    }

    let mut c = config1();
    let mut x = c.nested_mut("x").unwrap();
    let before = x.history().len();
    let err = x
        .extend(vec![Value::from(vec![30]), Value::from("s")], &Origin::here())
        .unwrap_err();
    assert_eq!(err.validation_kind(), Some(ValidationKind::StringElementDisallowed));
    assert_eq!(*x.list(), vec![vec![1], vec![2, 3]]);
    assert_eq!(x.history().len(), before);

    let mut e = x.element_mut(1).unwrap();
    let err = e
        .extend(vec![Value::Int(4), Value::from(true)], &Origin::here())
        .unwrap_err();
    assert_eq!(err.validation_kind(), Some(ValidationKind::ItemTypeMismatch));
    assert_eq!(e.to_value(), vec![2, 3]);
    assert_eq!(e.history().len(), 1);
    drop(e);
    assert_eq!(x.history().len(), before);
}

#[test]
fn nested_slice_replacement() {
    let mut c = nconfig();
    let mut n = c.nested_mut("nlist").unwrap();
    n.set_slice(0..1, vec![vec![5, 5], vec![6]], &Origin::here()).unwrap();
    assert_eq!(*n.list(), vec![vec![5, 5], vec![6], vec![9]]);

    let err = n
        .set_slice(0..3, vec![vec!["a"]], &Origin::here())
        .unwrap_err();
    assert_eq!(err.validation_kind(), Some(ValidationKind::ItemTypeMismatch));
    assert_eq!(n.len(), 3);
}

#[test]
fn delete_and_out_of_range() {
    let mut c = config1();
    let mut x = c.nested_mut("x").unwrap();
    x.delete(0, &Origin::here()).unwrap();
    assert_eq!(*x.list(), vec![vec![2, 3]]);
    assert!(matches!(
        x.delete(5, &Origin::here()).unwrap_err(),
        Error::IndexOutOfRange { index: 5, len: 1, .. }
    ));

    let mut e = x.element_mut(0).unwrap();
    e.delete(1, &Origin::here()).unwrap();
    assert_eq!(*e.sub_list(), vec![2]);
    assert!(e.delete(1, &Origin::here()).is_err());
    assert!(matches!(
        x.element_mut(1).unwrap_err(),
        Error::IndexOutOfRange { index: 1, len: 1, .. }
    ));
}

#[test]
fn appended_element_is_a_copy() {
    let mut c = nconfig();
    c.set("nlist", vec![vec![6, 6, 6], vec![9, 9, 9, 9], vec![111]], &Origin::here())
        .unwrap();
    let mut n = c.nested_mut("nlist").unwrap();
    let first = n.get(0).unwrap().to_value();
    n.append(first, &Origin::here()).unwrap();

    n.element_mut(3).unwrap().set(1, 777, &Origin::here()).unwrap();
    assert_eq!(
        *n.list(),
        vec![vec![6, 6, 6], vec![9, 9, 9, 9], vec![111], vec![6, 777, 6]]
    );
}

#[test]
fn element_indices_follow_position() {
    let mut c = nconfig();
    let mut n = c.nested_mut("nlist").unwrap();
    n.insert(0, vec![0], &Origin::here()).unwrap();

    let names: Vec<String> = n
        .list()
        .iter()
        .map(|sub| format!("{}@{}", sub.field().name(), sub.index()))
        .collect();
    assert_eq!(names, vec!["nlist[0]@0", "nlist[1]@1", "nlist[2]@2"]);

    n.delete(1, &Origin::here()).unwrap();
    assert_eq!(n.get(1).unwrap().field().name(), "nlist[1]");
    assert_eq!(*n.get(1).unwrap(), vec![9]);
}

#[test]
fn flat_field_widens_ints_for_float_items() {
    use fieldtrail::{Config, ItemType, ListField, ListFieldOptions, Schema};
    use std::sync::Arc;

    let f = ListField::new("f", ListFieldOptions::new(ItemType::Float)).unwrap();
    let mut c = Config::new(Arc::new(Schema::new("F").with_field(f).unwrap())).unwrap();
    c.set("f", vec![1.5], &Origin::here()).unwrap();
    c.list_mut("f").unwrap().append(2, &Origin::here()).unwrap();
    assert_eq!(*c.get("f").unwrap(), vec![1.5, 2.0]);
    assert!(c.get("f").unwrap().contains(&Value::Float(2.0)));
}
