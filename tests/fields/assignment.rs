//! Whole-field assignment
//!
//! Every element passes through the element transform: it must be a
//! sequence, must not be text, and each item must match the item type.

use crate::common::*;
use fieldtrail::{Error, ItemType, Origin, SchemaError, Sequence, ValidationKind, Value};

fn kind_of(err: Error) -> ValidationKind {
    err.validation_kind()
        .unwrap_or_else(|| panic!("Expected a validation error, got {:?}", err))
}

// ============================================================================
// Declaration
// ============================================================================

#[test]
fn unsupported_item_type_is_rejected() {
    let err = "list".parse::<ItemType>().unwrap_err();
    assert_eq!(
        err,
        SchemaError::UnsupportedItemType {
            name: "list".into()
        }
    );
}

#[test]
fn defaults_are_installed() {
    let c = config1();
    assert_eq!(*c.get("x").unwrap(), [&[1][..], &[2, 3][..]]);
    assert_eq!(*c.get("y").unwrap(), vec![vec!["a"], vec!["bc", "def"]]);
}

// ============================================================================
// Integer nested field
// ============================================================================

#[test]
fn float_items_rejected_for_int_field() {
    let mut c = config1();
    let err = c
        .set("x", vec![vec![1.2], vec![3.4]], &Origin::here())
        .unwrap_err();
    assert_eq!(kind_of(err), ValidationKind::ItemTypeMismatch);
}

#[test]
fn scalar_element_rejected() {
    let mut c = config1();
    let err = c.set("x", vec![1], &Origin::here()).unwrap_err();
    assert_eq!(kind_of(err), ValidationKind::NotIterableElement);
}

#[test]
fn valid_int_assignments() {
    let mut c = config1();
    c.set("x", vec![vec![1, 2], vec![3]], &Origin::here()).unwrap();
    assert_eq!(*c.get("x").unwrap(), vec![vec![1, 2], vec![3]]);

    let empties: Vec<Vec<i64>> = vec![vec![]; 5];
    c.set("x", empties, &Origin::here()).unwrap();
    assert_eq!(c.get("x").unwrap().len(), 5);

    let mut mostly_empty: Vec<Vec<i64>> = vec![vec![]; 3];
    mostly_empty.push(vec![4]);
    c.set("x", mostly_empty, &Origin::here()).unwrap();
    assert_eq!(c.get("x").unwrap().to_value().to_string(), "[[], [], [], [4]]");
}

#[test]
fn failed_assignment_keeps_previous_value() {
    let mut c = config1();
    let before = c.get("x").unwrap().to_value();
    let ledger_len = c.history("x").unwrap().len();

    assert!(c.set("x", vec![vec![1], vec![2]], &Origin::here()).is_ok());
    assert!(c
        .set("x", vec![vec![1.5]], &Origin::here())
        .is_err());

    assert_ne!(c.get("x").unwrap().to_value(), before);
    assert_eq!(*c.get("x").unwrap(), vec![vec![1], vec![2]]);
    assert_eq!(c.history("x").unwrap().len(), ledger_len + 1);
}

// ============================================================================
// String nested field
// ============================================================================

#[test]
fn int_and_float_items_rejected_for_str_field() {
    let mut c = config1();
    let err = c.set("y", vec![vec![1]], &Origin::here()).unwrap_err();
    assert_eq!(kind_of(err), ValidationKind::ItemTypeMismatch);
    let err = c.set("y", vec![vec![1.3]], &Origin::here()).unwrap_err();
    assert_eq!(kind_of(err), ValidationKind::ItemTypeMismatch);
}

#[test]
fn text_element_rejected() {
    let mut c = config1();
    let err = c.set("y", vec!["str"], &Origin::here()).unwrap_err();
    assert_eq!(kind_of(err), ValidationKind::StringElementDisallowed);
}

#[test]
fn bad_item_in_later_element_names_that_element() {
    let mut c = config1();
    let mixed = Value::Array(vec![Value::from(vec!["str"]), Value::from(vec![7])]);
    let err = c.set("y", mixed, &Origin::here()).unwrap_err();
    match err {
        Error::Validation {
            field, owner, kind, ..
        } => {
            assert_eq!(field, "y[1]");
            assert_eq!(owner, "Config1");
            assert_eq!(kind, ValidationKind::ItemTypeMismatch);
        }
        other => panic!("Expected Validation, got {:?}", other),
    }
    assert_eq!(*c.get("y").unwrap(), vec![vec!["a"], vec!["bc", "def"]]);
}

#[test]
fn valid_str_assignments() {
    let mut c = config1();
    let none: Vec<Vec<&str>> = Vec::new();
    c.set("y", none, &Origin::here()).unwrap();
    assert!(c.get("y").unwrap().is_empty());

    c.set("y", vec![vec!["str"]], &Origin::here()).unwrap();
    c.set("y", vec![vec![], vec![], vec![""]], &Origin::here()).unwrap();
    assert_eq!(*c.get("y").unwrap(), vec![vec![], vec![], vec![""]]);
}

#[test]
fn whole_field_text_is_not_a_sequence() {
    let mut c = config1();
    let err = c.set("y", "abc", &Origin::here()).unwrap_err();
    assert_eq!(kind_of(err), ValidationKind::NotASequence);
}

// ============================================================================
// Unset
// ============================================================================

#[test]
fn null_assignment_unsets_and_records() {
    let mut c = config1();
    c.set("x", Value::Null, &Origin::here()).unwrap();
    assert!(c.get("x").is_none());

    let last = c.history("x").unwrap().last().unwrap();
    assert!(last.value().is_null());
    assert_eq!(last.label(), "assignment");
}
