//! History ledgers
//!
//! One record per successful call on the ledger the handle writes to. A
//! sub-list mutation records in the element's own ledger and cascades one
//! `<label>[<index>]` record to the parent field's ledger.

use crate::common::*;
use fieldtrail::{CallSite, Origin, SequenceMut, Value};

fn labels(c: &fieldtrail::Config, field: &str) -> Vec<String> {
    c.history(field)
        .unwrap()
        .labels()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[test]
fn default_records_declaration_site() {
    let c = nconfig();
    let h = c.history("nlist").unwrap();
    assert_eq!(h.len(), 1);
    assert_eq!(h[0].label(), "default");
    assert_eq!(*h[0].value(), vec![vec![1], vec![9]]);
    assert!(h[0].call_site().file.ends_with("common.rs"));

    let n = c.get("nlist").unwrap().as_nested().unwrap();
    assert_eq!(n.get(1).unwrap().history().labels(), vec!["default"]);

    // unset field with no default records a null
    assert!(c.history("polist").unwrap()[0].value().is_null());
}

#[test]
fn whole_field_assignment_appends_to_field_ledger() {
    let mut c = nconfig();
    let origin = Origin::here();
    c.set("nlist", vec![vec![1, 2, 3], vec![4, 5, 6]], &origin).unwrap();
    c.set("polist", vec![7, 8, 9], &origin).unwrap();

    assert_eq!(labels(&c, "nlist"), vec!["default", "assignment"]);
    assert_eq!(labels(&c, "polist"), vec!["default", "assignment"]);

    let last = c.history("nlist").unwrap().last().unwrap();
    assert_eq!(*last.call_site(), *origin.call_site());

    // the new elements start with one record each
    let n = c.get("nlist").unwrap().as_nested().unwrap();
    for sub in n {
        assert_eq!(sub.history().labels(), vec!["assignment"]);
    }
}

#[test]
fn element_mutation_cascades_to_parent() {
    let mut c = nconfig();
    c.set("nlist", vec![vec![1, 2, 3], vec![4, 5, 6]], &Origin::here())
        .unwrap();
    c.nested_mut("nlist")
        .unwrap()
        .element_mut(1)
        .unwrap()
        .set(1, 7, &Origin::here())
        .unwrap();

    let n = c.get("nlist").unwrap().as_nested().unwrap();
    let sub = n.get(1).unwrap();
    assert_eq!(sub.history().labels(), vec!["assignment", "setitem"]);
    assert_eq!(*sub.history().last().unwrap().value(), vec![4, 7, 6]);
    assert_eq!(n.get(0).unwrap().history().len(), 1);

    let parent = c.history("nlist").unwrap();
    assert_eq!(parent.labels(), vec!["default", "assignment", "setitem[1]"]);
    assert_eq!(
        *parent.last().unwrap().value(),
        vec![vec![1, 2, 3], vec![4, 7, 6]]
    );
}

#[test]
fn every_element_call_records_once_in_each_ledger() {
    let mut c = nconfig();
    c.set("nlist", vec![vec![1, 2, 3], vec![4, 5, 6]], &Origin::here())
        .unwrap();
    {
        let mut n = c.nested_mut("nlist").unwrap();
        let mut l0 = n.element_mut(0).unwrap();
        l0.set(0, 0, &Origin::here()).unwrap();
        l0.set(2, 4, &Origin::here()).unwrap();
        l0.append(5, &Origin::here()).unwrap();
        l0.delete(3, &Origin::here()).unwrap();
        assert_eq!(
            l0.history().labels(),
            vec!["assignment", "setitem", "setitem", "insert", "delitem"]
        );
    }
    assert_eq!(
        labels(&c, "nlist"),
        vec![
            "default",
            "assignment",
            "setitem[0]",
            "setitem[0]",
            "insert[0]",
            "delitem[0]"
        ]
    );
}

#[test]
fn container_level_calls_record_once() {
    let mut c = nconfig();
    {
        let mut n = c.nested_mut("nlist").unwrap();
        n.set(0, vec![9, 9, 9], &Origin::here()).unwrap();
        n.insert(1, vec![3], &Origin::here()).unwrap();
        n.delete(2, &Origin::here()).unwrap();
        n.set_slice(0..0, vec![vec![1], vec![2]], &Origin::here()).unwrap();

        // a replaced element gets a fresh ledger labelled by the call
        assert_eq!(n.get(2).unwrap().history().labels(), vec!["setitem"]);
        assert_eq!(n.get(3).unwrap().history().labels(), vec!["insert"]);
    }
    assert_eq!(
        labels(&c, "nlist"),
        vec!["default", "setitem", "insert", "delitem", "setitem"]
    );
    assert_eq!(
        *c.history("nlist").unwrap().last().unwrap().value(),
        vec![vec![1], vec![2], vec![9, 9, 9], vec![3]]
    );
}

#[test]
fn failed_calls_leave_ledgers_untouched() {
    let mut c = nconfig();
    let before = c.history("nlist").unwrap().clone();
    {
        let mut n = c.nested_mut("nlist").unwrap();
        assert!(n.set(1, 4, &Origin::here()).is_err());
        assert!(n.delete(7, &Origin::here()).is_err());
        let mut e = n.element_mut(0).unwrap();
        assert!(e.set(0, "one", &Origin::here()).is_err());
        assert_eq!(e.history().len(), 1);
    }
    assert!(c.set("nlist", vec![1], &Origin::here()).is_err());
    assert_eq!(*c.history("nlist").unwrap(), before);
}

#[test]
fn explicit_labels_and_call_sites() {
    let mut c = nconfig();
    let origin = Origin::at(CallSite::described("tuning script")).with_label("tuning");
    c.nested_mut("nlist")
        .unwrap()
        .element_mut(0)
        .unwrap()
        .append(2, &origin)
        .unwrap();

    let last = c.history("nlist").unwrap().last().unwrap();
    assert_eq!(last.label(), "tuning[0]");
    assert_eq!(last.call_site().description.as_deref(), Some("tuning script"));

    let n = c.get("nlist").unwrap().as_nested().unwrap();
    assert_eq!(n.get(0).unwrap().history().last().unwrap().label(), "tuning");
}

#[test]
fn untracked_calls_skip_recording() {
    let mut c = nconfig();
    let quiet = Origin::here().untracked();
    c.set("nlist", vec![vec![5]], &quiet).unwrap();
    c.nested_mut("nlist")
        .unwrap()
        .element_mut(0)
        .unwrap()
        .append(6, &quiet)
        .unwrap();

    assert_eq!(c.history("nlist").unwrap().len(), 1);
    let n = c.get("nlist").unwrap().as_nested().unwrap();
    assert!(n.get(0).unwrap().history().is_empty());
    assert_eq!(*n, vec![vec![5, 6]]);
}

#[test]
fn moved_elements_cascade_under_new_index() {
    let mut c = nconfig();
    let mut n = c.nested_mut("nlist").unwrap();
    n.insert(0, vec![0], &Origin::here()).unwrap();
    n.element_mut(2)
        .unwrap()
        .set(0, 10, &Origin::here())
        .unwrap();
    drop(n);

    assert_eq!(labels(&c, "nlist").last().map(String::as_str), Some("setitem[2]"));
    let n = c.get("nlist").unwrap().as_nested().unwrap();
    // the moved element kept its ledger from construction
    assert_eq!(n.get(2).unwrap().history().labels(), vec!["default", "setitem"]);
}

#[test]
fn report_renders_one_line_per_record() {
    let mut c = nconfig();
    c.set("polist", vec![7, 8], &Origin::here()).unwrap();
    c.list_mut("polist")
        .unwrap()
        .append(9, &Origin::here())
        .unwrap();

    let report = c.history("polist").unwrap().report("polist");
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(
        lines,
        vec![
            "History of polist",
            "  default = null",
            "  assignment = [7, 8]",
            "  insert = [7, 8, 9]",
        ]
    );
    assert!(c.history("polist").unwrap()[2].value() == &Value::from(vec![7, 8, 9]));
}
