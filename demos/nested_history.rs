//! Walk through a nested list field and print its history after each step.
//!
//! ```bash
//! cargo run --example nested_history
//! ```

use fieldtrail::{
    Config, ItemType, ListField, ListFieldOptions, Origin, Schema, Sequence, SequenceMut, Value,
};
use std::sync::Arc;

fn print_history(config: &Config, field: &str) {
    if let Some(history) = config.history(field) {
        println!("{}", history.report(field));
    }
}

fn print_element_history(config: &Config, field: &str, index: usize) {
    let element = config
        .get(field)
        .and_then(|v| v.as_nested())
        .and_then(|n| n.get(index));
    if let Some(element) = element {
        println!("{}", element.history().report(&format!("{}[{}]", field, index)));
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let schema = Schema::new("NConfig")
        .with_field(ListField::nested(
            "nlist",
            ListFieldOptions::new(ItemType::Int).with_default(vec![vec![1], vec![9]]),
        )?)?
        .with_field(ListField::new(
            "polist",
            ListFieldOptions::new(ItemType::Int).optional(),
        )?)?
        .with_field(ListField::nested(
            "lenlist",
            ListFieldOptions::new(ItemType::Int)
                .with_min_length(2)
                .with_default(vec![vec![42], vec![100]]),
        )?)?;
    let mut nc = Config::new(Arc::new(schema))?;
    print_history(&nc, "nlist");

    nc.set("nlist", vec![vec![1, 2, 3], vec![4, 5, 6]], &Origin::here())?;
    nc.set("polist", vec![7, 8, 9], &Origin::here())?;
    print_history(&nc, "nlist");
    print_history(&nc, "polist");

    nc.nested_mut("nlist")?
        .element_mut(1)?
        .set(1, 7, &Origin::here())?;
    print_element_history(&nc, "nlist", 1);

    {
        let mut nlist = nc.nested_mut("nlist")?;
        let mut l0 = nlist.element_mut(0)?;
        l0.set(0, 0, &Origin::here())?;
        l0.set(2, 4, &Origin::here())?;
    }
    print_history(&nc, "nlist");
    print_element_history(&nc, "nlist", 0);

    match nc.nested_mut("nlist")?.set(1, 4, &Origin::here()) {
        Ok(()) => println!("Uh oh, that was not supposed to work!"),
        Err(e) => println!("Good, that failed: {}", e),
    }

    nc.nested_mut("nlist")?
        .set(0, vec![9, 9, 9], &Origin::here())?;
    nc.nested_mut("nlist")?
        .element_mut(0)?
        .set(1, 6, &Origin::here())?;
    print_history(&nc, "nlist");

    nc.set("nlist", vec![vec![6, 6, 6], vec![9, 9, 9, 9], vec![111]], &Origin::here())?;
    {
        let mut nlist = nc.nested_mut("nlist")?;
        let first = nlist.get(0).map(|e| e.to_value()).unwrap_or(Value::Null);
        nlist.append(first, &Origin::here())?;
        let last = nlist.len() - 1;
        nlist.element_mut(last)?.set(1, 777, &Origin::here())?;
    }
    print_history(&nc, "nlist");

    nc.set("lenlist", Vec::<Vec<i64>>::new(), &Origin::here())?;
    if let Err(e) = nc.validate() {
        println!("Validation failed: {}", e);
    }
    Ok(())
}
