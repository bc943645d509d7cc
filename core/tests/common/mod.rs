#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use fusestate_core::api::{Object, Record, StateContainer, Value};

/// Notifications seen by one observer, as (new, old) pairs.
pub type Recorded = Rc<RefCell<Vec<(Record, Record)>>>;

pub fn record_notifications<A: 'static>(
    store: &mut StateContainer<Record, A>,
    id: &str,
) -> Recorded {
    let seen: Recorded = Rc::default();
    let sink = Rc::clone(&seen);
    store.register(id, move |new: &Record, old: &Record| {
        sink.borrow_mut().push((new.clone(), old.clone()));
        Ok(())
    });
    seen
}

/// Projects recorded notifications onto one numeric field.
pub fn numbers(seen: &Recorded, field: &str) -> Vec<(f64, f64)> {
    seen.borrow()
        .iter()
        .map(|(new, old)| {
            (
                new.number(field).unwrap_or(f64::NAN),
                old.number(field).unwrap_or(f64::NAN),
            )
        })
        .collect()
}

/// `{ profile: { name }, tags: [..], seen: Set, scores: Map }`
pub fn nested_fixture() -> Value {
    Value::Object(Object::record([
        (
            "profile",
            Value::Object(Object::record([("name", Value::from("ada"))])),
        ),
        (
            "tags",
            Value::Object(Object::array(vec![Value::from("a"), Value::from("b")])),
        ),
        (
            "seen",
            Value::Object(Object::set(vec![Value::from(1), Value::from(2)])),
        ),
        (
            "scores",
            Value::Object(Object::map(vec![(
                Value::from("math"),
                Value::Object(Object::array(vec![Value::from(90)])),
            )])),
        ),
    ]))
}

pub fn field(value: &Value, key: &str) -> Value {
    value
        .as_object()
        .and_then(|o| o.get(key))
        .unwrap_or_else(|| panic!("missing field {key}"))
}
