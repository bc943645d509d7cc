//! Structural equality over value graphs.

use std::collections::HashSet;

use super::types::{Object, ObjectKind, Value};

/// Structural equality.
///
/// Records, arrays, sets and maps compare element by element in order;
/// boxed scalars, dates, errors and regular expressions compare by content;
/// symbols and functions compare by identity. Cyclic graphs terminate: a
/// pair of objects already under comparison is assumed equal.
pub fn deep_equals(a: &Value, b: &Value) -> bool {
    let mut visiting = HashSet::new();
    values_equal(a, b, &mut visiting)
}

fn values_equal(a: &Value, b: &Value, visiting: &mut HashSet<(usize, usize)>) -> bool {
    match (a, b) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => (x.is_nan() && y.is_nan()) || x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Symbol(x), Value::Symbol(y)) => x.ptr_eq(y),
        (Value::Function(x), Value::Function(y)) => x.ptr_eq(y),
        (Value::Object(x), Value::Object(y)) => objects_equal(x, y, visiting),
        _ => false,
    }
}

fn objects_equal(a: &Object, b: &Object, visiting: &mut HashSet<(usize, usize)>) -> bool {
    if a.ptr_eq(b) || !visiting.insert((a.addr(), b.addr())) {
        return true;
    }

    let (left, right) = (a.borrow(), b.borrow());
    match (&*left, &*right) {
        (ObjectKind::Record(x), ObjectKind::Record(y)) => {
            x.len() == y.len()
                && x.iter().zip(y.iter()).all(|((kx, vx), (ky, vy))| {
                    kx == ky && values_equal(vx, vy, visiting)
                })
        }
        (ObjectKind::Array(x), ObjectKind::Array(y)) => {
            x.len() == y.len()
                && x.iter().zip(y.iter()).all(|(vx, vy)| values_equal(vx, vy, visiting))
        }
        (ObjectKind::Set(x), ObjectKind::Set(y)) => {
            x.len() == y.len()
                && x.iter().zip(y.iter()).all(|(vx, vy)| values_equal(vx, vy, visiting))
        }
        (ObjectKind::Map(x), ObjectKind::Map(y)) => {
            x.len() == y.len()
                && x.iter().zip(y.iter()).all(|((kx, vx), (ky, vy))| {
                    values_equal(kx, ky, visiting) && values_equal(vx, vy, visiting)
                })
        }
        (ObjectKind::Boolean(x), ObjectKind::Boolean(y)) => x == y,
        (ObjectKind::Number(x), ObjectKind::Number(y)) => (x.is_nan() && y.is_nan()) || x == y,
        (ObjectKind::String(x), ObjectKind::String(y)) => x == y,
        (ObjectKind::Date(x), ObjectKind::Date(y)) => x == y,
        (ObjectKind::Error(x), ObjectKind::Error(y)) => x == y,
        (ObjectKind::RegExp(x), ObjectKind::RegExp(y)) => x == y,
        (ObjectKind::Symbol(x), ObjectKind::Symbol(y)) => x.ptr_eq(y),
        (ObjectKind::Opaque(x), ObjectKind::Opaque(y)) => x == y,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Function, Symbol};

    #[test]
    fn distinct_but_equal_records() {
        let a = Object::record([("n", Value::from(1)), ("s", Value::from("x"))]);
        let b = Object::record([("n", Value::from(1)), ("s", Value::from("x"))]);
        assert!(deep_equals(&Value::Object(a), &Value::Object(b)));
    }

    #[test]
    fn functions_and_symbols_by_identity() {
        let f = Function::new("f", |_| Value::Undefined);
        let g = Function::new("f", |_| Value::Undefined);
        assert!(deep_equals(&Value::Function(f.clone()), &Value::Function(f.clone())));
        assert!(!deep_equals(&Value::Function(f), &Value::Function(g)));

        let s = Symbol::new(Some("k"));
        assert!(!deep_equals(
            &Value::Symbol(s),
            &Value::Symbol(Symbol::new(Some("k")))
        ));
    }

    #[test]
    fn cyclic_graphs_terminate() {
        let a = Object::record([("name", Value::from("a"))]);
        a.set_field("me", Value::Object(a.clone()));
        let b = Object::record([("name", Value::from("a"))]);
        b.set_field("me", Value::Object(b.clone()));

        assert!(deep_equals(&Value::Object(a), &Value::Object(b)));
    }

    #[test]
    fn kind_mismatch_is_unequal() {
        let arr = Object::array(vec![Value::from(1)]);
        let set = Object::set(vec![Value::from(1)]);
        assert!(!deep_equals(&Value::Object(arr), &Value::Object(set)));
    }
}
