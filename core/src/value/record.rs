use std::collections::BTreeMap;
use std::ops::Index;

use super::types::Value;
use crate::clone::CloneEngine;
use crate::error::CloneError;
use crate::state::State;

/// Dynamic state payload: field name -> [`Value`].
///
/// `Clone` copies one level: nested objects stay shared with the original.
/// The [`State`] snapshot goes through the clone engine instead.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: BTreeMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Field value by name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.fields.get_mut(key)
    }

    /// Numeric field, if present and a number.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_number)
    }

    /// Set a field, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key.into(), value.into())
    }

    /// Drop a field.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl From<BTreeMap<String, Value>> for Record {
    fn from(fields: BTreeMap<String, Value>) -> Self {
        Self { fields }
    }
}

impl Index<&str> for Record {
    type Output = Value;

    /// # Panics
    ///
    /// Panics if the field is missing.
    fn index(&self, key: &str) -> &Value {
        &self.fields[key]
    }
}

impl State for Record {
    fn snapshot(&self, engine: &CloneEngine) -> Result<Self, CloneError> {
        engine.clone_fields(&self.fields).map(Self::from)
    }

    fn restore(&mut self, defaults: Self) {
        for (key, value) in defaults.fields {
            self.fields.insert(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Object;

    #[test]
    fn clone_is_one_level() {
        let items = Object::array(vec![Value::from(1)]);
        let rec: Record = [("items", Value::Object(items.clone()))].into_iter().collect();

        let shallow = rec.clone();
        items.push(Value::from(2));
        assert_eq!(shallow["items"].as_object().unwrap().element_count(), Some(2));
    }

    #[test]
    fn snapshot_is_independent() {
        let items = Object::array(vec![Value::from(1)]);
        let rec: Record = [("items", Value::Object(items.clone()))].into_iter().collect();

        let snap = rec.snapshot(&CloneEngine::default()).unwrap();
        items.push(Value::from(2));
        assert_eq!(snap["items"].as_object().unwrap().element_count(), Some(1));
    }

    #[test]
    fn restore_leaves_unknown_fields() {
        let mut live: Record = [("count", Value::from(9)), ("extra", Value::from(true))]
            .into_iter()
            .collect();
        let defaults: Record = [("count", Value::from(0))].into_iter().collect();

        live.restore(defaults);
        assert_eq!(live.number("count"), Some(0.0));
        assert_eq!(live.get("extra"), Some(&Value::Bool(true)));
    }
}
