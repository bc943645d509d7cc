//! State payload contract.

use crate::clone::CloneEngine;
use crate::error::CloneError;

/// Observer callback: `(new_state, old_state)`.
pub type Update<S> = dyn FnMut(&S, &S) -> anyhow::Result<()>;

/// A payload a [`super::StateContainer`] can own.
///
/// `Clone` is the shallow copy handed to observers and kept as the previous
/// state. [`State::snapshot`] is the deep copy kept as the default state.
/// For plain-data types both are the same thing, so an empty
/// `impl State for MyState {}` is enough.
pub trait State: Clone + 'static {
    /// Structurally independent copy.
    fn snapshot(&self, _engine: &CloneEngine) -> Result<Self, CloneError> {
        Ok(self.clone())
    }

    /// Overwrites the fields of `self` with those of `defaults` in place.
    /// Fields `defaults` does not know about are left alone.
    fn restore(&mut self, defaults: Self) {
        *self = defaults;
    }
}

impl State for serde_json::Value {
    fn restore(&mut self, defaults: Self) {
        match (self, defaults) {
            (serde_json::Value::Object(live), serde_json::Value::Object(fields)) => {
                for (key, value) in fields {
                    live.insert(key, value);
                }
            }
            (live, other) => *live = other,
        }
    }
}
