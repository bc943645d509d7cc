use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CloneError;
use crate::value::{Object, ObjectKind, Value, ValueMap, ValueSet};

/// What to do with an object the engine has no structural rule for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnsupportedPolicy {
    /// Fail with [`CloneError::Unsupported`].
    #[default]
    Error,
    /// Replace the object with `null` and keep going.
    Null,
}

impl FromStr for UnsupportedPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "null" => Ok(Self::Null),
            other => Err(format!("unknown unsupported-clone policy: {other}")),
        }
    }
}

impl fmt::Display for UnsupportedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => f.write_str("error"),
            Self::Null => f.write_str("null"),
        }
    }
}

/// Source object address -> its clone.
///
/// A container's clone is bound here before its children are visited and
/// filled in place afterwards, so back-references land on the finished
/// clone.
#[derive(Default)]
struct CloneMemo {
    slots: HashMap<usize, Object>,
}

impl CloneMemo {
    fn lookup(&self, source: &Object) -> Option<Object> {
        self.slots.get(&source.addr()).cloned()
    }

    fn bind(&mut self, source: &Object, kind: ObjectKind) -> Object {
        let target = Object::new(kind);
        self.slots.insert(source.addr(), target.clone());
        target
    }
}

/// Produces structurally independent copies of [`Value`] graphs.
#[derive(Debug, Clone, Copy, Default)]
pub struct CloneEngine {
    policy: UnsupportedPolicy,
}

impl CloneEngine {
    pub fn new(policy: UnsupportedPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> UnsupportedPolicy {
        self.policy
    }

    pub fn clone_value(&self, value: &Value) -> Result<Value, CloneError> {
        let mut memo = CloneMemo::default();
        let cloned = self.clone_in(value, &mut memo)?;
        tracing::trace!(
            target: "fusestate.clone",
            objects = memo.slots.len(),
            "value cloned"
        );
        Ok(cloned)
    }

    /// Clones a field table with one memo, so sub-structures shared between
    /// fields stay shared in the copy.
    pub fn clone_fields(
        &self,
        fields: &BTreeMap<String, Value>,
    ) -> Result<BTreeMap<String, Value>, CloneError> {
        let mut memo = CloneMemo::default();
        let mut out = BTreeMap::new();
        for (key, value) in fields {
            out.insert(key.clone(), self.clone_in(value, &mut memo)?);
        }
        tracing::trace!(
            target: "fusestate.clone",
            fields = out.len(),
            objects = memo.slots.len(),
            "fields cloned"
        );
        Ok(out)
    }

    fn clone_in(&self, value: &Value, memo: &mut CloneMemo) -> Result<Value, CloneError> {
        match value {
            Value::Object(object) => self.clone_object(object, memo),
            // Primitives are already isolated; functions are shared.
            _ => Ok(value.clone()),
        }
    }

    fn clone_object(&self, source: &Object, memo: &mut CloneMemo) -> Result<Value, CloneError> {
        if let Some(target) = memo.lookup(source) {
            return Ok(Value::Object(target));
        }

        let kind = source.borrow();
        let leaf = match &*kind {
            ObjectKind::Record(fields) => {
                let target = memo.bind(source, ObjectKind::Record(BTreeMap::new()));
                let mut out = BTreeMap::new();
                for (key, value) in fields {
                    out.insert(key.clone(), self.clone_in(value, memo)?);
                }
                *target.borrow_mut() = ObjectKind::Record(out);
                return Ok(Value::Object(target));
            }
            ObjectKind::Array(items) => {
                let target = memo.bind(source, ObjectKind::Array(Vec::new()));
                let mut out = Vec::with_capacity(items.len());
                for value in items {
                    out.push(self.clone_in(value, memo)?);
                }
                *target.borrow_mut() = ObjectKind::Array(out);
                return Ok(Value::Object(target));
            }
            ObjectKind::Set(set) => {
                let target = memo.bind(source, ObjectKind::Set(ValueSet::new()));
                let mut out = ValueSet::new();
                for value in set.iter() {
                    out.insert(self.clone_in(value, memo)?);
                }
                *target.borrow_mut() = ObjectKind::Set(out);
                return Ok(Value::Object(target));
            }
            ObjectKind::Map(map) => {
                let target = memo.bind(source, ObjectKind::Map(ValueMap::new()));
                let mut out = ValueMap::new();
                for (key, value) in map.iter() {
                    // keys keep their identity
                    out.insert(key.clone(), self.clone_in(value, memo)?);
                }
                *target.borrow_mut() = ObjectKind::Map(out);
                return Ok(Value::Object(target));
            }
            ObjectKind::Boolean(b) => ObjectKind::Boolean(*b),
            ObjectKind::Number(n) => ObjectKind::Number(*n),
            ObjectKind::String(s) => ObjectKind::String(s.clone()),
            ObjectKind::Date(at) => ObjectKind::Date(*at),
            ObjectKind::Error(err) => ObjectKind::Error(err.clone()),
            ObjectKind::RegExp(re) => ObjectKind::RegExp(re.clone()),
            ObjectKind::Symbol(sym) => ObjectKind::Symbol(sym.clone()),
            ObjectKind::Opaque(tag) => return self.unsupported(tag),
        };

        Ok(Value::Object(memo.bind(source, leaf)))
    }

    fn unsupported(&self, type_tag: &str) -> Result<Value, CloneError> {
        match self.policy {
            UnsupportedPolicy::Error => Err(CloneError::Unsupported {
                type_tag: type_tag.to_string(),
            }),
            UnsupportedPolicy::Null => {
                tracing::warn!(
                    target: "fusestate.clone",
                    type_tag,
                    "unsupported value replaced with null"
                );
                Ok(Value::Null)
            }
        }
    }
}

/// Deep clone with the default engine (unsupported values are errors).
pub fn deep_clone(value: &Value) -> Result<Value, CloneError> {
    CloneEngine::default().clone_value(value)
}
