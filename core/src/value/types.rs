use std::cell::{Ref, RefCell, RefMut};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use chrono::{DateTime, Utc};

use super::collections::{ValueMap, ValueSet};
use super::regexp::RegExp;

/// A dynamically typed value.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Symbol(Symbol),
    Function(Function),
    Object(Object),
}

impl Value {
    pub fn is_primitive(&self) -> bool {
        !matches!(self, Value::Function(_) | Value::Object(_))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Raw type name, e.g. `Number`, `Array`, `Map`.
    pub fn type_tag(&self) -> String {
        match self {
            Value::Undefined => "Undefined".to_string(),
            Value::Null => "Null".to_string(),
            Value::Bool(_) => "Boolean".to_string(),
            Value::Number(_) => "Number".to_string(),
            Value::String(_) => "String".to_string(),
            Value::Symbol(_) => "Symbol".to_string(),
            Value::Function(_) => "Function".to_string(),
            Value::Object(o) => o.type_tag(),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Symbol(s) => fmt::Debug::fmt(s, f),
            Value::Function(func) => fmt::Debug::fmt(func, f),
            Value::Object(o) => fmt::Debug::fmt(o, f),
        }
    }
}

/// Structural equality; see [`super::deep_equals`].
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        super::compare::deep_equals(self, other)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Symbol> for Value {
    fn from(s: Symbol) -> Self {
        Value::Symbol(s)
    }
}

impl From<Function> for Value {
    fn from(f: Function) -> Self {
        Value::Function(f)
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Value::Object(o)
    }
}

/// A unique symbol. Equality is identity.
#[derive(Clone)]
pub struct Symbol(Rc<SymbolInner>);

struct SymbolInner {
    description: Option<String>,
}

impl Symbol {
    pub fn new(description: Option<&str>) -> Self {
        Self(Rc::new(SymbolInner {
            description: description.map(str::to_string),
        }))
    }

    pub fn description(&self) -> Option<&str> {
        self.0.description.as_deref()
    }

    pub fn ptr_eq(&self, other: &Symbol) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.description().unwrap_or(""))
    }
}

type NativeFn = dyn Fn(&[Value]) -> Value;

/// A callable value. Clones share the same underlying closure.
#[derive(Clone)]
pub struct Function {
    name: Rc<str>,
    call: Rc<NativeFn>,
}

impl Function {
    pub fn new(name: &str, call: impl Fn(&[Value]) -> Value + 'static) -> Self {
        Self {
            name: Rc::from(name),
            call: Rc::new(call),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &[Value]) -> Value {
        (self.call)(args)
    }

    pub fn ptr_eq(&self, other: &Function) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.call), Rc::as_ptr(&other.call))
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[Function: {}]", self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorValue {
    pub name: String,
    pub message: String,
}

impl ErrorValue {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            name: "Error".to_string(),
            message: message.into(),
        }
    }
}

/// Heap payload of an [`Object`].
#[derive(Debug)]
pub enum ObjectKind {
    Record(BTreeMap<String, Value>),
    Array(Vec<Value>),
    Set(ValueSet),
    Map(ValueMap),
    Boolean(bool),
    Number(f64),
    String(String),
    Date(DateTime<Utc>),
    Error(ErrorValue),
    RegExp(RegExp),
    Symbol(Symbol),
    /// Anything the clone engine has no structural rule for, tagged by type
    /// name (`WeakMap`, `ArrayBuffer`, ...).
    Opaque(String),
}

impl ObjectKind {
    pub fn type_tag(&self) -> &str {
        match self {
            ObjectKind::Record(_) => "Object",
            ObjectKind::Array(_) => "Array",
            ObjectKind::Set(_) => "Set",
            ObjectKind::Map(_) => "Map",
            ObjectKind::Boolean(_) => "Boolean",
            ObjectKind::Number(_) => "Number",
            ObjectKind::String(_) => "String",
            ObjectKind::Date(_) => "Date",
            ObjectKind::Error(_) => "Error",
            ObjectKind::RegExp(_) => "RegExp",
            ObjectKind::Symbol(_) => "Symbol",
            ObjectKind::Opaque(tag) => tag,
        }
    }
}

/// Shared handle to a heap object. Clones alias the same object.
#[derive(Clone)]
pub struct Object(Rc<RefCell<ObjectKind>>);

impl Object {
    pub fn new(kind: ObjectKind) -> Self {
        Self(Rc::new(RefCell::new(kind)))
    }

    pub fn record<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Self::new(ObjectKind::Record(
            fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
        Self::new(ObjectKind::Array(items.into_iter().collect()))
    }

    pub fn set(items: impl IntoIterator<Item = Value>) -> Self {
        Self::new(ObjectKind::Set(items.into_iter().collect()))
    }

    pub fn map(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        Self::new(ObjectKind::Map(entries.into_iter().collect()))
    }

    pub fn date(at: DateTime<Utc>) -> Self {
        Self::new(ObjectKind::Date(at))
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ObjectKind::Error(ErrorValue::new(message)))
    }

    pub fn regexp(re: RegExp) -> Self {
        Self::new(ObjectKind::RegExp(re))
    }

    pub fn opaque(type_tag: impl Into<String>) -> Self {
        Self::new(ObjectKind::Opaque(type_tag.into()))
    }

    pub fn borrow(&self) -> Ref<'_, ObjectKind> {
        self.0.borrow()
    }

    /// # Panics
    ///
    /// Panics if the object is already borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, ObjectKind> {
        self.0.borrow_mut()
    }

    pub fn ptr_eq(&self, other: &Object) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Stable address of the shared allocation, used as an identity key.
    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }

    pub fn type_tag(&self) -> String {
        self.borrow().type_tag().to_string()
    }

    /// Field lookup on a record. `None` for other kinds or missing keys.
    pub fn get(&self, key: &str) -> Option<Value> {
        match &*self.borrow() {
            ObjectKind::Record(fields) => fields.get(key).cloned(),
            _ => None,
        }
    }

    /// Field assignment on a record. Returns `false` if this is not a record.
    pub fn set_field(&self, key: impl Into<String>, value: Value) -> bool {
        match &mut *self.borrow_mut() {
            ObjectKind::Record(fields) => {
                fields.insert(key.into(), value);
                true
            }
            _ => false,
        }
    }

    /// Append to an array. Returns `false` if this is not an array.
    pub fn push(&self, value: Value) -> bool {
        match &mut *self.borrow_mut() {
            ObjectKind::Array(items) => {
                items.push(value);
                true
            }
            _ => false,
        }
    }

    /// Element count of a record, array, set or map.
    pub fn element_count(&self) -> Option<usize> {
        match &*self.borrow() {
            ObjectKind::Record(fields) => Some(fields.len()),
            ObjectKind::Array(items) => Some(items.len()),
            ObjectKind::Set(set) => Some(set.len()),
            ObjectKind::Map(map) => Some(map.len()),
            _ => None,
        }
    }
}

// Shallow on purpose: object graphs may be cyclic.
impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(kind) => write!(f, "[{} @{:#x}]", kind.type_tag(), self.addr()),
            Err(_) => write!(f, "[<borrowed> @{:#x}]", self.addr()),
        }
    }
}
