//! Dynamic value graph used for untyped state payloads.
//!
//! Primitives are held inline; everything with identity (records, arrays,
//! sets, maps, boxed scalars, dates, errors, regular expressions, boxed
//! symbols) lives behind a shared [`Object`] handle. Cloning a [`Value`] copies
//! the handle, not the object; use [`crate::clone::deep_clone`] for a
//! structurally independent copy.

pub mod collections;
pub mod compare;
pub mod record;
pub mod regexp;
pub mod types;

pub use collections::{same_value_zero, ValueMap, ValueSet};
pub use compare::deep_equals;
pub use record::Record;
pub use regexp::RegExp;
pub use types::{ErrorValue, Function, Object, ObjectKind, Symbol, Value};
