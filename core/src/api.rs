//! Stable re-exports for consumers.
//!
//! Prefer importing from `fusestate_core::api` instead of reaching into internal modules.

pub use crate::clone::{deep_clone, CloneEngine, UnsupportedPolicy};
pub use crate::config::{load_default, CloneConfig, LoggingConfig, StoreConfig};
pub use crate::error::{CloneError, RegExpError, StoreError};
pub use crate::logging::init_logging;
pub use crate::state::{
    Action, ActionKind, ActionManifest, Observer, State, StateContainer, Update,
};
pub use crate::value::{
    deep_equals, same_value_zero, ErrorValue, Function, Object, ObjectKind, Record, RegExp,
    Symbol, Value, ValueMap, ValueSet,
};
