//! # Observable state container
//!
//! A [`StateContainer`] owns one state payload and runs the actions declared
//! in an [`ActionManifest`] against it. After every action it runs a notify
//! cycle: each registered observer is called in registration order with
//! `(state, prev_state)`, then `prev_state` is refreshed.
//!
//! ## Invariants
//!
//! 1. The live state is never swapped out; resets overwrite it in place.
//! 2. The default snapshot is taken once, at construction, and never mutated.
//! 3. Observers run in registration order; ids may repeat and
//!    [`StateContainer::remove`] drops every match.
//! 4. A failing observer ends the pass and leaves `prev_state` untouched.

pub mod action;
pub mod manager;
pub mod observer;
pub mod types;

pub use action::{Action, ActionKind, ActionManifest, RESERVED_NAME};
pub use manager::StateContainer;
pub use observer::{Observer, ObserverList};
pub use types::{State, Update};
