//! Observable state container with declared actions and a cycle-safe deep
//! clone engine.
//!
//! Prefer importing from [`api`].

pub mod api;
pub mod clone;
pub mod config;
pub mod error;
pub mod logging;
pub mod state;
pub mod value;
