//! Declared actions and the manifest that carries them into a container.

use std::collections::BTreeMap;
use std::fmt;

use futures::future::LocalBoxFuture;

use crate::error::StoreError;

/// Name no action may take.
pub const RESERVED_NAME: &str = "state";

pub type SyncActionFn<S, A> = dyn Fn(&mut S, A) -> anyhow::Result<()>;
pub type AsyncActionFn<S, A> =
    dyn for<'a> Fn(&'a mut S, A) -> LocalBoxFuture<'a, anyhow::Result<()>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Synchronous,
    Asynchronous,
}

/// A mutator over `S` taking arguments `A`.
pub enum Action<S, A> {
    Synchronous(Box<SyncActionFn<S, A>>),
    Asynchronous(Box<AsyncActionFn<S, A>>),
}

impl<S, A> Action<S, A> {
    /// Wrap a synchronous mutator.
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn(&mut S, A) -> anyhow::Result<()> + 'static,
    {
        Action::Synchronous(Box::new(f))
    }

    /// Wrap a mutator returning a future.
    pub fn asynchronous<F>(f: F) -> Self
    where
        F: for<'a> Fn(&'a mut S, A) -> LocalBoxFuture<'a, anyhow::Result<()>> + 'static,
    {
        Action::Asynchronous(Box::new(f))
    }

    /// Whether the action runs synchronously.
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Synchronous(_) => ActionKind::Synchronous,
            Action::Asynchronous(_) => ActionKind::Asynchronous,
        }
    }
}

impl<S, A> fmt::Debug for Action<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Action::{:?}", self.kind())
    }
}

/// Named actions, declared up front.
///
/// Declaring a name twice keeps the later action.
pub struct ActionManifest<S, A = ()> {
    entries: BTreeMap<String, Action<S, A>>,
}

impl<S, A> Default for ActionManifest<S, A> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<S, A> ActionManifest<S, A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a synchronous action.
    pub fn with_sync<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut S, A) -> anyhow::Result<()> + 'static,
    {
        self.insert(name, Action::sync(f));
        self
    }

    /// Declare an asynchronous action.
    pub fn with_async<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: for<'a> Fn(&'a mut S, A) -> LocalBoxFuture<'a, anyhow::Result<()>> + 'static,
    {
        self.insert(name, Action::asynchronous(f));
        self
    }

    /// Add an action, returning the one it replaced.
    pub fn insert(&mut self, name: impl Into<String>, action: Action<S, A>) -> Option<Action<S, A>> {
        self.entries.insert(name.into(), action)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Validates names and hands over the dispatch table.
    pub(crate) fn into_table(self) -> Result<BTreeMap<String, Action<S, A>>, StoreError> {
        if self.entries.contains_key(RESERVED_NAME) {
            return Err(StoreError::ReservedActionName(RESERVED_NAME.to_string()));
        }
        Ok(self.entries)
    }
}

impl<S, A> fmt::Debug for ActionManifest<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}
