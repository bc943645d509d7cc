//! Id-tagged observers, notified in registration order.

use std::fmt;

use super::types::Update;
use crate::error::StoreError;

pub struct Observer<S> {
    id: String,
    update: Box<Update<S>>,
}

impl<S> Observer<S> {
    pub fn new<F>(id: impl Into<String>, update: F) -> Self
    where
        F: FnMut(&S, &S) -> anyhow::Result<()> + 'static,
    {
        Self {
            id: id.into(),
            update: Box::new(update),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl<S> fmt::Debug for Observer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observer").field("id", &self.id).finish_non_exhaustive()
    }
}

/// Append-only list; ids may repeat.
pub struct ObserverList<S> {
    observers: Vec<Observer<S>>,
}

impl<S> Default for ObserverList<S> {
    fn default() -> Self {
        Self {
            observers: Vec::new(),
        }
    }
}

impl<S> ObserverList<S> {
    pub fn push(&mut self, observer: Observer<S>) {
        self.observers.push(observer);
    }

    /// Drops every observer tagged `id`, returning how many went.
    pub fn remove(&mut self, id: &str) -> usize {
        let before = self.observers.len();
        self.observers.retain(|o| o.id != id);
        before - self.observers.len()
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.observers.iter().map(Observer::id)
    }

    /// Calls every observer in order. Stops at the first failure.
    pub(crate) fn notify_all(&mut self, new_state: &S, old_state: &S) -> Result<(), StoreError> {
        for observer in &mut self.observers {
            (observer.update)(new_state, old_state).map_err(|source| StoreError::Observer {
                id: observer.id.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

impl<S> fmt::Debug for ObserverList<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.ids()).finish()
    }
}
