//! Observable state container.

use std::collections::BTreeMap;
use std::fmt;

use super::action::{Action, ActionKind, ActionManifest};
use super::observer::{Observer, ObserverList};
use super::types::State;
use crate::clone::CloneEngine;
use crate::config::StoreConfig;
use crate::error::StoreError;

/// Owns a state payload, its default snapshot and its observers, and runs
/// declared actions against it.
///
/// Every successful action is followed by exactly one notify cycle: each
/// observer, in registration order, receives `(state, prev_state)`, after
/// which `prev_state` becomes a copy of `state`.
pub struct StateContainer<S: State, A: 'static = ()> {
    name: String,
    state: S,
    prev_state: S,
    default_state: S,
    observers: ObserverList<S>,
    actions: BTreeMap<String, Action<S, A>>,
    engine: CloneEngine,
    notify_cycles: u64,
}

impl<S: State, A: 'static> StateContainer<S, A> {
    /// Create a container with the default configuration.
    pub fn new(state: S, manifest: ActionManifest<S, A>) -> Result<Self, StoreError> {
        Self::with_config(&StoreConfig::default(), state, manifest)
    }

    /// Create a container; the default state is a deep snapshot of `state`.
    pub fn with_config(
        config: &StoreConfig,
        state: S,
        manifest: ActionManifest<S, A>,
    ) -> Result<Self, StoreError> {
        let actions = manifest.into_table()?;
        let engine = CloneEngine::new(config.clone.on_unsupported);
        let prev_state = state.clone();
        let default_state = state.snapshot(&engine)?;

        tracing::debug!(
            target: "fusestate.store",
            store = %config.name,
            actions = actions.len(),
            on_unsupported = %engine.policy(),
            "state container created"
        );

        Ok(Self {
            name: config.name.clone(),
            state,
            prev_state,
            default_state,
            observers: ObserverList::default(),
            actions,
            engine,
            notify_cycles: 0,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    /// State as of the last completed notify cycle.
    pub fn prev_state(&self) -> &S {
        &self.prev_state
    }

    pub fn default_state(&self) -> &S {
        &self.default_state
    }

    pub fn action_names(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    pub fn action_kind(&self, name: &str) -> Option<ActionKind> {
        self.actions.get(name).map(Action::kind)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn observer_ids(&self) -> impl Iterator<Item = &str> {
        self.observers.ids()
    }

    /// Completed notify cycles since construction.
    pub fn notify_cycles(&self) -> u64 {
        self.notify_cycles
    }

    /// Appends an observer tagged `id`. Ids need not be unique.
    pub fn register<F>(&mut self, id: impl Into<String>, observer: F)
    where
        F: FnMut(&S, &S) -> anyhow::Result<()> + 'static,
    {
        let observer = Observer::new(id, observer);
        tracing::trace!(target: "fusestate.store", store = %self.name, id = observer.id(), "observer registered");
        self.observers.push(observer);
    }

    /// Drops every observer tagged `id`; returns how many were dropped.
    pub fn remove(&mut self, id: &str) -> usize {
        let removed = self.observers.remove(id);
        tracing::trace!(target: "fusestate.store", store = %self.name, id, removed, "observers removed");
        removed
    }

    /// Runs one notify cycle.
    ///
    /// If an observer fails, the rest of the pass is skipped, `prev_state`
    /// keeps its old value and the error is returned.
    pub fn notify(&mut self) -> Result<(), StoreError> {
        let current = self.state.clone();
        let previous = self.prev_state.clone();

        if let Err(err) = self.observers.notify_all(&current, &previous) {
            tracing::warn!(
                target: "fusestate.store",
                store = %self.name,
                error = %err,
                "notify pass aborted"
            );
            return Err(err);
        }

        self.prev_state = current;
        self.notify_cycles += 1;
        tracing::debug!(
            target: "fusestate.store",
            store = %self.name,
            observers = self.observers.len(),
            cycle = self.notify_cycles,
            "notified"
        );
        Ok(())
    }

    /// Pushes the current state to every observer without changing it.
    pub fn get_latest_state(&mut self) -> Result<(), StoreError> {
        self.notify()
    }

    /// Writes a fresh copy of the default snapshot back into the live
    /// state, then notifies.
    pub fn clear_state(&mut self) -> Result<(), StoreError> {
        let defaults = self.default_state.snapshot(&self.engine)?;
        self.state.restore(defaults);
        tracing::debug!(target: "fusestate.store", store = %self.name, "state cleared");
        self.notify()
    }

    /// Runs a synchronous action, then notifies.
    pub fn dispatch(&mut self, name: &str, args: A) -> Result<(), StoreError> {
        match self.actions.get(name) {
            None => return Err(StoreError::UnknownAction(name.to_string())),
            Some(Action::Asynchronous(_)) => {
                return Err(StoreError::NotSynchronous(name.to_string()))
            }
            Some(Action::Synchronous(f)) => {
                tracing::debug!(target: "fusestate.store", store = %self.name, action = name, "dispatch");
                f(&mut self.state, args).map_err(|source| StoreError::Action {
                    name: name.to_string(),
                    source,
                })?;
            }
        }
        self.notify()
    }

    /// Runs any action, awaiting it if asynchronous, then notifies.
    /// Resolves to the container so calls can be chained.
    #[tracing::instrument(target = "fusestate.store", skip_all, fields(store = %self.name, action = name))]
    pub async fn dispatch_async(&mut self, name: &str, args: A) -> Result<&mut Self, StoreError> {
        let outcome = match self.actions.get(name) {
            None => return Err(StoreError::UnknownAction(name.to_string())),
            Some(Action::Synchronous(f)) => f(&mut self.state, args),
            Some(Action::Asynchronous(f)) => f(&mut self.state, args).await,
        };
        outcome.map_err(|source| StoreError::Action {
            name: name.to_string(),
            source,
        })?;

        self.notify()?;
        Ok(self)
    }
}

impl<S: State + fmt::Debug, A: 'static> fmt::Debug for StateContainer<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateContainer")
            .field("name", &self.name)
            .field("state", &self.state)
            .field("prev_state", &self.prev_state)
            .field("observers", &self.observers)
            .field("actions", &self.actions.keys().collect::<Vec<_>>())
            .field("notify_cycles", &self.notify_cycles)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    struct Counter {
        count: i64,
    }

    impl State for Counter {}

    type Log = Rc<RefCell<Vec<(i64, i64)>>>;

    fn counter_store() -> StateContainer<Counter, i64> {
        let manifest = ActionManifest::new()
            .with_sync("add", |s: &mut Counter, n: i64| {
                s.count += n;
                Ok(())
            })
            .with_sync("fail", |_: &mut Counter, _| anyhow::bail!("refused"))
            .with_async("add_later", |s, n| {
                async move {
                    tokio::task::yield_now().await;
                    s.count += n;
                    Ok(())
                }
                .boxed_local()
            });
        StateContainer::new(Counter { count: 0 }, manifest).unwrap()
    }

    fn watch(store: &mut StateContainer<Counter, i64>, id: &str) -> Log {
        let log: Log = Rc::default();
        let sink = Rc::clone(&log);
        store.register(id, move |new: &Counter, old: &Counter| {
            sink.borrow_mut().push((new.count, old.count));
            Ok(())
        });
        log
    }

    #[test]
    fn test_construction_snapshots() {
        let store = counter_store();
        assert_eq!(store.state(), &Counter { count: 0 });
        assert_eq!(store.prev_state(), &Counter { count: 0 });
        assert_eq!(store.default_state(), &Counter { count: 0 });
        assert_eq!(store.notify_cycles(), 0);
        assert_eq!(
            store.action_names().collect::<Vec<_>>(),
            vec!["add", "add_later", "fail"]
        );
        assert_eq!(store.action_kind("add_later"), Some(ActionKind::Asynchronous));
    }

    #[test]
    fn test_sync_dispatch_notifies_once() {
        let mut store = counter_store();
        let log = watch(&mut store, "o");

        store.dispatch("add", 2).unwrap();
        store.dispatch("add", 3).unwrap();

        assert_eq!(*log.borrow(), vec![(2, 0), (5, 2)]);
        assert_eq!(store.prev_state().count, 5);
        assert_eq!(store.notify_cycles(), 2);
    }

    #[test]
    fn test_dispatch_rejects_unknown_and_async() {
        let mut store = counter_store();
        let log = watch(&mut store, "o");

        assert!(matches!(
            store.dispatch("nope", 1),
            Err(StoreError::UnknownAction(name)) if name == "nope"
        ));
        assert!(matches!(
            store.dispatch("add_later", 1),
            Err(StoreError::NotSynchronous(name)) if name == "add_later"
        ));
        assert_eq!(store.state().count, 0);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_failed_action_skips_notify() {
        let mut store = counter_store();
        let log = watch(&mut store, "o");

        let err = store.dispatch("fail", 0).unwrap_err();
        assert!(matches!(err, StoreError::Action { ref name, .. } if name == "fail"));
        assert!(log.borrow().is_empty());
        assert_eq!(store.notify_cycles(), 0);
    }

    #[test]
    fn test_observer_failure_keeps_prev_state() {
        let mut store = counter_store();
        let before = watch(&mut store, "before");
        store.register("broken", |_: &Counter, _: &Counter| anyhow::bail!("observer down"));
        let after = watch(&mut store, "after");

        let err = store.dispatch("add", 1).unwrap_err();
        assert_eq!(err.observer_id(), Some("broken"));
        assert_eq!(*before.borrow(), vec![(1, 0)]);
        assert!(after.borrow().is_empty());
        assert_eq!(store.state().count, 1);
        assert_eq!(store.prev_state().count, 0);

        store.remove("broken");
        store.get_latest_state().unwrap();
        assert_eq!(*after.borrow(), vec![(1, 0)]);
        assert_eq!(store.prev_state().count, 1);
    }

    #[test]
    fn test_remove_drops_all_with_id() {
        let mut store = counter_store();
        let first = watch(&mut store, "dup");
        let second = watch(&mut store, "dup");
        let other = watch(&mut store, "other");

        assert_eq!(store.remove("dup"), 2);
        assert_eq!(store.remove("dup"), 0);
        assert_eq!(store.observer_ids().collect::<Vec<_>>(), vec!["other"]);

        store.dispatch("add", 1).unwrap();
        assert!(first.borrow().is_empty());
        assert!(second.borrow().is_empty());
        assert_eq!(*other.borrow(), vec![(1, 0)]);
    }

    #[test]
    fn test_get_latest_state_repushes() {
        let mut store = counter_store();
        store.dispatch("add", 4).unwrap();
        let log = watch(&mut store, "late");

        store.get_latest_state().unwrap();
        assert_eq!(*log.borrow(), vec![(4, 4)]);
    }

    #[test]
    fn test_clear_state_restores_default() {
        let mut store = counter_store();
        let log = watch(&mut store, "o");
        store.dispatch("add", 7).unwrap();

        store.clear_state().unwrap();
        assert_eq!(store.state().count, 0);
        assert_eq!(*log.borrow(), vec![(7, 0), (0, 7)]);
        assert_eq!(store.default_state().count, 0);
    }

    #[test]
    fn test_reserved_name_rejected() {
        let manifest: ActionManifest<Counter> =
            ActionManifest::new().with_sync("state", |_, ()| Ok(()));
        assert!(matches!(
            StateContainer::new(Counter { count: 0 }, manifest),
            Err(StoreError::ReservedActionName(_))
        ));
    }

    #[test]
    fn test_config_name_and_debug() {
        let config = StoreConfig {
            name: "counter".to_string(),
            ..StoreConfig::default()
        };
        let store: StateContainer<Counter> =
            StateContainer::with_config(&config, Counter { count: 1 }, ActionManifest::new())
                .unwrap();
        assert_eq!(store.name(), "counter");
        let dbg = format!("{store:?}");
        assert!(dbg.contains("StateContainer"));
        assert!(dbg.contains("counter"));
    }

    #[tokio::test]
    async fn test_async_dispatch_notifies_before_resolving() {
        let mut store = counter_store();
        let log = watch(&mut store, "o");

        let resolved = store.dispatch_async("add_later", 5).await.unwrap();
        assert_eq!(resolved.state().count, 5);
        assert_eq!(*log.borrow(), vec![(5, 0)]);
    }

    #[tokio::test]
    async fn test_async_dispatch_chains_and_runs_sync_entries() {
        let mut store = counter_store();
        let log = watch(&mut store, "o");

        store
            .dispatch_async("add_later", 1)
            .await
            .unwrap()
            .dispatch_async("add", 10)
            .await
            .unwrap();

        assert_eq!(store.state().count, 11);
        assert_eq!(*log.borrow(), vec![(1, 0), (11, 1)]);
    }

    #[tokio::test]
    async fn test_async_observer_failure_rejects() {
        let mut store = counter_store();
        store.register("broken", |_: &Counter, _: &Counter| anyhow::bail!("down"));

        let err = store.dispatch_async("add_later", 1).await.unwrap_err();
        assert_eq!(err.observer_id(), Some("broken"));
        assert_eq!(store.state().count, 1);
    }
}
