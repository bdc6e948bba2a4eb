//! Observable state container and caller-owned bindings
//!
//! `Store<S>` holds one value behind a mutex and pushes a snapshot to every
//! subscriber on each write:
//! - Subscribing replays the current value first, then every later write.
//! - Emissions happen while the write lock is held, so each subscriber sees
//!   writes in the order they were made.
//! - Channels are unbounded, a slow subscriber never causes a skipped state.
//! - Subscribers whose receiver was dropped are pruned on the next write.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;

type Observer<S> = Box<dyn FnMut(&S) -> bool + Send>;

struct StoreInner<S> {
    value: S,
    observers: Vec<Observer<S>>,
}

/// Shared, observable value
pub struct Store<S> {
    inner: Arc<Mutex<StoreInner<S>>>,
}

impl<S> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: Default + Clone + Send + 'static> Default for Store<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S: fmt::Debug> fmt::Debug for Store<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        f.debug_struct("Store")
            .field("value", &inner.value)
            .field("observers", &inner.observers.len())
            .finish()
    }
}

impl<S> Store<S> {
    fn lock(&self) -> MutexGuard<'_, StoreInner<S>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S: Clone + Send + 'static> Store<S> {
    /// Create a store holding `value`
    pub fn new(value: S) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreInner {
                value,
                observers: Vec::new(),
            })),
        }
    }

    /// Snapshot of the whole value
    pub fn value(&self) -> S {
        self.lock().value.clone()
    }

    /// Read at a path
    pub fn read<T>(&self, path: impl FnOnce(&S) -> T) -> T {
        path(&self.lock().value)
    }

    /// Mutate in place and notify every subscriber once
    pub fn update<R>(&self, mutation: impl FnOnce(&mut S) -> R) -> R {
        let mut inner = self.lock();
        let result = mutation(&mut inner.value);

        let StoreInner { value, observers } = &mut *inner;
        observers.retain_mut(|observer| observer(&*value));
        result
    }

    /// Replace the whole value
    pub fn set(&self, value: S) {
        self.update(|current| *current = value);
    }

    /// Live sequence of full snapshots, starting with the current one
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<S> {
        self.subscribe_map(S::clone)
    }

    /// Live sequence of a derived value, one emission per write
    pub fn subscribe_map<T, F>(&self, path: F) -> mpsc::UnboundedReceiver<T>
    where
        T: Send + 'static,
        F: Fn(&S) -> T + Send + 'static,
    {
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut inner = self.lock();

        if sender.send(path(&inner.value)).is_ok() {
            inner
                .observers
                .push(Box::new(move |value: &S| sender.send(path(value)).is_ok()));
        }
        receiver
    }

    /// Live sequence of a derived value with consecutive duplicates removed
    pub fn updates<T, F>(&self, path: F) -> mpsc::UnboundedReceiver<T>
    where
        T: Clone + PartialEq + Send + 'static,
        F: Fn(&S) -> T + Send + 'static,
    {
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut inner = self.lock();

        let first = path(&inner.value);
        if sender.send(first.clone()).is_ok() {
            let mut previous = first;
            inner.observers.push(Box::new(move |value: &S| {
                let next = path(value);
                if next == previous {
                    return !sender.is_closed();
                }
                previous = next.clone();
                sender.send(next).is_ok()
            }));
        }
        receiver
    }

    /// Number of live subscribers, as of the last write
    pub fn subscriber_count(&self) -> usize {
        self.lock().observers.len()
    }

    /// A binding to the slot at `get`/`set` inside this store
    pub fn binding<T, G, W>(&self, get: G, set: W) -> Binding<T>
    where
        G: Fn(&S) -> T + Send + Sync + 'static,
        W: Fn(&mut S, T) + Send + Sync + 'static,
    {
        let reader = self.clone();
        let writer = self.clone();
        Binding {
            get: Arc::new(move || reader.read(&get)),
            set: Arc::new(move |value| writer.update(|state| set(state, value))),
        }
    }
}

/// A slot owned by the caller: a getter and a setter
///
/// Bindings can point into a `Store` path or wrap a store of their own, so
/// an interactor can write a result without knowing where it lives.
pub struct Binding<T> {
    get: Arc<dyn Fn() -> T + Send + Sync>,
    set: Arc<dyn Fn(T) + Send + Sync>,
}

impl<T> Clone for Binding<T> {
    fn clone(&self) -> Self {
        Self {
            get: Arc::clone(&self.get),
            set: Arc::clone(&self.set),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding").field("value", &self.get()).finish()
    }
}

impl<T> Binding<T> {
    pub fn new(
        get: impl Fn() -> T + Send + Sync + 'static,
        set: impl Fn(T) + Send + Sync + 'static,
    ) -> Self {
        Self {
            get: Arc::new(get),
            set: Arc::new(set),
        }
    }

    /// Current value of the slot
    pub fn get(&self) -> T {
        (self.get)()
    }

    /// Overwrite the slot
    pub fn set(&self, value: T) {
        (self.set)(value)
    }
}

impl<T: Clone + Send + 'static> Binding<T> {
    /// A standalone slot together with the store backing it, so the caller
    /// can subscribe to everything written through the binding.
    pub fn with_store(value: T) -> (Binding<T>, Store<T>) {
        let store = Store::new(value);
        let binding = store.binding(T::clone, |slot, value| *slot = value);
        (binding, store)
    }
}
