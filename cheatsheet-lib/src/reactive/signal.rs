use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock, Weak};

use log::trace;

/// Subscriber callback. Reads whatever it needs from the signals it captured.
pub(super) type Callback = Arc<dyn Fn() + Send + Sync>;

/// Identifies a subscription so it can be removed again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

struct Slot<T> {
    value: Option<Arc<T>>,
    /// Number of times the value has been set. Zero means no value yet.
    version: u64,
}

pub(super) struct Inner<T> {
    slot: RwLock<Slot<T>>,
    subscribers: RwLock<Vec<(SubscriptionId, Callback)>>,
    /// Inputs of a derived signal and the subscriptions it holds on them.
    /// Released when the last handle to this signal is dropped.
    upstream: Mutex<Vec<(Arc<dyn Source>, SubscriptionId)>>,
}

impl<T> Inner<T> {
    pub(super) fn snapshot(&self) -> (Option<Arc<T>>, u64) {
        let slot = self.slot.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        (slot.value.clone(), slot.version)
    }

    pub(super) fn attach(&self, source: Arc<dyn Source>, id: SubscriptionId) {
        self.upstream
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((source, id));
    }
}

impl<T> Drop for Inner<T> {
    fn drop(&mut self) {
        let upstream = self
            .upstream
            .get_mut()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        for (source, id) in upstream.drain(..) {
            source.remove_subscriber(id);
        }
    }
}

/// Type-erased view of a signal used to wire up derived values.
pub(super) trait Source: Send + Sync {
    fn version(&self) -> u64;
    fn add_subscriber(&self, callback: Callback) -> SubscriptionId;
    fn remove_subscriber(&self, id: SubscriptionId) -> bool;
}

impl<T: Send + Sync> Source for Inner<T> {
    fn version(&self) -> u64 {
        self.snapshot().1
    }

    fn add_subscriber(&self, callback: Callback) -> SubscriptionId {
        let id = SubscriptionId::new();
        self.subscribers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((id, callback));
        id
    }

    fn remove_subscriber(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self
            .subscribers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let before = subscribers.len();
        subscribers.retain(|(sub, _)| *sub != id);
        subscribers.len() != before
    }
}

/// Reactive state cell with interior mutability.
///
/// `Signal<T>` is a cheap-to-clone handle: clones share the same value and
/// subscriber list. Values are stored behind an `Arc` so readers never copy
/// them. Setting a value runs every subscriber synchronously on the calling
/// thread; no lock is held while subscribers run, so a subscriber may set
/// other signals.
///
/// # Example
///
/// ```
/// use cheatsheet_lib::reactive::Signal;
///
/// let page = Signal::new(1usize);
/// let label = page.map(|p| format!("Page {p}"));
///
/// page.set(2);
/// assert_eq!(label.get().as_deref().map(String::as_str), Some("Page 2"));
/// ```
pub struct Signal<T> {
    pub(super) inner: Arc<Inner<T>>,
}

impl<T: Send + Sync + 'static> Signal<T> {
    /// Creates a signal holding an initial value.
    pub fn new(value: T) -> Self {
        let signal = Self::empty();
        signal.set(value);
        signal
    }

    /// Creates a signal that has not produced a value yet.
    pub fn empty() -> Self {
        Self {
            inner: Arc::new(Inner {
                slot: RwLock::new(Slot {
                    value: None,
                    version: 0,
                }),
                subscribers: RwLock::new(Vec::new()),
                upstream: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Returns the current value, or `None` before the first value.
    pub fn get(&self) -> Option<Arc<T>> {
        self.inner.snapshot().0
    }

    /// Returns `true` once the signal has produced a value.
    pub fn has_value(&self) -> bool {
        self.version() > 0
    }

    /// Returns how many times the value has been set.
    pub fn version(&self) -> u64 {
        self.inner.snapshot().1
    }

    /// Sets a new value and notifies subscribers.
    pub fn set(&self, value: T) {
        self.replace(Arc::new(value));
    }

    /// Sets a new shared value and notifies subscribers.
    pub fn replace(&self, value: Arc<T>) {
        self.store(value);
        self.notify();
    }

    /// Stores a value without notifying subscribers.
    pub(super) fn store(&self, value: Arc<T>) {
        let mut slot = self
            .inner
            .slot
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        slot.value = Some(value);
        slot.version += 1;
    }

    /// Updates the value in place and notifies subscribers.
    ///
    /// Does nothing and returns `false` if the signal has no value yet.
    pub fn update<F>(&self, f: F) -> bool
    where
        T: Clone,
        F: FnOnce(&mut T),
    {
        {
            let mut slot = self
                .inner
                .slot
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            let Some(value) = slot.value.as_mut() else {
                return false;
            };
            f(Arc::make_mut(value));
            slot.version += 1;
        }
        self.notify();
        true
    }

    /// Registers a callback that receives every new value.
    ///
    /// If the signal already has a value the callback runs once immediately.
    pub fn subscribe<F>(&self, f: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let weak: Weak<Inner<T>> = Arc::downgrade(&self.inner);
        let callback: Callback = Arc::new(move || {
            let Some(inner) = weak.upgrade() else { return };
            if let (Some(value), _) = inner.snapshot() {
                f(value.as_ref());
            }
        });
        let id = self.inner.add_subscriber(callback.clone());
        callback();
        id
    }

    /// Removes a subscription. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.remove_subscriber(id)
    }

    /// Returns the number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .subscribers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Returns a handle that can observe but not set this signal.
    pub fn read_only(&self) -> ReadSignal<T> {
        ReadSignal {
            signal: self.clone(),
        }
    }

    pub(super) fn notify(&self) {
        let callbacks: Vec<Callback> = self
            .inner
            .subscribers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        trace!("Notifying {} subscribers", callbacks.len());
        for callback in callbacks {
            callback();
        }
    }
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (value, version) = self.inner.snapshot();
        f.debug_struct("Signal")
            .field("has_value", &value.is_some())
            .field("version", &version)
            .finish()
    }
}

/// Read-only handle to a [`Signal`], handed to the presentation layer.
#[derive(Debug)]
pub struct ReadSignal<T> {
    signal: Signal<T>,
}

impl<T: Send + Sync + 'static> ReadSignal<T> {
    /// Returns the current value, or `None` before the first value.
    pub fn get(&self) -> Option<Arc<T>> {
        self.signal.get()
    }

    /// Returns `true` once the signal has produced a value.
    pub fn has_value(&self) -> bool {
        self.signal.has_value()
    }

    /// Returns how many times the value has been set.
    pub fn version(&self) -> u64 {
        self.signal.version()
    }

    /// Registers a callback that receives every new value.
    pub fn subscribe<F>(&self, f: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.signal.subscribe(f)
    }

    /// Removes a subscription.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.signal.unsubscribe(id)
    }
}

impl<T> Clone for ReadSignal<T> {
    fn clone(&self) -> Self {
        Self {
            signal: self.signal.clone(),
        }
    }
}
