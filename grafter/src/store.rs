//! Observable state container.
//!
//! A [`Store`] owns the current state snapshot. Publishing replaces the
//! snapshot under a lock and queues it for delivery; a single dedicated
//! thread (`grafter-notify`) then notifies every live subscriber and the
//! [`Notification`] channel, one snapshot at a time in publish order. A
//! subscriber therefore never sees an older snapshot after a newer one.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError, Weak};
use std::thread::{self, ThreadId};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::watch;
use tracing::{debug, trace, warn};

use crate::error::StoreError;

/// Name of the notification fired after every delivered publish.
pub const STATE_CHANGED: &str = "grafter.state.changed";

const DELIVERY_THREAD_NAME: &str = "grafter-notify";

/// Locks `mutex`, recovering the data if a previous holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Identifies one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// The parameterless change notification presentation code listens for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub name: Cow<'static, str>,
    /// Version of the snapshot that was just delivered.
    pub version: u64,
}

struct Subscriber<S> {
    id: SubscriptionId,
    owner: Weak<dyn Any + Send + Sync>,
    active: Arc<AtomicBool>,
    notify: Arc<dyn Fn(&S) + Send + Sync>,
}

impl<S> Subscriber<S> {
    fn is_live(&self) -> bool {
        self.active.load(Ordering::SeqCst) && self.owner.strong_count() > 0
    }
}

/// State shared with the delivery thread.
struct Delivery<S> {
    subscribers: Mutex<Vec<Subscriber<S>>>,
    delivered: Mutex<u64>,
    delivered_cv: Condvar,
    changes: watch::Sender<Notification>,
    name: Cow<'static, str>,
}

impl<S> Delivery<S> {
    fn run(&self, mut queue: UnboundedReceiver<(u64, Arc<S>)>) {
        while let Some((version, state)) = queue.blocking_recv() {
            let targets: Vec<_> = {
                let mut subscribers = lock(&self.subscribers);
                subscribers.retain(Subscriber::is_live);
                subscribers
                    .iter()
                    .map(|s| (s.id, Arc::clone(&s.active), Arc::clone(&s.notify)))
                    .collect()
            };
            trace!(version, subscribers = targets.len(), "delivering state");

            for (id, active, notify) in targets {
                if !active.load(Ordering::SeqCst) {
                    continue;
                }
                if catch_unwind(AssertUnwindSafe(|| notify(&state))).is_err() {
                    warn!(?id, version, "subscriber panicked during notification");
                }
            }

            self.changes.send_replace(Notification {
                name: self.name.clone(),
                version,
            });
            *lock(&self.delivered) = version;
            self.delivered_cv.notify_all();
        }
        debug!("store dropped; notification thread exiting");
    }
}

struct Current<S> {
    state: Arc<S>,
    version: u64,
    queue: UnboundedSender<(u64, Arc<S>)>,
}

struct Inner<S> {
    current: Mutex<Current<S>>,
    delivery: Arc<Delivery<S>>,
    next_id: AtomicU64,
    delivery_thread: ThreadId,
}

/// A subscribable holder of immutable state snapshots.
///
/// Cloning is cheap; clones share the same state. The delivery thread exits
/// once every clone is dropped. A subscriber callback that needs the store
/// should capture a [`WeakStore`] from [`downgrade`](Self::downgrade): a
/// captured `Store` is owned by the subscription and keeps the thread alive
/// until it is unsubscribed.
///
/// ## Examples
///
/// ```
/// use std::sync::{Arc, Mutex};
/// use grafter::Store;
///
/// let store = Store::new(0u32).unwrap();
/// let view = Arc::new(Mutex::new(Vec::new()));
///
/// store.subscribe(&view, |view, count| view.lock().unwrap().push(*count));
/// store.publish(1);
/// store.update(|count| count + 1);
/// store.flush();
///
/// assert_eq!(*view.lock().unwrap(), vec![1, 2]);
/// assert_eq!(*store.state(), 2);
/// assert_eq!(store.version(), 2);
/// ```
pub struct Store<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// A non-owning handle to a [`Store`].
pub struct WeakStore<S> {
    inner: Weak<Inner<S>>,
}

impl<S> Clone for WeakStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<S> fmt::Debug for WeakStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakStore")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

impl<S> WeakStore<S> {
    /// Returns the store if any clone of it is still alive.
    pub fn upgrade(&self) -> Option<Store<S>> {
        self.inner.upgrade().map(|inner| Store { inner })
    }
}

impl<S: fmt::Debug> fmt::Debug for Store<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let current = lock(&self.inner.current);
        f.debug_struct("Store")
            .field("state", &current.state)
            .field("version", &current.version)
            .field("notification", &self.inner.delivery.name)
            .finish()
    }
}

impl<S: Send + Sync + 'static> Store<S> {
    /// Creates a store notifying under [`STATE_CHANGED`].
    ///
    /// ## Errors
    ///
    /// Returns [`StoreError::Spawn`] if the delivery thread cannot start.
    pub fn new(initial: S) -> Result<Self, StoreError> {
        Self::with_notification(initial, STATE_CHANGED)
    }

    /// Creates a store notifying under a custom notification name.
    ///
    /// ## Errors
    ///
    /// Returns [`StoreError::Spawn`] if the delivery thread cannot start.
    pub fn with_notification(initial: S, name: impl Into<Cow<'static, str>>) -> Result<Self, StoreError> {
        let name = name.into();
        let (changes, _) = watch::channel(Notification {
            name: name.clone(),
            version: 0,
        });
        let delivery = Arc::new(Delivery {
            subscribers: Mutex::new(Vec::new()),
            delivered: Mutex::new(0),
            delivered_cv: Condvar::new(),
            changes,
            name,
        });

        let (queue, receiver) = mpsc::unbounded_channel();
        let worker = Arc::clone(&delivery);
        let handle = thread::Builder::new()
            .name(DELIVERY_THREAD_NAME.to_string())
            .spawn(move || worker.run(receiver))
            .map_err(StoreError::Spawn)?;

        Ok(Self {
            inner: Arc::new(Inner {
                current: Mutex::new(Current {
                    state: Arc::new(initial),
                    version: 0,
                    queue,
                }),
                delivery,
                next_id: AtomicU64::new(1),
                delivery_thread: handle.thread().id(),
            }),
        })
    }

    /// Returns a handle that does not keep the store alive.
    pub fn downgrade(&self) -> WeakStore<S> {
        WeakStore {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Returns the current snapshot.
    pub fn state(&self) -> Arc<S> {
        Arc::clone(&lock(&self.inner.current).state)
    }

    /// Returns the number of publishes so far.
    pub fn version(&self) -> u64 {
        lock(&self.inner.current).version
    }

    /// Replaces the state. Returns the new version.
    pub fn publish(&self, state: S) -> u64 {
        self.update(move |_| state)
    }

    /// Replaces the state with `transition(current)` atomically: concurrent
    /// updates are applied one after another, each seeing the result of the
    /// previous one. Returns the new version.
    ///
    /// `transition` runs under the store lock and must not call back into
    /// this store.
    pub fn update(&self, transition: impl FnOnce(&S) -> S) -> u64 {
        let mut current = lock(&self.inner.current);
        let next = Arc::new(transition(&current.state));
        current.version += 1;
        current.state = Arc::clone(&next);
        let version = current.version;
        if current.queue.send((version, next)).is_err() {
            warn!(version, "notification thread stopped; change will not be delivered");
        }
        version
    }

    /// Registers `callback`, held only as long as `owner` is alive.
    ///
    /// The callback runs on the delivery thread with the owner and each new
    /// snapshot. Once the last strong reference to `owner` is dropped the
    /// subscription is removed without an explicit
    /// [`unsubscribe`](Self::unsubscribe).
    pub fn subscribe<O, F>(&self, owner: &Arc<O>, callback: F) -> SubscriptionId
    where
        O: Send + Sync + 'static,
        F: Fn(&O, &S) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let weak = Arc::downgrade(owner);
        let key: Weak<dyn Any + Send + Sync> = weak.clone();
        let notify = move |state: &S| {
            if let Some(owner) = weak.upgrade() {
                callback(&owner, state);
            }
        };

        let mut subscribers = lock(&self.inner.delivery.subscribers);
        subscribers.retain(Subscriber::is_live);
        subscribers.push(Subscriber {
            id,
            owner: key,
            active: Arc::new(AtomicBool::new(true)),
            notify: Arc::new(notify),
        });
        debug!(?id, "subscribed");
        id
    }

    /// Removes every subscription registered for `owner`. Returns how many
    /// were removed.
    pub fn unsubscribe<O: Send + Sync + 'static>(&self, owner: &Arc<O>) -> usize {
        self.remove_where(|s| std::ptr::addr_eq(s.owner.as_ptr(), Arc::as_ptr(owner)))
    }

    /// Removes one subscription. Returns `false` if it was already gone.
    pub fn unsubscribe_id(&self, id: SubscriptionId) -> bool {
        self.remove_where(|s| s.id == id) > 0
    }

    fn remove_where(&self, matches: impl Fn(&Subscriber<S>) -> bool) -> usize {
        let mut subscribers = lock(&self.inner.delivery.subscribers);
        let before = subscribers.len();
        subscribers.retain(|s| {
            if matches(s) {
                s.active.store(false, Ordering::SeqCst);
                false
            } else {
                true
            }
        });
        before - subscribers.len()
    }

    /// Returns the number of subscriptions whose owner is still alive.
    pub fn subscriber_count(&self) -> usize {
        lock(&self.inner.delivery.subscribers)
            .iter()
            .filter(|s| s.is_live())
            .count()
    }

    /// Blocks until every snapshot published so far has been delivered.
    ///
    /// Returns immediately when called from a subscriber callback.
    pub fn flush(&self) {
        if thread::current().id() == self.inner.delivery_thread {
            return;
        }
        let target = self.version();
        let delivery = &self.inner.delivery;
        let mut delivered = lock(&delivery.delivered);
        while *delivered < target {
            delivered = delivery
                .delivered_cv
                .wait(delivered)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Returns a receiver for the change notification.
    pub fn changes(&self) -> watch::Receiver<Notification> {
        self.inner.delivery.changes.subscribe()
    }

    /// Returns the notification name.
    pub fn notification_name(&self) -> &str {
        &self.inner.delivery.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<u32>>,
        threads: Mutex<Vec<Option<String>>>,
    }

    fn record(recorder: &Recorder, state: &u32) {
        recorder.seen.lock().unwrap().push(*state);
        recorder
            .threads
            .lock()
            .unwrap()
            .push(thread::current().name().map(str::to_string));
    }

    #[test]
    fn test_publish_notifies_subscribers_on_delivery_thread() {
        let store = Store::new(0u32).unwrap();
        let recorder = Arc::new(Recorder::default());
        store.subscribe(&recorder, record);

        assert_eq!(store.publish(5), 1);
        store.flush();

        assert_eq!(*recorder.seen.lock().unwrap(), vec![5]);
        assert_eq!(
            *recorder.threads.lock().unwrap(),
            vec![Some(DELIVERY_THREAD_NAME.to_string())]
        );
    }

    #[test]
    fn test_dropped_owner_is_not_notified() {
        let store = Store::new(0u32).unwrap();
        let recorder = Arc::new(Recorder::default());
        let seen = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&seen);
        store.subscribe(&recorder, move |_, _| *counter.lock().unwrap() += 1);
        assert_eq!(store.subscriber_count(), 1);

        drop(recorder);
        store.publish(1);
        store.flush();

        assert_eq!(*seen.lock().unwrap(), 0);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn test_unsubscribe_by_owner_and_id() {
        let store = Store::new(0u32).unwrap();
        let a = Arc::new(Recorder::default());
        let b = Arc::new(Recorder::default());
        store.subscribe(&a, record);
        store.subscribe(&a, record);
        let b_id = store.subscribe(&b, record);

        assert_eq!(store.unsubscribe(&a), 2);
        assert!(store.unsubscribe_id(b_id));
        assert!(!store.unsubscribe_id(b_id));

        store.publish(3);
        store.flush();
        assert!(a.seen.lock().unwrap().is_empty());
        assert!(b.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_concurrent_updates_are_serialized_and_ordered() {
        let store = Store::new(0u32).unwrap();
        let recorder = Arc::new(Recorder::default());
        store.subscribe(&recorder, record);

        let workers: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                thread::spawn(move || {
                    for _ in 0..50 {
                        store.update(|n| n + 1);
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }
        store.flush();

        let seen = recorder.seen.lock().unwrap();
        assert_eq!(*store.state(), 400);
        assert_eq!(seen.len(), 400);
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_changes_channel_reports_latest_version() {
        let store = Store::with_notification(0u32, "counter.changed").unwrap();
        let changes = store.changes();
        assert_eq!(changes.borrow().version, 0);

        store.publish(1);
        store.publish(2);
        store.flush();

        let latest = changes.borrow().clone();
        assert_eq!(
            latest,
            Notification {
                name: Cow::Borrowed("counter.changed"),
                version: 2
            }
        );
        assert_eq!(store.notification_name(), "counter.changed");
    }

    #[test]
    fn test_panicking_subscriber_does_not_stop_delivery() {
        let store = Store::new(0u32).unwrap();
        let bad = Arc::new(());
        let good = Arc::new(Recorder::default());
        store.subscribe(&bad, |_, _| panic!("subscriber failure"));
        store.subscribe(&good, record);

        store.publish(1);
        store.publish(2);
        store.flush();

        assert_eq!(*good.seen.lock().unwrap(), vec![1, 2]);
    }

    fn wait_for_shutdown(changes: &watch::Receiver<Notification>) -> bool {
        for _ in 0..200 {
            if changes.has_changed().is_err() {
                return true;
            }
            thread::sleep(std::time::Duration::from_millis(10));
        }
        false
    }

    #[test]
    fn test_weak_store_in_callback_lets_delivery_thread_exit() {
        let store = Store::new(0u32).unwrap();
        let changes = store.changes();
        let owner = Arc::new(Recorder::default());
        let weak = store.downgrade();
        store.subscribe(&owner, move |recorder, state| {
            if let Some(store) = weak.upgrade() {
                recorder.seen.lock().unwrap().push(*state + store.version() as u32);
            }
        });

        store.publish(1);
        store.flush();
        assert_eq!(*owner.seen.lock().unwrap(), vec![2]);

        let weak = store.downgrade();
        drop(store);
        assert!(weak.upgrade().is_none());
        assert!(wait_for_shutdown(&changes));
    }

    #[test]
    fn test_unsubscribing_captured_store_lets_delivery_thread_exit() {
        let store = Store::new(0u32).unwrap();
        let changes = store.changes();
        let owner = Arc::new(());
        let captured = store.clone();
        store.subscribe(&owner, move |_, _| {
            let _ = captured.version();
        });

        store.publish(1);
        store.flush();
        assert_eq!(store.unsubscribe(&owner), 1);
        drop(store);
        assert!(wait_for_shutdown(&changes));
    }

    #[test]
    fn test_flush_from_callback_returns() {
        let store = Store::new(0u32).unwrap();
        let owner = Arc::new(store.clone());
        let done = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&done);
        store.subscribe(&owner, move |store, _| {
            store.flush();
            flag.store(true, Ordering::SeqCst);
        });

        store.publish(1);
        store.flush();
        assert!(done.load(Ordering::SeqCst));
        store.unsubscribe(&owner);
    }
}
