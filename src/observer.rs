//! Diagnostic observers for resolution traceability.
//!
//! Observers see every resolution step, nested ones included, which makes
//! them the place to hang structured logging and counters. The container
//! calls them synchronously; keep implementations lightweight.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::DiError;
use crate::internal::RwLock;
use crate::key::Key;

/// Observer trait for resolution events.
///
/// # Examples
///
/// ```
/// use ferrous_ioc::{Container, DiObserver, Key};
/// use std::sync::{Arc, Mutex};
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct Recorder(Mutex<Vec<String>>);
///
/// impl DiObserver for Recorder {
///     fn resolving(&self, key: &Key) {
///         self.0.lock().unwrap().push(format!("resolving {}", key));
///     }
///
///     fn resolved(&self, key: &Key, _duration: Duration) {
///         self.0.lock().unwrap().push(format!("resolved {}", key));
///     }
/// }
///
/// let recorder = Arc::new(Recorder::default());
/// let container = Container::new();
/// container.add_observer(recorder.clone());
/// container.bind_factory("foo", |_, _| Ok("Bar"), false);
/// container.resolve("foo", &[]).unwrap();
///
/// assert_eq!(*recorder.0.lock().unwrap(), ["resolving foo", "resolved foo"]);
/// ```
pub trait DiObserver: Send + Sync {
    /// Called before an identifier is looked up.
    fn resolving(&self, key: &Key);

    /// Called when an identifier produced a value.
    fn resolved(&self, key: &Key, duration: Duration);

    /// Called when an identifier failed to resolve.
    fn failed(&self, key: &Key, error: &DiError) {
        let _ = (key, error);
    }
}

/// Copy-on-write observer list.
///
/// Resolution takes a snapshot (one `Arc` clone), so observers can be added
/// from inside a factory without deadlocking.
#[derive(Default)]
pub(crate) struct Observers {
    list: RwLock<Arc<Vec<Arc<dyn DiObserver>>>>,
}

impl Observers {
    pub(crate) fn add(&self, observer: Arc<dyn DiObserver>) {
        let mut list = self.list.write();
        let mut next = Vec::clone(&list);
        next.push(observer);
        *list = Arc::new(next);
    }

    pub(crate) fn snapshot(&self) -> ObserverSet {
        ObserverSet(self.list.read().clone())
    }

    pub(crate) fn len(&self) -> usize {
        self.list.read().len()
    }
}

/// Observers registered at the moment a resolution step started.
pub(crate) struct ObserverSet(Arc<Vec<Arc<dyn DiObserver>>>);

impl ObserverSet {
    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.0.is_empty()
    }

    pub(crate) fn resolving(&self, key: &Key) {
        for observer in self.0.iter() {
            observer.resolving(key);
        }
    }

    pub(crate) fn resolved(&self, key: &Key, duration: Duration) {
        for observer in self.0.iter() {
            observer.resolved(key, duration);
        }
    }

    pub(crate) fn failed(&self, key: &Key, error: &DiError) {
        for observer in self.0.iter() {
            observer.failed(key, error);
        }
    }
}

/// Observer that forwards events to `tracing`.
///
/// Successful steps are emitted at `TRACE`, failures at `DEBUG`, so a
/// subscriber with `ferrous_ioc=trace` shows the whole resolution tree.
pub struct TracingObserver {
    prefix: String,
}

impl TracingObserver {
    /// Creates a new tracing observer with the default prefix.
    pub fn new() -> Self {
        Self { prefix: "[ferrous-ioc]".to_string() }
    }

    /// Creates a new tracing observer with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl DiObserver for TracingObserver {
    fn resolving(&self, key: &Key) {
        tracing::trace!(prefix = %self.prefix, id = %key, "resolving");
    }

    fn resolved(&self, key: &Key, duration: Duration) {
        tracing::trace!(prefix = %self.prefix, id = %key, ?duration, "resolved");
    }

    fn failed(&self, key: &Key, error: &DiError) {
        tracing::debug!(prefix = %self.prefix, id = %key, %error, "resolution failed");
    }
}

/// Observer that counts resolutions and failures.
///
/// # Examples
///
/// ```
/// use ferrous_ioc::{Container, MetricsObserver};
/// use std::sync::Arc;
///
/// let metrics = Arc::new(MetricsObserver::new());
/// let container = Container::new();
/// container.add_observer(metrics.clone());
/// container.bind("foo", Some("bar"), false);
/// container.bind_factory("bar", |_, _| Ok(1u8), false);
///
/// container.resolve("foo", &[]).unwrap();
/// assert!(container.resolve("missing", &[]).is_err());
///
/// assert_eq!(metrics.resolution_count(), 2); // foo and bar
/// assert_eq!(metrics.failure_count(), 1);
/// ```
#[derive(Default)]
pub struct MetricsObserver {
    resolution_count: AtomicU64,
    failure_count: AtomicU64,
    total_resolution_nanos: AtomicU64,
}

impl MetricsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolution_count(&self) -> u64 {
        self.resolution_count.load(Ordering::Relaxed)
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    /// Mean time per successful resolution step.
    pub fn average_resolution_time(&self) -> Duration {
        let count = self.resolution_count();
        if count == 0 {
            return Duration::ZERO;
        }
        Duration::from_nanos(self.total_resolution_nanos.load(Ordering::Relaxed) / count)
    }
}

impl DiObserver for MetricsObserver {
    fn resolving(&self, _key: &Key) {}

    fn resolved(&self, _key: &Key, duration: Duration) {
        self.resolution_count.fetch_add(1, Ordering::Relaxed);
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        self.total_resolution_nanos.fetch_add(nanos, Ordering::Relaxed);
    }

    fn failed(&self, _key: &Key, _error: &DiError) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }
}
