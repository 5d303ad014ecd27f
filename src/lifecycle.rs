//! One-shot readiness: a timed setup transition and its waiter registry.
//!
//! An instrument moves from constructing to ready exactly once. Any number of
//! callers may subscribe at any time: subscriptions taken before the
//! transition are resolved together, in enqueue order, when it fires;
//! subscriptions taken afterwards resolve on the next scheduling opportunity
//! (never synchronously inline). Subscribing never re-triggers setup.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use tokio::sync::oneshot;

use crate::error::Error;

/// Payload every readiness waiter receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ready {
    /// Elapsed setup time, `setup_end - setup_start`. Identical for every
    /// waiter of a given instrument, however late it subscribed.
    pub setup_delay: Duration,
}

#[derive(Debug)]
struct Inner {
    setup_end: Option<Instant>,
    waiters: Vec<oneshot::Sender<Ready>>,
}

/// Write-once readiness state with FIFO waiters.
#[derive(Debug)]
pub struct Lifecycle {
    setup_start: Instant,
    inner: Mutex<Inner>,
}

impl Lifecycle {
    /// Records `setup_start`; the transition itself is driven by whoever
    /// owns the setup task.
    pub fn new() -> Self {
        Self {
            setup_start: Instant::now(),
            inner: Mutex::new(Inner {
                setup_end: None,
                waiters: Vec::new(),
            }),
        }
    }

    pub fn setup_start(&self) -> Instant {
        self.setup_start
    }

    pub fn is_ready(&self) -> bool {
        self.lock().setup_end.is_some()
    }

    /// Fire the transition: record `setup_end` and drain every pending
    /// waiter in enqueue order. Firing twice is an internal misuse error.
    pub fn complete(&self) -> Result<Ready, Error> {
        let mut inner = self.lock();
        if inner.setup_end.is_some() {
            return Err(Error::Lifecycle("setup can only run once"));
        }
        let setup_end = Instant::now();
        inner.setup_end = Some(setup_end);
        let ready = Ready {
            setup_delay: setup_end - self.setup_start,
        };
        let waiters = inner.waiters.len();
        for waiter in inner.waiters.drain(..) {
            // A dropped receiver just means the caller lost interest.
            let _ = waiter.send(ready);
        }
        drop(inner);
        tracing::debug!(
            waiters,
            setup_delay_us = ready.setup_delay.as_micros() as u64,
            "readiness transition fired"
        );
        Ok(ready)
    }

    /// Register interest. Registration happens synchronously, before any
    /// suspension point, so waiters fire in the order their calls were made.
    pub fn subscribe(&self) -> Subscription {
        let mut inner = self.lock();
        match inner.setup_end {
            Some(setup_end) => Subscription::Resolved(Ready {
                setup_delay: setup_end - self.setup_start,
            }),
            None => {
                let (tx, rx) = oneshot::channel();
                inner.waiters.push(tx);
                Subscription::Pending(rx)
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn waiter_count(&self) -> usize {
        self.lock().waiters.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

/// A registered readiness waiter.
#[derive(Debug)]
pub enum Subscription {
    /// The transition already fired; the payload is fixed.
    Resolved(Ready),
    /// Still constructing; the payload arrives when the transition fires.
    Pending(oneshot::Receiver<Ready>),
}

impl Subscription {
    /// Wait for readiness. An already-resolved subscription still yields to
    /// the scheduler once before resolving.
    pub async fn wait(self) -> Result<Ready, Error> {
        match self {
            Subscription::Resolved(ready) => {
                tokio::task::yield_now().await;
                Ok(ready)
            }
            Subscription::Pending(rx) => rx
                .await
                .map_err(|_| Error::Lifecycle("setup task dropped before completing")),
        }
    }
}
