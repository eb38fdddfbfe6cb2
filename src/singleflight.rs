//! Single-flight Module
//!
//! Collapses concurrent identical requests into one execution.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::debug;

use crate::error::{CacheError, Result};

/// Result slot of one in-flight call, None until the call completes.
type Outcome<T> = Option<Result<T>>;

type Calls<T> = Arc<Mutex<HashMap<String, watch::Receiver<Outcome<T>>>>>;

// == Single Flight ==
/// At most one in-flight computation per key.
///
/// Callers arriving while a key's computation is running wait for it and
/// receive a clone of its result. The record is dropped as soon as the
/// computation finishes, so this only deduplicates concurrent work: the next
/// call for the same key runs `compute` again.
///
/// The computation runs on its own task. A caller that stops waiting does
/// not cancel it; the remaining waiters still get the result.
pub struct SingleFlight<T> {
    calls: Calls<T>,
}

impl<T> Default for SingleFlight<T> {
    fn default() -> Self {
        Self {
            calls: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<T> SingleFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    // == Work ==
    /// Runs `compute` for `key` unless a call for `key` is already running,
    /// in which case waits for that call instead.
    ///
    /// `compute` is only invoked by the caller that starts the call. Must be
    /// called from within a tokio runtime.
    pub async fn work<F, Fut>(&self, key: &str, compute: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let (mut rx, leader) = {
            let mut calls = lock(&self.calls);
            let existing = calls.get(key).cloned();
            match existing {
                Some(rx) => {
                    debug!(key, "joining in-flight call");
                    (rx, None)
                }
                None => {
                    let (tx, rx) = watch::channel(None);
                    calls.insert(key.to_string(), rx.clone());
                    (rx, Some(tx))
                }
            }
        };

        // Map lock is released here; compute never runs under it
        if let Some(tx) = leader {
            let done = CallGuard {
                calls: Arc::clone(&self.calls),
                key: key.to_string(),
            };
            let fut = compute();
            tokio::spawn(async move {
                let result = fut.await;
                // Forget the key before publishing, so anyone who has
                // seen the result also sees the key free again.
                drop(done);
                tx.send_replace(Some(result));
            });
        }

        let outcome = rx
            .wait_for(Option::is_some)
            .await
            .map(|outcome| (*outcome).clone());

        match outcome {
            Ok(Some(result)) => result,
            _ => Err(CacheError::Internal(format!(
                "in-flight call for key {} was aborted",
                key
            ))),
        }
    }

    /// Returns the number of keys with a call in flight.
    pub fn in_flight(&self) -> usize {
        lock(&self.calls).len()
    }
}

/// Removes the call record when the computation ends, including by panic.
struct CallGuard<T> {
    calls: Calls<T>,
    key: String,
}

impl<T> Drop for CallGuard<T> {
    fn drop(&mut self) {
        lock(&self.calls).remove(&self.key);
    }
}

fn lock<T>(calls: &Calls<T>) -> MutexGuard<'_, HashMap<String, watch::Receiver<Outcome<T>>>> {
    calls.lock().unwrap_or_else(PoisonError::into_inner)
}
