//! One-shot, resettable timer on top of `tokio::time`.
//!
//! A [`Timer`] fires its callback once per arming. Resetting a pending timer
//! replaces the pending fire; resetting a timer that already fired arms it
//! again. A fire that has started running its callback is never interrupted.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::AbortHandle;

/// Callback invoked on every fire.
pub(crate) type TimerCallback = Arc<dyn Fn() -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

#[derive(Default)]
struct Armed {
    /// Bumped on every reset/stop so a superseded sleeper never fires.
    generation: u64,
    /// The sleeper for the current generation, until it fires.
    pending: Option<AbortHandle>,
}

struct TimerInner {
    callback: TimerCallback,
    armed: Mutex<Armed>,
}

pub(crate) struct Timer {
    inner: Arc<TimerInner>,
}

impl Timer {
    /// Creates a timer that fires `callback` after `delay`.
    ///
    /// Must be called from within a Tokio runtime.
    pub(crate) fn after(delay: Duration, callback: TimerCallback) -> Self {
        let timer = Timer {
            inner: Arc::new(TimerInner {
                callback,
                armed: Mutex::new(Armed::default()),
            }),
        };
        timer.reset(delay);
        timer
    }

    /// Arms the timer to fire after `delay`.
    ///
    /// Returns `true` if a pending fire was replaced.
    pub(crate) fn reset(&self, delay: Duration) -> bool {
        let mut armed = self.inner.armed.lock().unwrap_or_else(PoisonError::into_inner);
        let replaced = Self::disarm(&mut armed);
        let generation = armed.generation;

        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let mut armed = inner.armed.lock().unwrap_or_else(PoisonError::into_inner);
                if armed.generation != generation {
                    return;
                }
                armed.pending = None;
            }
            (inner.callback)().await;
        });
        armed.pending = Some(handle.abort_handle());

        replaced
    }

    /// Cancels a pending fire.
    ///
    /// Returns `true` if the timer was pending.
    pub(crate) fn stop(&self) -> bool {
        let mut armed = self.inner.armed.lock().unwrap_or_else(PoisonError::into_inner);
        Self::disarm(&mut armed)
    }

    fn disarm(armed: &mut Armed) -> bool {
        armed.generation = armed.generation.wrapping_add(1);
        match armed.pending.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.stop();
    }
}
