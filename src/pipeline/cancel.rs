//! Broadcast, one-shot cancellation for one pipeline run.
//!
//! The signal is a channel nobody ever sends on. [`CancelSource`] holds its only sender; raising
//! drops it, which disconnects every [`CancelToken`] receiver at once. A token can be polled with
//! [`CancelToken::is_raised`] or used as a `recv` arm in `crossbeam_channel::select!`, where a
//! raised signal is always ready.

use crossbeam_channel::{Receiver, Sender, TryRecvError, bounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Owner of the signal. Dropping it raises the signal, so a run that returns for any reason
/// releases every thread still waiting on a token.
pub struct CancelSource {
    trigger: Option<Sender<()>>,
    token: CancelToken,
}

/// Observer side of the signal. Cheap to clone; one per thread.
#[derive(Clone, Debug)]
pub struct CancelToken {
    done: Receiver<()>,
}

impl CancelSource {
    pub fn new() -> Self {
        let (tx, rx) = bounded::<()>(0);
        Self {
            trigger: Some(tx),
            token: CancelToken { done: rx },
        }
    }

    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    /// Raise the signal. Idempotent; once raised it stays raised.
    pub fn raise(&mut self) {
        self.trigger.take();
    }

    pub fn is_raised(&self) -> bool {
        self.trigger.is_none()
    }
}

impl Default for CancelSource {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CancelSource {
    fn drop(&mut self) {
        self.raise();
    }
}

impl CancelToken {
    /// Receiver for `select!`. Ready (with `Err`) once the signal is raised.
    pub fn done(&self) -> &Receiver<()> {
        &self.done
    }

    pub fn is_raised(&self) -> bool {
        matches!(self.done.try_recv(), Err(TryRecvError::Disconnected))
    }
}

/// True once the caller's interrupt flag (Ctrl+C in the CLI) has been set.
pub fn interrupt_set(flag: &Option<Arc<AtomicBool>>) -> bool {
    flag.as_ref().is_some_and(|f| f.load(Ordering::Relaxed))
}
