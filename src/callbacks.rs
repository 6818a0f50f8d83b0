//! Callback correlation: pairs fire-and-forget commands with their replies.
//!
//! DESIGN
//! ======
//! Each command that expects a reply registers a one-shot continuation and
//! sends the returned token along with it. The renderer later hands back the
//! token and a result string. The continuation is removed under the lock and
//! run after the lock is released, so it may freely register new callbacks.
//!
//! A token is consumed at most once. Replies for unknown or already consumed
//! tokens are ignored.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;
use uuid::Uuid;

/// One-shot reply handler. `None` means the renderer returned nothing.
pub type Continuation = Box<dyn FnOnce(Option<String>) + Send + 'static>;

/// Pending continuations keyed by correlation token.
#[derive(Clone, Default)]
pub struct CallbackRegistry {
    pending: Arc<Mutex<HashMap<String, Continuation>>>,
}

impl CallbackRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `continuation` under a fresh token and return the token.
    pub fn register(&self, continuation: impl FnOnce(Option<String>) + Send + 'static) -> String {
        let token = Uuid::new_v4().to_string();
        self.lock().insert(token.clone(), Box::new(continuation));
        token
    }

    /// Run the continuation for `token` with `payload`.
    ///
    /// Returns `false` when the token is unknown.
    pub fn invoke(&self, token: &str, payload: Option<String>) -> bool {
        match self.take(token) {
            Some(continuation) => {
                continuation(payload);
                true
            }
            None => {
                debug!(%token, "callbacks: unknown token");
                false
            }
        }
    }

    /// Remove the continuation for `token` without running it.
    pub fn take(&self, token: &str) -> Option<Continuation> {
        self.lock().remove(token)
    }

    /// Drop the continuation for `token`. Returns whether one was pending.
    pub fn cancel(&self, token: &str) -> bool {
        self.lock().remove(token).is_some()
    }

    /// Number of continuations still waiting for a reply.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Continuation>> {
        // Continuations never run under the lock, so the map stays consistent.
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry").field("pending", &self.pending()).finish()
    }
}

#[cfg(test)]
#[path = "callbacks_test.rs"]
mod tests;
