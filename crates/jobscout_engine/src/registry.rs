//! Process-wide table of in-flight sessions.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use jobscout_core::SessionId;
use tokio_util::sync::CancellationToken;

/// Routes external stop requests to the owning session's token.
///
/// Single writer per key (the owning session), arbitrary concurrent
/// readers; a guarded map of cancellation tokens is all that is required.
/// Injected where needed rather than living in a module global.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<SessionId, CancellationToken>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a fresh session, returning its id and stop token.
    pub fn register(&self) -> (SessionId, CancellationToken) {
        let id = SessionId::generate();
        let token = CancellationToken::new();
        self.lock().insert(id.clone(), token.clone());
        (id, token)
    }

    /// Requests a cooperative stop. Idempotent. Returns `false` for ids
    /// that are unknown or already finished.
    pub fn request_stop(&self, id: &SessionId) -> bool {
        match self.lock().get(id) {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    pub fn remove(&self, id: &SessionId) {
        self.lock().remove(id);
    }

    pub fn contains(&self, id: &SessionId) -> bool {
        self.lock().contains_key(id)
    }

    pub fn active_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SessionId, CancellationToken>> {
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
