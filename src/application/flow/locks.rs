//! Per-conversation turn serialization.
//!
//! Two concurrent requests for the same conversation would race on the
//! load-mutate-persist cycle. Each conversation gets its own async
//! mutex; turns for one conversation run strictly one after the other
//! while different conversations proceed in parallel.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::foundation::ConversationId;

/// Lazily-populated map of per-conversation mutexes.
#[derive(Default)]
pub struct ConversationLocks {
    locks: Mutex<HashMap<ConversationId, Arc<Mutex<()>>>>,
}

impl ConversationLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the lock for one conversation, creating it on first use.
    /// The guard is held for the whole turn.
    pub async fn acquire(&self, id: ConversationId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            // An entry only the map references has no holder and no
            // waiter; drop it so the map does not grow forever.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks
                .entry(id)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}
