use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

/// One async mutex per job id. Batch evaluation and cascade delete for the same
/// job run one at a time; different jobs never wait on each other.
///
/// Also holds the single registration lock: job names are unique, and the
/// name check plus insert must not interleave with another registration.
#[derive(Clone, Default)]
pub struct JobLocks {
    inner: Arc<Mutex<HashMap<Uuid, Arc<AsyncMutex<()>>>>>,
    registration: Arc<AsyncMutex<()>>,
}

impl JobLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, job_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            // Entries only the map still references are idle: no holder, no waiter.
            map.retain(|_, lock| Arc::strong_count(lock) > 1);
            map.entry(job_id).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Serializes job registration across all names.
    pub async fn registration(&self) -> OwnedMutexGuard<()> {
        self.registration.clone().lock_owned().await
    }
}
