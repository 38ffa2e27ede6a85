//! Background expiry reaper.
//!
//! Lazy expiry in GET/TYPE only removes keys that are read again; a key
//! that expires and is never touched would stay in memory forever. The
//! reaper closes that gap: once per second it takes the write lock,
//! deletes every expired entry and releases the lock until the next
//! tick.

use std::{sync::Arc, time::Duration};

use tokio::task::JoinHandle;
use tracing::debug;

use crate::keyspace::KeyValueStore;

const SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Spawns the reaper task. It runs for the lifetime of the process.
pub fn start_expiry_reaper(store: Arc<KeyValueStore>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let removed = store.remove_expired().await;

            if removed > 0 {
                debug!(removed, "expiry sweep evicted keys");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use jiff::{SignedDuration, Timestamp};

    use super::start_expiry_reaper;
    use crate::keyspace::KeyValueStore;

    #[tokio::test]
    async fn test_reaper_evicts_expired_keys() {
        let store = Arc::new(KeyValueStore::new());

        let expired = Timestamp::now() - SignedDuration::from_millis(10);
        store
            .set_string(b"dead".to_vec(), b"v".to_vec(), Some(expired))
            .await;
        store.set_string(b"live".to_vec(), b"v".to_vec(), None).await;

        let reaper = start_expiry_reaper(Arc::clone(&store));

        // wait out the first sweep
        tokio::time::sleep(Duration::from_millis(1300)).await;

        assert_eq!(store.len().await, 1);
        assert_eq!(store.list_keys().await, vec![b"live".to_vec()]);

        reaper.abort();
    }
}
