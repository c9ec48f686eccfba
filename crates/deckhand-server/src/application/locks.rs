//! Per-conversation serialization
//!
//! Two turns on the same conversation id would otherwise interleave their
//! tool rounds and overwrite each other's collected data. Turns on
//! different ids never contend.

use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
pub struct ConversationLocks {
    inner: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl ConversationLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `fut` while holding the lock for `id`
    pub async fn serialize<T>(&self, id: Uuid, fut: impl Future<Output = T>) -> T {
        let mutex = self.inner.entry(id).or_default().clone();

        let output = {
            let _guard = mutex.lock().await;
            fut.await
        };

        drop(mutex);
        // Prune when no other turn holds or awaits this id
        self.inner.remove_if(&id, |_, m| Arc::strong_count(m) == 1);

        output
    }

    /// Number of ids currently tracked
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    async fn step(log: &StdMutex<Vec<&'static str>>, entry: &'static str) {
        log.lock().unwrap().push(entry);
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_id_runs_one_at_a_time() {
        let locks = ConversationLocks::new();
        let log = StdMutex::new(Vec::new());
        let id = Uuid::new_v4();

        let first = locks.serialize(id, async {
            step(&log, "first-start").await;
            tokio::time::sleep(Duration::from_millis(50)).await;
            step(&log, "first-end").await;
        });
        let second = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            locks.serialize(id, step(&log, "second")).await;
        };
        tokio::join!(first, second);

        assert_eq!(
            *log.lock().unwrap(),
            vec!["first-start", "first-end", "second"]
        );
        assert!(locks.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_different_ids_do_not_block() {
        let locks = ConversationLocks::new();
        let log = StdMutex::new(Vec::new());

        let first = locks.serialize(Uuid::new_v4(), async {
            step(&log, "first-start").await;
            tokio::time::sleep(Duration::from_millis(50)).await;
            step(&log, "first-end").await;
        });
        let second = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            locks.serialize(Uuid::new_v4(), step(&log, "second")).await;
        };
        tokio::join!(first, second);

        assert_eq!(
            *log.lock().unwrap(),
            vec!["first-start", "second", "first-end"]
        );
        assert_eq!(locks.len(), 0);
    }
}
