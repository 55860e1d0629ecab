//! Per-key write locks

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};
use tokio::sync::{Mutex, OwnedMutexGuard};

type LockTable = HashMap<String, Arc<Mutex<()>>>;

/// One async mutex per storage key.
///
/// Writers to the same key queue up behind each other; writers to different
/// keys never block one another. A key's entry lives only while someone holds
/// or waits for its lock.
#[derive(Debug, Default)]
pub(crate) struct KeyLocks {
    locks: Arc<StdMutex<LockTable>>,
}

impl KeyLocks {
    /// Wait for exclusive write access to `key`
    pub(crate) async fn lock(&self, key: &str) -> KeyGuard {
        let lock = table(&self.locks).entry(key.to_string()).or_default().clone();

        KeyGuard {
            key: key.to_string(),
            locks: self.locks.clone(),
            guard: Some(lock.lock_owned().await),
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        table(&self.locks).len()
    }
}

/// Exclusive access to one key; dropping it releases the key
pub(crate) struct KeyGuard {
    key: String,
    locks: Arc<StdMutex<LockTable>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for KeyGuard {
    fn drop(&mut self) {
        // Release under the table lock so no new waiter can pick up the
        // entry between the count check and the removal
        let mut locks = table(&self.locks);
        self.guard.take();

        let idle = locks
            .get(&self.key)
            .is_some_and(|lock| Arc::strong_count(lock) == 1);
        if idle {
            locks.remove(&self.key);
        }
    }
}

fn table(locks: &StdMutex<LockTable>) -> MutexGuard<'_, LockTable> {
    locks.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_key_is_exclusive() {
        let locks = Arc::new(KeyLocks::default());
        let guard = locks.lock("a").await;

        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.lock("a").await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(guard);
        waiter.await.unwrap();
    }

    #[tokio::test]
    async fn test_different_keys_do_not_block() {
        let locks = KeyLocks::default();
        let _a = locks.lock("a").await;
        let b = tokio::time::timeout(Duration::from_millis(100), locks.lock("b")).await;
        assert!(b.is_ok());
    }

    #[tokio::test]
    async fn test_released_keys_are_evicted() {
        let locks = KeyLocks::default();
        for i in 0..1000 {
            let _guard = locks.lock(&format!("key-{i}")).await;
        }
        assert_eq!(locks.len(), 0);
    }

    #[tokio::test]
    async fn test_key_with_waiter_survives_release() {
        let locks = Arc::new(KeyLocks::default());
        let guard = locks.lock("busy").await;

        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.lock("busy").await;
                tokio::time::sleep(Duration::from_millis(20)).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        // The waiter still needs the entry
        drop(guard);
        assert_eq!(locks.len(), 1);

        waiter.await.unwrap();
        assert_eq!(locks.len(), 0);
    }
}
