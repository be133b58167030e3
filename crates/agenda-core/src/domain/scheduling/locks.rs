//! Per-practitioner booking locks
//!
//! The conflict check and the subsequent insert must be atomic with
//! respect to other bookings for the same practitioner, otherwise two
//! concurrent requests can both pass the check and both commit. An
//! exclusive async lock per practitioner, held across check-then-write,
//! serializes them. Bookings for different practitioners stay concurrent.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// Table of per-practitioner exclusive locks
#[derive(Debug, Default)]
pub struct PractitionerLocks {
    locks: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl PractitionerLocks {
    /// Create an empty lock table
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the exclusive lock for one practitioner.
    ///
    /// The returned guard must stay alive until the booking write has
    /// completed.
    pub async fn acquire(&self, practitioner_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            Arc::clone(locks.entry(practitioner_id).or_default())
        };
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_same_practitioner_is_serialized() {
        let locks = Arc::new(PractitionerLocks::new());
        let practitioner = Uuid::new_v4();
        let in_section = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let locks = Arc::clone(&locks);
            let in_section = Arc::clone(&in_section);
            handles.push(tokio::spawn(async move {
                let _guard = locks.acquire(practitioner).await;
                let nested = in_section.fetch_add(1, Ordering::SeqCst);
                assert_eq!(nested, 0, "lock must be exclusive");
                tokio::task::yield_now().await;
                in_section.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_different_practitioners_do_not_block() {
        let locks = PractitionerLocks::new();
        let _a = locks.acquire(Uuid::new_v4()).await;
        // A second practitioner's lock is acquirable while the first is held
        let _b = locks.acquire(Uuid::new_v4()).await;
    }
}
