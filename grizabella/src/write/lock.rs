//! Per-id striped locking: serializes concurrent writes to the same
//! object/relation id without a single global write mutex.

use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

const STRIPES: usize = 64;

#[derive(Debug)]
pub struct StripedLock {
    stripes: Vec<std::sync::Arc<Mutex<()>>>,
}

impl StripedLock {
    pub fn new() -> Self {
        Self {
            stripes: (0..STRIPES).map(|_| std::sync::Arc::new(Mutex::new(()))).collect(),
        }
    }

    fn stripe_for(&self, id: Uuid) -> &std::sync::Arc<Mutex<()>> {
        let bytes = id.as_bytes();
        let index = bytes.iter().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(*b as u64));
        &self.stripes[(index as usize) % self.stripes.len()]
    }

    pub async fn lock(&self, id: Uuid) -> OwnedMutexGuard<()> {
        self.stripe_for(id).clone().lock_owned().await
    }
}

impl Default for StripedLock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn same_id_serializes_through_same_stripe() {
        let lock = StripedLock::new();
        let id = Uuid::new_v4();
        let guard = lock.lock(id).await;
        drop(guard);
        let _guard2 = lock.lock(id).await;
    }

    #[tokio::test]
    async fn distinct_ids_can_lock_concurrently() {
        let lock = std::sync::Arc::new(StripedLock::new());
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let guard_a = lock.lock(a).await;
        let lock2 = lock.clone();
        let handle = tokio::spawn(async move {
            let _guard_b = lock2.lock(b).await;
        });
        handle.await.unwrap();
        drop(guard_a);
    }
}
