//! Per-key generation locks.
//!
//! Concurrent misses on one cache key serialize behind a single async mutex;
//! whoever acquires it after the leader finds the entry already cached.

use crate::cache::CacheKey;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

#[derive(Default)]
pub struct InFlight {
    locks: Mutex<HashMap<CacheKey, Arc<AsyncMutex<()>>>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other task holds `key`, then hold it until the guard drops.
    pub async fn acquire(&self, key: &CacheKey) -> InFlightGuard<'_> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            // Entries orphaned by cancelled waiters.
            locks.retain(|k, l| k == key || Arc::strong_count(l) > 1);
            locks.entry(key.clone()).or_default().clone()
        };
        let guard = lock.lock_owned().await;
        InFlightGuard {
            owner: self,
            key: key.clone(),
            guard: Some(guard),
        }
    }

    /// Keys that currently have a holder or a waiter.
    pub fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn release(&self, key: &CacheKey) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        if locks.get(key).is_some_and(|l| Arc::strong_count(l) == 1) {
            locks.remove(key);
        }
    }
}

pub struct InFlightGuard<'a> {
    owner: &'a InFlight,
    key: CacheKey,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        self.owner.release(&self.key);
    }
}
