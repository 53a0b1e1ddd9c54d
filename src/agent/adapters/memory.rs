//! In-memory response cache.

use crate::agent::{
    domain::Fingerprint,
    ports::{CachedResponse, ResponseCache, ResponseCacheError, ResponseCacheResult},
};
use crate::cache::{BoundedCache, CachePolicy};
use async_trait::async_trait;
use mockable::Clock;
use std::sync::{Arc, Mutex, MutexGuard};

/// Default entry lifetime for cached responses.
pub const DEFAULT_RESPONSE_TTL_SECS: u64 = 3600;

/// Response cache held in process memory with LRU and TTL eviction.
pub struct InMemoryResponseCache<C>
where
    C: Clock + Send + Sync,
{
    entries: Mutex<BoundedCache<Fingerprint, CachedResponse>>,
    clock: Arc<C>,
}

impl<C> InMemoryResponseCache<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a cache with a one hour TTL and no size limit.
    #[must_use]
    pub fn new(clock: Arc<C>) -> Self {
        Self::with_policy(
            CachePolicy::unbounded().with_ttl_secs(DEFAULT_RESPONSE_TTL_SECS),
            clock,
        )
    }

    /// Creates a cache with an explicit eviction policy.
    #[must_use]
    pub fn with_policy(policy: CachePolicy, clock: Arc<C>) -> Self {
        Self {
            entries: Mutex::new(BoundedCache::new(policy)),
            clock,
        }
    }

    /// Returns the number of stored entries, including expired ones not yet
    /// swept.
    ///
    /// # Errors
    ///
    /// Returns [`ResponseCacheError::Storage`] when the cache lock is
    /// poisoned.
    pub fn len(&self) -> ResponseCacheResult<usize> {
        Ok(self.lock()?.len())
    }

    /// Drops every entry.
    ///
    /// # Errors
    ///
    /// Returns [`ResponseCacheError::Storage`] when the cache lock is
    /// poisoned.
    pub fn clear(&self) -> ResponseCacheResult<()> {
        self.lock()?.clear();
        Ok(())
    }

    fn lock(&self) -> ResponseCacheResult<MutexGuard<'_, BoundedCache<Fingerprint, CachedResponse>>> {
        self.entries
            .lock()
            .map_err(|err| ResponseCacheError::storage(std::io::Error::other(err.to_string())))
    }
}

#[async_trait]
impl<C> ResponseCache for InMemoryResponseCache<C>
where
    C: Clock + Send + Sync,
{
    async fn lookup(&self, fingerprint: &Fingerprint) -> ResponseCacheResult<Option<CachedResponse>> {
        let now = self.clock.utc();
        Ok(self.lock()?.get(fingerprint, now))
    }

    async fn store(
        &self,
        fingerprint: Fingerprint,
        entry: CachedResponse,
    ) -> ResponseCacheResult<()> {
        let now = self.clock.utc();
        self.lock()?.insert(fingerprint, entry, now);
        Ok(())
    }
}
