//! Instance-scoped bounded caches shared by the prompt engine and the agent
//! response cache.
//!
//! Entries are evicted least-recently-used once `max_entries` is reached and
//! expire after `ttl_secs` when a time-to-live is configured. Callers pass the
//! current time explicitly so cache owners can drive expiry from an injected
//! [`mockable::Clock`].

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;

/// Eviction policy applied to a [`BoundedCache`].
///
/// # Examples
///
/// ```
/// use atelier::cache::CachePolicy;
///
/// let policy = CachePolicy::unbounded().with_max_entries(2).with_ttl_secs(60);
/// assert_eq!(policy.max_entries, Some(2));
/// assert_eq!(policy.ttl_secs, Some(60));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CachePolicy {
    /// Maximum number of entries kept; `None` means unbounded.
    pub max_entries: Option<usize>,
    /// Entry time-to-live in seconds; `None` means entries never expire.
    pub ttl_secs: Option<u64>,
}

impl CachePolicy {
    /// Creates a policy with neither a size limit nor expiry.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            max_entries: None,
            ttl_secs: None,
        }
    }

    /// Sets the maximum number of entries.
    #[must_use]
    pub const fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = Some(max_entries);
        self
    }

    /// Sets the entry time-to-live in seconds.
    #[must_use]
    pub const fn with_ttl_secs(mut self, ttl_secs: u64) -> Self {
        self.ttl_secs = Some(ttl_secs);
        self
    }

    fn ttl(&self) -> Option<TimeDelta> {
        self.ttl_secs.map(|secs| {
            i64::try_from(secs)
                .ok()
                .and_then(TimeDelta::try_seconds)
                .unwrap_or(TimeDelta::MAX)
        })
    }
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: DateTime<Utc>,
    last_access: DateTime<Utc>,
}

/// Key/value cache bounded by a [`CachePolicy`].
#[derive(Debug, Clone)]
pub struct BoundedCache<K, V> {
    policy: CachePolicy,
    entries: HashMap<K, CacheEntry<V>>,
}

impl<K, V> BoundedCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates an empty cache governed by `policy`.
    #[must_use]
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            policy,
            entries: HashMap::new(),
        }
    }

    /// Returns the eviction policy.
    #[must_use]
    pub const fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    /// Returns the number of stored entries, including any not yet purged
    /// after expiry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no entries are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns a clone of the live value for `key`, refreshing its recency.
    ///
    /// Expired entries are removed and reported as absent.
    pub fn get(&mut self, key: &K, now: DateTime<Utc>) -> Option<V> {
        if self.is_expired(key, now) {
            self.entries.remove(key);
            return None;
        }
        let entry = self.entries.get_mut(key)?;
        entry.last_access = now;
        Some(entry.value.clone())
    }

    /// Inserts or replaces `key`, evicting expired and then least-recently
    /// used entries when the cache is full.
    pub fn insert(&mut self, key: K, value: V, now: DateTime<Utc>) {
        if !self.entries.contains_key(&key) {
            self.make_room(now);
        }
        self.entries.insert(
            key,
            CacheEntry {
                value,
                inserted_at: now,
                last_access: now,
            },
        );
    }

    /// Applies `update` to the live value for `key`, inserting `init()` first
    /// when the key is absent or expired.
    pub fn upsert(
        &mut self,
        key: K,
        now: DateTime<Utc>,
        init: impl FnOnce() -> V,
        update: impl FnOnce(&mut V),
    ) {
        if self.is_expired(&key, now) {
            self.entries.remove(&key);
        }
        if !self.entries.contains_key(&key) {
            self.make_room(now);
        }
        let entry = self.entries.entry(key).or_insert_with(|| CacheEntry {
            value: init(),
            inserted_at: now,
            last_access: now,
        });
        entry.last_access = now;
        update(&mut entry.value);
    }

    /// Returns clones of every live entry for which `predicate` holds.
    pub fn collect_live(
        &self,
        now: DateTime<Utc>,
        mut predicate: impl FnMut(&K) -> bool,
    ) -> Vec<(K, V)> {
        let ttl = self.policy.ttl();
        self.entries
            .iter()
            .filter(|(_, entry)| !entry_expired(entry, ttl, now))
            .filter(|(key, _)| predicate(key))
            .map(|(key, entry)| (key.clone(), entry.value.clone()))
            .collect()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Removes entries whose key fails `keep`, returning how many were removed.
    pub fn retain_keys(&mut self, mut keep: impl FnMut(&K) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| keep(key));
        before.saturating_sub(self.entries.len())
    }

    fn is_expired(&self, key: &K, now: DateTime<Utc>) -> bool {
        let ttl = self.policy.ttl();
        self.entries
            .get(key)
            .is_some_and(|entry| entry_expired(entry, ttl, now))
    }

    fn make_room(&mut self, now: DateTime<Utc>) {
        let Some(max_entries) = self.policy.max_entries else {
            return;
        };
        let ttl = self.policy.ttl();
        if ttl.is_some() {
            self.entries
                .retain(|_, entry| !entry_expired(entry, ttl, now));
        }
        while !self.entries.is_empty() && self.entries.len() >= max_entries {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_access)
                .map(|(key, _)| key.clone());
            match oldest {
                Some(key) => {
                    self.entries.remove(&key);
                }
                None => break,
            }
        }
    }
}

impl<K, V> BoundedCache<K, V>
where
    K: Eq + Hash + Clone + AsRef<str>,
    V: Clone,
{
    /// Removes entries whose key contains `pattern`, returning how many were
    /// removed.
    pub fn invalidate_matching(&mut self, pattern: &str) -> usize {
        self.retain_keys(|key| !key.as_ref().contains(pattern))
    }
}

fn entry_expired<V>(entry: &CacheEntry<V>, ttl: Option<TimeDelta>, now: DateTime<Utc>) -> bool {
    ttl.is_some_and(|limit| now.signed_duration_since(entry.inserted_at) >= limit)
}

#[cfg(test)]
mod tests {
    use super::{BoundedCache, CachePolicy};
    use chrono::{TimeDelta, Utc};

    #[test]
    fn evicts_least_recently_used_entry_when_full() {
        let start = Utc::now();
        let mut cache = BoundedCache::new(CachePolicy::unbounded().with_max_entries(2));
        cache.insert("a".to_owned(), 1, start);
        cache.insert("b".to_owned(), 2, start + TimeDelta::seconds(1));
        assert_eq!(cache.get(&"a".to_owned(), start + TimeDelta::seconds(2)), Some(1));

        cache.insert("c".to_owned(), 3, start + TimeDelta::seconds(3));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&"b".to_owned(), start + TimeDelta::seconds(4)), None);
        assert_eq!(cache.get(&"a".to_owned(), start + TimeDelta::seconds(4)), Some(1));
    }

    #[test]
    fn expired_entries_are_reported_absent() {
        let start = Utc::now();
        let mut cache = BoundedCache::new(CachePolicy::unbounded().with_ttl_secs(10));
        cache.insert("k".to_owned(), "v", start);

        assert_eq!(cache.get(&"k".to_owned(), start + TimeDelta::seconds(9)), Some("v"));
        assert_eq!(cache.get(&"k".to_owned(), start + TimeDelta::seconds(10)), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn upsert_initialises_then_updates() {
        let now = Utc::now();
        let mut cache = BoundedCache::new(CachePolicy::unbounded());
        cache.upsert("k".to_owned(), now, || 0, |value| *value += 1);
        cache.upsert("k".to_owned(), now, || 0, |value| *value += 1);

        assert_eq!(cache.get(&"k".to_owned(), now), Some(2));
    }

    #[test]
    fn invalidate_matching_removes_substring_hits_only() {
        let now = Utc::now();
        let mut cache = BoundedCache::new(CachePolicy::unbounded());
        cache.insert("writer:blog:default".to_owned(), 1, now);
        cache.insert("writer:email:default".to_owned(), 2, now);
        cache.insert("reviewer:blog:default".to_owned(), 3, now);

        let removed = cache.invalidate_matching("writer:");

        assert_eq!(removed, 2);
        assert_eq!(cache.len(), 1);
    }
}
