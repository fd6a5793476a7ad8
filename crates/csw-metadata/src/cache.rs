//! Domain value caching.
//!
//! Resolved option sets are cached per catalogue property name. Entries live
//! until invalidated or, when a TTL is configured, until they expire.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::field::SelectItem;

/// Shared, immutable option set for one property.
pub type DomainValues = Arc<BTreeSet<SelectItem>>;

#[async_trait]
pub trait DomainCache: Send + Sync {
    async fn get(&self, property: &str) -> Option<DomainValues>;

    async fn put(&self, property: &str, values: DomainValues);

    async fn invalidate(&self, property: &str);

    async fn clear(&self);
}

struct CachedDomain {
    values: DomainValues,
    stored_at: Instant,
}

/// Process-local cache. Without a TTL entries never expire.
pub struct InMemoryDomainCache {
    entries: RwLock<HashMap<String, CachedDomain>>,
    ttl: Option<Duration>,
}

impl InMemoryDomainCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: None,
        }
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        info!(ttl_secs = ttl.as_secs(), "Initializing domain cache");
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: Some(ttl),
        }
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for InMemoryDomainCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DomainCache for InMemoryDomainCache {
    async fn get(&self, property: &str) -> Option<DomainValues> {
        let guard = self.entries.read().await;
        let cached = guard.get(property)?;
        if let Some(ttl) = self.ttl {
            if cached.stored_at.elapsed() >= ttl {
                debug!(property = %property, "Domain cache entry expired");
                return None;
            }
        }
        Some(Arc::clone(&cached.values))
    }

    async fn put(&self, property: &str, values: DomainValues) {
        let mut guard = self.entries.write().await;
        debug!(property = %property, count = values.len(), "Domain values cached");
        guard.insert(
            property.to_string(),
            CachedDomain {
                values,
                stored_at: Instant::now(),
            },
        );
    }

    async fn invalidate(&self, property: &str) {
        self.entries.write().await.remove(property);
        debug!(property = %property, "Domain cache entry invalidated");
    }

    async fn clear(&self) {
        self.entries.write().await.clear();
        debug!("Domain cache cleared");
    }
}

/// Create a shared domain cache.
///
/// Environment variable: CSW_DOMAIN_CACHE_TTL_SECS (unset or 0: no expiry).
/// An explicit `ttl_secs` takes precedence over the environment.
pub fn create_domain_cache(ttl_secs: Option<u64>) -> Arc<InMemoryDomainCache> {
    let ttl_secs = ttl_secs.or_else(|| {
        std::env::var("CSW_DOMAIN_CACHE_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
    });

    match ttl_secs {
        Some(secs) if secs > 0 => Arc::new(InMemoryDomainCache::with_ttl(Duration::from_secs(secs))),
        _ => Arc::new(InMemoryDomainCache::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(items: &[&str]) -> DomainValues {
        Arc::new(items.iter().map(|v| SelectItem::new(*v)).collect())
    }

    #[tokio::test]
    async fn test_cache_hit() {
        let cache = InMemoryDomainCache::new();
        cache.put("Subject", values(&["water"])).await;

        let hit = cache.get("Subject").await.unwrap();
        assert!(hit.contains(&SelectItem::new("water")));
    }

    #[tokio::test]
    async fn test_cache_miss_when_empty() {
        let cache = InMemoryDomainCache::new();
        assert!(cache.get("Subject").await.is_none());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_invalidate_removes_one_property() {
        let cache = InMemoryDomainCache::new();
        cache.put("Subject", values(&["water"])).await;
        cache.put("Type", values(&["dataset"])).await;

        cache.invalidate("Subject").await;

        assert!(cache.get("Subject").await.is_none());
        assert!(cache.get("Type").await.is_some());
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = InMemoryDomainCache::new();
        cache.put("Subject", values(&["water"])).await;
        cache.put("Type", values(&["dataset"])).await;

        cache.clear().await;

        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_entry_expires_after_ttl() {
        let cache = InMemoryDomainCache::with_ttl(Duration::from_millis(20));
        cache.put("Subject", values(&["water"])).await;
        assert!(cache.get("Subject").await.is_some());

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(cache.get("Subject").await.is_none());
    }

    #[test]
    fn test_explicit_ttl() {
        assert_eq!(create_domain_cache(Some(60)).ttl(), Some(Duration::from_secs(60)));
        assert_eq!(create_domain_cache(Some(0)).ttl(), None);
    }
}
