// libs/scheduling-cell/src/services/cache.rs
//
// Read-through cache for availability listings, owned by the handler layer.
// The engine itself never consults it. Keyed by (provider, date,
// granularity) so listings at different granularities cannot shadow each
// other; invalidation drops every granularity for the (provider, date)
// pair touched by a commit.

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;

struct CacheEntry {
    cached_at: Instant,
    slots: Vec<DateTime<Utc>>,
}

pub struct AvailabilityCache {
    ttl: Duration,
    entries: RwLock<HashMap<(Uuid, NaiveDate, i32), CacheEntry>>,
}

impl AvailabilityCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(
        &self,
        provider_id: Uuid,
        date: NaiveDate,
        granularity_minutes: i32,
    ) -> Option<Vec<DateTime<Utc>>> {
        let entries = self.entries.read().await;
        let entry = entries.get(&(provider_id, date, granularity_minutes))?;
        if entry.cached_at.elapsed() > self.ttl {
            return None;
        }
        Some(entry.slots.clone())
    }

    pub async fn put(
        &self,
        provider_id: Uuid,
        date: NaiveDate,
        granularity_minutes: i32,
        slots: Vec<DateTime<Utc>>,
    ) {
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.cached_at.elapsed() <= self.ttl);
        entries.insert(
            (provider_id, date, granularity_minutes),
            CacheEntry {
                cached_at: Instant::now(),
                slots,
            },
        );
    }

    /// Drop every cached listing for the (provider, date) pair. Called
    /// after a successful reservation commit or status change.
    pub async fn invalidate(&self, provider_id: Uuid, date: NaiveDate) {
        self.entries
            .write()
            .await
            .retain(|(p, d, _), _| !(*p == provider_id && *d == date));
    }
}
