// libs/scheduling-cell/src/state.rs
use std::sync::Arc;
use std::time::Duration;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::services::{AvailabilityCache, ProviderLockRegistry};

/// Long-lived state shared by every scheduling request: the database
/// client, the per-provider lock registry, and the availability cache.
/// Repositories and services are built per request so the caller's bearer
/// token travels with each query.
pub struct SchedulingState {
    pub config: AppConfig,
    pub supabase: Arc<SupabaseClient>,
    pub locks: Arc<ProviderLockRegistry>,
    pub availability_cache: Arc<AvailabilityCache>,
}

impl SchedulingState {
    pub fn new(config: AppConfig) -> Self {
        let supabase = Arc::new(SupabaseClient::new(&config));
        let cache_ttl = Duration::from_secs(config.availability_cache_ttl_seconds);
        Self {
            config,
            supabase,
            locks: Arc::new(ProviderLockRegistry::new()),
            availability_cache: Arc::new(AvailabilityCache::new(cache_ttl)),
        }
    }
}
