use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use rolegate_application::ActorRecordCache;
use rolegate_core::{AppResult, SessionCredential};
use rolegate_domain::CachedActorRecord;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct ActorRecordCacheEntry {
    record: CachedActorRecord,
    expires_at: Instant,
}

/// In-memory cache adapter for actor records written at sign-in.
///
/// Entries expire after `idle_ttl` without a read or write. Expired entries
/// are dropped on lookup and pruned on every store.
pub struct InMemoryActorRecordCache {
    records: RwLock<HashMap<SessionCredential, ActorRecordCacheEntry>>,
    idle_ttl: Duration,
}

impl InMemoryActorRecordCache {
    /// Creates an empty cache whose entries expire after `idle_ttl` of
    /// inactivity.
    #[must_use]
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            idle_ttl,
        }
    }

    fn expiry_from(&self, now: Instant) -> Instant {
        now.checked_add(self.idle_ttl).unwrap_or(now)
    }
}

#[async_trait]
impl ActorRecordCache for InMemoryActorRecordCache {
    async fn find_actor(
        &self,
        credential: &SessionCredential,
    ) -> AppResult<Option<CachedActorRecord>> {
        let now = Instant::now();
        let mut records = self.records.write().await;

        let Some(entry) = records.get_mut(credential) else {
            return Ok(None);
        };

        if entry.expires_at <= now {
            records.remove(credential);
            return Ok(None);
        }

        entry.expires_at = self.expiry_from(now);
        Ok(Some(entry.record.clone()))
    }

    async fn store_actor(
        &self,
        credential: &SessionCredential,
        record: CachedActorRecord,
    ) -> AppResult<()> {
        let now = Instant::now();
        let mut records = self.records.write().await;

        records.retain(|_, entry| entry.expires_at > now);
        records.insert(
            credential.clone(),
            ActorRecordCacheEntry {
                record,
                expires_at: self.expiry_from(now),
            },
        );
        Ok(())
    }

    async fn evict_actor(&self, credential: &SessionCredential) -> AppResult<()> {
        self.records.write().await.remove(credential);
        Ok(())
    }
}
