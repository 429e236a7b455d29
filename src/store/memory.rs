//! In-memory profile store used by tests and the demo binary.

use std::sync::Arc;

use dashmap::DashMap;
use futures::future::BoxFuture;
use uuid::Uuid;

use crate::store::{PlayerProfile, ProfileStore, StorageResult};

/// Keeps profiles in a process-local map; contents are lost on shutdown.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    profiles: Arc<DashMap<Uuid, PlayerProfile>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProfileStore for MemoryStore {
    fn save_profile(&self, profile: PlayerProfile) -> BoxFuture<'static, StorageResult<()>> {
        let profiles = Arc::clone(&self.profiles);
        Box::pin(async move {
            profiles.insert(profile.id, profile);
            Ok(())
        })
    }

    fn find_profile(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<PlayerProfile>>> {
        let profiles = Arc::clone(&self.profiles);
        Box::pin(async move { Ok(profiles.get(&id).map(|entry| entry.value().clone())) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::ModeKind;
    use crate::store::ModeStats;

    #[tokio::test]
    async fn profiles_round_trip() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();

        let mut profile = PlayerProfile::new(id);
        profile.gold = 120;
        profile.stats.insert(
            ModeKind::Survival,
            ModeStats {
                games_played: 2,
                best_score: 9,
                total_score: 14,
                last_played: None,
            },
        );

        store.save_profile(profile.clone()).await.unwrap();
        let loaded = store.find_profile(id).await.unwrap();
        assert_eq!(loaded, Some(profile));
    }

    #[tokio::test]
    async fn missing_profile_is_none() {
        let store = MemoryStore::new();
        let loaded = store.find_profile(Uuid::new_v4()).await.unwrap();
        assert_eq!(loaded, None);
    }

    #[tokio::test]
    async fn save_replaces_the_previous_version() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();

        let mut profile = PlayerProfile::new(id);
        store.save_profile(profile.clone()).await.unwrap();
        profile.gold = 50;
        store.save_profile(profile.clone()).await.unwrap();

        let loaded = store.find_profile(id).await.unwrap().unwrap();
        assert_eq!(loaded.gold, 50);
        store.health_check().await.unwrap();
    }
}
