use std::sync::Arc;
use std::time::Duration;

use crate::models::Recommendation;

/// In-process TTL cache for generated recommendation lists
///
/// Keyed by client id. Entries are invalidated per-client when that client's
/// behavior changes, and wholesale on registry mutations, since a similarity
/// shift can affect every client's list.
pub struct RecommendationCache {
    entries: moka::future::Cache<String, Arc<Vec<Recommendation>>>,
}

impl RecommendationCache {
    pub fn new(max_entries: u64, ttl_secs: u64) -> Self {
        let entries = moka::future::CacheBuilder::new(max_entries)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { entries }
    }

    pub async fn get(&self, client_id: &str) -> Option<Arc<Vec<Recommendation>>> {
        let hit = self.entries.get(client_id).await;
        if hit.is_some() {
            tracing::trace!("Recommendation cache hit: {}", client_id);
        }
        hit
    }

    pub async fn insert(&self, client_id: &str, recommendations: Vec<Recommendation>) {
        self.entries
            .insert(client_id.to_string(), Arc::new(recommendations))
            .await;
    }

    pub async fn invalidate(&self, client_id: &str) {
        self.entries.invalidate(client_id).await;
    }

    pub fn invalidate_all(&self) {
        self.entries.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Priority, RecommendationKind};

    fn recommendation(title: &str) -> Recommendation {
        Recommendation {
            kind: RecommendationKind::Promotion,
            title: title.to_string(),
            description: "test".to_string(),
            confidence: 90.0,
            provider_id: None,
            category: None,
            justification: "test".to_string(),
            priority: Priority::High,
        }
    }

    #[test]
    fn test_insert_and_get() {
        tokio_test::block_on(async {
            let cache = RecommendationCache::new(100, 300);
            cache.insert("c1", vec![recommendation("a")]).await;

            let hit = cache.get("c1").await.expect("entry expected");
            assert_eq!(hit.len(), 1);
            assert!(cache.get("c2").await.is_none());
        });
    }

    #[test]
    fn test_invalidate_single_client() {
        tokio_test::block_on(async {
            let cache = RecommendationCache::new(100, 300);
            cache.insert("c1", vec![recommendation("a")]).await;
            cache.insert("c2", vec![recommendation("b")]).await;

            cache.invalidate("c1").await;

            assert!(cache.get("c1").await.is_none());
            assert!(cache.get("c2").await.is_some());
        });
    }
}
