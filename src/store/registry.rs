use std::collections::HashMap;

use crate::models::{ProviderProfile, ProviderStatusUpdate};

/// Repository abstraction over the provider catalog
///
/// The engine only sees this trait, so a durable store can replace the
/// in-memory map without touching scoring logic.
pub trait ProviderStore {
    fn get(&self, id: &str) -> Option<&ProviderProfile>;

    /// Snapshot of every registered provider, ordered by id.
    fn all(&self) -> Vec<&ProviderProfile>;

    /// Insert or replace a full profile.
    fn upsert(&mut self, profile: ProviderProfile);

    /// Merge a partial update into a stored profile.
    ///
    /// Returns false when the id is unknown; callers treat that as a no-op.
    fn apply_update(&mut self, id: &str, update: &ProviderStatusUpdate) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-lifetime provider registry backed by a HashMap
#[derive(Debug, Default)]
pub struct InMemoryProviderStore {
    providers: HashMap<String, ProviderProfile>,
}

impl InMemoryProviderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_providers(providers: impl IntoIterator<Item = ProviderProfile>) -> Self {
        let mut store = Self::new();
        for profile in providers {
            store.upsert(profile);
        }
        store
    }
}

impl ProviderStore for InMemoryProviderStore {
    fn get(&self, id: &str) -> Option<&ProviderProfile> {
        self.providers.get(id)
    }

    fn all(&self) -> Vec<&ProviderProfile> {
        let mut snapshot: Vec<&ProviderProfile> = self.providers.values().collect();
        // Deterministic iteration order regardless of map internals
        snapshot.sort_by(|a, b| a.id.cmp(&b.id));
        snapshot
    }

    fn upsert(&mut self, profile: ProviderProfile) {
        self.providers.insert(profile.id.clone(), profile);
    }

    fn apply_update(&mut self, id: &str, update: &ProviderStatusUpdate) -> bool {
        match self.providers.get_mut(id) {
            Some(profile) => {
                profile.apply_update(update);
                true
            }
            None => {
                tracing::trace!("Status update for unknown provider {} ignored", id);
                false
            }
        }
    }

    fn len(&self) -> usize {
        self.providers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(id: &str) -> ProviderProfile {
        ProviderProfile {
            id: id.to_string(),
            display_name: format!("Provider {}", id),
            categories: vec!["Tarot".to_string()],
            price_per_minute: 2.0,
            rating: 4.0,
            languages: vec![],
            online: true,
            load_percent: 0,
            avg_response_minutes: 5,
            success_rate: 80.0,
            specialties: vec![],
            years_experience: 3,
            last_active: None,
        }
    }

    #[test]
    fn test_upsert_replaces_existing() {
        let mut store = InMemoryProviderStore::new();
        store.upsert(provider("a"));

        let mut replacement = provider("a");
        replacement.rating = 5.0;
        store.upsert(replacement);

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("a").unwrap().rating, 5.0);
    }

    #[test]
    fn test_unknown_update_is_noop() {
        let mut store = InMemoryProviderStore::new();
        store.upsert(provider("a"));

        let applied = store.apply_update(
            "ghost",
            &ProviderStatusUpdate {
                online: Some(false),
                ..Default::default()
            },
        );

        assert!(!applied);
        assert_eq!(store.len(), 1);
        assert!(store.get("a").unwrap().online);
    }

    #[test]
    fn test_all_is_ordered_by_id() {
        let store =
            InMemoryProviderStore::with_providers(vec![provider("c"), provider("a"), provider("b")]);

        let ids: Vec<&str> = store.all().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
