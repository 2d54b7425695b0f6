use std::collections::HashMap;

use crate::models::{ClientBehaviorProfile, ConsultationRecord};

/// Repository abstraction over per-client behavior history
///
/// Profiles are created lazily on first write and live for the process
/// lifetime. The affinity ledger tracks which providers a client has
/// successfully consulted, feeding the matching affinity factor.
pub trait BehaviorStore {
    fn get(&self, client_id: &str) -> Option<&ClientBehaviorProfile>;

    /// Fold a completed consultation into the client's profile.
    fn record_consultation(&mut self, client_id: &str, record: ConsultationRecord);

    /// Append to the client's bounded search log.
    fn add_search_query(&mut self, client_id: &str, query: &str);

    /// Remember a successful client/provider pairing. Idempotent.
    fn record_affinity(&mut self, client_id: &str, provider_id: &str);

    /// Providers this client has successfully consulted; empty if none.
    fn affinity(&self, client_id: &str) -> &[String];
}

/// Process-lifetime behavior store backed by HashMaps
#[derive(Debug, Default)]
pub struct InMemoryBehaviorStore {
    profiles: HashMap<String, ClientBehaviorProfile>,
    affinity: HashMap<String, Vec<String>>,
}

impl InMemoryBehaviorStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn profile_mut(&mut self, client_id: &str) -> &mut ClientBehaviorProfile {
        self.profiles
            .entry(client_id.to_string())
            .or_insert_with(|| ClientBehaviorProfile::new(client_id))
    }
}

impl BehaviorStore for InMemoryBehaviorStore {
    fn get(&self, client_id: &str) -> Option<&ClientBehaviorProfile> {
        self.profiles.get(client_id)
    }

    fn record_consultation(&mut self, client_id: &str, record: ConsultationRecord) {
        self.profile_mut(client_id).record_consultation(record);
    }

    fn add_search_query(&mut self, client_id: &str, query: &str) {
        self.profile_mut(client_id).push_search_query(query);
    }

    fn record_affinity(&mut self, client_id: &str, provider_id: &str) {
        let entries = self.affinity.entry(client_id.to_string()).or_default();
        if !entries.iter().any(|id| id == provider_id) {
            entries.push(provider_id.to_string());
        }
    }

    fn affinity(&self, client_id: &str) -> &[String] {
        self.affinity
            .get(client_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(provider: &str) -> ConsultationRecord {
        ConsultationRecord {
            provider_id: provider.to_string(),
            category: "Tarot".to_string(),
            rating_given: 5.0,
            duration_minutes: 15,
            cost: 30.0,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_profile_created_lazily() {
        let mut store = InMemoryBehaviorStore::new();
        assert!(store.get("c1").is_none());

        store.record_consultation("c1", record("p1"));
        assert_eq!(store.get("c1").unwrap().consultations.len(), 1);
    }

    #[test]
    fn test_affinity_is_idempotent() {
        let mut store = InMemoryBehaviorStore::new();
        store.record_affinity("c1", "p1");
        store.record_affinity("c1", "p1");
        store.record_affinity("c1", "p2");

        assert_eq!(store.affinity("c1"), ["p1".to_string(), "p2".to_string()]);
    }

    #[test]
    fn test_affinity_empty_for_unknown_client() {
        let store = InMemoryBehaviorStore::new();
        assert!(store.affinity("nobody").is_empty());
    }

    #[test]
    fn test_search_query_creates_profile() {
        let mut store = InMemoryBehaviorStore::new();
        store.add_search_query("c1", "tarocchi amore");

        let profile = store.get("c1").unwrap();
        assert_eq!(profile.recent_searches.len(), 1);
        assert!(profile.consultations.is_empty());
    }
}
