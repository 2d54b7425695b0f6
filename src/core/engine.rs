use crate::core::recommend;
use crate::core::scoring::{calculate_match_score, estimate_wait_minutes};
use crate::core::similarity::SimilarityModel;
use crate::models::{
    ClientBehaviorProfile, ConsultationRecord, MatchScore, ProviderProfile, ProviderStatusUpdate,
    Recommendation, RequestCriteria, ScoringWeights,
};
use crate::store::{BehaviorStore, InMemoryBehaviorStore, InMemoryProviderStore, ProviderStore};

/// Matching and recommendation engine facade
///
/// Owns the provider registry, the behavior store and the similarity model,
/// and exposes the public engine operations. All state is in-memory and the
/// operations are synchronous computations over the current snapshot; callers
/// that serve concurrent requests wrap the engine in their own
/// synchronization.
#[derive(Debug)]
pub struct Engine<P = InMemoryProviderStore, B = InMemoryBehaviorStore>
where
    P: ProviderStore,
    B: BehaviorStore,
{
    providers: P,
    behavior: B,
    similarity: SimilarityModel,
    weights: ScoringWeights,
}

impl Engine {
    pub fn new(weights: ScoringWeights) -> Self {
        Self::with_stores(
            InMemoryProviderStore::new(),
            InMemoryBehaviorStore::new(),
            weights,
        )
    }

    pub fn with_default_weights() -> Self {
        Self::new(ScoringWeights::default())
    }
}

impl<P, B> Engine<P, B>
where
    P: ProviderStore,
    B: BehaviorStore,
{
    pub fn with_stores(providers: P, behavior: B, weights: ScoringWeights) -> Self {
        Self {
            providers,
            behavior,
            similarity: SimilarityModel::new(),
            weights,
        }
    }

    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    pub fn behavior_profile(&self, client_id: &str) -> Option<&ClientBehaviorProfile> {
        self.behavior.get(client_id)
    }

    /// Insert or replace a provider profile (Provider Directory entry point).
    pub fn register_provider(&mut self, profile: ProviderProfile) {
        tracing::debug!("Registering provider {}", profile.id);
        self.providers.upsert(profile);
        self.similarity.invalidate();
    }

    /// Merge a partial status update into a provider profile.
    ///
    /// Unknown ids are silently ignored; the caller gets no error signal.
    pub fn update_operator_status(&mut self, provider_id: &str, update: &ProviderStatusUpdate) {
        if self.providers.apply_update(provider_id, update) {
            self.similarity.invalidate();
        }
    }

    /// Score every registered provider against the criteria
    ///
    /// Returns matches with score > 0, strictly descending by score; ties
    /// break on shorter estimated wait, then id, so the order is a total one.
    /// An empty registry yields an empty list, not an error.
    pub fn find_best_matches(&self, criteria: &RequestCriteria) -> Vec<MatchScore> {
        let past_successes = self.behavior.affinity(&criteria.client_id);

        let mut matches: Vec<MatchScore> = self
            .providers
            .all()
            .into_iter()
            .filter_map(|provider| {
                let (score, reasons) =
                    calculate_match_score(provider, criteria, past_successes, &self.weights);

                (score > 0.0).then(|| MatchScore {
                    provider_id: provider.id.clone(),
                    score,
                    reasons,
                    estimated_wait_minutes: estimate_wait_minutes(provider),
                })
            })
            .collect();

        matches.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.estimated_wait_minutes.cmp(&b.estimated_wait_minutes))
                .then_with(|| a.provider_id.cmp(&b.provider_id))
        });

        tracing::debug!(
            "Matched {} of {} providers for {}",
            matches.len(),
            self.providers.len(),
            criteria.client_id
        );
        matches
    }

    /// Remember a successful client/provider pairing. Idempotent.
    pub fn record_successful_consultation(&mut self, client_id: &str, provider_id: &str) {
        self.behavior.record_affinity(client_id, provider_id);
    }

    /// Fold a completed consultation into the client's behavior profile.
    pub fn update_user_behavior(&mut self, client_id: &str, record: ConsultationRecord) {
        self.behavior.record_consultation(client_id, record);
    }

    /// Append to the client's bounded search log.
    pub fn add_search_query(&mut self, client_id: &str, query: &str) {
        self.behavior.add_search_query(client_id, query);
    }

    /// Generate the personalized recommendation list for a client.
    ///
    /// Rebuilds the similarity matrix first when a registry mutation has
    /// invalidated it.
    pub fn generate_recommendations(&mut self, client_id: &str) -> Vec<Recommendation> {
        if self.similarity.is_dirty() {
            let snapshot = self.providers.all();
            self.similarity.rebuild(&snapshot);
        }

        recommend::generate_recommendations(
            client_id,
            self.behavior.get(client_id),
            &self.similarity,
            &self.providers,
        )
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConsultationMode, Urgency};
    use chrono::Utc;

    fn provider(id: &str, online: bool, load: u8) -> ProviderProfile {
        ProviderProfile {
            id: id.to_string(),
            display_name: format!("Consulente {}", id),
            categories: vec!["Tarot".to_string()],
            price_per_minute: 2.0,
            rating: 4.5,
            languages: vec!["it".to_string()],
            online,
            load_percent: load,
            avg_response_minutes: 5,
            success_rate: 85.0,
            specialties: vec![],
            years_experience: 5,
            last_active: None,
        }
    }

    fn criteria(urgency: Urgency) -> RequestCriteria {
        RequestCriteria {
            client_id: "c1".to_string(),
            preferred_categories: vec!["Tarot".to_string()],
            max_price_per_minute: None,
            min_rating: None,
            preferred_languages: vec![],
            avoided_provider_ids: vec![],
            urgency,
            mode: ConsultationMode::Chat,
        }
    }

    #[test]
    fn test_empty_registry_returns_empty_list() {
        let engine = Engine::with_default_weights();
        assert!(engine.find_best_matches(&criteria(Urgency::Medium)).is_empty());
    }

    #[test]
    fn test_matches_sorted_descending_and_positive() {
        let mut engine = Engine::with_default_weights();
        engine.register_provider(provider("a", true, 80));
        engine.register_provider(provider("b", true, 10));
        engine.register_provider(provider("c", false, 0));

        let matches = engine.find_best_matches(&criteria(Urgency::Medium));

        assert!(!matches.is_empty());
        for result in &matches {
            assert!(result.score > 0.0);
        }
        for pair in matches.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        // Lightly loaded online provider ranks first
        assert_eq!(matches[0].provider_id, "b");
    }

    #[test]
    fn test_online_outranks_offline_under_high_urgency() {
        let mut engine = Engine::with_default_weights();
        engine.register_provider(provider("online", true, 30));
        engine.register_provider(provider("offline", false, 30));

        let matches = engine.find_best_matches(&criteria(Urgency::High));

        let online_pos = matches.iter().position(|m| m.provider_id == "online");
        let offline_pos = matches.iter().position(|m| m.provider_id == "offline");
        match (online_pos, offline_pos) {
            (Some(on), Some(off)) => assert!(on < off),
            (Some(_), None) => {}
            _ => panic!("online provider must match"),
        }
    }

    #[test]
    fn test_unknown_status_update_is_silent_noop() {
        let mut engine = Engine::with_default_weights();
        engine.register_provider(provider("a", true, 10));

        engine.update_operator_status(
            "ghost",
            &ProviderStatusUpdate {
                online: Some(false),
                ..Default::default()
            },
        );

        assert_eq!(engine.provider_count(), 1);
        let matches = engine.find_best_matches(&criteria(Urgency::Medium));
        assert_eq!(matches[0].provider_id, "a");
    }

    #[test]
    fn test_affinity_boost_after_successful_consultation() {
        let mut engine = Engine::with_default_weights();
        engine.register_provider(provider("a", true, 50));
        engine.register_provider(provider("b", true, 50));

        engine.record_successful_consultation("c1", "b");
        let matches = engine.find_best_matches(&criteria(Urgency::Medium));

        assert_eq!(matches[0].provider_id, "b");
        assert!(matches[0]
            .reasons
            .contains(&"Già consultato con successo".to_string()));
    }

    #[test]
    fn test_similarity_rebuilt_after_registry_mutation() {
        let mut engine = Engine::with_default_weights();
        engine.register_provider(provider("a", true, 10));
        engine.register_provider(provider("b", true, 10));

        engine.update_user_behavior(
            "c1",
            ConsultationRecord {
                provider_id: "a".to_string(),
                category: "Tarot".to_string(),
                rating_given: 5.0,
                duration_minutes: 20,
                cost: 40.0,
                timestamp: Utc::now(),
            },
        );

        let before = engine.generate_recommendations("c1");
        assert!(before
            .iter()
            .any(|r| r.provider_id.as_deref() == Some("b")));

        // A new twin provider appears after the matrix was first built
        engine.register_provider(provider("c", true, 10));
        let after = engine.generate_recommendations("c1");
        assert!(after.iter().any(|r| r.provider_id.as_deref() == Some("c")));
    }

    #[test]
    fn test_recommendations_capped_at_ten() {
        let mut engine = Engine::with_default_weights();
        for i in 0..30 {
            engine.register_provider(provider(&format!("p{}", i), true, 10));
        }
        for i in 0..6 {
            engine.update_user_behavior(
                "c1",
                ConsultationRecord {
                    provider_id: format!("p{}", i),
                    category: "Tarot".to_string(),
                    rating_given: 5.0,
                    duration_minutes: 30,
                    cost: 60.0,
                    timestamp: Utc::now(),
                },
            );
        }

        let recommendations = engine.generate_recommendations("c1");
        assert!(recommendations.len() <= 10);
    }
}
