use std::collections::{HashMap, HashSet};

use crate::core::similarity::SimilarityModel;
use crate::models::domain::FAVORITE_RATING_THRESHOLD;
use crate::models::{ClientBehaviorProfile, Priority, Recommendation, RecommendationKind, TimeSlot};
use crate::store::ProviderStore;

/// Hard cap on the recommendation list length.
pub const MAX_RECOMMENDATIONS: usize = 10;

/// How many similar providers each liked consultation can contribute.
const SIMILAR_PROVIDER_LIMIT: usize = 3;

/// Similarity floor for provider-based suggestions.
const MIN_SIMILARITY: f64 = 60.0;

/// Above this similarity a provider suggestion is high priority.
const HIGH_SIMILARITY: f64 = 80.0;

/// History count from which a category counts as frequent.
const FREQUENT_CATEGORY_COUNT: usize = 2;

/// Confidence contributed by each visit to a frequent category.
const CATEGORY_CONFIDENCE_PER_VISIT: f64 = 20.0;

const EVENING_CONFIDENCE: f64 = 75.0;

const LOYALTY_SPEND_THRESHOLD: f64 = 100.0;
const LOYALTY_CONFIDENCE: f64 = 90.0;
const FREE_CONSULTATION_COUNT: usize = 5;
const FREE_CONSULTATION_CONFIDENCE: f64 = 100.0;

const COLD_START_PROVIDER_CONFIDENCE: f64 = 80.0;
const COLD_START_CATEGORY_CONFIDENCE: f64 = 70.0;
const COLD_START_CATEGORY: &str = "Tarot";

/// Generate the personalized recommendation list for a client
///
/// Aggregates provider-based, category-based, time-slot and promotional
/// candidates, then sorts by priority (high first) and descending confidence
/// and caps the list at ten entries. A client without a behavior profile gets
/// the fixed cold-start list so the UI always has content to show.
pub fn generate_recommendations<P: ProviderStore>(
    client_id: &str,
    behavior: Option<&ClientBehaviorProfile>,
    similarity: &SimilarityModel,
    providers: &P,
) -> Vec<Recommendation> {
    let Some(profile) = behavior else {
        tracing::debug!("No behavior profile for {}, using cold start", client_id);
        return cold_start_recommendations(providers);
    };

    let mut recommendations = Vec::new();
    collect_provider_based(profile, similarity, providers, &mut recommendations);
    collect_category_based(profile, &mut recommendations);
    collect_time_slot(profile, &mut recommendations);
    collect_promotions(profile, &mut recommendations);

    recommendations.sort_by(|a, b| {
        b.priority.cmp(&a.priority).then_with(|| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    });
    recommendations.truncate(MAX_RECOMMENDATIONS);

    tracing::debug!(
        "Generated {} recommendations for {}",
        recommendations.len(),
        client_id
    );
    recommendations
}

/// Fixed default list for clients with no history
pub fn cold_start_recommendations<P: ProviderStore>(providers: &P) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    let top_rated = providers.all().into_iter().max_by(|a, b| {
        a.rating
            .partial_cmp(&b.rating)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.id.cmp(&a.id))
    });

    if let Some(provider) = top_rated {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Provider,
            title: format!("Inizia con {}", provider.display_name),
            description: "Tra i consulenti più apprezzati della piattaforma".to_string(),
            confidence: COLD_START_PROVIDER_CONFIDENCE,
            provider_id: Some(provider.id.clone()),
            category: None,
            justification: format!("Valutazione media di {:.1} su 5", provider.rating),
            priority: Priority::Medium,
        });
    }

    recommendations.push(Recommendation {
        kind: RecommendationKind::Category,
        title: format!("Esplora la categoria {}", COLD_START_CATEGORY),
        description: "La categoria più richiesta dai nuovi clienti".to_string(),
        confidence: COLD_START_CATEGORY_CONFIDENCE,
        provider_id: None,
        category: Some(COLD_START_CATEGORY.to_string()),
        justification: "Un buon punto di partenza per il primo consulto".to_string(),
        priority: Priority::Medium,
    });

    recommendations
}

/// Providers similar to the ones the client rated well
fn collect_provider_based<P: ProviderStore>(
    profile: &ClientBehaviorProfile,
    similarity: &SimilarityModel,
    providers: &P,
    out: &mut Vec<Recommendation>,
) {
    let consulted: HashSet<&str> = profile
        .consultations
        .iter()
        .map(|c| c.provider_id.as_str())
        .collect();
    let mut emitted: HashSet<String> = HashSet::new();

    let liked = profile
        .consultations
        .iter()
        .filter(|c| c.rating_given >= FAVORITE_RATING_THRESHOLD);

    for consultation in liked {
        let neighbors = similarity.top_similar(
            &consultation.provider_id,
            SIMILAR_PROVIDER_LIMIT,
            MIN_SIMILARITY,
        );

        for (candidate_id, value) in neighbors {
            // Never re-suggest someone the client already knows, and emit
            // each candidate at most once per pass
            if consulted.contains(candidate_id.as_str()) || !emitted.insert(candidate_id.clone()) {
                continue;
            }
            let Some(candidate) = providers.get(&candidate_id) else {
                continue;
            };

            out.push(Recommendation {
                kind: RecommendationKind::Provider,
                title: format!("Prova un consulto con {}", candidate.display_name),
                description: "Molto simile a un consulente che hai apprezzato".to_string(),
                confidence: value,
                provider_id: Some(candidate_id),
                category: None,
                justification: format!(
                    "Affinità del {:.0}% con un consulente che hai valutato positivamente",
                    value
                ),
                priority: if value > HIGH_SIMILARITY {
                    Priority::High
                } else {
                    Priority::Medium
                },
            });
        }
    }
}

/// Categories correlated with the ones the client visits often
fn collect_category_based(profile: &ClientBehaviorProfile, out: &mut Vec<Recommendation>) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for consultation in &profile.consultations {
        *counts.entry(consultation.category.as_str()).or_default() += 1;
    }

    let mut frequent: Vec<(&str, usize)> = counts
        .into_iter()
        .filter(|(_, count)| *count >= FREQUENT_CATEGORY_COUNT)
        .collect();
    // Deterministic order: most visited first, then by name
    frequent.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let tried: HashSet<String> = profile
        .consultations
        .iter()
        .map(|c| c.category.to_lowercase())
        .collect();
    let mut emitted: HashSet<String> = HashSet::new();

    for (category, count) in frequent {
        for suggestion in correlated_categories(category) {
            if tried.contains(&suggestion.to_lowercase())
                || !emitted.insert(suggestion.to_lowercase())
            {
                continue;
            }

            out.push(Recommendation {
                kind: RecommendationKind::Category,
                title: format!("Scopri la categoria {}", suggestion),
                description: format!("Chi consulta {} spesso apprezza anche {}", category, suggestion),
                confidence: (count as f64 * CATEGORY_CONFIDENCE_PER_VISIT).min(100.0),
                provider_id: None,
                category: Some(suggestion.to_string()),
                justification: format!("Hai completato {} consulti di {}", count, category),
                priority: Priority::Medium,
            });
        }
    }
}

/// Evening availability nudge for clients who consult in the evening
fn collect_time_slot(profile: &ClientBehaviorProfile, out: &mut Vec<Recommendation>) {
    if profile.preferred_slots.contains(&TimeSlot::Evening) {
        out.push(Recommendation {
            kind: RecommendationKind::TimeSlot,
            title: "Consulenti disponibili in serata".to_string(),
            description: "Molti consulenti sono online dopo le 18, senza attese".to_string(),
            confidence: EVENING_CONFIDENCE,
            provider_id: None,
            category: None,
            justification: "Consulti spesso nelle ore serali".to_string(),
            priority: Priority::Low,
        });
    }
}

/// Loyalty and free-consultation promotions; independent, both may fire
fn collect_promotions(profile: &ClientBehaviorProfile, out: &mut Vec<Recommendation>) {
    if profile.total_spend > LOYALTY_SPEND_THRESHOLD {
        out.push(Recommendation {
            kind: RecommendationKind::Promotion,
            title: "Sconto fedeltà del 10%".to_string(),
            description: "Un ringraziamento per la tua fiducia".to_string(),
            confidence: LOYALTY_CONFIDENCE,
            provider_id: None,
            category: None,
            justification: format!(
                "Hai investito più di {:.0} crediti in consulti",
                LOYALTY_SPEND_THRESHOLD
            ),
            priority: Priority::High,
        });
    }

    if profile.consultations.len() >= FREE_CONSULTATION_COUNT {
        out.push(Recommendation {
            kind: RecommendationKind::Promotion,
            title: "Consulto gratuito in regalo".to_string(),
            description: "Il prossimo consulto breve è offerto da noi".to_string(),
            confidence: FREE_CONSULTATION_CONFIDENCE,
            provider_id: None,
            category: None,
            justification: format!("Hai completato {} consulti", profile.consultations.len()),
            priority: Priority::High,
        });
    }
}

/// Static category correlation table
///
/// Clients drawn to a discipline tend to explore the neighboring ones; the
/// pairs come from the product catalog, not from behavior data.
fn correlated_categories(category: &str) -> &'static [&'static str] {
    match category.to_lowercase().as_str() {
        "tarot" => &["Cartomancy", "Sibyls", "Oracles"],
        "cartomancy" => &["Tarot", "Sibyls"],
        "sibyls" => &["Cartomancy", "Oracles"],
        "oracles" => &["Angel Cards", "Sibyls"],
        "astrology" => &["Numerology", "Karmic Astrology"],
        "numerology" => &["Astrology"],
        "love" => &["Tarot", "Cartomancy"],
        "angel cards" => &["Oracles"],
        _ => &[],
    }
}
