use std::collections::HashMap;

use crate::models::ProviderProfile;

/// Weight of each component in the blended similarity value.
const CATEGORY_WEIGHT: f64 = 0.4;
const PRICE_WEIGHT: f64 = 0.2;
const RATING_WEIGHT: f64 = 0.2;
const SPECIALTY_WEIGHT: f64 = 0.2;

/// Price differences of 5 or more per minute count as fully dissimilar.
const PRICE_SPAN: f64 = 5.0;

/// Pairwise provider similarity matrix (0-100)
///
/// Entries are keyed by the lexicographically ordered id pair, so
/// `similarity(a, b) == similarity(b, a)` holds by construction. The matrix
/// is invalidated by registry mutations and rebuilt lazily before the next
/// recommendation pass.
#[derive(Debug)]
pub struct SimilarityModel {
    scores: HashMap<(String, String), f64>,
    dirty: bool,
}

impl SimilarityModel {
    pub fn new() -> Self {
        Self {
            scores: HashMap::new(),
            dirty: true,
        }
    }

    /// Mark the matrix stale. Cheap; the rebuild happens on next use.
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Recompute the full matrix over a registry snapshot.
    pub fn rebuild(&mut self, providers: &[&ProviderProfile]) {
        self.scores.clear();

        for (i, a) in providers.iter().enumerate() {
            for b in providers.iter().skip(i + 1) {
                let value = pair_similarity(a, b);
                self.scores.insert(pair_key(&a.id, &b.id), value);
            }
        }

        self.dirty = false;
        tracing::debug!(
            "Similarity matrix rebuilt: {} providers, {} pairs",
            providers.len(),
            self.scores.len()
        );
    }

    /// Similarity between two providers (0-100); unknown pairs score 0.
    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        if a == b {
            return 100.0;
        }
        self.scores.get(&pair_key(a, b)).copied().unwrap_or(0.0)
    }

    /// The `limit` most similar other providers above `min_similarity`,
    /// most similar first.
    pub fn top_similar(&self, id: &str, limit: usize, min_similarity: f64) -> Vec<(String, f64)> {
        let mut neighbors: Vec<(String, f64)> = self
            .scores
            .iter()
            .filter_map(|((a, b), value)| {
                if a == id {
                    Some((b.clone(), *value))
                } else if b == id {
                    Some((a.clone(), *value))
                } else {
                    None
                }
            })
            .filter(|(_, value)| *value > min_similarity)
            .collect();

        neighbors.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        neighbors.truncate(limit);
        neighbors
    }
}

fn pair_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

/// Blended similarity between two profiles (0-100)
///
/// 40% category overlap, 20% price proximity, 20% rating proximity,
/// 20% specialty overlap. Every term is symmetric under swapping a/b.
pub fn pair_similarity(a: &ProviderProfile, b: &ProviderProfile) -> f64 {
    let category = overlap_ratio(&a.categories, &b.categories);
    let price = (1.0 - (a.price_per_minute - b.price_per_minute).abs() / PRICE_SPAN).max(0.0);
    let rating = (1.0 - (a.rating - b.rating).abs()).max(0.0);
    let specialty = overlap_ratio(&a.specialties, &b.specialties);

    (CATEGORY_WEIGHT * category
        + PRICE_WEIGHT * price
        + RATING_WEIGHT * rating
        + SPECIALTY_WEIGHT * specialty)
        * 100.0
}

/// Tag overlap: intersection size over the larger tag set, 0 when both empty
#[inline]
fn overlap_ratio(a: &[String], b: &[String]) -> f64 {
    let larger = a.len().max(b.len());
    if larger == 0 {
        return 0.0;
    }

    let shared = a
        .iter()
        .filter(|tag| b.iter().any(|other| other.eq_ignore_ascii_case(tag)))
        .count();

    shared as f64 / larger as f64
}
