use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Ratings at or above this value auto-add the provider to favorites.
pub const FAVORITE_RATING_THRESHOLD: f64 = 4.0;

/// Search queries retained per client, oldest evicted first.
pub const MAX_RECENT_SEARCHES: usize = 20;

/// Provider profile with availability and track-record data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderProfile {
    pub id: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(rename = "pricePerMinute")]
    pub price_per_minute: f64,
    pub rating: f64,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub online: bool,
    #[serde(rename = "loadPercent", default)]
    pub load_percent: u8,
    #[serde(rename = "avgResponseMinutes", default)]
    pub avg_response_minutes: u32,
    #[serde(rename = "successRate", default)]
    pub success_rate: f64,
    #[serde(default)]
    pub specialties: Vec<String>,
    #[serde(rename = "yearsExperience", default)]
    pub years_experience: u8,
    #[serde(rename = "lastActive", default)]
    pub last_active: Option<DateTime<Utc>>,
}

/// Partial provider update, merged field-by-field (last write wins)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderStatusUpdate {
    #[serde(default)]
    pub online: Option<bool>,
    #[serde(rename = "loadPercent", default)]
    pub load_percent: Option<u8>,
    #[serde(rename = "avgResponseMinutes", default)]
    pub avg_response_minutes: Option<u32>,
    #[serde(rename = "pricePerMinute", default)]
    pub price_per_minute: Option<f64>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(rename = "successRate", default)]
    pub success_rate: Option<f64>,
    #[serde(default)]
    pub categories: Option<Vec<String>>,
    #[serde(default)]
    pub specialties: Option<Vec<String>>,
    #[serde(default)]
    pub languages: Option<Vec<String>>,
    #[serde(rename = "lastActive", default)]
    pub last_active: Option<DateTime<Utc>>,
}

impl ProviderProfile {
    /// Merge the `Some` fields of an update into this profile.
    ///
    /// No range validation is performed; the directory is trusted as-is.
    pub fn apply_update(&mut self, update: &ProviderStatusUpdate) {
        if let Some(online) = update.online {
            self.online = online;
        }
        if let Some(load) = update.load_percent {
            self.load_percent = load;
        }
        if let Some(response) = update.avg_response_minutes {
            self.avg_response_minutes = response;
        }
        if let Some(price) = update.price_per_minute {
            self.price_per_minute = price;
        }
        if let Some(rating) = update.rating {
            self.rating = rating;
        }
        if let Some(success) = update.success_rate {
            self.success_rate = success;
        }
        if let Some(categories) = &update.categories {
            self.categories = categories.clone();
        }
        if let Some(specialties) = &update.specialties {
            self.specialties = specialties.clone();
        }
        if let Some(languages) = &update.languages {
            self.languages = languages.clone();
        }
        if let Some(last_active) = update.last_active {
            self.last_active = Some(last_active);
        }
    }
}

/// Urgency of a match request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
}

impl Default for Urgency {
    fn default() -> Self {
        Urgency::Medium
    }
}

/// How the consultation is delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsultationMode {
    Chat,
    Voice,
    Email,
}

impl Default for ConsultationMode {
    fn default() -> Self {
        ConsultationMode::Chat
    }
}

/// A client's stated preferences for one matching request
#[derive(Debug, Clone)]
pub struct RequestCriteria {
    pub client_id: String,
    pub preferred_categories: Vec<String>,
    pub max_price_per_minute: Option<f64>,
    pub min_rating: Option<f64>,
    pub preferred_languages: Vec<String>,
    pub avoided_provider_ids: Vec<String>,
    pub urgency: Urgency,
    pub mode: ConsultationMode,
}

/// Scored match result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchScore {
    #[serde(rename = "providerId")]
    pub provider_id: String,
    pub score: f64,
    pub reasons: Vec<String>,
    #[serde(rename = "estimatedWaitMinutes")]
    pub estimated_wait_minutes: u32,
}

/// One completed consultation as recorded by the ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsultationRecord {
    #[serde(rename = "providerId")]
    pub provider_id: String,
    pub category: String,
    #[serde(rename = "ratingGiven")]
    pub rating_given: f64,
    #[serde(rename = "durationMinutes")]
    pub duration_minutes: u32,
    pub cost: f64,
    pub timestamp: DateTime<Utc>,
}

/// Coarse time-of-day bucket derived from consultation times
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeSlot {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeSlot {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=11 => TimeSlot::Morning,
            12..=17 => TimeSlot::Afternoon,
            18..=22 => TimeSlot::Evening,
            _ => TimeSlot::Night,
        }
    }
}

/// Accumulated per-client history used for personalization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientBehaviorProfile {
    #[serde(rename = "clientId")]
    pub client_id: String,
    #[serde(default)]
    pub consultations: Vec<ConsultationRecord>,
    #[serde(rename = "recentSearches", default)]
    pub recent_searches: VecDeque<String>,
    #[serde(rename = "favoriteProviderIds", default)]
    pub favorite_provider_ids: Vec<String>,
    #[serde(rename = "preferredSlots", default)]
    pub preferred_slots: Vec<TimeSlot>,
    #[serde(rename = "avgSessionMinutes", default)]
    pub avg_session_minutes: f64,
    #[serde(rename = "totalSpend", default)]
    pub total_spend: f64,
}

impl ClientBehaviorProfile {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            consultations: Vec::new(),
            recent_searches: VecDeque::new(),
            favorite_provider_ids: Vec::new(),
            preferred_slots: Vec::new(),
            avg_session_minutes: 0.0,
            total_spend: 0.0,
        }
    }

    /// Fold a completed consultation into the profile: history, running
    /// average duration, spend, time slot, and favorites on rating >= 4.
    pub fn record_consultation(&mut self, record: ConsultationRecord) {
        self.total_spend += record.cost;

        let slot = TimeSlot::from_hour(record.timestamp.hour());
        if !self.preferred_slots.contains(&slot) {
            self.preferred_slots.push(slot);
        }

        if record.rating_given >= FAVORITE_RATING_THRESHOLD
            && !self.favorite_provider_ids.contains(&record.provider_id)
        {
            self.favorite_provider_ids.push(record.provider_id.clone());
        }

        self.consultations.push(record);

        let total_minutes: u64 = self
            .consultations
            .iter()
            .map(|c| c.duration_minutes as u64)
            .sum();
        self.avg_session_minutes = total_minutes as f64 / self.consultations.len() as f64;
    }

    /// Append a search query, evicting the oldest past the retention cap.
    pub fn push_search_query(&mut self, query: impl Into<String>) {
        self.recent_searches.push_back(query.into());
        while self.recent_searches.len() > MAX_RECENT_SEARCHES {
            self.recent_searches.pop_front();
        }
    }
}

/// Kind of personalized suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    Provider,
    Category,
    TimeSlot,
    Promotion,
}

/// Display priority; high sorts before medium before low
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// A personalized suggestion ready for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub title: String,
    pub description: String,
    pub confidence: f64,
    #[serde(rename = "providerId", default)]
    pub provider_id: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub justification: String,
    pub priority: Priority,
}

/// Scoring weights
///
/// Each weight is a point ceiling for its factor. The ceilings are additive
/// and intentionally not normalized: bonuses can push a score past the sum of
/// the nominal factors, and renormalizing would change ranking outcomes.
#[derive(Debug, Clone, Copy)]
pub struct ScoringWeights {
    pub category: f64,
    pub price: f64,
    pub rating: f64,
    pub availability: f64,
    pub response: f64,
    pub affinity: f64,
    pub avoid_penalty: f64,
    pub experience_bonus: f64,
    pub success_bonus: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            category: 30.0,
            price: 20.0,
            rating: 15.0,
            availability: 15.0,
            response: 10.0,
            affinity: 10.0,
            avoid_penalty: 5.0,
            experience_bonus: 5.0,
            success_bonus: 5.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn consultation(provider: &str, rating: f64, minutes: u32, cost: f64) -> ConsultationRecord {
        ConsultationRecord {
            provider_id: provider.to_string(),
            category: "Tarot".to_string(),
            rating_given: rating,
            duration_minutes: minutes,
            cost,
            timestamp: Utc.with_ymd_and_hms(2024, 3, 12, 21, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_running_average_duration() {
        let mut profile = ClientBehaviorProfile::new("c1");
        profile.record_consultation(consultation("p1", 5.0, 10, 20.0));
        profile.record_consultation(consultation("p2", 3.0, 30, 60.0));

        assert_eq!(profile.avg_session_minutes, 20.0);
        assert_eq!(profile.total_spend, 80.0);
    }

    #[test]
    fn test_favorites_auto_add_on_high_rating() {
        let mut profile = ClientBehaviorProfile::new("c1");
        profile.record_consultation(consultation("good", 4.5, 10, 20.0));
        profile.record_consultation(consultation("bad", 2.0, 10, 20.0));
        profile.record_consultation(consultation("good", 5.0, 10, 20.0));

        // No duplicates, no low-rated entries
        assert_eq!(profile.favorite_provider_ids, vec!["good".to_string()]);
    }

    #[test]
    fn test_preferred_slot_derived_from_hour() {
        let mut profile = ClientBehaviorProfile::new("c1");
        profile.record_consultation(consultation("p1", 4.0, 10, 20.0));

        assert_eq!(profile.preferred_slots, vec![TimeSlot::Evening]);
    }

    #[test]
    fn test_search_log_evicts_oldest() {
        let mut profile = ClientBehaviorProfile::new("c1");
        for i in 0..25 {
            profile.push_search_query(format!("query {}", i));
        }

        assert_eq!(profile.recent_searches.len(), MAX_RECENT_SEARCHES);
        assert_eq!(profile.recent_searches.front().unwrap(), "query 5");
        assert_eq!(profile.recent_searches.back().unwrap(), "query 24");
    }

    #[test]
    fn test_status_update_merges_only_some_fields() {
        let mut profile = ProviderProfile {
            id: "p1".to_string(),
            display_name: "Stella".to_string(),
            categories: vec!["Tarot".to_string()],
            price_per_minute: 2.0,
            rating: 4.0,
            languages: vec!["it".to_string()],
            online: false,
            load_percent: 10,
            avg_response_minutes: 3,
            success_rate: 85.0,
            specialties: vec![],
            years_experience: 5,
            last_active: None,
        };

        profile.apply_update(&ProviderStatusUpdate {
            online: Some(true),
            load_percent: Some(40),
            ..Default::default()
        });

        assert!(profile.online);
        assert_eq!(profile.load_percent, 40);
        assert_eq!(profile.rating, 4.0);
        assert_eq!(profile.price_per_minute, 2.0);
    }

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::High > Priority::Medium);
        assert!(Priority::Medium > Priority::Low);
    }
}
