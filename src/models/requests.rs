use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{ConsultationMode, ProviderStatusUpdate, RequestCriteria, Urgency};

/// Request to find matching providers
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FindMatchesRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "client_id", rename = "clientId")]
    pub client_id: String,
    #[serde(default)]
    #[serde(alias = "preferredCategories", rename = "preferredCategories")]
    pub preferred_categories: Vec<String>,
    #[serde(default)]
    #[serde(alias = "maxPricePerMinute", rename = "maxPricePerMinute")]
    pub max_price_per_minute: Option<f64>,
    #[serde(default)]
    #[serde(alias = "minRating", rename = "minRating")]
    pub min_rating: Option<f64>,
    #[serde(default)]
    #[serde(alias = "preferredLanguages", rename = "preferredLanguages")]
    pub preferred_languages: Vec<String>,
    #[serde(default)]
    #[serde(alias = "avoidedProviderIds", rename = "avoidedProviderIds")]
    pub avoided_provider_ids: Vec<String>,
    #[serde(default)]
    pub urgency: Urgency,
    #[serde(default)]
    pub mode: ConsultationMode,
    #[serde(default = "default_limit")]
    pub limit: u16,
}

fn default_limit() -> u16 {
    20
}

impl FindMatchesRequest {
    pub fn into_criteria(self) -> RequestCriteria {
        RequestCriteria {
            client_id: self.client_id,
            preferred_categories: self.preferred_categories,
            max_price_per_minute: self.max_price_per_minute,
            min_rating: self.min_rating,
            preferred_languages: self.preferred_languages,
            avoided_provider_ids: self.avoided_provider_ids,
            urgency: self.urgency,
            mode: self.mode,
        }
    }
}

/// Request to update a provider's status
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateStatusRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "provider_id", rename = "providerId")]
    pub provider_id: String,
    #[serde(flatten)]
    pub update: ProviderStatusUpdate,
}

/// Consultation outcome reported by the session ledger
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CompleteConsultationRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "client_id", rename = "clientId")]
    pub client_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "provider_id", rename = "providerId")]
    pub provider_id: String,
    pub category: String,
    #[serde(alias = "ratingGiven", rename = "ratingGiven")]
    pub rating_given: f64,
    #[serde(alias = "durationMinutes", rename = "durationMinutes")]
    pub duration_minutes: u32,
    #[serde(default)]
    pub cost: f64,
    #[serde(default = "default_successful")]
    pub successful: bool,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

fn default_successful() -> bool {
    true
}

/// Search query reported by the UI layer
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchQueryRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "client_id", rename = "clientId")]
    pub client_id: String,
    #[validate(length(min = 1))]
    pub query: String,
}
