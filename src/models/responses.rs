use serde::{Deserialize, Serialize};

use crate::models::domain::{MatchScore, Recommendation};

/// Response for the find matches endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindMatchesResponse {
    pub matches: Vec<MatchScore>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
}

/// Response for the recommendations endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    #[serde(rename = "clientId")]
    pub client_id: String,
    pub recommendations: Vec<Recommendation>,
    #[serde(rename = "generatedAt")]
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Acknowledgement for a recorded consultation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordConsultationResponse {
    pub success: bool,
    #[serde(rename = "eventId")]
    pub event_id: String,
}

/// Acknowledgement for a provider status update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateResponse {
    pub success: bool,
    #[serde(rename = "providerId")]
    pub provider_id: String,
}

/// Acknowledgement for a recorded search query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQueryResponse {
    pub success: bool,
}
