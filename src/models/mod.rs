// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    ClientBehaviorProfile, ConsultationMode, ConsultationRecord, MatchScore, Priority,
    ProviderProfile, ProviderStatusUpdate, Recommendation, RecommendationKind, RequestCriteria,
    ScoringWeights, TimeSlot, Urgency,
};
pub use requests::{
    CompleteConsultationRequest, FindMatchesRequest, SearchQueryRequest, UpdateStatusRequest,
};
pub use responses::{
    ErrorResponse, FindMatchesResponse, HealthResponse, RecommendationsResponse,
    RecordConsultationResponse, SearchQueryResponse, StatusUpdateResponse,
};
