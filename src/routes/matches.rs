use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use tokio::sync::RwLock;
use validator::Validate;

use crate::core::Engine;
use crate::models::{
    ErrorResponse, FindMatchesRequest, FindMatchesResponse, HealthResponse, ProviderProfile,
    StatusUpdateResponse, UpdateStatusRequest,
};
use crate::services::RecommendationCache;

/// Application state shared across all handlers
///
/// The engine itself is synchronous and lock-free; concurrent request
/// serving wraps it in a RwLock here, at the edge.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RwLock<Engine>>,
    pub cache: Arc<RecommendationCache>,
    pub max_limit: u16,
}

/// Configure match and provider routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/matches/find", web::post().to(find_matches))
        .route("/providers/register", web::post().to(register_provider))
        .route("/providers/status", web::post().to(update_status));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Find matches endpoint
///
/// POST /api/v1/matches/find
///
/// Request body:
/// ```json
/// {
///   "clientId": "string",
///   "preferredCategories": ["Tarot"],
///   "maxPricePerMinute": 3.0,
///   "minRating": 4.5,
///   "urgency": "medium",
///   "mode": "chat",
///   "limit": 20
/// }
/// ```
async fn find_matches(
    state: web::Data<AppState>,
    req: web::Json<FindMatchesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for find_matches request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let req = req.into_inner();
    let limit = req.limit.min(state.max_limit) as usize;
    let client_id = req.client_id.clone();
    let criteria = req.into_criteria();

    tracing::info!("Finding matches for client: {}, limit: {}", client_id, limit);

    let engine = state.engine.read().await;
    let mut matches = engine.find_best_matches(&criteria);
    let total_candidates = engine.provider_count();
    drop(engine);

    matches.truncate(limit);

    tracing::info!(
        "Returning {} matches for client {} (from {} candidates)",
        matches.len(),
        client_id,
        total_candidates
    );

    HttpResponse::Ok().json(FindMatchesResponse {
        matches,
        total_candidates,
    })
}

/// Register or replace a provider profile
///
/// POST /api/v1/providers/register
async fn register_provider(
    state: web::Data<AppState>,
    req: web::Json<ProviderProfile>,
) -> impl Responder {
    let profile = req.into_inner();
    if profile.id.is_empty() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: "provider id must not be empty".to_string(),
            status_code: 400,
        });
    }

    let provider_id = profile.id.clone();
    state.engine.write().await.register_provider(profile);

    // The similarity matrix shifted; every cached list may be stale
    state.cache.invalidate_all();

    HttpResponse::Ok().json(StatusUpdateResponse {
        success: true,
        provider_id,
    })
}

/// Merge a partial provider status update
///
/// POST /api/v1/providers/status
///
/// Unknown provider ids are silently ignored and still acknowledged.
async fn update_status(
    state: web::Data<AppState>,
    req: web::Json<UpdateStatusRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    state
        .engine
        .write()
        .await
        .update_operator_status(&req.provider_id, &req.update);

    state.cache.invalidate_all();

    tracing::debug!("Applied status update for provider {}", req.provider_id);

    HttpResponse::Ok().json(StatusUpdateResponse {
        success: true,
        provider_id: req.provider_id.clone(),
    })
}
