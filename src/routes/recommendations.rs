use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{
    CompleteConsultationRequest, ConsultationRecord, ErrorResponse, RecommendationsResponse,
    RecordConsultationResponse, SearchQueryRequest, SearchQueryResponse,
};
use crate::routes::matches::AppState;

/// Configure recommendation and behavior routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/recommendations/{client_id}",
        web::get().to(get_recommendations),
    )
    .route(
        "/consultations/complete",
        web::post().to(complete_consultation),
    )
    .route("/search/query", web::post().to(add_search_query));
}

/// Personalized recommendations endpoint
///
/// GET /api/v1/recommendations/{clientId}
///
/// Clients without history get the cold-start list; the response is never
/// empty of meaning, only possibly short.
async fn get_recommendations(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let client_id = path.into_inner();

    if let Some(cached) = state.cache.get(&client_id).await {
        return HttpResponse::Ok().json(RecommendationsResponse {
            client_id,
            recommendations: (*cached).clone(),
            generated_at: chrono::Utc::now(),
        });
    }

    // Write access: generation may lazily rebuild the similarity matrix
    let recommendations = state
        .engine
        .write()
        .await
        .generate_recommendations(&client_id);

    state.cache.insert(&client_id, recommendations.clone()).await;

    tracing::info!(
        "Returning {} recommendations for client {}",
        recommendations.len(),
        client_id
    );

    HttpResponse::Ok().json(RecommendationsResponse {
        client_id,
        recommendations,
        generated_at: chrono::Utc::now(),
    })
}

/// Consultation completion endpoint (ledger entry point)
///
/// POST /api/v1/consultations/complete
///
/// Feeds the behavior profile and, for successful sessions, the
/// client/provider affinity used by the matching score.
async fn complete_consultation(
    state: web::Data<AppState>,
    req: web::Json<CompleteConsultationRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let record = ConsultationRecord {
        provider_id: req.provider_id.clone(),
        category: req.category.clone(),
        rating_given: req.rating_given,
        duration_minutes: req.duration_minutes,
        cost: req.cost,
        timestamp: req.timestamp.unwrap_or_else(chrono::Utc::now),
    };

    let mut engine = state.engine.write().await;
    if req.successful {
        engine.record_successful_consultation(&req.client_id, &req.provider_id);
    }
    engine.update_user_behavior(&req.client_id, record);
    drop(engine);

    state.cache.invalidate(&req.client_id).await;

    tracing::debug!(
        "Recorded consultation: client {} -> provider {}",
        req.client_id,
        req.provider_id
    );

    HttpResponse::Ok().json(RecordConsultationResponse {
        success: true,
        event_id: uuid::Uuid::new_v4().to_string(),
    })
}

/// Search query endpoint
///
/// POST /api/v1/search/query
async fn add_search_query(
    state: web::Data<AppState>,
    req: web::Json<SearchQueryRequest>,
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
        .add_search_query(&req.client_id, &req.query);

    // The first search creates the behavior profile, which changes the
    // cold-start outcome for this client
    state.cache.invalidate(&req.client_id).await;

    HttpResponse::Ok().json(SearchQueryResponse { success: true })
}
