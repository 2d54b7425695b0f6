mod config;
mod core;
mod models;
mod routes;
mod services;
mod store;

use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use config::Settings;
use core::Engine;
use models::ScoringWeights;
use routes::AppState;
use services::{DirectoryClient, RecommendationCache};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .content_type("application/json")
            .body(serde_json::to_string(self).unwrap())
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Initialize logging
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(log_level))
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting Consulto matching service...");

    // Load configuration
    let settings = Settings::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    info!("Configuration loaded successfully");

    // Initialize the engine with configured weights
    let weights = ScoringWeights {
        category: settings.scoring.weights.category,
        price: settings.scoring.weights.price,
        rating: settings.scoring.weights.rating,
        availability: settings.scoring.weights.availability,
        response: settings.scoring.weights.response,
        affinity: settings.scoring.weights.affinity,
        avoid_penalty: settings.scoring.weights.avoid_penalty,
        experience_bonus: settings.scoring.weights.experience_bonus,
        success_bonus: settings.scoring.weights.success_bonus,
    };

    let mut engine = Engine::new(weights);

    info!("Engine initialized with weights: {:?}", weights);

    // Seed the registry from the provider directory when configured.
    // A failed seed is not fatal: the directory keeps pushing through the
    // HTTP surface and the registry fills up over time.
    if let Some(endpoint) = settings.directory.endpoint.clone() {
        let directory = DirectoryClient::new(endpoint, settings.directory.api_key.clone());
        match directory.fetch_providers().await {
            Ok(providers) => {
                info!("Seeded {} providers from the directory", providers.len());
                for profile in providers {
                    engine.register_provider(profile);
                }
            }
            Err(e) => {
                warn!(
                    "Provider directory seed failed ({}), starting with an empty registry",
                    e
                );
            }
        }
    } else {
        info!("No provider directory configured, starting with an empty registry");
    }

    // Initialize the recommendation cache
    let cache_ttl = settings.cache.ttl_secs.unwrap_or(300);
    let cache_size = settings.cache.max_entries.unwrap_or(1000);
    let cache = Arc::new(RecommendationCache::new(cache_size, cache_ttl));

    info!(
        "Recommendation cache initialized ({} entries, TTL: {}s)",
        cache_size, cache_ttl
    );

    // Build application state
    let app_state = AppState {
        engine: Arc::new(RwLock::new(engine)),
        cache,
        max_limit: settings.matching.max_limit.unwrap_or(100),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
