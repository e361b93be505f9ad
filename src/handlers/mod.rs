mod results;
mod vote;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderValue, Method, header::CONTENT_TYPE},
    routing::{get, post},
};
use log::warn;
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::db::Database;
use crate::models::{Catalog, barangay::BARANGAYS};

#[derive(Clone)]
pub struct AppState {
    pub database: Arc<Database>,
    pub catalog: Arc<Catalog>,
}

pub fn build_router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/candidates", get(candidates))
        .route("/api/barangays", get(barangays))
        .route("/api/check-contact/:contact_number", get(vote::check_contact))
        .route("/api/submit-vote", post(vote::submit_vote))
        .route("/api/results/live", get(results::live))
        .route("/api/results/barangay/:barangay", get(results::by_barangay))
        .route("/api/results/:position", get(results::by_position))
        .route("/api/stats/hourly", get(results::hourly))
        .layer(cors_layer(allowed_origins))
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring invalid CORS origin {:?}: {}", origin, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true)
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "Election Poll API",
        "endpoints": {
            "get_candidates": "/api/candidates",
            "get_barangays": "/api/barangays",
            "check_contact": "/api/check-contact/{contact_number}",
            "submit_vote": "/api/submit-vote",
            "get_live_results": "/api/results/live",
            "get_position_results": "/api/results/{position}",
            "get_barangay_results": "/api/results/barangay/{barangay}",
            "get_hourly_stats": "/api/stats/hourly",
            "health": "/health"
        }
    }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

async fn candidates(State(state): State<AppState>) -> Json<Catalog> {
    Json(state.catalog.as_ref().clone())
}

async fn barangays() -> Json<&'static [&'static str]> {
    Json(&BARANGAYS)
}
