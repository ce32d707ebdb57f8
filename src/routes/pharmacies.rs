use actix_web::{http::StatusCode, web, HttpResponse, Responder, ResponseError};
use validator::Validate;
use crate::config::MapSettings;
use crate::core::{bounding_box_of, rank, Clock, RankResult};
use crate::models::{
    DirectionsResponse, ErrorResponse, HealthResponse, RankQuery, RankResponse, ReferencePosition,
    ReloadResponse, SearchRequest,
};
use crate::services::{DatasetCache, Geocoder};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<DatasetCache>,
    pub geocoder: Arc<dyn Geocoder>,
    pub clock: Arc<dyn Clock>,
    pub map: MapSettings,
}

/// Configure all pharmacy routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/pharmacies", web::get().to(list_pharmacies))
        .route("/pharmacies/search", web::post().to(search_pharmacies))
        .route("/pharmacies/reload", web::post().to(reload_pharmacies))
        .route("/pharmacies/{id}/directions", web::get().to(get_directions));
}

fn bad_request(error: &str, message: String) -> HttpResponse {
    ErrorResponse::bad_request(error, message).error_response()
}

/// Build the ranking response, framing the map around the result
fn build_rank_response<'a>(
    result: RankResult<'a>,
    reference: Option<ReferencePosition>,
    map: &MapSettings,
) -> RankResponse<'a> {
    let bounds = bounding_box_of(
        result
            .pharmacies
            .iter()
            .map(|ranked| (ranked.pharmacy.latitude, ranked.pharmacy.longitude)),
        map.bounds_padding,
    );

    RankResponse {
        total_results: result.pharmacies.len(),
        total_candidates: result.total_candidates,
        pharmacies: result.pharmacies,
        center: reference.unwrap_or_else(|| map.default_center()),
        bounds,
    }
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let dataset = state.dataset.get_or_load().await;

    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        pharmacies: dataset.len(),
        cache: state.dataset.stats(),
    })
}

/// Rank pharmacies endpoint
///
/// GET /api/v1/pharmacies?lat=49.44&lng=1.09&openOnly=true&maxDistanceKm=5
///
/// Without `lat`/`lng` the data set order is kept and no distance is reported.
/// `maxDistanceKm` accepts a number or `all`.
async fn list_pharmacies(
    state: web::Data<AppState>,
    query: web::Query<RankQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return bad_request("Validation failed", errors.to_string());
    }

    let reference = match query.reference() {
        Ok(reference) => reference,
        Err(message) => return bad_request("Invalid position", message),
    };

    let dataset = state.dataset.get_or_load().await;
    let result = rank(&dataset, reference, &query.criteria(), state.clock.now());

    tracing::info!(
        "Returning {} pharmacies (from {} candidates)",
        result.pharmacies.len(),
        result.total_candidates
    );

    HttpResponse::Ok().json(build_rank_response(result, reference, &state.map))
}

/// Search around an address endpoint
///
/// POST /api/v1/pharmacies/search
///
/// Request body:
/// ```json
/// {
///   "address": "string",
///   "openOnly": false,
///   "maxDistanceKm": "all"
/// }
/// ```
async fn search_pharmacies(
    state: web::Data<AppState>,
    req: web::Json<SearchRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return bad_request("Validation failed", errors.to_string());
    }

    let reference = match state.geocoder.geocode(&req.address) {
        Ok(position) => position,
        Err(e) => {
            tracing::info!("Geocoding failed for {:?}: {}", req.address, e);
            return bad_request("Invalid address", e.to_string());
        }
    };

    tracing::info!("Searching around {:?} ({:?})", req.address, reference);

    let dataset = state.dataset.get_or_load().await;
    let result = rank(&dataset, Some(reference), &req.criteria(), state.clock.now());

    HttpResponse::Ok().json(build_rank_response(result, Some(reference), &state.map))
}

/// Directions link endpoint
///
/// GET /api/v1/pharmacies/{id}/directions
async fn get_directions(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let id = path.into_inner();
    let dataset = state.dataset.get_or_load().await;

    match dataset.iter().find(|pharmacy| pharmacy.id.to_string() == id) {
        Some(pharmacy) => HttpResponse::Ok().json(DirectionsResponse {
            url: directions_url(pharmacy.latitude, pharmacy.longitude),
        }),
        None => ErrorResponse::new(
            StatusCode::NOT_FOUND,
            "Pharmacy not found",
            format!("No pharmacy with id {}", id),
        )
        .error_response(),
    }
}

/// Google Maps directions link to a destination
pub fn directions_url(lat: f64, lng: f64) -> String {
    format!("https://www.google.com/maps/dir/?api=1&destination={},{}", lat, lng)
}

/// Reload the data set endpoint
///
/// POST /api/v1/pharmacies/reload
async fn reload_pharmacies(state: web::Data<AppState>) -> impl Responder {
    state.dataset.invalidate().await;
    let dataset = state.dataset.get_or_load().await;

    tracing::info!("Reloaded {} pharmacies", dataset.len());

    HttpResponse::Ok().json(ReloadResponse {
        success: true,
        pharmacies: dataset.len(),
    })
}
