use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::models::domain::{BoundingBox, RankedPharmacy, ReferencePosition};
use crate::services::CacheStats;

/// Response for the ranking endpoints
///
/// `center` and `bounds` let the map client frame the result: `center` is the
/// reference position (or the default map center) and `bounds` covers every
/// returned pharmacy.
#[derive(Debug, Clone, Serialize)]
pub struct RankResponse<'a> {
    pub pharmacies: Vec<RankedPharmacy<'a>>,
    pub total_results: usize,
    pub total_candidates: usize,
    pub center: ReferencePosition,
    pub bounds: Option<BoundingBox>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub pharmacies: usize,
    pub cache: CacheStats,
}

/// Error response
///
/// Also usable as an actix error, rendering itself as the JSON body.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{error}: {message}")]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status_code: status.as_u16(),
        }
    }

    pub fn bad_request(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error, message)
    }
}

impl ResponseError for ErrorResponse {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self)
    }
}

/// Directions link for a pharmacy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectionsResponse {
    pub url: String,
}

/// Data set reload response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReloadResponse {
    pub success: bool,
    pub pharmacies: usize,
}
