use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{DistanceLimit, FilterCriteria, ReferencePosition};

/// Query string of the ranking endpoint
///
/// `lat` and `lng` go together: both present for a located user, both absent
/// otherwise.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RankQuery {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: Option<f64>,
    #[serde(rename = "openOnly", default)]
    pub open_only: bool,
    #[serde(rename = "maxDistanceKm", default)]
    pub max_distance: DistanceLimit,
}

impl RankQuery {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            open_only: self.open_only,
            max_distance: self.max_distance,
        }
    }

    /// Reference position, or an error message when only one coordinate is
    /// given or a coordinate is not a finite number
    ///
    /// The range validators let `NaN` through, since every comparison with it
    /// is false.
    pub fn reference(&self) -> Result<Option<ReferencePosition>, String> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) if !lat.is_finite() || !lng.is_finite() => {
                Err(format!("lat and lng must be finite numbers, got {}, {}", lat, lng))
            }
            (Some(lat), Some(lng)) => Ok(Some(ReferencePosition::new(lat, lng))),
            (None, None) => Ok(None),
            _ => Err("lat and lng must be provided together".to_string()),
        }
    }
}

/// Request to rank pharmacies around an address
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchRequest {
    #[validate(length(min = 1))]
    pub address: String,
    #[serde(rename = "openOnly", default)]
    pub open_only: bool,
    #[serde(rename = "maxDistanceKm", default)]
    pub max_distance: DistanceLimit,
}

impl SearchRequest {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            open_only: self.open_only,
            max_distance: self.max_distance,
        }
    }
}
