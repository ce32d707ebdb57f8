use crate::models::{DistanceLimit, FilterCriteria, RankedPharmacy};

/// Check the open-only criterion
///
/// When `open_only` is off every pharmacy passes.
#[inline]
pub fn matches_open_filter(is_open: bool, criteria: &FilterCriteria) -> bool {
    !criteria.open_only || is_open
}

/// Check the distance criterion
///
/// A pharmacy without a computed distance (no reference position yet) is never
/// excluded by distance.
#[inline]
pub fn within_distance_limit(distance_km: Option<f64>, limit: DistanceLimit) -> bool {
    match (limit, distance_km) {
        (DistanceLimit::Unlimited, _) | (_, None) => true,
        (DistanceLimit::Km(max_km), Some(distance)) => distance <= max_km,
    }
}

/// Check an annotated pharmacy against every criterion
#[inline]
pub fn matches_criteria(candidate: &RankedPharmacy<'_>, criteria: &FilterCriteria) -> bool {
    matches_open_filter(candidate.is_open, criteria)
        && within_distance_limit(candidate.distance_km, criteria.max_distance)
}
