use crate::models::{FilterCriteria, Pharmacy, RankedPharmacy, ReferencePosition};
use crate::core::{
    distance::distance_km,
    filters::matches_criteria,
    schedule::is_open,
};
use chrono::NaiveDateTime;
use std::cmp::Ordering;

/// Result of a ranking pass
#[derive(Debug)]
pub struct RankResult<'a> {
    pub pharmacies: Vec<RankedPharmacy<'a>>,
    pub total_candidates: usize,
}

/// Rank pharmacies for display
///
/// # Pipeline Stages
/// 1. Annotate every pharmacy with its distance to `reference` (none without one)
///    and its open status at `now`
/// 2. Apply the open-only and distance criteria
/// 3. With a reference position, stable sort by ascending distance; otherwise
///    keep the input order
///
/// The input slice is never modified: distances live on the returned
/// [`RankedPharmacy`] values and therefore always match `reference`.
pub fn rank<'a>(
    pharmacies: &'a [Pharmacy],
    reference: Option<ReferencePosition>,
    criteria: &FilterCriteria,
    now: NaiveDateTime,
) -> RankResult<'a> {
    let total_candidates = pharmacies.len();

    let mut ranked: Vec<RankedPharmacy<'a>> = pharmacies
        .iter()
        // Stage 1: annotate
        .map(|pharmacy| RankedPharmacy {
            pharmacy,
            distance_km: reference.map(|position| {
                distance_km(
                    position.lat,
                    position.lng,
                    pharmacy.latitude,
                    pharmacy.longitude,
                )
            }),
            is_open: is_open(pharmacy, &now),
        })
        // Stage 2: filter
        .filter(|candidate| matches_criteria(candidate, criteria))
        .collect();

    // Stage 3: sort (Vec::sort_by is stable, ties keep input order)
    if reference.is_some() {
        ranked.sort_by(|a, b| {
            a.distance_km
                .partial_cmp(&b.distance_km)
                .unwrap_or(Ordering::Equal)
        });
    }

    tracing::debug!(
        "Ranked {} of {} pharmacies (reference: {:?}, criteria: {:?})",
        ranked.len(),
        total_candidates,
        reference,
        criteria
    );

    RankResult {
        pharmacies: ranked,
        total_candidates,
    }
}
