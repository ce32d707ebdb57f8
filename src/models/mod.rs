// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Pharmacy, PharmacyId, DayKey, TimeWindow, WeeklySchedule, ReferencePosition,
    DistanceLimit, FilterCriteria, RankedPharmacy, BoundingBox, parse_clock, format_clock,
};
pub use requests::{RankQuery, SearchRequest};
pub use responses::{RankResponse, HealthResponse, ErrorResponse, DirectionsResponse, ReloadResponse};
