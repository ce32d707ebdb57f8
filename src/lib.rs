//! Pharma Garde - pharmacy availability and ranking service
//!
//! This library provides the engine behind the pharmacy finder: it decides
//! whether a pharmacy is open from its weekly schedule (on-duty pharmacies are
//! always open), measures great-circle distances from a reference position, and
//! filters/sorts a pharmacy collection by openness and distance.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{rank, is_open, RankResult, Clock, distance::{distance_km, haversine_distance}};
pub use models::{Pharmacy, WeeklySchedule, TimeWindow, DayKey, ReferencePosition, FilterCriteria, DistanceLimit, RankedPharmacy};
