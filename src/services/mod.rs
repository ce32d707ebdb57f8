// Service exports
pub mod cache;
pub mod geocoder;
pub mod source;

pub use cache::{DatasetCache, CacheStats};
pub use geocoder::{Geocoder, FixedGeocoder, GeocodeError};
pub use source::{PharmacyLoader, PharmacySource, SourceError, fallback_pharmacies};
