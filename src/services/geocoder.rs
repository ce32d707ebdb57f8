use crate::models::ReferencePosition;
use thiserror::Error;

/// Errors that can occur when resolving an address
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("Address is empty")]
    EmptyAddress,
}

/// Turns a postal address into a reference position
pub trait Geocoder: Send + Sync {
    fn geocode(&self, address: &str) -> Result<ReferencePosition, GeocodeError>;
}

/// Resolves every address to the same point (the default map center)
///
/// Stands in until a real geocoding service is wired in.
#[derive(Debug, Clone, Copy)]
pub struct FixedGeocoder {
    center: ReferencePosition,
}

impl FixedGeocoder {
    pub fn new(center: ReferencePosition) -> Self {
        Self { center }
    }
}

impl Geocoder for FixedGeocoder {
    fn geocode(&self, address: &str) -> Result<ReferencePosition, GeocodeError> {
        if address.trim().is_empty() {
            return Err(GeocodeError::EmptyAddress);
        }
        tracing::info!("Simulated geocoding for {:?} -> {:?}", address, self.center);
        Ok(self.center)
    }
}
