use crate::models::BoundingBox;

/// Earth's radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate the Haversine distance between two points in kilometers
///
/// # Arguments
/// * `lat1` - Latitude of first point in degrees
/// * `lon1` - Longitude of first point in degrees
/// * `lat2` - Latitude of second point in degrees
/// * `lon2` - Longitude of second point in degrees
///
/// # Returns
/// Unrounded distance in kilometers
#[inline]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // Floating point can push antipodal points just past 1.0
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Great-circle distance in kilometers, rounded to one decimal place
///
/// Rounding uses `f64::round` (half away from zero). Distances are never
/// negative, so ties always round up: 1.25 km becomes 1.3 km.
#[inline]
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    round_to_tenth(haversine_distance(lat1, lon1, lat2, lon2))
}

#[inline]
fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Smallest box holding every point, grown by `padding` of its span on each side
///
/// Points are `(latitude, longitude)` pairs. Returns `None` for no points.
pub fn bounding_box_of<I>(points: I, padding: f64) -> Option<BoundingBox>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let mut points = points.into_iter();
    let (lat, lon) = points.next()?;

    let mut bbox = BoundingBox {
        min_lat: lat,
        max_lat: lat,
        min_lon: lon,
        max_lon: lon,
    };

    for (lat, lon) in points {
        bbox.min_lat = bbox.min_lat.min(lat);
        bbox.max_lat = bbox.max_lat.max(lat);
        bbox.min_lon = bbox.min_lon.min(lon);
        bbox.max_lon = bbox.max_lon.max(lon);
    }

    let lat_pad = (bbox.max_lat - bbox.min_lat) * padding;
    let lon_pad = (bbox.max_lon - bbox.min_lon) * padding;

    Some(BoundingBox {
        min_lat: bbox.min_lat - lat_pad,
        max_lat: bbox.max_lat + lat_pad,
        min_lon: bbox.min_lon - lon_pad,
        max_lon: bbox.max_lon + lon_pad,
    })
}
