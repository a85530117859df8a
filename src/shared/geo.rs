use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Earth's radius in meters (for Haversine formula)
const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        haversine_distance(self.lat, self.lng, other.lat, other.lng)
    }
}

/// Calculate Haversine distance between two points in meters
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_METERS * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_distance() {
        // Jakarta to Bandung, approx 116km by Haversine
        let jakarta = GeoPoint::new(-6.2088, 106.8456);
        let bandung = GeoPoint::new(-6.9175, 107.6191);

        let distance = jakarta.distance_to(&bandung);

        assert!(distance > 110_000.0 && distance < 125_000.0);
    }

    #[test]
    fn test_haversine_same_point() {
        let distance = haversine_distance(17.5449, 78.3995, 17.5449, 78.3995);
        assert!(distance < 1.0);
    }

    #[test]
    fn test_short_distance_in_meters() {
        // ~0.0003 degrees of latitude is roughly 33m
        let a = GeoPoint::new(17.5449, 78.3995);
        let b = GeoPoint::new(17.5452, 78.3995);
        let distance = a.distance_to(&b);
        assert!(distance > 30.0 && distance < 36.0);
    }

    #[test]
    fn test_point_validation() {
        assert!(GeoPoint::new(17.5, 78.4).is_valid());
        assert!(!GeoPoint::new(91.0, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, f64::NAN).is_valid());
    }
}
