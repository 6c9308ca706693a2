use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS84 coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
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

    /// Great-circle distance in kilometres.
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        haversine_km(*self, *other)
    }
}

/// Great-circle distance between two points on a sphere of radius [`EARTH_RADIUS_KM`].
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    // Rounding can push h just past 1 for near-antipodal points.
    let h = ((d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2))
    .clamp(0.0, 1.0);
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LUANDA_CONSUMER: GeoPoint = GeoPoint {
        lat: -8.8383,
        lng: 13.2344,
    };
    const LUANDA_SUPPLIER: GeoPoint = GeoPoint {
        lat: -8.8390,
        lng: 13.2350,
    };

    #[test]
    fn distance_to_self_is_zero() {
        assert_eq!(haversine_km(LUANDA_CONSUMER, LUANDA_CONSUMER), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let there = haversine_km(LUANDA_CONSUMER, LUANDA_SUPPLIER);
        let back = haversine_km(LUANDA_SUPPLIER, LUANDA_CONSUMER);
        assert!((there - back).abs() < 1e-12);
    }

    #[test]
    fn antipodal_points_are_half_a_circumference_apart() {
        let half_circumference = std::f64::consts::PI * EARTH_RADIUS_KM;
        for step in 0..=180 {
            let lat = -90.0 + step as f64;
            for lng in [0.0, 13.2344, 90.0, 180.0] {
                let a = GeoPoint::new(lat, lng);
                let b = GeoPoint::new(-lat, lng - 180.0);
                let d = haversine_km(a, b);
                assert!(!d.is_nan(), "NaN between {a:?} and {b:?}");
                assert!((d - half_circumference).abs() < 1e-3, "got {d} for {a:?}");
            }
        }
        let d = haversine_km(GeoPoint::new(84.882, 0.0), GeoPoint::new(-84.882, -180.0));
        assert!((d - half_circumference).abs() < 1e-3, "got {d}");
    }

    #[test]
    fn nearby_luanda_points_are_under_two_km() {
        let d = LUANDA_CONSUMER.distance_km(&LUANDA_SUPPLIER);
        assert!(d > 0.0 && d < 2.0, "got {d}");
        // ~0.1 km by a planar approximation
        assert!((d - 0.1017).abs() < 0.005, "got {d}");
    }

    #[test]
    fn luanda_to_lubango_is_a_long_haul() {
        let lubango = GeoPoint::new(-14.917, 13.492);
        let d = haversine_km(LUANDA_CONSUMER, lubango);
        assert!((670.0..690.0).contains(&d), "got {d}");
    }

    #[test]
    fn out_of_range_points_are_invalid() {
        assert!(LUANDA_CONSUMER.is_valid());
        assert!(!GeoPoint::new(91.0, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, f64::NAN).is_valid());
    }
}
