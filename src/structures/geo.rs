use std::fmt::Display;

use serde::{Deserialize, Serialize};

const EARTH_RADIUS: f64 = 6365396.0_f64;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

impl Display for LatLng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

impl LatLng {
    pub fn new(latitude: f64, longitude: f64) -> LatLng {
        LatLng {
            latitude,
            longitude,
        }
    }

    pub fn lat(&self) -> f64 {
        self.latitude
    }

    pub fn lng(&self) -> f64 {
        self.longitude
    }

    /// Alias of [`LatLng::lng`].
    pub fn lon(&self) -> f64 {
        self.longitude
    }

    /// Haversine distance in meters between two `[lat, lng]` slices, in the
    /// shape the k-d tree expects for its distance function.
    pub fn distance(loc1: &[f64], loc2: &[f64]) -> f64 {
        assert!(loc1.len() == 2);
        assert!(loc2.len() == 2);
        LatLng::new(loc1[0], loc1[1]).dist(LatLng::new(loc2[0], loc2[1]))
    }

    pub fn dist(&self, other: Self) -> f64 {
        let delta_latitude = (self.latitude - other.latitude).to_radians();
        let delta_longitude = (self.longitude - other.longitude).to_radians();

        let central_angle_inner = (delta_latitude / 2.0).sin().powi(2)
            + self.latitude.to_radians().cos()
                * other.latitude.to_radians().cos()
                * (delta_longitude / 2.0).sin().powi(2);
        let central_angle = 2.0 * central_angle_inner.sqrt().asin();

        EARTH_RADIUS * central_angle
    }

    /// Linear interpolation on the coordinates, `ratio` in `[0, 1]`.
    pub fn lerp(&self, other: Self, ratio: f64) -> LatLng {
        LatLng {
            latitude: self.latitude + (other.latitude - self.latitude) * ratio,
            longitude: self.longitude + (other.longitude - self.longitude) * ratio,
        }
    }

    pub fn as_array(&self) -> [f64; 2] {
        [self.latitude, self.longitude]
    }
}
