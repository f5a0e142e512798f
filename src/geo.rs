//! Great-circle distance and compass bearing between two coordinates

use haversine::{Location as HaversineLocation, Units, distance};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The 8-point compass rose, clockwise from north
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompassPoint {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl CompassPoint {
    pub const ALL: [CompassPoint; 8] = [
        CompassPoint::N,
        CompassPoint::NE,
        CompassPoint::E,
        CompassPoint::SE,
        CompassPoint::S,
        CompassPoint::SW,
        CompassPoint::W,
        CompassPoint::NW,
    ];

    /// Quantize a bearing in degrees to the nearest of the 8 compass points
    #[must_use]
    pub fn from_degrees(degrees: f64) -> Self {
        let normalized = degrees.rem_euclid(360.0);
        let index = (normalized / 45.0).round() as usize % 8;
        Self::ALL[index]
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CompassPoint::N => "N",
            CompassPoint::NE => "NE",
            CompassPoint::E => "E",
            CompassPoint::SE => "SE",
            CompassPoint::S => "S",
            CompassPoint::SW => "SW",
            CompassPoint::W => "W",
            CompassPoint::NW => "NW",
        }
    }
}

impl fmt::Display for CompassPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Great-circle distance in kilometers (Haversine, Earth radius 6371 km)
#[must_use]
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    distance(
        HaversineLocation {
            latitude: lat1,
            longitude: lon1,
        },
        HaversineLocation {
            latitude: lat2,
            longitude: lon2,
        },
        Units::Kilometers,
    )
}

/// Initial bearing from point 1 to point 2 in degrees, normalized to [0, 360)
#[must_use]
pub fn bearing_degrees(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let y = delta_lon.sin() * lat2_rad.cos();
    let x = lat1_rad.cos() * lat2_rad.sin() - lat1_rad.sin() * lat2_rad.cos() * delta_lon.cos();

    let degrees = y.atan2(x).to_degrees().rem_euclid(360.0);
    // rem_euclid of a tiny negative angle rounds up to 360.0
    if degrees >= 360.0 { 0.0 } else { degrees }
}

/// Compass direction from point 1 to point 2.
///
/// Coincident points have no direction; they are reported as `N`.
#[must_use]
pub fn bearing(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> CompassPoint {
    if lat1 == lat2 && lon1 == lon2 {
        return CompassPoint::N;
    }
    CompassPoint::from_degrees(bearing_degrees(lat1, lon1, lat2, lon2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_coincident_points_is_zero() {
        assert_eq!(distance_km(64.8378, -147.7164, 64.8378, -147.7164), 0.0);
        assert_eq!(distance_km(0.0, 0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let there = distance_km(69.6492, 18.9553, 64.8378, -147.7164);
        let back = distance_km(64.8378, -147.7164, 69.6492, 18.9553);
        assert!((there - back).abs() < 1e-9);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let d = distance_km(0.0, 0.0, 1.0, 0.0);
        assert!((d - 111.2).abs() < 111.2 * 0.01, "got {d}");
    }

    #[test]
    fn test_cardinal_bearings() {
        assert_eq!(bearing(0.0, 0.0, 1.0, 0.0), CompassPoint::N);
        assert_eq!(bearing(0.0, 0.0, 0.0, 1.0), CompassPoint::E);
        assert_eq!(bearing(1.0, 0.0, 0.0, 0.0), CompassPoint::S);
        assert_eq!(bearing(0.0, 1.0, 0.0, 0.0), CompassPoint::W);
        assert_eq!(bearing(0.0, 0.0, 1.0, 1.0), CompassPoint::NE);
        assert_eq!(bearing(0.0, 0.0, -1.0, -1.0), CompassPoint::SW);
    }

    #[test]
    fn test_bearing_is_not_symmetric() {
        assert_eq!(bearing(60.0, 10.0, 61.0, 10.0), CompassPoint::N);
        assert_eq!(bearing(61.0, 10.0, 60.0, 10.0), CompassPoint::S);
    }

    #[test]
    fn test_coincident_bearing_is_north() {
        assert_eq!(bearing(45.0, 7.0, 45.0, 7.0), CompassPoint::N);
    }

    #[test]
    fn test_quantization_wraps_to_north() {
        assert_eq!(CompassPoint::from_degrees(0.0), CompassPoint::N);
        assert_eq!(CompassPoint::from_degrees(22.4), CompassPoint::N);
        assert_eq!(CompassPoint::from_degrees(22.6), CompassPoint::NE);
        assert_eq!(CompassPoint::from_degrees(337.6), CompassPoint::N);
        assert_eq!(CompassPoint::from_degrees(359.9), CompassPoint::N);
        assert_eq!(CompassPoint::from_degrees(-90.0), CompassPoint::W);
    }

    #[test]
    fn test_bearing_degrees_range() {
        for (lat2, lon2) in [(10.0, -170.0), (-45.0, 120.0), (89.0, 0.5), (-0.1, -0.1)] {
            let b = bearing_degrees(12.0, 34.0, lat2, lon2);
            assert!((0.0..360.0).contains(&b), "bearing {b} out of range");
        }
    }

    #[test]
    fn test_bearing_just_west_of_north_stays_in_range() {
        // atan2 yields a tiny negative angle here
        let b = bearing_degrees(0.0, 0.0, 1.0, -1e-17);
        assert!((0.0..360.0).contains(&b), "bearing {b} out of range");
        assert_eq!(CompassPoint::from_degrees(b), CompassPoint::N);
    }

    #[test]
    fn test_display() {
        assert_eq!(CompassPoint::SE.to_string(), "SE");
    }
}
