//! Geometry primitives: [`Coord`] and the two distance measures used by the
//! engine.
//!
//! [`euclidean`] works directly in coordinate units and is what every
//! heuristic and default edge weight uses. [`haversine_km`] is only used to
//! size query regions, which callers express in kilometres.

use std::fmt;
use std::ops::Sub;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

// ---------------------------------------------------------------------------
// Coord
// ---------------------------------------------------------------------------

/// A longitude/latitude pair in degrees.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coord {
    pub lon: f64,
    pub lat: f64,
}

impl Coord {
    /// Origin (0, 0).
    pub const ZERO: Self = Self { lon: 0.0, lat: 0.0 };

    /// Create a new coordinate.
    #[inline]
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Whether both components are finite numbers.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }

    /// Planar distance to `other`; see [`euclidean`].
    #[inline]
    pub fn distance(self, other: Coord) -> f64 {
        euclidean(self, other)
    }
}

impl Sub for Coord {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.lon - rhs.lon, self.lat - rhs.lat)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lon, self.lat)
    }
}

// ---------------------------------------------------------------------------
// Distances
// ---------------------------------------------------------------------------

/// Straight-line distance in coordinate units.
///
/// Never exceeds the length of any polyline between the two points, so it is
/// an admissible heuristic whenever edge weights are at least the planar
/// distance between their endpoints (the default weight).
#[inline]
pub fn euclidean(a: Coord, b: Coord) -> f64 {
    let d = a - b;
    d.lon.hypot(d.lat)
}

/// Great-circle distance in kilometres.
pub fn haversine_km(a: Coord, b: Coord) -> f64 {
    let (lat1, lat2) = (a.lat.to_radians(), b.lat.to_radians());
    let dlat = lat2 - lat1;
    let dlon = (b.lon - a.lon).to_radians();
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}
