//! Geographic primitives shared by every layer of the planner.
//!
//! Great-circle distance is used to describe straight-line fallback legs.
//! It ignores roads entirely, so it is never a substitute for provider metrics.

use serde::{Deserialize, Serialize};

/// Mean earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS84-like latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to `other` in meters.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        haversine_meters(*self, *other)
    }
}

/// Calculate haversine distance between two points in meters.
pub fn haversine_meters(from: Coordinate, to: Coordinate) -> f64 {
    let lat1_rad = from.latitude.to_radians();
    let lat2_rad = to.latitude.to_radians();
    let delta_lat = (to.latitude - from.latitude).to_radians();
    let delta_lng = (to.longitude - from.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_M * c
}

/// Axis-aligned box enclosing a set of coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south_west: Coordinate,
    pub north_east: Coordinate,
}

impl Bounds {
    /// Smallest box containing every point, or `None` for an empty input.
    pub fn enclosing<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Coordinate>,
    {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut bounds = Self {
            south_west: first,
            north_east: first,
        };

        for point in iter {
            bounds.south_west.latitude = bounds.south_west.latitude.min(point.latitude);
            bounds.south_west.longitude = bounds.south_west.longitude.min(point.longitude);
            bounds.north_east.latitude = bounds.north_east.latitude.max(point.latitude);
            bounds.north_east.longitude = bounds.north_east.longitude.max(point.longitude);
        }

        Some(bounds)
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.south_west.latitude + self.north_east.latitude) / 2.0,
            (self.south_west.longitude + self.north_east.longitude) / 2.0,
        )
    }
}
