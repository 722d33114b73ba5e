//! Polyline representation for route geometries.
//!
//! The routing provider encodes geometry as `"lng1,lat1;lng2,lat2;..."`.
//! Decoding happens once at the provider boundary; everything past that
//! works with [`Coordinate`] sequences.

use crate::coordinate::Coordinate;

/// A route geometry as decoded coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polyline {
    points: Vec<Coordinate>,
}

impl Polyline {
    /// Creates a new Polyline from decoded coordinate points.
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self { points }
    }

    /// Decodes a provider polyline string.
    ///
    /// Pairs that do not parse as two finite numbers are skipped. Empty or
    /// entirely malformed input yields an empty polyline.
    pub fn decode(encoded: &str) -> Self {
        Self::new(decode(encoded))
    }

    /// Appends `other`, dropping its first point when it repeats our last.
    pub fn extend_joined(&mut self, other: Polyline) {
        let shared = matches!(
            (self.points.last(), other.points.first()),
            (Some(last), Some(first)) if last == first
        );
        self.points
            .extend(other.points.into_iter().skip(usize::from(shared)));
    }

    /// Returns a reference to the coordinate points.
    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Consumes the polyline and returns the owned coordinate points.
    pub fn into_points(self) -> Vec<Coordinate> {
        self.points
    }
}

/// Decodes `"lng,lat;lng,lat"` into coordinates, preserving order.
pub fn decode(encoded: &str) -> Vec<Coordinate> {
    encoded
        .split(';')
        .filter_map(|pair| {
            let mut parts = pair.split(',');
            let lng = parts.next()?.trim().parse::<f64>().ok()?;
            let lat = parts.next()?.trim().parse::<f64>().ok()?;
            if parts.next().is_some() || !lng.is_finite() || !lat.is_finite() {
                return None;
            }
            Some(Coordinate::new(lat, lng))
        })
        .collect()
}
