//! Navigation geometry for an itinerary.
//!
//! A [`NavigationPath`] is an ordered list of [`RouteSegment`]s, one per pair
//! of consecutive waypoints. Segment endpoints always come from the waypoint
//! list, never from provider output, so adjacent segments share endpoints
//! even when one of them is a straight-line fallback.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::coordinate::{Bounds, Coordinate};

/// How the traveller moves between waypoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TravelMode {
    Walking,
    PublicTransport,
    Driving,
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TravelMode::Walking => "walking",
                TravelMode::PublicTransport => "public_transport",
                TravelMode::Driving => "driving",
            }
        )
    }
}

/// One directed leg between two consecutive waypoints.
///
/// Built once by the segment planner and never mutated. `path_coordinates`
/// always starts at `origin` and ends at `destination`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSegment {
    origin: Coordinate,
    destination: Coordinate,
    path_coordinates: Vec<Coordinate>,
    travel_mode: TravelMode,
    /// Meters.
    distance: Option<f64>,
    /// Seconds.
    duration: Option<f64>,
    is_fallback: bool,
}

impl RouteSegment {
    /// Builds a leg from provider geometry.
    ///
    /// The geometry is pinned to the waypoint endpoints: `origin` is
    /// prepended and `destination` appended when the provider's snapped
    /// points differ. If the provider geometry is empty the leg keeps its
    /// metrics but degrades to a two-point line flagged as fallback.
    pub fn resolved(
        origin: Coordinate,
        destination: Coordinate,
        geometry: Vec<Coordinate>,
        travel_mode: TravelMode,
        distance: Option<f64>,
        duration: Option<f64>,
    ) -> Self {
        if geometry.is_empty() {
            return Self {
                origin,
                destination,
                path_coordinates: vec![origin, destination],
                travel_mode,
                distance,
                duration,
                is_fallback: true,
            };
        }

        let mut path_coordinates = Vec::with_capacity(geometry.len() + 2);
        if geometry.first() != Some(&origin) {
            path_coordinates.push(origin);
        }
        path_coordinates.extend(geometry);
        if path_coordinates.last() != Some(&destination) {
            path_coordinates.push(destination);
        }
        // A lone provider point equal to both endpoints still needs two points.
        if path_coordinates.len() < 2 {
            path_coordinates.push(destination);
        }

        Self {
            origin,
            destination,
            path_coordinates,
            travel_mode,
            distance,
            duration,
            is_fallback: false,
        }
    }

    /// A straight line with no metrics, used when planning a leg failed.
    pub fn fallback(origin: Coordinate, destination: Coordinate, travel_mode: TravelMode) -> Self {
        Self {
            origin,
            destination,
            path_coordinates: vec![origin, destination],
            travel_mode,
            distance: None,
            duration: None,
            is_fallback: true,
        }
    }

    pub fn origin(&self) -> Coordinate {
        self.origin
    }

    pub fn destination(&self) -> Coordinate {
        self.destination
    }

    pub fn path_coordinates(&self) -> &[Coordinate] {
        &self.path_coordinates
    }

    pub fn travel_mode(&self) -> TravelMode {
        self.travel_mode
    }

    /// Provider distance in meters.
    pub fn distance(&self) -> Option<f64> {
        self.distance
    }

    /// Provider duration in seconds.
    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    pub fn is_fallback(&self) -> bool {
        self.is_fallback
    }

    /// Great-circle distance between the endpoints in meters.
    pub fn straight_line_distance(&self) -> f64 {
        self.origin.distance_to(&self.destination)
    }
}

/// The full itinerary's navigation geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationPath {
    segments: Vec<RouteSegment>,
    travel_mode: TravelMode,
}

impl NavigationPath {
    pub fn new(segments: Vec<RouteSegment>, travel_mode: TravelMode) -> Self {
        Self {
            segments,
            travel_mode,
        }
    }

    pub fn segments(&self) -> &[RouteSegment] {
        &self.segments
    }

    pub fn travel_mode(&self) -> TravelMode {
        self.travel_mode
    }

    /// Merged geometry of every segment.
    ///
    /// The first segment contributes all of its points; each later segment
    /// drops its first point, which repeats the previous segment's last.
    pub fn all_coordinates(&self) -> Vec<Coordinate> {
        let mut segments = self.segments.iter();
        let Some(first) = segments.next() else {
            return Vec::new();
        };

        let mut merged = first.path_coordinates.clone();
        for segment in segments {
            merged.extend(segment.path_coordinates.iter().skip(1));
        }
        merged
    }

    /// Sum of known segment distances in meters; unknown counts as zero.
    pub fn total_distance(&self) -> f64 {
        self.segments
            .iter()
            .map(|segment| segment.distance.unwrap_or(0.0))
            .sum()
    }

    /// Sum of known segment durations in seconds; unknown counts as zero.
    pub fn total_duration(&self) -> f64 {
        self.segments
            .iter()
            .map(|segment| segment.duration.unwrap_or(0.0))
            .sum()
    }

    pub fn has_fallback_segments(&self) -> bool {
        self.segments.iter().any(RouteSegment::is_fallback)
    }

    pub fn fallback_segment_count(&self) -> usize {
        self.segments.iter().filter(|segment| segment.is_fallback).count()
    }

    /// Positions of the degraded legs, in order.
    pub fn fallback_indices(&self) -> Vec<usize> {
        self.segments
            .iter()
            .enumerate()
            .filter(|(_, segment)| segment.is_fallback)
            .map(|(index, _)| index)
            .collect()
    }

    /// Bounding box of the merged geometry, for framing the map.
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::enclosing(
            self.segments
                .iter()
                .flat_map(|segment| segment.path_coordinates.iter()),
        )
    }
}
