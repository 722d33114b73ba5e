//! Seams between the planner and its collaborators.
//!
//! Applications implement [`Waypoint`] for their own itinerary stops, and
//! [`RoutingProvider`] wraps whichever routing service resolves legs.

use async_trait::async_trait;

use crate::coordinate::Coordinate;
use crate::error::ProviderError;

/// An ordered stop supplied by the upstream itinerary optimizer.
pub trait Waypoint {
    /// Identifies the stop in planning logs.
    fn id(&self) -> &str;

    fn name(&self) -> &str;

    /// Resolved location. Stops without one are skipped during planning.
    fn coordinate(&self) -> Option<Coordinate>;
}

/// One origin/destination request to a routing provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteRequest<'a> {
    pub origin: Coordinate,
    pub destination: Coordinate,
    /// City or region code. Transit routing needs it; others ignore it.
    pub region: Option<&'a str>,
}

/// What a provider returns for a resolved leg.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderRoute {
    /// Meters.
    pub distance: Option<f64>,
    /// Seconds.
    pub duration: Option<f64>,
    /// Encoded polylines, in travel order.
    pub polylines: Vec<String>,
}

/// Mode-specific routing calls behind one interface.
///
/// Each call is a single outbound request. Implementations classify
/// failures into [`ProviderError`] so callers can decide on retries without
/// inspecting codes.
#[async_trait]
pub trait RoutingProvider: Send + Sync {
    async fn walking_route(&self, request: RouteRequest<'_>) -> Result<ProviderRoute, ProviderError>;

    async fn driving_route(&self, request: RouteRequest<'_>) -> Result<ProviderRoute, ProviderError>;

    async fn transit_route(&self, request: RouteRequest<'_>) -> Result<ProviderRoute, ProviderError>;
}
