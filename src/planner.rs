//! Resolves a single leg through the routing provider.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::coordinate::Coordinate;
use crate::error::{PlanningFailure, ProviderError};
use crate::polyline::Polyline;
use crate::route::{RouteSegment, TravelMode};
use crate::throttle::{DEFAULT_REQUEST_INTERVAL, Throttle};
use crate::traits::{ProviderRoute, RouteRequest, RoutingProvider};

#[derive(Debug, Clone)]
pub struct PlannerOptions {
    /// Minimum spacing between any two provider requests.
    pub request_interval: Duration,
    /// Fixed pause before repeating a rate-limited request.
    pub retry_backoff: Duration,
    /// Extra attempts allowed after a rate-limited first attempt.
    pub max_retries: u32,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            request_interval: DEFAULT_REQUEST_INTERVAL,
            retry_backoff: Duration::from_millis(500),
            max_retries: 2,
        }
    }
}

/// Calls the provider for one origin/destination/mode triple.
///
/// Only rate-limit errors are retried. Everything else, and retry
/// exhaustion, ends as a [`PlanningFailure`].
pub struct SegmentPlanner<P> {
    provider: P,
    throttle: Arc<Throttle>,
    options: PlannerOptions,
}

impl<P: RoutingProvider> SegmentPlanner<P> {
    pub fn new(provider: P, throttle: Arc<Throttle>, options: PlannerOptions) -> Self {
        Self {
            provider,
            throttle,
            options,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn options(&self) -> &PlannerOptions {
        &self.options
    }

    /// Plans one leg.
    ///
    /// The caller gates the first attempt through the throttle; retries pass
    /// through it again after the backoff.
    pub async fn plan_segment(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        travel_mode: TravelMode,
        region: Option<&str>,
    ) -> Result<RouteSegment, PlanningFailure> {
        let request = RouteRequest {
            origin,
            destination,
            region,
        };

        let mut attempts = 0;
        loop {
            attempts += 1;
            match self.dispatch(travel_mode, request).await {
                Ok(route) => {
                    debug!(%travel_mode, attempts, "provider resolved segment");
                    return Ok(build_segment(origin, destination, travel_mode, route));
                }
                Err(err) if err.is_rate_limited() && attempts <= self.options.max_retries => {
                    warn!(%travel_mode, attempts, error = %err, "rate limited, backing off");
                    tokio::time::sleep(self.options.retry_backoff).await;
                    self.throttle.acquire().await;
                }
                Err(err) => {
                    return Err(PlanningFailure {
                        attempts,
                        source: err,
                    });
                }
            }
        }
    }

    async fn dispatch(
        &self,
        travel_mode: TravelMode,
        request: RouteRequest<'_>,
    ) -> Result<ProviderRoute, ProviderError> {
        match travel_mode {
            TravelMode::Walking => self.provider.walking_route(request).await,
            TravelMode::Driving => self.provider.driving_route(request).await,
            TravelMode::PublicTransport => {
                if request.region.is_none() {
                    debug!("transit request without region hint");
                }
                self.provider.transit_route(request).await
            }
        }
    }
}

/// Joins the provider's step polylines into one leg.
fn build_segment(
    origin: Coordinate,
    destination: Coordinate,
    travel_mode: TravelMode,
    route: ProviderRoute,
) -> RouteSegment {
    let mut geometry = Polyline::default();
    for encoded in &route.polylines {
        geometry.extend_joined(Polyline::decode(encoded));
    }

    if geometry.is_empty() {
        warn!(%travel_mode, "provider returned no decodable geometry, using straight line");
    }

    RouteSegment::resolved(
        origin,
        destination,
        geometry.into_points(),
        travel_mode,
        route.distance,
        route.duration,
    )
}
