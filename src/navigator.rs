//! Route navigation orchestrator.
//!
//! Walks the waypoint list strictly in order, one provider request at a
//! time. The provider enforces a requests-per-second ceiling, so legs are
//! never fetched concurrently.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::amap::{AmapClient, AmapConfig};
use crate::coordinate::Coordinate;
use crate::error::NavigationError;
use crate::planner::{PlannerOptions, SegmentPlanner};
use crate::route::{NavigationPath, RouteSegment, TravelMode};
use crate::throttle::Throttle;
use crate::traits::{RoutingProvider, Waypoint};

pub struct RouteNavigator<P> {
    planner: SegmentPlanner<P>,
    throttle: Arc<Throttle>,
}

impl RouteNavigator<AmapClient> {
    /// Builds a navigator backed by the AMap web service, configured from
    /// the environment.
    pub fn from_env(options: PlannerOptions) -> Result<Self, NavigationError> {
        let client = AmapClient::new(AmapConfig::from_env()?)?;
        Ok(Self::new(client, options))
    }
}

impl<P: RoutingProvider> RouteNavigator<P> {
    pub fn new(provider: P, options: PlannerOptions) -> Self {
        let throttle = Arc::new(Throttle::new(options.request_interval));
        let planner = SegmentPlanner::new(provider, Arc::clone(&throttle), options);
        Self { planner, throttle }
    }

    pub fn provider(&self) -> &P {
        self.planner.provider()
    }

    /// Plans navigation geometry for every consecutive waypoint pair.
    ///
    /// Fails only when fewer than two waypoints carry a coordinate. Legs the
    /// provider cannot resolve become straight-line fallback segments.
    pub async fn plan_navigation_route<W: Waypoint>(
        &self,
        waypoints: &[W],
        travel_mode: TravelMode,
        region: Option<&str>,
    ) -> Result<NavigationPath, NavigationError> {
        self.plan_navigation_route_with_cancel(
            waypoints,
            travel_mode,
            region,
            &CancellationToken::new(),
        )
        .await
    }

    /// Like [`Self::plan_navigation_route`], stopping between legs once
    /// `cancel` fires. A cancelled plan yields no partial path.
    pub async fn plan_navigation_route_with_cancel<W: Waypoint>(
        &self,
        waypoints: &[W],
        travel_mode: TravelMode,
        region: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<NavigationPath, NavigationError> {
        let stops: Vec<Coordinate> = waypoints
            .iter()
            .filter_map(|waypoint| {
                let coordinate = waypoint.coordinate();
                if coordinate.is_none() {
                    let (id, name) = (waypoint.id(), waypoint.name());
                    debug!(id, name, "skipping waypoint without coordinate");
                }
                coordinate
            })
            .collect();
        if stops.len() < 2 {
            return Err(NavigationError::InvalidCoordinate { usable: stops.len() });
        }

        let mut segments: Vec<RouteSegment> = Vec::with_capacity(stops.len() - 1);
        for (index, pair) in stops.windows(2).enumerate() {
            let (origin, destination) = (pair[0], pair[1]);

            if cancel.is_cancelled() {
                return Err(NavigationError::Cancelled);
            }

            let planned = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(NavigationError::Cancelled),
                planned = async {
                    self.throttle.acquire().await;
                    self.planner
                        .plan_segment(origin, destination, travel_mode, region)
                        .await
                } => planned,
            };

            let segment = match planned {
                Ok(segment) => segment,
                Err(failure) => {
                    warn!(
                        segment = index,
                        attempts = failure.attempts,
                        error = %failure.source,
                        "segment planning failed, using straight-line fallback"
                    );
                    RouteSegment::fallback(origin, destination, travel_mode)
                }
            };
            segments.push(segment);
        }

        let path = NavigationPath::new(segments, travel_mode);
        info!(
            %travel_mode,
            segments = path.segments().len(),
            fallbacks = path.fallback_segment_count(),
            total_distance = path.total_distance(),
            total_duration = path.total_duration(),
            "navigation route planned"
        );
        Ok(path)
    }
}
