//! Scripted routing provider.
//!
//! Replies are scripted per leg (origin/destination pair) as a sequence:
//! attempt `n` gets reply `n`, and the last reply repeats. Unscripted legs
//! get a two-step road route through the midpoint.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use nav_planner::traits::{ProviderRoute, RouteRequest, RoutingProvider};
use nav_planner::{Coordinate, ProviderError, TravelMode};

#[derive(Debug, Clone)]
pub enum Reply {
    /// Road route with the given distance in meters.
    Road(f64),
    /// Road route whose first and last points are offset from the waypoints,
    /// as when the provider snaps to the nearest road.
    Snapped(f64),
    /// Exactly this provider payload.
    Custom(ProviderRoute),
    RateLimited,
    Rejected,
    Timeout,
    NoRoute,
}

#[derive(Debug, Clone)]
pub struct Call {
    pub mode: TravelMode,
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub region: Option<String>,
    pub at: Instant,
}

pub struct MockProvider {
    script: Vec<(Coordinate, Coordinate, Vec<Reply>)>,
    default_reply: Reply,
    latency: Duration,
    calls: Mutex<Vec<Call>>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            script: Vec::new(),
            default_reply: Reply::Road(1000.0),
            latency: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn on_leg(mut self, origin: Coordinate, destination: Coordinate, replies: Vec<Reply>) -> Self {
        self.script.push((origin, destination, replies));
        self
    }

    pub fn otherwise(mut self, reply: Reply) -> Self {
        self.default_reply = reply;
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, origin: Coordinate, destination: Coordinate) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.origin == origin && call.destination == destination)
            .count()
    }

    async fn respond(&self, mode: TravelMode, request: RouteRequest<'_>) -> Result<ProviderRoute, ProviderError> {
        let attempt = {
            let mut calls = self.calls.lock().unwrap();
            let attempt = calls
                .iter()
                .filter(|call| call.origin == request.origin && call.destination == request.destination)
                .count();
            calls.push(Call {
                mode,
                origin: request.origin,
                destination: request.destination,
                region: request.region.map(str::to_string),
                at: Instant::now(),
            });
            attempt
        };

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let reply = self
            .script
            .iter()
            .find(|(origin, destination, _)| *origin == request.origin && *destination == request.destination)
            .and_then(|(_, _, replies)| replies.get(attempt).or(replies.last()))
            .cloned()
            .unwrap_or_else(|| self.default_reply.clone());

        reply_result(reply, request.origin, request.destination)
    }
}

fn encode(points: &[Coordinate]) -> String {
    points
        .iter()
        .map(|point| format!("{},{}", point.longitude, point.latitude))
        .collect::<Vec<_>>()
        .join(";")
}

fn road(origin: Coordinate, destination: Coordinate, distance: f64) -> ProviderRoute {
    let midpoint = Coordinate::new(
        (origin.latitude + destination.latitude) / 2.0,
        (origin.longitude + destination.longitude) / 2.0 + 0.001,
    );
    ProviderRoute {
        distance: Some(distance),
        duration: Some(distance / 10.0),
        polylines: vec![encode(&[origin, midpoint]), encode(&[midpoint, destination])],
    }
}

fn reply_result(reply: Reply, origin: Coordinate, destination: Coordinate) -> Result<ProviderRoute, ProviderError> {
    match reply {
        Reply::Road(distance) => Ok(road(origin, destination, distance)),
        Reply::Snapped(distance) => {
            let snapped_origin = Coordinate::new(origin.latitude + 0.0002, origin.longitude);
            let snapped_destination = Coordinate::new(destination.latitude - 0.0002, destination.longitude);
            Ok(road(snapped_origin, snapped_destination, distance))
        }
        Reply::Custom(route) => Ok(route),
        Reply::RateLimited => Err(ProviderError::RateLimited {
            code: "10021".to_string(),
        }),
        Reply::Rejected => Err(ProviderError::Rejected {
            code: "20800".to_string(),
            info: "OUT_OF_SERVICE".to_string(),
        }),
        Reply::Timeout => Err(ProviderError::Timeout),
        Reply::NoRoute => Err(ProviderError::NoRoute),
    }
}

#[async_trait]
impl RoutingProvider for MockProvider {
    async fn walking_route(&self, request: RouteRequest<'_>) -> Result<ProviderRoute, ProviderError> {
        self.respond(TravelMode::Walking, request).await
    }

    async fn driving_route(&self, request: RouteRequest<'_>) -> Result<ProviderRoute, ProviderError> {
        self.respond(TravelMode::Driving, request).await
    }

    async fn transit_route(&self, request: RouteRequest<'_>) -> Result<ProviderRoute, ProviderError> {
        self.respond(TravelMode::PublicTransport, request).await
    }
}
