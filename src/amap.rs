//! AMap web-service adapter for leg routing.
//!
//! Uses the v3 direction endpoints. The service reports numbers as strings
//! and empty objects as `[]`, so the response types below accept both.

use async_trait::async_trait;
use serde::de::{DeserializeOwned, Error as _, IgnoredAny};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

use crate::coordinate::Coordinate;
use crate::error::{NavigationError, ProviderError};
use crate::traits::{ProviderRoute, RouteRequest, RoutingProvider};

pub const AMAP_WALKING_API_PATH: &str = "/v3/direction/walking";
pub const AMAP_DRIVING_API_PATH: &str = "/v3/direction/driving";
pub const AMAP_TRANSIT_API_PATH: &str = "/v3/direction/transit/integrated";

/// Infocodes the service uses for request-frequency violations: the
/// windowed `ACCESS_TOO_FREQUENT` and the per-second QPS limits.
const RATE_LIMIT_INFOCODES: &[&str] = &["10004", "10019", "10020", "10021"];

#[derive(Debug, Clone)]
pub struct AmapConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl Default for AmapConfig {
    fn default() -> Self {
        Self {
            base_url: "https://restapi.amap.com".to_string(),
            api_key: String::new(),
            timeout_secs: 10,
        }
    }
}

impl AmapConfig {
    /// Reads `AMAP_API_KEY` (required) and `AMAP_BASE_URL` (optional).
    pub fn from_env() -> Result<Self, NavigationError> {
        let api_key = std::env::var("AMAP_API_KEY")
            .map_err(|_| NavigationError::ProviderInit("AMAP_API_KEY is not set".to_string()))?;
        let mut config = Self {
            api_key,
            ..Self::default()
        };
        if let Ok(base_url) = std::env::var("AMAP_BASE_URL") {
            config.base_url = base_url;
        }
        Ok(config)
    }
}

#[derive(Debug, Clone)]
pub struct AmapClient {
    config: AmapConfig,
    client: reqwest::Client,
}

impl AmapClient {
    pub fn new(config: AmapConfig) -> Result<Self, NavigationError> {
        if config.api_key.trim().is_empty() {
            return Err(NavigationError::ProviderInit("missing AMap API key".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| NavigationError::ProviderInit(err.to_string()))?;

        Ok(Self { config, client })
    }

    async fn fetch(
        &self,
        path: &str,
        request: RouteRequest<'_>,
        extra: &[(&str, &str)],
    ) -> Result<AmapResponse, ProviderError> {
        let url = format!("{}{}", self.config.base_url, path);
        let origin = format_coordinate(request.origin);
        let destination = format_coordinate(request.destination);

        let response = self
            .client
            .get(url)
            .query(&[
                ("key", self.config.api_key.as_str()),
                ("origin", origin.as_str()),
                ("destination", destination.as_str()),
            ])
            .query(extra)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited {
                code: status.as_u16().to_string(),
            });
        }
        if !status.is_success() {
            let info = response.text().await.unwrap_or_default();
            return Err(ProviderError::Rejected {
                code: status.as_u16().to_string(),
                info,
            });
        }

        let body = response.text().await?;
        debug!(path, bytes = body.len(), "AMap response received");
        parse_response(&body)
    }
}

#[async_trait]
impl RoutingProvider for AmapClient {
    async fn walking_route(&self, request: RouteRequest<'_>) -> Result<ProviderRoute, ProviderError> {
        self.fetch(AMAP_WALKING_API_PATH, request, &[]).await?.into_path_route()
    }

    async fn driving_route(&self, request: RouteRequest<'_>) -> Result<ProviderRoute, ProviderError> {
        self.fetch(AMAP_DRIVING_API_PATH, request, &[("extensions", "base")])
            .await?
            .into_path_route()
    }

    async fn transit_route(&self, request: RouteRequest<'_>) -> Result<ProviderRoute, ProviderError> {
        let city = request.region.unwrap_or_default();
        self.fetch(AMAP_TRANSIT_API_PATH, request, &[("city", city)])
            .await?
            .into_transit_route()
    }
}

fn format_coordinate(coordinate: Coordinate) -> String {
    format!("{:.6},{:.6}", coordinate.longitude, coordinate.latitude)
}

/// Parses a response body and classifies service-level failures.
pub fn parse_response(body: &str) -> Result<AmapResponse, ProviderError> {
    let response: AmapResponse = serde_json::from_str(body)?;
    if response.status == "1" {
        return Ok(response);
    }

    let code = response.infocode.unwrap_or_default();
    if RATE_LIMIT_INFOCODES.contains(&code.as_str()) {
        Err(ProviderError::RateLimited { code })
    } else {
        Err(ProviderError::Rejected {
            code,
            info: response.info.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct AmapResponse {
    status: String,
    info: Option<String>,
    infocode: Option<String>,
    #[serde(default)]
    route: Lenient<AmapRoute>,
}

impl AmapResponse {
    /// First walking/driving path, with each step's polyline in order.
    pub fn into_path_route(self) -> Result<ProviderRoute, ProviderError> {
        let route = self.route.into_option().ok_or(ProviderError::NoRoute)?;
        let path = route.paths.into_iter().next().ok_or(ProviderError::NoRoute)?;

        Ok(ProviderRoute {
            distance: metric(path.distance),
            duration: metric(path.duration),
            polylines: path.steps.into_iter().filter_map(AmapStep::into_polyline).collect(),
        })
    }

    /// First transit plan. For each segment the walking steps come before
    /// the first bus line.
    pub fn into_transit_route(self) -> Result<ProviderRoute, ProviderError> {
        let route = self.route.into_option().ok_or(ProviderError::NoRoute)?;
        let transit = route.transits.into_iter().next().ok_or(ProviderError::NoRoute)?;

        let mut polylines = Vec::new();
        for segment in transit.segments {
            if let Some(walking) = segment.walking.into_option() {
                polylines.extend(walking.steps.into_iter().filter_map(AmapStep::into_polyline));
            }
            if let Some(bus) = segment.bus.into_option() {
                if let Some(line) = bus.buslines.into_iter().next() {
                    polylines.extend(line.polyline.into_option());
                }
            }
        }

        Ok(ProviderRoute {
            distance: metric(transit.distance),
            duration: metric(transit.duration),
            polylines,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
struct AmapRoute {
    #[serde(default)]
    paths: Vec<AmapPath>,
    #[serde(default)]
    transits: Vec<AmapTransit>,
}

#[derive(Debug, Deserialize)]
struct AmapPath {
    #[serde(default)]
    distance: Option<Number>,
    #[serde(default)]
    duration: Option<Number>,
    #[serde(default)]
    steps: Vec<AmapStep>,
}

#[derive(Debug, Deserialize)]
struct AmapStep {
    #[serde(default)]
    polyline: Lenient<String>,
}

impl AmapStep {
    fn into_polyline(self) -> Option<String> {
        self.polyline.into_option()
    }
}

#[derive(Debug, Deserialize)]
struct AmapTransit {
    #[serde(default)]
    distance: Option<Number>,
    #[serde(default)]
    duration: Option<Number>,
    #[serde(default)]
    segments: Vec<AmapTransitSegment>,
}

#[derive(Debug, Deserialize)]
struct AmapTransitSegment {
    #[serde(default)]
    walking: Lenient<AmapWalking>,
    #[serde(default)]
    bus: Lenient<AmapBus>,
}

#[derive(Debug, Deserialize)]
struct AmapWalking {
    #[serde(default)]
    steps: Vec<AmapStep>,
}

#[derive(Debug, Deserialize)]
struct AmapBus {
    #[serde(default)]
    buslines: Vec<AmapBusline>,
}

#[derive(Debug, Deserialize)]
struct AmapBusline {
    #[serde(default)]
    polyline: Lenient<String>,
}

/// A value the service replaces with `[]` or `null` when absent.
///
/// Anything else must deserialize as `T`; a present but malformed value is
/// an error, not an absence.
#[derive(Debug)]
enum Lenient<T> {
    Present(T),
    Absent,
}

impl<T> Default for Lenient<T> {
    fn default() -> Self {
        Lenient::Absent
    }
}

impl<T> Lenient<T> {
    fn into_option(self) -> Option<T> {
        match self {
            Lenient::Present(value) => Some(value),
            Lenient::Absent => None,
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Lenient<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        match &value {
            Value::Null => Ok(Lenient::Absent),
            Value::Array(items) if items.is_empty() => Ok(Lenient::Absent),
            _ => T::deserialize(value)
                .map(Lenient::Present)
                .map_err(D::Error::custom),
        }
    }
}

/// A metric reported either as a JSON number or a numeric string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Number {
    Float(f64),
    Text(String),
    Other(IgnoredAny),
}

/// Usable metrics are finite and non-negative; anything else is unknown.
fn metric(value: Option<Number>) -> Option<f64> {
    let parsed = match value? {
        Number::Float(value) => value,
        Number::Text(text) => text.trim().parse().ok()?,
        Number::Other(_) => return None,
    };
    (parsed.is_finite() && parsed >= 0.0).then_some(parsed)
}
