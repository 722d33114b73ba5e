//! Error taxonomy for navigation planning.
//!
//! Provider errors are per-request and never reach the caller of
//! [`crate::RouteNavigator`]; they end as a [`PlanningFailure`] for one leg,
//! which the orchestrator turns into a fallback segment. Only
//! [`NavigationError`] is surfaced.

use thiserror::Error;

/// Closed classification of a failed provider request.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("rate limit exceeded (code {code})")]
    RateLimited { code: String },

    #[error("provider rejected request: {code} - {info}")]
    Rejected { code: String, info: String },

    #[error("provider found no route")]
    NoRoute,

    #[error("provider request timed out")]
    Timeout,

    #[error("HTTP request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("malformed provider response: {0}")]
    Malformed(String),
}

impl ProviderError {
    /// Whether the request may succeed if repeated after a pause.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ProviderError::RateLimited { .. })
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout
        } else if err.is_decode() {
            ProviderError::Malformed(err.to_string())
        } else {
            ProviderError::Request(err)
        }
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::Malformed(err.to_string())
    }
}

/// A leg that could not be resolved after all permitted attempts.
#[derive(Debug, Error)]
#[error("segment planning failed after {attempts} attempt(s): {source}")]
pub struct PlanningFailure {
    pub attempts: u32,
    #[source]
    pub source: ProviderError,
}

/// Fatal errors of a whole planning call.
#[derive(Debug, Error)]
pub enum NavigationError {
    /// Fewer than two waypoints carry a coordinate.
    #[error("invalid coordinate: need at least 2 waypoints with coordinates, got {usable}")]
    InvalidCoordinate { usable: usize },

    #[error("routing provider initialization failed: {0}")]
    ProviderInit(String),

    #[error("navigation planning was cancelled")]
    Cancelled,
}
