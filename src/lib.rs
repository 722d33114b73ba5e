//! nav-planner core
//!
//! Resolves an ordered list of waypoints into road geometry, one leg at a
//! time, degrading individual legs to straight lines when the routing
//! provider cannot help.

pub mod amap;
pub mod coordinate;
pub mod error;
pub mod navigator;
pub mod planner;
pub mod polyline;
pub mod route;
pub mod throttle;
pub mod traits;

pub use coordinate::Coordinate;
pub use error::{NavigationError, PlanningFailure, ProviderError};
pub use navigator::RouteNavigator;
pub use planner::{PlannerOptions, SegmentPlanner};
pub use route::{NavigationPath, RouteSegment, TravelMode};
