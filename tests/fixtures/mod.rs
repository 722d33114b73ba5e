//! Test fixtures for nav-planner.
//!
//! Provides realistic test data including:
//! - Real Beijing landmarks (WGS84, from OpenStreetMap)
//! - Builder-style test waypoints
//! - A scripted routing provider that records every request

pub mod beijing_locations;
pub mod mock_provider;

pub use beijing_locations::*;
pub use mock_provider::*;
